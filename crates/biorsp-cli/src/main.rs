//! biorsp CLI: command-line interface for radar-scanning spatial bias analysis.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use biorsp::{Analyzer, ExpressionMatrix, RspConfig, SelectionConfig, VantagePoint};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "biorsp")]
#[command(about = "Angular-sweep spatial bias analysis of 2D embeddings (foreground vs background)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select populations by gene expression and analyze them.
    Analyze(CliAnalyzeArgs),

    /// Analyze explicit foreground/background point files.
    AnalyzePoints(CliPointsArgs),

    /// Score an existing deviation signal.
    Score(CliScoreArgs),

    /// Filter an expression matrix by UMI count and expressing-cell count.
    Filter(CliFilterArgs),

    /// Print the default analysis configuration as JSON.
    PrintConfig,
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Expression matrix: JSON (`genes`, `cells`, `values`) or tab-separated DGE (.tsv/.txt).
    #[arg(long)]
    expression: PathBuf,

    /// Embedding coordinates, JSON `[[x, y], ...]`, one per matrix column.
    #[arg(long)]
    embedding: PathBuf,

    /// Cluster labels, JSON `[label, ...]`, one per embedding row.
    #[arg(long)]
    clusters: Option<PathBuf>,

    /// Gene selecting the foreground.
    #[arg(long)]
    gene: String,

    /// Foreground expression threshold (strictly greater than).
    #[arg(long, default_value = "1.0")]
    threshold: f64,

    /// Restrict both populations to this cluster label (repeatable).
    #[arg(long = "select-cluster", allow_hyphen_values = true)]
    select_clusters: Vec<i32>,

    /// Vantage point `x,y`. Defaults to the background centroid.
    #[arg(long, value_parser = parse_xy, allow_hyphen_values = true)]
    vantage: Option<[f64; 2]>,

    #[command(flatten)]
    sweep: CliSweepArgs,

    /// Path to write the result (JSON). Prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CliPointsArgs {
    /// Foreground coordinates, JSON `[[x, y], ...]`.
    #[arg(long)]
    foreground: PathBuf,

    /// Background coordinates, JSON `[[x, y], ...]`.
    #[arg(long)]
    background: PathBuf,

    /// Vantage point `x,y`. Defaults to the background centroid.
    #[arg(long, value_parser = parse_xy, allow_hyphen_values = true)]
    vantage: Option<[f64; 2]>,

    #[command(flatten)]
    sweep: CliSweepArgs,

    /// Path to write the result (JSON). Prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CliScoreArgs {
    /// Deviation signal, JSON `[v, ...]` sampled evenly over the angle range.
    #[arg(long)]
    signal: PathBuf,

    /// Start of the angle range the signal was sampled over (radians).
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    angle_start: f64,

    /// End of the angle range (radians, exclusive).
    #[arg(long, default_value_t = std::f64::consts::TAU, allow_hyphen_values = true)]
    angle_end: f64,
}

#[derive(Debug, Clone, Args)]
struct CliFilterArgs {
    /// Expression matrix: JSON or tab-separated DGE.
    #[arg(long)]
    expression: PathBuf,

    /// Keep cells whose total count is above this value.
    #[arg(long, default_value = "500")]
    umi_threshold: f64,

    /// Keep genes expressed in more than this many cells.
    #[arg(long, default_value = "1")]
    gene_threshold: usize,

    /// Path to write the filtered matrix (JSON).
    #[arg(long)]
    out: PathBuf,
}

#[derive(Debug, Clone, Args, Default)]
struct CliSweepArgs {
    /// Base configuration file (JSON); flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scanning window width in radians (default: π).
    #[arg(long)]
    window: Option<f64>,

    /// Number of scan angles and histogram bins.
    #[arg(long)]
    resolution: Option<usize>,

    /// Sweep range start (radians).
    #[arg(long, allow_hyphen_values = true)]
    angle_start: Option<f64>,

    /// Sweep range end (radians, exclusive).
    #[arg(long, allow_hyphen_values = true)]
    angle_end: Option<f64>,

    /// Run the sweep on the calling thread only.
    #[arg(long)]
    serial: bool,
}

impl CliSweepArgs {
    fn to_config(&self) -> CliResult<RspConfig> {
        let mut config = match &self.config {
            Some(path) => RspConfig::from_json_file(path)?,
            None => RspConfig::default(),
        };
        if let Some(w) = self.window {
            config.window_width = w;
        }
        if let Some(r) = self.resolution {
            config.resolution = r;
        }
        if let Some(s) = self.angle_start {
            config.angle_range[0] = s;
        }
        if let Some(e) = self.angle_end {
            config.angle_range[1] = e;
        }
        if self.serial {
            config.parallel = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_xy(s: &str) -> Result<[f64; 2], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(format!("expected `x,y`, got '{s}'"));
    }
    let x = parts[0]
        .parse::<f64>()
        .map_err(|e| format!("invalid x '{}': {e}", parts[0]))?;
    let y = parts[1]
        .parse::<f64>()
        .map_err(|e| format!("invalid y '{}': {e}", parts[1]))?;
    Ok([x, y])
}

fn vantage_from_arg(v: Option<[f64; 2]>) -> VantagePoint {
    v.map(VantagePoint::Explicit)
        .unwrap_or(VantagePoint::BackgroundCentroid)
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::AnalyzePoints(args) => run_analyze_points(&args),
        Commands::Score(args) => run_score(&args),
        Commands::Filter(args) => run_filter(&args),
        Commands::PrintConfig => run_print_config(),
    }
}

// ── input helpers ──────────────────────────────────────────────────────

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> CliResult<T> {
    let data = std::fs::read_to_string(path).map_err(|e| -> CliError {
        format!("Failed to read {} {}: {}", what, path.display(), e).into()
    })?;
    serde_json::from_str(&data).map_err(|e| -> CliError {
        format!("Failed to parse {} {}: {}", what, path.display(), e).into()
    })
}

fn load_expression(path: &Path) -> CliResult<ExpressionMatrix> {
    let is_tsv = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tsv") | Some("txt")
    );
    if is_tsv {
        let text = std::fs::read_to_string(path)?;
        Ok(ExpressionMatrix::from_dge_tsv(&text)?)
    } else {
        ExpressionMatrix::from_json_file(path)
    }
}

fn write_output(out: Option<&Path>, json: &str) -> CliResult<()> {
    match out {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!("Results written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// ── analyze ────────────────────────────────────────────────────────────

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<()> {
    let config = args.sweep.to_config()?;
    tracing::info!("Loading expression matrix: {}", args.expression.display());
    let matrix = load_expression(&args.expression)?;
    tracing::info!(
        "Expression matrix: {} genes x {} cells",
        matrix.n_genes(),
        matrix.n_cells()
    );

    let coordinates: Vec<[f64; 2]> = read_json(&args.embedding, "embedding")?;
    let labels: Option<Vec<i32>> = args
        .clusters
        .as_deref()
        .map(|p| read_json(p, "cluster labels"))
        .transpose()?;

    let selection = SelectionConfig {
        threshold: args.threshold,
        selected_clusters: (!args.select_clusters.is_empty()).then(|| args.select_clusters.clone()),
    };

    let analyzer = Analyzer::with_config(config);
    let analysis = analyzer.analyze_gene(
        &args.gene,
        &matrix,
        &coordinates,
        labels.as_deref(),
        &selection,
        vantage_from_arg(args.vantage),
    )?;

    tracing::info!(
        "Gene {}: {} foreground / {} background points",
        analysis.gene,
        analysis.n_foreground,
        analysis.n_background
    );
    tracing::info!(
        "area={:.4} rmsd={:.4} deviation_score={:.4}",
        analysis.result.area,
        analysis.result.rmsd,
        analysis.result.deviation_score
    );

    let json = serde_json::to_string_pretty(&analysis)?;
    write_output(args.out.as_deref(), &json)
}

// ── analyze-points ─────────────────────────────────────────────────────

fn run_analyze_points(args: &CliPointsArgs) -> CliResult<()> {
    let config = args.sweep.to_config()?;
    let points = biorsp::SelectedPoints {
        foreground: read_json(&args.foreground, "foreground points")?,
        background: read_json(&args.background, "background points")?,
    };
    tracing::info!(
        "{} foreground / {} background points",
        points.foreground.len(),
        points.background.len()
    );

    let analyzer = Analyzer::with_config(config);
    let result = analyzer.analyze_selection(&points, vantage_from_arg(args.vantage))?;
    tracing::info!(
        "area={:.4} rmsd={:.4} deviation_score={:.4}",
        result.area,
        result.rmsd,
        result.deviation_score
    );

    let json = serde_json::to_string_pretty(&result)?;
    write_output(args.out.as_deref(), &json)
}

// ── score ──────────────────────────────────────────────────────────────

fn run_score(args: &CliScoreArgs) -> CliResult<()> {
    let signal: Vec<f64> = read_json(&args.signal, "signal")?;
    if args.angle_end <= args.angle_start {
        return Err("--angle-end must be greater than --angle-start".into());
    }
    let scores = biorsp::score(&signal, [args.angle_start, args.angle_end], signal.len());

    println!("samples:          {}", signal.len());
    println!("area:             {:.6}", scores.area);
    println!("rmsd:             {:.6}", scores.rmsd);
    println!("deviation score:  {:.6}", scores.deviation_score);
    println!(
        "equivalent r:     {:.6}",
        biorsp::equivalent_radius(scores.area)
    );

    Ok(())
}

// ── filter ─────────────────────────────────────────────────────────────

fn run_filter(args: &CliFilterArgs) -> CliResult<()> {
    let matrix = load_expression(&args.expression)?;
    let filtered = matrix.filter(args.umi_threshold, args.gene_threshold);
    tracing::info!(
        "Filtered {}x{} -> {}x{} (genes x cells)",
        matrix.n_genes(),
        matrix.n_cells(),
        filtered.n_genes(),
        filtered.n_cells()
    );
    if filtered.n_cells() == 0 {
        tracing::warn!("no cells passed the UMI threshold {}", args.umi_threshold);
    }
    std::fs::write(&args.out, filtered.to_json_pretty()?)?;
    tracing::info!("Filtered matrix written to {}", args.out.display());
    Ok(())
}

// ── print-config ───────────────────────────────────────────────────────

fn run_print_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&RspConfig::default())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_xy_accepts_pairs() {
        assert_eq!(parse_xy("1.5,-2").unwrap(), [1.5, -2.0]);
        assert_eq!(parse_xy(" 0 , 3 ").unwrap(), [0.0, 3.0]);
        assert!(parse_xy("1").is_err());
        assert!(parse_xy("a,b").is_err());
    }

    #[test]
    fn sweep_flags_override_defaults() {
        let args = CliSweepArgs {
            window: Some(1.0),
            resolution: Some(64),
            serial: true,
            ..Default::default()
        };
        let cfg = args.to_config().unwrap();
        assert_eq!(cfg.window_width, 1.0);
        assert_eq!(cfg.resolution, 64);
        assert!(!cfg.parallel);

        let bad = CliSweepArgs {
            resolution: Some(0),
            ..Default::default()
        };
        assert!(bad.to_config().is_err());
    }

    #[test]
    fn cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "biorsp",
            "analyze",
            "--expression",
            "dge.tsv",
            "--embedding",
            "tsne.json",
            "--gene",
            "Tnnt2",
            "--select-cluster",
            "1",
            "--select-cluster",
            "-1",
            "--vantage",
            "-0.5,2",
            "--resolution",
            "360",
        ])
        .unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.select_clusters, vec![1, -1]);
        assert_eq!(args.vantage, Some([-0.5, 2.0]));
        assert_eq!(args.sweep.resolution, Some(360));
        assert_eq!(args.threshold, 1.0);
    }

    #[test]
    fn analyze_points_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let fg = dir.path().join("fg.json");
        let bg = dir.path().join("bg.json");
        let out = dir.path().join("out.json");
        std::fs::write(&fg, "[[1.0, 0.0]]").unwrap();
        std::fs::write(&bg, "[[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.0, -1.0]]").unwrap();

        let args = CliPointsArgs {
            foreground: fg,
            background: bg,
            vantage: None,
            sweep: CliSweepArgs {
                resolution: Some(36),
                ..Default::default()
            },
            out: Some(out.clone()),
        };
        run_analyze_points(&args).unwrap();

        let result: biorsp::RspResult =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(result.signal.len(), 36);
        assert!(result.area > 0.0);
    }

    #[test]
    fn score_reads_signal_and_rejects_reversed_range() {
        let dir = tempfile::tempdir().unwrap();
        let signal = dir.path().join("signal.json");
        std::fs::write(&signal, "[0.5, 1.0, 0.25, 0.0]").unwrap();

        let args = CliScoreArgs {
            signal: signal.clone(),
            angle_start: 0.0,
            angle_end: std::f64::consts::TAU,
        };
        run_score(&args).unwrap();

        let reversed = CliScoreArgs {
            signal,
            angle_start: 1.0,
            angle_end: 1.0,
        };
        assert!(run_score(&reversed).is_err());

        let missing = CliScoreArgs {
            signal: dir.path().join("missing.json"),
            angle_start: 0.0,
            angle_end: 1.0,
        };
        assert!(run_score(&missing).is_err());
    }

    #[test]
    fn filter_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let dge = dir.path().join("dge.tsv");
        let out = dir.path().join("filtered.json");
        std::fs::write(
            &dge,
            "GENE\tc0\tc1\tc2\nTnnt2\t3\t0\t1\nMyl7\t0\t0\t2\nActb\t4\t1\t5\n",
        )
        .unwrap();

        let args = CliFilterArgs {
            expression: dge,
            umi_threshold: 2.0,
            gene_threshold: 1,
            out: out.clone(),
        };
        run_filter(&args).unwrap();

        let filtered = ExpressionMatrix::from_json_file(&out).unwrap();
        // c1 totals 1 and is dropped; Myl7 is then expressed in one cell only.
        assert_eq!(filtered.cells(), &["c0".to_string(), "c2".to_string()]);
        assert_eq!(filtered.genes(), &["Tnnt2".to_string(), "Actb".to_string()]);
    }
}
