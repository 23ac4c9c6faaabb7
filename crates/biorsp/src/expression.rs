//! Gene expression lookup and the dense DGE matrix.
//!
//! Rows are genes, columns are entities (cells), matching the usual
//! digital gene expression layout. Column order must match the coordinate
//! array handed to selection.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, RspError};

/// Per-gene expression lookup, index-aligned with the entity coordinates.
pub trait ExpressionSource {
    /// Expression of `gene` for every entity, or `None` if the gene is unknown.
    fn gene_expression(&self, gene: &str) -> Option<&[f64]>;

    /// Number of entities (columns).
    fn n_entities(&self) -> usize;
}

/// Dense genes × cells expression matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionMatrix {
    genes: Vec<String>,
    cells: Vec<String>,
    /// Row-major values, `genes.len() * cells.len()`.
    values: Vec<f64>,
    gene_index: HashMap<String, usize>,
}

/// JSON form: one value row per gene.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ExpressionMatrixSpec {
    genes: Vec<String>,
    cells: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl ExpressionMatrix {
    /// Build from gene names, cell barcodes and one value row per gene.
    pub fn from_rows(genes: Vec<String>, cells: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.len() != genes.len() {
            return Err(RspError::InvalidMatrix(format!(
                "{} genes but {} value rows",
                genes.len(),
                rows.len()
            )));
        }
        let n_cells = cells.len();
        let mut values = Vec::with_capacity(genes.len() * n_cells);
        for (gene, row) in genes.iter().zip(&rows) {
            if row.len() != n_cells {
                return Err(RspError::InvalidMatrix(format!(
                    "gene '{}' has {} values, expected {}",
                    gene,
                    row.len(),
                    n_cells
                )));
            }
            values.extend_from_slice(row);
        }
        let mut gene_index = HashMap::with_capacity(genes.len());
        for (i, g) in genes.iter().enumerate() {
            if gene_index.insert(g.clone(), i).is_some() {
                return Err(RspError::InvalidMatrix(format!("duplicate gene '{g}'")));
            }
        }
        Ok(Self {
            genes,
            cells,
            values,
            gene_index,
        })
    }

    /// Parse a tab-separated DGE table.
    ///
    /// The first line holds a corner label followed by cell barcodes; every
    /// further non-empty line is a gene name followed by one value per cell.
    pub fn from_dge_tsv(text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| RspError::InvalidMatrix("empty DGE table".to_string()))?;
        let cells: Vec<String> = header
            .split('\t')
            .skip(1)
            .map(|c| c.trim().to_string())
            .collect();

        let mut genes = Vec::new();
        let mut rows = Vec::new();
        for (line_no, line) in lines.enumerate() {
            let mut fields = line.split('\t');
            let gene = fields.next().unwrap_or_default().trim().to_string();
            let row = fields
                .map(|f| {
                    f.trim().parse::<f64>().map_err(|e| {
                        RspError::InvalidMatrix(format!(
                            "line {}: bad value '{}' for gene '{}': {}",
                            line_no + 2,
                            f.trim(),
                            gene,
                            e
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            genes.push(gene);
            rows.push(row);
        }
        Self::from_rows(genes, cells, rows)
    }

    /// Parse the JSON form `{ "genes": [..], "cells": [..], "values": [[..], ..] }`.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let spec: ExpressionMatrixSpec = serde_json::from_str(json)?;
        Ok(Self::from_rows(spec.genes, spec.cells, spec.values)?)
    }

    /// Load the JSON form from a file.
    pub fn from_json_file(path: &Path) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Serialize to the JSON form.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let spec = ExpressionMatrixSpec {
            genes: self.genes.clone(),
            cells: self.cells.clone(),
            values: (0..self.n_genes()).map(|g| self.row(g).to_vec()).collect(),
        };
        serde_json::to_string_pretty(&spec)
    }

    /// Gene names in row order.
    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    /// Cell barcodes in column order.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Number of genes (rows).
    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    /// Number of cells (columns).
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    fn row(&self, g: usize) -> &[f64] {
        let n = self.cells.len();
        &self.values[g * n..(g + 1) * n]
    }

    /// Total counts per cell (column sums).
    pub fn cell_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.n_cells()];
        for g in 0..self.n_genes() {
            for (t, v) in totals.iter_mut().zip(self.row(g)) {
                *t += v;
            }
        }
        totals
    }

    /// Number of cells expressing each gene (`value > 0`).
    pub fn genes_expressed_counts(&self) -> Vec<usize> {
        (0..self.n_genes())
            .map(|g| self.row(g).iter().filter(|&&v| v > 0.0).count())
            .collect()
    }

    /// Keep only cells whose total count is strictly above `threshold`.
    pub fn filter_cells_by_umi(&self, threshold: f64) -> Self {
        let keep: Vec<usize> = self
            .cell_totals()
            .iter()
            .enumerate()
            .filter(|(_, t)| **t > threshold)
            .map(|(i, _)| i)
            .collect();
        tracing::debug!(
            kept = keep.len(),
            total = self.n_cells(),
            threshold,
            "filtered cells by UMI count"
        );
        let cells = keep.iter().map(|&i| self.cells[i].clone()).collect();
        let rows = (0..self.n_genes())
            .map(|g| {
                let row = self.row(g);
                keep.iter().map(|&i| row[i]).collect()
            })
            .collect();
        Self::from_parts(self.genes.clone(), cells, rows)
    }

    /// Keep only genes expressed in strictly more than `threshold` cells.
    pub fn filter_genes_by_expression(&self, threshold: usize) -> Self {
        let counts = self.genes_expressed_counts();
        let keep: Vec<usize> = (0..self.n_genes())
            .filter(|&g| counts[g] > threshold)
            .collect();
        tracing::debug!(
            kept = keep.len(),
            total = self.n_genes(),
            threshold,
            "filtered genes by expressing-cell count"
        );
        let genes = keep.iter().map(|&g| self.genes[g].clone()).collect();
        let rows = keep.iter().map(|&g| self.row(g).to_vec()).collect();
        Self::from_parts(genes, self.cells.clone(), rows)
    }

    /// Cell filter followed by gene filter.
    pub fn filter(&self, umi_threshold: f64, gene_threshold: usize) -> Self {
        self.filter_cells_by_umi(umi_threshold)
            .filter_genes_by_expression(gene_threshold)
    }

    /// Rebuild from parts already known to be consistent.
    fn from_parts(genes: Vec<String>, cells: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        let gene_index = genes.iter().enumerate().map(|(i, g)| (g.clone(), i)).collect();
        Self {
            genes,
            cells,
            values: rows.into_iter().flatten().collect(),
            gene_index,
        }
    }
}

impl ExpressionSource for ExpressionMatrix {
    fn gene_expression(&self, gene: &str) -> Option<&[f64]> {
        self.gene_index.get(gene).map(|&g| self.row(g))
    }

    fn n_entities(&self) -> usize {
        self.n_cells()
    }
}
