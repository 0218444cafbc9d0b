//! Glyph dataset loading.
//!
//! Format:
//! - UTF-8 text, one sample per line, no header
//! - whitespace-separated columns
//! - every column but the last is a feature value (parsed as f64)
//! - the last column is the label string
//! - blank lines are skipped

use std::path::Path;

use crate::error::{GlyphError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// One feature vector per row; all rows share the same width.
    pub features: Vec<Vec<f64>>,
    /// Label of each row, parallel to `features`.
    pub labels: Vec<String>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Dataset> {
        let text = std::fs::read_to_string(path).map_err(|e| GlyphError::io(path, e))?;
        let dataset = Dataset::parse(&text)?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.len(),
            width = dataset.width(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    pub fn parse(text: &str) -> Result<Dataset> {
        let mut features: Vec<Vec<f64>> = Vec::new();
        let mut labels: Vec<String> = Vec::new();

        for (row_idx, line) in text.lines().enumerate() {
            let line_no = row_idx + 1;
            let cells: Vec<&str> = line.split_whitespace().collect();
            let Some((label, feature_cells)) = cells.split_last() else {
                continue;
            };
            if feature_cells.is_empty() {
                return Err(GlyphError::MissingLabel { line: line_no });
            }

            let row = feature_cells.iter()
                .enumerate()
                .map(|(col, cell)| {
                    cell.parse::<f64>().map_err(|_| GlyphError::InvalidNumber {
                        line: line_no,
                        column: col + 1,
                        token: cell.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            // Verify all rows have the same feature width.
            if let Some(first) = features.first() {
                if row.len() != first.len() {
                    return Err(GlyphError::RaggedRow {
                        line: line_no,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }

            features.push(row);
            labels.push(label.to_string());
        }

        if features.is_empty() {
            return Err(GlyphError::EmptyDataset);
        }

        Ok(Dataset { features, labels })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of feature values per row.
    pub fn width(&self) -> usize {
        self.features.first().map_or(0, Vec::len)
    }

    /// Keeps only the first `rows` samples.
    pub fn truncate(&mut self, rows: usize) {
        self.features.truncate(rows);
        self.labels.truncate(rows);
    }
}
