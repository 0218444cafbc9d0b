use std::collections::BTreeSet;

use crate::error::{GlyphError, Result};
use crate::train::argmax;

/// Maps label strings to integer codes and one-hot vectors.
///
/// Classes are kept in sorted order, so the code of a label depends only on
/// the set of labels seen, never on row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> LabelEncoder {
        let classes: BTreeSet<&str> = labels.iter().map(AsRef::as_ref).collect();
        LabelEncoder { classes: classes.into_iter().map(str::to_string).collect() }
    }

    pub fn from_classes(classes: Vec<String>) -> LabelEncoder {
        LabelEncoder { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn encode(&self, label: &str) -> Result<usize> {
        self.classes
            .iter()
            .position(|c| c == label)
            .ok_or_else(|| GlyphError::UnknownLabel(label.to_string()))
    }

    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        labels.iter().map(|l| self.encode(l.as_ref())).collect()
    }

    /// One row per code, `n_classes` wide, with a single 1.0.
    pub fn one_hot(&self, codes: &[usize]) -> Vec<Vec<f64>> {
        codes.iter()
            .map(|&code| {
                let mut row = vec![0.0; self.classes.len()];
                row[code] = 1.0;
                row
            })
            .collect()
    }

    pub fn inverse_transform(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// Label of the highest-scoring position in a one-hot row or a
    /// network output.
    pub fn decode(&self, scores: &[f64]) -> Option<&str> {
        if scores.is_empty() {
            return None;
        }
        self.inverse_transform(argmax(scores))
    }
}
