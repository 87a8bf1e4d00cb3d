use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Counts of (gold label, guessed label) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionTable {
    cells: BTreeMap<String, BTreeMap<String, u64>>,
}

/// Precision, recall and F-score of a single label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
    /// Number of gold occurrences.
    pub support: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub rows: Vec<LabelScore>,
    /// Micro-averaged F-score over every cell of the table.
    pub total_f_score: f64,
}

impl ScoreReport {
    pub fn row(&self, label: &str) -> Option<&LabelScore> {
        self.rows.iter().find(|row| row.label == label)
    }
}

impl ConfusionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, gold: impl Into<String>, guess: impl Into<String>) {
        *self
            .cells
            .entry(gold.into())
            .or_default()
            .entry(guess.into())
            .or_insert(0) += 1;
    }

    pub fn count(&self, gold: &str, guess: &str) -> u64 {
        self.cells
            .get(gold)
            .and_then(|row| row.get(guess))
            .copied()
            .unwrap_or(0)
    }

    /// Cell-wise sum, for combining per-worker tables.
    pub fn merge(&mut self, other: &ConfusionTable) {
        for (gold, row) in &other.cells {
            let target = self.cells.entry(gold.clone()).or_default();
            for (guess, count) in row {
                *target.entry(guess.clone()).or_insert(0) += count;
            }
        }
    }

    pub fn row_total(&self, gold: &str) -> u64 {
        self.cells.get(gold).map_or(0, |row| row.values().sum())
    }

    pub fn column_total(&self, guess: &str) -> u64 {
        self.cells
            .values()
            .filter_map(|row| row.get(guess))
            .sum()
    }

    pub fn total(&self) -> u64 {
        self.cells.values().flat_map(BTreeMap::values).sum()
    }

    pub fn diagonal_total(&self) -> u64 {
        self.cells
            .iter()
            .filter_map(|(gold, row)| row.get(gold))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Every label seen on either axis.
    pub fn labels(&self) -> BTreeSet<&str> {
        self.cells
            .iter()
            .flat_map(|(gold, row)| {
                std::iter::once(gold.as_str()).chain(row.keys().map(String::as_str))
            })
            .collect()
    }

    pub fn report(&self) -> ScoreReport {
        let rows = self
            .labels()
            .into_iter()
            .map(|label| {
                let hits = self.count(label, label);
                let precision = ratio(hits, self.column_total(label));
                let recall = ratio(hits, self.row_total(label));
                LabelScore {
                    label: label.to_string(),
                    precision,
                    recall,
                    f_score: f_score(precision, recall),
                    support: self.row_total(label),
                }
            })
            .collect();

        // Each off-diagonal cell is one false positive and one false
        // negative, so micro precision and recall coincide.
        let total = ratio(self.diagonal_total(), self.total());
        ScoreReport {
            rows,
            total_f_score: f_score(total, total),
        }
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn f_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}
