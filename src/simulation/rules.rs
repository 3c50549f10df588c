//! Linear rule tables for rule-based players and their text format.
//!
//! A rule file has one rule per line: comma-separated floats where the last
//! value is the bias and the others are the weights, one per sensor.
//!
//! ```text
//! 0.12,-0.4,0.33,0.05
//! -0.2,0.18,0.41,-0.3
//! ```

use std::fmt::Write as _;
use std::path::Path;

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::RuleError;

/// Ordered set of linear scoring rules over sensor readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Weight matrix (`rules` × `inputs`).
    pub weights: Array2<f32>,
    /// Bias per rule.
    pub biases: Array1<f32>,
}

impl RuleSet {
    /// Builds a rule set from rows of `weights..., bias`.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, RuleError> {
        let width = rows.first().map_or(0, Vec::len);
        if width < 2 {
            return Err(RuleError::TooFewValues(width));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(RuleError::WidthMismatch {
                    line: i + 1,
                    expected: width,
                    found: row.len(),
                });
            }
        }
        if rows.len() < 2 {
            return Err(RuleError::TooFewRules(rows.len()));
        }

        let inputs = width - 1;
        let weights = Array2::from_shape_fn((rows.len(), inputs), |(r, i)| rows[r][i]);
        let biases = rows.iter().map(|row| row[inputs]).collect();
        Ok(Self { weights, biases })
    }

    /// Creates a rule set with values drawn uniformly from `[-0.5, 0.5)`.
    pub fn random(rules: usize, inputs: usize, rng: &mut impl Rng) -> Self {
        Self {
            weights: Array2::from_shape_simple_fn((rules, inputs), || rng.random_range(-0.5..0.5)),
            biases: Array1::from_shape_simple_fn(rules, || rng.random_range(-0.5..0.5)),
        }
    }

    /// Checks that every rule has a bias.
    ///
    /// Sets built by [`RuleSet::from_rows`], [`RuleSet::parse`] or
    /// [`RuleSet::random`] always pass; sets assembled by hand or
    /// deserialized may not.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.weights.nrows() != self.biases.len() {
            return Err(RuleError::BiasMismatch {
                rows: self.weights.nrows(),
                biases: self.biases.len(),
            });
        }
        Ok(())
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.biases.len()
    }

    /// Whether the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.biases.is_empty()
    }

    /// Number of weights per rule.
    pub fn inputs(&self) -> usize {
        self.weights.ncols()
    }

    /// Scores every rule: `bias + Σ weight_i · input_i`.
    #[inline]
    pub fn totals(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut totals = self.weights.dot(inputs);
        totals += &self.biases;
        totals
    }

    /// Parses the text format described in the module docs. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        let mut rows = Vec::new();
        let mut expected = None;
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let row = line
                .split(',')
                .map(|value| {
                    let value = value.trim();
                    value.parse::<f32>().map_err(|source| RuleError::InvalidValue {
                        line: i + 1,
                        value: value.to_owned(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            // report widths against file line numbers, not rule indices
            let width = *expected.get_or_insert(row.len());
            if row.len() != width {
                return Err(RuleError::WidthMismatch {
                    line: i + 1,
                    expected: width,
                    found: row.len(),
                });
            }
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    /// Renders the text format, one rule per line.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (row, bias) in self.weights.rows().into_iter().zip(self.biases.iter()) {
            let values: Vec<String> = row
                .iter()
                .chain(std::iter::once(bias))
                .map(f32::to_string)
                .collect();
            let _ = writeln!(text, "{}", values.join(","));
        }
        text
    }

    /// Loads a rule set from a text file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Saves the rule set to a text file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), RuleError> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }
}
