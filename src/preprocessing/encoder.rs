//! One-hot encoding of categorical columns

use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, PipelineError, Result};

/// What to do with a category that was not seen during fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownPolicy {
    #[default]
    Error,
    /// Emit an all-zero indicator block for that column.
    Ignore,
}

/// One indicator column per (column, category) pair, categories sorted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    handle_unknown: UnknownPolicy,
    columns: Vec<String>,
    categories: Option<Vec<Vec<String>>>,
}

impl OneHotEncoder {
    pub fn new(handle_unknown: UnknownPolicy) -> Self {
        Self {
            handle_unknown,
            columns: Vec::new(),
            categories: None,
        }
    }

    pub fn categories(&self) -> Option<&[Vec<String>]> {
        self.categories.as_deref()
    }

    pub fn n_features_out(&self) -> usize {
        self.categories
            .as_ref()
            .map_or(0, |cats| cats.iter().map(Vec::len).sum())
    }

    /// `<column>_<category>` for every output column, in output order.
    pub fn feature_names(&self) -> Vec<String> {
        let Some(categories) = &self.categories else {
            return Vec::new();
        };
        self.columns
            .iter()
            .zip(categories)
            .flat_map(|(col, cats)| cats.iter().map(move |c| format!("{col}_{c}")))
            .collect()
    }

    pub fn fit(&mut self, names: &[String], columns: &[Vec<String>]) -> Result<&mut Self> {
        if names.len() != columns.len() {
            return Err(PipelineError::new(ErrorKind::Shape {
                expected: format!("{} columns", names.len()),
                actual: format!("{} columns", columns.len()),
            }));
        }
        let categories = columns
            .iter()
            .map(|values| {
                values
                    .iter()
                    .cloned()
                    .collect::<BTreeSet<String>>()
                    .into_iter()
                    .collect()
            })
            .collect();
        self.columns = names.to_vec();
        self.categories = Some(categories);
        Ok(self)
    }

    pub fn transform(&self, columns: &[Vec<String>]) -> Result<Array2<f64>> {
        let categories = self
            .categories
            .as_ref()
            .ok_or(ErrorKind::NotFitted("OneHotEncoder"))?;
        if categories.len() != columns.len() {
            return Err(PipelineError::new(ErrorKind::Shape {
                expected: format!("{} columns", categories.len()),
                actual: format!("{} columns", columns.len()),
            }));
        }

        let n_rows = columns.first().map_or(0, Vec::len);
        let mut out = Array2::zeros((n_rows, self.n_features_out()));
        let mut offset = 0;
        for ((name, values), cats) in self.columns.iter().zip(columns).zip(categories) {
            for (row, value) in values.iter().enumerate() {
                match cats.binary_search(value) {
                    Ok(idx) => out[[row, offset + idx]] = 1.0,
                    Err(_) if self.handle_unknown == UnknownPolicy::Ignore => {}
                    Err(_) => {
                        return Err(PipelineError::new(ErrorKind::UnknownCategory {
                            column: name.clone(),
                            value: value.clone(),
                        }))
                    }
                }
            }
            offset += cats.len();
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, names: &[String], columns: &[Vec<String>]) -> Result<Array2<f64>> {
        self.fit(names, columns)?;
        self.transform(columns)
    }
}
