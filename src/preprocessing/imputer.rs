//! Missing value imputation strategies

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, PipelineError, Result};

/// Strategy for imputing missing values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with mean (numeric only)
    Mean,
    /// Replace with median (numeric only)
    Median,
    /// Replace with mode; ties go to the smallest value
    MostFrequent,
    /// Replace with a fixed value
    Constant(String),
}

impl ImputeStrategy {
    pub fn is_numeric_only(&self) -> bool {
        matches!(self, Self::Mean | Self::Median)
    }
}

impl FromStr for ImputeStrategy {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "most_frequent" => Ok(Self::MostFrequent),
            other => match other.strip_prefix("constant:") {
                Some(value) => Ok(Self::Constant(value.to_string())),
                None => Err(PipelineError::new(ErrorKind::InvalidParameter {
                    name: "strategy".to_string(),
                    value: other.to_string(),
                    reason: "expected mean, median, most_frequent or constant:<value>".to_string(),
                })),
            },
        }
    }
}

fn empty_column(name: &str) -> PipelineError {
    PipelineError::new(ErrorKind::EmptyInput(format!(
        "column '{name}' has no observed values to impute from"
    )))
}

fn check_width(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(PipelineError::new(ErrorKind::Shape {
            expected: format!("{expected} columns"),
            actual: format!("{actual} columns"),
        }));
    }
    Ok(())
}

/// Imputer for numeric columns. NaN counts as missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericImputer {
    strategy: ImputeStrategy,
    fill_values: Option<Vec<f64>>,
}

impl NumericImputer {
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: None,
        }
    }

    pub fn strategy(&self) -> &ImputeStrategy {
        &self.strategy
    }

    pub fn fill_values(&self) -> Option<&[f64]> {
        self.fill_values.as_deref()
    }

    pub fn fit(&mut self, names: &[String], columns: &[Vec<Option<f64>>]) -> Result<&mut Self> {
        check_width(names.len(), columns.len())?;
        let fill_values = names
            .iter()
            .zip(columns)
            .map(|(name, values)| self.compute_fill_value(name, values))
            .collect::<Result<Vec<_>>>()?;
        self.fill_values = Some(fill_values);
        Ok(self)
    }

    pub fn transform(&self, columns: &[Vec<Option<f64>>]) -> Result<Vec<Vec<f64>>> {
        let fill_values = self
            .fill_values
            .as_ref()
            .ok_or(ErrorKind::NotFitted("NumericImputer"))?;
        check_width(fill_values.len(), columns.len())?;

        Ok(columns
            .iter()
            .zip(fill_values)
            .map(|(values, fill)| {
                values
                    .iter()
                    .map(|v| match v {
                        Some(x) if !x.is_nan() => *x,
                        _ => *fill,
                    })
                    .collect()
            })
            .collect())
    }

    pub fn fit_transform(
        &mut self,
        names: &[String],
        columns: &[Vec<Option<f64>>],
    ) -> Result<Vec<Vec<f64>>> {
        self.fit(names, columns)?;
        self.transform(columns)
    }

    fn compute_fill_value(&self, name: &str, values: &[Option<f64>]) -> Result<f64> {
        if let ImputeStrategy::Constant(value) = &self.strategy {
            return value.parse::<f64>().map_err(|e| {
                PipelineError::new(ErrorKind::InvalidParameter {
                    name: "strategy".to_string(),
                    value: format!("constant:{value}"),
                    reason: e.to_string(),
                })
            });
        }

        let mut observed: Vec<f64> = values
            .iter()
            .flatten()
            .copied()
            .filter(|x| !x.is_nan())
            .collect();
        if observed.is_empty() {
            return Err(empty_column(name));
        }
        observed.sort_by(f64::total_cmp);

        let fill = match self.strategy {
            ImputeStrategy::Mean => observed.iter().sum::<f64>() / observed.len() as f64,
            ImputeStrategy::Median => {
                let mid = observed.len() / 2;
                if observed.len() % 2 == 0 {
                    (observed[mid - 1] + observed[mid]) / 2.0
                } else {
                    observed[mid]
                }
            }
            ImputeStrategy::MostFrequent => {
                // Sorted input: runs of equal values are contiguous, and a
                // strict comparison keeps the smallest value on ties.
                let mut best = (observed[0], 0usize);
                let mut run = (observed[0], 0usize);
                for &x in &observed {
                    if x == run.0 {
                        run.1 += 1;
                    } else {
                        run = (x, 1);
                    }
                    if run.1 > best.1 {
                        best = run;
                    }
                }
                best.0
            }
            ImputeStrategy::Constant(_) => unreachable!("handled above"),
        };
        Ok(fill)
    }
}

/// Imputer for string-valued columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalImputer {
    strategy: ImputeStrategy,
    fill_values: Option<Vec<String>>,
}

impl CategoricalImputer {
    /// Mean and median make no sense for categories and are rejected here.
    pub fn new(strategy: ImputeStrategy) -> Result<Self> {
        if strategy.is_numeric_only() {
            return Err(PipelineError::new(ErrorKind::InvalidParameter {
                name: "strategy".to_string(),
                value: format!("{strategy:?}"),
                reason: "not applicable to categorical columns".to_string(),
            }));
        }
        Ok(Self {
            strategy,
            fill_values: None,
        })
    }

    pub fn fill_values(&self) -> Option<&[String]> {
        self.fill_values.as_deref()
    }

    pub fn fit(&mut self, names: &[String], columns: &[Vec<Option<String>>]) -> Result<&mut Self> {
        check_width(names.len(), columns.len())?;
        let fill_values = names
            .iter()
            .zip(columns)
            .map(|(name, values)| match &self.strategy {
                ImputeStrategy::Constant(value) => Ok(value.clone()),
                _ => Self::most_frequent(values).ok_or_else(|| empty_column(name)),
            })
            .collect::<Result<Vec<_>>>()?;
        self.fill_values = Some(fill_values);
        Ok(self)
    }

    pub fn transform(&self, columns: &[Vec<Option<String>>]) -> Result<Vec<Vec<String>>> {
        let fill_values = self
            .fill_values
            .as_ref()
            .ok_or(ErrorKind::NotFitted("CategoricalImputer"))?;
        check_width(fill_values.len(), columns.len())?;

        Ok(columns
            .iter()
            .zip(fill_values)
            .map(|(values, fill)| {
                values
                    .iter()
                    .map(|v| v.clone().unwrap_or_else(|| fill.clone()))
                    .collect()
            })
            .collect())
    }

    pub fn fit_transform(
        &mut self,
        names: &[String],
        columns: &[Vec<Option<String>>],
    ) -> Result<Vec<Vec<String>>> {
        self.fit(names, columns)?;
        self.transform(columns)
    }

    fn most_frequent(values: &[Option<String>]) -> Option<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for v in values.iter().flatten() {
            *counts.entry(v.as_str()).or_insert(0) += 1;
        }
        // BTreeMap iterates in ascending order, so the first maximum wins ties.
        let mut best: Option<(&str, usize)> = None;
        for (value, count) in counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value.to_string())
    }
}
