use std::fmt;

use ndarray::{Array1, Array2};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::metrics::{r2_score, RegressionMetrics};
use crate::models::ModelRegistry;

/// Test-set R² per model, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    scores: Vec<(String, f64)>,
}

impl EvaluationReport {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(n, s)| (n.as_str(), *s))
    }

    /// Highest score; the earliest entry wins ties.
    pub fn best(&self) -> Option<(&str, f64)> {
        self.iter().fold(None, |best, (name, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((name, score)),
        })
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, score) in self.iter() {
            writeln!(f, "{name:<24} R² = {score:.4}")?;
        }
        Ok(())
    }
}

/// Fits every model on the training split and scores it on the test split.
///
/// The training R² is only logged; the report keeps test scores. The first
/// failing model aborts the whole evaluation, and so does a split with fewer
/// than two rows, since R² is undefined there.
#[instrument(skip_all, fields(models = models.len()))]
pub fn evaluate_models(
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
    x_test: &Array2<f64>,
    y_test: &Array1<f64>,
    models: &mut ModelRegistry,
) -> Result<EvaluationReport> {
    let mut report = EvaluationReport::default();

    for (name, model) in models.iter_mut() {
        model.fit(x_train, y_train)?;

        let train_score = r2_score(y_train, &model.predict(x_train)?)?;
        let test = RegressionMetrics::compute(y_test, &model.predict(x_test)?)?;
        debug!(
            model = name,
            estimator = model.name(),
            train_score,
            test_score = test.r_squared,
            mae = test.mae,
            rmse = test.rmse,
            "Model evaluated"
        );

        report.scores.push((name.to_string(), test.r_squared));
    }

    info!(evaluated = report.len(), "Model evaluation completed");
    Ok(report)
}
