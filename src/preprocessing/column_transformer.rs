//! Routes column groups to their pipelines and concatenates the results.

use std::path::Path;

use ndarray::{concatenate, Array2, Axis};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::pipeline::{CategoricalPipeline, NumericPipeline};
use crate::data_loader::{categorical_values, numeric_values};
use crate::error::{ErrorKind, PipelineError, Result};
use crate::utils::{load_object, save_object};

pub const ARTIFACT_KIND: &str = "column_transformer";
pub const ARTIFACT_VERSION: u32 = 1;

/// On-disk envelope for fitted state.
#[derive(Debug, Serialize, Deserialize)]
pub struct Artifact<T> {
    pub format_version: u32,
    pub kind: String,
    pub payload: T,
}

/// Numeric columns go through [`NumericPipeline`], categorical columns
/// through [`CategoricalPipeline`]; output is the numeric block followed by
/// the categorical block. Columns in neither group are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    numeric: NumericPipeline,
    categorical: CategoricalPipeline,
    fitted: bool,
}

impl ColumnTransformer {
    pub fn new(
        numeric_columns: Vec<String>,
        numeric: NumericPipeline,
        categorical_columns: Vec<String>,
        categorical: CategoricalPipeline,
    ) -> Result<Self> {
        if let Some(dup) = numeric_columns
            .iter()
            .find(|c| categorical_columns.contains(c))
        {
            return Err(PipelineError::new(ErrorKind::InvalidParameter {
                name: "columns".to_string(),
                value: dup.clone(),
                reason: "column is declared both numeric and categorical".to_string(),
            }));
        }
        Ok(Self {
            numeric_columns,
            categorical_columns,
            numeric,
            categorical,
            fitted: false,
        })
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    pub fn numeric_pipeline(&self) -> &NumericPipeline {
        &self.numeric
    }

    pub fn categorical_pipeline(&self) -> &CategoricalPipeline {
        &self.categorical
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn n_features_out(&self) -> usize {
        self.numeric_columns.len() + self.categorical.encoder.n_features_out()
    }

    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.numeric_columns.clone();
        names.extend(self.categorical.encoder.feature_names());
        names
    }

    fn extract(&self, df: &DataFrame) -> Result<(Vec<Vec<Option<f64>>>, Vec<Vec<Option<String>>>)> {
        let numeric = self
            .numeric_columns
            .iter()
            .map(|c| numeric_values(df, c))
            .collect::<Result<Vec<_>>>()?;
        let categorical = self
            .categorical_columns
            .iter()
            .map(|c| categorical_values(df, c))
            .collect::<Result<Vec<_>>>()?;
        Ok((numeric, categorical))
    }

    fn hstack(numeric: Array2<f64>, categorical: Array2<f64>) -> Result<Array2<f64>> {
        Ok(concatenate(Axis(1), &[numeric.view(), categorical.view()])?)
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        let (numeric, categorical) = self.extract(df)?;
        let n = df.height();
        // An empty group contributes a zero-width block.
        let num_out = if self.numeric_columns.is_empty() {
            Array2::zeros((n, 0))
        } else {
            self.numeric.fit_transform(&self.numeric_columns, &numeric)?
        };
        let cat_out = if self.categorical_columns.is_empty() {
            Array2::zeros((n, 0))
        } else {
            self.categorical.fit_transform(&self.categorical_columns, &categorical)?
        };
        self.fitted = true;
        debug!(
            n_features_out = self.n_features_out(),
            "Column transformer fitted"
        );
        Self::hstack(num_out, cat_out)
    }

    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.fit_transform(df)?;
        Ok(self)
    }

    /// Applies the fitted parameters; nothing is re-estimated from `df`.
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.fitted {
            return Err(PipelineError::new(ErrorKind::NotFitted("ColumnTransformer")));
        }
        let (numeric, categorical) = self.extract(df)?;
        let n = df.height();
        let num_out = if self.numeric_columns.is_empty() {
            Array2::zeros((n, 0))
        } else {
            self.numeric.transform(&numeric)?
        };
        let cat_out = if self.categorical_columns.is_empty() {
            Array2::zeros((n, 0))
        } else {
            self.categorical.transform(&categorical)?
        };
        Self::hstack(num_out, cat_out)
    }

    /// Writes the fitted parameters as a versioned JSON artifact.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if !self.fitted {
            return Err(PipelineError::new(ErrorKind::NotFitted("ColumnTransformer")));
        }
        let artifact = Artifact {
            format_version: ARTIFACT_VERSION,
            kind: ARTIFACT_KIND.to_string(),
            payload: self,
        };
        save_object(path.as_ref(), &artifact)?;
        info!(path = %path.as_ref().display(), "Saved preprocessing object");
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let artifact: Artifact<ColumnTransformer> = load_object(path)?;
        if artifact.kind != ARTIFACT_KIND || artifact.format_version != ARTIFACT_VERSION {
            return Err(PipelineError::new(ErrorKind::UnsupportedArtifactVersion {
                kind: artifact.kind,
                version: artifact.format_version,
            }));
        }
        Ok(artifact.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{ImputeStrategy, UnknownPolicy};
    use polars::prelude::*;

    fn transformer() -> ColumnTransformer {
        ColumnTransformer::new(
            vec!["reading score".to_string()],
            NumericPipeline::new(ImputeStrategy::Median),
            vec!["gender".to_string(), "lunch".to_string()],
            CategoricalPipeline::new(ImputeStrategy::MostFrequent, UnknownPolicy::Error).unwrap(),
        )
        .unwrap()
    }

    fn train_df() -> DataFrame {
        df!(
            "gender" => &[Some("female"), Some("male"), None, Some("female")],
            "lunch" => &["standard", "free/reduced", "standard", "standard"],
            "reading score" => &[Some(72.0), Some(90.0), Some(95.0), None],
            "ignored" => &[1, 2, 3, 4]
        )
        .unwrap()
    }

    #[test]
    fn test_output_width_and_names() {
        let mut ct = transformer();
        let out = ct.fit_transform(&train_df()).unwrap();
        assert_eq!(out.dim(), (4, 5));
        assert_eq!(ct.n_features_out(), 5);
        assert_eq!(
            ct.feature_names(),
            vec![
                "reading score",
                "gender_female",
                "gender_male",
                "lunch_free/reduced",
                "lunch_standard"
            ]
        );
    }

    #[test]
    fn test_numeric_only_group() {
        let mut ct = ColumnTransformer::new(
            vec!["reading score".to_string()],
            NumericPipeline::new(ImputeStrategy::Mean),
            Vec::new(),
            CategoricalPipeline::new(ImputeStrategy::MostFrequent, UnknownPolicy::Error).unwrap(),
        )
        .unwrap();
        let out = ct.fit_transform(&train_df()).unwrap();
        assert_eq!(out.dim(), (4, 1));
        assert_eq!(ct.feature_names(), vec!["reading score"]);
    }

    #[test]
    fn test_transform_requires_fit() {
        let err = transformer().transform(&train_df()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotFitted("ColumnTransformer")));
    }

    #[test]
    fn test_missing_declared_column() {
        let mut ct = transformer();
        let df = df!("gender" => &["female"], "reading score" => &[1.0]).unwrap();
        let err = ct.fit_transform(&df).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MissingColumn { column, .. } if column == "lunch"));
    }

    #[test]
    fn test_overlapping_groups_rejected() {
        let err = ColumnTransformer::new(
            vec!["gender".to_string()],
            NumericPipeline::new(ImputeStrategy::Median),
            vec!["gender".to_string()],
            CategoricalPipeline::new(ImputeStrategy::MostFrequent, UnknownPolicy::Error).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidParameter { .. }));
    }

    #[test]
    fn test_transform_is_repeatable() {
        let mut ct = transformer();
        ct.fit(&train_df()).unwrap();
        let test = df!(
            "gender" => &["male", "female"],
            "lunch" => &[Some("standard"), None],
            "reading score" => &[None, Some(50.0)]
        )
        .unwrap();
        let first = ct.transform(&test).unwrap();
        let second = ct.transform(&test).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.dim(), (2, 5));
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("artifacts").join("preprocessor.json");
        let mut ct = transformer();
        ct.fit(&train_df()).unwrap();
        ct.save(&path).unwrap();

        let loaded = ColumnTransformer::load(&path).unwrap();
        assert!(loaded.is_fitted());
        assert_eq!(
            loaded.transform(&train_df()).unwrap(),
            ct.transform(&train_df()).unwrap()
        );
    }

    #[test]
    fn test_load_rejects_other_versions() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("preprocessor.json");
        let mut ct = transformer();
        ct.fit(&train_df()).unwrap();
        let artifact = Artifact {
            format_version: ARTIFACT_VERSION + 1,
            kind: ARTIFACT_KIND.to_string(),
            payload: &ct,
        };
        save_object(&path, &artifact).unwrap();

        let err = ColumnTransformer::load(&path).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::UnsupportedArtifactVersion { version, .. } if *version == ARTIFACT_VERSION + 1
        ));
    }

    #[test]
    fn test_save_unfitted_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = transformer().save(tmp.path().join("p.json")).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotFitted(_)));
    }
}
