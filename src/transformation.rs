//! Data transformation stage: train/test CSVs in, model-ready arrays and a
//! fitted preprocessor artifact out.

use std::path::{Path, PathBuf};

use ndarray::{concatenate, Array1, Array2, Axis};
use tracing::{debug, info, instrument};

use crate::config::TransformationConfig;
use crate::data_loader::{require_columns, split_target, DataLoader};
use crate::error::{ErrorKind, PipelineError, Result};
use crate::preprocessing::{
    CategoricalPipeline, ColumnTransformer, ImputeStrategy, NumericPipeline, UnknownPolicy,
};

/// Arrays are laid out as `[transformed features.., target]`.
#[derive(Debug, Clone)]
pub struct TransformationOutput {
    pub train: Array2<f64>,
    pub test: Array2<f64>,
    pub preprocessor_path: PathBuf,
}

impl TransformationOutput {
    /// Splits a transformed array back into features and target.
    ///
    /// An array without columns has no target and fails with `Shape`.
    pub fn split_xy(arr: &Array2<f64>) -> Result<(Array2<f64>, Array1<f64>)> {
        let Some(last) = arr.ncols().checked_sub(1) else {
            return Err(PipelineError::new(ErrorKind::Shape {
                expected: "at least one column (target)".to_string(),
                actual: "0 columns".to_string(),
            }));
        };
        let x = arr.slice(ndarray::s![.., ..last]).to_owned();
        let y = arr.column(last).to_owned();
        Ok((x, y))
    }
}

pub struct DataTransformation {
    config: TransformationConfig,
}

impl DataTransformation {
    pub fn new(config: TransformationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformationConfig {
        &self.config
    }

    /// Builds an unfitted transformer from the configured column groups.
    pub fn build_transformer(&self) -> Result<ColumnTransformer> {
        let numeric_strategy: ImputeStrategy = self.config.numerical_strategy.parse()?;
        let categorical_strategy: ImputeStrategy = self.config.categorical_strategy.parse()?;
        let handle_unknown = if self.config.error_on_unknown_category {
            UnknownPolicy::Error
        } else {
            UnknownPolicy::Ignore
        };

        info!("Categorical columns: {:?}", self.config.categorical_columns);
        info!("Numerical columns: {:?}", self.config.numerical_columns);

        ColumnTransformer::new(
            self.config.numerical_columns.clone(),
            NumericPipeline::new(numeric_strategy),
            self.config.categorical_columns.clone(),
            CategoricalPipeline::new(categorical_strategy, handle_unknown)?,
        )
    }

    #[instrument(skip_all, fields(train = %train_path.as_ref().display(), test = %test_path.as_ref().display()))]
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        train_path: P,
        test_path: Q,
    ) -> Result<TransformationOutput> {
        let train_df = DataLoader::new(train_path).load()?;
        let test_df = DataLoader::new(test_path).load()?;
        info!("Read train and test data completed");

        info!("Obtaining preprocessing object");
        let mut preprocessor = self.build_transformer()?;

        let target = self.config.target_column.as_str();
        let (train_features, train_target) = split_target(&train_df, target, "train")?;
        let (test_features, test_target) = split_target(&test_df, target, "test")?;

        let declared: Vec<&String> = self
            .config
            .numerical_columns
            .iter()
            .chain(&self.config.categorical_columns)
            .collect();
        require_columns(&train_features, declared.iter().copied(), "train")?;
        require_columns(&test_features, declared.iter().copied(), "test")?;

        info!("Applying preprocessing object on training and testing data");
        let train_x = preprocessor.fit_transform(&train_features)?;
        let test_x = preprocessor.transform(&test_features)?;
        debug!(
            train_shape = ?train_x.dim(),
            test_shape = ?test_x.dim(),
            features = ?preprocessor.feature_names(),
            "Features transformed"
        );

        let train = concatenate(Axis(1), &[train_x.view(), train_target.view().insert_axis(Axis(1))])?;
        let test = concatenate(Axis(1), &[test_x.view(), test_target.view().insert_axis(Axis(1))])?;

        preprocessor.save(&self.config.preprocessor_path)?;

        Ok(TransformationOutput {
            train,
            test,
            preprocessor_path: self.config.preprocessor_path.clone(),
        })
    }
}
