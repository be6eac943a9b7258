use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataParams,
    pub transformation: TransformationConfig,
    pub model_params: ModelParams,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataParams {
    pub train_path: PathBuf,
    pub test_path: PathBuf,
}

impl Default for DataParams {
    fn default() -> Self {
        Self {
            train_path: PathBuf::from("artifacts/train.csv"),
            test_path: PathBuf::from("artifacts/test.csv"),
        }
    }
}

/// Column layout and preprocessing choices for the data transformation stage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransformationConfig {
    pub target_column: String,
    pub numerical_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    /// One of `mean`, `median`, `most_frequent`, `constant:<value>`.
    pub numerical_strategy: String,
    pub categorical_strategy: String,
    /// Fail on categories not seen during fit instead of encoding them as zeros.
    pub error_on_unknown_category: bool,
    pub preprocessor_path: PathBuf,
}

impl Default for TransformationConfig {
    fn default() -> Self {
        Self {
            target_column: "math score".to_string(),
            numerical_columns: vec!["writing score".to_string(), "reading score".to_string()],
            categorical_columns: vec![
                "gender".to_string(),
                "race/ethnicity".to_string(),
                "parental level of education".to_string(),
                "lunch".to_string(),
                "test preparation course".to_string(),
            ],
            numerical_strategy: "median".to_string(),
            categorical_strategy: "most_frequent".to_string(),
            error_on_unknown_category: true,
            preprocessor_path: Path::new("artifacts").join("preprocessor.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub ridge_alpha: f64,
    pub knn_neighbors: usize,
    pub learning_rate: f64,
    pub iterations: usize,
    pub max_depth: u32,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            ridge_alpha: 1.0,
            knn_neighbors: 5,
            learning_rate: 0.1,
            iterations: 100,
            max_depth: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }
}
