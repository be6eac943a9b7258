pub mod config;
pub mod data_loader;
pub mod error;
pub mod evaluation;
pub mod logger;
pub mod metrics;
pub mod models;
pub mod preprocessing;
pub mod transformation;
pub mod utils;

pub use config::Config;
pub use data_loader::DataLoader;
pub use error::{ErrorKind, PipelineError, Result};
pub use evaluation::{evaluate_models, EvaluationReport};
pub use logger::Logger;
pub use models::{ModelRegistry, Regressor};
pub use preprocessing::ColumnTransformer;
pub use transformation::{DataTransformation, TransformationOutput};
pub use utils::{load_object, save_object};
