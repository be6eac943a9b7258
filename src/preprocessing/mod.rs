//! Stateful fit/transform components for tabular features.

pub mod column_transformer;
pub mod encoder;
pub mod imputer;
pub mod pipeline;
pub mod scaler;

pub use column_transformer::ColumnTransformer;
pub use encoder::{OneHotEncoder, UnknownPolicy};
pub use imputer::{CategoricalImputer, ImputeStrategy, NumericImputer};
pub use pipeline::{CategoricalPipeline, NumericPipeline};
pub use scaler::StandardScaler;
