pub mod gbdt;
pub mod knn;
pub mod linear;
pub mod registry;
pub mod traits;

pub use self::gbdt::GradientBoostingRegressor;
pub use knn::KNeighborsRegressor;
pub use linear::LinearRegression;
pub use registry::ModelRegistry;
pub use traits::{ModelFactory, Regressor};
