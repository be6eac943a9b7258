use super::gbdt::GradientBoostingRegressor;
use super::knn::KNeighborsRegressor;
use super::linear::{LinearRegressionFactory, RidgeFactory};
use super::traits::{ModelFactory, Regressor};
use crate::config::ModelParams;
use crate::error::Result;

/// Named models in insertion order.
#[derive(Default)]
pub struct ModelRegistry {
    entries: Vec<(String, Box<dyn Regressor>)>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default candidate set used by the binary.
    pub fn from_params(params: &ModelParams) -> Result<Self> {
        let mut registry = Self::new();
        registry
            .insert("Linear Regression", LinearRegressionFactory::create(params)?)
            .insert("Ridge", RidgeFactory::create(params)?)
            .insert("K-Neighbors Regressor", KNeighborsRegressor::create(params)?)
            .insert("Gradient Boosting", GradientBoostingRegressor::create(params)?);
        Ok(registry)
    }

    /// Adds a model; re-inserting a name replaces the model in place and
    /// keeps its original position.
    pub fn insert<M>(&mut self, name: &str, model: M) -> &mut Self
    where
        M: Regressor + 'static,
    {
        let model: Box<dyn Regressor> = Box::new(model);
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = model,
            None => self.entries.push((name.to_string(), model)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Regressor> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut dyn Regressor)> {
        self.entries
            .iter_mut()
            .map(|(n, m)| (n.as_str(), m.as_mut() as &mut dyn Regressor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinearRegression;

    #[test]
    fn test_default_registry_order() {
        let registry = ModelRegistry::from_params(&ModelParams::default()).unwrap();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec!["Linear Regression", "Ridge", "K-Neighbors Regressor", "Gradient Boosting"]
        );
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut registry = ModelRegistry::new();
        registry
            .insert("a", LinearRegression::new())
            .insert("b", LinearRegression::new())
            .insert("a", LinearRegression::ridge(1.0));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(registry.get("b").is_some());
        assert!(registry.get("c").is_none());
    }
}
