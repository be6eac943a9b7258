use ndarray::{Array1, Array2, ArrayView1};

use super::traits::{check_fit_input, check_n_features, ModelFactory, Regressor};
use crate::config::ModelParams;
use crate::error::{ErrorKind, PipelineError, Result};

/// k-nearest neighbours regression: uniform mean of the `k` closest training
/// targets by Euclidean distance. `k` is capped at the training set size.
#[derive(Debug, Clone)]
pub struct KNeighborsRegressor {
    n_neighbors: usize,
    train: Option<(Array2<f64>, Array1<f64>)>,
}

impl KNeighborsRegressor {
    pub fn new(n_neighbors: usize) -> Result<Self> {
        if n_neighbors == 0 {
            return Err(PipelineError::new(ErrorKind::InvalidParameter {
                name: "knn_neighbors".to_string(),
                value: "0".to_string(),
                reason: "need at least one neighbour".to_string(),
            }));
        }
        Ok(Self {
            n_neighbors,
            train: None,
        })
    }

    fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
    }
}

impl Regressor for KNeighborsRegressor {
    fn name(&self) -> &'static str {
        "KNeighborsRegressor"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_fit_input(x, y)?;
        self.train = Some((x.clone(), y.clone()));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let (train_x, train_y) = self
            .train
            .as_ref()
            .ok_or(ErrorKind::NotFitted("KNeighborsRegressor"))?;
        check_n_features(train_x.ncols(), x)?;
        let k = self.n_neighbors.min(train_x.nrows());

        let predictions = x
            .rows()
            .into_iter()
            .map(|row| {
                let mut distances: Vec<(f64, usize)> = train_x
                    .rows()
                    .into_iter()
                    .enumerate()
                    .map(|(i, train_row)| (Self::squared_distance(row, train_row), i))
                    .collect();
                // stable sort keeps training order among equal distances
                distances.sort_by(|a, b| a.0.total_cmp(&b.0));
                distances[..k].iter().map(|&(_, i)| train_y[i]).sum::<f64>() / k as f64
            })
            .collect();
        Ok(predictions)
    }
}

impl ModelFactory for KNeighborsRegressor {
    type ModelType = Self;

    fn create(params: &ModelParams) -> Result<Self> {
        Self::new(params.knn_neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_nearest_neighbour_mean() {
        let x = array![[0.0], [1.0], [10.0], [11.0]];
        let y = array![1.0, 3.0, 20.0, 22.0];
        let mut model = KNeighborsRegressor::new(2).unwrap();
        model.fit(&x, &y).unwrap();
        let pred = model.predict(&array![[0.4], [10.6]]).unwrap();
        assert_eq!(pred, array![2.0, 21.0]);
    }

    #[test]
    fn test_k_capped_at_training_size() {
        let mut model = KNeighborsRegressor::new(5).unwrap();
        model.fit(&array![[0.0], [2.0]], &array![1.0, 3.0]).unwrap();
        assert_eq!(model.predict(&array![[100.0]]).unwrap(), array![2.0]);
    }

    #[test]
    fn test_zero_neighbours_rejected() {
        assert!(KNeighborsRegressor::new(0).is_err());
    }

    #[test]
    fn test_predict_before_fit() {
        let model = KNeighborsRegressor::new(1).unwrap();
        assert!(model.predict(&array![[0.0]]).is_err());
    }
}
