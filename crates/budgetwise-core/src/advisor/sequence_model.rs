//! Trainable sequence predictors used by the forecaster
//!
//! A model is fitted on (window → next value) pairs and then asked for the
//! value following a window. Models are cheap enough to refit per request.

use crate::error::{Error, Result};

/// One supervised example: a run of consecutive daily totals and the total
/// of the day that followed
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPair {
    pub window: Vec<f64>,
    pub target: f64,
}

impl TrainingPair {
    pub fn new(window: Vec<f64>, target: f64) -> Self {
        Self { window, target }
    }
}

pub trait SequenceModel {
    /// Fit from scratch on the given pairs (all windows must share a length)
    fn fit(&mut self, pairs: &[TrainingPair]) -> Result<()>;

    /// Predict the value following `window`
    fn predict(&self, window: &[f64]) -> Result<f64>;
}

/// Ridge-regularized linear autoregression
///
/// Features and target are centered before solving, so the intercept is not
/// penalized: a flat series predicts its own level and a single training pair
/// predicts its target.
#[derive(Debug, Clone)]
pub struct LinearAutoregressor {
    ridge: f64,
    weights: Vec<f64>,
    feature_means: Vec<f64>,
    target_mean: f64,
    fitted: bool,
}

impl LinearAutoregressor {
    pub const DEFAULT_RIDGE: f64 = 1e-3;

    pub fn new() -> Self {
        Self::with_ridge(Self::DEFAULT_RIDGE)
    }

    pub fn with_ridge(ridge: f64) -> Self {
        Self {
            ridge,
            weights: Vec::new(),
            feature_means: Vec::new(),
            target_mean: 0.0,
            fitted: false,
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Default for LinearAutoregressor {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceModel for LinearAutoregressor {
    fn fit(&mut self, pairs: &[TrainingPair]) -> Result<()> {
        let first = pairs
            .first()
            .ok_or_else(|| Error::InvalidData("No training pairs".into()))?;
        let dim = first.window.len();
        if dim == 0 {
            return Err(Error::InvalidData("Training window is empty".into()));
        }
        if pairs.iter().any(|p| p.window.len() != dim) {
            return Err(Error::InvalidData(
                "Training windows have different lengths".into(),
            ));
        }

        let n = pairs.len() as f64;
        let mut feature_means = vec![0.0; dim];
        let mut target_mean = 0.0;
        for pair in pairs {
            for (mean, x) in feature_means.iter_mut().zip(&pair.window) {
                *mean += x / n;
            }
            target_mean += pair.target / n;
        }

        // Normal equations on centered data: (XᵀX + λI) w = Xᵀy
        let mut gram = vec![vec![0.0; dim]; dim];
        let mut rhs = vec![0.0; dim];
        for pair in pairs {
            let centered: Vec<f64> = pair
                .window
                .iter()
                .zip(&feature_means)
                .map(|(x, m)| x - m)
                .collect();
            let y = pair.target - target_mean;
            for i in 0..dim {
                rhs[i] += centered[i] * y;
                for j in 0..dim {
                    gram[i][j] += centered[i] * centered[j];
                }
            }
        }
        for (i, row) in gram.iter_mut().enumerate() {
            row[i] += self.ridge;
        }

        let weights = solve(gram, rhs)?;
        if weights.iter().any(|w| !w.is_finite()) || !target_mean.is_finite() {
            return Err(Error::InvalidData("Model weights are not finite".into()));
        }

        self.weights = weights;
        self.feature_means = feature_means;
        self.target_mean = target_mean;
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, window: &[f64]) -> Result<f64> {
        if !self.fitted {
            return Err(Error::InvalidData("Model has not been fitted".into()));
        }
        if window.len() != self.weights.len() {
            return Err(Error::InvalidData(format!(
                "Window length {} does not match model length {}",
                window.len(),
                self.weights.len()
            )));
        }

        let prediction = self.target_mean
            + window
                .iter()
                .zip(&self.feature_means)
                .zip(&self.weights)
                .map(|((x, m), w)| w * (x - m))
                .sum::<f64>();

        if !prediction.is_finite() {
            return Err(Error::InvalidData("Prediction is not finite".into()));
        }
        Ok(prediction)
    }
}

/// Gaussian elimination with partial pivoting
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(Error::InvalidData("Singular system in model fit".into()));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs_from(series: &[f64], window: usize) -> Vec<TrainingPair> {
        series
            .windows(window + 1)
            .map(|w| TrainingPair::new(w[..window].to_vec(), w[window]))
            .collect()
    }

    #[test]
    fn test_flat_series_predicts_level() {
        let mut model = LinearAutoregressor::new();
        model.fit(&pairs_from(&[40.0; 6], 3)).unwrap();
        let next = model.predict(&[40.0, 40.0, 40.0]).unwrap();
        assert!((next - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_trend_extrapolates() {
        let mut model = LinearAutoregressor::new();
        model
            .fit(&pairs_from(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3))
            .unwrap();
        let next = model.predict(&[4.0, 5.0, 6.0]).unwrap();
        assert!((next - 7.0).abs() < 0.01, "got {}", next);
    }

    #[test]
    fn test_single_pair_predicts_target() {
        let mut model = LinearAutoregressor::new();
        model
            .fit(&[TrainingPair::new(vec![0.0, 10.0, 20.0], 10.0)])
            .unwrap();
        assert!((model.predict(&[0.0, 10.0, 20.0]).unwrap() - 10.0).abs() < 1e-9);
        assert!((model.predict(&[10.0, 20.0, 10.0]).unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let mut model = LinearAutoregressor::new();
        assert!(model.fit(&[]).is_err());
        assert!(model
            .fit(&[
                TrainingPair::new(vec![1.0, 2.0], 3.0),
                TrainingPair::new(vec![1.0], 3.0),
            ])
            .is_err());
        assert!(model
            .fit(&[TrainingPair::new(vec![f64::NAN, 1.0], 3.0)])
            .is_err());
    }

    #[test]
    fn test_predict_requires_fit_and_matching_window() {
        let mut model = LinearAutoregressor::new();
        assert!(model.predict(&[1.0]).is_err());
        model.fit(&pairs_from(&[1.0, 2.0, 3.0, 4.0], 2)).unwrap();
        assert!(model.predict(&[1.0, 2.0, 3.0]).is_err());
        assert!(model.predict(&[3.0, 4.0]).is_ok());
    }

    #[test]
    fn test_solve_small_system() {
        let x = solve(vec![vec![2.0, 1.0], vec![1.0, 3.0]], vec![3.0, 5.0]).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
        assert!(solve(vec![vec![0.0, 0.0], vec![0.0, 0.0]], vec![1.0, 1.0]).is_err());
    }
}
