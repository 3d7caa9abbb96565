//! Random-forest training and evaluation.
//!
//! The model is fit once, in advance, on a chronologically ordered split of
//! the lag-augmented rows: earliest 80% train, latest 20% held out. No
//! shuffling, so the evaluation never sees information from the future.
//!
//! No input scaling is applied anywhere: tree ensembles are split-based and
//! scale-insensitive, so lag values and predictions stay in the target's
//! native units end to end.

use anyhow::{anyhow, bail, Result};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::info;

use crate::lags::LagRow;
use crate::ForecastOptions;

/// Held-out evaluation of the fitted model.
#[derive(Debug, Clone, Copy)]
pub struct EvalMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// A fitted forest plus its evaluation.
pub struct EnergyModel {
    forest: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
    pub metrics: EvalMetrics,
    n_features: usize,
}

/// Model input layout: city code first, then covariates, then lags
/// shallowest-first.
pub fn feature_vector(city_code: usize, covariates: &[f64], lags: &[f64]) -> Vec<f64> {
    let mut features = Vec::with_capacity(1 + covariates.len() + lags.len());
    features.push(city_code as f64);
    features.extend_from_slice(covariates);
    features.extend_from_slice(lags);
    features
}

pub fn train(rows: &[LagRow], options: &ForecastOptions) -> Result<EnergyModel> {
    if rows.len() < 2 {
        bail!(
            "only {} lag-complete rows available; need at least 2 to fit and evaluate",
            rows.len()
        );
    }

    // Chronological order across all cities so the held-out tail is
    // genuinely the latest slice of history.
    let mut ordered: Vec<&LagRow> = rows.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then(a.city.cmp(&b.city)));

    let split = ((ordered.len() as f64) * options.split) as usize;
    let split = split.clamp(1, ordered.len() - 1);
    let (train_rows, test_rows) = ordered.split_at(split);

    let x_train: Vec<Vec<f64>> = train_rows
        .iter()
        .map(|r| feature_vector(r.city_code, &r.covariates, &r.lags))
        .collect();
    let y_train: Vec<f64> = train_rows.iter().map(|r| r.target).collect();
    let n_features = x_train[0].len();

    let params = RandomForestRegressorParameters::default()
        .with_n_trees(options.trees.into())
        .with_max_depth(options.max_depth)
        .with_seed(options.seed);
    let forest = RandomForestRegressor::fit(&DenseMatrix::from_2d_vec(&x_train), &y_train, params)
        .map_err(|e| anyhow!("fitting random forest: {e}"))?;

    let x_test: Vec<Vec<f64>> = test_rows
        .iter()
        .map(|r| feature_vector(r.city_code, &r.covariates, &r.lags))
        .collect();
    let y_test: Vec<f64> = test_rows.iter().map(|r| r.target).collect();
    let predicted = forest
        .predict(&DenseMatrix::from_2d_vec(&x_test))
        .map_err(|e| anyhow!("evaluating random forest: {e}"))?;

    let metrics = evaluate(&y_test, &predicted, train_rows.len());
    info!(
        mae = metrics.mae,
        rmse = metrics.rmse,
        r2 = metrics.r2,
        train_rows = metrics.train_rows,
        test_rows = metrics.test_rows,
        "model trained"
    );

    Ok(EnergyModel {
        forest,
        metrics,
        n_features,
    })
}

impl EnergyModel {
    /// Point prediction for a single feature vector.
    pub fn predict_one(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            bail!(
                "feature vector has {} values, model expects {}",
                features.len(),
                self.n_features
            );
        }
        let x = DenseMatrix::from_2d_vec(&vec![features.to_vec()]);
        let predictions = self
            .forest
            .predict(&x)
            .map_err(|e| anyhow!("predicting: {e}"))?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| anyhow!("model returned no prediction"))
    }
}

fn evaluate(actual: &[f64], predicted: &[f64], train_rows: usize) -> EvalMetrics {
    let n = actual.len().max(1) as f64;
    let mae = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n;
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;
    let mean = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        0.0
    };
    EvalMetrics {
        mae,
        rmse: mse.sqrt(),
        r2,
        train_rows,
        test_rows: actual.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn synthetic_rows(n: usize) -> Vec<LagRow> {
        // Target follows its lag-1 closely so even a small forest learns it.
        (0..n)
            .map(|i| {
                let target = 100.0 + (i as f64) + 10.0 * ((i % 12) as f64 / 12.0);
                LagRow {
                    date: NaiveDate::from_ymd_opt(2015 + (i / 12) as i32, (i % 12) as u32 + 1, 1)
                        .unwrap(),
                    city: "Pune".to_string(),
                    city_code: 0,
                    covariates: vec![(i % 12) as f64],
                    lags: vec![target - 1.0, target - 12.0],
                    target,
                }
            })
            .collect()
    }

    fn quick_options() -> ForecastOptions {
        ForecastOptions {
            trees: 20,
            max_depth: 6,
            ..ForecastOptions::default()
        }
    }

    #[test]
    fn feature_layout_is_code_covariates_lags() {
        let v = feature_vector(3, &[7.0, 8.0], &[1.0, 2.0]);
        assert_eq!(v, vec![3.0, 7.0, 8.0, 1.0, 2.0]);
    }

    #[test]
    fn trains_and_reports_finite_metrics() {
        let rows = synthetic_rows(60);
        let model = train(&rows, &quick_options()).unwrap();
        assert!(model.metrics.mae.is_finite());
        assert!(model.metrics.rmse >= model.metrics.mae);
        assert_eq!(model.metrics.train_rows + model.metrics.test_rows, 60);
        assert!(model.metrics.train_rows > model.metrics.test_rows);
    }

    #[test]
    fn predict_one_rejects_wrong_arity() {
        let rows = synthetic_rows(40);
        let model = train(&rows, &quick_options()).unwrap();
        let err = model.predict_one(&[1.0]).unwrap_err();
        assert!(err.to_string().contains("model expects"));
    }

    #[test]
    fn too_few_rows_is_an_error() {
        let rows = synthetic_rows(1);
        assert!(train(&rows, &quick_options()).is_err());
    }
}
