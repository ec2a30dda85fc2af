use serde::{Deserialize, Serialize};

use stockcast_core::{CategoryCode, Month};

/// Holdout evaluation of a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// One prediction per holdout row, in holdout order.
    pub predictions: Vec<f64>,
    pub targets: Vec<f64>,
    /// Mean squared error; always >= 0.
    pub mse: f64,
    /// Coefficient of determination. `None` when the targets have no variance.
    pub r_squared: Option<f64>,
}

impl Evaluation {
    pub fn from_predictions(predictions: Vec<f64>, targets: Vec<f64>) -> Self {
        let mse = mean_squared_error(&targets, &predictions);
        let r_squared = r_squared(&targets, &predictions);
        Self {
            predictions,
            targets,
            mse,
            r_squared,
        }
    }

    pub fn rmse(&self) -> f64 {
        self.mse.sqrt()
    }
}

/// Mean of squared residuals. Zero for empty input.
pub fn mean_squared_error(targets: &[f64], predictions: &[f64]) -> f64 {
    let n = targets.len().min(predictions.len());
    if n == 0 {
        return 0.0;
    }
    targets
        .iter()
        .zip(predictions)
        .map(|(y, p)| {
            let d = y - p;
            d * d
        })
        .sum::<f64>()
        / (n as f64)
}

fn r_squared(targets: &[f64], predictions: &[f64]) -> Option<f64> {
    let n = targets.len().min(predictions.len());
    if n == 0 {
        return None;
    }
    let mean = targets[..n].iter().sum::<f64>() / (n as f64);
    let total: f64 = targets[..n].iter().map(|y| (y - mean).powi(2)).sum();
    if total <= f64::EPSILON {
        return None;
    }
    let residual: f64 = targets.iter().zip(predictions).map(|(y, p)| (y - p).powi(2)).sum();
    Some(1.0 - residual / total)
}

/// Predicted vs actual units for one month of a category forecast.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthForecast {
    pub month: Month,
    /// Units actually sold in that month of the forecast year (0 when absent).
    pub actual: u64,
    pub predicted: f64,
    /// The prediction exceeds what was actually sold.
    pub increase: bool,
}

/// Twelve-month forecast for one category, ready for a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryForecast {
    pub category: CategoryCode,
    pub label: String,
    pub year: i32,
    pub months: Vec<MonthForecast>,
}

impl CategoryForecast {
    pub fn predicted_total(&self) -> f64 {
        self.months.iter().map(|m| m.predicted).sum()
    }

    pub fn increases(&self) -> impl Iterator<Item = &MonthForecast> {
        self.months.iter().filter(|m| m.increase)
    }
}
