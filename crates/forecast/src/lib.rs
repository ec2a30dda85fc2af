//! `stockcast-forecast`
//!
//! **Responsibility:** the forecasting model.
//!
//! - Fits an ordinary-least-squares estimator over `{month, year, category}`.
//! - Trains on the training partition only; evaluates on the holdout.
//! - Never mutates the dataset it was trained on.

pub mod error;
pub mod evaluation;
pub mod model;
pub mod regression;

pub use error::ModelError;
pub use evaluation::{CategoryForecast, Evaluation, MonthForecast};
pub use model::ForecastModel;
pub use regression::Coefficients;
