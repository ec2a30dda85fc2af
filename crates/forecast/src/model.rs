use tracing::{debug, info};

use stockcast_core::{CategoryCode, Month};
use stockcast_dataset::{FeatureRow, PreparedDataset};
use stockcast_inventory::aggregation::{monthly_totals, reindex_months};

use crate::error::ModelError;
use crate::evaluation::{CategoryForecast, Evaluation, MonthForecast};
use crate::regression::{self, Coefficients};

#[derive(Debug, Clone, PartialEq)]
struct Fitted {
    coefficients: Coefficients,
    /// Category cardinality of the encoding the model was fitted against.
    categories: usize,
    trained_rows: usize,
}

/// Linear sales forecaster.
///
/// Lifecycle: created untrained, trained once per loaded dataset. Retraining
/// replaces the fitted parameters; nothing is updated incrementally.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastModel {
    fitted: Option<Fitted>,
}

impl ForecastModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn coefficients(&self) -> Option<&Coefficients> {
        self.fitted.as_ref().map(|f| &f.coefficients)
    }

    /// Fit on the training partition only.
    pub fn train(&mut self, dataset: &PreparedDataset) -> Result<Coefficients, ModelError> {
        let train = dataset.train();
        let xs: Vec<[f64; 3]> = train.features.iter().map(FeatureRow::to_vector).collect();
        let coefficients = regression::fit(&xs, &train.targets).ok_or(ModelError::EmptyTrainingSet)?;

        info!(
            rows = train.len(),
            intercept = coefficients.intercept,
            month = coefficients.month,
            year = coefficients.year,
            category = coefficients.category,
            "forecast model trained"
        );

        self.fitted = Some(Fitted {
            coefficients,
            categories: dataset.encoder().len(),
            trained_rows: train.len(),
        });
        Ok(coefficients)
    }

    /// Predict the holdout partition and score it.
    pub fn evaluate(&self, dataset: &PreparedDataset) -> Result<Evaluation, ModelError> {
        let holdout = dataset.holdout();
        let predictions = self.predict_for(&holdout.features)?;
        let evaluation = Evaluation::from_predictions(predictions, holdout.targets.clone());
        info!(
            rows = holdout.len(),
            mse = evaluation.mse,
            r_squared = ?evaluation.r_squared,
            "forecast model evaluated"
        );
        Ok(evaluation)
    }

    /// One prediction per row, in input order.
    pub fn predict_for(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        let fitted = self.fitted.as_ref().ok_or(ModelError::NotTrained)?;
        rows.iter()
            .map(|row| {
                if row.category.index() >= fitted.categories {
                    return Err(ModelError::UnknownCategory {
                        code: row.category,
                        known: fitted.categories,
                    });
                }
                Ok(fitted.coefficients.predict(row.to_vector()))
            })
            .collect()
    }

    /// Predict all twelve months of `year` for one category, next to what was sold.
    pub fn forecast_category(
        &self,
        dataset: &PreparedDataset,
        category: CategoryCode,
        year: i32,
    ) -> Result<CategoryForecast, ModelError> {
        let fitted = self.fitted.as_ref().ok_or(ModelError::NotTrained)?;
        let label = dataset.label(category).ok_or(ModelError::UnknownCategory {
            code: category,
            known: dataset.encoder().len(),
        })?;

        let rows: Vec<FeatureRow> = Month::all().map(|m| FeatureRow::new(m, year, category)).collect();
        let predicted = self.predict_for(&rows)?;

        let series = monthly_totals(
            dataset
                .records()
                .iter()
                .filter(|r| r.category == category && r.year == year),
        );
        let actual = reindex_months(&series);

        let months = Month::all()
            .zip(predicted)
            .map(|(month, predicted)| {
                let actual = actual[month.index()];
                MonthForecast {
                    month,
                    actual,
                    predicted,
                    increase: predicted > actual as f64,
                }
            })
            .collect();

        debug!(%category, year, trained_rows = fitted.trained_rows, "category forecast computed");

        Ok(CategoryForecast {
            category,
            label: label.to_string(),
            year,
            months,
        })
    }
}
