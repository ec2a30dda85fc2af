use thiserror::Error;

use stockcast_core::CategoryCode;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("model has not been trained")]
    NotTrained,

    #[error("unknown category code {code} (model was fitted on {known} categories)")]
    UnknownCategory { code: CategoryCode, known: usize },

    #[error("training partition is empty")]
    EmptyTrainingSet,
}
