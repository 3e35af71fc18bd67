use thiserror::Error;

use crate::data::model::Season;

/// Result alias for the recommendation pipeline.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Failures of a pipeline run. Any of these aborts the whole run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The listing date could not be parsed in any accepted format.
    #[error("property {id}: unparseable date '{value}'")]
    MalformedDate { id: i64, value: String },

    /// A numeric field is NaN or infinite.
    #[error("property {id}: non-finite value in '{column}'")]
    NonFiniteValue { id: i64, column: &'static str },

    /// The zip code has no usable median price (missing, NaN or zero).
    #[error("zip code {zipcode} has no defined median price")]
    UndefinedZipMedian { zipcode: u32 },

    /// No median exists for the property's own (zip, season) group.
    #[error("zip code {zipcode} has no median price for {season}")]
    MissingSeasonBaseline { zipcode: u32, season: Season },
}
