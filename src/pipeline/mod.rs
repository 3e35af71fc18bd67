//! Recommendation pipeline: a single synchronous pass over the loaded rows.
//!
//! ```text
//!   Vec<RawRecord>
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ normalize  │  dedupe by id, parse dates, round counts, recode flags
//!   └───────────┘
//!        │ Vec<Property>
//!        ├──────────────────────┐
//!        ▼                      ▼
//!   ┌───────────┐        ┌───────────┐
//!   │ baseline   │        │  season    │  dominant season(s), (zip, season) medians
//!   └───────────┘        └───────────┘
//!        │ ZipMedians           │ SeasonProfile
//!        └──────────┬───────────┘
//!                   ▼
//!            ┌────────────┐
//!            │ recommend   │  price index, buy flag, proposed price, sell season
//!            └────────────┘
//!                   │
//!                   ▼
//!         Vec<Recommendation>
//! ```
//!
//! The aggregates are built once per run and only read afterwards.

pub mod baseline;
pub mod cache;
pub mod normalize;
pub mod recommend;
pub mod season;

use crate::data::model::{Property, RawRecord, Recommendation};
use crate::error::PipelineResult;

use baseline::ZipMedians;
use season::SeasonProfile;

/// Everything one pipeline run derives.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub properties: Vec<Property>,
    pub zip_medians: ZipMedians,
    pub seasons: SeasonProfile,
    pub recommendations: Vec<Recommendation>,
}

/// Run the full pipeline. Any malformed row or undefined baseline fails
/// the whole run.
pub fn run(raw: &[RawRecord]) -> PipelineResult<PipelineOutput> {
    let properties = normalize::normalize(raw)?;
    let zip_medians = ZipMedians::compute(&properties);
    let seasons = SeasonProfile::compute(&properties);
    let recommendations = recommend::recommend(&properties, &zip_medians, &seasons)?;

    log::info!(
        "pipeline: {} raw rows → {} properties in {} zip codes → {} recommendations",
        raw.len(),
        properties.len(),
        zip_medians.len(),
        recommendations.len()
    );

    Ok(PipelineOutput {
        properties,
        zip_medians,
        seasons,
        recommendations,
    })
}
