//! House Rocket: buy and resale recommendations for a property listings
//! dataset, with a CLI export path and an egui dashboard.

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod insights;
pub mod pipeline;
pub mod state;
pub mod ui;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{run, PipelineOutput};
