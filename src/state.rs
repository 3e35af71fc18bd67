use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::export;
use crate::data::filter::{FilterState, filtered_indices, potential_profit, unique_zipcodes};
use crate::data::loader;
use crate::data::model::{BuyFlag, Recommendation};
use crate::insights::{self, Hypothesis};
use crate::pipeline::cache::PipelineCache;
use crate::pipeline::PipelineOutput;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which view fills the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Table,
    Map,
    Insights,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// File the current table was derived from.
    pub source: Option<PathBuf>,

    /// Pipeline output (None until a file is loaded).
    pub output: Option<Arc<PipelineOutput>>,

    /// Last pipeline result, keyed by input content.
    cache: PipelineCache,

    /// Purchasable / zip-code selections.
    pub filters: FilterState,

    /// Indices of rows passing the current filters, in display order (cached).
    pub visible_indices: Vec<usize>,

    /// Zip codes present in the table, for the selector.
    pub zipcodes: BTreeSet<u32>,

    /// H1-H10 over the full table.
    pub hypotheses: Vec<Hypothesis>,

    /// Colours of the buy-flag categories on the map.
    pub color_map: ColorMap,

    pub view: View,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            source: None,
            output: None,
            cache: PipelineCache::new(),
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            zipcodes: BTreeSet::new(),
            hypotheses: Vec::new(),
            color_map: ColorMap::new("buy", [BuyFlag::Buy.label(), BuyFlag::DontBuy.label()]),
            view: View::default(),
            status_message: None,
        }
    }

    /// Load a listings file and run the pipeline. Failures are logged and
    /// kept in `status_message`; the previous table stays on screen.
    pub fn open(&mut self, path: &Path) {
        match self.try_open(path) {
            Ok(()) => {
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    fn try_open(&mut self, path: &Path) -> Result<()> {
        let raw = loader::load_file(path)?;
        let output = self.cache.get_or_run(&raw)?;
        self.set_output(output);
        self.source = Some(path.to_path_buf());
        Ok(())
    }

    /// Ingest a pipeline output, reset filters and derived views.
    pub fn set_output(&mut self, output: Arc<PipelineOutput>) {
        self.zipcodes = unique_zipcodes(&output.recommendations);
        self.hypotheses = insights::compute(&output.recommendations);
        self.filters = FilterState::default();
        self.output = Some(output);
        self.refilter();
    }

    pub fn rows(&self) -> &[Recommendation] {
        self.output
            .as_deref()
            .map(|o| o.recommendations.as_slice())
            .unwrap_or(&[])
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(self.rows(), &self.filters);
    }

    /// Rows passing the filters, in display order.
    pub fn visible_rows(&self) -> Vec<Recommendation> {
        let rows = self.rows();
        self.visible_indices.iter().map(|&i| rows[i].clone()).collect()
    }

    pub fn set_purchasable_only(&mut self, on: bool) {
        self.filters.purchasable_only = on;
        self.refilter();
    }

    /// Toggle a single zip code in the selection.
    pub fn toggle_zipcode(&mut self, zipcode: u32) {
        if !self.filters.zipcodes.remove(&zipcode) {
            self.filters.zipcodes.insert(zipcode);
        }
        self.refilter();
    }

    /// Clear the zip selection (every zip code shown).
    pub fn clear_zipcodes(&mut self) {
        self.filters.zipcodes.clear();
        self.refilter();
    }

    /// Potential profit of the visible rows; only defined while
    /// "purchasable only" is active.
    pub fn potential_profit(&self) -> Option<f64> {
        self.filters
            .purchasable_only
            .then(|| potential_profit(self.rows(), &self.visible_indices))
    }

    /// Write the visible rows to `path` (CSV or Parquet by extension).
    pub fn export_to(&mut self, path: &Path) {
        if let Err(e) = export::export_file(&self.visible_rows(), path) {
            log::error!("Export failed: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }

    /// Re-read the current source file and recompute from scratch.
    pub fn reload(&mut self) {
        let Some(path) = self.source.clone() else {
            return;
        };
        self.cache.invalidate();
        self.open(&path);
    }
}
