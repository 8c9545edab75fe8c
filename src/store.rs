//! The external spatial store seam.
//!
//! Spatial joins (which buildings intersect the plot, what falls inside the
//! 50 m buffer) happen in a collaborating store, not here. [`PlotStore`] is
//! the contract that store fulfills; the toolkit only consumes its rows.

use std::collections::HashMap;

use geo::Polygon;

use plankit_core::{DetectedFeature, PlanError, Plot, Result};

/// Read access to plots and their pre-classified surroundings.
///
/// All geometries are geographic (lon/lat); the toolkit projects them
/// itself. A `None` plot means the id is unknown; feature and buffer lookups
/// for unknown ids return empty results rather than errors.
pub trait PlotStore {
    /// The plot boundary, if the id exists.
    fn plot(&self, plot_id: i64) -> Result<Option<Plot>>;

    /// Features classified against the plot and its buffer.
    fn features(&self, plot_id: i64) -> Result<Vec<DetectedFeature>>;

    /// The fixed-distance buffer polygon, when the store has materialized
    /// one. Used only to widen the render extent.
    fn buffer(&self, plot_id: i64) -> Result<Option<Polygon<f64>>>;
}

/// In-memory store for tests, demos, and callers that already hold the rows.
#[derive(Debug, Default)]
pub struct MemoryPlotStore {
    plots: HashMap<i64, Plot>,
    features: HashMap<i64, Vec<DetectedFeature>>,
    buffers: HashMap<i64, Polygon<f64>>,
}

impl MemoryPlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_plot(&mut self, plot: Plot) {
        self.plots.insert(plot.id, plot);
    }

    pub fn insert_feature(&mut self, feature: DetectedFeature) {
        self.features
            .entry(feature.plot_id)
            .or_default()
            .push(feature);
    }

    pub fn insert_buffer(&mut self, plot_id: i64, buffer: Polygon<f64>) {
        self.buffers.insert(plot_id, buffer);
    }
}

impl PlotStore for MemoryPlotStore {
    fn plot(&self, plot_id: i64) -> Result<Option<Plot>> {
        Ok(self.plots.get(&plot_id).cloned())
    }

    fn features(&self, plot_id: i64) -> Result<Vec<DetectedFeature>> {
        Ok(self.features.get(&plot_id).cloned().unwrap_or_default())
    }

    fn buffer(&self, plot_id: i64) -> Result<Option<Polygon<f64>>> {
        Ok(self.buffers.get(&plot_id).cloned())
    }
}

/// Fetch a plot or fail with [`PlanError::NotFound`].
pub fn require_plot(store: &dyn PlotStore, plot_id: i64) -> Result<Plot> {
    store
        .plot(plot_id)?
        .ok_or(PlanError::NotFound { plot_id })
}
