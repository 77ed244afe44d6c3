use crate::cluster;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{ClusterReport, FitSummary, RunReport, TimingBreakdown};
use crate::fit::{AxisMode, SlidingFitParams, SlidingFitter};
use crate::shape::ShapeParams;
use crate::splitting::{KinkSplitter, KinkSplittingParams};
use crate::types::Cluster;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerParams {
    pub fit: SlidingFitParams,
    pub axis: AxisMode,
    pub shape: ShapeParams,
    pub kink: KinkSplittingParams,
    /// Run the kink-split search on every candidate cluster.
    pub find_kinks: bool,
}

impl Default for AnalyzerParams {
    fn default() -> Self {
        Self {
            fit: SlidingFitParams::default(),
            axis: AxisMode::default(),
            shape: ShapeParams::default(),
            kink: KinkSplittingParams::default(),
            find_kinks: true,
        }
    }
}

impl AnalyzerParams {
    pub fn validate(&self) -> Result<(), String> {
        self.fit.validate()?;
        if !(self.kink.pitch.is_finite() && self.kink.pitch > 0.0) {
            return Err(format!("kink pitch must be positive, got {}", self.kink.pitch));
        }
        let q = self.shape.track_residual_quantile;
        if !(0.0..=1.0).contains(&q) {
            return Err(format!("track_residual_quantile must lie in [0, 1], got {q}"));
        }
        Ok(())
    }
}

/// Fits clusters and collects their shape diagnostics.
pub struct ClusterAnalyzer {
    params: AnalyzerParams,
    fitter: SlidingFitter,
    splitter: KinkSplitter,
}

impl ClusterAnalyzer {
    pub fn new(params: AnalyzerParams) -> Self {
        Self {
            fitter: SlidingFitter::new(params.fit.clone()),
            splitter: KinkSplitter::new(params.kink.clone()),
            params,
        }
    }

    pub fn params(&self) -> &AnalyzerParams {
        &self.params
    }

    pub fn analyze(&self, index: usize, cluster: &Cluster) -> ClusterReport {
        let t0 = Instant::now();
        let mut timing = TimingBreakdown::default();
        let layers = self.params.fit.pseudo_layer();

        let fit = timing.time("fit", || self.fitter.fit_using(cluster, self.params.axis));
        let (fit, mut error) = match fit {
            Ok(fit) => {
                let summary = timing.time("shape", || FitSummary::from_fit(&fit, &self.params.shape));
                (Some(summary), None)
            }
            Err(err) => {
                debug!("cluster {index}: no sliding fit: {err}");
                (None, Some(err.to_string()))
            }
        };

        let mut split_layer = None;
        if self.params.find_kinks && self.splitter.is_possible_split(cluster) {
            match timing.time("kink", || self.splitter.find_best_split_layer(cluster)) {
                Ok(layer) => split_layer = layer,
                Err(err) => {
                    warn!("cluster {index}: kink search failed: {err}");
                    error.get_or_insert_with(|| err.to_string());
                }
            }
        }

        timing.total_ms = elapsed_ms(t0);
        ClusterReport {
            index,
            n_hits: cluster.len(),
            length: cluster::length(cluster),
            layer_span: cluster::layer_span(cluster, &layers),
            fit,
            error,
            split_layer,
            timing,
        }
    }

    /// Analyses every cluster independently; in parallel with the `parallel` feature.
    pub fn analyze_all(&self, clusters: &[Cluster]) -> Vec<ClusterReport> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            clusters
                .par_iter()
                .enumerate()
                .map(|(i, c)| self.analyze(i, c))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            clusters
                .iter()
                .enumerate()
                .map(|(i, c)| self.analyze(i, c))
                .collect()
        }
    }

    pub fn run(&self, input: &Path, clusters: &[Cluster]) -> RunReport {
        let t0 = Instant::now();
        let reports = self.analyze_all(clusters);
        let mut timing = TimingBreakdown::with_total(elapsed_ms(t0));
        timing.push(
            "clusters",
            reports.iter().map(|r| r.timing.total_ms).sum::<f64>(),
        );
        debug!(
            "ClusterAnalyzer: {} clusters analysed in {:.3} ms",
            reports.len(),
            timing.total_ms
        );
        RunReport {
            input: input.to_path_buf(),
            clusters: reports,
            timing,
        }
    }
}
