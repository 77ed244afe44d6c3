//! Serializable reports describing what the analysis did with each cluster.
//!
//! `ClusterReport` is produced per cluster by [`ClusterAnalyzer`](crate::analyzer::ClusterAnalyzer),
//! `RunReport` wraps a whole input file for the demo tool.

pub mod report;
pub mod timing;

pub use report::{ClusterReport, FitSummary, LayerSample, RunReport};
pub use timing::{StageTiming, TimingBreakdown};
