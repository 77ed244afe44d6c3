mod common;

use common::synthetic_cluster::{bent_track, straight_track};
use sliding_fit::splitting::{KinkSplitter, KinkSplittingParams};
use sliding_fit::{AnalyzerParams, Cluster, ClusterAnalyzer, SlidingFitParams};
use std::path::Path;

fn kink_params() -> KinkSplittingParams {
    KinkSplittingParams {
        sliding_fit_half_window: 10,
        ..KinkSplittingParams::default()
    }
}

#[test]
fn bent_track_splits_at_the_bend() {
    let _ = env_logger::builder().is_test(true).try_init();
    let splitter = KinkSplitter::new(kink_params());
    let layer = splitter
        .find_best_split_layer(&bent_track(30.0))
        .expect("consistent fit")
        .expect("kink");
    assert!((layer - 100).abs() <= 1, "layer {layer}");
    assert_eq!(splitter.find_best_split_layer(&straight_track(200)), Ok(None));
}

#[test]
fn analyzer_reports_every_cluster() {
    let _ = env_logger::builder().is_test(true).try_init();
    let analyzer = ClusterAnalyzer::new(AnalyzerParams {
        fit: SlidingFitParams::with_half_window(10),
        kink: kink_params(),
        ..AnalyzerParams::default()
    });
    let clusters = vec![straight_track(200), bent_track(30.0), Cluster::default()];
    let report = analyzer.run(Path::new("synthetic.json"), &clusters);

    assert_eq!(report.clusters.len(), 3);
    assert_eq!(report.n_fitted(), 2);
    assert_eq!(report.n_split(), 1);
    assert!(report.clusters[0].split_layer.is_none());
    assert!(report.clusters[1].split_layer.is_some());
    assert!(report.clusters[2].error.is_some());

    let bent = report.clusters[1].fit.as_ref().expect("bent fit");
    assert!(bent.scatter.is_some());

    let json = serde_json::to_value(&report).expect("serializable report");
    let first = &json["clusters"][0];
    assert_eq!(first["nHits"], 200);
    assert!(first["fit"]["layers"].as_array().map_or(0, |l| l.len()) == 200);
    assert!(first.get("splitLayer").is_none());
    assert!(json["timing"]["totalMs"].as_f64().is_some());
}
