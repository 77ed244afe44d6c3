use sliding_fit::config::sliding_fit_demo as cfg;
use sliding_fit::diagnostics::RunReport;
use sliding_fit::io::{load_clusters, write_json_file};
use sliding_fit::ClusterAnalyzer;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = cfg::load_config(Path::new(&config_path))?;

    let clusters = load_clusters(&config.input)?;
    let analyzer = ClusterAnalyzer::new(config.analysis.clone());
    let report = analyzer.run(&config.input, &clusters);
    print_text_summary(&report);

    let report_path = config.output.report_path();
    write_json_file(&report_path, &report)?;
    println!("Wrote report JSON to {}", report_path.display());

    Ok(())
}

fn usage() -> String {
    "Usage: sliding_fit_demo <config.json>".to_string()
}

fn print_text_summary(report: &RunReport) {
    println!("Sliding fit summary");
    println!("  input: {}", report.input.display());
    println!(
        "  clusters: {} fitted: {} split candidates: {}",
        report.clusters.len(),
        report.n_fitted(),
        report.n_split()
    );
    println!("  total_ms: {:.3}", report.timing.total_ms);
    for cluster in &report.clusters {
        match (&cluster.fit, &cluster.error) {
            (Some(fit), _) => {
                let scatter = fit
                    .scatter
                    .map(|s| {
                        format!(
                            "({:.2}, {:.2}, {:.2}) cos={:.3}",
                            s.position.x, s.position.y, s.position.z, s.cos_theta
                        )
                    })
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  #{:<3} hits={:<5} layers=[{}, {}] width={:.3} multivalued={} scatter={}",
                    cluster.index,
                    cluster.n_hits,
                    fit.min_layer,
                    fit.max_layer,
                    fit.width,
                    fit.multivalued_in_x,
                    scatter
                );
            }
            (None, Some(err)) => {
                println!("  #{:<3} hits={:<5} not fitted: {err}", cluster.index, cluster.n_hits);
            }
            (None, None) => {}
        }
        if let Some(layer) = cluster.split_layer {
            println!("       split at layer {layer}");
        }
    }
}
