use crate::analyzer::AnalyzerParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct SlidingFitDemoConfig {
    /// JSON file holding the clusters to analyse.
    #[serde(rename = "input")]
    pub input: PathBuf,
    #[serde(default)]
    pub analysis: AnalyzerParams,
    pub output: DemoOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct DemoOutputConfig {
    #[serde(default)]
    pub dir: PathBuf,
    #[serde(rename = "report_json")]
    pub report_json: PathBuf,
}

impl DemoOutputConfig {
    pub fn report_path(&self) -> PathBuf {
        resolve_path(&self.dir, &self.report_json)
    }
}

pub fn load_config(path: &Path) -> Result<SlidingFitDemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Invalid config {}: {e}", path.display()))
}

pub fn parse_config(data: &str) -> Result<SlidingFitDemoConfig, String> {
    let config: SlidingFitDemoConfig =
        serde_json::from_str(data).map_err(|e| format!("parse error: {e}"))?;
    config.analysis.validate()?;
    Ok(config)
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
