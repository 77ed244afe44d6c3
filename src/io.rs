//! Cluster input and JSON report output for the tools.

use crate::types::Cluster;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk layout of a cluster file:
/// `{"clusters": [{"hits": [{"position": [x, y, z], "energy": e}, ...]}, ...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ClusterFile {
    pub clusters: Vec<Cluster>,
}

pub fn load_clusters(path: &Path) -> Result<Vec<Cluster>, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read clusters {}: {e}", path.display()))?;
    let file: ClusterFile = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse clusters {}: {e}", path.display()))?;
    Ok(file.clusters)
}

pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CaloHit;

    #[test]
    fn clusters_round_trip_through_disk() {
        let dir = std::env::temp_dir().join(format!("sliding_fit_io_{}", std::process::id()));
        let path = dir.join("nested").join("clusters.json");
        let file = ClusterFile {
            clusters: vec![Cluster::new(vec![
                CaloHit::new(nalgebra::Vector3::new(1.0, 0.0, 2.0), 0.5),
                CaloHit::at(1.5, 0.0, 2.5),
            ])],
        };
        write_json_file(&path, &file).expect("write");
        let loaded = load_clusters(&path).expect("read");
        assert_eq!(loaded, file.clusters);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn energy_is_optional() {
        let file: ClusterFile =
            serde_json::from_str(r#"{"clusters":[{"hits":[{"position":[0.0,0.0,1.0]}]}]}"#)
                .expect("parse");
        assert_eq!(file.clusters[0].hits[0].energy, 0.0);
        assert!(load_clusters(Path::new("/nonexistent/clusters.json")).is_err());
    }
}
