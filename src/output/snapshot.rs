//! JSON snapshots of a model.

use crate::error::{GniError, Result};
use crate::models::NetworkModel;
use std::path::{Path, PathBuf};

/// `gni_model_<YYYY-MM-DD>.json` for today's date (UTC).
pub fn snapshot_file_name() -> String {
    format!("gni_model_{}.json", chrono::Utc::now().format("%Y-%m-%d"))
}

/// Write `model` as JSON into `dir`, returning the path written.
pub fn write_snapshot(model: &NetworkModel, dir: &str) -> Result<PathBuf> {
    let path = Path::new(dir).join(snapshot_file_name());
    let json = serde_json::to_string_pretty(model)
        .map_err(|e| GniError::ContractViolation(format!("Error serializing JSON: {e}")))?;
    log::info!("Writing model snapshot: {}", path.display());
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Read a snapshot written by [`write_snapshot`].
pub fn read_snapshot(path: &Path) -> Result<NetworkModel> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json)
        .map_err(|e| GniError::FatalInput(format!("Error parsing snapshot JSON {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{dot2hex, Instance};

    #[test]
    fn test_snapshot_file_name() {
        let name = snapshot_file_name();
        assert!(name.starts_with("gni_model_"));
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), "gni_model_2024-01-01.json".len());
    }

    #[test]
    fn test_write_and_read_snapshot() {
        let dir = std::env::temp_dir().join(format!("gni_snapshot_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut model = NetworkModel::new();
        model.mode = "EDGE".to_string();
        model.instances.push(Instance {
            name: "i-1".to_string(),
            private_ip: dot2hex("10.0.0.5"),
            ..Default::default()
        });

        let path = write_snapshot(&model, dir.to_str().unwrap()).unwrap();
        let back = read_snapshot(&path).unwrap();
        assert_eq!(back, model);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_missing_snapshot() {
        assert!(matches!(
            read_snapshot(Path::new("src/tests/test_data/no_such_snapshot.json")),
            Err(GniError::Io(_))
        ));
    }
}
