//! Fleet snapshot persistence (JSON in the state directory)

use anyhow::{Context, Result};
use fleetkit::FleetSnapshot;
use std::fs;
use std::path::Path;

/// Load the snapshot, or return an empty one if the file doesn't exist
pub fn load(path: &Path) -> Result<FleetSnapshot> {
    if !path.exists() {
        log::debug!("Snapshot {} does not exist, starting empty", path.display());
        return Ok(FleetSnapshot::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;

    let snapshot: FleetSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;

    log::debug!(
        "Loaded {} repositories from {}",
        snapshot.repos.len(),
        path.display()
    );
    Ok(snapshot)
}

/// Stamp and save the snapshot, creating the state directory if needed
pub fn save(path: &Path, snapshot: &mut FleetSnapshot) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
    }

    snapshot.touch();
    let content =
        serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot to JSON")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;

    log::debug!("Saved snapshot to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetkit::{FleetTarget, RepositoryRecord};

    #[test]
    fn test_missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = load(&dir.path().join("snapshot.json")).unwrap();
        assert!(snapshot.repos.is_empty());
        assert!(snapshot.target.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".fleetsync").join("snapshot.json");

        let mut snapshot = FleetSnapshot {
            repos: vec![RepositoryRecord {
                branch: "develop".into(),
                version: "1.0.0".into(),
                version_line: 12,
                ..RepositoryRecord::new("svc-a")
            }],
            target: FleetTarget {
                branch: "release".into(),
                ..FleetTarget::default()
            },
            ..FleetSnapshot::default()
        };
        let before = snapshot.last_updated;

        save(&path, &mut snapshot).unwrap();
        assert!(snapshot.last_updated >= before);

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.repos, snapshot.repos);
        assert_eq!(loaded.target, snapshot.target);
    }

    #[test]
    fn test_corrupt_snapshot_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("snapshot.json"));
    }

    #[test]
    fn test_older_snapshot_fields_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(
            &path,
            r#"{"repos":[{"name":"svc-a","selected":true}],"last_updated":"2026-01-05T10:00:00Z"}"#,
        )
        .unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.repos[0].name, "svc-a");
        assert_eq!(loaded.repos[0].version_line, 0);
        assert!(loaded.target.is_empty());
    }
}
