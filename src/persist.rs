use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::state::{Match, Season, Team};

const CACHE_DIR: &str = "league_engine";
const SNAPSHOT_FILE: &str = "league.json";
const SNAPSHOT_VERSION: u32 = 1;

/// On-disk snapshot of the league entities. This is a storage adapter
/// around the core, not a wire format the engines depend on; everything
/// derived (standings, ratings) is recomputed after loading.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Snapshot {
    version: u32,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    pub seasons: Vec<Season>,
}

impl Snapshot {
    pub fn new(teams: Vec<Team>, matches: Vec<Match>, seasons: Vec<Season>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            teams,
            matches,
            seasons,
        }
    }
}

/// Missing, unreadable, or version-mismatched snapshots all load as None;
/// the caller starts from an empty league in that case.
pub fn load_snapshot(path: &Path) -> Option<Snapshot> {
    let raw = fs::read_to_string(path).ok()?;
    let snapshot = serde_json::from_str::<Snapshot>(&raw).ok()?;
    if snapshot.version != SNAPSHOT_VERSION {
        log::debug!(
            "snapshot {} has version {}, want {SNAPSHOT_VERSION}",
            path.display(),
            snapshot.version
        );
        return None;
    }
    Some(snapshot)
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(snapshot).context("serialize league snapshot")?;
    fs::write(&tmp, json).context("write league snapshot")?;
    fs::rename(&tmp, path).context("swap league snapshot")?;
    log::debug!("snapshot saved to {}", path.display());
    Ok(())
}

pub fn default_snapshot_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(SNAPSHOT_FILE));
        }
    }
    // Fallback to ~/.cache on linux-like systems.
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(SNAPSHOT_FILE),
    )
}
