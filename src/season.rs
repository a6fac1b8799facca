use std::collections::BTreeSet;

use anyhow::{Result, bail};
use chrono::NaiveDate;

use crate::state::{Match, Season};

pub fn active_season(seasons: &[Season]) -> Option<&Season> {
    seasons.iter().find(|s| s.is_active)
}

pub fn find_season<'a>(seasons: &'a [Season], name: &str) -> Option<&'a Season> {
    seasons.iter().find(|s| s.name == name)
}

/// Open a new season. The currently active season (if any) is archived:
/// marked inactive with its end date set to the new season's start.
pub fn start_season(
    seasons: &mut Vec<Season>,
    name: &str,
    start_date: NaiveDate,
    team_ids: BTreeSet<u32>,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("season name cannot be empty");
    }
    if seasons.iter().any(|s| s.name == name) {
        bail!("season {name:?} already exists");
    }

    for season in seasons.iter_mut().filter(|s| s.is_active) {
        season.is_active = false;
        season.end_date = Some(start_date);
    }

    seasons.push(Season {
        name: name.to_string(),
        start_date,
        end_date: None,
        is_active: true,
        team_ids,
    });
    Ok(())
}

/// Delete an archived season and cascade-delete its matches. Returns how
/// many matches were removed. The active season cannot be deleted.
pub fn delete_season(
    seasons: &mut Vec<Season>,
    matches: &mut Vec<Match>,
    name: &str,
) -> Result<usize> {
    let Some(pos) = seasons.iter().position(|s| s.name == name) else {
        bail!("unknown season {name:?}");
    };
    if seasons[pos].is_active {
        bail!("cannot delete the active season {name:?}");
    }

    seasons.remove(pos);
    let before = matches.len();
    matches.retain(|m| m.season != name);
    Ok(before - matches.len())
}
