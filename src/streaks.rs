use crate::state::{Match, MatchResult, classify_result};
use crate::standings::StandingsFilter;

pub const FORM_LIMIT: usize = 5;

/// Current unbroken run counting backward from the most recent qualifying
/// match. `kind` is None when the team has no qualifying matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Streak {
    pub kind: Option<MatchResult>,
    pub count: u32,
    pub text: String,
}

impl Streak {
    fn none() -> Self {
        Self {
            kind: None,
            count: 0,
            text: "-".to_string(),
        }
    }
}

/// Qualifying full-match results for one team, most recent first. Form and
/// streaks always read the final score, never a standings view mode.
fn results_desc(
    team_id: u32,
    matches: &[Match],
    season: &str,
    filter: &StandingsFilter,
) -> Vec<MatchResult> {
    let mut qualifying: Vec<&Match> = matches
        .iter()
        .filter(|m| m.season == season)
        .filter(|m| m.involves(team_id))
        .filter(|m| filter.admits_match_day(m.match_day))
        .filter(|m| filter.location.admits(m, team_id))
        .filter(|m| m.final_score.is_some())
        .collect();
    qualifying.sort_by(|a, b| {
        b.match_day
            .cmp(&a.match_day)
            .then(b.date.cmp(&a.date))
            .then(b.id.cmp(&a.id))
    });

    qualifying
        .iter()
        .filter_map(|m| m.score_for(team_id))
        .map(|(gf, ga)| classify_result(gf, ga))
        .collect()
}

/// Last `limit` results in chronological order (oldest first), for the
/// little V/N/D form strip next to a table line.
pub fn recent_form(
    team_id: u32,
    matches: &[Match],
    season: &str,
    filter: &StandingsFilter,
    limit: usize,
) -> Vec<MatchResult> {
    let mut recent = results_desc(team_id, matches, season, filter);
    recent.truncate(limit);
    recent.reverse();
    recent
}

pub fn current_streak(
    team_id: u32,
    matches: &[Match],
    season: &str,
    filter: &StandingsFilter,
) -> Streak {
    let results = results_desc(team_id, matches, season, filter);
    let Some(&latest) = results.first() else {
        return Streak::none();
    };
    let count = results.iter().take_while(|r| **r == latest).count() as u32;
    Streak {
        kind: Some(latest),
        count,
        text: format!("{count}{}", latest.letter()),
    }
}
