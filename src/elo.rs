use std::fmt;

use crate::state::{Match, Team, classify_result, roster_index, sort_chronological};

pub const INITIAL_RATING: i32 = 1500;

#[derive(Debug, Clone, Copy)]
pub struct EloConfig {
    pub k: f64,
    pub home_adv_pts: f64,
    pub initial_rating: i32,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            k: 32.0,
            home_adv_pts: 100.0,
            initial_rating: INITIAL_RATING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnknownTeam(u32),
    MissingScore,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownTeam(id) => write!(f, "unknown team {id}"),
            SkipReason::MissingScore => write!(f, "missing final score"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SkippedMatch {
    pub match_id: u32,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct ReplayReport {
    pub processed: usize,
    pub skipped: Vec<SkippedMatch>,
}

pub fn expected_score(r_a: f64, r_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((r_b - r_a) / 400.0))
}

pub fn actual_score(goals_for: u32, goals_against: u32) -> f64 {
    if goals_for > goals_against {
        1.0
    } else if goals_for < goals_against {
        0.0
    } else {
        0.5
    }
}

/// Margin-of-victory scaling: one-goal margins (and draws) move ratings by
/// the plain K, wider margins up to twice that, capped at 2.0.
pub fn goal_difference_multiplier(diff: u32) -> f64 {
    match diff {
        0 | 1 => 1.0,
        2 => 1.5,
        3 => 1.75,
        d => (1.75 + (d - 3) as f64 * 0.125).min(2.0),
    }
}

/// Rating deltas for one match, (home, away). Rounded half away from zero,
/// each side independently, so the pair may be off-symmetric by 1.
pub fn rate_match(
    home_rating: i32,
    away_rating: i32,
    home_goals: u32,
    away_goals: u32,
    cfg: &EloConfig,
) -> (i32, i32, f64) {
    let exp_home = expected_score(home_rating as f64 + cfg.home_adv_pts, away_rating as f64);
    let exp_away = 1.0 - exp_home;
    let s_home = actual_score(home_goals, away_goals);
    let s_away = 1.0 - s_home;
    let mult = goal_difference_multiplier(home_goals.abs_diff(away_goals));

    let delta_home = (cfg.k * mult * (s_home - exp_home)).round() as i32;
    let delta_away = (cfg.k * mult * (s_away - exp_away)).round() as i32;
    (delta_home, delta_away, mult)
}

/// Canonical rating derivation: reset every team to the initial rating with
/// an empty history, then replay the season's matches in chronological
/// order. Persisted incremental ratings are never trusted as ground truth.
pub fn recalculate_all_elo_ratings(
    teams: &mut [Team],
    matches: &[Match],
    season: &str,
    cfg: &EloConfig,
) -> ReplayReport {
    for team in teams.iter_mut() {
        team.elo_rating = cfg.initial_rating;
        team.elo_history.clear();
    }

    let mut season_matches: Vec<&Match> =
        matches.iter().filter(|m| m.season == season).collect();
    sort_chronological(&mut season_matches);

    let index = roster_index(teams);
    let mut report = ReplayReport::default();

    for m in season_matches {
        let Some(score) = m.final_score else {
            let reason = SkipReason::MissingScore;
            log::warn!("match {} skipped: {reason}", m.id);
            report.skipped.push(SkippedMatch {
                match_id: m.id,
                reason,
            });
            continue;
        };
        let sides = (
            index.get(&m.home_team_id).copied(),
            index.get(&m.away_team_id).copied(),
        );
        let (Some(hi), Some(ai)) = sides else {
            let missing = if sides.0.is_none() {
                m.home_team_id
            } else {
                m.away_team_id
            };
            let reason = SkipReason::UnknownTeam(missing);
            log::warn!("match {} skipped: {reason}", m.id);
            report.skipped.push(SkippedMatch {
                match_id: m.id,
                reason,
            });
            continue;
        };

        let home_rating = teams[hi].elo_rating;
        let away_rating = teams[ai].elo_rating;
        let home_name = teams[hi].name.clone();
        let away_name = teams[ai].name.clone();
        let (delta_home, delta_away, mult) =
            rate_match(home_rating, away_rating, score.home, score.away, cfg);

        push_event(
            &mut teams[hi],
            m.match_day,
            delta_home,
            away_name,
            score.home,
            score.away,
            mult,
        );
        push_event(
            &mut teams[ai],
            m.match_day,
            delta_away,
            home_name,
            score.away,
            score.home,
            mult,
        );
        report.processed += 1;
    }

    report
}

fn push_event(
    team: &mut Team,
    match_day: u32,
    change: i32,
    opponent_name: String,
    goals_for: u32,
    goals_against: u32,
    multiplier: f64,
) {
    team.elo_rating += change;
    team.elo_history.push(crate::state::RatingEvent {
        match_day,
        rating: team.elo_rating,
        change,
        opponent_name,
        result: classify_result(goals_for, goals_against),
        goals_for,
        goals_against,
        multiplier,
    });
}
