use std::collections::HashMap;

use crate::state::{Goal, Match, MatchResult, Score, Team, classify_result, roster_index};

/// Which subset of a match's goals counts toward the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Full,
    FirstHalf,
    SecondHalf,
    /// Everything except end-of-match stoppage-time goals.
    NoStoppage,
}

impl ViewMode {
    pub fn key(self) -> &'static str {
        match self {
            ViewMode::Full => "full",
            ViewMode::FirstHalf => "first-half",
            ViewMode::SecondHalf => "second-half",
            ViewMode::NoStoppage => "no-stoppage",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "full" => Some(ViewMode::Full),
            "first-half" => Some(ViewMode::FirstHalf),
            "second-half" => Some(ViewMode::SecondHalf),
            "no-stoppage" => Some(ViewMode::NoStoppage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationFilter {
    #[default]
    All,
    Home,
    Away,
}

impl LocationFilter {
    pub fn key(self) -> &'static str {
        match self {
            LocationFilter::All => "all",
            LocationFilter::Home => "home",
            LocationFilter::Away => "away",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "all" => Some(LocationFilter::All),
            "home" => Some(LocationFilter::Home),
            "away" => Some(LocationFilter::Away),
            _ => None,
        }
    }

    pub(crate) fn admits(self, m: &Match, team_id: u32) -> bool {
        match self {
            LocationFilter::All => true,
            LocationFilter::Home => m.home_team_id == team_id,
            LocationFilter::Away => m.away_team_id == team_id,
        }
    }
}

/// Slicing parameters shared by the standings engine and the form/streak
/// analyzer. All fields combine.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandingsFilter {
    pub view: ViewMode,
    /// Inclusive lower matchday bound; None means from matchday 1.
    pub from_match_day: Option<u32>,
    /// Inclusive upper matchday bound; None means no cap.
    pub up_to_match_day: Option<u32>,
    pub location: LocationFilter,
}

impl StandingsFilter {
    pub fn admits_match_day(&self, match_day: u32) -> bool {
        let from = self.from_match_day.unwrap_or(1);
        match_day >= from && self.up_to_match_day.is_none_or(|to| match_day <= to)
    }
}

/// Derived per-team table line. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub team_id: u32,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

impl Stats {
    fn new(team_id: u32) -> Self {
        Self {
            team_id,
            ..Self::default()
        }
    }

    fn record(&mut self, goals_for: u32, goals_against: u32) {
        self.played += 1;
        self.goals_for += goals_for;
        self.goals_against += goals_against;
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;
        match classify_result(goals_for, goals_against) {
            MatchResult::Win => {
                self.won += 1;
                self.points += 3;
            }
            MatchResult::Draw => {
                self.drawn += 1;
                self.points += 1;
            }
            MatchResult::Loss => self.lost += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StandingRow {
    pub team_id: u32,
    pub name: String,
    pub short_name: String,
    pub elo_rating: i32,
    pub stats: Stats,
}

fn count_goals(m: &Match, pred: impl Fn(&Goal) -> bool) -> (u32, u32) {
    let home = m
        .goals
        .iter()
        .filter(|g| g.team_id == m.home_team_id && pred(g))
        .count() as u32;
    let away = m
        .goals
        .iter()
        .filter(|g| g.team_id == m.away_team_id && pred(g))
        .count() as u32;
    (home, away)
}

/// Goals per side under the view mode. Half views count only goals whose
/// minute lands in that half, so a match without goal detail contributes a
/// 0-0 there; the no-stoppage view falls back to the final score instead.
fn view_score(m: &Match, score: Score, view: ViewMode) -> (u32, u32) {
    match view {
        ViewMode::Full => (score.home, score.away),
        ViewMode::FirstHalf => count_goals(m, |g| g.is_first_half()),
        ViewMode::SecondHalf => count_goals(m, |g| g.is_second_half()),
        ViewMode::NoStoppage => {
            if m.goals.is_empty() {
                (score.home, score.away)
            } else {
                count_goals(m, |g| !g.is_end_stoppage())
            }
        }
    }
}

/// Aggregate the season's matches into one table line per roster team and
/// rank them. Sort is descending (points, goal difference, goals for).
/// No further tie-break is defined: the sort is stable, so exact ties
/// keep roster order.
pub fn compute_standings(
    teams: &[Team],
    matches: &[Match],
    season: &str,
    filter: &StandingsFilter,
) -> Vec<StandingRow> {
    let index = roster_index(teams);
    let mut table: HashMap<u32, Stats> = teams
        .iter()
        .map(|t| (t.id, Stats::new(t.id)))
        .collect();

    for m in matches.iter().filter(|m| m.season == season) {
        if !filter.admits_match_day(m.match_day) {
            continue;
        }
        let Some(score) = m.final_score else {
            log::warn!("match {} has no final score, ignored in standings", m.id);
            continue;
        };
        if !index.contains_key(&m.home_team_id) || !index.contains_key(&m.away_team_id) {
            log::warn!("match {} references a team outside the roster, ignored", m.id);
            continue;
        }

        let (home_goals, away_goals) = view_score(m, score, filter.view);
        if filter.location.admits(m, m.home_team_id) {
            if let Some(stats) = table.get_mut(&m.home_team_id) {
                stats.record(home_goals, away_goals);
            }
        }
        if filter.location.admits(m, m.away_team_id) {
            if let Some(stats) = table.get_mut(&m.away_team_id) {
                stats.record(away_goals, home_goals);
            }
        }
    }

    let mut rows: Vec<StandingRow> = teams
        .iter()
        .map(|t| StandingRow {
            team_id: t.id,
            name: t.name.clone(),
            short_name: t.short_name.clone(),
            elo_rating: t.elo_rating,
            stats: table.get(&t.id).copied().unwrap_or(Stats::new(t.id)),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.stats
            .points
            .cmp(&a.stats.points)
            .then(b.stats.goal_difference.cmp(&a.stats.goal_difference))
            .then(b.stats.goals_for.cmp(&a.stats.goals_for))
    });
    rows
}

#[derive(Debug, Clone)]
pub struct ScorerRow {
    pub scorer: String,
    pub team_id: u32,
    pub team_name: String,
    pub goals: u32,
}

/// Goal-detail leaderboard under the same matchday window. Anonymous goal
/// records (empty scorer) are left out. Stable for ties, in first-goal
/// order.
pub fn top_scorers(
    teams: &[Team],
    matches: &[Match],
    season: &str,
    filter: &StandingsFilter,
) -> Vec<ScorerRow> {
    let names: HashMap<u32, &str> = teams.iter().map(|t| (t.id, t.name.as_str())).collect();
    let mut order: Vec<(String, u32)> = Vec::new();
    let mut tally: HashMap<(String, u32), u32> = HashMap::new();

    for m in matches.iter().filter(|m| m.season == season) {
        if !filter.admits_match_day(m.match_day) {
            continue;
        }
        for goal in &m.goals {
            if goal.scorer.trim().is_empty() {
                continue;
            }
            if !names.contains_key(&goal.team_id) {
                continue;
            }
            let key = (goal.scorer.clone(), goal.team_id);
            let entry = tally.entry(key.clone()).or_insert(0);
            if *entry == 0 {
                order.push(key);
            }
            *entry += 1;
        }
    }

    let mut rows: Vec<ScorerRow> = order
        .into_iter()
        .map(|(scorer, team_id)| ScorerRow {
            team_name: names.get(&team_id).copied().unwrap_or("?").to_string(),
            goals: tally[&(scorer.clone(), team_id)],
            scorer,
            team_id,
        })
        .collect();
    rows.sort_by(|a, b| b.goals.cmp(&a.goals));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn team(id: u32, name: &str) -> Team {
        Team::new(id, name, name, "Ville")
    }

    fn goal(team_id: u32, scorer: &str, minute: u32, extra_time: u32) -> Goal {
        Goal {
            team_id,
            scorer: scorer.to_string(),
            minute,
            extra_time,
        }
    }

    fn played(id: u32, match_day: u32, home: u32, away: u32, score: (u32, u32)) -> Match {
        Match {
            id,
            season: "2025-26".to_string(),
            match_day,
            date: NaiveDate::from_ymd_opt(2025, 9, match_day).unwrap(),
            home_team_id: home,
            away_team_id: away,
            final_score: Some(Score {
                home: score.0,
                away: score.1,
            }),
            halftime_score: None,
            goals: Vec::new(),
        }
    }

    fn roster() -> Vec<Team> {
        vec![team(1, "Alpha"), team(2, "Beta"), team(3, "Gamma")]
    }

    /// 2-1 home win: home goals at 10' and 90+2', away goal at 50'.
    fn detailed_match() -> Match {
        let mut m = played(1, 1, 1, 2, (2, 1));
        m.goals = vec![
            goal(1, "H One", 10, 0),
            goal(2, "A One", 50, 0),
            goal(1, "H Two", 90, 2),
        ];
        m
    }

    #[test]
    fn full_view_uses_final_score() {
        let rows = compute_standings(
            &roster(),
            &[detailed_match()],
            "2025-26",
            &StandingsFilter::default(),
        );
        assert_eq!(rows[0].team_id, 1);
        assert_eq!(rows[0].stats.points, 3);
        assert_eq!(rows[0].stats.goals_for, 2);
        assert_eq!(rows[1].team_id, 2);
        assert_eq!(rows[1].stats.lost, 1);
        // Gamma never played but still gets a line.
        assert_eq!(rows[2].team_id, 3);
        assert_eq!(rows[2].stats.played, 0);
    }

    #[test]
    fn first_half_view_counts_only_early_goals() {
        let filter = StandingsFilter {
            view: ViewMode::FirstHalf,
            ..Default::default()
        };
        let rows = compute_standings(&roster(), &[detailed_match()], "2025-26", &filter);
        let alpha = rows.iter().find(|r| r.team_id == 1).unwrap();
        // Only the 10' goal counts: a 1-0 first-half win.
        assert_eq!(alpha.stats.goals_for, 1);
        assert_eq!(alpha.stats.goals_against, 0);
        assert_eq!(alpha.stats.won, 1);
    }

    #[test]
    fn second_half_view_flips_the_result() {
        let filter = StandingsFilter {
            view: ViewMode::SecondHalf,
            ..Default::default()
        };
        let rows = compute_standings(&roster(), &[detailed_match()], "2025-26", &filter);
        let alpha = rows.iter().find(|r| r.team_id == 1).unwrap();
        let beta = rows.iter().find(|r| r.team_id == 2).unwrap();
        // Second half was 1-1 (the 90+2 goal is still second-half).
        assert_eq!(alpha.stats.drawn, 1);
        assert_eq!(beta.stats.drawn, 1);
        assert_eq!(beta.stats.goals_for, 1);
    }

    #[test]
    fn no_stoppage_view_drops_late_winners() {
        let filter = StandingsFilter {
            view: ViewMode::NoStoppage,
            ..Default::default()
        };
        let rows = compute_standings(&roster(), &[detailed_match()], "2025-26", &filter);
        let alpha = rows.iter().find(|r| r.team_id == 1).unwrap();
        // The 90+2 goal vanishes: 1-1.
        assert_eq!(alpha.stats.drawn, 1);
        assert_eq!(alpha.stats.goals_for, 1);
    }

    #[test]
    fn no_stoppage_view_falls_back_without_goal_detail() {
        let filter = StandingsFilter {
            view: ViewMode::NoStoppage,
            ..Default::default()
        };
        let rows = compute_standings(
            &roster(),
            &[played(1, 1, 1, 2, (2, 1))],
            "2025-26",
            &filter,
        );
        let alpha = rows.iter().find(|r| r.team_id == 1).unwrap();
        assert_eq!(alpha.stats.won, 1);
        assert_eq!(alpha.stats.goals_for, 2);
    }

    #[test]
    fn matchday_window_keeps_only_the_requested_rounds() {
        let matches = vec![
            played(1, 1, 1, 2, (1, 0)),
            played(2, 2, 2, 3, (2, 0)),
            played(3, 3, 3, 1, (0, 3)),
            played(4, 4, 1, 2, (0, 4)),
        ];
        let filter = StandingsFilter {
            from_match_day: Some(2),
            up_to_match_day: Some(3),
            ..Default::default()
        };
        let rows = compute_standings(&roster(), &matches, "2025-26", &filter);
        let alpha = rows.iter().find(|r| r.team_id == 1).unwrap();
        let beta = rows.iter().find(|r| r.team_id == 2).unwrap();
        // Matchdays 1 and 4 are outside the window.
        assert_eq!(alpha.stats.played, 1);
        assert_eq!(alpha.stats.won, 1);
        assert_eq!(beta.stats.played, 1);
        assert_eq!(beta.stats.won, 1);
    }

    #[test]
    fn location_filter_splits_home_and_away() {
        let matches = vec![
            played(1, 1, 1, 2, (2, 0)),
            played(2, 2, 2, 1, (1, 1)),
        ];
        let home_only = StandingsFilter {
            location: LocationFilter::Home,
            ..Default::default()
        };
        let rows = compute_standings(&roster(), &matches, "2025-26", &home_only);
        let alpha = rows.iter().find(|r| r.team_id == 1).unwrap();
        assert_eq!(alpha.stats.played, 1);
        assert_eq!(alpha.stats.won, 1);

        let away_only = StandingsFilter {
            location: LocationFilter::Away,
            ..Default::default()
        };
        let rows = compute_standings(&roster(), &matches, "2025-26", &away_only);
        let alpha = rows.iter().find(|r| r.team_id == 1).unwrap();
        assert_eq!(alpha.stats.played, 1);
        assert_eq!(alpha.stats.drawn, 1);
    }

    #[test]
    fn ranking_sorts_points_then_difference_then_scored() {
        let matches = vec![
            // Alpha beats Beta 4-0, Beta beats Gamma 1-0, Gamma beats Alpha 2-0.
            played(1, 1, 1, 2, (4, 0)),
            played(2, 2, 2, 3, (1, 0)),
            played(3, 3, 3, 1, (2, 0)),
        ];
        let rows = compute_standings(&roster(), &matches, "2025-26", &StandingsFilter::default());
        // Everyone on 3 points; goal difference +2/0/-2 decides.
        let order: Vec<u32> = rows.iter().map(|r| r.team_id).collect();
        assert_eq!(order, vec![1, 3, 2]);
        assert!(rows.iter().all(|r| r.stats.points == 3));
    }

    #[test]
    fn exact_ties_keep_roster_order() {
        let matches = vec![
            played(1, 1, 1, 3, (1, 0)),
            played(2, 2, 2, 3, (1, 0)),
        ];
        let rows = compute_standings(&roster(), &matches, "2025-26", &StandingsFilter::default());
        // Alpha and Beta have identical lines; roster order breaks the tie.
        assert_eq!(rows[0].team_id, 1);
        assert_eq!(rows[1].team_id, 2);
    }

    #[test]
    fn unknown_team_match_is_ignored() {
        let matches = vec![played(1, 1, 1, 99, (5, 0))];
        let rows = compute_standings(&roster(), &matches, "2025-26", &StandingsFilter::default());
        assert!(rows.iter().all(|r| r.stats.played == 0));
    }

    #[test]
    fn empty_roster_yields_empty_ranking() {
        let rows = compute_standings(&[], &[detailed_match()], "2025-26", &StandingsFilter::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn other_season_matches_are_invisible() {
        let mut foreign = played(1, 1, 1, 2, (3, 0));
        foreign.season = "2024-25".to_string();
        let rows = compute_standings(&roster(), &[foreign], "2025-26", &StandingsFilter::default());
        assert!(rows.iter().all(|r| r.stats.played == 0));
    }

    #[test]
    fn top_scorers_ranks_by_goal_count() {
        let mut m1 = detailed_match();
        m1.goals.push(goal(1, "H One", 30, 0));
        m1.final_score = Some(Score { home: 3, away: 1 });
        let rows = top_scorers(&roster(), &[m1], "2025-26", &StandingsFilter::default());
        assert_eq!(rows[0].scorer, "H One");
        assert_eq!(rows[0].goals, 2);
        assert_eq!(rows[0].team_name, "Alpha");
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn view_mode_keys_round_trip() {
        for mode in [
            ViewMode::Full,
            ViewMode::FirstHalf,
            ViewMode::SecondHalf,
            ViewMode::NoStoppage,
        ] {
            assert_eq!(ViewMode::from_key(mode.key()), Some(mode));
        }
        assert_eq!(ViewMode::from_key("bogus"), None);
        for loc in [LocationFilter::All, LocationFilter::Home, LocationFilter::Away] {
            assert_eq!(LocationFilter::from_key(loc.key()), Some(loc));
        }
    }
}
