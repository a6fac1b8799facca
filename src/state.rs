use std::collections::{BTreeSet, HashMap};

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::elo::INITIAL_RATING;

/// Match outcome from one team's perspective. Rendered with the
/// traditional V/N/D letters (victoire, nul, défaite) in tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

impl MatchResult {
    pub fn letter(self) -> &'static str {
        match self {
            MatchResult::Win => "V",
            MatchResult::Draw => "N",
            MatchResult::Loss => "D",
        }
    }
}

pub fn classify_result(goals_for: u32, goals_against: u32) -> MatchResult {
    if goals_for > goals_against {
        MatchResult::Win
    } else if goals_for < goals_against {
        MatchResult::Loss
    } else {
        MatchResult::Draw
    }
}

/// One entry of a team's rating history, appended per processed match.
/// Immutable once appended; the history is kept in replay order, which
/// equals chronological match order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingEvent {
    pub match_day: u32,
    /// Post-match rating.
    pub rating: i32,
    pub change: i32,
    pub opponent_name: String,
    pub result: MatchResult,
    pub goals_for: u32,
    pub goals_against: u32,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub short_name: String,
    pub city: String,
    pub elo_rating: i32,
    #[serde(default)]
    pub elo_history: Vec<RatingEvent>,
}

impl Team {
    pub fn new(id: u32, name: &str, short_name: &str, city: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            short_name: short_name.to_string(),
            city: city.to_string(),
            elo_rating: INITIAL_RATING,
            elo_history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub team_id: u32,
    pub scorer: String,
    pub minute: u32,
    #[serde(default)]
    pub extra_time: u32,
}

impl Goal {
    /// Minutes 1..=45, including 45+x stoppage.
    pub fn is_first_half(&self) -> bool {
        (1..=45).contains(&self.minute)
    }

    /// Minutes 46..=90, including 90+x stoppage.
    pub fn is_second_half(&self) -> bool {
        (46..=90).contains(&self.minute)
    }

    /// End-of-match stoppage time: 90+x with x > 0.
    pub fn is_end_stoppage(&self) -> bool {
        self.minute >= 90 && self.extra_time > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: u32,
    pub season: String,
    pub match_day: u32,
    pub date: NaiveDate,
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub final_score: Option<Score>,
    /// Display-only, e.g. "1-0". Never used in computations.
    #[serde(default)]
    pub halftime_score: Option<String>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Match {
    pub fn involves(&self, team_id: u32) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// Full-match goals for/against from one side's perspective.
    pub fn score_for(&self, team_id: u32) -> Option<(u32, u32)> {
        let score = self.final_score?;
        if team_id == self.home_team_id {
            Some((score.home, score.away))
        } else if team_id == self.away_team_id {
            Some((score.away, score.home))
        } else {
            None
        }
    }

    /// Keeps the goal list in its canonical (minute, extra_time) order.
    pub fn sort_goals(&mut self) {
        self.goals.sort_by_key(|g| (g.minute, g.extra_time));
    }

    /// When goal detail is present, the final score must agree with the
    /// per-side goal counts. Without detail the final score is authoritative.
    pub fn score_consistent(&self) -> bool {
        let Some(score) = self.final_score else {
            return true;
        };
        if self.goals.is_empty() {
            return true;
        }
        let home = self
            .goals
            .iter()
            .filter(|g| g.team_id == self.home_team_id)
            .count() as u32;
        let away = self
            .goals
            .iter()
            .filter(|g| g.team_id == self.away_team_id)
            .count() as u32;
        home == score.home && away == score.away
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub name: String,
    pub start_date: NaiveDate,
    /// None while the season is active.
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub team_ids: BTreeSet<u32>,
}

/// Sort matches into canonical replay order: matchday, then date, then id
/// as a deterministic tiebreak.
pub fn sort_chronological(matches: &mut [&Match]) {
    matches.sort_by(|a, b| {
        a.match_day
            .cmp(&b.match_day)
            .then(a.date.cmp(&b.date))
            .then(a.id.cmp(&b.id))
    });
}

pub fn roster_index(teams: &[Team]) -> HashMap<u32, usize> {
    teams.iter().enumerate().map(|(i, t)| (t.id, i)).collect()
}

/// Boundary validation for a roster coming from the outside world.
pub fn validate_roster(teams: &[Team]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for team in teams {
        if !seen.insert(team.id) {
            bail!("duplicate team id {}", team.id);
        }
        if team.name.trim().is_empty() {
            bail!("team {} has an empty name", team.id);
        }
    }
    Ok(())
}

/// Boundary validation for a match coming from the outside world. The
/// engines still skip-and-continue on referential gaps; this is the place
/// where the caller decides whether to accept the record at all.
pub fn validate_match(m: &Match, roster: &[Team]) -> Result<()> {
    if m.home_team_id == m.away_team_id {
        bail!("match {}: a team cannot play itself", m.id);
    }
    if m.match_day == 0 {
        bail!("match {}: matchday must be positive", m.id);
    }
    let index = roster_index(roster);
    for side in [m.home_team_id, m.away_team_id] {
        if !index.contains_key(&side) {
            bail!("match {}: unknown team {}", m.id, side);
        }
    }
    for goal in &m.goals {
        if goal.team_id != m.home_team_id && goal.team_id != m.away_team_id {
            bail!(
                "match {}: goal credited to non-participant {}",
                m.id,
                goal.team_id
            );
        }
        if !(1..=90).contains(&goal.minute) {
            bail!("match {}: goal minute {} out of range", m.id, goal.minute);
        }
        if goal.extra_time > 15 {
            bail!(
                "match {}: stoppage minute {} out of range",
                m.id,
                goal.extra_time
            );
        }
    }
    if !m.score_consistent() {
        bail!("match {}: final score disagrees with goal detail", m.id);
    }
    Ok(())
}
