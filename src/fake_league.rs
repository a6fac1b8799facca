use chrono::{Duration as ChronoDuration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::state::{Goal, Match, Score, Team};

// Invented clubs for demo data; ids are assigned 1..=n in this order.
const CLUBS: [(&str, &str, &str); 12] = [
    ("AS Rivegauche", "RIV", "Rivegauche"),
    ("FC Montclair", "MTC", "Montclair"),
    ("Olympique Verdon", "VER", "Verdon"),
    ("Stade Beaulieu", "BEA", "Beaulieu"),
    ("US Fontaine", "FON", "Fontaine"),
    ("Racing Portneuf", "POR", "Portneuf"),
    ("ES Valbonne", "VAL", "Valbonne"),
    ("AC Rochefort", "ROC", "Rochefort"),
    ("SC Lachapelle", "LAC", "Lachapelle"),
    ("JS Hautmont", "HAU", "Hautmont"),
    ("FC Clairval", "CLA", "Clairval"),
    ("AS Pontivy", "PON", "Pontivy"),
];

pub fn sample_roster(count: usize) -> Vec<Team> {
    (0..count)
        .map(|i| {
            let id = (i + 1) as u32;
            match CLUBS.get(i) {
                Some((name, short, city)) => Team::new(id, name, short, city),
                None => Team::new(
                    id,
                    &format!("Club {id}"),
                    &format!("C{id:02}"),
                    &format!("Ville {id}"),
                ),
            }
        })
        .collect()
}

/// Deterministic double round-robin season: same seed, same matches. One
/// matchday per week starting at `start`, goal detail consistent with the
/// final scores (including the occasional 90+x stoppage goal).
pub fn sample_season(seed: u64, teams: &[Team], season: &str, start: NaiveDate) -> Vec<Match> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut matches = Vec::new();
    let mut next_id = 1u32;

    let first_leg = round_robin_rounds(teams.len());
    let rounds: Vec<Vec<(usize, usize)>> = first_leg
        .iter()
        .cloned()
        .chain(first_leg.iter().map(|pairs| {
            pairs.iter().map(|&(h, a)| (a, h)).collect()
        }))
        .collect();

    for (round, pairs) in rounds.iter().enumerate() {
        let match_day = (round + 1) as u32;
        let date = start + ChronoDuration::days(7 * round as i64);
        for &(hi, ai) in pairs {
            let home = &teams[hi];
            let away = &teams[ai];
            let home_goals = sample_goals(&mut rng, true);
            let away_goals = sample_goals(&mut rng, false);

            let mut goals = Vec::new();
            push_side_goals(&mut rng, &mut goals, home, home_goals);
            push_side_goals(&mut rng, &mut goals, away, away_goals);

            let mut m = Match {
                id: next_id,
                season: season.to_string(),
                match_day,
                date,
                home_team_id: home.id,
                away_team_id: away.id,
                final_score: Some(Score {
                    home: home_goals,
                    away: away_goals,
                }),
                halftime_score: None,
                goals,
            };
            m.sort_goals();
            next_id += 1;
            matches.push(m);
        }
    }

    matches
}

pub fn sample_league(
    seed: u64,
    team_count: usize,
    season: &str,
    start: NaiveDate,
) -> (Vec<Team>, Vec<Match>) {
    let teams = sample_roster(team_count);
    let matches = sample_season(seed, &teams, season, start);
    (teams, matches)
}

fn sample_goals(rng: &mut StdRng, home: bool) -> u32 {
    let mut goals = rng.gen_range(0..=2);
    // Mild home edge, rare blowouts.
    if rng.gen_bool(if home { 0.45 } else { 0.30 }) {
        goals += 1;
    }
    if rng.gen_bool(0.10) {
        goals += rng.gen_range(1..=2);
    }
    goals
}

fn push_side_goals(rng: &mut StdRng, goals: &mut Vec<Goal>, team: &Team, count: u32) {
    for _ in 0..count {
        let minute = rng.gen_range(1..=90);
        let extra_time = if minute == 90 && rng.gen_bool(0.6) {
            rng.gen_range(1..=5)
        } else {
            0
        };
        goals.push(Goal {
            team_id: team.id,
            scorer: format!("{} #{}", team.short_name, rng.gen_range(7..=11)),
            minute,
            extra_time,
        });
    }
}

/// Circle-method schedule for one leg: n-1 rounds (n even; a bye slot is
/// inserted for odd n), every pair exactly once.
fn round_robin_rounds(team_count: usize) -> Vec<Vec<(usize, usize)>> {
    if team_count < 2 {
        return Vec::new();
    }
    const BYE: usize = usize::MAX;
    let slots = if team_count % 2 == 0 {
        team_count
    } else {
        team_count + 1
    };

    let mut rot: Vec<usize> = (1..slots)
        .map(|i| if i < team_count { i } else { BYE })
        .collect();
    let mut rounds = Vec::new();

    for round in 0..slots - 1 {
        let order: Vec<usize> = std::iter::once(0).chain(rot.iter().copied()).collect();
        let mut pairs = Vec::new();
        for k in 0..slots / 2 {
            let a = order[k];
            let b = order[slots - 1 - k];
            if a == BYE || b == BYE {
                continue;
            }
            // Alternate venues so nobody hosts every round.
            if (round + k) % 2 == 0 {
                pairs.push((a, b));
            } else {
                pairs.push((b, a));
            }
        }
        rounds.push(pairs);
        rot.rotate_right(1);
    }
    rounds
}
