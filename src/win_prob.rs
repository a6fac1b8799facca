use crate::elo::{EloConfig, expected_score};
use crate::state::Team;

const BASE_DRAW_PROB: f64 = 0.35;
const MIN_DRAW_PROB: f64 = 0.15;
const DRAW_GAP_SCALE: f64 = 1000.0;

/// Pre-match outcome probabilities as whole percentages. Each value is
/// rounded independently, so the sum may drift off 100 by one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub home_win_pct: u8,
    pub draw_pct: u8,
    pub away_win_pct: u8,
}

impl Prediction {
    pub fn sum(&self) -> u32 {
        self.home_win_pct as u32 + self.draw_pct as u32 + self.away_win_pct as u32
    }
}

/// Outcome probabilities from two raw ratings. The home side gets the
/// configured rating bonus before the expectation; the draw share shrinks
/// as the (adjusted) gap grows, floored at 15%.
pub fn outcome_probs(home_rating: i32, away_rating: i32, cfg: &EloConfig) -> Prediction {
    let adj_home = home_rating as f64 + cfg.home_adv_pts;
    let away = away_rating as f64;

    let e_home = expected_score(adj_home, away);
    let p_draw = (BASE_DRAW_PROB - (adj_home - away).abs() / DRAW_GAP_SCALE).max(MIN_DRAW_PROB);
    let p_home = e_home * (1.0 - p_draw);
    let p_away = (1.0 - e_home) * (1.0 - p_draw);

    Prediction {
        home_win_pct: to_pct(p_home),
        draw_pct: to_pct(p_draw),
        away_win_pct: to_pct(p_away),
    }
}

pub fn predict_match(home: &Team, away: &Team, cfg: &EloConfig) -> Prediction {
    outcome_probs(home.elo_rating, away.elo_rating, cfg)
}

fn to_pct(p: f64) -> u8 {
    (p * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ratings_favor_home() {
        let p = outcome_probs(1500, 1500, &EloConfig::default());
        // Adjusted gap is exactly the home bonus: draw 25%, home ~48%.
        assert_eq!(p.draw_pct, 25);
        assert_eq!(p.home_win_pct, 48);
        assert_eq!(p.away_win_pct, 27);
        assert_eq!(p.sum(), 100);
    }

    #[test]
    fn probabilities_sum_close_to_100() {
        let cfg = EloConfig::default();
        for (h, a) in [
            (1500, 1500),
            (1710, 1433),
            (1388, 1704),
            (1502, 1498),
            (2000, 1200),
        ] {
            let p = outcome_probs(h, a, &cfg);
            assert!(
                (99..=101).contains(&p.sum()),
                "sum {} for {h} vs {a}",
                p.sum()
            );
        }
    }

    #[test]
    fn draw_probability_is_floored() {
        let p = outcome_probs(2200, 1300, &EloConfig::default());
        assert_eq!(p.draw_pct, 15);
        assert!(p.home_win_pct > p.away_win_pct);
    }

    #[test]
    fn stronger_away_side_flips_the_favorite() {
        let p = outcome_probs(1450, 1750, &EloConfig::default());
        assert!(p.away_win_pct > p.home_win_pct);
    }
}
