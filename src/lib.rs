pub mod elo;
pub mod fake_league;
pub mod form;
pub mod persist;
pub mod season;
pub mod standings;
pub mod state;
pub mod streaks;
pub mod win_prob;
