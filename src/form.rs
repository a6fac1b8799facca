use crate::state::{MatchResult, RatingEvent};

pub const FORM_WINDOW: usize = 5;
pub const MODIFIER_CLAMP: i32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    OnFire,
    GoodForm,
    Neutral,
    Struggling,
    Crisis,
    Unknown,
}

impl FormStatus {
    pub fn label(self) -> &'static str {
        match self {
            FormStatus::OnFire => "on fire",
            FormStatus::GoodForm => "good form",
            FormStatus::Neutral => "neutral",
            FormStatus::Struggling => "struggling",
            FormStatus::Crisis => "crisis",
            FormStatus::Unknown => "unknown",
        }
    }

    fn from_modifier(modifier: i32) -> Self {
        if modifier >= 50 {
            FormStatus::OnFire
        } else if modifier >= 20 {
            FormStatus::GoodForm
        } else if modifier > -20 {
            FormStatus::Neutral
        } else if modifier > -50 {
            FormStatus::Struggling
        } else {
            FormStatus::Crisis
        }
    }
}

/// Bounded rating adjustment summarizing a team's trailing window, with one
/// human-readable tag per triggered rule (in evaluation order).
#[derive(Debug, Clone)]
pub struct FormReport {
    pub modifier: i32,
    pub details: Vec<String>,
    pub status: FormStatus,
    /// The raw result sequence the rules saw, oldest first.
    pub recent: Vec<MatchResult>,
}

impl FormReport {
    fn empty() -> Self {
        Self {
            modifier: 0,
            details: Vec::new(),
            status: FormStatus::Unknown,
            recent: Vec::new(),
        }
    }
}

/// Evaluate the form rules over the most recent `window` rating events.
/// Sub-rules are independent and their bonuses sum, except the result-streak
/// thresholds where only the highest met applies. The total is clamped to
/// [-MODIFIER_CLAMP, +MODIFIER_CLAMP].
pub fn form_modifier(history: &[RatingEvent], window: usize) -> FormReport {
    let start = history.len().saturating_sub(window.max(1));
    let events = &history[start..];
    if events.is_empty() {
        return FormReport::empty();
    }

    let n = events.len();
    let results: Vec<MatchResult> = events.iter().map(|e| e.result).collect();
    let mut total = 0i32;
    let mut details = Vec::new();

    // 1. Result streak: trailing run of identical results.
    let run = trailing_run(events, |e, last| e.result == last.result);
    match results[n - 1] {
        MatchResult::Win => {
            let bonus = if run >= 5 {
                80
            } else if run >= 4 {
                55
            } else if run >= 3 {
                30
            } else {
                0
            };
            if bonus > 0 {
                total += bonus;
                details.push(format!("{run} straight wins (+{bonus})"));
            }
        }
        MatchResult::Loss => {
            let malus = if run >= 5 {
                90
            } else if run >= 4 {
                65
            } else if run >= 3 {
                40
            } else {
                0
            };
            if malus > 0 {
                total -= malus;
                details.push(format!("{run} straight defeats (-{malus})"));
            }
        }
        MatchResult::Draw => {}
    }

    // 2. Unbeaten trailing run.
    let unbeaten = trailing_run_from_end(events, |e| e.result != MatchResult::Loss);
    if unbeaten >= 8 {
        total += 70;
        details.push(format!("unbeaten in {unbeaten} (+70)"));
    } else if unbeaten >= 5 {
        total += 40;
        details.push(format!("unbeaten in {unbeaten} (+40)"));
    }

    // 3. No win anywhere in the window.
    if results.iter().all(|r| *r != MatchResult::Win) {
        if n >= 7 {
            total -= 70;
            details.push(format!("no win in the last {n} (-70)"));
        } else if n >= 5 {
            total -= 55;
            details.push(format!("no win in the last {n} (-55)"));
        }
    }

    // 4. Clean sheets.
    let clean_sheets = events.iter().filter(|e| e.goals_against == 0).count();
    if clean_sheets >= 3 {
        total += 30;
        details.push(format!("{clean_sheets} clean sheets (+30)"));
    } else if clean_sheets == 2 {
        total += 18;
        details.push("2 clean sheets (+18)".to_string());
    } else if clean_sheets == 1 {
        details.push("1 clean sheet".to_string());
    } else if n >= 5 {
        total -= 18;
        details.push(format!("no clean sheet in {n} (-18)"));
    }

    // 5. Goals conceded over the window.
    let conceded: u32 = events.iter().map(|e| e.goals_against).sum();
    if conceded >= 10 {
        total -= 35;
        details.push(format!("{conceded} goals conceded (-35)"));
    } else if conceded <= 2 && n >= 5 {
        total += 12;
        details.push(format!("only {conceded} conceded (+12)"));
    }

    // 6. Attack: scoring runs stack with the volume bonus.
    let scoring_run = trailing_run_from_end(events, |e| e.goals_for >= 1);
    if scoring_run >= 5 {
        total += 25;
        details.push(format!("scored in {scoring_run} straight (+25)"));
    } else if scoring_run == 4 {
        total += 15;
        details.push("scored in 4 straight (+15)".to_string());
    }
    let scored: u32 = events.iter().map(|e| e.goals_for).sum();
    if scored >= 10 && n >= 5 {
        total += 18;
        details.push(format!("{scored} goals scored (+18)"));
    }
    let scoreless_run = trailing_run_from_end(events, |e| e.goals_for == 0);
    if scoreless_run >= 2 {
        total -= 20;
        details.push(format!("{scoreless_run} matches without scoring (-20)"));
    }

    let modifier = total.clamp(-MODIFIER_CLAMP, MODIFIER_CLAMP);
    FormReport {
        modifier,
        details,
        status: FormStatus::from_modifier(modifier),
        recent: results,
    }
}

/// Length of the trailing run of events matching the last one.
fn trailing_run(events: &[RatingEvent], same: impl Fn(&RatingEvent, &RatingEvent) -> bool) -> usize {
    let Some(last) = events.last() else { return 0 };
    events.iter().rev().take_while(|e| same(e, last)).count()
}

/// Length of the trailing run of events satisfying the predicate.
fn trailing_run_from_end(events: &[RatingEvent], pred: impl Fn(&RatingEvent) -> bool) -> usize {
    events.iter().rev().take_while(|e| pred(e)).count()
}
