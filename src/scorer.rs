//! Visit-window scoring
//!
//! Rates each forecast day 0-8 for an outdoor visit and ranks days best
//! first. Pure functions, no I/O.

use crate::models::{DayScore, ForecastDay};

const FAIR_CONDITIONS: &[&str] = &["sunny", "clear", "partly cloudy"];

/// Temperature term: 3 for an ideal average, 2 for comfortable, else 1
#[must_use]
pub fn temperature_points(average_f: f64) -> u8 {
    if (65.0..=80.0).contains(&average_f) {
        3
    } else if (50.0..=85.0).contains(&average_f) {
        2
    } else {
        1
    }
}

/// Precipitation term from chance of rain
#[must_use]
pub fn precipitation_points(chance_of_rain: u8) -> u8 {
    match chance_of_rain {
        0..20 => 3,
        20..40 => 2,
        40..60 => 1,
        _ => 0,
    }
}

/// +2 when the condition reads as fair weather
#[must_use]
pub fn condition_points(condition: &str) -> u8 {
    let condition = condition.to_lowercase();
    if FAIR_CONDITIONS.iter().any(|c| condition.contains(c)) {
        2
    } else {
        0
    }
}

/// Score a single day
#[must_use]
pub fn score_day(day: &ForecastDay) -> DayScore {
    let score = temperature_points(day.average_temp_f())
        + precipitation_points(day.chance_of_rain)
        + condition_points(&day.condition);
    DayScore {
        date: day.date,
        score,
        summary: format!(
            "{}, {}, {}% chance of rain",
            day.condition,
            day.format_temperature(),
            day.chance_of_rain
        ),
    }
}

/// Score every day, keeping input order
#[must_use]
pub fn score_days(days: &[ForecastDay]) -> Vec<DayScore> {
    days.iter().map(score_day).collect()
}

/// Best first; equal scores keep their original relative order
#[must_use]
pub fn rank(mut scores: Vec<DayScore>) -> Vec<DayScore> {
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores
}

/// Score and rank
#[must_use]
pub fn score(days: &[ForecastDay]) -> Vec<DayScore> {
    rank(score_days(days))
}

/// The `n` best days
#[must_use]
pub fn top_days(days: &[ForecastDay], n: usize) -> Vec<DayScore> {
    let mut ranked = score(days);
    ranked.truncate(n);
    ranked
}
