//! Trend Forecaster: projects a skill-demand series forward with damped Holt smoothing.
//!
//! Unlike the resume tiers there is no rule-based substitute for a numeric
//! projection, so fitting problems are reported as errors rather than masked.

pub mod handlers;
pub mod holt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use self::holt::{DampedHolt, FitError};

/// Year given to the first bare numeric value; later values follow by index.
pub const ANCHOR_YEAR: i32 = 2020;
pub const DEFAULT_HORIZON: usize = 3;
pub const MAX_HORIZON: usize = 50;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Forecasting needs at least 2 data points, got {len}")]
    InsufficientData { len: usize },

    #[error("Horizon must be between 1 and 50, got {0}")]
    InvalidHorizon(i64),

    #[error("{0}")]
    Failure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandPoint {
    pub year: i32,
    pub demand_score: f64,
}

/// One entry of an incoming history: a year-tagged point or a bare value.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    Point(DemandPoint),
    Value(f64),
}

/// Resolves entries into a chronological series, preserving input order.
/// Bare values take `ANCHOR_YEAR + index`.
pub fn to_series(history: &[HistoryEntry]) -> Vec<DemandPoint> {
    history
        .iter()
        .enumerate()
        .map(|(index, entry)| match *entry {
            HistoryEntry::Point(point) => point,
            HistoryEntry::Value(demand_score) => DemandPoint {
                year: ANCHOR_YEAR + index as i32,
                demand_score,
            },
        })
        .collect()
}

/// Validates a requested horizon, defaulting when absent.
pub fn resolve_horizon(requested: Option<i64>) -> Result<usize, ForecastError> {
    match requested {
        None => Ok(DEFAULT_HORIZON),
        Some(h) if (1..=MAX_HORIZON as i64).contains(&h) => Ok(h as usize),
        Some(h) => Err(ForecastError::InvalidHorizon(h)),
    }
}

/// Projects `horizon` points after the last observed year, rounded to 2 decimals.
pub fn forecast(
    series: &[DemandPoint],
    horizon: usize,
) -> Result<Vec<DemandPoint>, ForecastError> {
    let Some(last) = series.last().filter(|_| series.len() >= 2) else {
        return Err(ForecastError::InsufficientData { len: series.len() });
    };
    if horizon == 0 {
        return Err(ForecastError::InvalidHorizon(0));
    }

    let values: Vec<f64> = series.iter().map(|p| p.demand_score).collect();
    let model = DampedHolt::fit(&values).map_err(|e| match e {
        FitError::TooShort(len) => ForecastError::InsufficientData { len },
        other => ForecastError::Failure(format!("Forecast model could not be fitted: {other}")),
    })?;
    tracing::debug!(
        "Damped Holt fit: alpha={:.2} beta={:.2} phi={:.2} sse={:.4}",
        model.alpha,
        model.beta,
        model.phi,
        model.sse
    );

    model
        .forecast(horizon)
        .into_iter()
        .zip(1..)
        .map(|(value, offset)| {
            if !value.is_finite() {
                return Err(ForecastError::Failure(
                    "Forecast model produced a non-finite projection".to_string(),
                ));
            }
            let year = last.year.checked_add(offset).ok_or_else(|| {
                ForecastError::Failure(format!(
                    "Projected year overflows after {} (+{offset})",
                    last.year
                ))
            })?;
            Ok(DemandPoint {
                year,
                demand_score: round2(value),
            })
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
