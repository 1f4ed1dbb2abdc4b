//! Holt exponential smoothing with an additive, damped trend and no seasonality.
//!
//! Recurrences (φ = damping, α = level smoothing, β = trend smoothing):
//!   level_t = α·y_t + (1 − α)·(level_{t−1} + φ·trend_{t−1})
//!   trend_t = β·(level_t − level_{t−1}) + (1 − β)·φ·trend_{t−1}
//!   ŷ_{t+h} = level_t + (φ + φ² + … + φʰ)·trend_t
//!
//! Initial state: level₀ = y₀, trend₀ = y₁ − y₀. Parameters are chosen by grid
//! search minimising the one-step-ahead squared error over y₁..yₙ.

use thiserror::Error;

/// Fitted smoothing parameters and final state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedHolt {
    pub alpha: f64,
    pub beta: f64,
    pub phi: f64,
    pub level: f64,
    pub trend: f64,
    pub sse: f64,
}

const ALPHA_GRID: (f64, f64, f64) = (0.05, 0.95, 0.05);
const BETA_GRID: (f64, f64, f64) = (0.05, 0.95, 0.05);
const PHI_GRID: (f64, f64, f64) = (0.80, 0.98, 0.02);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("at least 2 observations are required, got {0}")]
    TooShort(usize),
    #[error("series contains a non-finite value")]
    NonFinite,
    #[error("series is constant; a damped trend cannot be estimated")]
    Constant,
    #[error("no parameter combination produced a finite fit")]
    NoFiniteFit,
}

impl DampedHolt {
    /// Fits the model to `values` (chronological order).
    pub fn fit(values: &[f64]) -> Result<Self, FitError> {
        if values.len() < 2 {
            return Err(FitError::TooShort(values.len()));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite);
        }
        let first = values[0];
        if values.iter().all(|v| (v - first).abs() <= f64::EPSILON * first.abs().max(1.0)) {
            return Err(FitError::Constant);
        }

        let mut best: Option<DampedHolt> = None;
        for alpha in grid(ALPHA_GRID) {
            for beta in grid(BETA_GRID) {
                for phi in grid(PHI_GRID) {
                    let candidate = run(values, alpha, beta, phi);
                    if !candidate.sse.is_finite() {
                        continue;
                    }
                    if best.map_or(true, |b| candidate.sse < b.sse) {
                        best = Some(candidate);
                    }
                }
            }
        }
        best.ok_or(FitError::NoFiniteFit)
    }

    /// Projects `horizon` steps past the last observation.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let mut damping_sum = 0.0;
        let mut phi_power = 1.0;
        (0..horizon)
            .map(|_| {
                phi_power *= self.phi;
                damping_sum += phi_power;
                self.level + damping_sum * self.trend
            })
            .collect()
    }
}

fn run(values: &[f64], alpha: f64, beta: f64, phi: f64) -> DampedHolt {
    let mut level = values[0];
    let mut trend = values[1] - values[0];
    let mut sse = 0.0;

    for &y in &values[1..] {
        let predicted = level + phi * trend;
        let error = y - predicted;
        sse += error * error;

        let previous_level = level;
        level = alpha * y + (1.0 - alpha) * predicted;
        trend = beta * (level - previous_level) + (1.0 - beta) * phi * trend;
    }

    DampedHolt {
        alpha,
        beta,
        phi,
        level,
        trend,
        sse,
    }
}

/// Inclusive grid built from integer steps so float drift never drops the end point.
fn grid((start, end, step): (f64, f64, f64)) -> impl Iterator<Item = f64> {
    let steps = ((end - start) / step).round() as usize;
    (0..=steps).map(move |i| start + step * i as f64)
}
