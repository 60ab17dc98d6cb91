//! Short-horizon daily spending forecast
//!
//! The transaction history is aggregated into daily totals and a sequence
//! model is fitted on it from scratch for every request, so the same history
//! always yields the same forecast. Two sparse-data paths avoid fitting on
//! nothing:
//! - every transaction on a single date: the recent average, scaled
//! - too few days for a full training window: one pair built from the
//!   zero-padded recent days, predicting their average

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use tracing::{debug, info};

use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::models::Transaction;

use super::sequence_model::{LinearAutoregressor, SequenceModel, TrainingPair};
use super::types::{Forecast, ForecastMethod, ForecastOutcome, ForecastPoint};

/// Scale applied to the first same-day forecast point; each later day adds 0.1
const SAME_DAY_START_SCALE: f64 = 0.9;
const SAME_DAY_STEP: f64 = 0.1;

pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Forecast the days following the ledger's history
    pub fn forecast(&self, ledger: &Ledger) -> Result<ForecastOutcome> {
        self.forecast_with(ledger.transactions(), LinearAutoregressor::new())
    }

    /// Forecast with a caller-supplied model (fitted here, then discarded)
    pub fn forecast_with<M: SequenceModel>(
        &self,
        history: &[Transaction],
        mut model: M,
    ) -> Result<ForecastOutcome> {
        let count = history.len();
        if count < self.config.min_transactions {
            debug!(count, "Not enough transactions to forecast");
            return Ok(ForecastOutcome::NotEnoughData {
                transaction_count: count,
                required: self.config.min_transactions,
                message: format!(
                    "Need at least {} transactions to forecast (have {})",
                    self.config.min_transactions, count
                ),
            });
        }

        let daily = daily_totals(history);
        let (first_day, last_day) = match (daily.keys().next(), daily.keys().next_back()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(Error::computation("History has no dates", count)),
        };

        if first_day == last_day {
            let amounts: Vec<f64> = history.iter().map(|t| t.amount).collect();
            let average = mean(&padded_tail(&amounts, self.config.window));
            let points = (0..self.config.horizon_days)
                .map(|i| {
                    let scale = SAME_DAY_START_SCALE + SAME_DAY_STEP * i as f64;
                    Ok(ForecastPoint {
                        date: day_after(last_day, i + 1, count)?,
                        amount: average * scale,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            info!(count, average, "Forecast from single-day history");
            return Ok(ForecastOutcome::Success(Forecast {
                method: ForecastMethod::SameDay,
                points,
                message: Some(
                    "All transactions share one date; forecast scales their average".into(),
                ),
            }));
        }

        let series = fill_daily_series(&daily, first_day, last_day);
        let window_len = self.config.window;

        let (pairs, message) = if series.len() > window_len {
            let pairs = series
                .windows(window_len + 1)
                .map(|w| TrainingPair::new(w[..window_len].to_vec(), w[window_len]))
                .collect::<Vec<_>>();
            (pairs, None)
        } else {
            let recent = padded_tail(&series, window_len);
            let target = mean(&recent);
            (
                vec![TrainingPair::new(recent, target)],
                Some(format!(
                    "Only {} days of history; forecast follows the recent average",
                    series.len()
                )),
            )
        };

        debug!(
            days = series.len(),
            pairs = pairs.len(),
            window = window_len,
            "Fitting forecast model"
        );
        model
            .fit(&pairs)
            .map_err(|e| Error::computation(format!("Model fit failed: {}", e), count))?;

        let mut window = padded_tail(&series, window_len);
        let mut points = Vec::with_capacity(self.config.horizon_days);
        for step in 1..=self.config.horizon_days {
            let raw = model
                .predict(&window)
                .map_err(|e| Error::computation(format!("Prediction failed: {}", e), count))?;
            points.push(ForecastPoint {
                date: day_after(last_day, step, count)?,
                amount: raw.max(0.0),
            });
            // Feed the unfloored value back so the model sees its own trend
            window.remove(0);
            window.push(raw);
        }

        info!(count, days = series.len(), "Forecast from sequence model");
        Ok(ForecastOutcome::Success(Forecast {
            method: ForecastMethod::SequenceModel,
            points,
            message,
        }))
    }
}

fn daily_totals(history: &[Transaction]) -> BTreeMap<NaiveDate, f64> {
    let mut daily = BTreeMap::new();
    for tx in history {
        *daily.entry(tx.date).or_insert(0.0) += tx.amount;
    }
    daily
}

/// Every day from `first` to `last` inclusive, zero where nothing was spent
fn fill_daily_series(
    daily: &BTreeMap<NaiveDate, f64>,
    first: NaiveDate,
    last: NaiveDate,
) -> Vec<f64> {
    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| daily.get(&day).copied().unwrap_or(0.0))
        .collect()
}

/// The last `len` values, left-padded with zeros when there are fewer
fn padded_tail(values: &[f64], len: usize) -> Vec<f64> {
    let tail = &values[values.len().saturating_sub(len)..];
    let mut padded = vec![0.0; len - tail.len()];
    padded.extend_from_slice(tail);
    padded
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn day_after(date: NaiveDate, days: usize, count: usize) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days as u64))
        .ok_or_else(|| Error::computation("Forecast date out of range", count))
}
