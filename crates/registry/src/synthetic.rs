//! Deterministic synthetic datasets.
//!
//! Each parameter is a seasonal sine wave with a linear drift and Gaussian
//! noise. A fraction of readings is dropped so that consumers always see a few
//! gaps. The same seed always produces the same data.

use crate::error::RegistryError;
use chrono::{Days, NaiveDate};
use core_types::{Dataset, DatasetSchema, DatedRecord};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::TAU;

/// Shape of one generated parameter.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub base: f64,
    pub amplitude: f64,
    pub period_days: f64,
    /// Added per day.
    pub drift: f64,
    /// Standard deviation of the Gaussian noise.
    pub noise: f64,
    /// Probability that a reading is absent.
    pub missing_rate: f64,
    /// Lower clamp, e.g. 0 for quantities that cannot go negative.
    pub floor: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct SyntheticSpec {
    pub id: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParameterSpec>,
}

/// Generates `days` consecutive daily records starting at `start`.
pub fn generate<R: Rng>(
    spec: &SyntheticSpec,
    start: NaiveDate,
    days: u32,
    rng: &mut R,
) -> Result<Dataset, RegistryError> {
    let schema = DatasetSchema::new(spec.parameters.iter().map(|p| p.name.to_string()).collect())?;

    let noise = spec
        .parameters
        .iter()
        .map(|p| {
            Normal::new(0.0, p.noise).map_err(|e| {
                RegistryError::InvalidPayload(format!("noise for '{}': {e}", p.name))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(days as usize);
    for day in 0..days {
        let date = start.checked_add_days(Days::new(day.into())).ok_or_else(|| {
            RegistryError::InvalidPayload(format!("{days} days from {start} overflows the calendar"))
        })?;

        let t = f64::from(day);
        let values = spec
            .parameters
            .iter()
            .zip(&noise)
            .map(|(p, normal)| {
                if rng.gen_bool(p.missing_rate) {
                    return None;
                }
                let seasonal = p.amplitude * (TAU * t / p.period_days).sin();
                let value = p.base + seasonal + p.drift * t + normal.sample(&mut *rng);
                Some(p.floor.map_or(value, |floor| value.max(floor)))
            })
            .collect();

        records.push(DatedRecord::new(date, values));
    }

    Ok(Dataset::new(spec.id, spec.description, schema, records)?)
}

/// The datasets a fresh server starts with.
pub fn default_catalog() -> Vec<SyntheticSpec> {
    vec![
        SyntheticSpec {
            id: "weather",
            description: "Daily weather station readings",
            parameters: vec![
                ParameterSpec {
                    name: "temperature",
                    base: 12.0,
                    amplitude: 9.0,
                    period_days: 365.0,
                    drift: 0.002,
                    noise: 2.0,
                    missing_rate: 0.02,
                    floor: None,
                },
                ParameterSpec {
                    name: "humidity",
                    base: 65.0,
                    amplitude: -12.0,
                    period_days: 365.0,
                    drift: 0.0,
                    noise: 5.0,
                    missing_rate: 0.02,
                    floor: Some(0.0),
                },
                ParameterSpec {
                    name: "rainfall",
                    base: 2.5,
                    amplitude: 1.5,
                    period_days: 182.5,
                    drift: 0.0,
                    noise: 2.0,
                    missing_rate: 0.05,
                    floor: Some(0.0),
                },
            ],
        },
        SyntheticSpec {
            id: "energy",
            description: "Daily grid demand, solar output and spot price",
            parameters: vec![
                ParameterSpec {
                    name: "demand",
                    base: 420.0,
                    amplitude: 60.0,
                    period_days: 365.0,
                    drift: 0.05,
                    noise: 15.0,
                    missing_rate: 0.01,
                    floor: Some(0.0),
                },
                ParameterSpec {
                    name: "solar_output",
                    base: 35.0,
                    amplitude: -25.0,
                    period_days: 365.0,
                    drift: 0.01,
                    noise: 6.0,
                    missing_rate: 0.03,
                    floor: Some(0.0),
                },
                ParameterSpec {
                    name: "price",
                    base: 80.0,
                    amplitude: 20.0,
                    period_days: 365.0,
                    drift: 0.0,
                    noise: 8.0,
                    missing_rate: 0.01,
                    floor: None,
                },
            ],
        },
    ]
}

/// Generates every dataset in `default_catalog` from a single seed.
pub fn seed_datasets(start: NaiveDate, days: u32, seed: u64) -> Result<Vec<Dataset>, RegistryError> {
    let mut rng = StdRng::seed_from_u64(seed);
    default_catalog()
        .iter()
        .map(|spec| generate(spec, start, days, &mut rng))
        .collect()
}
