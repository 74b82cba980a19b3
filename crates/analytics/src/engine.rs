use crate::correlation::{Interpretation, pearson};
use crate::descriptive::{count_anomalies, describe};
use crate::error::AnalyticsError;
use crate::moving_average::moving_average;
use crate::report::{CorrelationReport, SummaryReport, TrendPoint};
use crate::series::{extract, filter_by_date, present};
use core_types::{DateRange, Dataset, ParameterId};

/// A stateless calculator for deriving statistics from a dataset snapshot.
///
/// Parameter names are resolved to `ParameterId`s by the caller, so every
/// method here works on already-validated columns.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptive statistics and anomaly count for one parameter.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The dataset snapshot to read from.
    /// * `param` - The resolved parameter column.
    /// * `range` - Inclusive date bounds applied before extraction.
    ///
    /// # Returns
    ///
    /// `AnalyticsError::NoData` if no present values remain after filtering.
    pub fn summary(
        &self,
        dataset: &Dataset,
        param: ParameterId,
        range: DateRange,
    ) -> Result<SummaryReport, AnalyticsError> {
        let records = filter_by_date(dataset.records(), range);
        let values = present(&extract(records, param));

        let stats = describe(&values)?;
        let anomalies = count_anomalies(&values, stats.mean, stats.stddev);

        tracing::debug!(
            dataset = dataset.id(),
            parameter = dataset.schema().name(param),
            count = stats.count,
            anomalies,
            "Computed summary."
        );

        Ok(SummaryReport {
            mean: stats.mean,
            median: stats.median,
            stddev: stats.stddev,
            min: stats.min,
            max: stats.max,
            count: stats.count,
            anomalies,
        })
    }

    /// One `TrendPoint` per record in range, with a trailing moving average.
    pub fn trend(
        &self,
        dataset: &Dataset,
        param: ParameterId,
        range: DateRange,
        window: usize,
    ) -> Result<Vec<TrendPoint>, AnalyticsError> {
        let records = filter_by_date(dataset.records(), range);
        let series = extract(records, param);
        if series.iter().all(Option::is_none) {
            return Err(AnalyticsError::NoData);
        }

        let averages = moving_average(&series, window)?;

        tracing::debug!(
            dataset = dataset.id(),
            parameter = dataset.schema().name(param),
            points = series.len(),
            window,
            "Computed trend."
        );

        Ok(records
            .iter()
            .zip(series)
            .zip(averages)
            .map(|((record, value), moving_average)| TrendPoint {
                date: record.date,
                value,
                moving_average,
            })
            .collect())
    }

    /// Pearson correlation between two parameters.
    ///
    /// Only dates on which both parameters are present contribute.
    pub fn correlation(
        &self,
        dataset: &Dataset,
        x: ParameterId,
        y: ParameterId,
        range: DateRange,
    ) -> Result<CorrelationReport, AnalyticsError> {
        let records = filter_by_date(dataset.records(), range);
        let (xs, ys): (Vec<f64>, Vec<f64>) = extract(records, x)
            .into_iter()
            .zip(extract(records, y))
            .filter_map(|pair| match pair {
                (Some(a), Some(b)) => Some((a, b)),
                _ => None,
            })
            .unzip();

        let r = pearson(&xs, &ys)?;

        tracing::debug!(
            dataset = dataset.id(),
            x = dataset.schema().name(x),
            y = dataset.schema().name(y),
            pairs = xs.len(),
            r,
            "Computed correlation."
        );

        Ok(CorrelationReport {
            r,
            interpretation: Interpretation::from_r(r),
            count: xs.len(),
        })
    }
}
