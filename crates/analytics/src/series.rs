use core_types::{DateRange, DatedRecord, ParameterId};

/// Selects the records whose date falls inside `range` (inclusive).
///
/// Records must already be in ascending date order, which lets the bounds be
/// located by binary search and the result be returned as a contiguous slice.
/// An unbounded range returns the input unchanged.
pub fn filter_by_date(records: &[DatedRecord], range: DateRange) -> &[DatedRecord] {
    let start = match range.from {
        Some(from) => records.partition_point(|r| r.date < from),
        None => 0,
    };
    let end = match range.to {
        Some(to) => records.partition_point(|r| r.date <= to),
        None => records.len(),
    };

    if start >= end {
        return &[];
    }
    &records[start..end]
}

/// Projects one parameter out of a record sequence, preserving order and length.
pub fn extract(records: &[DatedRecord], param: ParameterId) -> Vec<Option<f64>> {
    records.iter().map(|r| r.value(param)).collect()
}

/// Drops absent readings from an extracted series.
pub fn present(series: &[Option<f64>]) -> Vec<f64> {
    series.iter().flatten().copied().collect()
}
