use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A resolved handle to one parameter column of a dataset.
///
/// Only `DatasetSchema::resolve` hands these out, so holding one means the
/// parameter name has already been validated against the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterId(usize);

impl ParameterId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single day of observations.
///
/// `values` is positionally aligned with the owning dataset's schema; a
/// missing reading is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedRecord {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

impl DatedRecord {
    pub fn new(date: NaiveDate, values: Vec<Option<f64>>) -> Self {
        Self { date, values }
    }

    /// The reading for `param`, or `None` if it was not observed on this day.
    pub fn value(&self, param: ParameterId) -> Option<f64> {
        self.values.get(param.index()).copied().flatten()
    }
}

/// The declared parameter names of a dataset, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSchema {
    parameters: Vec<String>,
}

impl DatasetSchema {
    pub fn new(parameters: Vec<String>) -> Result<Self, CoreError> {
        if parameters.is_empty() {
            return Err(CoreError::InvalidDataset(
                "a dataset must declare at least one parameter".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &parameters {
            if name.trim().is_empty() {
                return Err(CoreError::InvalidDataset(
                    "parameter names must not be blank".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(CoreError::InvalidDataset(format!(
                    "parameter '{name}' is declared more than once"
                )));
            }
        }
        Ok(Self { parameters })
    }

    /// Looks up a parameter by name.
    pub fn resolve(&self, name: &str) -> Result<ParameterId, CoreError> {
        self.parameters
            .iter()
            .position(|p| p == name)
            .map(ParameterId)
            .ok_or_else(|| CoreError::UnknownParameter(name.to_string()))
    }

    pub fn name(&self, param: ParameterId) -> &str {
        &self.parameters[param.index()]
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Iterates over every parameter with its resolved id.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterId, &str)> {
        self.parameters
            .iter()
            .enumerate()
            .map(|(i, name)| (ParameterId(i), name.as_str()))
    }
}

/// A named, chronologically ordered collection of records.
///
/// Only constructed through `Dataset::new`, which enforces the ordering that
/// date filtering relies on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    id: String,
    description: String,
    schema: DatasetSchema,
    records: Vec<DatedRecord>,
}

impl Dataset {
    /// Builds a dataset, checking that every record matches the schema width
    /// and that dates are strictly ascending.
    ///
    /// Ids are limited to ASCII letters, digits, `_` and `-` because they end up
    /// in URLs and download file names.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        schema: DatasetSchema,
        records: Vec<DatedRecord>,
    ) -> Result<Self, CoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::InvalidDataset(
                "dataset id must not be blank".to_string(),
            ));
        }
        if !id.chars().all(is_id_char) {
            return Err(CoreError::InvalidDataset(format!(
                "dataset id '{}' may only contain ASCII letters, digits, '_' and '-'",
                id.escape_debug()
            )));
        }

        for record in &records {
            if record.values.len() != schema.len() {
                return Err(CoreError::InvalidDataset(format!(
                    "record for {} has {} values but the schema declares {}",
                    record.date,
                    record.values.len(),
                    schema.len()
                )));
            }
        }

        if let Some(pair) = records.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(CoreError::InvalidDataset(format!(
                "records must be strictly ascending by date ({} is followed by {})",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self {
            id,
            description: description.into(),
            schema,
            records,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    pub fn records(&self) -> &[DatedRecord] {
        &self.records
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn schema() -> DatasetSchema {
        DatasetSchema::new(vec!["temperature".into(), "humidity".into()]).unwrap()
    }

    #[test]
    fn resolve_known_and_unknown_parameters() {
        let schema = schema();
        let humidity = schema.resolve("humidity").unwrap();
        assert_eq!(humidity.index(), 1);
        assert_eq!(schema.name(humidity), "humidity");
        assert_eq!(
            schema.resolve("pressure"),
            Err(CoreError::UnknownParameter("pressure".into()))
        );
    }

    #[test]
    fn schema_rejects_duplicates_and_empty() {
        assert!(DatasetSchema::new(vec![]).is_err());
        assert!(DatasetSchema::new(vec!["a".into(), "a".into()]).is_err());
        assert!(DatasetSchema::new(vec![" ".into()]).is_err());
    }

    #[test]
    fn record_value_lookup_handles_absence() {
        let schema = schema();
        let record = DatedRecord::new(day(1), vec![Some(3.5), None]);
        assert_eq!(record.value(schema.resolve("temperature").unwrap()), Some(3.5));
        assert_eq!(record.value(schema.resolve("humidity").unwrap()), None);
    }

    #[test]
    fn dataset_rejects_width_mismatch() {
        let records = vec![DatedRecord::new(day(1), vec![Some(1.0)])];
        let err = Dataset::new("weather", "", schema(), records).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDataset(_)));
    }

    #[test]
    fn dataset_rejects_unordered_or_duplicate_dates() {
        let unordered = vec![
            DatedRecord::new(day(2), vec![None, None]),
            DatedRecord::new(day(1), vec![None, None]),
        ];
        assert!(Dataset::new("weather", "", schema(), unordered).is_err());

        let duplicate = vec![
            DatedRecord::new(day(1), vec![None, None]),
            DatedRecord::new(day(1), vec![None, None]),
        ];
        assert!(Dataset::new("weather", "", schema(), duplicate).is_err());
    }

    #[test]
    fn dataset_id_charset() {
        for id in ["weather", "energy-2024", "river_gauge_7"] {
            assert!(Dataset::new(id, "", schema(), vec![]).is_ok(), "{id}");
        }
        for id in ["line\nid", "quote\"id", "a b", "dir/file", "caf\u{e9}", "  "] {
            let err = Dataset::new(id, "", schema(), vec![]).unwrap_err();
            assert!(matches!(err, CoreError::InvalidDataset(_)), "{id:?}");
        }
    }

    #[test]
    fn dataset_reports_date_span() {
        let records = vec![
            DatedRecord::new(day(1), vec![Some(1.0), None]),
            DatedRecord::new(day(5), vec![Some(2.0), Some(4.0)]),
        ];
        let dataset = Dataset::new("weather", "daily readings", schema(), records).unwrap();
        assert_eq!(dataset.first_date(), Some(day(1)));
        assert_eq!(dataset.last_date(), Some(day(5)));
        assert_eq!(dataset.records().len(), 2);
    }
}
