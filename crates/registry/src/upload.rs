use crate::error::RegistryError;
use chrono::NaiveDate;
use core_types::{Dataset, DatasetSchema, DatedRecord};
use serde::Deserialize;
use std::collections::BTreeMap;

/// The JSON body accepted when registering a dataset.
///
/// ```json
/// {
///   "id": "river",
///   "description": "Gauge readings",
///   "parameters": ["level", "flow"],
///   "records": [
///     { "date": "2024-01-01", "values": { "level": 1.2, "flow": null } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetUpload {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub parameters: Vec<String>,
    pub records: Vec<RecordUpload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordUpload {
    pub date: String,
    /// Missing keys and explicit `null`s are both treated as absent.
    #[serde(default)]
    pub values: BTreeMap<String, Option<f64>>,
}

impl DatasetUpload {
    /// Validates the payload and converts it into a `Dataset`.
    ///
    /// Records may arrive in any order; they are sorted by date. Duplicate
    /// dates, undeclared parameter keys and non-finite values are rejected.
    pub fn into_dataset(self) -> Result<Dataset, RegistryError> {
        let schema = DatasetSchema::new(self.parameters)?;

        let mut records = self
            .records
            .into_iter()
            .map(|record| to_record(&schema, record))
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by_key(|r| r.date);

        if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(RegistryError::InvalidPayload(format!(
                "date {} appears more than once",
                pair[0].date
            )));
        }

        Ok(Dataset::new(self.id, self.description, schema, records)?)
    }
}

fn to_record(schema: &DatasetSchema, upload: RecordUpload) -> Result<DatedRecord, RegistryError> {
    let date = NaiveDate::parse_from_str(upload.date.trim(), "%Y-%m-%d").map_err(|_| {
        RegistryError::InvalidPayload(format!("invalid date '{}', expected YYYY-MM-DD", upload.date))
    })?;

    let mut values = vec![None; schema.len()];
    for (name, value) in upload.values {
        let param = schema.resolve(&name).map_err(|_| {
            RegistryError::InvalidPayload(format!(
                "record for {date} has undeclared parameter '{name}'"
            ))
        })?;
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(RegistryError::InvalidPayload(format!(
                    "value of '{name}' on {date} is not a finite number"
                )));
            }
        }
        values[param.index()] = value;
    }

    Ok(DatedRecord::new(date, values))
}
