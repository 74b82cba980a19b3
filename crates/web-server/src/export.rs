use crate::error::AppError;
use core_types::DatedRecord;
use core_types::ParameterId;

/// Renders one parameter as CSV: a `date,<parameter>` header followed by one
/// row per record. Absent readings become empty fields.
pub fn to_csv(
    records: &[DatedRecord],
    param: ParameterId,
    parameter_name: &str,
) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["date", parameter_name])
        .map_err(|e| AppError::Export(e.to_string()))?;

    for record in records {
        let value = record.value(param).map(|v| v.to_string()).unwrap_or_default();
        writer
            .write_record([record.date.to_string(), value])
            .map_err(|e| AppError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Export(e.to_string()))
}
