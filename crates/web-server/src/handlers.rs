use crate::{AppState, error::AppError, export};
use analytics::{AnalyticsError, CorrelationReport, SummaryReport, TrendPoint, filter_by_date};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use core_types::{DateRange, Dataset, ParameterId};
use registry::{DatasetInfo, DatasetUpload, RegistryError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query string shared by the single-parameter endpoints.
#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    pub param: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub param: Option<String>,
    pub window: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CorrelationQuery {
    pub x: Option<String>,
    pub y: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub dataset: String,
    pub parameter: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(flatten)]
    pub summary: SummaryReport,
    pub insight: String,
}

#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub dataset: String,
    pub parameter: String,
    pub window: usize,
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
pub struct CorrelationResponse {
    pub dataset: String,
    pub x: String,
    pub y: String,
    #[serde(flatten)]
    pub correlation: CorrelationReport,
}

/// # GET /api/datasets
pub async fn list_datasets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DatasetInfo>>, AppError> {
    Ok(Json(state.repo.list()?))
}

/// # POST /api/datasets
/// Registers a dataset, or replaces the one with the same id.
pub async fn create_dataset(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DatasetUpload>, JsonRejection>,
) -> Result<(StatusCode, Json<DatasetInfo>), AppError> {
    let Json(upload) =
        payload.map_err(|e| RegistryError::InvalidPayload(e.body_text()))?;
    let dataset = upload.into_dataset()?;
    let info = DatasetInfo::from(&dataset);

    let replaced = state.repo.insert(dataset)?;
    let status = if replaced {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(info)))
}

/// # GET /api/datasets/:id
pub async fn get_dataset(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatasetInfo>, AppError> {
    let dataset = state.repo.get(&id)?;
    Ok(Json(DatasetInfo::from(dataset.as_ref())))
}

/// # GET /api/datasets/:id/summary?param=&from=&to=
pub async fn get_summary(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<SummaryResponse>, AppError> {
    let dataset = state.repo.get(&id)?;
    let (param, name) = resolve(&dataset, query.param, "param")?;
    let range = DateRange::parse(query.from.as_deref(), query.to.as_deref())?;

    let digits = state.analysis.display_precision;
    let summary = state.engine.summary(&dataset, param, range)?;

    Ok(Json(SummaryResponse {
        dataset: id,
        insight: summary.insight(&name, digits),
        summary: summary.rounded(digits),
        parameter: name,
        from: range.from,
        to: range.to,
    }))
}

/// # GET /api/datasets/:id/trend?param=&window=&from=&to=
pub async fn get_trend(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<TrendResponse>, AppError> {
    let dataset = state.repo.get(&id)?;
    let (param, name) = resolve(&dataset, query.param, "param")?;
    let range = DateRange::parse(query.from.as_deref(), query.to.as_deref())?;
    let window = parse_window(query.window.as_deref(), state.analysis.default_window)?;

    let digits = state.analysis.display_precision;
    let points = state
        .engine
        .trend(&dataset, param, range, window)?
        .iter()
        .map(|p| p.rounded(digits))
        .collect();

    Ok(Json(TrendResponse {
        dataset: id,
        parameter: name,
        window,
        points,
    }))
}

/// # GET /api/datasets/:id/correlation?x=&y=&from=&to=
pub async fn get_correlation(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<CorrelationQuery>,
) -> Result<Json<CorrelationResponse>, AppError> {
    let dataset = state.repo.get(&id)?;
    let (x, x_name) = resolve(&dataset, query.x, "x")?;
    let (y, y_name) = resolve(&dataset, query.y, "y")?;
    let range = DateRange::parse(query.from.as_deref(), query.to.as_deref())?;

    let correlation = state.engine.correlation(&dataset, x, y, range)?;

    Ok(Json(CorrelationResponse {
        dataset: id,
        x: x_name,
        y: y_name,
        correlation: correlation.rounded(state.analysis.display_precision),
    }))
}

/// # GET /api/datasets/:id/export?param=&from=&to=
/// Downloads the raw filtered series as CSV.
pub async fn export_csv(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeriesQuery>,
) -> Result<Response, AppError> {
    let dataset = state.repo.get(&id)?;
    let (param, name) = resolve(&dataset, query.param, "param")?;
    let range = DateRange::parse(query.from.as_deref(), query.to.as_deref())?;

    let records = filter_by_date(dataset.records(), range);
    if records.is_empty() {
        return Err(AnalyticsError::NoData.into());
    }
    let body = export::to_csv(records, param, &name)?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                download_name(dataset.id(), &name)
            ),
        ),
    ];
    Ok((headers, body).into_response())
}

/// `<dataset>_<parameter>.csv`, with anything outside `[A-Za-z0-9._-]` replaced
/// by `_` so the name is always a valid quoted header value.
fn download_name(dataset: &str, parameter: &str) -> String {
    format!("{dataset}_{parameter}.csv")
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}

/// Checks a required parameter-name query value against the dataset schema.
fn resolve(
    dataset: &Dataset,
    raw: Option<String>,
    field: &'static str,
) -> Result<(ParameterId, String), AppError> {
    let name = raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(AppError::MissingParameter(field))?;
    let param = dataset.schema().resolve(&name)?;
    Ok((param, name))
}

fn parse_window(raw: Option<&str>, default: usize) -> Result<usize, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => match s.parse::<usize>() {
            Ok(w) if w > 0 => Ok(w),
            _ => Err(AppError::InvalidQuery(format!(
                "window must be a positive integer, got '{s}'"
            ))),
        },
    }
}
