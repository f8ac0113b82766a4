use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Transaction, TypeFilter};
use crate::services::session::Session;
use crate::services::statement::{self, LoadedTransactions, PageInfo, StatementQuery, Summary};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StatementParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<String>,
}

impl StatementParams {
    fn to_query(&self) -> Result<StatementQuery, AppError> {
        let type_filter = match self.kind.as_deref() {
            Some(raw) => TypeFilter::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("unknown type filter: {raw}")))?,
            None => TypeFilter::All,
        };

        Ok(StatementQuery {
            search: self.q.clone().unwrap_or_default(),
            type_filter,
            from: parse_day(self.from.as_deref(), "from")?,
            to: parse_day(self.to.as_deref(), "to")?,
        })
    }
}

/// Requested page; absent means the first. Zero or past-the-end pages are
/// reset later, once the filtered count is known.
fn parse_page(raw: Option<&str>) -> Result<usize, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s
            .parse()
            .map_err(|_| AppError::Validation("`page` must be a whole number".to_string())),
        None => Ok(1),
    }
}

fn parse_day(raw: Option<&str>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::Validation(format!("`{name}` must be a YYYY-MM-DD date"))),
        None => Ok(None),
    }
}

fn load(state: &AppState, session: &Session) -> Result<LoadedTransactions, AppError> {
    let db = state.conn()?;
    Ok(statement::load_transactions(
        &db,
        session.uid(),
        state.config.statement_sample_fallback,
        &Utc::now(),
    ))
}

// GET /api/statement
#[derive(Serialize)]
pub struct StatementResponse {
    transactions: Vec<Transaction>,
    summary: Summary,
    pagination: PageInfo,
    type_filter: TypeFilter,
    sample: bool,
}

pub async fn get_statement(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(params): Query<StatementParams>,
) -> Result<Json<StatementResponse>, AppError> {
    let query = params.to_query()?;
    let page = parse_page(params.page.as_deref())?;
    let loaded = load(&state, &session)?;

    let filtered = statement::filter_transactions(&loaded.transactions, &query);
    let summary = statement::summarize(filtered.iter().copied());
    let (visible, pagination) =
        statement::paginate(&filtered, page, state.config.statement_page_size);

    Ok(Json(StatementResponse {
        transactions: visible.into_iter().cloned().collect(),
        summary,
        pagination,
        type_filter: query.type_filter,
        sample: loaded.sample,
    }))
}

// GET /api/statement/export
pub async fn export_statement(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(params): Query<StatementParams>,
) -> Result<Response, AppError> {
    let query = params.to_query()?;
    let loaded = load(&state, &session)?;

    let filtered = statement::filter_transactions(&loaded.transactions, &query);
    let csv = statement::export_csv(&filtered)?;
    let filename = statement::export_filename(session.uid(), &Utc::now());

    tracing::info!(rows = filtered.len(), file = %filename, "statement exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
