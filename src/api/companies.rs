//! Company API endpoints
//!
//! - GET /api/companies - List companies matching optional filters
//! - POST /api/companies/register - Register a company placement drive
//! - DELETE /api/companies/register - Delete a company and its registrations

use crate::api::{AppState, INVALID_QUERY_PARAMS};
use crate::error::{ApiError, Result};
use crate::store::{Company, NewCompany};
use crate::validate;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

// === Filters ===

#[derive(Debug, Default, Deserialize)]
pub struct CompanyFilterParams {
    pub id: Option<String>,
    pub name: Option<String>,
    pub date: Option<String>,
}

fn company_filter(params: &CompanyFilterParams) -> Result<Document> {
    let mut filter = Document::new();

    if let Some(id) = &params.id {
        let id = validate::parse_record_id(id).ok_or(ApiError::InvalidId)?;
        filter.insert("_id", id);
    }
    if let Some(name) = &params.name {
        filter.insert("name", name.as_str());
    }
    if let Some(date) = &params.date {
        // Dates are stored verbatim, so the filter compares the raw string.
        filter.insert("placement_date", date.as_str());
    }

    Ok(filter)
}

// === List Companies ===

#[derive(Serialize)]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    pub placement_date: String,
    pub updated: String,
}

impl From<&Company> for CompanyResponse {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id.to_hex(),
            name: company.name.clone(),
            placement_date: company.placement_date.clone(),
            updated: company.updated.to_rfc3339(),
        }
    }
}

pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CompanyFilterParams>,
) -> Result<impl IntoResponse> {
    let filter = company_filter(&params)?;
    let companies = state.companies.query(filter, None).await?;

    let companies: Vec<CompanyResponse> = companies.iter().map(CompanyResponse::from).collect();

    Ok((StatusCode::OK, Json(companies)))
}

// === Register Company ===

/// Parse and validate the request body for a new company drive.
///
/// The placement date must parse as `MM-DD-YYYY` or `YYYY-MM-DD` and lie
/// strictly in the future; the submitted string is stored unchanged.
fn new_company(body: &Value) -> Result<NewCompany> {
    let fields = body.as_object().ok_or(ApiError::MissingFields)?;

    let name = fields.get("name").ok_or(ApiError::MissingFields)?;
    let placement_date = fields.get("placement_date").ok_or(ApiError::MissingFields)?;

    let placement_date =
        validate::scalar_to_string(placement_date).ok_or(ApiError::InvalidPlacementDate)?;
    if !validate::is_future_date(&placement_date) {
        return Err(ApiError::InvalidPlacementDate);
    }
    let name = validate::scalar_to_string(name).ok_or(ApiError::MissingFields)?;

    Ok(NewCompany {
        name,
        placement_date,
    })
}

pub async fn register_company(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(body) = body.map_err(|_| ApiError::JsonParse)?;

    let company = state.companies.add(new_company(&body)?).await?;

    Ok((StatusCode::OK, Json(CompanyResponse::from(&company))))
}

// === Unregister Company ===

#[derive(Debug, Default, Deserialize)]
pub struct UnregisterCompanyParams {
    pub cid: Option<String>,
}

#[derive(Serialize)]
pub struct UnregisterCompanyResponse {
    pub companies_removed: u64,
    pub registrations_removed: u64,
}

/// Delete a company by id, then every registration that references it.
///
/// The two deletes are not transactional; a failure between them leaves the
/// registrations behind for a retry.
pub async fn unregister_company(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UnregisterCompanyParams>,
) -> Result<Response> {
    let Some(cid) = &params.cid else {
        return Ok((StatusCode::BAD_REQUEST, INVALID_QUERY_PARAMS).into_response());
    };
    let company_id = validate::parse_record_id(cid).ok_or(ApiError::InvalidId)?;

    let companies = state.companies.remove(doc! { "_id": company_id }).await?;
    let registrations = state
        .registrations
        .remove(doc! { "company_Id": company_id })
        .await?;

    info!(
        "Unregistered company {}: removed {} company record(s) and {} registration(s)",
        cid, companies.deleted_count, registrations.deleted_count
    );

    Ok((
        StatusCode::OK,
        Json(UnregisterCompanyResponse {
            companies_removed: companies.deleted_count,
            registrations_removed: registrations.deleted_count,
        }),
    )
        .into_response())
}
