//! Registration API endpoints
//!
//! Registrations link a student to a company drive and live under the
//! student route namespace:
//!
//! - GET /api/students/register - List registrations matching optional filters
//! - POST /api/students/register - Register a student with a company (upsert)
//! - DELETE /api/students/register - Remove a student's registrations

use crate::api::{AppState, INVALID_QUERY_PARAMS};
use crate::error::{ApiError, Result};
use crate::store::Registration;
use crate::validate;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// === Filters ===

#[derive(Debug, Default, Deserialize)]
pub struct RegistrationFilterParams {
    pub sid: Option<String>,
    pub cid: Option<String>,
}

fn registration_filter(params: &RegistrationFilterParams) -> Result<Document> {
    let mut filter = Document::new();

    if let Some(sid) = &params.sid {
        let sid = validate::parse_record_id(sid).ok_or(ApiError::InvalidId)?;
        filter.insert("student_Id", sid);
    }
    if let Some(cid) = &params.cid {
        let cid = validate::parse_record_id(cid).ok_or(ApiError::InvalidId)?;
        filter.insert("company_Id", cid);
    }

    Ok(filter)
}

// === List Registrations ===

#[derive(Serialize)]
pub struct RegistrationResponse {
    pub id: String,
    #[serde(rename = "student_Id")]
    pub student_id: String,
    #[serde(rename = "company_Id")]
    pub company_id: String,
    pub updated: String,
}

impl From<&Registration> for RegistrationResponse {
    fn from(registration: &Registration) -> Self {
        Self {
            id: registration.id.to_hex(),
            student_id: registration.student_id.to_hex(),
            company_id: registration.company_id.to_hex(),
            updated: registration.updated.to_rfc3339(),
        }
    }
}

pub async fn list_registrations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RegistrationFilterParams>,
) -> Result<impl IntoResponse> {
    let filter = registration_filter(&params)?;
    let registrations = state.registrations.query(filter, None).await?;

    let registrations: Vec<RegistrationResponse> =
        registrations.iter().map(RegistrationResponse::from).collect();

    Ok((StatusCode::OK, Json(registrations)))
}

// === Register Student ===

/// Register a student with a company. Registering the same pair again
/// refreshes the existing record instead of duplicating it.
///
/// A missing id fails the same check as a malformed one, so both report
/// `invalid_id`.
pub async fn register_student(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RegistrationFilterParams>,
) -> Result<impl IntoResponse> {
    let student_id = params
        .sid
        .as_deref()
        .and_then(validate::parse_record_id)
        .ok_or(ApiError::InvalidId)?;
    let company_id = params
        .cid
        .as_deref()
        .and_then(validate::parse_record_id)
        .ok_or(ApiError::InvalidId)?;

    let registration = state.registrations.add(student_id, company_id).await?;

    Ok((StatusCode::OK, Json(RegistrationResponse::from(&registration))))
}

// === Unregister Student ===

#[derive(Serialize)]
pub struct RemoveRegistrationsResponse {
    pub deleted: u64,
}

/// Remove a student's registrations, optionally scoped to one company.
///
/// `cid` is checked before the `sid` presence test, so an invalid `cid`
/// outranks a missing `sid`.
pub async fn unregister_student(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RegistrationFilterParams>,
) -> Result<Response> {
    let mut filter = Document::new();

    if let Some(cid) = &params.cid {
        let cid = validate::parse_record_id(cid).ok_or(ApiError::InvalidId)?;
        filter.insert("company_Id", cid);
    }

    let Some(sid) = &params.sid else {
        return Ok((StatusCode::BAD_REQUEST, INVALID_QUERY_PARAMS).into_response());
    };
    let sid = validate::parse_record_id(sid).ok_or(ApiError::InvalidId)?;
    filter.insert("student_Id", sid);

    let outcome = state.registrations.remove(filter).await?;

    Ok((
        StatusCode::OK,
        Json(RemoveRegistrationsResponse {
            deleted: outcome.deleted_count,
        }),
    )
        .into_response())
}
