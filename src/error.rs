use crate::validate::DEPARTMENTS;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON String")]
    JsonParse,

    #[error("JSON data does not meet minimum required conditions")]
    MissingFields,

    #[error("Id is not a valid record id")]
    InvalidId,

    #[error("Department is not valid")]
    InvalidDepartment,

    #[error("RollNumber is not a positive integer")]
    InvalidRollno,

    #[error("CGPA is not a positive float")]
    InvalidCgpa,

    #[error("Date is either invalid or has passed")]
    InvalidPlacementDate,

    #[error("Database error: {0}")]
    Database(String),
}

/// Error body: a fixed message/explanation/remedy triple per kind.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub explanation: String,
    pub remedy: String,
}

impl ErrorResponse {
    fn new(error: &str, message: &str, explanation: &str, remedy: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            explanation: explanation.to_string(),
            remedy: remedy.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::JsonParse => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "invalid_json",
                    "Invalid JSON String",
                    "The request body is not a valid JSON string",
                    "Verify the request body",
                ),
            ),
            ApiError::MissingFields => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "missing_required_fields",
                    "JSON data does not meet minimum required conditions",
                    "JSON is missing some required key fields",
                    "Verify that the JSON contains all required keys",
                ),
            ),
            ApiError::InvalidId => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "invalid_id",
                    "Id is not a valid record id",
                    "Record ids are 24-character hex strings",
                    "Check the id specified",
                ),
            ),
            ApiError::InvalidDepartment => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "invalid_department",
                    "Department is not valid",
                    "Department entered does not match any possible departments",
                    &format!("Allowed departments are {:?}", DEPARTMENTS),
                ),
            ),
            ApiError::InvalidRollno => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "invalid_rollno",
                    "RollNumber is not a positive integer",
                    "RollNumber of a student must be a positive integer",
                    "Verify that rollno is a positive integer",
                ),
            ),
            ApiError::InvalidCgpa => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "invalid_cgpa",
                    "CGPA is not a positive float",
                    "CGPA of a student must be a positive float between 0 and 10",
                    "Verify that CGPA is a positive float within the boundary",
                ),
            ),
            ApiError::InvalidPlacementDate => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "invalid_placement_date",
                    "Date is either invalid or has passed",
                    "Date format is wrong or is a past date",
                    "Check the date. Correct format: mm-dd-yyyy",
                ),
            ),
            ApiError::Database(cause) => {
                // The driver error is logged here, never echoed to the client.
                error!("database operation failed: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "database_error",
                        "Database operation failed",
                        "The request could not be completed against the data store",
                        "Retry the request; contact the operator if the problem persists",
                    ),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        ApiError::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
