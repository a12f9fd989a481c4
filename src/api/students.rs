//! Student API endpoints
//!
//! - GET /api/students - List students matching optional filters
//! - POST /api/students/add - Add a new student
//! - POST /api/students/update - Update every student matching the filters
//! - DELETE /api/students/remove - Delete every student matching the filters

use crate::api::AppState;
use crate::error::{ApiError, Result};
use crate::store::{NewStudent, Student};
use crate::validate;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

// === Filters ===

#[derive(Debug, Default, Deserialize)]
pub struct StudentFilterParams {
    pub id: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub mincgpa: Option<String>,
}

/// Translate query parameters into a MongoDB filter document.
///
/// Every parameter is optional; an empty parameter set matches the whole
/// collection. `mincgpa` becomes a `$gte` range, all other parameters match
/// exactly as submitted.
fn student_filter(params: &StudentFilterParams) -> Result<Document> {
    let mut filter = Document::new();

    if let Some(id) = &params.id {
        let id = validate::parse_record_id(id).ok_or(ApiError::InvalidId)?;
        filter.insert("_id", id);
    }
    if let Some(name) = &params.name {
        filter.insert("name", name.as_str());
    }
    if let Some(department) = &params.department {
        if !validate::is_known_department(department) {
            return Err(ApiError::InvalidDepartment);
        }
        filter.insert("department", department.as_str());
    }
    if let Some(mincgpa) = &params.mincgpa {
        let min = validate::parse_cgpa(mincgpa).ok_or(ApiError::InvalidCgpa)?;
        filter.insert("cgpa", doc! { "$gte": min });
    }

    Ok(filter)
}

// === List Students ===

#[derive(Serialize)]
pub struct StudentResponse {
    pub id: String,
    pub name: String,
    pub department: String,
    pub rollno: i64,
    pub cgpa: f64,
    pub updated: String,
}

impl From<&Student> for StudentResponse {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.to_hex(),
            name: student.name.clone(),
            department: student.department.clone(),
            rollno: student.rollno,
            cgpa: student.cgpa,
            updated: student.updated.to_rfc3339(),
        }
    }
}

pub async fn list_students(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StudentFilterParams>,
) -> Result<impl IntoResponse> {
    let filter = student_filter(&params)?;
    let students = state.students.query(filter, None).await?;

    let students: Vec<StudentResponse> = students.iter().map(StudentResponse::from).collect();

    Ok((StatusCode::OK, Json(students)))
}

// === Add Student ===

/// Parse and validate the request body for a new student record.
///
/// Scalar values are accepted in either their native JSON type or as strings
/// (`"rollno": 5` and `"rollno": "5"` are equivalent), matching how loosely
/// typed clients submit these forms.
fn new_student(body: &Value) -> Result<NewStudent> {
    let fields = body.as_object().ok_or(ApiError::MissingFields)?;

    let name = fields.get("name").ok_or(ApiError::MissingFields)?;
    let department = fields.get("department").ok_or(ApiError::MissingFields)?;
    let rollno = fields.get("rollno").ok_or(ApiError::MissingFields)?;
    let cgpa = fields.get("cgpa").ok_or(ApiError::MissingFields)?;

    let department = validate::scalar_to_string(department).ok_or(ApiError::InvalidDepartment)?;
    if !validate::is_known_department(&department) {
        return Err(ApiError::InvalidDepartment);
    }
    let rollno = validate::scalar_to_string(rollno)
        .and_then(|s| validate::parse_positive_int(&s))
        .ok_or(ApiError::InvalidRollno)?;
    let cgpa = validate::scalar_to_string(cgpa)
        .and_then(|s| validate::parse_cgpa(&s))
        .ok_or(ApiError::InvalidCgpa)?;
    let name = validate::scalar_to_string(name).ok_or(ApiError::MissingFields)?;

    Ok(NewStudent {
        name,
        department,
        rollno,
        cgpa,
    })
}

pub async fn add_student(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(body) = body.map_err(|_| ApiError::JsonParse)?;

    let student = state.students.add(new_student(&body)?).await?;

    Ok((StatusCode::OK, Json(StudentResponse::from(&student))))
}

// === Update Students ===

#[derive(Serialize)]
pub struct UpdateStudentsResponse {
    pub matched: u64,
    pub modified: u64,
}

/// Build the `$set` payload for a bulk update from the request body.
///
/// Only recognized fields are carried over, each validated the same way as
/// on insert. The `updated` timestamp is always refreshed.
fn update_patch(body: &Value) -> Result<Document> {
    let fields = body.as_object().ok_or(ApiError::MissingFields)?;
    let mut patch = Document::new();

    if let Some(value) = fields.get("rollno") {
        let rollno = validate::scalar_to_string(value)
            .and_then(|s| validate::parse_positive_int(&s))
            .ok_or(ApiError::InvalidRollno)?;
        patch.insert("rollno", rollno);
    }
    if let Some(value) = fields.get("department") {
        let department = validate::scalar_to_string(value).ok_or(ApiError::InvalidDepartment)?;
        if !validate::is_known_department(&department) {
            return Err(ApiError::InvalidDepartment);
        }
        patch.insert("department", department);
    }
    if let Some(value) = fields.get("cgpa") {
        let cgpa = validate::scalar_to_string(value)
            .and_then(|s| validate::parse_cgpa(&s))
            .ok_or(ApiError::InvalidCgpa)?;
        patch.insert("cgpa", cgpa);
    }
    if let Some(value) = fields.get("name") {
        let name = validate::scalar_to_string(value).ok_or(ApiError::MissingFields)?;
        patch.insert("name", name);
    }

    patch.insert("updated", BsonDateTime::now());

    Ok(patch)
}

pub async fn update_students(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StudentFilterParams>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(body) = body.map_err(|_| ApiError::JsonParse)?;

    let filter = student_filter(&params)?;
    let patch = update_patch(&body)?;

    let outcome = state.students.update(filter, patch).await?;

    Ok((
        StatusCode::OK,
        Json(UpdateStudentsResponse {
            matched: outcome.matched_count,
            modified: outcome.modified_count,
        }),
    ))
}

// === Remove Students ===

#[derive(Serialize)]
pub struct RemoveStudentsResponse {
    pub deleted: u64,
}

pub async fn remove_students(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StudentFilterParams>,
) -> Result<impl IntoResponse> {
    let filter = student_filter(&params)?;

    let outcome = state.students.remove(filter).await?;

    Ok((
        StatusCode::OK,
        Json(RemoveStudentsResponse {
            deleted: outcome.deleted_count,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_filter_matches_whole_collection() {
        let filter = student_filter(&StudentFilterParams::default()).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn filter_accepts_24_hex_id() {
        let params = StudentFilterParams {
            id: Some("507f1f77bcf86cd799439011".into()),
            ..Default::default()
        };
        let filter = student_filter(&params).unwrap();
        assert!(filter.get_object_id("_id").is_ok());
    }

    #[test]
    fn filter_rejects_malformed_id() {
        let params = StudentFilterParams {
            id: Some("not-an-id".into()),
            ..Default::default()
        };
        assert!(matches!(student_filter(&params), Err(ApiError::InvalidId)));
    }

    #[test]
    fn filter_keeps_department_as_submitted() {
        let params = StudentFilterParams {
            department: Some("cse".into()),
            ..Default::default()
        };
        let filter = student_filter(&params).unwrap();
        assert_eq!(filter.get_str("department").unwrap(), "cse");
    }

    #[test]
    fn filter_rejects_unknown_department() {
        let params = StudentFilterParams {
            department: Some("PHY".into()),
            ..Default::default()
        };
        assert!(matches!(
            student_filter(&params),
            Err(ApiError::InvalidDepartment)
        ));
    }

    #[test]
    fn filter_turns_mincgpa_into_gte_range() {
        let params = StudentFilterParams {
            mincgpa: Some("7.5".into()),
            ..Default::default()
        };
        let filter = student_filter(&params).unwrap();
        assert_eq!(filter, doc! { "cgpa": { "$gte": 7.5 } });
    }

    #[test]
    fn filter_rejects_bad_mincgpa() {
        for bad in ["10.5", "-1", "eleven"] {
            let params = StudentFilterParams {
                mincgpa: Some(bad.into()),
                ..Default::default()
            };
            assert!(matches!(
                student_filter(&params),
                Err(ApiError::InvalidCgpa)
            ));
        }
    }

    #[test]
    fn new_student_requires_every_field() {
        let body = json!({ "name": "Ann", "department": "CSE", "rollno": 5 });
        assert!(matches!(
            new_student(&body),
            Err(ApiError::MissingFields)
        ));
    }

    #[test]
    fn new_student_accepts_native_and_string_scalars() {
        let native = json!({ "name": "Ann", "department": "CSE", "rollno": 5, "cgpa": 8.5 });
        let strings = json!({ "name": "Ann", "department": "CSE", "rollno": "5", "cgpa": "8.5" });

        let a = new_student(&native).unwrap();
        let b = new_student(&strings).unwrap();
        assert_eq!(a.rollno, 5);
        assert_eq!(b.rollno, 5);
        assert_eq!(a.cgpa, 8.5);
        assert_eq!(b.cgpa, 8.5);
    }

    #[test]
    fn new_student_keeps_department_casing() {
        let body = json!({ "name": "Ann", "department": "cse", "rollno": 5, "cgpa": 8.5 });
        let student = new_student(&body).unwrap();
        assert_eq!(student.department, "cse");
    }

    #[test]
    fn new_student_rejects_unknown_department() {
        let body = json!({ "name": "Ann", "department": "PHY", "rollno": 5, "cgpa": 8.5 });
        assert!(matches!(
            new_student(&body),
            Err(ApiError::InvalidDepartment)
        ));
    }

    #[test]
    fn new_student_rejects_non_positive_or_fractional_rollno() {
        for bad in [json!(0), json!(-3), json!(5.5), json!("5.5")] {
            let body = json!({ "name": "Ann", "department": "CSE", "rollno": bad, "cgpa": 8.5 });
            assert!(matches!(new_student(&body), Err(ApiError::InvalidRollno)));
        }
    }

    #[test]
    fn new_student_rejects_out_of_range_cgpa() {
        for bad in [json!(10.5), json!(-0.1), json!("eleven")] {
            let body = json!({ "name": "Ann", "department": "CSE", "rollno": 5, "cgpa": bad });
            assert!(matches!(new_student(&body), Err(ApiError::InvalidCgpa)));
        }
    }

    #[test]
    fn empty_patch_still_refreshes_timestamp() {
        let patch = update_patch(&json!({})).unwrap();
        assert_eq!(patch.len(), 1);
        assert!(patch.get_datetime("updated").is_ok());
    }

    #[test]
    fn patch_validates_recognized_fields() {
        assert!(matches!(
            update_patch(&json!({ "rollno": 0 })),
            Err(ApiError::InvalidRollno)
        ));
        assert!(matches!(
            update_patch(&json!({ "department": "LAW" })),
            Err(ApiError::InvalidDepartment)
        ));
        assert!(matches!(
            update_patch(&json!({ "cgpa": 12 })),
            Err(ApiError::InvalidCgpa)
        ));
    }

    #[test]
    fn patch_casts_string_scalars() {
        let patch = update_patch(&json!({ "rollno": "7", "cgpa": "9.1" })).unwrap();
        assert_eq!(patch.get_i64("rollno").unwrap(), 7);
        assert_eq!(patch.get_f64("cgpa").unwrap(), 9.1);
    }

    #[test]
    fn patch_ignores_unrecognized_fields() {
        let patch = update_patch(&json!({ "nickname": "A", "cgpa": 9.0 })).unwrap();
        assert!(!patch.contains_key("nickname"));
        assert_eq!(patch.get_f64("cgpa").unwrap(), 9.0);
    }
}
