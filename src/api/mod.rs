mod companies;
mod health;
mod registrations;
mod students;

pub use companies::{list_companies, register_company, unregister_company};
pub use health::{health_check, root};
pub use registrations::{list_registrations, register_student, unregister_student};
pub use students::{add_student, list_students, remove_students, update_students};

use crate::store::{CompanyStore, RegistrationStore, StudentStore};

use axum::routing::{delete, get, post};
use axum::Router;
use mongodb::Database;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Plain-text body returned when a delete route is called without the
/// query parameter that scopes the deletion.
pub const INVALID_QUERY_PARAMS: &str = "Invalid Query Parameters";

/// Shared handler state: one typed store per collection, plus the raw
/// database handle for health pings and the start time for uptime.
pub struct AppState {
    pub students: StudentStore,
    pub companies: CompanyStore,
    pub registrations: RegistrationStore,
    pub database: Database,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(database: Database) -> Self {
        Self {
            students: StudentStore::new(&database),
            companies: CompanyStore::new(&database),
            registrations: RegistrationStore::new(&database),
            database,
            started_at: Instant::now(),
        }
    }
}

/// Build the application router: every route plus the CORS and trace
/// layers. Integration tests drive this same router directly.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/companies", get(list_companies))
        .route(
            "/api/companies/register",
            post(register_company).delete(unregister_company),
        )
        .route("/api/students", get(list_students))
        .route("/api/students/add", post(add_student))
        .route("/api/students/update", post(update_students))
        .route("/api/students/remove", delete(remove_students))
        .route(
            "/api/students/register",
            get(list_registrations)
                .post(register_student)
                .delete(unregister_student),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
