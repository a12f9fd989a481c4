//! Registration records: student-to-company links for placement drives.
//!
//! Creation is an upsert keyed on the (student_Id, company_Id) pair, so
//! registering twice refreshes the existing link instead of duplicating it.
//! Neither id is enforced as a foreign key; a registration may outlive the
//! records it points at.

use crate::error::{ApiError, Result};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::results::DeleteResult;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const COLLECTION: &str = "registrations";

/// A document in the `registrations` collection. The `student_Id` /
/// `company_Id` field casing is the wire format inherited with the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "student_Id")]
    pub student_id: ObjectId,
    #[serde(rename = "company_Id")]
    pub company_id: ObjectId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated: DateTime<Utc>,
}

#[derive(Clone)]
pub struct RegistrationStore {
    collection: Collection<Registration>,
}

impl RegistrationStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Register a student for a company. Upserts on the (student, company)
    /// pair: an existing link gets its `updated` timestamp refreshed, a new
    /// pair gets inserted. Returns the stored record either way.
    pub async fn add(&self, student_id: ObjectId, company_id: ObjectId) -> Result<Registration> {
        let filter = doc! { "student_Id": student_id, "company_Id": company_id };
        let update = doc! {
            "$set": {
                "student_Id": student_id,
                "company_Id": company_id,
                "updated": BsonDateTime::now(),
            }
        };

        let result = self
            .collection
            .update_one(filter.clone(), update)
            .upsert(true)
            .await?;

        if result.matched_count == 0 {
            info!(
                "registered student {} for company {}",
                student_id.to_hex(),
                company_id.to_hex()
            );
        } else {
            info!(
                "refreshed registration of student {} for company {}",
                student_id.to_hex(),
                company_id.to_hex()
            );
        }

        self.collection
            .find_one(filter)
            .await?
            .ok_or_else(|| ApiError::Database("upserted registration not found".to_string()))
    }

    /// All registrations matching `filter`. An empty filter matches the
    /// whole collection, capped by `limit` when one is given.
    pub async fn query(&self, filter: Document, limit: Option<i64>) -> Result<Vec<Registration>> {
        let mut find = self.collection.find(filter);
        if let Some(n) = limit {
            find = find.limit(n);
        }

        let registrations: Vec<Registration> = find.await?.try_collect().await?;

        debug!("registration query matched {} records", registrations.len());
        Ok(registrations)
    }

    /// Delete every registration matching `filter`.
    pub async fn remove(&self, filter: Document) -> Result<DeleteResult> {
        let result = self.collection.delete_many(filter).await?;

        info!("removed {} registrations", result.deleted_count);
        Ok(result)
    }
}
