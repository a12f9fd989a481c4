//! Student records and their collection store.

use crate::error::Result;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::results::{DeleteResult, UpdateResult};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const COLLECTION: &str = "students";

/// A document in the `students` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    /// Stored exactly as submitted; membership in the allowed set is checked
    /// case-insensitively at the router.
    pub department: String,
    pub rollno: i64,
    pub cgpa: f64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated: DateTime<Utc>,
}

/// Field values for a new student; the store assigns the id and timestamp.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub department: String,
    pub rollno: i64,
    pub cgpa: f64,
}

#[derive(Clone)]
pub struct StudentStore {
    collection: Collection<Student>,
}

impl StudentStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Persist a new student record.
    pub async fn add(&self, new: NewStudent) -> Result<Student> {
        let student = Student {
            id: ObjectId::new(),
            name: new.name,
            department: new.department,
            rollno: new.rollno,
            cgpa: new.cgpa,
            updated: Utc::now(),
        };

        self.collection.insert_one(&student).await?;

        info!("added student {} ({})", student.id.to_hex(), student.name);
        Ok(student)
    }

    /// All students matching `filter`. An empty filter matches the whole
    /// collection, capped by `limit` when one is given.
    pub async fn query(&self, filter: Document, limit: Option<i64>) -> Result<Vec<Student>> {
        let mut find = self.collection.find(filter);
        if let Some(n) = limit {
            find = find.limit(n);
        }

        let students: Vec<Student> = find.await?.try_collect().await?;

        debug!("student query matched {} records", students.len());
        Ok(students)
    }

    /// Apply the `$set` patch to every student matching `filter`. Documents
    /// are updated one by one; a mid-flight failure leaves earlier matches
    /// already updated.
    pub async fn update(&self, filter: Document, patch: Document) -> Result<UpdateResult> {
        let result = self
            .collection
            .update_many(filter, doc! { "$set": patch })
            .await?;

        info!(
            "student update matched {}, modified {}",
            result.matched_count, result.modified_count
        );
        Ok(result)
    }

    /// Delete every student matching `filter`.
    pub async fn remove(&self, filter: Document) -> Result<DeleteResult> {
        let result = self.collection.delete_many(filter).await?;

        info!("removed {} students", result.deleted_count);
        Ok(result)
    }
}
