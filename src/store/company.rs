//! Company records and their collection store.

use crate::error::Result;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::bson::{oid::ObjectId, Document};
use mongodb::results::DeleteResult;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const COLLECTION: &str = "companies";

/// A document in the `companies` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    /// Stored verbatim; the future-date check happens at registration time
    /// and queries match it as an exact string.
    pub placement_date: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated: DateTime<Utc>,
}

/// Field values for a new company; the store assigns the id and timestamp.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub placement_date: String,
}

#[derive(Clone)]
pub struct CompanyStore {
    collection: Collection<Company>,
}

impl CompanyStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Persist a new company record.
    pub async fn add(&self, new: NewCompany) -> Result<Company> {
        let company = Company {
            id: ObjectId::new(),
            name: new.name,
            placement_date: new.placement_date,
            updated: Utc::now(),
        };

        self.collection.insert_one(&company).await?;

        info!("registered company {} ({})", company.id.to_hex(), company.name);
        Ok(company)
    }

    /// All companies matching `filter`. An empty filter matches the whole
    /// collection, capped by `limit` when one is given.
    pub async fn query(&self, filter: Document, limit: Option<i64>) -> Result<Vec<Company>> {
        let mut find = self.collection.find(filter);
        if let Some(n) = limit {
            find = find.limit(n);
        }

        let companies: Vec<Company> = find.await?.try_collect().await?;

        debug!("company query matched {} records", companies.len());
        Ok(companies)
    }

    /// Delete every company matching `filter`.
    pub async fn remove(&self, filter: Document) -> Result<DeleteResult> {
        let result = self.collection.delete_many(filter).await?;

        info!("removed {} companies", result.deleted_count);
        Ok(result)
    }
}
