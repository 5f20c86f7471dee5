use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

use crate::errors::StoreError;

#[cfg(test)]
pub mod memory;
pub mod mongo;

pub use mongo::MongoStore;

/// Comparison operators supported by [`DocumentStore::query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Matches documents whose array field contains the value.
    ArrayContains,
}

/// A single `field <op> value` filter clause.
#[derive(Debug, Clone)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: Bson,
}

impl Condition {
    pub fn new(field: &str, operator: Operator, value: impl Into<Bson>) -> Self {
        Condition {
            field: field.to_string(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: &str, value: impl Into<Bson>) -> Self {
        Condition::new(field, Operator::Eq, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn desc(field: &str) -> Self {
        Sort {
            field: field.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

/// Narrow document-database interface the booking core talks through.
/// Documents carry string `_id`s; `create` generates one.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Upsert under a caller-chosen id. With `merge` set, fields are
    /// merged into any existing document instead of replacing it.
    async fn put(
        &self,
        collection: &str,
        id: &str,
        document: Document,
        merge: bool,
    ) -> Result<Document, StoreError>;

    /// Insert with a generated id; returns the stored document
    /// (including `_id`).
    async fn create(&self, collection: &str, document: Document) -> Result<Document, StoreError>;

    async fn query(
        &self,
        collection: &str,
        conditions: &[Condition],
        sort: Option<Sort>,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Partial update of an existing document.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<Document, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}
