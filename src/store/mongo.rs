use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, DateTime, Document};
use mongodb::options::{FindOptions, ReplaceOptions, UpdateOptions};
use mongodb::Client;

use super::{Condition, DocumentStore, Operator, Sort, SortDirection};
use crate::errors::StoreError;

/// MongoDB-backed implementation of [`DocumentStore`]. Every write stamps
/// `updatedAt`, creation additionally stamps `createdAt`.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: String,
}

impl MongoStore {
    pub fn new(client: Client, database: &str) -> Self {
        MongoStore {
            client,
            database: database.to_string(),
        }
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.client.database(&self.database).collection(name)
    }

    fn filter_from(conditions: &[Condition]) -> Document {
        let mut filter = Document::new();
        for condition in conditions {
            let clause = match condition.operator {
                Operator::Eq => doc! { "$eq": condition.value.clone() },
                Operator::Ne => doc! { "$ne": condition.value.clone() },
                Operator::Lt => doc! { "$lt": condition.value.clone() },
                Operator::Lte => doc! { "$lte": condition.value.clone() },
                Operator::Gt => doc! { "$gt": condition.value.clone() },
                Operator::Gte => doc! { "$gte": condition.value.clone() },
                // Mongo matches array fields against scalars directly.
                Operator::ArrayContains => {
                    filter.insert(&condition.field, condition.value.clone());
                    continue;
                }
            };
            filter.insert(&condition.field, clause);
        }
        filter
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let found = self
            .collection(collection)
            .find_one(doc! { "_id": id }, None)
            .await?;
        Ok(found)
    }

    async fn put(
        &self,
        collection: &str,
        id: &str,
        mut document: Document,
        merge: bool,
    ) -> Result<Document, StoreError> {
        document.insert("updatedAt", DateTime::now());
        if merge {
            let options = UpdateOptions::builder().upsert(true).build();
            self.collection(collection)
                .update_one(doc! { "_id": id }, doc! { "$set": document }, options)
                .await?;
        } else {
            document.insert("_id", id);
            let options = ReplaceOptions::builder().upsert(true).build();
            self.collection(collection)
                .replace_one(doc! { "_id": id }, document, options)
                .await?;
        }
        self.get(collection, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }

    async fn create(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<Document, StoreError> {
        let id = mongodb::bson::oid::ObjectId::new().to_hex();
        let now = DateTime::now();
        document.insert("_id", &id);
        document.insert("createdAt", now);
        document.insert("updatedAt", now);
        self.collection(collection)
            .insert_one(&document, None)
            .await?;
        Ok(document)
    }

    async fn query(
        &self,
        collection: &str,
        conditions: &[Condition],
        sort: Option<Sort>,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError> {
        let filter = Self::filter_from(conditions);
        let sort_doc = sort.map(|s| {
            let direction = match s.direction {
                SortDirection::Asc => 1,
                SortDirection::Desc => -1,
            };
            doc! { s.field: direction }
        });
        let options = FindOptions::builder().sort(sort_doc).limit(limit).build();

        let mut cursor = self.collection(collection).find(filter, options).await?;
        let mut result = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            result.push(document);
        }
        Ok(result)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        mut fields: Document,
    ) -> Result<Document, StoreError> {
        fields.insert("updatedAt", Bson::DateTime(DateTime::now()));
        let update_result = self
            .collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": fields }, None)
            .await?;
        if update_result.matched_count == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        self.get(collection, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let delete_result = self
            .collection(collection)
            .delete_one(doc! { "_id": id }, None)
            .await?;
        if delete_result.deleted_count == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
