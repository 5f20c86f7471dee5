use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use tokio::sync::Mutex;

use super::{Condition, DocumentStore, Operator, Sort, SortDirection};
use crate::errors::StoreError;

/// In-memory [`DocumentStore`] used by unit tests. `createdAt` is stamped
/// with a monotonic sequence number so sort order is deterministic.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Document>>>,
    sequence: AtomicU64,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Makes every subsequent call fail with a backend error, simulating
    /// an unreachable store.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store offline".to_string()));
        }
        Ok(())
    }

    fn next_sequence(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) as i64 + 1
    }

    fn numeric(value: &Bson) -> Option<f64> {
        match value {
            Bson::Double(v) => Some(*v),
            Bson::Int32(v) => Some(*v as f64),
            Bson::Int64(v) => Some(*v as f64),
            _ => None,
        }
    }

    fn compare(a: &Bson, b: &Bson) -> Option<CmpOrdering> {
        if let (Some(x), Some(y)) = (Self::numeric(a), Self::numeric(b)) {
            return x.partial_cmp(&y);
        }
        match (a, b) {
            (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
            (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
            _ => None,
        }
    }

    fn matches(document: &Document, condition: &Condition) -> bool {
        let value = match document.get(&condition.field) {
            Some(v) => v,
            None => return false,
        };
        match condition.operator {
            Operator::Eq => value == &condition.value,
            Operator::Ne => value != &condition.value,
            Operator::Lt => matches!(Self::compare(value, &condition.value), Some(CmpOrdering::Less)),
            Operator::Lte => matches!(
                Self::compare(value, &condition.value),
                Some(CmpOrdering::Less | CmpOrdering::Equal)
            ),
            Operator::Gt => matches!(
                Self::compare(value, &condition.value),
                Some(CmpOrdering::Greater)
            ),
            Operator::Gte => matches!(
                Self::compare(value, &condition.value),
                Some(CmpOrdering::Greater | CmpOrdering::Equal)
            ),
            Operator::ArrayContains => match value {
                Bson::Array(items) => items.contains(&condition.value),
                _ => false,
            },
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.check_online()?;
        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn put(
        &self,
        collection: &str,
        id: &str,
        document: Document,
        merge: bool,
    ) -> Result<Document, StoreError> {
        self.check_online()?;
        let mut collections = self.collections.lock().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let stored = if merge {
            let entry = docs.entry(id.to_string()).or_default();
            for (key, value) in document {
                entry.insert(key, value);
            }
            entry.insert("_id", id);
            entry.clone()
        } else {
            let mut entry = document;
            entry.insert("_id", id);
            docs.insert(id.to_string(), entry.clone());
            entry
        };
        Ok(stored)
    }

    async fn create(&self, collection: &str, mut document: Document) -> Result<Document, StoreError> {
        self.check_online()?;
        let sequence = self.next_sequence();
        let id = format!("doc-{sequence}");
        document.insert("_id", &id);
        document.insert("createdAt", sequence);

        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, document.clone());
        Ok(document)
    }

    async fn query(
        &self,
        collection: &str,
        conditions: &[Condition],
        sort: Option<Sort>,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError> {
        self.check_online()?;
        let collections = self.collections.lock().await;
        let mut result: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| conditions.iter().all(|c| Self::matches(doc, c)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = sort {
            result.sort_by(|a, b| {
                let ordering = match (a.get(&sort.field), b.get(&sort.field)) {
                    (Some(x), Some(y)) => Self::compare(x, y).unwrap_or(CmpOrdering::Equal),
                    _ => CmpOrdering::Equal,
                };
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = limit {
            result.truncate(limit as usize);
        }
        Ok(result)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<Document, StoreError> {
        self.check_online()?;
        let mut collections = self.collections.lock().await;
        let entry = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        for (key, value) in fields {
            entry.insert(key, value);
        }
        Ok(entry.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check_online()?;
        let mut collections = self.collections.lock().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id));
        if removed.is_none() {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;

    use super::*;

    #[tokio::test]
    async fn put_merge_keeps_existing_fields() {
        let store = MemoryStore::new();
        store
            .put("seats", "k", doc! { "movieId": "m1", "occupiedSeats": ["A1"] }, false)
            .await
            .unwrap();
        let merged = store
            .put("seats", "k", doc! { "occupiedSeats": ["A1", "A2"] }, true)
            .await
            .unwrap();
        assert_eq!(merged.get_str("movieId").unwrap(), "m1");
        assert_eq!(merged.get_array("occupiedSeats").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn query_filters_sorts_and_limits() {
        let store = MemoryStore::new();
        for (user, amount) in [("u1", 10.0), ("u2", 20.0), ("u1", 30.0)] {
            store
                .create("bookings", doc! { "userId": user, "totalAmount": amount })
                .await
                .unwrap();
        }
        let result = store
            .query(
                "bookings",
                &[Condition::eq("userId", "u1")],
                Some(Sort::desc("createdAt")),
                Some(1),
            )
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get_f64("totalAmount").unwrap(), 30.0);
    }

    #[tokio::test]
    async fn range_and_array_operators_match() {
        let store = MemoryStore::new();
        store
            .put("seats", "k1", doc! { "capacity": 40, "occupiedSeats": ["A1", "B2"] }, false)
            .await
            .unwrap();
        store
            .put("seats", "k2", doc! { "capacity": 60, "occupiedSeats": ["C3"] }, false)
            .await
            .unwrap();

        let big = store
            .query(
                "seats",
                &[Condition::new("capacity", Operator::Gte, 50)],
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(big.len(), 1);
        assert_eq!(big[0].get_str("_id").unwrap(), "k2");

        let with_seat = store
            .query(
                "seats",
                &[Condition::new("occupiedSeats", Operator::ArrayContains, "B2")],
                Some(Sort {
                    field: "capacity".to_string(),
                    direction: SortDirection::Asc,
                }),
                None,
            )
            .await
            .unwrap();
        assert_eq!(with_seat.len(), 1);
        assert_eq!(with_seat[0].get_str("_id").unwrap(), "k1");

        let small = store
            .query(
                "seats",
                &[
                    Condition::new("capacity", Operator::Lt, 50),
                    Condition::new("capacity", Operator::Ne, 0),
                ],
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(small.len(), 1);
        let bounded = store
            .query(
                "seats",
                &[
                    Condition::new("capacity", Operator::Gt, 30),
                    Condition::new("capacity", Operator::Lte, 40),
                ],
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(bounded.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_the_document() {
        let store = MemoryStore::new();
        let created = store.create("movies", doc! { "title": "t" }).await.unwrap();
        let id = created.get_str("_id").unwrap();
        store.delete("movies", id).await.unwrap();
        assert!(store.get("movies", id).await.unwrap().is_none());
        assert!(matches!(
            store.delete("movies", id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn offline_store_fails_with_backend_error() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let err = store.get("bookings", "b1").await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
