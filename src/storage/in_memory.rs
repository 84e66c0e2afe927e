//! In-memory storage for testing and development
//!
//! Records are kept as JSON documents, one map per collection, so the same
//! database can serve every typed [`DataService`] and run read pipelines
//! across collections.

use crate::core::entity::Entity;
use crate::core::error::EntityError;
use crate::core::id::RecordId;
use crate::core::pipeline::{Pipeline, PipelineRunner, SortDirection, SortKey, Stage};
use crate::core::service::DataService;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

type Collection = HashMap<String, Value>;

/// Shared in-memory database
///
/// Cloning is cheap; clones see the same collections. Uses RwLock for
/// thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed service over the collection of `T`
    pub fn service<T: Entity>(&self) -> InMemoryDataService<T> {
        InMemoryDataService {
            db: self.clone(),
            _marker: PhantomData,
        }
    }

    fn read<R>(&self, f: impl FnOnce(&HashMap<String, Collection>) -> R) -> Result<R> {
        let collections = self
            .collections
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(f(&collections))
    }

    fn write<R>(&self, f: impl FnOnce(&mut HashMap<String, Collection>) -> R) -> Result<R> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        Ok(f(&mut collections))
    }
}

/// [`DataService`] over one collection of an [`InMemoryDatabase`]
pub struct InMemoryDataService<T> {
    db: InMemoryDatabase,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for InMemoryDataService<T> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Entity + Serialize + DeserializeOwned> InMemoryDataService<T> {
    fn to_document(entity: &T) -> Result<Value> {
        serde_json::to_value(entity).map_err(|e| anyhow!("Failed to serialize entity: {}", e))
    }

    fn from_document(doc: Value) -> Result<T> {
        serde_json::from_value(doc).map_err(|e| anyhow!("Failed to deserialize entity: {}", e))
    }

    /// First unique field of `doc` already held by a record other than `key`
    fn unique_conflict(collection: &Collection, key: &str, doc: &Value) -> Option<EntityError> {
        T::unique_fields().iter().find_map(|field| {
            let value = doc.get(*field).filter(|v| !v.is_null())?;
            collection
                .iter()
                .any(|(other, stored)| other != key && stored.get(*field) == Some(value))
                .then(|| {
                    let shown = value.as_str().map_or_else(|| value.to_string(), str::to_string);
                    EntityError::already_exists(T::type_name(), field, &shown)
                })
        })
    }

    /// Decode documents, newest first
    fn decode_sorted(mut docs: Vec<Value>) -> Result<Vec<T>> {
        docs.sort_by(newest_first);
        docs.into_iter().map(Self::from_document).collect()
    }
}

#[async_trait]
impl<T: Entity + Serialize + DeserializeOwned> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let key = entity.id().to_hex();
        let doc = Self::to_document(&entity)?;

        self.db.write(|collections| {
            let collection = collections.entry(T::resource_name().to_string()).or_default();
            if collection.contains_key(&key) {
                return Err(anyhow!("Duplicate id {} in {}", key, T::resource_name()));
            }
            if let Some(conflict) = Self::unique_conflict(collection, &key, &doc) {
                return Err(conflict.into());
            }
            collection.insert(key, doc);
            Ok(())
        })??;

        Ok(entity)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<T>> {
        let doc = self.db.read(|collections| {
            collections
                .get(T::resource_name())
                .and_then(|c| c.get(&id.to_hex()))
                .cloned()
        })?;

        doc.map(Self::from_document).transpose()
    }

    async fn list(&self) -> Result<Vec<T>> {
        let docs = self.db.read(|collections| {
            collections
                .get(T::resource_name())
                .map(|c| c.values().cloned().collect::<Vec<_>>())
                .unwrap_or_default()
        })?;

        Self::decode_sorted(docs)
    }

    async fn update(&self, id: &RecordId, entity: T) -> Result<Option<T>> {
        let key = id.to_hex();
        let doc = Self::to_document(&entity)?;

        let replaced = self.db.write(|collections| {
            let Some(collection) = collections.get_mut(T::resource_name()) else {
                return Ok(false);
            };
            if !collection.contains_key(&key) {
                return Ok(false);
            }
            if let Some(conflict) = Self::unique_conflict(collection, &key, &doc) {
                return Err(anyhow::Error::from(conflict));
            }
            collection.insert(key, doc);
            Ok(true)
        })??;

        Ok(replaced.then_some(entity))
    }

    async fn delete(&self, id: &RecordId) -> Result<Option<T>> {
        let removed = self.db.write(|collections| {
            collections
                .get_mut(T::resource_name())
                .and_then(|c| c.remove(&id.to_hex()))
        })?;

        removed.map(Self::from_document).transpose()
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let docs = self.db.read(|collections| {
            collections
                .get(T::resource_name())
                .map(|c| {
                    c.values()
                        .filter(|doc| doc.get(field).is_some_and(|v| matches_str(v, value)))
                        .cloned()
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })?;

        Self::decode_sorted(docs)
    }
}

#[async_trait]
impl PipelineRunner for InMemoryDatabase {
    async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> Result<Vec<Value>> {
        // One read lock for the whole run so joins see a consistent snapshot
        self.read(|collections| {
            let mut docs: Vec<Value> = collections
                .get(collection)
                .map(|c| c.values().cloned().collect())
                .unwrap_or_default();

            for stage in pipeline.stages() {
                docs = apply_stage(collections, docs, stage);
            }
            docs
        })
    }
}

fn apply_stage(
    collections: &HashMap<String, Collection>,
    mut docs: Vec<Value>,
    stage: &Stage,
) -> Vec<Value> {
    match stage {
        Stage::Match { field, value } => docs
            .into_iter()
            .filter(|doc| doc.get(field) == Some(value))
            .collect(),
        Stage::Sort(keys) => {
            docs.sort_by(|a, b| compare_by_keys(a, b, keys));
            docs
        }
        Stage::Skip(n) => docs.into_iter().skip(to_usize(*n)).collect(),
        Stage::Limit(n) => docs.into_iter().take(to_usize(*n)).collect(),
        Stage::LookupOne {
            from,
            local_field,
            as_field,
        } => {
            let foreign = collections.get(from);
            for doc in &mut docs {
                let joined = doc
                    .get(local_field)
                    .and_then(Value::as_str)
                    .and_then(|id| foreign.and_then(|c| c.get(id)))
                    .cloned();
                if let Some(object) = doc.as_object_mut() {
                    match joined {
                        Some(found) => {
                            object.insert(as_field.clone(), found);
                        }
                        None => {
                            object.remove(as_field);
                        }
                    }
                }
            }
            docs
        }
        Stage::Exclude(path) => {
            for doc in &mut docs {
                if let Some(object) = doc.as_object_mut() {
                    remove_path(object, path);
                }
            }
            docs
        }
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

fn remove_path(object: &mut Map<String, Value>, path: &str) {
    match path.split_once('.') {
        Some((head, rest)) => {
            if let Some(Value::Object(inner)) = object.get_mut(head) {
                remove_path(inner, rest);
            }
        }
        None => {
            object.remove(path);
        }
    }
}

fn newest_first(a: &Value, b: &Value) -> Ordering {
    compare_by_keys(
        a,
        b,
        &[
            SortKey {
                field: "createdAt".to_string(),
                direction: SortDirection::Descending,
            },
            SortKey {
                field: "id".to_string(),
                direction: SortDirection::Descending,
            },
        ],
    )
}

fn compare_by_keys(a: &Value, b: &Value, keys: &[SortKey]) -> Ordering {
    keys.iter()
        .map(|key| {
            let ordering = compare_values(a.get(&key.field), b.get(&key.field));
            match key.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Missing sorts first; timestamps compare as instants
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (parse_instant(x), parse_instant(y)) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn matches_str(stored: &Value, value: &str) -> bool {
    match stored {
        Value::String(s) => s == value,
        Value::Bool(b) => b.to_string() == value,
        Value::Number(n) => n.to_string() == value,
        _ => false,
    }
}
