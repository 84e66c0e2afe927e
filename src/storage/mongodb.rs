//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoDataService<T>` and `MongoPipelineRunner` backed by a
//! `mongodb::Database`.
//!
//! # Storage model
//!
//! One collection per entity type, named by `T::resource_name()` ("users",
//! "trucks", "locations", "orders").
//!
//! # Serialization strategy
//!
//! Entities are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. Record ids are stored as their hex
//! string, so references compare equal to the `_id` they point at.
//! `createdAt` and `updatedAt` are stored as BSON dates so they sort
//! chronologically. The `id` field is mapped to MongoDB's `_id` convention.

use crate::core::entity::Entity;
use crate::core::error::EntityError;
use crate::core::id::RecordId;
use crate::core::pipeline::{Pipeline, PipelineRunner, SortDirection, Stage};
use crate::core::service::DataService;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use serde::Serialize;
use serde::de::DeserializeOwned;

const TIMESTAMP_FIELDS: [&str; 2] = ["createdAt", "updatedAt"];

/// Server error code for a unique index violation
const DUPLICATE_KEY: i32 = 11000;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` and storing timestamps as BSON dates.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val =
        bson::to_bson(&json).map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    for field in TIMESTAMP_FIELDS {
        if let Some(Bson::String(raw)) = doc.get(field) {
            let date = bson::DateTime::parse_rfc3339_str(raw)
                .map_err(|e| anyhow!("Invalid timestamp in {}: {}", field, e))?;
            doc.insert(field, date);
        }
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value.
///
/// Applies to nested documents too, so records joined in by `$lookup`
/// come back in the same shape as top-level ones.
fn document_to_json(doc: Document) -> serde_json::Value {
    normalize(Bson::Document(doc)).into_relaxed_extjson()
}

fn normalize(value: Bson) -> Bson {
    match value {
        Bson::Document(doc) => Bson::Document(
            doc.into_iter()
                .map(|(key, value)| {
                    let key = if key == "_id" { "id".to_string() } else { key };
                    (key, normalize(value))
                })
                .collect(),
        ),
        Bson::Array(items) => Bson::Array(items.into_iter().map(normalize).collect()),
        Bson::DateTime(date) => match date.try_to_rfc3339_string() {
            Ok(text) => Bson::String(text),
            Err(_) => Bson::DateTime(date),
        },
        other => other,
    }
}

/// Field name as stored
fn stored_field(field: &str) -> &str {
    if field == "id" { "_id" } else { field }
}

fn id_bson(id: &RecordId) -> Bson {
    Bson::String(id.to_hex())
}

/// Message of a duplicate-key write error
fn duplicate_key_message(err: &mongodb::error::Error) -> Option<&str> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            Some(write.message.as_str())
        }
        _ => None,
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

// ---------------------------------------------------------------------------
// MongoDataService<T>
// ---------------------------------------------------------------------------

/// Generic data storage service backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use logistics::storage::MongoDataService;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let db = client.database("logistics");
/// let trucks = MongoDataService::<Truck>::new(db);
/// let truck = trucks.create(truck).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoDataService<T> {
    database: Database,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> MongoDataService<T> {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: Entity + Serialize + DeserializeOwned> MongoDataService<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::resource_name())
    }

    fn entity_to_document(entity: &T) -> Result<Document> {
        let json = serde_json::to_value(entity)
            .map_err(|e| anyhow!("Failed to serialize entity: {}", e))?;
        json_to_document(json)
    }

    fn document_to_entity(doc: Document) -> Result<T> {
        serde_json::from_value(document_to_json(doc))
            .map_err(|e| anyhow!("Failed to deserialize entity from document: {}", e))
    }

    /// Describe a failed write
    ///
    /// A duplicate key on one of `T`'s unique fields becomes
    /// [`EntityError::AlreadyExists`]; the default index name for the field
    /// (`<field>_1`) appears in the server message.
    fn write_error(action: &str, doc: &Document, err: mongodb::error::Error) -> anyhow::Error {
        let conflict = duplicate_key_message(&err).and_then(|message| {
            T::unique_fields()
                .iter()
                .find(|field| message.contains(&format!("{field}_1")))
        });

        match conflict {
            Some(field) => {
                let value = match doc.get(*field) {
                    Some(Bson::String(text)) => text.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                EntityError::already_exists(T::type_name(), field, &value).into()
            }
            None => anyhow!("Failed to {} {}: {}", action, T::resource_name_singular(), err),
        }
    }

    async fn find_all(&self, filter: Document) -> Result<Vec<T>> {
        let cursor = self
            .collection()
            .find(filter)
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await
            .map_err(|e| anyhow!("Failed to query {}: {}", T::resource_name(), e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect {}: {}", T::resource_name(), e))?;

        docs.into_iter().map(Self::document_to_entity).collect()
    }
}

#[async_trait]
impl<T: Entity + Serialize + DeserializeOwned> DataService<T> for MongoDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        if let Err(e) = self.collection().insert_one(&doc).await {
            return Err(Self::write_error("create", &doc, e));
        }

        Ok(entity)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<T>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": id_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get {}: {}", T::resource_name_singular(), e))?;

        doc.map(Self::document_to_entity).transpose()
    }

    async fn exists(&self, id: &RecordId) -> Result<bool> {
        let count = self
            .collection()
            .count_documents(doc! { "_id": id_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to count {}: {}", T::resource_name(), e))?;

        Ok(count > 0)
    }

    async fn list(&self) -> Result<Vec<T>> {
        self.find_all(doc! {}).await
    }

    /// Returns `None` when no document matched
    async fn update(&self, id: &RecordId, entity: T) -> Result<Option<T>> {
        let doc = Self::entity_to_document(&entity)?;

        let result = self
            .collection()
            .replace_one(doc! { "_id": id_bson(id) }, &doc)
            .await
            .map_err(|e| Self::write_error("update", &doc, e))?;

        Ok((result.matched_count > 0).then_some(entity))
    }

    async fn delete(&self, id: &RecordId) -> Result<Option<T>> {
        let removed = self
            .collection()
            .find_one_and_delete(doc! { "_id": id_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to delete {}: {}", T::resource_name_singular(), e))?;

        removed.map(Self::document_to_entity).transpose()
    }

    /// Search entities by field value.
    ///
    /// Values arrive as strings but may be stored with native BSON types,
    /// so `$in` matches the string and any numeric or boolean reading of it.
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let mut variants: Vec<Bson> = vec![Bson::String(value.to_string())];

        match value {
            "true" => variants.push(Bson::Boolean(true)),
            "false" => variants.push(Bson::Boolean(false)),
            _ => {
                if let Ok(i) = value.parse::<i64>() {
                    variants.push(Bson::Int64(i));
                }
                if value.contains('.')
                    && let Ok(f) = value.parse::<f64>()
                {
                    variants.push(Bson::Double(f));
                }
            }
        }

        let key = stored_field(field);
        self.find_all(doc! { key: { "$in": variants } }).await
    }
}

// ---------------------------------------------------------------------------
// MongoPipelineRunner
// ---------------------------------------------------------------------------

/// Runs [`Pipeline`]s as native aggregations
#[derive(Clone, Debug)]
pub struct MongoPipelineRunner {
    database: Database,
}

impl MongoPipelineRunner {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Native stages for a pipeline
    pub fn translate(pipeline: &Pipeline) -> Result<Vec<Document>> {
        let mut stages = Vec::with_capacity(pipeline.stages().len());

        for stage in pipeline.stages() {
            match stage {
                Stage::Match { field, value } => {
                    let value = bson::to_bson(value)
                        .map_err(|e| anyhow!("Failed to convert match value: {}", e))?;
                    let key = stored_field(field);
                    stages.push(doc! { "$match": { key: value } });
                }
                Stage::Sort(keys) => {
                    let mut sort = Document::new();
                    for key in keys {
                        let direction = match key.direction {
                            SortDirection::Ascending => 1,
                            SortDirection::Descending => -1,
                        };
                        sort.insert(stored_field(&key.field), direction);
                    }
                    stages.push(doc! { "$sort": sort });
                }
                Stage::Skip(n) => stages.push(doc! { "$skip": to_i64(*n) }),
                Stage::Limit(n) => stages.push(doc! { "$limit": to_i64(*n) }),
                Stage::LookupOne {
                    from,
                    local_field,
                    as_field,
                } => {
                    stages.push(doc! {
                        "$lookup": {
                            "from": from.as_str(),
                            "localField": stored_field(local_field),
                            "foreignField": "_id",
                            "as": as_field.as_str(),
                        }
                    });
                    stages.push(doc! {
                        "$unwind": {
                            "path": format!("${as_field}"),
                            "preserveNullAndEmptyArrays": true,
                        }
                    });
                }
                Stage::Exclude(path) => {
                    let path = path.as_str();
                    stages.push(doc! { "$project": { path: 0 } });
                }
            }
        }

        Ok(stages)
    }
}

#[async_trait]
impl PipelineRunner for MongoPipelineRunner {
    async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> Result<Vec<serde_json::Value>> {
        let stages = Self::translate(pipeline)?;

        let cursor = self
            .database
            .collection::<Document>(collection)
            .aggregate(stages)
            .await
            .map_err(|e| anyhow!("Failed to aggregate {}: {}", collection, e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect aggregation on {}: {}", collection, e))?;

        Ok(docs.into_iter().map(document_to_json).collect())
    }
}

/// Create the indexes the services rely on.
///
/// - unique `users.email`, `trucks.plates`, `locations.place_id`
/// - `orders.createdAt` for the newest-first listing
///
/// Idempotent; safe to call on every startup.
pub async fn ensure_indexes(database: &Database) -> Result<()> {
    let unique = [("users", "email"), ("trucks", "plates"), ("locations", "place_id")];

    for (collection, field) in unique {
        let index = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        database
            .collection::<Document>(collection)
            .create_index(index)
            .await
            .map_err(|e| anyhow!("Failed to create index on {}.{}: {}", collection, field, e))?;
    }

    database
        .collection::<Document>("orders")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "createdAt": -1, "_id": -1 })
                .build(),
        )
        .await
        .map_err(|e| anyhow!("Failed to create index on orders: {}", e))?;

    tracing::info!("mongodb indexes ensured");
    Ok(())
}
