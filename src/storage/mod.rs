//! Storage implementations for different backends

pub mod in_memory;
pub mod mongodb;

pub use in_memory::{InMemoryDataService, InMemoryDatabase};
pub use mongodb::{MongoDataService, MongoPipelineRunner, ensure_indexes};

use crate::core::pipeline::PipelineRunner;
use crate::core::service::DataService;
use crate::entities::{Location, Order, Truck, User};
use ::mongodb::Database;
use std::sync::Arc;

/// One handle per collection plus the pipeline runner, all on one backend
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn DataService<User>>,
    pub trucks: Arc<dyn DataService<Truck>>,
    pub locations: Arc<dyn DataService<Location>>,
    pub orders: Arc<dyn DataService<Order>>,
    pub pipeline: Arc<dyn PipelineRunner>,
}

impl Repositories {
    /// Process-local storage; contents are lost on exit
    pub fn in_memory() -> Self {
        Self::from_in_memory(&InMemoryDatabase::new())
    }

    pub fn from_in_memory(db: &InMemoryDatabase) -> Self {
        Self {
            users: Arc::new(db.service::<User>()),
            trucks: Arc::new(db.service::<Truck>()),
            locations: Arc::new(db.service::<Location>()),
            orders: Arc::new(db.service::<Order>()),
            pipeline: Arc::new(db.clone()),
        }
    }

    pub fn mongodb(database: Database) -> Self {
        Self {
            users: Arc::new(MongoDataService::<User>::new(database.clone())),
            trucks: Arc::new(MongoDataService::<Truck>::new(database.clone())),
            locations: Arc::new(MongoDataService::<Location>::new(database.clone())),
            orders: Arc::new(MongoDataService::<Order>::new(database.clone())),
            pipeline: Arc::new(MongoPipelineRunner::new(database)),
        }
    }
}

impl Default for Repositories {
    fn default() -> Self {
        Self::in_memory()
    }
}
