//! Lost-and-found items domain
//!
//! ```text
//! handlers  ← HTTP endpoints, body extraction (form)
//!    │
//! service   ← image intake, required-field check
//!    │  └──── uploads (image files on disk)
//! repository ← trait + MongoDB implementation
//!    │
//! models    ← Item and request types
//! ```
//!
//! ```rust,no_run
//! use domain_items::{ImageStore, ItemService, MongoItemRepository, handlers};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("lostfound");
//!
//! let repository = MongoItemRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let service = ItemService::new(repository, ImageStore::new("uploads"));
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod form;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod uploads;

pub use error::{ItemError, ItemResult};
pub use handlers::ApiDoc;
pub use models::{CreateItem, DeleteResponse, Item, ItemFields, ItemFilter, ItemForm, UpdateItem};
pub use mongodb::MongoItemRepository;
pub use repository::ItemRepository;
pub use service::ItemService;
pub use uploads::ImageStore;
