//! Container Abstraction
//!
//! This module provides the storage capability the DAOs are built on. Every
//! backend implements [`Container`]; DAOs hold an `Arc<dyn Container>` and
//! never see which backend is behind it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  ProductsDao, ...   │
//! │   (domain façade)   │
//! └──────────┬──────────┘
//!            │
//! ┌──────────▼──────────┐
//! │      Container      │  <-- Trait
//! │       (async)       │
//! └──────────┬──────────┘
//!            │
//!     ┌──────┴───────┐
//!     │              │
//! ┌───▼───┐   ┌──────▼───────┐
//! │ File  │   │   Document   │──── schema: Option<Schema>
//! │ (JSON)│   │  Container   │
//! └───────┘   └──────┬───────┘
//!                    │ DocumentCollection
//!             ┌──────┴──────┐
//!          MongoDB        Memory
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use storekit::persistence::container::{Container, FileContainer};
//! use storekit::persistence::record::Record;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let products = FileContainer::new("./DB/productos.json")?;
//!
//!     let id = products.save(Record::from_value(serde_json::json!({"title": "Lapiz"}))?).await?;
//!     let product = products.get_by_id(&id).await?;
//!
//!     Ok(())
//! }
//! ```

mod document_container;
mod file_container;
mod traits;

pub use document_container::DocumentContainer;
pub use file_container::FileContainer;
pub use traits::*;
