//! # restcrud-core
//!
//! Typed CRUD orchestration over a REST collection.
//!
//! [`ObjectManager`] drives list, fetch, create, update and delete against
//! `BASE/{collection}`, keeps an in-memory mirror of the collection, tracks a
//! single pending edit and reports progress to a [`StatusSink`].
//!
//! ```ignore
//! use std::sync::Arc;
//! use restcrud_core::{ManagerConfig, ObjectManager, TracingSink};
//!
//! let config = ManagerConfig::from_env()?;
//! let manager = ObjectManager::connect(config, Arc::new(TracingSink))?;
//!
//! manager.list().await?;
//! let widget = manager.create("Widget", "color:blue, price:9").await?;
//! manager.delete(widget.id()).await?;
//! ```
//!
//! Resource attributes are entered as free `key:value` text and stored in
//! four fixed slots, see [`fields`].

pub mod config;
pub mod error;
pub mod fields;
pub mod manager;
pub mod model;
pub mod operation;
pub mod status;

pub use config::ManagerConfig;
pub use error::{ConfigError, CrudError, Result};
pub use fields::{DataFields, Slot, SlotAssignment, NO_DATA};
pub use manager::ObjectManager;
pub use model::{Resource, ResourceCollection};
pub use operation::{OperationKind, OperationState, OperationStatus};
pub use status::{RecordingSink, StatusSink, TracingSink, WeakSink};
