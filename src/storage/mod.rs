//! Relational storage plumbing shared by every context.
//!
//! Holds the pooled [`ConnectionGateway`], the Diesel schema, the bundled
//! migrations and the [`MemoryStore`] used by the in-memory adapters.

mod error;
mod gateway;
pub(crate) mod memory;
mod migrations;
pub(crate) mod rows;
pub(crate) mod schema;

pub use error::{StorageError, StorageResult};
pub use gateway::{ConnectionGateway, GatewayError, PgPool};
pub use memory::MemoryStore;
pub use migrations::{MIGRATIONS, Migration, VERSIONS_TABLE, apply_schema};
