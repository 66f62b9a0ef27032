pub mod error;
pub mod store;
pub mod memory;
pub mod builder;
pub mod dbs;

pub use error::PersistError;
pub use store::SessionStore;
pub use memory::InMemorySessionStore;
pub use builder::StoreBuilder;
pub use graphwise_types::SessionRecord;

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoSessionStore;
