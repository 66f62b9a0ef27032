mod client;
mod models;

pub use client::MongoSessionStore;
pub use models::MongoSessionRecord;
