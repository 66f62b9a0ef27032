pub mod graph;
pub mod health;
pub mod sessions;
pub mod summary;
