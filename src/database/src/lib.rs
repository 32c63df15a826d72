mod error;
mod file;
pub mod loaders;
mod memory;
pub mod repositories;
pub mod store;

pub use error::{DatabaseError, DatabaseResult};
pub use file::FileStore;
pub use loaders::DemoLoader;
pub use memory::InMemoryStore;
pub use repositories::*;
pub use store::{collections, DocumentStore};
