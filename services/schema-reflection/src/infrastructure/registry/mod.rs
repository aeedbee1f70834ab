//! 注册表适配器

mod loader;
mod memory_registry;

pub use loader::load_registry;
pub use memory_registry::{InMemorySchemaRegistry, SchemaRegistryBuilder};
