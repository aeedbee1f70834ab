//! 基础设施层

pub mod registry;

pub use registry::{InMemorySchemaRegistry, SchemaRegistryBuilder, load_registry};
