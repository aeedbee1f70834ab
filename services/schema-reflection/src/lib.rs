//! schema-reflection - gRPC 服务反射
//!
//! 对外提供 `grpc.reflection.v1alpha.ServerReflection`，按名称、文件名或扩展号
//! 返回已注册 proto 文件的描述符。

pub mod api;
pub mod application;
pub mod error;
pub mod infrastructure;

pub use api::ReflectionServiceImpl;
pub use application::DescriptorResolver;
pub use error::{ReflectionError, ReflectionResult};
pub use infrastructure::{InMemorySchemaRegistry, SchemaRegistryBuilder, load_registry};
