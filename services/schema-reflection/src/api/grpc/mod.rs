//! gRPC 服务实现

pub mod reflection_service;

pub use reflection_service::ReflectionServiceImpl;
