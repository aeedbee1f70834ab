//! API 层模块

pub mod dispatcher;
pub mod grpc;
pub mod proto;
pub mod session;

pub use dispatcher::Dispatcher;
pub use grpc::ReflectionServiceImpl;
pub use session::{ReflectionSession, ResponseSender, SessionState};
