//! prism-bootstrap - 统一服务启动骨架
//!
//! 所有服务复用的启动逻辑

mod runtime;
mod starter;

pub use runtime::*;
pub use starter::*;
