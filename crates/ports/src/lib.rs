//! ports - 抽象 trait 层
//!
//! 定义反射核心依赖的外部协作者接口

mod registry;
mod types;

pub use registry::*;
pub use types::*;
