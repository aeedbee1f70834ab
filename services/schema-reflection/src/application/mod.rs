//! 应用层：描述符解码、缓存与解析

pub mod cache;
pub mod decoder;
pub mod resolver;

pub use cache::{CacheStats, DescriptorCache};
pub use decoder::{decode_file_descriptor, encode_file_descriptor, wire_format};
pub use resolver::DescriptorResolver;
