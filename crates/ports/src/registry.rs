//! Schema 注册表 trait 定义
//!
//! 注册表在进程启动时填充，之后只读；查询均为进程内同步调用

use crate::types::{EncodedDescriptor, EncodedFileDescriptor, ExtensionDescriptor, TypeId};

/// Schema 注册表
pub trait SchemaRegistry: Send + Sync {
    /// 按全限定名查找类型标识
    fn type_by_name(&self, name: &str) -> Option<TypeId>;

    /// 获取类型所在文件的压缩描述符
    fn encoded_file_descriptor(&self, id: TypeId) -> Option<EncodedFileDescriptor>;

    /// 按文件名获取压缩描述符
    fn encoded_file_by_filename(&self, filename: &str) -> Option<EncodedDescriptor>;

    /// 获取某类型的全部已注册扩展，顺序为注册顺序
    fn registered_extensions(&self, id: TypeId) -> Vec<ExtensionDescriptor>;
}

/// 服务元数据存储
///
/// 将服务名与方法名（`package.Service`、`package.Service.Method`）映射到声明它们的文件描述符
pub trait ServiceMetadataStore: Send + Sync {
    fn metadata_for(&self, name: &str) -> Option<EncodedDescriptor>;
}
