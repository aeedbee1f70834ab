//! 名称 / 扩展解析
//!
//! 把类型名、服务名、方法名、文件名以及 (类型, 扩展号) 解析为所属文件的描述符。
//! 先查缓存，未命中时回落到注册表与解码器。

use std::sync::Arc;

use prism_ports::{ExtensionValueType, SchemaRegistry, ServiceMetadataStore, TypeId};
use prost_types::FileDescriptorProto;
use tracing::debug;

use crate::application::cache::DescriptorCache;
use crate::application::decoder::decode_file_descriptor;
use crate::error::{ReflectionError, ReflectionResult};

/// 描述符解析器
///
/// 在所有会话之间共享，缓存随解析器存活
pub struct DescriptorResolver {
    registry: Arc<dyn SchemaRegistry>,
    metadata: Arc<dyn ServiceMetadataStore>,
    cache: DescriptorCache,
}

impl DescriptorResolver {
    pub fn new(registry: Arc<dyn SchemaRegistry>, metadata: Arc<dyn ServiceMetadataStore>) -> Self {
        Self {
            registry,
            metadata,
            cache: DescriptorCache::new(),
        }
    }

    pub fn cache(&self) -> &DescriptorCache {
        &self.cache
    }

    /// 类型名 → 类型标识
    pub fn type_for_name(&self, name: &str) -> ReflectionResult<TypeId> {
        if let Some(id) = self.cache.type_identity_for(name) {
            return Ok(id);
        }

        let id = self
            .registry
            .type_by_name(name)
            .ok_or_else(|| ReflectionError::not_found(format!("unknown type: {:?}", name)))?;

        self.cache.insert_type_name(name, id)?;

        // 新学到的类型通常紧接着会被用来查文件描述符，顺便预热
        if let Err(e) = self.file_descriptor_for_type(id) {
            debug!(type_name = %name, error = %e, "Failed to warm descriptor cache");
        }

        Ok(id)
    }

    /// 类型标识 → 所在文件描述符
    pub fn file_descriptor_for_type(&self, id: TypeId) -> ReflectionResult<Arc<FileDescriptorProto>> {
        if let Some(fd) = self.cache.file_descriptor_for(id) {
            return Ok(fd);
        }

        let encoded = self.registry.encoded_file_descriptor(id).ok_or_else(|| {
            ReflectionError::internal(format!("no file descriptor registered for {}", id))
        })?;
        let fd = decode_file_descriptor(encoded.descriptor.as_bytes())?;

        self.cache.insert_file_descriptor(id, fd)
    }

    pub fn file_descriptor_for_type_name(
        &self,
        name: &str,
    ) -> ReflectionResult<Arc<FileDescriptorProto>> {
        let id = self.type_for_name(name)?;
        self.file_descriptor_for_type(id)
    }

    pub fn file_descriptor_by_filename(
        &self,
        filename: &str,
    ) -> ReflectionResult<Arc<FileDescriptorProto>> {
        let encoded = self
            .registry
            .encoded_file_by_filename(filename)
            .ok_or_else(|| ReflectionError::not_found(format!("unknown file: {}", filename)))?;
        Ok(Arc::new(decode_file_descriptor(encoded.as_bytes())?))
    }

    /// 依次把 `name` 当作类型名、服务名或方法名解析
    pub fn file_descriptor_containing_symbol(
        &self,
        name: &str,
    ) -> ReflectionResult<Arc<FileDescriptorProto>> {
        match self.file_descriptor_for_type_name(name) {
            Ok(fd) => return Ok(fd),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        match self.metadata.metadata_for(name) {
            Some(encoded) => Ok(Arc::new(decode_file_descriptor(encoded.as_bytes())?)),
            None => Err(ReflectionError::not_found(format!("unknown symbol: {}", name))),
        }
    }

    /// 查找为 `type_name` 声明了扩展号 `number` 的扩展，并返回其值类型所在的文件
    ///
    /// 标量值类型没有独立的描述符，此时返回声明该扩展的文件
    pub fn file_descriptor_containing_extension(
        &self,
        type_name: &str,
        number: i32,
    ) -> ReflectionResult<Arc<FileDescriptorProto>> {
        let id = self.type_for_name(type_name)?;

        let extension = self
            .registry
            .registered_extensions(id)
            .into_iter()
            .find(|ext| ext.number == number)
            .ok_or_else(|| {
                ReflectionError::not_found(format!(
                    "failed to find registered extension for extension number {}",
                    number
                ))
            })?;

        match extension.value_type {
            ExtensionValueType::Named(value_type) => self.file_descriptor_for_type(value_type),
            ExtensionValueType::Scalar(_) => self
                .file_descriptor_by_filename(&extension.declared_in)
                .map_err(|e| match e {
                    ReflectionError::NotFound(_) => ReflectionError::internal(format!(
                        "extension {} declared in unregistered file {}",
                        extension.name, extension.declared_in
                    )),
                    other => other,
                }),
        }
    }

    /// 某类型的全部扩展号，升序
    pub fn all_extension_numbers(&self, type_name: &str) -> ReflectionResult<Vec<i32>> {
        let id = self.type_for_name(type_name)?;

        let mut numbers: Vec<i32> = self
            .registry
            .registered_extensions(id)
            .into_iter()
            .map(|ext| ext.number)
            .collect();
        numbers.sort_unstable();
        Ok(numbers)
    }
}
