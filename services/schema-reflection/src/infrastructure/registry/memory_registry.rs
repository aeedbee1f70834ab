//! 内存注册表
//!
//! 启动时由 FileDescriptorSet 构建，之后只读。同时实现
//! [`SchemaRegistry`] 与 [`ServiceMetadataStore`]。

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use prism_errors::{AppError, AppResult};
use prism_ports::{
    EncodedDescriptor, EncodedFileDescriptor, ExtensionDescriptor, ExtensionValueType,
    SchemaRegistry, ServiceMetadataStore, TypeId,
};
use prost::Message;
use prost_types::field_descriptor_proto::Type as FieldType;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet,
};
use tracing::debug;

use crate::application::encode_file_descriptor;

#[derive(Debug)]
struct TypeLocation {
    filename: String,
    path: Vec<usize>,
}

#[derive(Debug, Default)]
pub struct InMemorySchemaRegistry {
    types: HashMap<String, TypeId>,
    locations: HashMap<TypeId, TypeLocation>,
    files: HashMap<String, EncodedDescriptor>,
    extensions: HashMap<TypeId, Vec<ExtensionDescriptor>>,
    /// 服务名、方法名 → 所在文件
    symbols: HashMap<String, EncodedDescriptor>,
}

impl InMemorySchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

impl SchemaRegistry for InMemorySchemaRegistry {
    fn type_by_name(&self, name: &str) -> Option<TypeId> {
        self.types.get(name).copied()
    }

    fn encoded_file_descriptor(&self, id: TypeId) -> Option<EncodedFileDescriptor> {
        let location = self.locations.get(&id)?;
        let descriptor = self.files.get(&location.filename)?.clone();
        Some(EncodedFileDescriptor {
            descriptor,
            path: location.path.clone(),
        })
    }

    fn encoded_file_by_filename(&self, filename: &str) -> Option<EncodedDescriptor> {
        self.files.get(filename).cloned()
    }

    fn registered_extensions(&self, id: TypeId) -> Vec<ExtensionDescriptor> {
        self.extensions.get(&id).cloned().unwrap_or_default()
    }
}

impl ServiceMetadataStore for InMemorySchemaRegistry {
    fn metadata_for(&self, name: &str) -> Option<EncodedDescriptor> {
        self.symbols.get(name).cloned()
    }
}

/// 注册表构建器
///
/// 类型标识按注册顺序分配；扩展在所有类型登记完成后再解析，
/// 因此扩展可以引用后注册文件中的类型。
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    files: Vec<FileDescriptorProto>,
}

impl SchemaRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(mut self, file: FileDescriptorProto) -> Self {
        self.files.push(file);
        self
    }

    /// 添加未压缩的 FileDescriptorSet（`tonic::include_file_descriptor_set!` 的产物）
    pub fn add_file_descriptor_set(mut self, bytes: &[u8]) -> AppResult<Self> {
        let set = FileDescriptorSet::decode(bytes)
            .map_err(|e| AppError::validation(format!("invalid FileDescriptorSet: {}", e)))?;
        self.files.extend(set.file);
        Ok(self)
    }

    pub fn build(self) -> AppResult<InMemorySchemaRegistry> {
        let mut registry = InMemorySchemaRegistry::default();

        for file in &self.files {
            register_file(&mut registry, file)?;
        }
        for file in &self.files {
            register_file_extensions(&mut registry, file)?;
        }

        debug!(
            files = registry.file_count(),
            types = registry.type_count(),
            symbols = registry.symbol_count(),
            "Schema registry built"
        );
        Ok(registry)
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

fn register_file(registry: &mut InMemorySchemaRegistry, file: &FileDescriptorProto) -> AppResult<()> {
    let filename = file.name();
    if filename.is_empty() {
        return Err(AppError::validation("file descriptor without a name"));
    }

    let encoded = encode_file_descriptor(file).map_err(AppError::from)?;
    match registry.files.entry(filename.to_string()) {
        Entry::Occupied(_) => {
            return Err(AppError::conflict(format!("duplicate file: {}", filename)));
        }
        Entry::Vacant(entry) => {
            entry.insert(encoded.clone());
        }
    }

    let package = file.package();
    for (index, message) in file.message_type.iter().enumerate() {
        register_message(registry, filename, package, message, vec![index])?;
    }
    for (index, enumeration) in file.enum_type.iter().enumerate() {
        register_enum(registry, filename, package, enumeration, vec![index])?;
    }

    for service in &file.service {
        let service_name = qualify(package, service.name());
        insert_symbol(registry, service_name.clone(), &encoded)?;
        for method in &service.method {
            insert_symbol(registry, qualify(&service_name, method.name()), &encoded)?;
        }
    }

    Ok(())
}

fn register_message(
    registry: &mut InMemorySchemaRegistry,
    filename: &str,
    scope: &str,
    message: &DescriptorProto,
    path: Vec<usize>,
) -> AppResult<()> {
    let full_name = qualify(scope, message.name());
    insert_type(registry, &full_name, filename, path.clone())?;

    for (index, nested) in message.nested_type.iter().enumerate() {
        let mut nested_path = path.clone();
        nested_path.push(index);
        register_message(registry, filename, &full_name, nested, nested_path)?;
    }
    for (index, enumeration) in message.enum_type.iter().enumerate() {
        let mut enum_path = path.clone();
        enum_path.push(index);
        register_enum(registry, filename, &full_name, enumeration, enum_path)?;
    }

    Ok(())
}

fn register_enum(
    registry: &mut InMemorySchemaRegistry,
    filename: &str,
    scope: &str,
    enumeration: &EnumDescriptorProto,
    path: Vec<usize>,
) -> AppResult<()> {
    insert_type(registry, &qualify(scope, enumeration.name()), filename, path)
}

fn insert_type(
    registry: &mut InMemorySchemaRegistry,
    full_name: &str,
    filename: &str,
    path: Vec<usize>,
) -> AppResult<()> {
    let next_id = TypeId::new(registry.types.len() as u32 + 1);
    match registry.types.entry(full_name.to_string()) {
        Entry::Occupied(_) => Err(AppError::conflict(format!("duplicate type: {}", full_name))),
        Entry::Vacant(entry) => {
            entry.insert(next_id);
            registry.locations.insert(
                next_id,
                TypeLocation {
                    filename: filename.to_string(),
                    path,
                },
            );
            Ok(())
        }
    }
}

fn insert_symbol(
    registry: &mut InMemorySchemaRegistry,
    symbol: String,
    encoded: &EncodedDescriptor,
) -> AppResult<()> {
    match registry.symbols.entry(symbol) {
        Entry::Occupied(entry) => Err(AppError::conflict(format!(
            "duplicate service symbol: {}",
            entry.key()
        ))),
        Entry::Vacant(entry) => {
            entry.insert(encoded.clone());
            Ok(())
        }
    }
}

fn register_file_extensions(
    registry: &mut InMemorySchemaRegistry,
    file: &FileDescriptorProto,
) -> AppResult<()> {
    let filename = file.name();
    let package = file.package();

    for field in &file.extension {
        register_extension(registry, filename, package, field)?;
    }
    for message in &file.message_type {
        register_message_extensions(registry, filename, package, message)?;
    }
    Ok(())
}

fn register_message_extensions(
    registry: &mut InMemorySchemaRegistry,
    filename: &str,
    scope: &str,
    message: &DescriptorProto,
) -> AppResult<()> {
    let full_name = qualify(scope, message.name());
    for field in &message.extension {
        register_extension(registry, filename, &full_name, field)?;
    }
    for nested in &message.nested_type {
        register_message_extensions(registry, filename, &full_name, nested)?;
    }
    Ok(())
}

fn register_extension(
    registry: &mut InMemorySchemaRegistry,
    filename: &str,
    scope: &str,
    field: &FieldDescriptorProto,
) -> AppResult<()> {
    let name = qualify(scope, field.name());

    let extendee = field.extendee().trim_start_matches('.');
    let extended_type = registry.type_by_name(extendee).ok_or_else(|| {
        AppError::validation(format!("extension {} extends unknown type {}", name, extendee))
    })?;

    let value_type = match field.r#type() {
        FieldType::Message | FieldType::Group | FieldType::Enum => {
            let type_name = field.type_name().trim_start_matches('.');
            let id = registry.type_by_name(type_name).ok_or_else(|| {
                AppError::validation(format!(
                    "extension {} has unknown value type {}",
                    name, type_name
                ))
            })?;
            ExtensionValueType::Named(id)
        }
        scalar => ExtensionValueType::Scalar(scalar.as_str_name().to_string()),
    };

    let number = field.number();
    let extensions = registry.extensions.entry(extended_type).or_default();
    if extensions.iter().any(|ext| ext.number == number) {
        return Err(AppError::conflict(format!(
            "extension number {} declared twice for {}",
            number, extendee
        )));
    }

    extensions.push(ExtensionDescriptor {
        extended_type,
        number,
        name,
        value_type,
        declared_in: filename.to_string(),
    });
    Ok(())
}
