//! 从配置加载注册表

use prism_config::ReflectionConfig;
use prism_errors::{AppError, AppResult};
use tracing::info;

use super::memory_registry::{InMemorySchemaRegistry, SchemaRegistryBuilder};

/// 读取 `reflection.descriptor_sets` 中列出的 FileDescriptorSet 并构建注册表
pub async fn load_registry(config: &ReflectionConfig) -> AppResult<InMemorySchemaRegistry> {
    let mut builder = SchemaRegistryBuilder::new();
    for path in &config.descriptor_sets {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::configuration(format!("Failed to read descriptor set {}: {}", path, e))
        })?;
        builder = builder.add_file_descriptor_set(&bytes)?;
        info!(path = %path, "Descriptor set loaded");
    }

    let registry = builder.build()?;
    info!(
        files = registry.file_count(),
        types = registry.type_count(),
        "Schema registry ready"
    );
    Ok(registry)
}
