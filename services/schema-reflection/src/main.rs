//! Schema Reflection Service - 服务反射入口
//!
//! 使用 prism-bootstrap 统一启动模式

use std::sync::Arc;

use prism_config::AppConfig;
use schema_reflection::{DescriptorResolver, ReflectionServiceImpl, load_registry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    prism_bootstrap::run("config", |config: AppConfig| async move {
        let registry = Arc::new(load_registry(&config.reflection).await?);

        // 同一个注册表同时充当类型注册表与服务元数据存储
        let resolver = Arc::new(DescriptorResolver::new(registry.clone(), registry));

        Ok(ReflectionServiceImpl::new(resolver, config.reflection.session_buffer).into_server())
    })
    .await?;

    Ok(())
}
