//! 服务启动器
//!
//! 提供统一的服务启动模式

use std::future::Future;
use std::net::SocketAddr;

use prism_config::AppConfig;
use prism_errors::{AppError, AppResult};
use tonic::transport::Server;
use tracing::info;

use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 gRPC 服务
///
/// 负责：
/// 1. 加载配置
/// 2. 初始化运行时（日志、metrics）
/// 3. 调用用户提供的闭包构建 gRPC 服务
/// 4. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// use prism_bootstrap::run;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run("config", |config| async move {
///         let service = MyServiceImpl::new(&config)?;
///         Ok(MyServiceServer::new(service))
///     })
///     .await?;
///     Ok(())
/// }
/// ```
pub async fn run<F, Fut, S>(config_dir: &str, service_builder: F) -> AppResult<()>
where
    F: FnOnce(AppConfig) -> Fut,
    Fut: Future<Output = AppResult<S>>,
    S: tonic::codegen::Service<
            http::Request<tonic::body::Body>,
            Response = http::Response<tonic::body::Body>,
            Error = std::convert::Infallible,
        > + tonic::server::NamedService
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    // 1. 加载配置
    let config =
        AppConfig::load(config_dir).map_err(|e| AppError::configuration(e.to_string()))?;

    // 2. 初始化运行时
    init_runtime(&config)?;

    info!("Starting {} service", config.app_name);

    // 3. 构建服务地址
    let addr: SocketAddr = config
        .listen_addr()
        .parse()
        .map_err(|e| AppError::configuration(format!("Invalid listen address: {}", e)))?;

    // 4. 构建 gRPC 服务
    let service = service_builder(config).await?;

    info!(%addr, "gRPC server starting");

    // 5. 启动服务器
    Server::builder()
        .add_service(service)
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    info!("Service stopped");

    Ok(())
}
