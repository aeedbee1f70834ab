//! 服务运行时

use std::net::SocketAddr;

use prism_config::AppConfig;
use prism_errors::{AppError, AppResult};
use prism_telemetry::{init_metrics, init_tracing, init_tracing_json};
use tracing::{error, info};

/// 初始化服务运行时（日志与 metrics 导出）
pub fn init_runtime(config: &AppConfig) -> AppResult<()> {
    if config.is_production() {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }

    if let Some(port) = config.telemetry.metrics_port {
        let addr: SocketAddr = format!("{}:{}", config.server.host, port)
            .parse()
            .map_err(|e| AppError::configuration(format!("Invalid metrics address: {}", e)))?;
        init_metrics(addr)
            .map_err(|e| AppError::internal(format!("Failed to install Prometheus recorder: {}", e)))?;
        info!(%addr, "Prometheus exporter listening");
    }

    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        "Runtime initialized"
    );

    Ok(())
}

/// 等待关闭信号
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
