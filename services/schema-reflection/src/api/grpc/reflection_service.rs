//! ServerReflection gRPC 服务实现

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tracing::{Instrument, info, info_span, warn};

use crate::api::dispatcher::Dispatcher;
use crate::api::proto::server_reflection_server::{ServerReflection, ServerReflectionServer};
use crate::api::proto::{ServerReflectionRequest, ServerReflectionResponse};
use crate::api::session::ReflectionSession;
use crate::application::DescriptorResolver;

/// 反射服务
///
/// 所有会话共享同一个解析器与缓存，每个会话在独立的任务中顺序处理请求
pub struct ReflectionServiceImpl {
    resolver: Arc<DescriptorResolver>,
    session_buffer: usize,
}

impl ReflectionServiceImpl {
    pub fn new(resolver: Arc<DescriptorResolver>, session_buffer: usize) -> Self {
        Self {
            resolver,
            session_buffer: session_buffer.max(1),
        }
    }

    pub fn into_server(self) -> ServerReflectionServer<Self> {
        ServerReflectionServer::new(self)
    }
}

#[tonic::async_trait]
impl ServerReflection for ReflectionServiceImpl {
    type ServerReflectionInfoStream = ReceiverStream<Result<ServerReflectionResponse, Status>>;

    async fn server_reflection_info(
        &self,
        request: Request<Streaming<ServerReflectionRequest>>,
    ) -> Result<Response<Self::ServerReflectionInfoStream>, Status> {
        let remote = request
            .remote_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let inbound = request.into_inner();

        let (tx, rx) = mpsc::channel(self.session_buffer);
        let mut session = ReflectionSession::new(Dispatcher::new(self.resolver.clone()));

        let span = info_span!("reflection_session", remote = %remote);
        tokio::spawn(
            async move {
                info!("Reflection session opened");
                match session.run(inbound, &tx).await {
                    Ok(()) => info!(handled = session.handled(), "Reflection session finished"),
                    Err(e) => warn!(
                        handled = session.handled(),
                        error = %e,
                        "Reflection session terminated"
                    ),
                }
            }
            .instrument(span),
        );

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}
