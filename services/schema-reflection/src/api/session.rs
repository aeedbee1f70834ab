//! 反射会话状态机
//!
//! Open → 处理一个请求 → Open … → Closed（输入流正常结束）
//!                            └→ Failed（协议错误或流读写失败）
//!
//! 每个请求的应答写出之后才读取下一个请求，会话内没有并发。

use std::pin::pin;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tonic::Status;
use tracing::{debug, warn};

use crate::api::dispatcher::Dispatcher;
use crate::api::proto::{ServerReflectionRequest, ServerReflectionResponse};
use crate::error::{ReflectionError, ReflectionResult};

/// 出站通道，`Err` 作为流的终止状态交给传输层
pub type ResponseSender = mpsc::Sender<Result<ServerReflectionResponse, Status>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
    Failed,
}

pub struct ReflectionSession {
    dispatcher: Dispatcher,
    state: SessionState,
    handled: u64,
}

impl ReflectionSession {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            state: SessionState::Open,
            handled: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 已写出的应答数
    pub fn handled(&self) -> u64 {
        self.handled
    }

    /// 驱动会话直到输入流结束或出错
    pub async fn run<S>(&mut self, inbound: S, outbound: &ResponseSender) -> ReflectionResult<()>
    where
        S: Stream<Item = Result<ServerReflectionRequest, Status>>,
    {
        let mut inbound = pin!(inbound);

        while self.state == SessionState::Open {
            let request = match inbound.next().await {
                Some(Ok(request)) => request,
                Some(Err(status)) => {
                    warn!(code = ?status.code(), "Failed to read reflection request");
                    // 对端可能已经离开，转发失败无需处理
                    let _ = outbound.send(Err(status.clone())).await;
                    return Err(self.fail(ReflectionError::Transport(status)));
                }
                None => {
                    self.state = SessionState::Closed;
                    break;
                }
            };

            let response = match self.dispatcher.dispatch(&request) {
                Ok(response) => response,
                Err(violation) => {
                    warn!(host = %request.host, error = %violation, "Terminating reflection session");
                    let status = Status::invalid_argument(violation.to_string());
                    let _ = outbound.send(Err(status)).await;
                    return Err(self.fail(violation));
                }
            };

            if outbound.send(Ok(response)).await.is_err() {
                return Err(self.fail(ReflectionError::Transport(Status::cancelled(
                    "response stream closed by peer",
                ))));
            }
            self.handled += 1;
        }

        debug!(handled = self.handled, "Reflection session closed");
        Ok(())
    }

    fn fail(&mut self, error: ReflectionError) -> ReflectionError {
        self.state = SessionState::Failed;
        error
    }
}
