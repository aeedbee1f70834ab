//! 请求分发
//!
//! 每个请求产生一个应答：成功时携带描述符或扩展号，失败时携带错误码与信息。
//! 唯一的例外是未设置请求种类，此时返回 [`ReflectionError::ProtocolViolation`]，由会话终止流。

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::api::proto::server_reflection_request::MessageRequest;
use crate::api::proto::server_reflection_response::MessageResponse;
use crate::api::proto::{
    ErrorResponse, ExtensionNumberResponse, FileDescriptorResponse, ServerReflectionRequest,
    ServerReflectionResponse,
};
use crate::application::{DescriptorResolver, wire_format};
use crate::error::{ReflectionError, ReflectionResult};

#[derive(Clone)]
pub struct Dispatcher {
    resolver: Arc<DescriptorResolver>,
}

impl Dispatcher {
    pub fn new(resolver: Arc<DescriptorResolver>) -> Self {
        Self { resolver }
    }

    pub fn dispatch(
        &self,
        request: &ServerReflectionRequest,
    ) -> ReflectionResult<ServerReflectionResponse> {
        let kind = request.message_request.as_ref().ok_or_else(|| {
            ReflectionError::protocol_violation(format!(
                "invalid MessageRequest: {:?}",
                request.message_request
            ))
        })?;

        let label = request_kind(kind);
        let start = Instant::now();

        let message_response = match self.resolve(kind) {
            Ok(response) => {
                metrics::counter!("reflection_requests_total", "kind" => label, "outcome" => "ok")
                    .increment(1);
                response
            }
            Err(e) => {
                metrics::counter!("reflection_requests_total", "kind" => label, "outcome" => "error")
                    .increment(1);
                debug!(kind = label, host = %request.host, error = %e, "Reflection request failed");
                error_response(&e)
            }
        };

        metrics::histogram!("reflection_request_duration_ms", "kind" => label)
            .record(start.elapsed().as_secs_f64() * 1000.0);

        Ok(ServerReflectionResponse {
            valid_host: request.host.clone(),
            original_request: Some(request.clone()),
            message_response: Some(message_response),
        })
    }

    fn resolve(&self, kind: &MessageRequest) -> ReflectionResult<MessageResponse> {
        match kind {
            MessageRequest::FileByFilename(filename) => self
                .resolver
                .file_descriptor_by_filename(filename)
                .map(|fd| file_response(&fd)),
            MessageRequest::FileContainingSymbol(symbol) => self
                .resolver
                .file_descriptor_containing_symbol(symbol)
                .map(|fd| file_response(&fd)),
            MessageRequest::FileContainingExtension(ext) => self
                .resolver
                .file_descriptor_containing_extension(&ext.containing_type, ext.extension_number)
                .map(|fd| file_response(&fd)),
            MessageRequest::AllExtensionNumbersOfType(type_name) => self
                .resolver
                .all_extension_numbers(type_name)
                .map(|numbers| {
                    MessageResponse::AllExtensionNumbersResponse(ExtensionNumberResponse {
                        base_type_name: type_name.clone(),
                        extension_number: numbers,
                    })
                }),
            MessageRequest::ListServices(_) => Err(ReflectionError::unimplemented(
                "list_services not implemented",
            )),
        }
    }
}

fn file_response(fd: &prost_types::FileDescriptorProto) -> MessageResponse {
    MessageResponse::FileDescriptorResponse(FileDescriptorResponse {
        file_descriptor_proto: vec![wire_format(fd)],
    })
}

fn error_response(error: &ReflectionError) -> MessageResponse {
    MessageResponse::ErrorResponse(ErrorResponse {
        error_code: error.response_code() as i32,
        error_message: error.to_string(),
    })
}

/// 用于日志与 metrics 的请求种类标签
pub fn request_kind(kind: &MessageRequest) -> &'static str {
    match kind {
        MessageRequest::FileByFilename(_) => "file_by_filename",
        MessageRequest::FileContainingSymbol(_) => "file_containing_symbol",
        MessageRequest::FileContainingExtension(_) => "file_containing_extension",
        MessageRequest::AllExtensionNumbersOfType(_) => "all_extension_numbers_of_type",
        MessageRequest::ListServices(_) => "list_services",
    }
}
