use prism_errors::AppError;
use thiserror::Error;
use tonic::{Code, Status};

#[derive(Debug, Error)]
pub enum ReflectionError {
    /// 压缩描述符无法解压或解析
    #[error("bad descriptor: {0}")]
    Decode(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unimplemented(String),
    /// 请求未设置可识别的种类，终止会话
    #[error("{0}")]
    ProtocolViolation(String),
    /// 流读写失败，终止会话
    #[error("transport error: {0}")]
    Transport(Status),
    /// 缓存中同一键出现不同的值
    #[error("cache conflict: {0}")]
    CacheConflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ReflectionError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unimplemented(msg: impl Into<String>) -> Self {
        Self::Unimplemented(msg.into())
    }

    pub fn protocol_violation(msg: impl Into<String>) -> Self {
        Self::ProtocolViolation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// 写入 ErrorResponse 的错误码
    ///
    /// 除未实现的请求外，任何解析失败对客户端而言都是"找不到"
    pub fn response_code(&self) -> Code {
        match self {
            Self::Unimplemented(_) => Code::Unimplemented,
            _ => Code::NotFound,
        }
    }

    /// 转换为 gRPC 状态码
    pub fn grpc_code(&self) -> Code {
        match self {
            Self::NotFound(_) => Code::NotFound,
            Self::Unimplemented(_) => Code::Unimplemented,
            Self::ProtocolViolation(_) => Code::InvalidArgument,
            Self::Transport(status) => status.code(),
            Self::Decode(_) | Self::CacheConflict(_) | Self::Internal(_) => Code::Internal,
        }
    }
}

impl From<ReflectionError> for Status {
    fn from(error: ReflectionError) -> Self {
        match error {
            ReflectionError::Transport(status) => status,
            other => Status::new(other.grpc_code(), other.to_string()),
        }
    }
}

impl From<ReflectionError> for AppError {
    fn from(error: ReflectionError) -> Self {
        match error {
            ReflectionError::NotFound(msg) => AppError::NotFound(msg),
            ReflectionError::Unimplemented(msg) => AppError::Unimplemented(msg),
            ReflectionError::ProtocolViolation(msg) => AppError::Validation(msg),
            ReflectionError::Transport(status) => AppError::Transport(status.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

pub type ReflectionResult<T> = Result<T, ReflectionError>;
