//! grpc.reflection.v1alpha 协议类型
//!
//! 消息结构体与 reflection.proto 保持字段编号一致；服务骨架由 build.rs 生成

/// 客户端在 ServerReflectionInfo 流上发送的请求
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerReflectionRequest {
    #[prost(string, tag = "1")]
    pub host: ::prost::alloc::string::String,
    /// 请求种类，恰好设置一个；未设置或无法识别的种类视为协议错误
    #[prost(
        oneof = "server_reflection_request::MessageRequest",
        tags = "3, 4, 5, 6, 7"
    )]
    pub message_request: ::core::option::Option<server_reflection_request::MessageRequest>,
}

/// `ServerReflectionRequest` 的嵌套类型
pub mod server_reflection_request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum MessageRequest {
        /// 按文件名查找 proto 文件
        #[prost(string, tag = "3")]
        FileByFilename(::prost::alloc::string::String),
        /// 查找声明该全限定符号的文件（`<package>.<service>[.<method>]` 或 `<package>.<type>`）
        #[prost(string, tag = "4")]
        FileContainingSymbol(::prost::alloc::string::String),
        /// 查找声明某类型某扩展号的文件
        #[prost(message, tag = "5")]
        FileContainingExtension(super::ExtensionRequest),
        /// 列出某类型的全部扩展号
        #[prost(string, tag = "6")]
        AllExtensionNumbersOfType(::prost::alloc::string::String),
        /// 列出已注册服务，内容不做检查
        #[prost(string, tag = "7")]
        ListServices(::prost::alloc::string::String),
    }
}

/// file_containing_extension 请求参数
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExtensionRequest {
    /// 被扩展类型的全限定名，`<package>.<type>`
    #[prost(string, tag = "1")]
    pub containing_type: ::prost::alloc::string::String,
    #[prost(int32, tag = "2")]
    pub extension_number: i32,
}

/// 服务端对每个请求的应答
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerReflectionResponse {
    #[prost(string, tag = "1")]
    pub valid_host: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub original_request: ::core::option::Option<ServerReflectionRequest>,
    #[prost(
        oneof = "server_reflection_response::MessageResponse",
        tags = "4, 5, 6, 7"
    )]
    pub message_response: ::core::option::Option<server_reflection_response::MessageResponse>,
}

/// `ServerReflectionResponse` 的嵌套类型
pub mod server_reflection_response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum MessageResponse {
        #[prost(message, tag = "4")]
        FileDescriptorResponse(super::FileDescriptorResponse),
        #[prost(message, tag = "5")]
        AllExtensionNumbersResponse(super::ExtensionNumberResponse),
        #[prost(message, tag = "6")]
        ListServicesResponse(super::ListServiceResponse),
        #[prost(message, tag = "7")]
        ErrorResponse(super::ErrorResponse),
    }
}

/// 序列化后的 FileDescriptorProto 列表
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileDescriptorResponse {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub file_descriptor_proto: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

/// all_extension_numbers_of_type 的应答
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExtensionNumberResponse {
    /// 基础类型全限定名，`<package>.<type>`
    #[prost(string, tag = "1")]
    pub base_type_name: ::prost::alloc::string::String,
    #[prost(int32, repeated, tag = "2")]
    pub extension_number: ::prost::alloc::vec::Vec<i32>,
}

/// list_services 的应答
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListServiceResponse {
    #[prost(message, repeated, tag = "1")]
    pub service: ::prost::alloc::vec::Vec<ServiceResponse>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServiceResponse {
    /// 服务全限定名，`<package>.<service>`
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
}

/// 单个请求失败时返回的错误码与信息，错误码取自 grpc::StatusCode
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ErrorResponse {
    #[prost(int32, tag = "1")]
    pub error_code: i32,
    #[prost(string, tag = "2")]
    pub error_message: ::prost::alloc::string::String,
}

include!(concat!(
    env!("OUT_DIR"),
    "/grpc.reflection.v1alpha.ServerReflection.rs"
));
