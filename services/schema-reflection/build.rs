fn main() {
    // 反射协议的消息类型以 prost 结构体形式维护在 src/api/proto.rs，
    // 这里只生成 ServerReflection 的服务端与客户端骨架，无需 protoc
    let server_reflection_info = tonic_build::manual::Method::builder()
        .name("server_reflection_info")
        .route_name("ServerReflectionInfo")
        .input_type("crate::api::proto::ServerReflectionRequest")
        .output_type("crate::api::proto::ServerReflectionResponse")
        .codec_path("tonic::codec::ProstCodec")
        .client_streaming()
        .server_streaming()
        .build();

    let service = tonic_build::manual::Service::builder()
        .name("ServerReflection")
        .package("grpc.reflection.v1alpha")
        .method(server_reflection_info)
        .build();

    tonic_build::manual::Builder::new()
        .build_server(true)
        .build_client(true)
        .compile(&[service]);

    println!("cargo:rerun-if-changed=build.rs");
}
