//! 描述符解码
//!
//! 注册表中的描述符以 gzip 压缩的 FileDescriptorProto 存储。解码不做缓存，
//! 调用方应先查询 [`DescriptorCache`](super::cache::DescriptorCache)。

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use prism_ports::EncodedDescriptor;
use prost::Message;
use prost_types::FileDescriptorProto;

use crate::error::{ReflectionError, ReflectionResult};

/// 解压并解析一个压缩描述符；任何一步失败都不会返回部分结果
pub fn decode_file_descriptor(encoded: &[u8]) -> ReflectionResult<FileDescriptorProto> {
    let raw = decompress(encoded)?;
    FileDescriptorProto::decode(raw.as_slice())
        .map_err(|e| ReflectionError::decode(format!("malformed FileDescriptorProto: {}", e)))
}

/// 将描述符编码为注册表使用的压缩格式
pub fn encode_file_descriptor(fd: &FileDescriptorProto) -> ReflectionResult<EncodedDescriptor> {
    let compress_err =
        |e: std::io::Error| ReflectionError::internal(format!("failed to compress descriptor: {}", e));

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&fd.encode_to_vec()).map_err(compress_err)?;
    let bytes = encoder.finish().map_err(compress_err)?;
    Ok(EncodedDescriptor::from(bytes))
}

/// 发送给客户端的未压缩 wire format
pub fn wire_format(fd: &FileDescriptorProto) -> Vec<u8> {
    fd.encode_to_vec()
}

/// 按多成员格式读取：第一个成员之后的字节必须是完整的 gzip 成员，否则视为损坏
fn decompress(encoded: &[u8]) -> ReflectionResult<Vec<u8>> {
    let mut decoder = MultiGzDecoder::new(encoded);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| ReflectionError::decode(format!("bad gzipped descriptor: {}", e)))?;
    Ok(out)
}
