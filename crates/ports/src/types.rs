//! 注册表值类型

use std::fmt;

use bytes::Bytes;

/// 类型标识
///
/// 注册时分配，进程生命周期内稳定；相等即同一类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// 压缩后的文件描述符（gzip + protobuf wire format）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDescriptor(Bytes);

impl EncodedDescriptor {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for EncodedDescriptor {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for EncodedDescriptor {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for EncodedDescriptor {
    fn from(bytes: &'static [u8]) -> Self {
        Self(Bytes::from_static(bytes))
    }
}

/// 某个类型所在文件的压缩描述符，以及该类型在文件嵌套类型表中的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFileDescriptor {
    pub descriptor: EncodedDescriptor,
    /// 从文件顶层开始的零基下标路径，例如 `[2, 0]` 表示第三个消息的第一个嵌套类型
    pub path: Vec<usize>,
}

/// 扩展字段的值类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionValueType {
    /// 消息或枚举类型，持有其类型标识
    Named(TypeId),
    /// 标量类型（int32、string 等），没有独立的描述符
    Scalar(String),
}

/// 扩展描述：把扩展号与其携带的值类型关联起来，作用域为被扩展的类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    pub extended_type: TypeId,
    pub number: i32,
    /// 扩展字段的全限定名
    pub name: String,
    pub value_type: ExtensionValueType,
    /// 声明该扩展的文件名
    pub declared_in: String,
}
