//! 描述符缓存
//!
//! 三张只增不删的映射：类型 → 名称、名称 → 类型、类型 → 文件描述符。
//! 由同一把读写锁保护，多个会话可并发读取与写入。
//!
//! 写入策略：同键同值为幂等操作；同键不同值视为内部不变量被破坏，
//! 返回 [`ReflectionError::CacheConflict`] 并保留原有条目。

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;
use prism_ports::TypeId;
use prost_types::FileDescriptorProto;

use crate::error::{ReflectionError, ReflectionResult};

#[derive(Debug, Default)]
struct CacheMaps {
    type_to_name: HashMap<TypeId, String>,
    name_to_type: HashMap<String, TypeId>,
    type_to_file: HashMap<TypeId, Arc<FileDescriptorProto>>,
}

/// 缓存条目数量快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub type_names: usize,
    pub file_descriptors: usize,
}

#[derive(Debug, Default)]
pub struct DescriptorCache {
    maps: RwLock<CacheMaps>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_name_for(&self, id: TypeId) -> Option<String> {
        let hit = self.maps.read().type_to_name.get(&id).cloned();
        record_lookup("type_name", hit.is_some());
        hit
    }

    pub fn type_identity_for(&self, name: &str) -> Option<TypeId> {
        let hit = self.maps.read().name_to_type.get(name).copied();
        record_lookup("type_identity", hit.is_some());
        hit
    }

    pub fn file_descriptor_for(&self, id: TypeId) -> Option<Arc<FileDescriptorProto>> {
        let hit = self.maps.read().type_to_file.get(&id).cloned();
        record_lookup("file_descriptor", hit.is_some());
        hit
    }

    /// 记录名称与类型标识的双向映射
    pub fn insert_type_name(&self, name: &str, id: TypeId) -> ReflectionResult<()> {
        let mut maps = self.maps.write();

        if let Some(existing) = maps.name_to_type.get(name) {
            if *existing != id {
                return Err(ReflectionError::CacheConflict(format!(
                    "name {:?} already maps to {}, refusing {}",
                    name, existing, id
                )));
            }
        }
        if let Some(existing) = maps.type_to_name.get(&id) {
            if existing != name {
                return Err(ReflectionError::CacheConflict(format!(
                    "{} already maps to {:?}, refusing {:?}",
                    id, existing, name
                )));
            }
        }

        maps.name_to_type.insert(name.to_string(), id);
        maps.type_to_name.insert(id, name.to_string());
        Ok(())
    }

    /// 记录类型所在的文件描述符，返回缓存中实际持有的实例
    ///
    /// 并发写入相同内容时，先写入者的 `Arc` 被所有调用方共享
    pub fn insert_file_descriptor(
        &self,
        id: TypeId,
        fd: FileDescriptorProto,
    ) -> ReflectionResult<Arc<FileDescriptorProto>> {
        let mut maps = self.maps.write();
        match maps.type_to_file.entry(id) {
            Entry::Occupied(entry) => {
                if **entry.get() == fd {
                    Ok(entry.get().clone())
                } else {
                    Err(ReflectionError::CacheConflict(format!(
                        "{} already maps to file {:?}, refusing {:?}",
                        id,
                        entry.get().name(),
                        fd.name()
                    )))
                }
            }
            Entry::Vacant(entry) => Ok(entry.insert(Arc::new(fd)).clone()),
        }
    }

    pub fn stats(&self) -> CacheStats {
        let maps = self.maps.read();
        CacheStats {
            type_names: maps.name_to_type.len(),
            file_descriptors: maps.type_to_file.len(),
        }
    }
}

fn record_lookup(kind: &'static str, hit: bool) {
    if hit {
        metrics::counter!("reflection_cache_hits_total", "kind" => kind).increment(1);
    } else {
        metrics::counter!("reflection_cache_misses_total", "kind" => kind).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_miss_is_none() {
        let cache = DescriptorCache::new();
        assert!(cache.type_identity_for("orders.v1.Order").is_none());
        assert!(cache.type_name_for(TypeId(1)).is_none());
        assert!(cache.file_descriptor_for(TypeId(1)).is_none());
    }

    #[test]
    fn test_insert_type_name_is_bidirectional() {
        let cache = DescriptorCache::new();
        cache.insert_type_name("orders.v1.Order", TypeId(1)).unwrap();

        assert_eq!(cache.type_identity_for("orders.v1.Order"), Some(TypeId(1)));
        assert_eq!(cache.type_name_for(TypeId(1)).as_deref(), Some("orders.v1.Order"));
    }

    #[test]
    fn test_insert_same_type_name_twice_is_noop() {
        let cache = DescriptorCache::new();
        cache.insert_type_name("orders.v1.Order", TypeId(1)).unwrap();
        cache.insert_type_name("orders.v1.Order", TypeId(1)).unwrap();

        assert_eq!(cache.stats().type_names, 1);
    }

    #[test]
    fn test_conflicting_type_name_is_rejected() {
        let cache = DescriptorCache::new();
        cache.insert_type_name("orders.v1.Order", TypeId(1)).unwrap();

        let err = cache.insert_type_name("orders.v1.Order", TypeId(2)).unwrap_err();
        assert!(matches!(err, ReflectionError::CacheConflict(_)));
        let err = cache.insert_type_name("orders.v1.Other", TypeId(1)).unwrap_err();
        assert!(matches!(err, ReflectionError::CacheConflict(_)));

        assert_eq!(cache.type_identity_for("orders.v1.Order"), Some(TypeId(1)));
        assert!(cache.type_identity_for("orders.v1.Other").is_none());
        assert!(cache.type_name_for(TypeId(2)).is_none());
    }

    #[test]
    fn test_insert_equal_descriptor_returns_cached_instance() {
        let cache = DescriptorCache::new();
        let first = cache.insert_file_descriptor(TypeId(1), file("a.proto")).unwrap();
        let second = cache.insert_file_descriptor(TypeId(1), file("a.proto")).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().file_descriptors, 1);
    }

    #[test]
    fn test_conflicting_descriptor_is_rejected() {
        let cache = DescriptorCache::new();
        cache.insert_file_descriptor(TypeId(1), file("a.proto")).unwrap();

        let err = cache
            .insert_file_descriptor(TypeId(1), file("b.proto"))
            .unwrap_err();
        assert!(matches!(err, ReflectionError::CacheConflict(_)));
        assert_eq!(
            cache.file_descriptor_for(TypeId(1)).unwrap().name(),
            "a.proto"
        );
    }

    #[test]
    fn test_concurrent_inserts_agree() {
        let cache = Arc::new(DescriptorCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    cache.insert_type_name("orders.v1.Order", TypeId(7)).unwrap();
                    cache.insert_file_descriptor(TypeId(7), file("a.proto")).unwrap()
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for fd in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], fd));
        }
        assert_eq!(
            cache.stats(),
            CacheStats {
                type_names: 1,
                file_descriptors: 1
            }
        );
    }
}
