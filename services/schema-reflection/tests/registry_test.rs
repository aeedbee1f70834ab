//! 内存注册表测试

mod common;

use common::*;
use prism_config::ReflectionConfig;
use prism_errors::AppError;
use prism_ports::{ExtensionValueType, SchemaRegistry, ServiceMetadataStore};
use prost::Message;
use prost_types::field_descriptor_proto::Type;
use prost_types::FileDescriptorSet;
use schema_reflection::{SchemaRegistryBuilder, load_registry};
use schema_reflection::application::decode_file_descriptor;

#[test]
fn test_types_registered_with_nested_paths() {
    let registry = registry();

    let order = registry.type_by_name("orders.v1.Order").unwrap();
    let line_item = registry.type_by_name("orders.v1.Order.LineItem").unwrap();
    let request = registry.type_by_name("orders.v1.GetOrderRequest").unwrap();
    let status = registry.type_by_name("orders.v1.Order.Status").unwrap();
    assert_ne!(order, line_item);
    assert_ne!(order, status);

    assert_eq!(registry.encoded_file_descriptor(order).unwrap().path, vec![0]);
    assert_eq!(registry.encoded_file_descriptor(line_item).unwrap().path, vec![0, 0]);
    assert_eq!(registry.encoded_file_descriptor(request).unwrap().path, vec![1]);

    assert!(registry.type_by_name(".orders.v1.Order").is_none());
    assert!(registry.type_by_name("Order").is_none());
    assert_eq!(registry.type_count(), 5);
    assert_eq!(registry.file_count(), 2);
}

#[test]
fn test_type_descriptor_points_at_declaring_file() {
    let registry = registry();
    let id = registry.type_by_name("audit.v1.AuditInfo").unwrap();

    let encoded = registry.encoded_file_descriptor(id).unwrap();
    let fd = decode_file_descriptor(encoded.descriptor.as_bytes()).unwrap();

    assert_eq!(fd, audit_file());
}

#[test]
fn test_file_by_filename() {
    let registry = registry();

    let encoded = registry.encoded_file_by_filename(ORDERS_FILE).unwrap();
    let fd = decode_file_descriptor(encoded.as_bytes()).unwrap();
    assert_eq!(fd.name(), ORDERS_FILE);
    assert_eq!(fd, orders_file());

    assert!(registry.encoded_file_by_filename("missing.proto").is_none());
}

#[test]
fn test_service_and_method_symbols() {
    let registry = registry();

    let service = registry.metadata_for("orders.v1.OrderService").unwrap();
    let method = registry.metadata_for("orders.v1.OrderService.GetOrder").unwrap();
    assert_eq!(service, method);
    assert_eq!(
        decode_file_descriptor(service.as_bytes()).unwrap().name(),
        ORDERS_FILE
    );

    assert!(registry.metadata_for("orders.v1.OrderService.DeleteOrder").is_none());
    assert!(registry.metadata_for("orders.v1.Order").is_none());
}

#[test]
fn test_extensions_registered_on_extended_type() {
    let registry = registry();
    let order = registry.type_by_name("orders.v1.Order").unwrap();
    let audit_info = registry.type_by_name("audit.v1.AuditInfo").unwrap();

    let mut extensions = registry.registered_extensions(order);
    extensions.sort_by_key(|ext| ext.number);

    assert_eq!(extensions.len(), 2);
    assert_eq!(extensions[0].number, 100);
    assert_eq!(extensions[0].name, "audit.v1.audit");
    assert_eq!(extensions[0].value_type, ExtensionValueType::Named(audit_info));
    assert_eq!(extensions[0].declared_in, AUDIT_FILE);
    assert_eq!(extensions[1].number, 101);
    assert_eq!(
        extensions[1].value_type,
        ExtensionValueType::Scalar("TYPE_INT32".to_string())
    );

    assert!(registry.registered_extensions(audit_info).is_empty());
}

#[test]
fn test_extension_may_reference_later_file() {
    let registry = SchemaRegistryBuilder::new()
        .add_file(audit_file())
        .add_file(orders_file())
        .build()
        .unwrap();

    let order = registry.type_by_name("orders.v1.Order").unwrap();
    assert_eq!(registry.registered_extensions(order).len(), 2);
}

#[test]
fn test_load_from_file_descriptor_set() {
    let set = FileDescriptorSet {
        file: vec![orders_file(), audit_file()],
    };

    let registry = SchemaRegistryBuilder::new()
        .add_file_descriptor_set(&set.encode_to_vec())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(registry.file_count(), 2);
    assert!(registry.type_by_name("audit.v1.AuditInfo").is_some());
}

#[test]
fn test_invalid_file_descriptor_set_rejected() {
    let result = SchemaRegistryBuilder::new().add_file_descriptor_set(b"\xff\xff\xff");
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[test]
fn test_duplicate_file_rejected() {
    let result = SchemaRegistryBuilder::new()
        .add_file(orders_file())
        .add_file(orders_file())
        .build();

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[test]
fn test_duplicate_type_rejected() {
    let mut copy = orders_file();
    copy.name = Some("orders/v1/orders_copy.proto".to_string());
    copy.service.clear();

    let result = SchemaRegistryBuilder::new()
        .add_file(orders_file())
        .add_file(copy)
        .build();

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[test]
fn test_duplicate_extension_number_rejected() {
    let mut audit = audit_file();
    audit
        .extension
        .push(extension("revision_again", 101, ".orders.v1.Order", Type::Int64, None));

    let result = SchemaRegistryBuilder::new()
        .add_file(orders_file())
        .add_file(audit)
        .build();

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[test]
fn test_unknown_extendee_rejected() {
    let result = SchemaRegistryBuilder::new().add_file(audit_file()).build();
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[test]
fn test_unnamed_file_rejected() {
    let mut file = orders_file();
    file.name = None;

    let result = SchemaRegistryBuilder::new().add_file(file).build();
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[test]
fn test_empty_registry() {
    let registry = SchemaRegistryBuilder::new().build().unwrap();

    assert_eq!(registry.file_count(), 0);
    assert!(registry.type_by_name("orders.v1.Order").is_none());
    assert!(registry.metadata_for("orders.v1.OrderService").is_none());
}

#[tokio::test]
async fn test_load_registry_from_configured_files() {
    let set = FileDescriptorSet {
        file: vec![orders_file(), audit_file()],
    };
    let path = std::env::temp_dir().join(format!(
        "schema-reflection-registry-{}.bin",
        std::process::id()
    ));
    std::fs::write(&path, set.encode_to_vec()).unwrap();

    let config = ReflectionConfig {
        descriptor_sets: vec![path.to_string_lossy().into_owned()],
        ..Default::default()
    };
    let result = load_registry(&config).await;
    std::fs::remove_file(&path).unwrap();

    let registry = result.unwrap();
    assert_eq!(registry.file_count(), 2);
    assert!(registry.type_by_name("orders.v1.Order.LineItem").is_some());
}

#[tokio::test]
async fn test_load_registry_without_files_is_empty() {
    let registry = load_registry(&ReflectionConfig::default()).await.unwrap();
    assert_eq!(registry.file_count(), 0);
}

#[tokio::test]
async fn test_load_registry_missing_file_is_configuration_error() {
    let config = ReflectionConfig {
        descriptor_sets: vec!["does/not/exist.bin".to_string()],
        ..Default::default()
    };

    let result = load_registry(&config).await;
    assert!(matches!(result, Err(AppError::Configuration(_))));
}
