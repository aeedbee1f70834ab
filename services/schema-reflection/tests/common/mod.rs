//! 测试用 schema
//!
//! orders/v1/orders.proto：
//!   Order（嵌套 LineItem、枚举 Status）、GetOrderRequest、OrderService
//! audit/v1/audit.proto：
//!   AuditInfo，以及对 orders.v1.Order 的扩展 audit = 100、revision = 101

#![allow(dead_code)]

use std::sync::Arc;

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MethodDescriptorProto, ServiceDescriptorProto,
};
use schema_reflection::api::Dispatcher;
use schema_reflection::{DescriptorResolver, InMemorySchemaRegistry, SchemaRegistryBuilder};

pub const ORDERS_FILE: &str = "orders/v1/orders.proto";
pub const AUDIT_FILE: &str = "audit/v1/audit.proto";

pub fn field(name: &str, number: i32, ty: Type, type_name: Option<&str>) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        type_name: type_name.map(str::to_string),
        json_name: None,
        ..Default::default()
    }
}

pub fn extension(
    name: &str,
    number: i32,
    extendee: &str,
    ty: Type,
    type_name: Option<&str>,
) -> FieldDescriptorProto {
    FieldDescriptorProto {
        extendee: Some(extendee.to_string()),
        ..field(name, number, ty, type_name)
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

pub fn orders_file() -> FileDescriptorProto {
    let mut order = message(
        "Order",
        vec![
            field("id", 1, Type::String, None),
            field("items", 2, Type::Message, Some(".orders.v1.Order.LineItem")),
            field("status", 3, Type::Enum, Some(".orders.v1.Order.Status")),
        ],
    );
    order.nested_type.push(message(
        "LineItem",
        vec![
            field("sku", 1, Type::String, None),
            field("quantity", 2, Type::Int32, None),
        ],
    ));
    order.enum_type.push(EnumDescriptorProto {
        name: Some("Status".to_string()),
        value: vec![
            EnumValueDescriptorProto {
                name: Some("STATUS_UNSPECIFIED".to_string()),
                number: Some(0),
                options: None,
            },
            EnumValueDescriptorProto {
                name: Some("STATUS_OPEN".to_string()),
                number: Some(1),
                options: None,
            },
        ],
        ..Default::default()
    });

    FileDescriptorProto {
        name: Some(ORDERS_FILE.to_string()),
        package: Some("orders.v1".to_string()),
        message_type: vec![
            order,
            message("GetOrderRequest", vec![field("id", 1, Type::String, None)]),
        ],
        service: vec![ServiceDescriptorProto {
            name: Some("OrderService".to_string()),
            method: vec![MethodDescriptorProto {
                name: Some("GetOrder".to_string()),
                input_type: Some(".orders.v1.GetOrderRequest".to_string()),
                output_type: Some(".orders.v1.Order".to_string()),
                ..Default::default()
            }],
            options: None,
        }],
        syntax: Some("proto2".to_string()),
        ..Default::default()
    }
}

pub fn audit_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(AUDIT_FILE.to_string()),
        package: Some("audit.v1".to_string()),
        dependency: vec![ORDERS_FILE.to_string()],
        message_type: vec![message(
            "AuditInfo",
            vec![field("actor", 1, Type::String, None)],
        )],
        extension: vec![
            extension(
                "audit",
                100,
                ".orders.v1.Order",
                Type::Message,
                Some(".audit.v1.AuditInfo"),
            ),
            extension("revision", 101, ".orders.v1.Order", Type::Int32, None),
        ],
        syntax: Some("proto2".to_string()),
        ..Default::default()
    }
}

pub fn registry() -> Arc<InMemorySchemaRegistry> {
    let registry = SchemaRegistryBuilder::new()
        .add_file(orders_file())
        .add_file(audit_file())
        .build()
        .expect("fixture schema should build");
    Arc::new(registry)
}

pub fn resolver() -> Arc<DescriptorResolver> {
    let registry = registry();
    Arc::new(DescriptorResolver::new(registry.clone(), registry))
}

pub fn dispatcher() -> Dispatcher {
    Dispatcher::new(resolver())
}
