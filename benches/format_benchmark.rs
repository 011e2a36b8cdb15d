use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};

use pbjson::reflect::{DynamicMessage, FieldDescriptor, FieldKind, MapKey, MessageDescriptor, Value};
use pbjson::well_known::{self, WellKnownType, number_value, string_value, struct_of};
use pbjson::{FormatOptions, JsonFormatter};

fn node_descriptor() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("bench.Node")
            .with_field(FieldDescriptor::new("node_id", 1, FieldKind::Int64))
            .with_field(FieldDescriptor::new("display_name", 2, FieldKind::String))
            .with_field(FieldDescriptor::new("weights", 3, FieldKind::Double).repeated())
            .with_field(FieldDescriptor::map(
                "labels",
                4,
                FieldKind::String,
                FieldDescriptor::map_value(FieldKind::String),
            ))
            .with_field(
                FieldDescriptor::new("children", 5, FieldKind::Message)
                    .repeated()
                    .with_message_type("bench.Node"),
            )
            .with_field(
                FieldDescriptor::new("created_at", 6, FieldKind::Message)
                    .with_message_type(WellKnownType::Timestamp.full_name()),
            )
            .with_field(
                FieldDescriptor::new("extra", 7, FieldKind::Message)
                    .with_message_type(WellKnownType::Struct.full_name()),
            ),
    )
}

fn tree(descriptor: &Arc<MessageDescriptor>, depth: usize, breadth: usize, id: &mut i64) -> DynamicMessage {
    *id += 1;
    let mut node = DynamicMessage::new(Arc::clone(descriptor))
        .with(1, *id)
        .with(2, format!("node <{id}>"))
        .with(3, vec![Value::F64(0.5), Value::F64(1.0 / 3.0), Value::F64(1e21)])
        .with(
            4,
            vec![
                (MapKey::from("kind"), Value::from("leaf")),
                (MapKey::from("zone"), Value::from("eu-west\u{2028}")),
            ],
        )
        .with(6, well_known::timestamp(1_700_000_000 + *id, 123_000_000))
        .with(
            7,
            struct_of([("score", number_value(0.25)), ("tag", string_value("x"))]),
        );

    if depth > 0 {
        let children: Vec<Value> = (0..breadth)
            .map(|_| tree(descriptor, depth - 1, breadth, id).into_value())
            .collect();
        node.set(5, children);
    }
    node
}

fn format_benchmark(c: &mut Criterion) {
    let descriptor = node_descriptor();
    let mut group = c.benchmark_group("format");

    for (label, depth, breadth) in [("small", 1, 2), ("nested", 3, 4), ("wide", 1, 64)] {
        let mut id = 0;
        let message = tree(&descriptor, depth, breadth, &mut id);
        let formatter = JsonFormatter::default();
        let size = formatter.format(&message).map_or(0, |json| json.len());
        group.throughput(Throughput::Bytes(u64::try_from(size).unwrap_or(u64::MAX)));

        group.bench_function(label, |b| {
            b.iter(|| formatter.format(black_box(&message)));
        });
    }

    let mut id = 0;
    let message = tree(&descriptor, 2, 4, &mut id);
    let formatter = JsonFormatter::new(Some(FormatOptions::default().emit_default_values(true)));
    group.bench_function("emit_defaults", |b| {
        b.iter(|| formatter.format(black_box(&message)));
    });

    group.finish();
}

criterion_group!(benches, format_benchmark);
criterion_main!(benches);
