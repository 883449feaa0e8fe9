use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use refjson::{
    from_str, impl_object, share, to_string, to_string_with_options, JsonOptions, Shared, Value,
};

#[derive(Default)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

impl_object!(User {
    id: u32,
    name: String,
    email: String,
    active: bool,
});

#[derive(Default)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

impl_object!(Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
});

#[derive(Default)]
struct Node {
    id: u32,
    peers: Vec<Shared<Node>>,
}

impl_object!(Node {
    id: u32,
    peers: Vec<Shared<Node>>,
});

fn user() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    }
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

/// A fully connected graph of `size` nodes.
fn mesh(size: u32) -> Vec<Shared<Node>> {
    let nodes: Vec<_> = (0..size)
        .map(|id| share(Node { id, peers: Vec::new() }))
        .collect();
    for node in &nodes {
        node.borrow_mut().peers = nodes.clone();
    }
    nodes
}

fn unmesh(nodes: &[Shared<Node>]) {
    for node in nodes {
        node.borrow_mut().peers.clear();
    }
}

fn benchmark_encode_simple(c: &mut Criterion) {
    let user = user();

    c.bench_function("encode_simple_object", |b| {
        b.iter(|| to_string(black_box(&user)))
    });
}

fn benchmark_decode_simple(c: &mut Criterion) {
    let json = r#"{"id":123,"name":"Alice","email":"alice@example.com","active":true}"#;

    c.bench_function("decode_simple_object", |b| {
        b.iter(|| from_str::<User>(black_box(json)))
    });
}

fn benchmark_encode_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_array");

    for size in [10, 50, 100, 500].iter() {
        let products = products(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&products)))
        });
    }
    group.finish();
}

fn benchmark_decode_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_array");

    for size in [10, 50, 100, 500].iter() {
        let json = to_string(&products(*size)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| from_str::<Vec<Product>>(black_box(json)))
        });
    }
    group.finish();
}

fn benchmark_shared_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared_graph");
    let options = JsonOptions::tracked();

    for size in [4, 16, 32].iter() {
        let nodes = mesh(*size);
        let json = to_string_with_options(&nodes, &options).unwrap();

        group.bench_with_input(BenchmarkId::new("encode", size), &nodes, |b, nodes| {
            b.iter(|| to_string_with_options(black_box(nodes), &options))
        });

        group.bench_with_input(BenchmarkId::new("decode", size), &json, |b, json| {
            b.iter(|| {
                let decoded = from_str::<Vec<Shared<Node>>>(black_box(json)).unwrap();
                unmesh(&decoded);
            })
        });

        unmesh(&nodes);
    }
    group.finish();
}

fn benchmark_primitive_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitive_array");

    let numbers: Vec<i32> = (0..100).collect();
    let floats: Vec<f64> = (0..100).map(|i| i as f64 * 1.5).collect();

    group.bench_function("encode_integers", |b| {
        b.iter(|| to_string(black_box(&numbers)))
    });

    group.bench_function("encode_floats", |b| {
        b.iter(|| to_string(black_box(&floats)))
    });

    let numbers_json = to_string(&numbers).unwrap();
    let floats_json = to_string(&floats).unwrap();

    group.bench_function("decode_integers", |b| {
        b.iter(|| from_str::<Vec<i32>>(black_box(&numbers_json)))
    });

    group.bench_function("decode_floats", |b| {
        b.iter(|| from_str::<Vec<f64>>(black_box(&floats_json)))
    });

    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let json = to_string(&products(100)).unwrap();

    let mut group = c.benchmark_group("comparison");

    group.bench_function("refjson_decode_value", |b| {
        b.iter(|| from_str::<Value>(black_box(&json)))
    });

    group.bench_function("serde_json_decode_value", |b| {
        b.iter(|| serde_json::from_str::<serde_json::Value>(black_box(&json)))
    });

    group.finish();
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let user = user();

    c.bench_function("roundtrip_simple", |b| {
        b.iter(|| {
            let encoded = to_string(black_box(&user)).unwrap();
            let _decoded: User = from_str(black_box(&encoded)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_encode_simple,
    benchmark_decode_simple,
    benchmark_encode_array,
    benchmark_decode_array,
    benchmark_shared_graph,
    benchmark_primitive_array,
    benchmark_comparison_with_json,
    benchmark_roundtrip
);
criterion_main!(benches);
