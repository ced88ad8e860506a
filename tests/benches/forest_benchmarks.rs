//! # Forest Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | codec | marshal / unmarshal (unmarshal includes the id digest) |
//! | validation | shallow validation with Ed25519 verification |
//! | store | MemoryStore add + get, children lookups |
//! | archive | round trip through the worker thread |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use forest_bus::Archive;
use forest_store::{descendants_of, MemoryStore, Store};
use forest_types::test_utils::TestForest;
use forest_types::{validate_shallow, Ed25519Verifier, Node};

/// A chain of `depth` replies under the fixture conversation.
fn reply_chain(forest: &TestForest, depth: usize) -> Vec<Node> {
    let mut nodes = forest.all_nodes();
    let mut parent = Node::from(forest.reply.clone());
    for i in 0..depth {
        let next = Node::from(forest.reply_to(&parent, &format!("reply {i}")));
        nodes.push(next.clone());
        parent = next;
    }
    nodes
}

fn bench_codec(c: &mut Criterion) {
    let forest = TestForest::new();
    let reply = Node::from(forest.reply.clone());
    let bytes = reply.marshal();

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("marshal_reply", |b| b.iter(|| black_box(reply.marshal())));
    group.bench_function("unmarshal_reply", |b| {
        b.iter(|| black_box(Node::unmarshal(black_box(&bytes)).is_ok()))
    });
    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let forest = TestForest::new();
    let reply = Node::from(forest.reply.clone());

    c.bench_function("validate_shallow_reply", |b| {
        b.iter(|| {
            black_box(validate_shallow(&reply, Some(&forest.identity), &Ed25519Verifier).is_ok())
        })
    });
}

fn bench_memory_store(c: &mut Criterion) {
    let forest = TestForest::new();
    let mut group = c.benchmark_group("memory_store");

    for depth in [10usize, 100, 500] {
        let nodes = reply_chain(&forest, depth);
        group.throughput(Throughput::Elements(nodes.len() as u64));
        group.bench_with_input(BenchmarkId::new("add_all", depth), &nodes, |b, nodes| {
            b.iter(|| {
                let mut store = MemoryStore::new();
                for node in nodes {
                    let _ = store.add(node.clone());
                }
                black_box(store.len())
            })
        });

        let mut store = MemoryStore::new();
        for node in &nodes {
            let _ = store.add(node.clone());
        }
        let root = forest.conversation.id().clone();
        group.bench_with_input(BenchmarkId::new("descendants", depth), &root, |b, root| {
            b.iter(|| black_box(descendants_of(&store, root).map(|d| d.len()).ok()))
        });
    }
    group.finish();
}

fn bench_archive(c: &mut Criterion) {
    let forest = TestForest::new();
    let Ok(archive) = Archive::with_defaults(MemoryStore::new()) else {
        return;
    };
    for node in forest.all_nodes() {
        let _ = archive.add(node);
    }
    let id = forest.reply.id().clone();

    c.bench_function("archive_get_round_trip", |b| {
        b.iter(|| black_box(archive.get(&id).ok().flatten().is_some()))
    });
    archive.destroy();
}

criterion_group!(
    benches,
    bench_codec,
    bench_validation,
    bench_memory_store,
    bench_archive
);
criterion_main!(benches);
