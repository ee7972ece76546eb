use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use topo_validate::graph::{actions, Entity, EntityId, Graph, Loc, Node, Tags, Way};

/// Chain of `len` ways, each sharing an end node with the next
fn generate_chain(len: i64) -> Graph {
    let mut entities: Vec<Entity> = (1..=len + 1)
        .map(|i| {
            Entity::Node(Node {
                id: EntityId::node(i),
                loc: Loc::new(i as f64 * 0.0001, 0.0),
                tags: Tags::new(),
            })
        })
        .collect();
    entities.extend((1..=len).map(|i| {
        Entity::Way(Way {
            id: EntityId::way(i),
            nodes: vec![EntityId::node(i), EntityId::node(i + 1)],
            tags: Tags::from([("highway".to_string(), "service".to_string())]),
        })
    }));
    Graph::from_entities(entities)
}

/// Benchmark snapshot edits on graphs of growing size
fn bench_snapshot_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_edits");

    for &len in &[1_000, 10_000] {
        let graph = generate_chain(len);
        let mid = EntityId::way(len / 2);

        group.bench_with_input(BenchmarkId::new("replace", len), &graph, |b, graph| {
            b.iter(|| {
                let mut way = graph.way(&mid).cloned().unwrap();
                way.tags.insert("name".to_string(), "Bench".to_string());
                black_box(graph.replace(Entity::Way(way)))
            })
        });

        group.bench_with_input(BenchmarkId::new("delete_way", len), &graph, |b, graph| {
            b.iter(|| black_box(actions::delete_way(graph, black_box(&mid)).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark parent lookups used by the connectivity checks
fn bench_parent_lookups(c: &mut Criterion) {
    let graph = generate_chain(10_000);
    let ids: Vec<EntityId> = (1..=10_001).map(EntityId::node).collect();

    c.bench_function("parent_ways_10k", |b| {
        b.iter(|| {
            let total: usize = ids.iter().map(|id| graph.parent_ways(id).len()).sum();
            black_box(total)
        })
    });
}

criterion_group!(benches, bench_snapshot_edits, bench_parent_lookups);
criterion_main!(benches);
