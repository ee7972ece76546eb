use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use topo_validate::graph::{Entity, EntityId, Graph, Loc, Node, Tags, Way};
use topo_validate::tags::TagTable;
use topo_validate::validation::{Context, Validator};

fn road_tags() -> Tags {
    Tags::from([("highway".to_string(), "residential".to_string())])
}

/// Square street grid of `size` x `size` intersections, existing ids.
///
/// Every `island_every`-th street is detached from the grid so some ways get
/// flagged.
fn generate_grid(size: i64, island_every: i64) -> Graph {
    let mut entities = Vec::new();
    let id = |row: i64, col: i64| row * size + col + 1;

    for row in 0..size {
        for col in 0..size {
            entities.push(Entity::Node(Node {
                id: EntityId::node(id(row, col)),
                loc: Loc::new(col as f64 * 0.001, row as f64 * 0.001),
                tags: Tags::new(),
            }));
        }
    }

    let mut next_way = 1;
    for row in 0..size {
        let nodes = (0..size).map(|col| EntityId::node(id(row, col))).collect();
        entities.push(Entity::Way(Way {
            id: EntityId::way(next_way),
            nodes,
            tags: road_tags(),
        }));
        next_way += 1;
    }
    for col in 0..size {
        if island_every > 0 && col % island_every == 0 {
            continue;
        }
        let nodes = (0..size).map(|row| EntityId::node(id(row, col))).collect();
        entities.push(Entity::Way(Way {
            id: EntityId::way(next_way),
            nodes,
            tags: road_tags(),
        }));
        next_way += 1;
    }

    // detached streets
    let base = size * size + 1;
    for i in 0..(size / island_every.max(1)) {
        let a = base + i * 2;
        for n in [a, a + 1] {
            entities.push(Entity::Node(Node {
                id: EntityId::node(n),
                loc: Loc::new(1.0, 1.0),
                tags: Tags::new(),
            }));
        }
        entities.push(Entity::Way(Way {
            id: EntityId::way(next_way),
            nodes: vec![EntityId::node(a), EntityId::node(a + 1)],
            tags: road_tags(),
        }));
        next_way += 1;
    }

    Graph::from_entities(entities)
}

/// Ring of `len` new ways that never touches the existing network
fn generate_new_ring(len: i64) -> Graph {
    let mut entities: Vec<Entity> = (1..=len)
        .map(|i| {
            Entity::Node(Node {
                id: EntityId::node(-i),
                loc: Loc::new(0.0, 0.0),
                tags: Tags::new(),
            })
        })
        .collect();
    entities.extend((1..=len).map(|i| {
        let next = if i == len { 1 } else { i + 1 };
        Entity::Way(Way {
            id: EntityId::way(-i),
            nodes: vec![EntityId::node(-i), EntityId::node(-next)],
            tags: road_tags(),
        })
    }));
    Graph::from_entities(entities)
}

/// Benchmark whole-graph validation on growing street grids
fn bench_grid_validation(c: &mut Criterion) {
    let table = TagTable::embedded();
    let validator = Validator::with_default_rules();

    let mut group = c.benchmark_group("grid_validation");

    for &size in &[10, 50, 100] {
        let graph = generate_grid(size, 10);
        group.throughput(Throughput::Elements(graph.len() as u64));
        group.bench_with_input(BenchmarkId::new("size", size), &graph, |b, graph| {
            b.iter(|| {
                let ctx = Context::new(black_box(graph), &table);
                black_box(validator.validate_graph(&ctx))
            })
        });
    }

    group.finish();
}

/// Benchmark reachability on rings of new ways, one search per way
fn bench_new_way_rings(c: &mut Criterion) {
    let table = TagTable::embedded();
    let validator = Validator::with_default_rules();

    let mut group = c.benchmark_group("new_way_rings");
    group.sample_size(10);

    for &len in &[100, 1_000] {
        let graph = generate_new_ring(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("ways", len), &graph, |b, graph| {
            b.iter(|| {
                let ctx = Context::new(black_box(graph), &table);
                black_box(validator.validate_graph(&ctx))
            })
        });
    }

    group.finish();
}

/// Benchmark validating a single way in a large graph
fn bench_single_entity(c: &mut Criterion) {
    let table = TagTable::embedded();
    let validator = Validator::with_default_rules();
    let graph = generate_grid(100, 10);
    let ctx = Context::new(&graph, &table);

    c.bench_function("single_way_in_grid", |b| {
        b.iter(|| black_box(validator.validate_entity(black_box(&EntityId::way(1)), &ctx)))
    });
}

criterion_group!(
    benches,
    bench_grid_validation,
    bench_new_way_rings,
    bench_single_entity
);
criterion_main!(benches);
