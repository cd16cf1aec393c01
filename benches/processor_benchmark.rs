//! Benchmarks for tree construction, dispatch and rendering
//!
//! Measures performance of:
//! - Building trees with the `s!` builder
//! - Dispatch over whole trees (pass-through and rewriting processors)
//! - `updated` with and without changes
//! - `to_sexp` / `inspect` rendering and reading back

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use astkit::ast::{Node, Value, read, sym};
use astkit::error::ProcessError;
use astkit::processor::{HandlerTable, Processor};
use astkit::{handlers, s};

/// Generate a `begin` block of `width` statements, each nesting `depth` sends
fn generate_program(width: usize, depth: usize) -> Node {
    let statements: Vec<Value> = (0..width)
        .map(|i| {
            let mut expr = s!("lvar", sym("x"));
            for d in 0..depth {
                expr = s!("send", expr, sym("+"), s!("int", (i * depth + d) as i64));
            }
            expr.into()
        })
        .collect();
    Node::new("begin", statements)
}

struct Walk {
    handlers: HandlerTable<Walk>,
}

impl Processor for Walk {
    type Error = ProcessError;

    fn handlers(&self) -> &HandlerTable<Self> {
        &self.handlers
    }

    fn handler_missing(&mut self, node: &Node) -> Result<Option<Value>, ProcessError> {
        Ok(Some(self.process_children(node)?.into()))
    }
}

impl Walk {
    fn on_int(&mut self, node: &Node) -> Result<Option<Value>, ProcessError> {
        let value = node.child(0).and_then(Value::as_int).unwrap_or_default();
        Ok(Some(s!("int", value + 1).into()))
    }
}

// ============================================================================
// Benchmark: Construction
// ============================================================================

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for width in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(width), width, |b, &width| {
            b.iter(|| black_box(generate_program(width, 4)))
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Dispatch
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let tree = generate_program(200, 8);

    group.bench_function("pass_through", |b| {
        let mut walk = Walk { handlers: HandlerTable::new() };
        b.iter(|| black_box(walk.process(&tree)))
    });

    group.bench_function("rewrite_leaves", |b| {
        let mut walk = Walk { handlers: handlers!(Walk: int) };
        b.iter(|| black_box(walk.process(&tree)))
    });

    group.finish();
}

// ============================================================================
// Benchmark: Updates
// ============================================================================

fn bench_updated(c: &mut Criterion) {
    let mut group = c.benchmark_group("updated");
    let tree = generate_program(1000, 1);
    let same: Vec<Value> = tree.children().iter().cloned().collect();

    group.bench_function("fast_path", |b| {
        b.iter(|| black_box(tree.updated(None, Some(same.clone()), None)))
    });

    group.bench_function("append", |b| {
        b.iter(|| black_box(&tree << s!("nil")))
    });

    group.finish();
}

// ============================================================================
// Benchmark: Rendering
// ============================================================================

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    let tree = generate_program(200, 8);
    let text = tree.inspect();

    group.bench_function("to_sexp", |b| b.iter(|| black_box(tree.to_sexp())));
    group.bench_function("inspect", |b| b.iter(|| black_box(tree.inspect())));
    group.bench_function("read", |b| b.iter(|| black_box(read(&text))));

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets =
        bench_construction,
        bench_dispatch,
        bench_updated,
        bench_rendering
}

criterion_main!(benches);
