mod common;

use std::hash::{BuildHasher, RandomState};

use astkit::ast::{Node, Value, read, read_value};
use astkit::error::ProcessError;
use astkit::processor::{HandlerTable, Processor};
use common::{ArbTree, node_count};
use quickcheck::{QuickCheck, TestResult};

/// Descends into every node and rebuilds it from its processed children.
#[derive(Default)]
struct Rebuild {
    handlers: HandlerTable<Rebuild>,
    visited: usize,
}

impl Processor for Rebuild {
    type Error = ProcessError;

    fn handlers(&self) -> &HandlerTable<Self> {
        &self.handlers
    }

    fn handler_missing(&mut self, node: &Node) -> Result<Option<Value>, ProcessError> {
        self.visited += 1;
        Ok(Some(self.process_children(node)?.into()))
    }
}

#[test]
fn test_property_inspect_reads_back() {
    fn prop(tree: ArbTree) -> TestResult {
        let ArbTree(tree) = tree;
        match read(&tree.inspect()) {
            Ok(back) if back == tree && back.eql(&tree) => TestResult::passed(),
            Ok(back) => TestResult::error(format!("read back {back:?}")),
            Err(e) => TestResult::error(format!("{e} in {}", tree.inspect())),
        }
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(ArbTree) -> TestResult);
}

#[test]
fn test_non_finite_floats_read_back() {
    let node = Node::new("lit", [-f64::NAN, f64::NAN, f64::INFINITY, f64::NEG_INFINITY]);
    assert_eq!(node.inspect(), "s(:lit, NaN, NaN, inf, -inf)");
    let back = read(&node.inspect()).unwrap();
    assert_eq!(back, node);
    assert!(back.eql(&node));

    let state = RandomState::new();
    assert_eq!(state.hash_one(&back), state.hash_one(&node));
}

#[test]
fn test_property_to_sexp_is_stable() {
    fn prop(tree: ArbTree) -> bool {
        let ArbTree(tree) = tree;
        let first = tree.to_sexp();
        first == tree.to_sexp() && read(&tree.inspect()).is_ok_and(|back| back.to_sexp() == first)
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(ArbTree) -> bool);
}

#[test]
fn test_property_updated_without_changes_is_identity() {
    fn prop(tree: ArbTree) -> bool {
        let ArbTree(tree) = tree;
        let children: Vec<Value> = tree.children().iter().cloned().collect();
        Node::ptr_eq(&tree.updated(None, None, None), &tree)
            && Node::ptr_eq(&tree.updated(Some(tree.node_type().clone()), Some(children), None), &tree)
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(ArbTree) -> bool);
}

#[test]
fn test_property_equal_trees_hash_alike() {
    fn prop(tree: ArbTree) -> TestResult {
        let ArbTree(tree) = tree;
        let Ok(copy) = read(&tree.inspect()) else {
            return TestResult::discard();
        };
        if Node::ptr_eq(&copy, &tree) {
            return TestResult::failed();
        }
        let state = RandomState::new();
        TestResult::from_bool(state.hash_one(&tree) == state.hash_one(&copy))
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(ArbTree) -> TestResult);
}

#[test]
fn test_property_rebuilding_processor_preserves_instances() {
    fn prop(tree: ArbTree) -> bool {
        let ArbTree(tree) = tree;
        let mut rebuild = Rebuild::default();
        let Ok(Value::Node(out)) = rebuild.process(&tree) else {
            return false;
        };
        Node::ptr_eq(&out, &tree) && rebuild.visited == node_count(&tree)
    }

    common::init_logging();
    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(ArbTree) -> bool);
}

#[test]
fn test_property_process_all_is_elementwise() {
    fn prop(tree: ArbTree) -> bool {
        let ArbTree(tree) = tree;
        let all = Rebuild::default().process_all(&tree);
        let mut single = Rebuild::default();
        let each: Result<Vec<Value>, _> = tree.children().iter().map(|child| single.process(child)).collect();
        all == each
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(ArbTree) -> bool);
}

#[test]
fn test_read_value_handles_edge_floats() {
    assert_eq!(read_value("-0.0").unwrap(), Value::Float(-0.0));
    assert_eq!(read_value("1e300").unwrap(), Value::Float(1e300));
    assert_eq!(read_value("inf").unwrap(), Value::Float(f64::INFINITY));
    assert!(matches!(read_value("NaN").unwrap(), Value::Float(f) if f.is_nan()));
    assert_eq!(read_value(&format!("{:?}", f64::MIN_POSITIVE)).unwrap(), Value::Float(f64::MIN_POSITIVE));
    assert_eq!(read_value(&i64::MIN.to_string()).unwrap(), Value::Int(i64::MIN));
}
