//! Ordered execution of named passes over a tree.
//!
//! Passes are organized in a dependency graph and run in topological order,
//! so a pass always sees the output of the passes it depends on.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use tracing::debug;

use crate::ast::{Node, Value};
use crate::error::{BoxError, PipelineError};

use super::dispatch::Processor;

/// A single step of a [`Pipeline`]. Every [`Processor`] with a standard error
/// type is a pass; [`pass_fn`] adapts a closure.
pub trait Pass {
    fn run(&mut self, tree: &Node) -> Result<Value, BoxError>;
}

impl<P> Pass for P
where
    P: Processor,
    P::Error: std::error::Error + Send + Sync + 'static,
{
    fn run(&mut self, tree: &Node) -> Result<Value, BoxError> {
        self.process(tree).map_err(Into::into)
    }
}

/// Closure adapter returned by [`pass_fn`].
pub struct FnPass<F>(F);

impl<F> Pass for FnPass<F>
where
    F: FnMut(&Node) -> Result<Node, BoxError>,
{
    fn run(&mut self, tree: &Node) -> Result<Value, BoxError> {
        (self.0)(tree).map(Value::Node)
    }
}

/// Wraps a tree-to-tree closure as a pass.
pub fn pass_fn<F>(f: F) -> FnPass<F>
where
    F: FnMut(&Node) -> Result<Node, BoxError>,
{
    FnPass(f)
}

/// A named pass and the ids of the passes that must run before it.
pub struct Transform {
    /// Unique name within a pipeline.
    pub id: String,
    /// Ids of transforms that must run first. Each must be registered before this one.
    pub dependencies: Vec<String>,
    /// The work itself, run on the tree produced by the preceding transforms.
    pub pass: Box<dyn Pass + Send>,
}

impl Transform {
    /// Creates a transform.
    ///
    /// # Arguments
    /// * `id` - The unique id of the transform.
    /// * `dependencies` - Ids of the transforms that must run before this one.
    /// * `pass` - The pass to run.
    pub fn new<P>(id: impl Into<String>, dependencies: &[&str], pass: P) -> Self
    where
        P: Pass + Send + 'static,
    {
        Transform {
            id: id.into(),
            dependencies: dependencies.iter().map(|dep| dep.to_string()).collect(),
            pass: Box::new(pass),
        }
    }
}

#[derive(Default)]
pub struct Pipeline {
    graph: StableGraph<Transform, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a transform. Its dependencies must already be registered.
    ///
    /// # Arguments
    /// * `transform` - The transform to add.
    pub fn add_transform(&mut self, transform: Transform) -> Result<(), PipelineError> {
        if self.node_indices.contains_key(&transform.id) {
            return Err(PipelineError::DuplicateTransform(transform.id));
        }
        let mut dependency_nodes = Vec::with_capacity(transform.dependencies.len());
        for dependency in &transform.dependencies {
            match self.node_indices.get(dependency) {
                Some(index) => dependency_nodes.push(*index),
                None => {
                    return Err(PipelineError::UnknownDependency {
                        id: transform.id.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        let id = transform.id.clone();
        let node = self.graph.add_node(transform);
        for dependency in dependency_nodes {
            self.graph.add_edge(dependency, node, ());
        }
        self.node_indices.insert(id, node);
        Ok(())
    }

    /// Makes `id` run after `dependency`. Both must be registered.
    pub fn add_dependency(&mut self, id: &str, dependency: &str) -> Result<(), PipelineError> {
        let unknown = |missing: &str| PipelineError::UnknownDependency {
            id: id.to_string(),
            dependency: missing.to_string(),
        };
        let node = *self.node_indices.get(id).ok_or_else(|| unknown(id))?;
        let dep = *self.node_indices.get(dependency).ok_or_else(|| unknown(dependency))?;
        self.graph[node].dependencies.push(dependency.to_string());
        self.graph.add_edge(dep, node, ());
        Ok(())
    }

    /// Removes a transform and its edges, returning it.
    pub fn remove_transform(&mut self, id: &str) -> Option<Transform> {
        let node = self.node_indices.remove(id)?;
        self.graph.remove_node(node)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.node_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }

    /// The ids in execution order.
    pub fn order(&self) -> Result<Vec<&str>, PipelineError> {
        Ok(self
            .sorted()?
            .into_iter()
            .map(|index| self.graph[index].id.as_str())
            .collect())
    }

    fn sorted(&self) -> Result<Vec<NodeIndex>, PipelineError> {
        toposort(&self.graph, None)
            .map_err(|cycle| PipelineError::Cycle(self.graph[cycle.node_id()].id.clone()))
    }

    /// Runs every pass in dependency order, feeding each the previous output.
    pub fn apply(&mut self, tree: &Node) -> Result<Node, PipelineError> {
        let order = self.sorted()?;
        let mut current = tree.clone();
        for index in order {
            let transform = &mut self.graph[index];
            debug!(transform = %transform.id, node_type = %current.node_type(), "running transform");
            let output = transform.pass.run(&current).map_err(|source| PipelineError::Transform {
                id: transform.id.clone(),
                source,
            })?;
            current = match output {
                Value::Node(node) => node,
                other => {
                    return Err(PipelineError::NotANode {
                        id: transform.id.clone(),
                        found: other.kind_name(),
                    });
                }
            };
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rename(to: &'static str) -> FnPass<impl FnMut(&Node) -> Result<Node, BoxError>> {
        pass_fn(move |tree: &Node| Ok(tree.with_type(to)))
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let mut pipeline = Pipeline::new();
        let tree = Node::new("root", [1]);
        let result = pipeline.apply(&tree).unwrap();
        assert!(Node::ptr_eq(&tree, &result));
    }

    #[test]
    fn test_dependencies_run_first() {
        let mut pipeline = Pipeline::new();
        pipeline.add_transform(Transform::new("first", &[], rename("first"))).unwrap();
        pipeline.add_transform(Transform::new("second", &["first"], rename("second"))).unwrap();
        assert_eq!(pipeline.order().unwrap(), vec!["first", "second"]);
        assert_eq!(pipeline.apply(&Node::leaf("root")).unwrap().node_type(), "second");
    }

    #[test]
    fn test_registration_errors() {
        let mut pipeline = Pipeline::new();
        pipeline.add_transform(Transform::new("a", &[], rename("a"))).unwrap();
        assert!(matches!(
            pipeline.add_transform(Transform::new("a", &[], rename("a"))),
            Err(PipelineError::DuplicateTransform(id)) if id == "a"
        ));
        assert!(matches!(
            pipeline.add_transform(Transform::new("b", &["missing"], rename("b"))),
            Err(PipelineError::UnknownDependency { dependency, .. }) if dependency == "missing"
        ));
        assert_eq!(pipeline.len(), 1);
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut pipeline = Pipeline::new();
        pipeline.add_transform(Transform::new("a", &[], rename("a"))).unwrap();
        pipeline.add_transform(Transform::new("b", &["a"], rename("b"))).unwrap();
        pipeline.add_dependency("a", "b").unwrap();
        assert!(matches!(pipeline.apply(&Node::leaf("root")), Err(PipelineError::Cycle(_))));
    }

    #[test]
    fn test_remove_transform() {
        let mut pipeline = Pipeline::new();
        pipeline.add_transform(Transform::new("a", &[], rename("a"))).unwrap();
        pipeline.add_transform(Transform::new("b", &[], rename("b"))).unwrap();
        let removed = pipeline.remove_transform("a").unwrap();
        assert_eq!(removed.id, "a");
        assert!(!pipeline.contains("a"));
        assert_eq!(pipeline.order().unwrap(), vec!["b"]);
        assert!(pipeline.remove_transform("a").is_none());
    }
}
