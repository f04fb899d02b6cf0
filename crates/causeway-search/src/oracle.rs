//! Independence oracle interface.
//!
//! The search never computes statistics itself. It asks an
//! [`IndependenceOracle`] whether `x _||_ y | z` and receives a verdict
//! plus a score where larger means "more clearly independent".
//!
//! Every oracle is driven through an [`OracleSession`], which enforces the
//! declared variable domain, rejects NaN statistics and counts calls.

use causeway_core::{Error, Result};
use causeway_graph::{Graph, Node, NodeEquality, NodeIndex, validate_dag};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Trait
// ============================================================================

/// Verdict of a single conditional-independence test.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndependenceResult {
    /// Whether `x` and `y` are judged independent given `z`.
    pub independent: bool,
    /// Score of the test; larger means more clearly independent.
    pub statistic: f64,
}

impl IndependenceResult {
    /// An independent verdict with the given statistic.
    pub fn independent(statistic: f64) -> Self {
        Self {
            independent: true,
            statistic,
        }
    }

    /// A dependent verdict with the given statistic.
    pub fn dependent(statistic: f64) -> Self {
        Self {
            independent: false,
            statistic,
        }
    }
}

/// Source of conditional-independence judgments.
///
/// Implementations may be statistical tests over data or structural
/// answers from a known graph. Monotonicity in the conditioning set is
/// never assumed.
pub trait IndependenceOracle {
    /// The variables this oracle can answer questions about.
    fn variables(&self) -> Vec<Node>;

    /// How the search graph built over [`variables`](Self::variables)
    /// matches nodes.
    fn equality(&self) -> NodeEquality {
        NodeEquality::Name
    }

    /// Test whether `x` and `y` are independent given `z`.
    fn check_independence(&mut self, x: &Node, y: &Node, z: &[Node])
    -> Result<IndependenceResult>;
}

// ============================================================================
// Session
// ============================================================================

/// Guarded access to an oracle for the duration of one search.
pub struct OracleSession<'o> {
    oracle: &'o mut dyn IndependenceOracle,
    variables: Vec<Node>,
    domain: HashSet<String>,
    equality: NodeEquality,
    calls: usize,
}

impl<'o> OracleSession<'o> {
    /// Open a session, reading the oracle's declared variables.
    ///
    /// Fails with a configuration error when two variables share a name.
    pub fn new(oracle: &'o mut dyn IndependenceOracle) -> Result<Self> {
        let variables = oracle.variables();
        let equality = oracle.equality();
        let mut domain = HashSet::with_capacity(variables.len());
        for node in &variables {
            if !domain.insert(node.name.clone()) {
                return Err(Error::config(format!(
                    "oracle declares variable '{}' more than once",
                    node.name
                )));
            }
        }
        Ok(Self {
            oracle,
            variables,
            domain,
            equality,
            calls: 0,
        })
    }

    /// Declared variables, in the oracle's order.
    pub fn variables(&self) -> &[Node] {
        &self.variables
    }

    /// The oracle's node equality mode.
    pub fn equality(&self) -> NodeEquality {
        self.equality
    }

    /// Whether `name` is in the declared domain.
    pub fn contains(&self, name: &str) -> bool {
        self.domain.contains(name)
    }

    /// Number of oracle calls made so far.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Test nodes of `graph` by index.
    pub fn test(
        &mut self,
        graph: &Graph,
        x: NodeIndex,
        y: NodeIndex,
        z: &[NodeIndex],
    ) -> Result<IndependenceResult> {
        let lookup = |idx: NodeIndex| {
            graph
                .node(idx)
                .cloned()
                .ok_or_else(|| Error::graph("oracle query on a node not in the graph"))
        };
        let x = lookup(x)?;
        let y = lookup(y)?;
        let z = z.iter().map(|&i| lookup(i)).collect::<Result<Vec<_>>>()?;
        self.check(&x, &y, &z)
    }

    /// Test named nodes, enforcing the domain and the statistic contract.
    pub fn check(&mut self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult> {
        if let Some(outside) = std::iter::once(x)
            .chain(std::iter::once(y))
            .chain(z)
            .find(|n| !self.domain.contains(&n.name))
        {
            return Err(Error::oracle(
                &x.name,
                &y.name,
                format!("'{}' is outside the oracle's declared variables", outside.name),
            ));
        }

        self.calls += 1;
        let result = self
            .oracle
            .check_independence(x, y, z)
            .map_err(|e| match e {
                Error::Oracle { .. } => e,
                other => Error::oracle(&x.name, &y.name, other.to_string()),
            })?;

        if result.statistic.is_nan() {
            return Err(Error::oracle(&x.name, &y.name, "statistic is NaN"));
        }

        log::trace!(
            "{} _||_ {} | {:?}: {} ({})",
            x.name,
            y.name,
            z.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(),
            result.independent,
            result.statistic
        );
        Ok(result)
    }
}

// ============================================================================
// D-separation oracle
// ============================================================================

/// Oracle answering by d-separation in a known DAG.
///
/// Statistic is `1.0` for independent and `0.0` for dependent verdicts.
#[derive(Clone, Debug)]
pub struct DSeparationOracle {
    dag: Graph,
    order: Vec<String>,
}

impl DSeparationOracle {
    /// Build an oracle over every node of `dag`.
    ///
    /// Fails when `dag` has undirected edges or a directed cycle.
    pub fn new(dag: Graph) -> Result<Self> {
        let report = validate_dag(&dag);
        if !report.valid {
            let reasons: Vec<String> = report.errors.into_iter().map(|e| e.message).collect();
            return Err(Error::config(format!(
                "d-separation oracle needs a DAG: {}",
                reasons.join("; ")
            )));
        }
        let order = dag.nodes().map(|n| n.name.clone()).collect();
        Ok(Self { dag, order })
    }

    /// Declare the variables in a different order, or a subset of them.
    pub fn with_order<S: AsRef<str>>(mut self, order: &[S]) -> Result<Self> {
        let order: Vec<String> = order.iter().map(|s| s.as_ref().to_string()).collect();
        if let Some(unknown) = order.iter().find(|n| !self.dag.contains_node(n)) {
            return Err(Error::config(format!("'{unknown}' is not a node of the DAG")));
        }
        self.order = order;
        Ok(self)
    }

    /// The underlying DAG.
    pub fn dag(&self) -> &Graph {
        &self.dag
    }

    fn index(&self, node: &Node) -> Result<NodeIndex> {
        self.dag
            .resolve(node)
            .ok_or_else(|| Error::not_found(format!("node '{}' in the DAG", node.name)))
    }
}

impl IndependenceOracle for DSeparationOracle {
    fn variables(&self) -> Vec<Node> {
        self.order
            .iter()
            .filter_map(|name| self.dag.node_index(name))
            .filter_map(|idx| self.dag.node(idx).cloned())
            .collect()
    }

    fn equality(&self) -> NodeEquality {
        self.dag.equality()
    }

    fn check_independence(
        &mut self,
        x: &Node,
        y: &Node,
        z: &[Node],
    ) -> Result<IndependenceResult> {
        let xi = self.index(x)?;
        let yi = self.index(y)?;
        let zi = z.iter().map(|n| self.index(n)).collect::<Result<Vec<_>>>()?;
        Ok(if self.dag.is_d_separated(xi, yi, &zi) {
            IndependenceResult::independent(1.0)
        } else {
            IndependenceResult::dependent(0.0)
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use causeway_graph::Edge;

    fn collider_dag() -> Graph {
        let mut dag = Graph::from_nodes(["A", "B", "C", "D"].map(Node::new)).unwrap();
        for (from, to) in [("A", "B"), ("C", "B"), ("B", "D")] {
            dag.add_named_edge(&Edge::directed(from, to)).unwrap();
        }
        dag
    }

    struct NanOracle;

    impl IndependenceOracle for NanOracle {
        fn variables(&self) -> Vec<Node> {
            vec![Node::new("X"), Node::new("Y")]
        }

        fn check_independence(&mut self, _: &Node, _: &Node, _: &[Node]) -> Result<IndependenceResult> {
            Ok(IndependenceResult::independent(f64::NAN))
        }
    }

    struct DuplicateOracle;

    impl IndependenceOracle for DuplicateOracle {
        fn variables(&self) -> Vec<Node> {
            vec![Node::new("X"), Node::new("X")]
        }

        fn check_independence(&mut self, _: &Node, _: &Node, _: &[Node]) -> Result<IndependenceResult> {
            Ok(IndependenceResult::dependent(0.0))
        }
    }

    #[test]
    fn test_dseparation_answers() {
        let mut oracle = DSeparationOracle::new(collider_dag()).unwrap();
        let a = Node::new("A");
        let b = Node::new("B");
        let c = Node::new("C");

        assert!(oracle.check_independence(&a, &c, &[]).unwrap().independent);
        let given_b = oracle.check_independence(&a, &c, &[b]).unwrap();
        assert!(!given_b.independent);
        assert_eq!(given_b.statistic, 0.0);
    }

    #[test]
    fn test_dseparation_rejects_non_dag() {
        let mut graph = Graph::from_nodes(["A", "B"].map(Node::new)).unwrap();
        graph.add_named_edge(&Edge::undirected("A", "B")).unwrap();
        let err = DSeparationOracle::new(graph).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_with_order() {
        let oracle = DSeparationOracle::new(collider_dag())
            .unwrap()
            .with_order(&["D", "C", "B", "A"])
            .unwrap();
        let names: Vec<String> = oracle.variables().into_iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["D", "C", "B", "A"]);

        let unknown = DSeparationOracle::new(collider_dag()).unwrap().with_order(&["Q"]);
        assert!(unknown.is_err());
    }

    #[test]
    fn test_session_counts_calls() {
        let mut oracle = DSeparationOracle::new(collider_dag()).unwrap();
        let mut session = OracleSession::new(&mut oracle).unwrap();
        session
            .check(&Node::new("A"), &Node::new("C"), &[])
            .unwrap();
        session
            .check(&Node::new("A"), &Node::new("D"), &[Node::new("B")])
            .unwrap();
        assert_eq!(session.calls(), 2);
    }

    #[test]
    fn test_session_rejects_nan() {
        let mut oracle = NanOracle;
        let mut session = OracleSession::new(&mut oracle).unwrap();
        let err = session
            .check(&Node::new("X"), &Node::new("Y"), &[])
            .unwrap_err();
        assert!(matches!(err, Error::Oracle { .. }));
        assert!(err.to_string().contains("NaN"));
    }

    #[test]
    fn test_session_rejects_out_of_domain() {
        let mut oracle = DSeparationOracle::new(collider_dag()).unwrap();
        let mut session = OracleSession::new(&mut oracle).unwrap();
        let err = session
            .check(&Node::new("A"), &Node::new("Q"), &[])
            .unwrap_err();
        assert!(matches!(err, Error::Oracle { .. }));
        assert_eq!(session.calls(), 0);
    }

    #[test]
    fn test_session_rejects_duplicate_variables() {
        let mut oracle = DuplicateOracle;
        let err = OracleSession::new(&mut oracle).err().unwrap();
        assert!(err.is_config());
    }
}
