//! Path and separation algorithms over a [`Graph`].
//!
//! Directed relations are read from endpoints: `a --> b` is the only edge
//! kind that contributes to directed paths, ancestry and cycles.

use crate::graph::Graph;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::DiGraph;
use petgraph::stable_graph::NodeIndex;
use std::collections::{HashMap, HashSet, VecDeque};

impl Graph {
    /// Project the directed edges onto a petgraph `DiGraph` whose node
    /// weights are the original indices.
    fn directed_projection(&self) -> DiGraph<NodeIndex, ()> {
        let mut projection: DiGraph<NodeIndex, ()> = DiGraph::new();
        let mut indices = HashMap::new();

        for idx in self.node_indices() {
            indices.insert(idx, projection.add_node(idx));
        }

        for (a, b) in self.edge_pairs() {
            let (from, to) = if self.is_directed_from_to(a, b) {
                (a, b)
            } else if self.is_directed_from_to(b, a) {
                (b, a)
            } else {
                continue;
            };
            if let (Some(&f), Some(&t)) = (indices.get(&from), indices.get(&to)) {
                projection.add_edge(f, t, ());
            }
        }

        projection
    }

    /// Whether the directed edges contain a cycle. O(V + E).
    pub fn exists_directed_cycle(&self) -> bool {
        let projection = self.directed_projection();
        toposort(&projection, None).is_err()
    }

    /// Node sets forming directed cycles (strongly connected components
    /// with more than one node), each sorted by index.
    pub fn directed_cycles(&self) -> Vec<Vec<NodeIndex>> {
        let projection = self.directed_projection();
        tarjan_scc(&projection)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut nodes: Vec<NodeIndex> = scc.into_iter().map(|i| projection[i]).collect();
                nodes.sort();
                nodes
            })
            .collect()
    }

    /// Whether a directed path `from --> ... --> to` exists.
    ///
    /// A node always reaches itself.
    pub fn exists_directed_path(&self, from: NodeIndex, to: NodeIndex) -> bool {
        if from == to {
            return true;
        }
        let mut visited = HashSet::new();
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            for child in self.children(node) {
                if child == to {
                    return true;
                }
                stack.push(child);
            }
        }
        false
    }

    /// Whether orienting `from --> to` would close a directed cycle.
    pub fn would_create_cycle(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.exists_directed_path(to, from)
    }

    /// All ancestors of the given nodes, including the nodes themselves.
    pub fn ancestors_of(&self, nodes: &[NodeIndex]) -> HashSet<NodeIndex> {
        let mut ancestors = HashSet::new();
        let mut stack: Vec<NodeIndex> = nodes.to_vec();
        while let Some(node) = stack.pop() {
            if ancestors.insert(node) {
                stack.extend(self.parents(node));
            }
        }
        ancestors
    }

    /// Whether a path of at most `max_len` edges joins `from` and `to`
    /// without passing through `avoid`. Edge marks are ignored.
    pub fn exists_short_path(
        &self,
        from: NodeIndex,
        to: NodeIndex,
        max_len: usize,
        avoid: Option<NodeIndex>,
    ) -> bool {
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([(from, 0usize)]);
        while let Some((node, dist)) = queue.pop_front() {
            if dist == max_len {
                continue;
            }
            for next in self.adjacent_nodes(node) {
                if Some(next) == avoid {
                    continue;
                }
                if next == to {
                    return true;
                }
                if seen.insert(next) {
                    queue.push_back((next, dist + 1));
                }
            }
        }
        false
    }

    /// Whether `x` and `y` are d-separated given `z`.
    ///
    /// Only directed edges are followed, so the graph is expected to be a
    /// DAG. Uses the reachability ("Bayes-ball") formulation: a trail is
    /// active through a non-collider outside `z` and through a collider
    /// that is in `z` or has a descendant in `z`.
    pub fn is_d_separated(&self, x: NodeIndex, y: NodeIndex, z: &[NodeIndex]) -> bool {
        if x == y {
            return false;
        }
        let conditioned: HashSet<NodeIndex> = z.iter().copied().collect();
        if conditioned.contains(&x) || conditioned.contains(&y) {
            return true;
        }
        let ancestors_of_z = self.ancestors_of(z);

        // `true` = reached from a child (moving up), `false` = from a parent.
        let mut visited: HashSet<(NodeIndex, bool)> = HashSet::new();
        let mut stack = vec![(x, true)];

        while let Some((node, up)) = stack.pop() {
            if !visited.insert((node, up)) {
                continue;
            }
            if node == y {
                return false;
            }
            let observed = conditioned.contains(&node);
            if up && !observed {
                stack.extend(self.parents(node).into_iter().map(|p| (p, true)));
                stack.extend(self.children(node).into_iter().map(|c| (c, false)));
            } else if !up {
                if !observed {
                    stack.extend(self.children(node).into_iter().map(|c| (c, false)));
                }
                if ancestors_of_z.contains(&node) {
                    stack.extend(self.parents(node).into_iter().map(|p| (p, true)));
                }
            }
        }
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
