use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use petgraph::graph::{Graph, NodeIndex};
use petgraph::{Directed, EdgeType, Undirected};

use crate::state::MoveGen;

/// Every state reachable from `start`, each exactly once, in breadth-first
/// discovery order.
///
/// Puzzle modules use this for flood fills and connected-region closures: the
/// first element is always `start`, and callers may rely on the order (for
/// instance to pick a canonical member of a region).
pub fn enumerate_reachable<S: MoveGen>(start: &S) -> Vec<S> {
    enumerate::<S, Directed, _>(start, S::gen_children)
}

/// [`enumerate_reachable`] with an undirected discovery graph, for move
/// generators that are symmetric (reaching B from A implies reaching A from
/// B). The output sequence is identical; only the internal edge bookkeeping
/// differs.
pub fn enumerate_reachable_undirected<S: MoveGen>(start: &S) -> Vec<S> {
    enumerate::<S, Undirected, _>(start, S::gen_children)
}

/// Breadth-first closure with an ad-hoc expander instead of a [`MoveGen`]
/// implementation.
pub fn enumerate_reachable_with<S, F>(start: &S, expand: F) -> Vec<S>
where
    S: Clone + Eq + Hash,
    F: FnMut(&S, &mut Vec<S>),
{
    enumerate::<S, Directed, F>(start, expand)
}

fn enumerate<S, Ty, F>(start: &S, mut expand: F) -> Vec<S>
where
    S: Clone + Eq + Hash,
    Ty: EdgeType,
    F: FnMut(&S, &mut Vec<S>),
{
    // Discovery graph: node weights are the states themselves, so node
    // insertion order doubles as the discovery sequence. The map is the
    // reverse direction of that bijection.
    let mut graph = Graph::<S, (), Ty>::default();
    let mut index: HashMap<S, NodeIndex> = HashMap::new();
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();

    let root = graph.add_node(start.clone());
    index.insert(start.clone(), root);
    queue.push_back(root);

    let mut children = Vec::new();
    while let Some(u) = queue.pop_front() {
        children.clear();
        let cur = graph[u].clone();
        expand(&cur, &mut children);
        for child in children.drain(..) {
            if index.contains_key(&child) {
                continue;
            }
            let v = graph.add_node(child.clone());
            index.insert(child, v);
            graph.add_edge(u, v, ());
            queue.push_back(v);
        }
    }

    graph.node_weights().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2x2 grid cell; every cell regenerates all of its neighbors, so the
    // space is cyclic and every state is reachable from every other.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    struct Cell(u8, u8);

    impl MoveGen for Cell {
        fn gen_children(&self, children: &mut Vec<Self>) {
            let &Cell(x, y) = self;
            children.push(Cell(1 - x, y));
            children.push(Cell(x, 1 - y));
        }
    }

    #[test]
    fn cyclic_grid_enumerates_each_state_once() {
        let seq = enumerate_reachable(&Cell(0, 0));
        assert_eq!(
            seq,
            vec![Cell(0, 0), Cell(1, 0), Cell(0, 1), Cell(1, 1)]
        );
    }

    #[test]
    fn undirected_mode_returns_the_same_sequence() {
        assert_eq!(
            enumerate_reachable_undirected(&Cell(0, 0)),
            enumerate_reachable(&Cell(0, 0))
        );
    }

    #[test]
    fn closure_expander() {
        // path 0 -> 1 -> 2 -> 3, rediscovering earlier states on the way
        let seq = enumerate_reachable_with(&0u32, |&n, out| {
            if n < 3 {
                out.push(n + 1);
            }
            if n > 0 {
                out.push(n - 1);
            }
        });
        assert_eq!(seq, vec![0, 1, 2, 3]);
    }

    #[test]
    fn enumeration_is_deterministic() {
        assert_eq!(enumerate_reachable(&Cell(1, 1)), enumerate_reachable(&Cell(1, 1)));
    }
}
