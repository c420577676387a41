use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};

use crate::state::PuzzleState;

/// How many solutions the solver looks for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Stop at the first goal popped off the frontier.
    #[default]
    FirstSolution,
    /// Collect every goal reachable at the minimal cost, then enumerate
    /// every minimal-cost path to each of them.
    AllBestSolutions,
}

/// What happens when the same state value is discovered along two paths.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DuplicateHandling {
    /// Graph search: equal states share one registry entry, relaxed on a
    /// strictly better cost.
    #[default]
    Merge,
    /// Tree search: every discovery is its own entry, so the same state
    /// value reached along different histories counts separately. The
    /// puzzle must guarantee the tree is finite.
    KeepDistinct,
}

/// Behavior flags for one [`Solver`] instance.
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Single- or multi-solution search.
    pub mode: SearchMode,
    /// Duplicate-state policy.
    pub duplicates: DuplicateHandling,
    /// When false, frontier entries rank by accumulated cost alone
    /// (uniform-cost search); the heuristic still defines goals.
    pub use_heuristic: bool,
    /// When false, solutions carry only their goal state, skipping path
    /// reconstruction (and, in multi-solution mode, path enumeration).
    pub record_paths: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            duplicates: DuplicateHandling::default(),
            use_heuristic: true,
            record_paths: true,
        }
    }
}

/// One solution: the states along a path from the start to a goal, or just
/// the goal state when paths are not recorded.
#[derive(Clone, Debug)]
pub struct Solution<S> {
    /// Path states in order; the last element is always the goal.
    pub states: Vec<S>,
}

impl<S> Solution<S> {
    /// The goal state this solution ends in.
    pub fn goal(&self) -> &S {
        self.states.last().expect("a solution is never empty")
    }

    /// Number of moves along the path (zero when only the goal is recorded).
    pub fn moves(&self) -> usize {
        self.states.len() - 1
    }
}

/// Outcome of a [`Solver::solve`] call.
///
/// Exhausting the frontier without a goal is a regular outcome
/// (`found() == false`), not an error.
#[derive(Clone, Debug)]
pub struct SolveReport<S> {
    /// Solutions in discovery order; empty when the search failed.
    pub solutions: Vec<Solution<S>>,
    /// Frontier pops that were actually examined (goal pops included).
    pub examined: usize,
}

impl<S> SolveReport<S> {
    /// Whether any goal was found.
    pub fn found(&self) -> bool {
        !self.solutions.is_empty()
    }

    /// The first solution, if any.
    pub fn first(&self) -> Option<&Solution<S>> {
        self.solutions.first()
    }
}

// Max-heap entry: the greatest entry is the one with the smallest f, and
// among equal f the one inserted last (LIFO tie-break; this picks which of
// several optimal solutions surfaces first, nothing more).
#[derive(PartialEq, Eq)]
struct FrontierEntry {
    f: u32,
    g: u32,
    seq: usize,
    node: NodeIndex,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first searcher over a [`PuzzleState`] space.
///
/// Each `solve` call owns its frontier and closed registry exclusively and
/// runs to completion; there is no timeout or cancellation. Unsolvable
/// inputs terminate once the (finite) reachable space is exhausted.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// A solver with the default configuration: single solution, merged
    /// duplicates, heuristic ordering, full paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// A solver with explicit behavior flags.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    fn rank<S: PuzzleState>(&self, g: u32, state: &S) -> u32 {
        if self.config.use_heuristic {
            g + state.heuristic()
        } else {
            g
        }
    }

    /// Explore from `start` and report what was found.
    pub fn solve<S: PuzzleState>(&self, start: &S) -> SolveReport<S> {
        let merge = self.config.duplicates == DuplicateHandling::Merge;
        let all_best = self.config.mode == SearchMode::AllBestSolutions;

        // Discovery graph doubling as the closed registry: node weights are
        // the states (dense ids), dist/pred run parallel to the node arena.
        let mut graph: DiGraph<S, u32> = DiGraph::new();
        let mut index: HashMap<S, NodeIndex> = HashMap::new();
        let mut dist: Vec<u32> = Vec::new();
        let mut pred: Vec<NodeIndex> = Vec::new();
        // Multi-solution mode: every predecessor reaching a node at its best
        // known cost. The start maps to itself as the path terminator.
        let mut eq_preds: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::new();
        let mut seq = 0usize;

        let root = graph.add_node(start.clone());
        dist.push(0);
        pred.push(root);
        if merge {
            index.insert(start.clone(), root);
        }
        if all_best {
            eq_preds.insert(root, vec![root]);
        }
        frontier.push(FrontierEntry {
            f: self.rank(0, start),
            g: 0,
            seq,
            node: root,
        });
        seq += 1;

        let mut examined = 0usize;
        let mut goals: Vec<NodeIndex> = Vec::new();
        let mut goal_dist = u32::MAX;
        let mut children = Vec::new();

        while let Some(entry) = frontier.pop() {
            let u = entry.node;
            if entry.g > dist[u.index()] {
                // superseded by a strictly better path found later
                continue;
            }
            examined += 1;

            let cur = graph[u].clone();
            if cur.is_goal() {
                if !all_best {
                    let states = if self.config.record_paths {
                        reconstruct(&graph, &pred, u)
                    } else {
                        vec![cur]
                    };
                    return SolveReport {
                        solutions: vec![Solution { states }],
                        examined,
                    };
                }
                goal_dist = goal_dist.min(dist[u.index()]);
                if !goals.contains(&u) {
                    goals.push(u);
                }
                // goals are never expanded
                continue;
            }

            children.clear();
            cur.gen_children(&mut children);
            for child in children.drain(..) {
                let step = cur.distance(&child);
                let nd = dist[u.index()] + step;
                if all_best && nd > goal_dist {
                    continue;
                }
                let existing = if merge { index.get(&child).copied() } else { None };
                match existing {
                    Some(v) => {
                        let vi = v.index();
                        if nd < dist[vi] {
                            // Relax: the better path replaces the stored
                            // state value and the predecessor edge.
                            let f = self.rank(nd, &child);
                            if let Some(e) = graph.find_edge(pred[vi], v) {
                                graph.remove_edge(e);
                            }
                            graph.add_edge(u, v, step);
                            graph[v] = child;
                            dist[vi] = nd;
                            pred[vi] = u;
                            if all_best {
                                eq_preds.insert(v, vec![u]);
                            }
                            frontier.push(FrontierEntry { f, g: nd, seq, node: v });
                            seq += 1;
                        } else if all_best && nd == dist[vi] {
                            // another minimal-cost way in; remember it for
                            // path enumeration
                            graph.add_edge(u, v, step);
                            eq_preds.entry(v).or_default().push(u);
                        }
                    }
                    None => {
                        let f = self.rank(nd, &child);
                        let v = graph.add_node(child.clone());
                        dist.push(nd);
                        pred.push(u);
                        if merge {
                            index.insert(child, v);
                        }
                        graph.add_edge(u, v, step);
                        if all_best {
                            eq_preds.insert(v, vec![u]);
                        }
                        frontier.push(FrontierEntry { f, g: nd, seq, node: v });
                        seq += 1;
                    }
                }
            }
        }

        // Frontier exhausted. In single-solution mode that means failure; in
        // multi-solution mode, assemble every minimal-cost result.
        let mut solutions = Vec::new();
        for &goal in goals.iter().filter(|n| dist[n.index()] == goal_dist) {
            if self.config.record_paths {
                let mut tail = Vec::new();
                collect_paths(&graph, &eq_preds, goal, &mut tail, &mut solutions);
            } else {
                solutions.push(Solution {
                    states: vec![graph[goal].clone()],
                });
            }
        }
        SolveReport { solutions, examined }
    }
}

fn reconstruct<S: Clone>(
    graph: &DiGraph<S, u32>,
    pred: &[NodeIndex],
    goal: NodeIndex,
) -> Vec<S> {
    let mut path = Vec::new();
    let mut v = goal;
    loop {
        path.push(graph[v].clone());
        if pred[v.index()] == v {
            break;
        }
        v = pred[v.index()];
    }
    path.reverse();
    path
}

// Walk the equal-cost predecessor relation backwards from `v`, emitting one
// solution per distinct minimal path. The start node terminates each walk by
// being its own predecessor.
fn collect_paths<S: Clone>(
    graph: &DiGraph<S, u32>,
    eq_preds: &HashMap<NodeIndex, Vec<NodeIndex>>,
    v: NodeIndex,
    tail: &mut Vec<NodeIndex>,
    out: &mut Vec<Solution<S>>,
) {
    tail.push(v);
    let preds = &eq_preds[&v];
    if preds.len() == 1 && preds[0] == v {
        out.push(Solution {
            states: tail.iter().rev().map(|&n| graph[n].clone()).collect(),
        });
    } else {
        for &p in preds {
            collect_paths(graph, eq_preds, p, tail, out);
        }
    }
    tail.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MoveGen;

    // Open 3x3 grid, unit moves, Manhattan heuristic towards (2, 2).
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    struct Grid {
        x: u32,
        y: u32,
    }

    impl MoveGen for Grid {
        fn gen_children(&self, children: &mut Vec<Self>) {
            let &Grid { x, y } = self;
            if y > 0 {
                children.push(Grid { x, y: y - 1 });
            }
            if y < 2 {
                children.push(Grid { x, y: y + 1 });
            }
            if x > 0 {
                children.push(Grid { x: x - 1, y });
            }
            if x < 2 {
                children.push(Grid { x: x + 1, y });
            }
        }
    }

    impl PuzzleState for Grid {
        fn heuristic(&self) -> u32 {
            (2 - self.x) + (2 - self.y)
        }
    }

    #[test]
    fn astar_returns_a_minimum_cost_path() {
        let report = Solver::new().solve(&Grid { x: 0, y: 0 });
        assert!(report.found());
        let sol = report.first().unwrap();
        assert_eq!(sol.moves(), 4);
        assert_eq!(*sol.goal(), Grid { x: 2, y: 2 });
        assert_eq!(sol.goal().heuristic(), 0);
        assert_eq!(sol.states[0], Grid { x: 0, y: 0 });
    }

    #[test]
    fn uniform_cost_mode_matches_astar_length() {
        let solver = Solver::with_config(SolverConfig {
            use_heuristic: false,
            ..SolverConfig::default()
        });
        let report = solver.solve(&Grid { x: 0, y: 0 });
        assert_eq!(report.first().unwrap().moves(), 4);
    }

    #[test]
    fn solving_is_deterministic() {
        let a = Solver::new().solve(&Grid { x: 0, y: 0 });
        let b = Solver::new().solve(&Grid { x: 0, y: 0 });
        assert_eq!(a.first().unwrap().states, b.first().unwrap().states);
        assert_eq!(a.examined, b.examined);
    }

    #[test]
    fn start_at_goal_returns_immediately() {
        let report = Solver::new().solve(&Grid { x: 2, y: 2 });
        assert!(report.found());
        assert_eq!(report.examined, 1);
        let sol = report.first().unwrap();
        assert_eq!(sol.states, vec![Grid { x: 2, y: 2 }]);
        assert_eq!(sol.moves(), 0);
    }

    // Two states flipping into each other; the heuristic never reaches zero.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    struct Flip(u8);

    impl MoveGen for Flip {
        fn gen_children(&self, children: &mut Vec<Self>) {
            children.push(Flip(1 - self.0));
        }
    }

    impl PuzzleState for Flip {
        fn heuristic(&self) -> u32 {
            1
        }
    }

    #[test]
    fn unsolvable_space_terminates_with_no_solution() {
        let report = Solver::new().solve(&Flip(0));
        assert!(!report.found());
        assert!(report.solutions.is_empty());
        assert_eq!(report.examined, 2);
    }

    // Start branching to two distinct goals at equal cost.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Fork {
        Start,
        GoalA,
        GoalB,
    }

    impl MoveGen for Fork {
        fn gen_children(&self, children: &mut Vec<Self>) {
            if let Fork::Start = self {
                children.push(Fork::GoalA);
                children.push(Fork::GoalB);
            }
        }
    }

    impl PuzzleState for Fork {
        fn heuristic(&self) -> u32 {
            match self {
                Fork::Start => 1,
                _ => 0,
            }
        }
    }

    #[test]
    fn all_best_mode_finds_both_equal_goals_once() {
        let solver = Solver::with_config(SolverConfig {
            mode: SearchMode::AllBestSolutions,
            ..SolverConfig::default()
        });
        let report = solver.solve(&Fork::Start);
        assert_eq!(report.solutions.len(), 2);
        let goals: Vec<Fork> = report.solutions.iter().map(|s| *s.goal()).collect();
        assert!(goals.contains(&Fork::GoalA));
        assert!(goals.contains(&Fork::GoalB));
        for sol in &report.solutions {
            assert_eq!(sol.goal().heuristic(), 0);
            assert_eq!(sol.moves(), 1);
        }
    }

    #[test]
    fn equal_f_entries_pop_most_recent_first() {
        // Both goals are inserted with f = 1; the LIFO tie-break means the
        // one generated last is popped, and therefore returned, first.
        let report = Solver::new().solve(&Fork::Start);
        assert_eq!(*report.first().unwrap().goal(), Fork::GoalB);
    }

    // Diamond: two equal-cost routes rejoin at the same goal value.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Diamond {
        Start,
        Left,
        Right,
        Goal,
    }

    impl MoveGen for Diamond {
        fn gen_children(&self, children: &mut Vec<Self>) {
            match self {
                Diamond::Start => {
                    children.push(Diamond::Left);
                    children.push(Diamond::Right);
                }
                Diamond::Left | Diamond::Right => children.push(Diamond::Goal),
                Diamond::Goal => {}
            }
        }
    }

    impl PuzzleState for Diamond {
        fn heuristic(&self) -> u32 {
            match self {
                Diamond::Start => 2,
                Diamond::Left | Diamond::Right => 1,
                Diamond::Goal => 0,
            }
        }
    }

    #[test]
    fn equal_cost_rediscovery_does_not_change_the_outcome() {
        // The goal is reached along both branches at cost 2; the second
        // discovery merges into the closed entry without altering it.
        let report = Solver::new().solve(&Diamond::Start);
        assert_eq!(report.solutions.len(), 1);
        assert_eq!(report.first().unwrap().moves(), 2);
    }

    #[test]
    fn merged_duplicates_enumerate_every_minimal_path() {
        let solver = Solver::with_config(SolverConfig {
            mode: SearchMode::AllBestSolutions,
            ..SolverConfig::default()
        });
        let report = solver.solve(&Diamond::Start);
        assert_eq!(report.solutions.len(), 2);
        let mids: Vec<Diamond> = report.solutions.iter().map(|s| s.states[1]).collect();
        assert!(mids.contains(&Diamond::Left));
        assert!(mids.contains(&Diamond::Right));
    }

    #[test]
    fn distinct_duplicates_treat_each_route_as_its_own_solution() {
        let solver = Solver::with_config(SolverConfig {
            mode: SearchMode::AllBestSolutions,
            duplicates: DuplicateHandling::KeepDistinct,
            ..SolverConfig::default()
        });
        let report = solver.solve(&Diamond::Start);
        assert_eq!(report.solutions.len(), 2);
    }

    #[test]
    fn goal_only_solutions_skip_the_path() {
        let solver = Solver::with_config(SolverConfig {
            record_paths: false,
            ..SolverConfig::default()
        });
        let report = solver.solve(&Grid { x: 0, y: 0 });
        let sol = report.first().unwrap();
        assert_eq!(sol.states, vec![Grid { x: 2, y: 2 }]);
    }
}
