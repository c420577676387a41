//! Route finding through a wall-delimited grid.
//!
//! Board text alternates wall lines and cell lines: line `2r` marks
//! horizontal walls (`-`) above cell row `r`, line `2r + 1` holds vertical
//! walls (`|`) and the cells themselves (`@` start, `.` goal). The answer is
//! the move sequence, so solutions keep their full paths.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Write;

use unordered_pair::UnorderedPair;

use crate::grid::{Location, SquareStep, Step};
use crate::level::{Level, LevelError, LevelSet};
use crate::report::{self, Render, SolutionFormat};
use crate::solver::{SearchMode, Solver, SolverConfig};
use crate::state::{MoveGen, PuzzleState};

/// A parsed maze: dimensions, endpoints, and the set of blocked cell pairs.
#[derive(Debug)]
pub struct Game {
    cols: usize,
    rows: usize,
    start: Location,
    goal: Location,
    walls: HashSet<UnorderedPair<Location>>,
}

impl Game {
    /// Parse a maze from a level's board text.
    pub fn from_level(level: &Level) -> Result<Self, LevelError> {
        let lines = &level.board;
        if lines.len() < 3 || lines.len() % 2 == 0 {
            return Err(level.bad_board("expected alternating wall and cell lines"));
        }
        let rows = lines.len() / 2;
        let cols = lines[1].len() / 2;
        let mut walls = HashSet::new();
        let mut start = None;
        let mut goal = None;

        for r in 0..=rows {
            for (i, ch) in lines[2 * r].chars().enumerate() {
                let c = i / 2;
                // border walls are implied by the bounds check on moves
                if ch == '-' && r > 0 && r < rows && c < cols {
                    walls.insert(UnorderedPair(Location(c, r - 1), Location(c, r)));
                }
            }
            if r == rows {
                break;
            }
            for (i, ch) in lines[2 * r + 1].chars().enumerate() {
                let c = i / 2;
                match ch {
                    '|' if c > 0 && c < cols => {
                        walls.insert(UnorderedPair(Location(c - 1, r), Location(c, r)));
                    }
                    '@' if c < cols => start = Some(Location(c, r)),
                    '.' if c < cols => goal = Some(Location(c, r)),
                    _ => {}
                }
            }
        }

        Ok(Self {
            cols,
            rows,
            start: start.ok_or_else(|| level.bad_board("no start cell '@'"))?,
            goal: goal.ok_or_else(|| level.bad_board("no goal cell '.'"))?,
            walls,
        })
    }

    /// The state the search begins from.
    pub fn start_state(&self) -> State<'_> {
        State {
            game: self,
            p: self.start,
            mv: None,
        }
    }

    fn in_bounds(&self, p: Location) -> bool {
        p.0 < self.cols && p.1 < self.rows
    }

    fn blocked(&self, a: Location, b: Location) -> bool {
        self.walls.contains(&UnorderedPair(a, b))
    }
}

/// A walker position plus the move that produced it.
///
/// The incoming move is part of the state's identity, so distinct routes to
/// the same cell stay distinct in multi-solution searches.
#[derive(Clone, Copy)]
pub struct State<'g> {
    game: &'g Game,
    p: Location,
    mv: Option<SquareStep>,
}

impl PartialEq for State<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.p == other.p && self.mv == other.mv
    }
}

impl Eq for State<'_> {}

impl Hash for State<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.p.hash(state);
        self.mv.hash(state);
    }
}

impl MoveGen for State<'_> {
    fn gen_children(&self, children: &mut Vec<Self>) {
        for (step, q) in SquareStep::neighbors_of(self.p) {
            if !self.game.in_bounds(q) || self.game.blocked(self.p, q) {
                continue;
            }
            children.push(State {
                game: self.game,
                p: q,
                mv: Some(step),
            });
        }
    }
}

impl PuzzleState for State<'_> {
    fn heuristic(&self) -> u32 {
        self.p.manhattan(&self.game.goal)
    }
}

impl fmt::Display for State<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.game;
        for r in 0..=g.rows {
            for c in 0..g.cols {
                let above = r == 0
                    || r == g.rows
                    || g.blocked(Location(c, r - 1), Location(c, r));
                write!(f, "{}", if above { " -" } else { "  " })?;
            }
            writeln!(f)?;
            if r == g.rows {
                break;
            }
            for c in 0..=g.cols {
                let left = c == 0 || c == g.cols || g.blocked(Location(c - 1, r), Location(c, r));
                write!(f, "{}", if left { '|' } else { ' ' })?;
                if c == g.cols {
                    break;
                }
                let p = Location(c, r);
                let ch = if p == self.p {
                    '@'
                } else if p == g.goal {
                    '.'
                } else {
                    ' '
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Render for State<'_> {
    fn move_summary(&self) -> Option<String> {
        self.mv.map(|mv| {
            match mv {
                SquareStep::Up => "u",
                SquareStep::Down => "d",
                SquareStep::Left => "l",
                SquareStep::Right => "r",
            }
            .to_owned()
        })
    }
}

/// Solve every level with single-solution A* and print the move sequences.
pub fn solve(set: &LevelSet, out: &mut dyn Write) -> Result<(), LevelError> {
    run(set, out, Solver::new())
}

/// Print every shortest route for every level.
pub fn solve_all(set: &LevelSet, out: &mut dyn Write) -> Result<(), LevelError> {
    run(
        set,
        out,
        Solver::with_config(SolverConfig {
            mode: SearchMode::AllBestSolutions,
            ..SolverConfig::default()
        }),
    )
}

fn run(set: &LevelSet, out: &mut dyn Write, solver: Solver) -> Result<(), LevelError> {
    report::run_levels(set, out, |level, out| {
        let game = Game::from_level(level)?;
        let outcome = solver.solve(&game.start_state());
        report::write_report(&outcome, SolutionFormat::MovesOnlySingleLine, out)?;
        Ok(())
    })
}
