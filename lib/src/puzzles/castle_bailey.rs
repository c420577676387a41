//! Wall placement around numbered towers.
//!
//! Towers stand on the lattice points of a square grid; each numbered tower
//! says how many of the four squares touching it are walls (board borders
//! never count). Every square not walled belongs to the garden, and the
//! garden must form one connected region. Board text is one row of tower
//! hints per line: a digit `0` to `4`, or a space for an unhinted tower.
//!
//! The answer is the final grid, so solving prints the goal state only.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Write;

use itertools::Itertools;
use ndarray::Array2;

use crate::grid::{Location, SquareStep, Step};
use crate::level::{Level, LevelError, LevelSet};
use crate::reachable::enumerate_reachable;
use crate::report::{self, Render, SolutionFormat};
use crate::solver::Solver;
use crate::state::{MoveGen, PuzzleState};

const SPACE: char = ' ';
const EMPTY: char = '.';
const WALL: char = 'W';
const BOUNDARY: char = 'B';
// hint value for an unnumbered tower
const UNKNOWN: usize = 5;

// squares touching a tower, clockwise from its own square
const TOWER_OFFSETS: [(isize, isize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

/// A parsed level: tower hints plus the candidate wall layouts per hint.
pub struct Game {
    // side of the square grid, boundary ring included
    sidelen: usize,
    towers: BTreeMap<Location, usize>,
    // layouts[n] holds every way to put n walls on a tower's four squares;
    // layouts[UNKNOWN] holds all sixteen
    layouts: Vec<Vec<[char; 4]>>,
}

impl Game {
    /// Parse tower hints from a level's board text.
    pub fn from_level(level: &Level) -> Result<Self, LevelError> {
        let n = level.board.len();
        if n == 0 {
            return Err(level.bad_board("no tower rows"));
        }
        let mut towers = BTreeMap::new();
        for (y, row) in level.board.iter().enumerate() {
            if row.chars().count() != n {
                return Err(level.bad_board("tower rows must form a square"));
            }
            for (x, ch) in row.chars().enumerate() {
                let num = match ch {
                    ' ' => UNKNOWN,
                    '0'..='4' => ch as usize - '0' as usize,
                    _ => return Err(level.bad_board(format!("bad tower hint {ch:?}"))),
                };
                towers.insert(Location(x, y), num);
            }
        }

        let mut layouts = vec![Vec::new(); UNKNOWN + 1];
        for mask in 0u32..16 {
            let mut layout = [EMPTY; 4];
            for (k, slot) in layout.iter_mut().enumerate() {
                if mask & (1 << k) != 0 {
                    *slot = WALL;
                }
            }
            layouts[mask.count_ones() as usize].push(layout);
            layouts[UNKNOWN].push(layout);
        }

        Ok(Self {
            sidelen: n + 1,
            towers,
            layouts,
        })
    }

    /// The state the search begins from, with hint candidates already
    /// pruned once against the boundary.
    pub fn start_state(&self) -> State<'_> {
        let side = self.sidelen;
        let mut cells = Array2::from_elem((side, side), SPACE);
        for i in 0..side {
            cells[(0, i)] = BOUNDARY;
            cells[(side - 1, i)] = BOUNDARY;
            cells[(i, 0)] = BOUNDARY;
            cells[(i, side - 1)] = BOUNDARY;
        }
        let matches = self
            .towers
            .iter()
            .map(|(&p, &num)| (p, (0..self.layouts[num].len()).collect_vec()))
            .collect();
        let mut state = State {
            game: self,
            cells,
            matches,
            distance: 0,
        };
        state.find_matches(true);
        state
    }
}

/// A partially decided grid plus the still-open candidate layouts per tower.
#[derive(Clone)]
pub struct State<'g> {
    game: &'g Game,
    cells: Array2<char>,
    // per tower, the layout ids still compatible with the decided squares
    matches: BTreeMap<Location, Vec<usize>>,
    distance: u32,
}

impl PartialEq for State<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for State<'_> {}

impl Hash for State<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for ch in self.cells.iter() {
            ch.hash(state);
        }
    }
}

impl State<'_> {
    fn cell(&self, p: Location) -> char {
        self.cells[p.as_index()]
    }

    // Prune every tower's candidates against the decided squares. Returns 0
    // on a contradiction, 1 after applying a forced layout (callers rescan),
    // 2 when stable.
    fn find_matches(&mut self, init: bool) -> u32 {
        let game = self.game;
        for p in self.matches.keys().copied().collect_vec() {
            let around = TOWER_OFFSETS.map(|os| self.cell(p.offset_by(os)));
            let layouts = &game.layouts[game.towers[&p]];
            let ids = self.matches.get_mut(&p).unwrap();
            ids.retain(|&id| {
                around.iter().zip(layouts[id].iter()).all(|(&have, &want)| {
                    have == SPACE || have == want || (have == BOUNDARY && want == EMPTY)
                })
            });
            if !init {
                match ids.len() {
                    0 => return 0,
                    1 => {
                        let id = ids[0];
                        return u32::from(self.apply(p, id));
                    }
                    _ => {}
                }
            }
        }
        2
    }

    // Write one tower's layout into its undecided squares. False means the
    // grid is complete but the garden came apart.
    fn apply(&mut self, p: Location, id: usize) -> bool {
        let game = self.game;
        let layout = game.layouts[game.towers[&p]][id];
        for (k, os) in TOWER_OFFSETS.iter().enumerate() {
            let q = p.offset_by(*os);
            let ch = &mut self.cells[q.as_index()];
            if *ch == SPACE {
                *ch = layout[k];
            }
        }
        self.distance += 1;
        self.matches.remove(&p);
        !self.is_goal() || self.is_continuous()
    }

    fn make_move(&mut self, p: Location, id: usize) -> bool {
        self.distance = 0;
        if !self.apply(p, id) {
            return false;
        }
        loop {
            match self.find_matches(false) {
                0 => return false,
                1 => continue,
                _ => return true,
            }
        }
    }

    fn is_continuous(&self) -> bool {
        let side = self.game.sidelen;
        let mut area = BTreeSet::new();
        for y in 1..side - 1 {
            for x in 1..side - 1 {
                let p = Location(x, y);
                if matches!(self.cell(p), SPACE | EMPTY) {
                    area.insert(p);
                }
            }
        }
        let Some(&seed) = area.first() else {
            return true;
        };
        enumerate_reachable(&Walk {
            area: &area,
            p: seed,
        })
        .len()
            == area.len()
    }
}

// Flood-fill cursor over the garden squares.
#[derive(Clone, Copy)]
struct Walk<'a> {
    area: &'a BTreeSet<Location>,
    p: Location,
}

impl PartialEq for Walk<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.p == other.p
    }
}

impl Eq for Walk<'_> {}

impl Hash for Walk<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.p.hash(state);
    }
}

impl MoveGen for Walk<'_> {
    fn gen_children(&self, children: &mut Vec<Self>) {
        for (_, q) in SquareStep::neighbors_of(self.p) {
            if self.area.contains(&q) {
                children.push(Walk {
                    area: self.area,
                    p: q,
                });
            }
        }
    }
}

impl MoveGen for State<'_> {
    fn gen_children(&self, children: &mut Vec<Self>) {
        // branch on the tower with the fewest open candidates
        let Some((&p, ids)) = self.matches.iter().min_by_key(|(_, ids)| ids.len()) else {
            return;
        };
        for &id in ids {
            let mut child = self.clone();
            if child.make_move(p, id) {
                children.push(child);
            }
        }
    }
}

impl PuzzleState for State<'_> {
    fn heuristic(&self) -> u32 {
        self.matches.len() as u32
    }

    fn distance(&self, child: &Self) -> u32 {
        child.distance
    }
}

impl fmt::Display for State<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = self.game.sidelen;
        for y in 1..side - 1 {
            writeln!(
                f,
                "{}",
                (1..side - 1).map(|x| self.cells[(y, x)]).join(" ")
            )?;
        }
        Ok(())
    }
}

impl Render for State<'_> {}

/// Solve every level and print the solved grid.
pub fn solve(set: &LevelSet, out: &mut dyn Write) -> Result<(), LevelError> {
    let solver = Solver::new();
    report::run_levels(set, out, |level, out| {
        let game = Game::from_level(level)?;
        let outcome = solver.solve(&game.start_state());
        report::write_report(&outcome, SolutionFormat::GoalStateOnly, out)?;
        Ok(())
    })
}
