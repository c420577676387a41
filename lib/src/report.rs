//! Uniform solve driver: per-level loop, output formats, and the text
//! report written for each solved level.

use std::fmt::Display;
use std::io::{self, Write};
use std::time::Instant;

use itertools::Itertools;
use log::info;

use crate::level::{Level, LevelError, LevelSet};
use crate::solver::SolveReport;

/// How a solution is written out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SolutionFormat {
    /// Dump every state along the path.
    AllStates,
    /// Dump only the final state; for puzzles where the end grid is the
    /// whole answer.
    GoalStateOnly,
    /// One line of move summaries under the header.
    MovesOnly,
    /// Move summaries on the header line itself.
    MovesOnlySingleLine,
}

/// Text rendering hooks a puzzle state provides to the report writer.
pub trait Render: Display {
    /// Short text for the move that produced this state (a move letter,
    /// say); `None` for the start state or for puzzles whose answer is not
    /// a move sequence.
    fn move_summary(&self) -> Option<String> {
        None
    }
}

/// Write the report for one level's search outcome.
pub fn write_report<S: Render>(
    report: &SolveReport<S>,
    format: SolutionFormat,
    out: &mut dyn Write,
) -> io::Result<()> {
    for (i, solution) in report.solutions.iter().enumerate() {
        if report.solutions.len() > 1 {
            writeln!(out, "Solution {}", i + 1)?;
        }
        write!(out, "Sequence of moves: ")?;
        match format {
            SolutionFormat::AllStates => {
                writeln!(out)?;
                for state in &solution.states {
                    write!(out, "{state}")?;
                }
            }
            SolutionFormat::GoalStateOnly => {
                writeln!(out)?;
                write!(out, "{}", solution.goal())?;
            }
            SolutionFormat::MovesOnly => {
                writeln!(out)?;
                writeln!(out, "{}", moves_line(solution.states.iter()))?;
            }
            SolutionFormat::MovesOnlySingleLine => {
                writeln!(out, "{}", moves_line(solution.states.iter()))?;
            }
        }
        writeln!(out, "Number of moves: {}", solution.moves())?;
    }
    if report.solutions.is_empty() {
        writeln!(out, "No solution")?;
    }
    writeln!(out, "Number of vertices examined: {}", report.examined)?;
    Ok(())
}

fn moves_line<'a, S: Render + 'a>(states: impl Iterator<Item = &'a S>) -> String {
    states.filter_map(|s| s.move_summary()).join("")
}

/// Run `solve_level` for every level in the pack, writing the `Level <id>`
/// headers and timing each level.
///
/// Timing goes to the log, not to `out`, so solver output stays
/// deterministic.
pub fn run_levels(
    set: &LevelSet,
    out: &mut dyn Write,
    mut solve_level: impl FnMut(&Level, &mut dyn Write) -> Result<(), LevelError>,
) -> Result<(), LevelError> {
    for level in &set.levels {
        writeln!(out, "Level {}", level.id)?;
        let clock = Instant::now();
        solve_level(level, &mut *out)?;
        info!(
            "level {} finished in {:.3}s",
            level.id,
            clock.elapsed().as_secs_f64()
        );
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Solution;
    use std::fmt;

    #[derive(Clone)]
    struct Tag(Option<char>);

    impl fmt::Display for Tag {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "[{}]", self.0.unwrap_or('*'))
        }
    }

    impl Render for Tag {
        fn move_summary(&self) -> Option<String> {
            self.0.map(String::from)
        }
    }

    fn sample() -> SolveReport<Tag> {
        SolveReport {
            solutions: vec![Solution {
                states: vec![Tag(None), Tag(Some('r')), Tag(Some('d'))],
            }],
            examined: 5,
        }
    }

    #[test]
    fn single_line_format() {
        let mut out = Vec::new();
        write_report(&sample(), SolutionFormat::MovesOnlySingleLine, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Sequence of moves: rd\nNumber of moves: 2\nNumber of vertices examined: 5\n"
        );
    }

    #[test]
    fn moves_only_format() {
        let mut out = Vec::new();
        write_report(&sample(), SolutionFormat::MovesOnly, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Sequence of moves: \nrd\nNumber of moves: 2\nNumber of vertices examined: 5\n"
        );
    }

    #[test]
    fn goal_state_format() {
        let mut out = Vec::new();
        write_report(&sample(), SolutionFormat::GoalStateOnly, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Sequence of moves: \n[d]\nNumber of moves: 2\nNumber of vertices examined: 5\n"
        );
    }

    #[test]
    fn failure_prints_no_solution() {
        let report = SolveReport::<Tag> {
            solutions: vec![],
            examined: 2,
        };
        let mut out = Vec::new();
        write_report(&report, SolutionFormat::AllStates, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No solution\nNumber of vertices examined: 2\n"
        );
    }
}
