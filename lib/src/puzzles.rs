//! Puzzle modules: domain content plugged into the search core.
//!
//! Each module owns its board-text conventions, its state type, and its
//! choice of solver configuration and output format, and exposes
//! `solve(set, out)` entry points the CLI registry calls uniformly.

pub mod castle_bailey;
pub mod maze;
