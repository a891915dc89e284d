//! Gridtask - voxel build targets and their step-by-step decomposition
//!
//! Targets are generated procedurally or loaded from a corpus, canonicalized
//! into occupancy / relief / hole form, and decomposed into an ordered
//! stream of single-block build and remove steps.

pub mod core;
pub mod grid;
pub mod figure;
pub mod generation;
pub mod subtask;

pub use figure::{Figure, FigureOrigin, FigureParams};
pub use generation::{DatasetFigureGenerator, RandomFigureGenerator, TargetGenerator};
pub use subtask::{target_to_subtasks, PlacementDelta, Subtask, SubtaskKind, Subtasks};
