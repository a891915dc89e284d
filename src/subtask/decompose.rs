//! Lazy per-column state machine behind [`target_to_subtasks`].

use super::{Subtask, SubtaskKind};
use crate::core::types::{GridPos, DEFAULT_COLOR, GRID_COLS, GRID_ROWS, REMOVE_MARKER};
use crate::figure::Figure;

/// Scaffold towers stand this many cells further along both x and y.
pub const SCAFFOLD_OFFSET: (usize, usize) = (2, 2);

/// Decompose a figure into its ordered subtask stream.
///
/// The stream is finite and deterministic; calling this again on the same
/// figure yields an identical sequence.
pub fn target_to_subtasks(figure: &Figure) -> Subtasks<'_> {
    for hole in figure.stray_holes() {
        log::warn!(
            "hole at {:?} lies at or above the column relief {}; ignoring it",
            hole,
            figure.relief().get(hole.x, hole.y)
        );
    }
    Subtasks {
        figure,
        columns: figure.relief().nonzero_columns().collect(),
        next_column: 0,
        column: None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    BuildingBase { z: usize },
    BuildScaffold { hole: usize, z: usize },
    MarkWindow { hole: usize },
    RetractScaffold,
    Done,
}

#[derive(Clone, Debug)]
struct ColumnState {
    x: usize,
    y: usize,
    height: usize,
    /// Hole heights to carve, ascending.
    holes: Vec<usize>,
    /// Scaffold blocks placed so far, in placement order.
    scaffold: Vec<GridPos>,
    phase: Phase,
}

impl ColumnState {
    fn new(figure: &Figure, x: usize, y: usize) -> Self {
        let height = figure.relief().get(x, y) as usize;
        let holes: Vec<usize> = figure.holes_in_column(x, y).filter(|&z| z < height).collect();
        let reachable = x < GRID_ROWS - SCAFFOLD_OFFSET.0 && y < GRID_COLS - SCAFFOLD_OFFSET.1;
        let holes = if reachable {
            holes
        } else {
            if !holes.is_empty() {
                log::debug!(
                    "column ({}, {}) is too close to the edge for a scaffold; {} holes stay filled",
                    x,
                    y,
                    holes.len()
                );
            }
            Vec::new()
        };
        Self {
            x,
            y,
            height,
            holes,
            scaffold: Vec::new(),
            phase: Phase::BuildingBase { z: 0 },
        }
    }

    fn scaffold_position(&self, z: usize) -> GridPos {
        GridPos::new(z, self.x + SCAFFOLD_OFFSET.0, self.y + SCAFFOLD_OFFSET.1)
    }

    /// Advance by one step. `None` means the column is exhausted.
    fn step(&mut self, figure: &Figure) -> Option<(SubtaskKind, Subtask)> {
        loop {
            match self.phase {
                Phase::BuildingBase { z } if z < self.height => {
                    self.phase = Phase::BuildingBase { z: z + 1 };
                    let pos = GridPos::new(z, self.x, self.y);
                    let color = match figure.colors().get(pos) {
                        c if c > 0 => c,
                        _ => DEFAULT_COLOR,
                    };
                    return Some((SubtaskKind::Build, Subtask::new(pos, color)));
                }
                Phase::BuildingBase { .. } => {
                    self.phase = if self.holes.is_empty() {
                        Phase::Done
                    } else {
                        Phase::BuildScaffold { hole: 0, z: 0 }
                    };
                }
                Phase::BuildScaffold { hole, z } => {
                    if z < self.holes[hole] {
                        self.phase = Phase::BuildScaffold { hole, z: z + 1 };
                        let pos = self.scaffold_position(z);
                        self.scaffold.push(pos);
                        return Some((SubtaskKind::Scaffold, Subtask::new(pos, DEFAULT_COLOR)));
                    }
                    self.phase = Phase::MarkWindow { hole };
                }
                Phase::MarkWindow { hole } => {
                    let height = self.holes[hole];
                    self.phase = if hole + 1 < self.holes.len() {
                        Phase::BuildScaffold { hole: hole + 1, z: height }
                    } else {
                        Phase::RetractScaffold
                    };
                    let pos = GridPos::new(height, self.x, self.y);
                    return Some((SubtaskKind::Window, Subtask::new(pos, REMOVE_MARKER)));
                }
                Phase::RetractScaffold => match self.scaffold.pop() {
                    Some(pos) => {
                        return Some((SubtaskKind::Retract, Subtask::new(pos, REMOVE_MARKER)));
                    }
                    None => self.phase = Phase::Done,
                },
                Phase::Done => return None,
            }
        }
    }
}

/// Ordered, lazily produced subtasks of one figure.
///
/// Owns its cursor and scaffold stack; independent decompositions never
/// share state.
#[derive(Clone, Debug)]
pub struct Subtasks<'a> {
    figure: &'a Figure,
    columns: Vec<(usize, usize)>,
    next_column: usize,
    column: Option<ColumnState>,
}

impl Subtasks<'_> {
    /// Next subtask together with its role.
    pub fn next_tagged(&mut self) -> Option<(SubtaskKind, Subtask)> {
        loop {
            if self.column.is_none() {
                let &(x, y) = self.columns.get(self.next_column)?;
                self.next_column += 1;
                self.column = Some(ColumnState::new(self.figure, x, y));
            }
            if let Some(column) = self.column.as_mut() {
                if let Some(item) = column.step(self.figure) {
                    return Some(item);
                }
            }
            self.column = None;
        }
    }

    /// Turn this stream into one yielding `(kind, subtask)` pairs.
    pub fn tagged(self) -> impl Iterator<Item = (SubtaskKind, Subtask)> {
        let mut inner = self;
        std::iter::from_fn(move || inner.next_tagged())
    }
}

impl Iterator for Subtasks<'_> {
    type Item = Subtask;

    fn next(&mut self) -> Option<Subtask> {
        self.next_tagged().map(|(_, subtask)| subtask)
    }
}

impl std::iter::FusedIterator for Subtasks<'_> {}
