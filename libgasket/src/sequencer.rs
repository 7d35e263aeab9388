//! Generation Sequencer
//!
//! Turns one engine run into the ordered list of frames a renderer consumes.
//! Holds only iteration state; every snapshot is derived from the trajectory
//! or the arena on demand.
//!
//! License: MIT

use std::ops::RangeInclusive;

use crate::config::SaveMode;
use crate::error::Result;
use crate::generators::{ChaosGame, PointTrajectory, SubdivisionArena};
use crate::geometry::{Triangle, Vertex};

// ============================================================================
// Chaos game snapshots
// ============================================================================

/// Number of trajectory entries shown at snapshot `g` of `k`:
/// `floor(n * g / max(1, k))`
pub fn snapshot_size(n: usize, g: usize, k: usize) -> usize {
    let taken = n as u128 * g as u128 / k.max(1) as u128;
    taken as usize
}

/// One chaos game frame pair
#[derive(Debug, Clone, PartialEq)]
pub struct ChaosSnapshot<'a> {
    /// Snapshot index, `None` for the single frame of final mode
    pub generation: Option<usize>,
    /// Number of trajectory entries covered
    pub taken: usize,
    /// First `taken` points of the trajectory
    pub forward: &'a [Vertex],
    /// Predecessors of the last `taken` points
    pub reverse: Vec<Vertex>,
}

/// Iterator over chaos game snapshots
#[derive(Debug)]
pub struct ChaosSnapshots<'a> {
    game: &'a ChaosGame,
    trajectory: &'a PointTrajectory,
    mode: SaveMode,
    snapshot_count: usize,
    next: usize,
}

impl<'a> ChaosSnapshots<'a> {
    fn frame_count(&self) -> usize {
        match self.mode {
            SaveMode::All => self.snapshot_count + 1,
            SaveMode::Final => 1,
        }
    }
}

impl<'a> Iterator for ChaosSnapshots<'a> {
    type Item = Result<ChaosSnapshot<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.frame_count() {
            return None;
        }
        let g = self.next;
        self.next += 1;

        let n = self.trajectory.len();
        let (generation, taken) = match self.mode {
            SaveMode::All => (Some(g), snapshot_size(n, g, self.snapshot_count)),
            SaveMode::Final => (None, n),
        };
        log::debug!("chaos snapshot {:?}: m = {} of {}", generation, taken, n);

        let reverse = match self.game.reconstruct_tail(self.trajectory, taken) {
            Ok(points) => points,
            Err(e) => return Some(Err(e)),
        };
        Some(Ok(ChaosSnapshot {
            generation,
            taken,
            forward: self.trajectory.head(taken),
            reverse,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.frame_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

// ============================================================================
// Subdivision snapshots
// ============================================================================

/// Generations emitted for `max_generation` in `mode`
pub fn subdivision_generations(mode: SaveMode, max_generation: usize) -> RangeInclusive<usize> {
    match mode {
        SaveMode::All => 0..=max_generation,
        SaveMode::Final => max_generation..=max_generation,
    }
}

/// One subdivision frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubdivisionSnapshot<'a> {
    pub generation: usize,
    pub triangles: &'a [Triangle],
}

/// Iterator over subdivision snapshots backed by an arena
#[derive(Debug)]
pub struct SubdivisionSnapshots<'a> {
    arena: &'a SubdivisionArena,
    generations: RangeInclusive<usize>,
}

impl<'a> Iterator for SubdivisionSnapshots<'a> {
    type Item = SubdivisionSnapshot<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let generation = self.generations.next()?;
        let triangles = self.arena.get(generation)?;
        Some(SubdivisionSnapshot { generation, triangles })
    }
}

// ============================================================================
// Sequencer
// ============================================================================

/// Entry points producing snapshot iterators for either engine
pub struct GenerationSequencer;

impl GenerationSequencer {
    /// Chaos game frames: `k + 1` snapshots in all mode, one in final mode.
    pub fn chaos<'a>(
        game: &'a ChaosGame,
        trajectory: &'a PointTrajectory,
        mode: SaveMode,
        snapshot_count: usize,
    ) -> ChaosSnapshots<'a> {
        ChaosSnapshots {
            game,
            trajectory,
            mode,
            snapshot_count,
            next: 0,
        }
    }

    /// Subdivision frames up to `max_generation`.
    ///
    /// The arena is expanded to `max_generation` before the first frame.
    pub fn subdivision(
        arena: &mut SubdivisionArena,
        mode: SaveMode,
        max_generation: usize,
    ) -> SubdivisionSnapshots<'_> {
        arena.generation(max_generation);
        SubdivisionSnapshots {
            arena,
            generations: subdivision_generations(mode, max_generation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::triangles_at_generation;
    use approx::assert_abs_diff_eq;

    fn run(n: usize, seed: u64) -> (ChaosGame, PointTrajectory) {
        let game = ChaosGame::sierpinski();
        let trajectory = game.forward(n, &mut ChaosGame::seeded_rng(Some(seed)));
        (game, trajectory)
    }

    #[test]
    fn test_snapshot_size() {
        assert_eq!(snapshot_size(100, 0, 5), 0);
        assert_eq!(snapshot_size(100, 1, 5), 20);
        assert_eq!(snapshot_size(100, 5, 5), 100);
        assert_eq!(snapshot_size(10, 1, 3), 3);
        assert_eq!(snapshot_size(10, 0, 0), 0);
        assert_eq!(snapshot_size(usize::MAX, 3, 3), usize::MAX);
    }

    #[test]
    fn test_chaos_all_mode() {
        let (game, trajectory) = run(1000, 42);
        let snapshots: Vec<_> = GenerationSequencer::chaos(&game, &trajectory, SaveMode::All, 4)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(snapshots.len(), 5);
        assert_eq!(snapshots[0].taken, 0);
        assert!(snapshots[0].forward.is_empty());
        assert!(snapshots[0].reverse.is_empty());

        for (g, snap) in snapshots.iter().enumerate() {
            assert_eq!(snap.generation, Some(g));
            assert_eq!(snap.taken, 250 * g);
            assert_eq!(snap.forward, &trajectory.points()[..snap.taken]);
            assert_eq!(snap.reverse.len(), snap.taken);
        }

        // Reverse frames end on the predecessor of the final point
        let last = snapshots.last().unwrap();
        let penultimate = trajectory.points()[998];
        assert_abs_diff_eq!(last.reverse[999].x, penultimate.x, epsilon = 1e-12);
        assert_abs_diff_eq!(last.reverse[999].y, penultimate.y, epsilon = 1e-12);
    }

    #[test]
    fn test_chaos_final_mode() {
        let (game, trajectory) = run(300, 1);
        let snapshots: Vec<_> = GenerationSequencer::chaos(&game, &trajectory, SaveMode::Final, 9)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].generation, None);
        assert_eq!(snapshots[0].forward.len(), 300);
        assert_eq!(snapshots[0].reverse.len(), 300);
    }

    #[test]
    fn test_chaos_zero_snapshots() {
        let (game, trajectory) = run(50, 3);
        let sequence = GenerationSequencer::chaos(&game, &trajectory, SaveMode::All, 0);
        assert_eq!(sequence.size_hint(), (1, Some(1)));
        let snapshots: Vec<_> = sequence.collect::<Result<_>>().unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].taken, 0);
    }

    #[test]
    fn test_chaos_empty_trajectory() {
        let (game, trajectory) = run(0, 3);
        for snap in GenerationSequencer::chaos(&game, &trajectory, SaveMode::All, 3) {
            let snap = snap.unwrap();
            assert!(snap.forward.is_empty());
            assert!(snap.reverse.is_empty());
        }
    }

    #[test]
    fn test_subdivision_all_mode() {
        let mut arena = SubdivisionArena::sierpinski();
        let snapshots: Vec<_> = GenerationSequencer::subdivision(&mut arena, SaveMode::All, 3).collect();
        assert_eq!(snapshots.len(), 4);
        for (g, snap) in snapshots.iter().enumerate() {
            assert_eq!(snap.generation, g);
            assert_eq!(snap.triangles, triangles_at_generation(g).as_slice());
        }
    }

    #[test]
    fn test_subdivision_final_mode() {
        let mut arena = SubdivisionArena::sierpinski();
        let snapshots: Vec<_> = GenerationSequencer::subdivision(&mut arena, SaveMode::Final, 2).collect();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].generation, 2);
        assert_eq!(snapshots[0].triangles.len(), 64);
    }
}
