//! Chaos Game Generator
//!
//! Stochastic Sierpinski generator: starting from the first vertex, each step
//! moves halfway toward a uniformly drawn vertex. The draws are kept next to
//! the points so that any step can be undone exactly.
//!
//! Without the recorded choice a point has three equally valid predecessors
//! (one per vertex), so the reverse step only ever consumes supplied choices.
//!
//! License: MIT

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{GasketError, Result};
use crate::geometry::{Vertex, BASE_VERTICES};

/// Number of contraction maps (one per vertex)
const MAP_COUNT: u8 = 3;

// ============================================================================
// Trajectory
// ============================================================================

/// Points produced by a forward run, aligned 1:1 with the vertex choices
/// that produced them.
///
/// Read-only once built; snapshots borrow slices of it.
#[derive(Debug, Clone, PartialEq)]
pub struct PointTrajectory {
    start: Vertex,
    points: Vec<Vertex>,
    choices: Vec<u8>,
}

impl PointTrajectory {
    /// Point the run started from (predecessor of `points()[0]`)
    #[inline]
    pub fn start(&self) -> Vertex {
        self.start
    }

    #[inline]
    pub fn points(&self) -> &[Vertex] {
        &self.points
    }

    #[inline]
    pub fn choices(&self) -> &[u8] {
        &self.choices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First `m` points (clamped to the trajectory length)
    pub fn head(&self, m: usize) -> &[Vertex] {
        &self.points[..m.min(self.len())]
    }

    /// Last `m` points with their aligned choices
    pub fn tail(&self, m: usize) -> (&[Vertex], &[u8]) {
        let from = self.len() - m.min(self.len());
        (&self.points[from..], &self.choices[from..])
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Chaos game over a fixed vertex triple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaosGame {
    vertices: [Vertex; 3],
}

impl Default for ChaosGame {
    fn default() -> Self {
        Self::sierpinski()
    }
}

impl ChaosGame {
    pub fn new(vertices: [Vertex; 3]) -> Self {
        Self { vertices }
    }

    /// Chaos game on the equilateral base triangle
    pub fn sierpinski() -> Self {
        Self::new(BASE_VERTICES)
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    /// Random source for a run: reproducible for `Some(seed)`, seeded from
    /// the OS otherwise.
    pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
        match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    /// Run `n` forward steps drawing vertex choices from `rng`.
    pub fn forward<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> PointTrajectory {
        let start = self.vertices[0];
        let mut current = start;
        let mut points = Vec::with_capacity(n);
        let mut choices = Vec::with_capacity(n);

        for _ in 0..n {
            let choice = rng.gen_range(0..MAP_COUNT);
            current = current.midpoint(self.vertices[choice as usize]);
            points.push(current);
            choices.push(choice);
        }

        log::debug!("chaos game: generated {} points", n);
        PointTrajectory { start, points, choices }
    }

    /// Undo one forward step per `(point, choice)` pair, in the order given.
    ///
    /// Each output is `2 * point - vertices[choice]`.
    pub fn reverse(&self, points: &[Vertex], choices: &[u8]) -> Result<Vec<Vertex>> {
        if points.len() != choices.len() {
            return Err(GasketError::LengthMismatch {
                points: points.len(),
                choices: choices.len(),
            });
        }
        if points.is_empty() {
            return Err(GasketError::EmptyTrajectory);
        }

        points
            .iter()
            .zip(choices)
            .enumerate()
            .map(|(position, (&point, &choice))| {
                let vertex = self
                    .vertices
                    .get(choice as usize)
                    .ok_or(GasketError::ChoiceOutOfRange { position, choice })?;
                Ok(point * 2.0 - *vertex)
            })
            .collect()
    }

    /// Reconstruct the predecessors of the last `m` trajectory entries.
    ///
    /// Returns an empty set for `m == 0`.
    pub fn reconstruct_tail(&self, trajectory: &PointTrajectory, m: usize) -> Result<Vec<Vertex>> {
        if m == 0 {
            return Ok(Vec::new());
        }
        let (points, choices) = trajectory.tail(m);
        self.reverse(points, choices)
    }
}

/// Forward chaos game on `vertices` (see [`ChaosGame::forward`])
pub fn generate_forward<R: Rng + ?Sized>(
    vertices: [Vertex; 3],
    n: usize,
    rng: &mut R,
) -> PointTrajectory {
    ChaosGame::new(vertices).forward(n, rng)
}

/// Exact inverse of the forward step (see [`ChaosGame::reverse`])
pub fn reverse_reconstruct(
    vertices: [Vertex; 3],
    points: &[Vertex],
    choices: &[u8],
) -> Result<Vec<Vertex>> {
    ChaosGame::new(vertices).reverse(points, choices)
}

/// Similarity dimension of the attractor: 3 maps with ratio 1/2
pub fn similarity_dimension() -> f64 {
    3.0_f64.ln() / 2.0_f64.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Triangle;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_forward_deterministic() {
        let game = ChaosGame::sierpinski();
        let a = game.forward(500, &mut ChaosGame::seeded_rng(Some(42)));
        let b = game.forward(500, &mut ChaosGame::seeded_rng(Some(42)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds() {
        let game = ChaosGame::sierpinski();
        let a = game.forward(64, &mut ChaosGame::seeded_rng(Some(1)));
        let b = game.forward(64, &mut ChaosGame::seeded_rng(Some(2)));
        assert_ne!(a.choices(), b.choices());
    }

    #[test]
    fn test_zero_points() {
        let trajectory = ChaosGame::sierpinski().forward(0, &mut ChaosGame::seeded_rng(None));
        assert!(trajectory.is_empty());
        assert!(trajectory.choices().is_empty());
        assert_eq!(trajectory.start(), BASE_VERTICES[0]);
    }

    #[test]
    fn test_single_step_midpoint_and_back() {
        let game = ChaosGame::sierpinski();
        let trajectory = game.forward(1, &mut ChaosGame::seeded_rng(Some(7)));
        let choice = trajectory.choices()[0];
        let expected = BASE_VERTICES[0].midpoint(BASE_VERTICES[choice as usize]);
        assert_eq!(trajectory.points()[0], expected);

        let back = game.reverse(trajectory.points(), trajectory.choices()).unwrap();
        assert_eq!(back, vec![BASE_VERTICES[0]]);
    }

    #[test]
    fn test_round_trip_every_step() {
        let game = ChaosGame::sierpinski();
        let trajectory = game.forward(2000, &mut ChaosGame::seeded_rng(Some(123)));
        let predecessors = game.reverse(trajectory.points(), trajectory.choices()).unwrap();

        assert_abs_diff_eq!(predecessors[0].x, trajectory.start().x, epsilon = 1e-12);
        assert_abs_diff_eq!(predecessors[0].y, trajectory.start().y, epsilon = 1e-12);
        for i in 1..trajectory.len() {
            let expected = trajectory.points()[i - 1];
            assert_abs_diff_eq!(predecessors[i].x, expected.x, epsilon = 1e-12);
            assert_abs_diff_eq!(predecessors[i].y, expected.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_reverse_order_is_pairwise() {
        let game = ChaosGame::sierpinski();
        let trajectory = game.forward(32, &mut ChaosGame::seeded_rng(Some(5)));
        let forward_order = game.reverse(trajectory.points(), trajectory.choices()).unwrap();

        let rev_points: Vec<Vertex> = trajectory.points().iter().rev().copied().collect();
        let rev_choices: Vec<u8> = trajectory.choices().iter().rev().copied().collect();
        let mut reversed_order = game.reverse(&rev_points, &rev_choices).unwrap();
        reversed_order.reverse();

        assert_eq!(forward_order, reversed_order);
    }

    #[test]
    fn test_reverse_length_mismatch() {
        let game = ChaosGame::sierpinski();
        let err = game.reverse(&[Vertex::new(0.5, 0.5)], &[0, 1]).unwrap_err();
        assert!(matches!(err, GasketError::LengthMismatch { points: 1, choices: 2 }));
    }

    #[test]
    fn test_reverse_empty() {
        let err = ChaosGame::sierpinski().reverse(&[], &[]).unwrap_err();
        assert!(matches!(err, GasketError::EmptyTrajectory));
    }

    #[test]
    fn test_reverse_choice_out_of_range() {
        let points = [Vertex::new(0.5, 0.3), Vertex::new(0.4, 0.2)];
        let err = reverse_reconstruct(BASE_VERTICES, &points, &[2, 3]).unwrap_err();
        assert!(matches!(err, GasketError::ChoiceOutOfRange { position: 1, choice: 3 }));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_reconstruct_tail() {
        let game = ChaosGame::sierpinski();
        let trajectory = game.forward(100, &mut ChaosGame::seeded_rng(Some(9)));

        assert!(game.reconstruct_tail(&trajectory, 0).unwrap().is_empty());

        let tail = game.reconstruct_tail(&trajectory, 10).unwrap();
        assert_eq!(tail.len(), 10);
        for (k, p) in tail.iter().enumerate() {
            let expected = trajectory.points()[89 + k];
            assert_abs_diff_eq!(p.x, expected.x, epsilon = 1e-12);
            assert_abs_diff_eq!(p.y, expected.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_similarity_dimension() {
        assert_abs_diff_eq!(similarity_dimension(), 1.584_962_5, epsilon = 1e-6);
    }

    proptest! {
        #[test]
        fn prop_lengths_match(n in 0usize..3000, seed in any::<u64>()) {
            let trajectory = generate_forward(BASE_VERTICES, n, &mut ChaosGame::seeded_rng(Some(seed)));
            prop_assert_eq!(trajectory.points().len(), n);
            prop_assert_eq!(trajectory.choices().len(), n);
            prop_assert!(trajectory.choices().iter().all(|&c| c < 3));
        }

        #[test]
        fn prop_points_inside_hull(n in 1usize..3000, seed in any::<u64>()) {
            let base = Triangle::base();
            let trajectory = generate_forward(BASE_VERTICES, n, &mut ChaosGame::seeded_rng(Some(seed)));
            for &p in trajectory.points() {
                prop_assert!(base.contains(p, 1e-12), "point {:?} escaped the hull", p);
            }
        }
    }
}
