//! gasket - Sierpinski Gasket Generators
//!
//! Two ways of growing self-similar structures on the equilateral triangle
//! A=(0.5, √3/2), B=(0, 0), C=(1, 0):
//!
//! # Features
//! - Chaos game with seeded ChaCha8 draws, plus the exact reverse step
//!   (`2p - v`) driven by the recorded vertex choices
//! - 8-map subdivision (ratio 1/3, one inverted cell removed per triangle)
//!   with a per-generation arena
//! - Snapshot sequencing for "all" / "final" save modes
//! - PNG / TIFF (Rayon scanline fill) and SVG frame output
//!
//! # Example
//! ```
//! use gasket_core::generators::{ChaosGame, triangles_at_generation};
//!
//! let game = ChaosGame::sierpinski();
//! let trajectory = game.forward(1_000, &mut ChaosGame::seeded_rng(Some(42)));
//! let (tail, choices) = trajectory.tail(10);
//! let predecessors = game.reverse(tail, choices).unwrap();
//! assert_eq!(predecessors.len(), 10);
//!
//! assert_eq!(triangles_at_generation(3).len(), 512);
//! ```
//!
//! # License
//! MIT License

pub mod config;
pub mod error;
pub mod frames;
pub mod generators;
pub mod geometry;
pub mod pipeline;
pub mod render;
pub mod sequencer;

pub use config::{GasketConfig, OutputFormat, SaveMode};
pub use error::{GasketError, Result};
pub use geometry::{Triangle, Vertex, BASE_VERTICES};
pub use sequencer::GenerationSequencer;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_module() {
        // Chaos game
        let game = generators::ChaosGame::sierpinski();
        let trajectory = game.forward(100, &mut generators::ChaosGame::seeded_rng(Some(42)));
        assert_eq!(trajectory.len(), 100);
        assert_eq!(trajectory.choices().len(), 100);

        // Subdivision
        let tris = generators::triangles_at_generation(2);
        assert_eq!(tris.len(), 64);
    }

    #[test]
    fn test_base_vertices_exported() {
        assert_eq!(Triangle::base().vertices(), &BASE_VERTICES);
    }
}
