//! Fractal Generators Module
//!
//! The two generators of the gasket family: the stochastic chaos game with its
//! exact reverse step, and the deterministic 8-map subdivision.
//!
//! License: MIT

pub mod chaos;
pub mod subdivision;

// Re-export main types and functions
pub use chaos::{generate_forward, reverse_reconstruct, ChaosGame, PointTrajectory};
pub use subdivision::{
    subdivide_8, triangle_count, triangles_at_generation, SubdivisionArena,
};
