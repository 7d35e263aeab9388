//! 8-Map Triangle Subdivision
//!
//! Deterministic IFS with ratio 1/3: every triangle is cut into the 9 cells of
//! a 3-way barycentric grid (6 upright, 3 inverted) and the inverted cell
//! nearest the parent centroid is dropped. Each generation keeps 8/9 of the
//! area of the previous one.
//!
//! Generations are expanded iteratively, one flat `Vec` per depth, so the
//! call stack never grows with the requested generation.
//!
//! License: MIT

use crate::geometry::{Triangle, Vertex};

/// Grid divisions per edge
const GRID_DIVISIONS: usize = 3;

/// Cells kept per subdivision
pub const MAPS_PER_TRIANGLE: usize = 8;

/// Relative tolerance under which two centroid distances count as a tie
const TIE_TOLERANCE: f64 = 1e-9;

type Cell = [Vertex; 3];

// ============================================================================
// Single subdivision
// ============================================================================

/// Barycentric grid point `P(i, j)` with weights
/// `(1 - (i + j)/3, i/3, j/3)` on the vertices `(A, B, C)`.
#[inline]
fn grid_point(triangle: &Triangle, i: usize, j: usize) -> Vertex {
    let [a, b, c] = *triangle.vertices();
    let m = GRID_DIVISIONS as f64;
    let lam_b = i as f64 / m;
    let lam_c = j as f64 / m;
    let lam_a = 1.0 - (i + j) as f64 / m;
    a * lam_a + b * lam_b + c * lam_c
}

/// All 9 grid cells: upright cells then inverted cells, `i` outer, `j` inner.
fn grid_cells(triangle: &Triangle) -> ([Cell; 6], [Cell; 3]) {
    let p = |i, j| grid_point(triangle, i, j);

    let mut upright = [[Vertex::default(); 3]; 6];
    let mut k = 0;
    for i in 0..GRID_DIVISIONS {
        for j in 0..GRID_DIVISIONS - i {
            upright[k] = [p(i, j), p(i + 1, j), p(i, j + 1)];
            k += 1;
        }
    }

    let mut inverted = [[Vertex::default(); 3]; 3];
    let mut k = 0;
    for i in 0..GRID_DIVISIONS - 1 {
        for j in 0..GRID_DIVISIONS - 1 - i {
            inverted[k] = [p(i + 1, j), p(i + 1, j + 1), p(i, j + 1)];
            k += 1;
        }
    }

    (upright, inverted)
}

#[inline]
fn cell_centroid(cell: &Cell) -> Vertex {
    (cell[0] + cell[1] + cell[2]) * (1.0 / 3.0)
}

/// Index of the inverted cell to remove: nearest centroid, first on a tie.
fn central_cell_index(inverted: &[Cell; 3], centroid: Vertex) -> usize {
    let distances = inverted.map(|cell| cell_centroid(&cell).distance(centroid));
    let nearest = distances.iter().copied().fold(f64::INFINITY, f64::min);
    let farthest = distances.iter().copied().fold(0.0, f64::max);
    let tolerance = TIE_TOLERANCE * farthest.max(f64::MIN_POSITIVE);

    distances
        .iter()
        .position(|&d| d - nearest <= tolerance)
        .unwrap_or(0)
}

/// Split `triangle` into 9 cells and return the 8 that survive:
/// the 6 upright cells followed by the 2 kept inverted cells.
pub fn subdivide_8(triangle: &Triangle) -> [Triangle; MAPS_PER_TRIANGLE] {
    let (upright, inverted) = grid_cells(triangle);
    let survivors = match central_cell_index(&inverted, triangle.centroid()) {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    };

    std::array::from_fn(|k| {
        let cell = if k < upright.len() {
            upright[k]
        } else {
            inverted[survivors[k - upright.len()]]
        };
        Triangle::from_vertices_unchecked(cell)
    })
}

/// Apply `subdivide_8` to every triangle, preserving order.
fn expand(previous: &[Triangle]) -> Vec<Triangle> {
    let mut next = Vec::with_capacity(previous.len() * MAPS_PER_TRIANGLE);
    next.extend(previous.iter().flat_map(subdivide_8));
    next
}

// ============================================================================
// Generations
// ============================================================================

/// Triangles of generation `gen` grown from `root`
pub fn triangles_from(root: Triangle, gen: usize) -> Vec<Triangle> {
    let mut current = vec![root];
    for g in 0..gen {
        current = expand(&current);
        log::trace!("subdivision: generation {} has {} triangles", g + 1, current.len());
    }
    current
}

/// Triangles of generation `gen` on the base triangle (8^gen of them).
///
/// Recomputed from scratch on every call.
pub fn triangles_at_generation(gen: usize) -> Vec<Triangle> {
    triangles_from(Triangle::base(), gen)
}

/// `8^gen`, or `None` when it does not fit in a `u64`
pub fn triangle_count(gen: usize) -> Option<u64> {
    u32::try_from(gen)
        .ok()
        .and_then(|g| (MAPS_PER_TRIANGLE as u64).checked_pow(g))
}

/// Fraction of the root area kept at generation `gen`: (8/9)^gen
pub fn retained_area_fraction(gen: usize) -> f64 {
    let ratio = MAPS_PER_TRIANGLE as f64 / (GRID_DIVISIONS * GRID_DIVISIONS) as f64;
    ratio.powi(gen.min(i32::MAX as usize) as i32)
}

/// Similarity dimension of the attractor: 8 maps with ratio 1/3
pub fn similarity_dimension() -> f64 {
    (MAPS_PER_TRIANGLE as f64).ln() / (GRID_DIVISIONS as f64).ln()
}

// ============================================================================
// Arena
// ============================================================================

/// Per-generation triangle storage.
///
/// Generation `g` is built once, from generation `g - 1`, and kept for later
/// requests.
#[derive(Debug, Clone)]
pub struct SubdivisionArena {
    generations: Vec<Vec<Triangle>>,
}

impl Default for SubdivisionArena {
    fn default() -> Self {
        Self::sierpinski()
    }
}

impl SubdivisionArena {
    pub fn new(root: Triangle) -> Self {
        Self {
            generations: vec![vec![root]],
        }
    }

    /// Arena rooted at the base triangle
    pub fn sierpinski() -> Self {
        Self::new(Triangle::base())
    }

    /// Deepest generation built so far
    pub fn depth(&self) -> usize {
        self.generations.len() - 1
    }

    /// Triangles of generation `gen`, expanding the arena as needed
    pub fn generation(&mut self, gen: usize) -> &[Triangle] {
        while self.generations.len() <= gen {
            let next = match self.generations.last() {
                Some(previous) => expand(previous),
                None => break,
            };
            log::debug!(
                "subdivision arena: built generation {} ({} triangles)",
                self.generations.len(),
                next.len()
            );
            self.generations.push(next);
        }
        &self.generations[gen]
    }

    /// Triangles of an already built generation
    pub fn get(&self, gen: usize) -> Option<&[Triangle]> {
        self.generations.get(gen).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::total_area;
    use approx::assert_relative_eq;

    #[test]
    fn test_generation_zero_is_base() {
        let tris = triangles_at_generation(0);
        assert_eq!(tris, vec![Triangle::base()]);
    }

    #[test]
    fn test_counts() {
        for g in 0..=4 {
            assert_eq!(triangles_at_generation(g).len() as u64, triangle_count(g).unwrap());
        }
        assert_eq!(triangle_count(3), Some(512));
        assert_eq!(triangle_count(22), None);
    }

    #[test]
    fn test_area_scaling() {
        let base_area = Triangle::base().area();
        for g in 0..=4 {
            let area = total_area(&triangles_at_generation(g));
            assert_relative_eq!(area, base_area * (8.0_f64 / 9.0).powi(g as i32), max_relative = 1e-9);
            assert_relative_eq!(area, base_area * retained_area_fraction(g), max_relative = 1e-9);
        }
    }

    #[test]
    fn test_subdivide_8_area_and_cells() {
        let base = Triangle::base();
        let cells = subdivide_8(&base);
        assert_relative_eq!(total_area(&cells), base.area() * 8.0 / 9.0, max_relative = 1e-12);
        for cell in &cells {
            assert_relative_eq!(cell.area(), base.area() / 9.0, max_relative = 1e-9);
            for &v in cell.vertices() {
                assert!(base.contains(v, 1e-12));
            }
        }
    }

    #[test]
    fn test_grid_tiles_parent() {
        let base = Triangle::base();
        let (upright, inverted) = grid_cells(&base);
        let area: f64 = upright
            .iter()
            .chain(inverted.iter())
            .map(|c| Triangle::from_vertices_unchecked(*c).area())
            .sum();
        assert_relative_eq!(area, base.area(), max_relative = 1e-12);
    }

    #[test]
    fn test_removed_cell_is_nearest_inverted() {
        let base = Triangle::base();
        let centroid = base.centroid();
        let (_, inverted) = grid_cells(&base);
        let removed = central_cell_index(&inverted, centroid);
        let removed_distance = cell_centroid(&inverted[removed]).distance(centroid);

        for cell in &inverted {
            assert!(removed_distance <= cell_centroid(cell).distance(centroid) + 1e-12);
        }

        let kept = subdivide_8(&base);
        for cell in &kept {
            assert!(cell.centroid().distance(centroid) > 1e-9);
            assert_ne!(cell.vertices(), &inverted[removed]);
        }
    }

    #[test]
    fn test_exact_tie_removes_first() {
        // The three inverted cells of an equilateral triangle are equidistant
        // from its centroid.
        let base = Triangle::base();
        let (_, inverted) = grid_cells(&base);
        assert_eq!(central_cell_index(&inverted, base.centroid()), 0);
        let kept = subdivide_8(&base);
        assert_eq!(kept[6].vertices(), &inverted[1]);
        assert_eq!(kept[7].vertices(), &inverted[2]);
    }

    #[test]
    fn test_arena_matches_stateless() {
        let mut arena = SubdivisionArena::sierpinski();
        assert_eq!(arena.depth(), 0);
        assert_eq!(arena.generation(3), triangles_at_generation(3).as_slice());
        assert_eq!(arena.depth(), 3);
        assert_eq!(arena.get(2).unwrap(), triangles_at_generation(2).as_slice());
        assert!(arena.get(4).is_none());
    }

    #[test]
    fn test_similarity_dimension() {
        assert_relative_eq!(similarity_dimension(), 8.0_f64.ln() / 3.0_f64.ln());
        assert!(similarity_dimension() < 2.0);
    }
}
