use std::collections::HashSet;

use log::debug;

use crate::error::GridError;
use crate::grid::{IndexedGrid, wrap_coord};
use crate::tiling::{Tiling, check_wrap};

pub const ADJACENT_WEIGHT: f32 = 1.0;
/// Diagonal neighbors sit `√2` further away, so they couple more weakly.
pub const DIAGONAL_WEIGHT: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Undirected weighted edge between two flat indices. Always `a < b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub a: usize,
    pub b: usize,
    pub weight: f32,
}

/// Build the toroidal neighbor graph for `grid`.
///
/// Neighbors wrap relative to the resident window, so the result does not
/// depend on how far the grid has been panned. Each unordered pair appears
/// once; on grids narrower than three tiles two offsets can wrap onto the same
/// neighbor, in which case the first one seen (adjacent before diagonal) wins.
///
/// A wrapped coordinate with no tile means the coordinate map is corrupt, and
/// a grid that cuts the tiling mid-period would give some tiles the wrong
/// neighbors. Nothing is returned in either case.
pub fn build_springs<T: Tiling + ?Sized>(
    grid: &IndexedGrid,
    tiling: &T,
) -> Result<Vec<Spring>, GridError> {
    let (w, d) = (grid.width(), grid.depth());
    check_wrap(tiling, w, d)?;
    let (ox, oz) = grid.origin();
    let mut springs = Vec::with_capacity(grid.n() * 4);
    let mut seen = HashSet::with_capacity(grid.n() * 4);

    for tile in grid.tiles() {
        let (x, z) = (tile.x(), tile.z());
        let groups = [
            (tiling.adjacent(x, z), ADJACENT_WEIGHT),
            (tiling.diagonal(x, z), DIAGONAL_WEIGHT),
        ];
        for (offsets, weight) in groups {
            for &(dx, dz) in offsets {
                let nx = ox + wrap_coord(x + dx - ox, w);
                let nz = oz + wrap_coord(z + dz - oz, d);
                let other = grid
                    .xz_to_index(nx, nz)
                    .ok_or(GridError::MissingNeighbor { x: nx, z: nz })?
                    .i;
                if tile.i < other && seen.insert((tile.i, other)) {
                    springs.push(Spring {
                        a: tile.i,
                        b: other,
                        weight,
                    });
                }
            }
        }
    }

    debug!("built {} springs for {}x{} grid", springs.len(), w, d);
    Ok(springs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::{HexTiling, SquareTiling};

    fn pairs(springs: &[Spring]) -> Vec<(usize, usize, f32)> {
        let mut out: Vec<_> = springs.iter().map(|s| (s.a, s.b, s.weight)).collect();
        out.sort_by(|l, r| (l.0, l.1).cmp(&(r.0, r.1)));
        out
    }

    #[test]
    fn three_by_three_square_is_fully_connected() {
        let grid = IndexedGrid::new(3, 3).unwrap();
        let springs = build_springs(&grid, &SquareTiling::default()).unwrap();
        // Every tile touches the other 8 once the edges wrap.
        assert_eq!(springs.len(), 36);
        let adjacent = springs.iter().filter(|s| s.weight == ADJACENT_WEIGHT).count();
        assert_eq!(adjacent, 18);
        assert_eq!(springs.len() - adjacent, 18);
    }

    #[test]
    fn pairs_are_ordered_and_unique() {
        let grid = IndexedGrid::new(6, 5).unwrap();
        let springs = build_springs(&grid, &SquareTiling::default()).unwrap();
        let mut unique = HashSet::new();
        for s in &springs {
            assert!(s.a < s.b);
            assert!(unique.insert((s.a, s.b)));
        }
        // 4 adjacent + 4 diagonal per tile, each edge counted from both ends.
        assert_eq!(springs.len(), 30 * 8 / 2);
    }

    #[test]
    fn left_edge_wraps_to_right_edge() {
        let (w, d) = (5, 4);
        let grid = IndexedGrid::new(w, d).unwrap();
        let springs = build_springs(&grid, &SquareTiling::default()).unwrap();
        for z in 0..d as i32 {
            let left = grid.xz_to_index(0, z).unwrap().i;
            let right = grid.xz_to_index(w as i32 - 1, z).unwrap().i;
            let (a, b) = (left.min(right), left.max(right));
            let s = springs.iter().find(|s| s.a == a && s.b == b).unwrap();
            assert_eq!(s.weight, ADJACENT_WEIGHT);
        }
        // Corner diagonal across both seams.
        let corner = grid.xz_to_index(0, 0).unwrap().i;
        let far = grid.xz_to_index(w as i32 - 1, d as i32 - 1).unwrap().i;
        let s = springs.iter().find(|s| s.a == corner && s.b == far).unwrap();
        assert_eq!(s.weight, DIAGONAL_WEIGHT);
    }

    #[test]
    fn narrow_grid_does_not_duplicate_pairs() {
        let grid = IndexedGrid::new(2, 2).unwrap();
        let springs = build_springs(&grid, &SquareTiling::default()).unwrap();
        assert_eq!(
            pairs(&springs),
            vec![
                (0, 1, ADJACENT_WEIGHT),
                (0, 2, ADJACENT_WEIGHT),
                (0, 3, DIAGONAL_WEIGHT),
                (1, 2, DIAGONAL_WEIGHT),
                (1, 3, ADJACENT_WEIGHT),
                (2, 3, ADJACENT_WEIGHT),
            ]
        );
    }

    #[test]
    fn hex_grid_has_six_neighbors_each() {
        let grid = IndexedGrid::new(4, 4).unwrap();
        let springs = build_springs(&grid, &HexTiling::default()).unwrap();
        assert_eq!(springs.len(), 16 * 6 / 2);
        assert!(springs.iter().all(|s| s.weight == ADJACENT_WEIGHT));
    }

    #[test]
    fn topology_is_unchanged_by_panning() {
        let tiling = SquareTiling::default();
        let fresh = IndexedGrid::new(5, 4).unwrap();
        let mut panned = fresh.clone();
        panned.pan(3, -2).unwrap();
        panned.pan(-7, 5).unwrap();
        assert_eq!(
            pairs(&build_springs(&fresh, &tiling).unwrap()),
            pairs(&build_springs(&panned, &tiling).unwrap())
        );
    }

    #[test]
    fn hole_in_grid_is_fatal() {
        let mut grid = IndexedGrid::new(3, 3).unwrap();
        grid.forget(2, 1);
        assert!(matches!(
            build_springs(&grid, &SquareTiling::default()),
            Err(GridError::MissingNeighbor { .. })
        ));
    }

    #[test]
    fn hex_torus_with_odd_depth_is_refused() {
        let grid = IndexedGrid::new(4, 3).unwrap();
        assert!(matches!(
            build_springs(&grid, &HexTiling::default()),
            Err(GridError::WrapMismatch { period: (1, 2), .. })
        ));
        // Squares repeat every tile, so any size closes up.
        assert!(build_springs(&grid, &SquareTiling::default()).is_ok());
    }
}
