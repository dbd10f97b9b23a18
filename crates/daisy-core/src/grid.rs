//! Row-major square grid of patches with edge-clipped Moore neighborhoods.
//!
//! The planet has hard edges, no wraparound: corners see 3 neighbors,
//! edges 5, interior patches 8. Flat indices follow `x * side + y`, and
//! the neighbor offsets are listed in a fixed order so neighbor draws stay
//! reproducible.

use serde::{Deserialize, Serialize};

use crate::patch::Patch;

/// Moore neighborhood offsets in the order neighbors are visited.
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A finite `side x side` field of patches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    side: usize,
    patches: Vec<Patch>,
}

impl Grid {
    /// A grid of bare patches, all at the given starting temperature.
    pub fn new(side: usize, initial_temperature: f64) -> Self {
        Self {
            side,
            patches: vec![Patch::new(initial_temperature); side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of patches, `side²`.
    pub fn area(&self) -> usize {
        self.patches.len()
    }

    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        x * self.side + y
    }

    #[inline]
    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        (index / self.side, index % self.side)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &Patch {
        &self.patches[x * self.side + y]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut Patch {
        &mut self.patches[x * self.side + y]
    }

    pub fn patch(&self, index: usize) -> &Patch {
        &self.patches[index]
    }

    pub fn patch_mut(&mut self, index: usize) -> &mut Patch {
        &mut self.patches[index]
    }

    /// All patches in row-major order.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn patches_mut(&mut self) -> &mut [Patch] {
        &mut self.patches
    }

    /// Coordinates adjacent to `(x, y)`, clipped at the edges.
    pub fn neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let side = self.side as i64;
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                (nx >= 0 && nx < side && ny >= 0 && ny < side)
                    .then(|| (nx as usize, ny as usize))
            })
            .collect()
    }

    /// Flat indices of the patches adjacent to `index`.
    pub fn neighbor_indices(&self, index: usize) -> Vec<usize> {
        let (x, y) = self.coords_of(index);
        self.neighbors(x, y)
            .into_iter()
            .map(|(nx, ny)| nx * self.side + ny)
            .collect()
    }
}
