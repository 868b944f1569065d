//! Terrain grid generation and queries.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Terrain of a single cell.
///
/// Serializes lowercase (`"grass"`, `"water"`, ...) — the form the DM
/// service sees in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Grass,
    Water,
    Mountain,
    Forest,
}

/// Weighted draw table: mostly grass so the board stays playable.
const TERRAIN_WEIGHTS: [(Terrain, f64); 4] = [
    (Terrain::Grass, 0.70),
    (Terrain::Water, 0.10),
    (Terrain::Mountain, 0.10),
    (Terrain::Forest, 0.10),
];

impl Terrain {
    /// Water and mountains block placement and movement.
    pub fn is_obstacle(self) -> bool {
        matches!(self, Terrain::Water | Terrain::Mountain)
    }

    /// Draws a terrain from the weighted table.
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let draw: f64 = rng.random();
        let mut cumulative = 0.0;
        for (terrain, weight) in TERRAIN_WEIGHTS {
            cumulative += weight;
            if draw < cumulative {
                return terrain;
            }
        }
        Terrain::Grass
    }
}

/// Whether a cell has been revealed to the players or still sits under fog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Fog,
    Revealed,
}

/// One grid cell. The obstacle flag is derived from terrain at generation
/// time and never diverges from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub terrain: Terrain,
    pub obstacle: bool,
    pub visibility: Visibility,
}

/// A row-major matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Generates a fully revealed grid with weighted random terrain.
    pub fn generate<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> Self {
        Self::generate_with_visibility(width, height, Visibility::Revealed, rng)
    }

    /// Generates a grid whose cells all start in the given visibility.
    /// Fogged boards are revealed incrementally via [`Grid::reveal_around`].
    pub fn generate_with_visibility<R: Rng + ?Sized>(
        width: u32,
        height: u32,
        visibility: Visibility,
        rng: &mut R,
    ) -> Self {
        let cells = (0..width as usize * height as usize)
            .map(|_| {
                let terrain = Terrain::random_with(rng);
                Cell {
                    terrain,
                    obstacle: terrain.is_obstacle(),
                    visibility,
                }
            })
            .collect();
        Self { width, height, cells }
    }

    /// A grid of one terrain everywhere. Mostly useful in tests and demos
    /// where obstacle layout must be known in advance.
    pub fn uniform(width: u32, height: u32, terrain: Terrain) -> Self {
        let cell = Cell {
            terrain,
            obstacle: terrain.is_obstacle(),
            visibility: Visibility::Revealed,
        };
        Self {
            width,
            height,
            cells: vec![cell; (width * height) as usize],
        }
    }

    /// Overrides one cell's terrain, keeping the obstacle flag derived.
    pub fn set_terrain(&mut self, x: u32, y: u32, terrain: Terrain) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.terrain = terrain;
            cell.obstacle = terrain.is_obstacle();
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<&Cell> {
        self.in_bounds(x, y)
            .then(|| &self.cells[(y * self.width + x) as usize])
    }

    fn cell_mut(&mut self, x: u32, y: u32) -> Option<&mut Cell> {
        self.in_bounds(x, y)
            .then(|| &mut self.cells[(y * self.width + x) as usize])
    }

    /// Iterates cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &Cell)> {
        self.cells.iter().enumerate().map(|(i, cell)| {
            let x = i as u32 % self.width;
            let y = i as u32 / self.width;
            (x, y, cell)
        })
    }

    /// Coordinates of every obstacle cell, row by row.
    pub fn obstacles(&self) -> Vec<(u32, u32)> {
        self.iter()
            .filter(|(_, _, cell)| cell.obstacle)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// Reveals the square neighborhood of `(x, y)` within `range` cells.
    /// The center cell is always revealed; out-of-range coordinates are
    /// clipped at the grid edge.
    pub fn reveal_around(&mut self, x: u32, y: u32, range: u32) {
        let x_min = x.saturating_sub(range);
        let y_min = y.saturating_sub(range);
        let x_max = (x + range).min(self.width.saturating_sub(1));
        let y_max = (y + range).min(self.height.saturating_sub(1));
        for cy in y_min..=y_max {
            for cx in x_min..=x_max {
                if let Some(cell) = self.cell_mut(cx, cy) {
                    cell.visibility = Visibility::Revealed;
                }
            }
        }
    }
}
