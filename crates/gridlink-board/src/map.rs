//! Map definitions and the built-in catalog.

use serde::{Deserialize, Serialize};

/// A playable map: grid dimensions, cell size in pixels, and the background
/// art the renderer tiles under the cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDefinition {
    pub id: String,
    pub name: String,
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Cell edge length in pixels. Drives pointer-to-cell mapping.
    pub cell_size: u32,
    /// Background image reference, opaque to the engine.
    pub background: String,
}

impl MapDefinition {
    pub fn new(id: &str, name: &str, width: u32, height: u32, cell_size: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            width,
            height,
            cell_size,
            background: format!("maps/{id}.png"),
        }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// The set of maps a session can be started on.
#[derive(Debug, Clone)]
pub struct MapCatalog {
    maps: Vec<MapDefinition>,
}

impl MapCatalog {
    /// The built-in maps.
    pub fn builtin() -> Self {
        Self {
            maps: vec![
                MapDefinition::new("default", "Greenfield", 5, 5, 100),
                MapDefinition::new("sea", "Stormwrack Coast", 8, 6, 80),
                MapDefinition::new("gridless", "Open Wilds", 10, 8, 60),
                MapDefinition::new("contrast-before", "Blighted Vale", 7, 7, 70),
                MapDefinition::new("contrast-after", "Restored Vale", 6, 5, 90),
            ],
        }
    }

    /// Looks a map up by id.
    pub fn get(&self, id: &str) -> Option<&MapDefinition> {
        self.maps.iter().find(|m| m.id == id)
    }

    /// The map a fresh session starts on.
    pub fn default_map(&self) -> &MapDefinition {
        &self.maps[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapDefinition> {
        self.maps.iter()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl Default for MapCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
