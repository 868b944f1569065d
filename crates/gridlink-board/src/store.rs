//! The board store: one shared mutable board per session.
//!
//! Both the interaction controller (local input) and the protocol reconciler
//! (server directives) mutate the board through this type. Validated
//! mutations re-check bounds, obstacles, occupancy, and the token cap against
//! current state at the moment they apply; the `force_*` methods are the
//! trusted path for server directives and skip obstacle/occupancy checks.

use rand::Rng;

use crate::{AVATAR_COLORS, BoardError, Grid, MapDefinition, Terrain, Token, TokenId};

/// Grid, tokens, and selection for one session.
#[derive(Debug, Clone)]
pub struct BoardStore {
    map: MapDefinition,
    grid: Grid,
    tokens: Vec<Token>,
    next_token: u32,
    selected: Option<TokenId>,
    cap: usize,
}

impl BoardStore {
    /// Builds a fresh board for the given map: generated terrain, no tokens.
    pub fn new<R: Rng + ?Sized>(map: MapDefinition, cap: usize, rng: &mut R) -> Self {
        let grid = Grid::generate(map.width, map.height, rng);
        Self::from_parts(map, grid, cap)
    }

    /// Builds a board around an existing grid. Used by tests (and fogged
    /// sessions) that need a known terrain layout.
    pub fn from_parts(map: MapDefinition, grid: Grid, cap: usize) -> Self {
        Self {
            map,
            grid,
            tokens: Vec::new(),
            next_token: 1,
            selected: None,
            cap,
        }
    }

    pub fn map(&self) -> &MapDefinition {
        &self.map
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn token_at(&self, x: u32, y: u32) -> Option<&Token> {
        self.tokens.iter().find(|t| t.x == x && t.y == y)
    }

    pub fn terrain_at(&self, x: u32, y: u32) -> Option<Terrain> {
        self.grid.cell(x, y).map(|c| c.terrain)
    }

    // -- validated mutations ------------------------------------------------

    /// Places a new token, auto-labeled `P<n>` with the next palette color.
    pub fn place_token(&mut self, x: u32, y: u32) -> Result<Token, BoardError> {
        let label = format!("P{}", self.next_token);
        self.place_token_with_label(x, y, label)
    }

    /// Places a new token with an explicit label.
    pub fn place_token_with_label(
        &mut self,
        x: u32,
        y: u32,
        label: impl Into<String>,
    ) -> Result<Token, BoardError> {
        if !self.grid.in_bounds(x, y) {
            return Err(BoardError::OutOfBounds { x, y });
        }
        if self.tokens.len() >= self.cap {
            return Err(BoardError::MaxTokensReached(self.cap));
        }
        self.check_cell_free(x, y, None)?;
        Ok(self.insert_token(x, y, label.into()))
    }

    /// Moves a token to a new cell. On failure the token's position is
    /// unchanged.
    pub fn move_token(&mut self, id: TokenId, x: u32, y: u32) -> Result<(), BoardError> {
        if self.token(id).is_none() {
            return Err(BoardError::UnknownToken(id));
        }
        if !self.grid.in_bounds(x, y) {
            return Err(BoardError::OutOfBounds { x, y });
        }
        self.check_cell_free(x, y, Some(id))?;

        let token = self
            .tokens
            .iter_mut()
            .find(|t| t.id == id)
            .expect("existence checked above");
        token.x = x;
        token.y = y;
        Ok(())
    }

    /// Removes a token. No-op if the id is absent. Selection pointing at the
    /// removed token is cleared, keeping the selection invariant.
    pub fn remove_token(&mut self, id: TokenId) -> Option<Token> {
        let idx = self.tokens.iter().position(|t| t.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.tokens.remove(idx))
    }

    // -- trusted mutations (server directives) ------------------------------

    /// Applies a server-directed move. Coordinates are clamped into bounds;
    /// obstacle and occupancy rules are NOT re-checked — the DM is
    /// authoritative over the board it narrates.
    pub fn force_move_token(&mut self, id: TokenId, x: u32, y: u32) -> Result<(), BoardError> {
        let (x, y) = self.clamp(x, y);
        let token = self
            .tokens
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(BoardError::UnknownToken(id))?;
        token.x = x;
        token.y = y;
        Ok(())
    }

    /// Applies a server-directed add. Skips obstacle/occupancy checks but
    /// still honors the token cap — the cap bounds session memory, not
    /// narrative legality.
    pub fn force_place_token(
        &mut self,
        x: u32,
        y: u32,
        label: impl Into<String>,
    ) -> Result<Token, BoardError> {
        if self.tokens.len() >= self.cap {
            return Err(BoardError::MaxTokensReached(self.cap));
        }
        let (x, y) = self.clamp(x, y);
        Ok(self.insert_token(x, y, label.into()))
    }

    // -- selection -----------------------------------------------------------

    pub fn selected(&self) -> Option<TokenId> {
        self.selected
    }

    /// Selects the token unconditionally.
    pub fn select(&mut self, id: TokenId) -> Result<(), BoardError> {
        if self.token(id).is_none() {
            return Err(BoardError::UnknownToken(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    /// Selects the token, or deselects it if it was already selected.
    /// Returns whether the token ends up selected. Unknown ids are ignored.
    pub fn toggle_select(&mut self, id: TokenId) -> bool {
        if self.token(id).is_none() {
            return false;
        }
        if self.selected == Some(id) {
            self.selected = None;
            false
        } else {
            self.selected = Some(id);
            true
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // -- dragging ------------------------------------------------------------

    /// Sets a token's dragging flag. Raising it lowers every other token's
    /// flag first, so at most one token is ever mid-drag.
    pub fn set_dragging(&mut self, id: TokenId, dragging: bool) -> Result<(), BoardError> {
        if self.token(id).is_none() {
            return Err(BoardError::UnknownToken(id));
        }
        for token in &mut self.tokens {
            token.dragging = dragging && token.id == id;
        }
        Ok(())
    }

    pub fn dragging_token(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| t.dragging)
    }

    // -- misc ----------------------------------------------------------------

    /// Picks a uniformly random free, non-obstacle cell, if one exists.
    pub fn random_free_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(u32, u32)> {
        let free: Vec<(u32, u32)> = self
            .grid
            .iter()
            .filter(|(x, y, cell)| !cell.obstacle && self.token_at(*x, *y).is_none())
            .map(|(x, y, _)| (x, y))
            .collect();
        if free.is_empty() {
            None
        } else {
            Some(free[rng.random_range(0..free.len())])
        }
    }

    /// Reveals fog in a square radius, e.g. around a token that just moved.
    pub fn reveal_around(&mut self, x: u32, y: u32, range: u32) {
        self.grid.reveal_around(x, y, range);
    }

    fn check_cell_free(
        &self,
        x: u32,
        y: u32,
        ignore: Option<TokenId>,
    ) -> Result<(), BoardError> {
        let cell = self
            .grid
            .cell(x, y)
            .ok_or(BoardError::OutOfBounds { x, y })?;
        if cell.obstacle {
            return Err(BoardError::CellIsObstacle { x, y });
        }
        if self
            .tokens
            .iter()
            .any(|t| t.x == x && t.y == y && Some(t.id) != ignore)
        {
            return Err(BoardError::CellOccupied { x, y });
        }
        Ok(())
    }

    fn insert_token(&mut self, x: u32, y: u32, label: String) -> Token {
        let id = TokenId(self.next_token);
        let avatar = AVATAR_COLORS[self.next_token as usize % AVATAR_COLORS.len()];
        self.next_token += 1;
        let token = Token {
            id,
            x,
            y,
            avatar: avatar.to_string(),
            label,
            dragging: false,
        };
        tracing::debug!(token = %id, x, y, "token placed");
        self.tokens.push(token.clone());
        token
    }

    fn clamp(&self, x: u32, y: u32) -> (u32, u32) {
        (
            x.min(self.grid.width().saturating_sub(1)),
            y.min(self.grid.height().saturating_sub(1)),
        )
    }
}
