//! The interaction mode machine.

use gridlink_board::{BoardError, BoardStore, TokenId};

use crate::{GridGeometry, NullCapture, PointerCapture};

/// What the controller is currently doing. The three modes are mutually
/// exclusive; every transition happens inside one controller call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    /// Waiting for input: clicks select and move tokens.
    Idle,
    /// The next click on a valid cell places a new token.
    Placing,
    /// A pointer is holding a token.
    Dragging {
        token: TokenId,
        /// Where the token stood when the drag started.
        origin: (u32, u32),
        /// The last cell the drag validly passed through — where the token
        /// lands if the pointer is released off-grid.
        last_valid: (u32, u32),
    },
}

/// A board interaction the session layer should report to the DM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Add { token: TokenId, x: u32, y: u32 },
    Move {
        token: TokenId,
        from: (u32, u32),
        to: (u32, u32),
    },
    Select { token: TokenId },
    Remove { token: TokenId },
}

/// Translates clicks and pointer gestures into board mutations.
pub struct InteractionController {
    mode: InteractionMode,
    geometry: GridGeometry,
    capture: Box<dyn PointerCapture>,
}

impl InteractionController {
    pub fn new(geometry: GridGeometry) -> Self {
        Self::with_capture(geometry, Box::new(NullCapture))
    }

    /// Wires a real capture scope — the embedding UI's window-level pointer
    /// routing.
    pub fn with_capture(geometry: GridGeometry, capture: Box<dyn PointerCapture>) -> Self {
        Self {
            mode: InteractionMode::Idle,
            geometry,
            capture,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    /// Swaps geometry when the session changes maps. Any in-flight gesture
    /// is abandoned first.
    pub fn set_geometry(&mut self, store: &mut BoardStore, geometry: GridGeometry) {
        self.abort(store);
        self.geometry = geometry;
    }

    /// Enters or leaves placing mode. Entering deselects any selected token.
    /// Returns whether placing mode is now active.
    pub fn toggle_placing(&mut self, store: &mut BoardStore) -> bool {
        match self.mode {
            InteractionMode::Placing => {
                self.mode = InteractionMode::Idle;
                false
            }
            InteractionMode::Idle => {
                store.clear_selection();
                self.mode = InteractionMode::Placing;
                true
            }
            InteractionMode::Dragging { .. } => false,
        }
    }

    /// Handles a click on cell `(x, y)`.
    ///
    /// Validation errors (obstacle, occupied, cap) surface to the caller as
    /// warnings; the board and the current mode are left unchanged — a miss
    /// while placing keeps you in placing mode.
    pub fn click_cell(
        &mut self,
        store: &mut BoardStore,
        x: u32,
        y: u32,
    ) -> Result<Option<PendingAction>, BoardError> {
        match self.mode {
            // Clicks synthesized at the end of a drag are already handled
            // by pointer_up.
            InteractionMode::Dragging { .. } => Ok(None),

            InteractionMode::Placing => {
                let token = store.place_token(x, y)?;
                self.mode = InteractionMode::Idle;
                Ok(Some(PendingAction::Add {
                    token: token.id,
                    x,
                    y,
                }))
            }

            InteractionMode::Idle => {
                if let Some(token) = store.token_at(x, y) {
                    let id = token.id;
                    let selected = store.toggle_select(id);
                    return Ok(selected.then_some(PendingAction::Select { token: id }));
                }
                let Some(selected) = store.selected() else {
                    return Ok(None);
                };
                let from = store
                    .token(selected)
                    .map(|t| t.pos())
                    .ok_or(BoardError::UnknownToken(selected))?;
                store.move_token(selected, x, y)?;
                store.clear_selection();
                Ok(Some(PendingAction::Move {
                    token: selected,
                    from,
                    to: (x, y),
                }))
            }
        }
    }

    /// Handles a double-click: deletes the token under the pointer.
    pub fn double_click(
        &mut self,
        store: &mut BoardStore,
        x: u32,
        y: u32,
    ) -> Option<PendingAction> {
        if !matches!(self.mode, InteractionMode::Idle) {
            return None;
        }
        let id = store.token_at(x, y)?.id;
        store.remove_token(id);
        Some(PendingAction::Remove { token: id })
    }

    /// Pointer pressed at pixel position `(px, py)`. Starts a drag if a
    /// token sits under the pointer; acquires the capture scope so the
    /// gesture resolves even when the pointer leaves the grid.
    pub fn pointer_down(
        &mut self,
        store: &mut BoardStore,
        px: i32,
        py: i32,
    ) -> Option<TokenId> {
        if !matches!(self.mode, InteractionMode::Idle) {
            return None;
        }
        let (x, y) = self.geometry.cell_at(px, py)?;
        let token = store.token_at(x, y)?;
        let id = token.id;
        let origin = token.pos();

        let _ = store.set_dragging(id, true);
        let _ = store.select(id);
        self.capture.acquire();
        self.mode = InteractionMode::Dragging {
            token: id,
            origin,
            last_valid: origin,
        };
        tracing::debug!(token = %id, "drag started");
        Some(id)
    }

    /// Pointer moved mid-drag. The token follows only through valid cells;
    /// over obstacles, occupied cells, or off-grid space it simply stays at
    /// the last valid position.
    pub fn pointer_move(&mut self, store: &mut BoardStore, px: i32, py: i32) {
        let InteractionMode::Dragging {
            token, last_valid, ..
        } = self.mode
        else {
            return;
        };
        let Some((x, y)) = self.geometry.cell_at(px, py) else {
            return;
        };
        if (x, y) == last_valid {
            return;
        }
        if store.move_token(token, x, y).is_ok() {
            if let InteractionMode::Dragging { last_valid, .. } = &mut self.mode {
                *last_valid = (x, y);
            }
        }
    }

    /// Pointer released: commits the final valid position, clears the
    /// dragging flag, and releases the capture scope.
    pub fn pointer_up(&mut self, store: &mut BoardStore) -> Option<PendingAction> {
        let InteractionMode::Dragging {
            token,
            origin,
            last_valid,
        } = self.mode
        else {
            return None;
        };
        let _ = store.set_dragging(token, false);
        self.capture.release();
        self.mode = InteractionMode::Idle;
        tracing::debug!(token = %token, ?last_valid, "drag resolved");

        (last_valid != origin).then_some(PendingAction::Move {
            token,
            from: origin,
            to: last_valid,
        })
    }

    /// Abandons any in-flight gesture — called on teardown and map change.
    /// The token keeps its last valid position; no action is emitted.
    pub fn abort(&mut self, store: &mut BoardStore) {
        if let InteractionMode::Dragging { token, .. } = self.mode {
            let _ = store.set_dragging(token, false);
            self.capture.release();
            self.mode = InteractionMode::Idle;
            tracing::debug!(token = %token, "drag aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlink_board::{Grid, MapDefinition, Terrain};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI32, Ordering};

    fn open_board() -> BoardStore {
        let map = MapDefinition::new("test", "Test", 5, 5, 100);
        BoardStore::from_parts(map.clone(), Grid::uniform(5, 5, Terrain::Grass), 5)
    }

    fn board_with_obstacle(x: u32, y: u32) -> BoardStore {
        let map = MapDefinition::new("test", "Test", 5, 5, 100);
        let mut grid = Grid::uniform(5, 5, Terrain::Grass);
        grid.set_terrain(x, y, Terrain::Water);
        BoardStore::from_parts(map, grid, 5)
    }

    fn controller(store: &BoardStore) -> InteractionController {
        InteractionController::new(GridGeometry::for_map(store.map()))
    }

    /// Pixel center of a cell under the default geometry.
    fn center(x: u32, y: u32) -> (i32, i32) {
        ((10 + x * 104 + 50) as i32, (10 + y * 104 + 50) as i32)
    }

    #[test]
    fn test_placing_click_creates_token_and_returns_to_idle() {
        let mut store = open_board();
        let mut ctl = controller(&store);

        assert!(ctl.toggle_placing(&mut store));
        let action = ctl.click_cell(&mut store, 2, 2).unwrap();
        assert!(matches!(action, Some(PendingAction::Add { x: 2, y: 2, .. })));
        assert_eq!(ctl.mode(), InteractionMode::Idle);
        assert_eq!(store.tokens().len(), 1);
    }

    #[test]
    fn test_placing_click_on_obstacle_keeps_placing_mode() {
        let mut store = board_with_obstacle(1, 1);
        let mut ctl = controller(&store);

        ctl.toggle_placing(&mut store);
        let err = ctl.click_cell(&mut store, 1, 1).unwrap_err();
        assert_eq!(err, BoardError::CellIsObstacle { x: 1, y: 1 });
        assert_eq!(ctl.mode(), InteractionMode::Placing);
        assert!(store.tokens().is_empty());
    }

    #[test]
    fn test_placing_at_cap_is_rejected() {
        let mut store = open_board();
        let mut ctl = controller(&store);
        for x in 0..5 {
            store.place_token(x, 0).unwrap();
        }

        ctl.toggle_placing(&mut store);
        let err = ctl.click_cell(&mut store, 0, 1).unwrap_err();
        assert_eq!(err, BoardError::MaxTokensReached(5));
    }

    #[test]
    fn test_click_token_toggles_selection() {
        let mut store = open_board();
        let mut ctl = controller(&store);
        let id = store.place_token(1, 1).unwrap().id;

        let action = ctl.click_cell(&mut store, 1, 1).unwrap();
        assert_eq!(action, Some(PendingAction::Select { token: id }));
        assert_eq!(store.selected(), Some(id));

        let action = ctl.click_cell(&mut store, 1, 1).unwrap();
        assert_eq!(action, None);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_click_empty_cell_moves_selection_there() {
        let mut store = open_board();
        let mut ctl = controller(&store);
        let id = store.place_token(0, 0).unwrap().id;

        ctl.click_cell(&mut store, 0, 0).unwrap();
        let action = ctl.click_cell(&mut store, 3, 4).unwrap();
        assert_eq!(
            action,
            Some(PendingAction::Move {
                token: id,
                from: (0, 0),
                to: (3, 4)
            })
        );
        assert_eq!(store.token(id).unwrap().pos(), (3, 4));
        assert_eq!(store.selected(), None, "selection clears after a move");
    }

    #[test]
    fn test_selected_move_onto_obstacle_keeps_selection_and_position() {
        let mut store = board_with_obstacle(2, 2);
        let mut ctl = controller(&store);
        let id = store.place_token(0, 0).unwrap().id;

        ctl.click_cell(&mut store, 0, 0).unwrap();
        let err = ctl.click_cell(&mut store, 2, 2).unwrap_err();
        assert_eq!(err, BoardError::CellIsObstacle { x: 2, y: 2 });
        assert_eq!(store.token(id).unwrap().pos(), (0, 0));
        assert_eq!(store.selected(), Some(id));
    }

    #[test]
    fn test_click_empty_cell_without_selection_does_nothing() {
        let mut store = open_board();
        let mut ctl = controller(&store);
        let action = ctl.click_cell(&mut store, 2, 2).unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn test_entering_placing_clears_selection() {
        let mut store = open_board();
        let mut ctl = controller(&store);
        store.place_token(0, 0).unwrap();
        ctl.click_cell(&mut store, 0, 0).unwrap();
        assert!(store.selected().is_some());

        ctl.toggle_placing(&mut store);
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_double_click_removes_token() {
        let mut store = open_board();
        let mut ctl = controller(&store);
        let id = store.place_token(2, 2).unwrap().id;

        let action = ctl.double_click(&mut store, 2, 2);
        assert_eq!(action, Some(PendingAction::Remove { token: id }));
        assert!(store.tokens().is_empty());
        assert_eq!(ctl.double_click(&mut store, 2, 2), None);
    }

    #[test]
    fn test_drag_moves_through_valid_cells() {
        let mut store = open_board();
        let mut ctl = controller(&store);
        let id = store.place_token(0, 0).unwrap().id;

        let (px, py) = center(0, 0);
        assert_eq!(ctl.pointer_down(&mut store, px, py), Some(id));
        assert!(store.token(id).unwrap().dragging);

        let (px, py) = center(2, 1);
        ctl.pointer_move(&mut store, px, py);
        assert_eq!(store.token(id).unwrap().pos(), (2, 1));

        let action = ctl.pointer_up(&mut store);
        assert_eq!(
            action,
            Some(PendingAction::Move {
                token: id,
                from: (0, 0),
                to: (2, 1)
            })
        );
        assert!(!store.token(id).unwrap().dragging);
        assert_eq!(ctl.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_drag_skips_invalid_cells_and_commits_last_valid() {
        let mut store = board_with_obstacle(2, 0);
        let mut ctl = controller(&store);
        let id = store.place_token(0, 0).unwrap().id;

        let (px, py) = center(0, 0);
        ctl.pointer_down(&mut store, px, py);

        let (px, py) = center(1, 0);
        ctl.pointer_move(&mut store, px, py);
        let (px, py) = center(2, 0); // obstacle — token must not follow
        ctl.pointer_move(&mut store, px, py);
        assert_eq!(store.token(id).unwrap().pos(), (1, 0));

        // Release over the obstacle: token stays at the last valid cell.
        let action = ctl.pointer_up(&mut store);
        assert_eq!(
            action,
            Some(PendingAction::Move {
                token: id,
                from: (0, 0),
                to: (1, 0)
            })
        );
    }

    #[test]
    fn test_drag_released_off_grid_commits_last_valid() {
        let mut store = open_board();
        let mut ctl = controller(&store);
        let id = store.place_token(0, 0).unwrap().id;

        let (px, py) = center(0, 0);
        ctl.pointer_down(&mut store, px, py);
        let (px, py) = center(1, 1);
        ctl.pointer_move(&mut store, px, py);

        // Pointer leaves the grid entirely; moves there are ignored.
        ctl.pointer_move(&mut store, -300, -300);
        assert_eq!(store.token(id).unwrap().pos(), (1, 1));

        let action = ctl.pointer_up(&mut store);
        assert_eq!(
            action,
            Some(PendingAction::Move {
                token: id,
                from: (0, 0),
                to: (1, 1)
            })
        );
    }

    #[test]
    fn test_drag_without_movement_emits_nothing() {
        let mut store = open_board();
        let mut ctl = controller(&store);
        store.place_token(3, 3).unwrap();

        let (px, py) = center(3, 3);
        ctl.pointer_down(&mut store, px, py);
        assert_eq!(ctl.pointer_up(&mut store), None);
    }

    #[test]
    fn test_pointer_down_on_empty_cell_does_not_drag() {
        let mut store = open_board();
        let mut ctl = controller(&store);
        let (px, py) = center(2, 2);
        assert_eq!(ctl.pointer_down(&mut store, px, py), None);
        assert_eq!(ctl.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_capture_scope_acquired_and_released() {
        // +1 on acquire, -1 on release: the counter must return to zero and
        // never go negative.
        struct CountingCapture(Arc<AtomicI32>);
        impl PointerCapture for CountingCapture {
            fn acquire(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
            fn release(&mut self) {
                self.0.fetch_sub(1, Ordering::SeqCst);
            }
        }

        let depth = Arc::new(AtomicI32::new(0));
        let mut store = open_board();
        let id = store.place_token(0, 0).unwrap().id;
        let mut ctl = InteractionController::with_capture(
            GridGeometry::for_map(store.map()),
            Box::new(CountingCapture(Arc::clone(&depth))),
        );

        let (px, py) = center(0, 0);
        ctl.pointer_down(&mut store, px, py);
        assert_eq!(depth.load(Ordering::SeqCst), 1);
        ctl.pointer_up(&mut store);
        assert_eq!(depth.load(Ordering::SeqCst), 0);

        // Teardown mid-drag also releases.
        ctl.pointer_down(&mut store, px, py);
        assert_eq!(depth.load(Ordering::SeqCst), 1);
        ctl.abort(&mut store);
        assert_eq!(depth.load(Ordering::SeqCst), 0);
        assert!(!store.token(id).unwrap().dragging);
    }
}
