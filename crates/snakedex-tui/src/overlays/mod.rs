//! Overlay modules for the TUI.
//!
//! Overlays are modal UI components that temporarily take over keyboard input.
//! Each overlay is self-contained: it owns its state, key handler, and render function.
//!
//! ## Module Structure
//!
//! - `snake_form.rs`: Create/edit modal with dynamic list fields
//! - `confirm_delete.rs`: Delete confirmation dialog
//! - `render_utils.rs`: Shared rendering utilities for overlays and pages

pub mod confirm_delete;
pub mod render_utils;
pub mod snake_form;

pub use confirm_delete::{ConfirmChoice, ConfirmDeleteState};
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
pub use snake_form::{FormFocus, FormId, FormMode, SnakeFormState, TextField};
use snakedex_types::SnakeRecord;

use crate::effects::UiEffect;
use crate::features::theme::Palette;
use crate::mutations::StateMutation;
use crate::state::TuiState;

// ============================================================================
// OverlayRequest / OverlayTransition / OverlayUpdate
// ============================================================================

/// Requests to open a new overlay.
#[derive(Debug)]
pub enum OverlayRequest {
    /// `None` opens the form in create mode.
    SnakeForm(Option<SnakeRecord>),
    ConfirmDelete(SnakeRecord),
}

/// Transition returned by overlay key handlers.
#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub mutations: Vec<StateMutation>,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            mutations: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    #[must_use]
    pub fn with_ui_effects(mut self, effects: Vec<UiEffect>) -> Self {
        self.effects = effects;
        self
    }
}

// ============================================================================
// Overlay
// ============================================================================

#[derive(Debug)]
pub enum Overlay {
    SnakeForm(SnakeFormState),
    ConfirmDelete(ConfirmDeleteState),
}

impl Overlay {
    pub fn open(request: OverlayRequest) -> Self {
        match request {
            OverlayRequest::SnakeForm(initial) => Overlay::SnakeForm(SnakeFormState::open(initial)),
            OverlayRequest::ConfirmDelete(snake) => {
                Overlay::ConfirmDelete(ConfirmDeleteState::open(snake))
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        match self {
            Overlay::SnakeForm(f) => f.render(frame, area, palette),
            Overlay::ConfirmDelete(d) => d.render(frame, area, palette),
        }
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::SnakeForm(f) => f.handle_key(tui, key),
            Overlay::ConfirmDelete(d) => d.handle_key(tui, key),
        }
    }

    pub fn as_snake_form_mut(&mut self) -> Option<&mut SnakeFormState> {
        match self {
            Overlay::SnakeForm(f) => Some(f),
            Overlay::ConfirmDelete(_) => None,
        }
    }
}

// ============================================================================
// OverlayExt - Extension trait for Option<Overlay>
// ============================================================================

/// Extension trait for `Option<Overlay>` providing convenience render helpers.
pub trait OverlayExt {
    /// Renders the overlay if one is active.
    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette);
}

impl OverlayExt for Option<Overlay> {
    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        if let Some(overlay) = self {
            overlay.render(frame, area, palette);
        }
    }
}
