//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::features::theme::{Palette, toggle_label};
use crate::features::{auth, catalog, toast};
use crate::overlays::OverlayExt;
use crate::state::{AppState, Page, TuiState};

/// Height of the app bar above the page.
const HEADER_HEIGHT: u16 = 1;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;
    let palette = state.palette();

    // The root block carries the theme; everything else draws on top of it.
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        area,
    );

    let [header, body] =
        Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)]).areas(area);

    render_header(frame, state, header, &palette);

    match &state.page {
        Page::Login(page) => auth::render_login(frame, page, body, &palette),
        Page::ForgotPassword(page) => auth::render_forgot(frame, page, body, &palette),
        Page::ResetPassword(page) => auth::render_reset(frame, page, body, &palette),
        Page::Home => catalog::render_home(frame, &state.catalog, body, &palette),
    }

    app.overlay.render(frame, area, &palette);
    toast::render_toasts(frame, &state.toasts, body, &palette);
}

fn render_header(frame: &mut Frame, state: &TuiState, area: Rect, palette: &Palette) {
    let theme = format!("{} [F2]", toggle_label(state.theme));
    let [left, right] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(theme.chars().count() as u16 + 1),
    ])
    .areas(area);

    let title = Line::from(vec![
        Span::styled(
            " 🐍 Snakedex ",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(state.route.path(), Style::default().fg(palette.muted)),
    ]);
    frame.render_widget(Paragraph::new(title), left);
    frame.render_widget(
        Paragraph::new(Span::styled(theme, Style::default().fg(palette.muted))),
        right,
    );
}
