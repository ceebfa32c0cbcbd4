use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use snakedex_types::SnakeRecord;

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_overlay};
use crate::effects::UiEffect;
use crate::features::theme::Palette;
use crate::state::TuiState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Delete,
    Cancel,
}

/// Second step before a delete call.
#[derive(Debug)]
pub struct ConfirmDeleteState {
    pub snake: SnakeRecord,
    /// Defaults to cancel so a stray Enter deletes nothing.
    pub choice: ConfirmChoice,
}

impl ConfirmDeleteState {
    pub fn open(snake: SnakeRecord) -> Self {
        Self {
            snake,
            choice: ConfirmChoice::Cancel,
        }
    }

    fn confirm(&self) -> OverlayUpdate {
        OverlayUpdate::close().with_ui_effects(vec![UiEffect::DeleteSnake {
            binomial: self.snake.binomial.clone(),
        }])
    }

    pub fn handle_key(&mut self, _tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.choice = match self.choice {
                    ConfirmChoice::Delete => ConfirmChoice::Cancel,
                    ConfirmChoice::Cancel => ConfirmChoice::Delete,
                };
                OverlayUpdate::stay()
            }
            KeyCode::Enter => match self.choice {
                ConfirmChoice::Delete => self.confirm(),
                ConfirmChoice::Cancel => OverlayUpdate::close(),
            },
            KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => OverlayUpdate::close(),
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let hints = [
            InputHint::new("←→", "choose"),
            InputHint::new("y", "ลบ"),
            InputHint::new("Esc", "ยกเลิก"),
        ];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: "ยืนยันการลบ",
                border_color: palette.danger,
                width: 56,
                height: 10,
                hints: &hints,
            },
            palette,
        );

        let button = |label: &'static str, choice: ConfirmChoice, color: Color| {
            let style = if self.choice == choice {
                Style::default()
                    .fg(palette.surface)
                    .bg(color)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color)
            };
            Span::styled(format!("[ {label} ]"), style)
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "คุณแน่ใจหรือไม่ว่าต้องการลบข้อมูลงูนี้?",
                Style::default().fg(palette.text),
            )),
            Line::from(Span::styled(
                format!("{} ({})", self.snake.display_name(), self.snake.binomial),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                button("ลบ", ConfirmChoice::Delete, palette.danger),
                Span::raw("   "),
                button("ยกเลิก", ConfirmChoice::Cancel, palette.muted),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            layout.body,
        );
    }
}
