//! Transient notifications.

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use snakedex_core::config::NotificationConfig;
use unicode_width::UnicodeWidthStr;

use crate::common::truncate_with_ellipsis;
use crate::features::theme::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// Which configured lifetime a toast gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastDuration {
    /// Login acknowledgment, shown until the redirect
    LoginAck,
    /// Login failure and forgot-password results
    Auth,
    /// Save, delete and fetch results
    Catalog,
}

impl ToastDuration {
    pub fn resolve(self, config: &NotificationConfig) -> Duration {
        match self {
            ToastDuration::LoginAck => config.login_ack(),
            ToastDuration::Auth => config.auth_toast(),
            ToastDuration::Catalog => config.catalog_toast(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct ToastState {
    items: Vec<Toast>,
}

impl ToastState {
    pub fn push(&mut self, level: ToastLevel, message: String, ttl: Duration, now: Instant) {
        self.items.push(Toast {
            level,
            message,
            expires_at: now + ttl,
        });
    }

    /// Drops every toast whose expiry is at or before `now`.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|t| t.expires_at > now);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

const MAX_TOAST_WIDTH: u16 = 48;

/// Renders toasts stacked upward from the bottom-right corner.
pub fn render_toasts(frame: &mut Frame, state: &ToastState, area: Rect, palette: &Palette) {
    let mut bottom = area.y + area.height;
    for toast in state.items().iter().rev() {
        if bottom < area.y + 3 {
            break;
        }
        let (icon, color) = match toast.level {
            ToastLevel::Success => ("✔ ", palette.success),
            ToastLevel::Error => ("✖ ", palette.danger),
        };
        let max_text = MAX_TOAST_WIDTH.saturating_sub(6) as usize;
        let text = truncate_with_ellipsis(&toast.message, max_text);
        let width = (text.width() as u16 + 6)
            .min(MAX_TOAST_WIDTH)
            .min(area.width);
        let rect = Rect::new(
            area.x + area.width.saturating_sub(width + 1),
            bottom - 3,
            width,
            3,
        );
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(palette.surface));
        let line = Line::from(vec![
            Span::styled(icon, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(text, Style::default().fg(palette.text)),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), rect);
        bottom -= 3;
    }
}
