use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use snakedex_types::SnakeRecord;

use super::state::CatalogState;
use crate::common::truncate_with_ellipsis;
use crate::features::theme::Palette;
use crate::overlays::render_utils::{InputHint, render_hints};

const CARD_HEIGHT: u16 = 6;

pub fn render_home(frame: &mut Frame, state: &CatalogState, area: Rect, palette: &Palette) {
    let [header, list, hints] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let title = Line::from(vec![
        Span::styled(
            "🐍 ข้อมูลงูทั้งหมด",
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ({})", state.snakes.len()),
            Style::default().fg(palette.muted),
        ),
    ]);
    let subtitle = Line::from(Span::styled(
        "คุณเข้าสู่ระบบเรียบร้อยแล้ว ✅",
        Style::default().fg(palette.muted),
    ));
    frame.render_widget(
        Paragraph::new(vec![Line::from(""), title, subtitle]).alignment(Alignment::Center),
        header,
    );

    if state.snakes.is_empty() {
        let text = if state.loading || !state.loaded {
            "⏳ กำลังโหลดข้อมูล..."
        } else {
            "ไม่พบข้อมูลงูในระบบ"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(palette.muted)))
                .alignment(Alignment::Center),
            Rect::new(list.x, list.y + list.height / 2, list.width, list.height.min(1)),
        );
    } else {
        render_cards(frame, state, list, palette);
    }

    render_hints(
        frame,
        hints,
        &[
            InputHint::new("↑↓", "select"),
            InputHint::new("e", "แก้ไข"),
            InputHint::new("d", "ลบ"),
            InputHint::new("n", "➕ เพิ่มข้อมูลงู"),
            InputHint::new("r", "refresh"),
            InputHint::new("o", "image"),
            InputHint::new("l", "ออกจากระบบ"),
            InputHint::new("q", "quit"),
        ],
        palette.focus,
        palette,
    );
}

/// Number of the first card shown so that `selected` stays on screen.
fn scroll_offset(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        return selected;
    }
    (selected + 1).saturating_sub(visible)
}

fn render_cards(frame: &mut Frame, state: &CatalogState, area: Rect, palette: &Palette) {
    let visible = (area.height / CARD_HEIGHT) as usize;
    let offset = scroll_offset(state.selected, visible.max(1));

    let mut y = area.y;
    for (index, snake) in state.snakes.iter().enumerate().skip(offset) {
        if y + CARD_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect::new(area.x + 1, y, area.width.saturating_sub(2), CARD_HEIGHT);
        render_card(frame, snake, index == state.selected, rect, palette);
        y += CARD_HEIGHT;
    }
}

fn render_card(frame: &mut Frame, snake: &SnakeRecord, selected: bool, area: Rect, palette: &Palette) {
    let border = if selected { palette.focus } else { palette.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(palette.surface))
        .title(Span::styled(
            format!(" {} ", snake.display_name()),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let binomial = or_dash(&snake.binomial);
    let habitat = snake.habitat.display();
    let venom = if snake.is_venomous {
        "✅ ใช่"
    } else {
        "❌ ไม่ใช่"
    };
    let rows = [
        format!("🧬 ชื่อสายพันธุ์: {binomial}"),
        format!("🌍 ถิ่นที่อยู่: {}", or_dash(&habitat)),
        format!("☠️ อันตราย: {venom}"),
    ];
    let mut lines: Vec<Line> = rows
        .iter()
        .map(|row| {
            Line::from(Span::styled(
                truncate_with_ellipsis(row, width),
                Style::default().fg(palette.text),
            ))
        })
        .collect();
    if selected {
        lines.push(Line::from(Span::styled(
            "[e] แก้ไข  [d] ลบ",
            Style::default().fg(palette.muted),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}
