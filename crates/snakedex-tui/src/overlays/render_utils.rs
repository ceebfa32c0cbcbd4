use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::common::{mask, truncate_start_with_ellipsis};
use crate::features::theme::Palette;

/// Calculates a centered area for an overlay, clamped to the screen.
pub fn calculate_overlay_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));

    let overlay_x = area.x + (area.width.saturating_sub(width)) / 2;
    let overlay_y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(overlay_x, overlay_y, width, height)
}

/// Renders the base container for an overlay (clears background, draws border and title).
pub fn render_overlay_container(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    border_color: Color,
    palette: &Palette,
) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(palette.surface).fg(palette.text))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, area);
}

/// Input configuration for an overlay.
pub struct OverlayConfig<'a> {
    pub title: &'a str,
    pub border_color: Color,
    pub width: u16,
    pub height: u16,
    pub hints: &'a [InputHint<'a>],
}

/// Layout rectangles for an overlay.
pub struct OverlayLayout {
    pub popup: Rect,
    pub inner: Rect,
    pub body: Rect,
    pub footer: Rect,
}

/// Render a standard overlay container and return its layout.
pub fn render_overlay(
    frame: &mut Frame,
    area: Rect,
    config: &OverlayConfig<'_>,
    palette: &Palette,
) -> OverlayLayout {
    let popup = calculate_overlay_area(area, config.width, config.height);
    render_overlay_container(frame, popup, config.title, config.border_color, palette);

    let inner = Rect::new(
        popup.x + 1,
        popup.y + 1,
        popup.width.saturating_sub(2),
        popup.height.saturating_sub(2),
    );

    if !config.hints.is_empty() {
        render_hints(frame, inner, config.hints, config.border_color, palette);
    }

    let footer_height = u16::from(!config.hints.is_empty());
    let body_height = inner.height.saturating_sub(footer_height);
    let footer = Rect::new(inner.x, inner.y + body_height, inner.width, footer_height);
    let body = Rect::new(inner.x, inner.y, inner.width, body_height);

    OverlayLayout {
        popup,
        inner,
        body,
        footer,
    }
}

/// Helper struct for keyboard hints.
pub struct InputHint<'a> {
    pub key: &'a str,
    pub action: &'a str,
}

impl<'a> InputHint<'a> {
    pub fn new(key: &'a str, action: &'a str) -> Self {
        Self { key, action }
    }
}

/// A labeled single-line input box.
pub struct InputLine<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub placeholder: Option<&'a str>,
    pub focused: bool,
    /// Draw bullets instead of the value.
    pub masked: bool,
}

/// Rows taken by [`render_input_line`].
pub const INPUT_LINE_HEIGHT: u16 = 3;

/// Renders a bordered input box titled with its label: "│ text█ │".
pub fn render_input_line(frame: &mut Frame, area: Rect, input: &InputLine<'_>, palette: &Palette) {
    let border = if input.focused {
        palette.focus
    } else {
        palette.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" {} ", input.label),
            Style::default().fg(if input.focused {
                palette.focus
            } else {
                palette.muted
            }),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let is_placeholder = input.value.is_empty() && input.placeholder.is_some();
    let max_text_width = inner.width.saturating_sub(1) as usize;

    let shown = if input.masked {
        mask(input.value)
    } else {
        input.value.to_string()
    };
    let display_text = if is_placeholder {
        truncate_start_with_ellipsis(input.placeholder.unwrap_or(""), max_text_width)
    } else {
        truncate_start_with_ellipsis(&shown, max_text_width)
    };

    let mut spans = Vec::new();
    if is_placeholder {
        if input.focused {
            spans.push(Span::styled("█", Style::default().fg(palette.focus)));
        }
        spans.push(Span::styled(
            display_text,
            Style::default().fg(palette.muted),
        ));
    } else {
        spans.push(Span::styled(display_text, Style::default().fg(palette.text)));
        if input.focused {
            spans.push(Span::styled("█", Style::default().fg(palette.focus)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// Renders a one-row button, highlighted when focused.
pub fn render_button(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    color: Color,
    focused: bool,
    palette: &Palette,
) {
    let style = if focused {
        Style::default()
            .fg(palette.surface)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    };
    let text = format!("[ {label} ]");
    let width = (text.width() as u16).min(area.width);
    let x = area.x + area.width.saturating_sub(width) / 2;
    frame.render_widget(
        Paragraph::new(Span::styled(text, style)),
        Rect::new(x, area.y, width, area.height.min(1)),
    );
}

/// Renders a centered text link, underlined when focused.
pub fn render_link(frame: &mut Frame, area: Rect, label: &str, focused: bool, palette: &Palette) {
    let mut style = Style::default().fg(palette.focus);
    if focused {
        style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
    }
    frame.render_widget(
        Paragraph::new(Span::styled(label.to_string(), style)).alignment(Alignment::Center),
        area,
    );
}

/// Renders a line of keyboard hints at the bottom of the area.
pub fn render_hints(
    frame: &mut Frame,
    area: Rect,
    hints: &[InputHint],
    highlight_color: Color,
    palette: &Palette,
) {
    let hints_y = area.y + area.height.saturating_sub(1);
    let hints_area = Rect::new(area.x, hints_y, area.width, 1);

    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(palette.muted)));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(highlight_color)));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(palette.muted),
        ));
    }

    let line = Line::from(spans);
    let para = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(para, hints_area);
}

/// Returns a rectangle of fixed size centered within `r`, clamped to it.
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_area_is_centered_and_clamped() {
        let screen = Rect::new(0, 0, 100, 40);
        let area = calculate_overlay_area(screen, 60, 20);
        assert_eq!(area, Rect::new(20, 10, 60, 20));

        let tiny = Rect::new(0, 0, 30, 10);
        let area = calculate_overlay_area(tiny, 60, 20);
        assert_eq!(area.width, 26);
        assert_eq!(area.height, 8);
    }

    #[test]
    fn centered_rect_never_exceeds_parent() {
        let parent = Rect::new(5, 5, 10, 4);
        let rect = centered_rect(40, 20, parent);
        assert_eq!(rect, parent);
    }
}
