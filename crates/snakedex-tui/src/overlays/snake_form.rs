//! Create/edit modal for a snake record.
//!
//! The form edits a working copy of the record. List fields are swapped for
//! new [`ListField`] values on every edit, so existing entries never move.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use snakedex_types::{DangerLevel, IdentificationStatus, ListField, ListKind, SnakeRecord};
use unicode_width::UnicodeWidthStr;

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_overlay};
use crate::common::{apply_text_key, truncate_start_with_ellipsis};
use crate::effects::UiEffect;
use crate::features::theme::Palette;
use crate::state::TuiState;

const SAVE_LABEL: &str = "บันทึก";
const CANCEL_LABEL: &str = "ยกเลิก";
const ADD_LABEL: &str = "➕ เพิ่ม";
const LABEL_WIDTH: usize = 22;

static FORM_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies one opened form, so a save result can find the form that sent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn new() -> Self {
        FormId(FORM_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

/// Create issues an insert; edit updates the record stored under the
/// binomial it had when the form opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { original_binomial: String },
}

/// Single-line text fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    ThaiName,
    Binomial,
    ImageUrl,
    Size,
    Pattern,
    Description,
    VenomEffects,
}

impl TextField {
    fn label(self) -> &'static str {
        match self {
            TextField::ThaiName => "ชื่อภาษาไทย",
            TextField::Binomial => "ชื่อสายพันธุ์ (binomial)",
            TextField::ImageUrl => "ลิงก์รูปภาพ",
            TextField::Size => "ขนาด",
            TextField::Pattern => "ลวดลาย",
            TextField::Description => "คำอธิบาย",
            TextField::VenomEffects => "ผลของพิษ",
        }
    }

    fn value(self, record: &SnakeRecord) -> &str {
        match self {
            TextField::ThaiName => &record.thai_name,
            TextField::Binomial => &record.binomial,
            TextField::ImageUrl => &record.image_url,
            TextField::Size => &record.size,
            TextField::Pattern => &record.pattern,
            TextField::Description => &record.description,
            TextField::VenomEffects => &record.venom_effects,
        }
    }

    fn value_mut(self, record: &mut SnakeRecord) -> &mut String {
        match self {
            TextField::ThaiName => &mut record.thai_name,
            TextField::Binomial => &mut record.binomial,
            TextField::ImageUrl => &mut record.image_url,
            TextField::Size => &mut record.size,
            TextField::Pattern => &mut record.pattern,
            TextField::Description => &mut record.description,
            TextField::VenomEffects => &mut record.venom_effects,
        }
    }
}

/// A focusable row of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Text(TextField),
    DangerLevel,
    Venomous,
    ListEntry(ListKind, usize),
    AddEntry(ListKind),
    Status,
    Cancel,
    Save,
}

#[derive(Debug)]
pub struct SnakeFormState {
    pub id: FormId,
    pub mode: FormMode,
    pub record: SnakeRecord,
    pub focus: FormFocus,
    /// Inline validation error.
    pub error: Option<String>,
    /// A save is in flight; further submits are ignored.
    pub submitting: bool,
    /// Last rendered popup rectangle, for outside-click dismissal.
    popup: Cell<Rect>,
}

impl SnakeFormState {
    /// Opens the form. `initial` selects edit mode and pre-populates the
    /// fields; its list fields were normalized when the record was decoded.
    pub fn open(initial: Option<SnakeRecord>) -> Self {
        let (mode, record) = match initial {
            Some(record) => (
                FormMode::Edit {
                    original_binomial: record.binomial.clone(),
                },
                record,
            ),
            None => (FormMode::Create, SnakeRecord::default()),
        };
        Self {
            id: FormId::new(),
            mode,
            record,
            focus: FormFocus::Text(TextField::ThaiName),
            error: None,
            submitting: false,
            popup: Cell::new(Rect::default()),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "🐍 เพิ่มข้อมูลงูใหม่",
            FormMode::Edit { .. } => "✏️ แก้ไขข้อมูลงู",
        }
    }

    /// True when the terminal cell lies inside the last rendered popup.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        let popup = self.popup.get();
        column >= popup.x
            && column < popup.x + popup.width
            && row >= popup.y
            && row < popup.y + popup.height
    }

    /// Every focusable row, top to bottom.
    fn focus_order(&self) -> Vec<FormFocus> {
        let mut order = vec![
            FormFocus::Text(TextField::ThaiName),
            FormFocus::Text(TextField::Binomial),
            FormFocus::DangerLevel,
            FormFocus::Text(TextField::ImageUrl),
            FormFocus::Text(TextField::Size),
            FormFocus::Text(TextField::Pattern),
            FormFocus::Text(TextField::Description),
            FormFocus::Text(TextField::VenomEffects),
            FormFocus::Venomous,
        ];
        for kind in ListKind::ALL {
            let len = self.record.list(kind).len();
            order.extend((0..len).map(|i| FormFocus::ListEntry(kind, i)));
            order.push(FormFocus::AddEntry(kind));
        }
        order.extend([FormFocus::Status, FormFocus::Cancel, FormFocus::Save]);
        order
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let index = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (index + 1) % order.len()
        } else {
            (index + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn add_entry(&mut self, kind: ListKind) {
        let list = self.record.list(kind).push_empty();
        let last = list.len() - 1;
        self.record.set_list(kind, list);
        self.focus = FormFocus::ListEntry(kind, last);
    }

    fn remove_entry(&mut self, kind: ListKind, index: usize) {
        let list = self.record.list(kind).remove(index);
        self.focus = if list.is_empty() {
            FormFocus::AddEntry(kind)
        } else {
            FormFocus::ListEntry(kind, index.min(list.len() - 1))
        };
        self.record.set_list(kind, list);
    }

    fn edit_entry(&mut self, kind: ListKind, index: usize, key: KeyEvent) {
        let list: &ListField = self.record.list(kind);
        let Some(current) = list.get(index) else {
            return;
        };
        let mut value = current.to_string();
        if apply_text_key(&mut value, key) {
            let updated = list.replace(index, value);
            self.record.set_list(kind, updated);
        }
    }

    /// Emits the save effect, or sets the inline error when required fields
    /// are blank.
    fn submit(&mut self) -> OverlayUpdate {
        if self.submitting {
            return OverlayUpdate::stay();
        }
        let missing = self.record.missing_required();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.label()).collect();
            self.error = Some(format!("กรุณากรอก {}", names.join(", ")));
            return OverlayUpdate::stay();
        }
        self.error = None;
        self.submitting = true;
        let original_binomial = match &self.mode {
            FormMode::Create => None,
            FormMode::Edit { original_binomial } => Some(original_binomial.clone()),
        };
        OverlayUpdate::stay().with_ui_effects(vec![UiEffect::SaveSnake {
            form: self.id,
            original_binomial,
            record: self.record.clone(),
        }])
    }

    pub fn handle_key(&mut self, _tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return OverlayUpdate::close(),
            KeyCode::Char('s') if ctrl => return self.submit(),
            KeyCode::Char('n') if ctrl => {
                if let FormFocus::ListEntry(kind, _) | FormFocus::AddEntry(kind) = self.focus {
                    self.add_entry(kind);
                }
                return OverlayUpdate::stay();
            }
            KeyCode::Char('d') if ctrl => {
                if let FormFocus::ListEntry(kind, index) = self.focus {
                    self.remove_entry(kind, index);
                }
                return OverlayUpdate::stay();
            }
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(true);
                return OverlayUpdate::stay();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(false);
                return OverlayUpdate::stay();
            }
            _ => {}
        }

        match self.focus {
            FormFocus::Save if key.code == KeyCode::Enter => self.submit(),
            FormFocus::Cancel if key.code == KeyCode::Enter => OverlayUpdate::close(),
            FormFocus::AddEntry(kind) if key.code == KeyCode::Enter => {
                self.add_entry(kind);
                OverlayUpdate::stay()
            }
            FormFocus::Venomous if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) => {
                self.record.is_venomous = !self.record.is_venomous;
                OverlayUpdate::stay()
            }
            FormFocus::DangerLevel if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) => {
                self.record.danger_level = DangerLevel::cycle(self.record.danger_level.as_ref());
                OverlayUpdate::stay()
            }
            FormFocus::Status if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) => {
                self.record.status = IdentificationStatus::cycle(self.record.status.as_ref());
                OverlayUpdate::stay()
            }
            FormFocus::Text(_) | FormFocus::ListEntry(..) if key.code == KeyCode::Enter => {
                self.move_focus(true);
                OverlayUpdate::stay()
            }
            FormFocus::Text(field) => {
                if apply_text_key(field.value_mut(&mut self.record), key) {
                    self.error = None;
                }
                OverlayUpdate::stay()
            }
            FormFocus::ListEntry(kind, index) => {
                self.edit_entry(kind, index, key);
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    /// One display row per line of the form, tagged with the focus it shows.
    fn rows(&self, palette: &Palette, width: usize) -> Vec<(Option<FormFocus>, Line<'static>)> {
        let mut rows = Vec::new();
        let text = |field: TextField| {
            let focus = FormFocus::Text(field);
            let value = field.value(&self.record);
            (
                Some(focus),
                self.value_row(field.label(), value, self.focus == focus, palette, width),
            )
        };

        rows.push(text(TextField::ThaiName));
        rows.push(text(TextField::Binomial));
        let danger = self
            .record
            .danger_level
            .as_ref()
            .map_or("-- เลือกระดับความอันตราย --", |d| d.label());
        rows.push((
            Some(FormFocus::DangerLevel),
            self.choice_row(
                "ระดับความอันตราย",
                danger,
                self.focus == FormFocus::DangerLevel,
                palette,
            ),
        ));
        for field in [
            TextField::ImageUrl,
            TextField::Size,
            TextField::Pattern,
            TextField::Description,
            TextField::VenomEffects,
        ] {
            rows.push(text(field));
        }
        let venom = if self.record.is_venomous {
            "[x] ✅ มีพิษ"
        } else {
            "[ ] ❌ ไม่มีพิษ"
        };
        rows.push((
            Some(FormFocus::Venomous),
            self.choice_row("", venom, self.focus == FormFocus::Venomous, palette),
        ));

        for kind in ListKind::ALL {
            rows.push((
                None,
                Line::from(Span::styled(
                    format!("{}:", kind.label()),
                    Style::default()
                        .fg(palette.muted)
                        .add_modifier(Modifier::BOLD),
                )),
            ));
            for (index, entry) in self.record.list(kind).entries().iter().enumerate() {
                let focus = FormFocus::ListEntry(kind, index);
                rows.push((
                    Some(focus),
                    self.value_row("  •", entry, self.focus == focus, palette, width),
                ));
            }
            let focus = FormFocus::AddEntry(kind);
            rows.push((
                Some(focus),
                Line::from(Span::styled(
                    format!("  {ADD_LABEL}"),
                    button_style(self.focus == focus, palette.accent, palette),
                )),
            ));
        }

        let status = self
            .record
            .status
            .as_ref()
            .map_or("-- เลือกสถานะ --", |s| s.label());
        rows.push((
            Some(FormFocus::Status),
            self.choice_row("พร้อมจำแนก", status, self.focus == FormFocus::Status, palette),
        ));
        rows.push((None, Line::from("")));

        let save_label = if self.submitting {
            "กำลังบันทึก..."
        } else {
            SAVE_LABEL
        };
        let buttons = Line::from(vec![
            Span::styled(
                format!("[ {CANCEL_LABEL} ]"),
                button_style(self.focus == FormFocus::Cancel, palette.muted, palette),
            ),
            Span::raw("  "),
            Span::styled(
                format!("[ {save_label} ]"),
                button_style(self.focus == FormFocus::Save, palette.focus, palette),
            ),
        ]);
        // Both buttons share one line; tag it with whichever is focused.
        let tag = if self.focus == FormFocus::Cancel {
            FormFocus::Cancel
        } else {
            FormFocus::Save
        };
        rows.push((Some(tag), buttons));
        rows
    }

    fn value_row(
        &self,
        label: &str,
        value: &str,
        focused: bool,
        palette: &Palette,
        width: usize,
    ) -> Line<'static> {
        let label = pad_label(label);
        let room = width.saturating_sub(label.width() + 1);
        let mut spans = vec![Span::styled(label, label_style(focused, palette))];
        spans.push(Span::styled(
            truncate_start_with_ellipsis(value, room),
            Style::default().fg(palette.text),
        ));
        if focused {
            spans.push(Span::styled("█", Style::default().fg(palette.focus)));
        }
        Line::from(spans)
    }

    fn choice_row(&self, label: &str, value: &str, focused: bool, palette: &Palette) -> Line<'static> {
        Line::from(vec![
            Span::styled(pad_label(label), label_style(focused, palette)),
            Span::styled(
                format!("‹ {value} ›"),
                if focused {
                    Style::default()
                        .fg(palette.focus)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(palette.text)
                },
            ),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let hints = [
            InputHint::new("Tab", "next"),
            InputHint::new("Space", "toggle"),
            InputHint::new("^N", "add"),
            InputHint::new("^D", "remove"),
            InputHint::new("^S", "save"),
            InputHint::new("Esc", "close"),
        ];
        let config = OverlayConfig {
            title: self.title(),
            border_color: palette.accent,
            width: 76,
            height: area.height.saturating_sub(2),
            hints: &hints,
        };
        let layout = render_overlay(frame, area, &config, palette);
        self.popup.set(layout.popup);

        let mut body = layout.body;
        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    error.clone(),
                    Style::default()
                        .fg(palette.danger)
                        .add_modifier(Modifier::BOLD),
                )),
                Rect::new(body.x, body.y, body.width, body.height.min(1)),
            );
            body.y += 1;
            body.height = body.height.saturating_sub(1);
        }

        let rows = self.rows(palette, body.width as usize);
        let focused_row = rows
            .iter()
            .position(|(focus, _)| *focus == Some(self.focus))
            .unwrap_or(0);
        let visible = body.height as usize;
        let offset = if visible == 0 {
            0
        } else {
            (focused_row + 1).saturating_sub(visible)
        };
        let lines: Vec<Line> = rows
            .into_iter()
            .skip(offset)
            .take(visible)
            .map(|(_, line)| line)
            .collect();
        frame.render_widget(Paragraph::new(lines), body);
    }
}

fn pad_label(label: &str) -> String {
    if label.is_empty() {
        return " ".repeat(LABEL_WIDTH);
    }
    let text = format!("{label}: ");
    let pad = LABEL_WIDTH.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(pad))
}

fn label_style(focused: bool, palette: &Palette) -> Style {
    if focused {
        Style::default()
            .fg(palette.focus)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.muted)
    }
}

fn button_style(focused: bool, color: Color, palette: &Palette) -> Style {
    if focused {
        Style::default()
            .fg(palette.surface)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
