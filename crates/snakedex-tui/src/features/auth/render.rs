use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::state::{ForgotFocus, ForgotPage, LoginFocus, LoginPage, ResetFocus, ResetPage};
use crate::features::theme::Palette;
use crate::features::toast::ToastLevel;
use crate::overlays::render_utils::{
    INPUT_LINE_HEIGHT, InputHint, InputLine, centered_rect, render_button, render_hints,
    render_input_line, render_link,
};

const CARD_WIDTH: u16 = 52;
const BACK_TO_LOGIN: &str = "← กลับไปหน้า Login";

/// Draws the card frame and returns the area inside it.
fn render_card(frame: &mut Frame, area: Rect, title: &str, height: u16, palette: &Palette) -> Rect {
    let card = centered_rect(CARD_WIDTH, height, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.surface).fg(palette.text));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let [title_row, rest] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);
    frame.render_widget(
        Paragraph::new(Span::styled(
            title.to_string(),
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        title_row,
    );
    rest
}

fn busy_label<'a>(label: &'a str, submitting: bool) -> &'a str {
    if submitting { "กำลังดำเนินการ..." } else { label }
}

pub fn render_login(frame: &mut Frame, page: &LoginPage, area: Rect, palette: &Palette) {
    let body = render_card(frame, area, "Login", 15, palette);
    let [email, password, _, submit, link, _, hints] = Layout::vertical([
        Constraint::Length(INPUT_LINE_HEIGHT),
        Constraint::Length(INPUT_LINE_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(body);

    render_input_line(
        frame,
        email,
        &InputLine {
            label: "Username",
            value: &page.email,
            placeholder: Some("Enter your username"),
            focused: page.focus == LoginFocus::Email,
            masked: false,
        },
        palette,
    );
    render_input_line(
        frame,
        password,
        &InputLine {
            label: "Password",
            value: &page.password,
            placeholder: Some("Enter your password"),
            focused: page.focus == LoginFocus::Password,
            masked: true,
        },
        palette,
    );
    render_button(
        frame,
        submit,
        busy_label("Login", page.submitting),
        palette.focus,
        page.focus == LoginFocus::Submit,
        palette,
    );
    render_link(
        frame,
        link,
        "ลืมรหัสผ่าน?",
        page.focus == LoginFocus::ForgotLink,
        palette,
    );
    render_hints(
        frame,
        hints,
        &[InputHint::new("Tab", "next"), InputHint::new("Enter", "select")],
        palette.focus,
        palette,
    );
}

pub fn render_forgot(frame: &mut Frame, page: &ForgotPage, area: Rect, palette: &Palette) {
    let body = render_card(frame, area, "ลืมรหัสผ่าน", 12, palette);
    let [email, _, submit, link, _, hints] = Layout::vertical([
        Constraint::Length(INPUT_LINE_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(body);

    render_input_line(
        frame,
        email,
        &InputLine {
            label: "Email",
            value: &page.email,
            placeholder: Some("กรอกอีเมลของคุณ"),
            focused: page.focus == ForgotFocus::Email,
            masked: false,
        },
        palette,
    );
    render_button(
        frame,
        submit,
        busy_label("ส่งลิงก์รีเซ็ตรหัสผ่าน", page.submitting),
        palette.focus,
        page.focus == ForgotFocus::Submit,
        palette,
    );
    render_link(
        frame,
        link,
        BACK_TO_LOGIN,
        page.focus == ForgotFocus::BackLink,
        palette,
    );
    render_hints(
        frame,
        hints,
        &[InputHint::new("Enter", "send"), InputHint::new("Esc", "back")],
        palette.focus,
        palette,
    );
}

pub fn render_reset(frame: &mut Frame, page: &ResetPage, area: Rect, palette: &Palette) {
    let body = render_card(frame, area, "รีเซ็ตรหัสผ่าน", 16, palette);
    let [new_password, confirm, _, submit, message, link, _, hints] = Layout::vertical([
        Constraint::Length(INPUT_LINE_HEIGHT),
        Constraint::Length(INPUT_LINE_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(body);

    render_input_line(
        frame,
        new_password,
        &InputLine {
            label: "รหัสผ่านใหม่",
            value: &page.new_password,
            placeholder: Some("รหัสผ่านใหม่"),
            focused: page.focus == ResetFocus::NewPassword,
            masked: true,
        },
        palette,
    );
    render_input_line(
        frame,
        confirm,
        &InputLine {
            label: "ยืนยันรหัสผ่านใหม่",
            value: &page.confirm_password,
            placeholder: Some("ยืนยันรหัสผ่านใหม่"),
            focused: page.focus == ResetFocus::ConfirmPassword,
            masked: true,
        },
        palette,
    );
    render_button(
        frame,
        submit,
        busy_label("รีเซ็ตรหัสผ่าน", page.submitting),
        palette.focus,
        page.focus == ResetFocus::Submit,
        palette,
    );

    if let Some(msg) = &page.message {
        let color = match msg.level {
            ToastLevel::Success => palette.success,
            ToastLevel::Error => palette.danger,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(msg.text.clone(), Style::default().fg(color)))
                .alignment(Alignment::Center),
            message,
        );
    }

    render_link(
        frame,
        link,
        BACK_TO_LOGIN,
        page.focus == ResetFocus::BackLink,
        palette,
    );
    render_hints(
        frame,
        hints,
        &[InputHint::new("Enter", "submit"), InputHint::new("Esc", "back")],
        palette.focus,
        palette,
    );
}
