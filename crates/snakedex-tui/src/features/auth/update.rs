//! Auth page reducers.
//!
//! Key handlers return effects plus cross-slice mutations; they never touch
//! other slices directly.

use crossterm::event::{KeyCode, KeyEvent};
use snakedex_core::routes::Route;

use super::state::{
    ForgotFocus, ForgotPage, InlineMessage, LoginFocus, LoginPage, ResetFocus, ResetPage,
};
use crate::common::apply_text_key;
use crate::effects::UiEffect;
use crate::events::AuthUiEvent;
use crate::features::toast::{ToastDuration, ToastLevel};
use crate::mutations::{NavDelay, StateMutation};
use crate::state::Page;

pub mod messages {
    pub const LOGIN_OK: &str = "เข้าสู่ระบบสำเร็จ";
    pub const LOGIN_FAILED: &str = "ชื่อผู้ใช้หรือรหัสผ่านไม่ถูกต้อง";
    pub const RESET_EMAIL_SENT: &str = "ส่งอีเมลรีเซ็ตรหัสผ่านเรียบร้อยแล้ว";
    pub const RESET_EMAIL_UNKNOWN: &str = "ไม่พบอีเมลนี้ในระบบ";
    pub const PASSWORD_MISMATCH: &str = "รหัสผ่านไม่ตรงกัน";
    pub const PASSWORD_RESET_OK: &str = "รีเซ็ตรหัสผ่านสำเร็จ! กำลังกลับไปหน้า Login...";
    pub const RESET_LINK_INVALID: &str = "ลิงก์ไม่ถูกต้องหรือหมดอายุ";
}

type Outcome = (Vec<UiEffect>, Vec<StateMutation>);

pub fn handle_login_key(page: &mut LoginPage, key: KeyEvent) -> Outcome {
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            page.focus = page.focus.next();
            (vec![], vec![])
        }
        KeyCode::BackTab | KeyCode::Up => {
            page.focus = page.focus.prev();
            (vec![], vec![])
        }
        KeyCode::Enter => match page.focus {
            LoginFocus::Email => {
                page.focus = LoginFocus::Password;
                (vec![], vec![])
            }
            LoginFocus::Password | LoginFocus::Submit => submit_login(page),
            LoginFocus::ForgotLink => (vec![], vec![StateMutation::Navigate(Route::ForgotPassword)]),
        },
        _ => {
            match page.focus {
                LoginFocus::Email => {
                    apply_text_key(&mut page.email, key);
                }
                LoginFocus::Password => {
                    apply_text_key(&mut page.password, key);
                }
                LoginFocus::Submit | LoginFocus::ForgotLink => {}
            }
            (vec![], vec![])
        }
    }
}

fn submit_login(page: &mut LoginPage) -> Outcome {
    page.submitting = true;
    (
        vec![UiEffect::Login {
            email: page.email.trim().to_string(),
            password: page.password.clone(),
        }],
        vec![],
    )
}

pub fn handle_forgot_key(page: &mut ForgotPage, key: KeyEvent) -> Outcome {
    match key.code {
        KeyCode::Esc => (vec![], vec![StateMutation::Navigate(Route::Login)]),
        KeyCode::Tab | KeyCode::Down => {
            page.focus = page.focus.next();
            (vec![], vec![])
        }
        KeyCode::BackTab | KeyCode::Up => {
            page.focus = page.focus.prev();
            (vec![], vec![])
        }
        KeyCode::Enter => match page.focus {
            ForgotFocus::Email | ForgotFocus::Submit => {
                page.submitting = true;
                (
                    vec![UiEffect::RequestPasswordReset {
                        email: page.email.trim().to_string(),
                    }],
                    vec![],
                )
            }
            ForgotFocus::BackLink => (vec![], vec![StateMutation::Navigate(Route::Login)]),
        },
        _ => {
            if page.focus == ForgotFocus::Email {
                apply_text_key(&mut page.email, key);
            }
            (vec![], vec![])
        }
    }
}

pub fn handle_reset_key(page: &mut ResetPage, key: KeyEvent) -> Outcome {
    match key.code {
        KeyCode::Esc => (vec![], vec![StateMutation::Navigate(Route::Login)]),
        KeyCode::Tab | KeyCode::Down => {
            page.focus = page.focus.next();
            (vec![], vec![])
        }
        KeyCode::BackTab | KeyCode::Up => {
            page.focus = page.focus.prev();
            (vec![], vec![])
        }
        KeyCode::Enter => match page.focus {
            ResetFocus::NewPassword => {
                page.focus = ResetFocus::ConfirmPassword;
                (vec![], vec![])
            }
            ResetFocus::ConfirmPassword | ResetFocus::Submit => submit_reset(page),
            ResetFocus::BackLink => (vec![], vec![StateMutation::Navigate(Route::Login)]),
        },
        _ => {
            match page.focus {
                ResetFocus::NewPassword => {
                    apply_text_key(&mut page.new_password, key);
                }
                ResetFocus::ConfirmPassword => {
                    apply_text_key(&mut page.confirm_password, key);
                }
                ResetFocus::Submit | ResetFocus::BackLink => {}
            }
            (vec![], vec![])
        }
    }
}

/// Mismatched passwords and a missing token are rejected without a request.
fn submit_reset(page: &mut ResetPage) -> Outcome {
    if page.new_password != page.confirm_password {
        page.message = Some(error_message(messages::PASSWORD_MISMATCH));
        return (vec![], vec![]);
    }
    let Some(token) = page.token.clone() else {
        page.message = Some(error_message(messages::RESET_LINK_INVALID));
        return (vec![], vec![]);
    };
    page.message = None;
    page.submitting = true;
    (
        vec![UiEffect::ResetPassword {
            token,
            new_password: page.new_password.clone(),
        }],
        vec![],
    )
}

fn error_message(text: &str) -> InlineMessage {
    InlineMessage {
        level: ToastLevel::Error,
        text: text.to_string(),
    }
}

/// Applies an auth call result to whatever page is mounted now.
///
/// Toasts and delayed navigation happen even if the user has left the page.
pub fn handle_auth_result(page: &mut Page, event: AuthUiEvent) -> Vec<StateMutation> {
    match event {
        AuthUiEvent::LoginSucceeded => {
            if let Page::Login(login) = page {
                login.submitting = false;
            }
            vec![
                StateMutation::toast(ToastLevel::Success, messages::LOGIN_OK, ToastDuration::LoginAck),
                StateMutation::NavigateLater {
                    route: Route::Home,
                    delay: NavDelay::LoginAck,
                },
            ]
        }
        AuthUiEvent::LoginFailed { error } => {
            tracing::info!(%error, "login failed");
            if let Page::Login(login) = page {
                login.submitting = false;
            }
            vec![StateMutation::toast(
                ToastLevel::Error,
                messages::LOGIN_FAILED,
                ToastDuration::Auth,
            )]
        }
        AuthUiEvent::ResetEmailSent => {
            if let Page::ForgotPassword(forgot) = page {
                forgot.submitting = false;
            }
            vec![StateMutation::toast(
                ToastLevel::Success,
                messages::RESET_EMAIL_SENT,
                ToastDuration::Auth,
            )]
        }
        AuthUiEvent::ResetEmailFailed { error } => {
            tracing::info!(%error, "password reset request failed");
            if let Page::ForgotPassword(forgot) = page {
                forgot.submitting = false;
            }
            vec![StateMutation::toast(
                ToastLevel::Error,
                messages::RESET_EMAIL_UNKNOWN,
                ToastDuration::Auth,
            )]
        }
        AuthUiEvent::PasswordReset => {
            if let Page::ResetPassword(reset) = page {
                reset.submitting = false;
                reset.message = Some(InlineMessage {
                    level: ToastLevel::Success,
                    text: messages::PASSWORD_RESET_OK.to_string(),
                });
            }
            vec![StateMutation::NavigateLater {
                route: Route::Login,
                delay: NavDelay::ResetRedirect,
            }]
        }
        AuthUiEvent::PasswordResetFailed { error } => {
            tracing::info!(%error, "password reset failed");
            if let Page::ResetPassword(reset) = page {
                reset.submitting = false;
                reset.message = Some(error_message(messages::RESET_LINK_INVALID));
            }
            vec![]
        }
    }
}
