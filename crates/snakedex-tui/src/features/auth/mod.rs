//! Auth pages: login, forgot password, reset password.

mod render;
mod state;
mod update;

pub use render::{render_forgot, render_login, render_reset};
pub use state::{
    ForgotFocus, ForgotPage, InlineMessage, LoginFocus, LoginPage, ResetFocus, ResetPage,
};
pub use update::{
    handle_auth_result, handle_forgot_key, handle_login_key, handle_reset_key, messages,
};
