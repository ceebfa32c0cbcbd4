use crate::features::toast::ToastLevel;

/// Focusable elements of the login page, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginFocus {
    #[default]
    Email,
    Password,
    Submit,
    ForgotLink,
}

impl LoginFocus {
    const ORDER: [LoginFocus; 4] = [
        LoginFocus::Email,
        LoginFocus::Password,
        LoginFocus::Submit,
        LoginFocus::ForgotLink,
    ];

    pub fn next(self) -> Self {
        cycle(&Self::ORDER, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ORDER, self, Self::ORDER.len() - 1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginPage {
    pub email: String,
    pub password: String,
    pub focus: LoginFocus,
    pub submitting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForgotFocus {
    #[default]
    Email,
    Submit,
    BackLink,
}

impl ForgotFocus {
    const ORDER: [ForgotFocus; 3] = [ForgotFocus::Email, ForgotFocus::Submit, ForgotFocus::BackLink];

    pub fn next(self) -> Self {
        cycle(&Self::ORDER, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ORDER, self, Self::ORDER.len() - 1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ForgotPage {
    pub email: String,
    pub focus: ForgotFocus,
    pub submitting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetFocus {
    #[default]
    NewPassword,
    ConfirmPassword,
    Submit,
    BackLink,
}

impl ResetFocus {
    const ORDER: [ResetFocus; 4] = [
        ResetFocus::NewPassword,
        ResetFocus::ConfirmPassword,
        ResetFocus::Submit,
        ResetFocus::BackLink,
    ];

    pub fn next(self) -> Self {
        cycle(&Self::ORDER, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ORDER, self, Self::ORDER.len() - 1)
    }
}

/// Persistent message shown under the reset form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMessage {
    pub level: ToastLevel,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct ResetPage {
    /// From the `token` query parameter.
    pub token: Option<String>,
    pub new_password: String,
    pub confirm_password: String,
    pub focus: ResetFocus,
    pub submitting: bool,
    pub message: Option<InlineMessage>,
}

impl ResetPage {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }
}

fn cycle<T: Copy + PartialEq>(order: &[T], current: T, step: usize) -> T {
    let index = order.iter().position(|f| *f == current).unwrap_or(0);
    order[(index + step) % order.len()]
}
