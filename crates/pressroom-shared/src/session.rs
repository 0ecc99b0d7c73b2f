//! Client session context.
//!
//! Holds the token and user returned at login. It is passed explicitly to
//! every authenticated client call instead of living in global storage.

use crate::dto::{AuthResponse, UserResponse};

#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    user: Option<UserResponse>,
}

impl Session {
    /// A signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the token and user from a successful login or registration.
    pub fn login(&mut self, auth: AuthResponse) {
        self.token = Some(auth.token);
        self.user = Some(auth.user);
    }

    pub fn logout(&mut self) {
        self.token = None;
        self.user = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn user(&self) -> Option<&UserResponse> {
        self.user.as_ref()
    }

    /// `Authorization` header value, if signed in.
    pub fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }
}
