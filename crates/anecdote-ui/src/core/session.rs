//! Auth session state and the status texts shown in the auth panel.
//!
//! # Design
//! - Keep the session as plain data; the controller decides side effects from the
//!   transition value returned here.
//! - Backend error messages are embedded verbatim, never rewritten.

use crate::core::error::BackendError;
use serde::{Deserialize, Serialize};

/// Authenticated backend user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Backend user id; keys the remote completion record.
    pub id: String,
    /// Email address when the backend returned one.
    #[serde(default)]
    pub email: Option<String>,
}

impl SessionUser {
    /// Label used in the signed-in indicator.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.id)
    }
}

/// Current auth session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    /// No signed-in user; local storage is the backing medium.
    #[default]
    Anonymous,
    /// Signed-in user; the remote record is the backing medium.
    Authenticated(SessionUser),
}

/// Side effects implied by a session change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionTransition {
    /// Anonymous → Authenticated: run merge/sync, swap the auth controls.
    SignedIn(SessionUser),
    /// Authenticated → Anonymous: clear local data and re-render.
    SignedOut,
    /// A different user replaced the current one.
    SwitchedUser(SessionUser),
    /// Nothing changed.
    Unchanged,
}

impl Session {
    /// Session for an optional user.
    #[must_use]
    pub fn from_user(user: Option<SessionUser>) -> Self {
        user.map_or(Self::Anonymous, Self::Authenticated)
    }

    /// Signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous => None,
        }
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Compute the transition from `self` to `next`.
    #[must_use]
    pub fn transition_to(&self, next: &Self) -> SessionTransition {
        match (self, next) {
            (Self::Anonymous, Self::Authenticated(user)) => {
                SessionTransition::SignedIn(user.clone())
            }
            (Self::Authenticated(_), Self::Anonymous) => SessionTransition::SignedOut,
            (Self::Authenticated(current), Self::Authenticated(user)) if current.id != user.id => {
                SessionTransition::SwitchedUser(user.clone())
            }
            _ => SessionTransition::Unchanged,
        }
    }

    /// Which auth controls are visible for this session.
    #[must_use]
    pub const fn controls(&self) -> AuthControls {
        let signed_in = self.is_authenticated();
        AuthControls {
            credentials: !signed_in,
            sign_out: signed_in,
        }
    }
}

/// Visibility of the auth panel regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthControls {
    /// Email/password inputs plus sign-up and sign-in buttons.
    pub credentials: bool,
    /// Sign-out button.
    pub sign_out: bool,
}

/// Status line for the current session.
#[must_use]
pub fn session_status(session: &Session) -> String {
    match session {
        Session::Authenticated(user) => format!("已登录: {}", user.display_name()),
        Session::Anonymous => "未登录".to_string(),
    }
}

/// Outcome of an auth action, ready to be shown in the status area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthFeedback {
    /// Status text.
    pub message: String,
    /// Whether the password field should be cleared.
    pub clear_password: bool,
}

/// Feedback after a sign-up attempt.
#[must_use]
pub fn sign_up_feedback(result: &Result<Option<SessionUser>, BackendError>) -> AuthFeedback {
    match result {
        Err(err) => AuthFeedback {
            message: format!("注册失败: {err}"),
            clear_password: false,
        },
        Ok(Some(_)) => AuthFeedback {
            message: "注册成功，请检查您的邮箱进行验证。".to_string(),
            clear_password: true,
        },
        Ok(None) => AuthFeedback {
            message: "注册成功，但未返回用户数据。".to_string(),
            clear_password: true,
        },
    }
}

/// Feedback after a sign-in attempt.
#[must_use]
pub fn sign_in_feedback(result: &Result<Option<SessionUser>, BackendError>) -> AuthFeedback {
    match result {
        Err(err) => AuthFeedback {
            message: format!("登录失败: {err}"),
            clear_password: false,
        },
        Ok(Some(user)) => AuthFeedback {
            message: format!("登录成功: {}", user.display_name()),
            clear_password: true,
        },
        Ok(None) => AuthFeedback {
            message: "登录成功，但未返回用户数据。".to_string(),
            clear_password: true,
        },
    }
}

/// Feedback after a sign-out attempt.
#[must_use]
pub fn sign_out_feedback(result: &Result<(), BackendError>) -> AuthFeedback {
    match result {
        Err(err) => AuthFeedback {
            message: format!("登出失败: {err}"),
            clear_password: false,
        },
        Ok(()) => AuthFeedback {
            message: "已登出".to_string(),
            clear_password: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> SessionUser {
        SessionUser {
            id: id.into(),
            email: Some(format!("{id}@example.com")),
        }
    }

    #[test]
    fn transitions_cover_sign_in_and_out() {
        let anon = Session::Anonymous;
        let signed = Session::Authenticated(user("a"));
        assert_eq!(
            anon.transition_to(&signed),
            SessionTransition::SignedIn(user("a"))
        );
        assert_eq!(signed.transition_to(&anon), SessionTransition::SignedOut);
        assert_eq!(signed.transition_to(&signed), SessionTransition::Unchanged);
        assert_eq!(anon.transition_to(&anon), SessionTransition::Unchanged);
        assert_eq!(
            signed.transition_to(&Session::Authenticated(user("b"))),
            SessionTransition::SwitchedUser(user("b"))
        );
    }

    #[test]
    fn controls_toggle_with_session() {
        let anon = Session::Anonymous.controls();
        assert!(anon.credentials && !anon.sign_out);
        let signed = Session::from_user(Some(user("a"))).controls();
        assert!(!signed.credentials && signed.sign_out);
    }

    #[test]
    fn sign_in_failure_surfaces_backend_message_verbatim() {
        let feedback = sign_in_feedback(&Err(BackendError::with_code(
            "invalid_grant",
            "Invalid login credentials",
        )));
        assert_eq!(feedback.message, "登录失败: Invalid login credentials");
        assert!(!feedback.clear_password);
    }

    #[test]
    fn sign_up_success_clears_password() {
        let feedback = sign_up_feedback(&Ok(Some(user("a"))));
        assert!(feedback.clear_password);
        assert_eq!(feedback.message, "注册成功，请检查您的邮箱进行验证。");
        assert_eq!(
            session_status(&Session::from_user(Some(user("a")))),
            "已登录: a@example.com"
        );
    }
}
