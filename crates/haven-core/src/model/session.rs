// ── Session model ──

use serde::Serialize;

/// Access level granted at login. Anything the hub doesn't call `admin`
/// is treated as a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Admin,
    Guest,
}

impl Role {
    pub fn parse(wire: &str) -> Self {
        if wire.eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::Guest
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Guest => "guest",
        }
    }
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<haven_api::User> for UserProfile {
    fn from(wire: haven_api::User) -> Self {
        Self {
            id: wire.id,
            role: Role::parse(&wire.role),
            username: wire.username,
        }
    }
}

/// An active session. Existence of a `Session` is the single source of
/// truth for "logged in" across the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: UserProfile,
}
