use serde::{Deserialize, Serialize};

use crate::Role;

/// Actor information resolved by the upstream auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    display_name: String,
    role: Role,
}

impl UserIdentity {
    /// Creates a user identity from upstream authentication data.
    #[must_use]
    pub fn new(subject: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            role,
        }
    }

    /// Returns the stable subject claim from the identity provider.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the platform role attached to the identity.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns whether the actor holds the administrator role.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }
}
