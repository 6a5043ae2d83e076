use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by navigation use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a catalog item is created.
    NavigationItemCreated,
    /// Emitted when a catalog item definition is updated.
    NavigationItemUpdated,
    /// Emitted when a catalog item is deleted.
    NavigationItemDeleted,
    /// Emitted when an item is attached to a role menu.
    NavigationPlacementAttached,
    /// Emitted when a placement is reparented or reordered.
    NavigationPlacementMoved,
    /// Emitted when a placement is removed from a role menu.
    NavigationPlacementDetached,
    /// Emitted when one role menu is cleared.
    NavigationRoleReset,
    /// Emitted when one role menu is rebuilt from its template.
    NavigationRoleBootstrapped,
    /// Emitted when every role menu is rebuilt at once.
    NavigationReinitialized,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NavigationItemCreated => "navigation.item.created",
            Self::NavigationItemUpdated => "navigation.item.updated",
            Self::NavigationItemDeleted => "navigation.item.deleted",
            Self::NavigationPlacementAttached => "navigation.placement.attached",
            Self::NavigationPlacementMoved => "navigation.placement.moved",
            Self::NavigationPlacementDetached => "navigation.placement.detached",
            Self::NavigationRoleReset => "navigation.role.reset",
            Self::NavigationRoleBootstrapped => "navigation.role.bootstrapped",
            Self::NavigationReinitialized => "navigation.reinitialized",
        }
    }
}
