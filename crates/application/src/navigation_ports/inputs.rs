use academia_core::Role;
use academia_domain::{NavItemId, NavItemKind, PlacementId};

/// Input payload for catalog item creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNavItemInput {
    /// Display label.
    pub label: String,
    /// Optional navigation route.
    pub route: Option<String>,
    /// Opaque icon reference passed through to the SPA.
    pub icon: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Whether navigation leaves the SPA router.
    pub external: bool,
    /// Structural kind.
    pub kind: NavItemKind,
}

/// Input payload for catalog item updates. The item id stays stable;
/// every other field is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNavItemInput {
    /// Display label.
    pub label: String,
    /// Optional navigation route.
    pub route: Option<String>,
    /// Opaque icon reference passed through to the SPA.
    pub icon: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Whether navigation leaves the SPA router.
    pub external: bool,
    /// Structural kind.
    pub kind: NavItemKind,
}

/// Input payload for attaching a catalog item to a role menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachItemInput {
    /// Role whose menu receives the item.
    pub role: Role,
    /// Catalog item to place.
    pub nav_item_id: NavItemId,
    /// Optional parent item; `None` appends at root level.
    pub parent_nav_item_id: Option<NavItemId>,
}

/// Input payload for reparenting or reordering one placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlacementInput {
    /// Role whose menu is edited.
    pub role: Role,
    /// Placement being moved.
    pub placement_id: PlacementId,
    /// Destination parent item; `None` moves to root level.
    pub new_parent_nav_item_id: Option<NavItemId>,
    /// Sibling the moved placement lands after; `None` appends at the
    /// end of the destination group.
    pub drop_after_placement_id: Option<PlacementId>,
}
