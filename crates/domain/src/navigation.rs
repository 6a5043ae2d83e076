use std::fmt::{Display, Formatter};

use academia_core::{AppError, AppResult, NonEmptyString, Role};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Reserved route whose menu node carries the unread-message badge.
pub const MESSAGES_ROUTE: &str = "/dashboard/messages";

/// Stable identifier of a catalog navigation item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavItemId(Uuid);

impl NavItemId {
    /// Creates a new random nav item identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a nav item identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NavItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NavItemId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Stable identifier of one role-scoped placement row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementId(Uuid);

impl PlacementId {
    /// Creates a new random placement identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a placement identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PlacementId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PlacementId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Structural kind of a catalog navigation item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavItemKind {
    /// Navigable leaf entry; always carries a route.
    Route,
    /// Grouping container or action trigger; may hold children in role
    /// trees and may omit a route.
    Category,
}

impl NavItemKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Route => "route",
            Self::Category => "category",
        }
    }

    /// Parses a storage value into a kind.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "route" => Ok(Self::Route),
            "category" => Ok(Self::Category),
            _ => Err(AppError::Validation(format!(
                "unknown nav item kind '{value}'"
            ))),
        }
    }

    /// Returns whether items of this kind may hold children in a role tree.
    #[must_use]
    pub fn allows_children(&self) -> bool {
        matches!(self, Self::Category)
    }
}

/// Reusable, role-agnostic navigation entry definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    id: NavItemId,
    label: NonEmptyString,
    route: Option<String>,
    icon: NonEmptyString,
    description: Option<String>,
    external: bool,
    kind: NavItemKind,
}

impl NavItem {
    /// Creates a validated catalog navigation item.
    pub fn new(
        id: NavItemId,
        label: impl Into<String>,
        route: Option<String>,
        icon: impl Into<String>,
        description: Option<String>,
        external: bool,
        kind: NavItemKind,
    ) -> AppResult<Self> {
        let route = route.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });
        let description = description.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        if kind == NavItemKind::Route && route.is_none() {
            return Err(AppError::Validation(
                "route items must define a route".to_owned(),
            ));
        }

        if external {
            let Some(target) = route.as_deref() else {
                return Err(AppError::Validation(
                    "external items must define a target URL".to_owned(),
                ));
            };
            Url::parse(target).map_err(|error| {
                AppError::Validation(format!(
                    "external target '{target}' is not an absolute URL: {error}"
                ))
            })?;
        }

        Ok(Self {
            id,
            label: NonEmptyString::new(label)?,
            route,
            icon: NonEmptyString::new(icon)?,
            description,
            external,
            kind,
        })
    }

    /// Returns the stable item identifier.
    #[must_use]
    pub fn id(&self) -> NavItemId {
        self.id
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the navigation route, when the item is a link.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Returns the opaque icon reference consumed by the SPA.
    #[must_use]
    pub fn icon(&self) -> &NonEmptyString {
        &self.icon
    }

    /// Returns an optional free-text description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether navigation leaves the SPA router.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Returns the structural kind.
    #[must_use]
    pub fn kind(&self) -> NavItemKind {
        self.kind
    }

    /// Returns whether the item may hold children in a role tree.
    #[must_use]
    pub fn allows_children(&self) -> bool {
        self.kind.allows_children()
    }
}

/// One catalog item placed inside one role's menu tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavPlacement {
    id: PlacementId,
    nav_item_id: NavItemId,
    role: Role,
    parent_nav_item_id: Option<NavItemId>,
    order_index: i32,
}

impl NavPlacement {
    /// Creates a validated placement row.
    pub fn new(
        id: PlacementId,
        nav_item_id: NavItemId,
        role: Role,
        parent_nav_item_id: Option<NavItemId>,
        order_index: i32,
    ) -> AppResult<Self> {
        if order_index < 0 {
            return Err(AppError::Validation(
                "order_index must be greater than or equal to zero".to_owned(),
            ));
        }

        if parent_nav_item_id == Some(nav_item_id) {
            return Err(AppError::Validation(
                "a placement cannot be its own parent".to_owned(),
            ));
        }

        Ok(Self {
            id,
            nav_item_id,
            role,
            parent_nav_item_id,
            order_index,
        })
    }

    /// Returns the stable placement identifier.
    #[must_use]
    pub fn id(&self) -> PlacementId {
        self.id
    }

    /// Returns the placed catalog item identifier.
    #[must_use]
    pub fn nav_item_id(&self) -> NavItemId {
        self.nav_item_id
    }

    /// Returns the role whose menu holds this placement.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the parent item identifier, or `None` for root placements.
    #[must_use]
    pub fn parent_nav_item_id(&self) -> Option<NavItemId> {
        self.parent_nav_item_id
    }

    /// Returns the sibling ordering value.
    #[must_use]
    pub fn order_index(&self) -> i32 {
        self.order_index
    }

    /// Returns a copy of this placement moved to a new position, running
    /// the same structural checks as construction.
    pub fn repositioned(
        &self,
        parent_nav_item_id: Option<NavItemId>,
        order_index: i32,
    ) -> AppResult<Self> {
        Self::new(
            self.id,
            self.nav_item_id,
            self.role,
            parent_nav_item_id,
            order_index,
        )
    }
}
