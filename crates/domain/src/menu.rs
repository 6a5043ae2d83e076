use academia_core::{AppError, AppResult, NonEmptyString, Role};
use serde::{Deserialize, Serialize};

use crate::navigation::{NavItem, NavItemKind, PlacementId};

/// One resolved node of a role's menu tree, carrying the catalog item,
/// the placement that put it there, and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTreeNode {
    item: NavItem,
    placement_id: PlacementId,
    badge_count: Option<u32>,
    children: Vec<NavTreeNode>,
}

impl NavTreeNode {
    /// Creates a tree node. Children are only admitted under items whose
    /// kind can hold them.
    pub fn new(
        item: NavItem,
        placement_id: PlacementId,
        children: Vec<NavTreeNode>,
    ) -> AppResult<Self> {
        if !children.is_empty() && !item.allows_children() {
            return Err(AppError::Validation(format!(
                "nav item '{}' of kind '{}' cannot hold children",
                item.label().as_str(),
                item.kind().as_str()
            )));
        }

        Ok(Self {
            item,
            placement_id,
            badge_count: None,
            children,
        })
    }

    /// Returns the catalog item rendered at this node.
    #[must_use]
    pub fn item(&self) -> &NavItem {
        &self.item
    }

    /// Returns the placement that produced this node.
    #[must_use]
    pub fn placement_id(&self) -> PlacementId {
        self.placement_id
    }

    /// Returns the unread badge, when one was attached.
    #[must_use]
    pub fn badge_count(&self) -> Option<u32> {
        self.badge_count
    }

    /// Returns ordered child nodes.
    #[must_use]
    pub fn children(&self) -> &[NavTreeNode] {
        &self.children
    }

    /// Attaches a badge to the first node in this subtree whose item
    /// routes to `route`. Returns whether a node was decorated.
    pub fn decorate_badge(&mut self, route: &str, badge_count: u32) -> bool {
        if self.item.route() == Some(route) {
            self.badge_count = Some(badge_count);
            return true;
        }

        self.children
            .iter_mut()
            .any(|child| child.decorate_badge(route, badge_count))
    }
}

/// One entry of a role's default menu layout, nested to mirror the tree
/// it seeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTemplateEntry {
    label: NonEmptyString,
    route: Option<String>,
    icon: NonEmptyString,
    description: Option<String>,
    external: bool,
    kind: NavItemKind,
    children: Vec<MenuTemplateEntry>,
}

impl MenuTemplateEntry {
    /// Creates a validated template entry.
    pub fn new(
        label: impl Into<String>,
        route: Option<String>,
        icon: impl Into<String>,
        description: Option<String>,
        external: bool,
        kind: NavItemKind,
        children: Vec<MenuTemplateEntry>,
    ) -> AppResult<Self> {
        let label = NonEmptyString::new(label)?;

        if kind == NavItemKind::Route && route.as_deref().is_none_or(|value| value.trim().is_empty())
        {
            return Err(AppError::Validation(format!(
                "template entry '{}' is a route item and must define a route",
                label.as_str()
            )));
        }

        if !children.is_empty() && !kind.allows_children() {
            return Err(AppError::Validation(format!(
                "template entry '{}' of kind '{}' cannot hold children",
                label.as_str(),
                kind.as_str()
            )));
        }

        Ok(Self {
            label,
            route,
            icon: NonEmptyString::new(icon)?,
            description,
            external,
            kind,
            children,
        })
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the navigation route, when present.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Returns the icon reference.
    #[must_use]
    pub fn icon(&self) -> &NonEmptyString {
        &self.icon
    }

    /// Returns an optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the entry targets an external URL.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Returns the structural kind.
    #[must_use]
    pub fn kind(&self) -> NavItemKind {
        self.kind
    }

    /// Returns nested child entries.
    #[must_use]
    pub fn children(&self) -> &[MenuTemplateEntry] {
        &self.children
    }
}

/// Default menu layout seeded for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTemplate {
    role: Role,
    entries: Vec<MenuTemplateEntry>,
}

impl MenuTemplate {
    /// Creates a validated template. Catalog items are reused across
    /// entries by label and kind, so that pair must be unique within
    /// one template.
    pub fn new(role: Role, entries: Vec<MenuTemplateEntry>) -> AppResult<Self> {
        let mut seen = std::collections::HashSet::new();
        let mut pending: Vec<&MenuTemplateEntry> = entries.iter().collect();
        while let Some(entry) = pending.pop() {
            if !seen.insert((entry.label().as_str().to_owned(), entry.kind())) {
                return Err(AppError::Validation(format!(
                    "duplicate template entry '{}' of kind '{}' for role '{}'",
                    entry.label().as_str(),
                    entry.kind().as_str(),
                    role.as_str()
                )));
            }
            pending.extend(entry.children());
        }

        Ok(Self { role, entries })
    }

    /// Returns the role this template seeds.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns ordered top-level entries.
    #[must_use]
    pub fn entries(&self) -> &[MenuTemplateEntry] {
        &self.entries
    }
}
