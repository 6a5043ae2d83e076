//! Domain entities and invariants for the navigation engine.

#![forbid(unsafe_code)]

mod menu;
mod navigation;
mod security;

pub use menu::{MenuTemplate, MenuTemplateEntry, NavTreeNode};
pub use navigation::{MESSAGES_ROUTE, NavItem, NavItemId, NavItemKind, NavPlacement, PlacementId};
pub use security::AuditAction;
