//! Application services and ports for the navigation engine.

#![forbid(unsafe_code)]

mod navigation_ports;
mod navigation_service;

pub use navigation_ports::{
    AttachItemInput, AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
    CreateNavItemInput, DefaultMenuProvider, MovePlacementInput, NavigationRepository,
    ReconcileReport, UnreadBadgeProvider, UpdateNavItemInput,
};
pub use navigation_service::{NavigationService, NodeRef, collect_descendant_ids, find_node};
