mod audit;
mod inputs;
mod providers;
mod reports;
mod repository;

pub use audit::{AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository};
pub use inputs::{
    AttachItemInput, CreateNavItemInput, MovePlacementInput, UpdateNavItemInput,
};
pub use providers::{DefaultMenuProvider, UnreadBadgeProvider};
pub use reports::ReconcileReport;
pub use repository::NavigationRepository;
