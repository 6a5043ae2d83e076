use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use academia_core::{AppError, AppResult, Role, UserIdentity};
use academia_domain::{
    AuditAction, MESSAGES_ROUTE, NavItem, NavItemId, NavPlacement, NavTreeNode, PlacementId,
};

use crate::navigation_ports::{
    AttachItemInput, AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
    CreateNavItemInput, DefaultMenuProvider, MovePlacementInput, NavigationRepository,
    ReconcileReport, UnreadBadgeProvider, UpdateNavItemInput,
};

mod access;
mod bootstrap;
mod catalog;
mod placements;
mod queries;
mod reconcile;
mod tree;

pub(crate) use reconcile::reconcile_placements;
pub use tree::{NodeRef, collect_descendant_ids, find_node};

/// Application service for the role-scoped navigation menu engine.
#[derive(Clone)]
pub struct NavigationService {
    repository: Arc<dyn NavigationRepository>,
    menu_provider: Arc<dyn DefaultMenuProvider>,
    badge_provider: Arc<dyn UnreadBadgeProvider>,
    audit_repository: Arc<dyn AuditRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
}

impl NavigationService {
    /// Creates a new navigation service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn NavigationRepository>,
        menu_provider: Arc<dyn DefaultMenuProvider>,
        badge_provider: Arc<dyn UnreadBadgeProvider>,
        audit_repository: Arc<dyn AuditRepository>,
        audit_log_repository: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            repository,
            menu_provider,
            badge_provider,
            audit_repository,
            audit_log_repository,
        }
    }

    /// Lists recent navigation audit events for administrators.
    pub async fn list_audit_log(
        &self,
        actor: &UserIdentity,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.require_admin(actor)?;
        self.audit_log_repository.list_recent_entries(query).await
    }
}

#[cfg(test)]
mod tests;
