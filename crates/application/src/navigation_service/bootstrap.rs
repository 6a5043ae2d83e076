use tracing::info;

use super::*;

impl NavigationService {
    /// Deletes every placement for one role. Returns the number of
    /// placements removed.
    pub async fn reset_role(&self, actor: &UserIdentity, role: Role) -> AppResult<usize> {
        self.require_admin(actor)?;

        let removed = self.repository.list_placements(role).await?.len();
        self.repository.delete_all_placements(role).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::NavigationRoleReset,
                resource_type: "role_menu".to_owned(),
                resource_id: role.as_str().to_owned(),
                detail: Some(format!(
                    "reset role '{}' menu, removing {removed} placement(s)",
                    role.as_str()
                )),
            })
            .await?;

        Ok(removed)
    }

    /// Replaces one role's menu with its standard starter layout via
    /// the default-menu collaborator, then reconciles. Returns the
    /// rebuilt tree.
    pub async fn bootstrap_defaults(
        &self,
        actor: &UserIdentity,
        role: Role,
    ) -> AppResult<Vec<NavTreeNode>> {
        self.require_admin(actor)?;

        let seeded = self.menu_provider.bootstrap_role(role).await?;
        self.reconcile_role_internal(role).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::NavigationRoleBootstrapped,
                resource_type: "role_menu".to_owned(),
                resource_id: role.as_str().to_owned(),
                detail: Some(format!(
                    "bootstrapped role '{}' menu with {seeded} placement(s)",
                    role.as_str()
                )),
            })
            .await?;

        self.load_role_tree(role).await
    }

    /// Clears the whole catalog, then bootstraps every role in order.
    /// Not atomic: the first bootstrap failure aborts the loop and
    /// surfaces which roles were already rebuilt.
    pub async fn reinitialize_all(&self, actor: &UserIdentity) -> AppResult<Vec<Role>> {
        self.require_admin(actor)?;

        let items = self.repository.list_nav_items().await?;
        for item in items {
            self.repository.delete_nav_item(item.id()).await?;
        }

        let mut completed_roles = Vec::new();
        for role in Role::all() {
            let outcome = async {
                self.menu_provider.bootstrap_role(*role).await?;
                self.reconcile_role_internal(*role).await
            }
            .await;

            if let Err(error) = outcome {
                return Err(AppError::PartialCompletion {
                    completed_roles,
                    failed_role: *role,
                    message: error.to_string(),
                });
            }

            info!(role = role.as_str(), "reinitialized role menu");
            completed_roles.push(*role);
        }

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::NavigationReinitialized,
                resource_type: "navigation".to_owned(),
                resource_id: "catalog".to_owned(),
                detail: Some(format!(
                    "reinitialized the catalog and rebuilt {} role menus",
                    completed_roles.len()
                )),
            })
            .await?;

        Ok(completed_roles)
    }
}
