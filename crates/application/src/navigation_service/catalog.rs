use super::*;

impl NavigationService {
    /// Lists every catalog nav item for administrators.
    pub async fn list_nav_items(&self, actor: &UserIdentity) -> AppResult<Vec<NavItem>> {
        self.require_admin(actor)?;
        self.repository.list_nav_items().await
    }

    /// Creates a new catalog nav item.
    pub async fn create_nav_item(
        &self,
        actor: &UserIdentity,
        input: CreateNavItemInput,
    ) -> AppResult<NavItem> {
        self.require_admin(actor)?;

        let item = NavItem::new(
            NavItemId::new(),
            input.label,
            input.route,
            input.icon,
            input.description,
            input.external,
            input.kind,
        )?;
        self.repository.create_nav_item(item.clone()).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::NavigationItemCreated,
                resource_type: "nav_item".to_owned(),
                resource_id: item.id().to_string(),
                detail: Some(format!("created nav item '{}'", item.label().as_str())),
            })
            .await?;

        Ok(item)
    }

    /// Replaces a catalog nav item's definition, keeping its id stable.
    /// Narrowing a container into a plain route is rejected while any
    /// role still has placements parented beneath the item.
    pub async fn update_nav_item(
        &self,
        actor: &UserIdentity,
        nav_item_id: NavItemId,
        input: UpdateNavItemInput,
    ) -> AppResult<NavItem> {
        self.require_admin(actor)?;

        let existing = self.require_nav_item(nav_item_id).await?;
        let updated = NavItem::new(
            nav_item_id,
            input.label,
            input.route,
            input.icon,
            input.description,
            input.external,
            input.kind,
        )?;

        if existing.allows_children() && !updated.allows_children() {
            for role in Role::all() {
                let placements = self.repository.list_placements(*role).await?;
                let has_children = placements
                    .iter()
                    .any(|placement| placement.parent_nav_item_id() == Some(nav_item_id));
                if has_children {
                    return Err(AppError::Validation(format!(
                        "nav item '{}' still has children for role '{}' and cannot become kind '{}'",
                        existing.label().as_str(),
                        role.as_str(),
                        updated.kind().as_str()
                    )));
                }
            }
        }

        self.repository.update_nav_item(updated.clone()).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::NavigationItemUpdated,
                resource_type: "nav_item".to_owned(),
                resource_id: updated.id().to_string(),
                detail: Some(format!("updated nav item '{}'", updated.label().as_str())),
            })
            .await?;

        Ok(updated)
    }

    /// Deletes a catalog nav item. The store cascades placement removal
    /// and clears dangling parent references; every role that carried
    /// the item is reconciled afterwards.
    pub async fn delete_nav_item(
        &self,
        actor: &UserIdentity,
        nav_item_id: NavItemId,
    ) -> AppResult<()> {
        self.require_admin(actor)?;

        let existing = self.require_nav_item(nav_item_id).await?;

        let mut affected_roles = Vec::new();
        for role in Role::all() {
            let placements = self.repository.list_placements(*role).await?;
            let references_item = placements.iter().any(|placement| {
                placement.nav_item_id() == nav_item_id
                    || placement.parent_nav_item_id() == Some(nav_item_id)
            });
            if references_item {
                affected_roles.push(*role);
            }
        }

        self.repository.delete_nav_item(nav_item_id).await?;

        for role in &affected_roles {
            self.reconcile_role_internal(*role).await?;
        }

        let detail = if affected_roles.is_empty() {
            format!("deleted nav item '{}'", existing.label().as_str())
        } else {
            format!(
                "deleted nav item '{}' placed for roles [{}]",
                existing.label().as_str(),
                affected_roles
                    .iter()
                    .map(|role| role.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::NavigationItemDeleted,
                resource_type: "nav_item".to_owned(),
                resource_id: nav_item_id.to_string(),
                detail: Some(detail),
            })
            .await?;

        Ok(())
    }
}
