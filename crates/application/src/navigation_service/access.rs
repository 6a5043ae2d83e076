use super::*;

impl NavigationService {
    pub(super) fn require_admin(&self, actor: &UserIdentity) -> AppResult<()> {
        if actor.is_administrator() {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' requires the administrator role",
            actor.subject()
        )))
    }

    pub(super) async fn require_nav_item(&self, nav_item_id: NavItemId) -> AppResult<NavItem> {
        self.repository
            .list_nav_items()
            .await?
            .into_iter()
            .find(|item| item.id() == nav_item_id)
            .ok_or_else(|| AppError::NotFound(format!("nav item '{nav_item_id}' does not exist")))
    }

    /// Validates that `parent_nav_item_id` can receive children in the
    /// role's menu: the item must exist, be a container kind, and hold
    /// an active placement for the role.
    pub(super) async fn require_parent_placement(
        &self,
        role: Role,
        parent_nav_item_id: NavItemId,
        placements: &[NavPlacement],
    ) -> AppResult<()> {
        let parent = self.require_nav_item(parent_nav_item_id).await?;
        if !parent.allows_children() {
            return Err(AppError::Validation(format!(
                "nav item '{}' of kind '{}' cannot receive children",
                parent.label().as_str(),
                parent.kind().as_str()
            )));
        }

        let placed = placements
            .iter()
            .any(|placement| placement.nav_item_id() == parent_nav_item_id);
        if !placed {
            return Err(AppError::Validation(format!(
                "nav item '{}' has no active placement for role '{}'",
                parent.label().as_str(),
                role.as_str()
            )));
        }

        Ok(())
    }
}
