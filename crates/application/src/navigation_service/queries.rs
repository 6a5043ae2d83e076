use tracing::warn;

use super::*;

impl NavigationService {
    /// Returns one role's menu tree for the management UI. Pure read:
    /// stored rows are never repaired here, only by reconciliation.
    pub async fn role_tree(
        &self,
        actor: &UserIdentity,
        role: Role,
    ) -> AppResult<Vec<NavTreeNode>> {
        self.require_admin(actor)?;

        let mut forest = self.load_role_tree(role).await?;
        self.decorate_unread_badge(actor, &mut forest).await;
        Ok(forest)
    }

    /// Returns the calling actor's own menu tree. A failed fetch is
    /// logged and degrades to an empty menu so the SPA still renders.
    pub async fn menu_for(&self, actor: &UserIdentity) -> AppResult<Vec<NavTreeNode>> {
        let role = actor.role();
        let mut forest = match self.load_role_tree(role).await {
            Ok(forest) => forest,
            Err(AppError::Store(cause)) => {
                warn!(
                    role = role.as_str(),
                    subject = actor.subject(),
                    cause,
                    "menu load failed, serving empty menu"
                );
                return Ok(Vec::new());
            }
            Err(error) => return Err(error),
        };

        self.decorate_unread_badge(actor, &mut forest).await;
        Ok(forest)
    }

    pub(super) async fn load_role_tree(&self, role: Role) -> AppResult<Vec<NavTreeNode>> {
        let items = self.repository.list_nav_items().await?;
        let placements = self.repository.list_placements(role).await?;
        tree::build_forest(role, &items, &placements)
    }

    async fn decorate_unread_badge(&self, actor: &UserIdentity, forest: &mut [NavTreeNode]) {
        let has_messages_node = forest
            .iter()
            .any(|node| tree::find_route(node, MESSAGES_ROUTE));
        if !has_messages_node {
            return;
        }

        match self.badge_provider.unread_count(actor.subject()).await {
            Ok(count) => {
                for node in forest.iter_mut() {
                    if node.decorate_badge(MESSAGES_ROUTE, count) {
                        break;
                    }
                }
            }
            Err(error) => {
                warn!(
                    subject = actor.subject(),
                    %error,
                    "unread badge fetch failed, leaving menu undecorated"
                );
            }
        }
    }
}
