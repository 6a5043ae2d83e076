use academia_core::{AppResult, Role};
use academia_domain::{NavItem, NavItemId, NavPlacement, PlacementId};
use async_trait::async_trait;

/// Repository port for the nav item catalog and role placements.
#[async_trait]
pub trait NavigationRepository: Send + Sync {
    /// Lists every catalog nav item.
    async fn list_nav_items(&self) -> AppResult<Vec<NavItem>>;

    /// Creates a new catalog nav item.
    async fn create_nav_item(&self, item: NavItem) -> AppResult<()>;

    /// Replaces an existing catalog nav item, keyed by its id.
    async fn update_nav_item(&self, item: NavItem) -> AppResult<()>;

    /// Deletes a catalog nav item. The store cascades deletion of every
    /// placement referencing the item and clears dangling parent
    /// references, across all roles.
    async fn delete_nav_item(&self, nav_item_id: NavItemId) -> AppResult<()>;

    /// Lists every placement for one role.
    async fn list_placements(&self, role: Role) -> AppResult<Vec<NavPlacement>>;

    /// Creates a new placement row.
    async fn create_placement(&self, placement: NavPlacement) -> AppResult<()>;

    /// Replaces an existing placement row, keyed by its id.
    async fn update_placement(&self, placement: NavPlacement) -> AppResult<()>;

    /// Deletes one placement row.
    async fn delete_placement(&self, placement_id: PlacementId) -> AppResult<()>;

    /// Deletes every placement for one role.
    async fn delete_all_placements(&self, role: Role) -> AppResult<()>;
}
