use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use academia_application::NavigationRepository;
use academia_core::{AppError, AppResult, Role};
use academia_domain::{NavItem, NavItemId, NavPlacement, PlacementId};

/// In-memory navigation repository implementation. Mirrors the
/// relational semantics of the Postgres adapter: deleting a catalog
/// item removes its placements and clears dangling parent references
/// across all roles.
#[derive(Debug, Default)]
pub struct InMemoryNavigationRepository {
    items: RwLock<HashMap<NavItemId, NavItem>>,
    placements: RwLock<HashMap<PlacementId, NavPlacement>>,
}

impl InMemoryNavigationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            placements: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl NavigationRepository for InMemoryNavigationRepository {
    async fn list_nav_items(&self) -> AppResult<Vec<NavItem>> {
        let items = self.items.read().await;

        let mut listed: Vec<NavItem> = items.values().cloned().collect();
        listed.sort_by(|left, right| {
            left.label()
                .as_str()
                .cmp(right.label().as_str())
                .then_with(|| left.id().as_uuid().cmp(&right.id().as_uuid()))
        });

        Ok(listed)
    }

    async fn create_nav_item(&self, item: NavItem) -> AppResult<()> {
        let mut items = self.items.write().await;

        if items.contains_key(&item.id()) {
            return Err(AppError::Conflict(format!(
                "nav item '{}' already exists",
                item.id()
            )));
        }

        items.insert(item.id(), item);
        Ok(())
    }

    async fn update_nav_item(&self, item: NavItem) -> AppResult<()> {
        let mut items = self.items.write().await;

        if !items.contains_key(&item.id()) {
            return Err(AppError::NotFound(format!(
                "nav item '{}' does not exist",
                item.id()
            )));
        }

        items.insert(item.id(), item);
        Ok(())
    }

    async fn delete_nav_item(&self, nav_item_id: NavItemId) -> AppResult<()> {
        let mut items = self.items.write().await;

        if items.remove(&nav_item_id).is_none() {
            return Err(AppError::NotFound(format!(
                "nav item '{nav_item_id}' does not exist"
            )));
        }

        let mut placements = self.placements.write().await;
        placements.retain(|_, placement| placement.nav_item_id() != nav_item_id);

        let dangling: Vec<PlacementId> = placements
            .values()
            .filter(|placement| placement.parent_nav_item_id() == Some(nav_item_id))
            .map(NavPlacement::id)
            .collect();
        for placement_id in dangling {
            if let Some(placement) = placements.get(&placement_id) {
                let cleared = placement.repositioned(None, placement.order_index())?;
                placements.insert(placement_id, cleared);
            }
        }

        Ok(())
    }

    async fn list_placements(&self, role: Role) -> AppResult<Vec<NavPlacement>> {
        let placements = self.placements.read().await;

        let mut listed: Vec<NavPlacement> = placements
            .values()
            .filter(|placement| placement.role() == role)
            .cloned()
            .collect();
        listed.sort_by(|left, right| {
            left.order_index()
                .cmp(&right.order_index())
                .then_with(|| left.id().as_uuid().cmp(&right.id().as_uuid()))
        });

        Ok(listed)
    }

    async fn create_placement(&self, placement: NavPlacement) -> AppResult<()> {
        let mut placements = self.placements.write().await;

        if placements.contains_key(&placement.id()) {
            return Err(AppError::Conflict(format!(
                "placement '{}' already exists",
                placement.id()
            )));
        }

        let duplicate_pair = placements.values().any(|existing| {
            existing.role() == placement.role()
                && existing.nav_item_id() == placement.nav_item_id()
        });
        if duplicate_pair {
            return Err(AppError::Conflict(format!(
                "nav item '{}' is already placed for role '{}'",
                placement.nav_item_id(),
                placement.role().as_str()
            )));
        }

        placements.insert(placement.id(), placement);
        Ok(())
    }

    async fn update_placement(&self, placement: NavPlacement) -> AppResult<()> {
        let mut placements = self.placements.write().await;

        if !placements.contains_key(&placement.id()) {
            return Err(AppError::NotFound(format!(
                "placement '{}' does not exist",
                placement.id()
            )));
        }

        placements.insert(placement.id(), placement);
        Ok(())
    }

    async fn delete_placement(&self, placement_id: PlacementId) -> AppResult<()> {
        let mut placements = self.placements.write().await;

        if placements.remove(&placement_id).is_none() {
            return Err(AppError::NotFound(format!(
                "placement '{placement_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn delete_all_placements(&self, role: Role) -> AppResult<()> {
        self.placements
            .write()
            .await
            .retain(|_, placement| placement.role() != role);

        Ok(())
    }
}
