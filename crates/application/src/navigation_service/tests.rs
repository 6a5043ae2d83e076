use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use tokio::sync::Mutex;

use academia_core::{AppError, AppResult, Role, UserIdentity};
use academia_domain::{
    MESSAGES_ROUTE, NavItem, NavItemId, NavItemKind, NavPlacement, PlacementId,
};

use crate::navigation_ports::{
    AttachItemInput, AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
    CreateNavItemInput, DefaultMenuProvider, MovePlacementInput, NavigationRepository,
    UnreadBadgeProvider, UpdateNavItemInput,
};

use super::{NavigationService, NodeRef, collect_descendant_ids, find_node, reconcile_placements};

#[derive(Default)]
struct FakeNavigationRepository {
    items: Mutex<Vec<NavItem>>,
    placements: Mutex<Vec<NavPlacement>>,
    fail_placement_reads: Mutex<bool>,
}

#[async_trait]
impl NavigationRepository for FakeNavigationRepository {
    async fn list_nav_items(&self) -> AppResult<Vec<NavItem>> {
        Ok(self.items.lock().await.clone())
    }

    async fn create_nav_item(&self, item: NavItem) -> AppResult<()> {
        let mut items = self.items.lock().await;
        if items.iter().any(|existing| existing.id() == item.id()) {
            return Err(AppError::Conflict(format!(
                "nav item '{}' already exists",
                item.id()
            )));
        }
        items.push(item);
        Ok(())
    }

    async fn update_nav_item(&self, item: NavItem) -> AppResult<()> {
        let mut items = self.items.lock().await;
        let position = items
            .iter()
            .position(|existing| existing.id() == item.id())
            .ok_or_else(|| AppError::NotFound(format!("nav item '{}' does not exist", item.id())))?;
        items[position] = item;
        Ok(())
    }

    async fn delete_nav_item(&self, nav_item_id: NavItemId) -> AppResult<()> {
        self.items.lock().await.retain(|item| item.id() != nav_item_id);

        let mut placements = self.placements.lock().await;
        placements.retain(|placement| placement.nav_item_id() != nav_item_id);
        let mut cleared = Vec::with_capacity(placements.len());
        for placement in placements.drain(..) {
            if placement.parent_nav_item_id() == Some(nav_item_id) {
                cleared.push(placement.repositioned(None, placement.order_index())?);
            } else {
                cleared.push(placement);
            }
        }
        *placements = cleared;
        Ok(())
    }

    async fn list_placements(&self, role: Role) -> AppResult<Vec<NavPlacement>> {
        if *self.fail_placement_reads.lock().await {
            return Err(AppError::Store("placement fetch failed".to_owned()));
        }

        Ok(self
            .placements
            .lock()
            .await
            .iter()
            .filter(|placement| placement.role() == role)
            .cloned()
            .collect())
    }

    async fn create_placement(&self, placement: NavPlacement) -> AppResult<()> {
        let mut placements = self.placements.lock().await;
        let duplicate = placements.iter().any(|existing| {
            existing.id() == placement.id()
                || (existing.role() == placement.role()
                    && existing.nav_item_id() == placement.nav_item_id())
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "placement '{}' collides with an existing row",
                placement.id()
            )));
        }
        placements.push(placement);
        Ok(())
    }

    async fn update_placement(&self, placement: NavPlacement) -> AppResult<()> {
        let mut placements = self.placements.lock().await;
        let position = placements
            .iter()
            .position(|existing| existing.id() == placement.id())
            .ok_or_else(|| {
                AppError::NotFound(format!("placement '{}' does not exist", placement.id()))
            })?;
        placements[position] = placement;
        Ok(())
    }

    async fn delete_placement(&self, placement_id: PlacementId) -> AppResult<()> {
        self.placements
            .lock()
            .await
            .retain(|placement| placement.id() != placement_id);
        Ok(())
    }

    async fn delete_all_placements(&self, role: Role) -> AppResult<()> {
        self.placements
            .lock()
            .await
            .retain(|placement| placement.role() != role);
        Ok(())
    }
}

const TEMPLATE_ROOT_COUNT: usize = 3;

struct FakeMenuProvider {
    repository: Arc<FakeNavigationRepository>,
    fail_for: Option<Role>,
}

impl FakeMenuProvider {
    async fn find_or_create_item(
        &self,
        label: &str,
        route: Option<&str>,
        icon: &str,
        kind: NavItemKind,
    ) -> AppResult<NavItem> {
        let existing = self
            .repository
            .list_nav_items()
            .await?
            .into_iter()
            .find(|item| item.label().as_str() == label && item.kind() == kind);
        if let Some(item) = existing {
            return Ok(item);
        }

        let item = NavItem::new(
            NavItemId::new(),
            label,
            route.map(ToOwned::to_owned),
            icon,
            None,
            false,
            kind,
        )?;
        self.repository.create_nav_item(item.clone()).await?;
        Ok(item)
    }
}

#[async_trait]
impl DefaultMenuProvider for FakeMenuProvider {
    async fn bootstrap_role(&self, role: Role) -> AppResult<usize> {
        if self.fail_for == Some(role) {
            return Err(AppError::Store(format!(
                "template fetch failed for role '{}'",
                role.as_str()
            )));
        }

        self.repository.delete_all_placements(role).await?;

        let home = self
            .find_or_create_item("Home", Some("/dashboard/home"), "home", NavItemKind::Route)
            .await?;
        let courses = self
            .find_or_create_item("Courses", None, "book-open", NavItemKind::Category)
            .await?;
        let grades = self
            .find_or_create_item(
                "Grades",
                Some("/dashboard/grades"),
                "chart",
                NavItemKind::Route,
            )
            .await?;
        let messages = self
            .find_or_create_item("Messages", Some(MESSAGES_ROUTE), "mail", NavItemKind::Route)
            .await?;

        let rows = [
            NavPlacement::new(PlacementId::new(), home.id(), role, None, 0)?,
            NavPlacement::new(PlacementId::new(), courses.id(), role, None, 1)?,
            NavPlacement::new(PlacementId::new(), messages.id(), role, None, 2)?,
            NavPlacement::new(PlacementId::new(), grades.id(), role, Some(courses.id()), 0)?,
        ];
        let seeded = rows.len();
        for row in rows {
            self.repository.create_placement(row).await?;
        }

        Ok(seeded)
    }
}

struct FakeBadgeProvider {
    count: u32,
    fail: bool,
}

#[async_trait]
impl UnreadBadgeProvider for FakeBadgeProvider {
    async fn unread_count(&self, _subject: &str) -> AppResult<u32> {
        if self.fail {
            return Err(AppError::Store("badge backend unavailable".to_owned()));
        }
        Ok(self.count)
    }
}

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct FakeAuditLogRepository {
    entries: Vec<AuditLogEntry>,
}

#[async_trait]
impl AuditLogRepository for FakeAuditLogRepository {
    async fn list_recent_entries(&self, _query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self.entries.clone())
    }
}

struct Harness {
    service: NavigationService,
    repository: Arc<FakeNavigationRepository>,
    audit: Arc<FakeAuditRepository>,
}

fn harness() -> Harness {
    harness_with(FakeBadgeProvider {
        count: 0,
        fail: false,
    })
}

fn harness_with(badge_provider: FakeBadgeProvider) -> Harness {
    harness_full(badge_provider, None)
}

fn harness_full(badge_provider: FakeBadgeProvider, bootstrap_fail_for: Option<Role>) -> Harness {
    let repository = Arc::new(FakeNavigationRepository::default());
    let menu_provider = Arc::new(FakeMenuProvider {
        repository: repository.clone(),
        fail_for: bootstrap_fail_for,
    });
    let audit = Arc::new(FakeAuditRepository::default());
    let service = NavigationService::new(
        repository.clone(),
        menu_provider,
        Arc::new(badge_provider),
        audit.clone(),
        Arc::new(FakeAuditLogRepository {
            entries: Vec::new(),
        }),
    );
    Harness {
        service,
        repository,
        audit,
    }
}

fn admin() -> UserIdentity {
    UserIdentity::new("admin-1", "Admin", Role::Administrator)
}

fn student() -> UserIdentity {
    UserIdentity::new("student-1", "Student", Role::Student)
}

async fn seed_item(harness: &Harness, label: &str, kind: NavItemKind) -> NavItem {
    let route = matches!(kind, NavItemKind::Route)
        .then(|| format!("/dashboard/{}", label.to_lowercase()));
    harness
        .service
        .create_nav_item(
            &admin(),
            CreateNavItemInput {
                label: label.to_owned(),
                route,
                icon: "circle".to_owned(),
                description: None,
                external: false,
                kind,
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!())
}

async fn attach_root(harness: &Harness, role: Role, item: &NavItem) -> NavPlacement {
    attach_under(harness, role, item, None).await
}

async fn attach_under(
    harness: &Harness,
    role: Role,
    item: &NavItem,
    parent: Option<NavItemId>,
) -> NavPlacement {
    harness
        .service
        .attach_item(
            &admin(),
            AttachItemInput {
                role,
                nav_item_id: item.id(),
                parent_nav_item_id: parent,
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!())
}

async fn stored_placements(harness: &Harness, role: Role) -> Vec<NavPlacement> {
    harness
        .repository
        .list_placements(role)
        .await
        .unwrap_or_else(|_| unreachable!())
}

fn order_of(placements: &[NavPlacement], nav_item_id: NavItemId) -> i32 {
    placements
        .iter()
        .find(|placement| placement.nav_item_id() == nav_item_id)
        .map(NavPlacement::order_index)
        .unwrap_or(-1)
}

#[tokio::test]
async fn attach_then_read_contains_single_root() {
    let harness = harness();
    let item = seed_item(&harness, "Calendar", NavItemKind::Route).await;
    let placement = attach_root(&harness, Role::Student, &item).await;

    let tree = harness
        .service
        .role_tree(&admin(), Role::Student)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].item().id(), item.id());
    assert_eq!(tree[0].placement_id(), placement.id());
    assert!(tree[0].children().is_empty());
}

#[tokio::test]
async fn attach_appends_at_end_of_group() {
    let harness = harness();
    let first = seed_item(&harness, "Home", NavItemKind::Route).await;
    let second = seed_item(&harness, "Calendar", NavItemKind::Route).await;

    let first_placement = attach_root(&harness, Role::Student, &first).await;
    let second_placement = attach_root(&harness, Role::Student, &second).await;

    assert_eq!(first_placement.order_index(), 0);
    assert_eq!(second_placement.order_index(), 1);
}

#[tokio::test]
async fn attach_rejects_duplicate_item_in_role() {
    let harness = harness();
    let item = seed_item(&harness, "Home", NavItemKind::Route).await;
    attach_root(&harness, Role::Student, &item).await;

    let result = harness
        .service
        .attach_item(
            &admin(),
            AttachItemInput {
                role: Role::Student,
                nav_item_id: item.id(),
                parent_nav_item_id: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn attach_rejects_route_parent() {
    let harness = harness();
    let route = seed_item(&harness, "Home", NavItemKind::Route).await;
    let child = seed_item(&harness, "Grades", NavItemKind::Route).await;
    attach_root(&harness, Role::Student, &route).await;

    let result = harness
        .service
        .attach_item(
            &admin(),
            AttachItemInput {
                role: Role::Student,
                nav_item_id: child.id(),
                parent_nav_item_id: Some(route.id()),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn attach_rejects_unplaced_parent() {
    let harness = harness();
    let category = seed_item(&harness, "Administration", NavItemKind::Category).await;
    let child = seed_item(&harness, "Grades", NavItemKind::Route).await;

    let result = harness
        .service
        .attach_item(
            &admin(),
            AttachItemInput {
                role: Role::Student,
                nav_item_id: child.id(),
                parent_nav_item_id: Some(category.id()),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn attach_rejects_missing_item() {
    let harness = harness();

    let result = harness
        .service
        .attach_item(
            &admin(),
            AttachItemInput {
                role: Role::Student,
                nav_item_id: NavItemId::new(),
                parent_nav_item_id: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn mutations_require_administrator_role() {
    let harness = harness();
    let item = seed_item(&harness, "Home", NavItemKind::Route).await;

    let result = harness
        .service
        .attach_item(
            &student(),
            AttachItemInput {
                role: Role::Student,
                nav_item_id: item.id(),
                parent_nav_item_id: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn move_lands_after_drop_target() {
    let harness = harness();
    let item_a = seed_item(&harness, "Alpha", NavItemKind::Route).await;
    let item_b = seed_item(&harness, "Beta", NavItemKind::Route).await;
    let item_c = seed_item(&harness, "Gamma", NavItemKind::Route).await;
    let placement_a = attach_root(&harness, Role::Student, &item_a).await;
    attach_root(&harness, Role::Student, &item_b).await;
    let placement_c = attach_root(&harness, Role::Student, &item_c).await;

    let moved = harness
        .service
        .move_placement(
            &admin(),
            MovePlacementInput {
                role: Role::Student,
                placement_id: placement_c.id(),
                new_parent_nav_item_id: None,
                drop_after_placement_id: Some(placement_a.id()),
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(moved.order_index(), 1);
    let placements = stored_placements(&harness, Role::Student).await;
    assert_eq!(order_of(&placements, item_a.id()), 0);
    assert_eq!(order_of(&placements, item_c.id()), 1);
    assert_eq!(order_of(&placements, item_b.id()), 2);
}

#[tokio::test]
async fn move_without_drop_target_appends_last() {
    let harness = harness();
    let item_a = seed_item(&harness, "Alpha", NavItemKind::Route).await;
    let item_b = seed_item(&harness, "Beta", NavItemKind::Route).await;
    let item_c = seed_item(&harness, "Gamma", NavItemKind::Route).await;
    let placement_a = attach_root(&harness, Role::Student, &item_a).await;
    attach_root(&harness, Role::Student, &item_b).await;
    attach_root(&harness, Role::Student, &item_c).await;

    harness
        .service
        .move_placement(
            &admin(),
            MovePlacementInput {
                role: Role::Student,
                placement_id: placement_a.id(),
                new_parent_nav_item_id: None,
                drop_after_placement_id: None,
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    let placements = stored_placements(&harness, Role::Student).await;
    assert_eq!(order_of(&placements, item_b.id()), 0);
    assert_eq!(order_of(&placements, item_c.id()), 1);
    assert_eq!(order_of(&placements, item_a.id()), 2);
}

#[tokio::test]
async fn move_reparents_under_category() {
    let harness = harness();
    let category = seed_item(&harness, "Courses", NavItemKind::Category).await;
    let item = seed_item(&harness, "Grades", NavItemKind::Route).await;
    attach_root(&harness, Role::Student, &category).await;
    let placement = attach_root(&harness, Role::Student, &item).await;

    let moved = harness
        .service
        .move_placement(
            &admin(),
            MovePlacementInput {
                role: Role::Student,
                placement_id: placement.id(),
                new_parent_nav_item_id: Some(category.id()),
                drop_after_placement_id: None,
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(moved.parent_nav_item_id(), Some(category.id()));
    assert_eq!(moved.order_index(), 0);

    let tree = harness
        .service
        .role_tree(&admin(), Role::Student)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].children().len(), 1);
    assert_eq!(tree[0].children()[0].item().id(), item.id());
}

#[tokio::test]
async fn move_rejects_self_parent_and_keeps_state() {
    let harness = harness();
    let category = seed_item(&harness, "Courses", NavItemKind::Category).await;
    let placement = attach_root(&harness, Role::Student, &category).await;
    let before = stored_placements(&harness, Role::Student).await;

    let result = harness
        .service
        .move_placement(
            &admin(),
            MovePlacementInput {
                role: Role::Student,
                placement_id: placement.id(),
                new_parent_nav_item_id: Some(category.id()),
                drop_after_placement_id: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(stored_placements(&harness, Role::Student).await, before);
}

#[tokio::test]
async fn move_rejects_cycle_and_keeps_state() {
    let harness = harness();
    let parent = seed_item(&harness, "Courses", NavItemKind::Category).await;
    let child = seed_item(&harness, "Archive", NavItemKind::Category).await;
    let parent_placement = attach_root(&harness, Role::Student, &parent).await;
    attach_under(&harness, Role::Student, &child, Some(parent.id())).await;
    let before = stored_placements(&harness, Role::Student).await;

    let result = harness
        .service
        .move_placement(
            &admin(),
            MovePlacementInput {
                role: Role::Student,
                placement_id: parent_placement.id(),
                new_parent_nav_item_id: Some(child.id()),
                drop_after_placement_id: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(stored_placements(&harness, Role::Student).await, before);
}

#[tokio::test]
async fn move_rejects_drop_target_outside_destination_group() {
    let harness = harness();
    let category = seed_item(&harness, "Courses", NavItemKind::Category).await;
    let item_a = seed_item(&harness, "Alpha", NavItemKind::Route).await;
    let item_b = seed_item(&harness, "Beta", NavItemKind::Route).await;
    attach_root(&harness, Role::Student, &category).await;
    let placement_a = attach_root(&harness, Role::Student, &item_a).await;
    let placement_b = attach_root(&harness, Role::Student, &item_b).await;

    let result = harness
        .service
        .move_placement(
            &admin(),
            MovePlacementInput {
                role: Role::Student,
                placement_id: placement_a.id(),
                new_parent_nav_item_id: Some(category.id()),
                drop_after_placement_id: Some(placement_b.id()),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn detach_without_cascade_rejected_while_children_exist() {
    let harness = harness();
    let category = seed_item(&harness, "Courses", NavItemKind::Category).await;
    let child = seed_item(&harness, "Grades", NavItemKind::Route).await;
    let category_placement = attach_root(&harness, Role::Student, &category).await;
    attach_under(&harness, Role::Student, &child, Some(category.id())).await;

    let result = harness
        .service
        .detach_placement(&admin(), Role::Student, category_placement.id(), false)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(stored_placements(&harness, Role::Student).await.len(), 2);
}

#[tokio::test]
async fn detach_cascade_removes_subtree_and_restores_density() {
    let harness = harness();
    let first = seed_item(&harness, "Home", NavItemKind::Route).await;
    let category = seed_item(&harness, "Courses", NavItemKind::Category).await;
    let nested = seed_item(&harness, "Archive", NavItemKind::Category).await;
    let leaf = seed_item(&harness, "Grades", NavItemKind::Route).await;
    let last = seed_item(&harness, "Calendar", NavItemKind::Route).await;

    attach_root(&harness, Role::Student, &first).await;
    let category_placement = attach_root(&harness, Role::Student, &category).await;
    attach_root(&harness, Role::Student, &last).await;
    attach_under(&harness, Role::Student, &nested, Some(category.id())).await;
    attach_under(&harness, Role::Student, &leaf, Some(nested.id())).await;

    let removed = harness
        .service
        .detach_placement(&admin(), Role::Student, category_placement.id(), true)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(removed, 3);
    let placements = stored_placements(&harness, Role::Student).await;
    assert_eq!(placements.len(), 2);
    assert_eq!(order_of(&placements, first.id()), 0);
    assert_eq!(order_of(&placements, last.id()), 1);
}

#[tokio::test]
async fn delete_nav_item_cascades_across_roles() {
    let harness = harness();
    let category = seed_item(&harness, "Courses", NavItemKind::Category).await;
    let child = seed_item(&harness, "Grades", NavItemKind::Route).await;

    for role in [Role::Student, Role::Professor, Role::Tutor] {
        attach_root(&harness, role, &category).await;
    }
    attach_under(&harness, Role::Student, &child, Some(category.id())).await;

    harness
        .service
        .delete_nav_item(&admin(), category.id())
        .await
        .unwrap_or_else(|_| unreachable!());

    for role in Role::all() {
        let placements = stored_placements(&harness, *role).await;
        assert!(placements.iter().all(|placement| {
            placement.nav_item_id() != category.id()
                && placement.parent_nav_item_id() != Some(category.id())
        }));
    }

    // the orphaned child was promoted to root and re-densified
    let placements = stored_placements(&harness, Role::Student).await;
    assert_eq!(placements.len(), 1);
    assert_eq!(order_of(&placements, child.id()), 0);
}

#[tokio::test]
async fn role_tree_skips_orphaned_rows_without_writing() {
    let harness = harness();
    let item = seed_item(&harness, "Home", NavItemKind::Route).await;
    attach_root(&harness, Role::Student, &item).await;

    let orphan = NavPlacement::new(PlacementId::new(), NavItemId::new(), Role::Student, None, 1)
        .unwrap_or_else(|_| unreachable!());
    harness
        .repository
        .create_placement(orphan.clone())
        .await
        .unwrap_or_else(|_| unreachable!());

    let tree = harness
        .service
        .role_tree(&admin(), Role::Student)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].item().id(), item.id());

    // pure read: the orphaned row is still stored
    let placements = stored_placements(&harness, Role::Student).await;
    assert!(placements.iter().any(|placement| placement.id() == orphan.id()));
}

#[tokio::test]
async fn role_tree_reads_are_identical_and_non_mutating() {
    let harness = harness();
    let item_a = seed_item(&harness, "Alpha", NavItemKind::Route).await;
    let item_b = seed_item(&harness, "Beta", NavItemKind::Route).await;

    // rows written behind the engine's back, with gapped orders
    for (item, order) in [(&item_a, 5), (&item_b, 9)] {
        let row = NavPlacement::new(PlacementId::new(), item.id(), Role::Student, None, order)
            .unwrap_or_else(|_| unreachable!());
        harness
            .repository
            .create_placement(row)
            .await
            .unwrap_or_else(|_| unreachable!());
    }

    let first = harness
        .service
        .role_tree(&admin(), Role::Student)
        .await
        .unwrap_or_else(|_| unreachable!());
    let second = harness
        .service
        .role_tree(&admin(), Role::Student)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);

    let placements = stored_placements(&harness, Role::Student).await;
    assert_eq!(order_of(&placements, item_a.id()), 5);
    assert_eq!(order_of(&placements, item_b.id()), 9);
}

#[tokio::test]
async fn reconcile_role_persists_dense_orders_and_is_idempotent() {
    let harness = harness();
    let item_a = seed_item(&harness, "Alpha", NavItemKind::Route).await;
    let item_b = seed_item(&harness, "Beta", NavItemKind::Route).await;

    for (item, order) in [(&item_a, 5), (&item_b, 9)] {
        let row = NavPlacement::new(PlacementId::new(), item.id(), Role::Student, None, order)
            .unwrap_or_else(|_| unreachable!());
        harness
            .repository
            .create_placement(row)
            .await
            .unwrap_or_else(|_| unreachable!());
    }

    let report = harness
        .service
        .reconcile_role(&admin(), Role::Student)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(report.reordered, 2);
    assert_eq!(report.rows_rewritten, 2);
    assert_eq!(report.re_rooted, 0);

    let placements = stored_placements(&harness, Role::Student).await;
    assert_eq!(order_of(&placements, item_a.id()), 0);
    assert_eq!(order_of(&placements, item_b.id()), 1);

    let second = harness
        .service
        .reconcile_role(&admin(), Role::Student)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(second.is_clean());
}

#[tokio::test]
async fn reconcile_re_roots_placement_under_unplaced_parent() {
    let harness = harness();
    let category = seed_item(&harness, "Courses", NavItemKind::Category).await;
    let item = seed_item(&harness, "Grades", NavItemKind::Route).await;

    // the parent item exists in the catalog but holds no placement
    let row = NavPlacement::new(
        PlacementId::new(),
        item.id(),
        Role::Student,
        Some(category.id()),
        0,
    )
    .unwrap_or_else(|_| unreachable!());
    harness
        .repository
        .create_placement(row)
        .await
        .unwrap_or_else(|_| unreachable!());

    let report = harness
        .service
        .reconcile_role(&admin(), Role::Student)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(report.re_rooted, 1);
    let placements = stored_placements(&harness, Role::Student).await;
    assert_eq!(placements.len(), 1);
    assert_eq!(placements[0].parent_nav_item_id(), None);
    assert_eq!(placements[0].order_index(), 0);
}

#[tokio::test]
async fn reset_role_removes_all_placements() {
    let harness = harness();
    let item_a = seed_item(&harness, "Alpha", NavItemKind::Route).await;
    let item_b = seed_item(&harness, "Beta", NavItemKind::Route).await;
    attach_root(&harness, Role::Tutor, &item_a).await;
    attach_root(&harness, Role::Tutor, &item_b).await;
    attach_root(&harness, Role::Student, &item_a).await;

    let removed = harness
        .service
        .reset_role(&admin(), Role::Tutor)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(removed, 2);
    assert!(stored_placements(&harness, Role::Tutor).await.is_empty());
    assert_eq!(stored_placements(&harness, Role::Student).await.len(), 1);
}

#[tokio::test]
async fn reset_then_bootstrap_matches_template_root_count() {
    let harness = harness();
    let item = seed_item(&harness, "Legacy", NavItemKind::Route).await;
    attach_root(&harness, Role::Tutor, &item).await;

    harness
        .service
        .reset_role(&admin(), Role::Tutor)
        .await
        .unwrap_or_else(|_| unreachable!());
    let tree = harness
        .service
        .bootstrap_defaults(&admin(), Role::Tutor)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(tree.len(), TEMPLATE_ROOT_COUNT);
}

#[tokio::test]
async fn bootstrap_reuses_catalog_items() {
    let harness = harness();

    harness
        .service
        .bootstrap_defaults(&admin(), Role::Student)
        .await
        .unwrap_or_else(|_| unreachable!());
    let after_first = harness
        .repository
        .list_nav_items()
        .await
        .unwrap_or_else(|_| unreachable!())
        .len();

    harness
        .service
        .bootstrap_defaults(&admin(), Role::Professor)
        .await
        .unwrap_or_else(|_| unreachable!());
    let after_second = harness
        .repository
        .list_nav_items()
        .await
        .unwrap_or_else(|_| unreachable!())
        .len();

    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn reinitialize_all_rebuilds_every_role() {
    let harness = harness();
    let legacy = seed_item(&harness, "Legacy", NavItemKind::Route).await;
    attach_root(&harness, Role::Student, &legacy).await;

    let completed = harness
        .service
        .reinitialize_all(&admin())
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(completed, Role::all().to_vec());
    for role in Role::all() {
        let tree = harness
            .service
            .role_tree(&admin(), *role)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(tree.len(), TEMPLATE_ROOT_COUNT);
    }

    let items = harness
        .repository
        .list_nav_items()
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(items.iter().all(|item| item.label().as_str() != "Legacy"));
}

#[tokio::test]
async fn reinitialize_all_surfaces_partial_completion() {
    let harness = harness_full(
        FakeBadgeProvider {
            count: 0,
            fail: false,
        },
        Some(Role::Tutor),
    );

    let result = harness.service.reinitialize_all(&admin()).await;

    match result {
        Err(AppError::PartialCompletion {
            completed_roles,
            failed_role,
            ..
        }) => {
            assert_eq!(completed_roles, vec![Role::Student, Role::Professor]);
            assert_eq!(failed_role, Role::Tutor);
        }
        other => panic!("expected partial completion, got {other:?}"),
    }
}

#[tokio::test]
async fn menu_returns_the_actors_own_tree() {
    let harness = harness();
    let student_item = seed_item(&harness, "Calendar", NavItemKind::Route).await;
    let professor_item = seed_item(&harness, "Gradebook", NavItemKind::Route).await;
    attach_root(&harness, Role::Student, &student_item).await;
    attach_root(&harness, Role::Professor, &professor_item).await;

    let menu = harness
        .service
        .menu_for(&student())
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(menu.len(), 1);
    assert_eq!(menu[0].item().id(), student_item.id());
}

#[tokio::test]
async fn menu_degrades_to_empty_on_store_failure() {
    let harness = harness();
    let item = seed_item(&harness, "Calendar", NavItemKind::Route).await;
    attach_root(&harness, Role::Student, &item).await;

    *harness.repository.fail_placement_reads.lock().await = true;
    let menu = harness
        .service
        .menu_for(&student())
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(menu.is_empty());
}

#[tokio::test]
async fn menu_decorates_unread_badge_on_messages_route() {
    let harness = harness_with(FakeBadgeProvider {
        count: 7,
        fail: false,
    });
    harness
        .service
        .bootstrap_defaults(&admin(), Role::Student)
        .await
        .unwrap_or_else(|_| unreachable!());

    let menu = harness
        .service
        .menu_for(&student())
        .await
        .unwrap_or_else(|_| unreachable!());

    let messages = menu
        .iter()
        .find(|node| node.item().route() == Some(MESSAGES_ROUTE))
        .unwrap_or_else(|| unreachable!());
    assert_eq!(messages.badge_count(), Some(7));

    let home = menu
        .iter()
        .find(|node| node.item().route() == Some("/dashboard/home"))
        .unwrap_or_else(|| unreachable!());
    assert!(home.badge_count().is_none());
}

#[tokio::test]
async fn badge_failure_leaves_menu_undecorated() {
    let harness = harness_with(FakeBadgeProvider {
        count: 7,
        fail: true,
    });
    harness
        .service
        .bootstrap_defaults(&admin(), Role::Student)
        .await
        .unwrap_or_else(|_| unreachable!());

    let menu = harness
        .service
        .menu_for(&student())
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(menu.len(), TEMPLATE_ROOT_COUNT);
    assert!(menu.iter().all(|node| node.badge_count().is_none()));
}

#[tokio::test]
async fn update_rejects_narrowing_container_with_children() {
    let harness = harness();
    let category = seed_item(&harness, "Courses", NavItemKind::Category).await;
    let child = seed_item(&harness, "Grades", NavItemKind::Route).await;
    attach_root(&harness, Role::Student, &category).await;
    let child_placement =
        attach_under(&harness, Role::Student, &child, Some(category.id())).await;

    let narrowing = UpdateNavItemInput {
        label: "Courses".to_owned(),
        route: Some("/dashboard/courses".to_owned()),
        icon: "book-open".to_owned(),
        description: None,
        external: false,
        kind: NavItemKind::Route,
    };

    let rejected = harness
        .service
        .update_nav_item(&admin(), category.id(), narrowing.clone())
        .await;
    assert!(matches!(rejected, Err(AppError::Validation(_))));

    harness
        .service
        .detach_placement(&admin(), Role::Student, child_placement.id(), false)
        .await
        .unwrap_or_else(|_| unreachable!());

    let updated = harness
        .service
        .update_nav_item(&admin(), category.id(), narrowing)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.kind(), NavItemKind::Route);
}

#[tokio::test]
async fn mutations_append_audit_events() {
    let harness = harness();
    let item = seed_item(&harness, "Home", NavItemKind::Route).await;
    let placement = attach_root(&harness, Role::Student, &item).await;
    harness
        .service
        .detach_placement(&admin(), Role::Student, placement.id(), false)
        .await
        .unwrap_or_else(|_| unreachable!());

    let events = harness.audit.events.lock().await;
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|event| event.subject == "admin-1"));
}

#[tokio::test]
async fn audit_log_requires_administrator() {
    let harness = harness();

    let result = harness
        .service
        .list_audit_log(
            &student(),
            AuditLogQuery {
                limit: 20,
                offset: 0,
                action: None,
                subject: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn find_node_matches_both_identities() {
    let harness = harness();
    let category = seed_item(&harness, "Courses", NavItemKind::Category).await;
    let child = seed_item(&harness, "Grades", NavItemKind::Route).await;
    attach_root(&harness, Role::Student, &category).await;
    let child_placement =
        attach_under(&harness, Role::Student, &child, Some(category.id())).await;

    let tree = harness
        .service
        .role_tree(&admin(), Role::Student)
        .await
        .unwrap_or_else(|_| unreachable!());

    let by_placement = find_node(&tree, NodeRef::Placement(child_placement.id()));
    let by_item = find_node(&tree, NodeRef::Item(child.id()));
    assert!(by_placement.is_some());
    assert_eq!(
        by_placement.map(|node| node.placement_id()),
        by_item.map(|node| node.placement_id())
    );
    assert!(find_node(&tree, NodeRef::Item(NavItemId::new())).is_none());
}

#[tokio::test]
async fn collect_descendant_ids_spans_all_depths() {
    let harness = harness();
    let root = seed_item(&harness, "Courses", NavItemKind::Category).await;
    let middle = seed_item(&harness, "Archive", NavItemKind::Category).await;
    let leaf = seed_item(&harness, "Grades", NavItemKind::Route).await;
    let sibling = seed_item(&harness, "Home", NavItemKind::Route).await;
    attach_root(&harness, Role::Student, &root).await;
    attach_under(&harness, Role::Student, &middle, Some(root.id())).await;
    attach_under(&harness, Role::Student, &leaf, Some(middle.id())).await;
    attach_root(&harness, Role::Student, &sibling).await;

    let placements = stored_placements(&harness, Role::Student).await;
    let descendants = collect_descendant_ids(root.id(), &placements);

    assert_eq!(descendants.len(), 2);
    assert!(descendants.contains(&middle.id()));
    assert!(descendants.contains(&leaf.id()));
    assert!(!descendants.contains(&root.id()));
    assert!(!descendants.contains(&sibling.id()));
}

proptest! {
    #[test]
    fn reconcile_restores_density_and_is_idempotent(
        parent_choices in prop::collection::vec(prop::option::of(0usize..8), 2..8),
        orders in prop::collection::vec(0i32..40, 2..8),
    ) {
        let count = parent_choices.len().min(orders.len());
        let items: Vec<NavItem> = (0..count)
            .map(|index| {
                NavItem::new(
                    NavItemId::new(),
                    format!("Item {index}"),
                    None,
                    "folder",
                    None,
                    false,
                    NavItemKind::Category,
                )
                .unwrap_or_else(|_| unreachable!())
            })
            .collect();

        let mut placements = Vec::with_capacity(count);
        for index in 0..count {
            let parent = parent_choices[index]
                .filter(|choice| *choice < count && *choice != index)
                .map(|choice| items[choice].id());
            placements.push(
                NavPlacement::new(
                    PlacementId::new(),
                    items[index].id(),
                    Role::Student,
                    parent,
                    orders[index],
                )
                .unwrap_or_else(|_| unreachable!()),
            );
        }

        let outcome = reconcile_placements(&items, &placements)
            .unwrap_or_else(|_| unreachable!());

        let mut groups: HashMap<Option<NavItemId>, Vec<i32>> = HashMap::new();
        for placement in &outcome.placements {
            groups
                .entry(placement.parent_nav_item_id())
                .or_default()
                .push(placement.order_index());
        }
        for group in groups.values_mut() {
            group.sort_unstable();
            let expected: Vec<i32> = (0..group.len()).map(|position| position as i32).collect();
            prop_assert_eq!(group.clone(), expected);
        }

        let second = reconcile_placements(&items, &outcome.placements)
            .unwrap_or_else(|_| unreachable!());
        prop_assert!(second.changed.is_empty());
        prop_assert_eq!(second.re_rooted, 0);
        prop_assert_eq!(second.reordered, 0);
    }

    #[test]
    fn random_mutation_sequences_keep_groups_dense_and_acyclic(
        operations in prop::collection::vec(
            (0u8..3u8, 0usize..16, prop::option::of(0usize..8)),
            1..16,
        ),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap_or_else(|_| unreachable!());
        let snapshots = runtime.block_on(async move {
            let harness = harness();
            let mut items = Vec::new();
            for label in ["Courses", "Resources", "Archive"] {
                items.push(seed_item(&harness, label, NavItemKind::Category).await);
            }
            for label in ["Home", "Grades", "Calendar"] {
                items.push(seed_item(&harness, label, NavItemKind::Route).await);
            }
            for item in items.iter().take(3) {
                attach_root(&harness, Role::Student, item).await;
            }

            // Rejected operations stay in the stream; stored rows must
            // hold the invariants after failures too.
            let mut snapshots = Vec::with_capacity(operations.len());
            for (kind, index, choice) in operations {
                let placements = stored_placements(&harness, Role::Student).await;
                match kind {
                    0 => {
                        let item = &items[index % items.len()];
                        let parent = choice.map(|position| items[position % items.len()].id());
                        let _ = harness
                            .service
                            .attach_item(
                                &admin(),
                                AttachItemInput {
                                    role: Role::Student,
                                    nav_item_id: item.id(),
                                    parent_nav_item_id: parent,
                                },
                            )
                            .await;
                    }
                    1 => {
                        if let Some(placement) = placements.get(index % placements.len().max(1)) {
                            let parent = choice.map(|position| items[position % items.len()].id());
                            let _ = harness
                                .service
                                .move_placement(
                                    &admin(),
                                    MovePlacementInput {
                                        role: Role::Student,
                                        placement_id: placement.id(),
                                        new_parent_nav_item_id: parent,
                                        drop_after_placement_id: None,
                                    },
                                )
                                .await;
                        }
                    }
                    _ => {
                        if let Some(placement) = placements.get(index % placements.len().max(1)) {
                            let _ = harness
                                .service
                                .detach_placement(&admin(), Role::Student, placement.id(), true)
                                .await;
                        }
                    }
                }
                snapshots.push(stored_placements(&harness, Role::Student).await);
            }

            snapshots
        });

        for placements in snapshots {
            let mut groups: HashMap<Option<NavItemId>, Vec<i32>> = HashMap::new();
            for placement in &placements {
                groups
                    .entry(placement.parent_nav_item_id())
                    .or_default()
                    .push(placement.order_index());
            }
            for group in groups.values_mut() {
                group.sort_unstable();
                let expected: Vec<i32> = (0..group.len()).map(|position| position as i32).collect();
                prop_assert_eq!(group.clone(), expected);
            }

            let parents: HashMap<NavItemId, Option<NavItemId>> = placements
                .iter()
                .map(|placement| (placement.nav_item_id(), placement.parent_nav_item_id()))
                .collect();
            for placement in &placements {
                let mut cursor = placement.parent_nav_item_id();
                let mut steps = 0usize;
                while let Some(parent_id) = cursor {
                    steps += 1;
                    prop_assert!(steps <= placements.len(), "parent chain does not terminate");
                    cursor = parents.get(&parent_id).copied().flatten();
                }
            }
        }
    }
}
