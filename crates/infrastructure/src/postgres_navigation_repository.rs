use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use academia_application::NavigationRepository;
use academia_core::{AppError, AppResult, Role};
use academia_domain::{NavItem, NavItemId, NavItemKind, NavPlacement, PlacementId};

/// PostgreSQL-backed navigation repository. Placement cascade and
/// parent clearing on item deletion are delegated to the schema's
/// foreign keys.
#[derive(Clone)]
pub struct PostgresNavigationRepository {
    pool: PgPool,
}

impl PostgresNavigationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NavItemRow {
    id: Uuid,
    label: String,
    route: Option<String>,
    icon: String,
    description: Option<String>,
    is_external: bool,
    kind: String,
}

#[derive(Debug, FromRow)]
struct NavPlacementRow {
    id: Uuid,
    nav_item_id: Uuid,
    role: String,
    parent_nav_item_id: Option<Uuid>,
    order_index: i32,
}

fn nav_item_from_row(row: NavItemRow) -> AppResult<NavItem> {
    let kind = NavItemKind::parse(row.kind.as_str()).map_err(|error| {
        AppError::Internal(format!("persisted nav item '{}' is invalid: {error}", row.id))
    })?;

    NavItem::new(
        NavItemId::from_uuid(row.id),
        row.label,
        row.route,
        row.icon,
        row.description,
        row.is_external,
        kind,
    )
    .map_err(|error| AppError::Internal(format!("persisted nav item '{}' is invalid: {error}", row.id)))
}

fn placement_from_row(row: NavPlacementRow) -> AppResult<NavPlacement> {
    let role = row.role.parse::<Role>().map_err(|error| {
        AppError::Internal(format!(
            "persisted placement '{}' is invalid: {error}",
            row.id
        ))
    })?;

    NavPlacement::new(
        PlacementId::from_uuid(row.id),
        NavItemId::from_uuid(row.nav_item_id),
        role,
        row.parent_nav_item_id.map(NavItemId::from_uuid),
        row.order_index,
    )
    .map_err(|error| {
        AppError::Internal(format!(
            "persisted placement '{}' is invalid: {error}",
            row.id
        ))
    })
}

#[async_trait]
impl NavigationRepository for PostgresNavigationRepository {
    async fn list_nav_items(&self) -> AppResult<Vec<NavItem>> {
        let rows = sqlx::query_as::<_, NavItemRow>(
            r#"
            SELECT id, label, route, icon, description, is_external, kind
            FROM nav_items
            ORDER BY label, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Store(format!("failed to list nav items: {error}")))?;

        rows.into_iter().map(nav_item_from_row).collect()
    }

    async fn create_nav_item(&self, item: NavItem) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO nav_items (id, label, route, icon, description, is_external, kind)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item.id().as_uuid())
        .bind(item.label().as_str())
        .bind(item.route())
        .bind(item.icon().as_str())
        .bind(item.description())
        .bind(item.is_external())
        .bind(item.kind().as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return Err(AppError::Conflict(format!(
                        "nav item '{}' already exists",
                        item.id()
                    )));
                }

                Err(AppError::Store(format!("failed to create nav item: {error}")))
            }
        }
    }

    async fn update_nav_item(&self, item: NavItem) -> AppResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE nav_items
            SET label = $2,
                route = $3,
                icon = $4,
                description = $5,
                is_external = $6,
                kind = $7
            WHERE id = $1
            "#,
        )
        .bind(item.id().as_uuid())
        .bind(item.label().as_str())
        .bind(item.route())
        .bind(item.icon().as_str())
        .bind(item.description())
        .bind(item.is_external())
        .bind(item.kind().as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Store(format!("failed to update nav item: {error}")))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "nav item '{}' does not exist",
                item.id()
            )));
        }

        Ok(())
    }

    async fn delete_nav_item(&self, nav_item_id: NavItemId) -> AppResult<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM nav_items
            WHERE id = $1
            "#,
        )
        .bind(nav_item_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Store(format!("failed to delete nav item: {error}")))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "nav item '{nav_item_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn list_placements(&self, role: Role) -> AppResult<Vec<NavPlacement>> {
        let rows = sqlx::query_as::<_, NavPlacementRow>(
            r#"
            SELECT id, nav_item_id, role, parent_nav_item_id, order_index
            FROM nav_placements
            WHERE role = $1
            ORDER BY order_index, id
            "#,
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Store(format!(
                "failed to list placements for role '{}': {error}",
                role.as_str()
            ))
        })?;

        rows.into_iter().map(placement_from_row).collect()
    }

    async fn create_placement(&self, placement: NavPlacement) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO nav_placements (id, nav_item_id, role, parent_nav_item_id, order_index)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(placement.id().as_uuid())
        .bind(placement.nav_item_id().as_uuid())
        .bind(placement.role().as_str())
        .bind(placement.parent_nav_item_id().map(|id| id.as_uuid()))
        .bind(placement.order_index())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return Err(AppError::Conflict(format!(
                        "nav item '{}' is already placed for role '{}'",
                        placement.nav_item_id(),
                        placement.role().as_str()
                    )));
                }

                Err(AppError::Store(format!(
                    "failed to create placement: {error}"
                )))
            }
        }
    }

    async fn update_placement(&self, placement: NavPlacement) -> AppResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE nav_placements
            SET parent_nav_item_id = $2,
                order_index = $3
            WHERE id = $1
            "#,
        )
        .bind(placement.id().as_uuid())
        .bind(placement.parent_nav_item_id().map(|id| id.as_uuid()))
        .bind(placement.order_index())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Store(format!("failed to update placement: {error}")))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "placement '{}' does not exist",
                placement.id()
            )));
        }

        Ok(())
    }

    async fn delete_placement(&self, placement_id: PlacementId) -> AppResult<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM nav_placements
            WHERE id = $1
            "#,
        )
        .bind(placement_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Store(format!("failed to delete placement: {error}")))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "placement '{placement_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn delete_all_placements(&self, role: Role) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM nav_placements
            WHERE role = $1
            "#,
        )
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Store(format!(
                "failed to delete placements for role '{}': {error}",
                role.as_str()
            ))
        })?;

        Ok(())
    }
}
