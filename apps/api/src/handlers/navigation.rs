use academia_application::{
    AttachItemInput, AuditLogQuery, CreateNavItemInput, MovePlacementInput, UpdateNavItemInput,
};
use academia_core::{AppError, Role, UserIdentity};
use academia_domain::{NavItemId, NavItemKind, PlacementId};
use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use crate::dto::{
    AttachItemRequest, AuditLogEntryResponse, CreateNavItemRequest, MovePlacementRequest,
    NavItemResponse, NavTreeNodeResponse, PlacementResponse, ReconcileReportResponse,
    ReinitializeResponse, RemovedPlacementsResponse, UpdateNavItemRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn menu_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<NavTreeNodeResponse>>> {
    let menu = state.navigation_service.menu_for(&user).await?;
    let nodes = menu.iter().map(NavTreeNodeResponse::from).collect();

    Ok(Json(nodes))
}

pub async fn list_nav_items_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<NavItemResponse>>> {
    let items = state
        .navigation_service
        .list_nav_items(&user)
        .await?
        .into_iter()
        .map(NavItemResponse::from)
        .collect();

    Ok(Json(items))
}

pub async fn create_nav_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateNavItemRequest>,
) -> ApiResult<(StatusCode, Json<NavItemResponse>)> {
    let item = state
        .navigation_service
        .create_nav_item(
            &user,
            CreateNavItemInput {
                label: payload.label,
                route: payload.route,
                icon: payload.icon,
                description: payload.description,
                external: payload.is_external,
                kind: NavItemKind::from(payload.kind),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(NavItemResponse::from(item))))
}

pub async fn update_nav_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(nav_item_id): Path<String>,
    Json(payload): Json<UpdateNavItemRequest>,
) -> ApiResult<Json<NavItemResponse>> {
    let nav_item_id = parse_nav_item_id(nav_item_id.as_str())?;
    let item = state
        .navigation_service
        .update_nav_item(
            &user,
            nav_item_id,
            UpdateNavItemInput {
                label: payload.label,
                route: payload.route,
                icon: payload.icon,
                description: payload.description,
                external: payload.is_external,
                kind: NavItemKind::from(payload.kind),
            },
        )
        .await?;

    Ok(Json(NavItemResponse::from(item)))
}

pub async fn delete_nav_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(nav_item_id): Path<String>,
) -> ApiResult<StatusCode> {
    let nav_item_id = parse_nav_item_id(nav_item_id.as_str())?;
    state
        .navigation_service
        .delete_nav_item(&user, nav_item_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn role_tree_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role): Path<String>,
) -> ApiResult<Json<Vec<NavTreeNodeResponse>>> {
    let role = role.parse::<Role>()?;
    let tree = state.navigation_service.role_tree(&user, role).await?;
    let nodes = tree.iter().map(NavTreeNodeResponse::from).collect();

    Ok(Json(nodes))
}

pub async fn attach_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role): Path<String>,
    Json(payload): Json<AttachItemRequest>,
) -> ApiResult<(StatusCode, Json<PlacementResponse>)> {
    let role = role.parse::<Role>()?;
    let nav_item_id = parse_nav_item_id(payload.nav_item_id.as_str())?;
    let parent_nav_item_id = payload
        .parent_nav_item_id
        .as_deref()
        .map(parse_nav_item_id)
        .transpose()?;

    let placement = state
        .navigation_service
        .attach_item(
            &user,
            AttachItemInput {
                role,
                nav_item_id,
                parent_nav_item_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PlacementResponse::from(placement))))
}

pub async fn move_placement_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((role, placement_id)): Path<(String, String)>,
    Json(payload): Json<MovePlacementRequest>,
) -> ApiResult<Json<PlacementResponse>> {
    let role = role.parse::<Role>()?;
    let placement_id = parse_placement_id(placement_id.as_str())?;
    let new_parent_nav_item_id = payload
        .new_parent_nav_item_id
        .as_deref()
        .map(parse_nav_item_id)
        .transpose()?;
    let drop_after_placement_id = payload
        .drop_after_placement_id
        .as_deref()
        .map(parse_placement_id)
        .transpose()?;

    let placement = state
        .navigation_service
        .move_placement(
            &user,
            MovePlacementInput {
                role,
                placement_id,
                new_parent_nav_item_id,
                drop_after_placement_id,
            },
        )
        .await?;

    Ok(Json(PlacementResponse::from(placement)))
}

#[derive(Debug, serde::Deserialize)]
pub struct DetachQuery {
    #[serde(default)]
    pub cascade: bool,
}

pub async fn detach_placement_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((role, placement_id)): Path<(String, String)>,
    Query(query): Query<DetachQuery>,
) -> ApiResult<Json<RemovedPlacementsResponse>> {
    let role = role.parse::<Role>()?;
    let placement_id = parse_placement_id(placement_id.as_str())?;
    let removed = state
        .navigation_service
        .detach_placement(&user, role, placement_id, query.cascade)
        .await?;

    Ok(Json(RemovedPlacementsResponse { removed }))
}

pub async fn reset_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role): Path<String>,
) -> ApiResult<Json<RemovedPlacementsResponse>> {
    let role = role.parse::<Role>()?;
    let removed = state.navigation_service.reset_role(&user, role).await?;

    Ok(Json(RemovedPlacementsResponse { removed }))
}

pub async fn bootstrap_defaults_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role): Path<String>,
) -> ApiResult<Json<Vec<NavTreeNodeResponse>>> {
    let role = role.parse::<Role>()?;
    let tree = state
        .navigation_service
        .bootstrap_defaults(&user, role)
        .await?;
    let nodes = tree.iter().map(NavTreeNodeResponse::from).collect();

    Ok(Json(nodes))
}

pub async fn reconcile_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role): Path<String>,
) -> ApiResult<Json<ReconcileReportResponse>> {
    let role = role.parse::<Role>()?;
    let report = state.navigation_service.reconcile_role(&user, role).await?;

    Ok(Json(ReconcileReportResponse::from(report)))
}

pub async fn reinitialize_all_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<ReinitializeResponse>> {
    let completed = state.navigation_service.reinitialize_all(&user).await?;

    Ok(Json(ReinitializeResponse {
        completed_roles: completed.iter().map(Role::to_string).collect(),
    }))
}

#[derive(Debug, serde::Deserialize)]
pub struct AuditLogQueryParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub action: Option<String>,
    pub subject: Option<String>,
}

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<AuditLogQueryParams>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let entries = state
        .navigation_service
        .list_audit_log(
            &user,
            AuditLogQuery {
                limit: query.limit.unwrap_or(50),
                offset: query.offset.unwrap_or(0),
                action: query.action,
                subject: query.subject,
            },
        )
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

fn parse_nav_item_id(value: &str) -> Result<NavItemId, AppError> {
    uuid::Uuid::parse_str(value)
        .map(NavItemId::from_uuid)
        .map_err(|error| AppError::Validation(format!("invalid nav item id '{value}': {error}")))
}

fn parse_placement_id(value: &str) -> Result<PlacementId, AppError> {
    uuid::Uuid::parse_str(value)
        .map(PlacementId::from_uuid)
        .map_err(|error| AppError::Validation(format!("invalid placement id '{value}': {error}")))
}
