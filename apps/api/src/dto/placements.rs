use academia_application::ReconcileReport;
use academia_domain::NavPlacement;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for attaching a catalog item to a role menu.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/attach-item-request.ts"
)]
pub struct AttachItemRequest {
    pub nav_item_id: String,
    pub parent_nav_item_id: Option<String>,
}

/// Incoming payload for a drag-and-drop placement move.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/move-placement-request.ts"
)]
pub struct MovePlacementRequest {
    pub new_parent_nav_item_id: Option<String>,
    pub drop_after_placement_id: Option<String>,
}

/// API representation of one role placement row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/placement-response.ts"
)]
pub struct PlacementResponse {
    pub id: String,
    pub nav_item_id: String,
    pub role: String,
    pub parent_nav_item_id: Option<String>,
    pub order_index: i32,
}

impl From<NavPlacement> for PlacementResponse {
    fn from(value: NavPlacement) -> Self {
        Self {
            id: value.id().to_string(),
            nav_item_id: value.nav_item_id().to_string(),
            role: value.role().to_string(),
            parent_nav_item_id: value.parent_nav_item_id().map(|id| id.to_string()),
            order_index: value.order_index(),
        }
    }
}

/// Count of placements removed by a detach or role reset.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/removed-placements-response.ts"
)]
pub struct RemovedPlacementsResponse {
    pub removed: usize,
}

/// API representation of a reconciliation repair report.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reconcile-report-response.ts"
)]
pub struct ReconcileReportResponse {
    pub role: String,
    pub re_rooted: usize,
    pub reordered: usize,
    pub rows_rewritten: usize,
    pub clean: bool,
}

impl From<ReconcileReport> for ReconcileReportResponse {
    fn from(value: ReconcileReport) -> Self {
        let clean = value.is_clean();

        Self {
            role: value.role.to_string(),
            re_rooted: value.re_rooted,
            reordered: value.reordered,
            rows_rewritten: value.rows_rewritten,
            clean,
        }
    }
}

/// Roles rebuilt by a full menu reinitialization.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reinitialize-response.ts"
)]
pub struct ReinitializeResponse {
    pub completed_roles: Vec<String>,
}
