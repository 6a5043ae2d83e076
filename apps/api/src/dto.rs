mod audit;
mod catalog;
mod common;
mod menu;
mod placements;

pub use audit::AuditLogEntryResponse;
pub use catalog::{CreateNavItemRequest, NavItemKindDto, NavItemResponse, UpdateNavItemRequest};
pub use common::HealthResponse;
pub use menu::NavTreeNodeResponse;
pub use placements::{
    AttachItemRequest, MovePlacementRequest, PlacementResponse, ReconcileReportResponse,
    ReinitializeResponse, RemovedPlacementsResponse,
};
