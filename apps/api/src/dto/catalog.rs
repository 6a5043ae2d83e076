use academia_domain::{NavItem, NavItemKind};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Wire representation of a nav item kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/nav-item-kind.ts"
)]
pub enum NavItemKindDto {
    Route,
    Category,
}

impl From<NavItemKindDto> for NavItemKind {
    fn from(value: NavItemKindDto) -> Self {
        match value {
            NavItemKindDto::Route => Self::Route,
            NavItemKindDto::Category => Self::Category,
        }
    }
}

impl From<NavItemKind> for NavItemKindDto {
    fn from(value: NavItemKind) -> Self {
        match value {
            NavItemKind::Route => Self::Route,
            NavItemKind::Category => Self::Category,
        }
    }
}

/// Incoming payload for catalog item creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-nav-item-request.ts"
)]
pub struct CreateNavItemRequest {
    pub label: String,
    pub route: Option<String>,
    pub icon: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_external: bool,
    pub kind: NavItemKindDto,
}

/// Incoming payload for catalog item updates.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-nav-item-request.ts"
)]
pub struct UpdateNavItemRequest {
    pub label: String,
    pub route: Option<String>,
    pub icon: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_external: bool,
    pub kind: NavItemKindDto,
}

/// API representation of a catalog item.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/nav-item-response.ts"
)]
pub struct NavItemResponse {
    pub id: String,
    pub label: String,
    pub route: Option<String>,
    pub icon: String,
    pub description: Option<String>,
    pub is_external: bool,
    pub kind: NavItemKindDto,
}

impl From<NavItem> for NavItemResponse {
    fn from(value: NavItem) -> Self {
        Self {
            id: value.id().to_string(),
            label: value.label().as_str().to_owned(),
            route: value.route().map(ToOwned::to_owned),
            icon: value.icon().as_str().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            is_external: value.is_external(),
            kind: NavItemKindDto::from(value.kind()),
        }
    }
}
