use academia_domain::NavTreeNode;
use serde::Serialize;
use ts_rs::TS;

use super::NavItemKindDto;

/// API representation of one resolved navigation node.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/nav-tree-node-response.ts"
)]
pub struct NavTreeNodeResponse {
    pub nav_item_id: String,
    pub placement_id: String,
    pub label: String,
    pub route: Option<String>,
    pub icon: String,
    pub description: Option<String>,
    pub is_external: bool,
    pub kind: NavItemKindDto,
    pub badge_count: Option<u32>,
    pub children: Vec<NavTreeNodeResponse>,
}

impl From<&NavTreeNode> for NavTreeNodeResponse {
    fn from(value: &NavTreeNode) -> Self {
        Self {
            nav_item_id: value.item().id().to_string(),
            placement_id: value.placement_id().to_string(),
            label: value.item().label().as_str().to_owned(),
            route: value.item().route().map(ToOwned::to_owned),
            icon: value.item().icon().as_str().to_owned(),
            description: value.item().description().map(ToOwned::to_owned),
            is_external: value.item().is_external(),
            kind: NavItemKindDto::from(value.item().kind()),
            badge_count: value.badge_count(),
            children: value.children().iter().map(Self::from).collect(),
        }
    }
}
