use std::collections::VecDeque;

use tracing::warn;

use super::*;

/// Reference to one tree node by either of its two identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    /// Match on the placement id.
    Placement(PlacementId),
    /// Match on the catalog item id.
    Item(NavItemId),
}

/// Depth-first search over an ordered forest, matching either the
/// placement id or the catalog item id.
#[must_use]
pub fn find_node<'a>(nodes: &'a [NavTreeNode], reference: NodeRef) -> Option<&'a NavTreeNode> {
    for node in nodes {
        let matched = match reference {
            NodeRef::Placement(placement_id) => node.placement_id() == placement_id,
            NodeRef::Item(nav_item_id) => node.item().id() == nav_item_id,
        };
        if matched {
            return Some(node);
        }

        if let Some(found) = find_node(node.children(), reference) {
            return Some(found);
        }
    }

    None
}

pub(super) fn find_route(node: &NavTreeNode, route: &str) -> bool {
    node.item().route() == Some(route)
        || node.children().iter().any(|child| find_route(child, route))
}

/// Breadth-first walk over the flat placement list following parent
/// references, returning every item id reachable as a descendant of
/// `nav_item_id`. Used to block cycle-forming moves and to resolve
/// cascade scopes.
#[must_use]
pub fn collect_descendant_ids(
    nav_item_id: NavItemId,
    placements: &[NavPlacement],
) -> HashSet<NavItemId> {
    let mut descendants = HashSet::new();
    let mut queue = VecDeque::from([nav_item_id]);

    while let Some(current) = queue.pop_front() {
        for placement in placements {
            if placement.parent_nav_item_id() == Some(current)
                && descendants.insert(placement.nav_item_id())
            {
                queue.push_back(placement.nav_item_id());
            }
        }
    }

    descendants
}

/// Builds the ordered forest for one role from flat rows. Placements
/// whose item is missing from the catalog are logged and skipped, and
/// structural drift is corrected in memory only; stored rows are left
/// untouched.
pub(super) fn build_forest(
    role: Role,
    items: &[NavItem],
    placements: &[NavPlacement],
) -> AppResult<Vec<NavTreeNode>> {
    let corrected = reconcile_placements(items, placements)?.placements;
    let items_by_id: HashMap<NavItemId, &NavItem> =
        items.iter().map(|item| (item.id(), item)).collect();

    let mut groups: HashMap<Option<NavItemId>, Vec<&NavPlacement>> = HashMap::new();
    for placement in &corrected {
        if !items_by_id.contains_key(&placement.nav_item_id()) {
            warn!(
                role = role.as_str(),
                placement_id = %placement.id(),
                nav_item_id = %placement.nav_item_id(),
                "skipping placement with orphaned nav item reference"
            );
            continue;
        }

        groups
            .entry(placement.parent_nav_item_id())
            .or_default()
            .push(placement);
    }

    for group in groups.values_mut() {
        group.sort_by(|left, right| {
            left.order_index()
                .cmp(&right.order_index())
                .then_with(|| left.id().as_uuid().cmp(&right.id().as_uuid()))
        });
    }

    assemble_group(None, &groups, &items_by_id)
}

fn assemble_group(
    parent: Option<NavItemId>,
    groups: &HashMap<Option<NavItemId>, Vec<&NavPlacement>>,
    items_by_id: &HashMap<NavItemId, &NavItem>,
) -> AppResult<Vec<NavTreeNode>> {
    let Some(group) = groups.get(&parent) else {
        return Ok(Vec::new());
    };

    let mut nodes = Vec::with_capacity(group.len());
    for placement in group {
        let Some(item) = items_by_id.get(&placement.nav_item_id()) else {
            continue;
        };
        let children = assemble_group(Some(placement.nav_item_id()), groups, items_by_id)?;
        nodes.push(NavTreeNode::new((*item).clone(), placement.id(), children)?);
    }

    Ok(nodes)
}
