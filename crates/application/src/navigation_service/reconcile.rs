use tracing::info;

use super::*;

pub(crate) struct ReconcileOutcome {
    pub(crate) placements: Vec<NavPlacement>,
    pub(crate) changed: Vec<NavPlacement>,
    pub(crate) re_rooted: usize,
    pub(crate) reordered: usize,
}

/// Recomputes consistent parents and dense sibling orders for one
/// role's placement rows, without touching storage. Parents pointing at
/// items with no active placement, at non-container items, or into a
/// parent cycle are re-rooted; every sibling group is renumbered to a
/// gapless `0..n-1` sequence ordered by stored index with placement id
/// as the tie break.
pub(crate) fn reconcile_placements(
    items: &[NavItem],
    placements: &[NavPlacement],
) -> AppResult<ReconcileOutcome> {
    let container_items: HashSet<NavItemId> = items
        .iter()
        .filter(|item| item.allows_children())
        .map(|item| item.id())
        .collect();
    let active_items: HashSet<NavItemId> = placements
        .iter()
        .map(|placement| placement.nav_item_id())
        .collect();

    let mut corrected_parents: HashMap<PlacementId, Option<NavItemId>> = HashMap::new();
    let mut re_rooted = 0usize;
    for placement in placements {
        let parent = placement.parent_nav_item_id().filter(|parent_id| {
            active_items.contains(parent_id) && container_items.contains(parent_id)
        });
        if parent != placement.parent_nav_item_id() {
            re_rooted += 1;
        }
        corrected_parents.insert(placement.id(), parent);
    }

    // Rows never reached from the root group sit inside a parent cycle.
    // Re-root one row per pass, smallest placement id first, until every
    // row is reachable.
    loop {
        let reached = reached_items(&corrected_parents, placements);
        let mut cycled: Vec<&NavPlacement> = placements
            .iter()
            .filter(|placement| !reached.contains(&placement.nav_item_id()))
            .collect();
        if cycled.is_empty() {
            break;
        }

        cycled.sort_by_key(|placement| placement.id().as_uuid());
        if let Some(placement) = cycled.first() {
            corrected_parents.insert(placement.id(), None);
            re_rooted += 1;
        }
    }

    let mut groups: HashMap<Option<NavItemId>, Vec<&NavPlacement>> = HashMap::new();
    for placement in placements {
        let parent = corrected_parents.get(&placement.id()).copied().flatten();
        groups.entry(parent).or_default().push(placement);
    }

    let mut group_keys: Vec<Option<NavItemId>> = groups.keys().copied().collect();
    group_keys.sort_by_key(|key| key.map(|nav_item_id| nav_item_id.as_uuid()));

    let mut corrected = Vec::with_capacity(placements.len());
    let mut changed = Vec::new();
    let mut reordered = 0usize;
    for key in group_keys {
        let Some(group) = groups.get_mut(&key) else {
            continue;
        };
        group.sort_by(|left, right| {
            left.order_index()
                .cmp(&right.order_index())
                .then_with(|| left.id().as_uuid().cmp(&right.id().as_uuid()))
        });

        for (position, placement) in group.iter().enumerate() {
            let order_index = i32::try_from(position)
                .map_err(|_| AppError::Internal("sibling group exceeds i32 range".to_owned()))?;
            if order_index != placement.order_index() {
                reordered += 1;
            }

            let updated = placement.repositioned(key, order_index)?;
            if updated != **placement {
                changed.push(updated.clone());
            }
            corrected.push(updated);
        }
    }

    Ok(ReconcileOutcome {
        placements: corrected,
        changed,
        re_rooted,
        reordered,
    })
}

fn reached_items(
    corrected_parents: &HashMap<PlacementId, Option<NavItemId>>,
    placements: &[NavPlacement],
) -> HashSet<NavItemId> {
    let mut reached: HashSet<NavItemId> = HashSet::new();
    let mut changed = true;
    while changed {
        changed = false;
        for placement in placements {
            if reached.contains(&placement.nav_item_id()) {
                continue;
            }

            let parent = corrected_parents.get(&placement.id()).copied().flatten();
            let is_reached = match parent {
                None => true,
                Some(parent_id) => reached.contains(&parent_id),
            };
            if is_reached {
                reached.insert(placement.nav_item_id());
                changed = true;
            }
        }
    }

    reached
}

impl NavigationService {
    /// Runs an explicit repair pass over one role's placements and
    /// persists every corrected row.
    pub async fn reconcile_role(
        &self,
        actor: &UserIdentity,
        role: Role,
    ) -> AppResult<ReconcileReport> {
        self.require_admin(actor)?;
        self.reconcile_role_internal(role).await
    }

    pub(super) async fn reconcile_role_internal(&self, role: Role) -> AppResult<ReconcileReport> {
        let items = self.repository.list_nav_items().await?;
        let placements = self.repository.list_placements(role).await?;
        let outcome = reconcile_placements(&items, &placements)?;

        for placement in &outcome.changed {
            self.repository.update_placement(placement.clone()).await?;
        }

        let report = ReconcileReport {
            role,
            re_rooted: outcome.re_rooted,
            reordered: outcome.reordered,
            rows_rewritten: outcome.changed.len(),
        };
        if !report.is_clean() {
            info!(
                role = role.as_str(),
                re_rooted = report.re_rooted,
                reordered = report.reordered,
                rows_rewritten = report.rows_rewritten,
                "repaired navigation placements"
            );
        }

        Ok(report)
    }
}
