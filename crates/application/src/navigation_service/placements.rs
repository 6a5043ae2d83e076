use super::*;

impl NavigationService {
    /// Attaches a catalog item to a role's menu, appended at the end of
    /// the target sibling group.
    pub async fn attach_item(
        &self,
        actor: &UserIdentity,
        input: AttachItemInput,
    ) -> AppResult<NavPlacement> {
        self.require_admin(actor)?;

        let item = self.require_nav_item(input.nav_item_id).await?;
        let placements = self.repository.list_placements(input.role).await?;

        let already_placed = placements
            .iter()
            .any(|placement| placement.nav_item_id() == input.nav_item_id);
        if already_placed {
            return Err(AppError::Validation(format!(
                "nav item '{}' is already placed for role '{}'",
                item.label().as_str(),
                input.role.as_str()
            )));
        }

        if let Some(parent_id) = input.parent_nav_item_id {
            self.require_parent_placement(input.role, parent_id, &placements)
                .await?;
        }

        // Append after the highest stored order; a count-based index
        // can land mid-group when stored orders carry gaps.
        let order_index = placements
            .iter()
            .filter(|placement| placement.parent_nav_item_id() == input.parent_nav_item_id)
            .map(|placement| placement.order_index())
            .max()
            .map_or(0, |max_order| max_order.saturating_add(1));

        let placement = NavPlacement::new(
            PlacementId::new(),
            input.nav_item_id,
            input.role,
            input.parent_nav_item_id,
            order_index,
        )?;
        self.repository.create_placement(placement.clone()).await?;
        self.reconcile_role_internal(input.role).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::NavigationPlacementAttached,
                resource_type: "nav_placement".to_owned(),
                resource_id: placement.id().to_string(),
                detail: Some(format!(
                    "attached nav item '{}' to role '{}' menu",
                    item.label().as_str(),
                    input.role.as_str()
                )),
            })
            .await?;

        Ok(placement)
    }

    /// Reparents or reorders one placement. The moved placement lands
    /// after `drop_after_placement_id` in the destination group, or at
    /// the end of the group when no drop target is given. Rejected
    /// moves leave stored state untouched.
    pub async fn move_placement(
        &self,
        actor: &UserIdentity,
        input: MovePlacementInput,
    ) -> AppResult<NavPlacement> {
        self.require_admin(actor)?;

        let placements = self.repository.list_placements(input.role).await?;
        let moved = placements
            .iter()
            .find(|placement| placement.id() == input.placement_id)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "placement '{}' does not exist for role '{}'",
                    input.placement_id,
                    input.role.as_str()
                ))
            })?;
        let item = self.require_nav_item(moved.nav_item_id()).await?;

        if input.new_parent_nav_item_id == Some(moved.nav_item_id()) {
            return Err(AppError::Validation(format!(
                "nav item '{}' cannot become its own parent",
                item.label().as_str()
            )));
        }

        if let Some(parent_id) = input.new_parent_nav_item_id {
            let descendants = tree::collect_descendant_ids(moved.nav_item_id(), &placements);
            if descendants.contains(&parent_id) {
                return Err(AppError::Validation(format!(
                    "moving nav item '{}' under one of its descendants would create a cycle",
                    item.label().as_str()
                )));
            }

            self.require_parent_placement(input.role, parent_id, &placements)
                .await?;
        }

        let mut destination: Vec<&NavPlacement> = placements
            .iter()
            .filter(|placement| {
                placement.parent_nav_item_id() == input.new_parent_nav_item_id
                    && placement.id() != moved.id()
            })
            .collect();
        destination.sort_by(|left, right| {
            left.order_index()
                .cmp(&right.order_index())
                .then_with(|| left.id().as_uuid().cmp(&right.id().as_uuid()))
        });

        let insert_position = match input.drop_after_placement_id {
            None => destination.len(),
            Some(target_id) => {
                let position = destination
                    .iter()
                    .position(|placement| placement.id() == target_id)
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "drop target '{target_id}' is not a sibling in the destination group"
                        ))
                    })?;
                position + 1
            }
        };

        let mut group: Vec<NavPlacement> = destination.into_iter().cloned().collect();
        group.insert(insert_position, moved.clone());

        let mut updated_moved = moved.clone();
        for (position, row) in group.iter().enumerate() {
            let order_index = i32::try_from(position)
                .map_err(|_| AppError::Internal("sibling group exceeds i32 range".to_owned()))?;
            let updated = row.repositioned(input.new_parent_nav_item_id, order_index)?;
            if updated != *row {
                self.repository.update_placement(updated.clone()).await?;
            }
            if updated.id() == moved.id() {
                updated_moved = updated;
            }
        }

        // Restores density in the group the placement left.
        self.reconcile_role_internal(input.role).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::NavigationPlacementMoved,
                resource_type: "nav_placement".to_owned(),
                resource_id: updated_moved.id().to_string(),
                detail: Some(format!(
                    "moved nav item '{}' to position {} for role '{}'",
                    item.label().as_str(),
                    updated_moved.order_index(),
                    input.role.as_str()
                )),
            })
            .await?;

        Ok(updated_moved)
    }

    /// Removes one placement from a role's menu. While the placement
    /// still has children, the call is rejected unless `cascade` is
    /// set, in which case the entire subtree of placements is removed.
    /// Returns the number of placements removed.
    pub async fn detach_placement(
        &self,
        actor: &UserIdentity,
        role: Role,
        placement_id: PlacementId,
        cascade: bool,
    ) -> AppResult<usize> {
        self.require_admin(actor)?;

        let placements = self.repository.list_placements(role).await?;
        let target = placements
            .iter()
            .find(|placement| placement.id() == placement_id)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "placement '{placement_id}' does not exist for role '{}'",
                    role.as_str()
                ))
            })?;
        let item = self.require_nav_item(target.nav_item_id()).await?;

        let has_children = placements
            .iter()
            .any(|placement| placement.parent_nav_item_id() == Some(target.nav_item_id()));
        if has_children && !cascade {
            return Err(AppError::Validation(format!(
                "nav item '{}' still has children for role '{}'; detach with cascade to remove the subtree",
                item.label().as_str(),
                role.as_str()
            )));
        }

        let mut removed_ids = vec![target.id()];
        if cascade {
            let descendants = tree::collect_descendant_ids(target.nav_item_id(), &placements);
            removed_ids.extend(
                placements
                    .iter()
                    .filter(|placement| descendants.contains(&placement.nav_item_id()))
                    .map(|placement| placement.id()),
            );
        }

        for removed_id in &removed_ids {
            self.repository.delete_placement(*removed_id).await?;
        }
        self.reconcile_role_internal(role).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::NavigationPlacementDetached,
                resource_type: "nav_placement".to_owned(),
                resource_id: target.id().to_string(),
                detail: Some(format!(
                    "detached nav item '{}' from role '{}' menu, removing {} placement(s)",
                    item.label().as_str(),
                    role.as_str(),
                    removed_ids.len()
                )),
            })
            .await?;

        Ok(removed_ids.len())
    }
}
