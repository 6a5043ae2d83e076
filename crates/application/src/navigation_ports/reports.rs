use academia_core::Role;

/// Summary of one reconciliation pass over a role's placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Role that was reconciled.
    pub role: Role,
    /// Placements re-rooted because their parent was missing, inactive,
    /// not a container, or part of a cycle.
    pub re_rooted: usize,
    /// Placements whose order index was rewritten to restore dense
    /// sibling sequences.
    pub reordered: usize,
    /// Placement rows persisted by the pass.
    pub rows_rewritten: usize,
}

impl ReconcileReport {
    /// Returns whether the pass found nothing to repair.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rows_rewritten == 0
    }
}
