use academia_core::{AppResult, Role};
use async_trait::async_trait;

/// Port for the external default-menu collaborator. Implementations own
/// the template content and write catalog items and placements through
/// the repository; the engine only re-reconciles afterwards.
#[async_trait]
pub trait DefaultMenuProvider: Send + Sync {
    /// Replaces the role's menu with its standard starter layout and
    /// returns the number of placements written.
    async fn bootstrap_role(&self, role: Role) -> AppResult<usize>;
}

/// Port for the external messaging collaborator supplying unread
/// counts. Decoration only; readers tolerate failures.
#[async_trait]
pub trait UnreadBadgeProvider: Send + Sync {
    /// Returns the unread message count for one subject.
    async fn unread_count(&self, subject: &str) -> AppResult<u32>;
}
