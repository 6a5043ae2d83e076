use async_trait::async_trait;

use academia_application::UnreadBadgeProvider;
use academia_core::AppResult;

/// Badge provider used when no messaging backend is configured. Every
/// subject reports zero unread messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroUnreadBadgeProvider;

#[async_trait]
impl UnreadBadgeProvider for ZeroUnreadBadgeProvider {
    async fn unread_count(&self, _subject: &str) -> AppResult<u32> {
        Ok(0)
    }
}
