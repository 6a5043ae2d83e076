//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_unread_badge_provider;
mod in_memory_audit_repository;
mod in_memory_navigation_repository;
mod postgres_audit_log_repository;
mod postgres_audit_repository;
mod postgres_navigation_repository;
mod template_menu_provider;
mod zero_unread_badge_provider;

pub use http_unread_badge_provider::HttpUnreadBadgeProvider;
pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use in_memory_navigation_repository::InMemoryNavigationRepository;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_navigation_repository::PostgresNavigationRepository;
pub use template_menu_provider::TemplateMenuProvider;
pub use zero_unread_badge_provider::ZeroUnreadBadgeProvider;
