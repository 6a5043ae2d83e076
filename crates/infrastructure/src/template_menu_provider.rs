use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use academia_application::{DefaultMenuProvider, NavigationRepository};
use academia_core::{AppError, AppResult, Role};
use academia_domain::{
    MESSAGES_ROUTE, MenuTemplate, MenuTemplateEntry, NavItem, NavItemId, NavItemKind, NavPlacement,
    PlacementId,
};

/// Default-menu provider applying built-in per-role templates. Catalog
/// items are matched by label and kind: an existing item is reused as
/// is, so admin edits to shared entries survive a re-bootstrap.
pub struct TemplateMenuProvider {
    repository: Arc<dyn NavigationRepository>,
}

impl TemplateMenuProvider {
    /// Creates a provider writing through the given repository.
    #[must_use]
    pub fn new(repository: Arc<dyn NavigationRepository>) -> Self {
        Self { repository }
    }

    fn template_for(role: Role) -> AppResult<MenuTemplate> {
        let mut entries = vec![
            route_entry("Home", "/dashboard/home", "home")?,
        ];

        match role {
            Role::Student => {
                entries.push(route_entry("My courses", "/dashboard/courses", "book-open")?);
                entries.push(resources_section()?);
            }
            Role::Professor => {
                entries.push(category_entry(
                    "Teaching",
                    "graduation-cap",
                    vec![
                        route_entry("Gradebook", "/dashboard/teaching/gradebook", "clipboard")?,
                        route_entry(
                            "Course builder",
                            "/dashboard/teaching/builder",
                            "layout",
                        )?,
                    ],
                )?);
                entries.push(resources_section()?);
            }
            Role::Tutor => {
                entries.push(route_entry("My groups", "/dashboard/tutoring/groups", "users")?);
                entries.push(route_entry(
                    "Follow-ups",
                    "/dashboard/tutoring/follow-ups",
                    "clipboard",
                )?);
            }
            Role::Director | Role::DeputyDirector => {
                entries.push(route_entry("Staff", "/dashboard/management/staff", "users")?);
                entries.push(category_entry(
                    "Reports",
                    "bar-chart",
                    vec![
                        route_entry(
                            "Enrollment report",
                            "/dashboard/reports/enrollment",
                            "trending-up",
                        )?,
                        route_entry(
                            "Attendance report",
                            "/dashboard/reports/attendance",
                            "check-square",
                        )?,
                    ],
                )?);
            }
            Role::Administrator => {
                entries.push(category_entry(
                    "Administration",
                    "shield",
                    vec![
                        route_entry("User management", "/dashboard/admin/users", "users")?,
                        route_entry(
                            "Navigation settings",
                            "/dashboard/admin/navigation",
                            "settings",
                        )?,
                        route_entry("Audit log", "/dashboard/admin/audit", "list")?,
                    ],
                )?);
            }
        }

        entries.push(route_entry("Calendar", "/dashboard/calendar", "calendar")?);
        entries.push(route_entry("Messages", MESSAGES_ROUTE, "mail")?);

        MenuTemplate::new(role, entries)
    }

    async fn find_or_create_item(
        &self,
        catalog: &mut Vec<NavItem>,
        entry: &MenuTemplateEntry,
    ) -> AppResult<NavItem> {
        let existing = catalog.iter().find(|item| {
            item.label().as_str() == entry.label().as_str() && item.kind() == entry.kind()
        });
        if let Some(item) = existing {
            return Ok(item.clone());
        }

        let item = NavItem::new(
            NavItemId::new(),
            entry.label().as_str(),
            entry.route().map(ToOwned::to_owned),
            entry.icon().as_str(),
            entry.description().map(ToOwned::to_owned),
            entry.is_external(),
            entry.kind(),
        )?;
        self.repository.create_nav_item(item.clone()).await?;
        catalog.push(item.clone());

        Ok(item)
    }
}

fn route_entry(label: &str, route: &str, icon: &str) -> AppResult<MenuTemplateEntry> {
    MenuTemplateEntry::new(
        label,
        Some(route.to_owned()),
        icon,
        None,
        false,
        NavItemKind::Route,
        Vec::new(),
    )
}

fn category_entry(
    label: &str,
    icon: &str,
    children: Vec<MenuTemplateEntry>,
) -> AppResult<MenuTemplateEntry> {
    MenuTemplateEntry::new(label, None, icon, None, false, NavItemKind::Category, children)
}

fn resources_section() -> AppResult<MenuTemplateEntry> {
    category_entry(
        "Resources",
        "library",
        vec![
            route_entry("Library", "/dashboard/library", "book")?,
            MenuTemplateEntry::new(
                "Campus portal",
                Some("https://campus.academia.example/portal".to_owned()),
                "globe",
                None,
                true,
                NavItemKind::Route,
                Vec::new(),
            )?,
        ],
    )
}

#[async_trait]
impl DefaultMenuProvider for TemplateMenuProvider {
    async fn bootstrap_role(&self, role: Role) -> AppResult<usize> {
        let template = Self::template_for(role)?;

        self.repository.delete_all_placements(role).await?;
        let mut catalog = self.repository.list_nav_items().await?;

        let mut seeded = 0usize;
        let mut pending: Vec<(Option<NavItemId>, Vec<MenuTemplateEntry>)> =
            vec![(None, template.entries().to_vec())];
        while let Some((parent, entries)) = pending.pop() {
            for (position, entry) in entries.iter().enumerate() {
                let item = self.find_or_create_item(&mut catalog, entry).await?;
                let order_index = i32::try_from(position).map_err(|_| {
                    AppError::Internal("template sibling group exceeds i32 range".to_owned())
                })?;

                let placement =
                    NavPlacement::new(PlacementId::new(), item.id(), role, parent, order_index)?;
                self.repository.create_placement(placement).await?;
                seeded += 1;

                if !entry.children().is_empty() {
                    pending.push((Some(item.id()), entry.children().to_vec()));
                }
            }
        }

        debug!(
            role = role.as_str(),
            placements = seeded,
            "applied default menu template"
        );

        Ok(seeded)
    }
}
