//! Projects session, loan and catalog state onto page slots.
//!
//! Every method is an idempotent projection: it reads domain state and
//! rewrites slots, never the other way around.

use anyhow::{Context, Result};
use library_core::{CatalogRegistry, LoanRegistry};
use minijinja::{context, Environment};
use serde::Serialize;
use shared::{
    domain::{CategoryId, Loan, Locale, UserProfile},
    protocol::ProfileField,
};

use crate::ui::{
    notifications::NotificationCenter,
    page::{Page, Slot, StatSlot},
    strings::Strings,
};

const BOOKS_GRID: &str = "books_grid.html";
const EMPTY_STATE: &str = "empty_state.html";
const NOTIFICATIONS: &str = "notifications.html";
const CATEGORY_LINKS: &str = "category_links.html";

#[derive(Serialize)]
struct BookCard<'a> {
    id: i64,
    cover: &'a str,
    title: &'a str,
    author: &'a str,
    due_label: String,
}

#[derive(Serialize)]
struct AlertView<'a> {
    id: u64,
    severity: &'static str,
    icon: &'static str,
    message: &'a str,
}

#[derive(Serialize)]
struct CategoryLink<'a> {
    id: &'a str,
    name: &'a str,
    icon: &'a str,
    active: bool,
}

pub struct ViewRenderer {
    env: Environment<'static>,
    strings: Strings,
}

impl ViewRenderer {
    pub fn new(locale: Locale) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(BOOKS_GRID, include_str!("../../templates/books_grid.html"))?;
        env.add_template(EMPTY_STATE, include_str!("../../templates/empty_state.html"))?;
        env.add_template(NOTIFICATIONS, include_str!("../../templates/notifications.html"))?;
        env.add_template(
            CATEGORY_LINKS,
            include_str!("../../templates/category_links.html"),
        )?;
        Ok(Self {
            env,
            strings: Strings::for_locale(locale),
        })
    }

    pub fn strings(&self) -> &Strings {
        &self.strings
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        self.env
            .get_template(name)?
            .render(ctx)
            .with_context(|| format!("failed to render template '{name}'"))
    }

    pub fn render_notifications(
        &self,
        page: &mut dyn Page,
        center: &NotificationCenter,
    ) -> Result<()> {
        if !page.has_slot(Slot::Notifications) {
            return Ok(());
        }
        let alerts: Vec<AlertView<'_>> = center
            .active()
            .iter()
            .map(|n| AlertView {
                id: n.id,
                severity: n.severity.css_suffix(),
                icon: n.severity.icon(),
                message: &n.message,
            })
            .collect();
        let html = self.render(NOTIFICATIONS, context! { alerts => alerts })?;
        page.set_html(Slot::Notifications, html);
        Ok(())
    }

    pub fn update_book_count(&self, page: &mut dyn Page, loans: &LoanRegistry) {
        page.set_text(Slot::BookCount, &loans.len().to_string());
    }

    pub fn update_user_info(&self, page: &mut dyn Page, user: Option<&UserProfile>) {
        let Some(user) = user else {
            return;
        };
        for slot in Slot::USER_NAME_DISPLAYS {
            page.set_text(slot, user.display_name());
        }
    }

    /// Reveals the avatar image when the session carries one; otherwise the
    /// placeholder is left as is.
    pub fn load_user_avatar(&self, page: &mut dyn Page, user: Option<&UserProfile>) {
        let Some(avatar) = user.and_then(|u| u.avatar.as_deref()) else {
            return;
        };
        if !page.has_slot(Slot::AvatarImage) || !page.has_slot(Slot::AvatarPlaceholder) {
            return;
        }
        page.set_image_source(Slot::AvatarImage, avatar);
        page.set_hidden(Slot::AvatarImage, false);
        page.set_hidden(Slot::AvatarPlaceholder, true);
    }

    pub fn render_books(&self, page: &mut dyn Page, books: &[&Loan]) -> Result<()> {
        if !page.has_slot(Slot::BooksGrid) {
            return Ok(());
        }

        let html = if books.is_empty() {
            self.render(
                EMPTY_STATE,
                context! {
                    title => self.strings.empty_title,
                    hint => self.strings.empty_hint,
                },
            )?
        } else {
            let cards: Vec<BookCard<'_>> = books
                .iter()
                .map(|loan| BookCard {
                    id: loan.id.0,
                    cover: &loan.cover,
                    title: &loan.title,
                    author: &loan.author,
                    due_label: self.strings.due_label(loan.due_date),
                })
                .collect();
            self.render(
                BOOKS_GRID,
                context! {
                    books => cards,
                    labels => context! {
                        read => self.strings.read_label,
                        renew => self.strings.renew_label,
                    },
                },
            )?
        };
        page.set_html(Slot::BooksGrid, html);
        Ok(())
    }

    /// Renders the loans filed under `category` (all loans for the
    /// catch-all). Returns how many cards were drawn.
    pub fn filter_books_by_category(
        &self,
        page: &mut dyn Page,
        loans: &LoanRegistry,
        category: &CategoryId,
    ) -> Result<usize> {
        let books = loans.books_in_category(category);
        self.render_books(page, &books)?;
        Ok(books.len())
    }

    pub fn render_category_links(
        &self,
        page: &mut dyn Page,
        catalog: &CatalogRegistry,
        active: &CategoryId,
    ) -> Result<()> {
        if !page.has_slot(Slot::CategoryList) {
            return Ok(());
        }
        let links: Vec<CategoryLink<'_>> = catalog
            .get_categories()
            .iter()
            .map(|c| CategoryLink {
                id: c.id.as_str(),
                name: &c.name,
                icon: &c.icon,
                active: &c.id == active,
            })
            .collect();
        let html = self.render(CATEGORY_LINKS, context! { categories => links })?;
        page.set_html(Slot::CategoryList, html);
        Ok(())
    }

    pub fn populate_profile(&self, page: &mut dyn Page, profile: &UserProfile) {
        for field in ProfileField::ALL {
            page.set_value(Slot::ProfileInput(field), field.read(profile));
        }

        let stats = &profile.stats;
        page.set_text(
            Slot::Stat(StatSlot::BooksRead),
            &stats.books_read.to_string(),
        );
        page.set_text(
            Slot::Stat(StatSlot::CurrentBooks),
            &stats.current_books.to_string(),
        );
        page.set_text(
            Slot::Stat(StatSlot::ReadingHours),
            &stats.reading_hours.to_string(),
        );
        let favorite = if stats.favorite_category.trim().is_empty() {
            self.strings.unspecified
        } else {
            stats.favorite_category.as_str()
        };
        page.set_text(Slot::Stat(StatSlot::FavoriteCategory), favorite);
    }
}

#[cfg(test)]
#[path = "tests/renderer_tests.rs"]
mod tests;
