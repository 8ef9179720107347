//! Named page slots and the in-memory document that hosts them.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use library_core::Route;
use minijinja::{context, Environment};
use serde::Serialize;
use shared::protocol::ProfileField;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatSlot {
    BooksRead,
    CurrentBooks,
    ReadingHours,
    FavoriteCategory,
}

/// Element slots the renderer and controller read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Notifications,
    UserName,
    WelcomeUserName,
    BookCount,
    AvatarImage,
    AvatarPlaceholder,
    FileInput,
    CategoryList,
    BooksGrid,
    LoginUsername,
    LoginPassword,
    ProfileInput(ProfileField),
    Stat(StatSlot),
}

impl Slot {
    /// Every slot that displays the session's name.
    pub const USER_NAME_DISPLAYS: [Slot; 2] = [Slot::UserName, Slot::WelcomeUserName];

    pub fn element_id(self) -> &'static str {
        match self {
            Slot::Notifications => "notifications",
            Slot::UserName => "userName",
            Slot::WelcomeUserName => "welcomeUserName",
            Slot::BookCount => "bookCount",
            Slot::AvatarImage => "avatarImage",
            Slot::AvatarPlaceholder => "avatarPlaceholder",
            Slot::FileInput => "fileInput",
            Slot::CategoryList => "categoryList",
            Slot::BooksGrid => "booksGrid",
            Slot::LoginUsername => "username",
            Slot::LoginPassword => "password",
            Slot::ProfileInput(field) => field.input_id(),
            Slot::Stat(StatSlot::BooksRead) => "booksRead",
            Slot::Stat(StatSlot::CurrentBooks) => "currentBooks",
            Slot::Stat(StatSlot::ReadingHours) => "readingHours",
            Slot::Stat(StatSlot::FavoriteCategory) => "favoriteCategory",
        }
    }
}

/// The presentation collaborator. Writes to slots the page lacks are
/// silently skipped.
pub trait Page {
    fn route(&self) -> Route;
    fn has_slot(&self, slot: Slot) -> bool;
    fn set_text(&mut self, slot: Slot, text: &str);
    fn set_html(&mut self, slot: Slot, html: String);
    fn set_hidden(&mut self, slot: Slot, hidden: bool);
    fn set_image_source(&mut self, slot: Slot, src: &str);
    fn set_value(&mut self, slot: Slot, value: &str);
    fn value(&self, slot: Slot) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SlotKind {
    Text,
    Html,
    Input,
    Image,
}

#[derive(Debug, Clone)]
struct SlotState {
    kind: SlotKind,
    content: String,
    hidden: bool,
}

impl SlotState {
    fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            content: String::new(),
            hidden: false,
        }
    }
}

#[derive(Serialize)]
struct SlotView<'a> {
    id: &'static str,
    kind: SlotKind,
    content: &'a str,
    hidden: bool,
}

const DOCUMENT_TEMPLATE: &str = "document.html";

/// In-memory stand-in for one loaded page.
#[derive(Debug, Clone)]
pub struct Document {
    route: Route,
    slots: BTreeMap<Slot, SlotState>,
}

impl Document {
    pub fn for_route(route: Route) -> Self {
        let mut slots = BTreeMap::new();
        let mut add = |slot, kind| {
            slots.insert(slot, SlotState::new(kind));
        };

        add(Slot::Notifications, SlotKind::Html);
        match route {
            Route::Login => {
                add(Slot::LoginUsername, SlotKind::Input);
                add(Slot::LoginPassword, SlotKind::Input);
            }
            Route::Index => {
                add(Slot::UserName, SlotKind::Text);
                add(Slot::WelcomeUserName, SlotKind::Text);
                add(Slot::BookCount, SlotKind::Text);
                add(Slot::AvatarImage, SlotKind::Image);
                add(Slot::AvatarPlaceholder, SlotKind::Text);
                add(Slot::CategoryList, SlotKind::Html);
                add(Slot::BooksGrid, SlotKind::Html);
            }
            Route::Profile => {
                add(Slot::UserName, SlotKind::Text);
                add(Slot::BookCount, SlotKind::Text);
                add(Slot::AvatarImage, SlotKind::Image);
                add(Slot::AvatarPlaceholder, SlotKind::Text);
                add(Slot::FileInput, SlotKind::Input);
                for field in ProfileField::ALL {
                    add(Slot::ProfileInput(field), SlotKind::Input);
                }
                for stat in [
                    StatSlot::BooksRead,
                    StatSlot::CurrentBooks,
                    StatSlot::ReadingHours,
                    StatSlot::FavoriteCategory,
                ] {
                    add(Slot::Stat(stat), SlotKind::Text);
                }
            }
        }

        if let Some(image) = slots.get_mut(&Slot::AvatarImage) {
            image.hidden = true;
        }

        Self { route, slots }
    }

    pub fn content(&self, slot: Slot) -> Option<&str> {
        self.slots.get(&slot).map(|s| s.content.as_str())
    }

    pub fn is_hidden(&self, slot: Slot) -> Option<bool> {
        self.slots.get(&slot).map(|s| s.hidden)
    }

    pub fn to_html(&self) -> Result<String> {
        let mut env = Environment::new();
        env.add_template(
            DOCUMENT_TEMPLATE,
            include_str!("../../templates/document.html"),
        )?;
        let slots: Vec<SlotView<'_>> = self
            .slots
            .iter()
            .map(|(slot, state)| SlotView {
                id: slot.element_id(),
                kind: state.kind,
                content: &state.content,
                hidden: state.hidden,
            })
            .collect();
        env.get_template(DOCUMENT_TEMPLATE)?
            .render(context! {
                entry_point => self.route.entry_point(),
                slots => slots,
            })
            .context("failed to render page document")
    }

    fn write(&mut self, slot: Slot, accepts: &[SlotKind], apply: impl FnOnce(&mut SlotState)) {
        match self.slots.get_mut(&slot) {
            Some(state) if accepts.contains(&state.kind) => apply(state),
            Some(state) => trace!(?slot, kind = ?state.kind, "slot kind does not accept write"),
            None => trace!(?slot, route = ?self.route, "slot absent on this page"),
        }
    }
}

impl Page for Document {
    fn route(&self) -> Route {
        self.route
    }

    fn has_slot(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    fn set_text(&mut self, slot: Slot, text: &str) {
        self.write(slot, &[SlotKind::Text, SlotKind::Html], |s| {
            s.content = text.to_string();
        });
    }

    fn set_html(&mut self, slot: Slot, html: String) {
        self.write(slot, &[SlotKind::Html], |s| s.content = html);
    }

    fn set_hidden(&mut self, slot: Slot, hidden: bool) {
        if let Some(state) = self.slots.get_mut(&slot) {
            state.hidden = hidden;
        }
    }

    fn set_image_source(&mut self, slot: Slot, src: &str) {
        self.write(slot, &[SlotKind::Image], |s| s.content = src.to_string());
    }

    fn set_value(&mut self, slot: Slot, value: &str) {
        self.write(slot, &[SlotKind::Input], |s| s.content = value.to_string());
    }

    fn value(&self, slot: Slot) -> Option<String> {
        self.slots
            .get(&slot)
            .filter(|s| s.kind == SlotKind::Input)
            .map(|s| s.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_only_has_form_and_notifications() {
        let doc = Document::for_route(Route::Login);
        assert!(doc.has_slot(Slot::LoginUsername));
        assert!(doc.has_slot(Slot::Notifications));
        assert!(!doc.has_slot(Slot::BooksGrid));
        assert!(!doc.has_slot(Slot::BookCount));
    }

    #[test]
    fn writes_to_absent_slots_are_skipped() {
        let mut doc = Document::for_route(Route::Login);
        doc.set_text(Slot::BookCount, "3");
        assert_eq!(doc.content(Slot::BookCount), None);
    }

    #[test]
    fn avatar_image_starts_hidden_behind_placeholder() {
        let doc = Document::for_route(Route::Profile);
        assert_eq!(doc.is_hidden(Slot::AvatarImage), Some(true));
        assert_eq!(doc.is_hidden(Slot::AvatarPlaceholder), Some(false));
    }

    #[test]
    fn values_are_only_read_from_inputs() {
        let mut doc = Document::for_route(Route::Profile);
        doc.set_value(Slot::ProfileInput(ProfileField::Bio), "hello");
        doc.set_value(Slot::UserName, "ignored");
        assert_eq!(
            doc.value(Slot::ProfileInput(ProfileField::Bio)).as_deref(),
            Some("hello")
        );
        assert_eq!(doc.value(Slot::UserName), None);
        assert_eq!(doc.content(Slot::UserName), Some(""));
    }

    #[test]
    fn document_html_escapes_text_and_keeps_markup() {
        let mut doc = Document::for_route(Route::Index);
        doc.set_text(Slot::UserName, "<b>ali</b>");
        doc.set_html(Slot::BooksGrid, "<div class=\"no-books\"></div>".into());

        let html = doc.to_html().expect("render");
        assert!(html.contains("<!-- index.html -->"));
        assert!(html.contains("&lt;b&gt;ali"));
        assert!(html.contains("<div id=\"booksGrid\"><div class=\"no-books\"></div></div>"));
        assert!(html.contains("id=\"avatarImage\""));
    }
}
