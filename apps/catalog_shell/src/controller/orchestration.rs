//! Mediates between page events and the session, loan and catalog state.

use std::{
    rc::Rc,
    time::{Duration, Instant},
};

use anyhow::Result;
use library_core::{CatalogRegistry, LoanRegistry, Route, SessionStore};
use shared::{
    domain::{CategoryId, LoanId},
    protocol::{ProfileField, ProfilePatch},
};
use storage::KeyValueStore;
use tracing::{debug, info, warn};

use crate::backend_bridge::commands::AvatarReader;
use crate::controller::events::{BookAction, UiEvent};
use crate::ui::{
    confirm::{confirm_then, ConfirmationGate},
    notifications::{NotificationCenter, Severity},
    page::{Page, Slot},
    renderer::ViewRenderer,
};

pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(1);

pub struct ControllerParts<S> {
    pub session: SessionStore<S>,
    pub catalog: CatalogRegistry,
    pub loans: LoanRegistry,
    pub renderer: ViewRenderer,
    pub notifications: NotificationCenter,
    pub confirm: Box<dyn ConfirmationGate>,
    pub avatar_reader: Rc<dyn AvatarReader>,
    pub redirect_delay: Duration,
}

pub struct InteractionController<S> {
    session: SessionStore<S>,
    catalog: CatalogRegistry,
    loans: LoanRegistry,
    renderer: ViewRenderer,
    notifications: NotificationCenter,
    confirm: Box<dyn ConfirmationGate>,
    avatar_reader: Rc<dyn AvatarReader>,
    redirect_delay: Duration,
    active_category: CategoryId,
    latest_avatar_read: Option<u64>,
    pending_redirect: Option<(Route, Instant)>,
}

impl<S: KeyValueStore> InteractionController<S> {
    pub fn new(parts: ControllerParts<S>) -> Self {
        Self {
            session: parts.session,
            catalog: parts.catalog,
            loans: parts.loans,
            renderer: parts.renderer,
            notifications: parts.notifications,
            confirm: parts.confirm,
            avatar_reader: parts.avatar_reader,
            redirect_delay: parts.redirect_delay,
            active_category: CategoryId::all(),
            latest_avatar_read: None,
            pending_redirect: None,
        }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn catalog(&self) -> &CatalogRegistry {
        &self.catalog
    }

    pub fn loans(&self) -> &LoanRegistry {
        &self.loans
    }

    pub fn renderer(&self) -> &ViewRenderer {
        &self.renderer
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn active_category(&self) -> &CategoryId {
        &self.active_category
    }

    pub fn pending_redirect(&self) -> Option<(Route, Instant)> {
        self.pending_redirect
    }

    /// Handles one event and returns the route to navigate to, if any.
    pub fn handle(&mut self, page: &mut dyn Page, event: UiEvent, now: Instant) -> Option<Route> {
        if !matches!(event, UiEvent::Tick) {
            debug!(event = event.name(), route = ?page.route(), "dispatching ui event");
        }
        match event {
            UiEvent::LoginSubmitted => self.on_login_submitted(page, now),
            UiEvent::ProfileSubmitted => self.on_profile_submitted(page, now),
            UiEvent::BookAction { action, book_id } => {
                self.on_book_action(page, &action, &book_id, now)
            }
            UiEvent::CategorySelected { category } => self.on_category_selected(page, category),
            UiEvent::AvatarFilesSelected { files } => {
                if let Some(path) = files.into_iter().next() {
                    let generation = self.avatar_reader.request(path);
                    self.latest_avatar_read = Some(generation);
                }
            }
            UiEvent::AvatarLoaded {
                generation,
                data_url,
            } => self.on_avatar_loaded(page, generation, data_url, now),
            UiEvent::AvatarLoadFailed { generation, reason } => {
                if self.latest_avatar_read == Some(generation) {
                    self.latest_avatar_read = None;
                    warn!(generation, %reason, "avatar read failed");
                    let message = self.renderer.strings().avatar_failed;
                    self.notify(page, message, Severity::Danger, now);
                } else {
                    debug!(generation, "ignoring failure of superseded avatar read");
                }
            }
            UiEvent::LogoutRequested => return self.on_logout(page, now),
            UiEvent::Tick => return self.on_tick(page, now),
        }
        None
    }

    fn notify(&mut self, page: &mut dyn Page, message: &str, severity: Severity, now: Instant) {
        self.notifications.push(message, severity, now);
        log_render(self.renderer.render_notifications(page, &self.notifications));
    }

    fn notify_storage_failure(&mut self, page: &mut dyn Page, err: anyhow::Error, now: Instant) {
        warn!(error = %format!("{err:#}"), "session storage operation failed");
        let message = self.renderer.strings().storage_failed;
        self.notify(page, message, Severity::Danger, now);
    }

    fn on_login_submitted(&mut self, page: &mut dyn Page, now: Instant) {
        let username = page.value(Slot::LoginUsername).unwrap_or_default();
        let password = page.value(Slot::LoginPassword).unwrap_or_default();
        if username.is_empty() || password.is_empty() {
            let message = self.renderer.strings().login_missing_fields;
            self.notify(page, message, Severity::Danger, now);
            return;
        }

        match self.session.login(&username, &password) {
            Ok(_) => {
                let message = self.renderer.strings().login_success;
                self.notify(page, message, Severity::Success, now);
                self.pending_redirect = Some((Route::Index, now + self.redirect_delay));
            }
            Err(err) => self.notify_storage_failure(page, err, now),
        }
    }

    fn on_profile_submitted(&mut self, page: &mut dyn Page, now: Instant) {
        let fields: Vec<(&'static str, String)> = ProfileField::ALL
            .iter()
            .filter_map(|field| {
                page.value(Slot::ProfileInput(*field))
                    .map(|value| (field.input_id(), value))
            })
            .collect();
        let patch = ProfilePatch::from_form_fields(fields);

        match self.session.update_profile(patch) {
            Ok(updated) => {
                self.renderer.update_user_info(page, updated.as_ref());
                let message = self.renderer.strings().profile_saved;
                self.notify(page, message, Severity::Success, now);
            }
            Err(err) => self.notify_storage_failure(page, err, now),
        }
    }

    fn on_book_action(&mut self, page: &mut dyn Page, action: &str, book_id: &str, now: Instant) {
        let Some(action) = BookAction::from_attr(action) else {
            debug!(action, "ignoring click without a known book action");
            return;
        };
        let Ok(loan_id) = book_id.parse::<LoanId>() else {
            debug!(book_id, "ignoring book action without a valid card id");
            return;
        };

        match action {
            BookAction::Read => debug!(loan_id = loan_id.0, "read action has no behavior yet"),
            BookAction::Renew => {
                let prompt = self.renderer.strings().renew_prompt;
                let loans = &mut self.loans;
                let renewed = confirm_then(self.confirm.as_mut(), prompt, || {
                    loans.renew_book(loan_id)
                });
                if renewed == Some(true) {
                    let message = self.renderer.strings().renew_success;
                    self.notify(page, message, Severity::Success, now);
                    self.refresh_books(page);
                }
            }
            BookAction::Return => {
                let prompt = self.renderer.strings().return_prompt;
                let loans = &mut self.loans;
                let returned = confirm_then(self.confirm.as_mut(), prompt, || {
                    loans.return_book(loan_id)
                });
                if returned == Some(true) {
                    let message = self.renderer.strings().return_success;
                    self.notify(page, message, Severity::Success, now);
                    self.refresh_books(page);
                }
            }
        }
    }

    /// Redraws the grid under the active filter and the count badge, both
    /// straight from the registry.
    fn refresh_books(&mut self, page: &mut dyn Page) {
        log_render(
            self.renderer
                .filter_books_by_category(page, &self.loans, &self.active_category)
                .map(|_| ()),
        );
        self.renderer.update_book_count(page, &self.loans);
    }

    fn on_category_selected(&mut self, page: &mut dyn Page, category: Option<String>) {
        let requested = category.map(CategoryId::new).unwrap_or_else(CategoryId::all);
        let category = if self.catalog.contains(&requested) {
            requested
        } else {
            debug!(category = %requested, "unknown category; showing all loans");
            CategoryId::all()
        };
        self.active_category = category;

        log_render(
            self.renderer
                .render_category_links(page, &self.catalog, &self.active_category),
        );
        log_render(
            self.renderer
                .filter_books_by_category(page, &self.loans, &self.active_category)
                .map(|_| ()),
        );
    }

    fn on_avatar_loaded(
        &mut self,
        page: &mut dyn Page,
        generation: u64,
        data_url: String,
        now: Instant,
    ) {
        if self.latest_avatar_read != Some(generation) {
            debug!(
                generation,
                latest = ?self.latest_avatar_read,
                "dropping result of superseded avatar read"
            );
            return;
        }
        self.latest_avatar_read = None;

        match self.session.update_profile(ProfilePatch::avatar(data_url)) {
            Ok(updated) => {
                self.renderer.load_user_avatar(page, updated.as_ref());
                let message = self.renderer.strings().avatar_updated;
                self.notify(page, message, Severity::Success, now);
            }
            Err(err) => self.notify_storage_failure(page, err, now),
        }
    }

    fn on_logout(&mut self, page: &mut dyn Page, now: Instant) -> Option<Route> {
        match self.session.logout() {
            Ok(route) => Some(route),
            Err(err) => {
                self.notify_storage_failure(page, err, now);
                None
            }
        }
    }

    fn on_tick(&mut self, page: &mut dyn Page, now: Instant) -> Option<Route> {
        if self.notifications.expire(now) > 0 {
            log_render(self.renderer.render_notifications(page, &self.notifications));
        }
        let (route, due) = self.pending_redirect?;
        if due > now {
            return None;
        }
        self.pending_redirect = None;
        info!(to = route.entry_point(), "performing delayed navigation");
        Some(route)
    }
}

fn log_render(result: Result<()>) {
    if let Err(err) = result {
        warn!(error = %format!("{err:#}"), "failed to render page slot");
    }
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
