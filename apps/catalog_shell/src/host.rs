//! Terminal host: one page at a time, each navigation a full reload.

use std::{
    rc::Rc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossbeam_channel::{select, Receiver};
use library_core::{placeholder_stats, CatalogRegistry, LoanRegistry, Route, SessionStore};
use storage::KeyValueStore;
use tracing::{info, warn};

use crate::backend_bridge::commands::AvatarReader;
use crate::config::Settings;
use crate::controller::{load_page, ControllerParts, InteractionController, PageLoad, UiEvent};
use crate::shell::{parse_command, ShellCommand, StdinConfirmation, HELP};
use crate::ui::{notifications::NotificationCenter, page::Page, Document, ViewRenderer};

const TICK: Duration = Duration::from_millis(100);
const FAVORITE_SEED_CATEGORY: &str = "programming";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageExit {
    Navigate(Route),
    Quit,
}

enum Input {
    Line(String),
    Event(UiEvent),
}

pub struct Host<S> {
    settings: Settings,
    store: S,
    avatar_reader: Rc<dyn AvatarReader>,
    lines: Receiver<String>,
    avatar_events: Receiver<UiEvent>,
}

impl<S: KeyValueStore + Clone> Host<S> {
    pub fn new(
        settings: Settings,
        store: S,
        avatar_reader: Rc<dyn AvatarReader>,
        lines: Receiver<String>,
        avatar_events: Receiver<UiEvent>,
    ) -> Self {
        Self {
            settings,
            store,
            avatar_reader,
            lines,
            avatar_events,
        }
    }

    pub fn run(&self, mut route: Route) -> Result<()> {
        loop {
            match self.run_page(route)? {
                PageExit::Navigate(next) => {
                    info!(from = route.entry_point(), to = next.entry_point(), "navigating");
                    route = next;
                }
                PageExit::Quit => return Ok(()),
            }
        }
    }

    /// Fresh registries per page: only the persisted session outlives a
    /// navigation.
    fn build_controller(&self) -> Result<InteractionController<S>> {
        let locale = self.settings.locale;
        let catalog = CatalogRegistry::new(locale);
        let favorite = catalog
            .get_category_by_id(FAVORITE_SEED_CATEGORY)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let loans = LoanRegistry::seeded(&catalog).context("seed loans do not fit the catalog")?;

        Ok(InteractionController::new(ControllerParts {
            session: SessionStore::new(self.store.clone(), placeholder_stats(favorite)),
            catalog,
            loans,
            renderer: ViewRenderer::new(locale)?,
            notifications: NotificationCenter::new(self.settings.notification_ttl),
            confirm: Box::new(StdinConfirmation::new(self.lines.clone())),
            avatar_reader: self.avatar_reader.clone(),
            redirect_delay: self.settings.login_redirect_delay,
        }))
    }

    pub fn run_page(&self, route: Route) -> Result<PageExit> {
        let mut controller = self.build_controller()?;
        let mut page = Document::for_route(route);

        if let PageLoad::Redirect(to) = load_page(&controller, &mut page) {
            info!(page = route.entry_point(), "no session; redirecting");
            return Ok(PageExit::Navigate(to));
        }
        println!("== {} ==", route.entry_point());

        let mut echoed = 0;
        loop {
            let input = select! {
                recv(self.lines) -> line => match line {
                    Ok(line) => Input::Line(line),
                    Err(_) => return Ok(PageExit::Quit),
                },
                recv(self.avatar_events) -> event => match event {
                    Ok(event) => Input::Event(event),
                    Err(_) => Input::Event(UiEvent::Tick),
                },
                default(wait_budget(controller.notifications().next_deadline(), Instant::now())) => {
                    Input::Event(UiEvent::Tick)
                }
            };

            let event = match input {
                Input::Event(event) => event,
                Input::Line(line) => match parse_command(&line) {
                    Ok(None) => continue,
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                    Ok(Some(ShellCommand::Dispatch { fill, event })) => {
                        for (slot, value) in fill {
                            page.set_value(slot, &value);
                        }
                        event
                    }
                    Ok(Some(ShellCommand::Open(to))) => return Ok(PageExit::Navigate(to)),
                    Ok(Some(ShellCommand::Show)) => {
                        match page.to_html() {
                            Ok(html) => println!("{html}"),
                            Err(err) => warn!(error = %format!("{err:#}"), "failed to render page"),
                        }
                        continue;
                    }
                    Ok(Some(ShellCommand::Help)) => {
                        println!("{HELP}");
                        continue;
                    }
                    Ok(Some(ShellCommand::Quit)) => return Ok(PageExit::Quit),
                },
            };

            let next = controller.handle(&mut page, event, Instant::now());
            echoed = echo_new_notifications(&controller, echoed);
            if let Some(next) = next {
                return Ok(PageExit::Navigate(next));
            }
        }
    }
}

/// Time until the next wake-up: the nearest notification deadline, never
/// longer than [`TICK`].
fn wait_budget(deadline: Option<Instant>, now: Instant) -> Duration {
    deadline.map_or(TICK, |due| due.saturating_duration_since(now).min(TICK))
}

/// Prints notifications raised since `echoed`, oldest first; returns the
/// newest id seen.
fn echo_new_notifications<S: KeyValueStore>(controller: &InteractionController<S>, echoed: u64) -> u64 {
    let mut newest = echoed;
    for notification in controller.notifications().active().iter().rev() {
        if notification.id > echoed {
            println!(
                "[{}] {}",
                notification.severity.css_suffix(),
                notification.message
            );
            newest = newest.max(notification.id);
        }
    }
    newest
}
