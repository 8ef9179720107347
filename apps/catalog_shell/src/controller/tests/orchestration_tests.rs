use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    path::PathBuf,
    sync::Arc,
};

use library_core::placeholder_stats;
use pretty_assertions::assert_eq;
use shared::domain::Locale;
use storage::MemoryStore;

use super::*;
use crate::controller::bootstrap::{load_page, PageLoad};
use crate::ui::page::{Document, StatSlot};

struct ScriptedGate {
    answers: VecDeque<bool>,
    prompts: Rc<RefCell<Vec<String>>>,
}

impl ConfirmationGate for ScriptedGate {
    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.borrow_mut().push(message.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}

#[derive(Default)]
struct RecordingReader {
    next: Cell<u64>,
    paths: RefCell<Vec<PathBuf>>,
}

impl AvatarReader for RecordingReader {
    fn request(&self, path: PathBuf) -> u64 {
        self.paths.borrow_mut().push(path);
        self.next.set(self.next.get() + 1);
        self.next.get()
    }
}

struct Fixture {
    controller: InteractionController<Arc<MemoryStore>>,
    page: Document,
    store: Arc<MemoryStore>,
    prompts: Rc<RefCell<Vec<String>>>,
    reader: Rc<RecordingReader>,
    start: Instant,
}

impl Fixture {
    fn new(route: Route, logged_in: bool, answers: &[bool]) -> Self {
        let store = Arc::new(MemoryStore::new());
        let catalog = CatalogRegistry::new(Locale::Arabic);
        let stats = placeholder_stats("البرمجة");
        if logged_in {
            SessionStore::new(store.clone(), stats.clone())
                .login("ali", "pw")
                .expect("seed session");
        }

        let prompts = Rc::new(RefCell::new(Vec::new()));
        let reader = Rc::new(RecordingReader::default());
        let loans = LoanRegistry::seeded(&catalog).expect("loans");
        let controller = InteractionController::new(ControllerParts {
            session: SessionStore::new(store.clone(), stats),
            catalog,
            loans,
            renderer: ViewRenderer::new(Locale::Arabic).expect("renderer"),
            notifications: NotificationCenter::default(),
            confirm: Box::new(ScriptedGate {
                answers: answers.iter().copied().collect(),
                prompts: prompts.clone(),
            }),
            avatar_reader: reader.clone(),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        });

        let mut page = Document::for_route(route);
        let load = load_page(&controller, &mut page);
        assert_eq!(load, PageLoad::Ready, "fixture page should load");

        Self {
            controller,
            page,
            store,
            prompts,
            reader,
            start: Instant::now(),
        }
    }

    fn send(&mut self, event: UiEvent) -> Option<Route> {
        let now = self.start;
        self.controller.handle(&mut self.page, event, now)
    }

    fn send_at(&mut self, event: UiEvent, offset: Duration) -> Option<Route> {
        let now = self.start + offset;
        self.controller.handle(&mut self.page, event, now)
    }

    fn messages(&self) -> Vec<(Severity, String)> {
        self.controller
            .notifications()
            .active()
            .iter()
            .map(|n| (n.severity, n.message.clone()))
            .collect()
    }

    fn grid(&self) -> String {
        self.page
            .content(Slot::BooksGrid)
            .unwrap_or_default()
            .to_string()
    }

    fn logged_in(&self) -> bool {
        SessionStore::new(self.store.clone(), placeholder_stats(""))
            .is_logged_in()
            .expect("check")
    }
}

fn book_action(action: &str, id: &str) -> UiEvent {
    UiEvent::BookAction {
        action: action.into(),
        book_id: id.into(),
    }
}

#[test]
fn guarded_page_redirects_without_session() {
    let store = Arc::new(MemoryStore::new());
    let catalog = CatalogRegistry::default();
    let loans = LoanRegistry::seeded(&catalog).expect("loans");
    let controller = InteractionController::new(ControllerParts {
        session: SessionStore::new(store, placeholder_stats("")),
        catalog,
        loans,
        renderer: ViewRenderer::new(Locale::Arabic).expect("renderer"),
        notifications: NotificationCenter::default(),
        confirm: Box::new(crate::ui::confirm::FixedAnswer(true)),
        avatar_reader: Rc::new(RecordingReader::default()),
        redirect_delay: DEFAULT_REDIRECT_DELAY,
    });

    let mut index = Document::for_route(Route::Index);
    assert_eq!(
        load_page(&controller, &mut index),
        PageLoad::Redirect(Route::Login)
    );
    assert_eq!(index.content(Slot::BooksGrid), Some(""));

    let mut login = Document::for_route(Route::Login);
    assert_eq!(load_page(&controller, &mut login), PageLoad::Ready);
}

#[test]
fn index_load_paints_user_count_and_grid() {
    let fx = Fixture::new(Route::Index, true, &[]);
    assert_eq!(fx.page.content(Slot::UserName), Some("ali"));
    assert_eq!(fx.page.content(Slot::WelcomeUserName), Some("ali"));
    assert_eq!(fx.page.content(Slot::BookCount), Some("3"));
    assert_eq!(fx.grid().matches("class=\"book-card\"").count(), 3);
    assert!(fx
        .page
        .content(Slot::CategoryList)
        .expect("links")
        .contains("class=\"active\" data-category=\"all\""));
}

#[test]
fn profile_load_populates_form_and_stats() {
    let fx = Fixture::new(Route::Profile, true, &[]);
    assert_eq!(
        fx.page.value(Slot::ProfileInput(ProfileField::Email)).as_deref(),
        Some("ali@example.com")
    );
    assert_eq!(
        fx.page.value(Slot::ProfileInput(ProfileField::Name)).as_deref(),
        Some("ali")
    );
    assert_eq!(fx.page.content(Slot::Stat(StatSlot::CurrentBooks)), Some("3"));
    assert_eq!(
        fx.page.content(Slot::Stat(StatSlot::FavoriteCategory)),
        Some("البرمجة")
    );
}

#[test]
fn login_with_missing_field_warns_and_keeps_state() {
    let mut fx = Fixture::new(Route::Login, false, &[]);
    fx.page.set_value(Slot::LoginUsername, "ali");

    assert_eq!(fx.send(UiEvent::LoginSubmitted), None);
    assert_eq!(
        fx.messages(),
        vec![(
            Severity::Danger,
            "يرجى إدخال اسم المستخدم وكلمة المرور".to_string()
        )]
    );
    assert!(!fx.logged_in());
    assert_eq!(fx.controller.pending_redirect(), None);
}

#[test]
fn whitespace_username_counts_as_filled() {
    let mut fx = Fixture::new(Route::Login, false, &[]);
    fx.page.set_value(Slot::LoginUsername, " ");
    fx.page.set_value(Slot::LoginPassword, "pw");

    fx.send(UiEvent::LoginSubmitted);

    assert_eq!(fx.messages()[0].0, Severity::Success);
    let profile = fx
        .controller
        .session()
        .get_current_user()
        .expect("read")
        .expect("session");
    assert_eq!(profile.username, " ");
}

#[test]
fn login_success_redirects_after_delay() {
    let mut fx = Fixture::new(Route::Login, false, &[]);
    fx.page.set_value(Slot::LoginUsername, "ali");
    fx.page.set_value(Slot::LoginPassword, "x");

    assert_eq!(fx.send(UiEvent::LoginSubmitted), None);
    assert!(fx.logged_in());
    assert_eq!(fx.messages()[0].0, Severity::Success);

    assert_eq!(fx.send_at(UiEvent::Tick, Duration::from_millis(500)), None);
    assert_eq!(
        fx.send_at(UiEvent::Tick, Duration::from_millis(1000)),
        Some(Route::Index)
    );
    assert_eq!(fx.send_at(UiEvent::Tick, Duration::from_millis(1500)), None);
}

#[test]
fn profile_submit_merges_form_values() {
    let mut fx = Fixture::new(Route::Profile, true, &[]);
    fx.page
        .set_value(Slot::ProfileInput(ProfileField::Name), "Ali Hassan");
    fx.page
        .set_value(Slot::ProfileInput(ProfileField::Bio), "history buff");

    fx.send(UiEvent::ProfileSubmitted);

    let profile = fx
        .controller
        .session()
        .get_current_user()
        .expect("read")
        .expect("session");
    assert_eq!(profile.name, "Ali Hassan");
    assert_eq!(profile.bio, "history buff");
    assert_eq!(profile.username, "ali");
    assert_eq!(profile.email, "ali@example.com");
    assert_eq!(fx.page.content(Slot::UserName), Some("Ali Hassan"));
    assert_eq!(
        fx.messages(),
        vec![(Severity::Success, "تم حفظ البيانات بنجاح!".to_string())]
    );
}

#[test]
fn confirmed_renew_redraws_card_from_registry() {
    let mut fx = Fixture::new(Route::Index, true, &[true]);

    fx.send(book_action("renew", "1"));

    assert_eq!(
        fx.prompts.borrow().as_slice(),
        ["هل تريد تجديد هذا الكتاب؟".to_string()]
    );
    let due = fx
        .controller
        .loans()
        .get(LoanId(1))
        .expect("loan")
        .due_date;
    assert_eq!(due.to_string(), "2024-12-29");
    assert!(fx.grid().contains("مستحق: ٢٩/١٢/٢٠٢٤"));
    assert!(!fx.grid().contains("مستحق: ١٥/١٢/٢٠٢٤"));
    assert_eq!(fx.messages()[0].0, Severity::Success);
}

#[test]
fn declined_renew_changes_nothing() {
    let mut fx = Fixture::new(Route::Index, true, &[false]);
    let before = fx.grid();

    fx.send(book_action("renew", "1"));

    assert_eq!(fx.prompts.borrow().len(), 1);
    assert_eq!(fx.grid(), before);
    assert!(fx.messages().is_empty());
}

#[test]
fn renew_of_unknown_loan_is_silent() {
    let mut fx = Fixture::new(Route::Index, true, &[true]);
    let before = fx.controller.loans().get_borrowed_books().to_vec();

    fx.send(book_action("renew", "99"));

    assert_eq!(fx.controller.loans().get_borrowed_books(), before.as_slice());
    assert!(fx.messages().is_empty());
}

#[test]
fn label_text_and_bad_ids_do_not_dispatch() {
    let mut fx = Fixture::new(Route::Index, true, &[true, true]);

    fx.send(book_action("تجديد", "1"));
    fx.send(book_action("renew", "not-a-number"));

    assert!(fx.prompts.borrow().is_empty());
}

#[test]
fn read_action_is_inert() {
    let mut fx = Fixture::new(Route::Index, true, &[true]);
    let before = fx.grid();

    fx.send(book_action("read", "2"));

    assert!(fx.prompts.borrow().is_empty());
    assert_eq!(fx.grid(), before);
}

#[test]
fn confirmed_return_removes_card_and_updates_badge() {
    let mut fx = Fixture::new(Route::Index, true, &[true, true]);

    fx.send(book_action("return", "1"));

    assert_eq!(fx.page.content(Slot::BookCount), Some("2"));
    assert!(!fx.grid().contains("data-book-id=\"1\""));
    assert_eq!(fx.grid().matches("class=\"book-card\"").count(), 2);

    fx.send(book_action("return", "1"));
    assert_eq!(fx.messages().len(), 1);
}

#[test]
fn category_selection_toggles_active_link_and_filters() {
    let mut fx = Fixture::new(Route::Index, true, &[]);

    fx.send(UiEvent::CategorySelected {
        category: Some("science".into()),
    });
    let links = fx.page.content(Slot::CategoryList).expect("links").to_string();
    assert_eq!(links.matches("class=\"active\"").count(), 1);
    assert!(links.contains("class=\"active\" data-category=\"science\""));
    assert_eq!(fx.grid().matches("class=\"book-card\"").count(), 1);
    assert!(fx.grid().contains("data-book-id=\"3\""));

    fx.send(UiEvent::CategorySelected {
        category: Some("history".into()),
    });
    assert!(fx.grid().contains("class=\"no-books\""));

    fx.send(UiEvent::CategorySelected { category: None });
    assert!(fx.controller.active_category().is_all());
    assert_eq!(fx.grid().matches("class=\"book-card\"").count(), 3);
}

#[test]
fn unknown_category_falls_back_to_all() {
    let mut fx = Fixture::new(Route::Index, true, &[]);
    fx.send(UiEvent::CategorySelected {
        category: Some("cooking".into()),
    });
    assert!(fx.controller.active_category().is_all());
    assert_eq!(fx.grid().matches("class=\"book-card\"").count(), 3);
}

#[test]
fn renew_under_filter_keeps_filter() {
    let mut fx = Fixture::new(Route::Index, true, &[true]);
    fx.send(UiEvent::CategorySelected {
        category: Some("science".into()),
    });

    fx.send(book_action("renew", "3"));

    assert_eq!(fx.grid().matches("class=\"book-card\"").count(), 1);
    assert!(fx.grid().contains("مستحق: ٨/١/٢٠٢٥"));
}

#[test]
fn only_latest_avatar_read_is_applied() {
    let mut fx = Fixture::new(Route::Profile, true, &[]);

    fx.send(UiEvent::AvatarFilesSelected {
        files: vec![PathBuf::from("first.png"), PathBuf::from("ignored.png")],
    });
    fx.send(UiEvent::AvatarFilesSelected {
        files: vec![PathBuf::from("second.png")],
    });
    assert_eq!(
        fx.reader.paths.borrow().as_slice(),
        [PathBuf::from("first.png"), PathBuf::from("second.png")]
    );

    fx.send(UiEvent::AvatarLoaded {
        generation: 2,
        data_url: "data:image/png;base64,U0VDT05E".into(),
    });
    fx.send(UiEvent::AvatarLoaded {
        generation: 1,
        data_url: "data:image/png;base64,RklSU1Q=".into(),
    });

    let profile = fx
        .controller
        .session()
        .get_current_user()
        .expect("read")
        .expect("session");
    assert_eq!(
        profile.avatar.as_deref(),
        Some("data:image/png;base64,U0VDT05E")
    );
    assert_eq!(fx.page.is_hidden(Slot::AvatarImage), Some(false));
    assert_eq!(fx.page.is_hidden(Slot::AvatarPlaceholder), Some(true));
    assert_eq!(
        fx.page.content(Slot::AvatarImage),
        Some("data:image/png;base64,U0VDT05E")
    );
    assert_eq!(
        fx.messages(),
        vec![(Severity::Success, "تم تحديث الصورة الشخصية!".to_string())]
    );
}

#[test]
fn empty_file_selection_requests_nothing() {
    let mut fx = Fixture::new(Route::Profile, true, &[]);
    fx.send(UiEvent::AvatarFilesSelected { files: Vec::new() });
    assert!(fx.reader.paths.borrow().is_empty());
}

#[test]
fn failed_latest_avatar_read_reports_danger() {
    let mut fx = Fixture::new(Route::Profile, true, &[]);
    fx.send(UiEvent::AvatarFilesSelected {
        files: vec![PathBuf::from("gone.png")],
    });
    fx.send(UiEvent::AvatarLoadFailed {
        generation: 1,
        reason: "not found".into(),
    });

    assert_eq!(fx.messages()[0].0, Severity::Danger);
    assert_eq!(fx.page.is_hidden(Slot::AvatarImage), Some(true));
}

#[test]
fn notifications_auto_dismiss_on_tick() {
    let mut fx = Fixture::new(Route::Login, false, &[]);
    fx.send(UiEvent::LoginSubmitted);
    fx.send_at(UiEvent::LoginSubmitted, Duration::from_secs(2));
    assert_eq!(fx.messages().len(), 2);
    assert_eq!(
        fx.page
            .content(Slot::Notifications)
            .expect("slot")
            .matches("class=\"alert ")
            .count(),
        2
    );

    fx.send_at(UiEvent::Tick, Duration::from_secs(5));
    assert_eq!(fx.messages().len(), 1);
    fx.send_at(UiEvent::Tick, Duration::from_secs(7));
    assert!(fx.messages().is_empty());
    assert_eq!(fx.page.content(Slot::Notifications), Some(""));
}

#[test]
fn logout_clears_session_and_routes_to_login() {
    let mut fx = Fixture::new(Route::Index, true, &[]);
    assert!(fx.logged_in());

    assert_eq!(fx.send(UiEvent::LogoutRequested), Some(Route::Login));
    assert!(!fx.logged_in());
}
