//! Page-load sequence: session guard, then the initial paint.

use library_core::Route;
use storage::KeyValueStore;
use tracing::warn;

use crate::controller::orchestration::InteractionController;
use crate::ui::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoad {
    /// No session on a guarded page; navigate away before painting.
    Redirect(Route),
    Ready,
}

pub fn load_page<S: KeyValueStore>(
    controller: &InteractionController<S>,
    page: &mut dyn Page,
) -> PageLoad {
    let user = controller
        .session()
        .get_current_user()
        .unwrap_or_else(|err| {
            warn!(error = %format!("{err:#}"), "could not read session; treating as logged out");
            None
        });

    if user.is_none() && page.route() != Route::Login {
        return PageLoad::Redirect(Route::Login);
    }

    let renderer = controller.renderer();
    renderer.update_user_info(page, user.as_ref());
    renderer.load_user_avatar(page, user.as_ref());
    renderer.update_book_count(page, controller.loans());

    if let Err(err) =
        renderer.render_category_links(page, controller.catalog(), controller.active_category())
    {
        warn!(error = %format!("{err:#}"), "failed to paint category links");
    }
    if let Err(err) =
        renderer.filter_books_by_category(page, controller.loans(), controller.active_category())
    {
        warn!(error = %format!("{err:#}"), "failed to paint catalog grid");
    }

    if page.route() == Route::Profile {
        if let Some(user) = &user {
            renderer.populate_profile(page, user);
        }
    }

    PageLoad::Ready
}
