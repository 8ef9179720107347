//! Session, loan and catalog state for the library demo.
//!
//! Every registry is an explicit instance owned by whoever drives the page;
//! nothing here is process-global.

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod loans;
pub mod session;

pub use catalog::CatalogRegistry;
pub use loans::{LoanRegistry, RENEWAL_PERIOD_DAYS};
pub use session::{placeholder_stats, SessionStore};

/// Full-page entry points. Moving between them is a reload: in-memory
/// registries are rebuilt, only the persisted session survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    Index,
    Profile,
}

impl Route {
    pub fn entry_point(self) -> &'static str {
        match self {
            Route::Login => "login.html",
            Route::Index => "index.html",
            Route::Profile => "profile.html",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().trim_end_matches(".html");
        match name {
            "login" => Some(Route::Login),
            "index" | "main" | "" => Some(Route::Index),
            "profile" => Some(Route::Profile),
            _ => None,
        }
    }
}
