//! Controller layer: UI events, page bootstrap, and event orchestration.

pub mod bootstrap;
pub mod events;
pub mod orchestration;

pub use bootstrap::{load_page, PageLoad};
pub use events::UiEvent;
pub use orchestration::{ControllerParts, InteractionController};
