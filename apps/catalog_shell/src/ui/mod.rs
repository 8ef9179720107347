//! Presentation layer: page slots, rendering, notifications and prompts.

pub mod confirm;
pub mod notifications;
pub mod page;
pub mod renderer;
pub mod strings;

pub use page::Document;
pub use renderer::ViewRenderer;
