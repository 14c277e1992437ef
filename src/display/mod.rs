//! Plain-text rendering for terminals and model context.

mod listing;
mod width;
mod wrap;

pub use listing::numbered_listing;
pub use width::{grapheme_width, visible_width};
pub use wrap::{render_labeled, wrap_text};
