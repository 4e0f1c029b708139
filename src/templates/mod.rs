//! HTML templates and styling for the web interface.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constants
//! - `components` - Search bar, output card, notes list, base template

mod components;
mod styles;

pub use components::{base_html, notes_list, output_card, render_page, search_bar};
pub use styles::STYLE;
