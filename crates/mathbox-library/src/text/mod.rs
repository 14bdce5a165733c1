//! Fonts and characters: the metrics contract, its providers and styling.

mod font;
mod static_font;
mod styling;
mod ttf;

pub use self::font::*;
pub use self::static_font::{GlyphShape, StaticFont};
pub use self::styling::*;
pub use self::ttf::TtfFont;
