//! The formula model: atoms, styles, spacing and rendered frames.

mod atom;
mod finalize;
mod frame;
mod range;
mod spacing;
mod style;

pub use self::atom::*;
pub use self::frame::*;
pub use self::range::SourceRange;
pub use self::spacing::*;
pub use self::style::*;
