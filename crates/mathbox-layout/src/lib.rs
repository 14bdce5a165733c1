//! mathbox's layout engine.
//!
//! [`layout`] typesets an atom list into one frame. [`tokenize`], [`fit`]
//! and [`generate`] do the same across several lines of bounded width.

mod inline;
mod math;

pub use self::inline::{
    Element, ElementPayload, GroupId, Measurer, OperatorMetrics, PreRenderer,
    boundary_penalty, can_break_between, fit, generate, tokenize, tokenize_list,
};
pub use self::math::{AttachedParts, layout};

use mathbox_library::config::LayoutConfig;
use mathbox_library::layout::{Abs, Point};
use mathbox_library::math::{AtomTree, Frame};
use mathbox_library::text::MathFont;

/// Typeset a whole tree into lines no wider than `max_width`.
///
/// The first baseline is at the origin and lines go downwards.
pub fn typeset_lines(
    tree: &AtomTree,
    font: &dyn MathFont,
    config: &LayoutConfig,
    max_width: Abs,
) -> Vec<Frame> {
    let elements = tokenize(tree, font, config);
    let lines = fit(elements, max_width, Abs::zero(), &config.fit);
    generate(&lines, Point::zero(), config)
}
