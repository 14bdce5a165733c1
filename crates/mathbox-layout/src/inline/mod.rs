//! Breaking formulas across lines.
//!
//! The tokenizer flattens an atom tree into [`Element`]s, the line fitter
//! partitions them into lines and the generator positions the lines.

mod element;
mod finalize;
mod linebreak;
mod measure;
mod prerender;
mod tokenize;

pub use self::element::{
    Element, ElementPayload, GroupId, boundary_penalty, can_break_between,
};
pub use self::finalize::generate;
pub use self::linebreak::fit;
pub use self::measure::{Measurer, OperatorMetrics};
pub use self::prerender::PreRenderer;
pub use self::tokenize::{tokenize, tokenize_list};
