//! Errors reported at the fallible seams: font loading, tree building and
//! configuration.

use thiserror::Error;

use crate::layout::Abs;
use crate::math::AtomId;

/// A font could not be used for math layout.
#[derive(Debug, Error)]
pub enum FontError {
    /// The font data is malformed.
    #[error("failed to parse font")]
    Parse(#[from] ttf_parser::FaceParsingError),
    /// The font has no MATH table.
    #[error("font is not a math font (no MATH table)")]
    NoMathTable,
    /// The font's MATH table lacks the constants subtable.
    #[error("font's MATH table has no constants")]
    NoMathConstants,
}

/// An atom tree could not be built as requested.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AtomError {
    /// The id does not belong to the tree.
    #[error("atom {0:?} does not exist in this tree")]
    UnknownAtom(AtomId),
    /// Inner atoms can only be delimited by boundary atoms.
    #[error("{kind} atom {id:?} cannot delimit an inner list")]
    NotABoundary { id: AtomId, kind: &'static str },
    /// The attachment would make the atom its own descendant.
    #[error("atom {0:?} cannot contain itself")]
    Cycle(AtomId),
}

/// A layout configuration is inconsistent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Penalty values must grow from best to bad.
    #[error("penalty values must strictly increase from best to bad")]
    PenaltyOrder,
    /// The fitter must consider at least one boundary.
    #[error("look-ahead must consider at least one boundary")]
    ZeroLookahead,
    /// The step-back cost must be a non-negative number.
    #[error("step-back cost must be non-negative, found {0}")]
    StepBackCost(f64),
    /// The font size must be a positive, finite length.
    #[error("font size must be positive, found {0:?}")]
    FontSize(Abs),
    /// The minimum line advance must be a non-negative number.
    #[error("minimum line advance must be non-negative, found {0}")]
    LineAdvance(f64),
}
