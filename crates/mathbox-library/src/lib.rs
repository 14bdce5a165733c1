//! mathbox's data model.
//!
//! - **Layout geometry:** [`layout`] has absolute and font-relative lengths
//!   and points.
//! - **Formulas:** [`math`] has the atom tree that describes a formula, the
//!   math styles and spacing rules, and the frames that rendered formulas
//!   are made of.
//! - **Fonts:** [`text`] defines the [`MathFont`](text::MathFont) contract
//!   and ships a table-driven and an OpenType implementation of it.
//! - **Configuration:** [`config`] and the errors in [`diag`].

pub mod config;
pub mod diag;
pub mod layout;
pub mod math;
pub mod text;
