use crate::layout::{Abs, Em};
use crate::math::MathSize;

/// Thin spacing, 3mu.
pub const THIN: Em = Em::new(1.0 / 6.0);
/// Medium spacing, 4mu.
pub const MEDIUM: Em = Em::new(2.0 / 9.0);
/// Thick spacing, 5mu.
pub const THICK: Em = Em::new(5.0 / 18.0);
/// A quad, 18mu.
pub const QUAD: Em = Em::new(1.0);

/// The class of an atom for the purpose of spacing and line breaking.
///
/// These are the eight classes of the TeXbook, chapter 17.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AtomClass {
    Ordinary,
    LargeOperator,
    Binary,
    Relation,
    Opening,
    Closing,
    Punctuation,
    Inner,
}

impl AtomClass {
    /// Whether atoms of this class are laid out as operators with baked in
    /// spacing when tokenized.
    pub fn is_operator(self) -> bool {
        matches!(self, Self::Binary | Self::Relation | Self::LargeOperator)
    }
}

/// One entry of the inter-atom spacing table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Spacing {
    /// No space.
    None,
    /// Thin space in all sizes.
    Thin,
    /// Thin space, except in script sizes.
    NonScriptThin,
    /// Medium space, except in script sizes.
    NonScriptMedium,
    /// Thick space, except in script sizes.
    NonScriptThick,
    /// The pair cannot occur in a finalized list.
    Invalid,
}

impl Spacing {
    /// The amount of space in the given size.
    pub fn amount(self, size: MathSize) -> Em {
        match self {
            Self::None | Self::Invalid => Em::zero(),
            Self::Thin => THIN,
            _ if size.is_script() => Em::zero(),
            Self::NonScriptThin => THIN,
            Self::NonScriptMedium => MEDIUM,
            Self::NonScriptThick => THICK,
        }
    }
}

/// Look up the spacing between two adjacent atom classes.
pub fn spacing_entry(l: AtomClass, r: AtomClass) -> Spacing {
    use AtomClass::*;

    match (l, r) {
        // A binary operator needs an operand on each side.
        (Binary, Binary | Relation | Closing | Punctuation)
        | (LargeOperator | Relation | Opening | Punctuation, Binary) => Spacing::Invalid,

        // Thin spacing around large operators, even in scripts.
        (Ordinary | LargeOperator | Closing | Inner, LargeOperator)
        | (LargeOperator, Ordinary) => Spacing::Thin,

        // Thick spacing around relations, unless followed by another relation.
        (Ordinary | LargeOperator | Closing | Inner, Relation)
        | (Relation, Ordinary | LargeOperator | Opening | Inner) => Spacing::NonScriptThick,

        // Medium spacing around binary operators.
        (Ordinary | Closing | Inner, Binary)
        | (Binary, Ordinary | LargeOperator | Opening | Inner) => Spacing::NonScriptMedium,

        // Thin spacing after punctuation and around inner atoms.
        (Ordinary | LargeOperator | Closing, Inner)
        | (Inner, Ordinary | Opening | Punctuation | Inner)
        | (Punctuation, _) => Spacing::NonScriptThin,

        _ => Spacing::None,
    }
}

/// The spacing between two adjacent atoms, resolved to a length.
///
/// An invalid pair is spaced as if the left atom were ordinary.
pub fn spacing(l: AtomClass, r: AtomClass, size: MathSize, font_size: Abs) -> Abs {
    let entry = match spacing_entry(l, r) {
        Spacing::Invalid => spacing_entry(AtomClass::Ordinary, r),
        entry => entry,
    };
    entry.amount(size).at(font_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use AtomClass::*;

    #[test]
    fn test_spacing_table_matches_texbook() {
        assert_eq!(spacing_entry(Ordinary, Binary), Spacing::NonScriptMedium);
        assert_eq!(spacing_entry(Ordinary, Relation), Spacing::NonScriptThick);
        assert_eq!(spacing_entry(Ordinary, LargeOperator), Spacing::Thin);
        assert_eq!(spacing_entry(Relation, Relation), Spacing::None);
        assert_eq!(spacing_entry(Opening, Ordinary), Spacing::None);
        assert_eq!(spacing_entry(Punctuation, Ordinary), Spacing::NonScriptThin);
        assert_eq!(spacing_entry(Inner, Closing), Spacing::None);
        assert_eq!(spacing_entry(Binary, Binary), Spacing::Invalid);
        assert_eq!(spacing_entry(Opening, Binary), Spacing::Invalid);
    }

    #[test]
    fn test_spacing_vanishes_in_scripts() {
        let size = Abs::pt(18.0);
        assert!(spacing(Ordinary, Binary, MathSize::Text, size).approx_eq(Abs::pt(4.0)));
        assert_eq!(spacing(Ordinary, Binary, MathSize::Script, size), Abs::zero());
        assert!(spacing(LargeOperator, Ordinary, MathSize::Script, size).approx_eq(Abs::pt(3.0)));
    }

    #[test]
    fn test_invalid_pair_treats_left_as_ordinary() {
        let size = Abs::pt(18.0);
        assert_eq!(
            spacing(Binary, Binary, MathSize::Display, size),
            spacing(Ordinary, Binary, MathSize::Display, size),
        );
    }
}
