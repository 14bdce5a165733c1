use serde::{Deserialize, Serialize};

/// The size of elements in a formula.
///
/// See the TeXbook p. 141.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MathSize {
    /// Second-level sub- and superscripts.
    ScriptScript,
    /// Sub- and superscripts.
    Script,
    /// Math in text.
    Text,
    /// Math on its own line.
    #[default]
    Display,
}

impl MathSize {
    /// Whether this is one of the two script sizes.
    pub fn is_script(self) -> bool {
        self <= Self::Script
    }

    /// The size used for scripts attached to something in this size.
    pub fn script(self) -> Self {
        match self {
            Self::Display | Self::Text => Self::Script,
            Self::Script | Self::ScriptScript => Self::ScriptScript,
        }
    }

    /// The size used for the parts of a fraction in this size.
    pub fn fraction(self) -> Self {
        match self {
            Self::Display => Self::Text,
            Self::Text => Self::Script,
            Self::Script | Self::ScriptScript => Self::ScriptScript,
        }
    }
}

/// A math size together with the cramped flag.
///
/// Cramped styles impose a height restriction on superscripts. They are
/// used inside radicals, denominators, subscripts and below accents.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MathStyle {
    /// The size.
    pub size: MathSize,
    /// Whether the style is cramped.
    pub cramped: bool,
}

impl MathStyle {
    /// Create a new style.
    pub const fn new(size: MathSize, cramped: bool) -> Self {
        Self { size, cramped }
    }

    /// The uncramped display style.
    pub const fn display() -> Self {
        Self::new(MathSize::Display, false)
    }

    /// The uncramped text style.
    pub const fn text() -> Self {
        Self::new(MathSize::Text, false)
    }

    /// The same size, cramped.
    pub fn cramped(self) -> Self {
        Self { cramped: true, ..self }
    }

    /// The same cramping, with another size.
    pub fn with_size(self, size: MathSize) -> Self {
        Self { size, ..self }
    }

    /// Whether the size is one of the script sizes.
    pub fn is_script(self) -> bool {
        self.size.is_script()
    }

    /// The style of a superscript attached in this style.
    pub fn for_superscript(self) -> Self {
        Self { size: self.size.script(), cramped: self.cramped }
    }

    /// The style of a subscript attached in this style.
    pub fn for_subscript(self) -> Self {
        Self { size: self.size.script(), cramped: true }
    }

    /// The style of a fraction's numerator.
    pub fn for_numerator(self) -> Self {
        Self { size: self.size.fraction(), cramped: self.cramped }
    }

    /// The style of a fraction's denominator.
    pub fn for_denominator(self) -> Self {
        Self { size: self.size.fraction(), cramped: true }
    }

    /// The style of a radical's degree.
    pub fn for_degree(self) -> Self {
        Self { size: MathSize::ScriptScript, cramped: true }
    }
}
