use codex::styling::{MathStyle, MathVariant, to_style};
use ecow::EcoString;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// The font style requested for an atom.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    /// Variables in italics, everything else upright.
    #[default]
    Default,
    Roman,
    Bold,
    Italic,
    BoldItalic,
    Caligraphic,
    Typewriter,
    SansSerif,
    Fraktur,
    Blackboard,
}

impl FontStyle {
    /// The variant, boldness and italics to look up styled characters with.
    ///
    /// `auto_italic` decides what the default style does with letters.
    fn select(self, auto_italic: bool) -> (Option<MathVariant>, bool, Option<bool>) {
        let auto = if auto_italic { None } else { Some(false) };
        match self {
            Self::Default => (None, false, auto),
            Self::Roman => (Some(MathVariant::Plain), false, Some(false)),
            Self::Bold => (Some(MathVariant::Plain), true, Some(false)),
            Self::Italic => (Some(MathVariant::Plain), false, Some(true)),
            Self::BoldItalic => (Some(MathVariant::Plain), true, Some(true)),
            Self::Caligraphic => (Some(MathVariant::Chancery), false, Some(false)),
            Self::Typewriter => (Some(MathVariant::Monospace), false, Some(false)),
            Self::SansSerif => (Some(MathVariant::SansSerif), false, Some(false)),
            Self::Fraktur => (Some(MathVariant::Fraktur), false, Some(false)),
            Self::Blackboard => (Some(MathVariant::DoubleStruck), false, Some(false)),
        }
    }

    /// Map text to the characters of this style, e.g. `x` to `𝑥`.
    pub fn apply(self, text: &str, auto_italic: bool) -> EcoString {
        let (variant, bold, italic) = self.select(auto_italic);
        text.chars()
            .flat_map(|c| to_style(c, MathStyle::select(c, variant, bold, italic)))
            .collect()
    }
}

/// Split text into grapheme clusters.
pub fn clusters(text: &str) -> impl Iterator<Item = &str> {
    text.graphemes(true)
}

/// Map small `i` and `j` to their dotless forms so that accents do not
/// collide with the dots. Italic forms map to the italic dotless letters.
pub fn dotless(c: char) -> char {
    match c {
        'i' | '𝐢' | '𝗂' | '𝗶' => 'ı',
        'j' | '𝐣' | '𝗃' | '𝗷' => 'ȷ',
        '𝑖' | '𝒊' | '𝘪' | '𝙞' | '𝚒' => '𝚤',
        '𝑗' | '𝒋' | '𝘫' | '𝙟' | '𝚓' => '𝚥',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_italicizes_variables_only() {
        assert_eq!(FontStyle::Default.apply("x", true), "𝑥");
        assert_eq!(FontStyle::Default.apply("x", false), "x");
        assert_eq!(FontStyle::Default.apply("12", true), "12");
    }

    #[test]
    fn test_explicit_styles() {
        assert_eq!(FontStyle::Bold.apply("A", true), "𝐀");
        assert_eq!(FontStyle::Blackboard.apply("R", true), "ℝ");
        assert_eq!(FontStyle::Roman.apply("x", true), "x");
    }

    #[test]
    fn test_dotless() {
        assert_eq!(dotless('i'), 'ı');
        assert_eq!(dotless('𝑗'), '𝚥');
        assert_eq!(dotless('x'), 'x');
    }
}
