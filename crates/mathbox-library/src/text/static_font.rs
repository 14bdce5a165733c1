use mathbox_utils::singleton;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::layout::{Axis, Em};
use crate::text::{GlyphId, GlyphMetrics, GlyphVariant, MathConstants, MathFont};

/// Marks glyph ids of stretch variants.
const VARIANT_FLAG: u32 = 1 << 31;
/// Marks vertical stretch variants.
const VERTICAL_FLAG: u32 = 1 << 30;

/// The shape of one glyph, relative to the font size.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphShape {
    pub advance: Em,
    pub ascent: Em,
    pub descent: Em,
    pub italics: Em,
    pub accent_attach: Option<Em>,
}

impl GlyphShape {
    /// A shape without italics correction and accent attachment.
    pub fn new(advance: f64, ascent: f64, descent: f64) -> Self {
        Self {
            advance: Em::new(advance),
            ascent: Em::new(ascent),
            descent: Em::new(descent),
            italics: Em::zero(),
            accent_attach: None,
        }
    }

    /// Builder-style method to set the italics correction.
    pub fn with_italics(mut self, italics: f64) -> Self {
        self.italics = Em::new(italics);
        self
    }

    fn metrics(self, id: GlyphId) -> GlyphMetrics {
        GlyphMetrics {
            id,
            advance: self.advance,
            ascent: self.ascent,
            descent: self.descent,
            italics: self.italics,
            accent_attach: self.accent_attach,
        }
    }
}

impl Default for GlyphShape {
    /// A lowercase letter without ascender.
    fn default() -> Self {
        Self::new(0.5, 0.45, 0.0)
    }
}

/// A font described by tables instead of font data.
///
/// Glyph ids are the code points of the characters, so a `StaticFont` is
/// easy to build by hand and fully deterministic. It can be loaded from any
/// serde format, which lets hosts describe the metrics of a font they render
/// with some other machinery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFont {
    /// The math constants.
    pub constants: MathConstants,
    /// The shape of characters without an entry in `glyphs`. If `None`, such
    /// characters are missing from the font.
    pub fallback: Option<GlyphShape>,
    /// Per-character shapes.
    pub glyphs: FxHashMap<char, GlyphShape>,
    /// Taller versions of characters, smallest first.
    pub vertical: FxHashMap<char, Vec<GlyphShape>>,
    /// Wider versions of characters, smallest first.
    pub horizontal: FxHashMap<char, Vec<GlyphShape>>,
}

impl StaticFont {
    /// A font where every character has the fallback shape and nothing
    /// stretches.
    pub fn uniform(constants: MathConstants) -> Self {
        Self {
            constants,
            fallback: Some(GlyphShape::default()),
            glyphs: FxHashMap::default(),
            vertical: FxHashMap::default(),
            horizontal: FxHashMap::default(),
        }
    }

    /// Set the shape of some characters.
    pub fn with_glyphs(mut self, chars: &str, shape: GlyphShape) -> Self {
        self.glyphs.extend(chars.chars().map(|c| (c, shape)));
        self
    }

    /// Set the stretch variants of some characters.
    pub fn with_variants(mut self, chars: &str, axis: Axis, variants: Vec<GlyphShape>) -> Self {
        let map = match axis {
            Axis::X => &mut self.horizontal,
            Axis::Y => &mut self.vertical,
        };
        map.extend(chars.chars().map(|c| (c, variants.clone())));
        self
    }

    /// A shared instance of the default font.
    pub fn shared() -> &'static Self {
        singleton!(StaticFont, StaticFont::default())
    }

    fn shape(&self, c: char) -> Option<GlyphShape> {
        self.glyphs.get(&c).copied().or(self.fallback)
    }

    fn variant_list(&self, c: char, axis: Axis) -> Option<&Vec<GlyphShape>> {
        match axis {
            Axis::X => self.horizontal.get(&c),
            Axis::Y => self.vertical.get(&c),
        }
    }
}

impl Default for StaticFont {
    /// A font with metrics close to Latin Modern Math for the characters
    /// that matter for layout decisions.
    fn default() -> Self {
        let delimiters = (1..=4)
            .map(|i| {
                let height = 0.6 + 0.6 * i as f64;
                GlyphShape::new(0.4 + 0.1 * i as f64, height / 2.0 + 0.25, height / 2.0 - 0.25)
            })
            .collect();
        let radicals = (1..=4)
            .map(|i| {
                let height = 0.6 + 0.6 * i as f64;
                GlyphShape::new(0.833 + 0.2 * i as f64, height * 0.8, height * 0.2)
            })
            .collect();
        let operators = vec![GlyphShape::new(1.444, 0.95, 0.45)];
        let integrals = vec![GlyphShape::new(0.944, 1.36, 0.86).with_italics(0.36)];
        let accents = (1..=4)
            .map(|i| {
                let mut shape = GlyphShape::new(0.4 + 0.4 * i as f64, 0.72, -0.55);
                shape.accent_attach = Some(shape.advance / 2.0);
                shape
            })
            .collect();

        let mut accent = GlyphShape::new(0.5, 0.7, -0.55);
        accent.accent_attach = Some(Em::new(0.25));

        Self::uniform(MathConstants::default())
            .with_glyphs("0123456789", GlyphShape::new(0.5, 0.65, 0.0))
            .with_glyphs("()[]{}|⟨⟩⌈⌉⌊⌋‖", GlyphShape::new(0.389, 0.75, 0.25))
            .with_glyphs("√", GlyphShape::new(0.833, 0.8, 0.2))
            .with_glyphs("∑∏∐⋃⋂⨁⨂", GlyphShape::new(1.056, 0.75, 0.25))
            .with_glyphs("∫∮", GlyphShape::new(0.556, 0.8, 0.3).with_italics(0.194))
            .with_glyphs("+−=<>×÷±∓·≤≥≠≈→←∈", GlyphShape::new(0.778, 0.583, 0.083))
            .with_glyphs(",;.", GlyphShape::new(0.278, 0.1, 0.2))
            .with_glyphs("\u{300}\u{301}\u{302}\u{303}\u{304}\u{307}\u{308}\u{20D7}", accent)
            .with_variants("()[]{}|⟨⟩⌈⌉⌊⌋‖", Axis::Y, delimiters)
            .with_variants("√", Axis::Y, radicals)
            .with_variants("∑∏∐⋃⋂⨁⨂", Axis::Y, operators)
            .with_variants("∫∮", Axis::Y, integrals)
            .with_variants("\u{302}\u{303}\u{304}\u{20D7}", Axis::X, accents)
    }
}

impl MathFont for StaticFont {
    fn constants(&self) -> &MathConstants {
        &self.constants
    }

    fn glyph(&self, c: char) -> Option<GlyphMetrics> {
        self.shape(c).map(|shape| shape.metrics(GlyphId(c as u32)))
    }

    fn glyph_by_id(&self, id: GlyphId) -> Option<GlyphMetrics> {
        if id.0 & VARIANT_FLAG == 0 {
            return self.glyph(char::from_u32(id.0)?);
        }
        let axis = if id.0 & VERTICAL_FLAG != 0 { Axis::Y } else { Axis::X };
        let c = char::from_u32((id.0 & !(VARIANT_FLAG | VERTICAL_FLAG)) >> 4)?;
        let shape = self.variant_list(c, axis)?.get((id.0 & 0xF) as usize)?;
        Some(shape.metrics(id))
    }

    fn variants(&self, glyph: GlyphId, axis: Axis) -> SmallVec<[GlyphVariant; 8]> {
        let Some(c) = char::from_u32(glyph.0) else { return SmallVec::new() };
        let Some(list) = self.variant_list(c, axis) else { return SmallVec::new() };
        let axis_flag = if axis == Axis::Y { VERTICAL_FLAG } else { 0 };
        list.iter()
            .take(16)
            .enumerate()
            .map(|(i, shape)| {
                let id = GlyphId(VARIANT_FLAG | axis_flag | (c as u32) << 4 | i as u32);
                let advance = match axis {
                    Axis::X => shape.advance,
                    Axis::Y => shape.ascent + shape.descent,
                };
                GlyphVariant { metrics: shape.metrics(id), advance }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_ids_resolve() {
        let font = StaticFont::default();
        let paren = font.glyph('(').unwrap();
        let variants = font.variants(paren.id, Axis::Y);
        assert_eq!(variants.len(), 4);
        assert!(variants.windows(2).all(|w| w[0].advance < w[1].advance));
        for variant in &variants {
            assert_eq!(font.glyph_by_id(variant.metrics.id), Some(variant.metrics));
        }
        assert!(font.variants(paren.id, Axis::X).is_empty());
    }

    #[test]
    fn test_missing_glyphs_without_fallback() {
        let mut font = StaticFont::default();
        assert!(font.glyph('q').is_some());
        font.fallback = None;
        assert!(font.glyph('q').is_none());
        assert!(font.glyph('+').is_some());
    }

    #[test]
    fn test_constants_from_json() {
        let font: StaticFont =
            serde_json::from_str(r#"{"constants": {"axis_height": 0.3}}"#).unwrap();
        assert_eq!(font.constants.axis_height, Em::new(0.3));
        assert_eq!(
            font.constants.fraction_rule_thickness,
            MathConstants::default().fraction_rule_thickness,
        );
        assert_eq!(font.glyphs, StaticFont::default().glyphs);
    }
}
