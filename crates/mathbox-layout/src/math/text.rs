use ecow::EcoString;
use mathbox_library::layout::{Abs, Axis};
use mathbox_library::math::{
    Atom, AtomClass, AtomKind, Frame, GlyphRun, MathSize, MathStyle,
};
use mathbox_library::text::{FontStyle, dotless};
use smallvec::SmallVec;

use super::{FrameFragment, GlyphFragment, MathContext, MathFragment};

/// Lay out the text of a symbol-like atom.
pub fn layout_text(ctx: &mut MathContext, atom: &Atom, style: MathStyle) -> MathFragment {
    let auto_italic = matches!(atom.kind, AtomKind::Variable);
    let text = styled_text(ctx, &atom.nucleus, atom.font_style, auto_italic);
    layout_glyphs(ctx, &text, style, atom.class())
}

/// Lay out a large operator.
///
/// Single-character operators grow to the display operator height in
/// display style and are centered on the axis. Named operators like `lim`
/// are set upright at the normal size.
pub fn layout_large_operator(
    ctx: &mut MathContext,
    atom: &Atom,
    style: MathStyle,
) -> MathFragment {
    let text = styled_text(ctx, &atom.nucleus, atom.font_style, false);
    let mut chars = text.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return layout_glyphs(ctx, &text, style, AtomClass::LargeOperator);
    };

    let mut glyph = GlyphFragment::new(ctx, c, style, AtomClass::LargeOperator);
    if style.size == MathSize::Display {
        let target = scaled!(ctx, style, display_operator_min_height);
        glyph.stretch(ctx, target, Abs::zero(), Axis::Y);
    }
    // TeXbook p 155. Large operators are always vertically centered on the
    // axis.
    glyph.center_on_axis(scaled!(ctx, style, axis_height));
    glyph.into()
}

/// Apply the atom's font style and, inside accents, the dotless forms.
fn styled_text(
    ctx: &MathContext,
    text: &str,
    font_style: FontStyle,
    auto_italic: bool,
) -> EcoString {
    let styled = font_style.apply(text, auto_italic);
    if ctx.dotless {
        styled.chars().map(dotless).collect()
    } else {
        styled
    }
}

/// Lay out text as a single glyph or as one run of glyphs.
fn layout_glyphs(
    ctx: &mut MathContext,
    text: &str,
    style: MathStyle,
    class: AtomClass,
) -> MathFragment {
    let mut glyphs: SmallVec<[GlyphFragment; 4]> = text
        .chars()
        .map(|c| GlyphFragment::new(ctx, c, style, class))
        .collect();

    if glyphs.len() == 1
        && let Some(glyph) = glyphs.pop()
    {
        return glyph.into();
    }

    let font_size = ctx.font_size(style);
    let width = glyphs.iter().map(GlyphFragment::width).sum();
    let ascent = glyphs.iter().map(GlyphFragment::ascent).max().unwrap_or_default();
    let descent = glyphs.iter().map(GlyphFragment::descent).max().unwrap_or_default();
    let italics = glyphs.last().map(GlyphFragment::italics).unwrap_or_default();
    let run = GlyphRun {
        text: text.into(),
        glyphs: glyphs.iter().map(|glyph| glyph.metrics.id).collect(),
        size: font_size,
    };

    let frame = if glyphs.is_empty() {
        Frame::group()
    } else {
        Frame::glyphs(run, width, ascent, descent)
    };
    FrameFragment::new(ctx, style, frame)
        .with_class(class)
        .with_italics_correction(italics)
        .into()
}
