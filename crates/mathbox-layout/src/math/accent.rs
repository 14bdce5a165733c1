use mathbox_library::layout::{Abs, Axis, Point};
use mathbox_library::math::{AccentItem, Atom, AtomKind, Frame, FrameKind, MathStyle};

use super::{FrameFragment, GlyphFragment, MathContext, MathFragment};

/// Lay out an accented list.
pub fn layout_accent(
    ctx: &mut MathContext,
    atom: &Atom,
    item: &AccentItem,
    style: MathStyle,
) -> MathFragment {
    // Accents over a lone `i` or `j` replace the dot.
    let prev = ctx.dotless;
    ctx.dotless = is_lone_symbol(ctx, item);
    let base = ctx.layout_into_fragment(&item.inner, style.cramped());
    ctx.dotless = prev;

    // Preserve class to preserve automatic spacing.
    let base_class = base.class();
    let base_attach = base.accent_attach();
    let base_italics = base.italics_correction();
    let base_width = base.width();

    let Some(c) = atom.nucleus.chars().next() else {
        return base;
    };
    let mut glyph = GlyphFragment::new(ctx, c, style, base_class);
    if item.wide {
        glyph.stretch(ctx, base_width, Abs::zero(), Axis::X);
    }
    let accent_attach = glyph.accent_attach();

    // Bases shorter than the accent base height keep the accent at its
    // designed position. Taller ones push it up by the difference.
    let shift = (base.ascent() - scaled!(ctx, style, accent_base_height)).max(Abs::zero());
    let accent = glyph.into_frame();

    let mut frame = Frame::group().with_kind(FrameKind::Accent);
    frame.push_grow(Point::zero(), base.into_frame());
    frame.push_grow(Point::new(base_attach - accent_attach, shift), accent);
    frame.width = base_width;

    FrameFragment::new(ctx, style, frame)
        .with_class(base_class)
        .with_italics_correction(base_italics)
        .with_accent_attach(base_attach)
        .into()
}

/// Whether the accentee is a single symbol without scripts.
fn is_lone_symbol(ctx: &MathContext, item: &AccentItem) -> bool {
    let [id] = item.inner.as_slice() else { return false };
    ctx.tree.get(*id).is_some_and(|atom| {
        !atom.has_scripts()
            && matches!(
                atom.kind,
                AtomKind::Ordinary | AtomKind::Variable | AtomKind::Placeholder
            )
    })
}
