use log::warn;
use mathbox_library::layout::{Abs, Axis, Point};
use mathbox_library::math::{AtomClass, AtomId, AtomKind, Frame, InnerItem, MathStyle};

use super::{
    DELIM_SHORT_FALL, DELIMITER_FACTOR, DELIMITER_PADDING, FrameFragment, GlyphFragment,
    MathContext, MathFragment, NULL_DELIMITER_SPACE,
};

/// Lay out a list between two stretched boundaries.
pub fn layout_fenced(ctx: &mut MathContext, item: &InnerItem, style: MathStyle) -> MathFragment {
    let body = ctx.layout_into_run(&item.body, style);
    let axis = scaled!(ctx, style, axis_height);
    let extent = (body.ascent() - axis).max(body.descent() + axis);

    // TeXbook p 152: the delimiters cover at least 90.1% of the body and
    // may fall short of it by at most the short fall.
    let target = 2.0 * extent;
    let short_fall = (target * (1.0 - DELIMITER_FACTOR))
        .min(DELIM_SHORT_FALL.at(ctx.font_size(style)));
    let padding = DELIMITER_PADDING.at(ctx.font_size(style));

    let null_space = NULL_DELIMITER_SPACE.at(ctx.font_size(style));

    let mut frame = Frame::group();
    let mut x = Abs::zero();

    match layout_boundary(ctx, item.left, AtomClass::Opening, target, short_fall, style) {
        Some(left) => {
            let width = left.width;
            frame.push_grow(Point::zero(), left);
            x += width + padding;
        }
        None => x += null_space,
    }

    let body = body.into_frame();
    let body_width = body.width;
    frame.push_grow(Point::with_x(x), body);
    x += body_width;

    match layout_boundary(ctx, item.right, AtomClass::Closing, target, short_fall, style) {
        Some(right) => {
            x += padding;
            let width = right.width;
            frame.push_grow(Point::with_x(x), right);
            x += width;
        }
        None => x += null_space,
    }

    frame.width = x;
    FrameFragment::new(ctx, style, frame).with_class(AtomClass::Inner).into()
}

/// Lay out one boundary. Missing boundaries and `.` produce no glyph.
fn layout_boundary(
    ctx: &MathContext,
    id: Option<AtomId>,
    class: AtomClass,
    target: Abs,
    short_fall: Abs,
    style: MathStyle,
) -> Option<Frame> {
    let atom = ctx.tree.get(id?)?;
    if !matches!(atom.kind, AtomKind::Boundary) {
        warn!("{} atom used as a boundary", atom.kind.name());
    }

    let c = atom.nucleus.chars().next().filter(|&c| c != '.')?;
    let mut glyph = GlyphFragment::new(ctx, c, style, class);
    glyph.stretch(ctx, target, short_fall, Axis::Y);
    glyph.center_on_axis(scaled!(ctx, style, axis_height));
    glyph.range = atom.range;
    Some(glyph.into_frame())
}
