use mathbox_library::layout::{Abs, Axis, Point};
use mathbox_library::math::{AtomClass, Frame, FrameKind, MathSize, MathStyle, RadicalItem};

use super::{FrameFragment, GlyphFragment, MathContext, MathFragment};

/// Lay out a square root or a root with a degree.
///
/// See the TeXbook, Appendix G, rule 11, and the OpenType MATH radical
/// constants.
pub fn layout_radical(
    ctx: &mut MathContext,
    item: &RadicalItem,
    style: MathStyle,
) -> MathFragment {
    let radicand = ctx.layout_into_frame(&item.radicand, style.cramped());

    let thickness = scaled!(ctx, style, radical_rule_thickness);
    let extra_ascender = scaled!(ctx, style, radical_extra_ascender);
    let gap = if style.size == MathSize::Display {
        scaled!(ctx, style, radical_display_style_vertical_gap)
    } else {
        scaled!(ctx, style, radical_vertical_gap)
    };

    let target = radicand.height() + thickness + gap;
    let mut sqrt = GlyphFragment::new(ctx, '√', style, AtomClass::Ordinary);
    sqrt.stretch(ctx, target, Abs::zero(), Axis::Y);
    let sqrt = sqrt.into_frame();

    // The rule sits on top of the surd. Any extra height of the surd goes
    // into the gap, split evenly above and below the radicand.
    let mut gap = gap;
    let clearance = sqrt.height() - (radicand.height() + gap + thickness);
    if clearance > Abs::zero() {
        gap += clearance / 2.0;
    }
    let rule_y = radicand.ascent + gap;
    let sqrt_y = rule_y + thickness - sqrt.ascent;

    let mut frame = Frame::group().with_kind(FrameKind::Radical);
    let mut x = Abs::zero();

    if let Some(degree) = &item.degree {
        let degree = ctx.layout_into_frame(degree, style.for_degree());
        let kern_before = scaled!(ctx, style, radical_kern_before_degree);
        let kern_after = scaled!(ctx, style, radical_kern_after_degree);
        let raise = ctx.constants.radical_degree_bottom_raise_percent;

        let surd_bottom = sqrt_y - sqrt.descent;
        let degree_y = surd_bottom + raise * sqrt.height() + degree.descent;
        let degree_x = kern_before.max(Abs::zero());
        x = (degree_x + degree.width + kern_after).max(Abs::zero());
        frame.push_grow(Point::new(degree_x, degree_y), degree);
    }

    let sqrt_width = sqrt.width;
    frame.push_grow(Point::new(x, sqrt_y), sqrt);
    x += sqrt_width;

    let width = radicand.width;
    frame.push_grow(Point::new(x, rule_y), Frame::rule(width, thickness));
    frame.push_grow(Point::with_x(x), radicand);
    frame.ascent.set_max(rule_y + thickness + extra_ascender);
    frame.width = x + width;

    FrameFragment::new(ctx, style, frame).into()
}
