use mathbox_library::layout::Point;
use mathbox_library::math::{AtomList, Frame, MathStyle};

use super::{FrameFragment, MathContext, MathFragment};

/// Lay out a list with a rule below or above it.
pub fn layout_line(
    ctx: &mut MathContext,
    body: &AtomList,
    under: bool,
    style: MathStyle,
) -> MathFragment {
    let (content, rule_y, thickness, extra);
    if under {
        content = ctx.layout_into_fragment(body, style);
        thickness = scaled!(ctx, style, underbar_rule_thickness);
        let gap = scaled!(ctx, style, underbar_vertical_gap);
        extra = scaled!(ctx, style, underbar_extra_descender);
        rule_y = -(content.descent() + gap + thickness);
    } else {
        content = ctx.layout_into_fragment(body, style.cramped());
        thickness = scaled!(ctx, style, overbar_rule_thickness);
        let gap = scaled!(ctx, style, overbar_vertical_gap);
        extra = scaled!(ctx, style, overbar_extra_ascender);
        rule_y = content.ascent() + gap;
    }

    let italics = content.italics_correction();
    let width = content.width();

    let mut frame = Frame::group();
    frame.push_grow(Point::zero(), content.into_frame());
    frame.push_grow(Point::with_y(rule_y), Frame::rule(width, thickness));
    if under {
        frame.descent.set_max(-rule_y + extra);
    } else {
        frame.ascent.set_max(rule_y + thickness + extra);
    }
    frame.width = width;

    FrameFragment::new(ctx, style, frame)
        .with_italics_correction(italics)
        .into()
}
