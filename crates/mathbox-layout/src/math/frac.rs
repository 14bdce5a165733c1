use mathbox_library::layout::{Abs, Axis, Point};
use mathbox_library::math::{AtomClass, FractionItem, Frame, FrameKind, MathSize, MathStyle};

use super::{
    DELIM_SHORT_FALL, FrameFragment, GlyphFragment, MathContext, MathFragment,
    NULL_DELIMITER_SPACE,
};

/// Lay out a fraction or, without a rule, a binomial-like stack.
///
/// See the TeXbook, Appendix G, rules 15a-e.
pub fn layout_fraction(
    ctx: &mut MathContext,
    item: &FractionItem,
    style: MathStyle,
) -> MathFragment {
    let display = style.size == MathSize::Display;
    let axis = scaled!(ctx, style, axis_height);
    let thickness = if item.has_rule {
        scaled!(ctx, style, fraction_rule_thickness)
    } else {
        Abs::zero()
    };

    let num = ctx.layout_into_frame(&item.numerator, style.for_numerator());
    let denom = ctx.layout_into_frame(&item.denominator, style.for_denominator());

    let (mut shift_up, mut shift_down) = match (item.has_rule, display) {
        (true, true) => (
            scaled!(ctx, style, fraction_numerator_display_style_shift_up),
            scaled!(ctx, style, fraction_denominator_display_style_shift_down),
        ),
        (true, false) => (
            scaled!(ctx, style, fraction_numerator_shift_up),
            scaled!(ctx, style, fraction_denominator_shift_down),
        ),
        (false, true) => (
            scaled!(ctx, style, stack_top_display_style_shift_up),
            scaled!(ctx, style, stack_bottom_display_style_shift_down),
        ),
        (false, false) => (
            scaled!(ctx, style, stack_top_shift_up),
            scaled!(ctx, style, stack_bottom_shift_down),
        ),
    };

    if item.has_rule {
        let (num_gap, denom_gap) = if display {
            (
                scaled!(ctx, style, fraction_num_display_style_gap_min),
                scaled!(ctx, style, fraction_denom_display_style_gap_min),
            )
        } else {
            (
                scaled!(ctx, style, fraction_numerator_gap_min),
                scaled!(ctx, style, fraction_denominator_gap_min),
            )
        };
        shift_up.set_max(axis + thickness / 2.0 + num_gap + num.descent);
        shift_down.set_max(denom_gap + thickness / 2.0 - axis + denom.ascent);
    } else {
        let gap_min = if display {
            scaled!(ctx, style, stack_display_style_gap_min)
        } else {
            scaled!(ctx, style, stack_gap_min)
        };
        let gap = (shift_up - num.descent) - (denom.ascent - shift_down);
        if gap < gap_min {
            let half = (gap_min - gap) / 2.0;
            shift_up += half;
            shift_down += half;
        }
    }

    // The delimiters enclose both parts, centered on the axis.
    let extent = (shift_up + num.ascent - axis).max(shift_down + denom.descent + axis);
    let target = (2.0 * extent).max(scaled!(ctx, style, delimited_sub_formula_min_height));
    let null_space = NULL_DELIMITER_SPACE.at(ctx.font_size(style));

    let width = num.width.max(denom.width);
    let mut frame = Frame::group().with_kind(FrameKind::Fraction);
    let mut x = Abs::zero();

    if let Some(delimiter) = &item.left {
        match layout_delimiter(ctx, delimiter, target, style) {
            Some(left) => {
                x = left.width;
                frame.push_grow(Point::zero(), left);
            }
            None => x = null_space,
        }
    }

    let num_x = x + item.align.position(width - num.width);
    let denom_x = x + item.align.position(width - denom.width);
    frame.push_grow(Point::new(num_x, shift_up), num);
    frame.push_grow(Point::new(denom_x, -shift_down), denom);
    if item.has_rule {
        let rule = Frame::rule(width, thickness);
        frame.push_grow(Point::new(x, axis - thickness / 2.0), rule);
    }
    x += width;

    if let Some(delimiter) = &item.right {
        match layout_delimiter(ctx, delimiter, target, style) {
            Some(right) => {
                let advance = right.width;
                frame.push_grow(Point::with_x(x), right);
                x += advance;
            }
            None => x += null_space,
        }
    }

    frame.width = x;
    FrameFragment::new(ctx, style, frame).with_class(AtomClass::Inner).into()
}

/// Lay out a delimiter stretched to the target height and centered on the
/// axis. Empty delimiters and `.` produce no glyph.
fn layout_delimiter(
    ctx: &MathContext,
    delimiter: &str,
    target: Abs,
    style: MathStyle,
) -> Option<Frame> {
    let c = delimiter.chars().next().filter(|&c| c != '.')?;
    let mut glyph = GlyphFragment::new(ctx, c, style, AtomClass::Ordinary);
    glyph.stretch(ctx, target, DELIM_SHORT_FALL.at(ctx.font_size(style)), Axis::Y);
    glyph.center_on_axis(scaled!(ctx, style, axis_height));
    Some(glyph.into_frame())
}
