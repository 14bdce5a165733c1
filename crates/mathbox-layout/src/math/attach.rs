use mathbox_library::layout::{Abs, Point};
use mathbox_library::math::{
    Atom, AtomClass, AtomKind, Frame, FrameKind, GroupStyle, MathStyle, SourceRange,
};

use super::{MathContext, MathFragment};

/// An atom's nucleus and scripts, positioned but not yet merged.
///
/// Positions are relative to the origin of the nucleus.
#[derive(Debug, Clone)]
pub struct AttachedParts {
    pub base: Frame,
    pub superscript: Option<Frame>,
    pub subscript: Option<Frame>,
    /// The advance of the whole, including the space after scripts.
    pub width: Abs,
    /// Whether the scripts sit above and below the nucleus.
    pub limits: bool,
    pub class: AtomClass,
    pub range: SourceRange,
}

impl AttachedParts {
    /// The nucleus, then the subscript and the superscript.
    pub fn parts(&self) -> impl Iterator<Item = &Frame> {
        std::iter::once(&self.base).chain(&self.subscript).chain(&self.superscript)
    }

    /// Merge the parts into one frame.
    pub fn into_frame(self) -> Frame {
        let kind = if self.limits {
            FrameKind::Limits
        } else {
            FrameKind::Group(GroupStyle::default())
        };
        let mut frame = Frame::group().with_kind(kind).with_range(self.range);
        let Self { base, superscript, subscript, width, .. } = self;
        for part in std::iter::once(base).chain(subscript).chain(superscript) {
            let pos = part.pos;
            frame.push_grow(pos, part);
        }
        frame.width = width;
        frame.has_script = true;
        frame
    }
}

/// Lay out the scripts of an atom around an already laid out nucleus.
pub fn layout_attachments(
    ctx: &mut MathContext,
    atom: &Atom,
    base: MathFragment,
    style: MathStyle,
) -> AttachedParts {
    let superscript = atom
        .superscript
        .as_ref()
        .map(|list| ctx.layout_into_fragment(list, style.for_superscript()));
    let subscript = atom
        .subscript
        .as_ref()
        .map(|list| ctx.layout_into_fragment(list, style.for_subscript()));

    let limits = matches!(&atom.kind, AtomKind::LargeOperator(item) if item.limits);
    if limits {
        layout_limits(ctx, base, superscript, subscript, style)
    } else {
        layout_scripts(ctx, base, superscript, subscript, style)
    }
}

/// Place scripts to the right of the nucleus. See the TeXbook, Appendix G,
/// rules 18a-f.
fn layout_scripts(
    ctx: &MathContext,
    base: MathFragment,
    sup: Option<MathFragment>,
    sub: Option<MathFragment>,
    style: MathStyle,
) -> AttachedParts {
    let class = base.class();
    let is_large = class == AtomClass::LargeOperator;
    let italics = base.italics_correction();
    let (base_width, base_ascent, base_descent) = (base.width(), base.ascent(), base.descent());

    // A single character gets no baseline drop.
    let (sup_drop_max, sub_drop_min) = if base.is_character() {
        (base_ascent, -base_descent)
    } else {
        (
            scaled!(ctx, style, superscript_baseline_drop_max),
            scaled!(ctx, style, subscript_baseline_drop_min),
        )
    };

    let mut sup_shift = Abs::zero();
    if let Some(sup) = &sup {
        let shift_up = if style.cramped {
            scaled!(ctx, style, superscript_shift_up_cramped)
        } else {
            scaled!(ctx, style, superscript_shift_up)
        };
        sup_shift = shift_up
            .max(base_ascent - sup_drop_max)
            .max(scaled!(ctx, style, superscript_bottom_min) + sup.descent());
    }

    let mut sub_shift = Abs::zero();
    if let Some(sub) = &sub {
        sub_shift = scaled!(ctx, style, subscript_shift_down)
            .max(sub.ascent() - scaled!(ctx, style, subscript_top_max))
            .max(base_descent + sub_drop_min);
    }

    if let (Some(sup), Some(sub)) = (&sup, &sub) {
        let gap = (sup_shift - sup.descent()) - (sub.ascent() - sub_shift);
        let gap_min = scaled!(ctx, style, sub_superscript_gap_min);
        if gap < gap_min {
            let mut increase = gap_min - gap;
            let sup_room = scaled!(ctx, style, superscript_bottom_max_with_subscript)
                + sup.descent()
                - sup_shift;
            if sup_room > Abs::zero() {
                let raise = increase.min(sup_room);
                sup_shift += raise;
                increase -= raise;
            }
            sub_shift += increase;
        }
    }

    let (sup_x, sub_x) = if is_large {
        (base_width, base_width - italics)
    } else {
        (base_width + italics, base_width)
    };

    let mut width = base_width;
    let superscript = sup.map(|sup| {
        width.set_max(sup_x + sup.width());
        let mut frame = sup.into_frame();
        frame.pos = Point::new(sup_x, sup_shift);
        frame
    });
    let subscript = sub.map(|sub| {
        width.set_max(sub_x + sub.width());
        let mut frame = sub.into_frame();
        frame.pos = Point::new(sub_x, -sub_shift);
        frame
    });
    width += scaled!(ctx, style, space_after_script);

    AttachedParts {
        base: base.into_frame(),
        superscript,
        subscript,
        width,
        limits: false,
        class,
        range: SourceRange::detached(),
    }
}

/// Place scripts above and below the nucleus. See the TeXbook, Appendix G,
/// rule 13a.
fn layout_limits(
    ctx: &MathContext,
    base: MathFragment,
    sup: Option<MathFragment>,
    sub: Option<MathFragment>,
    style: MathStyle,
) -> AttachedParts {
    let class = base.class();
    let italics = base.italics_correction();
    let width = [Some(&base), sup.as_ref(), sub.as_ref()]
        .into_iter()
        .flatten()
        .map(MathFragment::width)
        .max()
        .unwrap_or_default();

    let (base_ascent, base_descent) = (base.ascent(), base.descent());
    let superscript = sup.map(|sup| {
        let rise = (scaled!(ctx, style, upper_limit_gap_min) + sup.descent())
            .max(scaled!(ctx, style, upper_limit_baseline_rise_min));
        let x = (width - sup.width()) / 2.0 + italics / 2.0;
        let mut frame = sup.into_frame();
        frame.pos = Point::new(x, base_ascent + rise);
        frame
    });
    let subscript = sub.map(|sub| {
        let drop = (scaled!(ctx, style, lower_limit_gap_min) + sub.ascent())
            .max(scaled!(ctx, style, lower_limit_baseline_drop_min));
        let x = (width - sub.width()) / 2.0 - italics / 2.0;
        let mut frame = sub.into_frame();
        frame.pos = Point::new(x, -(base_descent + drop));
        frame
    });

    let base_x = (width - base.width()) / 2.0;
    let mut base = base.into_frame();
    base.pos = Point::with_x(base_x);

    AttachedParts {
        base,
        superscript,
        subscript,
        width,
        limits: true,
        class,
        range: SourceRange::detached(),
    }
}
