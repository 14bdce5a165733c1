use ecow::EcoString;
use mathbox_utils::hash128;
use smallvec::SmallVec;

use crate::layout::{Abs, Point};
use crate::math::SourceRange;
use crate::text::GlyphId;

/// A positioned, sized box of rendered math.
///
/// Extents are measured from the frame's baseline: the ascent upwards, the
/// descent downwards. The position is the offset of the frame's origin (the
/// left end of its baseline) from its parent's origin, with y pointing up.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct Frame {
    /// What the frame shows.
    pub kind: FrameKind,
    /// Offset from the parent's origin.
    pub pos: Point,
    /// The horizontal advance.
    pub width: Abs,
    /// Extent above the baseline.
    pub ascent: Abs,
    /// Extent below the baseline.
    pub descent: Abs,
    /// The source characters this frame was built from.
    pub range: SourceRange,
    /// Whether the nucleus already carries scripts.
    pub has_script: bool,
    /// Nested frames, positioned relative to this one.
    pub children: Vec<Frame>,
}

/// The kind of a frame.
#[derive(Debug, Clone, PartialEq, Hash)]
pub enum FrameKind {
    /// A run of glyphs.
    Glyphs(GlyphRun),
    /// A horizontal list of children.
    Group(GroupStyle),
    /// A fraction or binomial.
    Fraction,
    /// A root.
    Radical,
    /// An accented list.
    Accent,
    /// An operator with limits.
    Limits,
    /// A filled rectangle covering the frame's extents.
    Rule,
    /// A table.
    Table,
}

/// Shaped glyphs at one size.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct GlyphRun {
    /// The text the glyphs show.
    pub text: EcoString,
    /// The glyphs.
    pub glyphs: SmallVec<[GlyphId; 4]>,
    /// The font size.
    pub size: Abs,
}

/// Decoration of a group.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct GroupStyle {
    /// The color of all glyphs and rules in the group.
    pub color: Option<EcoString>,
    /// A background color filling the group's extents.
    pub background: Option<EcoString>,
}

impl Frame {
    /// Create a frame without children.
    pub fn new(kind: FrameKind, width: Abs, ascent: Abs, descent: Abs) -> Self {
        Self {
            kind,
            pos: Point::zero(),
            width,
            ascent,
            descent,
            range: SourceRange::detached(),
            has_script: false,
            children: Vec::new(),
        }
    }

    /// An empty group of the given width.
    pub fn space(width: Abs) -> Self {
        Self::new(FrameKind::Group(GroupStyle::default()), width, Abs::zero(), Abs::zero())
    }

    /// An empty, soft group. Its extents grow with its children.
    pub fn group() -> Self {
        Self::space(Abs::zero())
    }

    /// A rule of the given width and thickness, sitting on the baseline.
    pub fn rule(width: Abs, thickness: Abs) -> Self {
        Self::new(FrameKind::Rule, width, thickness, Abs::zero())
    }

    /// A glyph run.
    pub fn glyphs(run: GlyphRun, width: Abs, ascent: Abs, descent: Abs) -> Self {
        Self::new(FrameKind::Glyphs(run), width, ascent, descent)
    }

    /// The total height.
    pub fn height(&self) -> Abs {
        self.ascent + self.descent
    }

    /// Whether the frame has no children and no glyphs.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && !matches!(self.kind, FrameKind::Glyphs(_) | FrameKind::Rule)
    }

    /// Builder-style method to set the kind.
    pub fn with_kind(mut self, kind: FrameKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder-style method to set the source range.
    pub fn with_range(mut self, range: SourceRange) -> Self {
        self.range = range;
        self
    }

    /// Move the frame relative to its current position.
    pub fn translate(&mut self, offset: Point) {
        self.pos += offset;
    }

    /// Add a child at the given position without changing the extents.
    pub fn push(&mut self, pos: Point, mut child: Frame) {
        child.pos = pos;
        self.children.push(child);
    }

    /// Add a child at the given position and grow the extents to cover it.
    pub fn push_grow(&mut self, pos: Point, child: Frame) {
        self.width.set_max(pos.x + child.width);
        self.ascent.set_max(pos.y + child.ascent);
        self.descent.set_max(child.descent - pos.y);
        self.push(pos, child);
    }

    /// The union of the source ranges of this frame and all descendants.
    pub fn full_range(&self) -> SourceRange {
        self.children
            .iter()
            .fold(self.range, |acc, child| acc.union(child.full_range()))
    }

    /// A 128-bit hash of the whole tree, including positions.
    pub fn fingerprint(&self) -> u128 {
        hash128(self)
    }

    /// The text of all glyph runs, in tree order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.visit(&mut |frame| {
            if let FrameKind::Glyphs(run) = &frame.kind {
                out.push_str(&run.text);
            }
        });
        out
    }

    /// Find the first frame in tree order that satisfies the predicate.
    pub fn find(&self, f: impl Fn(&Frame) -> bool + Copy) -> Option<&Frame> {
        if f(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(f))
    }

    /// Visit this frame and all descendants in tree order.
    pub fn visit(&self, f: &mut impl FnMut(&Frame)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_grow_covers_child() {
        let mut group = Frame::group();
        let rule = Frame::rule(Abs::pt(10.0), Abs::pt(1.0));
        group.push_grow(Point::new(Abs::pt(2.0), Abs::pt(-3.0)), rule);
        assert_eq!(group.width, Abs::pt(12.0));
        assert_eq!(group.ascent, Abs::zero());
        assert_eq!(group.descent, Abs::pt(3.0));
    }

    #[test]
    fn test_fingerprint_sees_positions() {
        let mut a = Frame::group();
        a.push_grow(Point::zero(), Frame::rule(Abs::pt(1.0), Abs::pt(1.0)));
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.children[0].translate(Point::with_x(Abs::pt(0.5)));
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
