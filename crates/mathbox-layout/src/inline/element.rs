use mathbox_library::config::Penalty;
use mathbox_library::layout::Abs;
use mathbox_library::math::{AtomClass, AtomId, Frame, SourceRange};

/// Identifies elements that must end up on the same line.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GroupId(pub u32);

/// What an element shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementPayload {
    /// A run of symbols, letters or digits.
    Text(Frame),
    /// A binary operator, relation or large operator.
    Operator { frame: Frame, class: AtomClass },
    /// Explicit horizontal space.
    Space,
    /// A pre-rendered structure that is never split.
    Display(Frame),
    /// A script of a preceding base element.
    Script { frame: Frame, superscript: bool },
}

/// A unit of a formula that the line fitter can place.
///
/// The payload's frame sits at `lspace` from the start of the element's
/// advance. Its `pos.y` is the vertical offset from the line's baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub payload: ElementPayload,
    pub class: AtomClass,
    /// The horizontal advance, including spacing to the next element.
    pub width: Abs,
    /// Where the frame starts within the advance. Negative for scripts
    /// stacked over an earlier script.
    pub lspace: Abs,
    pub ascent: Abs,
    pub descent: Abs,
    /// Whether a line may break before this element.
    pub break_before: bool,
    /// Whether a line may break after this element.
    pub break_after: bool,
    pub penalty_before: Penalty,
    pub penalty_after: Penalty,
    /// Whether the element stems from a structure that is never split.
    pub indivisible: bool,
    /// Elements sharing a group stay on one line.
    pub group: Option<GroupId>,
    /// The colored run the element belongs to.
    pub parent_group: Option<GroupId>,
    /// The atom the element was made from.
    pub atom: Option<AtomId>,
    pub range: SourceRange,
}

impl Element {
    /// Create an element that can break on both sides.
    ///
    /// Extents and range are taken from the payload's frame.
    pub fn new(payload: ElementPayload, class: AtomClass, width: Abs) -> Self {
        let (ascent, descent, range) = match payload_frame(&payload) {
            Some(frame) => (
                frame.pos.y + frame.ascent,
                frame.descent - frame.pos.y,
                frame.full_range(),
            ),
            None => (Abs::zero(), Abs::zero(), SourceRange::detached()),
        };
        Self {
            payload,
            class,
            width,
            lspace: Abs::zero(),
            ascent,
            descent,
            break_before: true,
            break_after: true,
            penalty_before: Penalty::default(),
            penalty_after: Penalty::default(),
            indivisible: false,
            group: None,
            parent_group: None,
            atom: None,
            range,
        }
    }

    /// Builder-style method to set both penalties.
    pub fn with_penalties(mut self, before: Penalty, after: Penalty) -> Self {
        self.penalty_before = before;
        self.penalty_after = after;
        self
    }

    /// Builder-style method to set the originating atom.
    pub fn with_atom(mut self, atom: AtomId) -> Self {
        self.atom = Some(atom);
        self
    }

    /// The frame the element shows, if any.
    pub fn frame(&self) -> Option<&Frame> {
        payload_frame(&self.payload)
    }

    /// Mutable access to the frame the element shows, if any.
    pub fn frame_mut(&mut self) -> Option<&mut Frame> {
        match &mut self.payload {
            ElementPayload::Text(frame)
            | ElementPayload::Display(frame)
            | ElementPayload::Operator { frame, .. }
            | ElementPayload::Script { frame, .. } => Some(frame),
            ElementPayload::Space => None,
        }
    }

    pub fn is_space(&self) -> bool {
        matches!(self.payload, ElementPayload::Space)
    }

    pub fn is_script(&self) -> bool {
        matches!(self.payload, ElementPayload::Script { .. })
    }
}

fn payload_frame(payload: &ElementPayload) -> Option<&Frame> {
    match payload {
        ElementPayload::Text(frame)
        | ElementPayload::Display(frame)
        | ElementPayload::Operator { frame, .. }
        | ElementPayload::Script { frame, .. } => Some(frame),
        ElementPayload::Space => None,
    }
}

/// Whether a line may break between two adjacent elements.
pub fn can_break_between(left: &Element, right: &Element) -> bool {
    left.break_after
        && right.break_before
        && boundary_penalty(left, right) != Penalty::Never
        && (left.group.is_none() || left.group != right.group)
}

/// The penalty of breaking between two adjacent elements: the worse of the
/// two sides.
pub fn boundary_penalty(left: &Element, right: &Element) -> Penalty {
    left.penalty_after.max(right.penalty_before)
}

#[cfg(test)]
mod tests {
    use mathbox_library::layout::Point;

    use super::*;

    fn text(width: f64) -> Element {
        let frame = Frame::space(Abs::pt(width));
        Element::new(ElementPayload::Text(frame), AtomClass::Ordinary, Abs::pt(width))
    }

    #[test]
    fn test_extents_follow_frame_offset() {
        let mut frame = Frame::rule(Abs::pt(4.0), Abs::pt(2.0));
        frame.pos = Point::with_y(Abs::pt(3.0));
        let element = Element::new(
            ElementPayload::Script { frame, superscript: true },
            AtomClass::Ordinary,
            Abs::pt(4.0),
        );
        assert_eq!(element.ascent, Abs::pt(5.0));
        assert_eq!(element.descent, Abs::pt(-3.0));
        assert!(element.is_script());
    }

    #[test]
    fn test_boundary_penalty_is_worse_side() {
        let left = text(1.0).with_penalties(Penalty::Best, Penalty::Good);
        let right = text(1.0).with_penalties(Penalty::Bad, Penalty::Best);
        assert_eq!(boundary_penalty(&left, &right), Penalty::Bad);
        assert!(can_break_between(&left, &right));
    }

    #[test]
    fn test_same_group_cannot_break() {
        let mut left = text(1.0);
        let mut right = text(1.0);
        left.group = Some(GroupId(1));
        right.group = Some(GroupId(1));
        assert!(!can_break_between(&left, &right));
        right.group = Some(GroupId(2));
        assert!(can_break_between(&left, &right));
        right.break_before = false;
        assert!(!can_break_between(&left, &right));
    }
}
