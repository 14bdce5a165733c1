use mathbox_library::layout::{Abs, Point};
use mathbox_library::math::{AtomClass, Frame, MathStyle, SourceRange, spacing};

use super::{FrameFragment, MathContext, MathFragment, SpaceFragment};

/// A horizontal run of fragments with inter-atom spacing between them.
#[derive(Debug, Default, Clone)]
pub struct MathRun(Vec<MathFragment>);

impl MathRun {
    /// Create a run and insert the spacing the atom classes call for.
    ///
    /// Spacing depends on the size of the right fragment. Explicit spaces
    /// neither receive nor break spacing.
    pub fn new(fragments: Vec<MathFragment>) -> Self {
        let mut resolved = Vec::with_capacity(fragments.len());
        let mut last: Option<AtomClass> = None;
        for fragment in fragments {
            if !fragment.is_spaced() {
                resolved.push(fragment);
                continue;
            }

            let class = fragment.class();
            if let Some(prev) = last {
                let amount = spacing(prev, class, fragment.math_size(), fragment.font_size());
                if amount != Abs::zero() {
                    resolved.push(MathFragment::Space(SpaceFragment {
                        width: amount,
                        math_size: fragment.math_size(),
                        font_size: fragment.font_size(),
                    }));
                }
            }
            last = Some(class);
            resolved.push(fragment);
        }
        Self(resolved)
    }

    pub fn ascent(&self) -> Abs {
        self.0.iter().map(MathFragment::ascent).max().unwrap_or_default()
    }

    pub fn descent(&self) -> Abs {
        self.0.iter().map(MathFragment::descent).max().unwrap_or_default()
    }

    /// Lay the fragments out next to each other on a common baseline.
    pub fn into_frame(self) -> Frame {
        let mut frame = Frame::group();
        let mut range = SourceRange::detached();
        let mut x = Abs::zero();
        for fragment in self.0 {
            let width = fragment.width();
            let child = fragment.into_frame();
            range = range.union(child.full_range());
            frame.push_grow(Point::with_x(x), child);
            x += width;
        }
        frame.width = x;
        frame.with_range(range)
    }

    /// Collapse the run into a single fragment.
    ///
    /// A run of one fragment is returned unchanged. Anything else becomes an
    /// ordinary frame.
    pub fn into_fragment(mut self, ctx: &MathContext, style: MathStyle) -> MathFragment {
        if self.0.len() == 1
            && let Some(fragment) = self.0.pop()
        {
            return fragment;
        }

        let italics = self
            .0
            .last()
            .map(MathFragment::italics_correction)
            .unwrap_or_default();
        FrameFragment::new(ctx, style, self.into_frame())
            .with_italics_correction(italics)
            .into()
    }
}
