use mathbox_library::layout::Abs;
use mathbox_library::math::{AtomId, AtomList, AtomTree, Frame, MathSize, MathStyle};
use mathbox_library::text::MathFont;

use crate::math::{AttachedParts, MathContext};

/// Renders single atoms and lists into opaque frames for the tokenizer.
#[derive(Copy, Clone)]
pub struct PreRenderer<'a> {
    pub font: &'a dyn MathFont,
    pub tree: &'a AtomTree,
    pub font_size: Abs,
}

impl<'a> PreRenderer<'a> {
    pub fn new(font: &'a dyn MathFont, tree: &'a AtomTree, font_size: Abs) -> Self {
        Self { font, tree, font_size }
    }

    fn context(&self) -> MathContext<'a> {
        MathContext::new(self.font, self.tree, self.font_size)
    }

    /// Render a list. Returns `None` for lists without atoms.
    pub fn render(&self, list: &AtomList, size: MathSize, cramped: bool) -> Option<Frame> {
        if self.tree.atoms(list).next().is_none() {
            return None;
        }
        Some(self.context().layout_into_frame(list, MathStyle::new(size, cramped)))
    }

    /// Render one atom, including its scripts.
    pub fn render_atom(&self, id: AtomId, style: MathStyle) -> Option<Frame> {
        let atom = self.tree.get(id)?;
        Some(self.context().layout_atom(id, atom, style).into_frame())
    }

    /// Render a script list at the style it has relative to its base.
    pub fn render_script(
        &self,
        list: &AtomList,
        superscript: bool,
        style: MathStyle,
    ) -> Option<Frame> {
        let style = if superscript {
            style.for_superscript()
        } else {
            style.for_subscript()
        };
        self.render(list, style.size, style.cramped)
    }

    /// Render an atom's nucleus and scripts as separate, positioned parts.
    pub fn render_attached(&self, id: AtomId, style: MathStyle) -> Option<AttachedParts> {
        self.context().layout_attached(id, style)
    }
}

#[cfg(test)]
mod tests {
    use mathbox_library::text::StaticFont;

    use super::*;

    #[test]
    fn test_render_empty_list() {
        let tree = AtomTree::new();
        let renderer = PreRenderer::new(StaticFont::shared(), &tree, Abs::pt(10.0));
        assert!(renderer.render(tree.root(), MathSize::Text, false).is_none());
    }

    #[test]
    fn test_script_is_smaller() {
        let mut tree = AtomTree::new();
        let list = tree.symbols("n");
        let renderer = PreRenderer::new(StaticFont::shared(), &tree, Abs::pt(10.0));
        let plain = renderer.render(&list, MathSize::Text, false).unwrap();
        let script = renderer.render_script(&list, true, MathStyle::text()).unwrap();
        assert!(script.width < plain.width);
    }

    #[test]
    fn test_render_attached_keeps_parts_apart() {
        let mut tree = AtomTree::new();
        let x = tree.variable("x");
        let sup = tree.symbols("2");
        let sub = tree.symbols("i");
        tree.set_superscript(x, sup).unwrap();
        tree.set_subscript(x, sub).unwrap();

        let renderer = PreRenderer::new(StaticFont::shared(), &tree, Abs::pt(10.0));
        let parts = renderer.render_attached(x, MathStyle::display()).unwrap();
        let sup = parts.superscript.as_ref().unwrap();
        let sub = parts.subscript.as_ref().unwrap();
        assert!(sup.pos.y > Abs::zero());
        assert!(sub.pos.y < Abs::zero());
        assert!(parts.width >= parts.base.width);
        assert!(!parts.limits);

        let y = tree.variable("y");
        let renderer = PreRenderer::new(StaticFont::shared(), &tree, Abs::pt(10.0));
        assert!(renderer.render_attached(y, MathStyle::display()).is_none());
    }
}
