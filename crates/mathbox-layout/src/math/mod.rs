//! Math layout: atom lists to positioned frames.

#[macro_use]
mod shared;
mod accent;
mod attach;
mod ctx;
mod fenced;
mod frac;
mod fragment;
mod line;
mod root;
mod run;
mod table;
mod text;

pub use self::attach::AttachedParts;
pub(crate) use self::ctx::MathContext;
pub(crate) use self::fragment::{FrameFragment, GlyphFragment, MathFragment, SpaceFragment};
pub(crate) use self::run::MathRun;
pub(crate) use self::shared::*;

use log::debug;
use mathbox_library::config::LayoutConfig;
use mathbox_library::math::{AtomList, AtomTree, Frame, MathSize, MathStyle};
use mathbox_library::text::MathFont;

/// Lay out a list of a tree into a single frame.
///
/// The list starts in the given `size` and `cramped` state. `config.style`
/// is not consulted here; it only sets the initial size of [`tokenize`] and
/// [`typeset_lines`], so passing `config.style` as `size` gives the same
/// widths in both paths.
///
/// The tree does not need to be finalized. Layout never fails: characters
/// missing from the font show as `.notdef` and delimiters that cannot grow
/// far enough use their largest variant.
///
/// [`tokenize`]: crate::tokenize
/// [`typeset_lines`]: crate::typeset_lines
pub fn layout(
    tree: &AtomTree,
    list: &AtomList,
    size: MathSize,
    cramped: bool,
    font: &dyn MathFont,
    config: &LayoutConfig,
) -> Frame {
    debug!("laying out {} atoms at {size:?}", list.len());
    let mut ctx = MathContext::new(font, tree, config.font_size);
    let frame = ctx.layout_into_frame(list, MathStyle::new(size, cramped));
    debug!(
        "laid out frame {:?} wide, {:?} high",
        frame.width,
        frame.height()
    );
    frame
}

#[cfg(test)]
mod tests {
    use mathbox_library::layout::{Abs, Em};
    use mathbox_library::math::{AtomClass, FrameKind, spacing};
    use mathbox_library::text::StaticFont;

    use super::*;

    fn run(tree: &AtomTree, size: MathSize) -> Frame {
        layout(tree, tree.root(), size, false, StaticFont::shared(), &LayoutConfig::default())
    }

    #[test]
    fn test_superscript_raises_ascent() {
        let mut tree = AtomTree::new();
        let x = tree.variable("x");
        tree.push(x);
        let plain = run(&tree, MathSize::Display);

        let two = tree.number("2");
        tree.set_superscript(x, [two].into_iter().collect()).unwrap();
        let scripted = run(&tree, MathSize::Display);

        assert!(scripted.ascent > plain.ascent);
        assert!(scripted.width > plain.width);
        assert!(scripted.has_script);
    }

    #[test]
    fn test_relation_gets_thick_spacing() {
        let mut tree = AtomTree::new();
        let list = tree.symbols("a=b");
        tree.set_root(list);
        let frame = run(&tree, MathSize::Text);

        let font_size = LayoutConfig::default().font_size;
        let glyphs = Em::new(0.5 + 0.778 + 0.5).at(font_size);
        let thick = spacing(AtomClass::Ordinary, AtomClass::Relation, MathSize::Text, font_size);
        assert!(frame.width.approx_eq(glyphs + thick * 2.0));
        assert_eq!(frame.text(), "𝑎=𝑏");
    }

    #[test]
    fn test_script_style_has_no_relation_spacing() {
        let mut tree = AtomTree::new();
        let list = tree.symbols("a=b");
        tree.set_root(list);
        let text = run(&tree, MathSize::Text);
        let script = run(&tree, MathSize::Script);
        // Three glyphs plus two spaces in text style, three glyphs in script.
        assert_eq!(text.children.len(), 5);
        assert_eq!(script.children.len(), 3);
    }

    #[test]
    fn test_fraction_is_centered_on_axis() {
        let mut tree = AtomTree::new();
        let one = tree.symbols("1");
        let c = tree.symbols("c");
        let frac = tree.fraction(one, c);
        tree.push(frac);
        let frame = run(&tree, MathSize::Display);

        let fraction = frame.find(|f| f.kind == FrameKind::Fraction).unwrap();
        let rule = fraction.find(|f| f.kind == FrameKind::Rule).unwrap();
        let font = StaticFont::shared();
        let axis = font.constants.axis_height.at(LayoutConfig::default().font_size);
        let thickness = rule.ascent;
        assert!((rule.pos.y + thickness / 2.0).approx_eq(axis));
        assert!(fraction.ascent > thickness);
        assert!(fraction.descent > Abs::zero());
    }

    #[test]
    fn test_empty_list_is_empty_frame() {
        let tree = AtomTree::new();
        let frame = run(&tree, MathSize::Display);
        assert!(frame.is_empty());
        assert_eq!(frame.width, Abs::zero());
    }

    #[test]
    fn test_missing_glyph_uses_notdef() {
        let mut font = StaticFont::default();
        font.fallback = None;
        let mut tree = AtomTree::new();
        let list = tree.symbols("☃");
        tree.set_root(list);
        let config = LayoutConfig::default();
        let frame = layout(&tree, tree.root(), MathSize::Text, false, &font, &config);
        assert_eq!(frame.width, Em::new(0.5).at(config.font_size));
        assert_eq!(frame.text(), "☃");
    }
}
