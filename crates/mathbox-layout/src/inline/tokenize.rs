use ecow::EcoString;
use log::{debug, trace};
use mathbox_library::config::{LayoutConfig, Penalty};
use mathbox_library::layout::{Abs, Point};
use mathbox_library::math::{
    Atom, AtomClass, AtomId, AtomKind, AtomList, AtomTree, ColorItem, Frame, FrameKind,
    GroupStyle, MathSize, MathStyle, Spacing, spacing_entry,
};
use mathbox_library::text::MathFont;

use super::{Element, ElementPayload, GroupId, Measurer, PreRenderer};

/// Turn the root list of a tree into breakable elements.
///
/// An unfinalized tree is finalized on a private copy first.
pub fn tokenize(tree: &AtomTree, font: &dyn MathFont, config: &LayoutConfig) -> Vec<Element> {
    if !tree.is_finalized() {
        debug!("tokenizing a finalized copy of the tree");
        let mut copy = tree.deep_copy();
        copy.finalize();
        return Tokenizer::new(&copy, font, config).run(copy.root());
    }
    Tokenizer::new(tree, font, config).run(tree.root())
}

/// Turn a list of a tree into breakable elements.
///
/// An unfinalized tree is finalized on a private copy first.
pub fn tokenize_list(
    tree: &AtomTree,
    list: &AtomList,
    font: &dyn MathFont,
    config: &LayoutConfig,
) -> Vec<Element> {
    if !tree.is_finalized() {
        debug!("tokenizing a finalized copy of the list");
        let mut copy = tree.deep_copy();
        let mut list = list.clone();
        copy.finalize_list(&mut list);
        return Tokenizer::new(&copy, font, config).run(&list);
    }
    Tokenizer::new(tree, font, config).run(list)
}

/// Where an atom may be broken around, and how badly.
#[derive(Debug, Copy, Clone)]
struct BreakRule {
    before: Penalty,
    after: Penalty,
    break_before: bool,
    break_after: bool,
}

impl BreakRule {
    const fn new(before: Penalty, after: Penalty) -> Self {
        Self { before, after, break_before: true, break_after: true }
    }

    fn apply(self, element: &mut Element) {
        element.penalty_before = self.before;
        element.penalty_after = self.after;
        element.break_before = self.break_before;
        element.break_after = self.break_after;
    }
}

struct Tokenizer<'a> {
    tree: &'a AtomTree,
    measurer: Measurer<'a>,
    renderer: PreRenderer<'a>,
    style: MathSize,
    groups: u32,
    elements: Vec<Element>,
}

impl<'a> Tokenizer<'a> {
    fn new(tree: &'a AtomTree, font: &'a dyn MathFont, config: &LayoutConfig) -> Self {
        Self {
            tree,
            measurer: Measurer::new(font, config.font_size),
            renderer: PreRenderer::new(font, tree, config.font_size),
            style: config.style,
            groups: 0,
            elements: Vec::new(),
        }
    }

    fn run(mut self, list: &AtomList) -> Vec<Element> {
        self.list(list, MathStyle::new(self.style, false), None, None);
        debug!("tokenized {} atoms into {} elements", list.len(), self.elements.len());
        self.elements
    }

    fn fresh_group(&mut self) -> GroupId {
        self.groups += 1;
        GroupId(self.groups)
    }

    /// Tokenize a list. The edge classes are those of the atoms around the
    /// list, for lists that are spliced into an outer one.
    fn list(
        &mut self,
        list: &AtomList,
        mut style: MathStyle,
        left_edge: Option<AtomClass>,
        right_edge: Option<AtomClass>,
    ) {
        let tree = self.tree;
        let atoms: Vec<(AtomId, &Atom)> = tree.atoms(list).collect();
        for (i, &(id, atom)) in atoms.iter().enumerate() {
            if let AtomKind::Style(size) = atom.kind {
                style = style.with_size(size);
                continue;
            }

            let left = atoms[..i]
                .iter()
                .rev()
                .find(|(_, atom)| atom.kind.is_spaced())
                .map(|(_, atom)| edge_class(tree, atom, false))
                .or(left_edge);
            let right = atoms[i + 1..]
                .iter()
                .find(|(_, atom)| atom.kind.is_spaced())
                .map(|(_, atom)| edge_class(tree, atom, true))
                .or(right_edge);

            let start = self.elements.len();
            self.atom(id, atom, style, left, right);
            trace!(
                "{} atom {id:?} became {} elements",
                atom.kind.name(),
                self.elements.len() - start
            );
        }
    }

    fn atom(
        &mut self,
        id: AtomId,
        atom: &Atom,
        style: MathStyle,
        left: Option<AtomClass>,
        right: Option<AtomClass>,
    ) {
        match &atom.kind {
            AtomKind::Color(item) => return self.color(item, style, left, right),
            AtomKind::Space(item) => {
                let width = self.measurer.measure_explicit_space(item.mu, style.size);
                let mut element = Element::new(ElementPayload::Space, AtomClass::Ordinary, width)
                    .with_penalties(Penalty::Good, Penalty::Good)
                    .with_atom(id);
                element.range = atom.range;
                self.elements.push(element);
                return;
            }
            _ => {}
        }

        let class = edge_class(self.tree, atom, true);
        let start = self.elements.len();
        let rule = break_rule(atom, class, left, right);

        if is_display(atom) {
            self.display(id, atom, class, style, rule, true);
        } else if atom.has_scripts() {
            self.scripted(id, atom, class, style, rule);
        } else if matches!(
            atom.kind,
            AtomKind::Accent(_)
                | AtomKind::Underline(_)
                | AtomKind::Overline(_)
                | AtomKind::ColorBox(_)
        ) {
            self.display(id, atom, class, style, rule, false);
        } else {
            self.symbol(id, atom, class, style, rule);
        }

        self.bake_spacing(start, class, style.size, left, right);
    }

    /// A pre-rendered structure, kept whole.
    fn display(
        &mut self,
        id: AtomId,
        atom: &Atom,
        class: AtomClass,
        style: MathStyle,
        rule: BreakRule,
        indivisible: bool,
    ) {
        let Some(frame) = self.renderer.render_atom(id, style) else { return };
        let width = self.measurer.measure_display(&frame);
        let mut element =
            Element::new(ElementPayload::Display(frame), class, width).with_atom(id);
        rule.apply(&mut element);
        element.indivisible = indivisible;
        if !indivisible {
            element.group = Some(self.fresh_group());
        }
        element.range = element.range.union(atom.range);
        self.elements.push(element);
    }

    /// A symbol, operator or word without scripts.
    fn symbol(
        &mut self,
        id: AtomId,
        atom: &Atom,
        class: AtomClass,
        style: MathStyle,
        rule: BreakRule,
    ) {
        let Some(frame) = self.renderer.render_atom(id, style) else { return };
        // Operator spacing is added when the atom's spacing is baked.
        let (width, payload) = if class.is_operator() {
            (frame.width, ElementPayload::Operator { frame, class })
        } else {
            (self.measurer.measure_text(&frame), ElementPayload::Text(frame))
        };
        let mut element = Element::new(payload, class, width).with_atom(id);
        rule.apply(&mut element);
        element.range = element.range.union(atom.range);
        self.elements.push(element);
    }

    /// An atom with scripts: one element per part, held together by a
    /// group.
    fn scripted(
        &mut self,
        id: AtomId,
        atom: &Atom,
        class: AtomClass,
        style: MathStyle,
        rule: BreakRule,
    ) {
        let Some(parts) = self.renderer.render_attached(id, style) else { return };
        let group = self.fresh_group();
        let total = parts.width;

        let mut pieces = vec![(parts.base, None)];
        pieces.extend(parts.subscript.map(|frame| (frame, Some(false))));
        pieces.extend(parts.superscript.map(|frame| (frame, Some(true))));

        let count = pieces.len();
        let mut cursor = Abs::zero();
        for (i, (frame, script)) in pieces.into_iter().enumerate() {
            let x = frame.pos.x;
            let end = if i + 1 == count {
                cursor.max(total)
            } else {
                cursor.max(x + frame.width)
            };
            let range = frame.full_range();
            let payload = match script {
                Some(superscript) => ElementPayload::Script { frame, superscript },
                None if class.is_operator() => ElementPayload::Operator { frame, class },
                None => ElementPayload::Text(frame),
            };

            let mut element = Element::new(payload, class, end - cursor).with_atom(id);
            element.lspace = x - cursor;
            element.group = Some(group);
            element.break_before = false;
            element.break_after = false;
            element.penalty_before = Penalty::Never;
            element.penalty_after = Penalty::Never;
            element.range = if script.is_some() { range } else { range.union(atom.range) };
            if i == 0 {
                element.break_before = rule.break_before;
                element.penalty_before = rule.before;
            }
            if i + 1 == count {
                element.break_after = rule.break_after;
                element.penalty_after = rule.after;
            }
            self.elements.push(element);
            cursor = end;
        }
    }

    /// Splice a colored list into the outer one.
    fn color(
        &mut self,
        item: &ColorItem,
        style: MathStyle,
        left: Option<AtomClass>,
        right: Option<AtomClass>,
    ) {
        let start = self.elements.len();
        let run = self.fresh_group();
        self.list(&item.body, style, left, right);
        for element in &mut self.elements[start..] {
            element.parent_group.get_or_insert(run);
            if let Some(frame) = element.frame_mut() {
                tint(frame, &item.color);
            }
        }
    }

    /// Bake the spacing around an atom into its elements.
    ///
    /// Operators own the spacing on both of their sides, unless the left
    /// neighbour is an operator as well. Other atoms own the spacing to a
    /// non-operator on their right.
    fn bake_spacing(
        &mut self,
        start: usize,
        class: AtomClass,
        size: MathSize,
        left: Option<AtomClass>,
        right: Option<AtomClass>,
    ) {
        let elements = &mut self.elements[start..];
        if elements.is_empty() {
            return;
        }

        let (lspace, rspace) = if class.is_operator() {
            let total: Abs = elements.iter().map(|element| element.width).sum();
            let metrics = self.measurer.measure_operator(total, class, size, left, right);
            let lspace = if left.is_some_and(AtomClass::is_operator) {
                Abs::zero()
            } else {
                metrics.lspace
            };
            (lspace, metrics.width - metrics.lspace - total)
        } else {
            let rspace = match right {
                Some(right) if !right.is_operator() => {
                    self.measurer.inter_element_spacing(class, right, size)
                }
                _ => Abs::zero(),
            };
            (Abs::zero(), rspace)
        };

        if let Some(first) = elements.first_mut() {
            first.lspace += lspace;
            first.width += lspace;
        }
        if let Some(last) = elements.last_mut() {
            last.width += rspace;
        }
    }
}

/// Where lines may break around an atom.
fn break_rule(
    atom: &Atom,
    class: AtomClass,
    left: Option<AtomClass>,
    right: Option<AtomClass>,
) -> BreakRule {
    let invalid = |l, r| spacing_entry(l, r) == Spacing::Invalid;
    match &atom.kind {
        AtomKind::BinaryOperator | AtomKind::Relation => BreakRule::new(
            if left.is_some_and(|l| invalid(l, class)) { Penalty::Bad } else { Penalty::Best },
            if right.is_some_and(|r| invalid(class, r)) { Penalty::Bad } else { Penalty::Best },
        ),
        AtomKind::LargeOperator(_) => BreakRule::new(Penalty::Best, Penalty::Bad),
        AtomKind::Open => {
            BreakRule { break_after: false, ..BreakRule::new(Penalty::Good, Penalty::Bad) }
        }
        AtomKind::Close => {
            BreakRule { break_before: false, ..BreakRule::new(Penalty::Good, Penalty::Bad) }
        }
        AtomKind::Punctuation => {
            BreakRule { break_before: false, ..BreakRule::new(Penalty::Good, Penalty::Good) }
        }
        _ => BreakRule::new(Penalty::Good, Penalty::Bad),
    }
}

/// Whether an atom becomes a single indivisible element, scripts included.
fn is_display(atom: &Atom) -> bool {
    match &atom.kind {
        AtomKind::Fraction(_) | AtomKind::Radical(_) | AtomKind::Inner(_) | AtomKind::Table(_) => {
            true
        }
        AtomKind::LargeOperator(item) => item.limits && atom.has_scripts(),
        _ => false,
    }
}

/// The class an atom presents to its neighbour on one side.
///
/// Colored lists are transparent; decorations of a single atom keep that
/// atom's class.
fn edge_class(tree: &AtomTree, atom: &Atom, first: bool) -> AtomClass {
    fn single<'t>(tree: &'t AtomTree, list: &'t AtomList) -> Option<&'t Atom> {
        let mut atoms = tree.atoms(list).filter(|(_, atom)| atom.kind.is_spaced());
        match (atoms.next(), atoms.next()) {
            (Some((_, atom)), None) => Some(atom),
            _ => None,
        }
    }

    match &atom.kind {
        AtomKind::Color(item) => {
            let mut atoms = tree.atoms(&item.body).filter(|(_, atom)| atom.kind.is_spaced());
            let edge = if first { atoms.next() } else { atoms.last() };
            edge.map_or(AtomClass::Ordinary, |(_, atom)| edge_class(tree, atom, first))
        }
        AtomKind::Accent(item) => single(tree, &item.inner)
            .map_or(AtomClass::Ordinary, |atom| edge_class(tree, atom, first)),
        AtomKind::ColorBox(item) => single(tree, &item.body)
            .map_or(AtomClass::Ordinary, |atom| edge_class(tree, atom, first)),
        _ => atom.class(),
    }
}

/// Wrap a frame in a colored group at the same position.
fn tint(frame: &mut Frame, color: &EcoString) {
    let inner = std::mem::replace(frame, Frame::group());
    let pos = inner.pos;
    let group = GroupStyle { color: Some(color.clone()), background: None };
    let mut wrapper = Frame::group().with_kind(FrameKind::Group(group)).with_range(inner.range);
    wrapper.width = inner.width;
    wrapper.push_grow(Point::zero(), inner);
    wrapper.pos = pos;
    *frame = wrapper;
}
