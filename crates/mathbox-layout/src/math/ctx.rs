use mathbox_library::layout::Abs;
use mathbox_library::math::{
    Atom, AtomClass, AtomId, AtomKind, AtomList, AtomTree, Frame, FrameKind, GroupStyle,
    MathSize, MathStyle,
};
use mathbox_library::text::{MathConstants, MathFont};

use super::{
    AttachedParts, FrameFragment, MathFragment, MathRun, SpaceFragment, accent, attach,
    fenced, frac, line, root, table, text,
};

/// The context for math layout.
pub struct MathContext<'a> {
    // External.
    pub font: &'a dyn MathFont,
    pub tree: &'a AtomTree,
    pub constants: &'a MathConstants,
    pub base_size: Abs,
    // Mutable.
    /// Whether `i` and `j` are replaced by their dotless forms.
    pub dotless: bool,
    pub fragments: Vec<MathFragment>,
}

impl<'a> MathContext<'a> {
    /// Create a new math context.
    pub fn new(font: &'a dyn MathFont, tree: &'a AtomTree, base_size: Abs) -> Self {
        Self {
            font,
            tree,
            constants: font.constants(),
            base_size,
            dotless: false,
            fragments: vec![],
        }
    }

    /// The font size for a style.
    pub fn font_size(&self, style: MathStyle) -> Abs {
        match style.size {
            MathSize::Display | MathSize::Text => self.base_size,
            MathSize::Script => self.base_size * self.constants.script_percent_scale_down,
            MathSize::ScriptScript => {
                self.base_size * self.constants.script_script_percent_scale_down
            }
        }
    }

    /// Push a fragment.
    pub fn push(&mut self, fragment: impl Into<MathFragment>) {
        self.fragments.push(fragment.into());
    }

    /// Lay out a list and return the resulting [`MathFragment`]s.
    pub fn layout_into_fragments(
        &mut self,
        list: &AtomList,
        style: MathStyle,
    ) -> Vec<MathFragment> {
        // Laying out pushes to `self.fragments`, so swap them out for the
        // duration and restore them afterwards.
        let prev = std::mem::take(&mut self.fragments);
        self.layout_list(list, style);
        std::mem::replace(&mut self.fragments, prev)
    }

    /// Lay out a list and return the result as a [`MathRun`].
    pub fn layout_into_run(&mut self, list: &AtomList, style: MathStyle) -> MathRun {
        MathRun::new(self.layout_into_fragments(list, style))
    }

    /// Lay out a list and return the result as a unified [`MathFragment`].
    pub fn layout_into_fragment(&mut self, list: &AtomList, style: MathStyle) -> MathFragment {
        self.layout_into_run(list, style).into_fragment(self, style)
    }

    /// Lay out a list and return the result as a [`Frame`].
    pub fn layout_into_frame(&mut self, list: &AtomList, style: MathStyle) -> Frame {
        self.layout_into_fragment(list, style).into_frame()
    }

    /// Lay out the atoms of a list into `self.fragments`.
    pub fn layout_list(&mut self, list: &AtomList, mut style: MathStyle) {
        let tree = self.tree;
        for (id, atom) in tree.atoms(list) {
            if let AtomKind::Style(size) = atom.kind {
                style = style.with_size(size);
                continue;
            }
            let fragment = self.layout_atom(id, atom, style);
            self.push(fragment);
        }
    }

    /// Lay out a single atom, including its scripts.
    pub fn layout_atom(&mut self, id: AtomId, atom: &Atom, style: MathStyle) -> MathFragment {
        log::trace!("laying out {} atom {id:?}", atom.kind.name());
        let mut fragment = if atom.has_scripts() {
            let base = self.layout_nucleus(atom, style);
            let parts = attach::layout_attachments(self, atom, base, style);
            let class = parts.class;
            FrameFragment::new(self, style, parts.into_frame())
                .with_class(class)
                .into()
        } else {
            self.layout_nucleus(atom, style)
        };
        fragment.set_range(atom.range);
        fragment
    }

    /// Lay out an atom with scripts, keeping its parts apart.
    ///
    /// Returns `None` if the atom does not exist or has no scripts.
    pub fn layout_attached(&mut self, id: AtomId, style: MathStyle) -> Option<AttachedParts> {
        let tree = self.tree;
        let atom = tree.get(id).filter(|atom| atom.has_scripts())?;
        let base = self.layout_nucleus(atom, style);
        let mut parts = attach::layout_attachments(self, atom, base, style);
        parts.range = atom.range;
        Some(parts)
    }

    /// Lay out the nucleus of an atom, without scripts.
    pub fn layout_nucleus(&mut self, atom: &Atom, style: MathStyle) -> MathFragment {
        match &atom.kind {
            AtomKind::Ordinary
            | AtomKind::Variable
            | AtomKind::Number
            | AtomKind::Placeholder
            | AtomKind::UnaryOperator
            | AtomKind::BinaryOperator
            | AtomKind::Relation
            | AtomKind::Open
            | AtomKind::Close
            | AtomKind::Punctuation
            | AtomKind::Boundary => text::layout_text(self, atom, style),
            AtomKind::LargeOperator(_) => text::layout_large_operator(self, atom, style),
            AtomKind::Fraction(item) => frac::layout_fraction(self, item, style),
            AtomKind::Radical(item) => root::layout_radical(self, item, style),
            AtomKind::Accent(item) => accent::layout_accent(self, atom, item, style),
            AtomKind::Inner(item) => fenced::layout_fenced(self, item, style),
            AtomKind::Underline(body) => line::layout_line(self, body, true, style),
            AtomKind::Overline(body) => line::layout_line(self, body, false, style),
            AtomKind::Table(item) => table::layout_table(self, item, style),
            AtomKind::Color(item) => {
                let group = GroupStyle { color: Some(item.color.clone()), background: None };
                self.layout_group(&item.body, group, style)
            }
            AtomKind::ColorBox(item) => {
                let group = GroupStyle { color: None, background: Some(item.color.clone()) };
                self.layout_group(&item.body, group, style)
            }
            AtomKind::Space(item) => {
                let width = item.amount().at(self.font_size(style));
                SpaceFragment::new(self, style, width).into()
            }
            AtomKind::Style(_) => SpaceFragment::new(self, style, Abs::zero()).into(),
        }
    }

    /// Lay out a list into a decorated group.
    ///
    /// A group around a single fragment keeps that fragment's class, so that
    /// coloring an operator does not change its spacing.
    fn layout_group(&mut self, body: &AtomList, group: GroupStyle, style: MathStyle) -> MathFragment {
        let fragments = self.layout_into_fragments(body, style);
        let class = match fragments.as_slice() {
            [single] => single.class(),
            _ => AtomClass::Ordinary,
        };
        let italics = fragments.last().map(MathFragment::italics_correction).unwrap_or_default();
        let frame = MathRun::new(fragments).into_frame().with_kind(FrameKind::Group(group));
        FrameFragment::new(self, style, frame)
            .with_class(class)
            .with_italics_correction(italics)
            .into()
    }
}
