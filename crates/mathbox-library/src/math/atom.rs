use ecow::EcoString;
use mathbox_utils::default_math_class;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thin_vec::ThinVec;
use unicode_math_class::MathClass;

use crate::diag::AtomError;
use crate::layout::{Em, FixedAlignment};
use crate::math::{AtomClass, MathSize, SourceRange};
use crate::text::{FontStyle, clusters};

/// A stable handle to an atom in an [`AtomTree`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AtomId(u32);

impl AtomId {
    /// The index of the atom in its tree's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An ordered list of atoms.
pub type AtomList = ThinVec<AtomId>;

/// A node of a parsed formula.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Atom {
    /// What kind of atom this is, with kind-specific fields.
    pub kind: AtomKind,
    /// The characters of the atom. Empty for structural atoms.
    pub nucleus: EcoString,
    /// An optional superscript.
    pub superscript: Option<AtomList>,
    /// An optional subscript.
    pub subscript: Option<AtomList>,
    /// The requested font style.
    pub font_style: FontStyle,
    /// Where the atom came from.
    pub range: SourceRange,
}

impl Atom {
    /// Create an atom of the given kind.
    pub fn new(kind: AtomKind, nucleus: impl Into<EcoString>) -> Self {
        Self { kind, nucleus: nucleus.into(), ..Default::default() }
    }

    /// Whether the atom carries a sub- or superscript.
    pub fn has_scripts(&self) -> bool {
        self.superscript.is_some() || self.subscript.is_some()
    }

    /// The spacing class of the atom.
    pub fn class(&self) -> AtomClass {
        self.kind.class()
    }

    /// Visit every child list of the atom, scripts last.
    pub fn for_each_list(&self, mut f: impl FnMut(&AtomList)) {
        match &self.kind {
            AtomKind::Fraction(frac) => {
                f(&frac.numerator);
                f(&frac.denominator);
            }
            AtomKind::Radical(radical) => {
                f(&radical.radicand);
                if let Some(degree) = &radical.degree {
                    f(degree);
                }
            }
            AtomKind::Accent(accent) => f(&accent.inner),
            AtomKind::Inner(inner) => f(&inner.body),
            AtomKind::Underline(body) | AtomKind::Overline(body) => f(body),
            AtomKind::Color(color) | AtomKind::ColorBox(color) => f(&color.body),
            AtomKind::Table(table) => table.rows.iter().flatten().for_each(&mut f),
            _ => {}
        }
        if let Some(sup) = &self.superscript {
            f(sup);
        }
        if let Some(sub) = &self.subscript {
            f(sub);
        }
    }

    /// Visit every child list of the atom mutably, scripts last.
    pub fn for_each_list_mut(&mut self, mut f: impl FnMut(&mut AtomList)) {
        match &mut self.kind {
            AtomKind::Fraction(frac) => {
                f(&mut frac.numerator);
                f(&mut frac.denominator);
            }
            AtomKind::Radical(radical) => {
                f(&mut radical.radicand);
                if let Some(degree) = &mut radical.degree {
                    f(degree);
                }
            }
            AtomKind::Accent(accent) => f(&mut accent.inner),
            AtomKind::Inner(inner) => f(&mut inner.body),
            AtomKind::Underline(body) | AtomKind::Overline(body) => f(body),
            AtomKind::Color(color) | AtomKind::ColorBox(color) => f(&mut color.body),
            AtomKind::Table(table) => table.rows.iter_mut().flatten().for_each(&mut f),
            _ => {}
        }
        if let Some(sup) = &mut self.superscript {
            f(sup);
        }
        if let Some(sub) = &mut self.subscript {
            f(sub);
        }
    }

    /// Child atoms referenced directly rather than through a list.
    pub fn boundaries(&self) -> SmallVec<[AtomId; 2]> {
        match &self.kind {
            AtomKind::Inner(inner) => inner.left.iter().chain(&inner.right).copied().collect(),
            _ => SmallVec::new(),
        }
    }
}

/// The kind of an atom.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum AtomKind {
    /// A symbol without special meaning.
    #[default]
    Ordinary,
    /// A single-letter variable, set in italics by default.
    Variable,
    /// A run of digits.
    Number,
    /// An empty slot, usually shown as a square.
    Placeholder,
    /// A prefix operator like a leading minus sign.
    UnaryOperator,
    /// An infix operator like `+`.
    BinaryOperator,
    /// A relation like `=`.
    Relation,
    /// An opening delimiter.
    Open,
    /// A closing delimiter.
    Close,
    /// Punctuation like a comma.
    Punctuation,
    /// A big operator like `∑` or a named operator like `lim`.
    LargeOperator(LargeOperatorItem),
    /// A fraction or a binomial.
    Fraction(FractionItem),
    /// A square or n-th root.
    Radical(RadicalItem),
    /// An accent above a list.
    Accent(AccentItem),
    /// A list between stretchy delimiters.
    Inner(InnerItem),
    /// A list with a line below.
    Underline(AtomList),
    /// A list with a line above.
    Overline(AtomList),
    /// A matrix or an aligned environment.
    Table(TableItem),
    /// Switches the math size for the rest of its list.
    Style(MathSize),
    /// A list in a text color.
    Color(ColorItem),
    /// A list on a colored background.
    ColorBox(ColorItem),
    /// Explicit horizontal space.
    Space(SpaceItem),
    /// A delimiter of an inner atom.
    Boundary,
}

impl AtomKind {
    /// The spacing class of atoms of this kind.
    pub fn class(&self) -> AtomClass {
        match self {
            Self::LargeOperator(_) => AtomClass::LargeOperator,
            Self::BinaryOperator => AtomClass::Binary,
            Self::Relation => AtomClass::Relation,
            Self::Open => AtomClass::Opening,
            Self::Close => AtomClass::Closing,
            Self::Punctuation => AtomClass::Punctuation,
            Self::Fraction(_) | Self::Inner(_) => AtomClass::Inner,
            _ => AtomClass::Ordinary,
        }
    }

    /// Whether atoms of this kind take part in inter-atom spacing.
    ///
    /// Style switches and explicit spaces are transparent: the atoms on
    /// either side are spaced as if they were adjacent.
    pub fn is_spaced(&self) -> bool {
        !matches!(self, Self::Style(_) | Self::Space(_))
    }

    /// A short name, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ordinary => "ordinary",
            Self::Variable => "variable",
            Self::Number => "number",
            Self::Placeholder => "placeholder",
            Self::UnaryOperator => "unary operator",
            Self::BinaryOperator => "binary operator",
            Self::Relation => "relation",
            Self::Open => "open",
            Self::Close => "close",
            Self::Punctuation => "punctuation",
            Self::LargeOperator(_) => "large operator",
            Self::Fraction(_) => "fraction",
            Self::Radical(_) => "radical",
            Self::Accent(_) => "accent",
            Self::Inner(_) => "inner",
            Self::Underline(_) => "underline",
            Self::Overline(_) => "overline",
            Self::Table(_) => "table",
            Self::Style(_) => "style",
            Self::Color(_) => "color",
            Self::ColorBox(_) => "color box",
            Self::Space(_) => "space",
            Self::Boundary => "boundary",
        }
    }
}

/// A large operator.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LargeOperatorItem {
    /// Whether scripts are placed above and below instead of to the right.
    pub limits: bool,
}

/// A fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct FractionItem {
    pub numerator: AtomList,
    pub denominator: AtomList,
    /// Whether to draw the fraction bar. Binomials have none.
    pub has_rule: bool,
    /// A delimiter to the left of the fraction, e.g. `(` for binomials.
    pub left: Option<EcoString>,
    /// A delimiter to the right of the fraction.
    pub right: Option<EcoString>,
    /// How numerator and denominator are aligned horizontally.
    pub align: FixedAlignment,
}

impl FractionItem {
    /// A plain fraction with a bar.
    pub fn new(numerator: AtomList, denominator: AtomList) -> Self {
        Self {
            numerator,
            denominator,
            has_rule: true,
            left: None,
            right: None,
            align: FixedAlignment::Center,
        }
    }
}

/// A radical.
#[derive(Debug, Clone, PartialEq)]
pub struct RadicalItem {
    pub radicand: AtomList,
    pub degree: Option<AtomList>,
}

/// An accent. The accent character is the atom's nucleus.
#[derive(Debug, Clone, PartialEq)]
pub struct AccentItem {
    pub inner: AtomList,
    /// Whether the accent stretches to cover its inner list.
    pub wide: bool,
}

/// A list between delimiters.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerItem {
    pub body: AtomList,
    /// The left boundary. Always an atom of kind [`AtomKind::Boundary`].
    pub left: Option<AtomId>,
    /// The right boundary. Always an atom of kind [`AtomKind::Boundary`].
    pub right: Option<AtomId>,
}

/// A table of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TableItem {
    /// The cells, row by row.
    pub rows: Vec<Vec<AtomList>>,
    /// Alignment per column. Missing entries are centered.
    pub alignments: Vec<FixedAlignment>,
    /// The environment that produced the table, e.g. `matrix` or `aligned`.
    pub environment: Option<EcoString>,
    /// Space between columns, in mu.
    pub column_spacing: f64,
    /// Additional space between rows, in jots.
    pub row_spacing: f64,
}

impl TableItem {
    /// A table without environment and default spacing.
    pub fn new(rows: Vec<Vec<AtomList>>) -> Self {
        Self {
            rows,
            alignments: Vec::new(),
            environment: None,
            column_spacing: 18.0,
            row_spacing: 0.0,
        }
    }

    /// The number of columns, i.e. the length of the longest row.
    pub fn columns(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// The alignment of the given column.
    pub fn alignment(&self, column: usize) -> FixedAlignment {
        self.alignments.get(column).copied().unwrap_or_default()
    }
}

/// A colored list.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorItem {
    pub body: AtomList,
    /// The color, in whatever notation the host understands.
    pub color: EcoString,
}

/// Explicit space.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceItem {
    /// The amount of space, in mu.
    pub mu: f64,
}

impl SpaceItem {
    /// The amount of space as a font-relative length.
    pub fn amount(self) -> Em {
        Em::from_mu(self.mu)
    }
}

/// An arena of atoms with a root list.
///
/// Atoms are addressed by [`AtomId`]s which stay valid for the lifetime of
/// the tree. Child lists hold ids, so sharing a list between two parents
/// would alias; [`AtomTree::clone_list`] makes an independent copy.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AtomTree {
    atoms: Vec<Atom>,
    root: AtomList,
    finalized: bool,
}

impl AtomTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of atoms in the arena.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// The root list.
    pub fn root(&self) -> &AtomList {
        &self.root
    }

    /// Replace the root list.
    pub fn set_root(&mut self, root: AtomList) {
        self.root = root;
        self.finalized = false;
    }

    /// Append an atom to the root list.
    pub fn push(&mut self, id: AtomId) {
        self.root.push(id);
        self.finalized = false;
    }

    /// Whether [`AtomTree::finalize`] ran since the last modification.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub(crate) fn root_mut(&mut self) -> &mut AtomList {
        &mut self.root
    }

    pub(crate) fn mark_finalized(&mut self) {
        self.finalized = true;
    }

    /// Look up an atom.
    pub fn get(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id.index())
    }

    /// Look up an atom mutably.
    ///
    /// The tree is considered modified afterwards.
    pub fn get_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.finalized = false;
        self.atoms.get_mut(id.index())
    }

    /// Iterate over the atoms of a list, skipping ids of other trees.
    pub fn atoms<'a>(&'a self, list: &'a AtomList) -> impl Iterator<Item = (AtomId, &'a Atom)> {
        list.iter().filter_map(|&id| Some((id, self.get(id)?)))
    }

    /// Add an atom to the arena.
    pub fn alloc(&mut self, atom: Atom) -> AtomId {
        let id = AtomId(u32::try_from(self.atoms.len()).unwrap_or(u32::MAX));
        self.atoms.push(atom);
        self.finalized = false;
        id
    }

    fn alloc_kind(&mut self, kind: AtomKind, nucleus: impl Into<EcoString>) -> AtomId {
        self.alloc(Atom::new(kind, nucleus))
    }

    /// Add a single character, classified by its Unicode math class.
    pub fn symbol(&mut self, c: char) -> AtomId {
        self.alloc_kind(symbol_kind(c), c.to_string())
    }

    /// Add one atom per grapheme cluster of the text. Combining marks stay
    /// with the character they belong to.
    pub fn symbols(&mut self, text: &str) -> AtomList {
        clusters(text)
            .filter_map(|cluster| {
                let c = cluster.chars().next()?;
                Some(self.alloc_kind(symbol_kind(c), cluster))
            })
            .collect()
    }

    /// Add an ordinary symbol.
    pub fn ordinary(&mut self, text: impl Into<EcoString>) -> AtomId {
        self.alloc_kind(AtomKind::Ordinary, text)
    }

    /// Add a variable.
    pub fn variable(&mut self, text: impl Into<EcoString>) -> AtomId {
        self.alloc_kind(AtomKind::Variable, text)
    }

    /// Add a number.
    pub fn number(&mut self, text: impl Into<EcoString>) -> AtomId {
        self.alloc_kind(AtomKind::Number, text)
    }

    /// Add a placeholder.
    pub fn placeholder(&mut self) -> AtomId {
        self.alloc_kind(AtomKind::Placeholder, "□")
    }

    /// Add a binary operator.
    pub fn binary(&mut self, text: impl Into<EcoString>) -> AtomId {
        self.alloc_kind(AtomKind::BinaryOperator, text)
    }

    /// Add a unary operator.
    pub fn unary(&mut self, text: impl Into<EcoString>) -> AtomId {
        self.alloc_kind(AtomKind::UnaryOperator, text)
    }

    /// Add a relation.
    pub fn relation(&mut self, text: impl Into<EcoString>) -> AtomId {
        self.alloc_kind(AtomKind::Relation, text)
    }

    /// Add an opening delimiter.
    pub fn open(&mut self, text: impl Into<EcoString>) -> AtomId {
        self.alloc_kind(AtomKind::Open, text)
    }

    /// Add a closing delimiter.
    pub fn close(&mut self, text: impl Into<EcoString>) -> AtomId {
        self.alloc_kind(AtomKind::Close, text)
    }

    /// Add punctuation.
    pub fn punctuation(&mut self, text: impl Into<EcoString>) -> AtomId {
        self.alloc_kind(AtomKind::Punctuation, text)
    }

    /// Add a large operator.
    pub fn large_operator(&mut self, text: impl Into<EcoString>, limits: bool) -> AtomId {
        self.alloc_kind(AtomKind::LargeOperator(LargeOperatorItem { limits }), text)
    }

    /// Add a fraction with a bar.
    pub fn fraction(&mut self, numerator: AtomList, denominator: AtomList) -> AtomId {
        self.alloc_kind(AtomKind::Fraction(FractionItem::new(numerator, denominator)), "")
    }

    /// Add a fraction with full control over its fields.
    pub fn fraction_with(&mut self, item: FractionItem) -> AtomId {
        self.alloc_kind(AtomKind::Fraction(item), "")
    }

    /// Add a radical.
    pub fn radical(&mut self, radicand: AtomList, degree: Option<AtomList>) -> AtomId {
        self.alloc_kind(AtomKind::Radical(RadicalItem { radicand, degree }), "")
    }

    /// Add an accent. The accent is given as its (combining) character.
    pub fn accent(&mut self, accent: char, inner: AtomList, wide: bool) -> AtomId {
        self.alloc_kind(AtomKind::Accent(AccentItem { inner, wide }), accent.to_string())
    }

    /// Add a boundary for an inner atom. An empty nucleus is an invisible
    /// boundary like `\left.`.
    pub fn boundary(&mut self, text: impl Into<EcoString>) -> AtomId {
        self.alloc_kind(AtomKind::Boundary, text)
    }

    /// Add a list between delimiters.
    ///
    /// Fails if a given delimiter is not a boundary atom of this tree.
    pub fn inner(
        &mut self,
        left: Option<AtomId>,
        body: AtomList,
        right: Option<AtomId>,
    ) -> Result<AtomId, AtomError> {
        for id in left.iter().chain(&right).copied() {
            let atom = self.get(id).ok_or(AtomError::UnknownAtom(id))?;
            if atom.kind != AtomKind::Boundary {
                return Err(AtomError::NotABoundary { id, kind: atom.kind.name() });
            }
        }
        Ok(self.alloc_kind(AtomKind::Inner(InnerItem { body, left, right }), ""))
    }

    /// Add an underlined list.
    pub fn underline(&mut self, body: AtomList) -> AtomId {
        self.alloc_kind(AtomKind::Underline(body), "")
    }

    /// Add an overlined list.
    pub fn overline(&mut self, body: AtomList) -> AtomId {
        self.alloc_kind(AtomKind::Overline(body), "")
    }

    /// Add a table.
    pub fn table(&mut self, item: TableItem) -> AtomId {
        self.alloc_kind(AtomKind::Table(item), "")
    }

    /// Add a style switch.
    pub fn style(&mut self, size: MathSize) -> AtomId {
        self.alloc_kind(AtomKind::Style(size), "")
    }

    /// Add a colored list.
    pub fn color(&mut self, color: impl Into<EcoString>, body: AtomList) -> AtomId {
        let item = ColorItem { body, color: color.into() };
        self.alloc_kind(AtomKind::Color(item), "")
    }

    /// Add a list on a colored background.
    pub fn color_box(&mut self, color: impl Into<EcoString>, body: AtomList) -> AtomId {
        let item = ColorItem { body, color: color.into() };
        self.alloc_kind(AtomKind::ColorBox(item), "")
    }

    /// Add explicit space, in mu.
    pub fn space(&mut self, mu: f64) -> AtomId {
        self.alloc_kind(AtomKind::Space(SpaceItem { mu }), "")
    }

    /// Attach a superscript to an atom.
    pub fn set_superscript(&mut self, id: AtomId, list: AtomList) -> Result<(), AtomError> {
        self.check_attachable(id, &list)?;
        if let Some(atom) = self.get_mut(id) {
            atom.superscript = Some(list);
        }
        Ok(())
    }

    /// Attach a subscript to an atom.
    pub fn set_subscript(&mut self, id: AtomId, list: AtomList) -> Result<(), AtomError> {
        self.check_attachable(id, &list)?;
        if let Some(atom) = self.get_mut(id) {
            atom.subscript = Some(list);
        }
        Ok(())
    }

    /// Set the font style of an atom.
    pub fn set_font_style(&mut self, id: AtomId, style: FontStyle) -> Result<(), AtomError> {
        self.get_mut(id).ok_or(AtomError::UnknownAtom(id))?.font_style = style;
        Ok(())
    }

    /// Set the source range of an atom.
    pub fn set_range(&mut self, id: AtomId, range: SourceRange) -> Result<(), AtomError> {
        self.get_mut(id).ok_or(AtomError::UnknownAtom(id))?.range = range;
        Ok(())
    }

    /// Ensure that attaching `list` to `id` keeps the tree acyclic.
    fn check_attachable(&self, id: AtomId, list: &AtomList) -> Result<(), AtomError> {
        self.get(id).ok_or(AtomError::UnknownAtom(id))?;
        let mut stack: Vec<AtomId> = list.to_vec();
        while let Some(next) = stack.pop() {
            if next == id {
                return Err(AtomError::Cycle(id));
            }
            let atom = self.get(next).ok_or(AtomError::UnknownAtom(next))?;
            atom.for_each_list(|child| stack.extend(child.iter().copied()));
            stack.extend(atom.boundaries());
        }
        Ok(())
    }

    /// Deep-copy an atom and all of its children into fresh ids.
    pub fn clone_atom(&mut self, id: AtomId) -> Result<AtomId, AtomError> {
        let mut atom = self.get(id).cloned().ok_or(AtomError::UnknownAtom(id))?;

        let mut result = Ok(());
        atom.for_each_list_mut(|list| {
            if result.is_ok() {
                match self.clone_list(list) {
                    Ok(copy) => *list = copy,
                    Err(err) => result = Err(err),
                }
            }
        });
        result?;

        if let AtomKind::Inner(inner) = &mut atom.kind {
            inner.left = inner.left.map(|l| self.clone_atom(l)).transpose()?;
            inner.right = inner.right.map(|r| self.clone_atom(r)).transpose()?;
        }

        Ok(self.alloc(atom))
    }

    /// Deep-copy a list and all atoms in it.
    pub fn clone_list(&mut self, list: &AtomList) -> Result<AtomList, AtomError> {
        list.iter().map(|&id| self.clone_atom(id)).collect()
    }

    /// Copy the whole tree. The copy is not finalized.
    pub fn deep_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.finalized = false;
        copy
    }

    /// Temporarily take an atom out of the arena.
    pub(crate) fn take(&mut self, id: AtomId) -> Option<Atom> {
        self.atoms.get_mut(id.index()).map(std::mem::take)
    }

    /// Put an atom taken with [`AtomTree::take`] back.
    pub(crate) fn restore(&mut self, id: AtomId, atom: Atom) {
        if let Some(slot) = self.atoms.get_mut(id.index()) {
            *slot = atom;
        }
    }
}

/// The kind of a single-character atom.
fn symbol_kind(c: char) -> AtomKind {
    match default_math_class(c) {
        Some(MathClass::Alphabetic) if c.is_alphabetic() => AtomKind::Variable,
        Some(MathClass::Binary | MathClass::Vary) => AtomKind::BinaryOperator,
        Some(MathClass::Relation) => AtomKind::Relation,
        Some(MathClass::Opening) => AtomKind::Open,
        Some(MathClass::Closing) => AtomKind::Close,
        Some(MathClass::Punctuation) => AtomKind::Punctuation,
        Some(MathClass::Large) => AtomKind::LargeOperator(LargeOperatorItem::default()),
        _ if c.is_ascii_digit() => AtomKind::Number,
        _ if c.is_alphabetic() => AtomKind::Variable,
        _ => AtomKind::Ordinary,
    }
}
