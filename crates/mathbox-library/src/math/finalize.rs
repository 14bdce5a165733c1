use log::trace;

use crate::math::{AtomId, AtomKind, AtomList, AtomTree};

impl AtomTree {
    /// Apply the classical clean-up rules to every list of the tree.
    ///
    /// - A binary operator at the start of a list, or after a binary
    ///   operator, relation, opening delimiter, punctuation, large operator
    ///   or unary operator, becomes a unary operator.
    /// - A binary operator at the end of a list, or directly before a
    ///   relation, punctuation or closing delimiter, becomes a unary operator.
    /// - Adjacent numbers without scripts on the left one are fused. The
    ///   fused atom keeps the scripts of the right one.
    ///
    /// Finalizing twice is the same as finalizing once.
    pub fn finalize(&mut self) {
        let mut root = std::mem::take(self.root_mut());
        self.finalize_list(&mut root);
        *self.root_mut() = root;
        self.mark_finalized();
    }

    /// Finalize a single list and everything below it.
    pub fn finalize_list(&mut self, list: &mut AtomList) {
        for &id in list.iter() {
            self.finalize_children(id);
        }

        let mut out = AtomList::with_capacity(list.len());
        let mut prev: Option<AtomId> = None;
        for &id in list.iter() {
            let Some(kind) = self.get(id).map(|atom| atom.kind.clone()) else {
                out.push(id);
                continue;
            };

            let prev_kind = prev.and_then(|p| self.get(p)).map(|atom| atom.kind.clone());
            let prev_kind = prev_kind.as_ref();
            match kind {
                AtomKind::Number if prev_kind == Some(&AtomKind::Number) => {
                    if let Some(p) = prev
                        && self.fuse(p, id)
                    {
                        continue;
                    }
                }
                AtomKind::BinaryOperator if binary_turns_unary(prev_kind) => {
                    trace!("binary operator {id:?} becomes unary");
                    self.set_kind(id, AtomKind::UnaryOperator);
                }
                AtomKind::Relation | AtomKind::Punctuation | AtomKind::Close
                    if prev_kind == Some(&AtomKind::BinaryOperator) =>
                {
                    if let Some(p) = prev {
                        trace!("binary operator {p:?} before {id:?} becomes unary");
                        self.set_kind(p, AtomKind::UnaryOperator);
                    }
                }
                _ => {}
            }

            out.push(id);
            prev = Some(id);
        }

        if let Some(p) = prev
            && self.get(p).is_some_and(|atom| atom.kind == AtomKind::BinaryOperator)
        {
            trace!("binary operator {p:?} at the end of a list becomes unary");
            self.set_kind(p, AtomKind::UnaryOperator);
        }

        *list = out;
    }

    /// Finalize the child lists of an atom.
    fn finalize_children(&mut self, id: AtomId) {
        let Some(mut atom) = self.take(id) else { return };
        atom.for_each_list_mut(|list| self.finalize_list(list));
        for boundary in atom.boundaries() {
            self.finalize_children(boundary);
        }
        self.restore(id, atom);
    }

    /// Fuse the number `next` into `prev`. Returns whether it happened.
    fn fuse(&mut self, prev: AtomId, next: AtomId) -> bool {
        let Some(atom) = self.get(next).cloned() else { return false };
        let Some(target) = self.get_mut(prev) else { return false };
        if target.has_scripts() {
            return false;
        }
        trace!("fusing number {next:?} into {prev:?}");
        target.nucleus.push_str(&atom.nucleus);
        target.range = target.range.union(atom.range);
        target.superscript = atom.superscript;
        target.subscript = atom.subscript;
        true
    }

    fn set_kind(&mut self, id: AtomId, kind: AtomKind) {
        if let Some(atom) = self.get_mut(id) {
            atom.kind = kind;
        }
    }
}

/// Whether a binary operator after an atom of the given kind has no left
/// operand.
fn binary_turns_unary(prev: Option<&AtomKind>) -> bool {
    match prev {
        None => true,
        Some(kind) => matches!(
            kind,
            AtomKind::BinaryOperator
                | AtomKind::UnaryOperator
                | AtomKind::Relation
                | AtomKind::Open
                | AtomKind::Punctuation
                | AtomKind::LargeOperator(_)
        ),
    }
}

#[cfg(test)]
mod tests {
    use thin_vec::thin_vec;

    use super::*;
    use crate::math::SourceRange;

    fn kinds(tree: &AtomTree, list: &AtomList) -> Vec<AtomKind> {
        tree.atoms(list).map(|(_, atom)| atom.kind.clone()).collect()
    }

    #[test]
    fn test_leading_minus_becomes_unary() {
        let mut tree = AtomTree::new();
        let root = tree.symbols("-x=+y");
        tree.set_root(root);
        tree.finalize();
        assert_eq!(
            kinds(&tree, tree.root()),
            [
                AtomKind::UnaryOperator,
                AtomKind::Variable,
                AtomKind::Relation,
                AtomKind::UnaryOperator,
                AtomKind::Variable,
            ]
        );
    }

    #[test]
    fn test_binary_before_relation_becomes_unary() {
        let mut tree = AtomTree::new();
        let root = tree.symbols("x+=y");
        tree.set_root(root);
        tree.finalize();
        assert_eq!(kinds(&tree, tree.root())[1], AtomKind::UnaryOperator);
    }

    #[test]
    fn test_trailing_binary_becomes_unary() {
        let mut tree = AtomTree::new();
        let root = tree.symbols("a+b+");
        tree.set_root(root);
        tree.finalize();
        let kinds = kinds(&tree, tree.root());
        assert_eq!(kinds[1], AtomKind::BinaryOperator);
        assert_eq!(kinds[3], AtomKind::UnaryOperator);
    }

    #[test]
    fn test_numbers_fuse_and_keep_scripts() {
        let mut tree = AtomTree::new();
        let one = tree.number("1");
        let two = tree.number("2");
        let three = tree.number("3");
        tree.set_range(one, SourceRange::new(0, 1)).unwrap();
        tree.set_range(two, SourceRange::new(1, 1)).unwrap();
        let sup = tree.number("4");
        tree.set_superscript(three, thin_vec![sup]).unwrap();
        tree.set_root(thin_vec![one, two, three]);
        tree.finalize();

        assert_eq!(tree.root().len(), 1);
        let fused = tree.get(tree.root()[0]).unwrap();
        assert_eq!(fused.nucleus, "123");
        assert_eq!(fused.range.to_range(), 0..2);
        assert!(fused.superscript.is_some());
    }

    #[test]
    fn test_finalize_recurses_and_is_idempotent() {
        let mut tree = AtomTree::new();
        let num = tree.symbols("-12");
        let den = tree.symbols("a+");
        let frac = tree.fraction(num, den);
        let tail = tree.symbols("+-1");
        let mut root = thin_vec![frac];
        root.extend(tail);
        tree.set_root(root);

        tree.finalize();
        assert!(tree.is_finalized());
        let once = tree.clone();
        tree.finalize();
        assert_eq!(tree, once);

        let AtomKind::Fraction(item) = &tree.get(frac).unwrap().kind else { panic!() };
        assert_eq!(item.numerator.len(), 2);
        assert_eq!(kinds(&tree, &item.denominator)[1], AtomKind::UnaryOperator);
    }
}
