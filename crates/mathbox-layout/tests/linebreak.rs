use mathbox_layout::{
    Element, ElementPayload, can_break_between, fit, generate, layout, tokenize, tokenize_list,
    typeset_lines,
};
use mathbox_library::config::{LayoutConfig, Penalty};
use mathbox_library::layout::{Abs, Em, Point};
use mathbox_library::math::{
    AtomClass, AtomList, AtomTree, FrameKind, GroupStyle, MathSize, MathStyle, spacing,
};
use mathbox_library::text::StaticFont;
use rayon::prelude::*;
use thin_vec::thin_vec;

fn config() -> LayoutConfig {
    LayoutConfig::default()
}

fn tokens(tree: &AtomTree) -> Vec<Element> {
    tokenize(tree, StaticFont::shared(), &config())
}

fn text(line: &[Element]) -> String {
    line.iter()
        .filter_map(Element::frame)
        .map(|frame| frame.text())
        .collect()
}

fn total(line: &[Element]) -> Abs {
    line.iter().map(|element| element.width).sum()
}

fn sums(tree: &mut AtomTree, text: &str) {
    let list = tree.symbols(text);
    tree.set_root(list);
}

/// Fit at every width from 1pt to 199pt and check that nothing is lost and
/// that every line ends at a legal breakpoint.
fn sweep(elements: &[Element]) -> Vec<Vec<Vec<Element>>> {
    (1..200)
        .map(|width| {
            let lines = fit(elements.to_vec(), Abs::pt(width as f64), Abs::zero(), &config().fit);
            let flat: Vec<Element> = lines.iter().flatten().cloned().collect();
            assert_eq!(flat, elements, "elements changed at {width}pt");
            for pair in lines.windows(2) {
                let (Some(last), Some(first)) = (pair[0].last(), pair[1].first()) else {
                    panic!("empty line at {width}pt");
                };
                assert!(can_break_between(last, first), "illegal break at {width}pt");
            }
            lines
        })
        .collect()
}

#[test]
fn test_operators_carry_their_spacing() {
    let mut tree = AtomTree::new();
    sums(&mut tree, "a+b");
    let elements = tokens(&tree);
    assert_eq!(elements.len(), 3);

    let font_size = config().font_size;
    let medium = spacing(AtomClass::Ordinary, AtomClass::Binary, MathSize::Display, font_size);
    let plus = &elements[1];
    assert!(matches!(plus.payload, ElementPayload::Operator { class: AtomClass::Binary, .. }));
    assert!(plus.lspace.approx_eq(medium));
    assert!(plus.width.approx_eq(Em::new(0.778).at(font_size) + medium * 2.0));
    assert!(elements[0].width.approx_eq(Em::new(0.5).at(font_size)));
}

#[test]
fn test_elements_add_up_to_layout_width() {
    let mut tree = AtomTree::new();
    sums(&mut tree, "a+b=c,d");
    tree.finalize();
    let elements = tokens(&tree);
    let frame = layout(
        &tree,
        tree.root(),
        MathSize::Display,
        false,
        StaticFont::shared(),
        &config(),
    );
    assert!(total(&elements).approx_eq(frame.width));
}

#[test]
fn test_breaks_after_binary_operators() {
    let mut tree = AtomTree::new();
    sums(&mut tree, "a+b+c+d");
    let lines = fit(tokens(&tree), Abs::pt(50.0), Abs::zero(), &config().fit);

    let texts: Vec<String> = lines.iter().map(|line| text(line)).collect();
    assert_eq!(texts, ["𝑎+", "𝑏+", "𝑐+𝑑"]);
    for line in &lines {
        assert!(Abs::pt(50.0).fits(total(line)));
    }
}

#[test]
fn test_breaking_keeps_all_elements_in_order() {
    let mut tree = AtomTree::new();
    sums(&mut tree, "x=a+b−c+d=y");
    let elements = tokens(&tree);
    for width in [30.0, 60.0, 90.0, 1000.0] {
        let lines = fit(elements.clone(), Abs::pt(width), Abs::zero(), &config().fit);
        let flat: Vec<Element> = lines.iter().flatten().cloned().collect();
        assert_eq!(flat, elements);
        assert!(lines.iter().all(|line| !line.is_empty()));
        for pair in lines.windows(2) {
            let (Some(last), Some(first)) = (pair[0].last(), pair[1].first()) else {
                panic!("empty line");
            };
            assert!(can_break_between(last, first));
        }
    }
}

#[test]
fn test_scripts_stay_with_their_base() {
    let mut tree = AtomTree::new();
    let x = tree.variable("x");
    let two = tree.symbols("2");
    tree.set_superscript(x, two).unwrap();
    let plus = tree.binary("+");
    let y = tree.variable("y");
    tree.set_root(thin_vec![x, plus, y]);

    let elements = tokens(&tree);
    assert_eq!(elements.len(), 4);
    let (base, script) = (&elements[0], &elements[1]);
    assert!(base.group.is_some());
    assert_eq!(base.group, script.group);
    assert!(matches!(script.payload, ElementPayload::Script { superscript: true, .. }));
    assert!(!can_break_between(base, script));

    let scripted = layout(
        &tree,
        &thin_vec![x],
        MathSize::Display,
        false,
        StaticFont::shared(),
        &config(),
    );
    assert!((base.width + script.width).approx_eq(scripted.width));

    // Even when the scripted atom alone overflows, it is not split.
    let lines = fit(elements, Abs::pt(12.0), Abs::zero(), &config().fit);
    assert_eq!(lines[0].len(), 2);
}

#[test]
fn test_structures_are_indivisible() {
    let mut tree = AtomTree::new();
    let y = tree.variable("y");
    let eq = tree.relation("=");
    let one = tree.symbols("1");
    let c = tree.symbols("c");
    let frac = tree.fraction(one, c);
    let sum = tree.large_operator("∑", true);
    let lower = tree.symbols("0");
    tree.set_subscript(sum, lower).unwrap();
    tree.set_root(thin_vec![y, eq, frac, sum]);

    let elements = tokens(&tree);
    assert_eq!(elements.len(), 4);
    for element in &elements[2..] {
        assert!(element.indivisible);
        assert!(matches!(element.payload, ElementPayload::Display(_)));
    }
    assert!(matches!(
        elements[2].frame().map(|frame| &frame.kind),
        Some(FrameKind::Fraction)
    ));
    assert!(matches!(
        elements[3].frame().map(|frame| &frame.kind),
        Some(FrameKind::Limits)
    ));
    assert_eq!(elements[1].penalty_after, Penalty::Best);
}

#[test]
fn test_punctuation_and_delimiters() {
    let mut tree = AtomTree::new();
    sums(&mut tree, "(a,b)");
    let elements = tokens(&tree);
    assert_eq!(elements.len(), 5);

    // No break after an opening or before a closing delimiter, and none
    // before punctuation.
    assert!(!can_break_between(&elements[0], &elements[1]));
    assert!(!can_break_between(&elements[1], &elements[2]));
    assert!(can_break_between(&elements[2], &elements[3]));
    assert!(!can_break_between(&elements[3], &elements[4]));
    assert_eq!(elements[2].penalty_after, Penalty::Good);
}

#[test]
fn test_colored_runs_share_a_parent() {
    let mut tree = AtomTree::new();
    let body = tree.symbols("a+b");
    let color = tree.color("blue", body);
    let eq = tree.relation("=");
    let c = tree.variable("c");
    tree.set_root(thin_vec![color, eq, c]);

    let elements = tokens(&tree);
    assert_eq!(elements.len(), 5);
    let parent = elements[0].parent_group;
    assert!(parent.is_some());
    for element in &elements[..3] {
        assert_eq!(element.parent_group, parent);
        let frame = element.frame().unwrap();
        assert!(matches!(
            &frame.kind,
            FrameKind::Group(GroupStyle { color: Some(color), .. }) if color == "blue"
        ));
    }
    assert_eq!(elements[3].parent_group, None);
    // The colored run can still be broken inside.
    assert!(can_break_between(&elements[1], &elements[2]));
}

#[test]
fn test_script_sizes_drop_operator_spacing() {
    let mut tree = AtomTree::new();
    let style = tree.style(MathSize::Script);
    let list = tree.symbols("a+b");
    let mut root: AtomList = thin_vec![style];
    root.extend(list);
    tree.set_root(root);

    let elements = tokens(&tree);
    assert_eq!(elements.len(), 3);
    let plus = &elements[1];
    assert_eq!(plus.lspace, Abs::zero());
    let script_size = config().font_size * 0.7;
    assert!(plus.width.approx_eq(Em::new(0.778).at(script_size)));
}

#[test]
fn test_explicit_space_is_an_element() {
    let mut tree = AtomTree::new();
    let a = tree.variable("a");
    let quad = tree.space(18.0);
    let b = tree.variable("b");
    tree.set_root(thin_vec![a, quad, b]);
    let elements = tokens(&tree);
    assert_eq!(elements.len(), 3);
    assert!(elements[1].is_space());
    assert!(elements[1].width.approx_eq(config().font_size));
}

#[test]
fn test_tokenize_finalizes_a_copy() {
    let mut tree = AtomTree::new();
    sums(&mut tree, "−a+12");
    let unfinalized = tokens(&tree);
    assert!(!tree.is_finalized());

    let mut finalized = tree.clone();
    finalized.finalize();
    assert_eq!(unfinalized, tokens(&finalized));

    // The leading minus became unary and the digits were fused.
    assert_eq!(unfinalized.len(), 4);
    assert!(matches!(unfinalized[0].payload, ElementPayload::Text(_)));
    assert_eq!(unfinalized[3].frame().map(|frame| frame.text()), Some("12".into()));
}

#[test]
fn test_tokenize_list_of_a_child() {
    let mut tree = AtomTree::new();
    let numerator = tree.symbols("a+b");
    let c = tree.symbols("c");
    let frac = tree.fraction(numerator.clone(), c);
    tree.push(frac);
    let style = MathStyle::display().for_numerator();
    let config = LayoutConfig::default().with_style(style.size);
    let elements = tokenize_list(&tree, &numerator, StaticFont::shared(), &config);
    assert_eq!(elements.len(), 3);
    assert_eq!(text(&elements), "𝑎+𝑏");
}

#[test]
fn test_typeset_lines_stack_downwards() {
    let mut tree = AtomTree::new();
    sums(&mut tree, "a+b+c+d");
    let frames = typeset_lines(&tree, StaticFont::shared(), &config(), Abs::pt(50.0));
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].pos.y, Abs::zero());
    for pair in frames.windows(2) {
        let advance = pair[0].pos.y - pair[1].pos.y;
        assert!(advance.approx_eq(pair[0].height().max(config().font_size * 0.5)));
    }
    assert_eq!(frames[2].text(), "𝑐+𝑑");
    assert!(frames.iter().all(|frame| Abs::pt(50.0).fits(frame.width)));
}

#[test]
fn test_typeset_lines_without_width() {
    let mut tree = AtomTree::new();
    sums(&mut tree, "a+b+c+d");
    let frames = typeset_lines(&tree, StaticFont::shared(), &config(), Abs::inf());
    assert_eq!(frames.len(), 1);
    let single = layout(
        &tree,
        tree.root(),
        MathSize::Display,
        false,
        StaticFont::shared(),
        &config(),
    );
    assert!(frames[0].width.approx_eq(single.width));
}

#[test]
fn test_trailing_operator_has_no_spacing() {
    let mut tree = AtomTree::new();
    sums(&mut tree, "a+");
    let elements = tokens(&tree);
    assert_eq!(elements.len(), 2);
    let plus = &elements[1];
    assert_eq!(plus.lspace, Abs::zero());
    assert!(plus.width.approx_eq(Em::new(0.778).at(config().font_size)));
}

#[test]
fn test_fenced_group_is_never_split() {
    let mut tree = AtomTree::new();
    let y = tree.variable("y");
    let eq = tree.relation("=");
    let left = tree.boundary("(");
    let x = tree.variable("x");
    let right = tree.boundary(")");
    let fenced = tree.inner(Some(left), thin_vec![x], Some(right)).unwrap();
    tree.set_root(thin_vec![y, eq, fenced]);

    let elements = tokens(&tree);
    assert_eq!(elements.len(), 3);
    let fenced = &elements[2];
    assert!(fenced.indivisible);
    assert!(matches!(fenced.payload, ElementPayload::Display(_)));
    let text = fenced.frame().map(|frame| frame.text()).unwrap_or_default();
    assert!(text.contains('(') && text.contains('𝑥') && text.contains(')'));

    // Too narrow for anything: the delimited group still sits on one line.
    let narrowest = &sweep(&elements)[0];
    assert_eq!(narrowest.last(), Some(&vec![fenced.clone()]));
}

#[test]
fn test_scripted_sums_break_between_terms() {
    let mut tree = AtomTree::new();
    let mut root = AtomList::new();
    for (i, name) in ["a", "b", "c"].into_iter().enumerate() {
        if i > 0 {
            root.push(tree.binary("+"));
        }
        let base = tree.variable(name);
        let two = tree.symbols("2");
        tree.set_superscript(base, two).unwrap();
        root.push(base);
    }
    tree.set_root(root);

    let elements = tokens(&tree);
    assert_eq!(elements.len(), 8);
    let lines = sweep(&elements);
    for lines in &lines {
        for line in lines {
            assert!(line.first().is_some_and(|first| !first.is_script()));
        }
    }

    let at_50pt: Vec<String> = lines[49].iter().map(|line| text(line)).collect();
    assert_eq!(at_50pt, ["𝑎2+", "𝑏2+", "𝑐2"]);
}

#[test]
fn test_fraction_fits_at_any_width() {
    let mut tree = AtomTree::new();
    let num = tree.symbols("a+b");
    let den = tree.symbols("c");
    let frac = tree.fraction(num, den);
    tree.push(frac);

    let elements = tokens(&tree);
    assert_eq!(elements.len(), 1);
    for lines in sweep(&elements) {
        assert_eq!(lines.len(), 1);
    }
}

#[test]
fn test_line_breaking_is_deterministic() {
    let mut tree = AtomTree::new();
    sums(&mut tree, "x=a+b−c+d=y");
    let run = || {
        let lines = fit(tokens(&tree), Abs::pt(40.0), Abs::zero(), &config().fit);
        generate(&lines, Point::zero(), &config())
            .iter()
            .map(|frame| frame.fingerprint())
            .collect::<Vec<u128>>()
    };
    let expected = run();
    assert!(expected.len() > 1);
    let results: Vec<Vec<u128>> = (0..32).into_par_iter().map(|_| run()).collect();
    assert!(results.iter().all(|fps| *fps == expected));
}

#[test]
fn test_configured_style_matches_layout_size() {
    let mut tree = AtomTree::new();
    sums(&mut tree, "a+b");
    let mut widths = Vec::new();
    for size in [MathSize::Display, MathSize::Script] {
        let config = config().with_style(size);
        let elements = tokenize(&tree, StaticFont::shared(), &config);
        let frame = layout(&tree, tree.root(), size, false, StaticFont::shared(), &config);
        assert!(total(&elements).approx_eq(frame.width));
        widths.push(frame.width);
    }
    assert!(widths[1] < widths[0]);
}

#[test]
fn test_boxed_relation_keeps_its_spacing() {
    let mut tree = AtomTree::new();
    let a = tree.variable("a");
    let eq = tree.relation("=");
    let boxed = tree.color_box("yellow", thin_vec![eq]);
    let b = tree.variable("b");
    tree.set_root(thin_vec![a, boxed, b]);

    let elements = tokens(&tree);
    assert_eq!(elements.len(), 3);
    let font_size = config().font_size;
    let thick = spacing(AtomClass::Ordinary, AtomClass::Relation, MathSize::Display, font_size);
    assert!(elements[1].lspace.approx_eq(thick));
    assert!(elements[0].width.approx_eq(Em::new(0.5).at(font_size)));
}
