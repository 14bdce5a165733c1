use mathbox_layout::{layout, typeset_lines};
use mathbox_library::config::LayoutConfig;
use mathbox_library::layout::{Abs, Em};
use mathbox_library::math::{AtomTree, FrameKind, MathSize};
use thin_vec::thin_vec;
use mathbox_library::text::StaticFont;

#[test]
fn test_font_constants_from_json() {
    let font: StaticFont =
        serde_json::from_str(r#"{"constants": {"axis_height": 0.4}}"#).unwrap();
    let config = LayoutConfig::default();

    let mut tree = AtomTree::new();
    let one = tree.symbols("1");
    let two = tree.symbols("2");
    let frac = tree.fraction(one, two);
    tree.push(frac);
    let frame = layout(&tree, tree.root(), MathSize::Display, false, &font, &config);

    let rule = frame.find(|f| f.kind == FrameKind::Rule).unwrap();
    let axis = Em::new(0.4).at(config.font_size);
    assert!((rule.pos.y + rule.ascent / 2.0).approx_eq(axis));
}

#[test]
fn test_glyph_shapes_from_json() {
    let font: StaticFont =
        serde_json::from_str(r#"{"glyphs": {"x": {"advance": 2.0, "ascent": 0.5}}}"#).unwrap();
    let config = LayoutConfig::default();

    let mut tree = AtomTree::new();
    let x = tree.ordinary("x");
    tree.push(x);
    let frame = layout(&tree, tree.root(), MathSize::Text, false, &font, &config);
    assert_eq!(frame.width, Em::new(2.0).at(config.font_size));
}

#[test]
fn test_layout_config_from_json() {
    let config: LayoutConfig = serde_json::from_str(
        r#"{"font_size": 10.0, "min_line_advance": 2.0, "fit": {"lookahead": 1}}"#,
    )
    .unwrap();
    assert!(config.validate().is_ok());

    let mut tree = AtomTree::new();
    let list = tree.symbols("a+b+c");
    tree.set_root(list);
    let lines = typeset_lines(&tree, StaticFont::shared(), &config, Abs::pt(15.0));
    assert!(lines.len() > 1);
    // Lines are at least two font sizes apart.
    assert!((lines[0].pos.y - lines[1].pos.y).approx_eq(Abs::pt(20.0)));
}

#[test]
fn test_connector_overlap_does_not_affect_layout() {
    let mut font = StaticFont::default();
    font.constants.min_connector_overlap = Em::new(0.5);
    let config = LayoutConfig::default();

    let mut tree = AtomTree::new();
    let one = tree.symbols("1");
    let two = tree.symbols("2");
    let frac = tree.fraction(one, two);
    let left = tree.boundary("(");
    let right = tree.boundary(")");
    let fenced = tree.inner(Some(left), thin_vec![frac], Some(right)).unwrap();
    tree.push(fenced);

    let with = layout(&tree, tree.root(), MathSize::Display, false, &font, &config);
    let without =
        layout(&tree, tree.root(), MathSize::Display, false, StaticFont::shared(), &config);
    assert_eq!(with.fingerprint(), without.fingerprint());
}
