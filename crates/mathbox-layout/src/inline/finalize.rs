use log::debug;
use mathbox_library::config::LayoutConfig;
use mathbox_library::layout::{Abs, Point};
use mathbox_library::math::Frame;
use mathbox_utils::SliceExt;

use super::Element;

/// Turn fitted lines into positioned frames.
///
/// The first baseline lies at `origin`. Each following one lies further
/// down by the tallest element of the line above, measured as ascent plus
/// descent, but at least by `min_line_advance` times the font size. Spaces
/// at the start and end of a line are dropped.
pub fn generate(lines: &[Vec<Element>], origin: Point, config: &LayoutConfig) -> Vec<Frame> {
    let min_advance = config.font_size * config.min_line_advance;
    let mut y = origin.y;
    let mut frames = Vec::with_capacity(lines.len());
    for line in lines {
        let mut frame = commit(line);
        frame.pos = Point::new(origin.x, y);
        let tallest = line
            .iter()
            .map(|element| element.ascent + element.descent)
            .max()
            .unwrap_or_default();
        y -= tallest.max(min_advance);
        frames.push(frame);
    }
    debug!("generated {} lines", frames.len());
    frames
}

/// Place the elements of one line next to each other on its baseline.
fn commit(line: &[Element]) -> Frame {
    let (start, end) = line.split_prefix_suffix(Element::is_space);
    let mut frame = Frame::group();
    let mut range = frame.range;
    let mut x = Abs::zero();
    for element in &line[start..end] {
        if let Some(child) = element.frame() {
            range = range.union(child.full_range());
            let pos = Point::new(x + element.lspace, child.pos.y);
            frame.push_grow(pos, child.clone());
        }
        x += element.width;
    }
    frame.width = x;
    frame.with_range(range)
}

#[cfg(test)]
mod tests {
    use mathbox_library::math::{AtomClass, FrameKind};

    use super::*;
    use crate::inline::ElementPayload;

    fn text(width: f64, ascent: f64) -> Element {
        let frame = Frame::new(FrameKind::Rule, Abs::pt(width), Abs::pt(ascent), Abs::pt(1.0));
        Element::new(ElementPayload::Text(frame), AtomClass::Ordinary, Abs::pt(width))
    }

    fn space(width: f64) -> Element {
        Element::new(ElementPayload::Space, AtomClass::Ordinary, Abs::pt(width))
    }

    #[test]
    fn test_elements_are_placed_in_order() {
        let mut scripted = text(3.0, 2.0);
        scripted.lspace = Abs::pt(-1.0);
        let line = vec![text(5.0, 4.0), space(2.0), scripted];
        let frames = generate(&[line], Point::zero(), &LayoutConfig::default());
        let frame = &frames[0];
        assert_eq!(frame.width, Abs::pt(10.0));
        assert_eq!(frame.children.len(), 2);
        assert_eq!(frame.children[1].pos.x, Abs::pt(6.0));
        assert_eq!(frame.ascent, Abs::pt(4.0));
    }

    #[test]
    fn test_edge_spaces_are_trimmed() {
        let line = vec![space(2.0), text(5.0, 4.0), space(3.0)];
        let frames = generate(&[line], Point::zero(), &LayoutConfig::default());
        assert_eq!(frames[0].width, Abs::pt(5.0));
        assert_eq!(frames[0].children[0].pos.x, Abs::zero());
    }

    #[test]
    fn test_advance_follows_the_tallest_element() {
        let config = LayoutConfig::default();
        let frame = Frame::new(FrameKind::Rule, Abs::pt(5.0), Abs::zero(), Abs::pt(12.0));
        let deep = Element::new(ElementPayload::Text(frame), AtomClass::Ordinary, Abs::pt(5.0));
        let lines = vec![vec![text(5.0, 20.0), deep], vec![text(5.0, 4.0)]];
        let frames = generate(&lines, Point::zero(), &config);
        // The line box spans 32pt, but no single element is taller than 21pt.
        assert_eq!(frames[0].height(), Abs::pt(32.0));
        assert_eq!(frames[1].pos.y, Abs::pt(-21.0));
    }

    #[test]
    fn test_lines_advance_downwards() {
        let config = LayoutConfig::default();
        let lines = vec![vec![text(5.0, 30.0)], vec![space(1.0)], vec![text(5.0, 4.0)]];
        let origin = Point::new(Abs::pt(7.0), Abs::pt(100.0));
        let frames = generate(&lines, origin, &config);
        assert_eq!(frames[0].pos, origin);
        assert_eq!(frames[1].pos.y, Abs::pt(69.0));
        // The empty line advances by the minimum of half the font size.
        assert_eq!(frames[2].pos.y, Abs::pt(59.0));
        assert!(frames.iter().all(|frame| frame.pos.x == Abs::pt(7.0)));
    }
}
