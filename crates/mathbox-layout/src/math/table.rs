use mathbox_library::layout::{Abs, Em, Point};
use mathbox_library::math::{Frame, FrameKind, MathSize, MathStyle, TableItem};

use super::{FrameFragment, MathContext, MathFragment};

/// Minimum distance between the baselines of two rows.
const BASELINE_SKIP: Em = Em::new(1.2);

/// Minimum gap between the descent of a row and the ascent of the next.
const LINE_SKIP: Em = Em::new(0.1);

/// The unit of additional row spacing.
const JOT: Em = Em::new(0.3);

/// Lay out a table of cells, centered on the math axis.
pub fn layout_table(ctx: &mut MathContext, item: &TableItem, style: MathStyle) -> MathFragment {
    let style = environment_style(item.environment.as_deref(), style);
    let ncols = item.columns();
    if item.rows.is_empty() || ncols == 0 {
        return FrameFragment::new(ctx, style, Frame::group()).into();
    }

    let font_size = ctx.font_size(style);
    let mut rows = Vec::with_capacity(item.rows.len());
    for row in &item.rows {
        let mut cells = Vec::with_capacity(row.len());
        for cell in row {
            cells.push(ctx.layout_into_frame(cell, style));
        }
        rows.push(cells);
    }

    let mut widths = vec![Abs::zero(); ncols];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            width.set_max(cell.width);
        }
    }

    let column_gap = Em::from_mu(item.column_spacing).at(font_size);
    let baseline_skip = BASELINE_SKIP.at(font_size);
    let line_skip = LINE_SKIP.at(font_size);
    let jot = JOT.at(font_size) * item.row_spacing;

    let mut frame = Frame::group().with_kind(FrameKind::Table);
    let mut y = Abs::zero();
    let mut prev_descent: Option<Abs> = None;
    for row in rows {
        let ascent = row.iter().map(|cell| cell.ascent).max().unwrap_or_default();
        let descent = row.iter().map(|cell| cell.descent).max().unwrap_or_default();
        if let Some(prev) = prev_descent {
            y -= baseline_skip.max(prev + ascent + line_skip) + jot;
        }
        prev_descent = Some(descent);

        let mut x = Abs::zero();
        for (c, cell) in row.into_iter().enumerate() {
            let offset = item.alignment(c).position(widths[c] - cell.width);
            frame.push_grow(Point::new(x + offset, y), cell);
            x += widths[c] + column_gap;
        }
    }

    // Center the rows on the axis.
    let axis = scaled!(ctx, style, axis_height);
    let shift = axis - (frame.ascent - frame.descent) / 2.0;
    for child in &mut frame.children {
        child.translate(Point::with_y(shift));
    }
    frame.ascent += shift;
    frame.descent -= shift;
    frame.width = widths.iter().copied().sum::<Abs>() + column_gap * (ncols - 1) as f64;

    FrameFragment::new(ctx, style, frame).into()
}

/// The style cells are laid out in.
fn environment_style(environment: Option<&str>, style: MathStyle) -> MathStyle {
    match environment {
        Some("smallmatrix") => MathStyle::new(MathSize::Script, false),
        Some(env) if env.ends_with("matrix") || env.ends_with("cases") || env == "array" => {
            MathStyle::text()
        }
        _ => style,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_style() {
        let display = MathStyle::display();
        assert_eq!(environment_style(None, display), display);
        assert_eq!(environment_style(Some("aligned"), display), display);
        assert_eq!(environment_style(Some("pmatrix"), display), MathStyle::text());
        assert_eq!(environment_style(Some("cases"), display), MathStyle::text());
        assert_eq!(
            environment_style(Some("smallmatrix"), display).size,
            MathSize::Script
        );
    }
}
