use std::ops::Range;

use log::{debug, trace};
use mathbox_library::config::FitConfig;
use mathbox_library::layout::Abs;
use mathbox_utils::Numeric;

use super::{Element, boundary_penalty, can_break_between};

/// Partition elements into lines no wider than `max_width - margin`.
///
/// Elements that may not be separated form units which always stay on one
/// line, even if a unit alone is too wide. When a unit overflows the line,
/// the cheapest of the last few legal breaks is taken. A break costs its
/// penalty plus a little for every unit it steps back.
///
/// A non-positive or infinite `max_width` disables breaking.
pub fn fit(
    elements: Vec<Element>,
    max_width: Abs,
    margin: Abs,
    config: &FitConfig,
) -> Vec<Vec<Element>> {
    if elements.is_empty() {
        return Vec::new();
    }
    if max_width <= Abs::zero() || !max_width.is_finite() {
        debug!("breaking disabled for width {max_width:?}");
        return vec![elements];
    }

    let units = units(&elements);
    let available = max_width - margin;
    let breaks = breakpoints(&elements, &units, available, config);
    debug!("fitted {} units into {} lines", units.len(), breaks.len() + 1);

    let mut lines = Vec::with_capacity(breaks.len() + 1);
    let mut iter = elements.into_iter();
    let mut prev = 0;
    for end in breaks.into_iter().map(|unit| units[unit].start).chain([usize::MAX]) {
        let line: Vec<Element> = iter.by_ref().take(end - prev).collect();
        trace!("line of {} elements", line.len());
        lines.push(line);
        prev = end;
    }
    lines
}

/// Split elements into the runs that must stay on one line.
fn units(elements: &[Element]) -> Vec<Range<usize>> {
    let mut units = Vec::new();
    let mut start = 0;
    for (i, pair) in elements.windows(2).enumerate() {
        if can_break_between(&pair[0], &pair[1]) {
            units.push(start..i + 1);
            start = i + 1;
        }
    }
    units.push(start..elements.len());
    units
}

/// Determine the units that start a new line.
fn breakpoints(
    elements: &[Element],
    units: &[Range<usize>],
    available: Abs,
    config: &FitConfig,
) -> Vec<usize> {
    let widths: Vec<Abs> = units
        .iter()
        .map(|unit| elements[unit.clone()].iter().map(|element| element.width).sum())
        .collect();

    // The cost of breaking before a unit, without the step-back cost.
    let cost = |unit: usize| {
        let left = &elements[units[unit].start - 1];
        let right = &elements[units[unit].start];
        config.penalties.value(boundary_penalty(left, right)).unwrap_or(f64::INFINITY)
    };

    let mut breaks = Vec::new();
    let mut line_start = 0;
    let mut running = Abs::zero();
    let mut k = 0;
    while k < units.len() {
        if k == line_start || available.fits(running + widths[k]) {
            running += widths[k];
            k += 1;
            continue;
        }

        // The unit overflows. Consider the last few breaks up to it and
        // take the cheapest, preferring later ones on ties.
        let first = (line_start + 1).max((k + 1).saturating_sub(config.lookahead));
        let mut best = k;
        let mut best_cost = f64::INFINITY;
        for candidate in first..=k {
            let total = cost(candidate) + config.step_back_cost * (k - candidate) as f64;
            if total <= best_cost {
                best = candidate;
                best_cost = total;
            }
        }

        trace!("breaking before unit {best} at cost {best_cost}");
        breaks.push(best);
        line_start = best;
        running = Abs::zero();
        k = best;
    }
    breaks
}

#[cfg(test)]
mod tests {
    use mathbox_library::config::Penalty;
    use mathbox_library::math::{AtomClass, Frame};

    use super::*;
    use crate::inline::{ElementPayload, GroupId};

    fn element(width: f64, before: Penalty, after: Penalty) -> Element {
        let frame = Frame::space(Abs::pt(width));
        Element::new(ElementPayload::Text(frame), AtomClass::Ordinary, Abs::pt(width))
            .with_penalties(before, after)
    }

    fn widths(lines: &[Vec<Element>]) -> Vec<Vec<f64>> {
        lines
            .iter()
            .map(|line| line.iter().map(|element| element.width.to_pt()).collect())
            .collect()
    }

    #[test]
    fn test_no_breaking_without_width() {
        let elements = vec![element(10.0, Penalty::Good, Penalty::Good); 5];
        let config = FitConfig::default();
        assert_eq!(fit(elements.clone(), Abs::zero(), Abs::zero(), &config).len(), 1);
        assert_eq!(fit(elements, Abs::inf(), Abs::zero(), &config).len(), 1);
        assert!(fit(vec![], Abs::pt(10.0), Abs::zero(), &config).is_empty());
    }

    #[test]
    fn test_greedy_fill() {
        let elements = vec![element(10.0, Penalty::Good, Penalty::Good); 5];
        let lines = fit(elements, Abs::pt(25.0), Abs::zero(), &FitConfig::default());
        assert_eq!(widths(&lines), [vec![10.0, 10.0], vec![10.0, 10.0], vec![10.0]]);
    }

    #[test]
    fn test_margin_reduces_width() {
        let elements = vec![element(10.0, Penalty::Good, Penalty::Good); 4];
        let lines = fit(elements, Abs::pt(40.0), Abs::pt(5.0), &FitConfig::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 3);
    }

    #[test]
    fn test_prefers_better_break() {
        let mut elements = vec![element(10.0, Penalty::Good, Penalty::Bad); 4];
        elements[1].penalty_after = Penalty::Best;
        // Overflow happens before the fourth element. Breaking after the
        // second one costs one step back but avoids the bad boundaries.
        let lines = fit(elements, Abs::pt(35.0), Abs::zero(), &FitConfig::default());
        assert_eq!(widths(&lines), [vec![10.0, 10.0], vec![10.0, 10.0]]);
    }

    #[test]
    fn test_lookahead_limits_candidates() {
        let mut elements = vec![element(10.0, Penalty::Good, Penalty::Bad); 6];
        elements[0].penalty_after = Penalty::Best;
        let config = FitConfig { lookahead: 2, ..FitConfig::default() };
        let lines = fit(elements, Abs::pt(55.0), Abs::zero(), &config);
        assert_eq!(widths(&lines), [vec![10.0; 5], vec![10.0]]);
    }

    #[test]
    fn test_groups_stay_together() {
        let mut elements = vec![element(10.0, Penalty::Good, Penalty::Good); 4];
        for element in &mut elements[1..3] {
            element.group = Some(GroupId(1));
        }
        let lines = fit(elements, Abs::pt(25.0), Abs::zero(), &FitConfig::default());
        assert_eq!(widths(&lines), [vec![10.0], vec![10.0, 10.0], vec![10.0]]);
    }

    #[test]
    fn test_oversized_unit_stays_whole() {
        let mut elements = vec![element(10.0, Penalty::Good, Penalty::Good); 3];
        elements[1].width = Abs::pt(100.0);
        elements[1].indivisible = true;
        let lines = fit(elements, Abs::pt(25.0), Abs::zero(), &FitConfig::default());
        assert_eq!(widths(&lines), [vec![10.0], vec![100.0], vec![10.0]]);
    }

    #[test]
    fn test_forbidden_boundaries_join_units() {
        let mut elements = vec![element(10.0, Penalty::Good, Penalty::Good); 3];
        elements[0].break_after = false;
        elements[2].penalty_before = Penalty::Never;
        assert_eq!(units(&elements), [0..3]);
    }
}
