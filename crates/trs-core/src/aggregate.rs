//! ---
//! trs_section: "08-thermal-risk-model"
//! trs_subsection: "module"
//! trs_type: "source"
//! trs_scope: "code"
//! trs_description: "Hall-level reductions over rack populations."
//! trs_version: "v0.1.0"
//! trs_owner: "tbd"
//! ---
use std::cmp::Ordering;

use crate::category::Category;
use crate::rack::Rack;

/// Worst category across a population by the category total order.
/// An empty population reduces to `Stable`.
pub fn overall_category<'a, I>(racks: I) -> Category
where
    I: IntoIterator<Item = &'a Rack>,
{
    racks
        .into_iter()
        .fold(Category::Stable, |worst, rack| worst.max(rack.category()))
}

/// Count racks whose category matches a membership predicate.
pub fn count_matching<'a, I, P>(racks: I, predicate: P) -> usize
where
    I: IntoIterator<Item = &'a Rack>,
    P: Fn(Category) -> bool,
{
    racks
        .into_iter()
        .filter(|rack| predicate(rack.category()))
        .count()
}

pub fn count_critical<'a, I>(racks: I) -> usize
where
    I: IntoIterator<Item = &'a Rack>,
{
    count_matching(racks, |category| category == Category::Critical)
}

pub fn count_fragile_or_critical<'a, I>(racks: I) -> usize
where
    I: IntoIterator<Item = &'a Rack>,
{
    count_matching(racks, |category| category >= Category::Fragile)
}

/// Index of the stress rack: the first strict minimum by thermal margin, so
/// ties resolve to the earliest rack in population order.
pub fn stress_rack_index(racks: &[Rack]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, rack) in racks.iter().enumerate() {
        match best {
            Some((_, margin)) if rack.thermal_margin() >= margin => {}
            _ => best = Some((idx, rack.thermal_margin())),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Indices of the `n` lowest-margin racks, ascending by margin. The sort is
/// stable, so equal margins keep population order.
pub fn lowest_margin_indices(racks: &[Rack], n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..racks.len()).collect();
    order.sort_by(|&a, &b| {
        racks[a]
            .thermal_margin()
            .partial_cmp(&racks[b].thermal_margin())
            .unwrap_or(Ordering::Equal)
    });
    order.truncate(n);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rack::LoadBand;

    fn rack_with_margin(col: usize, margin: f64) -> Rack {
        Rack::from_reading('A', col, 33.0, 33.0 - margin, LoadBand::Nominal)
    }

    #[test]
    fn one_critical_rack_dominates_any_number_of_stable_racks() {
        let mut racks: Vec<Rack> = (1..=10).map(|col| rack_with_margin(col, 6.0)).collect();
        assert_eq!(overall_category(&racks), Category::Stable);

        racks.push(rack_with_margin(11, 0.5));
        assert_eq!(overall_category(&racks), Category::Critical);
    }

    #[test]
    fn empty_population_reduces_to_stable() {
        let empty: Vec<Rack> = Vec::new();
        assert_eq!(overall_category(&empty), Category::Stable);
        assert_eq!(count_critical(&empty), 0);
        assert_eq!(stress_rack_index(&empty), None);
    }

    #[test]
    fn fragile_or_critical_counts_both_bands() {
        let racks = vec![
            rack_with_margin(1, 6.0), // Stable
            rack_with_margin(2, 4.0), // Tight
            rack_with_margin(3, 2.5), // Fragile
            rack_with_margin(4, 0.5), // Critical
        ];
        assert_eq!(count_fragile_or_critical(&racks), 2);
        assert_eq!(count_critical(&racks), 1);
    }

    #[test]
    fn stress_rack_ties_break_to_first_encounter() {
        let racks = vec![
            rack_with_margin(1, 3.0),
            rack_with_margin(2, 2.0),
            rack_with_margin(3, 2.0),
        ];
        assert_eq!(stress_rack_index(&racks), Some(1));
    }

    #[test]
    fn lowest_margin_selection_is_stable_and_bounded() {
        let racks = vec![
            rack_with_margin(1, 5.0),
            rack_with_margin(2, 2.0),
            rack_with_margin(3, 2.0),
            rack_with_margin(4, 1.0),
        ];
        assert_eq!(lowest_margin_indices(&racks, 3), vec![3, 1, 2]);
        // Requesting more than the population yields everything.
        assert_eq!(lowest_margin_indices(&racks, 10).len(), 4);
    }
}
