use foundation::math::precision::stable_total_cmp_f64;
use foundation::math::{GeoPoint, distance_meters};

use crate::item::MapItem;

/// Items within `threshold_m` of `trigger`, the candidate cluster around it.
///
/// Ordering contract:
/// - Closest to `trigger` first.
/// - Equal distances keep input order (stable sort), so expanding the same
///   cluster twice zips spiral slots to members identically.
///
/// A press on an item passes that item's own point as `trigger`, so the result
/// always contains it. A result of one item or fewer means "no cluster".
pub fn find_cluster<'a>(
    items: &'a [MapItem],
    trigger: GeoPoint,
    threshold_m: f64,
) -> Vec<&'a MapItem> {
    let mut hits: Vec<(f64, &MapItem)> = items
        .iter()
        .map(|item| (distance_meters(item.point, trigger), item))
        .filter(|(d, _)| *d <= threshold_m)
        .collect();
    hits.sort_by(|a, b| stable_total_cmp_f64(a.0, b.0));
    hits.into_iter().map(|(_, item)| item).collect()
}

/// The item closest to `point`; ties go to the earliest item in input order.
pub fn nearest_item(items: &[MapItem], point: GeoPoint) -> Option<&MapItem> {
    let mut best: Option<(f64, &MapItem)> = None;
    for item in items {
        let d = distance_meters(item.point, point);
        best = match best {
            Some((bd, _)) if !stable_total_cmp_f64(d, bd).is_lt() => best,
            _ => Some((d, item)),
        };
    }
    best.map(|(_, item)| item)
}
