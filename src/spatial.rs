// Directional resolver: nearest admissible neighbour in a direction.
// Pure function of the registry at call time. Rule: aligned neighbours beat closer diagonal ones.
// See DESIGN.md: Directional Resolver

use tracing::trace;

use crate::config::NavSettings;
use crate::registry::{FocusRegistry, Region};
use crate::types::*;

/// Best candidate for moving from `current` in `direction`, using default settings.
///
/// Returns `None` when `current` is not registered or nothing is admissible;
/// neither case is an error, focus simply stays put.
pub fn find_next<'a, R: Region>(
    current: &str,
    direction: Direction,
    registry: &'a FocusRegistry<R>,
) -> Option<&'a RegionId> {
    find_next_with(current, direction, registry, &NavSettings::default())
}

/// [`find_next`] with explicit tunables.
pub fn find_next_with<'a, R: Region>(
    current: &str,
    direction: Direction,
    registry: &'a FocusRegistry<R>,
    settings: &NavSettings,
) -> Option<&'a RegionId> {
    let origin = registry.rect_of(current)?.center();

    let mut best: Option<(&RegionId, f64)> = None;
    for (id, region) in registry.iter() {
        if *id == current {
            continue;
        }
        let rect = region.rect();
        if rect.is_empty() {
            continue;
        }

        let Some(score) = weighted_distance(origin, rect.center(), direction, settings) else {
            continue;
        };

        // Strict comparison keeps the earliest registered candidate on ties.
        if best.map_or(true, |(_, best_score)| score < best_score) {
            best = Some((id, score));
        }
    }

    trace!(
        current,
        ?direction,
        candidate = best.map(|(id, _)| id.as_str()),
        "directional search"
    );
    best.map(|(id, _)| id)
}

/// Weighted distance from `origin` to `target`, or `None` if `target` lies
/// outside the direction's admissibility cone.
fn weighted_distance(
    origin: Point,
    target: Point,
    direction: Direction,
    settings: &NavSettings,
) -> Option<f64> {
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;

    // (on-axis offset, off-axis offset), on-axis signed toward `direction`.
    let (along, across) = match direction {
        Direction::Up => (-dy, dx),
        Direction::Down => (dy, dx),
        Direction::Left => (-dx, dy),
        Direction::Right => (dx, dy),
    };

    // NaN offsets must fail this check.
    if !(along > 0.0 && across.abs() < settings.cone_ratio * along) {
        return None;
    }

    let distance = dx.hypot(dy);
    if across.abs() < settings.alignment_tolerance {
        Some(distance * settings.alignment_weight)
    } else {
        Some(distance)
    }
}
