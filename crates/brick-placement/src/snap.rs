//! Stud-to-socket snap resolution.
//!
//! Two passes over the existing parts: the new part seated on top (its
//! anti-studs on existing studs) and the new part tucked underneath (its
//! studs in existing anti-studs). The candidate with the smallest horizontal
//! distance to the pointer wins; the top pass wins exact ties.

use brick_catalog::{Catalog, ConnectionKind, PartDefinition};
use brick_math::{horizontal_distance, rotate_yaw, within_per_axis, Point3, Tolerances, Vec3};

use crate::collision::check_collision;
use crate::grid::snap_to_grid;
use crate::part::{world_points, PlacedPart};

/// Outcome of a snap query.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// Resolved position (the rough position when nothing snapped).
    pub position: Point3,
    /// True when a connecting placement was found.
    pub is_valid: bool,
    /// Existing part the new part connects to.
    pub connected_part_id: Option<String>,
    /// Connector of the new part that seats: anti-stud for the top pass,
    /// stud for the bottom pass.
    pub connection_type: Option<ConnectionKind>,
}

impl SnapResult {
    /// Result for a query that found nothing.
    pub fn invalid(position: Point3) -> Self {
        Self {
            position,
            is_valid: false,
            connected_part_id: None,
            connection_type: None,
        }
    }
}

/// World-space connector of an existing part.
struct Anchor<'a> {
    part_id: &'a str,
    position: Point3,
}

/// Find the best connecting placement for `def` near `rough`.
///
/// Candidates that would overlap an existing part are passed over, so the
/// nearest free connecting placement wins. Existing parts with unknown
/// definitions are skipped. When nothing is within `snap_distance` the
/// result is invalid and carries `rough` unchanged; see
/// [`resolve_placement`] for the grid fallback.
#[allow(clippy::too_many_arguments)]
pub fn find_snap_position<'a>(
    def: &PartDefinition,
    rough: &Point3,
    existing: impl IntoIterator<Item = &'a PlacedPart>,
    snap_distance: f64,
    yaw: f64,
    catalog: &Catalog,
    tol: &Tolerances,
) -> SnapResult {
    let existing: Vec<&PlacedPart> = existing.into_iter().collect();
    let mut studs = Vec::new();
    let mut anti_studs = Vec::new();
    for part in existing.iter().copied() {
        let Some(other) = catalog.get(&part.definition_id) else {
            tracing::warn!(
                part = %part.id,
                definition = %part.definition_id,
                "skipping part with unknown definition during snap"
            );
            continue;
        };
        let part_id = part.id.as_str();
        let anchor = move |(_, position): (usize, Point3)| Anchor { part_id, position };
        studs.extend(
            world_points(other, &part.position, part.yaw(), ConnectionKind::Stud)
                .into_iter()
                .map(anchor),
        );
        anti_studs.extend(
            world_points(other, &part.position, part.yaw(), ConnectionKind::AntiStud)
                .into_iter()
                .map(anchor),
        );
    }

    let local = |kind: ConnectionKind| -> Vec<Vec3> {
        def.points_of(kind)
            .map(|p| rotate_yaw(&p.position.coords, yaw))
            .collect()
    };
    let new_anti = local(ConnectionKind::AntiStud);
    let new_studs = local(ConnectionKind::Stud);

    let mut best = SnapResult::invalid(*rough);
    let mut best_distance = f64::INFINITY;

    let passes = [
        (&studs, &new_anti, ConnectionKind::AntiStud),
        (&anti_studs, &new_studs, ConnectionKind::Stud),
    ];
    for (targets, offsets, kind) in passes {
        for target in targets.iter() {
            for offset in offsets {
                let candidate = target.position - *offset;
                if (candidate.y - rough.y).abs() > tol.vertical_gate {
                    continue;
                }
                let distance = horizontal_distance(&candidate, rough);
                if distance > snap_distance || distance >= best_distance {
                    continue;
                }
                if !seats(&candidate, offsets, targets, tol.alignment) {
                    continue;
                }
                let probe = PlacedPart::new("", def.id.as_str(), candidate).with_yaw(yaw);
                if check_collision(&probe, existing.iter().copied(), None, catalog, tol) {
                    continue;
                }
                best_distance = distance;
                best = SnapResult {
                    position: candidate,
                    is_valid: true,
                    connected_part_id: Some(target.part_id.to_string()),
                    connection_type: Some(kind),
                };
            }
        }
    }

    if best.is_valid {
        tracing::debug!(
            part = %def.id,
            target = best.connected_part_id.as_deref().unwrap_or_default(),
            distance = best_distance,
            "snapped placement"
        );
    }
    best
}

/// True when at least one of the new part's connectors, placed at
/// `candidate`, sits on some target connector.
fn seats(candidate: &Point3, offsets: &[Vec3], targets: &[Anchor<'_>], tolerance: f64) -> bool {
    offsets.iter().any(|offset| {
        let world = *candidate + *offset;
        targets
            .iter()
            .any(|t| within_per_axis(&world, &t.position, tolerance))
    })
}

/// Snap if possible, otherwise align `rough` to the grid.
///
/// The returned result is invalid in the fallback case but its position is
/// grid-aligned.
#[allow(clippy::too_many_arguments)]
pub fn resolve_placement<'a>(
    def: &PartDefinition,
    rough: &Point3,
    existing: impl IntoIterator<Item = &'a PlacedPart>,
    snap_distance: f64,
    yaw: f64,
    catalog: &Catalog,
    tol: &Tolerances,
) -> SnapResult {
    let snapped = find_snap_position(def, rough, existing, snap_distance, yaw, catalog, tol);
    if snapped.is_valid {
        return snapped;
    }
    SnapResult::invalid(snap_to_grid(rough, def.width, def.depth, yaw, tol))
}
