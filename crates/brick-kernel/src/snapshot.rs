//! Conversions between placed parts and persisted part records.

use brick_ir::PartRecord;
use brick_math::{Point3, Vec3};
use brick_placement::PlacedPart;

fn to_ir(v: &Vec3) -> brick_ir::Vec3 {
    brick_ir::Vec3::new(v.x, v.y, v.z)
}

fn from_ir(v: &brick_ir::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Persisted form of a part. Runtime flags and connections are dropped.
pub(crate) fn record_from_part(part: &PlacedPart) -> PartRecord {
    PartRecord {
        id: part.id.clone(),
        definition_id: part.definition_id.clone(),
        position: to_ir(&part.position.coords),
        rotation: to_ir(&part.rotation),
        color: part.color,
        step: part.step,
        group: part.group.clone(),
    }
}

/// Runtime part from a record, with every flag cleared.
pub(crate) fn part_from_record(record: PartRecord) -> PlacedPart {
    let mut part = PlacedPart::new(
        record.id,
        record.definition_id,
        Point3::from(from_ir(&record.position)),
    )
    .with_rotation(from_ir(&record.rotation))
    .with_color(record.color);
    part.step = record.step;
    part.group = record.group;
    part
}
