//! Connection records and the graph that owns them.

use std::collections::{HashMap, HashSet, VecDeque};
use std::f64::consts::PI;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use brick_catalog::{Catalog, ConnectionKind, PartDefinition};
use brick_math::{rotate_yaw, within_per_axis, Vec3};
use brick_placement::{world_points, PlacedPart};
use indexmap::IndexMap;

/// Physical kind of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionType {
    /// Stud seated in an anti-stud.
    StudAntistud,
    /// Axle through an axle hole.
    AxleHole,
    /// Pin through a pin hole.
    PinHole,
    /// Technic beam to beam.
    TechnicBeam,
    /// Clip on a bar.
    ClipBar,
}

impl ConnectionType {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::StudAntistud => "stud_antistud",
            ConnectionType::AxleHole => "axle_hole",
            ConnectionType::PinHole => "pin_hole",
            ConnectionType::TechnicBeam => "technic_beam",
            ConnectionType::ClipBar => "clip_bar",
        }
    }

    /// Pins rotate in their holes; everything else is rigid.
    pub fn is_rigid(&self) -> bool {
        !matches!(self, ConnectionType::PinHole | ConnectionType::ClipBar)
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mating connector kinds: (male, female, resulting connection).
const MATES: [(ConnectionKind, ConnectionKind, ConnectionType); 3] = [
    (ConnectionKind::Stud, ConnectionKind::AntiStud, ConnectionType::StudAntistud),
    (ConnectionKind::Axle, ConnectionKind::AxleHole, ConnectionType::AxleHole),
    (ConnectionKind::Pin, ConnectionKind::PinHole, ConnectionType::PinHole),
];

/// Rotation axis and limits of a non-rigid joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    /// World-space rotation axis.
    pub axis: Vec3,
    /// Lower limit in radians.
    pub min_angle: f64,
    /// Upper limit in radians.
    pub max_angle: f64,
}

/// A potential connection found by [`ConnectionGraph::find_connections`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionCandidate {
    /// Connection kind.
    pub kind: ConnectionType,
    /// First part id.
    pub part_a: String,
    /// Second part id.
    pub part_b: String,
    /// Connection-point index on `part_a`'s definition.
    pub point_a: usize,
    /// Connection-point index on `part_b`'s definition.
    pub point_b: usize,
    /// Joint for non-rigid kinds.
    pub joint: Option<Joint>,
}

/// A stored connection between two parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Unique id.
    pub id: String,
    /// Connection kind.
    pub kind: ConnectionType,
    /// First part id.
    pub part_a: String,
    /// Second part id.
    pub part_b: String,
    /// Connection-point index on `part_a`'s definition.
    pub point_a: usize,
    /// Connection-point index on `part_b`'s definition.
    pub point_b: usize,
    /// Whether the joint is fixed.
    pub rigid: bool,
    /// Rotation axis and limits for non-rigid joints.
    pub joint: Option<Joint>,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl Connection {
    /// The partner of `id` in this connection, if `id` is an endpoint.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.part_a == id {
            Some(self.part_b.as_str())
        } else if self.part_b == id {
            Some(self.part_a.as_str())
        } else {
            None
        }
    }

    /// Canonical key of the part pair.
    pub fn key(&self) -> String {
        pair_key(&self.part_a, &self.part_b)
    }
}

/// Canonical key of an unordered part pair: sorted ids joined with `:`.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}:{b}")
    } else {
        format!("{b}:{a}")
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// All connections of a scene, at most one per unordered part pair.
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    connections: IndexMap<String, Connection>,
    next_id: u64,
}

impl ConnectionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidates between `new_part` and each existing part.
    ///
    /// A candidate exists wherever a male connector of one part and the
    /// mating female connector of the other coincide within `tolerance` on
    /// every axis. Positions are yaw-rotated world positions. At most one
    /// candidate is reported per partner (the first matching point pair).
    pub fn find_connections<'a>(
        new_part: &PlacedPart,
        existing: impl IntoIterator<Item = &'a PlacedPart>,
        tolerance: f64,
        catalog: &Catalog,
    ) -> Vec<ConnectionCandidate> {
        let Some(new_def) = catalog.get(&new_part.definition_id) else {
            tracing::warn!(
                part = %new_part.id,
                definition = %new_part.definition_id,
                "no connections for part with unknown definition"
            );
            return Vec::new();
        };

        let mut candidates = Vec::new();
        for other in existing {
            if other.id == new_part.id {
                continue;
            }
            let Some(other_def) = catalog.get(&other.definition_id) else {
                continue;
            };

            let found = MATES.iter().find_map(|&(male, female, kind)| {
                let points = |def: &PartDefinition, part: &PlacedPart, k: ConnectionKind| {
                    world_points(def, &part.position, part.yaw(), k)
                };
                // new part as male, then as female
                let orders = [
                    (points(new_def, new_part, male), points(other_def, other, female), false),
                    (points(new_def, new_part, female), points(other_def, other, male), true),
                ];
                orders.into_iter().find_map(|(mine, theirs, new_is_female)| {
                    mine.iter().find_map(|&(ia, pa)| {
                        theirs
                            .iter()
                            .find(|(_, pb)| within_per_axis(&pa, pb, tolerance))
                            .map(|&(ib, _)| {
                                let joint = (!kind.is_rigid()).then(|| {
                                    let (def, part, index) = if new_is_female {
                                        (new_def, new_part, ia)
                                    } else {
                                        (other_def, other, ib)
                                    };
                                    Joint {
                                        axis: rotate_yaw(&def.connection_points[index].normal, part.yaw()),
                                        min_angle: -PI,
                                        max_angle: PI,
                                    }
                                });
                                ConnectionCandidate {
                                    kind,
                                    part_a: new_part.id.clone(),
                                    part_b: other.id.clone(),
                                    point_a: ia,
                                    point_b: ib,
                                    joint,
                                }
                            })
                    })
                })
            });
            candidates.extend(found);
        }
        candidates
    }

    /// Store candidates, skipping pairs that are already connected (also
    /// within this batch). Returns the connections actually created.
    pub fn create_connections(&mut self, candidates: impl IntoIterator<Item = ConnectionCandidate>) -> Vec<Connection> {
        let mut created = Vec::new();
        for c in candidates {
            let key = pair_key(&c.part_a, &c.part_b);
            if c.part_a == c.part_b || self.connections.contains_key(&key) {
                continue;
            }
            self.next_id += 1;
            let connection = Connection {
                id: format!("conn-{}", self.next_id),
                kind: c.kind,
                part_a: c.part_a,
                part_b: c.part_b,
                point_a: c.point_a,
                point_b: c.point_b,
                rigid: c.kind.is_rigid(),
                joint: c.joint,
                created_at: now_millis(),
            };
            self.connections.insert(key, connection.clone());
            created.push(connection);
        }
        created
    }

    /// Remove every connection touching `part_id`, returning them.
    pub fn remove_connections_for_part(&mut self, part_id: &str) -> Vec<Connection> {
        let mut removed = Vec::new();
        self.connections.retain(|_, c| {
            if c.other(part_id).is_some() {
                removed.push(c.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Ids directly connected to `part_id`, in connection order.
    pub fn connected_part_ids(&self, part_id: &str) -> Vec<String> {
        self.connections
            .values()
            .filter_map(|c| c.other(part_id))
            .map(str::to_string)
            .collect()
    }

    /// Every part reachable from `start` (breadth-first), including `start`.
    pub fn find_connected_group(&self, start: &str) -> HashSet<String> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for c in self.connections.values() {
            adjacency.entry(c.part_a.as_str()).or_default().push(c.part_b.as_str());
            adjacency.entry(c.part_b.as_str()).or_default().push(c.part_a.as_str());
        }

        let mut group = HashSet::from([start.to_string()]);
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            for &next in adjacency.get(id).into_iter().flatten() {
                if group.insert(next.to_string()) {
                    queue.push_back(next);
                }
            }
        }
        group
    }

    /// True when the component of `part_id` contains a part resting at or
    /// below `y = 0`.
    pub fn is_grounded<'a>(&self, part_id: &str, parts: impl IntoIterator<Item = &'a PlacedPart>) -> bool {
        let group = self.find_connected_group(part_id);
        parts
            .into_iter()
            .any(|p| group.contains(&p.id) && p.position.y <= 0.0)
    }

    /// Recompute every connection from the given parts.
    pub fn rebuild<'a>(
        &mut self,
        parts: impl IntoIterator<Item = &'a PlacedPart>,
        tolerance: f64,
        catalog: &Catalog,
    ) {
        self.clear();
        let parts: Vec<&PlacedPart> = parts.into_iter().collect();
        for (i, part) in parts.iter().enumerate() {
            let candidates = Self::find_connections(part, parts[..i].iter().copied(), tolerance, catalog);
            self.create_connections(candidates);
        }
        tracing::debug!(
            parts = parts.len(),
            connections = self.connections.len(),
            "rebuilt connection graph"
        );
    }

    /// Connection between two parts, in either order.
    pub fn get(&self, a: &str, b: &str) -> Option<&Connection> {
        self.connections.get(&pair_key(a, b))
    }

    /// All connections in creation order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Number of connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// True when there are no connections.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Drop every connection and restart id numbering.
    pub fn clear(&mut self) {
        self.connections.clear();
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brick_catalog::{Category, ConnectionPoint, Shape};
    use brick_math::Point3;
    use std::f64::consts::FRAC_PI_2;

    const TOL: f64 = 0.5;

    fn placed(id: &str, def: &str, x: f64, y: f64, z: f64) -> PlacedPart {
        PlacedPart::new(id, def, Point3::new(x, y, z))
    }

    #[test]
    fn test_pair_key_is_canonical() {
        assert_eq!(pair_key("part-2", "part-1"), "part-1:part-2");
        assert_eq!(pair_key("part-1", "part-2"), "part-1:part-2");
    }

    #[test]
    fn test_stacked_bricks_connect() {
        let catalog = Catalog::standard();
        let base = placed("a", "brick_2x4", 0.0, 0.0, 0.0);
        let top = placed("b", "brick_2x2", -8.0, 9.6, 0.0);

        let found = ConnectionGraph::find_connections(&top, [&base], TOL, &catalog);
        assert_eq!(found.len(), 1);
        let c = &found[0];
        assert_eq!(c.kind, ConnectionType::StudAntistud);
        assert_eq!((c.part_a.as_str(), c.part_b.as_str()), ("b", "a"));
        let top_def = catalog.get("brick_2x2").unwrap();
        let base_def = catalog.get("brick_2x4").unwrap();
        assert_eq!(top_def.connection_points[c.point_a].kind, ConnectionKind::AntiStud);
        assert_eq!(base_def.connection_points[c.point_b].kind, ConnectionKind::Stud);
        assert!(c.joint.is_none());
    }

    #[test]
    fn test_side_by_side_do_not_connect() {
        let catalog = Catalog::standard();
        let a = placed("a", "brick_2x2", 0.0, 0.0, 0.0);
        let b = placed("b", "brick_2x2", 16.0, 0.0, 0.0);
        assert!(ConnectionGraph::find_connections(&b, [&a], TOL, &catalog).is_empty());
    }

    #[test]
    fn test_rotated_parts_connect_in_world_space() {
        let catalog = Catalog::standard();
        // a 1x4 turned a quarter runs along Z; its studs sit at x = 0
        let base = placed("a", "brick_1x4", 0.0, 0.0, 0.0).with_yaw(FRAC_PI_2);
        let on_top = placed("b", "brick_1x1", 0.0, 9.6, 12.0);
        let off_axis = placed("c", "brick_1x1", 12.0, 9.6, 0.0);

        assert_eq!(ConnectionGraph::find_connections(&on_top, [&base], TOL, &catalog).len(), 1);
        assert!(ConnectionGraph::find_connections(&off_axis, [&base], TOL, &catalog).is_empty());
    }

    #[test]
    fn test_create_connections_dedups() {
        let catalog = Catalog::standard();
        let base = placed("a", "brick_2x4", 0.0, 0.0, 0.0);
        let top = placed("b", "brick_2x4", 0.0, 9.6, 0.0);
        let candidates = ConnectionGraph::find_connections(&top, [&base], TOL, &catalog);

        let mut graph = ConnectionGraph::new();
        assert_eq!(graph.create_connections(candidates.clone()).len(), 1);
        assert!(graph.create_connections(candidates.clone()).is_empty());

        let mut reversed = candidates[0].clone();
        std::mem::swap(&mut reversed.part_a, &mut reversed.part_b);
        assert!(graph.create_connections([reversed]).is_empty());
        assert_eq!(graph.len(), 1);
        assert!(graph.get("a", "b").is_some());
        assert!(graph.get("b", "a").is_some());
    }

    #[test]
    fn test_batch_duplicates_are_skipped() {
        let candidate = ConnectionCandidate {
            kind: ConnectionType::StudAntistud,
            part_a: "x".into(),
            part_b: "y".into(),
            point_a: 0,
            point_b: 1,
            joint: None,
        };
        let mut graph = ConnectionGraph::new();
        let created = graph.create_connections([candidate.clone(), candidate]);
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].id, "conn-1");
        assert!(created[0].rigid);
    }

    #[test]
    fn test_groups_and_groundedness() {
        let catalog = Catalog::standard();
        let a = placed("a", "brick_2x4", 0.0, 0.0, 0.0);
        let b = placed("b", "brick_2x4", 0.0, 9.6, 0.0);
        let c = placed("c", "plate_1x1", 12.0, 19.2, 4.0);
        let loose = placed("d", "brick_1x1", 0.0, 40.0, 0.0);
        let parts = vec![a, b, c, loose];

        let mut graph = ConnectionGraph::new();
        graph.rebuild(&parts, TOL, &catalog);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.connected_part_ids("b").len(), 2);

        let group = graph.find_connected_group("c");
        assert_eq!(group, HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()]));
        assert!(graph.is_grounded("c", &parts));
        assert!(!graph.is_grounded("d", &parts));

        let removed = graph.remove_connections_for_part("a");
        assert_eq!(removed.len(), 1);
        let remaining: Vec<_> = parts.iter().filter(|p| p.id != "a").collect();
        assert!(!graph.is_grounded("b", remaining.iter().copied()));
        assert!(!graph.is_grounded("c", remaining.iter().copied()));
    }

    #[test]
    fn test_rebuild_recomputes_from_scratch() {
        let catalog = Catalog::standard();
        let mut parts = vec![
            placed("a", "brick_2x2", 0.0, 0.0, 0.0),
            placed("b", "brick_2x2", 0.0, 9.6, 0.0),
        ];
        let mut graph = ConnectionGraph::new();
        graph.rebuild(&parts, TOL, &catalog);
        assert_eq!(graph.len(), 1);

        parts[1].position.x = 40.0;
        graph.rebuild(&parts, TOL, &catalog);
        assert!(graph.is_empty());
        assert_eq!(graph.find_connected_group("a").len(), 1);
    }

    #[test]
    fn test_pin_connection_is_a_joint() {
        let mut catalog = Catalog::standard();
        let pin = PartDefinition::new("pin", "2780", "Technic Pin", Category::Technic, Shape::Box, 1, 1, 1)
            .with_points([ConnectionPoint {
                kind: ConnectionKind::Pin,
                position: Point3::new(0.0, 0.0, 0.0),
                normal: Vec3::new(0.0, 0.0, -1.0),
                size: Some(4.8),
            }]);
        catalog.register(pin);

        let beam = placed("beam", "technic_brick_1x4", 0.0, 0.0, 0.0);
        // first hole at x = -8, y = 5.8, z = 0
        let pin = placed("p", "pin", -8.0, 5.8, 0.0);

        let found = ConnectionGraph::find_connections(&pin, [&beam], TOL, &catalog);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ConnectionType::PinHole);
        let joint = found[0].joint.unwrap();
        assert!((joint.axis.z.abs() - 1.0).abs() < 1e-9);

        let mut graph = ConnectionGraph::new();
        let created = graph.create_connections(found);
        assert!(!created[0].rigid);
    }
}
