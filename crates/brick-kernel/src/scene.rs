//! The scene: placed parts plus their derived connection graph.

use std::collections::HashSet;
use std::sync::Arc;

use brick_catalog::{Catalog, Palette};
use brick_connect::{Connection, ConnectionGraph};
use brick_ir::SceneSnapshot;
use brick_ldraw::{LdrawExport, LdrawExporter};
use brick_math::{normalize_angle, Point3, QUARTER_TURN};
use brick_mesh::{GeometryCache, TriangleMesh};
use brick_placement::{find_colliding_parts, resolve_placement, Aabb3, PlacedPart};
use indexmap::IndexMap;

use crate::config::EngineConfig;
use crate::error::{Result, SceneError};
use crate::snapshot::{part_from_record, record_from_part};

/// Where a part would go if placed now.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPreview {
    /// Resolved position: snapped, or grid-aligned as a fallback.
    pub position: Point3,
    /// True when the position came from a stud connection.
    pub snapped: bool,
    /// Part the preview connects to.
    pub connected_part_id: Option<String>,
    /// Parts the preview overlaps; empty when the placement is allowed.
    pub colliding: Vec<String>,
}

impl PlacementPreview {
    /// True when the placement can be confirmed.
    pub fn is_placeable(&self) -> bool {
        self.colliding.is_empty()
    }
}

/// Summary numbers for a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStats {
    /// Number of placed parts.
    pub part_count: usize,
    /// Number of connections.
    pub connection_count: usize,
    /// Sum of part masses (g); unknown definitions count as zero.
    pub total_mass: f64,
    /// Union of part footprint boxes, `None` for an empty scene.
    pub bounds: Option<Aabb3>,
    /// Parts whose connected group never reaches the ground.
    pub floating: Vec<String>,
}

/// Placed parts and their connections.
///
/// Every structural change rebuilds the connection graph from scratch and
/// refreshes each part's `connections` list.
#[derive(Debug)]
pub struct Scene {
    catalog: Arc<Catalog>,
    config: EngineConfig,
    palette: Palette,
    name: String,
    parts: IndexMap<String, PlacedPart>,
    graph: ConnectionGraph,
    geometry: GeometryCache,
    next_id: u64,
}

impl Scene {
    /// Empty scene.
    pub fn new(catalog: Arc<Catalog>, config: EngineConfig) -> Self {
        let name = config.export.model_name.clone();
        let geometry = GeometryCache::new(config.mesh);
        Self {
            catalog,
            config,
            palette: Palette::standard(),
            name,
            parts: IndexMap::new(),
            graph: ConnectionGraph::new(),
            geometry,
            next_id: 0,
        }
    }

    /// Restore a scene from a snapshot. Runtime flags start cleared and
    /// connections are recomputed.
    pub fn from_snapshot(
        catalog: Arc<Catalog>,
        config: EngineConfig,
        snapshot: SceneSnapshot,
    ) -> Result<Self> {
        let mut scene = Self::new(catalog, config);
        scene.name = snapshot.name;
        for record in snapshot.parts {
            if scene.parts.contains_key(&record.id) {
                return Err(SceneError::DuplicatePart(record.id));
            }
            if !scene.catalog.contains(&record.definition_id) {
                tracing::warn!(
                    part = %record.id,
                    definition = %record.definition_id,
                    "snapshot part references an unknown definition"
                );
            }
            let part = part_from_record(record);
            scene.bump_next_id(&part.id);
            scene.parts.insert(part.id.clone(), part);
        }
        scene.rebuild();
        tracing::info!(
            name = %scene.name,
            parts = scene.parts.len(),
            connections = scene.graph.len(),
            "restored scene"
        );
        Ok(scene)
    }

    /// Persistable snapshot of the scene.
    pub fn to_snapshot(&self) -> SceneSnapshot {
        let mut snapshot = SceneSnapshot::new(self.name.clone());
        snapshot.parts = self.parts.values().map(record_from_part).collect();
        snapshot
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the model.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Shared part catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Colour palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Cached mesh for a definition id.
    pub fn geometry(&self, definition_id: &str) -> Option<Arc<TriangleMesh>> {
        self.geometry.get_by_id(&self.catalog, definition_id)
    }

    /// Resolve where `definition_id` would go for a pointer at `rough`.
    pub fn preview(&self, definition_id: &str, rough: &Point3, yaw: f64) -> Result<PlacementPreview> {
        let def = self.catalog.require(definition_id)?;
        let tol = &self.config.tolerances;
        let resolved = resolve_placement(
            def,
            rough,
            self.parts.values(),
            self.config.snap_distance,
            yaw,
            &self.catalog,
            tol,
        );

        let probe = PlacedPart::new("", definition_id, resolved.position).with_yaw(yaw);
        let colliding = find_colliding_parts(&probe, self.parts.values(), None, &self.catalog, tol);

        Ok(PlacementPreview {
            position: resolved.position,
            snapped: resolved.is_valid,
            connected_part_id: resolved.connected_part_id,
            colliding,
        })
    }

    /// Resolve and place a new part, returning its id.
    ///
    /// Fails with [`SceneError::Collision`] when the resolved position
    /// overlaps existing parts.
    pub fn place(&mut self, definition_id: &str, rough: &Point3, yaw: f64, color: u32) -> Result<String> {
        let preview = self.preview(definition_id, rough, yaw)?;
        let id = self.generate_id();
        if !preview.is_placeable() {
            return Err(SceneError::Collision {
                part: id,
                with: preview.colliding,
            });
        }

        let part = PlacedPart::new(id.clone(), definition_id, preview.position)
            .with_yaw(yaw)
            .with_color(color);
        self.parts.insert(id.clone(), part);
        self.bump_next_id(&id);
        self.rebuild();

        tracing::info!(
            part = %id,
            definition = %definition_id,
            snapped = preview.snapped,
            "placed part"
        );
        Ok(id)
    }

    /// Insert an already-positioned part after a definition and collision check.
    pub fn insert(&mut self, mut part: PlacedPart) -> Result<()> {
        self.catalog.require(&part.definition_id)?;
        if self.parts.contains_key(&part.id) {
            return Err(SceneError::DuplicatePart(part.id));
        }
        self.ensure_free(&part, None)?;

        part.connections.clear();
        self.bump_next_id(&part.id);
        self.parts.insert(part.id.clone(), part);
        self.rebuild();
        Ok(())
    }

    /// Remove a part and every connection to it.
    pub fn remove(&mut self, id: &str) -> Result<PlacedPart> {
        self.editable(id)?;
        let part = self
            .parts
            .shift_remove(id)
            .ok_or_else(|| SceneError::UnknownPart(id.to_string()))?;
        let dropped = self.graph.remove_connections_for_part(id);
        self.rebuild();
        tracing::info!(part = %id, connections = dropped.len(), "removed part");
        Ok(part)
    }

    /// Move a part to `position`.
    pub fn move_part(&mut self, id: &str, position: Point3) -> Result<()> {
        let mut moved = self.editable(id)?.clone();
        moved.position = position;
        self.ensure_free(&moved, Some(id))?;
        self.parts.insert(id.to_string(), moved);
        self.rebuild();
        Ok(())
    }

    /// Turn a part a quarter turn about its origin.
    pub fn rotate_part(&mut self, id: &str) -> Result<()> {
        let mut turned = self.editable(id)?.clone();
        turned.rotation.y = normalize_angle(turned.rotation.y + QUARTER_TURN);
        self.ensure_free(&turned, Some(id))?;
        self.parts.insert(id.to_string(), turned);
        self.rebuild();
        Ok(())
    }

    /// Recolour a part.
    pub fn set_color(&mut self, id: &str, color: u32) -> Result<()> {
        self.editable_mut(id)?.color = color;
        Ok(())
    }

    /// Assign a build step.
    pub fn set_step(&mut self, id: &str, step: Option<u32>) -> Result<()> {
        self.editable_mut(id)?.step = step;
        Ok(())
    }

    /// Assign a group.
    pub fn set_group(&mut self, id: &str, group: Option<String>) -> Result<()> {
        self.editable_mut(id)?.group = group;
        Ok(())
    }

    /// Lock or unlock a part. Allowed on locked parts.
    pub fn set_locked(&mut self, id: &str, locked: bool) -> Result<()> {
        self.part_mut(id)?.locked = locked;
        Ok(())
    }

    /// Select a part; without `additive` the previous selection is cleared.
    pub fn select(&mut self, id: &str, additive: bool) -> Result<()> {
        if !self.parts.contains_key(id) {
            return Err(SceneError::UnknownPart(id.to_string()));
        }
        if !additive {
            self.clear_selection();
        }
        self.part_mut(id)?.selected = true;
        Ok(())
    }

    /// Deselect every part.
    pub fn clear_selection(&mut self) {
        for part in self.parts.values_mut() {
            part.selected = false;
        }
    }

    /// Ids of selected parts, in scene order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.parts
            .values()
            .filter(|p| p.selected)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Part by id.
    pub fn part(&self, id: &str) -> Option<&PlacedPart> {
        self.parts.get(id)
    }

    /// All parts in scene order.
    pub fn parts(&self) -> impl Iterator<Item = &PlacedPart> {
        self.parts.values()
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// True when the scene has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// All connections.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph.connections()
    }

    /// The connection graph.
    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }

    /// True when `id`'s connected group touches the ground.
    pub fn is_grounded(&self, id: &str) -> bool {
        self.graph.is_grounded(id, self.parts.values())
    }

    /// Parts connected to `id`, directly or not, including `id`.
    pub fn connected_group(&self, id: &str) -> HashSet<String> {
        self.graph.find_connected_group(id)
    }

    /// Parts that are not grounded, in scene order.
    pub fn floating_parts(&self) -> Vec<String> {
        self.parts
            .keys()
            .filter(|id| !self.is_grounded(id))
            .cloned()
            .collect()
    }

    /// Summary numbers.
    pub fn stats(&self) -> SceneStats {
        let mut bounds = Aabb3::empty();
        let mut total_mass = 0.0;
        for part in self.parts.values() {
            if let Some(def) = self.catalog.get(&part.definition_id) {
                total_mass += def.mass;
                bounds.include(&Aabb3::for_part(
                    def,
                    &part.position,
                    part.yaw(),
                    &self.config.tolerances,
                ));
            }
        }
        SceneStats {
            part_count: self.parts.len(),
            connection_count: self.graph.len(),
            total_mass,
            bounds: (!bounds.is_empty()).then_some(bounds),
            floating: self.floating_parts(),
        }
    }

    /// LDraw export in scene order.
    pub fn export_ldraw(&self) -> LdrawExport {
        self.exporter().export_report(self.parts.values(), &self.name)
    }

    /// LDraw export grouped by build step.
    pub fn export_ldraw_with_steps(&self) -> LdrawExport {
        self.exporter()
            .export_with_steps_report(self.parts.values(), &self.name)
    }

    fn exporter(&self) -> LdrawExporter<'_> {
        LdrawExporter::new(&self.catalog)
            .with_palette(self.palette.clone())
            .with_author(self.config.export.author.clone())
    }

    fn rebuild(&mut self) {
        self.graph.rebuild(
            self.parts.values(),
            self.config.tolerances.connection,
            &self.catalog,
        );
        for part in self.parts.values_mut() {
            part.connections = self.graph.connected_part_ids(&part.id);
        }
    }

    fn ensure_free(&self, part: &PlacedPart, exclude: Option<&str>) -> Result<()> {
        let with = find_colliding_parts(
            part,
            self.parts.values(),
            exclude,
            &self.catalog,
            &self.config.tolerances,
        );
        if with.is_empty() {
            Ok(())
        } else {
            Err(SceneError::Collision {
                part: part.id.clone(),
                with,
            })
        }
    }

    fn part_mut(&mut self, id: &str) -> Result<&mut PlacedPart> {
        self.parts
            .get_mut(id)
            .ok_or_else(|| SceneError::UnknownPart(id.to_string()))
    }

    fn editable(&self, id: &str) -> Result<&PlacedPart> {
        let part = self
            .parts
            .get(id)
            .ok_or_else(|| SceneError::UnknownPart(id.to_string()))?;
        if part.locked {
            return Err(SceneError::Locked(id.to_string()));
        }
        Ok(part)
    }

    fn editable_mut(&mut self, id: &str) -> Result<&mut PlacedPart> {
        let part = self.part_mut(id)?;
        if part.locked {
            return Err(SceneError::Locked(id.to_string()));
        }
        Ok(part)
    }

    fn generate_id(&self) -> String {
        let mut n = self.next_id + 1;
        while self.parts.contains_key(&format!("part-{n}")) {
            n += 1;
        }
        format!("part-{n}")
    }

    /// Keep generated ids ahead of any `part-<n>` id seen.
    fn bump_next_id(&mut self, id: &str) {
        if let Some(n) = id.strip_prefix("part-").and_then(|n| n.parse::<u64>().ok()) {
            self.next_id = self.next_id.max(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scene() -> Scene {
        Scene::new(Arc::new(Catalog::standard()), EngineConfig::default())
    }

    #[test]
    fn test_first_part_falls_back_to_grid() {
        let mut scene = scene();
        let preview = scene.preview("brick_2x4", &Point3::new(3.3, 0.2, -1.2), 0.0).unwrap();
        assert!(!preview.snapped);
        assert!(preview.is_placeable());
        assert_eq!(preview.position, Point3::new(4.0, 0.0, -4.0));

        let id = scene.place("brick_2x4", &Point3::new(3.3, 0.2, -1.2), 0.0, 2).unwrap();
        assert_eq!(id, "part-1");
        assert_eq!(scene.part(&id).unwrap().color, 2);
    }

    #[test]
    fn test_stacking_connects_parts() {
        let mut scene = scene();
        let base = scene.place("brick_2x4", &Point3::origin(), 0.0, 0).unwrap();
        let top = scene.place("brick_2x2", &Point3::new(-7.0, 9.8, 0.5), 0.0, 0).unwrap();

        let top_part = scene.part(&top).unwrap();
        assert_relative_eq!(top_part.position.y, 9.6, epsilon = 1e-9);
        assert_eq!(top_part.connections, vec![base.clone()]);
        assert_eq!(scene.part(&base).unwrap().connections, vec![top.clone()]);
        assert!(scene.is_grounded(&top));
    }

    #[test]
    fn test_colliding_placement_is_rejected() {
        let mut scene = scene();
        scene.place("brick_2x4", &Point3::origin(), 0.0, 0).unwrap();
        let err = scene.place("brick_2x2", &Point3::new(4.0, 0.0, 4.0), 0.0, 0).unwrap_err();
        assert!(matches!(err, SceneError::Collision { ref with, .. } if with == &["part-1"]));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_locked_parts_resist_edits() {
        let mut scene = scene();
        let id = scene.place("brick_1x1", &Point3::origin(), 0.0, 0).unwrap();
        scene.set_locked(&id, true).unwrap();
        assert!(matches!(scene.set_color(&id, 3), Err(SceneError::Locked(_))));
        assert!(matches!(scene.remove(&id), Err(SceneError::Locked(_))));
        assert!(matches!(scene.rotate_part(&id), Err(SceneError::Locked(_))));
        scene.set_locked(&id, false).unwrap();
        scene.set_color(&id, 3).unwrap();
        assert_eq!(scene.part(&id).unwrap().color, 3);
    }

    #[test]
    fn test_move_and_rotate() {
        let mut scene = scene();
        let a = scene.place("brick_1x4", &Point3::origin(), 0.0, 0).unwrap();
        let b = scene.place("brick_1x1", &Point3::new(0.0, 0.0, 16.0), 0.0, 0).unwrap();

        // a quarter turn would swing the 1x4 into b
        assert!(matches!(scene.rotate_part(&a), Err(SceneError::Collision { .. })));
        scene.move_part(&b, Point3::new(40.0, 0.0, 0.0)).unwrap();
        scene.rotate_part(&a).unwrap();
        assert_relative_eq!(scene.part(&a).unwrap().yaw(), QUARTER_TURN);
        assert!(matches!(
            scene.move_part("part-99", Point3::origin()),
            Err(SceneError::UnknownPart(_))
        ));
    }

    #[test]
    fn test_selection() {
        let mut scene = scene();
        let a = scene.place("plate_1x1", &Point3::origin(), 0.0, 0).unwrap();
        let b = scene.place("plate_1x1", &Point3::new(16.0, 0.0, 0.0), 0.0, 0).unwrap();
        scene.select(&a, false).unwrap();
        scene.select(&b, true).unwrap();
        assert_eq!(scene.selected_ids(), vec![a.clone(), b.clone()]);
        scene.select(&b, false).unwrap();
        assert_eq!(scene.selected_ids(), vec![b]);
        scene.clear_selection();
        assert!(scene.selected_ids().is_empty());
    }

    #[test]
    fn test_insert_checks_definition_and_id() {
        let mut scene = scene();
        let part = PlacedPart::new("wall-1", "brick_1x2", Point3::origin());
        scene.insert(part.clone()).unwrap();
        assert!(matches!(scene.insert(part), Err(SceneError::DuplicatePart(_))));
        let unknown = PlacedPart::new("x", "brick_9x9", Point3::new(80.0, 0.0, 0.0));
        assert!(matches!(scene.insert(unknown), Err(SceneError::Catalog(_))));
        assert!(matches!(
            scene.preview("brick_9x9", &Point3::origin(), 0.0),
            Err(SceneError::Catalog(_))
        ));
    }

    #[test]
    fn test_generated_ids_skip_inserted_ones() {
        let mut scene = scene();
        scene
            .insert(PlacedPart::new("part-5", "brick_1x1", Point3::origin()))
            .unwrap();
        let id = scene.place("brick_1x1", &Point3::new(24.0, 0.0, 0.0), 0.0, 0).unwrap();
        assert_eq!(id, "part-6");
    }

    #[test]
    fn test_removing_the_base_leaves_the_top_floating() {
        let mut scene = scene();
        let a = scene.place("brick_2x4", &Point3::origin(), 0.0, 0).unwrap();
        let b = scene.place("brick_2x4", &Point3::new(-4.0, 9.6, -4.0), 0.0, 0).unwrap();
        assert_eq!(scene.graph().len(), 1);
        assert!(scene.is_grounded(&b));
        assert_eq!(scene.connected_group(&b).len(), 2);

        scene.remove(&a).unwrap();
        assert!(scene.graph().is_empty());
        assert!(scene.part(&b).unwrap().connections.is_empty());
        assert!(!scene.is_grounded(&b));
        assert_eq!(scene.floating_parts(), vec![b]);
        assert!(matches!(scene.remove(&a), Err(SceneError::UnknownPart(_))));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut scene = scene();
        scene.set_name("tower");
        let a = scene.place("brick_2x4", &Point3::origin(), 0.0, 4).unwrap();
        let b = scene.place("plate_2x2", &Point3::new(-4.0, 9.6, -4.0), 0.0, 1).unwrap();
        scene.set_step(&b, Some(1)).unwrap();
        scene.set_group(&b, Some("roof".into())).unwrap();
        scene.select(&a, false).unwrap();

        let json = scene.to_snapshot().to_json().unwrap();
        let restored = Scene::from_snapshot(
            Arc::new(Catalog::standard()),
            EngineConfig::default(),
            SceneSnapshot::from_json(&json).unwrap(),
        )
        .unwrap();

        assert_eq!(restored.name(), "tower");
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.graph().len(), 1);
        assert!(restored.selected_ids().is_empty());
        let part = restored.part(&b).unwrap();
        assert_eq!(part.step, Some(1));
        assert_eq!(part.group.as_deref(), Some("roof"));
        assert_eq!(part.connections, vec![a]);
    }

    #[test]
    fn test_snapshot_keeps_unknown_definitions() {
        let mut snapshot = scene().to_snapshot();
        snapshot.parts.push(brick_ir::PartRecord {
            id: "part-7".into(),
            definition_id: "minifig_torso".into(),
            position: brick_ir::Vec3::default(),
            rotation: brick_ir::Vec3::default(),
            color: 0,
            step: None,
            group: None,
        });
        let mut scene =
            Scene::from_snapshot(Arc::new(Catalog::standard()), EngineConfig::default(), snapshot).unwrap();
        assert_eq!(scene.len(), 1);

        let id = scene.place("brick_1x1", &Point3::new(40.0, 0.0, 0.0), 0.0, 0).unwrap();
        assert_eq!(id, "part-8");
        let export = scene.export_ldraw();
        assert_eq!(export.skipped, vec!["part-7".to_string()]);
    }

    #[test]
    fn test_export_uses_scene_name_and_author() {
        let config = EngineConfig {
            export: crate::config::ExportSettings {
                author: "Ada".into(),
                model_name: "castle".into(),
            },
            ..EngineConfig::default()
        };
        let mut scene = Scene::new(Arc::new(Catalog::standard()), config);
        let id = scene.place("brick_2x4", &Point3::new(4.0, 0.0, 4.0), 0.0, 0).unwrap();
        scene.set_step(&id, Some(2)).unwrap();

        let text = scene.export_ldraw().text;
        assert!(text.contains("castle"));
        assert!(text.contains("Ada"));
        assert!(text.contains("1 4 10 0 10 1 0 0 0 1 0 0 0 1 3001.dat"));
        assert_eq!(scene.export_ldraw_with_steps().text, text);
    }

    #[test]
    fn test_geometry_is_cached() {
        let scene = scene();
        let first = scene.geometry("brick_2x2").unwrap();
        let second = scene.geometry("brick_2x2").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(scene.geometry("brick_9x9").is_none());
    }

    #[test]
    fn test_stats() {
        let mut scene = scene();
        assert!(scene.stats().bounds.is_none());
        scene.place("brick_2x4", &Point3::origin(), 0.0, 0).unwrap();
        scene.place("brick_2x4", &Point3::new(0.0, 9.6, 0.0), 0.0, 0).unwrap();
        let floating = scene
            .place("brick_1x1", &Point3::new(80.0, 38.4, 0.0), 0.0, 0)
            .unwrap();

        let stats = scene.stats();
        assert_eq!(stats.part_count, 3);
        assert_eq!(stats.connection_count, 1);
        assert_relative_eq!(stats.total_mass, 2.4 + 2.4 + 0.3, epsilon = 1e-9);
        assert_eq!(stats.floating, vec![floating]);
        let bounds = stats.bounds.unwrap();
        assert_relative_eq!(bounds.max.y, 38.4 + 9.6, epsilon = 1e-9);
    }
}
