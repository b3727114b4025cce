//! Per-definition geometry memoization.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use brick_catalog::{Catalog, PartDefinition};

use crate::shapes::build_geometry;
use crate::{MeshSettings, TriangleMesh};

/// Mesh cache keyed by definition id.
///
/// Definitions never change after registration, so entries are never
/// invalidated; [`GeometryCache::clear`] exists for hot-reload.
#[derive(Debug, Default)]
pub struct GeometryCache {
    settings: MeshSettings,
    meshes: RwLock<HashMap<String, Arc<TriangleMesh>>>,
}

impl GeometryCache {
    /// Create an empty cache that builds meshes with `settings`.
    pub fn new(settings: MeshSettings) -> Self {
        Self {
            settings,
            meshes: RwLock::new(HashMap::new()),
        }
    }

    /// Settings used for every mesh built by this cache.
    pub fn settings(&self) -> &MeshSettings {
        &self.settings
    }

    /// Mesh for `def`, building it on first request.
    pub fn get(&self, def: &PartDefinition) -> Arc<TriangleMesh> {
        if let Some(mesh) = self
            .meshes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&def.id)
        {
            return Arc::clone(mesh);
        }

        let mesh = Arc::new(build_geometry(def, &self.settings));
        tracing::debug!(
            part = %def.id,
            triangles = mesh.num_triangles(),
            "built part geometry"
        );
        let mut meshes = self.meshes.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(meshes.entry(def.id.clone()).or_insert(mesh))
    }

    /// Mesh for the definition registered under `id`, or `None` with a warning.
    pub fn get_by_id(&self, catalog: &Catalog, id: &str) -> Option<Arc<TriangleMesh>> {
        match catalog.get(id) {
            Some(def) => Some(self.get(def)),
            None => {
                tracing::warn!(part = %id, "no geometry for unknown part definition");
                None
            }
        }
    }

    /// True when a mesh for `id` is cached.
    pub fn contains(&self, id: &str) -> bool {
        self.meshes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Number of cached meshes.
    pub fn len(&self) -> usize {
        self.meshes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached mesh.
    pub fn clear(&self) {
        self.meshes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_returns_same_mesh() {
        let catalog = Catalog::standard();
        let cache = GeometryCache::default();
        let def = catalog.get("plate_1x2").unwrap();

        let first = cache.get(def);
        let second = cache.get(def);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("plate_1x2"));
    }

    #[test]
    fn test_cache_clear() {
        let catalog = Catalog::standard();
        let cache = GeometryCache::new(MeshSettings::default());
        let first = cache.get_by_id(&catalog, "brick_1x1").unwrap();
        cache.clear();
        assert!(cache.is_empty());
        let rebuilt = cache.get_by_id(&catalog, "brick_1x1").unwrap();
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert_eq!(*first, *rebuilt);
    }

    #[test]
    fn test_unknown_id_is_none() {
        let catalog = Catalog::standard();
        let cache = GeometryCache::default();
        assert!(cache.get_by_id(&catalog, "brick_9x9").is_none());
        assert!(cache.is_empty());
    }
}
