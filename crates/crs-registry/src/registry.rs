//! The coordinate system registry.
//!
//! A [`Registry`] owns every coordinate system it hands out. Catalog systems
//! are published once, on first use; systems supplied by callers are matched
//! against them by [`Registry::resolve`] and registered under a fresh id when
//! nothing matches.
//!
//! All tables live behind one `RwLock`. Lookups take the read side; loading,
//! resolution and alias registration take the write side for their whole
//! duration, so a reader never observes a half-published system and the id
//! counter never races.

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crs_common::{
    Area, CompoundCrs, CoordinateOperation, CoordinateSystem, CoordinateSystemKind, CrsHeader,
    Datum, ProjectedCrs, UnitOfMeasure,
};
use epsg_catalog::{DirectorySource, EpsgCatalog, EsriCatalog, ResourceSource};
use projection::CoordinatesOperation;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Non-standard codes in common use and the catalog systems they denote.
pub const DEFAULT_ALIASES: &[(i32, i32)] = &[
    // Google's "Spherical Mercator"
    (900913, 3857),
    // ESRI code for BC Environment Albers
    (42102, 3005),
];

#[derive(Debug, Default)]
struct RegistryState {
    loaded: bool,
    epsg: EpsgCatalog,
    esri: EsriCatalog,
    by_id: BTreeMap<i32, CoordinateSystem>,
    /// Keys of `by_id` that are aliases rather than own ids.
    aliases: BTreeSet<i32>,
    /// First system published under a name keeps it.
    by_name: BTreeMap<String, CoordinateSystem>,
    by_hash: HashMap<u64, Vec<CoordinateSystem>>,
}

impl RegistryState {
    fn publish(&mut self, system: CoordinateSystem) {
        self.by_name
            .entry(system.name().to_string())
            .or_insert_with(|| system.clone());
        self.by_hash
            .entry(system.structural_hash())
            .or_default()
            .push(system.clone());
        self.by_id.insert(system.id(), system);
    }

    fn lookup(&self, id: i32, kind: CoordinateSystemKind) -> Option<&CoordinateSystem> {
        self.by_id.get(&id).filter(|s| s.kind() == kind)
    }

    fn alias(&mut self, alias: i32, canonical: i32) -> Result<()> {
        let system = self
            .by_id
            .get(&canonical)
            .cloned()
            .ok_or(RegistryError::UnknownId(canonical))?;
        self.by_id.insert(alias, system);
        self.aliases.insert(alias);
        Ok(())
    }

    fn systems(&self) -> impl Iterator<Item = &CoordinateSystem> {
        self.by_id
            .iter()
            .filter(|(id, _)| !self.aliases.contains(id))
            .map(|(_, system)| system)
    }

    /// Structurally equal entry from the hash buckets.
    ///
    /// Several matches are narrowed to the exact name, then the lowest id
    /// among non-deprecated entries, then the lowest id.
    fn best_match(&self, candidate: &CoordinateSystem) -> Option<CoordinateSystem> {
        let bucket = self.by_hash.get(&candidate.structural_hash())?;
        let matches: Vec<&CoordinateSystem> = bucket
            .iter()
            .filter(|system| system.is_equivalent(candidate))
            .collect();
        matches
            .iter()
            .find(|system| system.name() == candidate.name())
            .or_else(|| {
                matches
                    .iter()
                    .filter(|system| !system.is_deprecated())
                    .min_by_key(|system| system.id())
            })
            .or_else(|| matches.iter().min_by_key(|system| system.id()))
            .map(|system| (*system).clone())
    }
}

/// Coordinate system registry backed by an EPSG catalog and, optionally, an
/// ESRI catalog with its digest index.
pub struct Registry {
    config: RegistryConfig,
    source: Arc<dyn ResourceSource>,
    esri_source: Option<Arc<dyn ResourceSource>>,
    state: RwLock<RegistryState>,
    next_id: AtomicI32,
}

impl Registry {
    /// A registry that loads `source` on first use.
    pub fn new(source: Arc<dyn ResourceSource>, config: RegistryConfig) -> Self {
        let next_id = AtomicI32::new(config.first_synthesized_id);
        Self {
            config,
            source,
            esri_source: None,
            state: RwLock::new(RegistryState::default()),
            next_id,
        }
    }

    /// Add ESRI definitions and digest files; takes effect on the next load.
    pub fn with_esri_source(mut self, source: Arc<dyn ResourceSource>) -> Self {
        self.esri_source = Some(source);
        self
    }

    /// Validate `config` and load `source` now.
    pub fn load(source: Arc<dyn ResourceSource>, config: RegistryConfig) -> Result<Self> {
        config.validate().map_err(RegistryError::InvalidConfig)?;
        let registry = Self::new(source, config);
        registry.ensure_loaded();
        Ok(registry)
    }

    /// Open the catalog directories named by `config` and load them.
    pub fn open(config: RegistryConfig) -> Result<Self> {
        config.validate().map_err(RegistryError::InvalidConfig)?;
        let source: Arc<dyn ResourceSource> =
            Arc::new(DirectorySource::new(config.catalog_dir.clone())?);
        let esri_source = match &config.esri_dir {
            Some(dir) => Some(Arc::new(DirectorySource::new(dir.clone())?) as Arc<dyn ResourceSource>),
            None => None,
        };
        let mut registry = Self::new(source, config);
        registry.esri_source = esri_source;
        registry.ensure_loaded();
        Ok(registry)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Load the catalogs unless already loaded. Repeat calls are no-ops.
    pub fn ensure_loaded(&self) {
        drop(self.write_state());
    }

    pub fn is_loaded(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loaded
    }

    /// Drop every table, alias and synthesized system, and reset the id counter.
    /// The next call loads the catalogs again.
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = RegistryState::default();
        self.next_id
            .store(self.config.first_synthesized_id, Ordering::SeqCst);
        debug!("Cleared coordinate system registry");
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Registered system by id, following aliases. Non-positive ids are never registered.
    pub fn get_by_id(&self, id: i32) -> Option<CoordinateSystem> {
        if id <= 0 {
            return None;
        }
        self.read_state().by_id.get(&id).cloned()
    }

    /// Registered system by exact name.
    pub fn get_by_name(&self, name: &str) -> Option<CoordinateSystem> {
        self.read_state().by_name.get(name).cloned()
    }

    /// Every registered system ordered by id, aliases excluded.
    pub fn coordinate_systems(&self) -> Vec<CoordinateSystem> {
        self.read_state().systems().cloned().collect()
    }

    pub fn systems_of_kind(&self, kind: CoordinateSystemKind) -> Vec<CoordinateSystem> {
        self.read_state()
            .systems()
            .filter(|system| system.kind() == kind)
            .cloned()
            .collect()
    }

    pub fn geographic_systems(&self) -> Vec<CoordinateSystem> {
        self.systems_of_kind(CoordinateSystemKind::Geographic)
    }

    pub fn projected_systems(&self) -> Vec<CoordinateSystem> {
        self.systems_of_kind(CoordinateSystemKind::Projected)
    }

    pub fn vertical_systems(&self) -> Vec<CoordinateSystem> {
        self.systems_of_kind(CoordinateSystemKind::Vertical)
    }

    /// Number of registered systems, aliases excluded.
    pub fn len(&self) -> usize {
        self.read_state().systems().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn datum(&self, id: i32) -> Option<Arc<Datum>> {
        self.read_state().epsg.datum(id).cloned()
    }

    pub fn unit(&self, id: i32) -> Option<Arc<UnitOfMeasure>> {
        self.read_state().epsg.unit(id).cloned()
    }

    /// Case-insensitive; the lowest id wins when names repeat.
    pub fn unit_by_name(&self, name: &str) -> Option<Arc<UnitOfMeasure>> {
        self.read_state().epsg.unit_by_name(name).cloned()
    }

    pub fn area(&self, id: i32) -> Option<Arc<Area>> {
        self.read_state().epsg.area(id).cloned()
    }

    pub fn operation(&self, id: i32) -> Option<Arc<CoordinateOperation>> {
        self.read_state().epsg.operation(id).cloned()
    }

    /// Catalog tables that were missing or failed to decode.
    pub fn failed_tables(&self) -> Vec<String> {
        let state = self.read_state();
        state
            .epsg
            .failed_tables()
            .iter()
            .chain(state.esri.failed_tables())
            .cloned()
            .collect()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Make `alias` resolve to the instance registered under `canonical`.
    pub fn register_alias(&self, alias: i32, canonical: i32) -> Result<()> {
        let mut state = self.write_state();
        state.alias(alias, canonical)?;
        info!(alias, canonical, "Registered coordinate system alias");
        Ok(())
    }

    /// The registered equivalent of `candidate`, registering it if nothing matches.
    ///
    /// Matching tries, in order: the candidate's id, its name, the ESRI digest
    /// index, and structural equality. A new system gets the next synthesized
    /// id; these ids are not stable across restarts.
    pub fn resolve(&self, candidate: &CoordinateSystem) -> CoordinateSystem {
        let mut state = self.write_state();
        self.resolve_locked(&mut state, candidate)
    }

    /// Compound system from a registered horizontal and vertical system, resolved.
    pub fn compound(&self, horizontal_id: i32, vertical_id: i32) -> Result<CoordinateSystem> {
        let mut state = self.write_state();
        let horizontal = state
            .by_id
            .get(&horizontal_id)
            .cloned()
            .ok_or(RegistryError::UnknownId(horizontal_id))?;
        let vertical = state
            .by_id
            .get(&vertical_id)
            .cloned()
            .ok_or(RegistryError::UnknownId(vertical_id))?;
        let name = CompoundCrs::default_name(&horizontal, &vertical);
        let compound = CompoundCrs::new(CrsHeader::anonymous(name), horizontal, vertical)?;
        Ok(self.resolve_locked(&mut state, &compound.into()))
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Point transform between two registered systems.
    pub fn transform(&self, source_id: i32, target_id: i32) -> Result<CoordinatesOperation> {
        let source = self
            .get_by_id(source_id)
            .ok_or(RegistryError::UnknownId(source_id))?;
        let target = self
            .get_by_id(target_id)
            .ok_or(RegistryError::UnknownId(target_id))?;
        Ok(CoordinatesOperation::new(&source, &target)?)
    }

    /// Transform one horizontal point; geographic coordinates are `(lon, lat)`.
    pub fn transform_point(
        &self,
        source_id: i32,
        target_id: i32,
        x: f64,
        y: f64,
    ) -> Result<(f64, f64)> {
        Ok(self.transform(source_id, target_id)?.transform(x, y)?)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn read_state(&self) -> RwLockReadGuard<'_, RegistryState> {
        loop {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if state.loaded {
                return state;
            }
            drop(state);
            self.ensure_loaded();
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RegistryState> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !state.loaded {
            self.populate(&mut state);
        }
        state
    }

    fn populate(&self, state: &mut RegistryState) {
        let started = Instant::now();
        let epsg = EpsgCatalog::load(self.source.as_ref());
        let esri = match &self.esri_source {
            Some(source) => EsriCatalog::load(source.as_ref()),
            None => EsriCatalog::empty(),
        };
        *state = RegistryState {
            loaded: true,
            epsg,
            esri,
            ..Default::default()
        };

        let systems: Vec<CoordinateSystem> = state.epsg.coordinate_systems().cloned().collect();
        for system in systems {
            state.publish(system);
        }

        if self.config.register_default_aliases {
            for &(alias, canonical) in DEFAULT_ALIASES {
                if let Err(e) = state.alias(alias, canonical) {
                    debug!(alias, canonical, error = %e, "Default alias not registered");
                }
            }
        }

        let failed = state.epsg.failed_tables().len() + state.esri.failed_tables().len();
        if failed > 0 {
            warn!(failed_tables = failed, "Coordinate system catalog loaded with failed tables");
        }
        info!(
            systems = state.by_id.len() - state.aliases.len(),
            aliases = state.aliases.len(),
            esri_definitions = state.esri.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Coordinate system registry loaded"
        );
    }

    fn resolve_locked(
        &self,
        state: &mut RegistryState,
        candidate: &CoordinateSystem,
    ) -> CoordinateSystem {
        let kind = candidate.kind();

        if candidate.id() > 0 {
            if let Some(found) = state.lookup(candidate.id(), kind) {
                return found.clone();
            }
        }

        if !candidate.name().is_empty() {
            if let Some(found) = state.by_name.get(candidate.name()).filter(|s| s.kind() == kind) {
                debug!(name = %candidate.name(), id = found.id(), "Resolved by name");
                return found.clone();
            }
        }

        if let Some(found) = Self::resolve_digest(state, candidate) {
            return found;
        }

        if let Some(found) = state.best_match(candidate) {
            debug!(name = %candidate.name(), id = found.id(), "Resolved by structure");
            return found;
        }

        self.synthesize(state, candidate)
    }

    /// Step through the ESRI digest index. A digest id that is neither
    /// registered nor an ESRI definition falls through to structural matching.
    fn resolve_digest(
        state: &mut RegistryState,
        candidate: &CoordinateSystem,
    ) -> Option<CoordinateSystem> {
        let kind = candidate.kind();
        let id = {
            let state = &*state;
            state.esri.id_for(candidate, |id| {
                state
                    .lookup(id, kind)
                    .or_else(|| state.esri.get(id))
                    .cloned()
            })?
        };

        if let Some(found) = state.lookup(id, kind) {
            debug!(name = %candidate.name(), id, "Resolved by digest");
            return Some(found.clone());
        }

        let definition = state.esri.get(id).filter(|s| s.kind() == kind).cloned()?;
        info!(id, name = %definition.name(), "Registered ESRI definition");
        state.publish(definition.clone());
        Some(definition)
    }

    fn synthesize(&self, state: &mut RegistryState, candidate: &CoordinateSystem) -> CoordinateSystem {
        // Components first, so they are shared with (or become) registered systems.
        let system = match candidate {
            CoordinateSystem::Projected(projected) => {
                let base = self
                    .resolve_locked(state, &CoordinateSystem::Geographic(projected.base.clone()))
                    .as_geographic()
                    .cloned()
                    .unwrap_or_else(|| projected.base.clone());
                ProjectedCrs {
                    base,
                    ..(**projected).clone()
                }
                .into()
            }
            CoordinateSystem::Compound(compound) => {
                let horizontal = self.resolve_locked(state, &compound.horizontal);
                let vertical = self
                    .resolve_locked(state, &CoordinateSystem::Vertical(compound.vertical.clone()))
                    .as_vertical()
                    .cloned()
                    .unwrap_or_else(|| compound.vertical.clone());
                CompoundCrs {
                    header: compound.header.clone(),
                    horizontal,
                    vertical,
                }
                .into()
            }
            other => other.clone(),
        };

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let system = system.with_header(CrsHeader {
            id,
            ..candidate.header().clone()
        });
        info!(id, name = %system.name(), kind = %system.kind(), "Registered new coordinate system");
        state.publish(system.clone());
        system
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("source", &self.source.describe())
            .field("esri_source", &self.esri_source.as_ref().map(|s| s.describe()))
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs_common::{Ellipsoid, GeographicCrs, PrimeMeridian};

    fn nad83(id: i32, name: &str, deprecated: bool) -> CoordinateSystem {
        let datum = Datum::geodetic(
            "North American Datum 1983",
            Arc::new(Ellipsoid::grs80()),
            Arc::new(PrimeMeridian::greenwich()),
        );
        GeographicCrs::new(
            CrsHeader::epsg(id, name).with_deprecated(deprecated),
            Arc::new(datum),
            Arc::new(UnitOfMeasure::degree()),
        )
        .unwrap()
        .into()
    }

    fn state_with(systems: Vec<CoordinateSystem>) -> RegistryState {
        let mut state = RegistryState {
            loaded: true,
            ..Default::default()
        };
        for system in systems {
            state.publish(system);
        }
        state
    }

    #[test]
    fn test_best_match_prefers_exact_name() {
        let state = state_with(vec![
            nad83(4269, "NAD83", false),
            nad83(4617, "NAD83(CSRS)", false),
        ]);
        let candidate = nad83(0, "NAD83(CSRS)", false);
        assert_eq!(state.best_match(&candidate).unwrap().id(), 4617);
    }

    #[test]
    fn test_best_match_skips_deprecated() {
        let state = state_with(vec![
            nad83(4617, "NAD83(CSRS)", false),
            nad83(4140, "NAD83(CSRS98)", true),
            nad83(4269, "NAD83", false),
        ]);
        let candidate = nad83(0, "anonymous", false);
        assert_eq!(state.best_match(&candidate).unwrap().id(), 4269);
    }

    #[test]
    fn test_best_match_all_deprecated() {
        let state = state_with(vec![
            nad83(4617, "NAD83(CSRS)", true),
            nad83(4140, "NAD83(CSRS98)", true),
        ]);
        let candidate = nad83(0, "anonymous", false);
        assert_eq!(state.best_match(&candidate).unwrap().id(), 4140);
    }

    #[test]
    fn test_first_name_is_kept() {
        let state = state_with(vec![nad83(4269, "NAD83", false), nad83(4617, "NAD83", false)]);
        assert_eq!(state.by_name.get("NAD83").unwrap().id(), 4269);
        assert_eq!(state.by_id.len(), 2);
    }

    #[test]
    fn test_alias_needs_registered_target() {
        let mut state = state_with(vec![nad83(4269, "NAD83", false)]);
        assert!(matches!(state.alias(1, 2), Err(RegistryError::UnknownId(2))));
        state.alias(104269, 4269).unwrap();
        assert_eq!(state.by_id.get(&104269).unwrap().id(), 4269);
        assert_eq!(state.systems().count(), 1);
    }
}
