//! Catalogue of named optical systems
//!
//! Owned by whichever component needs lens prescriptions (renderer, editor)
//! and passed around by reference. Nothing here is global.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, trace, warn};

use super::loader::{load_prescription_file, save_prescription_file};
use super::PrescriptionError;
use crate::config::{CameraConfig, DocumentFormat};
use crate::optics::OpticalSystem;

/// Named optical systems, ordered by name
#[derive(Debug, Clone, Default)]
pub struct PrescriptionCatalogue {
    systems: BTreeMap<String, OpticalSystem>,
}

impl PrescriptionCatalogue {
    /// Create an empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every prescription file in `directory`, keyed by file stem
    ///
    /// A missing directory gives an empty catalogue. Files that fail to load
    /// are logged and left out; the rest still load.
    pub fn load_directory(directory: impl AsRef<Path>, config: &CameraConfig) -> Self {
        let directory = directory.as_ref();
        let mut catalogue = Self::new();

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                info!("No prescriptions loaded from {:?}: {}", directory, e);
                return catalogue;
            }
        };

        for path in entries.filter_map(|entry| entry.ok().map(|entry| entry.path())) {
            if !path.is_file() || DocumentFormat::from_path(&path).is_none() {
                trace!("Skipping non-prescription entry {:?}", path);
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            match load_prescription_file(&path, config) {
                Ok(mut system) => {
                    if system.name != stem {
                        debug!("Prescription '{}' in {:?} is catalogued as '{}'", system.name, path, stem);
                        system.name = stem.to_string();
                    }
                    if catalogue.insert(system).is_some() {
                        warn!("Prescription '{}' in {:?} replaces one loaded earlier under the same name", stem, path);
                    }
                }
                Err(e) => warn!("Skipping prescription '{}': {}", stem, e),
            }
        }

        info!("Loaded {} prescriptions from {:?}", catalogue.len(), directory);
        catalogue
    }

    /// Add or replace a system under its own name, returning the one replaced
    pub fn insert(&mut self, system: OpticalSystem) -> Option<OpticalSystem> {
        self.systems.insert(system.name.clone(), system)
    }

    /// Look up a system
    pub fn get(&self, name: &str) -> Option<&OpticalSystem> {
        self.systems.get(name)
    }

    /// Look up a system for editing
    pub fn get_mut(&mut self, name: &str) -> Option<&mut OpticalSystem> {
        self.systems.get_mut(name)
    }

    /// Evict a system
    pub fn remove(&mut self, name: &str) -> Option<OpticalSystem> {
        self.systems.remove(name)
    }

    /// Whether a system with this name is present
    pub fn contains(&self, name: &str) -> bool {
        self.systems.contains_key(name)
    }

    /// Names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.systems.keys().map(String::as_str)
    }

    /// Systems in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OpticalSystem)> {
        self.systems.iter().map(|(name, system)| (name.as_str(), system))
    }

    /// Number of systems
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether the catalogue is empty
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Copy `source` under a new name as a starting point for edits
    ///
    /// Returns `None` when `source` is missing or `name` is already taken.
    pub fn duplicate(&mut self, source: &str, name: &str) -> Option<&mut OpticalSystem> {
        if self.contains(name) {
            return None;
        }
        let copy = self.get(source)?.duplicate(name);
        self.insert(copy);
        self.get_mut(name)
    }

    /// Write one system to `<directory>/<name>.<ext>`
    pub fn save(
        &self,
        name: &str,
        directory: impl AsRef<Path>,
        format: DocumentFormat,
    ) -> Result<PathBuf, PrescriptionError> {
        let system = self
            .get(name)
            .ok_or_else(|| PrescriptionError::NotFound(name.to_string()))?;
        let path = directory.as_ref().join(format!("{}.{}", name, format.extension()));
        save_prescription_file(system, &path)?;
        debug!("Saved prescription '{}' to {:?}", name, path);
        Ok(path)
    }
}
