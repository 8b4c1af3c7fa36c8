//! Scenario persistence backends

use super::Scenario;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Scenario '{0}' already exists")]
    DuplicateId(String),
}

/// Keyed storage for saved scenarios
pub trait ScenarioStore {
    /// Persist a scenario and return its id
    fn save(&mut self, scenario: Scenario) -> Result<String, StoreError>;

    /// All scenarios in save order
    fn list(&self) -> Result<Vec<Scenario>, StoreError>;

    fn get(&self, id: &str) -> Result<Option<Scenario>, StoreError>;

    /// Remove a scenario; `false` when the id was unknown
    fn delete(&mut self, id: &str) -> Result<bool, StoreError>;
}

/// Process-local store, mostly for tests and one-shot runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scenarios: Vec<Scenario>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScenarioStore for MemoryStore {
    fn save(&mut self, scenario: Scenario) -> Result<String, StoreError> {
        if self.scenarios.iter().any(|s| s.id == scenario.id) {
            return Err(StoreError::DuplicateId(scenario.id));
        }
        let id = scenario.id.clone();
        self.scenarios.push(scenario);
        Ok(id)
    }

    fn list(&self) -> Result<Vec<Scenario>, StoreError> {
        Ok(self.scenarios.clone())
    }

    fn get(&self, id: &str) -> Result<Option<Scenario>, StoreError> {
        Ok(self.scenarios.iter().find(|s| s.id == id).cloned())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.scenarios.len();
        self.scenarios.retain(|s| s.id != id);
        Ok(self.scenarios.len() != before)
    }
}

/// Scenarios kept as one JSON array on disk.
///
/// The file is re-read on every call and rewritten on every change, so several
/// short-lived processes can share it sequentially. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Scenario>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    fn write_all(&self, scenarios: &[Scenario]) -> Result<(), StoreError> {
        // Write next to the target, then rename over it
        let tmp = self.path.with_extension("json.tmp");
        let written =
            write_json(&tmp, scenarios).and_then(|()| fs::rename(&tmp, &self.path).map_err(StoreError::from));

        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written
    }
}

fn write_json(path: &Path, scenarios: &[Scenario]) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, scenarios)?;
    writer.flush()?;
    Ok(())
}

impl ScenarioStore for JsonFileStore {
    fn save(&mut self, scenario: Scenario) -> Result<String, StoreError> {
        let mut scenarios = self.read_all()?;
        if scenarios.iter().any(|s| s.id == scenario.id) {
            return Err(StoreError::DuplicateId(scenario.id));
        }

        let id = scenario.id.clone();
        log::info!("Saving scenario {} ('{}') to {}", id, scenario.name, self.path.display());
        scenarios.push(scenario);
        self.write_all(&scenarios)?;
        Ok(id)
    }

    fn list(&self) -> Result<Vec<Scenario>, StoreError> {
        self.read_all()
    }

    fn get(&self, id: &str) -> Result<Option<Scenario>, StoreError> {
        Ok(self.read_all()?.into_iter().find(|s| s.id == id))
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut scenarios = self.read_all()?;
        let before = scenarios.len();
        scenarios.retain(|s| s.id != id);

        if scenarios.len() == before {
            return Ok(false);
        }
        log::info!("Deleting scenario {} from {}", id, self.path.display());
        self.write_all(&scenarios)?;
        Ok(true)
    }
}
