use crate::error::Result;
use crate::task::Task;
use std::{fs, io::ErrorKind, path::PathBuf};

pub const DEFAULT_KEY: &str = "savedTasks";

/// Durable home of the task collection.
///
/// `load` yields `Ok(None)` when nothing has been saved yet.
pub trait Persistence {
    fn load(&self) -> Result<Option<Vec<Task>>>;
    fn save(&self, tasks: &[Task]) -> Result<()>;
}

/// Key-value store backed by a directory, one `<key>.json` file per slot.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    key: String,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
        }
    }

    pub fn slot_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }
}

impl Persistence for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<Task>>> {
        let data = match fs::read_to_string(self.slot_path()) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(tasks)?;

        // Replace the slot atomically so readers never see a partial write.
        let tmp = self.dir.join(format!(".{}.json.tmp", self.key));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, self.slot_path())?;
        Ok(())
    }
}
