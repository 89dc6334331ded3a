use clap::Parser;
use std::path::PathBuf;

/// Terminal task list with local persistence.
#[derive(Debug, Parser)]
#[command(name = "tasklist", version)]
pub struct Config {
    /// Directory holding the saved task list
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir().join("tasklist.log")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("tasklist"))
        .unwrap_or_else(|| PathBuf::from(".tasklist"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["tasklist"]);
        assert!(config.data_dir.is_none());
        assert_eq!(config.log_level, "info");
        let dir = config.data_dir();
        assert!(dir.ends_with("tasklist") || dir.ends_with(".tasklist"));
    }

    #[test]
    fn test_explicit_data_dir() {
        let config = Config::parse_from([
            "tasklist",
            "--data-dir",
            "/tmp/tasks",
            "--log-level",
            "debug",
        ]);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/tasks"));
        assert_eq!(config.log_file(), PathBuf::from("/tmp/tasks/tasklist.log"));
        assert_eq!(config.log_level, "debug");
    }
}
