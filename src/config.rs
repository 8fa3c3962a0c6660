use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub(crate) const DEFAULT_CONFIG_FILE: &str = ".dyndream";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum ConfigKey {
    ApiKey,
    DreamhostUrl,
    IpUrl,
    DynamicUrl,
    LogFile,
}

impl ConfigKey {
    const REQUIRED: [ConfigKey; 4] = [
        ConfigKey::ApiKey,
        ConfigKey::DreamhostUrl,
        ConfigKey::IpUrl,
        ConfigKey::DynamicUrl,
    ];
    const ALL: [ConfigKey; 5] = [
        ConfigKey::ApiKey,
        ConfigKey::DreamhostUrl,
        ConfigKey::IpUrl,
        ConfigKey::DynamicUrl,
        ConfigKey::LogFile,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            ConfigKey::ApiKey => "API_KEY",
            ConfigKey::DreamhostUrl => "DREAMHOST_URL",
            ConfigKey::IpUrl => "IP_URL",
            ConfigKey::DynamicUrl => "DYNAMIC_URL",
            ConfigKey::LogFile => "LOGFILE",
        }
    }

    fn from_name(name: &str) -> Option<ConfigKey> {
        ConfigKey::ALL.iter().copied().find(|key| key.name() == name)
    }
}

/// Settings read from a `KEY=VALUE` file. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub api_key: String,
    pub dreamhost_url: String,
    pub ip_url: String,
    pub dynamic_url: String,
    /// `None` when `LOGFILE` is absent or empty.
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub(crate) fn load(path: &Path) -> Result<Config> {
        println!("Reading configuration from {}", path.display());
        let io_error = |source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        let entries = parse_entries(BufReader::new(file)).map_err(io_error)?;
        Config::from_entries(entries)
    }

    pub(crate) fn from_entries(mut entries: BTreeMap<ConfigKey, String>) -> Result<Config> {
        if let Some(key) = ConfigKey::REQUIRED
            .iter()
            .find(|key| !entries.contains_key(*key))
        {
            return Err(Error::MissingField(key.name()));
        }
        let mut take = |key: ConfigKey| entries.remove(&key).unwrap_or_default();

        Ok(Config {
            api_key: take(ConfigKey::ApiKey),
            dreamhost_url: take(ConfigKey::DreamhostUrl),
            ip_url: take(ConfigKey::IpUrl),
            dynamic_url: take(ConfigKey::DynamicUrl),
            log_file: Some(take(ConfigKey::LogFile))
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        })
    }
}

/// Reads every recognized `KEY=VALUE` line. Unknown keys, blank lines and
/// lines without `=` are skipped; a repeated key keeps its last value.
pub(crate) fn parse_entries<R: BufRead>(
    reader: R,
) -> std::io::Result<BTreeMap<ConfigKey, String>> {
    let mut entries = BTreeMap::new();
    for line in reader.lines() {
        let line = line?;
        let (name, value) = match line.trim().split_once('=') {
            Some(pair) => pair,
            None => continue,
        };
        if let Some(key) = ConfigKey::from_name(name) {
            entries.insert(key, value.to_string());
        }
    }
    Ok(entries)
}

/// Both places searched when no config file was given on the command line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct NotFound {
    pub home: Option<PathBuf>,
    pub program_dir: Option<PathBuf>,
}

/// Picks the config file: an explicit path as given, otherwise
/// `<home>/.dyndream`, otherwise `<program_dir>/.dyndream`.
pub(crate) fn locate(
    explicit: Option<PathBuf>,
    home: Option<&Path>,
    program_dir: Option<&Path>,
) -> std::result::Result<PathBuf, NotFound> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let home = home.map(|dir| dir.join(DEFAULT_CONFIG_FILE));
    let program_dir = program_dir.map(|dir| dir.join(DEFAULT_CONFIG_FILE));

    let found = home
        .iter()
        .chain(program_dir.iter())
        .find(|candidate| candidate.is_file())
        .cloned();
    found.ok_or(NotFound { home, program_dir })
}
