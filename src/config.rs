//! Configuration management and validation.
//!
//! Provides the resolved settings object for a processing run: per-bank
//! operation allowlists, the split flag, export format, polling interval and
//! directories. Settings are built once from `KEY=value` pairs (an optional
//! `.env` file overlaid by the process environment) and then passed by
//! reference; nothing else in the crate reads the environment.

use crate::app::models::{BankTag, ExportFormat};
use crate::app::services::cnab_parser::TextEncoding;
use crate::constants::{
    DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_ENCODINGS, DEFAULT_FILE_EXTENSION, DEFAULT_LEDGER_FILE,
    DEFAULT_LOCAL_DIR,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Per-bank processing settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankConfig {
    /// Operation codes to keep; empty means keep every valid record
    pub allowed_operations: BTreeSet<String>,

    /// Whether files from this bank are processed at all
    pub enabled: bool,

    /// Split retained records into normal and advance files
    pub split_advance: bool,
}

impl BankConfig {
    /// Build a config from a comma-separated operation list
    pub fn new(operations: &str, enabled: bool, split_advance: bool) -> Self {
        Self {
            allowed_operations: parse_operation_list(operations),
            enabled,
            split_advance,
        }
    }

    /// Enabled config with no operation restriction and no split
    pub fn retain_all() -> Self {
        Self {
            allowed_operations: BTreeSet::new(),
            enabled: true,
            split_advance: false,
        }
    }

    /// Check whether a record with this operation code is kept
    ///
    /// Records too short to carry an operation code are always kept; a blank
    /// code must be in the allowlist like any other.
    pub fn allows(&self, operation_code: Option<&str>) -> bool {
        match operation_code {
            None => true,
            Some(_) if self.allowed_operations.is_empty() => true,
            Some(code) => self.allowed_operations.contains(code),
        }
    }
}

/// What to do with files whose header matches no supported bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownBankPolicy {
    /// Report the file as unidentified and write nothing
    #[default]
    Skip,
    /// Process with an empty allowlist, keeping every valid record
    Retain,
}

impl FromStr for UnknownBankPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(UnknownBankPolicy::Skip),
            "retain" | "keep" => Ok(UnknownBankPolicy::Retain),
            other => Err(Error::configuration(format!(
                "Invalid UNKNOWN_BANK_POLICY '{}' (expected skip or retain)",
                other
            ))),
        }
    }
}

/// Resolved settings for the processor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Settings for each supported bank
    pub banks: BTreeMap<BankTag, BankConfig>,

    /// Policy for unidentified headers
    pub unknown_bank_policy: UnknownBankPolicy,

    /// Format of the advance-record export
    pub output_format: ExportFormat,

    /// Seconds between poll cycles
    pub check_interval_secs: u64,

    /// Primary watched directory
    pub local_dir: PathBuf,

    /// Optional second watched directory (usually a network share)
    pub network_dir: Option<PathBuf>,

    /// Markdown ledger of processed file names
    pub ledger_path: PathBuf,

    /// Copy the original file with a timestamp before processing
    pub backup_original: bool,

    /// Decode candidates tried in order
    pub encodings: Vec<TextEncoding>,

    /// Extension of candidate input files, matched case-insensitively
    pub file_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        let banks = BankTag::CONFIGURABLE
            .iter()
            .map(|tag| (*tag, BankConfig::default()))
            .collect();

        Self {
            banks,
            unknown_bank_policy: UnknownBankPolicy::Skip,
            output_format: ExportFormat::Csv,
            check_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            local_dir: PathBuf::from(DEFAULT_LOCAL_DIR),
            network_dir: None,
            ledger_path: PathBuf::from(DEFAULT_LEDGER_FILE),
            backup_original: true,
            encodings: vec![TextEncoding::Utf8, TextEncoding::Latin1],
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
        }
    }
}

impl Config {
    /// Build configuration from `KEY=value` pairs
    ///
    /// Unknown keys are ignored. Missing bank keys default to disabled with an
    /// empty allowlist and no split.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config::default();

        for tag in BankTag::CONFIGURABLE {
            let prefix = tag.as_str();
            let enabled = match get(&format!("{}_ENABLE", prefix)) {
                Some(value) => parse_bool(&format!("{}_ENABLE", prefix), value)?,
                None => false,
            };
            let split_advance = match get(&format!("{}_SEPARAR_ANTECIPACAO", prefix)) {
                Some(value) => parse_bool(&format!("{}_SEPARAR_ANTECIPACAO", prefix), value)?,
                None => false,
            };
            let operations = get(&format!("{}_OPERACAO", prefix)).unwrap_or("");

            config
                .banks
                .insert(tag, BankConfig::new(operations, enabled, split_advance));
        }

        if let Some(value) = get("UNKNOWN_BANK_POLICY") {
            config.unknown_bank_policy = value.parse()?;
        }
        if let Some(value) = get("OUTPUT_FORMAT") {
            config.output_format = value.parse()?;
        }
        if let Some(value) = get("CHECK_INTERVAL") {
            config.check_interval_secs = value.parse().map_err(|e| {
                Error::configuration(format!("Invalid CHECK_INTERVAL '{}': {}", value, e))
            })?;
        }
        if let Some(value) = get("LOCAL_CNAB_DIR") {
            config.local_dir = PathBuf::from(value);
        }
        config.network_dir = get("NETWORK_CNAB_DIR").map(PathBuf::from);
        if let Some(value) = get("PROCESSED_LEDGER") {
            config.ledger_path = PathBuf::from(value);
        }
        if let Some(value) = get("BACKUP_ORIGINAL") {
            config.backup_original = parse_bool("BACKUP_ORIGINAL", value)?;
        }
        config.encodings = parse_encoding_list(get("INPUT_ENCODINGS").unwrap_or(DEFAULT_ENCODINGS))?;
        if let Some(value) = get("FILE_EXTENSION") {
            config.file_extension = value.trim_start_matches('.').to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an optional `.env` file overlaid by the process environment
    ///
    /// When no file is given, `./.env` is used if it exists.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        let mut vars: HashMap<String, String> = HashMap::new();

        let file_vars = match env_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::file_not_found(path.display().to_string()));
                }
                Some(dotenvy::from_path_iter(path))
            }
            None if Path::new(".env").exists() => Some(dotenvy::from_path_iter(".env")),
            None => None,
        };

        if let Some(iter) = file_vars {
            let iter = iter
                .map_err(|e| Error::configuration(format!("Failed to read env file: {}", e)))?;
            for item in iter {
                let (key, value) = item
                    .map_err(|e| Error::configuration(format!("Malformed env file: {}", e)))?;
                vars.insert(key, value);
            }
            debug!("Loaded {} entries from env file", vars.len());
        }

        vars.extend(std::env::vars());
        Self::from_vars(vars)
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<()> {
        if self.check_interval_secs == 0 {
            return Err(Error::configuration("CHECK_INTERVAL must be greater than 0"));
        }
        if self.encodings.is_empty() {
            return Err(Error::configuration(
                "INPUT_ENCODINGS must name at least one encoding",
            ));
        }
        if self.file_extension.is_empty() {
            return Err(Error::configuration("FILE_EXTENSION must not be empty"));
        }
        Ok(())
    }

    /// Settings for an identified bank (disabled defaults when absent)
    pub fn bank_config(&self, bank: BankTag) -> BankConfig {
        self.banks.get(&bank).cloned().unwrap_or_default()
    }

    /// Resolve the settings to apply to a file from the given bank
    ///
    /// Unidentified banks follow [`UnknownBankPolicy`].
    pub fn resolve_bank_config(&self, bank: BankTag, file: &str) -> Result<BankConfig> {
        match (bank, self.unknown_bank_policy) {
            (BankTag::Unknown, UnknownBankPolicy::Skip) => Err(Error::bank_unidentified(file)),
            (BankTag::Unknown, UnknownBankPolicy::Retain) => Ok(BankConfig::retain_all()),
            (tag, _) => Ok(self.bank_config(tag)),
        }
    }

    /// Directories polled by the watcher, in order
    pub fn watch_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.local_dir.clone()];
        if let Some(network) = &self.network_dir {
            if network != &self.local_dir {
                dirs.push(network.clone());
            }
        }
        dirs
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}

/// Parse a comma-separated operation code list, dropping blanks
pub fn parse_operation_list(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(|code| code.trim())
        .filter(|code| !code.is_empty())
        .map(|code| code.to_string())
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "sim" => Ok(true),
        "false" | "0" | "no" | "nao" | "não" => Ok(false),
        other => Err(Error::configuration(format!(
            "Invalid boolean for {}: '{}'",
            key, other
        ))),
    }
}

fn parse_encoding_list(value: &str) -> Result<Vec<TextEncoding>> {
    value
        .split(',')
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| name.parse())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_keys_absent() {
        let config = Config::from_vars(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(config.check_interval_secs, 30);
        assert_eq!(config.local_dir, PathBuf::from("cnab"));
        assert!(config.network_dir.is_none());
        assert_eq!(config.output_format, ExportFormat::Csv);
        assert_eq!(config.unknown_bank_policy, UnknownBankPolicy::Skip);
        assert_eq!(
            config.encodings,
            vec![TextEncoding::Utf8, TextEncoding::Latin1]
        );

        let bb = config.bank_config(BankTag::Bb);
        assert!(!bb.enabled);
        assert!(!bb.split_advance);
        assert!(bb.allowed_operations.is_empty());
    }

    #[test]
    fn test_bank_keys() {
        let config = Config::from_vars(vars(&[
            ("BB_ENABLE", "true"),
            ("BB_OPERACAO", "06, 17,,09"),
            ("BB_SEPARAR_ANTECIPACAO", "TRUE"),
            ("BRADESCO_ENABLE", "false"),
            ("BRADESCO_OPERACAO", "02"),
        ]))
        .unwrap();

        let bb = config.bank_config(BankTag::Bb);
        assert!(bb.enabled);
        assert!(bb.split_advance);
        assert_eq!(
            bb.allowed_operations.iter().cloned().collect::<Vec<_>>(),
            vec!["06", "09", "17"]
        );

        let bradesco = config.bank_config(BankTag::Bradesco);
        assert!(!bradesco.enabled);
        assert!(bradesco.allowed_operations.contains("02"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_vars(vars(&[("BB_ENABLE", "maybe")])).is_err());
        assert!(Config::from_vars(vars(&[("CHECK_INTERVAL", "abc")])).is_err());
        assert!(Config::from_vars(vars(&[("CHECK_INTERVAL", "0")])).is_err());
        assert!(Config::from_vars(vars(&[("OUTPUT_FORMAT", "pdf")])).is_err());
        assert!(Config::from_vars(vars(&[("INPUT_ENCODINGS", "ebcdic")])).is_err());
    }

    #[test]
    fn test_bank_config_allows() {
        let open = BankConfig::new("", true, false);
        assert!(open.allows(Some("99")));
        assert!(open.allows(None));

        let restricted = BankConfig::new("01,02", true, false);
        assert!(restricted.allows(Some("01")));
        assert!(!restricted.allows(Some("99")));
        assert!(!restricted.allows(Some("")));
        assert!(restricted.allows(None));
    }

    #[test]
    fn test_unknown_bank_policy_resolution() {
        let skip = Config::default();
        let err = skip
            .resolve_bank_config(BankTag::Unknown, "X.RET")
            .unwrap_err();
        assert!(matches!(err, Error::BankUnidentified { .. }));
        assert!(err.is_skip());

        let retain = Config::from_vars(vars(&[("UNKNOWN_BANK_POLICY", "retain")])).unwrap();
        let resolved = retain
            .resolve_bank_config(BankTag::Unknown, "X.RET")
            .unwrap();
        assert_eq!(resolved, BankConfig::retain_all());
    }

    #[test]
    fn test_watch_dirs_deduplicated() {
        let config = Config::from_vars(vars(&[
            ("LOCAL_CNAB_DIR", "/data/cnab"),
            ("NETWORK_CNAB_DIR", "/data/cnab"),
        ]))
        .unwrap();
        assert_eq!(config.watch_dirs(), vec![PathBuf::from("/data/cnab")]);

        let config = Config::from_vars(vars(&[
            ("LOCAL_CNAB_DIR", "/data/cnab"),
            ("NETWORK_CNAB_DIR", "/mnt/share"),
        ]))
        .unwrap();
        assert_eq!(config.watch_dirs().len(), 2);
    }

    #[test]
    fn test_load_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join("settings.env");
        std::fs::write(
            &env_path,
            "BRADESCO_ENABLE=true\nBRADESCO_OPERACAO=06,10\nCNAB_TEST_ONLY_KEY=1\n",
        )
        .unwrap();

        let config = Config::load(Some(&env_path)).unwrap();
        let bradesco = config.bank_config(BankTag::Bradesco);
        assert!(bradesco.enabled);
        assert!(bradesco.allowed_operations.contains("10"));
    }

    #[test]
    fn test_load_missing_env_file() {
        let result = Config::load(Some(Path::new("/nonexistent/settings.env")));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }
}
