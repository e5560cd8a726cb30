use crate::error::{Error, Result};
use crate::tei::walker::WalkOptions;
use crate::tei::{DEFAULT_SCHEME, DEFAULT_UNIT_ELEMENTS};
use crate::types::{CitationStructure, CounterReset, NumberingPolicy, StructureStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const CONFIG_DIR_ENV: &str = "TESSPREP_CONFIG_PATH";
pub const CONFIG_FILE_NAME: &str = "tessprep.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub scheme: String,
    pub strategy: StructureStrategy,
    /// Replaces the declared structure when set.
    pub levels: Option<CitationStructure>,
    pub default_numbering: NumberingPolicy,
    pub numbering: HashMap<String, NumberingPolicy>,
    pub counter_reset: CounterReset,
    pub unit_elements: Vec<String>,
    pub normalize_labels: bool,
    pub output_extension: String,
    pub request_timeout_secs: u64,
    pub bind_addr: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            strategy: StructureStrategy::default(),
            levels: None,
            default_numbering: NumberingPolicy::default(),
            numbering: HashMap::new(),
            counter_reset: CounterReset::default(),
            unit_elements: DEFAULT_UNIT_ELEMENTS.iter().map(|s| s.to_string()).collect(),
            normalize_labels: true,
            output_extension: "tess".to_string(),
            request_timeout_secs: 30,
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ConvertConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        let config: ConvertConfig = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `tessprep.json` from the directory in `TESSPREP_CONFIG_PATH`,
    /// or returns the defaults when the variable is unset.
    pub fn load_default() -> Result<Self> {
        match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => Self::load_from_file(Path::new(&dir).join(CONFIG_FILE_NAME)),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.scheme.trim().is_empty() {
            return Err(Error::Config("scheme must not be empty".to_string()));
        }
        if self.unit_elements.is_empty() {
            return Err(Error::Config(
                "unit_elements must name at least one element".to_string(),
            ));
        }
        if self.output_extension.trim_start_matches('.').is_empty() {
            return Err(Error::Config("output_extension must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            unit_elements: self.unit_elements.clone(),
            default_numbering: self.default_numbering,
            numbering: self.numbering.clone(),
            counter_reset: self.counter_reset,
        }
    }
}
