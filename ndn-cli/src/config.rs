use std::str::FromStr;
use std::{fs, path::Path};

use anyhow::{bail, Context};
use ndn_core::{set_default_wire_format, TLV_WIRE_FORMAT_0_1, TLV_WIRE_FORMAT_0_1_1};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub codec: CodecConfig,
    pub interest: InterestConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub wire_format: WireFormatName,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireFormatName {
    #[default]
    #[serde(rename = "tlv-0.1.1")]
    Tlv0_1_1,
    #[serde(rename = "tlv-0.1")]
    Tlv0_1,
}

/// Defaults for `encode-interest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterestConfig {
    pub lifetime_ms: Option<u64>,
    pub must_be_fresh: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Default for InterestConfig {
    fn default() -> Self {
        Self {
            lifetime_ms: Some(4000),
            must_be_fresh: true,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => bail!("Unknown output format: {} (expected text or json)", other),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Install the configured wire format as the process default. Must run
    /// before any packet is encoded or decoded.
    pub fn apply(&self) -> anyhow::Result<()> {
        match self.codec.wire_format {
            WireFormatName::Tlv0_1_1 => set_default_wire_format(&TLV_WIRE_FORMAT_0_1_1)?,
            WireFormatName::Tlv0_1 => set_default_wire_format(&TLV_WIRE_FORMAT_0_1)?,
        }
        Ok(())
    }
}
