//! Server Configuration

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use mcp_core::config::{non_empty, process_env};
use mcp_core::AgentError;

/// Data domain served by one gateway process
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Domain {
    /// TheDogAPI breed tools
    #[default]
    Dogs,
    /// Smartsheet project tools
    Sheets,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Dogs => "dogs",
            Domain::Sheets => "sheets",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dogs" | "dog" => Ok(Domain::Dogs),
            "sheets" | "sheet" | "smartsheet" => Ok(Domain::Sheets),
            other => Err(AgentError::Config(format!(
                "MCP_DOMAIN must be 'dogs' or 'sheets', got '{other}'"
            ))),
        }
    }
}

/// Process-level settings read once at startup
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub domain: Domain,
    /// Served for unmatched paths when set
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AgentError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AgentError> {
        let bind_addr = non_empty(&lookup, "BIND_ADDR").unwrap_or_else(|| {
            let port = non_empty(&lookup, "PORT").unwrap_or_else(|| "3000".into());
            format!("0.0.0.0:{port}")
        });
        let domain = non_empty(&lookup, "MCP_DOMAIN")
            .map(|d| d.parse())
            .transpose()?
            .unwrap_or_default();
        let static_dir = non_empty(&lookup, "STATIC_DIR").map(PathBuf::from);

        Ok(Self {
            bind_addr,
            domain,
            static_dir,
        })
    }
}
