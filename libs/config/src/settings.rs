//! Layered Settings
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in `config/default.toml` (compiled in)
//! 2. An optional user TOML file
//! 3. Environment variables, `LB__SECTION__KEY`

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use lb_types::{ContractRef, Token, TokenRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_TOML: &str = include_str!("../../../config/default.toml");

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LB";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub chain: ChainSettings,
    pub contracts: ContractSettings,
    pub tokens: Vec<Token>,
    pub gas: GasSettings,
    pub defaults: DefaultSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    pub chain_id: String,
    pub lcd_url: String,
    pub rpc_url: String,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            chain_id: "pulsar-2".to_string(),
            lcd_url: "https://lcd.testnet.secretsaturn.net".to_string(),
            rpc_url: "https://rpc.testnet.secretsaturn.net".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContractSettings {
    pub lb_factory: Option<ContractRef>,
    pub lb_router: Option<ContractRef>,
}

/// Gas limit per message type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasSettings {
    pub add_liquidity: u64,
    pub remove_liquidity: u64,
    pub swap: u64,
    pub create_pair: u64,
    pub set_viewing_key: u64,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            add_liquidity: 2_000_000,
            remove_liquidity: 2_000_000,
            swap: 2_000_000,
            create_pair: 500_000,
            set_viewing_key: 40_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    pub slippage_bps: u16,
    pub id_slippage: u32,
    pub bin_step: u16,
    /// Seconds added to the current time for message deadlines
    pub deadline_window_secs: u64,
    pub viewing_key_padding: String,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            slippage_bps: 500,
            id_slippage: 100,
            bin_step: 100,
            deadline_window_secs: 1_200,
            viewing_key_padding: "one amber club".to_string(),
        }
    }
}

impl Settings {
    /// Load built-in defaults, then `path` if given, then `LB__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// As [`Settings::load`] with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));

        if let Some(path) = path {
            info!("Loading settings from {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        settings.validate()?;
        debug!(
            chain_id = %settings.chain.chain_id,
            tokens = settings.tokens.len(),
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Reject values no message could be built with
    pub fn validate(&self) -> Result<()> {
        if self.defaults.slippage_bps > 10_000 {
            bail!(
                "defaults.slippage_bps must be at most 10000, got {}",
                self.defaults.slippage_bps
            );
        }
        if self.defaults.bin_step == 0 {
            bail!("defaults.bin_step must be greater than zero");
        }
        let gas = &self.gas;
        for (name, limit) in [
            ("add_liquidity", gas.add_liquidity),
            ("remove_liquidity", gas.remove_liquidity),
            ("swap", gas.swap),
            ("create_pair", gas.create_pair),
            ("set_viewing_key", gas.set_viewing_key),
        ] {
            if limit == 0 {
                bail!("gas.{} must be greater than zero", name);
            }
        }
        Ok(())
    }

    /// Build the immutable token registry
    pub fn token_registry(&self) -> Result<TokenRegistry> {
        TokenRegistry::from_tokens(self.tokens.iter().cloned())
            .context("Invalid token list in configuration")
    }

    /// Effective settings rendered back to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render settings as TOML")
    }
}
