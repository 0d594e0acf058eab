//! # LB Configuration
//!
//! Chain endpoints, contract references, the token list, gas limits and
//! per-action defaults, loaded from built-in TOML, an optional user file and
//! `LB__*` environment variables.
//!
//! ```rust
//! use lb_config::Settings;
//!
//! let settings = Settings::load_with_prefix(None, "LB_DOCTEST").unwrap();
//! let registry = settings.token_registry().unwrap();
//! assert_eq!(registry.resolve("sSCRT").unwrap().decimals, 6);
//! ```

pub mod settings;

pub use settings::{
    ChainSettings, ContractSettings, DefaultSettings, GasSettings, Settings, ENV_PREFIX,
};
