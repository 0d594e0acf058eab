//! # Liquidity Book Contract Interface
//!
//! ## Purpose
//!
//! The boundary between the pure liquidity engine and the chain: the exact
//! message schema of the pair, factory and SNIP-20 contracts, a builder that
//! maps compiled plans onto it, and the traits an external signer and query
//! transport implement.
//!
//! ## Integration Points
//!
//! - **Input Sources**: [`lb_amm::AllocationPlan`] and [`lb_amm::RemovalPlan`], swap parameters, viewing keys
//! - **Pair Resolution**: [`factory::resolve_pair_contract`] asks the factory which contract serves a pair
//! - **Output Destinations**: Any [`Broadcaster`] / [`QueryClient`] implementation
//! - **Failure Reporting**: Non-zero status codes become [`lb_types::LbError::ContractRejected`]
//!   with the raw log verbatim; nothing is retried
//!
//! ```rust
//! use lb_contracts::{ContractMessageBuilder, ExecuteMsg};
//! use lb_amm::U256;
//!
//! let msg = ContractMessageBuilder::swap(true, Some("secret1recipient"), U256::from(1_000u32)).unwrap();
//! assert!(matches!(msg, ExecuteMsg::Swap { swap_for_y: true, .. }));
//! ```

pub mod builder;
pub mod client;
pub mod factory;
pub mod msg;

pub use builder::ContractMessageBuilder;
pub use client::{submit_checked, Broadcaster, QueryClient, TxOutcome, TxRequest, TxResponse};
pub use factory::{pair_information, preset, resolve_pair_contract};
pub use msg::{
    ExecuteMsg, LbPair, LbPairInformation, LbPairInformationResponse, LiquidityParameters,
    PresetResponse, QueryAnswer, QueryMsg, RemoveLiquidityParams,
};
