//! # LB AMM Library - Bin-Indexed Liquidity Mathematics
//!
//! ## Purpose
//!
//! Pure, deterministic arithmetic for a liquidity-book DEX: exact conversion
//! between human and on-chain token amounts, the mapping between prices and
//! discrete bin ids, and compilation of deposit and withdrawal intents into the
//! per-bin distributions and slippage floors the pair contract expects.
//!
//! ## Integration Points
//!
//! - **Input Sources**: User intents from the CLI, active bin id from a pair query
//! - **Output Destinations**: `lb-contracts` message builder
//! - **Precision**: U256 machine amounts, `Decimal` weights, 1e18 fixed-point distributions
//! - **Validation**: Every malformed intent is rejected before any message exists
//!
//! ## Architecture Role
//!
//! Nothing in this crate performs I/O. Given the same inputs every function
//! returns the same output, which is what makes a compiled plan safe to
//! rebuild and resubmit.
//!
//! See [`architecture_diagram()`] for visual representation of the data flow.
//!
//! ```rust
//! use lb_amm::{BinPriceCodec, FixedPointConverter};
//!
//! let id = BinPriceCodec::price_to_id(1.01, 100).unwrap();
//! assert_eq!(id.value(), 8_388_609);
//!
//! let amount = FixedPointConverter::to_machine("2.5", 6).unwrap();
//! assert_eq!(amount.to_string(), "2500000");
//! ```

pub mod allocation;
pub mod bin_price;
pub mod distribution;
pub mod fixed_point;

pub use allocation::{
    slippage_floor, AllocationPlan, BinAllocation, BinPosition, LiquidityAllocationCompiler,
    LiquidityIntent, RemovalIntent, RemovalPlan,
};
pub use bin_price::BinPriceCodec;
pub use distribution::{BinWeight, Shape, PRECISION};
pub use fixed_point::FixedPointConverter;

/// Common types for amount and weight calculations
pub use primitive_types::U256;
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;

/// Architecture diagram showing how an intent becomes contract parameters
#[cfg_attr(doc, aquamarine::aquamarine)]
/// ```mermaid
/// graph LR
///     subgraph Input["📥 Intent"]
///         HA[Human Amounts]
///         SP[Spread Shape]
///         PX[Target Price]
///     end
///
///     subgraph Math["🧮 Conversion"]
///         FP[FixedPointConverter]
///         BP[BinPriceCodec]
///         DS[Distribution 1e18]
///     end
///
///     subgraph Plan["📐 Compilation"]
///         AC[LiquidityAllocationCompiler]
///         SF[Slippage Floors]
///     end
///
///     subgraph Output["📤 Contract Parameters"]
///         AP[AllocationPlan]
///         RP[RemovalPlan]
///     end
///
///     HA --> FP
///     PX --> BP
///     SP --> DS
///
///     FP --> AC
///     BP --> AC
///     DS --> AC
///     AC --> SF
///
///     AC --> AP
///     SF --> AP
///     SF --> RP
///
///     style Input fill:#e1f5fe
///     style Math fill:#fff3e0
///     style Plan fill:#f3e5f5
///     style Output fill:#e8f5e9
/// ```
pub fn architecture_diagram() {
    // This function exists solely for documentation purposes
    // The diagram is rendered by aquamarine in rustdoc
}
