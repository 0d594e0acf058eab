use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

mod commands;

#[derive(Parser)]
#[command(name = "lbctl")]
#[command(about = "Liquidity book toolkit - conversions, bin codec and contract messages")]
#[command(version)]
struct Cli {
    /// Settings file layered over the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bin id containing a price
    PriceToId(PriceToIdArgs),
    /// Lower price edge of a bin
    IdToPrice(IdToPriceArgs),
    /// Human amount to on-chain integer
    ToMachine(AmountArgs),
    /// On-chain integer to human amount
    ToHuman {
        #[command(flatten)]
        amount: AmountArgs,
        /// Fixed number of fractional digits (rounded half-up)
        #[arg(long)]
        precision: Option<u8>,
    },
    /// Build an add_liquidity message
    AddLiquidity(AddLiquidityArgs),
    /// Build a remove_liquidity message
    RemoveLiquidity(RemoveLiquidityArgs),
    /// Build a swap message
    Swap(SwapArgs),
    /// Build a create_lb_pair message
    CreatePair(CreatePairArgs),
    /// Build the factory query that finds a pair's contract
    PairQuery(PairArgs),
    /// Build the factory query for a bin step preset
    PresetQuery {
        #[arg(long)]
        bin_step: Option<u16>,
    },
    /// Print the effective settings as TOML
    Config,
}

#[derive(Args)]
struct PriceToIdArgs {
    price: f64,
    #[arg(long)]
    bin_step: Option<u16>,
    /// Quote the price in human units of these tokens (X then Y)
    #[arg(long, num_args = 2, value_names = ["TOKEN_X", "TOKEN_Y"])]
    tokens: Option<Vec<String>>,
}

#[derive(Args)]
struct IdToPriceArgs {
    id: u32,
    #[arg(long)]
    bin_step: Option<u16>,
    #[arg(long, num_args = 2, value_names = ["TOKEN_X", "TOKEN_Y"])]
    tokens: Option<Vec<String>>,
}

#[derive(Args)]
struct AmountArgs {
    amount: String,
    /// Token symbol or address; its decimals are used
    #[arg(long, conflicts_with = "decimals", required_unless_present = "decimals")]
    token: Option<String>,
    #[arg(long)]
    decimals: Option<u8>,
}

#[derive(Args)]
struct PairArgs {
    #[arg(long)]
    token_x: String,
    #[arg(long)]
    token_y: String,
    #[arg(long)]
    bin_step: Option<u16>,
}

/// Where the active bin comes from
#[derive(Args)]
struct ActiveBinArgs {
    /// Human price of X in Y
    #[arg(long, conflicts_with = "active_id")]
    price: Option<f64>,
    #[arg(long)]
    active_id: Option<u32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeKind {
    Spot,
    Uniform,
    Curve,
}

#[derive(Args)]
struct AddLiquidityArgs {
    #[command(flatten)]
    pair: PairArgs,
    #[command(flatten)]
    active: ActiveBinArgs,
    #[arg(long, default_value = "0")]
    amount_x: String,
    #[arg(long, default_value = "0")]
    amount_y: String,
    #[arg(long, value_enum, default_value = "uniform")]
    shape: ShapeKind,
    /// Bins on each side of the active bin
    #[arg(long, default_value_t = 5)]
    radius: u32,
    /// Standard deviation in bins for the curve shape
    #[arg(long, default_value_t = 2.0)]
    sigma: f64,
    #[arg(long)]
    slippage_bps: Option<u16>,
    #[arg(long)]
    id_slippage: Option<u32>,
    /// Unix timestamp; defaults to now plus the configured window
    #[arg(long)]
    deadline: Option<u64>,
}

#[derive(Args)]
struct RemoveLiquidityArgs {
    #[command(flatten)]
    pair: PairArgs,
    /// `BIN_ID:AMOUNT` in LB-token units, repeatable
    #[arg(long = "position", required = true, value_parser = commands::parse_position)]
    positions: Vec<(u32, String)>,
    /// Human amount of X expected back
    #[arg(long, default_value = "0")]
    expected_x: String,
    #[arg(long, default_value = "0")]
    expected_y: String,
    #[arg(long)]
    slippage_bps: Option<u16>,
    #[arg(long)]
    deadline: Option<u64>,
}

#[derive(Args)]
struct SwapArgs {
    /// Sell X for Y (otherwise Y for X)
    #[arg(long)]
    swap_for_y: bool,
    /// Recipient address
    #[arg(long)]
    to: Option<String>,
    /// Human amount expected out
    #[arg(long)]
    amount_received: String,
    /// Token received; its decimals scale the amount
    #[arg(long)]
    token: String,
    /// Pair contract as `ADDRESS:CODE_HASH`, as answered by `pair-query`
    #[arg(long, value_parser = commands::parse_contract)]
    pair_contract: Option<lb_types::ContractRef>,
}

#[derive(Args)]
struct CreatePairArgs {
    #[command(flatten)]
    pair: PairArgs,
    #[command(flatten)]
    active: ActiveBinArgs,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = lb_config::Settings::load(cli.config.as_deref())?;
    debug!("Loaded {} tokens", settings.tokens.len());

    let ctx = commands::Context::new(settings)?;
    let output = match cli.command {
        Commands::PriceToId(args) => ctx.price_to_id(args)?,
        Commands::IdToPrice(args) => ctx.id_to_price(args)?,
        Commands::ToMachine(args) => ctx.to_machine(args)?,
        Commands::ToHuman { amount, precision } => ctx.to_human(amount, precision)?,
        Commands::AddLiquidity(args) => ctx.add_liquidity(args)?,
        Commands::RemoveLiquidity(args) => ctx.remove_liquidity(args)?,
        Commands::Swap(args) => ctx.swap(args)?,
        Commands::CreatePair(args) => ctx.create_pair(args)?,
        Commands::PairQuery(args) => ctx.pair_query(args)?,
        Commands::PresetQuery { bin_step } => ctx.preset_query(bin_step)?,
        Commands::Config => ctx.settings.to_toml()?,
    };

    println!("{}", output);
    Ok(())
}
