//! Subcommand handlers. Every handler is offline and returns the text to print.

use super::{
    ActiveBinArgs, AddLiquidityArgs, AmountArgs, CreatePairArgs, IdToPriceArgs, PairArgs,
    PriceToIdArgs, RemoveLiquidityArgs, ShapeKind, SwapArgs,
};
use anyhow::{bail, Context as _, Result};
use lb_amm::{
    BinPosition, BinPriceCodec, FixedPointConverter, LiquidityAllocationCompiler, LiquidityIntent,
    RemovalIntent, Shape, U256,
};
use lb_config::Settings;
use lb_contracts::{ContractMessageBuilder, ExecuteMsg, QueryMsg};
use lb_types::{BinId, ContractRef, Pair, Token, TokenRegistry};
use serde::Serialize;
use tracing::info;

/// A message plus what a broadcaster needs to send it
#[derive(Serialize)]
struct Envelope {
    contract: Option<ContractRef>,
    gas_limit: u64,
    msg: ExecuteMsg,
}

/// A query plus the contract it is addressed to
#[derive(Serialize)]
struct QueryEnvelope {
    contract: Option<ContractRef>,
    query: QueryMsg,
}

pub struct Context {
    pub settings: Settings,
    registry: TokenRegistry,
}

impl Context {
    pub fn new(settings: Settings) -> Result<Self> {
        let registry = settings.token_registry()?;
        Ok(Self { settings, registry })
    }

    pub fn price_to_id(&self, args: PriceToIdArgs) -> Result<String> {
        let bin_step = self.bin_step(args.bin_step);
        let id = match self.decimals_of(args.tokens.as_deref())? {
            Some((dx, dy)) => BinPriceCodec::ui_price_to_id(args.price, bin_step, dx, dy)?,
            None => BinPriceCodec::price_to_id(args.price, bin_step)?,
        };
        Ok(id.to_string())
    }

    pub fn id_to_price(&self, args: IdToPriceArgs) -> Result<String> {
        let bin_step = self.bin_step(args.bin_step);
        let id = BinId::new(args.id)?;
        let price = match self.decimals_of(args.tokens.as_deref())? {
            Some((dx, dy)) => BinPriceCodec::id_to_ui_price(id, bin_step, dx, dy)?,
            None => BinPriceCodec::id_to_price(id, bin_step)?,
        };
        Ok(price.to_string())
    }

    pub fn to_machine(&self, args: AmountArgs) -> Result<String> {
        let decimals = self.amount_decimals(&args)?;
        Ok(FixedPointConverter::to_machine(&args.amount, decimals)?.to_string())
    }

    pub fn to_human(&self, args: AmountArgs, precision: Option<u8>) -> Result<String> {
        let decimals = self.amount_decimals(&args)?;
        Ok(FixedPointConverter::to_human(&args.amount, decimals, precision)?)
    }

    pub fn add_liquidity(&self, args: AddLiquidityArgs) -> Result<String> {
        let pair = self.pair(&args.pair)?;
        let active_id = self.active_id(&args.active, &pair)?;
        let shape = match args.shape {
            ShapeKind::Spot => Shape::Spot,
            ShapeKind::Uniform => Shape::Uniform { radius: args.radius },
            ShapeKind::Curve => Shape::Curve {
                radius: args.radius,
                sigma: args.sigma,
            },
        };

        let intent = LiquidityIntent {
            pair,
            amount_x: args.amount_x,
            amount_y: args.amount_y,
            spread: shape.weights()?,
            id_slippage: args.id_slippage.unwrap_or(self.settings.defaults.id_slippage),
        };
        let slippage = args.slippage_bps.unwrap_or(self.settings.defaults.slippage_bps);
        let plan = LiquidityAllocationCompiler::compile(&intent, active_id, slippage)?;
        let msg = ContractMessageBuilder::add_liquidity(&plan, self.deadline(args.deadline)?)?;

        info!(active_id = %active_id, bins = plan.bins.len(), "Built add_liquidity");
        self.envelope(self.settings.contracts.lb_router.clone(), self.settings.gas.add_liquidity, msg)
    }

    pub fn remove_liquidity(&self, args: RemoveLiquidityArgs) -> Result<String> {
        let pair = self.pair(&args.pair)?;
        let positions = args
            .positions
            .iter()
            .map(|(id, amount)| -> Result<BinPosition> {
                Ok(BinPosition {
                    bin_id: BinId::new(*id)?,
                    amount: U256::from_dec_str(amount).map_err(|_| {
                        anyhow::anyhow!("LB-token amount '{}' is not an integer", amount)
                    })?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let intent = RemovalIntent {
            expected_x: FixedPointConverter::to_machine(&args.expected_x, pair.token_x.decimals)?,
            expected_y: FixedPointConverter::to_machine(&args.expected_y, pair.token_y.decimals)?,
            pair,
            positions,
        };
        let slippage = args.slippage_bps.unwrap_or(self.settings.defaults.slippage_bps);
        let plan = LiquidityAllocationCompiler::compile_removal(&intent, slippage)?;
        let msg = ContractMessageBuilder::remove_liquidity(&plan, self.deadline(args.deadline)?)?;

        self.envelope(self.settings.contracts.lb_router.clone(), self.settings.gas.remove_liquidity, msg)
    }

    pub fn swap(&self, args: SwapArgs) -> Result<String> {
        let token = self.registry.resolve(&args.token)?;
        let amount = FixedPointConverter::to_machine(&args.amount_received, token.decimals)?;
        let msg = ContractMessageBuilder::swap(args.swap_for_y, args.to.as_deref(), amount)?;
        self.envelope(args.pair_contract, self.settings.gas.swap, msg)
    }

    pub fn create_pair(&self, args: CreatePairArgs) -> Result<String> {
        let pair = self.pair(&args.pair)?;
        let active_id = self.active_id(&args.active, &pair)?;
        let msg = ContractMessageBuilder::create_lb_pair(&pair, active_id);
        self.envelope(self.settings.contracts.lb_factory.clone(), self.settings.gas.create_pair, msg)
    }

    pub fn pair_query(&self, args: PairArgs) -> Result<String> {
        let pair = self.pair(&args)?;
        let query = ContractMessageBuilder::lb_pair_information_query(&pair);
        self.query_envelope(query)
    }

    pub fn preset_query(&self, bin_step: Option<u16>) -> Result<String> {
        let query = ContractMessageBuilder::preset_query(self.bin_step(bin_step))?;
        self.query_envelope(query)
    }

    fn query_envelope(&self, query: QueryMsg) -> Result<String> {
        let envelope = QueryEnvelope {
            contract: self.settings.contracts.lb_factory.clone(),
            query,
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    fn envelope(&self, contract: Option<ContractRef>, gas_limit: u64, msg: ExecuteMsg) -> Result<String> {
        let envelope = Envelope {
            contract,
            gas_limit,
            msg,
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    fn bin_step(&self, bin_step: Option<u16>) -> u16 {
        bin_step.unwrap_or(self.settings.defaults.bin_step)
    }

    fn token(&self, address_or_symbol: &str) -> Result<Token> {
        Ok(self.registry.resolve(address_or_symbol)?.clone())
    }

    fn pair(&self, args: &PairArgs) -> Result<Pair> {
        Ok(Pair::new(
            self.token(&args.token_x)?,
            self.token(&args.token_y)?,
            self.bin_step(args.bin_step),
        )?)
    }

    fn decimals_of(&self, tokens: Option<&[String]>) -> Result<Option<(u8, u8)>> {
        match tokens {
            Some([x, y]) => Ok(Some((self.token(x)?.decimals, self.token(y)?.decimals))),
            Some(other) => bail!("expected two tokens, got {}", other.len()),
            None => Ok(None),
        }
    }

    fn amount_decimals(&self, args: &AmountArgs) -> Result<u8> {
        match (&args.token, args.decimals) {
            (_, Some(decimals)) => Ok(decimals),
            (Some(token), None) => Ok(self.token(token)?.decimals),
            (None, None) => bail!("either --token or --decimals is required"),
        }
    }

    fn active_id(&self, args: &ActiveBinArgs, pair: &Pair) -> Result<BinId> {
        match (args.active_id, args.price) {
            (Some(id), _) => Ok(BinId::new(id)?),
            (None, Some(price)) => Ok(BinPriceCodec::ui_price_to_id(
                price,
                pair.bin_step,
                pair.token_x.decimals,
                pair.token_y.decimals,
            )?),
            (None, None) => bail!("either --price or --active-id is required"),
        }
    }

    fn deadline(&self, explicit: Option<u64>) -> Result<u64> {
        if let Some(deadline) = explicit {
            return Ok(deadline);
        }
        let now = u64::try_from(chrono::Utc::now().timestamp()).context("System clock is before 1970")?;
        Ok(now + self.settings.defaults.deadline_window_secs)
    }
}

/// `BIN_ID:AMOUNT`
pub fn parse_position(s: &str) -> std::result::Result<(u32, String), String> {
    let (id, amount) = s
        .split_once(':')
        .ok_or_else(|| format!("expected BIN_ID:AMOUNT, got '{}'", s))?;
    let id = id
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid bin id '{}': {}", id, e))?;
    Ok((id, amount.trim().to_string()))
}

/// `ADDRESS:CODE_HASH`
pub fn parse_contract(s: &str) -> std::result::Result<ContractRef, String> {
    match s.split_once(':') {
        Some((address, code_hash)) if !address.is_empty() && !code_hash.is_empty() => {
            Ok(ContractRef::new(address, code_hash))
        }
        _ => Err(format!("expected ADDRESS:CODE_HASH, got '{}'", s)),
    }
}
