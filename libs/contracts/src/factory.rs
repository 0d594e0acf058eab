//! Factory lookups: which pair contract serves a token pair, and the preset
//! behind a bin step

use crate::builder::ContractMessageBuilder;
use crate::client::QueryClient;
use crate::msg::{LbPairInformation, LbPairInformationResponse, PresetResponse};
use lb_types::{ContractRef, LbError, Pair, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Full factory record for `pair`
pub async fn pair_information(
    client: &dyn QueryClient,
    factory: &ContractRef,
    pair: &Pair,
) -> Result<LbPairInformation> {
    let msg = ContractMessageBuilder::lb_pair_information_query(pair);
    let answer: LbPairInformationResponse = decode(client.query(factory, &msg).await?, msg.kind())?;
    let info = answer.lb_pair_information;

    if info.bin_step != pair.bin_step || info.lb_pair.bin_step != pair.bin_step {
        return Err(LbError::SchemaViolation(format!(
            "factory returned bin step {} for a {} pair",
            info.lb_pair.bin_step, pair.bin_step
        )));
    }
    Ok(info)
}

/// Address and code hash of the pair contract to swap or deposit against
pub async fn resolve_pair_contract(
    client: &dyn QueryClient,
    factory: &ContractRef,
    pair: &Pair,
) -> Result<ContractRef> {
    let info = pair_information(client, factory, pair).await?;
    debug!(
        token_x = %pair.token_x.symbol,
        token_y = %pair.token_y.symbol,
        bin_step = pair.bin_step,
        contract = %info.lb_pair.contract.address,
        "Resolved pair contract"
    );
    Ok(info.lb_pair.contract)
}

pub async fn preset(client: &dyn QueryClient, factory: &ContractRef, bin_step: u16) -> Result<PresetResponse> {
    let msg = ContractMessageBuilder::preset_query(bin_step)?;
    decode(client.query(factory, &msg).await?, msg.kind())
}

fn decode<T: DeserializeOwned>(raw: serde_json::Value, kind: &str) -> Result<T> {
    serde_json::from_value(raw)
        .map_err(|e| LbError::SchemaViolation(format!("unexpected {} answer: {}", kind, e)))
}
