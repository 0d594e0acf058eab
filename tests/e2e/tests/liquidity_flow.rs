//! Intent → plan → message → broadcaster

use lb_amm::{
    BinPosition, BinPriceCodec, FixedPointConverter, LiquidityAllocationCompiler, LiquidityIntent,
    RemovalIntent, Shape, U256,
};
use lb_contracts::{resolve_pair_contract, submit_checked, ContractMessageBuilder, TxOutcome, TxRequest};
use lb_e2e_tests::{fixture_settings, msg_json, transport_error, RecordingBroadcaster, StaticLedger};
use lb_types::{BinId, LbError, Pair};

const SENDER: &str = "secret1e4u8f8exq54n5tsfu4yh40t02n0wv0tyq7x5m8";
const DEADLINE: u64 = 999_999_999_999_999;

fn test_pair() -> Pair {
    let (_, registry) = fixture_settings();
    Pair::new(
        registry.resolve("TOKENX").unwrap().clone(),
        registry.resolve("TOKENY").unwrap().clone(),
        100,
    )
    .unwrap()
}

#[tokio::test]
async fn test_add_liquidity_end_to_end() {
    let (settings, _) = fixture_settings();
    let pair = test_pair();

    // Human price 1.0 between two 6-decimal tokens is the parity bin
    let active_id = BinPriceCodec::ui_price_to_id(1.0, pair.bin_step, 6, 6).unwrap();
    assert_eq!(active_id.value(), 8_388_608);

    let intent = LiquidityIntent {
        pair,
        amount_x: "100".into(),
        amount_y: "100".into(),
        spread: Shape::Uniform { radius: 5 }.weights().unwrap(),
        id_slippage: settings.defaults.id_slippage,
    };
    let plan =
        LiquidityAllocationCompiler::compile(&intent, active_id, settings.defaults.slippage_bps)
            .unwrap();
    let msg = ContractMessageBuilder::add_liquidity(&plan, DEADLINE).unwrap();

    let broadcaster = RecordingBroadcaster::new();
    let router = settings.contracts.lb_router.clone().unwrap();
    let response = submit_checked(
        &broadcaster,
        TxRequest {
            sender: SENDER.into(),
            contract: router.clone(),
            msg,
            gas_limit: settings.gas.add_liquidity,
        },
    )
    .await
    .unwrap();
    assert!(matches!(response.into_outcome(), TxOutcome::Success { .. }));

    let submitted = broadcaster.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].contract, router);
    assert_eq!(submitted[0].gas_limit, 2_000_000);

    let value = msg_json(&submitted[0].msg);
    let params = &value["add_liquidity"]["liquidity_parameters"];
    assert_eq!(params["amount_x"], "100000000");
    assert_eq!(params["amount_x_min"], "95000000");
    assert_eq!(params["active_id_desired"], 8_388_608);
    assert_eq!(params["id_slippage"], 100);
    assert_eq!(params["deadline"], DEADLINE);
    assert_eq!(
        params["token_x"]["custom_token"]["contract_addr"],
        "secret1jm4t9at03y2ffxwqlek9la58m90y7wvr8fvt5x"
    );

    // Each side's distribution sums to at most 1e18 and deposits stay within the desired amount
    for side in ["distribution_x", "distribution_y"] {
        let total: u128 = params[side]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().parse::<u128>().unwrap())
            .sum();
        assert!(total <= 1_000_000_000_000_000_000);
        assert!(total > 999_999_999_999_999_000);
    }
    let (dx, dy) = plan.total_deposits();
    assert!(dx <= plan.amount_x && dy <= plan.amount_y);
}

#[tokio::test]
async fn test_identical_plan_resubmits_identically() {
    let pair = test_pair();
    let intent = LiquidityIntent {
        pair,
        amount_x: "12.345678".into(),
        amount_y: "0".into(),
        spread: Shape::Curve { radius: 4, sigma: 1.5 }.weights().unwrap(),
        id_slippage: 10,
    };

    let broadcaster = RecordingBroadcaster::new();
    broadcaster.push_response(transport_error("connection reset by peer"));

    let build = || {
        let plan = LiquidityAllocationCompiler::compile(&intent, BinId::CENTER, 100).unwrap();
        TxRequest {
            sender: SENDER.into(),
            contract: lb_types::ContractRef::new("secret1router", "hash"),
            msg: ContractMessageBuilder::add_liquidity(&plan, DEADLINE).unwrap(),
            gas_limit: 2_000_000,
        }
    };

    // First attempt fails in transport; the core does not retry on its own
    let first = submit_checked(&broadcaster, build()).await;
    assert_eq!(first, Err(LbError::Transport("connection reset by peer".into())));
    assert_eq!(broadcaster.submitted().len(), 1);

    // Caller recompiles and resubmits
    submit_checked(&broadcaster, build()).await.unwrap();
    let submitted = broadcaster.submitted();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0], submitted[1]);
}

#[tokio::test]
async fn test_contract_rejection_is_reported_verbatim() {
    let pair = test_pair();
    let plan = LiquidityAllocationCompiler::compile(
        &LiquidityIntent {
            pair,
            amount_x: "1".into(),
            amount_y: "1".into(),
            spread: Shape::Spot.weights().unwrap(),
            id_slippage: 0,
        },
        BinId::CENTER,
        0,
    )
    .unwrap();

    let raw_log = "failed to execute message; message index: 0: Id slippage exceeded: 8388610";
    let broadcaster = RecordingBroadcaster::new();
    broadcaster.reject_next(5, raw_log);

    let err = submit_checked(
        &broadcaster,
        TxRequest {
            sender: SENDER.into(),
            contract: lb_types::ContractRef::new("secret1router", "hash"),
            msg: ContractMessageBuilder::add_liquidity(&plan, DEADLINE).unwrap(),
            gas_limit: 2_000_000,
        },
    )
    .await
    .unwrap_err();

    assert_eq!(
        err,
        LbError::ContractRejected { code: 5, raw_log: raw_log.into(), gas_used: 50_000 }
    );
    assert!(!err.is_local());
}

#[tokio::test]
async fn test_local_validation_never_reaches_broadcaster() {
    let pair = test_pair();
    let broadcaster = RecordingBroadcaster::new();

    let empty = LiquidityIntent {
        pair: pair.clone(),
        amount_x: "0".into(),
        amount_y: "0".into(),
        spread: Shape::Spot.weights().unwrap(),
        id_slippage: 0,
    };
    let err = LiquidityAllocationCompiler::compile(&empty, BinId::CENTER, 0).unwrap_err();
    assert_eq!(err, LbError::EmptyIntent);
    assert!(err.is_local());

    let swap = ContractMessageBuilder::swap(true, None, U256::one()).unwrap_err();
    assert!(swap.is_local());

    assert!(broadcaster.submitted().is_empty());
}

#[tokio::test]
async fn test_remove_liquidity_end_to_end() {
    let pair = test_pair();
    let intent = RemovalIntent {
        expected_x: FixedPointConverter::to_machine("50", pair.token_x.decimals).unwrap(),
        expected_y: FixedPointConverter::to_machine("25.5", pair.token_y.decimals).unwrap(),
        pair,
        positions: (-2..=2)
            .map(|d| BinPosition {
                bin_id: BinId::CENTER.offset(d).unwrap(),
                amount: U256::from(1_000_000u64),
            })
            .collect(),
    };
    let plan = LiquidityAllocationCompiler::compile_removal(&intent, 500).unwrap();
    let msg = ContractMessageBuilder::remove_liquidity(&plan, DEADLINE).unwrap();

    let broadcaster = RecordingBroadcaster::new();
    submit_checked(
        &broadcaster,
        TxRequest {
            sender: SENDER.into(),
            contract: lb_types::ContractRef::new("secret1router", "hash"),
            msg,
            gas_limit: 2_000_000,
        },
    )
    .await
    .unwrap();

    let value = msg_json(&broadcaster.submitted()[0].msg);
    let params = &value["remove_liquidity"]["remove_liquidity_params"];
    assert_eq!(params["ids"].as_array().unwrap().len(), 5);
    assert_eq!(params["amount_x_min"], "47500000");
    assert_eq!(params["amount_y_min"], "24225000");
    assert_eq!(broadcaster.count("remove_liquidity"), 1);
}

#[tokio::test]
async fn test_swap_against_factory_resolved_pair() {
    let (settings, _) = fixture_settings();
    let pair = test_pair();
    let factory = settings.contracts.lb_factory.clone().unwrap();
    let pair_contract = lb_types::ContractRef::new("secret1lbpair", "9a00ca4a");
    let ledger = StaticLedger::new().with_pair(&pair, pair_contract.clone());

    let resolved = resolve_pair_contract(&ledger, &factory, &pair).await.unwrap();
    assert_eq!(resolved, pair_contract);

    let amount = FixedPointConverter::to_machine("3.5", pair.token_y.decimals).unwrap();
    let broadcaster = RecordingBroadcaster::new();
    submit_checked(
        &broadcaster,
        TxRequest {
            sender: SENDER.into(),
            contract: resolved,
            msg: ContractMessageBuilder::swap(true, Some(SENDER), amount).unwrap(),
            gas_limit: settings.gas.swap,
        },
    )
    .await
    .unwrap();

    let submitted = broadcaster.submitted();
    assert_eq!(submitted[0].contract, pair_contract);
    assert_eq!(msg_json(&submitted[0].msg)["swap"]["amount_received"], "3500000");

    // Unknown bin step: the factory refuses and nothing is submitted
    let other = Pair::new(pair.token_x.clone(), pair.token_y.clone(), 25).unwrap();
    let err = resolve_pair_contract(&ledger, &factory, &other).await.unwrap_err();
    assert!(matches!(err, LbError::ContractRejected { .. }));
}

#[test]
fn test_documented_price_scenarios() {
    assert_eq!(BinPriceCodec::price_to_id(1.0, 100).unwrap().value(), 8_388_608);
    assert_eq!(BinPriceCodec::price_to_id(1.01, 100).unwrap().value(), 8_388_609);

    // Display price is the lower edge of the bin, not the input
    let id = BinPriceCodec::price_to_id(1.015, 100).unwrap();
    let shown = BinPriceCodec::id_to_price(id, 100).unwrap();
    assert!(shown <= 1.015 && (1.015 - shown) < 0.0101);
}
