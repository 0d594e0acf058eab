//! Viewing key lifecycle against the recording broadcaster

use futures::future::join_all;
use lb_e2e_tests::{fixture_settings, msg_json, RecordingBroadcaster, StaticLedger};
use lb_session::{KeyState, SessionOptions, ViewingKeySession};
use lb_types::LbError;
use std::sync::Arc;
use std::time::Duration;

const ACCOUNT: &str = "secret1e4u8f8exq54n5tsfu4yh40t02n0wv0tyq7x5m8";

fn connect(broadcaster: Arc<RecordingBroadcaster>) -> (Arc<ViewingKeySession>, String, String) {
    let (settings, registry) = fixture_settings();
    let sscrt = registry.resolve("sSCRT").unwrap().address.clone();
    let shd = registry.resolve("SHD").unwrap().address.clone();
    let options = SessionOptions {
        gas_limit: settings.gas.set_viewing_key,
        padding: settings.defaults.viewing_key_padding.clone(),
    };
    (
        Arc::new(ViewingKeySession::new(Arc::new(registry), broadcaster, options)),
        sscrt,
        shd,
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_requests_share_one_issuance() {
    let broadcaster = Arc::new(RecordingBroadcaster::with_latency(Duration::from_millis(50)));
    let (session, sscrt, shd) = connect(broadcaster.clone());

    let mut tasks = Vec::new();
    for i in 0..16 {
        let session = session.clone();
        let token = if i % 2 == 0 { sscrt.clone() } else { shd.clone() };
        tasks.push(tokio::spawn(async move { session.request(&token, ACCOUNT).await }));
    }
    let keys: Vec<String> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    // One set_viewing_key per token, not per caller
    assert_eq!(broadcaster.count("set_viewing_key"), 2);
    assert!(keys.iter().step_by(2).all(|k| *k == keys[0]));
    assert!(keys.iter().skip(1).step_by(2).all(|k| *k == keys[1]));
    assert_ne!(keys[0], keys[1]);

    let submitted = broadcaster.submitted();
    for request in &submitted {
        assert_eq!(request.gas_limit, 40_000);
        let value = msg_json(&request.msg);
        assert_eq!(value["set_viewing_key"]["padding"], "one amber club");
        assert_eq!(value["set_viewing_key"]["key"].as_str().unwrap().len(), 64);
    }
}

#[tokio::test]
async fn test_balance_requires_explicit_request() {
    let broadcaster = Arc::new(RecordingBroadcaster::new());
    let (session, _, shd) = connect(broadcaster.clone());
    let ledger = StaticLedger::new().with_balance(&shd, ACCOUNT, "250000000");

    // No implicit issuance
    assert!(matches!(
        session.balance(&shd, ACCOUNT, &ledger).await,
        Err(LbError::KeyNotFound { .. })
    ));
    assert!(broadcaster.submitted().is_empty());

    session.request(&shd, ACCOUNT).await.unwrap();
    assert_eq!(session.balance(&shd, ACCOUNT, &ledger).await.unwrap(), "2.5");
}

#[tokio::test]
async fn test_rejected_issuance_can_be_requested_again() {
    let broadcaster = Arc::new(RecordingBroadcaster::new());
    broadcaster.reject_next(11, "out of gas");
    let (session, sscrt, _) = connect(broadcaster.clone());

    let err = session.request(&sscrt, ACCOUNT).await.unwrap_err();
    assert!(matches!(err, LbError::ContractRejected { code: 11, .. }));
    assert_eq!(session.state(&sscrt, ACCOUNT), KeyState::Unissued);
    assert_eq!(broadcaster.submitted().len(), 1);

    session.request(&sscrt, ACCOUNT).await.unwrap();
    assert_eq!(session.state(&sscrt, ACCOUNT), KeyState::Cached);
    assert_eq!(broadcaster.submitted().len(), 2);
}

#[tokio::test]
async fn test_revoked_key_is_dropped_and_reissued() {
    let broadcaster = Arc::new(RecordingBroadcaster::new());
    let (session, sscrt, _) = connect(broadcaster.clone());
    let ledger = StaticLedger::new().with_balance(&sscrt, ACCOUNT, "1");

    let key = session.request(&sscrt, ACCOUNT).await.unwrap();
    assert_eq!(session.balance(&sscrt, ACCOUNT, &ledger).await.unwrap(), "0.000001");

    ledger.revoke(&key);
    assert!(matches!(
        session.balance(&sscrt, ACCOUNT, &ledger).await,
        Err(LbError::KeyNotFound { .. })
    ));
    assert_eq!(session.state(&sscrt, ACCOUNT), KeyState::Unissued);

    let fresh = session.request(&sscrt, ACCOUNT).await.unwrap();
    assert_ne!(fresh, key);
}

#[tokio::test]
async fn test_disconnect_clears_account() {
    let broadcaster = Arc::new(RecordingBroadcaster::new());
    let (session, sscrt, shd) = connect(broadcaster);

    session.request(&sscrt, ACCOUNT).await.unwrap();
    session.request(&shd, ACCOUNT).await.unwrap();
    assert_eq!(session.disconnect(ACCOUNT), 2);
    assert!(session.get(&sscrt, ACCOUNT).is_err());
}
