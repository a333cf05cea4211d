//! End-to-end streaming session tests
//!
//! One local axum server plays the exchange: REST pair discovery plus the
//! per-pair order-book WebSocket channel.

use axum::{
    Router,
    extract::{
        Path,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use crossrate_clock::SystemClock;
use crossrate_conversion::{MemorySink, RateComputer, SnapshotStore};
use crossrate_core::{BookLevel, ConversionDirection, ConversionRoute, OrderBookSnapshot, PairId};
use crossrate_gateway::{RestPairSource, StreamConfig, StreamState};
use crossrate_ports::{Clock, SnapshotWriter};
use crossrate_runner::bootstrap::{BootstrapError, discover_pairs};
use crossrate_runner::session::{StreamingSession, rate_callback};
use rust_decimal_macros::dec;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

// ============================================================================
// Test Fixtures
// ============================================================================

const PAIRS_BODY: &str = r#"{"error":false,"errorMessage":null,"data":[
    {"name":"BTC_EUR"},{"name":"BTC_CZK"},{"name":"LTC_EUR"}
]}"#;

async fn order_book(ws: WebSocketUpgrade, Path(pair): Path<String>) -> Response {
    ws.on_upgrade(move |mut socket: WebSocket| async move {
        let frame = match pair.as_str() {
            "BTC_EUR" => {
                r#"{"event":"data","payload":{"bids":[{"price":1000,"amount":0.5}],"asks":[{"price":1010,"amount":0.7}]}}"#
            }
            "BTC_CZK" => {
                r#"{"event":"data","payload":{"bids":[{"price":25000,"amount":1.2}],"asks":[{"price":25200,"amount":0.3}]}}"#
            }
            _ => r#"{"event":"data","payload":{"bids":[{"price":80}],"asks":[{"price":81}]}}"#,
        };
        if socket.send(Message::Text(frame.to_string().into())).await.is_err() {
            return;
        }
        while let Some(Ok(_)) = socket.recv().await {}
    })
}

async fn start_exchange(pairs_body: &'static str) -> SocketAddr {
    let app = Router::new()
        .route("/api/tradingPairs", get(move || async move { pairs_body }))
        .route("/api/websocket/channel/order-book/{pair}", get(order_book));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    addr
}

fn stream_config(addr: SocketAddr) -> StreamConfig {
    StreamConfig::new(format!("ws://{}", addr))
        .with_reconnect_delay(Duration::from_millis(50))
        .with_max_reconnect_delay(Duration::from_millis(200))
        .with_ping_interval(Duration::from_millis(200))
        .with_inactivity_timeout(Duration::from_secs(5))
}

async fn wait_until(limit: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_discovery_to_rates() {
    let addr = start_exchange(PAIRS_BODY).await;

    let source = RestPairSource::new(format!("http://{}", addr), Duration::from_secs(2));
    let pairs = discover_pairs(&source, Duration::from_secs(5)).await.unwrap();
    assert_eq!(
        pairs,
        vec![
            PairId::from("BTC_CZK"),
            PairId::from("BTC_EUR"),
            PairId::from("LTC_EUR"),
        ]
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let sink = Arc::new(MemorySink::new());
    let mut session = StreamingSession::new(stream_config(addr), Arc::clone(&clock));
    let computer = Arc::new(RateComputer::new(
        session.reader(),
        sink.clone(),
        clock,
        ConversionRoute::default(),
    ));
    session.start(&pairs, Some(rate_callback(computer)));
    assert_eq!(session.pairs().len(), 3);

    assert!(wait_until(Duration::from_secs(5), || sink.len() >= 2).await);
    assert!(wait_until(Duration::from_secs(5), || session.snapshot_count() == 3).await);

    let records = sink.records();
    let forward = records
        .iter()
        .find(|r| r.direction == ConversionDirection::new("EUR", "CZK"))
        .unwrap();
    assert_eq!(forward.rate, dec!(24.75247524752475));
    assert_eq!(forward.source_bid_amount, Some(dec!(1.2)));
    assert_eq!(forward.source_ask_amount, Some(dec!(0.7)));

    let backward = records
        .iter()
        .find(|r| r.direction == ConversionDirection::new("CZK", "EUR"))
        .unwrap();
    assert_eq!(backward.rate, dec!(25.2));

    assert!(
        session
            .states()
            .iter()
            .all(|(_, state)| *state == StreamState::Connected)
    );
    let stats = session.stats(&PairId::from("BTC_EUR")).unwrap();
    assert_eq!(stats.snapshots(), 1);

    tokio::time::timeout(Duration::from_secs(3), session.shutdown(Duration::from_secs(2)))
        .await
        .expect("shutdown should be prompt");
}

#[tokio::test]
async fn test_rate_callback_on_current_thread_runtime() {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let store = Arc::new(SnapshotStore::new());
    let sink = Arc::new(MemorySink::new());
    let computer = Arc::new(RateComputer::new(
        store.clone(),
        sink.clone(),
        Arc::clone(&clock),
        ConversionRoute::default(),
    ));

    let book = |pair: &str, bid, ask| {
        OrderBookSnapshot::new(
            PairId::from(pair),
            BookLevel::price_only(bid),
            BookLevel::price_only(ask),
            clock.now(),
        )
    };
    store.replace(book("BTC_EUR", dec!(1000), dec!(1010)));
    let latest = book("BTC_CZK", dec!(25000), dec!(25200));
    store.replace(latest.clone());

    // Runs inline on a current-thread runtime
    rate_callback(computer)(&latest);
    assert_eq!(sink.len(), 2);
}

#[tokio::test]
async fn test_duplicate_pairs_are_streamed_once() {
    let addr = start_exchange(PAIRS_BODY).await;
    let mut session = StreamingSession::new(stream_config(addr), Arc::new(SystemClock::new()));

    let pair = PairId::from("BTC_EUR");
    assert!(session.spawn(pair.clone(), None));
    assert!(!session.spawn(pair.clone(), None));
    assert_eq!(session.pairs(), vec![pair]);

    session.shutdown(Duration::from_secs(2)).await;
}

#[tokio::test]
async fn test_empty_discovery_stops_bootstrap() {
    let addr = start_exchange(r#"{"error":false,"errorMessage":null,"data":[]}"#).await;

    let source = RestPairSource::new(format!("http://{}", addr), Duration::from_secs(2));
    assert!(matches!(
        discover_pairs(&source, Duration::from_secs(5)).await,
        Err(BootstrapError::NoPairs)
    ));
}

#[tokio::test]
async fn test_shutdown_while_exchange_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = StreamConfig::new(format!("ws://{}", addr))
        .with_reconnect_delay(Duration::from_secs(30))
        .with_max_reconnect_delay(Duration::from_secs(60));
    let mut session = StreamingSession::new(config, Arc::new(SystemClock::new()));
    session.start(&[PairId::from("BTC_EUR"), PairId::from("BTC_CZK")], None);

    assert!(
        wait_until(Duration::from_secs(3), || {
            session
                .states()
                .iter()
                .all(|(_, s)| matches!(s, StreamState::BackoffWait { .. }))
        })
        .await
    );

    tokio::time::timeout(Duration::from_secs(1), session.shutdown(Duration::from_secs(5)))
        .await
        .expect("backoff waits must observe cancellation");
}
