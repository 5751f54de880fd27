//! Timer-driven tests for the keep-alive pinger; tokio's clock is paused so
//! intervals elapse instantly and deterministically.

use std::sync::{Arc, Mutex};

use textadv_client::{
    KeepAlive, MemoryScreen, ScriptedTransport, SessionId, SharedScreen, TransportError,
    CONNECTION_LOST_NOTICE, DEFAULT_PING_INTERVAL,
};
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

fn keep_alive(transport: &ScriptedTransport, screen: &Arc<Mutex<MemoryScreen>>) -> KeepAlive {
    let shared: SharedScreen = screen.clone();
    KeepAlive::new(
        Arc::new(transport.clone()),
        SessionId::new("ping-session").unwrap(),
        shared,
        DEFAULT_PING_INTERVAL,
    )
}

#[tokio::test(start_paused = true)]
async fn test_pings_every_ten_seconds() {
    let transport = ScriptedTransport::new();
    let screen = Arc::new(Mutex::new(MemoryScreen::new()));
    let pinger = keep_alive(&transport, &screen);
    assert_eq!(pinger.interval(), Duration::from_secs(10));

    let cancel = CancellationToken::new();
    let task = tokio::spawn({
        let cancel = cancel.clone();
        async move { pinger.run(cancel).await }
    });

    sleep(Duration::from_secs(5)).await;
    assert!(transport.pings().is_empty(), "No ping before the first interval");

    sleep(Duration::from_secs(10)).await;
    assert_eq!(transport.pings().len(), 1);

    sleep(Duration::from_secs(30)).await;
    assert_eq!(transport.pings().len(), 4);
    assert!(transport
        .pings()
        .iter()
        .all(|s| s.as_str() == "ping-session"));

    cancel.cancel();
    task.await.unwrap();
    assert!(screen.lock().unwrap().transcript.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_ping_is_reported_and_pinging_continues() {
    let transport = ScriptedTransport::new();
    transport.push_ping_result(Err(TransportError::connection_lost("reset")));
    let screen = Arc::new(Mutex::new(MemoryScreen::new()));
    let pinger = keep_alive(&transport, &screen);

    let cancel = CancellationToken::new();
    let task = tokio::spawn({
        let cancel = cancel.clone();
        async move { pinger.run(cancel).await }
    });

    sleep(Duration::from_secs(25)).await;
    cancel.cancel();
    task.await.unwrap();

    assert_eq!(transport.pings().len(), 2);
    assert_eq!(
        screen.lock().unwrap().transcript,
        vec![CONNECTION_LOST_NOTICE.to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_ping_is_silent() {
    let transport = ScriptedTransport::new();
    transport.push_ping_result(Err(TransportError::Timeout));
    let screen = Arc::new(Mutex::new(MemoryScreen::new()));
    let pinger = keep_alive(&transport, &screen);

    let cancel = CancellationToken::new();
    let task = tokio::spawn({
        let cancel = cancel.clone();
        async move { pinger.run(cancel).await }
    });

    sleep(Duration::from_secs(25)).await;
    cancel.cancel();
    task.await.unwrap();

    assert_eq!(transport.pings().len(), 2);
    assert!(screen.lock().unwrap().transcript.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pinger_runs_after_output_loop_stopped() {
    use textadv_client::{ContainerListeners, OutputPoller, PollOutcome};

    let transport = ScriptedTransport::new();
    transport.push_output(Err(TransportError::connection_lost("gone")));
    let screen = Arc::new(Mutex::new(MemoryScreen::new()));
    let shared: SharedScreen = screen.clone();
    let poller = OutputPoller::new(
        Arc::new(transport.clone()),
        SessionId::new("ping-session").unwrap(),
        shared,
        Arc::new(ContainerListeners::new()),
    );
    let pinger = keep_alive(&transport, &screen);

    let cancel = CancellationToken::new();
    let ping_task = tokio::spawn({
        let cancel = cancel.clone();
        async move { pinger.run(cancel).await }
    });

    assert!(matches!(
        poller.run(cancel.clone()).await,
        PollOutcome::ConnectionLost(_)
    ));
    sleep(Duration::from_secs(21)).await;
    assert_eq!(transport.pings().len(), 2);

    cancel.cancel();
    ping_task.await.unwrap();
}
