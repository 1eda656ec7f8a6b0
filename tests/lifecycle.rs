//! Lifecycle controller runs against an in-process relay.

mod support;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::oneshot;

use support::*;
use yaruo_bot::agent::messages::STARTUP;
use yaruo_bot::agent::{Lifecycle, LifecycleState, ShutdownSignal};
use yaruo_bot::error::{Error, RelayError};
use yaruo_bot::relay::{InboundEvent, OutboundKind};

type ShutdownFuture = Pin<Box<dyn Future<Output = ShutdownSignal> + Send>>;

/// A shutdown hook the test fires by hand.
fn manual_shutdown() -> (
    oneshot::Sender<ShutdownSignal>,
    impl FnOnce() -> std::io::Result<ShutdownFuture>,
) {
    let (tx, rx) = oneshot::channel();
    let install = move || -> std::io::Result<ShutdownFuture> {
        Ok(Box::pin(async move {
            rx.await.unwrap_or(ShutdownSignal::Terminate)
        }))
    };
    (tx, install)
}

async fn wait_for_state(
    rx: &mut tokio::sync::watch::Receiver<LifecycleState>,
    want: LifecycleState,
) {
    tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|s| *s == want))
        .await
        .expect("timed out waiting for state")
        .expect("lifecycle dropped");
}

#[tokio::test]
async fn full_session_from_startup_to_farewell() {
    let mut handle = RecordingRelay::new();
    let fx = build_bot(
        handle.relay.clone(),
        StubLlm::replying("やあ"),
        StubNews::with_items(vec![]),
        StubExtractor::returning("body"),
    );

    let lifecycle = Lifecycle::new(handle.relay.clone(), fx.bot.clone());
    let mut states = lifecycle.watch_state();
    assert_eq!(lifecycle.state(), LifecycleState::Disconnected);

    let (fire, install) = manual_shutdown();
    let run = tokio::spawn(lifecycle.run(install));

    let startup = next_published(&mut handle.published).await;
    assert_eq!(startup.kind, OutboundKind::Post);
    assert_eq!(startup.content, STARTUP);

    wait_for_state(&mut states, LifecycleState::Subscribed).await;

    handle
        .inbound
        .send(InboundEvent::text_note("e1", "alice", "help"))
        .unwrap();
    let reply = next_published(&mut handle.published).await;
    assert_eq!(reply.kind, OutboundKind::Reply);

    fire.send(ShutdownSignal::Hangup).unwrap();
    let farewell = next_published(&mut handle.published).await;
    assert_eq!(farewell.kind, OutboundKind::Post);
    assert_eq!(farewell.content, "寝るお。(SIGHUP)");

    let outcome = tokio::time::timeout(Duration::from_secs(1), run)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.unwrap(), ShutdownSignal::Hangup);
    assert_eq!(*states.borrow(), LifecycleState::Terminating);
}

#[tokio::test]
async fn connect_failure_is_fatal_and_silent() {
    let handle = RecordingRelay::failing_connect();
    let fx = build_bot(
        handle.relay.clone(),
        StubLlm::replying("unused"),
        StubNews::with_items(vec![]),
        StubExtractor::returning("body"),
    );

    let (_fire, install) = manual_shutdown();
    let err = Lifecycle::new(handle.relay.clone(), fx.bot.clone())
        .run(install)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Relay(RelayError::ConnectFailed { .. })));
    assert!(handle.relay.published().is_empty());
}

#[tokio::test]
async fn signal_install_failure_is_fatal() {
    let handle = RecordingRelay::new();
    let fx = build_bot(
        handle.relay.clone(),
        StubLlm::replying("unused"),
        StubNews::with_items(vec![]),
        StubExtractor::returning("body"),
    );

    let install = || -> std::io::Result<std::future::Pending<ShutdownSignal>> {
        Err(std::io::Error::other("no signals here"))
    };
    let err = Lifecycle::new(handle.relay.clone(), fx.bot.clone())
        .run(install)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Io(_)));
}

#[tokio::test]
async fn closed_stream_ends_with_error() {
    let mut handle = RecordingRelay::new();
    let fx = build_bot(
        handle.relay.clone(),
        StubLlm::replying("unused"),
        StubNews::with_items(vec![]),
        StubExtractor::returning("body"),
    );

    let (_fire, install) = manual_shutdown();
    let run = tokio::spawn(Lifecycle::new(handle.relay.clone(), fx.bot.clone()).run(install));

    next_published(&mut handle.published).await;
    drop(handle.inbound);

    let outcome = tokio::time::timeout(Duration::from_secs(1), run)
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(outcome, Err(Error::Relay(RelayError::Closed))));
}

#[tokio::test]
async fn initial_news_posted_after_subscribing() {
    let mut handle = RecordingRelay::new();
    let fx = build_bot(
        handle.relay.clone(),
        StubLlm::replying("要約"),
        StubNews::with_items(vec![item(7)]),
        StubExtractor::returning("body"),
    );

    let (fire, install) = manual_shutdown();
    let run = tokio::spawn(Lifecycle::new(handle.relay.clone(), fx.bot.clone()).run(install));

    assert_eq!(next_published(&mut handle.published).await.content, STARTUP);
    let news = next_published(&mut handle.published).await;
    assert_eq!(news.kind, OutboundKind::Post);
    assert!(news.content.contains("https://news.example/7"));

    fire.send(ShutdownSignal::Interrupt).unwrap();
    let outcome = tokio::time::timeout(Duration::from_secs(1), run)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.unwrap(), ShutdownSignal::Interrupt);
}

#[tokio::test]
async fn shutdown_does_not_wait_for_busy_handlers() {
    let mut handle = RecordingRelay::new();
    let llm = StubLlm::hanging();
    let fx = build_bot(
        handle.relay.clone(),
        llm.clone(),
        StubNews::with_items(vec![]),
        StubExtractor::returning("body"),
    );

    let lifecycle = Lifecycle::new(handle.relay.clone(), fx.bot.clone());
    let mut states = lifecycle.watch_state();
    let (fire, install) = manual_shutdown();
    let run = tokio::spawn(lifecycle.run(install));

    next_published(&mut handle.published).await;
    wait_for_state(&mut states, LifecycleState::Subscribed).await;

    handle
        .inbound
        .send(InboundEvent::text_note("e1", "alice", "こんにちは"))
        .unwrap();
    // Let the handler reach the model and park there.
    tokio::time::timeout(Duration::from_secs(1), async {
        while llm.prompts().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("handler never reached the model");

    fire.send(ShutdownSignal::Interrupt).unwrap();
    let farewell = next_published(&mut handle.published).await;
    assert_eq!(farewell.content, "寝るお。(SIGINT)");

    let outcome = tokio::time::timeout(Duration::from_millis(500), run)
        .await
        .expect("run waited on an in-flight handler")
        .unwrap();
    assert_eq!(outcome.unwrap(), ShutdownSignal::Interrupt);
}
