//! Tests for cancellable turn countdowns.

use ox_survival::{TimerEvent, TimerKind, TurnTimer};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

async fn next(rx: &mut UnboundedReceiver<TimerEvent>) -> TimerEvent {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("event before deadline")
        .expect("channel open")
}

#[tokio::test]
async fn test_countdown_ticks_then_elapses() {
    let (mut timer, mut rx) = TurnTimer::channel();
    let generation = timer.schedule(TimerKind::Answer, Duration::from_millis(30));

    assert_eq!(
        next(&mut rx).await,
        TimerEvent::Tick {
            kind: TimerKind::Answer,
            generation,
            remaining: 1,
        }
    );
    let elapsed = next(&mut rx).await;
    assert_eq!(
        elapsed,
        TimerEvent::Elapsed {
            kind: TimerKind::Answer,
            generation,
        }
    );
    assert!(timer.is_current(&elapsed));
}

#[tokio::test]
async fn test_superseded_countdown_never_elapses() {
    let (mut timer, mut rx) = TurnTimer::channel();
    let first = timer.schedule(TimerKind::Countdown, Duration::from_millis(40));
    let second = timer.schedule(TimerKind::Answer, Duration::from_millis(40));
    assert!(second > first);

    loop {
        let event = next(&mut rx).await;
        assert!(
            !matches!(event, TimerEvent::Elapsed { generation, .. } if generation == first),
            "superseded countdown elapsed"
        );
        if let TimerEvent::Elapsed { generation, .. } = event {
            assert_eq!(generation, second);
            break;
        }
    }

    // Nothing else is pending.
    assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());
}

#[tokio::test]
async fn test_cancelled_countdown_is_silent() {
    let (mut timer, mut rx) = TurnTimer::channel();
    timer.schedule(TimerKind::Countdown, Duration::from_millis(20));
    timer.cancel();
    assert_eq!(timer.active(), None);

    while let Ok(Some(event)) = timeout(Duration::from_millis(100), rx.recv()).await {
        assert!(matches!(event, TimerEvent::Tick { .. }), "cancelled timer elapsed");
    }
}

#[tokio::test]
async fn test_dropping_timer_closes_channel() {
    let (mut timer, mut rx) = TurnTimer::channel();
    timer.schedule(TimerKind::Answer, Duration::from_secs(5));
    drop(timer);

    let closed = timeout(Duration::from_secs(1), async {
        while rx.recv().await.is_some() {}
    })
    .await;
    assert!(closed.is_ok(), "aborted task still holds the channel");
}

#[tokio::test]
async fn test_is_current_checks_kind_and_generation() {
    let (mut timer, _rx) = TurnTimer::channel();
    let generation = timer.schedule(TimerKind::Countdown, Duration::from_secs(5));

    let current = TimerEvent::Elapsed {
        kind: TimerKind::Countdown,
        generation,
    };
    let wrong_kind = TimerEvent::Elapsed {
        kind: TimerKind::Answer,
        generation,
    };
    let stale = TimerEvent::Elapsed {
        kind: TimerKind::Countdown,
        generation: generation - 1,
    };
    assert!(timer.is_current(&current));
    assert!(!timer.is_current(&wrong_kind));
    assert!(!timer.is_current(&stale));
}
