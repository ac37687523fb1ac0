//! Integration tests for the round timer.
//!
//! Uses `tokio::time::pause()` (via `start_paused = true`) to control
//! time deterministically — sleeps resolve instantly when the runtime
//! has nothing else to do.

use std::time::Duration;

use quizrace_timer::RoundTimer;

#[test]
fn test_new_timer_is_disarmed() {
    let timer = RoundTimer::new();
    assert!(!timer.is_armed());
}

#[tokio::test]
async fn test_arm_and_cancel() {
    let mut timer = RoundTimer::new();
    timer.arm(Duration::from_secs(5));
    assert!(timer.is_armed());

    timer.cancel();
    assert!(!timer.is_armed());

    // Cancel is idempotent.
    timer.cancel();
    assert!(!timer.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_fires_once_then_disarms() {
    let mut timer = RoundTimer::new();
    timer.arm(Duration::from_secs(5));

    timer.fired().await;
    assert!(!timer.is_armed(), "timer should disarm after firing");
}

#[tokio::test(start_paused = true)]
async fn test_disarmed_timer_pends_forever() {
    let mut timer = RoundTimer::new();

    // With the clock paused, a timeout wrapping a pending-forever future
    // elapses immediately once the runtime auto-advances.
    let result =
        tokio::time::timeout(Duration::from_secs(60), timer.fired()).await;
    assert!(result.is_err(), "disarmed timer must not fire");
}

#[tokio::test(start_paused = true)]
async fn test_rearm_replaces_deadline() {
    let mut timer = RoundTimer::new();
    timer.arm(Duration::from_secs(5));
    // Rearm with a longer delay; the 5s deadline must be gone.
    timer.arm(Duration::from_secs(30));

    let start = tokio::time::Instant::now();
    timer.fired().await;
    let elapsed = start.elapsed();

    assert!(
        elapsed >= Duration::from_secs(30),
        "fired after {elapsed:?}, expected the replaced 30s deadline"
    );
}

#[tokio::test(start_paused = true)]
async fn test_rearm_does_not_double_fire() {
    let mut timer = RoundTimer::new();
    timer.arm(Duration::from_millis(100));
    timer.arm(Duration::from_millis(200));

    timer.fired().await;

    // The original 100ms deadline was replaced, not queued: after the
    // single fire the timer is disarmed and stays silent.
    let result =
        tokio::time::timeout(Duration::from_secs(10), timer.fired()).await;
    assert!(result.is_err(), "replaced deadline must not fire again");
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_timer_does_not_fire() {
    let mut timer = RoundTimer::new();
    timer.arm(Duration::from_millis(100));
    timer.cancel();

    let result =
        tokio::time::timeout(Duration::from_secs(10), timer.fired()).await;
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_select_loop_integration() {
    // The intended usage: a select! loop that keeps processing commands
    // while the timer is pending, then observes the fire exactly once.
    let (tx, mut rx) = tokio::sync::mpsc::channel::<u32>(8);
    let mut timer = RoundTimer::new();
    timer.arm(Duration::from_secs(5));

    tx.send(1).await.unwrap();
    tx.send(2).await.unwrap();
    drop(tx);

    let mut commands = Vec::new();
    let mut drained = false;
    let mut fires = 0;

    while fires == 0 {
        tokio::select! {
            cmd = rx.recv(), if !drained => match cmd {
                Some(c) => commands.push(c),
                None => drained = true,
            },
            _ = timer.fired() => fires += 1,
        }
    }

    assert_eq!(commands, vec![1, 2]);
    assert_eq!(fires, 1);
}
