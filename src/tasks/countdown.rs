//! Countdown engine background task
//!
//! One task owns the countdown state. Controls arrive as messages and ticks
//! come from an interval that is only polled while the countdown is running,
//! so a pause or stop acknowledged to the caller can never be followed by a
//! stray tick.

use std::time::Duration;
use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    display::format_hms,
    error::TimerError,
    state::{CountdownState, TimeSelection, TimerPhase},
};

type Reply = oneshot::Sender<Result<CountdownState, TimerError>>;

/// Controls accepted by a running engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    Resume,
    /// Pause when running, resume when paused
    Toggle,
    Stop,
}

impl Control {
    pub fn as_str(&self) -> &'static str {
        match self {
            Control::Pause => "pause",
            Control::Resume => "resume",
            Control::Toggle => "toggle",
            Control::Stop => "stop",
        }
    }
}

#[derive(Debug)]
enum Command {
    Start(TimeSelection, Reply),
    Control(Control, Reply),
}

/// Cheap cloneable handle to the countdown task
#[derive(Debug, Clone)]
pub struct CountdownHandle {
    commands: mpsc::Sender<Command>,
    updates: watch::Receiver<Option<CountdownState>>,
}

/// Spawn the countdown task on the current runtime
pub fn spawn_countdown(tick_interval: Duration) -> CountdownHandle {
    let (commands_tx, commands_rx) = mpsc::channel(32);
    let (updates_tx, updates_rx) = watch::channel(None);

    tokio::spawn(countdown_task(commands_rx, updates_tx, tick_interval));

    CountdownHandle {
        commands: commands_tx,
        updates: updates_rx,
    }
}

impl CountdownHandle {
    /// Start a new countdown, replacing any previous one
    pub async fn start(&self, selection: TimeSelection) -> Result<CountdownState, TimerError> {
        self.request(|reply| Command::Start(selection, reply)).await
    }

    pub async fn pause(&self) -> Result<CountdownState, TimerError> {
        self.control(Control::Pause).await
    }

    pub async fn resume(&self) -> Result<CountdownState, TimerError> {
        self.control(Control::Resume).await
    }

    pub async fn toggle(&self) -> Result<CountdownState, TimerError> {
        self.control(Control::Toggle).await
    }

    pub async fn stop(&self) -> Result<CountdownState, TimerError> {
        self.control(Control::Stop).await
    }

    pub async fn control(&self, control: Control) -> Result<CountdownState, TimerError> {
        self.request(|reply| Command::Control(control, reply)).await
    }

    /// Latest published state, if a timer was ever started
    pub fn snapshot(&self) -> Option<CountdownState> {
        self.updates.borrow().clone()
    }

    /// Receiver notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<Option<CountdownState>> {
        self.updates.clone()
    }

    async fn request<F>(&self, command: F) -> Result<CountdownState, TimerError>
    where
        F: FnOnce(Reply) -> Command,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| TimerError::EngineUnavailable)?;
        reply_rx.await.map_err(|_| TimerError::EngineUnavailable)?
    }
}

/// Own the countdown state until every handle is dropped
async fn countdown_task(
    mut commands: mpsc::Receiver<Command>,
    updates: watch::Sender<Option<CountdownState>>,
    tick_interval: Duration,
) {
    info!("Starting countdown task (tick every {:?})", tick_interval);

    let mut current: Option<CountdownState> = None;
    let mut ticker = fresh_ticker(tick_interval);

    loop {
        let running = current.as_ref().is_some_and(|state| state.phase.is_running());

        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    info!("All countdown handles dropped, stopping countdown task");
                    break;
                };
                if apply_command(&mut current, command, &updates) {
                    // Start and resume begin a new one-second sequence
                    ticker = fresh_ticker(tick_interval);
                }
            }

            _ = ticker.tick(), if running => {
                if let Some(state) = current.as_mut() {
                    let phase = state.tick();
                    debug!(
                        "Tick {}/{}: {} remaining, progress {:.3}",
                        state.elapsed_seconds,
                        state.total_seconds,
                        format_hms(state.remaining_hours, state.remaining_minutes, state.remaining_seconds),
                        state.progress
                    );
                    if phase == TimerPhase::Finished {
                        info!("Countdown finished after {}s", state.elapsed_seconds);
                    }
                }
                updates.send_replace(current.clone());
            }
        }
    }
}

/// Apply one command, reply to its sender and report whether ticking restarts
fn apply_command(
    current: &mut Option<CountdownState>,
    command: Command,
    updates: &watch::Sender<Option<CountdownState>>,
) -> bool {
    let (result, rearm, reply) = match command {
        Command::Start(selection, reply) => match CountdownState::start(selection) {
            Ok(state) => {
                info!(
                    "Countdown started: {} ({}s)",
                    format_hms(selection.hours, selection.minutes, selection.seconds),
                    state.total_seconds
                );
                *current = Some(state.clone());
                (Ok(state), true, reply)
            }
            Err(e) => (Err(e), false, reply),
        },
        Command::Control(control, reply) => match current.as_mut() {
            None => (Err(TimerError::NoActiveTimer), false, reply),
            Some(state) => {
                let outcome = apply_control(state, control);
                let rearm = outcome.is_ok() && state.phase.is_running();
                if outcome.is_ok() {
                    info!("Countdown {}: now {}", control.as_str(), state.phase.as_str());
                }
                (outcome.map(|()| state.clone()), rearm, reply)
            }
        },
    };

    match &result {
        Ok(_) => {
            updates.send_replace(current.clone());
        }
        Err(e) => warn!("Countdown command rejected: {}", e),
    }

    if reply.send(result).is_err() {
        debug!("Countdown command issuer went away before the reply");
    }

    rearm
}

fn apply_control(state: &mut CountdownState, control: Control) -> Result<(), TimerError> {
    match control {
        Control::Pause => state.pause(),
        Control::Resume => state.resume(),
        Control::Toggle if state.phase.is_running() => state.pause(),
        Control::Toggle => state.resume(),
        Control::Stop => {
            state.stop();
            Ok(())
        }
    }
}

fn fresh_ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    const SECOND: Duration = Duration::from_secs(1);

    #[tokio::test(start_paused = true)]
    async fn three_second_timer_runs_to_completion() {
        let engine = spawn_countdown(SECOND);
        let mut updates = engine.subscribe();

        let started = engine.start(TimeSelection::new(0, 0, 3)).await.unwrap();
        assert_eq!(started.phase, TimerPhase::Running);
        updates.borrow_and_update();

        let mut seen = Vec::new();
        loop {
            updates.changed().await.unwrap();
            let state = updates.borrow_and_update().clone().unwrap();
            seen.push((state.remaining_seconds, state.progress));
            if state.phase.is_terminal() {
                assert_eq!(state.phase, TimerPhase::Finished);
                break;
            }
        }

        let remaining: Vec<u32> = seen.iter().map(|(s, _)| *s).collect();
        assert_eq!(remaining, vec![2, 1, 0]);
        assert!((seen[0].1 - 0.333).abs() < 0.01);
        assert!((seen[1].1 - 0.667).abs() < 0.01);
        assert_eq!(seen[2].1, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_halts_ticks_until_resume() {
        let engine = spawn_countdown(SECOND);
        engine.start(TimeSelection::new(0, 0, 10)).await.unwrap();

        sleep(Duration::from_millis(2500)).await;
        let paused = engine.pause().await.unwrap();
        assert_eq!(paused.elapsed_seconds, 2);
        assert_eq!(paused.phase, TimerPhase::Paused);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(engine.snapshot().unwrap().elapsed_seconds, 2);

        let resumed = engine.resume().await.unwrap();
        assert_eq!(resumed.remaining_seconds, 8);

        sleep(Duration::from_millis(1500)).await;
        let state = engine.snapshot().unwrap();
        assert_eq!(state.elapsed_seconds, 3);
        assert_eq!(state.remaining_seconds, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_final() {
        let engine = spawn_countdown(SECOND);
        engine.start(TimeSelection::new(0, 1, 0)).await.unwrap();
        sleep(Duration::from_millis(1500)).await;

        let stopped = engine.stop().await.unwrap();
        assert_eq!(stopped.phase, TimerPhase::Stopped);
        assert_eq!(stopped.remaining_seconds, 59);

        assert!(matches!(
            engine.resume().await,
            Err(TimerError::InvalidTransition { action: "resume", phase: "stopped" })
        ));
        sleep(Duration::from_secs(3)).await;
        assert_eq!(engine.snapshot().unwrap().elapsed_seconds, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_switches_between_running_and_paused() {
        let engine = spawn_countdown(SECOND);
        engine.start(TimeSelection::new(0, 0, 30)).await.unwrap();
        assert_eq!(engine.toggle().await.unwrap().phase, TimerPhase::Paused);
        assert_eq!(engine.toggle().await.unwrap().phase, TimerPhase::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn controls_need_a_started_timer() {
        let engine = spawn_countdown(SECOND);
        assert_eq!(engine.pause().await, Err(TimerError::NoActiveTimer));
        assert_eq!(engine.stop().await, Err(TimerError::NoActiveTimer));
        assert!(engine.snapshot().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_start_is_rejected() {
        let engine = spawn_countdown(SECOND);
        assert_eq!(
            engine.start(TimeSelection::new(0, 0, 0)).await,
            Err(TimerError::InvalidDuration)
        );
        assert!(engine.snapshot().is_none());
    }

    #[test]
    fn control_names_match_their_endpoints() {
        let names: Vec<&str> = [Control::Pause, Control::Resume, Control::Toggle, Control::Stop]
            .iter()
            .map(Control::as_str)
            .collect();
        assert_eq!(names, vec!["pause", "resume", "toggle", "stop"]);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_timer() {
        let engine = spawn_countdown(SECOND);
        engine.start(TimeSelection::new(0, 0, 5)).await.unwrap();
        sleep(Duration::from_millis(2500)).await;

        let fresh = engine.start(TimeSelection::new(0, 2, 0)).await.unwrap();
        assert_eq!(fresh.elapsed_seconds, 0);
        assert_eq!(fresh.total_seconds, 120);

        sleep(Duration::from_millis(1500)).await;
        let state = engine.snapshot().unwrap();
        assert_eq!((state.remaining_minutes, state.remaining_seconds), (1, 59));
    }
}
