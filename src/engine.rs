//! Simulation thread driver
//!
//! One thread owns the `GameState` and runs fixed ticks, sleeping the rest of
//! each tick slot. Frames go to the UI side through a `FrameSlot`; only the
//! very first frame is waited for, later frames may be dropped.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::SimError;
use crate::input::InputReceiver;
use crate::renderer::{RenderSink, WorldSnapshot};
use crate::settings::Settings;
use crate::sim::{GameState, tick};

#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    pub tick_rate_hz: u32,
    /// Stop after this many ticks (runs until the slot closes otherwise)
    pub max_ticks: Option<u64>,
    pub first_frame_timeout: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), None)
    }
}

impl LoopConfig {
    pub fn from_settings(settings: &Settings, max_ticks: Option<u64>) -> Self {
        Self {
            tick_rate_hz: settings.tick_rate_hz,
            max_ticks,
            first_frame_timeout: Duration::from_millis(settings.first_frame_timeout_ms),
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }
}

/// Slot-aligned tick timing: ticks start on multiples of the period measured
/// from the clock start, so sleeping never accumulates drift.
#[derive(Debug, Clone)]
pub struct TickClock {
    start: Instant,
    period: Duration,
}

impl TickClock {
    pub fn new(period: Duration) -> Self {
        Self {
            start: Instant::now(),
            period,
        }
    }

    /// Time left in the slot that contains `now`
    pub fn remaining(&self, now: Instant) -> Duration {
        remaining_in_slot(now.saturating_duration_since(self.start), self.period)
    }

    pub fn sleep_until_next_slot(&self) {
        thread::sleep(self.remaining(Instant::now()));
    }
}

/// Time from `elapsed` to the next multiple of `period`
pub fn remaining_in_slot(elapsed: Duration, period: Duration) -> Duration {
    let period_nanos = period.as_nanos();
    if period_nanos == 0 {
        return Duration::ZERO;
    }
    let into_slot = elapsed.as_nanos() % period_nanos;
    let remaining = period_nanos - into_slot;
    Duration::from_nanos(u64::try_from(remaining).unwrap_or(u64::MAX))
}

#[derive(Debug, Default)]
struct SlotState {
    frame: Option<WorldSnapshot>,
    render_due: bool,
    frames_rendered: u64,
    closed: bool,
}

/// Hand-off point between the simulation and the renderer
#[derive(Debug, Default)]
pub struct FrameSlot {
    state: Mutex<SlotState>,
    changed: Condvar,
}

impl FrameSlot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // A panic on the other side must not take this side down with it
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the pending frame and mark a render as due
    pub fn publish(&self, snapshot: WorldSnapshot) {
        let mut state = self.lock();
        state.frame = Some(snapshot);
        state.render_due = true;
        self.changed.notify_all();
    }

    /// Take the pending frame, if a render is due
    pub fn take_due(&self) -> Option<WorldSnapshot> {
        let mut state = self.lock();
        if !state.render_due {
            return None;
        }
        state.render_due = false;
        state.frame.take()
    }

    /// Wait up to `timeout` for a due frame
    pub fn wait_due(&self, timeout: Duration) -> Option<WorldSnapshot> {
        let state = self.lock();
        let (mut state, _) = self
            .changed
            .wait_timeout_while(state, timeout, |s| !s.render_due && !s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        if !state.render_due {
            return None;
        }
        state.render_due = false;
        state.frame.take()
    }

    pub fn mark_rendered(&self) {
        let mut state = self.lock();
        state.frames_rendered += 1;
        self.changed.notify_all();
    }

    pub fn frames_rendered(&self) -> u64 {
        self.lock().frames_rendered
    }

    /// Wait until at least one frame has been rendered. Returns false on
    /// timeout or when the slot was closed first.
    pub fn wait_first_frame(&self, timeout: Duration) -> bool {
        let state = self.lock();
        let (state, _) = self
            .changed
            .wait_timeout_while(state, timeout, |s| s.frames_rendered == 0 && !s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        state.frames_rendered > 0
    }

    /// Stop both sides
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        self.changed.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

/// Run ticks until `max_ticks`, the slot closes, or a simulation error.
/// Returns the final state. The slot is always closed on return.
pub fn run_simulation(
    mut state: GameState,
    mut input: InputReceiver,
    slot: Arc<FrameSlot>,
    config: LoopConfig,
) -> Result<GameState, SimError> {
    log::info!(
        "Simulation started at {} Hz{}",
        config.tick_rate_hz,
        config
            .max_ticks
            .map(|n| format!(", {} ticks", n))
            .unwrap_or_default()
    );

    let clock = TickClock::new(config.tick_period());
    let mut first_frame = true;

    loop {
        if slot.is_closed() {
            log::info!("Frame slot closed, stopping simulation");
            break;
        }
        if config.max_ticks.is_some_and(|max| state.time_ticks() >= max) {
            break;
        }

        let tick_input = input.drain();
        if let Err(e) = tick(&mut state, &tick_input) {
            log::error!("Simulation stopped at tick {}: {}", state.time_ticks(), e);
            slot.close();
            return Err(e);
        }

        slot.publish(WorldSnapshot::from(&state.world));
        if first_frame {
            first_frame = false;
            if !slot.wait_first_frame(config.first_frame_timeout) {
                log::warn!("First frame was not rendered in time, continuing");
            }
        }

        clock.sleep_until_next_slot();
    }

    log::info!("Simulation finished after {} ticks", state.time_ticks());
    slot.close();
    Ok(state)
}

/// Start `run_simulation` on its own thread
pub fn spawn_simulation(
    state: GameState,
    input: InputReceiver,
    slot: Arc<FrameSlot>,
    config: LoopConfig,
) -> std::io::Result<JoinHandle<Result<GameState, SimError>>> {
    thread::Builder::new()
        .name("simulation".to_string())
        .spawn(move || run_simulation(state, input, slot, config))
}

/// UI side: draw due frames until the slot closes. Returns frames drawn.
pub fn render_until_closed(slot: &FrameSlot, sink: &mut dyn RenderSink) -> u64 {
    let mut drawn = 0;
    loop {
        match slot.wait_due(Duration::from_millis(2)) {
            Some(snapshot) => {
                sink.render(&snapshot);
                slot.mark_rendered();
                drawn += 1;
            }
            None if slot.is_closed() => break,
            None => {}
        }
    }
    // Last published frame
    if let Some(snapshot) = slot.take_due() {
        sink.render(&snapshot);
        slot.mark_rendered();
        drawn += 1;
    }
    drawn
}
