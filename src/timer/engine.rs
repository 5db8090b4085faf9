//! Timer engine for the Pomodoro timer.
//!
//! This module provides the core timer functionality:
//! - State transitions (Stopped → Running ⇄ Paused → Stopped)
//! - Countdown derived from elapsed time, never decremented per tick
//! - Focus → short/long break → focus cycling
//! - Task accounting on natural completion and on stop with partial credit

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::types::{Settings, TaskId, TimerMode, TimerSnapshot, TimerState};

use super::clock::{Clock, SystemClock};
use super::error::{TimerError, TimerOp};
use super::TaskSink;

/// Number of focus intervals before a long break.
pub const DEFAULT_POMODOROS_PER_CYCLE: u32 = 4;

// ============================================================================
// Timer
// ============================================================================

/// The Pomodoro state machine.
///
/// `remaining` is authoritative while stopped or paused. While running it is
/// recomputed from the run anchor on every read.
#[derive(Debug, Clone)]
pub struct Timer<C: Clock = SystemClock> {
    state: TimerState,
    mode: TimerMode,
    /// Nominal length of the current interval
    duration: Duration,
    remaining: Duration,
    /// When the current running segment began
    segment_start: Option<Instant>,
    /// Elapsed time carried over from segments before the last resume
    banked: Duration,
    completed_pomodoros: u32,
    pomodoros_per_cycle: u32,
    current_task: Option<TaskId>,
    settings: Settings,
    clock: C,
}

impl Timer<SystemClock> {
    /// Creates a stopped focus timer on the system clock.
    pub fn new(settings: Settings) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> Timer<C> {
    /// Creates a stopped focus timer reading time from `clock`.
    pub fn with_clock(settings: Settings, clock: C) -> Self {
        let duration = settings.focus_duration();
        Self {
            state: TimerState::Stopped,
            mode: TimerMode::Focus,
            duration,
            remaining: duration,
            segment_start: None,
            banked: Duration::ZERO,
            completed_pomodoros: 0,
            pomodoros_per_cycle: DEFAULT_POMODOROS_PER_CYCLE,
            current_task: None,
            settings,
            clock,
        }
    }

    /// Sets how many focus intervals make up a cycle (minimum 1).
    #[must_use]
    pub fn with_pomodoros_per_cycle(mut self, count: u32) -> Self {
        self.pomodoros_per_cycle = count.max(1);
        self
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time left in the current interval, live while running.
    pub fn remaining(&self) -> Duration {
        match self.state {
            TimerState::Running => self.duration.saturating_sub(self.elapsed()),
            TimerState::Stopped | TimerState::Paused => self.remaining,
        }
    }

    pub fn completed_pomodoros(&self) -> u32 {
        self.completed_pomodoros
    }

    pub fn pomodoros_per_cycle(&self) -> u32 {
        self.pomodoros_per_cycle
    }

    pub fn current_task(&self) -> Option<TaskId> {
        self.current_task
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    /// Remaining time as `mm:ss`.
    pub fn formatted_remaining(&self) -> String {
        let secs = self.remaining().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Share of the interval already elapsed, from 0 to 100.
    pub fn progress_percentage(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        let ratio = self.remaining().as_secs_f64() / self.duration.as_secs_f64();
        (100.0 * (1.0 - ratio)).clamp(0.0, 100.0)
    }

    /// Captures the observable state for rendering.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            mode: self.mode,
            remaining_seconds: self.remaining().as_secs(),
            duration_seconds: self.duration.as_secs(),
            progress: self.progress_percentage(),
            formatted: self.formatted_remaining(),
            completed_pomodoros: self.completed_pomodoros,
            current_task: self.current_task,
        }
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Applies new settings.
    ///
    /// A stopped timer picks up the new length immediately. A running or
    /// paused interval keeps its length; the settings apply from the next one.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if self.state == TimerState::Stopped {
            self.rearm();
        }
        debug!(state = %self.state, mode = %self.mode, "settings applied");
    }

    /// Selects the task to credit, or clears it with `None`.
    pub fn set_current_task(&mut self, task: Option<TaskId>) {
        self.current_task = task;
    }

    // ------------------------------------------------------------------------
    // Control
    // ------------------------------------------------------------------------

    /// Starts a stopped timer, or resumes a paused one.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidTransition`] if already running.
    pub fn start(&mut self) -> Result<(), TimerError> {
        match self.state {
            TimerState::Paused => self.resume(),
            TimerState::Running => Err(self.invalid(TimerOp::Start)),
            TimerState::Stopped => {
                self.run_fresh();
                Ok(())
            }
        }
    }

    /// Stops the timer and re-arms the current mode.
    ///
    /// Stopping a running focus interval after at least half of it has
    /// elapsed still earns the pomodoro, crediting the time actually spent.
    pub fn stop<S>(&mut self, tasks: &mut S)
    where
        S: TaskSink + ?Sized,
    {
        if self.state == TimerState::Running && self.mode == TimerMode::Focus {
            let elapsed = self.elapsed().min(self.duration);
            if elapsed >= self.duration / 2 {
                info!(elapsed_secs = elapsed.as_secs(), "partial pomodoro credited");
                self.credit(tasks, elapsed);
            }
        }
        self.state = TimerState::Stopped;
        self.rearm();
    }

    /// Discards progress on the current interval without any credit.
    pub fn reset(&mut self) {
        self.state = TimerState::Stopped;
        self.rearm();
    }

    /// Freezes the countdown.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidTransition`] unless running.
    pub fn pause(&mut self) -> Result<(), TimerError> {
        if self.state != TimerState::Running {
            return Err(self.invalid(TimerOp::Pause));
        }
        self.remaining = self.duration.saturating_sub(self.elapsed());
        self.segment_start = None;
        self.state = TimerState::Paused;
        Ok(())
    }

    /// Continues a paused countdown from where it stopped.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidTransition`] unless paused.
    pub fn resume(&mut self) -> Result<(), TimerError> {
        if self.state != TimerState::Paused {
            return Err(self.invalid(TimerOp::Resume));
        }
        self.banked = self.duration.saturating_sub(self.remaining);
        self.segment_start = Some(self.clock.now());
        self.state = TimerState::Running;
        Ok(())
    }

    /// Abandons the current break and arms a stopped focus interval.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidTransition`] when not on a break.
    pub fn skip_break(&mut self) -> Result<(), TimerError> {
        if !self.mode.is_break() {
            return Err(self.invalid(TimerOp::SkipBreak));
        }
        self.state = TimerState::Stopped;
        self.mode = TimerMode::Focus;
        self.rearm();
        Ok(())
    }

    /// Advances the countdown. Call about once per second.
    ///
    /// Returns true exactly when the running interval completed on this call.
    /// A completed focus interval credits the full nominal duration to the
    /// current task. When breaks auto-start, the next break is already
    /// running by the time this returns.
    pub fn update<S>(&mut self, tasks: &mut S) -> bool
    where
        S: TaskSink + ?Sized,
    {
        if self.state != TimerState::Running {
            return false;
        }

        self.remaining = self.duration.saturating_sub(self.elapsed());
        if !self.remaining.is_zero() {
            return false;
        }

        self.remaining = Duration::ZERO;
        self.state = TimerState::Stopped;
        self.segment_start = None;

        let finished = self.mode;
        if finished == TimerMode::Focus {
            self.credit(tasks, self.duration);
        }
        self.advance_mode();

        info!(
            finished = %finished,
            next = %self.mode,
            completed = self.completed_pomodoros,
            "interval completed"
        );

        if self.mode.is_break() && self.settings.auto_start_breaks {
            self.run_fresh();
        }
        true
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn elapsed(&self) -> Duration {
        match self.segment_start {
            Some(start) => self.banked + self.clock.now().saturating_duration_since(start),
            None => self.banked,
        }
    }

    fn invalid(&self, attempted: TimerOp) -> TimerError {
        TimerError::InvalidTransition {
            attempted,
            state: self.state,
            mode: self.mode,
        }
    }

    fn credit<S>(&mut self, tasks: &mut S, spent: Duration)
    where
        S: TaskSink + ?Sized,
    {
        self.completed_pomodoros += 1;
        if let Some(task) = self.current_task {
            tasks.report_pomodoro_completed(&task);
            tasks.report_time_spent(&task, spent);
        }
    }

    fn advance_mode(&mut self) {
        self.mode = match self.mode {
            TimerMode::Focus => {
                if self.completed_pomodoros > 0
                    && self.completed_pomodoros % self.pomodoros_per_cycle == 0
                {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Focus,
        };
        self.rearm();
    }

    /// Re-derives the interval length for the current mode and clears progress.
    fn rearm(&mut self) {
        self.duration = self.settings.duration_for(self.mode);
        self.remaining = self.duration;
        self.banked = Duration::ZERO;
        self.segment_start = None;
    }

    fn run_fresh(&mut self) {
        self.rearm();
        self.segment_start = Some(self.clock.now());
        self.state = TimerState::Running;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::clock::ManualClock;
    use crate::timer::{MockTaskSink, TaskReport};

    const MINUTE: Duration = Duration::from_secs(60);

    fn classic_settings() -> Settings {
        Settings::default()
            .with_focus_minutes(25)
            .with_short_break_minutes(5)
            .with_long_break_minutes(15)
    }

    fn create_timer() -> (Timer<ManualClock>, ManualClock) {
        create_timer_with_settings(classic_settings())
    }

    fn create_timer_with_settings(settings: Settings) -> (Timer<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let timer = Timer::with_clock(settings, clock.clone());
        (timer, clock)
    }

    /// Runs the current interval to its natural end.
    fn complete_interval(
        timer: &mut Timer<ManualClock>,
        clock: &ManualClock,
        sink: &mut MockTaskSink,
    ) {
        if timer.state() == TimerState::Stopped {
            timer.start().unwrap();
        }
        clock.advance(timer.remaining());
        assert!(timer.update(sink));
    }

    // ------------------------------------------------------------------------
    // Construction Tests
    // ------------------------------------------------------------------------

    mod construction_tests {
        use super::*;

        #[test]
        fn test_new_timer() {
            let (timer, _clock) = create_timer();

            assert_eq!(timer.state(), TimerState::Stopped);
            assert_eq!(timer.mode(), TimerMode::Focus);
            assert_eq!(timer.duration(), 25 * MINUTE);
            assert_eq!(timer.remaining(), 25 * MINUTE);
            assert_eq!(timer.completed_pomodoros(), 0);
            assert_eq!(timer.pomodoros_per_cycle(), 4);
            assert_eq!(timer.current_task(), None);
        }

        #[test]
        fn test_pomodoros_per_cycle_has_floor_of_one() {
            let (timer, _clock) = create_timer();
            let timer = timer.with_pomodoros_per_cycle(0);
            assert_eq!(timer.pomodoros_per_cycle(), 1);
        }

        #[test]
        fn test_system_clock_constructor() {
            let timer = Timer::new(classic_settings());
            assert_eq!(timer.formatted_remaining(), "25:00");
        }
    }

    // ------------------------------------------------------------------------
    // Start / Pause / Resume Tests
    // ------------------------------------------------------------------------

    mod control_tests {
        use super::*;

        #[test]
        fn test_start() {
            let (mut timer, _clock) = create_timer();

            timer.start().unwrap();

            assert_eq!(timer.state(), TimerState::Running);
            assert_eq!(timer.remaining(), 25 * MINUTE);
        }

        #[test]
        fn test_start_already_running() {
            let (mut timer, _clock) = create_timer();
            timer.start().unwrap();

            let err = timer.start().unwrap_err();

            assert_eq!(err.attempted(), TimerOp::Start);
            assert_eq!(err.state(), TimerState::Running);
            assert_eq!(timer.state(), TimerState::Running);
        }

        #[test]
        fn test_start_picks_up_latest_settings() {
            let (mut timer, _clock) = create_timer();
            timer.start().unwrap();
            timer.set_settings(classic_settings().with_focus_minutes(50));
            timer.reset();
            timer.set_settings(classic_settings().with_focus_minutes(40));

            timer.start().unwrap();

            assert_eq!(timer.duration(), 40 * MINUTE);
        }

        #[test]
        fn test_remaining_counts_down_while_running() {
            let (mut timer, clock) = create_timer();
            timer.start().unwrap();

            clock.advance(Duration::from_secs(90));

            assert_eq!(timer.remaining(), Duration::from_secs(25 * 60 - 90));
            assert_eq!(timer.formatted_remaining(), "23:30");
        }

        #[test]
        fn test_pause() {
            let (mut timer, clock) = create_timer();
            timer.start().unwrap();
            clock.advance(10 * MINUTE);

            timer.pause().unwrap();

            assert_eq!(timer.state(), TimerState::Paused);
            assert!(timer.is_paused());
            assert!(!timer.is_running());
            assert_eq!(timer.remaining(), 15 * MINUTE);
        }

        #[test]
        fn test_pause_freezes_remaining() {
            let (mut timer, clock) = create_timer();
            timer.start().unwrap();
            clock.advance(MINUTE);
            timer.pause().unwrap();

            clock.advance(10 * MINUTE);

            assert_eq!(timer.remaining(), 24 * MINUTE);
        }

        #[test]
        fn test_pause_not_running() {
            let (mut timer, _clock) = create_timer();

            let result = timer.pause();

            assert!(result.is_err());
            assert_eq!(timer.state(), TimerState::Stopped);
            assert_eq!(timer.remaining(), 25 * MINUTE);
        }

        #[test]
        fn test_resume_continues_after_pause_gap() {
            let (mut timer, clock) = create_timer();
            timer.start().unwrap();
            clock.advance(5 * MINUTE);
            timer.pause().unwrap();
            clock.advance(30 * MINUTE); // time on pause does not count

            timer.resume().unwrap();
            clock.advance(5 * MINUTE);

            assert_eq!(timer.state(), TimerState::Running);
            assert_eq!(timer.remaining(), 15 * MINUTE);
        }

        #[test]
        fn test_pause_resume_preserves_remaining() {
            let (mut timer, clock) = create_timer();
            timer.start().unwrap();
            clock.advance(Duration::from_millis(123_456));

            let before = timer.remaining();
            timer.pause().unwrap();
            timer.resume().unwrap();

            assert_eq!(timer.remaining(), before);
        }

        #[test]
        fn test_resume_not_paused() {
            let (mut timer, _clock) = create_timer();
            timer.start().unwrap();

            let err = timer.resume().unwrap_err();

            assert_eq!(err.attempted(), TimerOp::Resume);
            assert_eq!(timer.state(), TimerState::Running);
        }

        #[test]
        fn test_start_while_paused_resumes() {
            let (mut timer, clock) = create_timer();
            timer.start().unwrap();
            clock.advance(20 * MINUTE);
            timer.pause().unwrap();

            timer.start().unwrap();

            assert_eq!(timer.state(), TimerState::Running);
            assert_eq!(timer.remaining(), 5 * MINUTE);
        }
    }

    // ------------------------------------------------------------------------
    // Stop / Reset Tests
    // ------------------------------------------------------------------------

    mod stop_tests {
        use super::*;

        #[test]
        fn test_stop_before_half_gives_no_credit() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.set_current_task(Some(TaskId::new()));
            timer.start().unwrap();
            clock.advance(Duration::from_millis(749_985)); // 49.999%

            timer.stop(&mut sink);

            assert_eq!(timer.completed_pomodoros(), 0);
            assert!(sink.reports().is_empty());
        }

        #[test]
        fn test_stop_at_exactly_half_credits_elapsed() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            let task = TaskId::new();
            timer.set_current_task(Some(task));
            timer.start().unwrap();
            clock.advance(Duration::from_secs(750));

            timer.stop(&mut sink);

            assert_eq!(timer.completed_pomodoros(), 1);
            assert_eq!(
                sink.reports(),
                &[
                    TaskReport::PomodoroCompleted(task),
                    TaskReport::TimeSpent(task, Duration::from_secs(750)),
                ]
            );
        }

        #[test]
        fn test_stop_counts_pomodoro_without_task() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.start().unwrap();
            clock.advance(20 * MINUTE);

            timer.stop(&mut sink);

            assert_eq!(timer.completed_pomodoros(), 1);
            assert!(sink.reports().is_empty());
        }

        #[test]
        fn test_stop_caps_credit_at_duration() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.set_current_task(Some(TaskId::new()));
            timer.start().unwrap();
            clock.advance(40 * MINUTE); // overdue, no tick yet

            timer.stop(&mut sink);

            assert_eq!(sink.total_time(), 25 * MINUTE);
        }

        #[test]
        fn test_stop_rearms_without_advancing_mode() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.start().unwrap();
            clock.advance(20 * MINUTE);

            timer.stop(&mut sink);

            assert_eq!(timer.state(), TimerState::Stopped);
            assert_eq!(timer.mode(), TimerMode::Focus);
            assert_eq!(timer.remaining(), timer.duration());
            assert_eq!(timer.remaining(), 25 * MINUTE);
        }

        #[test]
        fn test_stop_while_paused_gives_no_credit() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.set_current_task(Some(TaskId::new()));
            timer.start().unwrap();
            clock.advance(20 * MINUTE);
            timer.pause().unwrap();

            timer.stop(&mut sink);

            assert_eq!(timer.completed_pomodoros(), 0);
            assert!(sink.reports().is_empty());
            assert_eq!(timer.state(), TimerState::Stopped);
        }

        #[test]
        fn test_stop_during_break_gives_no_credit() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.set_current_task(Some(TaskId::new()));
            complete_interval(&mut timer, &clock, &mut sink);
            sink.clear();

            timer.start().unwrap();
            clock.advance(4 * MINUTE);
            timer.stop(&mut sink);

            assert_eq!(timer.mode(), TimerMode::ShortBreak);
            assert_eq!(timer.completed_pomodoros(), 1);
            assert!(sink.reports().is_empty());
        }

        #[test]
        fn test_stop_when_stopped_is_harmless() {
            let (mut timer, _clock) = create_timer();
            let mut sink = MockTaskSink::new();

            timer.stop(&mut sink);

            assert_eq!(timer.state(), TimerState::Stopped);
            assert_eq!(timer.remaining(), 25 * MINUTE);
        }

        #[test]
        fn test_reset_discards_progress_without_credit() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.set_current_task(Some(TaskId::new()));
            timer.start().unwrap();
            clock.advance(24 * MINUTE);

            timer.reset();

            assert_eq!(timer.state(), TimerState::Stopped);
            assert_eq!(timer.remaining(), 25 * MINUTE);
            assert_eq!(timer.completed_pomodoros(), 0);
            assert!(!timer.update(&mut sink));
            assert!(sink.reports().is_empty());
        }
    }

    // ------------------------------------------------------------------------
    // Update Tests
    // ------------------------------------------------------------------------

    mod update_tests {
        use super::*;

        #[test]
        fn test_update_when_stopped() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            clock.advance(60 * MINUTE);

            assert!(!timer.update(&mut sink));
            assert_eq!(timer.remaining(), 25 * MINUTE);
        }

        #[test]
        fn test_update_before_end() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.start().unwrap();
            clock.advance(25 * MINUTE - Duration::from_millis(1));

            assert!(!timer.update(&mut sink));
            assert_eq!(timer.state(), TimerState::Running);
        }

        #[test]
        fn test_update_completes_exactly_once() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.start().unwrap();
            clock.advance(25 * MINUTE);

            assert!(timer.update(&mut sink));
            assert!(!timer.update(&mut sink));
            assert_eq!(timer.state(), TimerState::Stopped);
        }

        #[test]
        fn test_focus_completion_moves_to_short_break() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.start().unwrap();
            clock.advance(25 * MINUTE);

            assert!(timer.update(&mut sink));

            assert_eq!(timer.mode(), TimerMode::ShortBreak);
            assert_eq!(timer.formatted_remaining(), "05:00");
            assert_eq!(timer.completed_pomodoros(), 1);
        }

        #[test]
        fn test_focus_completion_credits_full_duration() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            let task = TaskId::new();
            timer.set_current_task(Some(task));
            timer.start().unwrap();
            clock.advance(26 * MINUTE); // tick arrives late

            assert!(timer.update(&mut sink));

            assert_eq!(
                sink.reports(),
                &[
                    TaskReport::PomodoroCompleted(task),
                    TaskReport::TimeSpent(task, 25 * MINUTE),
                ]
            );
        }

        #[test]
        fn test_break_completion_returns_to_focus_without_credit() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.set_current_task(Some(TaskId::new()));
            complete_interval(&mut timer, &clock, &mut sink);
            sink.clear();

            complete_interval(&mut timer, &clock, &mut sink);

            assert_eq!(timer.mode(), TimerMode::Focus);
            assert_eq!(timer.state(), TimerState::Stopped);
            assert_eq!(timer.remaining(), 25 * MINUTE);
            assert!(sink.reports().is_empty());
        }

        #[test]
        fn test_long_break_after_four_pomodoros() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            let mut breaks = Vec::new();

            for _ in 0..4 {
                complete_interval(&mut timer, &clock, &mut sink); // focus
                breaks.push(timer.mode());
                complete_interval(&mut timer, &clock, &mut sink); // break
            }

            assert_eq!(
                breaks,
                vec![
                    TimerMode::ShortBreak,
                    TimerMode::ShortBreak,
                    TimerMode::ShortBreak,
                    TimerMode::LongBreak,
                ]
            );
            assert_eq!(timer.completed_pomodoros(), 4);
        }

        #[test]
        fn test_long_break_uses_long_duration() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            for _ in 0..3 {
                complete_interval(&mut timer, &clock, &mut sink);
                complete_interval(&mut timer, &clock, &mut sink);
            }

            complete_interval(&mut timer, &clock, &mut sink);

            assert_eq!(timer.mode(), TimerMode::LongBreak);
            assert_eq!(timer.remaining(), 15 * MINUTE);
        }

        #[test]
        fn test_custom_cycle_length() {
            let (timer, clock) = create_timer();
            let mut timer = timer.with_pomodoros_per_cycle(2);
            let mut sink = MockTaskSink::new();

            complete_interval(&mut timer, &clock, &mut sink);
            assert_eq!(timer.mode(), TimerMode::ShortBreak);
            complete_interval(&mut timer, &clock, &mut sink);

            complete_interval(&mut timer, &clock, &mut sink);
            assert_eq!(timer.mode(), TimerMode::LongBreak);
        }

        #[test]
        fn test_partial_credit_counts_toward_cycle() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            for _ in 0..3 {
                timer.start().unwrap();
                clock.advance(15 * MINUTE);
                timer.stop(&mut sink);
            }

            complete_interval(&mut timer, &clock, &mut sink);

            assert_eq!(timer.completed_pomodoros(), 4);
            assert_eq!(timer.mode(), TimerMode::LongBreak);
        }

        #[test]
        fn test_auto_start_breaks_chains_into_break() {
            let settings = classic_settings().with_auto_start_breaks(true);
            let (mut timer, clock) = create_timer_with_settings(settings);
            let mut sink = MockTaskSink::new();
            timer.start().unwrap();
            clock.advance(25 * MINUTE);

            assert!(timer.update(&mut sink));

            assert_eq!(timer.mode(), TimerMode::ShortBreak);
            assert_eq!(timer.state(), TimerState::Running);
            assert_eq!(timer.remaining(), 5 * MINUTE);

            clock.advance(MINUTE);
            assert_eq!(timer.remaining(), 4 * MINUTE);
        }

        #[test]
        fn test_auto_start_does_not_chain_into_focus() {
            let settings = classic_settings().with_auto_start_breaks(true);
            let (mut timer, clock) = create_timer_with_settings(settings);
            let mut sink = MockTaskSink::new();
            timer.start().unwrap();
            clock.advance(25 * MINUTE);
            assert!(timer.update(&mut sink));

            clock.advance(5 * MINUTE);
            assert!(timer.update(&mut sink));

            assert_eq!(timer.mode(), TimerMode::Focus);
            assert_eq!(timer.state(), TimerState::Stopped);
        }

        #[test]
        fn test_resumed_interval_completes_on_time() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.start().unwrap();
            clock.advance(10 * MINUTE);
            timer.pause().unwrap();
            clock.advance(60 * MINUTE);
            timer.resume().unwrap();

            clock.advance(15 * MINUTE - Duration::from_secs(1));
            assert!(!timer.update(&mut sink));
            clock.advance(Duration::from_secs(1));
            assert!(timer.update(&mut sink));
        }
    }

    // ------------------------------------------------------------------------
    // Skip Break Tests
    // ------------------------------------------------------------------------

    mod skip_break_tests {
        use super::*;

        #[test]
        fn test_skip_running_break() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.set_current_task(Some(TaskId::new()));
            complete_interval(&mut timer, &clock, &mut sink);
            sink.clear();
            timer.start().unwrap();
            clock.advance(4 * MINUTE);

            timer.skip_break().unwrap();

            assert_eq!(timer.mode(), TimerMode::Focus);
            assert_eq!(timer.state(), TimerState::Stopped);
            assert_eq!(timer.remaining(), 25 * MINUTE);
            assert_eq!(timer.completed_pomodoros(), 1);
            assert!(sink.reports().is_empty());
        }

        #[test]
        fn test_skip_break_during_focus_is_rejected() {
            let (mut timer, _clock) = create_timer();
            timer.start().unwrap();

            let err = timer.skip_break().unwrap_err();

            assert_eq!(err.attempted(), TimerOp::SkipBreak);
            assert_eq!(timer.mode(), TimerMode::Focus);
            assert_eq!(timer.state(), TimerState::Running);
        }
    }

    // ------------------------------------------------------------------------
    // Settings Tests
    // ------------------------------------------------------------------------

    mod settings_tests {
        use super::*;

        #[test]
        fn test_settings_change_while_stopped_applies_immediately() {
            let (mut timer, _clock) = create_timer();

            timer.set_settings(classic_settings().with_focus_minutes(50));

            assert_eq!(timer.duration(), 50 * MINUTE);
            assert_eq!(timer.remaining(), 50 * MINUTE);
        }

        #[test]
        fn test_settings_change_while_running_keeps_interval() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.start().unwrap();
            clock.advance(MINUTE);

            timer.set_settings(classic_settings().with_focus_minutes(50));

            assert_eq!(timer.duration(), 25 * MINUTE);
            assert_eq!(timer.remaining(), 24 * MINUTE);
            assert_eq!(timer.mode(), TimerMode::Focus);

            clock.advance(24 * MINUTE);
            assert!(timer.update(&mut sink));
        }

        #[test]
        fn test_settings_change_while_paused_keeps_interval() {
            let (mut timer, clock) = create_timer();
            timer.start().unwrap();
            clock.advance(5 * MINUTE);
            timer.pause().unwrap();

            timer.set_settings(classic_settings().with_focus_minutes(10));

            assert_eq!(timer.duration(), 25 * MINUTE);
            assert_eq!(timer.remaining(), 20 * MINUTE);
        }

        #[test]
        fn test_new_settings_apply_to_next_interval() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            timer.start().unwrap();
            timer.set_settings(classic_settings().with_short_break_minutes(7));
            clock.advance(25 * MINUTE);

            assert!(timer.update(&mut sink));

            assert_eq!(timer.remaining(), 7 * MINUTE);
        }
    }

    // ------------------------------------------------------------------------
    // Query Tests
    // ------------------------------------------------------------------------

    mod query_tests {
        use super::*;

        #[test]
        fn test_formatted_remaining() {
            let (mut timer, clock) = create_timer();
            assert_eq!(timer.formatted_remaining(), "25:00");

            timer.start().unwrap();
            clock.advance(Duration::from_millis(24 * 60_000 + 55_500));

            // 4.5 seconds left, truncated to whole seconds
            assert_eq!(timer.formatted_remaining(), "00:04");
        }

        #[test]
        fn test_formatted_remaining_long_interval() {
            let settings = classic_settings().with_focus_minutes(120);
            let (timer, _clock) = create_timer_with_settings(settings);
            assert_eq!(timer.formatted_remaining(), "120:00");
        }

        #[test]
        fn test_progress_is_monotonic_and_reaches_100() {
            let (mut timer, clock) = create_timer();
            timer.start().unwrap();

            let mut last = timer.progress_percentage();
            assert_eq!(last, 0.0);
            for _ in 0..25 {
                clock.advance(MINUTE);
                let progress = timer.progress_percentage();
                assert!(progress >= last);
                last = progress;
            }

            assert_eq!(last, 100.0);
        }

        #[test]
        fn test_progress_clamped_when_overdue() {
            let (mut timer, clock) = create_timer();
            timer.start().unwrap();
            clock.advance(90 * MINUTE);
            assert_eq!(timer.progress_percentage(), 100.0);
        }

        #[test]
        fn test_progress_half_way() {
            let (mut timer, clock) = create_timer();
            timer.start().unwrap();
            clock.advance(Duration::from_secs(750));
            timer.pause().unwrap();

            assert!((timer.progress_percentage() - 50.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_snapshot() {
            let (mut timer, clock) = create_timer();
            let task = TaskId::new();
            timer.set_current_task(Some(task));
            timer.start().unwrap();
            clock.advance(MINUTE);

            let snapshot = timer.snapshot();

            assert_eq!(snapshot.state, TimerState::Running);
            assert_eq!(snapshot.mode, TimerMode::Focus);
            assert_eq!(snapshot.remaining_seconds, 24 * 60);
            assert_eq!(snapshot.duration_seconds, 25 * 60);
            assert_eq!(snapshot.formatted, "24:00");
            assert_eq!(snapshot.current_task, Some(task));
        }

        #[test]
        fn test_remaining_within_bounds_after_each_operation() {
            let (mut timer, clock) = create_timer();
            let mut sink = MockTaskSink::new();
            let check = |t: &Timer<ManualClock>| assert!(t.remaining() <= t.duration());

            timer.start().unwrap();
            check(&timer);
            clock.advance(40 * MINUTE);
            check(&timer);
            timer.pause().unwrap();
            check(&timer);
            timer.resume().unwrap();
            check(&timer);
            timer.update(&mut sink);
            check(&timer);
            timer.skip_break().unwrap();
            check(&timer);
        }
    }
}
