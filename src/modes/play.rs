use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};

use crate::game::{Command, GameConfig, GameEngine, GameEvent, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::Renderer;

/// The single tick scheduler: at most one interval handle exists at a
/// time, and a stopped timer pends forever so it never wins the select.
struct TickTimer {
    interval: Option<tokio::time::Interval>,
    period: Option<Duration>,
}

impl TickTimer {
    fn stopped() -> Self {
        Self {
            interval: None,
            period: None,
        }
    }

    /// Arm the timer. Re-arming drops the previous handle and schedules
    /// the first fire one full period out, so a speed change neither
    /// double-ticks nor skips a beat.
    fn start(&mut self, period: Duration) {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
        self.period = Some(period);
    }

    fn stop(&mut self) {
        self.interval = None;
        self.period = None;
    }

    fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    fn period(&self) -> Option<Duration> {
        self.period
    }

    async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

pub struct PlayMode {
    engine: GameEngine,
    state: GameState,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let mut engine = match seed {
            Some(seed) => GameEngine::with_seed(config, seed),
            None => GameEngine::new(config),
        }
        .context("Invalid game configuration")?;
        let state = engine.reset().context("Failed to build initial session")?;

        Ok(Self {
            engine,
            state,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run session loop with cleanup
        let result = self.run_session_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_session_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = TickTimer::stopped();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer)?;
                    }
                }

                // Automatic advance while the session is running
                _ = tick_timer.tick() => {
                    self.advance(&mut tick_timer)?;
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, timer: &mut TickTimer) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Command(command) => self.handle_command(command, timer)?,
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn handle_command(&mut self, command: Command, timer: &mut TickTimer) -> Result<()> {
        match command {
            Command::SetDirection(direction) => {
                self.engine.set_direction(&mut self.state, direction);
                // Steering while stopped also starts the run; the engine
                // ignores it once the session has ended
                if !self.state.is_running() {
                    self.start_playing(timer);
                }
            }
            Command::Play => self.start_playing(timer),
            Command::Pause => {
                if self.engine.pause(&mut self.state) {
                    timer.stop();
                }
            }
            Command::Restart => self.restart(timer)?,
        }

        Ok(())
    }

    fn start_playing(&mut self, timer: &mut TickTimer) {
        if let Some(period) = self.engine.play(&mut self.state, None) {
            timer.start(period);
        }
    }

    fn restart(&mut self, timer: &mut TickTimer) -> Result<()> {
        // Cancel the timer before the swap so no tick can observe a
        // half-built session
        timer.stop();
        self.state = self.engine.reset()?;
        self.metrics.on_session_start();
        Ok(())
    }

    fn advance(&mut self, timer: &mut TickTimer) -> Result<()> {
        let result = self.engine.step(&mut self.state)?;

        match result.event {
            Some(GameEvent::BonusCollected { .. }) => {
                // The score may have crossed a speed bracket; re-arm the
                // single timer at the new interval
                if timer.period() != Some(result.tick_interval) {
                    timer.start(result.tick_interval);
                }
            }
            Some(GameEvent::GameOver { score }) => {
                self.metrics.on_game_over(score);
                timer.stop();
            }
            None => {}
        }

        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, PlayState, Position};

    #[test]
    fn test_session_initialization() {
        let mode = PlayMode::new(GameConfig::default(), Some(7)).unwrap();
        assert_eq!(mode.state.play_state, PlayState::Idle);
        assert_eq!(mode.state.score, 0);
    }

    #[tokio::test]
    async fn test_commands_drive_session_and_timer() {
        let mut mode = PlayMode::new(GameConfig::small(), Some(7)).unwrap();
        let mut timer = TickTimer::stopped();

        mode.handle_command(Command::Play, &mut timer).unwrap();
        assert!(mode.state.is_running());
        assert!(timer.is_running());
        assert_eq!(timer.period(), Some(Duration::from_millis(500)));

        mode.handle_command(Command::Pause, &mut timer).unwrap();
        assert_eq!(mode.state.play_state, PlayState::Paused);
        assert!(!timer.is_running());

        // Steering while paused resumes the run
        mode.handle_command(Command::SetDirection(Direction::Down), &mut timer)
            .unwrap();
        assert_eq!(mode.state.direction, Direction::Down);
        assert!(mode.state.is_running());
        assert!(timer.is_running());

        mode.handle_command(Command::Restart, &mut timer).unwrap();
        assert_eq!(mode.state.play_state, PlayState::Idle);
        assert_eq!(mode.state.score, 0);
        assert!(!timer.is_running());
    }

    #[tokio::test]
    async fn test_bonus_pickup_rearms_timer() {
        let mut mode = PlayMode::new(GameConfig::small(), Some(7)).unwrap();
        let mut timer = TickTimer::stopped();

        let ahead = Position::new(0, 1).index(5);
        mode.state.hazards.remove(&ahead);
        mode.state.bonus = ahead;

        mode.handle_command(Command::Play, &mut timer).unwrap();
        assert_eq!(timer.period(), Some(Duration::from_millis(500)));

        mode.advance(&mut timer).unwrap();
        assert_eq!(mode.state.score, 1);
        assert_eq!(timer.period(), Some(Duration::from_millis(400)));
    }

    #[tokio::test]
    async fn test_game_over_stops_timer_and_keeps_score_visible() {
        let mut mode = PlayMode::new(GameConfig::small(), Some(7)).unwrap();
        let mut timer = TickTimer::stopped();

        mode.state.hazards = [Position::new(0, 1).index(5)].into_iter().collect();
        mode.state.score = 2;
        mode.handle_command(Command::Play, &mut timer).unwrap();

        mode.advance(&mut timer).unwrap();

        assert!(mode.state.is_game_over());
        assert!(!timer.is_running());
        assert_eq!(mode.metrics.best_score, 2);
        assert_eq!(mode.metrics.sessions_played, 1);
        // The final score stays on the state until an explicit restart
        assert_eq!(mode.state.score, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_timer_never_fires() {
        let mut timer = TickTimer::stopped();
        let fired = tokio::time::timeout(Duration::from_secs(5), timer.tick()).await;
        assert!(fired.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_once_per_period() {
        let mut timer = TickTimer::stopped();
        timer.start(Duration::from_millis(200));

        let before = Instant::now();
        timer.tick().await;
        timer.tick().await;
        assert_eq!(before.elapsed(), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_switches_period_without_double_tick() {
        let mut timer = TickTimer::stopped();
        timer.start(Duration::from_millis(500));
        timer.tick().await;

        let before = Instant::now();
        timer.start(Duration::from_millis(100));
        timer.tick().await;
        // The re-armed timer waits one full new period: no immediate fire
        // from the replaced handle
        assert_eq!(before.elapsed(), Duration::from_millis(100));
    }
}
