//! Session orchestration
//!
//! Wraps a `GameState` for a host: samples the input latch once per step,
//! reports the end of the session exactly once, and supports teardown.

use crate::input::InputLatch;
use crate::settings::Settings;
use crate::sim::snapshot::RenderSnapshot;
use crate::sim::{GameState, SessionOutcome, TickInput, tick};
use crate::tuning::Tuning;

type EndCallback = Box<dyn FnMut(SessionOutcome)>;

/// One game session from spawn to extraction or death
pub struct Session {
    state: GameState,
    latch: InputLatch,
    on_end: Option<EndCallback>,
    stopped: bool,
}

impl Session {
    pub fn new(settings: &Settings, tuning: Tuning) -> Self {
        let seed = settings.resolve_seed();
        log::info!("Session starting with seed {} as {:?}", seed, settings.hero);
        Self::from_state(GameState::new(seed, settings.hero, tuning))
    }

    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            latch: InputLatch::default(),
            on_end: None,
            stopped: false,
        }
    }

    /// Register the end-of-session callback (replaces any previous one)
    pub fn set_on_end(&mut self, callback: impl FnMut(SessionOutcome) + 'static) {
        self.on_end = Some(Box::new(callback));
    }

    pub fn latch_mut(&mut self) -> &mut InputLatch {
        &mut self.latch
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Still stepping: not stopped and not in a terminal phase
    pub fn is_running(&self) -> bool {
        !self.stopped && !self.state.is_over()
    }

    /// Advance one frame using the latched input
    pub fn step(&mut self) -> Option<SessionOutcome> {
        let input = self.latch.sample();
        self.step_with(&input)
    }

    /// Advance one frame with explicit input (scripted drivers)
    pub fn step_with(&mut self, input: &TickInput) -> Option<SessionOutcome> {
        if self.stopped {
            return None;
        }
        let outcome = tick(&mut self.state, input)?;
        if let Some(mut callback) = self.on_end.take() {
            callback(outcome);
        }
        Some(outcome)
    }

    /// Halt the session. Later steps do nothing and the end callback never fires.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.on_end = None;
        self.latch.clear();
        log::info!("Session stopped at frame {}", self.state.frame);
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot::capture(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Action;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn quiet_tuning() -> Tuning {
        Tuning {
            chest_count: 0,
            slime_count: 0,
            bat_count: 0,
            rogue_wave_interval: 0,
            ..Tuning::default()
        }
    }

    fn seeded() -> Settings {
        Settings {
            seed: Some(77),
            ..Settings::default()
        }
    }

    #[test]
    fn test_end_callback_fires_exactly_once() {
        let mut session = Session::new(&seeded(), quiet_tuning());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        session.set_on_end(move |outcome| sink.borrow_mut().push(outcome));

        session.state.registry.player_mut().body.health = -5.0;
        let outcome = session.step().expect("death ends the session");
        assert!(!outcome.success);
        for _ in 0..10 {
            assert_eq!(session.step(), None);
        }
        assert_eq!(seen.borrow().as_slice(), &[outcome]);
        assert!(!session.is_running());
    }

    #[test]
    fn test_stop_halts_stepping() {
        let mut session = Session::new(&seeded(), quiet_tuning());
        let fired = Rc::new(RefCell::new(false));
        let flag = fired.clone();
        session.set_on_end(move |_| *flag.borrow_mut() = true);

        session.step();
        let frame = session.state().frame;
        session.stop();
        session.state.registry.player_mut().body.health = 0.0;
        assert_eq!(session.step(), None);
        assert_eq!(session.state().frame, frame);
        assert!(!*fired.borrow());
        assert!(!session.is_running());
    }

    #[test]
    fn test_latch_feeds_the_step() {
        let mut session = Session::new(&seeded(), quiet_tuning());
        let start_x = session.state().player().body.pos.x;
        session.latch_mut().press(Action::MoveRight);
        for _ in 0..20 {
            session.step();
        }
        assert!(session.state().player().body.pos.x > start_x);
    }

    #[test]
    fn test_same_seed_same_session() {
        let run = || {
            let mut session = Session::new(&seeded(), Tuning::default());
            session.latch_mut().press(Action::MoveLeft);
            for _ in 0..300 {
                session.step();
            }
            session.state().player().body.pos
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = Session::new(&seeded(), quiet_tuning());
        session.step();
        let snap = session.snapshot();
        assert_eq!(snap.frame, 1);
        assert_eq!(snap.entities.len(), 1);
    }
}
