//! Frame scheduler
//!
//! One call to [`FrameLoop::frame`] runs exactly one logic+render pass,
//! measures elapsed wall time, and returns the cooperative delay the host
//! should sleep before calling again: the remaining frame budget, or the
//! full cue hold on the frame that starts the end-of-game sting. Honoring
//! that delay is the only suspension point in the whole core — nothing
//! inside a frame blocks, and all hardware interaction is fire-and-forget.

use crate::audio::{AudioEngine, RateTier, SampleBank, SampleSet, StreamSink};
use crate::consts::*;
use crate::platform::{Clock, Surface};
use crate::renderer::Renderer;
use crate::sim::{GameEvent, SessionState, TickInput, tick};

/// Owns the session and its collaborators; the host owns the sleep.
pub struct FrameLoop<S: Surface, K: StreamSink, C: Clock> {
    pub state: SessionState,
    renderer: Renderer,
    audio: AudioEngine<K>,
    surface: S,
    clock: C,
}

impl<S: Surface, K: StreamSink, C: Clock> FrameLoop<S, K, C> {
    pub fn new(seed: u64, surface: S, sink: K, bank: SampleBank, clock: C) -> Self {
        Self {
            state: SessionState::new(seed),
            renderer: Renderer::new(),
            audio: AudioEngine::new(sink, bank),
            surface,
            clock,
        }
    }

    /// Run one frame. Returns the requested suspension in microseconds.
    pub fn frame(&mut self, input: &TickInput) -> u64 {
        let begin = self.clock.now_us();

        tick(&mut self.state, input);

        let mut hold = None;
        for &event in &self.state.events {
            match event {
                GameEvent::SessionStarted => {
                    log::info!(
                        "session started: {:?}, seed {}",
                        self.state.mode,
                        self.state.seed
                    );
                    self.audio.configure(SampleSet::Ambient, self.state.rate_tier);
                    self.audio.start();
                }
                GameEvent::BarrierPassed { score } => {
                    log::debug!("barrier passed, score {score}");
                }
                GameEvent::RateStepped(tier) => {
                    self.audio.set_rate(tier);
                }
                GameEvent::GameEnded { winner } => {
                    log::info!(
                        "game over: score {}, high score {}, winner {winner:?}",
                        self.state.score,
                        self.state.high_score
                    );
                    self.audio.stop();
                    self.audio.configure(SampleSet::Sting, RateTier::Base);
                    self.audio.start();
                    hold = Some(GAME_OVER_CUE_US);
                }
                GameEvent::CueFinished => {
                    self.audio.stop();
                }
                GameEvent::ReturnedToMenu => {
                    log::info!("returned to menu");
                }
            }
        }

        self.renderer.frame(&mut self.surface, &self.state);

        if let Some(hold) = hold {
            return hold;
        }
        let elapsed = self.clock.now_us().saturating_sub(begin);
        FRAME_BUDGET_US.saturating_sub(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{RecordingSink, SinkCall};
    use crate::platform::NullSurface;
    use crate::sim::{Barrier, GamePhase, SlotState};
    use std::cell::Cell;

    /// Clock advancing a fixed step on every read.
    struct ManualClock {
        t: Cell<u64>,
        step: u64,
    }

    impl ManualClock {
        fn stepping(step: u64) -> Self {
            Self {
                t: Cell::new(0),
                step,
            }
        }
    }

    impl Clock for ManualClock {
        fn now_us(&self) -> u64 {
            let now = self.t.get();
            self.t.set(now + self.step);
            now
        }
    }

    fn frame_loop(step_us: u64) -> FrameLoop<NullSurface, RecordingSink, ManualClock> {
        FrameLoop::new(
            1,
            NullSurface,
            RecordingSink::default(),
            SampleBank::default(),
            ManualClock::stepping(step_us),
        )
    }

    fn start_session(fl: &mut FrameLoop<NullSurface, RecordingSink, ManualClock>) {
        fl.frame(&TickInput {
            confirm: true,
            ..Default::default()
        });
        fl.frame(&TickInput::default());
        assert_eq!(fl.state.phase, GamePhase::Playing);
    }

    fn plant_wall(state: &mut SessionState) {
        state.barriers[0] = Barrier {
            slot: 0,
            state: SlotState::Sliding,
            x: 80,
            length: 60,
            gap_top: 300,
            gap_bottom: 0,
            gap_length: 200,
            passed: false,
        };
        state.barriers[1].state = SlotState::Inactive;
        state.barriers[2].state = SlotState::Inactive;
    }

    #[test]
    fn test_frame_returns_remaining_budget() {
        let mut fl = frame_loop(4_000);
        let delay = fl.frame(&TickInput::default());
        assert_eq!(delay, FRAME_BUDGET_US - 4_000);
    }

    #[test]
    fn test_overrun_frame_requests_zero_delay() {
        let mut fl = frame_loop(50_000);
        let delay = fl.frame(&TickInput::default());
        assert_eq!(delay, 0);
    }

    #[test]
    fn test_session_start_arms_and_starts_ambient() {
        let mut fl = frame_loop(0);
        start_session(&mut fl);
        assert_eq!(
            fl.audio_calls(),
            &[
                SinkCall::Arm(SampleSet::Ambient, 414_544, RateTier::Base.fraction()),
                SinkCall::Start,
            ]
        );
    }

    #[test]
    fn test_game_over_frame_holds_for_cue() {
        let mut fl = frame_loop(0);
        start_session(&mut fl);
        plant_wall(&mut fl.state);

        let delay = fl.frame(&TickInput::default());
        assert_eq!(delay, GAME_OVER_CUE_US);
        assert_eq!(fl.state.phase, GamePhase::GameOver);

        // Ambient aborted, sting armed at base rate and started.
        let calls = fl.audio_calls();
        assert_eq!(
            &calls[2..],
            &[
                SinkCall::Abort,
                SinkCall::Arm(SampleSet::Sting, 5_957, RateTier::Base.fraction()),
                SinkCall::Start,
            ]
        );

        // The next frame stops the sting and resumes normal pacing.
        let delay = fl.frame(&TickInput::default());
        assert_eq!(delay, FRAME_BUDGET_US);
        assert_eq!(fl.audio_calls().last(), Some(&SinkCall::Abort));
    }

    #[test]
    fn test_rate_step_reprograms_pacing() {
        let mut fl = frame_loop(0);
        start_session(&mut fl);

        fl.state.score = RATE_STEP_1_AT;
        fl.state.barriers[0].state = SlotState::Exhausted;
        fl.frame(&TickInput::default());
        assert!(
            fl.audio_calls()
                .contains(&SinkCall::SetPacing(RateTier::Step1.fraction()))
        );
    }

    impl FrameLoop<NullSurface, RecordingSink, ManualClock> {
        fn audio_calls(&self) -> &[SinkCall] {
            &self.audio.sink().calls
        }
    }
}
