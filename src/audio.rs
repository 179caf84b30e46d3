//! Streaming audio engine
//!
//! Models the chained two-stage playback pipeline of the target hardware:
//! a *control* stage that re-points the *data* stage at the start of the
//! active sample payload each time it drains (a seamless loop), and a data
//! stage that streams samples to the output sink at a rate set by a
//! programmable timer fraction. Once started the pipeline runs
//! autonomously: the frame loop never waits on it and never receives a
//! completion signal. Stopping is an abrupt abort.

use serde::{Deserialize, Serialize};

use crate::fixed::TimerFraction;

/// System clock the pacing fractions divide down from
pub const SYS_CLK_HZ: u32 = 250_000_000;

/// Pacing fractions per difficulty tier: ~16 kHz base, then 18 kHz, 20 kHz.
pub const RATE_TABLE: [TimerFraction; 3] = [
    TimerFraction::new(0x0004, 0xFFFF),
    TimerFraction::new(0x0004, 0xD903),
    TimerFraction::new(0x0004, 0xC350),
];

/// Discrete ambient playback speed step, indexed into [`RATE_TABLE`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum RateTier {
    #[default]
    Base,
    Step1,
    Step2,
}

impl RateTier {
    pub fn fraction(self) -> TimerFraction {
        RATE_TABLE[self as usize]
    }
}

/// Which precomputed payload the data stage streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSet {
    /// Looping background track
    Ambient,
    /// End-of-game sting
    Sting,
}

/// Payload lengths in samples. The sample data itself is an opaque asset
/// owned by the sink side; the engine only needs transfer counts.
#[derive(Debug, Clone, Copy)]
pub struct SampleBank {
    pub ambient_len: usize,
    pub sting_len: usize,
}

impl Default for SampleBank {
    fn default() -> Self {
        Self {
            ambient_len: 414_544,
            sting_len: 5_957,
        }
    }
}

impl SampleBank {
    pub fn len(&self, set: SampleSet) -> usize {
        match set {
            SampleSet::Ambient => self.ambient_len,
            SampleSet::Sting => self.sting_len,
        }
    }
}

/// The autonomously streaming output side of the pipeline.
///
/// Implementations are hardware wrappers (or fakes in tests); every call
/// is fire-and-forget and must not block.
pub trait StreamSink {
    /// Program both stages: the data stage streams `len` transfers of
    /// `set` paced by `rate`; the chained control stage re-points it at
    /// the payload start whenever it drains.
    fn arm(&mut self, set: SampleSet, len: usize, rate: TimerFraction);

    /// Kick the control stage; streaming proceeds without the caller.
    fn start(&mut self);

    /// Reprogram the pacing timer. Takes effect at the next re-arm
    /// boundary; the in-flight buffer finishes at its old rate.
    fn set_pacing(&mut self, rate: TimerFraction);

    /// Abort the in-flight data stage immediately.
    fn abort(&mut self);
}

/// An armed playback configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlaybackSession {
    set: SampleSet,
    tier: RateTier,
}

/// Audio engine for the game
pub struct AudioEngine<S: StreamSink> {
    sink: S,
    bank: SampleBank,
    session: Option<PlaybackSession>,
    playing: bool,
}

impl<S: StreamSink> AudioEngine<S> {
    pub fn new(sink: S, bank: SampleBank) -> Self {
        Self {
            sink,
            bank,
            session: None,
            playing: false,
        }
    }

    /// Arm the pipeline for `set` at `tier` without starting playback.
    /// Re-configuring an identical session is a no-op; configuring over a
    /// playing session aborts it first.
    pub fn configure(&mut self, set: SampleSet, tier: RateTier) {
        let next = PlaybackSession { set, tier };
        if self.session == Some(next) {
            return;
        }
        if self.playing {
            self.sink.abort();
            self.playing = false;
        }
        self.sink.arm(set, self.bank.len(set), tier.fraction());
        self.session = Some(next);
        log::debug!("audio armed: {set:?} at {tier:?}");
    }

    /// Begin autonomous streaming of the armed session.
    pub fn start(&mut self) {
        if self.playing {
            return;
        }
        match self.session {
            Some(session) => {
                self.sink.start();
                self.playing = true;
                log::info!("audio started: {:?} at {:?}", session.set, session.tier);
            }
            None => log::warn!("audio start without a configured session"),
        }
    }

    /// Halt output mid-stream. Abrupt by design; safe to call at any time.
    pub fn stop(&mut self) {
        if self.playing {
            self.sink.abort();
            self.playing = false;
            log::info!("audio stopped");
        }
    }

    /// Step the pacing tier. Recorded on the armed session immediately,
    /// applied by the sink at its next re-arm boundary.
    pub fn set_rate(&mut self, tier: RateTier) {
        let Some(session) = &mut self.session else {
            return;
        };
        if session.tier == tier {
            return;
        }
        session.tier = tier;
        self.sink.set_pacing(tier.fraction());
        log::info!(
            "audio pacing -> {:?} ({} Hz)",
            tier,
            tier.fraction().rate_hz(SYS_CLK_HZ)
        );
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The underlying sink, for diagnostics and test inspection.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
