//! Platform abstraction layer
//!
//! Interfaces for the collaborators the core drives but does not
//! implement: the raster/text drawing surface, the monotonic clock, and
//! (via [`crate::audio::StreamSink`]) the streaming audio hardware.
//! Host builds get std/no-op implementations; a board port supplies its
//! own behind the same traits.

use std::time::Instant;

use crate::audio::{SampleSet, StreamSink};
use crate::fixed::TimerFraction;

/// 3-bit VGA palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// Raster and text drawing surface.
///
/// Calls are pure side effects; the core never reads pixel state back.
pub trait Surface {
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);
    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);
    fn set_cursor(&mut self, x: i32, y: i32);
    fn set_text_size(&mut self, size: u8);
    fn set_text_color(&mut self, color: Color);
    fn write_text(&mut self, text: &str);
}

/// Monotonic microsecond counter
pub trait Clock {
    fn now_us(&self) -> u64;
}

/// Wall clock backed by `std::time::Instant`
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

/// Surface that swallows every draw call, for headless runs
#[derive(Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn fill_rect(&mut self, _: i32, _: i32, _: i32, _: i32, _: Color) {}
    fn draw_rect(&mut self, _: i32, _: i32, _: i32, _: i32, _: Color) {}
    fn fill_circle(&mut self, _: i32, _: i32, _: i32, _: Color) {}
    fn draw_line(&mut self, _: i32, _: i32, _: i32, _: i32, _: Color) {}
    fn set_cursor(&mut self, _: i32, _: i32) {}
    fn set_text_size(&mut self, _: u8) {}
    fn set_text_color(&mut self, _: Color) {}
    fn write_text(&mut self, _: &str) {}
}

/// Streaming sink that logs instead of touching hardware
#[derive(Debug, Default)]
pub struct NullSink;

impl StreamSink for NullSink {
    fn arm(&mut self, set: SampleSet, len: usize, rate: TimerFraction) {
        log::debug!("sink armed: {set:?} len={len} rate={}/{:#06x}", rate.num, rate.den);
    }
    fn start(&mut self) {
        log::debug!("sink started");
    }
    fn set_pacing(&mut self, rate: TimerFraction) {
        log::debug!("sink pacing: {}/{:#06x}", rate.num, rate.den);
    }
    fn abort(&mut self) {
        log::debug!("sink aborted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_clock_is_monotonic() {
        let clock = StdClock::new();
        let a = clock.now_us();
        let b = clock.now_us();
        assert!(b >= a);
    }
}
