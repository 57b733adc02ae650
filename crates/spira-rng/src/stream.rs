//! A single generator stream with a replayable value cache.

use crate::constants::rotate16;

/// One of the game's 68 independent generator streams.
///
/// The stream memoizes every value it produces: `cached[i]` is a pure
/// function of `(seed, stream index, i)` and is never recomputed or
/// invalidated within a session. The playhead marks the next unconsumed
/// value; [`RngStream::reset`] rewinds it to 0 without touching the cache,
/// which is what makes full-script replays cheap.
#[derive(Debug, Clone)]
pub struct RngStream {
    multiplier: i32,
    xor: i32,
    /// Recurrence state after the last cached value was produced.
    gen_state: i32,
    cached: Vec<u32>,
    playhead: usize,
}

impl RngStream {
    /// Create a stream from its initial state and per-stream constants.
    pub fn new(initial_state: i32, multiplier: u32, xor: u32) -> Self {
        Self {
            multiplier: multiplier as i32,
            xor: xor as i32,
            gen_state: initial_state,
            cached: Vec::new(),
            playhead: 0,
        }
    }

    /// One iteration of the game's recurrence, appending to the cache.
    fn generate(&mut self) {
        let mut v = self.gen_state.wrapping_mul(self.multiplier) ^ self.xor;
        v = rotate16(v);
        self.gen_state = v;
        self.cached.push((v as u32) & 0x7fff_ffff);
    }

    /// Return the next unconsumed value and move the playhead forward.
    pub fn advance(&mut self) -> u32 {
        if self.playhead == self.cached.len() {
            self.generate();
        }
        let out = self.cached[self.playhead];
        self.playhead += 1;
        out
    }

    /// The next value [`RngStream::advance`] would return, without consuming it.
    pub fn peek(&mut self) -> u32 {
        if self.playhead == self.cached.len() {
            self.generate();
        }
        self.cached[self.playhead]
    }

    /// The next `n` values from the playhead onward, without consuming them.
    pub fn upcoming(&mut self, n: usize) -> Vec<u32> {
        while self.cached.len() < self.playhead + n {
            self.generate();
        }
        self.cached[self.playhead..self.playhead + n].to_vec()
    }

    /// Rewind the playhead to the start of the stream. The cache survives.
    pub fn reset(&mut self) {
        self.playhead = 0;
    }

    /// Number of values consumed since the last reset.
    pub fn position(&self) -> usize {
        self.playhead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream() -> RngStream {
        RngStream::new(0x1234_5678, 0xe809_d70d, 0x1165_dfb1)
    }

    #[test]
    fn outputs_are_31_bit() {
        let mut s = stream();
        for _ in 0..1000 {
            assert!(s.advance() < 0x8000_0000);
        }
    }

    #[test]
    fn reset_replays_identical_sequence() {
        let mut s = stream();
        let first: Vec<u32> = (0..50).map(|_| s.advance()).collect();
        s.reset();
        let second: Vec<u32> = (0..50).map(|_| s.advance()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn reset_preserves_cache() {
        let mut s = stream();
        for _ in 0..20 {
            s.advance();
        }
        let cached_before = s.cached.clone();
        s.reset();
        assert_eq!(s.position(), 0);
        assert_eq!(s.cached, cached_before);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut s = stream();
        let peeked = s.peek();
        assert_eq!(s.position(), 0);
        assert_eq!(s.advance(), peeked);
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn upcoming_matches_advance() {
        let mut s = stream();
        s.advance();
        let preview = s.upcoming(10);
        let consumed: Vec<u32> = (0..10).map(|_| s.advance()).collect();
        assert_eq!(preview, consumed);
    }

    #[test]
    fn identical_construction_identical_sequence() {
        let mut a = stream();
        let mut b = stream();
        for _ in 0..200 {
            assert_eq!(a.advance(), b.advance());
        }
    }
}
