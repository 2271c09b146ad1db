//! # Scale selection
//!
//! The player cycles through the built in scales with a panel button while
//! playing. The button is wired to an edge-triggered interrupt, so the press
//! arrives asynchronously with respect to the polling loop, and hardware
//! debouncing is not guaranteed: a single press may deliver several pulses.
//!
//! The handler side of that hand-off is kept as small as possible. It bumps a
//! pulse counter and raises a pending flag, nothing more; emitting the
//! note-offs and recomputing the note set happen in the polling loop, which
//! consumes the flag at the start of the next cycle. However many pulses
//! queued up since the last poll, the applied change is a single step.

use portable_atomic::{AtomicBool, AtomicU8, Ordering};

use crate::config;

/// The cross-context handshake between the scale button and the polling loop
/// is represented here.
///
/// This pair is the only state shared between the interrupt context and the
/// main loop. The handler performs two atomic writes and returns; the main
/// loop's `take` is the single synchronization point.
pub struct ScaleSignal {
    // raw press count, runs ahead of the applied scale when presses bounce or queue
    pulses: AtomicU8,

    pending: AtomicBool,
}

impl ScaleSignal {
    /// `ScaleSignal::new()` is a new signal with no pending change
    pub const fn new() -> Self {
        Self {
            pulses: AtomicU8::new(0),
            pending: AtomicBool::new(false),
        }
    }

    /// `s.notify()` records one scale-change pulse
    ///
    /// The only operation permitted in signal-handler context. Returns
    /// immediately, never emits events or calibrates.
    pub fn notify(&self) {
        self.pulses.fetch_add(1, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
    }

    /// `s.take()` is true iff a change was pending, and clears the flag
    ///
    /// The flag is a boolean, not a counter, so any number of pulses since
    /// the last call collapses into one `true`.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::Acquire)
    }

    /// `s.pulse_count()` is the running press count, wrapping at 256
    ///
    /// Diagnostic only, nothing decides anything based on it.
    pub fn pulse_count(&self) -> u8 {
        self.pulses.load(Ordering::Relaxed)
    }
}

impl Default for ScaleSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// `next_index(i)` is the scale index one step after `i`
///
/// Any value reaching the scale count wraps to zero. The comparison is `>=`
/// rather than `==` so an out-of-range index can never survive a step.
pub fn next_index(index: usize) -> usize {
    let next = index + 1;
    if next >= config::SCALE_COUNT {
        0
    } else {
        next
    }
}

/// `derive_notes(i)` is the active note set for scale `i`
///
/// One note per beam: the base note plus the beam's semitone offset from the
/// scale table, clamped to the MIDI note range.
pub fn derive_notes(scale_index: usize) -> [u8; config::LASER_COUNT] {
    let offsets = &config::SCALE_TABLE[scale_index % config::SCALE_COUNT];
    core::array::from_fn(|beam| scaled_note(config::BASE_NOTE, offsets[beam]))
}

/// `scaled_note(base, offset)` is `base + offset` held within the MIDI note range
pub fn scaled_note(base: u8, offset: u8) -> u8 {
    (u16::from(base) + u16::from(offset)).min(MAX_NOTE) as u8
}

/// `name(i)` is a human readable name for scale `i`, used in diagnostics
pub fn name(scale_index: usize) -> &'static str {
    match scale_index {
        0 => "major",
        1 => "minor",
        _ => "unknown",
    }
}

/// The highest note number MIDI can express
const MAX_NOTE: u16 = 127;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_without_notify_is_false() {
        let signal = ScaleSignal::new();
        assert!(!signal.take());
    }

    #[test]
    fn notify_then_take_is_true_once() {
        let signal = ScaleSignal::new();
        signal.notify();

        assert!(signal.take());
        assert!(!signal.take());
    }

    #[test]
    fn queued_pulses_collapse_into_one_take() {
        let signal = ScaleSignal::new();
        signal.notify();
        signal.notify();
        signal.notify();

        assert!(signal.take());
        assert!(!signal.take());
    }

    #[test]
    fn pulse_count_keeps_the_raw_total() {
        let signal = ScaleSignal::new();
        signal.notify();
        signal.notify();
        signal.notify();
        signal.take();

        assert_eq!(signal.pulse_count(), 3);
    }

    #[test]
    fn index_steps_through_the_scales() {
        assert_eq!(next_index(0), 1);
    }

    #[test]
    fn index_wraps_from_the_last_scale() {
        assert_eq!(next_index(config::SCALE_COUNT - 1), 0);
    }

    #[test]
    fn index_at_the_scale_count_wraps_to_zero() {
        assert_eq!(next_index(config::SCALE_COUNT), 0);
    }

    #[test]
    fn overshot_index_wraps_to_zero() {
        assert_eq!(next_index(config::SCALE_COUNT + 3), 0);
    }

    #[test]
    fn major_notes_follow_the_table() {
        assert_eq!(derive_notes(0), [60, 62, 64, 65, 67, 69, 71, 72]);
    }

    #[test]
    fn minor_notes_follow_the_table() {
        assert_eq!(derive_notes(1), [60, 62, 63, 65, 67, 68, 70, 72]);
    }

    #[test]
    fn notes_clamp_at_the_top_of_the_midi_range() {
        assert_eq!(scaled_note(120, 12), 127);
        assert_eq!(scaled_note(127, 127), 127);
    }
}
