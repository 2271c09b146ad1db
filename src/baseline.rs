//! # Baseline estimation for the light sensors
//!
//! Each LDR sees the sum of its laser and whatever ambient light is in the
//! room. The absolute reading is meaningless on its own: the same beam that
//! reads 800 on a dark stage might read 980 next to a window. What carries
//! information is the reading relative to a per-sensor baseline.
//!
//! The baseline is a boxcar average: a burst of consecutive raw samples is
//! summed and divided by a power of two with a right shift. It is recomputed
//! as a whole burst every time, never nudged by a single sample, so one noisy
//! reading can never drag the reference around.
//!
//! The burst is read synchronously and blocks the polling loop for its
//! duration. The iteration count is fixed, so the latency is bounded and the
//! instrument simply goes quiet for a moment while a sensor re-learns the
//! room.

use crate::config;

/// A source of instantaneous light readings, one per sensor, is represented here.
///
/// Implementations hand back a single raw ADC sample with no filtering of
/// their own. All averaging and thresholding happens on this side of the
/// trait, which keeps the engine free of any direct hardware dependency.
pub trait RawSampleSource {
    /// `src.read_raw(n)` is one fresh raw sample from sensor `n`, in the ADC's range
    fn read_raw(&mut self, sensor: usize) -> u16;
}

/// `burst_average(src, n)` is a fresh baseline for sensor `n`
///
/// Takes `config::CALIBRATION_BURST_LEN` consecutive samples, sums them, and
/// shifts the sum right by `config::CALIBRATION_SHIFT`. The caller's loop is
/// blocked for the duration of the burst.
pub fn burst_average(source: &mut impl RawSampleSource, sensor: usize) -> u16 {
    let mut sum: u32 = 0;
    for _ in 0..config::CALIBRATION_BURST_LEN {
        sum += u32::from(source.read_raw(sensor));
    }
    (sum >> config::CALIBRATION_SHIFT) as u16
}
