//! # The laser harp engine
//!
//! Everything the instrument knows lives in one [`LaserHarp`] value: every
//! beam's detection state plus the active scale. The firmware owns it and
//! calls [`LaserHarp::poll`] once per trip around the main loop; the only
//! thing touched from outside that loop is the [`ScaleSignal`] the scale
//! button's interrupt handler pokes.
//!
//! One poll cycle is:
//!
//! 1. Apply at most one pending scale change, silencing every beam first
//! 2. For every beam, take a fresh reading and run trigger detection
//!
//! Scheduling is cooperative and single threaded. A calibration burst blocks
//! the cycle for a bounded number of samples, which is an accepted latency
//! cost, not a fault.

use crate::baseline::RawSampleSource;
use crate::beam_sensor::BeamSensor;
use crate::config;
use crate::midi_transmitter::NoteSink;
use crate::scale::{self, ScaleSignal};

/// The complete instrument state is represented here.
pub struct LaserHarp<'a> {
    beams: [BeamSensor; config::LASER_COUNT],

    // the active scale, touched only by the polling context
    scale_index: usize,

    signal: &'a ScaleSignal,
}

impl<'a> LaserHarp<'a> {
    /// `LaserHarp::new(sig, src)` is a new engine with every beam calibrated
    /// against the current ambient light
    ///
    /// Blocks for one calibration burst per beam, so run it with the lasers
    /// on and the beams unbroken. Starts on scale 0.
    pub fn new(signal: &'a ScaleSignal, source: &mut impl RawSampleSource) -> Self {
        let notes = scale::derive_notes(0);
        let beams = core::array::from_fn(|i| BeamSensor::new(i, notes[i], &mut *source));

        log::info!(
            "calibrated {} beams, scale {}",
            config::LASER_COUNT,
            scale::name(0)
        );

        Self {
            beams,
            scale_index: 0,
            signal,
        }
    }

    /// `harp.poll(src, sink)` runs one full detection cycle
    ///
    /// Call continuously from the firmware main loop.
    pub fn poll(&mut self, source: &mut impl RawSampleSource, sink: &mut impl NoteSink) {
        self.apply_scale_change(sink);

        for (i, beam) in self.beams.iter_mut().enumerate() {
            let raw = source.read_raw(i);
            beam.evaluate(raw, source, sink);
        }
    }

    /// `harp.apply_scale_change(sink)` consumes a pending scale change, if any
    ///
    /// One step per call no matter how many button pulses queued up since the
    /// last poll. Every beam is silenced under the old mapping before the new
    /// notes are assigned.
    fn apply_scale_change(&mut self, sink: &mut impl NoteSink) {
        if !self.signal.take() {
            return;
        }

        self.scale_index = scale::next_index(self.scale_index);
        log::debug!(
            "scale change (pulse {}): now {}",
            self.signal.pulse_count(),
            scale::name(self.scale_index)
        );

        let notes = scale::derive_notes(self.scale_index);
        for (beam, note) in self.beams.iter_mut().zip(notes) {
            beam.retune(note, sink);
        }
    }

    /// `harp.scale_index()` is the index of the active scale
    pub fn scale_index(&self) -> usize {
        self.scale_index
    }

    /// `harp.beams()` is a view of every beam's state
    ///
    /// Used by diagnostics and the desktop demo, the firmware itself never
    /// needs it.
    pub fn beams(&self) -> &[BeamSensor; config::LASER_COUNT] {
        &self.beams
    }
}
