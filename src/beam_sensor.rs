//! # Beam trigger detection
//!
//! With the laser landing on its LDR a sensor reads high. A hand in the beam
//! drops the reading sharply, and that edge is a note-on. When the hand moves
//! away the reading climbs back up, and that edge is a note-off.
//!
//! Every decision is made relative to the sensor's own baseline, with an
//! asymmetric hysteresis band around it:
//!
//! - Triggering requires the reading to fall a full trigger margin *below*
//!   the baseline
//! - Releasing only requires the reading to climb back *above* the baseline
//!
//! The gap between the two edges is what keeps a reading that hovers near the
//! trigger point from machine-gunning note-on/note-off pairs, while release
//! stays responsive the moment the beam is restored.
//!
//! A reading far *above* the baseline is the third case: nobody is touching
//! the beam, the room simply got brighter. That drift is absorbed by
//! recalibrating the baseline instead of emitting anything.

use crate::baseline::{self, RawSampleSource};
use crate::config;
use crate::midi_transmitter::NoteSink;

/// One laser/LDR pair and its detection state is represented here.
pub struct BeamSensor {
    // which beam this is, used to address the sample source
    index: usize,

    // the MIDI note this beam currently plays, assigned from the active scale
    note: u8,

    // the boxcar average readings are compared against
    baseline: u16,

    // true iff a note-on has been emitted with no matching note-off yet
    sounding: bool,
}

impl BeamSensor {
    /// `BeamSensor::new(n, note, src)` is a new beam with a settled baseline
    ///
    /// Blocks for one full calibration burst so detection never runs against
    /// an unsettled reference.
    pub fn new(index: usize, note: u8, source: &mut impl RawSampleSource) -> Self {
        let mut beam = Self {
            index,
            note,
            baseline: 0,
            sounding: false,
        };
        beam.recalibrate(source);
        beam
    }

    /// `b.evaluate(raw, src, sink)` runs one detection cycle against the reading `raw`
    ///
    /// Three independent checks run in order, none of them exclusive within a
    /// single cycle:
    ///
    /// 1. A reading past the drift margin above baseline recalibrates the
    ///    beam, and the later checks compare against the fresh baseline
    /// 2. A reading a full trigger margin below baseline while silent emits a
    ///    note-on
    /// 3. A reading above baseline while sounding emits a note-off, then
    ///    recalibrates to re-anchor against whatever the ambient level is now
    pub fn evaluate(
        &mut self,
        raw: u16,
        source: &mut impl RawSampleSource,
        sink: &mut impl NoteSink,
    ) {
        log::trace!("beam {}: raw {} baseline {}", self.index, raw, self.baseline);

        // ambient light rose, not a beam break; track it so it can not read
        // as a trigger threshold shift forever after
        if raw > self.baseline.saturating_add(config::DRIFT_MARGIN) {
            self.recalibrate(source);
        }

        if raw < self.baseline.saturating_sub(config::TRIGGER_MARGIN) && !self.sounding {
            log::debug!("beam {}: note {} on", self.index, self.note);
            sink.note_on(self.note, config::DEFAULT_VELOCITY);
            self.sounding = true;
        }

        if raw > self.baseline && self.sounding {
            log::debug!("beam {}: note {} off", self.index, self.note);
            sink.note_off(self.note, config::RELEASE_VELOCITY);
            self.sounding = false;

            // the beam is restored, re-learn the room before the next pluck
            self.recalibrate(source);
        }
    }

    /// `b.recalibrate(src)` replaces the baseline with a fresh burst average
    ///
    /// Blocks for the duration of the burst. Leaves the sounding state alone.
    pub fn recalibrate(&mut self, source: &mut impl RawSampleSource) {
        self.baseline = baseline::burst_average(source, self.index);
        log::debug!("beam {}: baseline {}", self.index, self.baseline);
    }

    /// `b.retune(note, sink)` silences the beam and assigns it a new note
    ///
    /// The note-off for the old note is sent unconditionally, whether or not
    /// the beam believes it is sounding: a note left on across a remap could
    /// never receive its note-off afterwards.
    pub fn retune(&mut self, note: u8, sink: &mut impl NoteSink) {
        sink.note_off(self.note, config::RELEASE_VELOCITY);
        self.sounding = false;
        self.note = note;
    }

    /// `b.note()` is the MIDI note currently assigned to this beam
    pub fn note(&self) -> u8 {
        self.note
    }

    /// `b.is_sounding()` is true iff this beam's note is currently on
    pub fn is_sounding(&self) -> bool {
        self.sounding
    }

    /// `b.baseline()` is the current baseline average for this beam
    pub fn baseline(&self) -> u16 {
        self.baseline
    }
}
