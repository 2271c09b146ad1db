//! Compile time tuning constants for the instrument.
//!
//! Everything a builder might want to adjust when assembling a harp with a
//! different beam count, note layout, or sensor hardware lives here. None of
//! these are runtime mutable.

/// How many laser/LDR pairs the instrument has
pub const LASER_COUNT: usize = 8;

/// How many scales are defined in the scale table
pub const SCALE_COUNT: usize = 2;

/// Semitone offsets added to the base note, one row per scale, one entry per beam
pub const SCALE_TABLE: [[u8; LASER_COUNT]; SCALE_COUNT] = [
    [0, 2, 4, 5, 7, 9, 11, 12], // major
    [0, 2, 3, 5, 7, 8, 10, 12], // natural minor
];

/// The MIDI note played by beam 0 when its scale offset is zero, 60 is middle C
pub const BASE_NOTE: u8 = 60;

/// How far a reading must drop below the baseline to count as a beam break, in raw ADC units
pub const TRIGGER_MARGIN: u16 = 50;

/// How far a reading must rise above the baseline to count as an ambient light shift, in raw ADC units
///
/// Readings past this margin cause a recalibration rather than a note event.
pub const DRIFT_MARGIN: u16 = 200;

/// The number of consecutive raw samples consumed by one calibration burst
///
/// Must be a power of two so the average reduces to a right shift.
pub const CALIBRATION_BURST_LEN: usize = 64;

/// The right shift that divides a burst sum down to an average
///
/// Derived from the burst length so the pair stays consistent when tuned.
pub const CALIBRATION_SHIFT: u32 = CALIBRATION_BURST_LEN.ilog2();

/// Placeholder velocity for every note-on until the sensors can measure touch
pub const DEFAULT_VELOCITY: u8 = 100;

/// The velocity byte carried by note-off messages
pub const RELEASE_VELOCITY: u8 = 0;

/// The zero-based MIDI channel the instrument transmits on
pub const MIDI_CHANNEL: u8 = 0;

/// Outgoing MIDI queue depth
///
/// A full scale change batch plus one fresh event per beam fits with room to
/// spare.
pub const MIDI_QUEUE_LEN: usize = 32;
