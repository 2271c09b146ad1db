//! # USB MIDI transmitter
//!
//! USB MIDI frames every message as a fixed 4-byte event packet: a code index
//! nibble that tells the host how many of the following bytes matter,
//! followed by the three MIDI bytes themselves. For the channel voice
//! messages this instrument produces, the code index nibble mirrors the high
//! nibble of the status byte.
//!
//! The transmitter is split into a queue and a drain so detection never waits
//! on the wire: the engine pushes messages while it scans the beams, and the
//! firmware hands the whole batch to the USB endpoint afterwards. Delivery is
//! fire and forget, there is no acknowledgment and no retry.

use heapless::Vec;
use midi_convert::midi_types::{Channel, MidiMessage, Note, Value7};

use crate::config;

/// A consumer of note events is represented here.
///
/// The detection core is generic over this trait: the firmware supplies a
/// [`MidiTransmitter`], the test suite supplies recording fakes, and the
/// desktop demo supplies whatever it likes. There is no fallback sink; every
/// entry point that can emit an event takes one.
pub trait NoteSink {
    /// `sink.note_on(n, v)` requests a note-on for note `n` with velocity `v`
    fn note_on(&mut self, note: u8, velocity: u8);

    /// `sink.note_off(n, v)` requests a note-off for note `n` with release velocity `v`
    fn note_off(&mut self, note: u8, velocity: u8);
}

/// One USB MIDI event packet: the code index byte followed by the three MIDI bytes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct UsbEventPacket(pub [u8; 4]);

/// Where rendered packets go is represented here.
///
/// Implementations hand the packet to the USB stack. Fire and forget: a
/// writer never reports failure back to the instrument.
pub trait UsbMidiWriter {
    /// `w.write_packet(p)` hands one event packet to the transport
    fn write_packet(&mut self, packet: UsbEventPacket);
}

/// A queueing USB MIDI transmitter is represented here.
pub struct MidiTransmitter {
    // the MIDI channel in [0..15]
    channel: u8,

    queue: Vec<MidiMessage, { config::MIDI_QUEUE_LEN }>,
}

impl MidiTransmitter {
    /// `MidiTransmitter::new(ch)` is a new transmitter on MIDI channel `ch`
    ///
    /// The channel is clamped to `[0..15]`.
    pub fn new(channel: u8) -> Self {
        Self {
            channel: channel.min(15),
            queue: Vec::new(),
        }
    }

    /// `mt.push(msg)` queues one message for the next `send_queue` call
    ///
    /// If the queue is full the message is dropped.
    pub fn push(&mut self, message: MidiMessage) {
        self.queue.push(message).ok();
    }

    /// `mt.send_queue(w)` renders every queued message and hands the packets to the writer in push order
    pub fn send_queue(&mut self, writer: &mut impl UsbMidiWriter) {
        for message in self.queue.iter() {
            if let Some(packet) = event_packet(message) {
                writer.write_packet(packet);
            }
        }
        self.queue.clear();
    }

    /// `mt.pending()` is the number of queued messages
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl NoteSink for MidiTransmitter {
    fn note_on(&mut self, note: u8, velocity: u8) {
        self.push(MidiMessage::NoteOn(
            Channel::from(self.channel),
            Note::from(note.min(127)),
            Value7::from(velocity.min(127)),
        ));
    }

    fn note_off(&mut self, note: u8, velocity: u8) {
        self.push(MidiMessage::NoteOff(
            Channel::from(self.channel),
            Note::from(note.min(127)),
            Value7::from(velocity.min(127)),
        ));
    }
}

/// `event_packet(msg)` is the 4-byte USB event packet for `msg`, or `None`
/// for message kinds this instrument never carries
fn event_packet(message: &MidiMessage) -> Option<UsbEventPacket> {
    let bytes = match message {
        MidiMessage::NoteOn(ch, note, velocity) => [
            0x09,
            0x90 | u8::from(*ch),
            u8::from(*note),
            u8::from(*velocity),
        ],
        MidiMessage::NoteOff(ch, note, velocity) => [
            0x08,
            0x80 | u8::from(*ch),
            u8::from(*note),
            u8::from(*velocity),
        ],
        MidiMessage::KeyPressure(ch, note, pressure) => [
            0x0A,
            0xA0 | u8::from(*ch),
            u8::from(*note),
            u8::from(*pressure),
        ],
        MidiMessage::ControlChange(ch, control, value) => [
            0x0B,
            0xB0 | u8::from(*ch),
            u8::from(*control),
            u8::from(*value),
        ],
        // system and 14-bit messages have no business coming out of a harp
        _ => return None,
    };
    Some(UsbEventPacket(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct PacketLog {
        packets: Vec<UsbEventPacket, { config::MIDI_QUEUE_LEN }>,
    }

    impl UsbMidiWriter for PacketLog {
        fn write_packet(&mut self, packet: UsbEventPacket) {
            self.packets.push(packet).ok();
        }
    }

    #[test]
    fn note_on_renders_a_4_byte_event_packet() {
        let mut mt = MidiTransmitter::new(0);
        let mut log = PacketLog::default();

        mt.note_on(60, 100);
        mt.send_queue(&mut log);

        assert_eq!(&log.packets[..], &[UsbEventPacket([0x09, 0x90, 60, 100])]);
    }

    #[test]
    fn note_off_renders_a_4_byte_event_packet() {
        let mut mt = MidiTransmitter::new(0);
        let mut log = PacketLog::default();

        mt.note_off(60, 0);
        mt.send_queue(&mut log);

        assert_eq!(&log.packets[..], &[UsbEventPacket([0x08, 0x80, 60, 0])]);
    }

    #[test]
    fn channel_is_coded_into_the_status_byte() {
        let mut mt = MidiTransmitter::new(3);
        let mut log = PacketLog::default();

        mt.note_on(60, 100);
        mt.note_off(60, 0);
        mt.send_queue(&mut log);

        assert_eq!(log.packets[0].0[1], 0x93);
        assert_eq!(log.packets[1].0[1], 0x83);
    }

    #[test]
    fn channel_clamps_to_15() {
        let mut mt = MidiTransmitter::new(200);
        let mut log = PacketLog::default();

        mt.note_on(60, 100);
        mt.send_queue(&mut log);

        assert_eq!(log.packets[0].0[1], 0x9F);
    }

    #[test]
    fn data_bytes_clamp_to_7_bits() {
        let mut mt = MidiTransmitter::new(0);
        let mut log = PacketLog::default();

        mt.note_on(200, 255);
        mt.send_queue(&mut log);

        assert_eq!(&log.packets[..], &[UsbEventPacket([0x09, 0x90, 127, 127])]);
    }

    #[test]
    fn packets_keep_push_order() {
        let mut mt = MidiTransmitter::new(0);
        let mut log = PacketLog::default();

        mt.note_on(60, 100);
        mt.note_on(64, 100);
        mt.note_off(60, 0);
        mt.send_queue(&mut log);

        assert_eq!(log.packets[0].0[2], 60);
        assert_eq!(log.packets[1].0[2], 64);
        assert_eq!(log.packets[2].0[2], 60);
    }

    #[test]
    fn send_drains_the_queue() {
        let mut mt = MidiTransmitter::new(0);
        let mut log = PacketLog::default();

        mt.note_on(60, 100);
        assert_eq!(mt.pending(), 1);

        mt.send_queue(&mut log);
        assert_eq!(mt.pending(), 0);

        // nothing left to send the second time around
        mt.send_queue(&mut log);
        assert_eq!(log.packets.len(), 1);
    }

    #[test]
    fn overflowing_the_queue_drops_messages() {
        let mut mt = MidiTransmitter::new(0);

        for _ in 0..config::MIDI_QUEUE_LEN + 5 {
            mt.note_on(60, 100);
        }

        assert_eq!(mt.pending(), config::MIDI_QUEUE_LEN);
    }

    #[test]
    fn control_change_renders_with_its_own_code_index() {
        let mut mt = MidiTransmitter::new(0);
        let mut log = PacketLog::default();

        mt.push(MidiMessage::ControlChange(0.into(), 1.into(), 64.into()));
        mt.send_queue(&mut log);

        assert_eq!(&log.packets[..], &[UsbEventPacket([0x0B, 0xB0, 1, 64])]);
    }

    #[test]
    fn key_pressure_renders_with_its_own_code_index() {
        let mut mt = MidiTransmitter::new(0);
        let mut log = PacketLog::default();

        mt.push(MidiMessage::KeyPressure(0.into(), 60.into(), 100.into()));
        mt.send_queue(&mut log);

        assert_eq!(&log.packets[..], &[UsbEventPacket([0x0A, 0xA0, 60, 100])]);
    }

    #[test]
    fn unhandled_messages_render_nothing() {
        let mut mt = MidiTransmitter::new(0);
        let mut log = PacketLog::default();

        mt.push(MidiMessage::TimingClock);
        mt.send_queue(&mut log);

        assert!(log.packets.is_empty());
        assert_eq!(mt.pending(), 0);
    }
}
