//! Plot a simulated beam capture.
//!
//! One beam gets "plucked": the reading drops while a hand sits in the beam,
//! then the beam is restored into a slightly brighter room. The plot shows
//! the raw reading, the baseline tracking it, and the note gate. Any MIDI
//! packets the harp produces along the way are printed to stdout.
//!
//! Look in /images/ for the resulting plot.
//!
//! Requires plotters lib: https://docs.rs/plotters/latest/plotters/. Tested on an Ubuntu machine.

use laser_harp::baseline::RawSampleSource;
use laser_harp::harp::LaserHarp;
use laser_harp::midi_transmitter::{MidiTransmitter, UsbEventPacket, UsbMidiWriter};
use laser_harp::scale::ScaleSignal;

use plotters::prelude::*;

const NUM_POLLS: usize = 900;

/// A scripted stand-in for the ADC: beam 0 follows the story below, the rest
/// of the beams sit at a steady ambient level.
struct SimSource {
    poll: usize,
}

impl SimSource {
    fn beam_0_level(&self) -> u16 {
        match self.poll {
            // steady ambient light
            0..=299 => 520,
            // a hand in the beam
            300..=599 => 180,
            // beam restored, the room a touch brighter than before
            _ => 560,
        }
    }
}

impl RawSampleSource for SimSource {
    fn read_raw(&mut self, sensor: usize) -> u16 {
        if sensor == 0 {
            self.beam_0_level()
        } else {
            520
        }
    }
}

/// Prints each packet instead of handing it to a USB stack.
struct StdoutWriter;

impl UsbMidiWriter for StdoutWriter {
    fn write_packet(&mut self, packet: UsbEventPacket) {
        println!("midi packet: {:02x?}", packet.0);
    }
}

static SCALE_SIGNAL: ScaleSignal = ScaleSignal::new();

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut source = SimSource { poll: 0 };
    let mut midi = MidiTransmitter::new(0);
    let mut writer = StdoutWriter;

    let mut harp = LaserHarp::new(&SCALE_SIGNAL, &mut source);

    // (raw, baseline, gate) for beam 0, one sample per poll
    let mut trace = Vec::with_capacity(NUM_POLLS);

    for poll in 0..NUM_POLLS {
        source.poll = poll;
        harp.poll(&mut source, &mut midi);
        midi.send_queue(&mut writer);

        let beam = &harp.beams()[0];
        trace.push((source.beam_0_level(), beam.baseline(), beam.is_sounding()));
    }

    std::fs::create_dir_all("images")?;
    let root =
        BitMapBackend::new("images/harp_capture_plot.png", (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Beam capture", ("sans-serif", 40))?;

    let sub_areas = root.split_evenly((2, 1));

    // top chart: the raw reading in red with the baseline tracking it in blue
    let mut chart = ChartBuilder::on(&sub_areas[0])
        .caption("Raw reading and baseline", ("sans-serif", 15).into_font())
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0f32..NUM_POLLS as f32, 0f32..800f32)?;

    chart
        .configure_mesh()
        .x_desc("Poll cycle")
        .y_desc("Raw units")
        .draw()?;

    chart.draw_series(LineSeries::new(
        trace
            .iter()
            .enumerate()
            .map(|(x, (raw, _, _))| (x as f32, *raw as f32)),
        RED,
    ))?;

    chart.draw_series(LineSeries::new(
        trace
            .iter()
            .enumerate()
            .map(|(x, (_, baseline, _))| (x as f32, *baseline as f32)),
        BLUE,
    ))?;

    // bottom chart: the note gate
    let mut chart = ChartBuilder::on(&sub_areas[1])
        .caption("Note gate", ("sans-serif", 15).into_font())
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0f32..NUM_POLLS as f32, -0.25f32..1.25f32)?;

    chart
        .configure_mesh()
        .x_desc("Poll cycle")
        .y_desc("Gate")
        .draw()?;

    chart.draw_series(LineSeries::new(
        trace
            .iter()
            .enumerate()
            .map(|(x, (_, _, gate))| (x as f32, if *gate { 1.0f32 } else { 0.0f32 })),
        GREEN,
    ))?;

    root.present()?;

    Ok(())
}
