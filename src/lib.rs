#![no_std]
#![doc = include_str!("../README.md")]

pub mod baseline;
pub mod beam_sensor;
pub mod config;
pub mod harp;
pub mod midi_transmitter;
pub mod scale;
