//! Transceiver channels and the pool of hardware lanes they are claimed from.
//!
//! A lane is a hardware block that can load the joybus transceiver program
//! into its instruction memory and run it on one of a small number of
//! execution slots. Every port claims exactly one slot for the lifetime of
//! the process.
use std::fmt::Display;

use thiserror::Error;

use crate::config::LaneConfig;

/// Reasons a port could not be bound to transceiver hardware
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    #[error("no lane has room for the transceiver program")]
    NoProgramSpace,
    #[error("no free execution slot on lane {0}")]
    NoFreeSlot(usize),
    #[error("unable to open channel for GP{pin}: {reason}")]
    Open { pin: u8, reason: String },
}

/// Byte oriented duplex exchange primitive bound to one data line. The
/// bit-level timing is the implementor's concern.
pub trait Transceiver {
    /// Queue a single byte for transmission
    fn send(&mut self, byte: u8);
    /// Returns the next received byte, if one is available
    fn try_receive(&mut self) -> Option<u8>;
    /// Force the channel to its idle/listening state and drop any buffered
    /// bytes. Must be safe to call at any time, including mid-exchange.
    fn reset(&mut self);
}

/// Opens the [Transceiver] for a claimed [ChannelBinding]
pub trait TransceiverBackend {
    fn open(&mut self, binding: &ChannelBinding) -> Result<Box<dyn Transceiver>, Unavailable>;
}

/// Identifies the lane, execution slot and program offset a port is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelBinding {
    pub lane: usize,
    pub slot: u8,
    pub offset: u8,
    pub pin: u8,
}

impl Display for ChannelBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lane {} slot {} offset {} (GP{})",
            self.lane, self.slot, self.offset, self.pin
        )
    }
}

#[derive(Debug, Clone)]
struct Lane {
    program_space: u8,
    program_used: u8,
    slots: Vec<bool>,
}

impl Lane {
    fn new(program_space: u8, slots: u8) -> Self {
        Self {
            program_space,
            program_used: 0,
            slots: vec![false; slots as usize],
        }
    }

    fn can_add_program(&self, length: u8) -> bool {
        length > 0 && self.program_space - self.program_used >= length
    }

    fn free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|claimed| !claimed)
    }
}

/// Fixed-capacity pool of transceiver lanes. Bindings are handed out in
/// lane priority order and are never returned.
#[derive(Debug, Clone)]
pub struct ChannelPool {
    lanes: Vec<Lane>,
    program_length: u8,
}

impl ChannelPool {
    /// Create a new pool where each lane is given as `(program_space, slots)`
    pub fn new(lanes: &[(u8, u8)], program_length: u8) -> Self {
        let lanes = lanes
            .iter()
            .map(|(space, slots)| Lane::new(*space, *slots))
            .collect();
        Self {
            lanes,
            program_length,
        }
    }

    pub fn from_config(lanes: &[LaneConfig], program_length: u8) -> Self {
        let lanes: Vec<(u8, u8)> = lanes
            .iter()
            .map(|lane| (lane.program_space, lane.slots))
            .collect();
        Self::new(lanes.as_slice(), program_length)
    }

    /// Claim a channel for the given data pin from the first lane that can
    /// both load the program and run it.
    pub fn acquire(&mut self, pin: u8) -> Result<ChannelBinding, Unavailable> {
        let binding = self.reserve(pin)?;
        self.commit(&binding);
        Ok(binding)
    }

    /// Find the channel [ChannelPool::acquire] would claim without claiming
    /// it. Nothing is held until the binding is passed to
    /// [ChannelPool::commit].
    pub fn reserve(&self, pin: u8) -> Result<ChannelBinding, Unavailable> {
        let mut first_full_lane = None;
        for (index, lane) in self.lanes.iter().enumerate() {
            if !lane.can_add_program(self.program_length) {
                continue;
            }
            let Some(slot) = lane.free_slot() else {
                first_full_lane.get_or_insert(index);
                continue;
            };

            return Ok(ChannelBinding {
                lane: index,
                slot: slot as u8,
                offset: lane.program_used,
                pin,
            });
        }

        match first_full_lane {
            Some(lane) => Err(Unavailable::NoFreeSlot(lane)),
            None => Err(Unavailable::NoProgramSpace),
        }
    }

    /// Load the program and claim the slot of a binding returned by
    /// [ChannelPool::reserve]. The pool must not have changed in between.
    pub fn commit(&mut self, binding: &ChannelBinding) {
        let Some(lane) = self.lanes.get_mut(binding.lane) else {
            return;
        };
        lane.program_used = binding.offset + self.program_length;
        if let Some(claimed) = lane.slots.get_mut(binding.slot as usize) {
            *claimed = true;
        }
        log::debug!("Claimed transceiver channel: {binding}");
    }

    /// Number of lanes in the pool
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Number of execution slots that have not been claimed
    pub fn free_slots(&self) -> usize {
        self.lanes
            .iter()
            .map(|lane| lane.slots.iter().filter(|claimed| !**claimed).count())
            .sum()
    }
}
