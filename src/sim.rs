//! Simulated register file
//!
//! [`SimRegisters`] stands in for the silicon on the host. Configuration
//! registers are plain storage, the status register is computed from the
//! simulated FIFO state and the data register is split into a transmit and a
//! receive side, like on the real controller.
//!
//! ```
//! use tm4c123x_ssi::sim::SimRegisters;
//! use tm4c123x_ssi::ssi::{config::Config, Ssi};
//! use tm4c123x_ssi::sysctl::Clocks;
//!
//! let sim = SimRegisters::new().with_external_loopback();
//! let mut ssi: Ssi<_> = Ssi::new(&sim, Config::default(), Clocks::default());
//!
//! assert_eq!(ssi.transfer(0x5C), 0x5C);
//! ```

use core::cell::Cell;

use crate::reg::{Field, Register, RegisterFile};
use crate::ssi::config::{FieldValue, Loopback, SSE};
use crate::ssi::Status;

const LBM: Field = Loopback::FIELD;

/// Number of writes kept in the log
pub const LOG_CAPACITY: usize = 128;

/// A logged register write
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Access {
    /// Register written
    pub register: Register,
    /// Value written
    pub value: u32,
    /// Number of status register reads before the write
    pub status_polls: u32,
}

/// Host side simulation of the registers used by the driver
#[derive(Debug)]
pub struct SimRegisters {
    values: [Cell<u32>; Register::COUNT],
    tx_empty: Cell<bool>,
    tx_delay: Cell<Option<u32>>,
    transmitted: Cell<Option<u32>>,
    rx: Cell<Option<u32>>,
    rx_delay: Cell<Option<(u32, u32)>>,
    busy_polls: Cell<u32>,
    external_loopback: Cell<bool>,
    status_polls: Cell<u32>,
    log: [Cell<Option<Access>>; LOG_CAPACITY],
    log_len: Cell<usize>,
    dropped: Cell<usize>,
}

impl SimRegisters {
    /// Registers after reset: everything zero, transmit FIFO empty, nothing
    /// received
    pub fn new() -> Self {
        const ZERO: Cell<u32> = Cell::new(0);
        const EMPTY: Cell<Option<Access>> = Cell::new(None);

        SimRegisters {
            values: [ZERO; Register::COUNT],
            tx_empty: Cell::new(true),
            tx_delay: Cell::new(None),
            transmitted: Cell::new(None),
            rx: Cell::new(None),
            rx_delay: Cell::new(None),
            busy_polls: Cell::new(0),
            external_loopback: Cell::new(false),
            status_polls: Cell::new(0),
            log: [EMPTY; LOG_CAPACITY],
            log_len: Cell::new(0),
            dropped: Cell::new(0),
        }
    }

    /// Wires the transmit pin to the receive pin (PA5 to PA4)
    pub fn with_external_loopback(self) -> Self {
        self.external_loopback.set(true);
        self
    }

    /// Connects or disconnects the external loopback wire
    pub fn set_external_loopback(&self, wired: bool) {
        self.external_loopback.set(wired);
    }

    /// Forces the "transmit FIFO empty" flag
    pub fn set_tx_empty(&self, empty: bool) {
        self.tx_delay.set(None);
        self.tx_empty.set(empty);
    }

    /// Keeps the transmit FIFO occupied for `polls` status reads
    pub fn tx_ready_after(&self, polls: u32) {
        self.tx_empty.set(false);
        self.tx_delay.set(Some(polls));
    }

    /// Makes `word` available in the receive FIFO right away
    pub fn receive(&self, word: u32) {
        self.rx_delay.set(None);
        self.rx.set(Some(word));
    }

    /// Makes `word` available in the receive FIFO after `polls` status reads
    pub fn rx_after(&self, polls: u32, word: u32) {
        self.rx.set(None);
        self.rx_delay.set(Some((polls, word)));
    }

    /// Reports the controller busy for `polls` status reads
    pub fn busy_for(&self, polls: u32) {
        self.busy_polls.set(polls);
    }

    /// Last word written to the data register
    pub fn transmitted(&self) -> Option<u32> {
        self.transmitted.get()
    }

    /// Whether a received word waits in the receive FIFO
    pub fn rx_pending(&self) -> bool {
        self.rx.get().is_some()
    }

    /// Number of status register reads so far
    pub fn status_polls(&self) -> u32 {
        self.status_polls.get()
    }

    /// Reads a register without side effects
    ///
    /// The data register shows the last transmitted word.
    pub fn peek(&self, register: Register) -> u32 {
        match register {
            Register::Sr => self.current_status().bits(),
            Register::Dr => self.transmitted.get().unwrap_or(0),
            _ => self.values[register.index()].get(),
        }
    }

    /// Side effect free copy of all registers, indexed by [`Register::index`]
    pub fn snapshot(&self) -> [u32; Register::COUNT] {
        let mut snapshot = [0; Register::COUNT];
        for register in Register::ALL.iter() {
            snapshot[register.index()] = self.peek(*register);
        }
        snapshot
    }

    /// Logged writes, oldest first
    pub fn writes(&self) -> impl Iterator<Item = Access> + '_ {
        self.log[..self.log_len.get()].iter().filter_map(Cell::get)
    }

    /// Logged writes to one register, oldest first
    pub fn writes_to(&self, register: Register) -> impl Iterator<Item = Access> + '_ {
        self.writes().filter(move |access| access.register == register)
    }

    /// Number of writes that did not fit into the log
    pub fn dropped_writes(&self) -> usize {
        self.dropped.get()
    }

    /// Empties the write log
    pub fn clear_log(&self) {
        for entry in self.log.iter() {
            entry.set(None);
        }
        self.log_len.set(0);
        self.dropped.set(0);
    }

    fn current_status(&self) -> Status {
        let mut status = Status::empty();
        status.set(Status::TFE, self.tx_empty.get());
        status.set(Status::TNF, self.tx_empty.get());
        status.set(Status::RNE, self.rx.get().is_some());
        status.set(Status::BSY, self.busy_polls.get() > 0);
        status
    }

    fn poll_status(&self) -> u32 {
        self.status_polls.set(self.status_polls.get().wrapping_add(1));

        match self.tx_delay.get() {
            Some(0) => {
                self.tx_delay.set(None);
                self.tx_empty.set(true);
            }
            Some(n) => self.tx_delay.set(Some(n - 1)),
            None => {}
        }
        match self.rx_delay.get() {
            Some((0, word)) => {
                self.rx_delay.set(None);
                self.rx.set(Some(word));
            }
            Some((n, word)) => self.rx_delay.set(Some((n - 1, word))),
            None => {}
        }

        let status = self.current_status();
        let busy = self.busy_polls.get();
        if busy > 0 {
            self.busy_polls.set(busy - 1);
        }
        status.bits()
    }

    fn log_write(&self, register: Register, value: u32) {
        let len = self.log_len.get();
        if len < LOG_CAPACITY {
            self.log[len].set(Some(Access {
                register,
                value,
                status_polls: self.status_polls.get(),
            }));
            self.log_len.set(len + 1);
        } else {
            self.dropped.set(self.dropped.get() + 1);
        }
    }

    fn shift_out(&self, word: u32) {
        self.transmitted.set(Some(word));

        let cr1 = self.values[Register::Cr1.index()].get();
        if SSE.extract(cr1) == 0 {
            return;
        }
        if self.external_loopback.get() || LBM.extract(cr1) == 1 {
            self.rx.set(Some(word & 0xFFFF));
        }
    }
}

impl Default for SimRegisters {
    fn default() -> Self {
        SimRegisters::new()
    }
}

impl RegisterFile for SimRegisters {
    fn read(&self, register: Register) -> u32 {
        match register {
            Register::Sr => self.poll_status(),
            Register::Dr => self.rx.take().unwrap_or(0),
            _ => self.values[register.index()].get(),
        }
    }

    fn write(&self, register: Register, value: u32) {
        self.log_write(register, value);
        match register {
            // read-only
            Register::Sr => {}
            Register::Dr => self.shift_out(value),
            _ => self.values[register.index()].set(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_the_countdowns() {
        let sim = SimRegisters::new();
        sim.tx_ready_after(2);
        sim.rx_after(1, 0x1A5);

        let first = Status::from_bits_truncate(sim.read(Register::Sr));
        assert!(!first.contains(Status::TFE));
        assert!(!first.contains(Status::RNE));

        let second = Status::from_bits_truncate(sim.read(Register::Sr));
        assert!(!second.contains(Status::TFE));
        assert!(second.contains(Status::RNE));

        let third = Status::from_bits_truncate(sim.read(Register::Sr));
        assert!(third.contains(Status::TFE | Status::TNF));
        assert_eq!(sim.status_polls(), 3);

        assert_eq!(sim.read(Register::Dr), 0x1A5);
        assert!(!sim.rx_pending());
    }

    #[test]
    fn status_register_is_read_only() {
        let sim = SimRegisters::new();
        sim.write(Register::Sr, 0);
        assert!(Status::from_bits_truncate(sim.peek(Register::Sr)).contains(Status::TFE));
        assert_eq!(sim.writes().count(), 1);
    }

    #[test]
    fn loopback_needs_an_enabled_controller() {
        let sim = SimRegisters::new().with_external_loopback();
        sim.write(Register::Dr, 0x12);
        assert!(!sim.rx_pending());
        assert_eq!(sim.transmitted(), Some(0x12));

        sim.write(Register::Cr1, SSE.mask());
        sim.write(Register::Dr, 0x34);
        assert_eq!(sim.read(Register::Dr), 0x34);
    }

    #[test]
    fn internal_loopback_mode_echoes() {
        let sim = SimRegisters::new();
        sim.write(Register::Cr1, SSE.mask() | LBM.mask());
        sim.write(Register::Dr, 0x77);
        assert_eq!(sim.read(Register::Dr), 0x77);
    }

    #[test]
    fn log_overflow_is_counted() {
        let sim = SimRegisters::new();
        for i in 0..(LOG_CAPACITY as u32 + 3) {
            sim.write(Register::Cpsr, i);
        }
        assert_eq!(sim.writes().count(), LOG_CAPACITY);
        assert_eq!(sim.dropped_writes(), 3);

        sim.clear_log();
        assert_eq!(sim.writes().count(), 0);
        assert_eq!(sim.peek(Register::Cpsr), LOG_CAPACITY as u32 + 2);
    }
}
