//! System Control: clock gating and the system clock
//!
//! Only the parts needed by SSI0 are covered. The clock tree itself is not
//! configured here, [`Clocks`] only records the frequency the core runs at.

use core::fmt;

use crate::reg::{Register, RegisterFile};
use crate::time::rate::Hertz;

/// Default system clock, 50 MHz from the PLL
pub const SYSCLK: Hertz = Hertz(50_000_000);

/// Run mode clock gates
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gate {
    /// SSI module 0, `RCGCSSI.R0`
    Ssi0,
    /// GPIO port A, `RCGCGPIO.R0`
    GpioA,
}

impl Gate {
    fn register(self) -> Register {
        match self {
            Gate::Ssi0 => Register::Rcgcssi,
            Gate::GpioA => Register::Rcgcgpio,
        }
    }

    fn mask(self) -> u32 {
        match self {
            Gate::Ssi0 | Gate::GpioA => 1 << 0,
        }
    }
}

/// Enables the run mode clock of a module
pub fn enable<R: RegisterFile>(regs: &R, gate: Gate) {
    regs.set_bits(gate.register(), gate.mask());
}

/// Returns whether the run mode clock of a module is enabled
pub fn is_enabled<R: RegisterFile>(regs: &R, gate: Gate) -> bool {
    regs.read(gate.register()) & gate.mask() != 0
}

/// Frozen clock frequencies
///
/// The existence of this value indicates that the clock configuration can no
/// longer be changed.
#[derive(Clone, Copy)]
pub struct Clocks {
    sysclk: Hertz,
}

impl Clocks {
    /// Records the frequency the system clock was set up to run at
    pub fn new(sysclk: Hertz) -> Self {
        Clocks { sysclk }
    }

    /// Returns the system (core) frequency
    pub fn sysclk(&self) -> Hertz {
        self.sysclk
    }
}

impl Default for Clocks {
    fn default() -> Self {
        Clocks::new(SYSCLK)
    }
}

impl fmt::Debug for Clocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clocks")
            .field("sysclk", &format_args!("{} Hz", self.sysclk.0))
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Clocks {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Clocks {{ sysclk: {} Hz }}", self.sysclk.0);
    }
}
