//! # General Purpose Input / Output
//!
//! Pin multiplexing for SSI0 on port A.
//!
//! | Pin | Signal   |
//! |-----|----------|
//! | PA2 | SSI0Clk  |
//! | PA3 | SSI0Fss  |
//! | PA4 | SSI0Rx   |
//! | PA5 | SSI0Tx   |

use crate::reg::{Field, Register, RegisterFile};

/// Port A pins routed to SSI0
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pin {
    /// PA2
    PA2 = 2,
    /// PA3
    PA3 = 3,
    /// PA4
    PA4 = 4,
    /// PA5
    PA5 = 5,
}

impl Pin {
    /// Pin number within the port
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Bit of the pin in the AFSEL / DEN registers
    pub const fn mask(self) -> u32 {
        1 << self.index()
    }

    /// Port mux control field (PMCn) of the pin in PCTL
    pub const fn pmc(self) -> Field {
        Field::new(Register::GpioaPctl, self.index() * 4, 4)
    }
}

/// SSI signal carried by a pin
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    /// Serial clock
    Clk,
    /// Frame signal (chip select)
    Fss,
    /// Receive (MISO in master mode)
    Rx,
    /// Transmit (MOSI in master mode)
    Tx,
}

/// Pins used by SSI0 in the fixed order clock, frame, receive, transmit
pub const SSI0_PINS: [(Pin, Signal); 4] = [
    (Pin::PA2, Signal::Clk),
    (Pin::PA3, Signal::Fss),
    (Pin::PA4, Signal::Rx),
    (Pin::PA5, Signal::Tx),
];

/// PMCn encoding selecting SSI0 on PA2..PA5
pub const PMC_SSI0: u32 = 0x2;

/// Mask of all SSI0 pins in the AFSEL / DEN registers (`0x3C`)
pub const fn ssi0_pin_mask() -> u32 {
    let mut mask = 0;
    let mut i = 0;
    while i < SSI0_PINS.len() {
        mask |= SSI0_PINS[i].0.mask();
        i += 1;
    }
    mask
}

/// Routes PA2..PA5 to SSI0 and enables their digital function
///
/// The port A clock must be enabled before calling this.
pub fn configure_ssi0_pins<R: RegisterFile>(regs: &R) {
    let pins = ssi0_pin_mask();

    regs.set_bits(Register::GpioaAfsel, pins);

    // clear all PMCn fields first, then select SSI0 on each of them
    let pmc_mask = SSI0_PINS
        .iter()
        .fold(0, |mask, (pin, _)| mask | pin.pmc().mask());
    regs.clear_bits(Register::GpioaPctl, pmc_mask);
    let pmc_value = SSI0_PINS
        .iter()
        .fold(0, |value, (pin, _)| pin.pmc().insert(value, PMC_SSI0));
    regs.set_bits(Register::GpioaPctl, pmc_value);

    regs.set_bits(Register::GpioaDen, pins);
}
