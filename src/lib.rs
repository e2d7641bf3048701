/*!
 # TM4C123GH6PM SSI0 driver

 Brings the Synchronous Serial Interface module 0 up as a SPI master on port A
 (PA2 clock, PA3 frame, PA4 receive, PA5 transmit) and moves single words
 over it.

 All register accesses go through a [`RegisterFile`](reg::RegisterFile). On
 the target that is [`reg::Mmio`], on the host the driver can be exercised
 against [`sim::SimRegisters`].

 ```no_run
 use tm4c123x_ssi::prelude::*;
 use tm4c123x_ssi::{reg::Mmio, ssi::{config::Config, Ssi}, sysctl::Clocks};

 // NOTE(unsafe) only one owner of the SSI0 registers exists
 let regs = unsafe { Mmio::new() };
 let mut ssi: Ssi<_> = Ssi::new(regs, Config::default(), Clocks::default());

 ssi.send(0xAA);
 ```
*/
#![cfg_attr(not(test), no_std)]

pub use embedded_hal as hal;

pub use nb;
pub use nb::block;

pub mod gpio;
pub mod prelude;
pub mod reg;
pub mod sim;
pub mod ssi;
pub mod sysctl;
pub mod time;
pub mod wait;
