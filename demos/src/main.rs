//! Transmits 0xAA over SSI0 every 100 ms.
//!
//! With the `ext-loopback` feature and PA5 (SSI0Tx) wired to PA4 (SSI0Rx), every
//! word is read back and both are printed over semihosting.
//!
//! Target board: EK-TM4C123GXL, system clock at 50 MHz
#![no_std]
#![no_main]

use panic_semihosting as _;

use cortex_m::asm;
use cortex_m_rt::entry;
#[cfg(feature = "ext-loopback")]
use cortex_m_semihosting::hprintln;

use tm4c123x_ssi as hal;

use hal::reg::Mmio;
use hal::ssi::{config::Config, Ssi};
use hal::sysctl::Clocks;

/// Busy wait for `ms` milliseconds at the system clock
fn delay_ms(clocks: &Clocks, ms: u32) {
    asm::delay(clocks.sysclk().0 / 1_000 * ms);
}

#[entry]
fn main() -> ! {
    let clocks = Clocks::default();

    // NOTE(unsafe) this is the only owner of the SSI0 registers
    let regs = unsafe { Mmio::new() };
    let mut ssi: Ssi<_> = Ssi::new(regs, Config::default(), clocks);

    let tx_data: u8 = 0xAA;

    loop {
        #[cfg(not(feature = "ext-loopback"))]
        ssi.send(tx_data);

        #[cfg(feature = "ext-loopback")]
        {
            let rx_data = ssi.transfer(tx_data);
            hprintln!("(SPI) TX DATA: {:#04X} RX DATA: {:#04X}", tx_data, rx_data).ok();
        }

        delay_ms(&clocks, 100);
    }
}
