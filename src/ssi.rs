//! # Synchronous Serial Interface (SSI) in SPI master mode
//!
//! [`Ssi::new`] brings SSI0 up on PA2..PA5 and the resulting value moves one
//! word at a time. There is no way to get an [`Ssi`] without running the
//! initialization, so transfers against an unconfigured controller cannot be
//! expressed.
//!
//! Transfers block on the FIFO status flags through a
//! [`WaitStrategy`](crate::wait::WaitStrategy). The default [`Spin`] strategy
//! never gives up; a stalled bus hangs the caller.
//!
//! ```
//! use tm4c123x_ssi::sim::SimRegisters;
//! use tm4c123x_ssi::ssi::{config::Config, Ssi};
//! use tm4c123x_ssi::sysctl::Clocks;
//!
//! let sim = SimRegisters::new();
//! let mut ssi: Ssi<_> = Ssi::new(&sim, Config::default(), Clocks::default());
//!
//! ssi.send(0xAA);
//! assert_eq!(sim.transmitted(), Some(0xAA));
//! ```

use core::{fmt, marker::PhantomData};

use void::{ResultVoidExt, Void};

use crate::{
    gpio,
    reg::{Register, RegisterFile},
    sysctl::{self, Clocks, Gate},
    time::rate::Hertz,
    wait::{Spin, WaitStrategy},
};

pub mod config;

pub use crate::hal::spi::{Mode, Phase, Polarity};
use config::{ClockSource, Config, DataSize, Divisor, FieldValue, Role, CPSDVSR, SCR, SSE};

/// SSI error
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The awaited status flag did not show up within the wait budget
    Timeout,
}

bitflags::bitflags! {
    /// Flags of the SSI status register (`SSISR`)
    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    pub struct Status: u32 {
        /// Transmit FIFO empty
        const TFE = 1 << 0;
        /// Transmit FIFO not full
        const TNF = 1 << 1;
        /// Receive FIFO not empty
        const RNE = 1 << 2;
        /// Receive FIFO full
        const RFF = 1 << 3;
        /// Controller busy transmitting or receiving a frame
        const BSY = 1 << 4;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Status({=u32:#x})", self.bits());
    }
}

/// Configuration trait for the Word Size
/// used by the SSI peripheral
pub trait Word: Copy {
    /// Returns the register configuration
    /// to set the word size
    fn register_config() -> DataSize;

    /// Converts the received data register contents into a word
    fn from_frame(frame: u32) -> Self;

    /// Converts a word into data register contents
    fn into_frame(self) -> u32;
}

impl Word for u8 {
    fn register_config() -> DataSize {
        DataSize::Bits8
    }

    fn from_frame(frame: u32) -> Self {
        (frame & DataSize::Bits8.word_mask()) as u8
    }

    fn into_frame(self) -> u32 {
        u32::from(self)
    }
}

impl Word for u16 {
    fn register_config() -> DataSize {
        DataSize::Bits16
    }

    fn from_frame(frame: u32) -> Self {
        (frame & DataSize::Bits16.word_mask()) as u16
    }

    fn into_frame(self) -> u32 {
        u32::from(self)
    }
}

/// SSI0 operating in SPI master mode
pub struct Ssi<R, W = Spin, WORD = u8> {
    regs: R,
    wait: W,
    config: Config,
    clocks: Clocks,
    divisor: Divisor,
    _word: PhantomData<WORD>,
}

impl<R, WORD> Ssi<R, Spin, WORD>
where
    R: RegisterFile,
    WORD: Word,
{
    /// Configures SSI0 to operate as a SPI master
    ///
    /// Enables the SSI0 and port A clocks, routes PA2..PA5 to SSI0 and sets
    /// the controller up with SSE cleared for the whole configuration. The
    /// controller is enabled as the very last step.
    ///
    /// With the default [`Config`] and [`Clocks`] the result is an 8-bit,
    /// idle low, first edge capturing Freescale SPI master at 1 MHz.
    pub fn new(regs: R, config: impl Into<Config>, clocks: Clocks) -> Self {
        let config = config.into();
        let divisor = Divisor::compute(clocks.sysclk(), config.frequency);

        sysctl::enable(&regs, Gate::Ssi0);
        sysctl::enable(&regs, Gate::GpioA);
        gpio::configure_ssi0_pins(&regs);

        regs.modify_field(SSE, 0);
        apply(&regs, config.loopback);
        apply(&regs, Role::Master);
        apply(&regs, ClockSource::System);
        regs.write(Register::Cpsr, CPSDVSR.insert(0, divisor.prescale.into()));
        regs.modify_field(SCR, divisor.scr.into());
        apply(&regs, config.mode.phase);
        apply(&regs, config.mode.polarity);
        apply(&regs, config.frame_format);
        apply(&regs, WORD::register_config());
        regs.modify_field(SSE, 1);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "SSI0 enabled with {}, CPSDVSR {=u8}, SCR {=u8}",
            config,
            divisor.prescale,
            divisor.scr
        );

        Ssi {
            regs,
            wait: Spin,
            config,
            clocks,
            divisor,
            _word: PhantomData,
        }
    }

    /// Sends a word, spinning until the transmit FIFO is empty
    ///
    /// Returns as soon as the word is accepted, not when it has been shifted
    /// out. Use [`flush`](Self::flush) to wait for the bus.
    pub fn send(&mut self, word: WORD) {
        self.try_send(word).void_unwrap()
    }

    /// Reads a word, spinning until the receive FIFO holds one
    pub fn read(&mut self) -> WORD {
        self.try_read().void_unwrap()
    }

    /// Sends a word and reads the word clocked in meanwhile
    pub fn transfer(&mut self, word: WORD) -> WORD {
        self.try_transfer(word).void_unwrap()
    }

    /// Spins until the last frame left the controller
    pub fn flush(&mut self) {
        self.try_flush().void_unwrap()
    }
}

impl<R, W, WORD> Ssi<R, W, WORD> {
    /// Swaps the wait strategy, keeping the hardware configuration
    pub fn with_wait<W2>(self, wait: W2) -> Ssi<R, W2, WORD>
    where
        W2: WaitStrategy,
    {
        Ssi {
            regs: self.regs,
            wait,
            config: self.config,
            clocks: self.clocks,
            divisor: self.divisor,
            _word: PhantomData,
        }
    }

    /// Configuration the controller was set up with
    pub fn config(&self) -> Config {
        self.config
    }

    /// Divisors programmed into CPSR and CR0
    pub fn divisor(&self) -> Divisor {
        self.divisor
    }

    /// Actual bit rate on the bus
    pub fn frequency(&self) -> Hertz {
        self.divisor.frequency(self.clocks.sysclk())
    }

    /// Releases the register file
    ///
    /// The controller stays configured and enabled.
    pub fn free(self) -> R {
        self.regs
    }
}

impl<R, W, WORD> Ssi<R, W, WORD>
where
    R: RegisterFile,
    W: WaitStrategy,
    WORD: Word,
{
    /// Current status flags
    pub fn status(&self) -> Status {
        status(&self.regs)
    }

    /// Sends a word once the transmit FIFO is empty
    pub fn try_send(&mut self, word: WORD) -> Result<(), W::Error> {
        let regs = &self.regs;
        self.wait.wait(|| poll_send(regs, word))
    }

    /// Reads a word once the receive FIFO holds one
    ///
    /// Only the bits of the word size are kept.
    pub fn try_read(&mut self) -> Result<WORD, W::Error> {
        let regs = &self.regs;
        self.wait.wait(|| poll_read(regs))
    }

    /// Sends a word and reads the word clocked in meanwhile
    pub fn try_transfer(&mut self, word: WORD) -> Result<WORD, W::Error> {
        self.try_send(word)?;
        self.try_read()
    }

    /// Waits until the transmit FIFO is empty and the controller is idle
    pub fn try_flush(&mut self) -> Result<(), W::Error> {
        let regs = &self.regs;
        self.wait.wait(|| {
            let status = status(regs);
            if status.contains(Status::TFE) && !status.contains(Status::BSY) {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        })
    }
}

fn apply<R: RegisterFile, V: FieldValue>(regs: &R, value: V) {
    regs.modify_field(V::FIELD, value.bits());
}

fn status<R: RegisterFile>(regs: &R) -> Status {
    Status::from_bits_truncate(regs.read(Register::Sr))
}

fn poll_send<R: RegisterFile, WORD: Word>(regs: &R, word: WORD) -> nb::Result<(), Void> {
    if status(regs).contains(Status::TFE) {
        regs.write(Register::Dr, word.into_frame());
        Ok(())
    } else {
        Err(nb::Error::WouldBlock)
    }
}

fn poll_read<R: RegisterFile, WORD: Word>(regs: &R) -> nb::Result<WORD, Void> {
    if status(regs).contains(Status::RNE) {
        Ok(WORD::from_frame(regs.read(Register::Dr)))
    } else {
        Err(nb::Error::WouldBlock)
    }
}

impl<R, W, WORD> fmt::Debug for Ssi<R, W, WORD> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ssi")
            .field("ssi", &"SSI0")
            .field("config", &self.config)
            .field("divisor", &self.divisor)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<R, W, WORD> defmt::Format for Ssi<R, W, WORD> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Ssi {{ ssi: SSI0, config: {} }}", self.config);
    }
}
