//! Types for configuring a ssi interface.
//!
//! Each configuration register field the driver writes is represented by a
//! named option implementing [`FieldValue`], which knows the position and
//! width of its field.

use core::fmt;

use crate::hal::spi::{self, Mode, Phase, Polarity};
use crate::reg::{Field, Register};
use crate::time::rate::Hertz;

/// A named value of a register field
pub trait FieldValue: Copy {
    /// The field the value is written to
    const FIELD: Field;

    /// Raw field value, not yet shifted into position
    fn bits(self) -> u32;
}

/// `CR1.SSE`, bit 1: synchronous serial port enable
pub const SSE: Field = Field::new(Register::Cr1, 1, 1);

/// `CR0.SCR`, bits 15:8: serial clock rate
pub const SCR: Field = Field::new(Register::Cr0, 8, 8);

/// `CPSR.CPSDVSR`, bits 7:0: clock prescale divisor
pub const CPSDVSR: Field = Field::new(Register::Cpsr, 0, 8);

/// Master / slave select, `CR1.MS` (bit 2)
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// The controller drives the clock
    Master,
    /// The controller is clocked by the bus
    Slave,
}

impl FieldValue for Role {
    const FIELD: Field = Field::new(Register::Cr1, 2, 1);

    fn bits(self) -> u32 {
        match self {
            Role::Master => 0,
            Role::Slave => 1,
        }
    }
}

/// Internal loopback, `CR1.LBM` (bit 0)
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Loopback {
    /// Normal serial port operation
    Disabled,
    /// The transmit shift register feeds the receive shift register
    Enabled,
}

impl FieldValue for Loopback {
    const FIELD: Field = Field::new(Register::Cr1, 0, 1);

    fn bits(self) -> u32 {
        match self {
            Loopback::Disabled => 0,
            Loopback::Enabled => 1,
        }
    }
}

/// Baud clock source, `CC.CS` (bits 3:0)
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// System clock
    System,
    /// Precision internal oscillator
    Piosc,
}

impl FieldValue for ClockSource {
    const FIELD: Field = Field::new(Register::Cc, 0, 4);

    fn bits(self) -> u32 {
        match self {
            ClockSource::System => 0x0,
            ClockSource::Piosc => 0x5,
        }
    }
}

/// Frame format, `CR0.FRF` (bits 5:4)
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameFormat {
    /// Freescale SPI frame format
    Freescale,
    /// Texas Instruments synchronous serial frame format
    TexasInstruments,
    /// MICROWIRE frame format
    Microwire,
}

impl FieldValue for FrameFormat {
    const FIELD: Field = Field::new(Register::Cr0, 4, 2);

    fn bits(self) -> u32 {
        match self {
            FrameFormat::Freescale => 0x0,
            FrameFormat::TexasInstruments => 0x1,
            FrameFormat::Microwire => 0x2,
        }
    }
}

/// Data size select, `CR0.DSS` (bits 3:0)
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataSize {
    /// 8-bit words
    Bits8,
    /// 16-bit words
    Bits16,
}

impl DataSize {
    /// Mask of the valid bits of a word in the data register
    pub fn word_mask(self) -> u32 {
        match self {
            DataSize::Bits8 => 0xFF,
            DataSize::Bits16 => 0xFFFF,
        }
    }
}

impl FieldValue for DataSize {
    const FIELD: Field = Field::new(Register::Cr0, 0, 4);

    fn bits(self) -> u32 {
        match self {
            DataSize::Bits8 => 0x7,
            DataSize::Bits16 => 0xF,
        }
    }
}

/// Serial clock phase, `CR0.SPH` (bit 7)
impl FieldValue for Phase {
    const FIELD: Field = Field::new(Register::Cr0, 7, 1);

    fn bits(self) -> u32 {
        match self {
            Phase::CaptureOnFirstTransition => 0,
            Phase::CaptureOnSecondTransition => 1,
        }
    }
}

/// Serial clock polarity, `CR0.SPO` (bit 6)
impl FieldValue for Polarity {
    const FIELD: Field = Field::new(Register::Cr0, 6, 1);

    fn bits(self) -> u32 {
        match self {
            Polarity::IdleLow => 0,
            Polarity::IdleHigh => 1,
        }
    }
}

/// Bit rate divisors
///
/// `SSInClk = SysClk / (CPSDVSR * (1 + SCR))`
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Divisor {
    /// Clock prescale divisor, even, 2 to 254
    pub prescale: u8,
    /// Serial clock rate, 0 to 255
    pub scr: u8,
}

impl Divisor {
    /// Slowest bit rate the controller can produce
    pub const SLOWEST: Divisor = Divisor {
        prescale: 254,
        scr: 255,
    };

    /// Computes the divisors for the fastest bit rate not above `frequency`
    ///
    /// A serial clock rate of zero is preferred, it is only raised when the
    /// prescaler alone cannot divide far enough. Frequencies below the
    /// slowest possible bit rate are clamped to it.
    pub fn compute(sysclk: Hertz, frequency: Hertz) -> Self {
        if frequency.0 == 0 {
            return Divisor::SLOWEST;
        }

        let ratio = div_ceil(sysclk.0, frequency.0).max(2);
        for scr in 0..=u32::from(u8::MAX) {
            let mut prescale = div_ceil(ratio, scr + 1).max(2);
            // CPSDVSR must be even
            prescale += prescale & 1;
            if prescale <= 254 {
                return Divisor {
                    prescale: prescale as u8,
                    scr: scr as u8,
                };
            }
        }
        Divisor::SLOWEST
    }

    /// Resulting bit rate for a system clock
    pub fn frequency(self, sysclk: Hertz) -> Hertz {
        Hertz(sysclk.0 / (u32::from(self.prescale) * (1 + u32::from(self.scr))))
    }
}

fn div_ceil(a: u32, b: u32) -> u32 {
    a / b + u32::from(a % b != 0)
}

/// Configuration struct for [`Ssi`](super::Ssi) providing all
/// communication-related / parameters.
///
/// The default configuration can be obtained by:
///
/// ```
/// # use tm4c123x_ssi::ssi::config::Config;
/// let config = Config::default();
/// ```
///
/// [`Ssi`](super::Ssi) defaults to [`spi::MODE_0`], the Freescale SPI frame
/// format, no internal loopback and a frequency of 1 MHz.
///
/// Create a configuration by using `default` in combination with the
/// builder methods:
///
/// ```
/// # use tm4c123x_ssi::ssi::config::{Config, FrameFormat};
/// # use tm4c123x_ssi::time::rate::Hertz;
/// let config = Config::default().frequency(Hertz(4_000_000));
///
/// assert!(config.frequency.0 == 4_000_000);
/// assert!(config.frame_format == FrameFormat::Freescale);
/// ```
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct Config {
    /// Operating frequency of the SSI peripheral.
    pub frequency: Hertz,
    /// Operation Mode as defined by the [`embedded-hal`](crate::hal)
    pub mode: Mode,
    /// Frame format
    pub frame_format: FrameFormat,
    /// Internal loopback
    pub loopback: Loopback,
}

impl Config {
    /// Set the operating frequency of the SSI
    pub fn frequency(mut self, frequency: impl Into<Hertz>) -> Self {
        self.frequency = frequency.into();
        self
    }

    /// Set the Operation Mode
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the frame format
    pub fn frame_format(mut self, frame_format: FrameFormat) -> Self {
        self.frame_format = frame_format;
        self
    }

    /// Connect the transmitter to the receiver internally
    pub fn loopback(mut self, enabled: bool) -> Self {
        self.loopback = if enabled {
            Loopback::Enabled
        } else {
            Loopback::Disabled
        };
        self
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.frequency.0 == other.frequency.0
            && self.mode == other.mode
            && self.frame_format == other.frame_format
            && self.loopback == other.loopback
    }
}

impl Eq for Config {}

fn mode_number(mode: Mode) -> u8 {
    if mode == spi::MODE_0 {
        0
    } else if mode == spi::MODE_1 {
        1
    } else if mode == spi::MODE_2 {
        2
    } else {
        3
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("frequency", &format_args!("{} Hz", self.frequency.0))
            .field("mode", &format_args!("MODE_{}", mode_number(self.mode)))
            .field("frame_format", &self.frame_format)
            .field("loopback", &self.loopback)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Config {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Config {{ frequency: {} Hz, mode: MODE_{}, frame_format: {}, loopback: {} }}",
            self.frequency.0,
            mode_number(self.mode),
            self.frame_format,
            self.loopback,
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frequency: Hertz(1_000_000),
            mode: spi::MODE_0,
            frame_format: FrameFormat::Freescale,
            loopback: Loopback::Disabled,
        }
    }
}

impl From<Hertz> for Config {
    fn from(frequency: Hertz) -> Config {
        Config {
            frequency,
            ..Default::default()
        }
    }
}
