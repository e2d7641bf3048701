//! Register access
//!
//! The driver never touches a fixed global. Everything goes through a
//! [`RegisterFile`], which is either the real memory mapped hardware ([`Mmio`])
//! or a simulation such as [`SimRegisters`](crate::sim::SimRegisters).

use core::ptr;

const SYSCTL: usize = 0x400F_E000;
const GPIOA: usize = 0x4000_4000;
const SSI0: usize = 0x4000_8000;

/// Registers used by the SSI0 driver
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// GPIO run mode clock gating control
    Rcgcgpio,
    /// SSI run mode clock gating control
    Rcgcssi,
    /// Port A alternate function select
    GpioaAfsel,
    /// Port A digital enable
    GpioaDen,
    /// Port A port control (pin mux)
    GpioaPctl,
    /// SSI0 control 0
    Cr0,
    /// SSI0 control 1
    Cr1,
    /// SSI0 data
    Dr,
    /// SSI0 status (read-only)
    Sr,
    /// SSI0 clock prescale
    Cpsr,
    /// SSI0 clock configuration
    Cc,
}

impl Register {
    /// Number of registers
    pub const COUNT: usize = 11;

    /// All registers, in index order
    pub const ALL: [Register; Register::COUNT] = [
        Register::Rcgcgpio,
        Register::Rcgcssi,
        Register::GpioaAfsel,
        Register::GpioaDen,
        Register::GpioaPctl,
        Register::Cr0,
        Register::Cr1,
        Register::Dr,
        Register::Sr,
        Register::Cpsr,
        Register::Cc,
    ];

    /// Absolute address of the register on the TM4C123GH6PM
    pub const fn address(self) -> usize {
        match self {
            Register::Rcgcgpio => SYSCTL + 0x608,
            Register::Rcgcssi => SYSCTL + 0x61C,
            Register::GpioaAfsel => GPIOA + 0x420,
            Register::GpioaDen => GPIOA + 0x51C,
            Register::GpioaPctl => GPIOA + 0x52C,
            Register::Cr0 => SSI0,
            Register::Cr1 => SSI0 + 0x004,
            Register::Dr => SSI0 + 0x008,
            Register::Sr => SSI0 + 0x00C,
            Register::Cpsr => SSI0 + 0x010,
            Register::Cc => SSI0 + 0xFC8,
        }
    }

    /// Position of the register in [`Register::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A bit field inside a register
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// Register containing the field
    pub register: Register,
    /// Position of the least significant bit
    pub offset: u8,
    /// Width in bits
    pub width: u8,
}

impl Field {
    /// Creates a field descriptor
    pub const fn new(register: Register, offset: u8, width: u8) -> Self {
        Field {
            register,
            offset,
            width,
        }
    }

    /// Mask of the field at its position in the register
    pub const fn mask(self) -> u32 {
        (u32::MAX >> (32 - self.width as u32)) << self.offset
    }

    /// Replaces the field in `bits` with `value`
    ///
    /// `value` is truncated to the field width.
    pub const fn insert(self, bits: u32, value: u32) -> u32 {
        bits & !self.mask() | (value << self.offset) & self.mask()
    }

    /// Extracts the field from `bits`
    pub const fn extract(self, bits: u32) -> u32 {
        (bits & self.mask()) >> self.offset
    }
}

/// Word-wide access to the registers of [`Register`]
///
/// Implementors only provide plain reads and writes; read-modify-write helpers
/// are built on top of them.
pub trait RegisterFile {
    /// Reads the whole register
    fn read(&self, register: Register) -> u32;

    /// Writes the whole register
    fn write(&self, register: Register, value: u32);

    /// Read-modify-write of the whole register
    #[inline]
    fn modify<F>(&self, register: Register, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let bits = self.read(register);
        self.write(register, f(bits));
    }

    /// Sets every bit of `mask`
    #[inline]
    fn set_bits(&self, register: Register, mask: u32) {
        self.modify(register, |r| r | mask);
    }

    /// Clears every bit of `mask`
    #[inline]
    fn clear_bits(&self, register: Register, mask: u32) {
        self.modify(register, |r| r & !mask);
    }

    /// Replaces a single field, leaving the other bits of its register alone
    #[inline]
    fn modify_field(&self, field: Field, value: u32) {
        self.modify(field.register, |r| field.insert(r, value));
    }

    /// Reads a single field
    #[inline]
    fn read_field(&self, field: Field) -> u32 {
        field.extract(self.read(field.register))
    }
}

impl<T> RegisterFile for &T
where
    T: RegisterFile + ?Sized,
{
    #[inline]
    fn read(&self, register: Register) -> u32 {
        (**self).read(register)
    }

    #[inline]
    fn write(&self, register: Register, value: u32) {
        (**self).write(register, value)
    }
}

/// The memory mapped registers of the TM4C123GH6PM
#[derive(Debug)]
pub struct Mmio {
    _0: (),
}

impl Mmio {
    /// Grants access to the memory mapped registers
    ///
    /// # Safety
    ///
    /// Must only be used on a TM4C123GH6PM, and only one `Mmio` may be used to
    /// drive SSI0 at a time.
    pub unsafe fn new() -> Self {
        Mmio { _0: () }
    }
}

impl RegisterFile for Mmio {
    #[inline]
    fn read(&self, register: Register) -> u32 {
        // NOTE(unsafe) the address is a valid, aligned peripheral register
        unsafe { ptr::read_volatile(register.address() as *const u32) }
    }

    #[inline]
    fn write(&self, register: Register, value: u32) {
        // NOTE(unsafe) the address is a valid, aligned peripheral register
        unsafe { ptr::write_volatile(register.address() as *mut u32, value) }
    }
}
