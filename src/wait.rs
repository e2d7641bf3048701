//! Wait strategies for the status polling loops
//!
//! Every transfer waits for a FIFO flag. How that wait is carried out is up
//! to a [`WaitStrategy`]: [`Spin`] spins forever like the hardware contract
//! demands, [`BoundedSpin`] gives up with [`Error::Timeout`](crate::ssi::Error).
//! Other strategies, for example one that sleeps on a condition variable in a
//! simulation, implement the trait themselves.

use void::Void;

use crate::ssi::Error;

/// Blocks until a poll function is ready
pub trait WaitStrategy {
    /// Error returned when the wait is abandoned
    type Error;

    /// Calls `poll` until it returns something other than
    /// [`nb::Error::WouldBlock`]
    fn wait<T, F>(&mut self, poll: F) -> Result<T, Self::Error>
    where
        F: FnMut() -> nb::Result<T, Void>;
}

/// Unbounded busy wait
///
/// A bus that never becomes ready hangs the caller.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Spin;

impl WaitStrategy for Spin {
    type Error = Void;

    #[inline]
    fn wait<T, F>(&mut self, mut poll: F) -> Result<T, Void>
    where
        F: FnMut() -> nb::Result<T, Void>,
    {
        nb::block!(poll())
    }
}

/// Busy wait giving up after a number of polls
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoundedSpin {
    max_polls: u32,
}

impl BoundedSpin {
    /// Gives up after `max_polls` unsuccessful polls
    pub fn new(max_polls: u32) -> Self {
        BoundedSpin { max_polls }
    }

    /// Number of unsuccessful polls tolerated
    pub fn max_polls(&self) -> u32 {
        self.max_polls
    }
}

impl WaitStrategy for BoundedSpin {
    type Error = Error;

    fn wait<T, F>(&mut self, mut poll: F) -> Result<T, Error>
    where
        F: FnMut() -> nb::Result<T, Void>,
    {
        let mut polls: u32 = 0;
        loop {
            match poll() {
                Ok(value) => return Ok(value),
                Err(nb::Error::Other(e)) => void::unreachable(e),
                Err(nb::Error::WouldBlock) => {
                    polls = polls.saturating_add(1);
                    if polls >= self.max_polls {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("SSI0 wait timed out after {=u32} polls", polls);
                        return Err(Error::Timeout);
                    }
                    core::hint::spin_loop();
                }
            }
        }
    }
}
