//! Time units
//!
//! See [`embedded_time`]. The driver only needs [`rate::Hertz`].

pub use embedded_time::{duration, fixed_point, rate};
