//! Prelude

pub use crate::hal::prelude::*;
pub use crate::reg::RegisterFile as _tm4c123x_ssi_reg_RegisterFile;
pub use crate::ssi::config::FieldValue as _tm4c123x_ssi_ssi_config_FieldValue;
pub use crate::time::rate::Extensions as _tm4c123x_ssi_time_rate_Extensions;
pub use crate::wait::WaitStrategy as _tm4c123x_ssi_wait_WaitStrategy;
