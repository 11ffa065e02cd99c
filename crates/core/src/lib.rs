//! Core utilities shared by the EcoPulse tools
//!
//! - **Error handling**: coded errors with recovery suggestions and CLI exit codes
//! - **Year ranges**: validated `[start, end]` ranges and a stateful picker
//!   for prediction queries
//!
//! # Example
//!
//! ```rust
//! use ecopulse_core::year_range::{YearRange, YearRangePicker};
//!
//! let mut picker = YearRangePicker::default();
//! picker.set_end(Some(2024));
//! assert!(picker.has_error());
//!
//! picker.reset();
//! assert_eq!(picker.range(), Some(YearRange::default()));
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod year_range;

pub use error::{Error, ErrorCode, Result};
pub use year_range::{YearRange, YearRangePicker};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{exit_codes, Error, ErrorCode, Result};
    pub use crate::year_range::{YearRange, YearRangePicker};
}
