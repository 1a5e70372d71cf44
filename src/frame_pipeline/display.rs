//! Display conversion module
//!
//! Turns pipeline frames into the 8-bit, bottom-up, row-padded RGB layout the
//! display surface blits directly.

mod converter;
pub mod types;

pub use converter::{convert_for_display, row_padding};
pub use types::DisplayImage;
