//! Debayering module for reconstructing RGB samples from Bayer mosaics

pub mod bilinear;
pub mod types;

pub use bilinear::demosaic;
pub use types::{BayerCode, DemosaicOutcome};
