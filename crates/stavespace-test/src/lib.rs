//! stavespace-test - Regression test support
//!
//! A small regression-test framework in the spirit of classic
//! document-imaging test harnesses, plus builders for synthetic
//! score pages.
//!
//! # Usage
//!
//! ```
//! use stavespace_test::RegParams;
//!
//! let mut rp = RegParams::new("detect");
//! rp.compare_values(2.0, 2.0, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: set to "display" to log comparison failures
//!   without failing the test

mod params;
pub mod synth;

pub use params::{RegParams, RegTestMode};
