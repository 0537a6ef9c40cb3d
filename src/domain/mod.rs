//! Domain layer shared by the configuration and service layers.
//!
//! This module contains:
//! - Error taxonomy and sequencer phases
//! - Event sink trait and logger setup

mod error;
pub mod logger;

pub use error::{Phase, PhaseError, SetupError, Violation};
pub use logger::{EventSink, TracingSink};
