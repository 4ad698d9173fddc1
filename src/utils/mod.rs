//! Utility modules for azqr

pub mod cancel;
pub mod command;
pub mod timing;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use timing::{format_duration, ScanTiming, ScannerTiming, Timer};
