//! Lab test support utilities
//!
//! Unified logging initialization and unique naming helpers shared by the
//! workspace's integration tests.

pub mod test_logging;
pub mod unique_helpers;
