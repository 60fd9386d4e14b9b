//! Common test utilities: HWP container fixtures and scripted backends.

pub mod fixtures;
