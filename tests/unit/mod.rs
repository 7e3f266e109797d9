//! Unit test suite for repokit
//!
//! Exercises the public library API (with the `test-utils` feature) without
//! going through the binary.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod fixture_pipeline;
