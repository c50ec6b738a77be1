//! Integration test binary. Run against a live server:
//! `cargo run` in one terminal, then `cargo test -- --ignored`.

mod api_tests;
