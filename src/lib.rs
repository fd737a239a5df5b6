// Library root
// -----------
// This crate exposes a small library surface for the medication tracker
// CLI. The binaries (`main.rs` and `bin/explain.rs`) use these modules.
//
// Module responsibilities:
// - `api`: Blocking client for the text-generation endpoint, with
//   retry/backoff around transport failures.
// - `store`: Loads and saves the medication collection as a JSON file,
//   normalizing records that predate dose tracking.
// - `ui`: Implements the terminal menu flows and delegates to `api` and
//   `store`.
//
// Keeping this separation makes the retry policy and persistence rules
// unit-testable without a terminal or a network connection.
pub mod api;
pub mod store;
pub mod ui;
