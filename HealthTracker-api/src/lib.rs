// HealthTracker-api lib.rs
//
// HTTP surface for the HealthTracker application.
// The binary wires these modules together; tests build the router directly.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
