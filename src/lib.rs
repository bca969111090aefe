//! Purpose: JSON mapping contract for booking model objects plus its verification harness.
//! Exports: `api` (stable surface), `core`, `model`, `harness`.
//! Role: Library backing the conformance runner and any JSON-facing caller.
//! Invariants: Mapping is pure and in-memory; no I/O outside manifest loading.
//! Invariants: Field-level mapping problems never surface as errors.
pub mod api;
pub mod core;
pub mod harness;
pub mod model;
