//! Kotori input method engine: UniFFI surface over `kotori-session`.
//!
//! The Swift host talks to `api::KotoriSession`; conversions run on a
//! background worker and come back through `poll`.

pub mod api;
mod async_worker;
pub mod trace_init;

uniffi::setup_scaffolding!();
