//! Diagnostics for the Kotori composition session: key scripts and a
//! recording host used by `kototool`.

pub mod commands;
pub mod script;
