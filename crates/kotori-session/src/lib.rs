//! Composition session for the Kotori input method.
//!
//! Key events are normalized into `UserAction`s, run through the
//! composition state machine, and the resulting `ClientAction`s are executed
//! against the `Session` (segment/candidate manager), the host text client
//! and the candidate UI. `InputController` ties the pieces together.

pub mod action;
pub mod controller;
pub mod executor;
pub mod keymap;
pub mod session;
pub mod state_machine;

#[cfg(test)]
mod tests;

pub use action::{ClientAction, Direction, InputMode, Modifiers, UserAction};
pub use controller::InputController;
pub use executor::{ActionExecutor, CandidateUi, HostClient};
pub use keymap::KeyEvent;
pub use session::{
    derive_candidates, CandidateWindow, ConversionRequest, DebugCandidateLog, Dispatch, Focus,
    LastOperation, MarkedRun, MarkedText, Session, SessionConfig,
};
pub use state_machine::{transition, CompositionState};
