//! assistant-core: session lifecycle and listening-mode coordination
//!
//! The `Session` owns everything one assistant instance needs (controller,
//! catalog, synthesizer) with an explicit create/shutdown lifecycle, no
//! ambient globals. The `Coordinator` runs the wake-word/command listening
//! state machine over a single event loop, so listener transitions, command
//! dispatch and queue mutation are all serialized in one place.

mod session;
pub use session::Session;

mod coordinator;
pub use coordinator::{
    Coordinator, CoordinatorConfig, CoordinatorEvent, CoordinatorHandle, ListeningMode,
};
