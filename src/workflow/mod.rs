//! Delegation workflow: state machine and orchestrator.

mod orchestrator;
mod state;


pub use orchestrator::{
    DelegationNotice, NoopObserver, Orchestrator, RunObserver, RunOutcome, RunReport,
};
pub use state::{RunState, StateMachine, Verdict};
