// ABOUTME: Plan execution: drives the queued actions of a deployment one at a time.
// ABOUTME: Exports the executor, the action capability and the execution context.

mod actions;
mod context;
mod error;
mod executor;
mod mutation;

pub use actions::{
    Action, AddMemberAction, CleanOutMemberAction, RemoveMemberAction, RotateMemberAction,
    ShutdownMemberAction, WaitForMemberUpAction, create_action,
};
pub use context::{ActionContext, Dependencies};
pub use error::{ActionError, ExecutorError};
pub use executor::PlanExecutor;
pub use mutation::StatusMutation;
