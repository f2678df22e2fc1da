//! Framework lesson manager
//!
//! Carries edits made in one task of a framework lesson forward through the
//! following tasks of the chain. Each step diffs the source task against its
//! stored baseline, resolves conflicts against the successor's files, asks
//! the merge collaborator about whatever could not be decided automatically,
//! and advances the source task's baseline once the step is accepted.
//!
//! Propagation can block on the merge collaborator and on storage I/O, so it
//! must be driven from a background task, never from a UI dispatch loop.

mod baseline;
mod collaborators;
mod propagation;
mod types;


pub use collaborators::{
    CancellingMergeResolver, LogNotifier, MergeOutcome, MergeRequest, MergeResolver,
    ProjectNotifier,
};
pub use types::{FrameworkLessonManager, PropagationOutcome};

#[cfg(test)]
pub use collaborators::MockProjectNotifier;
