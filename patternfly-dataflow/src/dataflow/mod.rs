//! Actor+Relay primitives underneath the widget coordinators.
//!
//! The architecture rules are simple:
//!
//! 1. State lives in an [`Actor`] or [`ActorVec`] and is only mutated by its
//!    sequential processor.
//! 2. Events travel through [`Relay`]s named `{source}_{event}_relay`, each
//!    emitted from a single place in the code.
//! 3. Reads happen through signals; processors cache whatever current values
//!    they need locally.

pub mod actor;
pub mod actor_vec;
pub mod relay;
pub mod task;

pub use actor::Actor;
pub use actor_vec::{ActorVec, ActorVecHandle};
pub use relay::{Relay, RelayError, relay};
pub use task::{Task, TaskHandle};
