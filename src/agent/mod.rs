//! Bot core: routing, handlers, scheduling and lifecycle.

pub mod bot;
pub mod emitter;
pub mod lifecycle;
pub mod messages;
pub mod router;
pub mod schedule;
pub mod signals;

pub use bot::{Bot, BotDeps};
pub use emitter::Emitter;
pub use lifecycle::{Lifecycle, LifecycleState};
pub use router::{Command, CommandRouter};
pub use signals::ShutdownSignal;
