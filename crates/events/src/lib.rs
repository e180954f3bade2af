//! Event-sourcing vocabulary shared by the invitation crates.

pub mod command;
pub mod envelope;
pub mod event;
pub mod projection;

pub use command::Command;
pub use envelope::EventEnvelope;
pub use event::Event;
pub use projection::Projection;
