//! Application layer for Parley: the chat use case and the simulated reply
//! backend it schedules replies on.

pub mod chat;
pub mod simulator;

pub use chat::ChatUseCase;
pub use simulator::SimulatedReplyBackend;
