//! Chat state aggregate and its persistence port.

pub mod model;
pub mod repository;

pub use model::ChatState;
pub use repository::ChatStateRepository;
