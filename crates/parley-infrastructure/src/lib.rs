pub mod config_service;
pub mod image_loader;
pub mod json_state_repository;
pub mod memory_state_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::image_loader::ImageLoader;
pub use crate::json_state_repository::JsonStateRepository;
pub use crate::memory_state_repository::MemoryStateRepository;
pub use crate::paths::ParleyPaths;
