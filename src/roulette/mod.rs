pub mod roulette_constants;
pub mod roulette_errors;
pub mod roulette_model;
pub mod roulette_repository;
pub mod roulette_service;

pub use roulette_constants::{DEFAULT_ROULETTE_TEXTS, ROULETTE_SLOT_COUNT};
pub use roulette_errors::RouletteError;
pub use roulette_model::{RouletteText, RouletteTextUpdate, SpinResult};
pub use roulette_repository::RouletteRepository;
pub use roulette_service::RouletteService;
