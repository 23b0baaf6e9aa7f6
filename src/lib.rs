pub mod db;

pub mod activities;
pub mod goals;
pub mod progression;
pub mod roulette;
pub mod users;

pub mod errors;
pub mod schema;

pub use errors::{Error, Result};
