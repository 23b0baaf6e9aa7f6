pub mod activities_errors;
pub mod activities_model;
pub mod activities_repository;
pub mod activities_traits;

pub use activities_errors::ActivityError;
pub use activities_model::{Activity, NewActivity};
pub use activities_repository::ActivityRepository;
pub use activities_traits::ActivityRepositoryTrait;
