use diesel::sqlite::SqliteConnection;

use crate::activities::activities_model::{Activity, NewActivity};
use crate::errors::Result;

/// Trait for the append-only activity ledger.
///
/// `append` takes a connection so the entry commits atomically with the
/// completion that produced it. There is deliberately no update or
/// delete; history is never rewritten.
pub trait ActivityRepositoryTrait: Send + Sync {
    fn append(&self, conn: &mut SqliteConnection, new_activity: NewActivity) -> Result<Activity>;
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Activity>>;
}
