mod daily_log;
mod profile;
mod state;
mod vocab;

pub use daily_log::{DailyLog, Module, DATE_FORMAT, TIME_FORMAT};
pub use profile::UserProfile;
pub use state::AppState;
pub use vocab::VocabItem;

use serde::{Deserialize, Deserializer};

/// Reads `null` as the type's default. Documents written by the desktop app
/// store empty lists as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
