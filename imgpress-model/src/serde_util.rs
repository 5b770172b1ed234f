//! Deserialization helpers for fields the backend may send as `null`

use serde::{Deserialize, Deserializer};

/// Read a missing or `null` value as `T::default()`
pub(crate) fn null_as_default<'de, D, T>(
    deserializer: D,
) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
