//! Serde helpers writing [`LocalTime`](crate::LocalTime) as RFC 3339 with the zone offset.

use serde::Serializer;

use crate::LocalTime;

pub fn serialize<S>(time: &LocalTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&time.to_rfc3339())
}

pub mod option {
    use serde::Serializer;

    use crate::LocalTime;

    pub fn serialize<S>(time: &Option<LocalTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_some(&t.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}
