//! Domain models shared across crates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week an exercise is scheduled on
///
/// Serialized (and stored in the `day_of_week` Postgres enum) using the
/// lowercase Spanish day names the client contract uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "day_of_week"))]
pub enum DayOfWeek {
    #[serde(rename = "lunes")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "lunes"))]
    Monday,
    #[serde(rename = "martes")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "martes"))]
    Tuesday,
    #[serde(rename = "miercoles")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "miercoles"))]
    Wednesday,
    #[serde(rename = "jueves")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "jueves"))]
    Thursday,
    #[serde(rename = "viernes")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "viernes"))]
    Friday,
    #[serde(rename = "sabado")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "sabado"))]
    Saturday,
    #[serde(rename = "domingo")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "domingo"))]
    Sunday,
}

impl DayOfWeek {
    /// All days, Monday first
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "lunes",
            DayOfWeek::Tuesday => "martes",
            DayOfWeek::Wednesday => "miercoles",
            DayOfWeek::Thursday => "jueves",
            DayOfWeek::Friday => "viernes",
            DayOfWeek::Saturday => "sabado",
            DayOfWeek::Sunday => "domingo",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        DayOfWeek::ALL
            .into_iter()
            .find(|day| day.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid day of week '{}'. Must be one of: {}",
                    s,
                    DayOfWeek::ALL.map(|d| d.as_str()).join(", ")
                )
            })
    }
}
