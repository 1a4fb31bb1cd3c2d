/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A position in the shared universe: galaxy, solar system, planet slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    pub galaxy: i32,
    pub system: i32,
    pub slot: i32,
}

impl Coordinate {
    pub fn new(galaxy: i32, system: i32, slot: i32) -> Self {
        Self {
            galaxy,
            system,
            slot,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}:{}]", self.galaxy, self.system, self.slot)
    }
}
