//! Fleet status and mission enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in `fleet_statuses` / `fleet_missions`.

use serde::Serialize;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_lookup_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database lookup ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Decode a lookup ID; `None` for ids with no variant.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( x if x == $val => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_lookup_enum! {
    /// Fleet lifecycle status.
    ///
    /// `Active -> Returning -> Completed`, or `Active -> Destroyed`.
    /// Colonize and deploy may complete directly from `Active`.
    FleetStatus {
        Active = 1,
        Returning = 2,
        Completed = 3,
        Destroyed = 4,
    }
}

define_lookup_enum! {
    /// What a fleet does when it reaches its target.
    Mission {
        Transport = 1,
        Colonize = 2,
        Attack = 3,
        Expedition = 4,
        Deploy = 5,
    }
}

impl FleetStatus {
    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: FleetStatus) -> bool {
        matches!(
            (self, next),
            (FleetStatus::Active, FleetStatus::Returning)
                | (FleetStatus::Active, FleetStatus::Completed)
                | (FleetStatus::Active, FleetStatus::Destroyed)
                | (FleetStatus::Returning, FleetStatus::Completed)
        )
    }
}

impl Mission {
    pub fn as_str(self) -> &'static str {
        match self {
            Mission::Transport => "transport",
            Mission::Colonize => "colonize",
            Mission::Attack => "attack",
            Mission::Expedition => "expedition",
            Mission::Deploy => "deploy",
        }
    }
}
