#![forbid(unsafe_code)]

mod clock;
mod lifecycle;
mod round;
mod timefmt;

pub use clock::{Clock, ManualClock, SystemClock};
pub use lifecycle::Lifecycle;
pub use round::round2;
pub use timefmt::{from_db_datetime, to_db_datetime, DB_DATETIME_FORMAT};

pub const CRATE_NAME: &str = "agrimix-core";
