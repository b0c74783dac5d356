pub mod blocking;
pub mod clock;
pub mod dates;
pub mod extract;

pub use blocking::with_conn;
pub use clock::{Clock, FixedClock, SystemClock};
pub use extract::ApiJson;
