pub mod event;
pub mod run;
pub mod seat;
pub mod seats;

pub use event::{Event, Level};
pub use run::{Run, RunId};
pub use seat::{Seat, SeatId, SeatStatus};
pub use seats::{AreaSummary, SeatSummary, Seats};
