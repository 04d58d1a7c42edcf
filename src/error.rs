use thiserror::Error;

use crate::models::seat::SeatId;

/// Errors raised by the seat codec, the seat collection and commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatError {
    #[error("{field} {value} is out of range (max {max})")]
    FieldOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("unknown seat status code {0}")]
    UnknownStatus(u64),

    #[error("seat {0} is already present in the collection")]
    DuplicateSeat(SeatId),

    #[error("requested {requested} seats but only {available} are present")]
    InsufficientSeats { requested: usize, available: usize },

    #[error("seat {0} is not available")]
    SeatUnavailable(SeatId),
}
