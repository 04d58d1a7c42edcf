//! Seat identity codec.
//!
//! A seat is identified by one integer key with the layout
//!
//! ```text
//! status area row column
//!     9   9999 999   999
//! ```
//!
//! so that ordering keys orders seats by (status, area, row, column) and every
//! status or status+area slice of a sorted collection is one contiguous range.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::SeatError;

pub const ROW_MUL: u64 = 1_000;
pub const AREA_MUL: u64 = 1_000 * ROW_MUL;
pub const STATUS_MUL: u64 = 10_000 * AREA_MUL;

pub const MAX_COLUMN: u16 = 999;
pub const MAX_ROW: u16 = 999;
pub const MAX_AREA: u16 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available = 0,
    Unavailable = 1,
    /// Temporarily held while an order is in progress.
    Picked = 2,
    Ordered = 3,
    /// Withheld by the organiser.
    Locked = 4,
}

impl SeatStatus {
    pub const ALL: [SeatStatus; 5] = [
        SeatStatus::Available,
        SeatStatus::Unavailable,
        SeatStatus::Picked,
        SeatStatus::Ordered,
        SeatStatus::Locked,
    ];

    #[inline]
    pub const fn code(self) -> u64 {
        self as u64
    }

    pub fn from_code(code: u64) -> Result<Self, SeatError> {
        match code {
            0 => Ok(SeatStatus::Available),
            1 => Ok(SeatStatus::Unavailable),
            2 => Ok(SeatStatus::Picked),
            3 => Ok(SeatStatus::Ordered),
            4 => Ok(SeatStatus::Locked),
            other => Err(SeatError::UnknownStatus(other)),
        }
    }
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SeatId(u64);

impl SeatId {
    /// Packs the four fields into one key, rejecting values that would spill
    /// into a neighbouring field.
    pub fn new(status: SeatStatus, area: u16, row: u16, column: u16) -> Result<Self, SeatError> {
        check_bound("area", area, MAX_AREA)?;
        check_bound("row", row, MAX_ROW)?;
        check_bound("column", column, MAX_COLUMN)?;
        Ok(Self::pack(status, area, row, column))
    }

    #[inline]
    const fn pack(status: SeatStatus, area: u16, row: u16, column: u16) -> Self {
        SeatId(
            column as u64
                + row as u64 * ROW_MUL
                + area as u64 * AREA_MUL
                + status.code() * STATUS_MUL,
        )
    }

    pub fn from_raw(raw: u64) -> Result<Self, SeatError> {
        SeatStatus::from_code(raw / STATUS_MUL)?;
        Ok(SeatId(raw))
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    pub fn status(self) -> SeatStatus {
        // Every constructor validates the status digit.
        match SeatStatus::from_code(self.0 / STATUS_MUL) {
            Ok(status) => status,
            Err(_) => unreachable!("seat id {} carries an invalid status", self.0),
        }
    }

    #[inline]
    pub const fn area(self) -> u16 {
        ((self.0 % STATUS_MUL) / AREA_MUL) as u16
    }

    #[inline]
    pub const fn row(self) -> u16 {
        ((self.0 % AREA_MUL) / ROW_MUL) as u16
    }

    #[inline]
    pub const fn column(self) -> u16 {
        (self.0 % ROW_MUL) as u16
    }

    pub fn decode(self) -> (SeatStatus, u16, u16, u16) {
        (self.status(), self.area(), self.row(), self.column())
    }

    /// Same position, different status.
    #[inline]
    pub fn with_status(self, status: SeatStatus) -> Self {
        SeatId(self.0 % STATUS_MUL + status.code() * STATUS_MUL)
    }

    /// Position key without the status component.
    #[inline]
    pub const fn position(self) -> u64 {
        self.0 % STATUS_MUL
    }

    /// Inclusive bounds of every seat with `status`.
    pub fn status_range(status: SeatStatus) -> RangeInclusive<SeatId> {
        Self::pack(status, 0, 0, 0)..=Self::pack(status, MAX_AREA, MAX_ROW, MAX_COLUMN)
    }

    /// Inclusive bounds of every seat with `status` in `area`.
    pub fn area_range(status: SeatStatus, area: u16) -> Result<RangeInclusive<SeatId>, SeatError> {
        check_bound("area", area, MAX_AREA)?;
        Ok(Self::pack(status, area, 0, 0)..=Self::pack(status, area, MAX_ROW, MAX_COLUMN))
    }
}

fn check_bound(field: &'static str, value: u16, max: u16) -> Result<(), SeatError> {
    if value > max {
        return Err(SeatError::FieldOutOfRange {
            field,
            value: value.into(),
            max: max.into(),
        });
    }
    Ok(())
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:03}-{:03}", self.area(), self.row(), self.column())
    }
}

impl From<SeatId> for u64 {
    fn from(id: SeatId) -> Self {
        id.0
    }
}

impl TryFrom<u64> for SeatId {
    type Error = SeatError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        SeatId::from_raw(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seat {
    id: SeatId,
}

impl Seat {
    pub fn new(area: u16, row: u16, column: u16, status: SeatStatus) -> Result<Self, SeatError> {
        Ok(Seat {
            id: SeatId::new(status, area, row, column)?,
        })
    }

    #[inline]
    pub fn id(&self) -> SeatId {
        self.id
    }

    pub fn status(&self) -> SeatStatus {
        self.id.status()
    }

    pub fn area(&self) -> u16 {
        self.id.area()
    }

    pub fn row(&self) -> u16 {
        self.id.row()
    }

    pub fn column(&self) -> u16 {
        self.id.column()
    }

    pub fn is_available(&self) -> bool {
        self.status() == SeatStatus::Available
    }

    pub fn set_status(&mut self, status: SeatStatus) {
        self.id = self.id.with_status(status);
    }

    pub fn order(&mut self) {
        self.set_status(SeatStatus::Ordered);
    }
}

impl From<SeatId> for Seat {
    fn from(id: SeatId) -> Self {
        Seat { id }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}
