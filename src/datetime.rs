//! BCD helpers and the RTC date/time record.
//!
//! The OnOffBTN keeps its clock in 7 consecutive registers starting at
//! [`RegAddr::RtcSeconds`](crate::RegAddr::RtcSeconds):
//! seconds, minutes, hours, day of month, month, year (all BCD) and day of
//! week (3 bit binary).
//!
//! # Error Handling
//!
//! Conversion errors to and from chrono are reported via [`DateTimeError`].

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Converts a decimal value (0-99) to BCD.
///
/// Values above 99 are not representable and wrap like the device firmware
/// does, the result is only meaningful for two decimal digits.
pub fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Converts a BCD value to decimal.
pub fn from_bcd(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

/// Date and time as kept by the RTC.
///
/// All fields are decimal. `year` is the offset from 2000 and
/// `day_of_week` is the raw 3 bit weekday counter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub day_of_month: u8,
    pub month: u8,
    pub year: u8,
    pub day_of_week: u8,
}

impl From<[u8; 7]> for DateTime {
    fn from(data: [u8; 7]) -> Self {
        DateTime {
            seconds: from_bcd(data[0]),
            minutes: from_bcd(data[1]),
            hours: from_bcd(data[2]),
            day_of_month: from_bcd(data[3]),
            month: from_bcd(data[4]),
            year: from_bcd(data[5]),
            // not BCD
            day_of_week: data[6],
        }
    }
}

impl From<&DateTime> for [u8; 7] {
    fn from(dt: &DateTime) -> [u8; 7] {
        [
            to_bcd(dt.seconds),
            to_bcd(dt.minutes),
            to_bcd(dt.hours),
            to_bcd(dt.day_of_month),
            to_bcd(dt.month),
            to_bcd(dt.year),
            dt.day_of_week & 0x07,
        ]
    }
}

impl DateTime {
    /// Builds the RTC record for a chrono date/time.
    ///
    /// The weekday is stored as days since Sunday (0-6).
    ///
    /// # Errors
    /// Returns [`DateTimeError::YearOutOfRange`] for years outside 2000-2099.
    pub fn from_naive(datetime: &NaiveDateTime) -> Result<Self, DateTimeError> {
        let year = datetime.year();
        if !(2000..=2099).contains(&year) {
            error!("Year {} is out of range, must be 2000-2099", year);
            return Err(DateTimeError::YearOutOfRange);
        }
        let narrow = |v: u32| u8::try_from(v).map_err(|_| DateTimeError::InvalidDateTime);
        let raw = DateTime {
            seconds: narrow(datetime.second())?,
            minutes: narrow(datetime.minute())?,
            hours: narrow(datetime.hour())?,
            day_of_month: narrow(datetime.day())?,
            month: narrow(datetime.month())?,
            year: u8::try_from(year - 2000).map_err(|_| DateTimeError::InvalidDateTime)?,
            day_of_week: narrow(datetime.weekday().num_days_from_sunday())?,
        };
        debug!("raw={:?}", raw);
        Ok(raw)
    }

    /// Converts the RTC record into a chrono date/time.
    ///
    /// Hours are read as 24 hour values and the weekday is not checked
    /// against the date.
    ///
    /// # Errors
    /// Returns [`DateTimeError::InvalidDateTime`] if the fields do not form
    /// a valid date and time.
    pub fn to_naive(&self) -> Result<NaiveDateTime, DateTimeError> {
        NaiveDate::from_ymd_opt(
            2000 + i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day_of_month),
        )
        .and_then(|d| {
            d.and_hms_opt(
                u32::from(self.hours),
                u32::from(self.minutes),
                u32::from(self.seconds),
            )
        })
        .ok_or(DateTimeError::InvalidDateTime)
    }
}

/// Errors that can occur during date/time conversion.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DateTimeError {
    /// The provided or decoded date/time is invalid (e.g., out of range, not representable)
    InvalidDateTime,
    /// The year is not between 2000 and 2099
    YearOutOfRange,
}
