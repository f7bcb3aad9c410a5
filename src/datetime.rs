//! Time value types and their conversion to and from the RX-8025 registers.
//!
//! The RX-8025 stores the time in 7 consecutive BCD registers:
//! seconds, minutes, hours, weekday, day, month, year.
//!
//! - [`TimeSetting`] is what a caller writes. It has no weekday; the weekday
//!   is always derived from the date so the two can never disagree.
//! - [`TimeReading`] is what the chip reports, weekday included.
//!
//! Both convert to and from chrono's `NaiveDateTime`, with the two-digit year
//! counted from 2000.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::{bcd, registers::TIME_FIELD_MASKS, weekday, Weekday};

/// Errors for time values that are out of range or not representable.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeError {
    /// Seconds not in 0-59
    InvalidSecond,
    /// Minutes not in 0-59
    InvalidMinute,
    /// Hours not in 0-23
    InvalidHour,
    /// Day of month not in 1-31
    InvalidDay,
    /// Month not in 1-12
    InvalidMonth,
    /// Year not in 0-99 (2000-2099)
    InvalidYear,
    /// Weekday not in 1-7
    InvalidWeekday,
    /// The day does not exist in the given month and year
    NonexistentDate,
    /// A register held a nibble that is not a decimal digit
    InvalidBcd,
}

/// The fallback time written when the chip reports unreliable contents:
/// 2014-12-31 13:30:55.
pub const FALLBACK_TIME: TimeSetting = TimeSetting {
    second: 55,
    minute: 30,
    hour: 13,
    day: 31,
    month: 12,
    year: 14,
};

/// Time to be written to the chip.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeSetting {
    /// Seconds (0-59)
    pub second: u8,
    /// Minutes (0-59)
    pub minute: u8,
    /// Hours (0-23)
    pub hour: u8,
    /// Day of month (1-31)
    pub day: u8,
    /// Month (1-12)
    pub month: u8,
    /// Year offset from 2000 (0-99)
    pub year: u8,
}

impl TimeSetting {
    /// Validates every field, including that the day exists in the month.
    ///
    /// # Errors
    ///
    /// Returns the first field found out of range.
    pub fn validate(&self) -> Result<(), TimeError> {
        self.validate_ranges()?;
        NaiveDate::from_ymd_opt(
            2000 + i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
        .map(|_| ())
        .ok_or(TimeError::NonexistentDate)
    }

    fn validate_ranges(&self) -> Result<(), TimeError> {
        if self.second > 59 {
            return Err(TimeError::InvalidSecond);
        }
        if self.minute > 59 {
            return Err(TimeError::InvalidMinute);
        }
        if self.hour > 23 {
            return Err(TimeError::InvalidHour);
        }
        if self.day == 0 || self.day > 31 {
            return Err(TimeError::InvalidDay);
        }
        if self.month == 0 || self.month > 12 {
            return Err(TimeError::InvalidMonth);
        }
        if self.year > 99 {
            return Err(TimeError::InvalidYear);
        }
        Ok(())
    }

    /// The weekday derived from the date, `1` = Monday.
    pub fn weekday(&self) -> u8 {
        weekday::weekday(self.year, self.month, self.day)
    }

    /// Encodes the setting as the 7 time registers, weekday included.
    pub(crate) fn to_registers(&self) -> Result<[u8; 7], TimeError> {
        self.validate()?;
        let raw = [
            bcd::encode(self.second),
            bcd::encode(self.minute),
            bcd::encode(self.hour),
            bcd::encode(self.weekday()),
            bcd::encode(self.day),
            bcd::encode(self.month),
            bcd::encode(self.year),
        ];
        debug!("time registers: {:?}", raw);
        Ok(raw)
    }

    /// Builds a setting from a chrono datetime in the years 2000-2099.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::InvalidYear`] outside of 2000-2099.
    pub fn from_datetime(datetime: &NaiveDateTime) -> Result<Self, TimeError> {
        let year = datetime.year();
        if !(2000..=2099).contains(&year) {
            error!("year {} is outside 2000-2099", year);
            return Err(TimeError::InvalidYear);
        }
        let setting = TimeSetting {
            second: u8::try_from(datetime.second()).map_err(|_| TimeError::InvalidSecond)?,
            minute: u8::try_from(datetime.minute()).map_err(|_| TimeError::InvalidMinute)?,
            hour: u8::try_from(datetime.hour()).map_err(|_| TimeError::InvalidHour)?,
            day: u8::try_from(datetime.day()).map_err(|_| TimeError::InvalidDay)?,
            month: u8::try_from(datetime.month()).map_err(|_| TimeError::InvalidMonth)?,
            year: u8::try_from(year - 2000).map_err(|_| TimeError::InvalidYear)?,
        };
        setting.validate()?;
        Ok(setting)
    }
}

impl From<TimeReading> for TimeSetting {
    fn from(reading: TimeReading) -> Self {
        TimeSetting {
            second: reading.second,
            minute: reading.minute,
            hour: reading.hour,
            day: reading.day,
            month: reading.month,
            year: reading.year,
        }
    }
}

/// Time as read back from the chip.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeReading {
    /// Seconds (0-59)
    pub second: u8,
    /// Minutes (0-59)
    pub minute: u8,
    /// Hours (0-23)
    pub hour: u8,
    /// Weekday as held by the chip
    pub weekday: u8,
    /// Day of month (1-31)
    pub day: u8,
    /// Month (1-12)
    pub month: u8,
    /// Year offset from 2000 (0-99)
    pub year: u8,
}

impl TimeReading {
    /// Decodes the 7 time registers, seconds first.
    pub(crate) fn from_registers(raw: [u8; 7]) -> Result<Self, TimeError> {
        let mut fields = [0u8; 7];
        for ((field, value), mask) in fields.iter_mut().zip(raw).zip(TIME_FIELD_MASKS) {
            let value = value & mask;
            if !bcd::is_valid(value) {
                return Err(TimeError::InvalidBcd);
            }
            *field = bcd::decode(value);
        }
        let [second, minute, hour, weekday, day, month, year] = fields;
        let reading = TimeReading {
            second,
            minute,
            hour,
            weekday,
            day,
            month,
            year,
        };
        // the chip counts days on its own; only ranges are checked
        TimeSetting::from(reading).validate_ranges()?;
        Ok(reading)
    }

    /// The chip's weekday as a named value, if it holds one of 1-7.
    pub fn weekday(&self) -> Option<Weekday> {
        Weekday::try_from(self.weekday).ok()
    }

    /// Converts to a chrono datetime, with the year counted from 2000.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::NonexistentDate`] when the fields do not form a
    /// calendar date.
    pub fn to_datetime(&self) -> Result<NaiveDateTime, TimeError> {
        NaiveDate::from_ymd_opt(
            2000 + i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
        .ok_or(TimeError::NonexistentDate)?
        .and_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
        .ok_or(TimeError::NonexistentDate)
    }
}
