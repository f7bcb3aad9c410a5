//! Day-of-week calculation for the RX-8025 weekday register.
//!
//! The chip does not derive the weekday from the date, so the driver computes
//! it whenever the time is set. Weekdays are numbered ISO 8601 style:
//! `1` is Monday and `7` is Sunday.

use chrono::Weekday as ChronoWeekday;

use crate::datetime::TimeError;

/// Computes the weekday for a date in the 2000–2099 range.
///
/// `year` is the two-digit year offset from 2000, `month` is `1..=12` and
/// `day` is `1..=31`. January and February count as months 13 and 14 of the
/// previous year. The result is in `1..=7` with `1` = Monday.
pub fn weekday(year: u8, month: u8, day: u8) -> u8 {
    let (a, b) = if month < 3 {
        (i32::from(year) - 1, i32::from(month) + 13)
    } else {
        (i32::from(year), i32::from(month) + 1)
    };
    let c = i32::from(day);

    // floor(365.25 * a) and floor(30.6 * b) in integer arithmetic
    let x = (1461 * a).div_euclid(4) + (306 * b) / 10 + a.div_euclid(400) + c
        - a.div_euclid(100)
        - 429;
    (x.rem_euclid(7) + 1) as u8
}

/// Named weekday values as stored in the weekday register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    /// Monday (1)
    Monday = 1,
    /// Tuesday (2)
    Tuesday = 2,
    /// Wednesday (3)
    Wednesday = 3,
    /// Thursday (4)
    Thursday = 4,
    /// Friday (5)
    Friday = 5,
    /// Saturday (6)
    Saturday = 6,
    /// Sunday (7)
    Sunday = 7,
}

impl TryFrom<u8> for Weekday {
    type Error = TimeError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Weekday::Monday),
            2 => Ok(Weekday::Tuesday),
            3 => Ok(Weekday::Wednesday),
            4 => Ok(Weekday::Thursday),
            5 => Ok(Weekday::Friday),
            6 => Ok(Weekday::Saturday),
            7 => Ok(Weekday::Sunday),
            _ => Err(TimeError::InvalidWeekday),
        }
    }
}

impl From<Weekday> for u8 {
    fn from(v: Weekday) -> Self {
        v as u8
    }
}

impl From<Weekday> for ChronoWeekday {
    fn from(v: Weekday) -> Self {
        match v {
            Weekday::Monday => ChronoWeekday::Mon,
            Weekday::Tuesday => ChronoWeekday::Tue,
            Weekday::Wednesday => ChronoWeekday::Wed,
            Weekday::Thursday => ChronoWeekday::Thu,
            Weekday::Friday => ChronoWeekday::Fri,
            Weekday::Saturday => ChronoWeekday::Sat,
            Weekday::Sunday => ChronoWeekday::Sun,
        }
    }
}

impl From<ChronoWeekday> for Weekday {
    fn from(v: ChronoWeekday) -> Self {
        match v {
            ChronoWeekday::Mon => Weekday::Monday,
            ChronoWeekday::Tue => Weekday::Tuesday,
            ChronoWeekday::Wed => Weekday::Wednesday,
            ChronoWeekday::Thu => Weekday::Thursday,
            ChronoWeekday::Fri => Weekday::Friday,
            ChronoWeekday::Sat => Weekday::Saturday,
            ChronoWeekday::Sun => Weekday::Sunday,
        }
    }
}
