//! Alarm configuration for the RX-8025.
//!
//! The RX-8025 has two independent alarm channels:
//!
//! - **Weekly** (alarm W): matches hour, minute and weekday. Registers
//!   `0x80..=0xA0`, enabled by WALE in control 1, reports through WAFG in
//!   control 2.
//! - **Daily** (alarm D): matches hour and minute every day. Registers
//!   `0xB0..=0xC0`, enabled by DALE in control 1, reports through DAFG in
//!   control 2.
//!
//! Alarms always use 24-hour values; the driver keeps the chip in 24-hour
//! mode.

use crate::{bcd, registers::ALARM_FIELD_MASKS, RegAddr};

/// Error type for alarm configuration operations.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmError {
    /// Invalid time component value
    InvalidTime(&'static str),
    /// Invalid day of week (must be 1-7)
    InvalidDayOfWeek,
    /// Register contents are not valid BCD
    InvalidBcd,
}

/// One of the two alarm channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmChannel {
    /// Alarm W: hour, minute and weekday
    Weekly,
    /// Alarm D: hour and minute
    Daily,
}

impl AlarmChannel {
    /// First register of the channel; its values are written from here on.
    pub const fn minute_register(self) -> RegAddr {
        match self {
            AlarmChannel::Weekly => RegAddr::AlarmWMinute,
            AlarmChannel::Daily => RegAddr::AlarmDMinute,
        }
    }

    /// Number of value registers the channel has.
    pub const fn register_count(self) -> usize {
        match self {
            AlarmChannel::Weekly => 3,
            AlarmChannel::Daily => 2,
        }
    }
}

/// Alarm settings for either channel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmConfig {
    /// Triggers every day when hours and minutes match.
    Daily {
        /// Hours value (0-23)
        hour: u8,
        /// Minutes value (0-59)
        minute: u8,
    },

    /// Triggers when hours, minutes and weekday match.
    Weekly {
        /// Hours value (0-23)
        hour: u8,
        /// Minutes value (0-59)
        minute: u8,
        /// Day of week (1-7, where 1=Monday)
        weekday: u8,
    },
}

/// Encoded alarm registers, prefixed with the address byte of the channel's
/// first register.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AlarmRegisters {
    buf: [u8; 4],
    len: usize,
}

impl AlarmRegisters {
    /// The bytes of a single write transaction.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl AlarmConfig {
    /// The channel this configuration is written to.
    pub const fn channel(&self) -> AlarmChannel {
        match self {
            AlarmConfig::Daily { .. } => AlarmChannel::Daily,
            AlarmConfig::Weekly { .. } => AlarmChannel::Weekly,
        }
    }

    /// Validates the alarm configuration and returns any errors.
    ///
    /// # Errors
    ///
    /// Returns an error if any time component is out of valid range.
    pub fn validate(&self) -> Result<(), AlarmError> {
        match self {
            AlarmConfig::Daily { hour, minute } => Self::validate_time(*hour, *minute),
            AlarmConfig::Weekly {
                hour,
                minute,
                weekday,
            } => {
                Self::validate_time(*hour, *minute)?;
                if *weekday == 0 || *weekday > 7 {
                    Err(AlarmError::InvalidDayOfWeek)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn validate_time(hour: u8, minute: u8) -> Result<(), AlarmError> {
        if hour > 23 {
            Err(AlarmError::InvalidTime("hours must be 0-23"))
        } else if minute > 59 {
            Err(AlarmError::InvalidTime("minutes must be 0-59"))
        } else {
            Ok(())
        }
    }

    /// Validates and encodes the configuration as one register write.
    pub(crate) fn to_registers(&self) -> Result<AlarmRegisters, AlarmError> {
        self.validate()?;
        let mut buf = [self.channel().minute_register() as u8, 0, 0, 0];
        let len = match *self {
            AlarmConfig::Daily { hour, minute } => {
                buf[1] = bcd::encode(minute);
                buf[2] = bcd::encode(hour);
                3
            }
            AlarmConfig::Weekly {
                hour,
                minute,
                weekday,
            } => {
                buf[1] = bcd::encode(minute);
                buf[2] = bcd::encode(hour);
                buf[3] = bcd::encode(weekday);
                4
            }
        };
        Ok(AlarmRegisters { buf, len })
    }

    /// Decodes the value registers of a channel, minute register first.
    ///
    /// `raw` must hold at least [`AlarmChannel::register_count`] bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the registers do not hold a valid alarm.
    pub fn from_registers(channel: AlarmChannel, raw: &[u8]) -> Result<Self, AlarmError> {
        if raw.len() < channel.register_count() {
            return Err(AlarmError::InvalidTime("too few alarm registers"));
        }
        let mut fields = [0u8; 3];
        for ((field, value), mask) in fields
            .iter_mut()
            .zip(raw)
            .zip(ALARM_FIELD_MASKS)
            .take(channel.register_count())
        {
            let value = value & mask;
            if !bcd::is_valid(value) {
                return Err(AlarmError::InvalidBcd);
            }
            *field = bcd::decode(value);
        }
        let config = match channel {
            AlarmChannel::Daily => AlarmConfig::Daily {
                hour: fields[1],
                minute: fields[0],
            },
            AlarmChannel::Weekly => AlarmConfig::Weekly {
                hour: fields[1],
                minute: fields[0],
                weekday: fields[2],
            },
        };
        config.validate()?;
        Ok(config)
    }
}
