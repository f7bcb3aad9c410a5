//! # RX-8025 Real-Time Clock Driver
//!
//! A platform-agnostic driver for the Epson RX-8025 real-time clock using the
//! `embedded-hal` traits. It is `#![no_std]` and works with any I2C and delay
//! implementation.
//!
//! ## Features
//!
//! - Power-loss and oscillator-stop detection with automatic re-initialization
//! - Reading and setting the time, with the weekday derived from the date
//! - Weekly and daily alarms with independent enable and flag bits
//! - Read-modify-write of the shared control registers
//! - Optional async support via `embedded-hal-async`
//! - Optional logging via `log` or `defmt`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rx8025::{AlarmChannel, AlarmConfig, TimeSetting, DEFAULT_ADDRESS, RX8025};
//!
//! let mut rtc = RX8025::new(i2c, delay, DEFAULT_ADDRESS);
//!
//! // Check the power-on and oscillator flags, re-initializing if needed
//! let outcome = rtc.init()?;
//!
//! rtc.set_time(&TimeSetting { second: 0, minute: 30, hour: 15, day: 14, month: 3, year: 24 })?;
//! let now = rtc.time()?;
//!
//! rtc.set_alarm(&AlarmConfig::Daily { hour: 7, minute: 0 })?;
//! if rtc.alarm_triggered(AlarmChannel::Daily)? {
//!     rtc.clear_alarm(AlarmChannel::Daily)?;
//! }
//! ```
//!
//! ## Timing
//!
//! The chip needs time to commit a write. Every transaction that changes chip
//! state is followed by a settle delay, see [`Config`].
//!
//! ## Error Handling
//!
//! Bus failures are returned as [`Rx8025Error::I2c`] and abort multi-step
//! operations. Invalid input is rejected before any bus traffic.

#![no_std]

#[macro_use]
mod fmt;

pub mod alarm;
#[cfg(feature = "async")]
pub mod asynch;
pub mod bcd;
mod datetime;
pub mod registers;
pub mod weekday;

use chrono::NaiveDateTime;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use paste::paste;

pub use crate::alarm::{AlarmChannel, AlarmConfig, AlarmError};
pub use crate::datetime::{TimeError, TimeReading, TimeSetting, FALLBACK_TIME};
pub use crate::registers::{
    Control1, Control2, HourMode, RegAddr, DEFAULT_ADDRESS, REGISTER_COUNT,
};
pub use crate::weekday::Weekday;

/// Shortest settle delay after a write, in microseconds.
pub const MIN_SETTLE_DELAY_US: u32 = 1_000;

/// Driver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    settle_delay_us: u32,
}

impl Config {
    /// Creates a configuration with the given settle delay, raised to
    /// [`MIN_SETTLE_DELAY_US`] if shorter.
    pub const fn new(settle_delay_us: u32) -> Self {
        let settle_delay_us = if settle_delay_us < MIN_SETTLE_DELAY_US {
            MIN_SETTLE_DELAY_US
        } else {
            settle_delay_us
        };
        Self { settle_delay_us }
    }

    /// Delay after every write transaction, in microseconds.
    pub const fn settle_delay_us(&self) -> u32 {
        self.settle_delay_us
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(MIN_SETTLE_DELAY_US)
    }
}

/// Why [`RX8025::init`] re-initialized the chip.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReinitReason {
    /// PON was set: the supply dropped and all registers are unreliable
    PowerOn,
    /// PON and XST were clear: the oscillator stopped for 10 ms or more
    OscillatorStopped,
}

/// Result of [`RX8025::init`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitOutcome {
    /// The chip kept time; only oscillator-stop detection was re-armed
    Trusted,
    /// The chip was reset to 24-hour mode and [`FALLBACK_TIME`]
    Reinitialized(ReinitReason),
}

impl InitOutcome {
    /// Decides from the flag register whether the chip can be trusted.
    pub fn from_flags(flags: Control2) -> Self {
        if flags.power_on() {
            InitOutcome::Reinitialized(ReinitReason::PowerOn)
        } else if !flags.oscillator_stop_detection() {
            InitOutcome::Reinitialized(ReinitReason::OscillatorStopped)
        } else {
            InitOutcome::Trusted
        }
    }
}

/// Control register values written by a full re-initialization: 24-hour
/// mode, alarms off, oscillator-stop detection armed and PON cleared.
pub(crate) fn reinit_controls() -> (Control1, Control2) {
    let mut control1 = Control1::default();
    control1.set_hour_mode(HourMode::TwentyFourHour);
    let mut control2 = Control2::default();
    control2.set_oscillator_stop_detection(true);
    (control1, control2)
}

/// Error type for RX-8025 operations.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rx8025Error<I2CE> {
    /// I2C bus error
    I2c(I2CE),
    /// Time to be set is out of range
    InvalidTime(TimeError),
    /// Time read from the chip is out of range
    InvalidReading(TimeError),
    /// Alarm configuration or alarm registers are invalid
    Alarm(AlarmError),
}

impl<I2CE> From<I2CE> for Rx8025Error<I2CE> {
    fn from(e: I2CE) -> Self {
        Rx8025Error::I2c(e)
    }
}

/// RX-8025 Real-Time Clock driver.
pub struct RX8025<I2C: I2c, D: DelayNs> {
    i2c: I2C,
    delay: D,
    address: u8,
    config: Config,
}

impl<I2C: I2c, D: DelayNs> RX8025<I2C, D> {
    /// Creates a new RX-8025 driver instance with the default [`Config`].
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation
    /// * `delay` - Delay used to let the chip settle after writes
    /// * `address` - The 7-bit I2C address of the device (typically [`DEFAULT_ADDRESS`])
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self::with_config(i2c, delay, address, Config::default())
    }

    /// Creates a new RX-8025 driver instance with an explicit [`Config`].
    pub fn with_config(i2c: I2C, delay: D, address: u8, config: Config) -> Self {
        Self {
            i2c,
            delay,
            address,
            config,
        }
    }

    /// Destroys the driver and returns the bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Writes `bytes` (address byte first) and waits for the chip to settle.
    fn write_registers(&mut self, bytes: &[u8]) -> Result<(), Rx8025Error<I2C::Error>> {
        self.i2c.write(self.address, bytes)?;
        self.delay.delay_us(self.config.settle_delay_us());
        Ok(())
    }

    /// Reads `N` registers without setting an address first.
    ///
    /// The chip starts such a read at control register 2 and wraps around to
    /// the seconds register.
    fn read_default_registers<const N: usize>(
        &mut self,
    ) -> Result<[u8; N], Rx8025Error<I2C::Error>> {
        let mut data = [0; N];
        self.i2c.read(self.address, &mut data)?;
        Ok(data)
    }

    /// Reads the register the chip returns on a read without an address:
    /// control register 2, the flag register.
    ///
    /// # Returns
    /// * `Ok(Control2)` - The flag register on success
    /// * `Err(Rx8025Error)` on error
    pub fn read_default_register(&mut self) -> Result<Control2, Rx8025Error<I2C::Error>> {
        let [flags] = self.read_default_registers::<1>()?;
        Ok(Control2::from(flags))
    }

    /// Checks the power-on and oscillator flags and brings the chip into a
    /// known state.
    ///
    /// If the flags show that the stored time cannot be trusted, the control
    /// registers are reset and [`FALLBACK_TIME`] is written. Otherwise only
    /// oscillator-stop detection is re-armed, leaving all other bits alone.
    ///
    /// # Returns
    /// * `Ok(InitOutcome)` - Whether the chip was trusted or re-initialized
    /// * `Err(Rx8025Error)` on error
    pub fn init(&mut self) -> Result<InitOutcome, Rx8025Error<I2C::Error>> {
        let mut flags = self.read_default_register()?;
        debug!("RX8025: flags={:08b}", u8::from(flags));
        let outcome = InitOutcome::from_flags(flags);
        match outcome {
            InitOutcome::Trusted => {
                flags.set_oscillator_stop_detection(true);
                self.set_control2(flags)?;
            }
            InitOutcome::Reinitialized(reason) => {
                warn!("RX8025: clock unreliable ({:?}), re-initializing", reason);
                self.reinitialize()?;
            }
        }
        Ok(outcome)
    }

    /// Overwrites both control registers and writes the fallback time.
    fn reinitialize(&mut self) -> Result<(), Rx8025Error<I2C::Error>> {
        let (control1, control2) = reinit_controls();
        self.write_registers(&[RegAddr::Control1 as u8, control1.into(), control2.into()])?;
        self.set_time(&FALLBACK_TIME)
    }

    /// Reads the current time.
    ///
    /// # Returns
    /// * `Ok(TimeReading)` - All seven time fields, decoded
    /// * `Err(Rx8025Error::InvalidReading)` if the chip holds out-of-range values
    /// * `Err(Rx8025Error)` on bus error
    pub fn time(&mut self) -> Result<TimeReading, Rx8025Error<I2C::Error>> {
        let data = self.read_default_registers::<8>()?;
        // data[0] is control 2, the start of every address-less read
        trace!("RX8025: flags={:08b} time={:?}", data[0], &data[1..]);
        let mut raw = [0; 7];
        raw.copy_from_slice(&data[1..]);
        TimeReading::from_registers(raw).map_err(Rx8025Error::InvalidReading)
    }

    /// Sets the time. The weekday is computed from the date.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(Rx8025Error::InvalidTime)` if a field is out of range; nothing is written
    /// * `Err(Rx8025Error)` on bus error
    pub fn set_time(&mut self, time: &TimeSetting) -> Result<(), Rx8025Error<I2C::Error>> {
        let raw = time.to_registers().map_err(Rx8025Error::InvalidTime)?;
        let mut data = [0; 8];
        data[0] = RegAddr::Seconds as u8;
        data[1..].copy_from_slice(&raw);
        self.write_registers(&data)
    }

    /// Gets the current date and time as a chrono `NaiveDateTime`.
    pub fn datetime(&mut self) -> Result<NaiveDateTime, Rx8025Error<I2C::Error>> {
        self.time()?
            .to_datetime()
            .map_err(Rx8025Error::InvalidReading)
    }

    /// Sets the date and time from a chrono `NaiveDateTime` in 2000-2099.
    pub fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), Rx8025Error<I2C::Error>> {
        let time = TimeSetting::from_datetime(datetime).map_err(Rx8025Error::InvalidTime)?;
        self.set_time(&time)
    }

    /// Writes an alarm, then enables it and clears its flag.
    ///
    /// The values are committed before the alarm is enabled so that a stale
    /// match cannot fire. A bus error stops the sequence at that step.
    pub fn set_alarm(&mut self, config: &AlarmConfig) -> Result<(), Rx8025Error<I2C::Error>> {
        let regs = config.to_registers().map_err(Rx8025Error::Alarm)?;
        let channel = config.channel();
        debug!("RX8025: setting {:?} alarm", channel);
        self.write_registers(regs.as_bytes())?;
        self.enable_alarm(channel)?;
        self.clear_alarm(channel)
    }

    /// Reads back the alarm values of a channel.
    pub fn alarm(
        &mut self,
        channel: AlarmChannel,
    ) -> Result<AlarmConfig, Rx8025Error<I2C::Error>> {
        let mut data = [0; 3];
        let data = &mut data[..channel.register_count()];
        self.i2c
            .write_read(self.address, &[channel.minute_register() as u8], data)?;
        AlarmConfig::from_registers(channel, data).map_err(Rx8025Error::Alarm)
    }

    /// Enables an alarm channel, leaving every other control 1 bit unchanged.
    pub fn enable_alarm(&mut self, channel: AlarmChannel) -> Result<(), Rx8025Error<I2C::Error>> {
        let mut control = self.control1()?;
        control.set_alarm_enable(channel, true);
        self.set_control1(control)
    }

    /// Disables an alarm channel, leaving every other control 1 bit unchanged.
    pub fn disable_alarm(
        &mut self,
        channel: AlarmChannel,
    ) -> Result<(), Rx8025Error<I2C::Error>> {
        let mut control = self.control1()?;
        control.set_alarm_enable(channel, false);
        self.set_control1(control)
    }

    /// Clears the triggered flag of an alarm channel, leaving every other
    /// control 2 bit unchanged.
    pub fn clear_alarm(&mut self, channel: AlarmChannel) -> Result<(), Rx8025Error<I2C::Error>> {
        let mut flags = self.control2()?;
        flags.set_alarm_flag(channel, false);
        self.set_control2(flags)
    }

    /// Returns whether an alarm channel is enabled.
    pub fn alarm_enabled(&mut self, channel: AlarmChannel) -> Result<bool, Rx8025Error<I2C::Error>> {
        Ok(self.control1()?.alarm_enable(channel))
    }

    /// Returns whether an alarm channel has triggered.
    pub fn alarm_triggered(
        &mut self,
        channel: AlarmChannel,
    ) -> Result<bool, Rx8025Error<I2C::Error>> {
        Ok(self.control2()?.alarm_flag(channel))
    }

    /// Reads all 16 registers, starting at the seconds register, and logs
    /// each one in binary. Nothing is written.
    pub fn dump_registers(&mut self) -> Result<[u8; REGISTER_COUNT], Rx8025Error<I2C::Error>> {
        let mut data = [0; REGISTER_COUNT];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)?;
        debug!("RX8025: register dump");
        for (index, value) in data.iter().enumerate() {
            debug!("{}: {:08b}", index, value);
        }
        Ok(data)
    }
}

// Register access implementations. Getters are public; setters overwrite the
// whole register and are only used after a read.
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c, D: DelayNs> RX8025<I2C, D> {
            $(
                paste! {
                    #[doc = concat!("Gets the value of the ", stringify!($name), " register.")]
                    pub fn $name(&mut self) -> Result<$typ, Rx8025Error<I2C::Error>> {
                        let mut data = [0];
                        self.i2c
                            .write_read(self.address, &[$regaddr as u8], &mut data)?;
                        Ok(<$typ>::from(data[0]))
                    }

                    fn [<set_ $name>](&mut self, value: $typ) -> Result<(), Rx8025Error<I2C::Error>> {
                        self.write_registers(&[$regaddr as u8, value.into()])
                    }
                }
            )+
        }
    }
}

impl_register_access!(
    (control1, RegAddr::Control1, Control1),
    (control2, RegAddr::Control2, Control2)
);

#[cfg(test)]
pub(crate) mod test_utils {
    /// Delay that records requested settle times instead of sleeping.
    #[derive(Debug, Default)]
    pub struct CountingDelay {
        pub calls: usize,
        pub total_us: u64,
    }

    impl embedded_hal::delay::DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.calls += 1;
            self.total_us += u64::from(ns / 1_000);
        }

        fn delay_us(&mut self, us: u32) {
            self.calls += 1;
            self.total_us += u64::from(us);
        }
    }

    #[cfg(feature = "async")]
    impl embedded_hal_async::delay::DelayNs for CountingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.calls += 1;
            self.total_us += u64::from(ns / 1_000);
        }

        async fn delay_us(&mut self, us: u32) {
            self.calls += 1;
            self.total_us += u64::from(us);
        }
    }
}
