//! Async implementation of the RX-8025 driver.
//!
//! This module provides an async interface to the RX-8025 RTC device using
//! `embedded-hal-async` traits. It is only available when the `async` feature
//! is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use rx8025::asynch::RX8025;
//!
//! // Initialize device
//! let mut rtc = RX8025::new(i2c, delay, rx8025::DEFAULT_ADDRESS);
//!
//! // Check flags and recover the clock if needed
//! rtc.init().await?;
//!
//! // Get current time asynchronously
//! let time = rtc.time().await?;
//! ```

use chrono::NaiveDateTime;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use paste::paste;

use crate::{
    reinit_controls, AlarmChannel, AlarmConfig, Config, Control1, Control2, InitOutcome,
    RegAddr, Rx8025Error, TimeReading, TimeSetting, FALLBACK_TIME, REGISTER_COUNT,
};

/// RX-8025 Real-Time Clock async driver.
///
/// This struct provides the async interface to the RX-8025 RTC device.
/// It supports async I2C operations through the `embedded-hal-async` traits.
pub struct RX8025<I2C: I2c, D: DelayNs> {
    i2c: I2C,
    delay: D,
    address: u8,
    config: Config,
}

impl<I2C: I2c, D: DelayNs> RX8025<I2C, D> {
    /// Creates a new RX-8025 async driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The async I2C bus implementation
    /// * `delay` - Async delay used to let the chip settle after writes
    /// * `address` - The 7-bit I2C address of the device (typically 0x32)
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self::with_config(i2c, delay, address, Config::default())
    }

    /// Creates a new RX-8025 async driver instance with an explicit [`Config`].
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

    async fn write_registers(&mut self, bytes: &[u8]) -> Result<(), Rx8025Error<I2C::Error>> {
        self.i2c.write(self.address, bytes).await?;
        self.delay.delay_us(self.config.settle_delay_us()).await;
        Ok(())
    }

    async fn read_default_registers<const N: usize>(
        &mut self,
    ) -> Result<[u8; N], Rx8025Error<I2C::Error>> {
        let mut data = [0; N];
        self.i2c.read(self.address, &mut data).await?;
        Ok(data)
    }

    /// Reads control register 2, the register the chip returns on a read
    /// without an address.
    pub async fn read_default_register(&mut self) -> Result<Control2, Rx8025Error<I2C::Error>> {
        let [flags] = self.read_default_registers::<1>().await?;
        Ok(Control2::from(flags))
    }

    /// Checks the power-on and oscillator flags and brings the chip into a
    /// known state. See [`crate::RX8025::init`].
    pub async fn init(&mut self) -> Result<InitOutcome, Rx8025Error<I2C::Error>> {
        let mut flags = self.read_default_register().await?;
        debug!("RX8025: flags={:08b}", u8::from(flags));
        let outcome = InitOutcome::from_flags(flags);
        match outcome {
            InitOutcome::Trusted => {
                flags.set_oscillator_stop_detection(true);
                self.set_control2(flags).await?;
            }
            InitOutcome::Reinitialized(reason) => {
                warn!("RX8025: clock unreliable ({:?}), re-initializing", reason);
                let (control1, control2) = reinit_controls();
                self.write_registers(&[RegAddr::Control1 as u8, control1.into(), control2.into()])
                    .await?;
                self.set_time(&FALLBACK_TIME).await?;
            }
        }
        Ok(outcome)
    }

    /// Reads the current time.
    pub async fn time(&mut self) -> Result<TimeReading, Rx8025Error<I2C::Error>> {
        let data = self.read_default_registers::<8>().await?;
        trace!("RX8025: flags={:08b} time={:?}", data[0], &data[1..]);
        let mut raw = [0; 7];
        raw.copy_from_slice(&data[1..]);
        TimeReading::from_registers(raw).map_err(Rx8025Error::InvalidReading)
    }

    /// Sets the time. The weekday is computed from the date.
    pub async fn set_time(&mut self, time: &TimeSetting) -> Result<(), Rx8025Error<I2C::Error>> {
        let raw = time.to_registers().map_err(Rx8025Error::InvalidTime)?;
        let mut data = [0; 8];
        data[0] = RegAddr::Seconds as u8;
        data[1..].copy_from_slice(&raw);
        self.write_registers(&data).await
    }

    /// Gets the current date and time as a chrono `NaiveDateTime`.
    pub async fn datetime(&mut self) -> Result<NaiveDateTime, Rx8025Error<I2C::Error>> {
        self.time()
            .await?
            .to_datetime()
            .map_err(Rx8025Error::InvalidReading)
    }

    /// Sets the date and time from a chrono `NaiveDateTime` in 2000-2099.
    pub async fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), Rx8025Error<I2C::Error>> {
        let time = TimeSetting::from_datetime(datetime).map_err(Rx8025Error::InvalidTime)?;
        self.set_time(&time).await
    }

    /// Writes an alarm, then enables it and clears its flag.
    pub async fn set_alarm(&mut self, config: &AlarmConfig) -> Result<(), Rx8025Error<I2C::Error>> {
        let regs = config.to_registers().map_err(Rx8025Error::Alarm)?;
        let channel = config.channel();
        debug!("RX8025: setting {:?} alarm", channel);
        self.write_registers(regs.as_bytes()).await?;
        self.enable_alarm(channel).await?;
        self.clear_alarm(channel).await
    }

    /// Reads back the alarm values of a channel.
    pub async fn alarm(
        &mut self,
        channel: AlarmChannel,
    ) -> Result<AlarmConfig, Rx8025Error<I2C::Error>> {
        let mut data = [0; 3];
        let data = &mut data[..channel.register_count()];
        self.i2c
            .write_read(self.address, &[channel.minute_register() as u8], data)
            .await?;
        AlarmConfig::from_registers(channel, data).map_err(Rx8025Error::Alarm)
    }

    /// Enables an alarm channel, leaving every other control 1 bit unchanged.
    pub async fn enable_alarm(
        &mut self,
        channel: AlarmChannel,
    ) -> Result<(), Rx8025Error<I2C::Error>> {
        let mut control = self.control1().await?;
        control.set_alarm_enable(channel, true);
        self.set_control1(control).await
    }

    /// Disables an alarm channel, leaving every other control 1 bit unchanged.
    pub async fn disable_alarm(
        &mut self,
        channel: AlarmChannel,
    ) -> Result<(), Rx8025Error<I2C::Error>> {
        let mut control = self.control1().await?;
        control.set_alarm_enable(channel, false);
        self.set_control1(control).await
    }

    /// Clears the triggered flag of an alarm channel, leaving every other
    /// control 2 bit unchanged.
    pub async fn clear_alarm(
        &mut self,
        channel: AlarmChannel,
    ) -> Result<(), Rx8025Error<I2C::Error>> {
        let mut flags = self.control2().await?;
        flags.set_alarm_flag(channel, false);
        self.set_control2(flags).await
    }

    /// Returns whether an alarm channel is enabled.
    pub async fn alarm_enabled(
        &mut self,
        channel: AlarmChannel,
    ) -> Result<bool, Rx8025Error<I2C::Error>> {
        Ok(self.control1().await?.alarm_enable(channel))
    }

    /// Returns whether an alarm channel has triggered.
    pub async fn alarm_triggered(
        &mut self,
        channel: AlarmChannel,
    ) -> Result<bool, Rx8025Error<I2C::Error>> {
        Ok(self.control2().await?.alarm_flag(channel))
    }

    /// Reads all 16 registers starting at the seconds register and logs each
    /// one in binary.
    pub async fn dump_registers(
        &mut self,
    ) -> Result<[u8; REGISTER_COUNT], Rx8025Error<I2C::Error>> {
        let mut data = [0; REGISTER_COUNT];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)
            .await?;
        debug!("RX8025: register dump");
        for (index, value) in data.iter().enumerate() {
            debug!("{}: {:08b}", index, value);
        }
        Ok(data)
    }
}

// Register access implementations
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c, D: DelayNs> RX8025<I2C, D> {
            $(
                paste! {
                    #[doc = concat!("Gets the value of the ", stringify!($name), " register.")]
                    pub async fn $name(&mut self) -> Result<$typ, Rx8025Error<I2C::Error>> {
                        let mut data = [0];
                        self.i2c
                            .write_read(self.address, &[$regaddr as u8], &mut data)
                            .await?;
                        Ok(<$typ>::from(data[0]))
                    }

                    async fn [<set_ $name>](&mut self, value: $typ) -> Result<(), Rx8025Error<I2C::Error>> {
                        self.write_registers(&[$regaddr as u8, value.into()]).await
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
