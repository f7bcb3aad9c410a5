//! Register definitions and bitfield structures for the RX-8025 RTC.
//!
//! The RX-8025 exposes 16 registers. The register number is carried in the
//! upper nibble of the address byte; the lower nibble selects the transfer
//! mode and is always `0` (standard mode) in this driver.
//!
//! The two control registers hold independently owned bits. They are modelled
//! as bitfield value types so that every update can be done as a
//! read-modify-write touching only the intended bit.

use bitfield::bitfield;

use crate::alarm::AlarmChannel;

/// 7-bit I²C address of the RX-8025.
pub const DEFAULT_ADDRESS: u8 = 0x32;

/// Number of registers in the RX-8025 register map.
pub const REGISTER_COUNT: usize = 16;

/// Masks dropping non-value bits from the seconds..years registers, in
/// register order. The month mask also drops the century flag.
pub(crate) const TIME_FIELD_MASKS: [u8; 7] = [0x7F, 0x7F, 0x3F, 0x07, 0x3F, 0x1F, 0xFF];

/// Masks for the alarm minute, hour and weekday registers.
pub(crate) const ALARM_FIELD_MASKS: [u8; 3] = [0x7F, 0x3F, 0x07];

/// Register addresses for the RX-8025 RTC.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Seconds register (0-59)
    Seconds = 0x00,
    /// Minutes register (0-59)
    Minutes = 0x10,
    /// Hours register (0-23)
    Hours = 0x20,
    /// Weekday register
    Weekdays = 0x30,
    /// Day of month register (1-31)
    Days = 0x40,
    /// Month register (1-12) with century flag
    Months = 0x50,
    /// Year register (0-99)
    Years = 0x60,
    /// Digital offset (clock adjustment) register
    DigitalOffset = 0x70,
    /// Weekly alarm minute register
    AlarmWMinute = 0x80,
    /// Weekly alarm hour register
    AlarmWHour = 0x90,
    /// Weekly alarm weekday register
    AlarmWWeekday = 0xA0,
    /// Daily alarm minute register
    AlarmDMinute = 0xB0,
    /// Daily alarm hour register
    AlarmDHour = 0xC0,
    /// Reserved
    Reserved = 0xD0,
    /// Control register 1 (alarm enables, 12/24 mode, periodic interrupt)
    Control1 = 0xE0,
    /// Control register 2 (status flags)
    Control2 = 0xF0,
}

impl RegAddr {
    /// Register number (`0..=15`) carried in the upper nibble.
    pub const fn index(self) -> u8 {
        self as u8 >> 4
    }
}

/// Hour counting mode, the `/12,24` bit of control register 1.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HourMode {
    /// 12-hour format with AM/PM bit
    TwelveHour = 0,
    /// 24-hour format (0-23)
    TwentyFourHour = 1,
}
impl From<u8> for HourMode {
    /// Creates an `HourMode` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => HourMode::TwelveHour,
            1 => HourMode::TwentyFourHour,
            _ => panic!("Invalid value for HourMode: {}", v),
        }
    }
}
impl From<HourMode> for u8 {
    fn from(v: HourMode) -> Self {
        v as u8
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Control register 1 (`0xE0`).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control1(u8);
    impl Debug;
    /// WALE: weekly alarm enable
    pub weekly_alarm_enable, set_weekly_alarm_enable: 7;
    /// DALE: daily alarm enable
    pub daily_alarm_enable, set_daily_alarm_enable: 6;
    /// `/12,24`: hour counting mode
    pub from into HourMode, hour_mode, set_hour_mode: 5, 5;
    /// `/CLEN2`: disables the 32 kHz clock output when set
    pub clock_output2_disable, set_clock_output2_disable: 4;
    /// TEST: factory test bit, must stay 0
    pub test, set_test: 3;
    /// CT2..CT0: periodic interrupt selection
    pub periodic_interrupt, set_periodic_interrupt: 2, 0;
}
from_register_u8!(Control1);

impl Control1 {
    /// Returns the enable bit of an alarm channel.
    pub fn alarm_enable(&self, channel: AlarmChannel) -> bool {
        match channel {
            AlarmChannel::Weekly => self.weekly_alarm_enable(),
            AlarmChannel::Daily => self.daily_alarm_enable(),
        }
    }

    /// Sets or clears the enable bit of one alarm channel only.
    pub fn set_alarm_enable(&mut self, channel: AlarmChannel, enable: bool) {
        match channel {
            AlarmChannel::Weekly => self.set_weekly_alarm_enable(enable),
            AlarmChannel::Daily => self.set_daily_alarm_enable(enable),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Control1 {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Control1(wale={}, dale={}, mode={}, ct={})",
            self.weekly_alarm_enable(),
            self.daily_alarm_enable(),
            self.hour_mode(),
            self.periodic_interrupt()
        );
    }
}

bitfield! {
    /// Control register 2 (`0xF0`), the flag register.
    ///
    /// This is the register the chip returns first on a read that does not
    /// set an address.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control2(u8);
    impl Debug;
    /// VDSL: supply voltage detection threshold select
    pub voltage_detect_select, set_voltage_detect_select: 7;
    /// VDET: supply voltage drop detected
    pub voltage_drop, set_voltage_drop: 6;
    /// `/XST`: reads 0 once the oscillator has stopped; writing 1 arms detection
    pub oscillator_stop_detection, set_oscillator_stop_detection: 5;
    /// PON: power-on reset occurred, register contents are unreliable
    pub power_on, set_power_on: 4;
    /// `/CLEN1`: disables the 32 kHz clock output when set
    pub clock_output1_disable, set_clock_output1_disable: 3;
    /// CTFG: periodic interrupt flag
    pub periodic_interrupt_flag, set_periodic_interrupt_flag: 2;
    /// WAFG: weekly alarm triggered
    pub weekly_alarm_flag, set_weekly_alarm_flag: 1;
    /// DAFG: daily alarm triggered
    pub daily_alarm_flag, set_daily_alarm_flag: 0;
}
from_register_u8!(Control2);

impl Control2 {
    /// Returns the triggered flag of an alarm channel.
    pub fn alarm_flag(&self, channel: AlarmChannel) -> bool {
        match channel {
            AlarmChannel::Weekly => self.weekly_alarm_flag(),
            AlarmChannel::Daily => self.daily_alarm_flag(),
        }
    }

    /// Sets or clears the triggered flag of one alarm channel only.
    pub fn set_alarm_flag(&mut self, channel: AlarmChannel, value: bool) {
        match channel {
            AlarmChannel::Weekly => self.set_weekly_alarm_flag(value),
            AlarmChannel::Daily => self.set_daily_alarm_flag(value),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Control2 {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Control2(pon={}, xst={}, vdet={}, wafg={}, dafg={})",
            self.power_on(),
            self.oscillator_stop_detection(),
            self.voltage_drop(),
            self.weekly_alarm_flag(),
            self.daily_alarm_flag()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_addresses() {
        assert_eq!(RegAddr::Seconds as u8, 0x00);
        assert_eq!(RegAddr::Weekdays as u8, 0x30);
        assert_eq!(RegAddr::AlarmWMinute as u8, 0x80);
        assert_eq!(RegAddr::AlarmDMinute as u8, 0xB0);
        assert_eq!(RegAddr::Control1 as u8, 0xE0);
        assert_eq!(RegAddr::Control2 as u8, 0xF0);
        assert_eq!(RegAddr::Seconds.index(), 0);
        assert_eq!(RegAddr::Control2.index(), 15);
    }

    #[test]
    fn test_hour_mode_conversions() {
        assert_eq!(HourMode::from(0), HourMode::TwelveHour);
        assert_eq!(HourMode::from(1), HourMode::TwentyFourHour);
        assert_eq!(u8::from(HourMode::TwentyFourHour), 1);
    }

    #[test]
    #[should_panic(expected = "Invalid value for HourMode: 2")]
    fn test_invalid_hour_mode_conversion() {
        let _ = HourMode::from(2);
    }

    #[test]
    fn test_control1_register_conversions() {
        let control = Control1::from(0x20);
        assert_eq!(control.hour_mode(), HourMode::TwentyFourHour);
        assert!(!control.weekly_alarm_enable());
        assert!(!control.daily_alarm_enable());
        assert_eq!(u8::from(control), 0x20);

        let control = Control1::from(0xC3);
        assert!(control.weekly_alarm_enable());
        assert!(control.daily_alarm_enable());
        assert_eq!(control.hour_mode(), HourMode::TwelveHour);
        assert_eq!(control.periodic_interrupt(), 0b011);

        let mut control = Control1::default();
        control.set_hour_mode(HourMode::TwentyFourHour);
        assert_eq!(u8::from(control), 0x20);
    }

    #[test]
    fn test_control1_alarm_enable_touches_one_bit() {
        let mut control = Control1::from(0b0011_0101);
        control.set_alarm_enable(AlarmChannel::Daily, true);
        assert_eq!(u8::from(control), 0b0111_0101);
        control.set_alarm_enable(AlarmChannel::Weekly, true);
        assert_eq!(u8::from(control), 0b1111_0101);
        control.set_alarm_enable(AlarmChannel::Daily, false);
        assert_eq!(u8::from(control), 0b1011_0101);
        assert!(control.alarm_enable(AlarmChannel::Weekly));
        assert!(!control.alarm_enable(AlarmChannel::Daily));
    }

    #[test]
    fn test_control2_register_conversions() {
        let status = Control2::from(0x10);
        assert!(status.power_on());
        assert!(!status.oscillator_stop_detection());

        let status = Control2::from(0x20);
        assert!(!status.power_on());
        assert!(status.oscillator_stop_detection());

        let status = Control2::from(0xFF);
        assert!(status.voltage_detect_select());
        assert!(status.voltage_drop());
        assert!(status.clock_output1_disable());
        assert!(status.periodic_interrupt_flag());
        assert!(status.weekly_alarm_flag());
        assert!(status.daily_alarm_flag());
    }

    #[test]
    fn test_control2_alarm_flag_touches_one_bit() {
        let mut status = Control2::from(0xFF);
        status.set_alarm_flag(AlarmChannel::Daily, false);
        assert_eq!(u8::from(status), 0xFE);
        status.set_alarm_flag(AlarmChannel::Weekly, false);
        assert_eq!(u8::from(status), 0xFC);
        assert!(!status.alarm_flag(AlarmChannel::Daily));
        assert!(!status.alarm_flag(AlarmChannel::Weekly));
    }
}
