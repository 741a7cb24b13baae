//! Safe client for the usbtc08 driver (USB TC-08 thermocouple logger).
//!
//! The TC-08 has no timebase or buffer registration: each conversion returns
//! one temperature per channel, already linearised and cold-junction
//! compensated by the driver. The examples poll `get_single` in a sleep loop.

use std::ffi::OsStr;
use std::fmt;

use libc::c_char;

use crate::driver::Driver;
use crate::sys::usbtc08::{self, UsbTc08Bindings};
use crate::{Error, Result};

/// Thermocouple channels per unit, not counting the cold junction sensor.
pub const CHANNELS: usize = usbtc08::USBTC08_MAX_CHANNELS;

/// Failure codes reported by `usb_tc08_get_last_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tc08Error {
    OsNotSupported,
    NoChannelsSet,
    InvalidParameter,
    VariantNotSupported,
    IncorrectMode,
    EnumerationIncomplete,
    NotResponding,
    FirmwareFail,
    ConfigFail,
    NotFound,
    ThreadFail,
    PipeInfoFail,
    NotCalibrated,
    PicoppTooOld,
    Communication,
    Unknown(i16),
}

impl Tc08Error {
    pub(crate) fn from_code(code: i16) -> Tc08Error {
        match code {
            usbtc08::USBTC08_ERROR_OS_NOT_SUPPORTED => Tc08Error::OsNotSupported,
            usbtc08::USBTC08_ERROR_NO_CHANNELS_SET => Tc08Error::NoChannelsSet,
            usbtc08::USBTC08_ERROR_INVALID_PARAMETER => Tc08Error::InvalidParameter,
            usbtc08::USBTC08_ERROR_VARIANT_NOT_SUPPORTED => Tc08Error::VariantNotSupported,
            usbtc08::USBTC08_ERROR_INCORRECT_MODE => Tc08Error::IncorrectMode,
            usbtc08::USBTC08_ERROR_ENUMERATION_INCOMPLETE => Tc08Error::EnumerationIncomplete,
            usbtc08::USBTC08_ERROR_NOT_RESPONDING => Tc08Error::NotResponding,
            usbtc08::USBTC08_ERROR_FW_FAIL => Tc08Error::FirmwareFail,
            usbtc08::USBTC08_ERROR_CONFIG_FAIL => Tc08Error::ConfigFail,
            usbtc08::USBTC08_ERROR_NOT_FOUND => Tc08Error::NotFound,
            usbtc08::USBTC08_ERROR_THREAD_FAIL => Tc08Error::ThreadFail,
            usbtc08::USBTC08_ERROR_PIPE_INFO_FAIL => Tc08Error::PipeInfoFail,
            usbtc08::USBTC08_ERROR_NOT_CALIBRATED => Tc08Error::NotCalibrated,
            usbtc08::USBTC08_ERROR_PICOPP_TOO_OLD => Tc08Error::PicoppTooOld,
            usbtc08::USBTC08_ERROR_COMMUNICATION => Tc08Error::Communication,
            code => Tc08Error::Unknown(code),
        }
    }
}

impl fmt::Display for Tc08Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tc08Error::Unknown(code) => write!(f, "unknown error {}", code),
            error => write!(f, "{:?}", error),
        }
    }
}

/// Thermocouple wire type of a channel, or raw millivolt readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermocoupleType {
    B,
    E,
    J,
    K,
    N,
    R,
    S,
    T,
    /// Skip linearisation and report the input voltage in millivolts.
    RawMillivolts,
}

impl ThermocoupleType {
    fn code(self) -> c_char {
        (match self {
            ThermocoupleType::B => b'B',
            ThermocoupleType::E => b'E',
            ThermocoupleType::J => b'J',
            ThermocoupleType::K => b'K',
            ThermocoupleType::N => b'N',
            ThermocoupleType::R => b'R',
            ThermocoupleType::S => b'S',
            ThermocoupleType::T => b'T',
            ThermocoupleType::RawMillivolts => b'X',
        }) as c_char
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnits {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
    Rankine,
}

impl TemperatureUnits {
    fn code(self) -> i16 {
        match self {
            TemperatureUnits::Celsius => usbtc08::USBTC08_UNITS_CENTIGRADE,
            TemperatureUnits::Fahrenheit => usbtc08::USBTC08_UNITS_FAHRENHEIT,
            TemperatureUnits::Kelvin => usbtc08::USBTC08_UNITS_KELVIN,
            TemperatureUnits::Rankine => usbtc08::USBTC08_UNITS_RANKINE,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            TemperatureUnits::Celsius => "°C",
            TemperatureUnits::Fahrenheit => "°F",
            TemperatureUnits::Kelvin => "K",
            TemperatureUnits::Rankine => "°R",
        }
    }
}

/// Mains interference filter frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainsRejection {
    #[default]
    Hz50,
    Hz60,
}

/// Unit information lines understood by `usb_tc08_get_unit_info2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tc08Info {
    DriverVersion,
    KernelDriverVersion,
    HardwareVersion,
    VariantInfo,
    BatchAndSerial,
    CalDate,
}

impl Tc08Info {
    fn line(self) -> i16 {
        self as i16
    }
}

/// One conversion across the whole unit: the cold junction temperature plus
/// every thermocouple channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Index 0 is the cold junction sensor; 1..=8 are the input channels.
    /// Disabled channels read as NaN.
    pub temperatures: [f32; CHANNELS + 1],
    overflow: i16,
}

impl Reading {
    pub fn cold_junction(&self) -> f32 {
        self.temperatures[0]
    }

    pub fn channel(&self, channel: usize) -> f32 {
        self.temperatures[channel]
    }

    pub fn overflowed(&self, channel: usize) -> bool {
        self.overflow & (1 << channel) != 0
    }
}

/// An open USB TC-08 unit.
#[derive(Debug)]
pub struct Tc08 {
    bindings: UsbTc08Bindings,
    handle: i16,
}

impl Tc08 {
    /// Open the next unopened TC-08 attached to the system.
    pub fn open() -> Result<Tc08> {
        Tc08::open_library(&Driver::UsbTc08.library_name())
    }

    /// Open through an explicitly named driver library.
    pub fn open_library(library: &OsStr) -> Result<Tc08> {
        // SAFETY: the declared signatures match the vendor header for this
        // driver; nothing else about the library is assumed.
        let bindings = unsafe { UsbTc08Bindings::load(library)? };
        log::debug!("usb_tc08_open_unit()");
        let handle = unsafe { (bindings.usb_tc08_open_unit)() };
        match handle {
            0 => Err(Error::NotFound),
            handle if handle < 0 => {
                // the open error is filed against handle 0
                let code = unsafe { (bindings.usb_tc08_get_last_error)(0) };
                Err(Error::Tc08(Tc08Error::from_code(code)))
            }
            handle => {
                log::info!("opened TC-08 with handle {}", handle);
                Ok(Tc08 { bindings, handle })
            }
        }
    }

    fn last_error(&self) -> Error {
        let code = unsafe { (self.bindings.usb_tc08_get_last_error)(self.handle) };
        Error::Tc08(Tc08Error::from_code(code))
    }

    fn check(&self, result: i16) -> Result<()> {
        if result == 0 {
            Err(self.last_error())
        } else {
            Ok(())
        }
    }

    pub fn unit_info(&mut self, info: Tc08Info) -> Result<String> {
        let mut buffer = [0u8; 256];
        let result = unsafe {
            (self.bindings.usb_tc08_get_unit_info2)(
                self.handle,
                buffer.as_mut_ptr().cast(),
                buffer.len() as i16,
                info.line(),
            )
        };
        self.check(result)?;
        Ok(crate::sys::c_string(&buffer))
    }

    /// Configure the mains interference filter. Must match the local mains
    /// frequency or readings pick up 50/60 Hz noise.
    pub fn set_mains(&mut self, rejection: MainsRejection) -> Result<()> {
        log::debug!("usb_tc08_set_mains({:?})", rejection);
        let sixty_hz = (rejection == MainsRejection::Hz60) as i16;
        self.check(unsafe { (self.bindings.usb_tc08_set_mains)(self.handle, sixty_hz) })
    }

    /// Enable a channel with the given thermocouple type, or disable it.
    /// Channel 0 is the cold junction sensor and is always enabled.
    pub fn set_channel(&mut self, channel: usize, tc_type: Option<ThermocoupleType>)
            -> Result<()> {
        log::debug!("usb_tc08_set_channel({}, {:?})", channel, tc_type);
        // a space for the type code disables the channel
        let code = tc_type.map_or(b' ' as c_char, ThermocoupleType::code);
        self.check(unsafe {
            (self.bindings.usb_tc08_set_channel)(self.handle, channel as i16, code)
        })
    }

    /// Fastest conversion interval the current channel configuration
    /// supports, in milliseconds.
    pub fn minimum_interval_ms(&mut self) -> Result<u32> {
        let interval = unsafe { (self.bindings.usb_tc08_get_minimum_interval_ms)(self.handle) };
        if interval <= 0 {
            return Err(self.last_error());
        }
        Ok(interval as u32)
    }

    /// Convert once on every enabled channel.
    pub fn get_single(&mut self, units: TemperatureUnits) -> Result<Reading> {
        let mut temperatures = [0f32; CHANNELS + 1];
        let mut overflow = 0i16;
        let result = unsafe {
            (self.bindings.usb_tc08_get_single)(
                self.handle,
                temperatures.as_mut_ptr(),
                &mut overflow,
                units.code(),
            )
        };
        self.check(result)?;
        Ok(Reading { temperatures, overflow })
    }

    /// Start the driver's own conversion loop at `interval_ms` per reading,
    /// for use with [`Tc08::get_buffered`].
    pub fn run(&mut self, interval_ms: u32) -> Result<()> {
        log::debug!("usb_tc08_run({})", interval_ms);
        let result = unsafe { (self.bindings.usb_tc08_run)(self.handle, interval_ms as i32) };
        if result == 0 {
            return Err(self.last_error());
        }
        Ok(())
    }

    /// Drain readings the driver buffered for one channel since the last
    /// call. Returns the number of readings written and whether any
    /// overflowed the thermocouple's range.
    pub fn get_buffered(
        &mut self,
        channel: usize,
        units: TemperatureUnits,
        temperatures: &mut [f32],
        times_ms: &mut [i32],
    ) -> Result<(usize, bool)> {
        let length = temperatures.len().min(times_ms.len());
        let mut overflow = 0i16;
        let result = unsafe {
            (self.bindings.usb_tc08_get_temp)(
                self.handle,
                temperatures.as_mut_ptr(),
                times_ms.as_mut_ptr(),
                length as i32,
                &mut overflow,
                channel as i16,
                units.code(),
                0, // do not pad gaps with repeated readings
            )
        };
        if result < 0 {
            return Err(self.last_error());
        }
        Ok((result as usize, overflow != 0))
    }

    /// Stop the conversion loop started by [`Tc08::run`].
    pub fn stop(&mut self) -> Result<()> {
        log::debug!("usb_tc08_stop()");
        self.check(unsafe { (self.bindings.usb_tc08_stop)(self.handle) })
    }
}

impl Drop for Tc08 {
    fn drop(&mut self) {
        // Best effort; there is nowhere to report a failure from here.
        let result = unsafe { (self.bindings.usb_tc08_close_unit)(self.handle) };
        if result == 0 {
            log::warn!("usb_tc08_close_unit failed: {}", self.last_error());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Tc08Error::from_code(2), Tc08Error::NoChannelsSet);
        assert_eq!(Tc08Error::from_code(10), Tc08Error::NotFound);
        assert_eq!(Tc08Error::from_code(99), Tc08Error::Unknown(99));
        assert_eq!(Tc08Error::NotResponding.to_string(), "NotResponding");
        assert_eq!(Tc08Error::Unknown(99).to_string(), "unknown error 99");
    }

    #[test]
    fn test_type_codes() {
        assert_eq!(ThermocoupleType::K.code(), b'K' as c_char);
        assert_eq!(ThermocoupleType::RawMillivolts.code(), b'X' as c_char);
    }

    #[test]
    fn test_units() {
        assert_eq!(TemperatureUnits::Celsius.code(), 0);
        assert_eq!(TemperatureUnits::Rankine.code(), 3);
        assert_eq!(TemperatureUnits::default().suffix(), "°C");
    }

    #[test]
    fn test_info_lines() {
        assert_eq!(Tc08Info::DriverVersion.line(), 0);
        assert_eq!(Tc08Info::CalDate.line(), 5);
    }

    #[test]
    fn test_reading_overflow_flags() {
        let mut reading = Reading {
            temperatures: [21.5; CHANNELS + 1],
            overflow: 0b0000_0100,
        };
        assert!(reading.overflowed(2));
        assert!(!reading.overflowed(1));
        reading.overflow = 0;
        assert!(!reading.overflowed(2));
        assert_eq!(reading.cold_junction(), 21.5);
        assert_eq!(reading.channel(3), 21.5);
    }
}
