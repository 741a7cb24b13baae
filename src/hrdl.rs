//! Safe client for the picohrdl driver (PicoLog High Resolution Data Logger,
//! ADC-20/ADC-24).
//!
//! The HRDL samples slowly (one conversion per tens of milliseconds) with up
//! to 24-bit resolution. Captures run as windowed blocks: configure channels
//! and interval, run, poll ready, fetch 32-bit counts, scale against the
//! per-channel ADC count limits.

use std::ffi::OsStr;
use std::fmt;

use crate::driver::Driver;
use crate::sys::picohrdl::{self, PicoHrdlBindings};
use crate::{Error, Result};

pub const MAX_CHANNELS: usize = picohrdl::HRDL_MAX_ANALOG_CHANNELS;

/// Failure codes reported through the error info line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrdlError {
    KernelDriver,
    NotFound,
    ConfigFail,
    OsNotSupported,
    MaxDevices,
    Unknown(i16),
}

impl HrdlError {
    pub(crate) fn from_code(code: i16) -> HrdlError {
        match code {
            picohrdl::HRDL_KERNEL_DRIVER => HrdlError::KernelDriver,
            picohrdl::HRDL_NOT_FOUND => HrdlError::NotFound,
            picohrdl::HRDL_CONFIG_FAIL => HrdlError::ConfigFail,
            picohrdl::HRDL_ERROR_OS_NOT_SUPPORTED => HrdlError::OsNotSupported,
            picohrdl::HRDL_MAX_DEVICES => HrdlError::MaxDevices,
            code => HrdlError::Unknown(code),
        }
    }
}

impl fmt::Display for HrdlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HrdlError::Unknown(code) => write!(f, "unknown error {}", code),
            error => write!(f, "{:?}", error),
        }
    }
}

/// Input voltage range of an analog channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HrdlRange {
    #[default]
    Mv2500,
    Mv1250,
    Mv625,
    Mv312,
    Mv156,
    Mv78,
    Mv39,
}

impl HrdlRange {
    fn code(self) -> i16 {
        self as i16
    }

    /// Full scale of the range in millivolts. The lower ranges are successive
    /// halvings of 2500 mV, so most are not round numbers.
    pub fn millivolts(self) -> f64 {
        2500.0 / (1 << (self as u32)) as f64
    }
}

/// Duration of a single conversion. Longer conversions reject more noise and
/// resolve more bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionTime {
    #[default]
    Ms60,
    Ms100,
    Ms180,
    Ms340,
    Ms660,
}

impl ConversionTime {
    fn code(self) -> i16 {
        self as i16
    }

    pub fn millis(self) -> u32 {
        match self {
            ConversionTime::Ms60 => 60,
            ConversionTime::Ms100 => 100,
            ConversionTime::Ms180 => 180,
            ConversionTime::Ms340 => 340,
            ConversionTime::Ms660 => 660,
        }
    }
}

/// Unit information lines understood by `HRDLGetUnitInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrdlInfo {
    DriverVersion,
    UsbVersion,
    HardwareVersion,
    VariantInfo,
    BatchAndSerial,
    CalDate,
    KernelDriverVersion,
}

impl HrdlInfo {
    fn line(self) -> i16 {
        self as i16
    }
}

/// Configuration of one analog input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HrdlChannelConfiguration {
    pub range: HrdlRange,
    /// Single-ended measures against ground; differential pairs the channel
    /// with its neighbour.
    pub single_ended: bool,
}

impl Default for HrdlChannelConfiguration {
    fn default() -> Self {
        Self {
            range: HrdlRange::default(),
            single_ended: true,
        }
    }
}

/// Scale a raw HRDL count to millivolts against the reported maximum count.
pub fn counts_to_millivolts(raw: i32, max_adc: i32, range: HrdlRange) -> f64 {
    raw as f64 * range.millivolts() / max_adc as f64
}

/// An open high resolution data logger.
#[derive(Debug)]
pub struct DataLogger {
    bindings: PicoHrdlBindings,
    handle: i16,
}

impl DataLogger {
    /// Open the next unopened logger attached to the system.
    pub fn open() -> Result<DataLogger> {
        DataLogger::open_library(&Driver::PicoHrdl.library_name())
    }

    /// Open through an explicitly named driver library.
    pub fn open_library(library: &OsStr) -> Result<DataLogger> {
        // SAFETY: the declared signatures match the vendor header for this
        // driver; nothing else about the library is assumed.
        let bindings = unsafe { PicoHrdlBindings::load(library)? };
        log::debug!("HRDLOpenUnit()");
        let handle = unsafe { (bindings.HRDLOpenUnit)() };
        match handle {
            0 => Err(Error::NotFound),
            handle if handle < 0 => {
                // the failed handle can still be queried for the open error
                let error = read_error(&bindings, handle);
                Err(error)
            }
            handle => {
                log::info!("opened HRDL with handle {}", handle);
                Ok(DataLogger { bindings, handle })
            }
        }
    }

    fn last_error(&self) -> Error {
        read_error(&self.bindings, self.handle)
    }

    fn check(&self, result: i16) -> Result<()> {
        if result == 0 {
            Err(self.last_error())
        } else {
            Ok(())
        }
    }

    pub fn unit_info(&mut self, info: HrdlInfo) -> Result<String> {
        read_info(&self.bindings, self.handle, info.line())
            .ok_or(Error::Hrdl(HrdlError::Unknown(-1)))
    }

    /// Configure the mains noise rejection filter.
    pub fn set_mains_rejection(&mut self, sixty_hz: bool) -> Result<()> {
        log::debug!("HRDLSetMains(sixty_hz={})", sixty_hz);
        self.check(unsafe { (self.bindings.HRDLSetMains)(self.handle, sixty_hz as i16) })
    }

    /// Enable an analog input channel (1-based), or disable it with `None`.
    pub fn set_analog_channel(
        &mut self,
        channel: usize,
        config: Option<HrdlChannelConfiguration>,
    ) -> Result<()> {
        log::debug!("HRDLSetAnalogInChannel({}, {:?})", channel, config);
        let HrdlChannelConfiguration { range, single_ended } = config.unwrap_or_default();
        self.check(unsafe {
            (self.bindings.HRDLSetAnalogInChannel)(
                self.handle,
                channel as i16,
                config.is_some() as i16,
                range.code(),
                single_ended as i16,
            )
        })
    }

    /// Set the interval between conversion sweeps. The interval must exceed
    /// the conversion time multiplied by the number of enabled channels.
    pub fn set_interval(&mut self, sample_interval_ms: u32, conversion: ConversionTime)
            -> Result<()> {
        log::debug!("HRDLSetInterval({} ms, {:?})", sample_interval_ms, conversion);
        self.check(unsafe {
            (self.bindings.HRDLSetInterval)(
                self.handle,
                sample_interval_ms as i32,
                conversion.code(),
            )
        })
    }

    /// Start collecting `values` readings per enabled channel.
    pub fn run(&mut self, values: usize) -> Result<()> {
        log::debug!("HRDLRun({})", values);
        self.check(unsafe {
            (self.bindings.HRDLRun)(self.handle, values as i32, picohrdl::HRDL_BM_BLOCK)
        })
    }

    /// Whether the capture started by [`DataLogger::run`] has finished.
    pub fn ready(&mut self) -> bool {
        unsafe { (self.bindings.HRDLReady)(self.handle) != 0 }
    }

    /// Fetch collected readings, interleaved across enabled channels in
    /// channel order. Returns the number of values per channel written and
    /// whether any channel overranged.
    pub fn get_values(&mut self, values: &mut [i32]) -> Result<(usize, bool)> {
        let mut overflow = 0i16;
        let count = unsafe {
            (self.bindings.HRDLGetValues)(
                self.handle,
                values.as_mut_ptr(),
                &mut overflow,
                values.len() as i32,
            )
        };
        if count == 0 {
            return Err(self.last_error());
        }
        Ok((count as usize, overflow != 0))
    }

    /// Convert once on a single channel, blocking for the conversion time.
    pub fn get_single_value(
        &mut self,
        channel: usize,
        config: HrdlChannelConfiguration,
        conversion: ConversionTime,
    ) -> Result<(i32, bool)> {
        let mut overflow = 0i16;
        let mut value = 0i32;
        let result = unsafe {
            (self.bindings.HRDLGetSingleValue)(
                self.handle,
                channel as i16,
                config.range.code(),
                conversion.code(),
                config.single_ended as i16,
                &mut overflow,
                &mut value,
            )
        };
        self.check(result)?;
        Ok((value, overflow != 0))
    }

    /// ADC count limits for a channel; the maximum is the divisor for
    /// [`counts_to_millivolts`].
    pub fn min_max_adc_counts(&mut self, channel: usize) -> Result<(i32, i32)> {
        let mut min_adc = 0i32;
        let mut max_adc = 0i32;
        self.check(unsafe {
            (self.bindings.HRDLGetMinMaxAdcCounts)(
                self.handle,
                &mut min_adc,
                &mut max_adc,
                channel as i16,
            )
        })?;
        Ok((min_adc, max_adc))
    }
}

impl Drop for DataLogger {
    fn drop(&mut self) {
        // Best effort; there is nowhere to report a failure from here.
        let result = unsafe { (self.bindings.HRDLCloseUnit)(self.handle) };
        if result == 0 {
            log::warn!("HRDLCloseUnit failed");
        }
    }
}

fn read_info(bindings: &PicoHrdlBindings, handle: i16, line: i16) -> Option<String> {
    let mut buffer = [0u8; 256];
    let written = unsafe {
        (bindings.HRDLGetUnitInfo)(
            handle,
            buffer.as_mut_ptr().cast(),
            buffer.len() as i16,
            line,
        )
    };
    if written == 0 {
        return None;
    }
    Some(crate::sys::c_string(&buffer))
}

/// The driver reports failures as a numeric code printed into an info line.
fn read_error(bindings: &PicoHrdlBindings, handle: i16) -> Error {
    let code = read_info(bindings, handle, picohrdl::HRDL_ERROR)
        .and_then(|text| text.trim().parse::<i16>().ok())
        .unwrap_or(-1);
    Error::Hrdl(HrdlError::from_code(code))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_range_millivolts() {
        assert_eq!(HrdlRange::Mv2500.millivolts(), 2500.0);
        assert_eq!(HrdlRange::Mv1250.millivolts(), 1250.0);
        assert_eq!(HrdlRange::Mv312.millivolts(), 312.5);
        assert_eq!(HrdlRange::Mv39.millivolts(), 39.0625);
    }

    #[test]
    fn test_range_codes() {
        assert_eq!(HrdlRange::Mv2500.code(), 0);
        assert_eq!(HrdlRange::Mv39.code(), 6);
    }

    #[test]
    fn test_conversion_times() {
        assert_eq!(ConversionTime::Ms60.code(), 0);
        assert_eq!(ConversionTime::Ms660.code(), 4);
        assert_eq!(ConversionTime::Ms340.millis(), 340);
    }

    #[test]
    fn test_counts_to_millivolts() {
        // 24-bit ADC at the 2500 mV range
        const MAX_ADC: i32 = 8_388_607;
        assert_eq!(counts_to_millivolts(MAX_ADC, MAX_ADC, HrdlRange::Mv2500), 2500.0);
        assert_eq!(counts_to_millivolts(0, MAX_ADC, HrdlRange::Mv2500), 0.0);
        let half = counts_to_millivolts(MAX_ADC / 2, MAX_ADC, HrdlRange::Mv1250);
        assert!((half - 625.0).abs() < 0.001);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(HrdlError::from_code(2), HrdlError::NotFound);
        assert_eq!(HrdlError::from_code(5), HrdlError::MaxDevices);
        assert_eq!(HrdlError::from_code(42), HrdlError::Unknown(42));
        assert_eq!(HrdlError::NotFound.to_string(), "NotFound");
    }

    #[test]
    fn test_info_lines() {
        assert_eq!(HrdlInfo::DriverVersion.line(), 0);
        assert_eq!(HrdlInfo::KernelDriverVersion.line(), 6);
    }
}
