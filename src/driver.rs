//! Registry of the vendor driver families and their shared library names.

use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;

/// One vendor driver family. Each family ships as a separate shared library
/// exporting its own prefixed flavour of the same open/configure/capture ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    /// PicoLog High Resolution Data Logger (ADC-20/ADC-24).
    PicoHrdl,
    /// PicoLog 1000 Series voltage loggers.
    Pl1000,
    /// PicoLog CM3 current data logger.
    PlCm3,
    /// PicoScope 2000 Series oscilloscopes (original API).
    Ps2000,
    /// PicoScope 2000 Series A/B oscilloscopes.
    Ps2000a,
    /// PicoScope 3000 Series oscilloscopes (original API).
    Ps3000,
    /// PicoScope 3000 Series A/B/D oscilloscopes.
    Ps3000a,
    /// PicoScope 4000 Series A oscilloscopes.
    Ps4000a,
    /// PicoScope 5000 Series A/B flexible-resolution oscilloscopes.
    Ps5000a,
    /// PicoScope 6000 Series oscilloscopes.
    Ps6000,
    /// PicoScope 6000 Series A oscilloscopes.
    Ps6000a,
    /// PicoScope 3000E Series oscilloscopes.
    PsOspa,
    /// USB DrDAQ multi-purpose logger.
    UsbDrDaq,
    /// USB PT-104 platinum resistance thermometer logger.
    UsbPt104,
    /// USB TC-08 thermocouple logger.
    UsbTc08,
}

impl Driver {
    pub const ALL: [Driver; 15] = [
        Driver::PicoHrdl,
        Driver::Pl1000,
        Driver::PlCm3,
        Driver::Ps2000,
        Driver::Ps2000a,
        Driver::Ps3000,
        Driver::Ps3000a,
        Driver::Ps4000a,
        Driver::Ps5000a,
        Driver::Ps6000,
        Driver::Ps6000a,
        Driver::PsOspa,
        Driver::UsbDrDaq,
        Driver::UsbPt104,
        Driver::UsbTc08,
    ];

    /// Families for which this crate carries a high-level client. The other
    /// families repeat one of these call shapes with a different symbol prefix.
    pub const SUPPORTED: [Driver; 4] =
        [Driver::Ps2000a, Driver::Ps5000a, Driver::UsbTc08, Driver::PicoHrdl];

    /// Base name of the driver, as used in symbol prefixes and CLI selection.
    pub fn short_name(self) -> &'static str {
        match self {
            Driver::PicoHrdl => "picohrdl",
            Driver::Pl1000 => "pl1000",
            Driver::PlCm3 => "plcm3",
            Driver::Ps2000 => "ps2000",
            Driver::Ps2000a => "ps2000a",
            Driver::Ps3000 => "ps3000",
            Driver::Ps3000a => "ps3000a",
            Driver::Ps4000a => "ps4000a",
            Driver::Ps5000a => "ps5000a",
            Driver::Ps6000 => "ps6000",
            Driver::Ps6000a => "ps6000a",
            Driver::PsOspa => "psospa",
            Driver::UsbDrDaq => "usbdrdaq",
            Driver::UsbPt104 => "usbpt104",
            Driver::UsbTc08 => "usbtc08",
        }
    }

    /// File name of the shared library the dynamic loader should resolve.
    ///
    /// Only the file name is returned; the platform loader applies its usual
    /// search path, which is where the vendor SDK installs the drivers.
    pub fn library_name(self) -> OsString {
        #[cfg(target_os = "windows")]
        let name = format!("{}.dll", self.short_name());
        #[cfg(target_os = "macos")]
        let name = format!("lib{}.dylib", self.short_name());
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let name = format!("lib{}.so", self.short_name());
        name.into()
    }

    /// Whether the driver's shared library is installed, checked by loading
    /// and immediately unloading it without binding any symbols.
    pub fn library_present(self) -> bool {
        // SAFETY: loading runs the library's initialisers; the vendor drivers
        // tolerate being loaded and unloaded without any calls made.
        unsafe { libloading::Library::new(self.library_name()).is_ok() }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl FromStr for Driver {
    type Err = String;

    fn from_str(name: &str) -> Result<Driver, Self::Err> {
        Driver::ALL
            .into_iter()
            .find(|driver| driver.short_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| format!("unknown driver {:?}", name))
    }
}

/// Channel count encoded in a variant string such as `"2206B"` or `"5444D"`.
///
/// The drivers report the model number through the variant info line; its
/// second digit is the analog channel count on every scope family.
pub(crate) fn channels_in_variant(variant: &str) -> Option<usize> {
    let digit = variant.chars().nth(1)?.to_digit(10)? as usize;
    (1..=4).contains(&digit).then_some(digit)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_str_roundtrip() {
        for driver in Driver::ALL {
            assert_eq!(driver.short_name().parse::<Driver>(), Ok(driver));
        }
        assert_eq!("PS2000A".parse::<Driver>(), Ok(Driver::Ps2000a));
        assert!("ps9999".parse::<Driver>().is_err());
    }

    #[test]
    fn test_library_name() {
        let name = Driver::Ps2000a.library_name();
        let name = name.to_str().unwrap();
        assert!(name.contains("ps2000a"), "{}", name);
        #[cfg(target_os = "linux")]
        assert_eq!(name, "libps2000a.so");
    }

    #[test]
    fn test_supported_is_subset() {
        for driver in Driver::SUPPORTED {
            assert!(Driver::ALL.contains(&driver));
        }
    }

    #[test]
    fn test_channels_in_variant() {
        assert_eq!(channels_in_variant("2206B"), Some(2));
        assert_eq!(channels_in_variant("5444D"), Some(4));
        assert_eq!(channels_in_variant("2405A"), Some(4));
        assert_eq!(channels_in_variant("X"), None);
        assert_eq!(channels_in_variant("2906"), None); // no scope has 9 channels
    }
}
