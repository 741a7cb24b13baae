//! `PICO_STATUS` codes shared by the scope driver generations.
//!
//! Every ps2000a/ps5000a call returns one of these 32-bit codes. The set below
//! covers the codes the example programs actually encounter; anything else is
//! still representable and prints as its raw value.

use std::fmt;

/// Status word returned by every call into a `PICO_STATUS`-convention driver.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Status(pub u32);

#[allow(dead_code)]
impl Status {
    pub const OK: Status = Status(0x0000);
    pub const MAX_UNITS_OPENED: Status = Status(0x0001);
    pub const MEMORY_FAIL: Status = Status(0x0002);
    pub const NOT_FOUND: Status = Status(0x0003);
    pub const FW_FAIL: Status = Status(0x0004);
    pub const OPEN_OPERATION_IN_PROGRESS: Status = Status(0x0005);
    pub const OPERATION_FAILED: Status = Status(0x0006);
    pub const NOT_RESPONDING: Status = Status(0x0007);
    pub const CONFIG_FAIL: Status = Status(0x0008);
    pub const KERNEL_DRIVER_TOO_OLD: Status = Status(0x0009);
    pub const EEPROM_CORRUPT: Status = Status(0x000A);
    pub const OS_NOT_SUPPORTED: Status = Status(0x000B);
    pub const INVALID_HANDLE: Status = Status(0x000C);
    pub const INVALID_PARAMETER: Status = Status(0x000D);
    pub const INVALID_TIMEBASE: Status = Status(0x000E);
    pub const INVALID_VOLTAGE_RANGE: Status = Status(0x000F);
    pub const INVALID_CHANNEL: Status = Status(0x0010);
    pub const INVALID_TRIGGER_CHANNEL: Status = Status(0x0011);
    pub const INVALID_CONDITION_CHANNEL: Status = Status(0x0012);
    pub const NO_SIGNAL_GENERATOR: Status = Status(0x0013);
    pub const STREAMING_FAILED: Status = Status(0x0014);
    pub const BLOCK_MODE_FAILED: Status = Status(0x0015);
    pub const NULL_PARAMETER: Status = Status(0x0016);
    pub const DATA_NOT_AVAILABLE: Status = Status(0x0018);
    pub const STRING_BUFFER_TO_SMALL: Status = Status(0x0019);
    pub const ETS_NOT_SUPPORTED: Status = Status(0x001A);
    pub const BUFFER_STALL: Status = Status(0x001C);
    pub const TOO_MANY_SAMPLES: Status = Status(0x001D);
    pub const TOO_MANY_SEGMENTS: Status = Status(0x001E);
    pub const USER_CALLBACK: Status = Status(0x0023);
    pub const DEVICE_SAMPLING: Status = Status(0x0024);
    pub const NO_SAMPLES_AVAILABLE: Status = Status(0x0025);
    pub const SEGMENT_OUT_OF_RANGE: Status = Status(0x0026);
    pub const BUSY: Status = Status(0x0027);
    pub const STARTINDEX_INVALID: Status = Status(0x0028);
    pub const INVALID_INFO: Status = Status(0x0029);
    pub const INFO_UNAVAILABLE: Status = Status(0x002A);
    pub const INVALID_SAMPLE_INTERVAL: Status = Status(0x002B);
    pub const TRIGGER_ERROR: Status = Status(0x002C);
    pub const MEMORY: Status = Status(0x002D);
    pub const CANCELLED: Status = Status(0x0043);
    pub const POWER_SUPPLY_CONNECTED: Status = Status(0x0119);
    pub const POWER_SUPPLY_NOT_CONNECTED: Status = Status(0x011A);
    pub const POWER_SUPPLY_REQUEST_INVALID: Status = Status(0x011B);
    pub const POWER_SUPPLY_UNDERVOLTAGE: Status = Status(0x011C);
    pub const CAPTURING_DATA: Status = Status(0x011D);
    pub const USB3_0_DEVICE_NON_USB3_0_PORT: Status = Status(0x011E);
    pub const NOT_SUPPORTED_BY_THIS_DEVICE: Status = Status(0x011F);
    pub const INVALID_DEVICE_RESOLUTION: Status = Status(0x0120);
    pub const INVALID_NUMBER_CHANNELS_FOR_RESOLUTION: Status = Status(0x0121);
    pub const CHANNEL_DISABLED_DUE_TO_USB_POWERED: Status = Status(0x0122);

    pub fn is_ok(self) -> bool {
        self == Status::OK
    }

    /// Turn a driver return code into a `Result`, preserving the code.
    pub fn check(self) -> crate::Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(crate::Error::Driver(self))
        }
    }

    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Status::OK => "PICO_OK",
            Status::MAX_UNITS_OPENED => "PICO_MAX_UNITS_OPENED",
            Status::MEMORY_FAIL => "PICO_MEMORY_FAIL",
            Status::NOT_FOUND => "PICO_NOT_FOUND",
            Status::FW_FAIL => "PICO_FW_FAIL",
            Status::OPEN_OPERATION_IN_PROGRESS => "PICO_OPEN_OPERATION_IN_PROGRESS",
            Status::OPERATION_FAILED => "PICO_OPERATION_FAILED",
            Status::NOT_RESPONDING => "PICO_NOT_RESPONDING",
            Status::CONFIG_FAIL => "PICO_CONFIG_FAIL",
            Status::KERNEL_DRIVER_TOO_OLD => "PICO_KERNEL_DRIVER_TOO_OLD",
            Status::EEPROM_CORRUPT => "PICO_EEPROM_CORRUPT",
            Status::OS_NOT_SUPPORTED => "PICO_OS_NOT_SUPPORTED",
            Status::INVALID_HANDLE => "PICO_INVALID_HANDLE",
            Status::INVALID_PARAMETER => "PICO_INVALID_PARAMETER",
            Status::INVALID_TIMEBASE => "PICO_INVALID_TIMEBASE",
            Status::INVALID_VOLTAGE_RANGE => "PICO_INVALID_VOLTAGE_RANGE",
            Status::INVALID_CHANNEL => "PICO_INVALID_CHANNEL",
            Status::INVALID_TRIGGER_CHANNEL => "PICO_INVALID_TRIGGER_CHANNEL",
            Status::INVALID_CONDITION_CHANNEL => "PICO_INVALID_CONDITION_CHANNEL",
            Status::NO_SIGNAL_GENERATOR => "PICO_NO_SIGNAL_GENERATOR",
            Status::STREAMING_FAILED => "PICO_STREAMING_FAILED",
            Status::BLOCK_MODE_FAILED => "PICO_BLOCK_MODE_FAILED",
            Status::NULL_PARAMETER => "PICO_NULL_PARAMETER",
            Status::DATA_NOT_AVAILABLE => "PICO_DATA_NOT_AVAILABLE",
            Status::STRING_BUFFER_TO_SMALL => "PICO_STRING_BUFFER_TO_SMALL",
            Status::ETS_NOT_SUPPORTED => "PICO_ETS_NOT_SUPPORTED",
            Status::BUFFER_STALL => "PICO_BUFFER_STALL",
            Status::TOO_MANY_SAMPLES => "PICO_TOO_MANY_SAMPLES",
            Status::TOO_MANY_SEGMENTS => "PICO_TOO_MANY_SEGMENTS",
            Status::USER_CALLBACK => "PICO_USER_CALLBACK",
            Status::DEVICE_SAMPLING => "PICO_DEVICE_SAMPLING",
            Status::NO_SAMPLES_AVAILABLE => "PICO_NO_SAMPLES_AVAILABLE",
            Status::SEGMENT_OUT_OF_RANGE => "PICO_SEGMENT_OUT_OF_RANGE",
            Status::BUSY => "PICO_BUSY",
            Status::STARTINDEX_INVALID => "PICO_STARTINDEX_INVALID",
            Status::INVALID_INFO => "PICO_INVALID_INFO",
            Status::INFO_UNAVAILABLE => "PICO_INFO_UNAVAILABLE",
            Status::INVALID_SAMPLE_INTERVAL => "PICO_INVALID_SAMPLE_INTERVAL",
            Status::TRIGGER_ERROR => "PICO_TRIGGER_ERROR",
            Status::MEMORY => "PICO_MEMORY",
            Status::CANCELLED => "PICO_CANCELLED",
            Status::POWER_SUPPLY_CONNECTED => "PICO_POWER_SUPPLY_CONNECTED",
            Status::POWER_SUPPLY_NOT_CONNECTED => "PICO_POWER_SUPPLY_NOT_CONNECTED",
            Status::POWER_SUPPLY_REQUEST_INVALID => "PICO_POWER_SUPPLY_REQUEST_INVALID",
            Status::POWER_SUPPLY_UNDERVOLTAGE => "PICO_POWER_SUPPLY_UNDERVOLTAGE",
            Status::CAPTURING_DATA => "PICO_CAPTURING_DATA",
            Status::USB3_0_DEVICE_NON_USB3_0_PORT => "PICO_USB3_0_DEVICE_NON_USB3_0_PORT",
            Status::NOT_SUPPORTED_BY_THIS_DEVICE => "PICO_NOT_SUPPORTED_BY_THIS_DEVICE",
            Status::INVALID_DEVICE_RESOLUTION => "PICO_INVALID_DEVICE_RESOLUTION",
            Status::INVALID_NUMBER_CHANNELS_FOR_RESOLUTION =>
                "PICO_INVALID_NUMBER_CHANNELS_FOR_RESOLUTION",
            Status::CHANNEL_DISABLED_DUE_TO_USB_POWERED =>
                "PICO_CHANNEL_DISABLED_DUE_TO_USB_POWERED",
            _ => return None,
        })
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "Status({:#04x})", self.0),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({:#04x})", name, self.0),
            None => write!(f, "undocumented status {:#04x}", self.0),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_check() {
        assert!(Status::OK.check().is_ok());
        match Status::INVALID_HANDLE.check() {
            Err(crate::Error::Driver(status)) => assert_eq!(status, Status::INVALID_HANDLE),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::INVALID_TIMEBASE.to_string(), "PICO_INVALID_TIMEBASE (0x0e)");
        assert_eq!(Status(0xDEAD).to_string(), "undocumented status 0xdead");
    }

    #[test]
    fn test_debug_falls_back_to_raw() {
        assert_eq!(format!("{:?}", Status::BUSY), "PICO_BUSY");
        assert_eq!(format!("{:?}", Status(0x7777)), "Status(0x7777)");
    }
}
