//! Exported surface of the picohrdl driver (PicoLog High Resolution Data
//! Logger, ADC-20/ADC-24).
//!
//! Like usbtc08 this predates `PICO_STATUS`: calls return an int16 that is
//! zero on failure, and the cause is read back through the unit-info line
//! reserved for error codes.

use libc::c_char;

use super::bindings;

pub const HRDL_MAX_ANALOG_CHANNELS: usize = 16;

// Unit info lines.
pub const HRDL_DRIVER_VERSION: i16 = 0;
pub const HRDL_USB_VERSION: i16 = 1;
pub const HRDL_HARDWARE_VERSION: i16 = 2;
pub const HRDL_VARIANT_INFO: i16 = 3;
pub const HRDL_BATCH_AND_SERIAL: i16 = 4;
pub const HRDL_CAL_DATE: i16 = 5;
pub const HRDL_KERNEL_DRIVER_VERSION: i16 = 6;
pub const HRDL_ERROR: i16 = 7;
pub const HRDL_SETTINGS_ERROR: i16 = 8;

// Error codes reported through the HRDL_ERROR info line.
pub const HRDL_OK: i16 = 0;
pub const HRDL_KERNEL_DRIVER: i16 = 1;
pub const HRDL_NOT_FOUND: i16 = 2;
pub const HRDL_CONFIG_FAIL: i16 = 3;
pub const HRDL_ERROR_OS_NOT_SUPPORTED: i16 = 4;
pub const HRDL_MAX_DEVICES: i16 = 5;

// Block collection methods for HRDLRun.
pub const HRDL_BM_BLOCK: i16 = 0;
pub const HRDL_BM_WINDOW: i16 = 1;
pub const HRDL_BM_STREAM: i16 = 2;

bindings! {
    pub struct PicoHrdlBindings {
        /// Returns a handle > 0, 0 when no more units are attached, or -1 on
        /// failure.
        fn HRDLOpenUnit() -> i16;
        fn HRDLCloseUnit(handle: i16) -> i16;
        fn HRDLGetUnitInfo(
            handle: i16,
            string: *mut c_char,
            string_length: i16,
            info: i16,
        ) -> i16;
        fn HRDLSetMains(handle: i16, sixty_hz: i16) -> i16;
        fn HRDLSetAnalogInChannel(
            handle: i16,
            channel: i16,
            enabled: i16,
            range: i16,
            single_ended: i16,
        ) -> i16;
        fn HRDLSetInterval(handle: i16, sample_interval_ms: i32, conversion_time: i16) -> i16;
        fn HRDLRun(handle: i16, n_values: i32, method: i16) -> i16;
        fn HRDLReady(handle: i16) -> i16;
        fn HRDLGetValues(handle: i16, values: *mut i32, overflow: *mut i16, no_of_values: i32)
            -> i32;
        fn HRDLGetSingleValue(
            handle: i16,
            channel: i16,
            range: i16,
            conversion_time: i16,
            single_ended: i16,
            overflow: *mut i16,
            value: *mut i32,
        ) -> i16;
        fn HRDLGetMinMaxAdcCounts(
            handle: i16,
            min_adc: *mut i32,
            max_adc: *mut i32,
            channel: i16,
        ) -> i16;
    }
}
