//! Exported surface of the usbtc08 driver (USB TC-08 thermocouple logger).
//!
//! Predates the `PICO_STATUS` convention: calls return an int16 that is zero
//! on failure, and the cause is fetched with `usb_tc08_get_last_error`.

use libc::c_char;

use super::bindings;

/// Channel number of the cold junction sensor; thermocouples are 1..=8.
pub const USBTC08_CHANNEL_CJC: i16 = 0;
pub const USBTC08_MAX_CHANNELS: usize = 8;

pub const USBTC08_UNITS_CENTIGRADE: i16 = 0;
pub const USBTC08_UNITS_FAHRENHEIT: i16 = 1;
pub const USBTC08_UNITS_KELVIN: i16 = 2;
pub const USBTC08_UNITS_RANKINE: i16 = 3;

pub const USBTC08_ERROR_OK: i16 = 0;
pub const USBTC08_ERROR_OS_NOT_SUPPORTED: i16 = 1;
pub const USBTC08_ERROR_NO_CHANNELS_SET: i16 = 2;
pub const USBTC08_ERROR_INVALID_PARAMETER: i16 = 3;
pub const USBTC08_ERROR_VARIANT_NOT_SUPPORTED: i16 = 4;
pub const USBTC08_ERROR_INCORRECT_MODE: i16 = 5;
pub const USBTC08_ERROR_ENUMERATION_INCOMPLETE: i16 = 6;
pub const USBTC08_ERROR_NOT_RESPONDING: i16 = 7;
pub const USBTC08_ERROR_FW_FAIL: i16 = 8;
pub const USBTC08_ERROR_CONFIG_FAIL: i16 = 9;
pub const USBTC08_ERROR_NOT_FOUND: i16 = 10;
pub const USBTC08_ERROR_THREAD_FAIL: i16 = 11;
pub const USBTC08_ERROR_PIPE_INFO_FAIL: i16 = 12;
pub const USBTC08_ERROR_NOT_CALIBRATED: i16 = 13;
pub const USBTC08_ERROR_PICOPP_TOO_OLD: i16 = 14;
pub const USBTC08_ERROR_COMMUNICATION: i16 = 15;

bindings! {
    pub struct UsbTc08Bindings {
        /// Returns a handle > 0, 0 when no more units are attached, or -1 on
        /// failure.
        fn usb_tc08_open_unit() -> i16;
        fn usb_tc08_close_unit(handle: i16) -> i16;
        fn usb_tc08_set_mains(handle: i16, sixty_hz: i16) -> i16;
        fn usb_tc08_set_channel(handle: i16, channel: i16, tc_type: c_char) -> i16;
        fn usb_tc08_get_minimum_interval_ms(handle: i16) -> i32;
        fn usb_tc08_get_single(
            handle: i16,
            temp: *mut f32,
            overflow_flags: *mut i16,
            units: i16,
        ) -> i16;
        fn usb_tc08_run(handle: i16, interval_ms: i32) -> i32;
        fn usb_tc08_get_temp(
            handle: i16,
            temp_buffer: *mut f32,
            times_ms_buffer: *mut i32,
            buffer_length: i32,
            overflow: *mut i16,
            channel: i16,
            units: i16,
            fill_missing: i16,
        ) -> i32;
        fn usb_tc08_stop(handle: i16) -> i16;
        fn usb_tc08_get_last_error(handle: i16) -> i16;
        fn usb_tc08_get_unit_info2(
            handle: i16,
            string: *mut c_char,
            string_length: i16,
            line: i16,
        ) -> i16;
    }
}
