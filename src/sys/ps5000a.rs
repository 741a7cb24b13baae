//! Exported surface of the ps5000a driver (PicoScope 5000 Series A/B).
//!
//! Same call shapes as ps2000a with two differences: the open call takes a
//! resolution, and the oversample arguments are gone. USB-powered units answer
//! the open call with a power status that must be acknowledged through
//! `ps5000aChangePowerSource`.

#![allow(non_camel_case_types)]

use libc::{c_char, c_void};

use super::bindings;

pub type PICO_STATUS = u32;
pub type PICO_INFO = u32;

pub type ps5000aBlockReady =
    Option<unsafe extern "C" fn(handle: i16, status: PICO_STATUS, parameter: *mut c_void)>;

pub type ps5000aStreamingReady = Option<
    unsafe extern "C" fn(
        handle: i16,
        no_of_samples: i32,
        start_index: u32,
        overflow: i16,
        trigger_at: u32,
        triggered: i16,
        auto_stop: i16,
        parameter: *mut c_void,
    ),
>;

bindings! {
    pub struct Ps5000aBindings {
        fn ps5000aOpenUnit(handle: *mut i16, serial: *const c_char, resolution: i32) -> PICO_STATUS;
        fn ps5000aCloseUnit(handle: i16) -> PICO_STATUS;
        fn ps5000aGetUnitInfo(
            handle: i16,
            string: *mut c_char,
            string_length: i16,
            required_size: *mut i16,
            info: PICO_INFO,
        ) -> PICO_STATUS;
        fn ps5000aMaximumValue(handle: i16, value: *mut i16) -> PICO_STATUS;
        fn ps5000aChangePowerSource(handle: i16, power_state: PICO_STATUS) -> PICO_STATUS;
        fn ps5000aSetDeviceResolution(handle: i16, resolution: i32) -> PICO_STATUS;
        fn ps5000aGetDeviceResolution(handle: i16, resolution: *mut i32) -> PICO_STATUS;
        fn ps5000aSetChannel(
            handle: i16,
            channel: i32,
            enabled: i16,
            coupling: i32,
            range: i32,
            analogue_offset: f32,
        ) -> PICO_STATUS;
        fn ps5000aSetSimpleTrigger(
            handle: i16,
            enable: i16,
            source: i32,
            threshold: i16,
            direction: i32,
            delay: u32,
            auto_trigger_ms: i16,
        ) -> PICO_STATUS;
        fn ps5000aGetTimebase2(
            handle: i16,
            timebase: u32,
            no_samples: i32,
            time_interval_nanoseconds: *mut f32,
            max_samples: *mut i32,
            segment_index: u32,
        ) -> PICO_STATUS;
        fn ps5000aRunBlock(
            handle: i16,
            no_of_pre_trigger_samples: i32,
            no_of_post_trigger_samples: i32,
            timebase: u32,
            time_indisposed_ms: *mut i32,
            segment_index: u32,
            ready: ps5000aBlockReady,
            parameter: *mut c_void,
        ) -> PICO_STATUS;
        fn ps5000aIsReady(handle: i16, ready: *mut i16) -> PICO_STATUS;
        fn ps5000aSetDataBuffer(
            handle: i16,
            channel: i32,
            buffer: *mut i16,
            buffer_length: i32,
            segment_index: u32,
            mode: i32,
        ) -> PICO_STATUS;
        fn ps5000aGetValues(
            handle: i16,
            start_index: u32,
            no_of_samples: *mut u32,
            down_sample_ratio: u32,
            down_sample_ratio_mode: i32,
            segment_index: u32,
            overflow: *mut i16,
        ) -> PICO_STATUS;
        fn ps5000aRunStreaming(
            handle: i16,
            sample_interval: *mut u32,
            sample_interval_time_units: i32,
            max_pre_trigger_samples: u32,
            max_post_trigger_samples: u32,
            auto_stop: i16,
            down_sample_ratio: u32,
            down_sample_ratio_mode: i32,
            overview_buffer_size: u32,
        ) -> PICO_STATUS;
        fn ps5000aGetStreamingLatestValues(
            handle: i16,
            ready: ps5000aStreamingReady,
            parameter: *mut c_void,
        ) -> PICO_STATUS;
        fn ps5000aStop(handle: i16) -> PICO_STATUS;
    }
}
