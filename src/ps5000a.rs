//! Safe client for the ps5000a driver (PicoScope 5000 Series A/B
//! flexible-resolution oscilloscopes).
//!
//! Same marshaling as [`crate::ps2000a`] with the family's two additions: the
//! unit opens at a requested resolution, and USB-powered units answer the open
//! call with a power status that must be acknowledged before use.

use std::ffi::{CString, OsStr};
use std::ptr;

use libc::c_void;

use crate::config::{Channel, ChannelConfiguration, DownsampleMode, Resolution, SampleInterval};
use crate::driver::{channels_in_variant, Driver};
use crate::scope::{Overrange, ScopeDriver, StreamingChunk, TimebaseInfo, UnitInfo};
use crate::status::Status;
use crate::sys::ps5000a::Ps5000aBindings;
use crate::trigger::{TriggerConfiguration, TriggerDirection};
use crate::{Error, Result};

/// An open PicoScope 5000 Series A/B unit.
#[derive(Debug)]
pub struct Ps5000a {
    bindings: Ps5000aBindings,
    handle: i16,
    channel_count: usize,
}

impl Ps5000a {
    /// Open the first available unit, or the one with the given serial, at
    /// the requested resolution.
    pub fn open(serial: Option<&str>, resolution: Resolution) -> Result<Ps5000a> {
        Ps5000a::open_library(&Driver::Ps5000a.library_name(), serial, resolution)
    }

    /// Open through an explicitly named driver library.
    pub fn open_library(library: &OsStr, serial: Option<&str>, resolution: Resolution)
            -> Result<Ps5000a> {
        // SAFETY: the declared signatures match the vendor header for this
        // driver; nothing else about the library is assumed.
        let bindings = unsafe { Ps5000aBindings::load(library)? };

        let serial = serial.map(CString::new).transpose().map_err(|_| Error::InvalidSerial)?;
        let serial_ptr = serial.as_ref().map_or(ptr::null(), |serial| serial.as_ptr());
        let mut handle = 0i16;
        log::debug!("ps5000aOpenUnit(serial={:?}, resolution={:?})", serial, resolution);
        let status = Status(unsafe {
            (bindings.ps5000aOpenUnit)(&mut handle, serial_ptr, resolution.code())
        });
        match status {
            Status::OK => {}
            Status::NOT_FOUND => return Err(Error::NotFound),
            // A unit running from USB power reports it through the open
            // status; acknowledging keeps it open with USB power accepted.
            Status::POWER_SUPPLY_NOT_CONNECTED | Status::USB3_0_DEVICE_NON_USB3_0_PORT => {
                log::info!("unit is USB-powered ({}), accepting", status);
                Status(unsafe { (bindings.ps5000aChangePowerSource)(handle, status.0) })
                    .check()?;
            }
            status => return Err(Error::Driver(status)),
        }
        if handle <= 0 {
            return Err(Error::NotFound);
        }

        let mut unit = Ps5000a { bindings, handle, channel_count: 2 };
        let variant = unit.unit_info(UnitInfo::VariantInfo)?;
        unit.channel_count = channels_in_variant(&variant).unwrap_or(2);
        log::info!("opened PicoScope {} with {} channels at {} bits",
            variant, unit.channel_count, resolution.bits());
        Ok(unit)
    }

    /// Switch the hardware resolution.
    ///
    /// Changes the full-scale ADC count; callers holding a cached maximum
    /// must re-query it. Fails when too many channels are enabled for the
    /// requested resolution.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
        log::debug!("ps5000aSetDeviceResolution({:?})", resolution);
        self.check(unsafe {
            (self.bindings.ps5000aSetDeviceResolution)(self.handle, resolution.code())
        })
    }

    pub fn resolution(&mut self) -> Result<Resolution> {
        let mut code = 0i32;
        self.check(unsafe {
            (self.bindings.ps5000aGetDeviceResolution)(self.handle, &mut code)
        })?;
        match code {
            0 => Ok(Resolution::Bit8),
            1 => Ok(Resolution::Bit12),
            2 => Ok(Resolution::Bit14),
            3 => Ok(Resolution::Bit15),
            4 => Ok(Resolution::Bit16),
            _ => Err(Error::Driver(Status::INVALID_DEVICE_RESOLUTION)),
        }
    }

    fn check(&self, status: u32) -> Result<()> {
        Status(status).check()
    }
}

/// Copies the callback arguments out into the `Option` passed as context;
/// nothing outlives the poll call that registered it.
unsafe extern "C" fn streaming_ready(
    _handle: i16,
    no_of_samples: i32,
    start_index: u32,
    overflow: i16,
    _trigger_at: u32,
    _triggered: i16,
    auto_stop: i16,
    parameter: *mut c_void,
) {
    let chunk = &mut *(parameter as *mut Option<StreamingChunk>);
    *chunk = Some(StreamingChunk {
        start_index: start_index as usize,
        samples: no_of_samples as usize,
        overrange: Overrange(overflow as u16),
        auto_stop: auto_stop != 0,
    });
}

impl ScopeDriver for Ps5000a {
    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn max_adc_value(&mut self) -> Result<i16> {
        let mut value = 0i16;
        self.check(unsafe { (self.bindings.ps5000aMaximumValue)(self.handle, &mut value) })?;
        Ok(value)
    }

    fn unit_info(&mut self, info: UnitInfo) -> Result<String> {
        let mut buffer = [0u8; 256];
        let mut required = 0i16;
        self.check(unsafe {
            (self.bindings.ps5000aGetUnitInfo)(
                self.handle,
                buffer.as_mut_ptr().cast(),
                buffer.len() as i16,
                &mut required,
                info.code(),
            )
        })?;
        Ok(crate::sys::c_string(&buffer))
    }

    fn set_channel(&mut self, channel: Channel, config: Option<ChannelConfiguration>)
            -> Result<()> {
        let ChannelConfiguration { range, coupling } = config.unwrap_or_default();
        log::debug!("ps5000aSetChannel({}, enabled={}, {:?}, {:?})",
            channel, config.is_some(), coupling, range);
        self.check(unsafe {
            (self.bindings.ps5000aSetChannel)(
                self.handle,
                channel.code(),
                config.is_some() as i16,
                coupling.code(),
                range.code(),
                0.0,
            )
        })
    }

    fn set_simple_trigger(&mut self, trigger: Option<&TriggerConfiguration>, threshold_adc: i16)
            -> Result<()> {
        log::debug!("ps5000aSetSimpleTrigger({:?}, threshold={})", trigger, threshold_adc);
        let (enable, source, direction, delay, auto_trigger) = match trigger {
            Some(trigger) => (
                1,
                trigger.source,
                trigger.direction,
                trigger.delay_samples,
                trigger.auto_trigger_millis.min(i16::MAX as u16) as i16,
            ),
            None => (0, Channel::A, TriggerDirection::Rising, 0, 0),
        };
        self.check(unsafe {
            (self.bindings.ps5000aSetSimpleTrigger)(
                self.handle,
                enable,
                source.code(),
                threshold_adc,
                direction.code(),
                delay,
                auto_trigger,
            )
        })
    }

    fn timebase_info(&mut self, timebase: u32, samples: usize) -> Result<TimebaseInfo> {
        let mut interval_nanos = 0f32;
        let mut max_samples = 0i32;
        self.check(unsafe {
            (self.bindings.ps5000aGetTimebase2)(
                self.handle,
                timebase,
                samples as i32,
                &mut interval_nanos,
                &mut max_samples,
                0, // segment
            )
        })?;
        Ok(TimebaseInfo { interval_nanos, max_samples: max_samples as usize })
    }

    fn run_block(&mut self, pre_trigger: usize, post_trigger: usize, timebase: u32) -> Result<()> {
        log::debug!("ps5000aRunBlock(pre={}, post={}, timebase={})",
            pre_trigger, post_trigger, timebase);
        let mut time_indisposed_ms = 0i32;
        self.check(unsafe {
            (self.bindings.ps5000aRunBlock)(
                self.handle,
                pre_trigger as i32,
                post_trigger as i32,
                timebase,
                &mut time_indisposed_ms,
                0, // segment
                None, // no completion callback; the caller polls is_ready
                ptr::null_mut(),
            )
        })
    }

    fn is_ready(&mut self) -> Result<bool> {
        let mut ready = 0i16;
        self.check(unsafe { (self.bindings.ps5000aIsReady)(self.handle, &mut ready) })?;
        Ok(ready != 0)
    }

    unsafe fn set_data_buffer(&mut self, channel: Channel, buffer: *mut i16, len: usize)
            -> Result<()> {
        log::debug!("ps5000aSetDataBuffer({}, len={})", channel, len);
        self.check((self.bindings.ps5000aSetDataBuffer)(
            self.handle,
            channel.code(),
            buffer,
            len as i32,
            0, // segment
            DownsampleMode::empty().bits() as i32,
        ))
    }

    fn get_values(&mut self, samples: usize) -> Result<(usize, Overrange)> {
        let mut no_of_samples = samples as u32;
        let mut overflow = 0i16;
        self.check(unsafe {
            (self.bindings.ps5000aGetValues)(
                self.handle,
                0, // start index
                &mut no_of_samples,
                1, // downsample ratio, ignored without a ratio mode
                DownsampleMode::empty().bits() as i32,
                0, // segment
                &mut overflow,
            )
        })?;
        Ok((no_of_samples as usize, Overrange(overflow as u16)))
    }

    fn run_streaming(
        &mut self,
        interval: SampleInterval,
        buffer_len: usize,
        max_samples: Option<usize>,
    ) -> Result<SampleInterval> {
        let mut value = interval.value;
        log::debug!("ps5000aRunStreaming({}, buffer={}, max={:?})",
            interval, buffer_len, max_samples);
        self.check(unsafe {
            (self.bindings.ps5000aRunStreaming)(
                self.handle,
                &mut value,
                interval.units.code(),
                0, // pre-trigger samples
                max_samples.unwrap_or(0) as u32,
                max_samples.is_some() as i16, // auto stop
                1, // downsample ratio, ignored without a ratio mode
                DownsampleMode::empty().bits() as i32,
                buffer_len as u32,
            )
        })?;
        Ok(SampleInterval { value, units: interval.units })
    }

    fn poll_streaming(&mut self) -> Result<Option<StreamingChunk>> {
        let mut chunk: Option<StreamingChunk> = None;
        let status = Status(unsafe {
            (self.bindings.ps5000aGetStreamingLatestValues)(
                self.handle,
                Some(streaming_ready),
                &mut chunk as *mut _ as *mut c_void,
            )
        });
        match status {
            // BUSY means no new samples were ready on this poll
            Status::OK | Status::BUSY => Ok(chunk),
            status => Err(Error::Driver(status)),
        }
    }

    fn stop(&mut self) -> Result<()> {
        log::debug!("ps5000aStop()");
        self.check(unsafe { (self.bindings.ps5000aStop)(self.handle) })
    }
}

impl Drop for Ps5000a {
    fn drop(&mut self) {
        // Best effort; there is nowhere to report a failure from here.
        unsafe {
            let _ = (self.bindings.ps5000aStop)(self.handle);
            let status = Status((self.bindings.ps5000aCloseUnit)(self.handle));
            if !status.is_ok() {
                log::warn!("ps5000aCloseUnit failed: {}", status);
            }
        }
    }
}
