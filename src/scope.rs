//! Generic oscilloscope client: the open → configure → run/poll → fetch
//! sequences shared by every scope driver family, written once over a seam
//! trait that each family's adapter implements.

use std::ops::ControlFlow;
use std::thread::sleep;
use std::time::Duration;

use crate::config::{Channel, ChannelConfiguration, DeviceConfiguration, Range, SampleInterval};
use crate::status::Status;
use crate::trigger::TriggerConfiguration;
use crate::{Error, Result};

/// Delay between readiness polls. Both capture modes busy-wait with this
/// period, the pattern the drivers document for callers without an event loop.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How far past the requested timebase [`Scope::find_timebase`] walks before
/// giving up.
const TIMEBASE_WALK_LIMIT: u32 = 4096;

/// Unit information lines understood by the `PICO_STATUS` drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitInfo {
    DriverVersion,
    UsbVersion,
    HardwareVersion,
    VariantInfo,
    BatchAndSerial,
    CalDate,
    KernelVersion,
    DigitalHardwareVersion,
    AnalogueHardwareVersion,
    FirmwareVersion1,
    FirmwareVersion2,
}

impl UnitInfo {
    pub const ALL: [UnitInfo; 11] = [
        UnitInfo::DriverVersion,
        UnitInfo::UsbVersion,
        UnitInfo::HardwareVersion,
        UnitInfo::VariantInfo,
        UnitInfo::BatchAndSerial,
        UnitInfo::CalDate,
        UnitInfo::KernelVersion,
        UnitInfo::DigitalHardwareVersion,
        UnitInfo::AnalogueHardwareVersion,
        UnitInfo::FirmwareVersion1,
        UnitInfo::FirmwareVersion2,
    ];

    pub(crate) fn code(self) -> u32 {
        self as u32
    }
}

/// Driver-computed properties of one timebase at a given capture length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimebaseInfo {
    pub interval_nanos: f32,
    pub max_samples: usize,
}

/// Per-channel overrange bitmask returned with every fetch; a set bit means
/// the input exceeded the configured range during the capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overrange(pub u16);

impl Overrange {
    pub fn contains(self, channel: Channel) -> bool {
        self.0 & (1 << channel.index()) != 0
    }

    pub fn any(self) -> bool {
        self.0 != 0
    }
}

/// One streaming poll's worth of new data, located within the registered
/// buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamingChunk {
    pub start_index: usize,
    pub samples: usize,
    pub overrange: Overrange,
    pub auto_stop: bool,
}

/// The call surface shared by the scope driver families. One implementation
/// per family marshals these onto the raw bindings; the capture logic above
/// never touches the FFI layer directly.
pub trait ScopeDriver {
    /// Analog channels present on the open unit.
    fn channel_count(&self) -> usize;

    /// Full-scale ADC count at the current resolution.
    fn max_adc_value(&mut self) -> Result<i16>;

    fn unit_info(&mut self, info: UnitInfo) -> Result<String>;

    fn set_channel(&mut self, channel: Channel, config: Option<ChannelConfiguration>)
        -> Result<()>;

    /// Arm or disarm the simple edge trigger. `threshold_adc` is the
    /// threshold already scaled to ADC counts for the source channel.
    fn set_simple_trigger(&mut self, trigger: Option<&TriggerConfiguration>, threshold_adc: i16)
        -> Result<()>;

    /// Query one timebase; the driver rejects values the current channel
    /// configuration cannot sustain.
    fn timebase_info(&mut self, timebase: u32, samples: usize) -> Result<TimebaseInfo>;

    fn run_block(&mut self, pre_trigger: usize, post_trigger: usize, timebase: u32) -> Result<()>;

    fn is_ready(&mut self) -> Result<bool>;

    /// Hand the driver a buffer to copy `channel`'s samples into.
    ///
    /// # Safety
    ///
    /// The buffer must stay alive and unmoved until [`ScopeDriver::stop`]
    /// returns or the driver is dropped; the driver writes through the raw
    /// pointer during fetches and streaming polls.
    unsafe fn set_data_buffer(&mut self, channel: Channel, buffer: *mut i16, len: usize)
        -> Result<()>;

    /// Copy up to `samples` captured values into the registered buffers.
    /// Returns the count actually copied and the overrange flags.
    fn get_values(&mut self, samples: usize) -> Result<(usize, Overrange)>;

    /// Start streaming. The driver may adjust the interval to the nearest
    /// rate it can sustain; the adjusted interval is returned.
    fn run_streaming(
        &mut self,
        interval: SampleInterval,
        buffer_len: usize,
        max_samples: Option<usize>,
    ) -> Result<SampleInterval>;

    /// Ask the driver for samples accumulated since the last poll. `None`
    /// means nothing new yet.
    fn poll_streaming(&mut self) -> Result<Option<StreamingChunk>>;

    fn stop(&mut self) -> Result<()>;
}

/// A block capture request. Trigger position splits the capture into pre- and
/// post-trigger halves; untriggered captures use [`BlockRequest::samples`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRequest {
    pub pre_trigger_samples: usize,
    pub post_trigger_samples: usize,
    /// Starting point for the timebase walk; 0 asks for the fastest rate.
    pub timebase_hint: u32,
}

impl BlockRequest {
    pub fn samples(count: usize) -> BlockRequest {
        BlockRequest {
            pre_trigger_samples: 0,
            post_trigger_samples: count,
            timebase_hint: 0,
        }
    }
}

/// Captured data for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelData {
    pub channel: Channel,
    pub range: Range,
    pub overranged: bool,
    pub samples: Vec<i16>,
}

impl ChannelData {
    /// Iterate the samples scaled to millivolts.
    pub fn millivolts<'a>(&'a self, max_adc: i16) -> impl Iterator<Item = f32> + 'a {
        let range = self.range;
        self.samples
            .iter()
            .map(move |&raw| crate::config::adc_to_millivolts(raw, max_adc, range))
    }
}

/// Result of a block capture.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockCapture {
    pub timebase: u32,
    pub interval_nanos: f32,
    pub max_adc: i16,
    pub channels: Vec<ChannelData>,
}

/// A streaming capture request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamingRequest {
    pub interval: SampleInterval,
    /// Length, in samples per channel, of the buffers the driver streams
    /// into; polls return positions within this window.
    pub buffer_samples: usize,
    /// Ask the driver to stop by itself after this many samples.
    pub max_samples: Option<usize>,
}

impl StreamingRequest {
    pub fn at_interval(interval: SampleInterval) -> StreamingRequest {
        StreamingRequest {
            interval,
            buffer_samples: 1 << 16,
            max_samples: None,
        }
    }
}

/// One delivery to the streaming sink: the freshly written region of each
/// enabled channel's buffer.
#[derive(Debug)]
pub struct StreamingSlice<'a> {
    /// Offset of this chunk within the driver buffer.
    pub start_index: usize,
    /// Cumulative samples delivered, including this chunk.
    pub total_samples: usize,
    pub overrange: Overrange,
    pub channels: Vec<(Channel, &'a [i16])>,
}

/// Summary of a finished streaming run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamingSummary {
    /// The interval the driver actually sampled at.
    pub interval: SampleInterval,
    pub samples: usize,
    pub polls: usize,
    pub overranged: bool,
}

/// High-level client for one open scope. Owns the sample buffers the driver
/// writes into, for as long as the driver may write into them.
#[derive(Debug)]
pub struct Scope<D: ScopeDriver> {
    // Field order matters: the driver must drop (and close the handle) before
    // the buffers it may still hold pointers into are freed.
    driver: D,
    config: DeviceConfiguration,
    max_adc: i16,
    buffers: Vec<(Channel, Vec<i16>)>,
}

impl<D: ScopeDriver> Scope<D> {
    pub fn new(mut driver: D) -> Result<Scope<D>> {
        let max_adc = driver.max_adc_value()?;
        log::debug!("full scale is {} counts over {} channels", max_adc, driver.channel_count());
        Ok(Scope {
            driver,
            config: DeviceConfiguration { channels: [None; 4] },
            max_adc,
            buffers: Vec::new(),
        })
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn max_adc(&self) -> i16 {
        self.max_adc
    }

    pub fn channel_count(&self) -> usize {
        self.driver.channel_count()
    }

    pub fn unit_info(&mut self, info: UnitInfo) -> Result<String> {
        self.driver.unit_info(info)
    }

    /// Apply a device configuration, enabling and disabling channels.
    pub fn configure(&mut self, config: &DeviceConfiguration) -> Result<()> {
        let count = self.driver.channel_count();
        for (index, channel_config) in config.channels.iter().enumerate() {
            let channel = match Channel::from_index(index) {
                Some(channel) => channel,
                None => break,
            };
            if index >= count {
                if channel_config.is_some() {
                    return Err(Error::ChannelUnavailable(channel));
                }
                continue;
            }
            self.driver.set_channel(channel, *channel_config)?;
        }
        self.config = *config;
        Ok(())
    }

    /// Arm the simple edge trigger, or disarm with `None`. The source channel
    /// must be enabled so its range is known for threshold scaling.
    pub fn set_trigger(&mut self, trigger: Option<&TriggerConfiguration>) -> Result<()> {
        match trigger {
            None => self.driver.set_simple_trigger(None, 0),
            Some(trigger) => {
                let range = self.config.channels[trigger.source.index()]
                    .ok_or(Error::ChannelUnavailable(trigger.source))?
                    .range;
                let threshold = trigger.threshold_adc(self.max_adc, range);
                self.driver.set_simple_trigger(Some(trigger), threshold)
            }
        }
    }

    /// Find the fastest timebase at or above `requested` that the driver
    /// accepts for a capture of `samples`.
    ///
    /// The drivers reject timebases the current channel configuration cannot
    /// sustain; every example walks upward until one is accepted.
    pub fn find_timebase(&mut self, requested: u32, samples: usize)
            -> Result<(u32, TimebaseInfo)> {
        for timebase in requested..requested.saturating_add(TIMEBASE_WALK_LIMIT) {
            match self.driver.timebase_info(timebase, samples) {
                Ok(info) => {
                    log::debug!(
                        "timebase {} gives {} ns per sample, {} max",
                        timebase, info.interval_nanos, info.max_samples);
                    return Ok((timebase, info));
                }
                Err(Error::Driver(status))
                    if status == Status::INVALID_TIMEBASE
                        || status == Status::TOO_MANY_SAMPLES => continue,
                Err(error) => return Err(error),
            }
        }
        Err(Error::NoTimebase { requested })
    }

    /// Run one block capture: find a timebase, start the capture, poll until
    /// the driver is done, and fetch every enabled channel.
    pub fn block_capture(&mut self, request: &BlockRequest) -> Result<BlockCapture> {
        let total = request.pre_trigger_samples + request.post_trigger_samples;
        let (timebase, info) = self.find_timebase(request.timebase_hint, total)?;
        self.register_buffers(total)?;
        self.driver.run_block(
            request.pre_trigger_samples, request.post_trigger_samples, timebase)?;
        while !self.driver.is_ready()? {
            sleep(POLL_INTERVAL);
        }
        let (returned, overrange) = self.driver.get_values(total)?;
        self.driver.stop()?;
        log::debug!("block capture returned {} of {} samples", returned, total);

        let mut channels = Vec::new();
        for (channel, mut buffer) in self.buffers.drain(..) {
            let Some(channel_config) = self.config.channels[channel.index()] else { continue };
            buffer.truncate(returned);
            channels.push(ChannelData {
                channel,
                range: channel_config.range,
                overranged: overrange.contains(channel),
                samples: buffer,
            });
        }
        Ok(BlockCapture {
            timebase,
            interval_nanos: info.interval_nanos,
            max_adc: self.max_adc,
            channels,
        })
    }

    /// Run a streaming capture, delivering each poll's new samples to `sink`
    /// until the driver auto-stops, the sample budget is reached, or the sink
    /// breaks.
    pub fn stream<F>(&mut self, request: &StreamingRequest, mut sink: F)
            -> Result<StreamingSummary>
        where F: FnMut(&StreamingSlice) -> ControlFlow<()>,
    {
        self.register_buffers(request.buffer_samples)?;
        let interval = self.driver.run_streaming(
            request.interval, request.buffer_samples, request.max_samples)?;
        if interval != request.interval {
            log::info!("driver adjusted sample interval from {} to {}",
                request.interval, interval);
        }

        let mut summary = StreamingSummary { interval, samples: 0, polls: 0, overranged: false };
        loop {
            summary.polls += 1;
            let chunk = match self.driver.poll_streaming()? {
                Some(chunk) => chunk,
                None => {
                    sleep(POLL_INTERVAL);
                    continue;
                }
            };
            summary.samples += chunk.samples;
            summary.overranged |= chunk.overrange.any();

            let channels = self.buffers.iter()
                .map(|(channel, buffer)| {
                    let end = (chunk.start_index + chunk.samples).min(buffer.len());
                    (*channel, &buffer[chunk.start_index..end])
                })
                .collect::<Vec<_>>();
            let flow = sink(&StreamingSlice {
                start_index: chunk.start_index,
                total_samples: summary.samples,
                overrange: chunk.overrange,
                channels,
            });

            if chunk.auto_stop {
                log::debug!("streaming auto-stopped after {} samples", summary.samples);
                break;
            }
            if let ControlFlow::Break(()) = flow {
                break;
            }
            if let Some(max_samples) = request.max_samples {
                if summary.samples >= max_samples {
                    break;
                }
            }
        }
        self.driver.stop()?;
        Ok(summary)
    }

    /// Allocate one buffer per enabled channel and register them with the
    /// driver.
    fn register_buffers(&mut self, len: usize) -> Result<()> {
        self.buffers = self.config.enabled()
            .map(|(channel, _)| (channel, vec![0i16; len]))
            .collect();
        if self.buffers.is_empty() {
            return Err(Error::NoEnabledChannels);
        }
        for (channel, buffer) in self.buffers.iter_mut() {
            // SAFETY: the buffer lives in self.buffers until the next capture
            // replaces it or self drops, and the driver field drops (closing
            // the handle) before the buffers do.
            unsafe {
                self.driver.set_data_buffer(*channel, buffer.as_mut_ptr(), buffer.len())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{millivolts_to_adc, Coupling, Range};

    const MOCK_MAX_ADC: i16 = 32512;

    fn sample_value(channel: usize, index: usize) -> i16 {
        (channel * 1000 + index) as i16
    }

    struct MockDriver {
        channel_count: usize,
        min_timebase: u32,
        ready_polls: u32,
        empty_polls: u32,
        overrange: u16,
        channels: [Option<ChannelConfiguration>; 4],
        trigger_threshold: Option<i16>,
        buffers: [Option<(*mut i16, usize)>; 4],
        block_samples: usize,
        stream_chunk: usize,
        stream_budget: usize,
        stream_delivered: usize,
        stream_cursor: usize,
        running: bool,
        stopped: bool,
    }

    impl MockDriver {
        fn new() -> MockDriver {
            MockDriver {
                channel_count: 4,
                min_timebase: 0,
                ready_polls: 0,
                empty_polls: 0,
                overrange: 0,
                channels: [None; 4],
                trigger_threshold: None,
                buffers: [None; 4],
                block_samples: 0,
                stream_chunk: 0,
                stream_budget: 0,
                stream_delivered: 0,
                stream_cursor: 0,
                running: false,
                stopped: false,
            }
        }

        fn fill(&mut self, offset: usize, count: usize, first_index: usize) {
            for (slot, buffer) in self.buffers.iter().enumerate() {
                if let Some((ptr, len)) = *buffer {
                    // SAFETY: Scope keeps the registered buffers alive while
                    // the mock is in use, same as a real driver would assume.
                    let buffer = unsafe { std::slice::from_raw_parts_mut(ptr, len) };
                    for index in 0..count {
                        buffer[offset + index] = sample_value(slot, first_index + index);
                    }
                }
            }
        }
    }

    impl ScopeDriver for MockDriver {
        fn channel_count(&self) -> usize {
            self.channel_count
        }

        fn max_adc_value(&mut self) -> Result<i16> {
            Ok(MOCK_MAX_ADC)
        }

        fn unit_info(&mut self, info: UnitInfo) -> Result<String> {
            Ok(match info {
                UnitInfo::VariantInfo => "2404B".to_owned(),
                UnitInfo::BatchAndSerial => "MK/0001".to_owned(),
                _ => "1.0".to_owned(),
            })
        }

        fn set_channel(&mut self, channel: Channel, config: Option<ChannelConfiguration>)
                -> Result<()> {
            self.channels[channel.index()] = config;
            Ok(())
        }

        fn set_simple_trigger(&mut self, trigger: Option<&TriggerConfiguration>,
                threshold_adc: i16) -> Result<()> {
            self.trigger_threshold = trigger.map(|_| threshold_adc);
            Ok(())
        }

        fn timebase_info(&mut self, timebase: u32, _samples: usize) -> Result<TimebaseInfo> {
            if timebase < self.min_timebase {
                return Err(Error::Driver(Status::INVALID_TIMEBASE));
            }
            Ok(TimebaseInfo {
                interval_nanos: (1u64 << timebase.min(32)) as f32,
                max_samples: 1 << 20,
            })
        }

        fn run_block(&mut self, pre_trigger: usize, post_trigger: usize, _timebase: u32)
                -> Result<()> {
            self.running = true;
            self.block_samples = pre_trigger + post_trigger;
            Ok(())
        }

        fn is_ready(&mut self) -> Result<bool> {
            if self.ready_polls > 0 {
                self.ready_polls -= 1;
                return Ok(false);
            }
            Ok(true)
        }

        unsafe fn set_data_buffer(&mut self, channel: Channel, buffer: *mut i16, len: usize)
                -> Result<()> {
            self.buffers[channel.index()] = Some((buffer, len));
            Ok(())
        }

        fn get_values(&mut self, samples: usize) -> Result<(usize, Overrange)> {
            let count = samples.min(self.block_samples);
            self.fill(0, count, 0);
            Ok((count, Overrange(self.overrange)))
        }

        fn run_streaming(&mut self, interval: SampleInterval, buffer_len: usize,
                max_samples: Option<usize>) -> Result<SampleInterval> {
            self.running = true;
            self.stream_chunk = (buffer_len / 4).max(1);
            self.stream_budget = max_samples.unwrap_or(usize::MAX);
            self.stream_delivered = 0;
            self.stream_cursor = 0;
            // the mock "sustains" only half the requested rate
            Ok(SampleInterval { value: interval.value * 2, units: interval.units })
        }

        fn poll_streaming(&mut self) -> Result<Option<StreamingChunk>> {
            if self.empty_polls > 0 {
                self.empty_polls -= 1;
                return Ok(None);
            }
            if !self.running || self.stream_delivered >= self.stream_budget {
                return Ok(None);
            }
            let buffer_len = self.buffers.iter().flatten().next()
                .map(|&(_, len)| len).unwrap_or(0);
            let remaining = self.stream_budget - self.stream_delivered;
            let samples = self.stream_chunk
                .min(remaining)
                .min(buffer_len - self.stream_cursor);
            let start_index = self.stream_cursor;
            self.fill(start_index, samples, self.stream_delivered);
            self.stream_delivered += samples;
            self.stream_cursor = (self.stream_cursor + samples) % buffer_len;
            Ok(Some(StreamingChunk {
                start_index,
                samples,
                overrange: Overrange(self.overrange),
                auto_stop: self.stream_delivered >= self.stream_budget
                    && self.stream_budget != usize::MAX,
            }))
        }

        fn stop(&mut self) -> Result<()> {
            self.running = false;
            self.stopped = true;
            Ok(())
        }
    }

    fn scope_with(driver: MockDriver) -> Scope<MockDriver> {
        Scope::new(driver).unwrap()
    }

    fn two_channel_config() -> DeviceConfiguration {
        let mut config = DeviceConfiguration::single_channel();
        config.channels[1] = Some(ChannelConfiguration {
            range: Range::V1,
            coupling: Coupling::AC,
        });
        config
    }

    #[test]
    fn test_block_capture_single_channel() {
        let mut driver = MockDriver::new();
        driver.min_timebase = 3;
        driver.ready_polls = 2;
        let mut scope = scope_with(driver);
        scope.configure(&DeviceConfiguration::single_channel()).unwrap();

        let capture = scope.block_capture(&BlockRequest::samples(64)).unwrap();
        assert_eq!(capture.timebase, 3);
        assert_eq!(capture.interval_nanos, 8.0);
        assert_eq!(capture.max_adc, MOCK_MAX_ADC);
        assert_eq!(capture.channels.len(), 1);
        let data = &capture.channels[0];
        assert_eq!(data.channel, Channel::A);
        assert_eq!(data.samples.len(), 64);
        assert_eq!(data.samples[5], sample_value(0, 5));
        assert!(!data.overranged);
        assert!(scope.driver_mut().stopped);
    }

    #[test]
    fn test_block_capture_two_channels_overrange() {
        let mut driver = MockDriver::new();
        driver.overrange = 1 << 1; // channel B clipped
        let mut scope = scope_with(driver);
        scope.configure(&two_channel_config()).unwrap();

        let capture = scope.block_capture(&BlockRequest::samples(16)).unwrap();
        assert_eq!(capture.channels.len(), 2);
        assert!(!capture.channels[0].overranged);
        assert!(capture.channels[1].overranged);
        assert_eq!(capture.channels[0].samples[3], sample_value(0, 3));
        assert_eq!(capture.channels[1].samples[3], sample_value(1, 3));
        assert_eq!(capture.channels[1].range, Range::V1);
    }

    #[test]
    fn test_block_capture_scales_to_millivolts() {
        let mut scope = scope_with(MockDriver::new());
        scope.configure(&DeviceConfiguration::single_channel()).unwrap();
        let capture = scope.block_capture(&BlockRequest::samples(4)).unwrap();
        let millivolts = capture.channels[0].millivolts(capture.max_adc).collect::<Vec<_>>();
        assert_eq!(millivolts.len(), 4);
        assert_eq!(millivolts[0], 0.0);
        let expected = sample_value(0, 3) as f32 * 5000.0 / MOCK_MAX_ADC as f32;
        assert_eq!(millivolts[3], expected);
    }

    #[test]
    fn test_find_timebase_walks_past_rejections() {
        let mut driver = MockDriver::new();
        driver.min_timebase = 7;
        let mut scope = scope_with(driver);
        let (timebase, info) = scope.find_timebase(0, 1000).unwrap();
        assert_eq!(timebase, 7);
        assert_eq!(info.interval_nanos, 128.0);
    }

    #[test]
    fn test_find_timebase_gives_up() {
        let mut driver = MockDriver::new();
        driver.min_timebase = TIMEBASE_WALK_LIMIT + 10;
        let mut scope = scope_with(driver);
        match scope.find_timebase(0, 1000) {
            Err(Error::NoTimebase { requested: 0 }) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_configure_applies_channels() {
        let mut scope = scope_with(MockDriver::new());
        scope.configure(&two_channel_config()).unwrap();
        let driver = scope.driver_mut();
        assert_eq!(driver.channels[0], Some(ChannelConfiguration::default()));
        assert_eq!(driver.channels[1].map(|config| config.range), Some(Range::V1));
        assert_eq!(driver.channels[2], None);
        assert_eq!(driver.channels[3], None);
    }

    #[test]
    fn test_configure_rejects_absent_channel() {
        let mut driver = MockDriver::new();
        driver.channel_count = 2;
        let mut scope = scope_with(driver);
        let mut config = DeviceConfiguration::single_channel();
        config.channels[3] = Some(ChannelConfiguration::default());
        match scope.configure(&config) {
            Err(Error::ChannelUnavailable(Channel::D)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_trigger_threshold_scaling() {
        let mut scope = scope_with(MockDriver::new());
        scope.configure(&two_channel_config()).unwrap();
        let trigger = TriggerConfiguration::rising(Channel::B, 500.0);
        scope.set_trigger(Some(&trigger)).unwrap();
        let expected = millivolts_to_adc(500.0, MOCK_MAX_ADC, Range::V1);
        assert_eq!(scope.driver_mut().trigger_threshold, Some(expected));

        scope.set_trigger(None).unwrap();
        assert_eq!(scope.driver_mut().trigger_threshold, None);
    }

    #[test]
    fn test_trigger_on_disabled_channel() {
        let mut scope = scope_with(MockDriver::new());
        scope.configure(&DeviceConfiguration::single_channel()).unwrap();
        let trigger = TriggerConfiguration::rising(Channel::C, 0.0);
        match scope.set_trigger(Some(&trigger)) {
            Err(Error::ChannelUnavailable(Channel::C)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_streaming_runs_until_auto_stop() {
        let mut driver = MockDriver::new();
        driver.empty_polls = 1;
        let mut scope = scope_with(driver);
        scope.configure(&DeviceConfiguration::single_channel()).unwrap();

        let request = StreamingRequest {
            interval: SampleInterval::micros(4),
            buffer_samples: 32,
            max_samples: Some(100),
        };
        let mut collected = Vec::new();
        let summary = scope.stream(&request, |slice| {
            assert_eq!(slice.channels.len(), 1);
            assert_eq!(slice.channels[0].0, Channel::A);
            collected.extend_from_slice(slice.channels[0].1);
            ControlFlow::Continue(())
        }).unwrap();

        assert_eq!(summary.samples, 100);
        // one empty poll, then 8 samples per chunk until the budget runs out
        assert!(summary.polls > collected.len() / 8);
        assert_eq!(summary.interval.value, 8); // the mock halves the rate
        assert_eq!(collected.len(), 100);
        for (index, &value) in collected.iter().enumerate() {
            assert_eq!(value, sample_value(0, index));
        }
        assert!(scope.driver_mut().stopped);
    }

    #[test]
    fn test_streaming_sink_can_break() {
        let mut scope = scope_with(MockDriver::new());
        scope.configure(&DeviceConfiguration::single_channel()).unwrap();
        let request = StreamingRequest {
            interval: SampleInterval::micros(1),
            buffer_samples: 64,
            max_samples: None,
        };
        let summary = scope.stream(&request, |_slice| ControlFlow::Break(())).unwrap();
        assert_eq!(summary.polls, 1);
        assert_eq!(summary.samples, 16); // one chunk of buffer_samples / 4
        assert!(scope.driver_mut().stopped);
    }

    #[test]
    fn test_capture_without_channels() {
        let mut scope = scope_with(MockDriver::new());
        match scope.block_capture(&BlockRequest::samples(16)) {
            Err(Error::NoEnabledChannels) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_overrange_flags() {
        let overrange = Overrange(0b0101);
        assert!(overrange.contains(Channel::A));
        assert!(!overrange.contains(Channel::B));
        assert!(overrange.contains(Channel::C));
        assert!(overrange.any());
        assert!(!Overrange::default().any());
    }
}
