//! High-level configuration of a scope channel in terms the drivers accept,
//! and the ADC count scaling every example performs on retrieved data.

use std::fmt;

use bitflags::bitflags;

/// Analog input channel. The drivers number channels A..D as 0..3; units with
/// fewer channels reject the higher codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    A,
    B,
    C,
    D,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::A, Channel::B, Channel::C, Channel::D];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Channel> {
        Channel::ALL.get(index).copied()
    }

    pub(crate) fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coupling {
    AC,
    #[default]
    DC,
}

impl Coupling {
    pub(crate) fn code(self) -> i32 {
        match self {
            Coupling::AC => 0,
            Coupling::DC => 1,
        }
    }
}

/// Input voltage range. The variants mirror the driver enumeration, which is
/// shared (with per-model gaps) by every scope family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Range {
    Mv10,
    Mv20,
    Mv50,
    Mv100,
    Mv200,
    Mv500,
    V1,
    V2,
    V5,
    V10,
    V20,
    V50,
}

impl Range {
    pub const ALL: [Range; 12] = [
        Range::Mv10, Range::Mv20, Range::Mv50, Range::Mv100, Range::Mv200, Range::Mv500,
        Range::V1, Range::V2, Range::V5, Range::V10, Range::V20, Range::V50,
    ];

    /// Full scale of the range in millivolts.
    pub fn millivolts(self) -> u32 {
        match self {
            Range::Mv10 => 10,
            Range::Mv20 => 20,
            Range::Mv50 => 50,
            Range::Mv100 => 100,
            Range::Mv200 => 200,
            Range::Mv500 => 500,
            Range::V1 => 1_000,
            Range::V2 => 2_000,
            Range::V5 => 5_000,
            Range::V10 => 10_000,
            Range::V20 => 20_000,
            Range::V50 => 50_000,
        }
    }

    pub fn from_millivolts(millivolts: u32) -> Option<Range> {
        Range::ALL.into_iter().find(|range| range.millivolts() == millivolts)
    }

    pub(crate) fn code(self) -> i32 {
        self as i32
    }
}

/// Sampling resolution of flexible-resolution units (ps5000a).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    #[default]
    Bit8,
    Bit12,
    Bit14,
    Bit15,
    Bit16,
}

impl Resolution {
    pub(crate) fn code(self) -> i32 {
        self as i32
    }

    pub fn bits(self) -> u32 {
        match self {
            Resolution::Bit8 => 8,
            Resolution::Bit12 => 12,
            Resolution::Bit14 => 14,
            Resolution::Bit15 => 15,
            Resolution::Bit16 => 16,
        }
    }
}

bitflags! {
    /// Driver ratio-mode word selecting on-device downsampling of retrieved
    /// values. Empty means raw samples.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DownsampleMode: u32 {
        const AGGREGATE = 1 << 0;
        const DECIMATE  = 1 << 1;
        const AVERAGE   = 1 << 2;
    }
}

/// Time unit qualifier for streaming sample intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnits {
    Femtoseconds,
    Picoseconds,
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
}

impl TimeUnits {
    pub(crate) fn code(self) -> i32 {
        self as i32
    }

    fn nanos_per_unit(self) -> f64 {
        match self {
            TimeUnits::Femtoseconds => 1e-6,
            TimeUnits::Picoseconds => 1e-3,
            TimeUnits::Nanoseconds => 1e0,
            TimeUnits::Microseconds => 1e3,
            TimeUnits::Milliseconds => 1e6,
            TimeUnits::Seconds => 1e9,
        }
    }
}

/// A streaming sample interval: a count of `units`. The driver adjusts the
/// count to the nearest rate it can sustain and reports the adjusted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleInterval {
    pub value: u32,
    pub units: TimeUnits,
}

impl SampleInterval {
    pub fn micros(value: u32) -> SampleInterval {
        SampleInterval { value, units: TimeUnits::Microseconds }
    }

    pub fn as_nanos(self) -> f64 {
        self.value as f64 * self.units.nanos_per_unit()
    }
}

impl fmt::Display for SampleInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let suffix = match self.units {
            TimeUnits::Femtoseconds => "fs",
            TimeUnits::Picoseconds => "ps",
            TimeUnits::Nanoseconds => "ns",
            TimeUnits::Microseconds => "us",
            TimeUnits::Milliseconds => "ms",
            TimeUnits::Seconds => "s",
        };
        write!(f, "{} {}", self.value, suffix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConfiguration {
    pub range: Range,
    pub coupling: Coupling,
}

impl Default for ChannelConfiguration {
    fn default() -> Self {
        Self {
            range: Range::V5,
            coupling: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceConfiguration {
    /// One slot per channel the driver ABI can address; `None` disables.
    pub channels: [Option<ChannelConfiguration>; 4],
}

impl DeviceConfiguration {
    /// Channel A enabled with defaults, everything else off. The starting
    /// point of every example.
    pub fn single_channel() -> DeviceConfiguration {
        DeviceConfiguration {
            channels: [Some(ChannelConfiguration::default()), None, None, None],
        }
    }

    pub fn enabled(&self) -> impl Iterator<Item = (Channel, ChannelConfiguration)> + '_ {
        self.channels
            .iter()
            .enumerate()
            .filter_map(|(index, config)| {
                config.map(|config| (Channel::from_index(index).unwrap(), config))
            })
    }
}

impl Default for DeviceConfiguration {
    fn default() -> Self {
        DeviceConfiguration {
            channels: [Some(ChannelConfiguration::default()); 4],
        }
    }
}

/// Scale a raw ADC count to millivolts at the given range.
///
/// `max_adc` is the driver-reported full scale count, which varies by family
/// and resolution; the conversion is the one division every example performs.
pub fn adc_to_millivolts(raw: i16, max_adc: i16, range: Range) -> f32 {
    raw as f32 * range.millivolts() as f32 / max_adc as f32
}

/// Inverse of [`adc_to_millivolts`], clamped to the full scale.
pub fn millivolts_to_adc(millivolts: f32, max_adc: i16, range: Range) -> i16 {
    let counts = millivolts * max_adc as f32 / range.millivolts() as f32;
    counts.round().clamp(-(max_adc as f32), max_adc as f32) as i16
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_range_codes_are_contiguous() {
        for (code, range) in Range::ALL.into_iter().enumerate() {
            assert_eq!(range.code(), code as i32);
        }
    }

    #[test]
    fn test_range_millivolts_roundtrip() {
        for range in Range::ALL {
            assert_eq!(Range::from_millivolts(range.millivolts()), Some(range));
        }
        assert_eq!(Range::from_millivolts(123), None);
    }

    #[test]
    fn test_adc_scaling() {
        const MAX_ADC: i16 = 32512;
        assert_eq!(adc_to_millivolts(MAX_ADC, MAX_ADC, Range::V5), 5000.0);
        assert_eq!(adc_to_millivolts(0, MAX_ADC, Range::V5), 0.0);
        assert_eq!(adc_to_millivolts(-MAX_ADC, MAX_ADC, Range::Mv500), -500.0);
        assert_eq!(millivolts_to_adc(5000.0, MAX_ADC, Range::V5), MAX_ADC);
        assert_eq!(millivolts_to_adc(0.0, MAX_ADC, Range::V5), 0);
        // beyond full scale clamps instead of wrapping
        assert_eq!(millivolts_to_adc(9000.0, MAX_ADC, Range::V5), MAX_ADC);
        assert_eq!(millivolts_to_adc(-9000.0, MAX_ADC, Range::V5), -MAX_ADC);
    }

    #[test]
    fn test_sample_interval() {
        let interval = SampleInterval::micros(10);
        assert_eq!(interval.as_nanos(), 10_000.0);
        assert_eq!(interval.to_string(), "10 us");
    }

    #[test]
    fn test_enabled_channels() {
        let mut config = DeviceConfiguration::single_channel();
        config.channels[2] = Some(ChannelConfiguration {
            range: Range::Mv50,
            coupling: Coupling::AC,
        });
        let enabled = config.enabled().collect::<Vec<_>>();
        assert_eq!(enabled.len(), 2);
        assert_eq!(enabled[0].0, Channel::A);
        assert_eq!(enabled[1].0, Channel::C);
        assert_eq!(enabled[1].1.range, Range::Mv50);
    }
}
