//! Marshaling of the simple edge trigger the scope drivers implement on-device.

use crate::config::{millivolts_to_adc, Channel, Range};

/// Threshold crossing condition, in the drivers' integer encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDirection {
    Above,
    Below,
    Rising,
    Falling,
    RisingOrFalling,
}

impl TriggerDirection {
    pub(crate) fn code(self) -> i32 {
        self as i32
    }
}

/// Configuration for the drivers' "simple trigger": a single-channel edge
/// condition armed before a capture. The threshold is specified in millivolts
/// and converted to ADC counts against the source channel's range at configure
/// time, which is the only arithmetic the host performs for triggering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerConfiguration {
    pub source: Channel,
    pub threshold_millivolts: f32,
    pub direction: TriggerDirection,
    /// Samples to keep acquiring between the trigger point and the start of
    /// the returned data.
    pub delay_samples: u32,
    /// Give up waiting and trigger anyway after this many milliseconds;
    /// zero waits forever.
    pub auto_trigger_millis: u16,
}

impl TriggerConfiguration {
    /// Rising edge through `threshold_millivolts`, auto-triggering after a
    /// second. What the examples arm unless told otherwise.
    pub fn rising(source: Channel, threshold_millivolts: f32) -> TriggerConfiguration {
        TriggerConfiguration {
            source,
            threshold_millivolts,
            direction: TriggerDirection::Rising,
            delay_samples: 0,
            auto_trigger_millis: 1000,
        }
    }

    /// Threshold in ADC counts at the source channel's range, clamped to full
    /// scale so an out-of-range level still arms a reachable trigger.
    pub fn threshold_adc(&self, max_adc: i16, range: Range) -> i16 {
        millivolts_to_adc(self.threshold_millivolts, max_adc, range)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_direction_codes() {
        assert_eq!(TriggerDirection::Above.code(), 0);
        assert_eq!(TriggerDirection::Below.code(), 1);
        assert_eq!(TriggerDirection::Rising.code(), 2);
        assert_eq!(TriggerDirection::Falling.code(), 3);
        assert_eq!(TriggerDirection::RisingOrFalling.code(), 4);
    }

    #[test]
    fn test_threshold_conversion() {
        const MAX_ADC: i16 = 32767;
        let trigger = TriggerConfiguration::rising(Channel::A, 500.0);
        assert_eq!(trigger.threshold_adc(MAX_ADC, Range::V1), MAX_ADC / 2 + 1);
        // at a coarser range the same level is a smaller count
        assert_eq!(trigger.threshold_adc(MAX_ADC, Range::V5), 3277);
    }

    #[test]
    fn test_threshold_clamps_to_full_scale() {
        const MAX_ADC: i16 = 32512;
        let trigger = TriggerConfiguration::rising(Channel::A, 12_000.0);
        assert_eq!(trigger.threshold_adc(MAX_ADC, Range::V5), MAX_ADC);
        let trigger = TriggerConfiguration {
            threshold_millivolts: -12_000.0,
            ..trigger
        };
        assert_eq!(trigger.threshold_adc(MAX_ADC, Range::V5), -MAX_ADC);
    }
}
