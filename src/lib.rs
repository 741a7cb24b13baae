//! Client library for Pico Technology oscilloscope and data logger drivers.
//!
//! The vendor drivers are opaque shared libraries with a documented C ABI;
//! everything this crate does is marshal calls into them: open a handle,
//! configure channels and triggers, run block or streaming captures, and
//! scale the returned ADC counts. The [`sys`] modules hold the raw bindings,
//! resolved at runtime, and the per-family clients above them share their
//! capture sequencing through [`Scope`].

pub mod sys;

mod config;
mod driver;
mod hrdl;
mod ps2000a;
mod ps5000a;
mod scope;
mod status;
mod tc08;
mod trigger;

#[derive(Debug)]
pub enum Error {
    /// The driver loaded but reported no attached device.
    NotFound,
    /// The driver shared library could not be loaded or lacks a symbol.
    Load(libloading::Error),
    /// A `PICO_STATUS` driver call failed.
    Driver(Status),
    /// A TC-08 call failed.
    Tc08(Tc08Error),
    /// An HRDL call failed.
    Hrdl(HrdlError),
    /// Serial numbers are ASCII and cannot contain NUL.
    InvalidSerial,
    /// The driver rejected every timebase between the requested one and the
    /// walk limit.
    NoTimebase { requested: u32 },
    /// The operation addressed a channel that is disabled or absent on this
    /// unit.
    ChannelUnavailable(Channel),
    /// A capture was requested with every channel disabled.
    NoEnabledChannels,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotFound =>
                write!(f, "device not connected"),
            Self::Load(error) =>
                write!(f, "driver library unavailable: {}", error),
            Self::Driver(status) =>
                write!(f, "driver call failed: {}", status),
            Self::Tc08(error) =>
                write!(f, "TC-08 call failed: {}", error),
            Self::Hrdl(error) =>
                write!(f, "HRDL call failed: {}", error),
            Self::InvalidSerial =>
                write!(f, "serial numbers cannot contain NUL"),
            Self::NoTimebase { requested } =>
                write!(f, "no usable timebase at or above {}", requested),
            Self::ChannelUnavailable(channel) =>
                write!(f, "channel {} is disabled or absent on this unit", channel),
            Self::NoEnabledChannels =>
                write!(f, "no channels are enabled"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<libloading::Error> for Error {
    fn from(error: libloading::Error) -> Self {
        Error::Load(error)
    }
}

pub type Result<T> =
    core::result::Result<T, Error>;

pub use status::Status;

pub use driver::Driver;

pub use config::{
    adc_to_millivolts,
    millivolts_to_adc,
    Channel,
    ChannelConfiguration,
    Coupling,
    DeviceConfiguration,
    DownsampleMode,
    Range,
    Resolution,
    SampleInterval,
    TimeUnits,
};

pub use trigger::{
    TriggerConfiguration,
    TriggerDirection,
};

pub use scope::{
    BlockCapture,
    BlockRequest,
    ChannelData,
    Overrange,
    Scope,
    ScopeDriver,
    StreamingChunk,
    StreamingRequest,
    StreamingSlice,
    StreamingSummary,
    TimebaseInfo,
    UnitInfo,
};

pub use ps2000a::Ps2000a;
pub use ps5000a::Ps5000a;

pub use tc08::{
    CHANNELS as TC08_CHANNELS,
    MainsRejection,
    Reading,
    Tc08,
    Tc08Error,
    Tc08Info,
    TemperatureUnits,
    ThermocoupleType,
};

pub use hrdl::{
    counts_to_millivolts,
    ConversionTime,
    DataLogger,
    HrdlChannelConfiguration,
    HrdlError,
    HrdlInfo,
    HrdlRange,
};
