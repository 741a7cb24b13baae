//! Stream samples continuously from a scope, printing per-poll statistics.

use std::ops::ControlFlow;

use clap::Parser;

use picoscope::{
    adc_to_millivolts, ChannelConfiguration, Coupling, DeviceConfiguration, Driver, Ps2000a,
    Ps5000a, Range, Resolution, SampleInterval, Scope, ScopeDriver, StreamingRequest, UnitInfo,
};

#[derive(Debug, Parser)]
#[command(name = "picoscope-streaming", about = "Streaming capture example")]
struct Options {
    /// Driver to open (ps2000a or ps5000a).
    #[arg(long, default_value = "ps2000a")]
    driver: Driver,
    /// Open the unit with this serial number instead of the first found.
    #[arg(long)]
    serial: Option<String>,
    /// Requested sample interval in microseconds.
    #[arg(long, default_value_t = 10)]
    interval_us: u32,
    /// Stop after this many samples.
    #[arg(long, default_value_t = 100_000)]
    samples: usize,
    /// Input range in millivolts (10, 20, 50, ..., 50000).
    #[arg(long, default_value_t = 5000)]
    range_mv: u32,
}

fn main() -> picoscope::Result<()> {
    env_logger::init();
    let options = Options::parse();

    match options.driver {
        Driver::Ps2000a =>
            run(Scope::new(Ps2000a::open(options.serial.as_deref())?)?, &options),
        Driver::Ps5000a =>
            run(Scope::new(Ps5000a::open(options.serial.as_deref(), Resolution::default())?)?,
                &options),
        driver => {
            eprintln!("no streaming client for the {} driver; \
                       use ps2000a or ps5000a", driver);
            std::process::exit(2);
        }
    }
}

fn run<D: ScopeDriver>(mut scope: Scope<D>, options: &Options) -> picoscope::Result<()> {
    let range = match Range::from_millivolts(options.range_mv) {
        Some(range) => range,
        None => {
            eprintln!("{} mV is not a driver range", options.range_mv);
            std::process::exit(2);
        }
    };

    println!(
        "opened PicoScope {} serial {}",
        scope.unit_info(UnitInfo::VariantInfo)?,
        scope.unit_info(UnitInfo::BatchAndSerial)?,
    );

    let mut config = DeviceConfiguration { channels: [None; 4] };
    config.channels[0] = Some(ChannelConfiguration { range, coupling: Coupling::DC });
    scope.configure(&config)?;
    scope.set_trigger(None)?;

    let request = StreamingRequest {
        max_samples: Some(options.samples),
        ..StreamingRequest::at_interval(SampleInterval::micros(options.interval_us))
    };
    println!("streaming {} samples at {}", options.samples, request.interval);

    let max_adc = scope.max_adc();
    let summary = scope.stream(&request, |slice| {
        let (channel, samples) = &slice.channels[0];
        let mean = samples.iter().map(|&raw| raw as f64).sum::<f64>()
            / samples.len().max(1) as f64;
        println!(
            "{:>8} samples (total {:>9}) from index {:>7}, channel {} mean {:8.2} mV{}",
            samples.len(),
            slice.total_samples,
            slice.start_index,
            channel,
            adc_to_millivolts(mean as i16, max_adc, range),
            if slice.overrange.any() { ", overrange!" } else { "" },
        );
        ControlFlow::Continue(())
    })?;

    println!(
        "done: {} samples in {} polls at {}{}",
        summary.samples,
        summary.polls,
        summary.interval,
        if summary.overranged { ", input went out of range" } else { "" },
    );
    Ok(())
}
