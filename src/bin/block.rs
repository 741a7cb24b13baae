//! Capture one block of samples from a scope and print it as millivolts.

use clap::Parser;

use picoscope::{
    adc_to_millivolts, BlockRequest, Channel, ChannelConfiguration, Coupling,
    DeviceConfiguration, Driver, Ps2000a, Ps5000a, Range, Resolution, Scope, ScopeDriver,
    TriggerConfiguration, UnitInfo,
};

#[derive(Debug, Parser)]
#[command(name = "picoscope-block", about = "Single block capture example")]
struct Options {
    /// Driver to open (ps2000a or ps5000a).
    #[arg(long, default_value = "ps2000a")]
    driver: Driver,
    /// Open the unit with this serial number instead of the first found.
    #[arg(long)]
    serial: Option<String>,
    /// Number of samples to capture.
    #[arg(long, default_value_t = 1000)]
    samples: usize,
    /// Also enable channel B.
    #[arg(long)]
    channel_b: bool,
    /// Input range in millivolts (10, 20, 50, ..., 50000).
    #[arg(long, default_value_t = 5000)]
    range_mv: u32,
    /// Arm a rising edge trigger on channel A at this level in millivolts.
    #[arg(long)]
    trigger_mv: Option<f32>,
    /// Print at most this many samples.
    #[arg(long, default_value_t = 32)]
    head: usize,
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
            eprintln!("no block capture client for the {} driver; \
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

    let channel = Some(ChannelConfiguration { range, coupling: Coupling::DC });
    let mut config = DeviceConfiguration { channels: [None; 4] };
    config.channels[Channel::A.index()] = channel;
    if options.channel_b {
        config.channels[Channel::B.index()] = channel;
    }
    scope.configure(&config)?;

    match options.trigger_mv {
        Some(level) => {
            let trigger = TriggerConfiguration::rising(Channel::A, level);
            println!("waiting for a rising edge through {} mV on channel A", level);
            scope.set_trigger(Some(&trigger))?;
        }
        None => scope.set_trigger(None)?,
    }

    let capture = scope.block_capture(&BlockRequest::samples(options.samples))?;
    println!(
        "captured {} samples at {} ns per sample (timebase {})",
        capture.channels[0].samples.len(),
        capture.interval_nanos,
        capture.timebase,
    );
    for data in &capture.channels {
        if data.overranged {
            println!("warning: channel {} exceeded its input range", data.channel);
        }
    }

    print!("{:>12}", "time/ns");
    for data in &capture.channels {
        print!("  {:>10}", format!("{}/mV", data.channel));
    }
    println!();

    let head = options.head.min(capture.channels[0].samples.len());
    for index in 0..head {
        print!("{:>12.0}", index as f32 * capture.interval_nanos);
        for data in &capture.channels {
            let millivolts = adc_to_millivolts(data.samples[index], capture.max_adc, data.range);
            print!("  {:>10.2}", millivolts);
        }
        println!();
    }
    let total = capture.channels[0].samples.len();
    if head < total {
        println!("... {} more samples not shown", total - head);
    }
    Ok(())
}
