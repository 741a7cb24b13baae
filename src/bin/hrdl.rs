//! Collect a block of high-resolution readings from a PicoLog HRDL unit.

use std::thread::sleep;
use std::time::Duration;

use clap::Parser;

use picoscope::{
    counts_to_millivolts, ConversionTime, DataLogger, HrdlChannelConfiguration, HrdlInfo,
    HrdlRange,
};

#[derive(Debug, Parser)]
#[command(name = "picoscope-hrdl", about = "High resolution data logger block example")]
struct Options {
    /// Analog input channel to read (1-based).
    #[arg(long, default_value_t = 1)]
    channel: usize,
    /// Number of readings to collect.
    #[arg(long, default_value_t = 20)]
    values: usize,
    /// Input range in millivolts (2500, 1250, 625, ...).
    #[arg(long, default_value_t = 2500)]
    range_mv: u32,
    /// Reject 60 Hz mains interference instead of 50 Hz.
    #[arg(long)]
    sixty_hz: bool,
}

fn main() -> picoscope::Result<()> {
    env_logger::init();
    let options = Options::parse();
    let range = match options.range_mv {
        2500 => HrdlRange::Mv2500,
        1250 => HrdlRange::Mv1250,
        625 => HrdlRange::Mv625,
        312 => HrdlRange::Mv312,
        156 => HrdlRange::Mv156,
        78 => HrdlRange::Mv78,
        39 => HrdlRange::Mv39,
        other => {
            eprintln!("{} mV is not an HRDL range", other);
            std::process::exit(2);
        }
    };

    let mut unit = DataLogger::open()?;
    println!(
        "opened {} serial {}",
        unit.unit_info(HrdlInfo::VariantInfo)?,
        unit.unit_info(HrdlInfo::BatchAndSerial)?,
    );

    unit.set_mains_rejection(options.sixty_hz)?;
    let config = HrdlChannelConfiguration { range, single_ended: true };
    unit.set_analog_channel(options.channel, Some(config))?;

    // one channel converting for 60 ms fits comfortably in a 100 ms sweep
    let conversion = ConversionTime::Ms60;
    unit.set_interval(100, conversion)?;

    let (_min_adc, max_adc) = unit.min_max_adc_counts(options.channel)?;
    println!(
        "channel {} at ±{} mV, full scale {} counts",
        options.channel,
        range.millivolts(),
        max_adc,
    );

    unit.run(options.values)?;
    while !unit.ready() {
        sleep(Duration::from_millis(50));
    }

    let mut values = vec![0i32; options.values];
    let (count, overranged) = unit.get_values(&mut values)?;
    if overranged {
        println!("warning: input exceeded the selected range");
    }

    println!("{:>8}  {:>12}  {:>12}", "reading", "counts", "mV");
    for (index, &value) in values[..count].iter().enumerate() {
        println!(
            "{:>8}  {:>12}  {:>12.4}",
            index,
            value,
            counts_to_millivolts(value, max_adc, range),
        );
    }
    Ok(())
}
