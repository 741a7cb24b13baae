//! Poll a USB TC-08 thermocouple logger and print one row per conversion.

use std::thread::sleep;
use std::time::Duration;

use clap::Parser;

use picoscope::{MainsRejection, Tc08, Tc08Info, TemperatureUnits, ThermocoupleType};

#[derive(Debug, Parser)]
#[command(name = "picoscope-tc08", about = "TC-08 thermocouple polling example")]
struct Options {
    /// Number of readings to take.
    #[arg(long, default_value_t = 10)]
    count: usize,
    /// Report temperatures in Fahrenheit instead of Celsius.
    #[arg(long)]
    fahrenheit: bool,
    /// Reject 60 Hz mains interference instead of 50 Hz.
    #[arg(long)]
    sixty_hz: bool,
}

fn main() -> picoscope::Result<()> {
    env_logger::init();
    let options = Options::parse();
    let units = if options.fahrenheit {
        TemperatureUnits::Fahrenheit
    } else {
        TemperatureUnits::Celsius
    };

    let mut unit = Tc08::open()?;
    println!(
        "opened TC-08 serial {}, calibrated {}",
        unit.unit_info(Tc08Info::BatchAndSerial)?,
        unit.unit_info(Tc08Info::CalDate)?,
    );

    unit.set_mains(if options.sixty_hz { MainsRejection::Hz60 } else { MainsRejection::Hz50 })?;
    for channel in 1..=picoscope::TC08_CHANNELS {
        unit.set_channel(channel, Some(ThermocoupleType::K))?;
    }
    let interval = unit.minimum_interval_ms()?;
    println!("all channels type K; one conversion every {} ms", interval);

    print!("{:>8}  {:>8}", "reading", "cjc");
    for channel in 1..=picoscope::TC08_CHANNELS {
        print!("  {:>8}", format!("ch{}", channel));
    }
    println!("  ({})", units.suffix());

    for reading_index in 0..options.count {
        let reading = unit.get_single(units)?;
        print!("{:>8}  {:>8.2}", reading_index, reading.cold_junction());
        for channel in 1..=picoscope::TC08_CHANNELS {
            if reading.overflowed(channel) {
                print!("  {:>8}", "over");
            } else {
                print!("  {:>8.2}", reading.channel(channel));
            }
        }
        println!();
        sleep(Duration::from_millis(interval as u64));
    }
    Ok(())
}
