//! Walk every known driver family, report what is installed and attached.

use picoscope::{
    DataLogger, Driver, Error, HrdlInfo, Ps2000a, Ps5000a, Resolution, Scope, Tc08, Tc08Info,
    UnitInfo,
};

fn main() {
    env_logger::init();

    for driver in Driver::ALL {
        let line = match describe(driver) {
            Ok(line) => line,
            Err(Error::Load(error)) => format!("driver not installed ({})", error),
            Err(Error::NotFound) => "driver installed, no unit attached".to_owned(),
            Err(error) => format!("error: {}", error),
        };
        println!("{:>9}: {}", driver, line);
    }
}

fn describe(driver: Driver) -> picoscope::Result<String> {
    match driver {
        Driver::Ps2000a => {
            let mut scope = Scope::new(Ps2000a::open(None)?)?;
            scope_line(&mut scope)
        }
        Driver::Ps5000a => {
            let mut scope = Scope::new(Ps5000a::open(None, Resolution::default())?)?;
            scope_line(&mut scope)
        }
        Driver::UsbTc08 => {
            let mut unit = Tc08::open()?;
            Ok(format!(
                "TC-08 serial {}, driver {}",
                unit.unit_info(Tc08Info::BatchAndSerial)?,
                unit.unit_info(Tc08Info::DriverVersion)?,
            ))
        }
        Driver::PicoHrdl => {
            let mut unit = DataLogger::open()?;
            Ok(format!(
                "{} serial {}, driver {}",
                unit.unit_info(HrdlInfo::VariantInfo)?,
                unit.unit_info(HrdlInfo::BatchAndSerial)?,
                unit.unit_info(HrdlInfo::DriverVersion)?,
            ))
        }
        // No high-level client for these families; still report whether the
        // driver library itself is present.
        driver => {
            if driver.library_present() {
                Ok("driver installed, no client in this crate".to_owned())
            } else {
                Ok("driver not installed".to_owned())
            }
        }
    }
}

fn scope_line<D: picoscope::ScopeDriver>(scope: &mut Scope<D>) -> picoscope::Result<String> {
    Ok(format!(
        "PicoScope {} serial {}, {} channels, driver {}",
        scope.unit_info(UnitInfo::VariantInfo)?,
        scope.unit_info(UnitInfo::BatchAndSerial)?,
        scope.channel_count(),
        scope.unit_info(UnitInfo::DriverVersion)?,
    ))
}
