mod config;

use anyhow::{bail, Result};
use config::AppConfig;
use log::{info, warn};
use pixelwatch_core::{
    Blinker, Color, FirmataSink, LedStripController, SerialEvent, SerialService, StripDriver,
};
use std::path::PathBuf;
use std::time::Duration;

const OPEN_TIMEOUT: Duration = Duration::from_secs(3);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    if config.serial.port_name.is_empty() {
        for port in SerialService::list_ports() {
            match (port.vid, port.pid) {
                (Some(vid), Some(pid)) => info!("available: {} ({:04X}:{:04X})", port.port_name, vid, pid),
                _ => info!("available: {} ({})", port.port_name, port.port_type),
            }
        }
        bail!("no serial port configured; set serial.port_name");
    }

    let strip = LedStripController::new(config.strip_length)?;
    let serial = SerialService::open(config.serial.to_serial_config());
    wait_for_open(&serial)?;

    let mut blinker = Blinker::new(config.color);
    blinker.set_interval_steps(config.blink_steps);
    info!(
        "blinking {} pixels {} every {:?}",
        strip.len(),
        blinker.selected().name(),
        blinker.interval()
    );

    let mut driver = StripDriver::new(strip, serial, config.packing);
    blink(&mut driver, &mut blinker, config.ticks, drain_events)?;
    driver.into_sink().close();
    Ok(())
}

/// Runs `ticks` blink ticks (0 runs until `port_open` says otherwise) and
/// blanks the strip when the budget is spent. A closed port ends the loop
/// with an error and nothing further is sent.
fn blink<S: FirmataSink>(
    driver: &mut StripDriver<S>,
    blinker: &mut Blinker,
    ticks: u64,
    mut port_open: impl FnMut(&S) -> bool,
) -> Result<()> {
    let mut tick = 0u64;
    while ticks == 0 || tick < ticks {
        driver.fill(blinker.tick())?;
        if !port_open(driver.sink()) {
            bail!("serial port closed");
        }
        std::thread::sleep(blinker.interval());
        tick += 1;
    }
    driver.fill(Color::OFF)?;
    Ok(())
}

/// Logs pending serial events; false once the port has closed.
fn drain_events(serial: &SerialService) -> bool {
    for event in serial.events().try_iter() {
        match event {
            SerialEvent::Error(e) => warn!("serial error: {e}"),
            SerialEvent::Closed => return false,
            _ => {}
        }
    }
    true
}

fn wait_for_open(serial: &SerialService) -> Result<()> {
    loop {
        match serial.events().recv_timeout(OPEN_TIMEOUT) {
            Ok(SerialEvent::Opened(name)) => {
                info!("connected to {name}");
                return Ok(());
            }
            Ok(SerialEvent::Error(e)) => bail!("{e}"),
            Ok(SerialEvent::Closed) => bail!("serial port closed before opening"),
            Ok(_) => {}
            Err(_) => bail!("timed out opening {}", serial.config().port_name),
        }
    }
}
