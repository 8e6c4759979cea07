use crossbeam_channel::{bounded, select, tick, Receiver, Sender, TrySendError};
use embedded_hal::spi::SpiDevice;
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;

use crate::config::{ConfigError, MonitorConfig};
use crate::reader::{Acceleration, AccelerometerReader, DeviceError};

/// Events beyond this many unread ones are dropped.
pub const EVENT_QUEUE_LEN: usize = 64;

#[derive(Debug)]
pub enum MonitorEvent<E> {
    Sample { acceleration: Acceleration, alert: bool },
    Error(DeviceError<E>),
}

/// Why `Monitor::open` could not start sampling.
#[derive(Debug, Error)]
pub enum StartError<E> {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Device(DeviceError<E>),
}

/// Periodic sampling loop that owns the reader on its own thread.
///
/// Ticks follow a fixed schedule and run strictly one after another, so the
/// bus never sees overlapping transfers. A failed read is reported and
/// retried on the next tick. Readers that only poll `latest()` never block
/// the loop: once `EVENT_QUEUE_LEN` events sit unread, new ones are dropped.
pub struct Monitor<SPI: SpiDevice> {
    stop_tx: Sender<()>,
    rx_evt: Receiver<MonitorEvent<SPI::Error>>,
    latest: Arc<Mutex<Option<Acceleration>>>,
    worker: Option<JoinHandle<AccelerometerReader<SPI>>>,
}

impl<SPI> Monitor<SPI>
where
    SPI: SpiDevice + Send + 'static,
    SPI::Error: Send + 'static,
{
    pub fn open(spi: SPI, config: &MonitorConfig) -> Result<Self, StartError<SPI::Error>> {
        let reader = AccelerometerReader::new(spi, config.accel)?;
        Self::start(reader, config.interval()).map_err(StartError::Device)
    }

    /// Configures the sensor and starts ticking; nothing is spawned if
    /// configuration fails.
    pub fn start(
        mut reader: AccelerometerReader<SPI>,
        interval: Duration,
    ) -> Result<Self, DeviceError<SPI::Error>> {
        reader.configure()?;

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let (tx_evt, rx_evt) = bounded(EVENT_QUEUE_LEN);
        let latest = Arc::new(Mutex::new(None));
        let latest_clone = latest.clone();

        info!("accelerometer monitor started, interval {interval:?}");
        let worker = std::thread::spawn(move || {
            let ticker = tick(interval);
            loop {
                let event = match reader.read_sample() {
                    Ok(acceleration) => {
                        let alert = reader.is_alert_condition(acceleration);
                        if alert {
                            warn!("alert: z axis at {:.3}G", acceleration.z);
                        }
                        *latest_clone.lock() = Some(acceleration);
                        MonitorEvent::Sample { acceleration, alert }
                    }
                    Err(e) => {
                        warn!("accelerometer read failed: {e}");
                        MonitorEvent::Error(e)
                    }
                };
                match tx_evt.try_send(event) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => debug!("event queue full, dropping event"),
                    Err(TrySendError::Disconnected(_)) => break,
                }

                select! {
                    recv(stop_rx) -> _ => break,
                    recv(ticker) -> _ => {}
                }
            }
            debug!("accelerometer monitor thread exiting");
            reader
        });

        Ok(Self {
            stop_tx,
            rx_evt,
            latest,
            worker: Some(worker),
        })
    }

    pub fn events(&self) -> &Receiver<MonitorEvent<SPI::Error>> {
        &self.rx_evt
    }

    /// Most recent successful reading.
    pub fn latest(&self) -> Option<Acceleration> {
        *self.latest.lock()
    }

    /// Stops sampling and returns the bus, or `None` if the sampling thread
    /// panicked and took the bus with it.
    pub fn stop(mut self) -> Option<SPI> {
        let _ = self.stop_tx.try_send(());
        let worker = self.worker.take()?;
        match worker.join() {
            Ok(reader) => {
                info!("accelerometer monitor stopped");
                Some(reader.release())
            }
            Err(_) => {
                error!("accelerometer monitor thread panicked");
                None
            }
        }
    }
}

impl<SPI: SpiDevice> Drop for Monitor<SPI> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.stop_tx.try_send(());
            let _ = worker.join();
        }
    }
}
