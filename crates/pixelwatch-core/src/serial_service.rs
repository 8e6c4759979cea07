use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use log::{debug, error, info};
use serialport::SerialPortInfo;
use std::io::Write;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::TransportError;
use crate::firmata::FirmataSink;

/// Baud rate StandardFirmata sketches listen on.
pub const FIRMATA_BAUD_RATE: u32 = 57_600;

/// Events beyond this many unread ones are dropped.
pub const EVENT_QUEUE_LEN: usize = 256;

#[derive(Debug, Clone)]
pub struct PortInfo {
    pub port_name: String,
    pub port_type: String,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub product: Option<String>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (port_type, vid, pid, product) = match &info.port_type {
            serialport::SerialPortType::UsbPort(usb) => {
                ("USB".to_string(), Some(usb.vid), Some(usb.pid), usb.product.clone())
            }
            serialport::SerialPortType::PciPort => ("PCI".to_string(), None, None, None),
            serialport::SerialPortType::BluetoothPort => ("Bluetooth".to_string(), None, None, None),
            serialport::SerialPortType::Unknown => ("Unknown".to_string(), None, None, None),
        };
        Self {
            port_name: info.port_name,
            port_type,
            vid,
            pid,
            product,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: serialport::DataBits,
    pub parity: serialport::Parity,
    pub stop_bits: serialport::StopBits,
    pub flow_control: serialport::FlowControl,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: FIRMATA_BAUD_RATE,
            data_bits: serialport::DataBits::Eight,
            parity: serialport::Parity::None,
            stop_bits: serialport::StopBits::One,
            flow_control: serialport::FlowControl::None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SerialEvent {
    Opened(String),
    Tx(usize),
    Error(String),
    Closed,
}

enum Command {
    Send(Vec<u8>),
    Close,
}

/// Owns a serial port on a worker thread and forwards frames to it in order.
///
/// The port is opened lazily by the worker; an open failure arrives as
/// `SerialEvent::Error` followed by `SerialEvent::Closed`, after which every
/// `send` fails with `TransportError::Disconnected`.
pub struct SerialService {
    cfg: SerialConfig,
    tx_cmd: Sender<Command>,
    rx_evt: Receiver<SerialEvent>,
    worker: Option<JoinHandle<()>>,
}

impl SerialService {
    pub fn list_ports() -> Vec<PortInfo> {
        serialport::available_ports()
            .unwrap_or_default()
            .into_iter()
            .map(PortInfo::from)
            .collect()
    }

    pub fn open(cfg: SerialConfig) -> Self {
        let (tx_cmd, rx_cmd) = unbounded::<Command>();
        let (tx_evt, rx_evt) = bounded::<SerialEvent>(EVENT_QUEUE_LEN);
        let cfg_clone = cfg.clone();

        let worker = std::thread::spawn(move || {
            let mut port = match serialport::new(&cfg_clone.port_name, cfg_clone.baud_rate)
                .data_bits(cfg_clone.data_bits)
                .parity(cfg_clone.parity)
                .stop_bits(cfg_clone.stop_bits)
                .flow_control(cfg_clone.flow_control)
                .timeout(Duration::from_millis(50))
                .open()
            {
                Ok(port) => port,
                Err(e) => {
                    error!("failed to open {}: {e}", cfg_clone.port_name);
                    publish(&tx_evt, SerialEvent::Error(format!("open failed: {e}")));
                    publish(&tx_evt, SerialEvent::Closed);
                    return;
                }
            };

            info!("opened {} at {} baud", cfg_clone.port_name, cfg_clone.baud_rate);
            publish(&tx_evt, SerialEvent::Opened(cfg_clone.port_name.clone()));

            // Commands arrive in send order, so frames reach the wire in that order too.
            for cmd in rx_cmd.iter() {
                match cmd {
                    Command::Send(data) => match port.write_all(&data).and_then(|()| port.flush()) {
                        Ok(()) => {
                            debug!("tx {:02X?}", data);
                            publish(&tx_evt, SerialEvent::Tx(data.len()));
                        }
                        Err(e) => {
                            error!("write to {} failed: {e}", cfg_clone.port_name);
                            publish(&tx_evt, SerialEvent::Error(e.to_string()));
                        }
                    },
                    Command::Close => break,
                }
            }

            info!("closed {}", cfg_clone.port_name);
            publish(&tx_evt, SerialEvent::Closed);
        });

        Self {
            cfg,
            tx_cmd,
            rx_evt,
            worker: Some(worker),
        }
    }

    pub fn send(&self, data: Vec<u8>) -> Result<(), TransportError> {
        self.tx_cmd
            .send(Command::Send(data))
            .map_err(|_| TransportError::Disconnected)
    }

    /// Stops the worker once every queued frame has been written.
    pub fn close(&mut self) {
        let _ = self.tx_cmd.send(Command::Close);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    pub fn events(&self) -> &Receiver<SerialEvent> {
        &self.rx_evt
    }

    pub fn config(&self) -> &SerialConfig {
        &self.cfg
    }
}

fn publish(tx_evt: &Sender<SerialEvent>, event: SerialEvent) {
    if let Err(TrySendError::Full(event)) = tx_evt.try_send(event) {
        debug!("serial event queue full, dropping {event:?}");
    }
}

impl FirmataSink for SerialService {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        SerialService::send(self, bytes.to_vec())
    }
}

impl Drop for SerialService {
    fn drop(&mut self) {
        self.close();
    }
}
