//! In-memory SPI device shared by the integration tests.

#![allow(dead_code)]

use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
pub struct MockState {
    pub writes: Vec<Vec<u8>>,
    pub transfers: Vec<Vec<u8>>,
    /// Clocked back on every transfer, dummy byte first.
    pub response: [u8; 7],
    pub fail_writes: bool,
    pub fail_transfers: bool,
    /// Time each transfer takes.
    pub transfer_delay: Duration,
}

/// Cloneable handle; clones share the same recorded state.
#[derive(Clone, Default)]
pub struct MockSpi {
    pub state: Arc<Mutex<MockState>>,
}

impl MockSpi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axes(data: [u8; 6]) -> Self {
        let spi = Self::new();
        spi.set_axes(data);
        spi
    }

    pub fn set_axes(&self, data: [u8; 6]) {
        let mut state = self.state.lock();
        state.response[0] = 0xAA;
        state.response[1..].copy_from_slice(&data);
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.lock().writes.clone()
    }

    pub fn transfers(&self) -> Vec<Vec<u8>> {
        self.state.lock().transfers.clone()
    }
}

impl ErrorType for MockSpi {
    type Error = ErrorKind;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut state = self.state.lock();
        for op in operations.iter_mut() {
            match op {
                Operation::Write(buf) => {
                    if state.fail_writes {
                        return Err(ErrorKind::Other);
                    }
                    state.writes.push(buf.to_vec());
                }
                Operation::Transfer(read, write) => {
                    if state.fail_transfers {
                        return Err(ErrorKind::Other);
                    }
                    std::thread::sleep(state.transfer_delay);
                    state.transfers.push(write.to_vec());
                    let n = read.len().min(state.response.len());
                    read[..n].copy_from_slice(&state.response[..n]);
                }
                Operation::Read(buf) | Operation::TransferInPlace(buf) => buf.fill(0),
                Operation::DelayNs(_) => {}
            }
        }
        Ok(())
    }
}
