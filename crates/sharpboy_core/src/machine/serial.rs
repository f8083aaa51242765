use crate::bus::{reg, Bus};

/// SC value that starts a transfer on the internal clock.
pub const TRANSFER_START: u8 = 0x81;

/// Captures bytes written out over the serial port.
///
/// Test ROMs print their results by writing a character to SB and then
/// $81 to SC. There is no link partner: the byte is recorded and the
/// transfer completes immediately.
#[derive(Clone, Debug, Default)]
pub struct SerialLog {
    output: Vec<u8>,
    echo: bool,
}

impl SerialLog {
    pub fn new(echo: bool) -> Self {
        Self {
            output: Vec::new(),
            echo,
        }
    }

    /// Check SC for a pending transfer. Returns the captured byte, if any.
    pub fn poll<B: Bus>(&mut self, bus: &mut B) -> Option<u8> {
        if bus.read8(reg::SC) != TRANSFER_START {
            return None;
        }
        let byte = bus.read8(reg::SB);
        self.output.push(byte);
        bus.write8(reg::SC, 0);
        if self.echo {
            log::info!("serial: {:?}", byte as char);
        } else {
            log::debug!("serial byte 0x{byte:02X}");
        }
        Some(byte)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.output
    }

    /// Captured output decoded lossily as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }

    pub fn clear(&mut self) {
        self.output.clear();
    }
}
