//! QL status replies
//!
//! The printer answers `ESC i S` and job progress with fixed 32-byte frames.

use crate::error::{PrintError, PrintResult};

/// Length of one status frame
pub const STATUS_LEN: usize = 32;

const ERROR_1: [(u8, &str); 6] = [
    (0x01, "no media"),
    (0x02, "end of media"),
    (0x04, "cutter jam"),
    (0x10, "printer in use"),
    (0x40, "high-voltage adapter"),
    (0x80, "fan motor error"),
];

const ERROR_2: [(u8, &str); 8] = [
    (0x01, "replace media"),
    (0x02, "expansion buffer full"),
    (0x04, "communication error"),
    (0x08, "communication buffer full"),
    (0x10, "cover open"),
    (0x20, "cancel key"),
    (0x40, "media cannot be fed"),
    (0x80, "system error"),
];

/// What the status frame is reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Reply,
    PrintingCompleted,
    ErrorOccurred,
    Notification,
    PhaseChange,
    Other(u8),
}

impl From<u8> for StatusType {
    fn from(b: u8) -> Self {
        match b {
            0x00 => StatusType::Reply,
            0x01 => StatusType::PrintingCompleted,
            0x02 => StatusType::ErrorOccurred,
            0x05 => StatusType::Notification,
            0x06 => StatusType::PhaseChange,
            other => StatusType::Other(other),
        }
    }
}

/// Parsed status frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QlStatus {
    pub status_type: StatusType,
    pub media_width_mm: u8,
    pub errors: Vec<&'static str>,
}

impl QlStatus {
    pub fn parse(frame: &[u8]) -> PrintResult<Self> {
        if frame.len() < STATUS_LEN || frame[0] != 0x80 || frame[1] != 0x20 {
            return Err(PrintError::Rejected(format!(
                "malformed status frame ({} bytes)",
                frame.len()
            )));
        }

        let mut errors = Vec::new();
        for (bit, name) in ERROR_1 {
            if frame[8] & bit != 0 {
                errors.push(name);
            }
        }
        for (bit, name) in ERROR_2 {
            if frame[9] & bit != 0 {
                errors.push(name);
            }
        }

        Ok(Self {
            status_type: StatusType::from(frame[18]),
            media_width_mm: frame[10],
            errors,
        })
    }

    pub fn is_error(&self) -> bool {
        !self.errors.is_empty() || self.status_type == StatusType::ErrorOccurred
    }

    /// Turn an error status into `PrintError::Rejected`
    pub fn into_result(self) -> PrintResult<Self> {
        if self.is_error() {
            let detail = if self.errors.is_empty() {
                "error status".to_string()
            } else {
                self.errors.join(", ")
            };
            return Err(PrintError::Rejected(detail));
        }
        Ok(self)
    }
}

#[cfg(test)]
pub(crate) fn frame(status_type: u8, err1: u8, err2: u8) -> [u8; STATUS_LEN] {
    let mut f = [0u8; STATUS_LEN];
    f[0] = 0x80;
    f[1] = 0x20;
    f[2] = b'B';
    f[8] = err1;
    f[9] = err2;
    f[10] = 62;
    f[18] = status_type;
    f
}
