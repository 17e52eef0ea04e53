use serde::Serialize;

/// Fault isolation for the active conversion panel.
///
/// The surface is keyed on the controller's surface epoch: a new epoch is a
/// fresh mount, so a fault never survives a mode change. Retrying clears the
/// fault and leaves the mode alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSurface {
    epoch: u64,
    fault: Option<String>,
    retries: u32,
}

impl ConversionSurface {
    /// Returns `true` when this is a remount.
    pub fn mount(&mut self, epoch: u64) -> bool {
        if epoch == self.epoch {
            return false;
        }
        self.epoch = epoch;
        self.fault = None;
        self.retries = 0;
        true
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Faults reported against an older mount are stale and dropped.
    pub fn report_fault(&mut self, epoch: u64, message: impl Into<String>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        let message = message.into();
        tracing::warn!(epoch, fault = %message, "conversion surface faulted");
        self.fault = Some(message);
        true
    }

    pub fn retry(&mut self) {
        if self.fault.take().is_some() {
            self.retries = self.retries.saturating_add(1);
        }
    }
}
