//! Install-offer lifecycle.
//!
//! The platform hands out at most one interceptable offer per session. It is
//! captured only while the user has not dismissed it before, then either
//! accepted (handed back for invocation) or dismissed, never both.

use crate::error::PortError;
use crate::flags::{FlagStore, PersistedFlags};

#[derive(Debug)]
pub struct InstallPrompt<O> {
    offer: Option<O>,
    suppressed: bool,
}

impl<O> InstallPrompt<O> {
    pub fn new(flags: &PersistedFlags) -> Self {
        Self {
            offer: None,
            suppressed: flags.install_dismissed,
        }
    }

    /// Returns `true` when the offer was taken; the host should then suppress the
    /// platform's own install UI.
    pub fn capture(&mut self, offer: O) -> bool {
        if self.suppressed || self.offer.is_some() {
            return false;
        }
        self.offer = Some(offer);
        true
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.offer.is_some()
    }

    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Takes the offer for invocation.
    pub fn accept(&mut self) -> Option<O> {
        self.offer.take()
    }

    /// Discards any held offer and persists the suppression flag.
    pub fn dismiss<S: FlagStore + ?Sized>(
        &mut self,
        flags: &mut PersistedFlags,
        store: &mut S,
    ) -> Result<(), PortError> {
        self.offer = None;
        self.suppressed = true;
        flags.mark_install_dismissed(store)
    }
}
