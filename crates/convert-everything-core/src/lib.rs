//! Host-independent core of the Convert Everything shell.
//!
//! Owns the single active [`Mode`] (generic format pair or named tool), keeps it in
//! sync with browser history through a [`DocumentPort`], and translates ambient
//! platform input (drag/drop, paste, keys, history pops) into mode transitions.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod codec;
pub mod config;
pub mod controller;
pub mod error;
pub mod flags;
pub mod install;
pub mod memory;
pub mod metadata;
pub mod mode;
pub mod port;
pub mod registry;
pub mod router;
pub mod surface;

pub use app::{ShellApp, ShellSnapshot};
pub use codec::{NavigationSnapshot, decode, encode, history_href};
pub use config::ShellConfig;
pub use controller::{HistoryWrite, ModeController, TransitionOutcome};
pub use error::{ConfigError, PortError};
pub use flags::{FlagStore, PersistedFlags, Theme};
pub use install::InstallPrompt;
pub use memory::{MemoryDocument, MemoryFlagStore};
pub use metadata::sync_document_metadata;
pub use mode::Mode;
pub use port::{DocumentPort, TagKey};
pub use registry::{BuiltinRegistry, CapabilityRegistry, FormatSpec, ToolSpec};
pub use router::{
    ClipboardItem, DropRule, DroppedFile, FocusContext, InputEvent, InputRouter, KeyPress,
    RouteOutcome, RouterEffect, classify_file,
};
pub use surface::ConversionSurface;
