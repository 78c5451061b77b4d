//! # Core
//!
//! The display contract, independent of any terminal library.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Display (facade)     │
//!                    │  • Driver (capability)  │
//!                    │  • LineEditor, styles   │
//!                    └───────────┬─────────────┘
//!                                │ Driver trait
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │ crossterm  │      │  headless  │      │   other    │
//!     │  terminal  │      │ TestBackend│      │  (future)  │
//!     │ (ratatui)  │      │ + script   │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`display`]: `Display`, the log/input split and its operations
//! - [`driver`]: the `Driver` trait a platform implements
//! - [`editor`]: line editing behind `Display::ask`
//! - [`outbox`]: `LogSender`, queued output from other threads
//! - [`style`]: `TextStyle`, `ColorId`, `Attributes`
//! - [`error`]: `DisplayError`
//! - [`config`]: settings file and override resolution

pub mod config;
pub mod display;
pub mod driver;
pub mod editor;
pub mod error;
pub mod outbox;
pub mod style;
