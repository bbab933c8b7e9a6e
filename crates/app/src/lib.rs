//! View models and command handlers for the reconciliation client.

pub mod commands;
pub mod dashboard;
pub mod fetch;
pub mod notify;
pub mod reset;
pub mod settings;
pub mod sources;

pub use dashboard::{DashboardFilters, DashboardPage, DashboardView, Exclusiones, Totales, Visibilidad};
pub use fetch::{Generation, LoadState, OnError, Remote, Resolution};
pub use notify::{Nivel, Notifications, Toast};
pub use reset::{Preview, ReconciliationResetPage, ResetDialog, Ribbon};
pub use sources::{DashboardSource, ReconciliationSource};
