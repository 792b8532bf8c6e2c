//! Subcommand implementations.
//!
//! Output goes through `tracing` at `info`, like the rest of the tooling.

pub mod cart;
pub mod lists;
pub mod price;
pub mod region;
pub mod submit;

use teahouse_client::Session;
use teahouse_core::store::NotificationKind;

/// Log whatever notifications the command produced.
pub fn report_notifications(session: &Session) {
    for notification in session.shop.notifications() {
        match notification.kind {
            NotificationKind::Error => tracing::error!("{}", notification.message),
            NotificationKind::Warning => tracing::warn!("{}", notification.message),
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!("{}", notification.message);
            }
        }
    }
}
