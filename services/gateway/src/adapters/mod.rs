pub mod catalog;
pub mod messenger;
pub mod orders;

pub use catalog::HttpCatalogAdapter;
pub use messenger::BridgeMessengerAdapter;
pub use orders::HttpOrderAdapter;

use grabtext_core::PortError;

/// Maps a reqwest failure into the port taxonomy. Timeouts are called out
/// explicitly since they are the expected flavor of backend trouble.
pub(crate) fn transport_error(err: reqwest::Error) -> PortError {
    if err.is_timeout() {
        PortError::Transport(format!("request timed out: {err}"))
    } else {
        PortError::Transport(err.to_string())
    }
}
