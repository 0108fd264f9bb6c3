//! Async client for a node's web API and its live link statistics.

pub mod api;
pub mod error;
pub mod guard;
pub mod reboot;
pub mod stream;

pub use api::NodeClient;
pub use error::ClientError;
pub use guard::{InFlight, InFlightTicket};
pub use reboot::{RebootPoller, StatusProbe};
pub use stream::{PumpEnd, TelemetryStream};
