mod mythtv;
mod xmltv;

pub use mythtv::MythtvDatabase;
pub use xmltv::XmltvDatabase;

use sqlx::Connection;
use tracing::warn;

/// Closes a connection once its rows have been read. A failed close only
/// affects the session being torn down, so it is logged and ignored.
async fn close_quietly<C: Connection>(conn: C, source: &'static str) {
    if let Err(err) = conn.close().await {
        warn!(source, %err, "Failed to close a database connection");
    }
}
