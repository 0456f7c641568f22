use anyhow::Context;
use chanrecon_lineup::DvrChannel;
use sqlx::ConnectOptions;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use tracing::debug;

use super::close_quietly;
use crate::config::MythtvConfig;

const SELECT_CHANNELS: &str = "SELECT CAST(chanid AS UNSIGNED) AS chanid, channum, freqid, name, \
                               CAST(visible AS CHAR) AS visible FROM channel ORDER BY chanid";

/// The MythTV backend database.
#[derive(Clone, Debug)]
pub struct MythtvDatabase {
    options: MySqlConnectOptions,
}

impl MythtvDatabase {
    pub fn new(config: &MythtvConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.login)
            .password(config.password.expose());

        Self { options }
    }

    /// Reads every row of the DVR's `channel` table in `chanid` order.
    pub async fn fetch_channels(&self) -> anyhow::Result<Vec<DvrChannel>> {
        let mut conn = self
            .options
            .connect()
            .await
            .context("connecting to the MythTV database")?;

        let channels = load_channels(&mut conn).await;
        close_quietly(conn, "mythtv").await;

        channels.context("querying the MythTV channel table")
    }
}

async fn load_channels(conn: &mut MySqlConnection) -> sqlx::Result<Vec<DvrChannel>> {
    let rows = sqlx::query_as::<_, (u64, String, Option<String>, String, Option<String>)>(
        SELECT_CHANNELS,
    )
    .fetch_all(&mut *conn)
    .await?;

    debug!(rows = rows.len(), "Loaded MythTV channels");

    Ok(rows
        .into_iter()
        .map(|(chanid, channum, freqid, name, visible)| DvrChannel {
            chanid,
            channum,
            freqid: freqid.unwrap_or_default(),
            name,
            visible,
        })
        .collect())
}
