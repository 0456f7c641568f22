use anyhow::Context;
use chanrecon_lineup::XmltvChannel;
use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use tracing::debug;

use super::close_quietly;
use crate::config::XmltvConfig;

const SELECT_CHANNELS: &str =
    "SELECT CAST(channum AS TEXT) AS channum, CAST(selected AS TEXT) AS selected FROM channels";

/// The XMLTV grabber's SQLite database.
#[derive(Clone, Debug)]
pub struct XmltvDatabase {
    options: SqliteConnectOptions,
}

impl XmltvDatabase {
    pub fn new(config: &XmltvConfig) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .read_only(true)
            .create_if_missing(false);

        Self { options }
    }

    /// Reads the channel number and selection flag of every scheduled channel.
    pub async fn fetch_channels(&self) -> anyhow::Result<Vec<XmltvChannel>> {
        let mut conn = self
            .options
            .connect()
            .await
            .context("opening the XMLTV database")?;

        let channels = load_channels(&mut conn).await;
        close_quietly(conn, "xmltv").await;

        channels.context("querying the XMLTV channels table")
    }
}

async fn load_channels(conn: &mut SqliteConnection) -> sqlx::Result<Vec<XmltvChannel>> {
    let rows = sqlx::query_as::<_, (Option<String>, Option<String>)>(SELECT_CHANNELS)
        .fetch_all(&mut *conn)
        .await?;

    debug!(rows = rows.len(), "Loaded XMLTV channels");

    Ok(rows
        .into_iter()
        .filter_map(|(channum, selected)| Some(XmltvChannel { channum: channum?, selected }))
        .collect())
}

#[cfg(test)]
mod tests {
    use sqlx::Connection;

    use super::*;

    async fn setup_test_db() -> SqliteConnection {
        let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();

        sqlx::query("CREATE TABLE channels (channum TEXT, selected BOOLEAN)")
            .execute(&mut conn)
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO channels (channum, selected) VALUES \
             ('5.1', 1), ('5.2', 0), ('7', 1), (NULL, 1), ('9.1', NULL), ('11.1', 'true')",
        )
        .execute(&mut conn)
        .await
        .unwrap();

        conn
    }

    #[tokio::test]
    async fn test_load_channels() {
        let mut conn = setup_test_db().await;
        let channels = load_channels(&mut conn).await.unwrap();

        let rows = channels
            .iter()
            .map(|c| (c.channum.as_str(), c.selected.as_deref()))
            .collect::<Vec<_>>();

        assert_eq!(
            rows,
            [
                ("5.1", Some("1")),
                ("5.2", Some("0")),
                ("7", Some("1")),
                ("9.1", None),
                ("11.1", Some("true")),
            ],
        );
    }

    #[tokio::test]
    async fn test_fetch_channels_from_missing_file() {
        let database = XmltvDatabase::new(&XmltvConfig {
            path: "/nonexistent/chanrecon/SchedulesDirect.DB".into(),
        });

        let err = database.fetch_channels().await.unwrap_err();
        assert!(format!("{err:#}").starts_with("opening the XMLTV database"));
    }
}
