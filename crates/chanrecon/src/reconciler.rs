use chanrecon_lineup::{Lineup, Report};
use tracing::info;

use crate::config::Config;
use crate::source::{MythtvDatabase, XmltvDatabase};

/// Runs the reconciliation against both databases, once per request.
pub struct Reconciler {
    mythtv: MythtvDatabase,
    xmltv: XmltvDatabase,
}

impl Reconciler {
    pub fn new(config: &Config) -> Self {
        Self {
            mythtv: MythtvDatabase::new(&config.mythtv),
            xmltv: XmltvDatabase::new(&config.xmltv),
        }
    }

    pub async fn reconcile(&self) -> anyhow::Result<Report> {
        let dvr_channels = self.mythtv.fetch_channels().await?;
        let mut lineup = Lineup::from_dvr(dvr_channels)?;

        let xmltv_channels = self.xmltv.fetch_channels().await?;
        let scheduled = xmltv_channels.len();
        let applied = lineup.merge_xmltv(xmltv_channels)?;

        info!(
            channels = lineup.len(),
            scheduled,
            applied,
            "Reconciled the channel lineup"
        );

        Ok(Report::from(lineup))
    }
}
