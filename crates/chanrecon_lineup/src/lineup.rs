use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::LineupError;
use crate::channel::{ChannelNumber, Flag, Selection};

static NUMBERED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+ (.*)$").expect("valid regex"));

/// A row of the DVR's `channel` table.
#[derive(Clone, Debug)]
pub struct DvrChannel {
    pub chanid: u64,
    pub channum: String,
    pub freqid: String,
    pub name: String,
    pub visible: Option<String>,
}

impl DvrChannel {
    /// Analog channels carry no subchannel separator, and a leading separator
    /// marks a broken entry. Neither takes part in the reconciliation.
    fn is_reconcilable(&self) -> bool {
        self.channum.contains(ChannelNumber::DVR_SEPARATOR)
            && !self.channum.starts_with(ChannelNumber::DVR_SEPARATOR)
    }
}

/// A row of the scheduling store's `channels` table.
#[derive(Clone, Debug)]
pub struct XmltvChannel {
    pub channum: String,
    pub selected: Option<String>,
}

/// A DVR channel with the scheduling store's selection merged in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChannelRecord {
    pub chanid: u64,
    pub number: ChannelNumber,
    pub freqid: String,
    pub name: String,
    pub visible: Flag,
    /// The `visible` column as stored, shown to the operator verbatim.
    pub visible_text: String,
    pub xmltv_selected: Selection,
}

impl ChannelRecord {
    /// True when the DVR and the scheduling store disagree about the channel.
    pub fn is_mismatch(&self) -> bool {
        !self.xmltv_selected.agrees_with(self.visible)
    }

    /// The channel name without a leading `major.minor ` prefix.
    pub fn display_name(&self) -> &str {
        NUMBERED_NAME
            .captures(&self.name)
            .and_then(|captures| captures.get(1))
            .map_or(self.name.as_str(), |rest| rest.as_str())
    }
}

fn parse_flag(channum: &str, value: Option<&str>) -> crate::Result<Flag> {
    Flag::parse(value).ok_or_else(|| LineupError::MalformedFlag {
        channum: channum.to_string(),
        value: value.unwrap_or_default().to_string(),
    })
}

/// Channels keyed by their normalized number.
#[derive(Clone, Debug, Default)]
pub struct Lineup {
    channels: HashMap<ChannelNumber, ChannelRecord>,
}

impl Lineup {
    /// Builds the lineup from the DVR's channel rows.
    ///
    /// Rows are expected in `chanid` order; when two rows normalize to the same
    /// number the later one wins.
    pub fn from_dvr(rows: impl IntoIterator<Item = DvrChannel>) -> crate::Result<Self> {
        let mut channels = HashMap::new();

        for row in rows {
            if !row.is_reconcilable() {
                debug!(chanid = row.chanid, channum = %row.channum, "Skipped a DVR channel");
                continue;
            }

            let number = ChannelNumber::parse_with(&row.channum, ChannelNumber::DVR_SEPARATOR)?;
            let visible = parse_flag(&row.channum, row.visible.as_deref())?;
            let visible_text = row.visible.as_deref().unwrap_or_default().trim().to_string();

            let record = ChannelRecord {
                chanid: row.chanid,
                number,
                freqid: row.freqid,
                name: row.name,
                visible,
                visible_text,
                xmltv_selected: Selection::Missing,
            };

            if let Some(previous) = channels.insert(number, record) {
                debug!(
                    %number,
                    previous = previous.chanid,
                    chanid = row.chanid,
                    "Replaced a DVR channel"
                );
            }
        }

        Ok(Self { channels })
    }

    /// Merges the scheduling store's selection flags into existing channels.
    ///
    /// Rows for channels the DVR does not carry are ignored. Returns the number
    /// of rows applied.
    pub fn merge_xmltv(
        &mut self,
        rows: impl IntoIterator<Item = XmltvChannel>,
    ) -> crate::Result<usize> {
        let mut applied = 0;

        for row in rows {
            if !row.channum.contains(ChannelNumber::SEPARATOR) {
                continue;
            }

            let Ok(number) = row.channum.parse::<ChannelNumber>() else {
                debug!(channum = %row.channum, "Skipped an unparsable scheduled channel");
                continue;
            };

            let Some(record) = self.channels.get_mut(&number) else {
                debug!(channum = %row.channum, "No DVR channel for a scheduled channel");
                continue;
            };

            let selected = parse_flag(&row.channum, row.selected.as_deref())?;
            record.xmltv_selected = Selection::Listed(selected);
            applied += 1;
        }

        Ok(applied)
    }

    pub fn get(&self, number: &ChannelNumber) -> Option<&ChannelRecord> {
        self.channels.get(number)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Consumes the lineup into records ordered by channel number.
    pub fn into_sorted(self) -> Vec<ChannelRecord> {
        let mut records = self.channels.into_values().collect::<Vec<_>>();
        records.sort_by_key(|record| record.number);
        records
    }
}
