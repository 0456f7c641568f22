//! Channel lineup reconciliation between a MythTV channel table and an XMLTV
//! scheduling database.

mod channel;
mod lineup;
mod report;

pub use channel::{ChannelNumber, Flag, Selection};
pub use lineup::{ChannelRecord, DvrChannel, Lineup, XmltvChannel};
pub use report::{Report, render_document, render_failure, render_table};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LineupError>;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum LineupError {
    #[error("malformed channel number: {0:?}")]
    MalformedChannelNumber(String),

    #[error("malformed flag value {value:?} for channel {channum:?}")]
    MalformedFlag { channum: String, value: String },
}
