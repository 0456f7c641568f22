use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::LineupError;

/// A virtual channel number, `major.minor`.
///
/// Ordering compares the major part first and the minor part on a tie, both
/// numerically, so `9.1` sorts before `10.1`.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ChannelNumber {
    pub major: u32,
    pub minor: u32,
}

impl ChannelNumber {
    /// Separator used by the DVR's channel table, e.g. `5_1`.
    pub const DVR_SEPARATOR: char = '_';

    /// Separator used by the scheduling store and the normalized form, e.g. `5.1`.
    pub const SEPARATOR: char = '.';

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parses a number made of exactly two decimal parts joined by `separator`.
    pub fn parse_with(raw: &str, separator: char) -> crate::Result<Self> {
        let malformed = || LineupError::MalformedChannelNumber(raw.to_string());

        let mut parts = raw.split(separator);
        let (Some(major), Some(minor), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };

        Ok(Self {
            major: parse_part(major).ok_or_else(malformed)?,
            minor: parse_part(minor).ok_or_else(malformed)?,
        })
    }
}

fn parse_part(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    part.parse().ok()
}

impl FromStr for ChannelNumber {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, Self::SEPARATOR)
    }
}

impl Display for ChannelNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A boolean column as stored by either database.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Flag {
    Off,
    On,
}

impl Flag {
    /// Parses the text form of a flag column. `None` is SQL `NULL`.
    ///
    /// Positive integers are `On`; zero and negative values, such as MythTV's
    /// `-1` for a channel that is never shown, are `Off`. The words
    /// `true`/`false`, `yes`/`no` and `on`/`off` are accepted in any case.
    /// Anything else is rejected.
    pub fn parse(value: Option<&str>) -> Option<Self> {
        let Some(value) = value.map(str::trim) else {
            return Some(Self::Off);
        };

        if value.is_empty() {
            return Some(Self::Off);
        }

        if let Ok(number) = value.parse::<i64>() {
            return Some(Self::from(number > 0));
        }

        match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => Some(Self::On),
            "false" | "no" | "off" => Some(Self::Off),
            _ => None,
        }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        match value {
            true => Self::On,
            false => Self::Off,
        }
    }
}

impl Display for Flag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "0",
            Self::On => "1",
        })
    }
}

/// Whether the scheduling store selects a channel, if it lists it at all.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Selection {
    Listed(Flag),
    #[default]
    Missing,
}

impl Selection {
    /// A DVR channel agrees with the scheduling store only when the store
    /// lists it with the same flag as the DVR's visibility.
    pub fn agrees_with(self, visible: Flag) -> bool {
        matches!(self, Self::Listed(selected) if selected == visible)
    }

    pub fn flag(self) -> Option<Flag> {
        match self {
            Self::Listed(flag) => Some(flag),
            Self::Missing => None,
        }
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listed(flag) => Display::fmt(flag, f),
            Self::Missing => f.write_str("missing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel_number() {
        assert_eq!(
            ChannelNumber::parse_with("5_1", ChannelNumber::DVR_SEPARATOR),
            Ok(ChannelNumber::new(5, 1)),
        );
        assert_eq!("12.3".parse::<ChannelNumber>(), Ok(ChannelNumber::new(12, 3)));
        assert_eq!(ChannelNumber::new(44, 12).to_string(), "44.12");
    }

    #[test]
    fn test_parse_malformed_channel_number() {
        for raw in ["7", "5.", ".1", "5.1.2", "a.1", "5. 1", "-5.1", ""] {
            assert_eq!(
                raw.parse::<ChannelNumber>(),
                Err(LineupError::MalformedChannelNumber(raw.to_string())),
                "{raw:?} should be rejected",
            );
        }
    }

    #[test]
    fn test_channel_number_ordering_is_numeric() {
        let mut numbers = vec![
            ChannelNumber::new(10, 1),
            ChannelNumber::new(9, 2),
            ChannelNumber::new(9, 10),
            ChannelNumber::new(2, 1),
        ];
        numbers.sort();

        assert_eq!(
            numbers,
            vec![
                ChannelNumber::new(2, 1),
                ChannelNumber::new(9, 2),
                ChannelNumber::new(9, 10),
                ChannelNumber::new(10, 1),
            ],
        );
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(Flag::parse(Some("1")), Some(Flag::On));
        assert_eq!(Flag::parse(Some("0")), Some(Flag::Off));
        assert_eq!(Flag::parse(Some(" 2 ")), Some(Flag::On));
        assert_eq!(Flag::parse(Some("2")), Some(Flag::On));
        assert_eq!(Flag::parse(Some("-1")), Some(Flag::Off));
        assert_eq!(Flag::parse(Some("TRUE")), Some(Flag::On));
        assert_eq!(Flag::parse(Some("no")), Some(Flag::Off));
        assert_eq!(Flag::parse(Some("")), Some(Flag::Off));
        assert_eq!(Flag::parse(None), Some(Flag::Off));
        assert_eq!(Flag::parse(Some("maybe")), None);
    }

    #[test]
    fn test_selection_agreement() {
        assert!(Selection::Listed(Flag::On).agrees_with(Flag::On));
        assert!(!Selection::Listed(Flag::Off).agrees_with(Flag::On));
        assert!(!Selection::Missing.agrees_with(Flag::On));
        assert!(!Selection::Missing.agrees_with(Flag::Off));

        assert_eq!(Selection::Listed(Flag::Off).to_string(), "0");
        assert_eq!(Selection::Missing.to_string(), "missing");
    }
}
