use std::error;

use derive_more::Display;
use phf::phf_map;

/// The numeral the game-mode property carries for a Go record.
const GO_GAME_MODE: &str = "1";

/// The game variant a record declares through its `GM` property. Only Go is
/// supported; every other numeral is rejected at build time.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum GameMode {
    #[display("weiqi")]
    Weiqi,
}

impl GameMode {
    /// Parse the raw `GM` value. Surrounding whitespace is tolerated, since
    /// real records wrap values over several lines.
    pub fn parse(raw: &str) -> Result<Self, UnsupportedGameModeError> {
        if raw.trim() == GO_GAME_MODE {
            Ok(GameMode::Weiqi)
        } else {
            Err(UnsupportedGameModeError {
                value: raw.to_owned(),
            })
        }
    }

    /// The value text the mode serializes back to.
    pub fn stringify(&self) -> &'static str {
        match self {
            GameMode::Weiqi => GO_GAME_MODE,
        }
    }
}

/// An error raised when the game-mode property names a game variant other
/// than Go.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("unsupported game mode {:?}, only weiqi (GM[1]) records are handled", value)]
pub struct UnsupportedGameModeError {
    pub value: String,
}

impl error::Error for UnsupportedGameModeError {}

/// A metadata field the registry knows. Each variant corresponds to one
/// two-letter property code; everything else lands in the unknown bag of
/// [GameMeta] untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    /// `GM`, the game mode numeral
    GameMode,
    /// `CA`, the character set of the record
    Charset,
    /// `FF`, the file format version
    FileFormat,
    /// `AP`, the application that generated the record
    Application,
    /// `SZ`, the board size
    Size,
    /// `PB`, name of the black player
    BlackName,
    /// `PW`, name of the white player
    WhiteName,
    /// `BR`, rank of the black player
    BlackRank,
    /// `WR`, rank of the white player
    WhiteRank,
    /// `KM`, the komi
    Komi,
    /// `HA`, the handicap stone count
    Handicap,
    /// `DT`, the date of the game
    Date,
    /// `TM`, the time limit
    TimeLimit,
    /// `RE`, the result
    Result,
    /// `EV`, the event name
    Event,
    /// `RO`, the round within the event
    Round,
    /// `PC`, the place (or server) of the game
    Place,
    /// `RU`, the rule set name, Chinese/Japanese/Korean/etc.
    RuleSet,
    /// `GN`, the name of the game
    GameName,
    /// `ON`, the opening description
    Opening,
    /// `SO`, where the record comes from
    Source,
    /// `US`, the name of the recorder
    Recorder,
    /// `AN`, the name of the annotator
    Annotator,
    /// `CP`, the copyright notice
    Copyright,
    /// `GC`, a free-form remark about the game
    Remark,
}

/// Every known field, in registry declaration order. Serialization emits
/// populated fields in exactly this order, before any unknown fields.
pub const FIELD_ORDER: [MetaField; 25] = [
    MetaField::GameMode,
    MetaField::Charset,
    MetaField::FileFormat,
    MetaField::Application,
    MetaField::Size,
    MetaField::BlackName,
    MetaField::WhiteName,
    MetaField::BlackRank,
    MetaField::WhiteRank,
    MetaField::Komi,
    MetaField::Handicap,
    MetaField::Date,
    MetaField::TimeLimit,
    MetaField::Result,
    MetaField::Event,
    MetaField::Round,
    MetaField::Place,
    MetaField::RuleSet,
    MetaField::GameName,
    MetaField::Opening,
    MetaField::Source,
    MetaField::Recorder,
    MetaField::Annotator,
    MetaField::Copyright,
    MetaField::Remark,
];

/// Property code -> field lookup for the replay builder.
pub static REGISTRY: phf::Map<&'static str, MetaField> = phf_map! {
    "GM" => MetaField::GameMode,
    "CA" => MetaField::Charset,
    "FF" => MetaField::FileFormat,
    "AP" => MetaField::Application,
    "SZ" => MetaField::Size,
    "PB" => MetaField::BlackName,
    "PW" => MetaField::WhiteName,
    "BR" => MetaField::BlackRank,
    "WR" => MetaField::WhiteRank,
    "KM" => MetaField::Komi,
    "HA" => MetaField::Handicap,
    "DT" => MetaField::Date,
    "TM" => MetaField::TimeLimit,
    "RE" => MetaField::Result,
    "EV" => MetaField::Event,
    "RO" => MetaField::Round,
    "PC" => MetaField::Place,
    "RU" => MetaField::RuleSet,
    "GN" => MetaField::GameName,
    "ON" => MetaField::Opening,
    "SO" => MetaField::Source,
    "US" => MetaField::Recorder,
    "AN" => MetaField::Annotator,
    "CP" => MetaField::Copyright,
    "GC" => MetaField::Remark,
};

impl MetaField {
    /// The two-letter property code of the field.
    pub fn code(&self) -> &'static str {
        match self {
            MetaField::GameMode => "GM",
            MetaField::Charset => "CA",
            MetaField::FileFormat => "FF",
            MetaField::Application => "AP",
            MetaField::Size => "SZ",
            MetaField::BlackName => "PB",
            MetaField::WhiteName => "PW",
            MetaField::BlackRank => "BR",
            MetaField::WhiteRank => "WR",
            MetaField::Komi => "KM",
            MetaField::Handicap => "HA",
            MetaField::Date => "DT",
            MetaField::TimeLimit => "TM",
            MetaField::Result => "RE",
            MetaField::Event => "EV",
            MetaField::Round => "RO",
            MetaField::Place => "PC",
            MetaField::RuleSet => "RU",
            MetaField::GameName => "GN",
            MetaField::Opening => "ON",
            MetaField::Source => "SO",
            MetaField::Recorder => "US",
            MetaField::Annotator => "AN",
            MetaField::Copyright => "CP",
            MetaField::Remark => "GC",
        }
    }
}

/// The metadata of one game record: one typed slot per registry field, plus
/// a bag for codes the registry does not know. Unknown properties pass
/// through verbatim, in encounter order, so unsupported and future fields
/// survive a build/serialize cycle unharmed.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GameMeta {
    pub game_mode: Option<GameMode>,
    pub charset: Option<String>,
    pub file_format: Option<String>,
    pub application: Option<String>,
    pub size: Option<String>,
    pub black_name: Option<String>,
    pub white_name: Option<String>,
    pub black_rank: Option<String>,
    pub white_rank: Option<String>,
    pub komi: Option<String>,
    pub handicap: Option<String>,
    pub date: Option<String>,
    pub time_limit: Option<String>,
    pub result: Option<String>,
    pub event: Option<String>,
    pub round: Option<String>,
    pub place: Option<String>,
    pub rule_set: Option<String>,
    pub game_name: Option<String>,
    pub opening: Option<String>,
    pub source: Option<String>,
    pub recorder: Option<String>,
    pub annotator: Option<String>,
    pub copyright: Option<String>,
    pub remark: Option<String>,
    /// Properties the registry does not know, verbatim, in encounter order.
    pub unknown: Vec<(String, String)>,
}

impl GameMeta {
    /// Store a raw value under a known field, parsing where the field
    /// demands it. Only the game mode actually validates; every other known
    /// field is kept as its verbatim value text.
    pub fn set(&mut self, field: MetaField, raw: &str) -> Result<(), UnsupportedGameModeError> {
        let slot = match field {
            MetaField::GameMode => {
                self.game_mode = Some(GameMode::parse(raw)?);
                return Ok(());
            }
            MetaField::Charset => &mut self.charset,
            MetaField::FileFormat => &mut self.file_format,
            MetaField::Application => &mut self.application,
            MetaField::Size => &mut self.size,
            MetaField::BlackName => &mut self.black_name,
            MetaField::WhiteName => &mut self.white_name,
            MetaField::BlackRank => &mut self.black_rank,
            MetaField::WhiteRank => &mut self.white_rank,
            MetaField::Komi => &mut self.komi,
            MetaField::Handicap => &mut self.handicap,
            MetaField::Date => &mut self.date,
            MetaField::TimeLimit => &mut self.time_limit,
            MetaField::Result => &mut self.result,
            MetaField::Event => &mut self.event,
            MetaField::Round => &mut self.round,
            MetaField::Place => &mut self.place,
            MetaField::RuleSet => &mut self.rule_set,
            MetaField::GameName => &mut self.game_name,
            MetaField::Opening => &mut self.opening,
            MetaField::Source => &mut self.source,
            MetaField::Recorder => &mut self.recorder,
            MetaField::Annotator => &mut self.annotator,
            MetaField::Copyright => &mut self.copyright,
            MetaField::Remark => &mut self.remark,
        };
        *slot = Some(raw.to_owned());
        Ok(())
    }

    /// The stored value of a known field, stringified for serialization, or
    /// [None] if the field was never populated.
    pub fn get(&self, field: MetaField) -> Option<String> {
        match field {
            MetaField::GameMode => self.game_mode.map(|mode| mode.stringify().to_owned()),
            MetaField::Charset => self.charset.clone(),
            MetaField::FileFormat => self.file_format.clone(),
            MetaField::Application => self.application.clone(),
            MetaField::Size => self.size.clone(),
            MetaField::BlackName => self.black_name.clone(),
            MetaField::WhiteName => self.white_name.clone(),
            MetaField::BlackRank => self.black_rank.clone(),
            MetaField::WhiteRank => self.white_rank.clone(),
            MetaField::Komi => self.komi.clone(),
            MetaField::Handicap => self.handicap.clone(),
            MetaField::Date => self.date.clone(),
            MetaField::TimeLimit => self.time_limit.clone(),
            MetaField::Result => self.result.clone(),
            MetaField::Event => self.event.clone(),
            MetaField::Round => self.round.clone(),
            MetaField::Place => self.place.clone(),
            MetaField::RuleSet => self.rule_set.clone(),
            MetaField::GameName => self.game_name.clone(),
            MetaField::Opening => self.opening.clone(),
            MetaField::Source => self.source.clone(),
            MetaField::Recorder => self.recorder.clone(),
            MetaField::Annotator => self.annotator.clone(),
            MetaField::Copyright => self.copyright.clone(),
            MetaField::Remark => self.remark.clone(),
        }
    }

    /// Store an unknown property verbatim. A repeated code overwrites its
    /// value in place, keeping the first-encounter position in the output
    /// order.
    pub fn set_unknown(&mut self, code: &str, raw: &str) {
        if let Some(entry) = self.unknown.iter_mut().find(|(known, _)| known == code) {
            entry.1 = raw.to_owned();
        } else {
            self.unknown.push((code.to_owned(), raw.to_owned()));
        }
    }

    /// Look up an unknown property by its code.
    pub fn unknown(&self, code: &str) -> Option<&str> {
        self.unknown
            .iter()
            .find(|(known, _)| known == code)
            .map(|(_, value)| value.as_str())
    }
}
