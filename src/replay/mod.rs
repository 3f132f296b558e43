use derive_more::Display;

use super::{
    coords::Point,
    error::SgfError,
    registry::GameMeta,
    sgf::{parse, SgfNode},
};

/// A submodule that provides the replay builder, which walks a parsed game
/// group's flattened property stream and produces the ordered [Step] list.
mod builder;
pub use builder::{build, build_all, OrderingError, COMMENT_SEPARATOR};

/// A submodule that provides the replay serializer, the exact inverse of the
/// builder: it turns a [GameRecord] back into a syntax tree group.
mod serializer;
pub use serializer::{serialize, serialize_all};

/// The stone color, displayed as its move property code.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Player {
    #[display("B")]
    Black,
    #[display("W")]
    White,
}

impl Player {
    /// The move property code of the color.
    pub fn move_code(&self) -> &'static str {
        match self {
            Player::Black => "B",
            Player::White => "W",
        }
    }

    /// The setup ("add stones") property code of the color.
    pub fn setup_code(&self) -> &'static str {
        match self {
            Player::Black => "AB",
            Player::White => "AW",
        }
    }

    fn from_move_code(code: &str) -> Option<Player> {
        match code {
            "B" => Some(Player::Black),
            "W" => Some(Player::White),
            _ => None,
        }
    }

    fn from_setup_code(code: &str) -> Option<Player> {
        match code {
            "AB" => Some(Player::Black),
            "AW" => Some(Player::White),
            _ => None,
        }
    }
}

/// One played move. A move without a point is a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Move {
    pub player: Player,
    pub point: Option<Point>,
}

/// One stone placed on the board before play begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InitialStone {
    pub player: Player,
    pub point: Point,
}

/// An alternate continuation attached to a step: a full nested step list,
/// indexed from 0 independently of its parent.
pub type Branch = Vec<Step>;

/// One unit of the replay. Step 0 of every line is the synthetic setup step
/// (`mov == None`); `setup` is only ever populated there. Identity is purely
/// positional: a step is its index, a branch is its slot in `branches`.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Step {
    pub setup: Vec<InitialStone>,
    pub mov: Option<Move>,
    pub comment: Option<String>,
    pub branches: Vec<Branch>,
}

/// A fully decoded game: registry-mapped metadata plus the ordered step
/// list, branches included. Built fresh from a syntax tree by [build],
/// freely mutable afterwards, and converted back on demand by [serialize];
/// the two directions are independent pure functions, not a live binding.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GameRecord {
    pub meta: GameMeta,
    pub steps: Vec<Step>,
}

/// Parse a record text into its first game.
pub fn parse_record(text: &str) -> Result<GameRecord, SgfError> {
    let mut records = parse_records(text)?;
    if records.is_empty() {
        return Err(SgfError::EmptyRecord);
    }
    Ok(records.swap_remove(0))
}

/// Parse a record text into every game it holds, one [GameRecord] per
/// toplevel group.
pub fn parse_records(text: &str) -> Result<Vec<GameRecord>, SgfError> {
    let root = parse(text)?;
    build_all(&root)
}

/// Serialize a game back into record text. Fallible, since a caller-mutated
/// record can hold points outside the supported board extent.
pub fn serialize_record(record: &GameRecord) -> Result<String, SgfError> {
    Ok(serialize(record)?.to_string())
}

/// Serialize several games into one record text, back to back.
pub fn serialize_records(records: &[GameRecord]) -> Result<String, SgfError> {
    let mut games = Vec::with_capacity(records.len());
    for record in records {
        games.push(serialize(record)?);
    }
    Ok(SgfNode::Root(games).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_takes_first_game() {
        let record = parse_record("(;GM[1]PB[first])(;GM[1]PB[second])").unwrap();
        assert_eq!(record.meta.black_name.as_deref(), Some("first"));
    }

    #[test]
    fn test_parse_record_empty_input() {
        assert!(matches!(
            parse_record("  \n ").unwrap_err(),
            SgfError::EmptyRecord
        ));
        assert!(matches!(
            parse_record("").unwrap_err(),
            SgfError::EmptyRecord
        ));
    }

    #[test]
    fn test_multi_game_cycle() -> Result<(), SgfError> {
        let records = parse_records("(;GM[1];B[aa])(;GM[1];W[bb])")?;
        assert_eq!(records.len(), 2);
        let text = serialize_records(&records)?;
        assert_eq!(text, "(;GM[1];B[aa])(;GM[1];W[bb])");
        Ok(())
    }

    #[test]
    fn test_canonical_form_is_stable() -> Result<(), SgfError> {
        // whitespace and value padding canonicalize on the first cycle and
        // are stable from then on
        let source = "(;GM[ 1 ] SZ[19]\n;B[pd] ;W[dp])";
        let once = serialize_record(&parse_record(source)?)?;
        let twice = serialize_record(&parse_record(&once)?)?;
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn test_serialize_rejects_out_of_range_point() {
        let mut record = parse_record("(;GM[1];B[aa])").unwrap();
        record.steps[1].mov.as_mut().unwrap().point = Some(Point { x: 60, y: 1 });
        assert!(matches!(
            serialize_record(&record).unwrap_err(),
            SgfError::Range(_)
        ));
    }
}
