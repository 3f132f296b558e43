/// The domain layer: the branching replay model and the two conversions
/// between it and the syntax tree.
///
/// ## Getting Started
///
/// The facade for the entire crate is the pair of [replay::parse_record] and
/// [replay::serialize_record] functions (re-exported at the crate root).
/// Parsing decodes a record text all the way into a [replay::GameRecord];
/// serializing walks the model back out into canonical record text.
///
/// ## The two layers
///
/// Underneath, the [sgf] module holds the lossless format layer: parsing a
/// text and formatting the resulting tree reproduces the input byte for
/// byte, whitespace included. The replay layer trades that losslessness for
/// meaning, so its output is canonical rather than byte-identical to
/// arbitrary input; a second parse/serialize cycle is always byte-stable.
///
/// ## Example
///
/// ```rust
/// use sgf_replay::{parse_record, serialize_record};
///
/// let record = parse_record("(;GM[1]SZ[19];B[pd])").unwrap();
/// assert_eq!(record.steps.len(), 2);
/// assert_eq!(serialize_record(&record).unwrap(), "(;GM[1]SZ[19];B[pd])");
/// ```
pub mod replay;

/// The lossless format layer: the syntax tree, the character-class state
/// machine producing it, and the stringifier reversing it.
pub mod sgf;

/// Board coordinate codec: axis letters to 1-based indices and back, plus
/// one-way rectangle shorthand expansion.
pub mod coords;

/// The static property registry: every known two-letter metadata code, its
/// typed slot on the metadata struct, and the serialization order.
pub mod registry;

mod error;
pub use error::SgfError;

pub use replay::{
    parse_record, parse_records, serialize_record, serialize_records, GameRecord, Step,
};
