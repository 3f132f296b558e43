/// A submodule that provides the lossless syntax tree. The parser uses
/// [SgfNode] to store every structural unit of the source text, whitespace
/// included, and the [replay](crate::replay) structures are built from these
/// nodes. The [std::fmt::Display] impl on [SgfNode] is the stringifier: it is
/// the exact structural inverse of the parser, so formatting a parsed tree
/// reproduces the source byte for byte.
mod node;
pub use node::{NodeKind, SgfNode};

/// A submodule that provides the character-class state machine producing the
/// syntax tree. The construct stack lives inside a per-parse context value,
/// so parses share nothing and can run concurrently.
mod parser;
pub use parser::{parse, StructuralError};

#[cfg(test)]
mod tests {
    use super::*;

    // adapted from a real KaTrain analysis record: multiline values, unknown
    // property codes and multi-value setup stones
    const KATRAIN_RECORD: &str = "(;GM[
  1
]FF[
  4
]SZ[
  19
]DT[
  2025-03-18
]PB[Black
]PW[White
]KM[
  7.5
]RU[Chinese
]AB[aa
][ab
][ba
]AW[ad
]PL[W
]KTV[
  1.0
]C[SGF generated by KaTrain 1.15.0
](;W[ae
]C[move 1: W A15
score: B+1.0
])(;W[en
];B[]C[move 2: B pass
]))";

    #[test]
    fn test_roundtrip_katrain_record() {
        let root = parse(KATRAIN_RECORD).unwrap();
        assert_eq!(root.to_string(), KATRAIN_RECORD);
    }

    #[test]
    fn test_branch_structure() {
        let root = parse("(;GM[1];B[pd](;W[qf])(;W[pf]))").unwrap();
        let games = root.children().unwrap();
        let segments = games[0].children().unwrap();
        assert_eq!(segments.len(), 2);
        // both variation groups hang off the segment holding the move
        let move_segment = segments[1].children().unwrap();
        assert_eq!(move_segment.len(), 3);
        assert_eq!(move_segment[0].kind(), NodeKind::Property);
        assert_eq!(move_segment[1].kind(), NodeKind::Group);
        assert_eq!(move_segment[2].kind(), NodeKind::Group);
    }

    #[test]
    fn test_leading_whitespace_at_root() {
        let root = parse(" \n(;GM[1])").unwrap();
        let children = root.children().unwrap();
        assert_eq!(children[0].kind(), NodeKind::Whitechar);
        assert_eq!(children[1].kind(), NodeKind::Whitechar);
        assert_eq!(children[2].kind(), NodeKind::Group);
        assert_eq!(root.to_string(), " \n(;GM[1])");
    }
}
