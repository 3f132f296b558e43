use std::error;

use derive_more::Display;

use super::node::{NodeKind, SgfNode};

/// An error raised when a character appears where the state machine has no
/// valid transition: `;` or `)` at the toplevel, a bracket outside a value
/// context, an unmatched closer, or a `(`/`[` left open at end of input.
/// Carries the byte offset of the offending character.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("unexpected character {:?} at byte {}", character, position)]
pub struct StructuralError {
    pub position: usize,
    pub character: char,
}

impl error::Error for StructuralError {}

/// The class of an input character, as far as the state machine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Whitespace,
    /// `;`
    SegmentMark,
    /// `(`
    GroupOpen,
    /// `)`
    GroupClose,
    /// `[`
    ValueOpen,
    /// `]`
    ValueClose,
    Other,
}

impl CharClass {
    fn of(character: char) -> Self {
        if character.is_whitespace() {
            return CharClass::Whitespace;
        }
        match character {
            ';' => CharClass::SegmentMark,
            '(' => CharClass::GroupOpen,
            ')' => CharClass::GroupClose,
            '[' => CharClass::ValueOpen,
            ']' => CharClass::ValueClose,
            _ => CharClass::Other,
        }
    }
}

/// A single mutation of the construct stack. Every cell of the transition
/// table is an ordered list of these, applied left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    GroupStart,
    GroupEnd,
    SegmentStart,
    /// An implicit segment, opened by a property directly inside a group.
    SegmentDefault,
    SegmentEnd,
    PropertyStart,
    PropertyEnd,
    /// Starts a token initialized with the current character.
    TokenStart,
    TokenEnd,
    TokenAppend,
    ValueStart,
    ValueEnd,
    ValueAppend,
    /// Appends a whitespace leaf under the current top without pushing.
    WhitecharInsert,
}

/// The transition table. The state is the kind of the node on top of the
/// construct stack; `Err` cells abort the parse. The match is exhaustive so
/// every (state, class) pairing is accounted for at compile time.
fn transitions(state: NodeKind, class: CharClass) -> Result<&'static [Action], ()> {
    use Action::*;
    use CharClass::*;
    match (state, class) {
        (NodeKind::Root, Whitespace) => Ok(&[WhitecharInsert]),
        (NodeKind::Root, GroupOpen) => Ok(&[GroupStart]),
        (NodeKind::Root, _) => Err(()),

        (NodeKind::Segment, Whitespace) => Ok(&[WhitecharInsert]),
        (NodeKind::Segment, SegmentMark) => Ok(&[SegmentEnd, SegmentStart]),
        (NodeKind::Segment, GroupOpen) => Ok(&[GroupStart]),
        (NodeKind::Segment, GroupClose) => Ok(&[SegmentEnd, GroupEnd]),
        (NodeKind::Segment, ValueOpen | ValueClose) => Err(()),
        (NodeKind::Segment, Other) => Ok(&[PropertyStart, TokenStart]),

        (NodeKind::Group, Whitespace) => Ok(&[WhitecharInsert]),
        (NodeKind::Group, SegmentMark) => Ok(&[SegmentStart]),
        (NodeKind::Group, GroupOpen) => Err(()),
        (NodeKind::Group, GroupClose) => Ok(&[GroupEnd]),
        (NodeKind::Group, ValueOpen | ValueClose) => Err(()),
        (NodeKind::Group, Other) => Ok(&[SegmentDefault, PropertyStart, TokenStart]),

        (NodeKind::Property, Whitespace) => Ok(&[WhitecharInsert]),
        (NodeKind::Property, SegmentMark) => Ok(&[PropertyEnd, SegmentEnd, SegmentStart]),
        (NodeKind::Property, GroupOpen) => Ok(&[PropertyEnd, GroupStart]),
        (NodeKind::Property, GroupClose) => Ok(&[PropertyEnd, SegmentEnd, GroupEnd]),
        (NodeKind::Property, ValueOpen) => Ok(&[ValueStart]),
        (NodeKind::Property, ValueClose) => Err(()),
        (NodeKind::Property, Other) => Ok(&[PropertyEnd, PropertyStart, TokenStart]),

        (NodeKind::Token, Whitespace) => Ok(&[TokenEnd, WhitecharInsert]),
        (NodeKind::Token, GroupOpen) => Ok(&[TokenEnd, PropertyEnd, GroupStart]),
        (NodeKind::Token, GroupClose) => Ok(&[TokenEnd, PropertyEnd, SegmentEnd, GroupEnd]),
        (NodeKind::Token, ValueOpen) => Ok(&[TokenEnd, ValueStart]),
        (NodeKind::Token, ValueClose) => Err(()),
        // a `;` inside a token is token text, same as any other character
        (NodeKind::Token, SegmentMark | Other) => Ok(&[TokenAppend]),

        // inside a value only `]` has structural meaning
        (NodeKind::Value, ValueClose) => Ok(&[ValueEnd]),
        (NodeKind::Value, _) => Ok(&[ValueAppend]),

        // whitechar leaves are never pushed onto the stack
        (NodeKind::Whitechar, _) => Err(()),
    }
}

/// A stack frame for a construct still being built. Interior kinds collect
/// children, leaf kinds collect text; a frame becomes an [SgfNode] when its
/// construct ends and it is popped into its parent.
#[derive(Debug)]
struct StackEntry {
    kind: NodeKind,
    children: Vec<SgfNode>,
    text: String,
    implicit: bool,
}

impl StackEntry {
    fn new(kind: NodeKind) -> Self {
        StackEntry {
            kind,
            children: Vec::new(),
            text: String::new(),
            implicit: false,
        }
    }

    fn into_node(self) -> SgfNode {
        match self.kind {
            NodeKind::Root => SgfNode::Root(self.children),
            NodeKind::Group => SgfNode::Group(self.children),
            NodeKind::Segment => SgfNode::Segment {
                children: self.children,
                implicit: self.implicit,
            },
            NodeKind::Property => SgfNode::Property(self.children),
            NodeKind::Token => SgfNode::Token(self.text),
            NodeKind::Value => SgfNode::Value(self.text),
            NodeKind::Whitechar => SgfNode::Whitechar(self.text),
        }
    }
}

/// The parser context: an explicit, owned construct stack. Each parse gets
/// its own context, so parses are independent and safe to run concurrently
/// across threads.
struct Parser {
    stack: Vec<StackEntry>,
}

impl Parser {
    fn new() -> Self {
        Parser {
            stack: vec![StackEntry::new(NodeKind::Root)],
        }
    }

    fn state(&self) -> NodeKind {
        self.stack.last().unwrap().kind
    }

    fn push(&mut self, kind: NodeKind) {
        self.stack.push(StackEntry::new(kind));
    }

    fn pop(&mut self) {
        let entry = self.stack.pop().unwrap();
        let node = entry.into_node();
        self.stack.last_mut().unwrap().children.push(node);
    }

    fn apply(&mut self, action: Action, character: char) {
        match action {
            Action::GroupStart => self.push(NodeKind::Group),
            Action::SegmentStart => self.push(NodeKind::Segment),
            Action::SegmentDefault => {
                self.push(NodeKind::Segment);
                self.stack.last_mut().unwrap().implicit = true;
            }
            Action::PropertyStart => self.push(NodeKind::Property),
            Action::TokenStart => {
                self.push(NodeKind::Token);
                self.stack.last_mut().unwrap().text.push(character);
            }
            Action::ValueStart => self.push(NodeKind::Value),
            Action::TokenAppend | Action::ValueAppend => {
                self.stack.last_mut().unwrap().text.push(character);
            }
            Action::GroupEnd
            | Action::SegmentEnd
            | Action::PropertyEnd
            | Action::TokenEnd
            | Action::ValueEnd => self.pop(),
            Action::WhitecharInsert => {
                self.stack
                    .last_mut()
                    .unwrap()
                    .children
                    .push(SgfNode::Whitechar(character.to_string()));
            }
        }
    }

    /// Handle end of input. Tokens, properties and segments carry no closing
    /// delimiter, so they simply pop; but each of those only ever lives inside
    /// a group, so a non-empty stack always bottoms out on an open group or
    /// value, whose missing `)` or `]` the stringifier would have to invent.
    /// That is a structural fault at the input length.
    fn finish(mut self, length: usize) -> Result<SgfNode, StructuralError> {
        while self.stack.len() > 1 {
            match self.state() {
                NodeKind::Group => {
                    return Err(StructuralError {
                        position: length,
                        character: '(',
                    })
                }
                NodeKind::Value => {
                    return Err(StructuralError {
                        position: length,
                        character: '[',
                    })
                }
                _ => self.pop(),
            }
        }
        Ok(self.stack.pop().unwrap().into_node())
    }
}

/// Parse a record text into its lossless syntax tree. A single left-to-right
/// pass, O(n) in the input length, no backtracking. Returns the
/// [SgfNode::Root] holding one group per game.
pub fn parse(text: &str) -> Result<SgfNode, StructuralError> {
    let mut parser = Parser::new();
    for (position, character) in text.char_indices() {
        let actions = transitions(parser.state(), CharClass::of(character)).map_err(|()| {
            StructuralError {
                position,
                character,
            }
        })?;
        for action in actions {
            parser.apply(*action, character);
        }
    }
    parser.finish(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str) {
        let root = parse(text).unwrap();
        assert_eq!(root.to_string(), text);
    }

    #[test]
    fn test_simple_record() {
        let root = parse("(;GM[1]SZ[19];B[aa])").unwrap();
        let games = root.children().unwrap();
        assert_eq!(games.len(), 1);
        let segments = games[0].children().unwrap();
        assert_eq!(segments.len(), 2);
        let (token, values) = segments[0].children().unwrap()[0].property_parts().unwrap();
        assert_eq!(token, "GM");
        assert_eq!(values, vec!["1"]);
    }

    #[test]
    fn test_roundtrip_basic() {
        roundtrip("(;GM[1]SZ[19];B[aa])");
        roundtrip("(;GM[1];B[pd](;W[qf])(;W[pf]))");
        roundtrip("(;XX[hello])");
        roundtrip("");
    }

    #[test]
    fn test_roundtrip_whitespace() {
        roundtrip(" (;GM[1] SZ[19]\n;B[aa])\n");
        roundtrip("(;GM [1])");
        roundtrip("( ;B[aa] ( ;W[bb] ) )");
    }

    #[test]
    fn test_roundtrip_multiline_value() {
        // embedded newlines and indentation are value text, kept verbatim
        roundtrip("(;C[first line\n  second line\n\tthird])");
        roundtrip("(;GM[\n  1\n]SZ[\n  19\n])");
    }

    #[test]
    fn test_roundtrip_implicit_segment() {
        roundtrip("(GM[1])");
        roundtrip("(B[aa];W[bb])");
    }

    #[test]
    fn test_roundtrip_multi_game() {
        roundtrip("(;GM[1];B[aa])(;GM[1];B[bb])");
        roundtrip("(;B[aa])\n(;B[bb])");
    }

    #[test]
    fn test_semicolon_in_token() {
        // a `;` inside a token is plain token text
        let root = parse("(;AB;X[aa])").unwrap();
        assert_eq!(root.to_string(), "(;AB;X[aa])");
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(parse(";B[aa]").unwrap_err().position, 0);
        assert_eq!(parse(")").unwrap_err().position, 0);
        assert_eq!(parse("B[aa]").unwrap_err().position, 0);
        assert_eq!(parse("[aa]").unwrap_err().position, 0);
        assert_eq!(parse("(;B[aa]])").unwrap_err().position, 7);
        assert_eq!(parse("((;B[aa]))").unwrap_err().position, 1);
        assert_eq!(parse("(;B])").unwrap_err().position, 3);
    }

    #[test]
    fn test_unclosed_constructs() {
        let err = parse("(;B[aa]").unwrap_err();
        assert_eq!(err.position, 7);
        assert_eq!(err.character, '(');
        let err = parse("(;C[no end").unwrap_err();
        assert_eq!(err.position, 10);
        assert_eq!(err.character, '[');
    }

    #[test]
    fn test_truncated_record() {
        // a record cut off inside a segment still has its group open
        let err = parse("(;AB").unwrap_err();
        assert_eq!(err.position, 4);
        assert_eq!(err.character, '(');
    }

    #[test]
    fn test_byte_positions() {
        // positions are byte offsets, multibyte input included
        let err = parse("(;C[你好])x").unwrap_err();
        assert_eq!(err.position, "(;C[你好])".len());
    }
}
