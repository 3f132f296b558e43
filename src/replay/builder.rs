use std::error;

use derive_more::Display;

use super::{
    super::{
        coords::{decode_point, decode_point_set},
        error::SgfError,
        registry::{GameMeta, REGISTRY},
        sgf::SgfNode,
    },
    GameRecord, InitialStone, Move, Player, Step,
};

/// The property code carrying step comments.
const COMMENT_CODE: &str = "C";

/// The separator joining repeated comment properties on one step.
pub const COMMENT_SEPARATOR: &str = "\n=====\n";

/// An error raised when a metadata or stone-setup property appears where the
/// replay no longer accepts it.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("property {:?} is not legal {}", code, reason)]
pub struct OrderingError {
    pub code: String,
    pub reason: &'static str,
}

impl OrderingError {
    fn new(code: &str, reason: &'static str) -> Self {
        OrderingError {
            code: code.to_owned(),
            reason,
        }
    }
}

impl error::Error for OrderingError {}

/// Build the replay of a single game from its toplevel [SgfNode::Group].
pub fn build(group: &SgfNode) -> Result<GameRecord, SgfError> {
    let mut meta = GameMeta::default();
    let steps = build_line(group, Some(&mut meta))?;
    Ok(GameRecord { meta, steps })
}

/// Build every game under a parsed [SgfNode::Root], one record per group.
/// Stray whitespace at the toplevel has no replay meaning.
pub fn build_all(root: &SgfNode) -> Result<Vec<GameRecord>, SgfError> {
    let mut records = Vec::new();
    if let Some(children) = root.children() {
        for child in children {
            if let SgfNode::Group(_) = child {
                records.push(build(child)?);
            }
        }
    }
    Ok(records)
}

/// Flatten a group's subtree into the ordered stream of property and group
/// entries. A nested segment carries no branching of its own, so its
/// properties pour into the same flat stream; whitespace leaves vanish.
fn flatten(node: &SgfNode) -> Vec<&SgfNode> {
    let mut entries = Vec::new();
    collect(node, &mut entries);
    entries
}

fn collect<'a>(node: &'a SgfNode, entries: &mut Vec<&'a SgfNode>) {
    if let Some(children) = node.children() {
        for child in children {
            match child {
                SgfNode::Property(_) | SgfNode::Group(_) => entries.push(child),
                _ => collect(child, entries),
            }
        }
    }
}

/// Build one line of play. `meta` is present only on the root line; branches
/// carry neither metadata nor setup stones.
fn build_line(group: &SgfNode, mut meta: Option<&mut GameMeta>) -> Result<Vec<Step>, SgfError> {
    let mut steps = vec![Step::default()];
    for entry in flatten(group) {
        match entry {
            SgfNode::Group(_) => {
                let branch = build_line(entry, None)?;
                steps.last_mut().unwrap().branches.push(branch);
            }
            SgfNode::Property(_) => {
                let (code, values) = entry.property_parts().unwrap();
                apply_property(&mut steps, meta.as_deref_mut(), code, &values)?;
            }
            _ => {}
        }
    }
    Ok(steps)
}

/// Apply one property from the flattened stream onto the step cursor.
fn apply_property(
    steps: &mut Vec<Step>,
    meta: Option<&mut GameMeta>,
    code: &str,
    values: &[&str],
) -> Result<(), SgfError> {
    if let Some(player) = Player::from_setup_code(code) {
        if steps.len() > 1 && !cfg!(feature = "permissive") {
            return Err(OrderingError::new(code, "after the first move").into());
        }
        if meta.is_none() && !cfg!(feature = "permissive") {
            return Err(OrderingError::new(code, "on a variation branch").into());
        }
        let step = steps.first_mut().unwrap();
        for value in values {
            for point in decode_point_set(value)? {
                step.setup.push(InitialStone { player, point });
            }
        }
    } else if let Some(player) = Player::from_move_code(code) {
        let point = match values.first() {
            Some(value) if !value.is_empty() => Some(decode_point(value)?),
            _ => None, // an empty or absent value is a pass
        };
        steps.push(Step {
            mov: Some(Move { player, point }),
            ..Step::default()
        });
    } else if code == COMMENT_CODE {
        let step = steps.last_mut().unwrap();
        for value in values {
            let trimmed = value.trim();
            match &mut step.comment {
                Some(comment) => {
                    comment.push_str(COMMENT_SEPARATOR);
                    comment.push_str(trimmed);
                }
                None => step.comment = Some(trimmed.to_owned()),
            }
        }
    } else {
        // everything else is game metadata, root line only, before any
        // stones or moves
        match meta {
            Some(meta) => {
                if (steps.len() > 1 || !steps[0].setup.is_empty())
                    && !cfg!(feature = "permissive")
                {
                    return Err(OrderingError::new(code, "after setup stones or moves").into());
                }
                let raw = values.first().copied().unwrap_or("");
                if let Some(field) = REGISTRY.get(code) {
                    meta.set(*field, raw)?;
                } else {
                    meta.set_unknown(code, raw);
                }
            }
            None => {
                if !cfg!(feature = "permissive") {
                    return Err(OrderingError::new(code, "on a variation branch").into());
                }
            }
        }
    }
    Ok(())
}
