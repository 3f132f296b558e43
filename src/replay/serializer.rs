use super::{
    super::{
        coords::encode_point,
        error::SgfError,
        registry::{GameMeta, FIELD_ORDER},
        sgf::SgfNode,
    },
    GameRecord, Step,
};

/// Serialize a game record into its syntax tree group, the exact inverse of
/// [build](super::build). The output is canonical: no whitespace leaves, one
/// segment per step, metadata in registry declaration order, setup stones
/// one property per stone (expanded points are never re-compressed into
/// rectangle shorthand).
pub fn serialize(record: &GameRecord) -> Result<SgfNode, SgfError> {
    serialize_line(&record.steps, Some(&record.meta))
}

/// Serialize several records into a full [SgfNode::Root] forest.
pub fn serialize_all(records: &[GameRecord]) -> Result<SgfNode, SgfError> {
    let mut games = Vec::with_capacity(records.len());
    for record in records {
        games.push(serialize(record)?);
    }
    Ok(SgfNode::Root(games))
}

/// Serialize one line of play into a group, one segment per step. `meta` is
/// present only on the root line; the metadata segment is its step 0.
fn serialize_line(steps: &[Step], meta: Option<&GameMeta>) -> Result<SgfNode, SgfError> {
    let mut segments = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        let mut children = Vec::new();
        if index == 0 {
            if let Some(meta) = meta {
                emit_meta(&mut children, meta);
            }
        }
        emit_step(&mut children, step)?;
        segments.push(SgfNode::Segment {
            children,
            implicit: false,
        });
    }
    Ok(SgfNode::Group(segments))
}

/// Emit the populated metadata fields in registry declaration order, then
/// the unknown fields in their original encounter order.
fn emit_meta(children: &mut Vec<SgfNode>, meta: &GameMeta) {
    for field in FIELD_ORDER {
        if let Some(value) = meta.get(field) {
            children.push(property(field.code(), vec![value]));
        }
    }
    for (code, value) in &meta.unknown {
        children.push(property(code, vec![value.clone()]));
    }
}

/// Emit one step's own properties, then its branches as nested groups.
fn emit_step(children: &mut Vec<SgfNode>, step: &Step) -> Result<(), SgfError> {
    for stone in &step.setup {
        children.push(property(
            stone.player.setup_code(),
            vec![encode_point(stone.point)?],
        ));
    }
    if let Some(mov) = &step.mov {
        let value = match mov.point {
            Some(point) => encode_point(point)?,
            None => String::new(), // a pass serializes as an empty value
        };
        children.push(property(mov.player.move_code(), vec![value]));
    }
    if let Some(comment) = &step.comment {
        children.push(property("C", vec![comment.clone()]));
    }
    for branch in &step.branches {
        children.push(serialize_line(branch, None)?);
    }
    Ok(())
}

fn property(code: &str, values: Vec<String>) -> SgfNode {
    let mut children = Vec::with_capacity(1 + values.len());
    children.push(SgfNode::Token(code.to_owned()));
    children.extend(values.into_iter().map(SgfNode::Value));
    SgfNode::Property(children)
}

#[cfg(test)]
mod tests {
    use super::{
        super::{super::sgf::parse, build_all},
        *,
    };

    fn cycle(text: &str) -> String {
        let root = parse(text).unwrap();
        let records = build_all(&root).unwrap();
        serialize(&records[0]).unwrap().to_string()
    }

    #[test]
    fn test_simple_record() {
        assert_eq!(cycle("(;GM[1]SZ[19];B[aa])"), "(;GM[1]SZ[19];B[aa])");
    }

    #[test]
    fn test_metadata_order_is_registry_order() {
        // fields come back in declaration order no matter the source order
        assert_eq!(
            cycle("(;SZ[19]PB[black]GM[1])"),
            "(;GM[1]SZ[19]PB[black])"
        );
    }

    #[test]
    fn test_unknown_fields_after_known() {
        assert_eq!(
            cycle("(;XX[hello]GM[1]YY[world])"),
            "(;GM[1]XX[hello]YY[world])"
        );
    }

    #[test]
    fn test_branches() {
        assert_eq!(
            cycle("(;GM[1];B[pd](;W[qf])(;W[pf]))"),
            "(;GM[1];B[pd](;;W[qf])(;;W[pf]))"
        );
    }

    #[test]
    fn test_pass_and_comment() {
        assert_eq!(
            cycle("(;GM[1];B[]C[a pass])"),
            "(;GM[1];B[]C[a pass])"
        );
    }

    #[test]
    fn test_area_expands_and_stays_expanded() {
        // the rectangle comes back as individual stones, never as shorthand
        assert_eq!(
            cycle("(;GM[1]AW[aa][bb:cc])"),
            "(;GM[1]AW[aa]AW[bb]AW[bc]AW[cb]AW[cc])"
        );
    }

    #[test]
    fn test_model_idempotence() {
        // the second application of the full cycle is byte-stable
        for source in [
            "(;GM[1]SZ[19];B[aa])",
            "(;GM[1];B[pd](;W[qf])(;W[pf]))",
            "(;GM[1]AW[aa][bb:cc];B[dd]C[ padded comment ])",
            "(;XX[hello])",
            "( ;GM[ 1 ]\n;B[aa] ;W[])",
        ] {
            let once = cycle(source);
            assert_eq!(cycle(&once), once, "cycle not stable for {:?}", source);
        }
    }

    #[test]
    fn test_forest_serialization() {
        let root = parse("(;GM[1];B[aa])(;GM[1];W[bb])").unwrap();
        let records = build_all(&root).unwrap();
        let forest = serialize_all(&records).unwrap();
        assert_eq!(forest.to_string(), "(;GM[1];B[aa])(;GM[1];W[bb])");
    }
}
