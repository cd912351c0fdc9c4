//! CFG walker.

use strider_ir::NodeId;

use crate::{ExecResult, Exec, FrameRef};

/// Drive one activation from `entry` until no successor remains.
///
/// After each operation: a node without `fnext` always continues at
/// `tnext`; otherwise its own result, read back through the resolver, picks
/// the branch.
pub fn run_cfg(cx: &Exec<'_>, entry: Option<NodeId>, frame: &FrameRef) -> ExecResult {
    let program = cx.program();
    let mut next = entry;
    while let Some(id) = next {
        let node = program.node(id);
        tracing::trace!(node = %id, kind = %node.kind, depth = cx.depth(), "step");
        (program.op(id))(cx, id, frame)?;
        next = match node.fnext {
            None => node.tnext,
            Some(on_false) => {
                if cx.value(id, frame)?.as_bool("branch")? {
                    node.tnext
                } else {
                    Some(on_false)
                }
            }
        };
    }
    Ok(())
}
