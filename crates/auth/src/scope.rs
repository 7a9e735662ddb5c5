//! Node-scope enforcement.

use campus_core::NodeId;

use crate::Role;

/// Decide whether a caller may act on a target organizational node.
///
/// A tenant-global administrator (ADMIN role, no node assignment) always
/// passes; this is the only unconditional bypass. Everyone else needs an
/// exact node match — no hierarchy traversal happens at this layer.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn can_access_node(
    acting_role: &Role,
    acting_node: Option<NodeId>,
    target_node: NodeId,
) -> bool {
    if acting_role.is_admin() && acting_node.is_none() {
        return true;
    }

    acting_node == Some(target_node)
}
