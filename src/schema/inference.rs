// Type inference for schemasketch
//
// Schemas frequently leave out `type` and rely on the shape keywords instead.
// Before a node is synthesized or rendered its missing type is backfilled from
// those keywords.

use crate::schema::types::{SchemaNode, SchemaType};

/// Infers a missing type from the node's shape.
///
/// Declares `array` when `items` is present, otherwise `object` when
/// properties or `additionalProperties` are present. Nodes with a declared
/// type are left alone. The backfill is written at most once; concurrent or
/// repeated calls compute the same value and the later writes are dropped.
pub fn infer_type(node: &SchemaNode) {
    if !node.types.is_empty() || node.inferred_type.get().is_some() {
        return;
    }
    if let Some(inferred) = shape_type(node) {
        // A losing racer wrote the same value
        let _ = node.inferred_type.set(inferred);
    }
}

fn shape_type(node: &SchemaNode) -> Option<SchemaType> {
    if node.items.is_some() {
        Some(SchemaType::Array)
    } else if !node.properties.is_empty() || node.additional_properties.is_some() {
        Some(SchemaType::Object)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{AdditionalProperties, NodeId, SchemaRef};

    #[test]
    fn test_infer_array_from_items() {
        let mut node = SchemaNode::default();
        node.items = Some(SchemaRef::Node(NodeId(1)));
        infer_type(&node);
        assert_eq!(node.effective_types(), &[SchemaType::Array]);
        assert!(node.types.is_empty());
    }

    #[test]
    fn test_infer_object_from_properties() {
        let mut node = SchemaNode::default();
        node.properties.insert("a".to_string(), SchemaRef::Node(NodeId(1)));
        infer_type(&node);
        assert_eq!(node.primary_type(), Some(SchemaType::Object));
    }

    #[test]
    fn test_infer_object_from_additional_properties() {
        let mut node = SchemaNode::default();
        node.additional_properties = Some(AdditionalProperties::Allowed(true));
        infer_type(&node);
        assert_eq!(node.primary_type(), Some(SchemaType::Object));
    }

    #[test]
    fn test_items_win_over_properties() {
        let mut node = SchemaNode::default();
        node.items = Some(SchemaRef::Node(NodeId(1)));
        node.properties.insert("a".to_string(), SchemaRef::Node(NodeId(2)));
        infer_type(&node);
        assert_eq!(node.primary_type(), Some(SchemaType::Array));
    }

    #[test]
    fn test_declared_type_is_kept() {
        let mut node = SchemaNode::default();
        node.types = vec![SchemaType::String];
        node.items = Some(SchemaRef::Node(NodeId(1)));
        infer_type(&node);
        assert_eq!(node.effective_types(), &[SchemaType::String]);
    }

    #[test]
    fn test_inference_is_idempotent() {
        let mut node = SchemaNode::default();
        node.items = Some(SchemaRef::Node(NodeId(1)));
        infer_type(&node);
        infer_type(&node);
        assert_eq!(node.effective_types(), &[SchemaType::Array]);
    }

    #[test]
    fn test_nothing_to_infer() {
        let node = SchemaNode::default();
        infer_type(&node);
        assert!(node.effective_types().is_empty());
    }
}
