//! Event Player
//!
//! Replays a finalized subtree through the event protocol, the inverse of
//! the builder. The walk is iterative: the node array is already in
//! preorder, so playback is a forward scan with a stack of open containers
//! that closes each one when a node at its depth or shallower shows up.

use super::handler::{EventHandler, TypeRef};
use crate::config::EventOptions;
use crate::dom::{DocumentView, InScopeNamespaces, NodeData, NodeId};

/// Replay the subtree rooted at `id`.
///
/// With `preserve_namespaces`, the top-level element reports every binding
/// in scope (without the implicit `xml` one) and nested elements report
/// their stored declarations. Without `preserve_type`, elements and
/// attributes report `xs:untyped` and `xs:untypedAtomic`.
pub fn node_events<H>(
    view: &DocumentView<'_>,
    id: NodeId,
    handler: &mut H,
    options: EventOptions,
) -> Result<(), H::Error>
where
    H: EventHandler + ?Sized,
{
    let Some(root) = view.node(id) else {
        return Ok(());
    };
    if root.is_marker() {
        return Ok(());
    }

    let mut open: Vec<NodeId> = Vec::new();
    let mut pos = id;
    loop {
        let node = match view.node(pos) {
            Some(node) if !node.is_marker() && (pos == id || node.depth > root.depth) => node,
            _ => break,
        };
        while let Some(&top) = open.last() {
            if view.nodes()[top as usize].depth < node.depth {
                break;
            }
            open.pop();
            close(view, top, handler, options)?;
        }
        start(view, pos, pos == id, handler, options)?;
        if node.is_container() {
            open.push(pos);
        }
        pos += 1;
    }
    while let Some(top) = open.pop() {
        close(view, top, handler, options)?;
    }
    Ok(())
}

fn start<H>(
    view: &DocumentView<'_>,
    id: NodeId,
    top_level: bool,
    handler: &mut H,
    options: EventOptions,
) -> Result<(), H::Error>
where
    H: EventHandler + ?Sized,
{
    let node = &view.nodes()[id as usize];
    match node.data {
        NodeData::Document { uri, encoding } => handler.start_document(view.str(uri), view.str(encoding)),
        NodeData::Element { name, .. } => {
            handler.start_element(view.str(name.prefix), view.str(name.uri), view.str(name.local))?;
            for (_, attr) in view.attribute_run(id) {
                let type_name = if options.preserve_type {
                    TypeRef::new(view.str(attr.type_name.uri), view.str(attr.type_name.local))
                } else {
                    TypeRef::UNTYPED_ATOMIC
                };
                handler.attribute(
                    view.str(attr.name.prefix),
                    view.str(attr.name.uri),
                    view.str(attr.name.local),
                    view.str(attr.value),
                    Some(type_name),
                )?;
            }
            if !options.preserve_namespaces {
                return Ok(());
            }
            if top_level {
                let mut inherited = InScopeNamespaces::new(id, false);
                while let Some(binding) = inherited.next(view) {
                    handler.namespace(view.str(binding.prefix), view.str(binding.uri))?;
                }
            } else {
                for (_, decl) in view.namespace_run(id) {
                    handler.namespace(view.str(decl.prefix), view.str(decl.uri))?;
                }
            }
            Ok(())
        }
        NodeData::Text { value } => handler.text(view.str(value)),
        NodeData::Comment { value } => handler.comment(view.str(value)),
        NodeData::ProcessingInstruction { target, value } => {
            handler.processing_instruction(view.str(target), view.str(value))
        }
        NodeData::Marker => Ok(()),
    }
}

fn close<H>(view: &DocumentView<'_>, id: NodeId, handler: &mut H, options: EventOptions) -> Result<(), H::Error>
where
    H: EventHandler + ?Sized,
{
    match view.nodes()[id as usize].data {
        NodeData::Document { .. } => handler.end_document(),
        NodeData::Element { name, type_name, .. } => {
            let type_name = if options.preserve_type {
                TypeRef::new(view.str(type_name.uri), view.str(type_name.local))
            } else {
                TypeRef::UNTYPED
            };
            handler.end_element(
                view.str(name.prefix),
                view.str(name.uri),
                view.str(name.local),
                Some(type_name),
            )
        }
        _ => Ok(()),
    }
}
