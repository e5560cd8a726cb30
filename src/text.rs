use crate::document::{Node, XmlNode};

/// Reconstructs a node's text in document order, ignoring the markup between.
///
/// Each text node is trimmed and the non-empty fragments are joined with a
/// single space.
pub fn extract_node_text(node: Node<'_>) -> String {
    let mut fragments: Vec<&str> = Vec::new();
    let mut work_stack: Vec<Node<'_>> = Vec::new();
    populate_work_stack(node, &mut work_stack);

    while let Some(current) = work_stack.pop() {
        match current.value() {
            XmlNode::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    fragments.push(trimmed);
                }
            }
            _ => populate_work_stack(current, &mut work_stack),
        }
    }

    fragments.join(" ")
}

// The stack is LIFO, so children go in reversed to come out in order.
fn populate_work_stack<'a>(node: Node<'a>, work_stack: &mut Vec<Node<'a>>) {
    let children = node.children().collect::<Vec<_>>();
    work_stack.extend(children.into_iter().rev());
}
