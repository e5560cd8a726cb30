use crate::document::Node;

/// Returns every element reached by following `path` down from `node`.
///
/// `path[0]` is matched against the element children of `node`, `path[1]`
/// against the children of each match, and so on. Results come back
/// depth-first, left-to-right. A missing step yields an empty list.
pub fn path_query<'a, S: AsRef<str>>(node: Node<'a>, path: &[S]) -> Vec<Node<'a>> {
    let Some((head, rest)) = path.split_first() else {
        return Vec::new();
    };

    let matches = node
        .children()
        .filter(|child| child.value().is_element_named(head.as_ref()));

    if rest.is_empty() {
        return matches.collect();
    }

    let mut result = Vec::new();
    for child in matches {
        result.extend(path_query(child, rest));
    }
    result
}

/// The first result of [`path_query`], if any.
pub fn first_match<'a, S: AsRef<str>>(node: Node<'a>, path: &[S]) -> Option<Node<'a>> {
    path_query(node, path).into_iter().next()
}

/// Element children of `node` in document order.
pub fn element_children<'a>(node: Node<'a>) -> impl Iterator<Item = Node<'a>> {
    node.children()
        .filter(|child| child.value().as_element().is_some())
}
