//! TRE hierarchical reference files.

use crate::ResourceError;

/// One node of a tree file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    /// Text of the node line, indentation removed.
    pub value: String,
    /// Nesting depth, 0 for roots.
    pub level: usize,
    /// Child nodes, one level deeper.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(value: impl Into<String>) -> Self {
        TreeNode {
            value: value.into(),
            ..Default::default()
        }
    }
}

/// A parsed tree file.
#[derive(Debug, Clone, Default)]
pub struct TreeFile {
    pub roots: Vec<TreeNode>,
}

/// Number of leading TAB characters.
fn count_indent(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b'\t').count()
}

impl TreeFile {
    /// Parses tab-indented lines into a forest.
    ///
    /// Children are the following entries at `level + 1`; the first entry
    /// at a level at or above the parent's closes the subtree. A jump of
    /// more than one level between consecutive entries is an error.
    pub fn parse(lines: &[String]) -> Result<Self, ResourceError> {
        let mut result = TreeFile::default();
        // Stack of the open path, one node per level.
        let mut path: Vec<TreeNode> = Vec::new();
        let mut previous = 0usize;
        for (number, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let level = count_indent(line);
            if level > previous + 1 || (path.is_empty() && level != 0) {
                return Err(ResourceError::BrokenTree(number + 1));
            }
            while path.len() > level {
                let node = path.pop().expect("stack checked above");
                match path.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => result.roots.push(node),
                }
            }
            let mut node = TreeNode::new(&line[level..]);
            node.level = level;
            path.push(node);
            previous = level;
        }
        while let Some(node) = path.pop() {
            match path.last_mut() {
                Some(parent) => parent.children.push(node),
                None => result.roots.push(node),
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_builds_forest() {
        let tree = TreeFile::parse(&lines(&[
            "first",
            "\tfirst child",
            "\t\tgrandchild",
            "\tsecond child",
            "second",
        ]))
        .unwrap();
        assert_eq!(tree.roots.len(), 2);
        let first = &tree.roots[0];
        assert_eq!(first.value, "first");
        assert_eq!(first.children.len(), 2);
        assert_eq!(first.children[0].children[0].value, "grandchild");
        assert_eq!(first.children[1].value, "second child");
        assert_eq!(tree.roots[1].value, "second");
        assert_eq!(tree.roots[1].level, 0);
    }

    #[test]
    fn indent_jump_is_an_error() {
        let result = TreeFile::parse(&lines(&["root", "\t\ttoo deep"]));
        assert!(matches!(result, Err(ResourceError::BrokenTree(2))));
    }

    #[test]
    fn indented_first_line_is_an_error() {
        let result = TreeFile::parse(&lines(&["\tno root"]));
        assert!(matches!(result, Err(ResourceError::BrokenTree(1))));
    }
}
