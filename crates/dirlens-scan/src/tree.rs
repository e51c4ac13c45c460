//! Depth-bounded display tree construction.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dirlens_core::{
    Logger, StatError, TreeNode, TreeOptions, default_logger, is_hidden_name,
};

use crate::stat::{entry_name, stat};

/// Builds sorted, depth-bounded trees for display.
///
/// The walk uses an explicit work stack of `(node, depth)` pairs, so the
/// depth bound is a single check and very deep trees cannot exhaust the
/// call stack. Symbolic links are followed, except into a directory that is
/// already one of the node's ancestors; such a link is shown as an
/// unexpanded directory.
pub struct TreeBuilder {
    logger: Arc<dyn Logger>,
}

/// A node under construction, linked to its parent by arena index.
struct PendingNode {
    node: TreeNode,
    parent: Option<usize>,
    /// Resolved location of a directory, used to detect link cycles.
    real_path: Option<PathBuf>,
}

impl TreeBuilder {
    /// Create a new tree builder.
    pub fn new() -> Self {
        Self {
            logger: default_logger(),
        }
    }

    /// Use the given logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Build the tree rooted at `root`.
    ///
    /// A file root yields a single leaf. Failure to stat or list the root is
    /// an error; failures below the root only drop the affected entry.
    pub fn build(&self, root: &Path, options: &TreeOptions) -> Result<TreeNode, StatError> {
        let root_stat = stat(root)?;
        let root_name = entry_name(&root_stat.path);

        if !root_stat.is_dir() {
            let size = options.include_sizes.then_some(root_stat.size);
            return Ok(TreeNode::new_file(root_name, root_stat.path, size));
        }

        let max_depth = options.effective_depth();
        let mut arena = vec![PendingNode {
            node: TreeNode::new_directory(root_name, root_stat.path.clone()),
            parent: None,
            real_path: fs::canonicalize(&root_stat.path).ok(),
        }];

        if max_depth == 0 {
            arena[0].node.truncated = true;
        } else {
            // The root listing is the one listing allowed to fail the build.
            let root_entries = list_children(&root_stat.path)?;
            let mut stack = Vec::new();
            self.expand(&mut arena, &mut stack, 0, 0, root_entries, options, max_depth);

            while let Some((index, depth)) = stack.pop() {
                let path = arena[index].node.path.clone();
                match list_children(&path) {
                    Ok(entries) => {
                        self.expand(&mut arena, &mut stack, index, depth, entries, options, max_depth)
                    }
                    Err(err) => self.logger.debug(&format!("Not expanding {err}")),
                }
            }
        }

        Ok(assemble(arena))
    }

    /// Add the children of the node at `index` (at `depth`) to the arena.
    #[allow(clippy::too_many_arguments)]
    fn expand(
        &self,
        arena: &mut Vec<PendingNode>,
        stack: &mut Vec<(usize, usize)>,
        index: usize,
        depth: usize,
        entries: Vec<PathBuf>,
        options: &TreeOptions,
        max_depth: usize,
    ) {
        let child_depth = depth + 1;

        for path in entries {
            let name = entry_name(&path);
            if !options.include_hidden && is_hidden_name(&name) {
                continue;
            }

            let child = match stat(&path) {
                Ok(child) => child,
                Err(err) => {
                    self.logger.debug(&format!("Skipping {err}"));
                    continue;
                }
            };

            if child.is_dir() {
                let real_path = fs::canonicalize(&child.path).ok();
                let cycle = real_path
                    .as_deref()
                    .is_some_and(|real| is_ancestor(arena, index, real));
                if cycle {
                    self.logger.debug(&format!(
                        "Not following {}: links back to an ancestor",
                        child.path.display()
                    ));
                }

                let mut node = TreeNode::new_directory(name, child.path);
                let expandable = child_depth < max_depth;
                node.truncated = !expandable && !cycle;
                arena.push(PendingNode {
                    node,
                    parent: Some(index),
                    real_path,
                });
                if expandable && !cycle {
                    stack.push((arena.len() - 1, child_depth));
                }
            } else if options.include_files {
                let size = options.include_sizes.then_some(child.size);
                arena.push(PendingNode {
                    node: TreeNode::new_file(name, child.path, size),
                    parent: Some(index),
                    real_path: None,
                });
            }
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `real` is the resolved location of the node at `index` or of any
/// node above it.
fn is_ancestor(arena: &[PendingNode], index: usize, real: &Path) -> bool {
    let mut current = Some(index);
    while let Some(i) = current {
        if arena[i].real_path.as_deref() == Some(real) {
            return true;
        }
        current = arena[i].parent;
    }
    false
}

/// Entry paths of a directory, in listing order.
fn list_children(dir: &Path) -> Result<Vec<PathBuf>, StatError> {
    let entries = fs::read_dir(dir).map_err(|e| StatError::io(dir, e))?;
    Ok(entries.filter_map(|entry| entry.ok().map(|e| e.path())).collect())
}

/// Link arena nodes into a tree and sort every level.
///
/// Children always sit at higher indices than their parent, so draining the
/// arena from the back attaches every node before its parent is moved.
fn assemble(mut arena: Vec<PendingNode>) -> TreeNode {
    while arena.len() > 1 {
        let Some(PendingNode { mut node, parent, .. }) = arena.pop() else {
            break;
        };
        node.sort_children();
        if let Some(parent) = parent {
            arena[parent].node.children.push(node);
        }
    }

    let mut root = arena
        .pop()
        .map(|pending| pending.node)
        .unwrap_or_else(|| TreeNode::new_directory("", PathBuf::new()));
    root.sort_children();
    root
}
