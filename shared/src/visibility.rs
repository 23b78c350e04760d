use crate::gesture::Gesture;

/// Minimal view of a host scene graph: child enumeration and a per-node active flag.
///
/// The graph must be acyclic; that is a host invariant and is not checked here.
pub trait SceneTree {
    type Node: Copy;

    /// Appends the direct children of `node` to `out`.
    fn push_children(&self, node: Self::Node, out: &mut Vec<Self::Node>);

    /// Sets the active/visible flag of a single node (and whatever it carries).
    fn set_active(&mut self, node: Self::Node, active: bool);
}

/// Sets the flag on `root` and every descendant.
pub fn set_subtree_active<T: SceneTree + ?Sized>(tree: &mut T, root: T::Node, active: bool) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        tree.set_active(node, active);
        tree.push_children(node, &mut stack);
    }
}

/// The three hint subtrees ("which gesture to make" pictures), one per pose.
///
/// Any of them may be absent; absent hints are skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HintRoots<N> {
    roots: [Option<N>; 3],
}

impl<N> Default for HintRoots<N> {
    fn default() -> Self {
        Self {
            roots: [None, None, None],
        }
    }
}

impl<N: Copy> HintRoots<N> {
    pub fn new(pathaka: Option<N>, mushti: Option<N>, ardhachandram: Option<N>) -> Self {
        Self {
            roots: [pathaka, mushti, ardhachandram],
        }
    }

    pub fn get(&self, gesture: Gesture) -> Option<N> {
        self.roots[gesture.index()]
    }

    pub fn set(&mut self, gesture: Gesture, root: Option<N>) {
        self.roots[gesture.index()] = root;
    }

    pub fn hide_all<T: SceneTree<Node = N> + ?Sized>(&self, tree: &mut T) {
        for root in self.roots.iter().flatten() {
            set_subtree_active(tree, *root, false);
        }
    }

    /// Hides every hint, then reveals the one for `gesture` (none when `gesture` is `None`).
    pub fn show_only<T: SceneTree<Node = N> + ?Sized>(&self, tree: &mut T, gesture: Option<Gesture>) {
        self.hide_all(tree);
        if let Some(root) = gesture.and_then(|g| self.get(g)) {
            set_subtree_active(tree, root, true);
        }
    }
}
