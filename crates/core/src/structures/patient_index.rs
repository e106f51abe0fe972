//! Unbalanced binary search tree indexing patient records by identifier.
//!
//! Gives ascending-id enumeration and average O(log n) lookup. No rebalancing is done, so
//! sequentially assigned ids produce a right spine and O(n) operations; every walk below is
//! iterative so that shape cannot exhaust the stack.

use crate::patient::Patient;

struct TreeNode {
    patient: Patient,
    left: Subtree,
    right: Subtree,
}

type Subtree = Option<Box<TreeNode>>;

impl TreeNode {
    fn key(&self) -> u32 {
        self.patient.patient_id()
    }
}

/// Secondary index over patient records keyed by `patient_id`.
#[derive(Default)]
pub struct PatientIndex {
    root: Subtree,
    len: usize,
}

impl PatientIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `patient` under its own id. Returns `false` if the key is already present.
    pub fn insert(&mut self, patient: Patient) -> bool {
        let key = patient.patient_id();
        let mut link = &mut self.root;
        loop {
            match link {
                None => {
                    *link = Some(Box::new(TreeNode {
                        patient,
                        left: None,
                        right: None,
                    }));
                    self.len += 1;
                    return true;
                }
                Some(node) => match key.cmp(&node.key()) {
                    std::cmp::Ordering::Less => link = &mut node.left,
                    std::cmp::Ordering::Greater => link = &mut node.right,
                    std::cmp::Ordering::Equal => return false,
                },
            }
        }
    }

    pub fn search(&self, patient_id: u32) -> Option<&Patient> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match patient_id.cmp(&node.key()) {
                std::cmp::Ordering::Less => node.left.as_deref(),
                std::cmp::Ordering::Greater => node.right.as_deref(),
                std::cmp::Ordering::Equal => return Some(&node.patient),
            };
        }
        None
    }

    pub fn contains(&self, patient_id: u32) -> bool {
        self.search(patient_id).is_some()
    }

    /// Removes the record stored under `patient_id`.
    ///
    /// A leaf is unlinked, a node with one child is replaced by that child, and a node with
    /// two children is replaced by its in-order successor (the minimum of its right subtree),
    /// which is first detached from that subtree.
    pub fn delete(&mut self, patient_id: u32) -> Option<Patient> {
        let mut link = &mut self.root;
        loop {
            let key = link.as_ref()?.key();
            if patient_id == key {
                break;
            }
            let node = link.as_mut()?;
            link = if patient_id < key {
                &mut node.left
            } else {
                &mut node.right
            };
        }

        let mut removed = link.take()?;
        *link = match (removed.left.take(), removed.right.take()) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(left), Some(right)) => {
                let mut right = Some(right);
                match detach_min(&mut right) {
                    Some(mut successor) => {
                        successor.left = Some(left);
                        successor.right = right;
                        Some(successor)
                    }
                    // Only reachable for an empty right subtree, which the match arm excludes.
                    None => Some(left),
                }
            }
        };
        self.len -= 1;
        Some(removed.patient)
    }

    /// Clones every record in ascending id order.
    pub fn inorder(&self) -> Vec<Patient> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<&TreeNode> = Vec::new();
        let mut current = self.root.as_deref();

        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                out.push(node.patient.clone());
                current = node.right.as_deref();
            }
        }
        out
    }

    /// Number of nodes on the longest root-to-leaf path (0 for an empty tree).
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<&TreeNode> = self.root.as_deref().into_iter().collect();
        while !level.is_empty() {
            height += 1;
            level = level
                .into_iter()
                .flat_map(|node| [node.left.as_deref(), node.right.as_deref()])
                .flatten()
                .collect();
        }
        height
    }

    pub fn clear(&mut self) {
        self.drain_nodes();
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn drain_nodes(&mut self) {
        let mut pending: Vec<Box<TreeNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl Drop for PatientIndex {
    fn drop(&mut self) {
        self.drain_nodes();
    }
}

/// Unlinks and returns the leftmost node of `subtree`, splicing its right child into its place.
fn detach_min(subtree: &mut Subtree) -> Option<Box<TreeNode>> {
    let mut link = subtree;
    while link.as_ref().is_some_and(|node| node.left.is_some()) {
        link = &mut link.as_mut()?.left;
    }
    let mut min = link.take()?;
    *link = min.right.take();
    Some(min)
}
