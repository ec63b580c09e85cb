//! Dynamic 2-d k-d tree for nearest-neighbor queries.
//!
//! The tree alternates its split dimension by depth (x at the root, y below,
//! and so on). Comparisons use a strict total order: the active dimension
//! first, ties broken by the other dimension, then by the unique point
//! index. No two points stored at the same time may compare equal under
//! that order; the index exists exactly so coincident coordinates stay
//! distinguishable.
//!
//! Deletion does not rebalance, so long runs of removals and insertions can
//! skew the tree. Callers that care rebuild from scratch with [`KdTree::build`],
//! which is balanced by construction.

/// A point stored in the k-d tree.
///
/// `index` disambiguates points at the same coordinates; it must be unique
/// among the points in one tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KdPoint {
    /// The x coordinate in world space.
    pub x: f64,
    /// The y coordinate in world space.
    pub y: f64,
    /// Unique identity of the point.
    pub index: usize,
}

/// Result of a nearest-neighbor query.
///
/// `distance` is squared. When the tree holds no point other than the query
/// target, `neighbor` is `None` and `distance` is infinite.
#[derive(Debug, Clone, Copy)]
pub struct NearestNeighbor {
    /// The closest point that is not the query target.
    pub neighbor: Option<KdPoint>,
    /// Squared distance to `neighbor`.
    pub distance: f64,
}

struct KdNode {
    point: KdPoint,
    left: Option<Box<KdNode>>,
    right: Option<Box<KdNode>>,
}

impl KdNode {
    fn new(point: KdPoint) -> Self {
        Self {
            point,
            left: None,
            right: None,
        }
    }

    fn height(&self) -> usize {
        let left = self.left.as_ref().map_or(0, |node| node.height());
        let right = self.right.as_ref().map_or(0, |node| node.height());
        left.max(right) + 1
    }
}

/// Returns true if `a` sorts strictly before `b` in x, with ties broken by
/// y, then by index.
fn less_than_x(a: &KdPoint, b: &KdPoint) -> bool {
    (a.x < b.x) || (a.x == b.x && ((a.y < b.y) || (a.y == b.y && a.index < b.index)))
}

/// Returns true if `a` sorts strictly before `b` in y, with ties broken by
/// x, then by index.
fn less_than_y(a: &KdPoint, b: &KdPoint) -> bool {
    (a.y < b.y) || (a.y == b.y && ((a.x < b.x) || (a.x == b.x && a.index < b.index)))
}

fn compare(a: &KdPoint, b: &KdPoint, x_level: bool) -> std::cmp::Ordering {
    if a == b {
        std::cmp::Ordering::Equal
    } else if x_level && less_than_x(a, b) || !x_level && less_than_y(a, b) {
        std::cmp::Ordering::Less
    } else {
        std::cmp::Ordering::Greater
    }
}

/// A 2-d k-d tree.
pub struct KdTree {
    root: Option<Box<KdNode>>,
}

impl KdTree {
    /// Builds a balanced tree from a batch of points. O(n log n).
    ///
    /// The points are pre-sorted once per dimension; each recursion step
    /// picks the median in its active dimension and partitions the other
    /// dimension's order against it, so no re-sorting happens below the
    /// root. Both children of every node receive point counts differing by
    /// at most one.
    pub fn build(points: &[KdPoint]) -> Self {
        let mut x_sorted = points.to_vec();
        let mut y_sorted = points.to_vec();
        x_sorted.sort_by(|a, b| compare(a, b, true));
        y_sorted.sort_by(|a, b| compare(a, b, false));

        Self {
            root: build_node(&x_sorted, &y_sorted, true),
        }
    }

    /// Adds a point as a new leaf. O(height).
    ///
    /// # Panics
    ///
    /// Panics if a point with the same coordinates and index is already in
    /// the tree; that is a duplicate-identity bug in the caller.
    pub fn add_item(&mut self, item: KdPoint) {
        let mut node = &mut self.root;
        let mut x_level = true;

        loop {
            match node {
                None => {
                    *node = Some(Box::new(KdNode::new(item)));
                    return;
                }
                Some(current) => {
                    if current.point == item {
                        panic!(
                            "duplicate k-d tree entry at ({}, {}) index {}",
                            item.x, item.y, item.index
                        );
                    }
                    let less_than = if x_level {
                        less_than_x(&item, &current.point)
                    } else {
                        less_than_y(&item, &current.point)
                    };
                    node = if less_than {
                        &mut current.left
                    } else {
                        &mut current.right
                    };
                    x_level = !x_level;
                }
            }
        }
    }

    /// Removes a point from the tree, if present.
    pub fn remove_item(&mut self, item: KdPoint) {
        self.root = delete_node(item, self.root.take(), true);
    }

    /// Finds the nearest point to `target` that is not `target` itself.
    pub fn nearest_neighbor(&self, target: KdPoint) -> NearestNeighbor {
        let mut candidate = NearestNeighbor {
            neighbor: None,
            distance: f64::INFINITY,
        };
        nearest(target, self.root.as_deref(), true, &mut candidate);
        candidate
    }

    /// Returns the height of the tree.
    #[allow(dead_code)] // Part of public API, may be used by external code
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |node| node.height())
    }
}

/// Builds a subtree from the same points sorted two ways: `sorted0` in the
/// dimension active at this level, `sorted1` in the other.
fn build_node(sorted0: &[KdPoint], sorted1: &[KdPoint], x_level: bool) -> Option<Box<KdNode>> {
    match sorted0.len() {
        0 => None,
        1 => Some(Box::new(KdNode::new(sorted0[0]))),
        _ => {
            let median_index = sorted0.len() / 2;
            let median = sorted0[median_index];
            let left0 = &sorted0[..median_index];
            let right0 = &sorted0[median_index + 1..];

            // Partition the other dimension's order against the median
            // instead of re-sorting; relative order is preserved.
            let mut left1 = Vec::with_capacity(left0.len());
            let mut right1 = Vec::with_capacity(right0.len());
            for point in sorted1 {
                if *point == median {
                    continue;
                }
                let less_than = if x_level {
                    less_than_x(point, &median)
                } else {
                    less_than_y(point, &median)
                };
                if less_than {
                    left1.push(*point);
                } else {
                    right1.push(*point);
                }
            }

            let mut node = KdNode::new(median);
            node.left = build_node(&left1, left0, !x_level);
            node.right = build_node(&right1, right0, !x_level);
            Some(Box::new(node))
        }
    }
}

/// Finds the minimum point under the dimension selected by `in_x`, in a
/// subtree whose own split dimension is given by `x_level`.
fn find_minimum(node: Option<&KdNode>, in_x: bool, x_level: bool) -> Option<KdPoint> {
    let node = node?;

    if in_x == x_level {
        match node.left.as_deref() {
            None => Some(node.point),
            left => find_minimum(left, in_x, !x_level),
        }
    } else {
        // The split dimension differs, so the minimum may be on either side.
        let mut minimum = node.point;
        for child in [node.left.as_deref(), node.right.as_deref()] {
            if let Some(found) = find_minimum(child, in_x, !x_level) {
                let less_than = if in_x {
                    less_than_x(&found, &minimum)
                } else {
                    less_than_y(&found, &minimum)
                };
                if less_than {
                    minimum = found;
                }
            }
        }
        Some(minimum)
    }
}

/// Finds the maximum point under the dimension selected by `in_x`; mirror
/// image of [`find_minimum`].
fn find_maximum(node: Option<&KdNode>, in_x: bool, x_level: bool) -> Option<KdPoint> {
    let node = node?;

    if in_x == x_level {
        match node.right.as_deref() {
            None => Some(node.point),
            right => find_maximum(right, in_x, !x_level),
        }
    } else {
        let mut maximum = node.point;
        for child in [node.left.as_deref(), node.right.as_deref()] {
            if let Some(found) = find_maximum(child, in_x, !x_level) {
                // No two points compare equal, so !less_than is greater_than.
                let greater_than = if in_x {
                    !less_than_x(&found, &maximum)
                } else {
                    !less_than_y(&found, &maximum)
                };
                if greater_than {
                    maximum = found;
                }
            }
        }
        Some(maximum)
    }
}

/// Removes `item` from the subtree rooted at `node`, returning the new
/// subtree root.
///
/// A matched node with a right subtree takes its replacement from the
/// minimum (under the node's split dimension) on the right; one with only a
/// left subtree takes that side's maximum; a leaf is detached. The
/// replacement is then deleted recursively from the side it came from.
fn delete_node(item: KdPoint, node: Option<Box<KdNode>>, x_level: bool) -> Option<Box<KdNode>> {
    let mut node = node?;

    if node.point == item {
        if let Some(replacement) = find_minimum(node.right.as_deref(), x_level, !x_level) {
            node.point = replacement;
            node.right = delete_node(replacement, node.right.take(), !x_level);
        } else if let Some(replacement) = find_maximum(node.left.as_deref(), x_level, !x_level) {
            node.point = replacement;
            node.left = delete_node(replacement, node.left.take(), !x_level);
        } else {
            // leaf, so just detach
            return None;
        }
        return Some(node);
    }

    // item can't equal node.point here, so strict less-than decides the side
    let less_than = if x_level {
        less_than_x(&item, &node.point)
    } else {
        less_than_y(&item, &node.point)
    };
    if less_than {
        node.left = delete_node(item, node.left.take(), !x_level);
    } else {
        node.right = delete_node(item, node.right.take(), !x_level);
    }
    Some(node)
}

/// Branch-and-bound nearest-neighbor search. Descends into the half
/// containing `target` first and visits the other half only when the
/// split-axis distance alone cannot rule it out.
fn nearest(target: KdPoint, node: Option<&KdNode>, x_level: bool, candidate: &mut NearestNeighbor) {
    let node = match node {
        None => return,
        Some(node) => node,
    };

    let point = node.point;
    let mut x_diff = target.x - point.x;
    let mut y_diff = target.y - point.y;
    x_diff *= x_diff;
    y_diff *= y_diff;

    // test this node, but skip over if self
    if point != target {
        let distance = x_diff + y_diff;
        if distance < candidate.distance {
            candidate.distance = distance;
            candidate.neighbor = Some(point);
        }
    }

    let (less_than, test_distance) = if x_level {
        (target.x < point.x, x_diff)
    } else {
        (target.y < point.y, y_diff)
    };

    if less_than {
        nearest(target, node.left.as_deref(), !x_level, candidate);
        if node.right.is_some() && test_distance <= candidate.distance {
            nearest(target, node.right.as_deref(), !x_level, candidate);
        }
    } else {
        nearest(target, node.right.as_deref(), !x_level, candidate);
        if node.left.is_some() && test_distance <= candidate.distance {
            nearest(target, node.left.as_deref(), !x_level, candidate);
        }
    }
}
