//! Agglomerative clustering of geographic points in projected world space.
//!
//! Items are tracked together with their world-coordinate projection. A
//! clustering pass starts from one singleton aggregate per item, builds a
//! fresh k-d tree over the aggregates and a min-queue of "nearest other
//! cluster" edges, then repeatedly merges the globally closest pair until
//! the shortest remaining edge reaches the zoom-scaled threshold. All pass
//! state (arena, tree, queue) is discarded when the pass returns.
//!
//! The clustering order of multiple pairs an equal distance apart is
//! defined by heap mechanics, so may vary between releases.

use super::kdtree::{KdPoint, KdTree};
use super::point::{Cluster, ClusterAlgorithm, ClusterItem};
use super::projection;
use super::queue::{HeapKey, MinPriorityQueue};

/// Default distance within which two items cluster, in world units at
/// zoom 0 (one unit is one pixel on a 256-pixel zoom-0 tile).
pub const CLUSTER_PIXEL_DISTANCE: f64 = 30.0;

/// One cluster during a pass. Aggregates live in a pass-local arena and are
/// never removed from it; a merge tombstones its two inputs via `valid` and
/// appends the merged result.
#[derive(Debug)]
struct ClusterAggregate {
    /// Centroid in world coordinates.
    x: f64,
    y: f64,
    /// Running coordinate sums over the members, for O(1) re-centroiding.
    sum_x: f64,
    sum_y: f64,
    /// Tracked-item indices, in merge order.
    members: Vec<usize>,
    /// False once this aggregate has been merged away.
    valid: bool,
    /// Current position in the dense active array.
    slot: usize,
}

/// The nearest other cluster to `origin`, keyed by squared world distance.
///
/// Edges go stale when either endpoint is merged away; staleness is
/// resolved when the edge is popped, never eagerly.
#[derive(Debug, Clone, Copy)]
struct Edge {
    /// Arena id of the cluster this edge belongs to.
    origin: usize,
    /// Arena id of the nearest other cluster, if one exists.
    dest: Option<usize>,
    /// Squared world distance from origin to dest.
    key: f64,
}

impl HeapKey for Edge {
    fn key(&self) -> f64 {
        self.key
    }
}

/// An item plus its world-coordinate projection, computed once on add.
#[derive(Debug)]
struct TrackedItem<T> {
    x: f64,
    y: f64,
    item: T,
}

/// A hierarchical clustering engine.
///
/// Clusters any items within a set distance apart in world space, in order
/// by distance (ascending). The item list is the only state that persists
/// between passes.
#[derive(Debug)]
pub struct HierarchicalClusterer<T> {
    items: Vec<TrackedItem<T>>,
    cluster_distance: f64,
}

impl<T: ClusterItem> HierarchicalClusterer<T> {
    /// Creates an engine with the default cluster distance of
    /// [`CLUSTER_PIXEL_DISTANCE`] world units.
    pub fn new() -> Self {
        Self::with_cluster_distance(CLUSTER_PIXEL_DISTANCE)
    }

    /// Creates an engine clustering items within `cluster_distance` world
    /// units of each other at zoom 0.
    pub fn with_cluster_distance(cluster_distance: f64) -> Self {
        Self {
            items: Vec::new(),
            cluster_distance,
        }
    }

    /// Adds an item to be clustered.
    pub fn add_item(&mut self, item: T) {
        let position = item.position();
        self.items.push(TrackedItem {
            x: projection::lng_to_x(position.lng),
            y: projection::lat_to_y(position.lat),
            item,
        });
    }

    /// Adds several items to be clustered.
    pub fn add_items(&mut self, items: Vec<T>) {
        for item in items {
            self.add_item(item);
        }
    }

    /// Removes the first tracked item equal to `item`, if any, by swapping
    /// the last item into its place. Iteration order is not preserved.
    #[allow(dead_code)] // Part of public API, may be used by external code
    pub fn remove_item(&mut self, item: &T)
    where
        T: PartialEq,
    {
        if let Some(found) = self.items.iter().position(|tracked| tracked.item == *item) {
            let _removed = self.items.swap_remove(found);
        }
    }

    /// Removes all tracked items.
    #[allow(dead_code)] // Part of public API, may be used by external code
    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    /// Returns a snapshot of the currently tracked items, for handing off
    /// to a replacement engine.
    #[allow(dead_code)] // Part of public API, may be used by external code
    pub fn get_items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items
            .iter()
            .map(|tracked| tracked.item.clone())
            .collect()
    }

    /// Runs one full clustering pass at the given zoom level.
    ///
    /// The threshold is `cluster_distance / 2^zoom` world units: one zoom
    /// step doubles positional resolution, so the same on-screen pixel
    /// distance spans half as many world units.
    pub fn get_clusters(&self, zoom: u32) -> Vec<Cluster<'_, T>> {
        let mut arena: Vec<ClusterAggregate> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, tracked)| ClusterAggregate {
                x: tracked.x,
                y: tracked.y,
                sum_x: tracked.x,
                sum_y: tracked.y,
                members: vec![index],
                valid: true,
                slot: index,
            })
            .collect();
        let mut active: Vec<usize> = (0..arena.len()).collect();

        let epsilon = self.cluster_distance / (zoom as f64).exp2();
        let count = merge_pass(&mut arena, &mut active, epsilon);

        let mut clusters = Vec::with_capacity(count);
        for &id in &active[..count] {
            let aggregate = &arena[id];
            let position = if aggregate.members.len() == 1 {
                // single point, so reuse its position verbatim
                self.items[aggregate.members[0]].item.position()
            } else {
                projection::unproject(aggregate.x, aggregate.y)
            };

            let items = aggregate
                .members
                .iter()
                .map(|&index| &self.items[index].item)
                .collect();
            clusters.push(Cluster { position, items });
        }

        clusters
    }
}

impl<T: ClusterItem> Default for HierarchicalClusterer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ClusterItem> ClusterAlgorithm<T> for HierarchicalClusterer<T> {
    fn add_item(&mut self, item: T) {
        Self::add_item(self, item);
    }

    fn add_items(&mut self, items: Vec<T>) {
        Self::add_items(self, items);
    }

    fn remove_item(&mut self, item: &T)
    where
        T: PartialEq,
    {
        Self::remove_item(self, item);
    }

    fn clear_items(&mut self) {
        Self::clear_items(self);
    }

    fn get_items(&self) -> Vec<T>
    where
        T: Clone,
    {
        Self::get_items(self)
    }

    fn get_clusters(&self, zoom: u32) -> Vec<Cluster<'_, T>> {
        Self::get_clusters(self, zoom)
    }
}

/// The k-d tree key of an aggregate: its centroid plus its arena id, which
/// is unique for the lifetime of a pass.
fn kd_point(aggregate: &ClusterAggregate, id: usize) -> KdPoint {
    KdPoint {
        x: aggregate.x,
        y: aggregate.y,
        index: id,
    }
}

/// One edge per active cluster, pointing at its nearest other cluster,
/// bulk-heapified. O(n log n).
fn shortest_edge_queue(
    arena: &[ClusterAggregate],
    active: &[usize],
    tree: &KdTree,
) -> MinPriorityQueue<Edge> {
    let mut edges = Vec::with_capacity(active.len());
    for &id in active {
        let nearest = tree.nearest_neighbor(kd_point(&arena[id], id));
        edges.push(Edge {
            origin: id,
            dest: nearest.neighbor.map(|point| point.index),
            key: nearest.distance,
        });
    }

    MinPriorityQueue::build(edges)
}

/// Merges clusters closer than `epsilon` until none remain, working inside
/// the `active` array. Returns the number of resulting clusters, found in
/// that number of the first slots of `active`.
fn merge_pass(arena: &mut Vec<ClusterAggregate>, active: &mut [usize], epsilon: f64) -> usize {
    let mut count = active.len();
    if count < 2 {
        return count;
    }

    let points: Vec<KdPoint> = active.iter().map(|&id| kd_point(&arena[id], id)).collect();
    let mut tree = KdTree::build(&points);
    let mut queue = shortest_edge_queue(arena, active, &tree);

    let sq_epsilon = epsilon * epsilon;
    while count > 1 {
        match queue.peek() {
            Some(edge) if edge.key < sq_epsilon => {}
            _ => break,
        }
        let Some(mut shortest) = queue.pop() else {
            break;
        };

        if !arena[shortest.origin].valid {
            // origin was merged away since this edge was queued
            continue;
        }

        let origin_id = match shortest.dest.filter(|&dest| arena[dest].valid) {
            None => {
                // dest no longer exists; keep origin and re-aim it below
                shortest.origin
            }
            Some(dest) => {
                // origin and dest valid, combine into a new cluster
                let origin = shortest.origin;

                let mut members = std::mem::take(&mut arena[origin].members);
                let dest_members = std::mem::take(&mut arena[dest].members);
                members.extend(dest_members);

                let sum_x = arena[origin].sum_x + arena[dest].sum_x;
                let sum_y = arena[origin].sum_y + arena[dest].sum_y;
                let new_x = sum_x / members.len() as f64;
                let new_y = sum_y / members.len() as f64;

                // eliminate the old clusters
                arena[origin].valid = false;
                tree.remove_item(kd_point(&arena[origin], origin));
                arena[dest].valid = false;
                tree.remove_item(kd_point(&arena[dest], dest));

                let low_slot = arena[origin].slot.min(arena[dest].slot);
                let high_slot = arena[origin].slot.max(arena[dest].slot);
                count -= 1;
                active[high_slot] = active[count];
                arena[active[high_slot]].slot = high_slot;

                let merged_id = arena.len();
                arena.push(ClusterAggregate {
                    x: new_x,
                    y: new_y,
                    sum_x,
                    sum_y,
                    members,
                    valid: true,
                    slot: low_slot,
                });
                active[low_slot] = merged_id;
                tree.add_item(kd_point(&arena[merged_id], merged_id));

                merged_id
            }
        };
        if count < 2 {
            break;
        }

        // re-aim the surviving cluster at its current nearest neighbor and
        // requeue the refreshed edge
        let nearest = tree.nearest_neighbor(kd_point(&arena[origin_id], origin_id));
        shortest.origin = origin_id;
        shortest.dest = nearest.neighbor.map(|point| point.index);
        shortest.key = nearest.distance;
        queue.push(shortest);
    }

    count
}
