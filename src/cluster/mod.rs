//! Hierarchical clustering of geographic points, built on a k-d tree and a
//! min-priority queue of nearest-neighbor edges.

pub mod hierarchical;
pub mod kdtree;
pub mod point;
pub mod projection;
pub mod queue;

#[cfg(test)]
mod kdtree_test;
#[cfg(test)]
mod queue_test;

pub use hierarchical::HierarchicalClusterer;
pub use point::{Cluster, ClusterItem, LatLng};
// Public API exports - allow unused imports as these are part of the public API
#[allow(unused_imports)]
pub use hierarchical::CLUSTER_PIXEL_DISTANCE;
#[allow(unused_imports)]
pub use kdtree::{KdPoint, KdTree, NearestNeighbor};
#[allow(unused_imports)]
pub use point::ClusterAlgorithm;
#[allow(unused_imports)]
pub use queue::{HeapKey, MinPriorityQueue};
