//! Base types shared by the clustering engine: geographic positions, the
//! item contract, and the output cluster shape.

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new coordinate from latitude and longitude in degrees.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A single data point to be clustered.
///
/// The engine only ever reads the position; everything else about the item
/// is opaque payload handed back inside the resulting clusters.
pub trait ClusterItem {
    /// The geographic position of the item.
    fn position(&self) -> LatLng;
}

/// A number of items clustered at a single position.
///
/// Borrows its member payloads from the engine that produced it, in merge
/// order (the order carries no meaning).
#[derive(Debug)]
pub struct Cluster<'a, T> {
    /// Position of the cluster. For a single-member cluster this is the
    /// member's original position, not a reprojected centroid.
    pub position: LatLng,
    /// Items in the cluster.
    pub items: Vec<&'a T>,
}

impl<T> Cluster<'_, T> {
    /// Number of items in the cluster.
    pub fn size(&self) -> usize {
        self.items.len()
    }
}

/// Logic for computing clusters.
///
/// `get_items` exists so a caller can hand the tracked items of one
/// algorithm instance over to a replacement via `add_items`.
#[allow(dead_code)] // Part of public API, may be used by external code
pub trait ClusterAlgorithm<T: ClusterItem> {
    /// Adds an item to be clustered.
    fn add_item(&mut self, item: T);

    /// Adds several items to be clustered.
    fn add_items(&mut self, items: Vec<T>);

    /// Removes the first tracked item equal to `item`, if any. Iteration
    /// order of the remaining items is not preserved.
    fn remove_item(&mut self, item: &T)
    where
        T: PartialEq;

    /// Removes all tracked items.
    fn clear_items(&mut self);

    /// Returns a snapshot of the currently tracked items.
    fn get_items(&self) -> Vec<T>
    where
        T: Clone;

    /// Computes the set of clusters to display at the specified zoom level.
    fn get_clusters(&self, zoom: u32) -> Vec<Cluster<'_, T>>;
}
