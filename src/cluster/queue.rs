//! Min-priority queue over elements exposing a numeric ordering key.

/// Key accessor for elements stored in a [`MinPriorityQueue`].
pub trait HeapKey {
    /// The ordering key; smaller keys are popped first.
    fn key(&self) -> f64;
}

/// Binary min-heap backed by a dense vector, children of `i` at `2i + 1`
/// and `2i + 2`.
///
/// The order in which equal-keyed elements are popped is unspecified.
#[derive(Debug)]
pub struct MinPriorityQueue<T> {
    elements: Vec<T>,
}

impl<T: HeapKey> MinPriorityQueue<T> {
    /// Creates an empty queue.
    #[allow(dead_code)] // Part of public API, may be used by external code
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Takes ownership of `elements` and heapifies it in place, bottom-up
    /// from the last internal node. O(n).
    pub fn build(elements: Vec<T>) -> Self {
        let mut queue = Self { elements };
        if queue.elements.len() > 1 {
            let last_parent = (queue.elements.len() - 2) / 2;
            for index in (0..=last_parent).rev() {
                queue.sift_down(index);
            }
        }
        queue
    }

    /// Current number of elements in the queue.
    #[allow(dead_code)] // Part of public API, may be used by external code
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the queue holds no elements.
    #[allow(dead_code)] // Part of public API, may be used by external code
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The minimum element, if any, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Removes and returns the minimum element, if any. O(log n).
    pub fn pop(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.elements.len() - 1;
        self.elements.swap(0, last);
        let min = self.elements.pop();
        if !self.elements.is_empty() {
            self.sift_down(0);
        }
        min
    }

    /// Puts an element into the queue. O(log n).
    pub fn push(&mut self, element: T) {
        self.elements.push(element);
        let mut index = self.elements.len() - 1;
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.elements[index].key() < self.elements[parent].key() {
                self.elements.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Restores the heap property for the subtree rooted at `index`.
    fn sift_down(&mut self, mut index: usize) {
        loop {
            let left = index * 2 + 1;
            if left >= self.elements.len() {
                break;
            }

            let mut min_index = index;
            if self.elements[left].key() < self.elements[min_index].key() {
                min_index = left;
            }
            let right = left + 1;
            if right < self.elements.len()
                && self.elements[right].key() < self.elements[min_index].key()
            {
                min_index = right;
            }

            if min_index == index {
                break;
            }
            self.elements.swap(index, min_index);
            index = min_index;
        }
    }
}

impl<T: HeapKey> Default for MinPriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
