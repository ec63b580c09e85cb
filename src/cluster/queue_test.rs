#[cfg(test)]
mod tests {
    use crate::cluster::queue::{HeapKey, MinPriorityQueue};
    use quickcheck::quickcheck;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Keyed(f64);

    impl HeapKey for Keyed {
        fn key(&self) -> f64 {
            self.0
        }
    }

    fn drain(mut queue: MinPriorityQueue<Keyed>) -> Vec<f64> {
        let mut keys = Vec::new();
        while let Some(element) = queue.pop() {
            keys.push(element.0);
        }
        keys
    }

    fn is_ascending(keys: &[f64]) -> bool {
        keys.windows(2).all(|pair| pair[0] <= pair[1])
    }

    #[test]
    fn test_empty_queue() {
        let mut queue: MinPriorityQueue<Keyed> = MinPriorityQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert!(queue.peek().is_none());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_push_pop_ascending() {
        let mut queue = MinPriorityQueue::new();
        for key in [5.0, 3.0, 8.0, 1.0, 9.0, 2.0, 7.0] {
            queue.push(Keyed(key));
        }

        assert_eq!(queue.len(), 7);
        assert_eq!(queue.peek().map(|element| element.0), Some(1.0));
        assert_eq!(drain(queue), vec![1.0, 2.0, 3.0, 5.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_build_heapifies_owned_vector() {
        let elements = vec![
            Keyed(4.0),
            Keyed(0.5),
            Keyed(2.0),
            Keyed(0.5),
            Keyed(3.0),
        ];
        let queue = MinPriorityQueue::build(elements);

        assert_eq!(queue.len(), 5);
        assert_eq!(queue.peek().map(|element| element.0), Some(0.5));
        assert_eq!(drain(queue), vec![0.5, 0.5, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_interleaved_push_pop() {
        let mut queue = MinPriorityQueue::build(vec![Keyed(6.0), Keyed(2.0), Keyed(4.0)]);

        assert_eq!(queue.pop().map(|element| element.0), Some(2.0));
        queue.push(Keyed(1.0));
        queue.push(Keyed(5.0));
        assert_eq!(queue.pop().map(|element| element.0), Some(1.0));
        assert_eq!(queue.pop().map(|element| element.0), Some(4.0));
        assert_eq!(drain(queue), vec![5.0, 6.0]);
    }

    quickcheck! {
        fn prop_build_drains_ascending(keys: Vec<u32>) -> bool {
            let elements: Vec<Keyed> = keys.iter().map(|&key| Keyed(key as f64)).collect();
            let queue = MinPriorityQueue::build(elements);
            is_ascending(&drain(queue))
        }

        fn prop_peek_is_min_under_mixed_ops(ops: Vec<(bool, u32)>) -> bool {
            // Replay pushes and pops against a shadow multiset, checking
            // the reported minimum after every operation.
            let mut queue = MinPriorityQueue::new();
            let mut shadow: Vec<f64> = Vec::new();

            for (push, key) in ops {
                if push {
                    queue.push(Keyed(key as f64));
                    shadow.push(key as f64);
                } else {
                    let expected = shadow.iter().copied().fold(f64::INFINITY, f64::min);
                    match queue.pop() {
                        None => {
                            if !shadow.is_empty() {
                                return false;
                            }
                        }
                        Some(popped) => {
                            if popped.0 != expected {
                                return false;
                            }
                            let found = shadow.iter().position(|&s| s == popped.0);
                            match found {
                                Some(index) => {
                                    shadow.swap_remove(index);
                                }
                                None => return false,
                            }
                        }
                    }
                }

                let minimum = shadow.iter().copied().fold(f64::INFINITY, f64::min);
                match queue.peek() {
                    None => {
                        if !shadow.is_empty() {
                            return false;
                        }
                    }
                    Some(top) => {
                        if top.0 != minimum {
                            return false;
                        }
                    }
                }
            }

            queue.len() == shadow.len()
        }
    }
}
