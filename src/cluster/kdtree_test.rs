#[cfg(test)]
mod tests {
    use crate::cluster::kdtree::{KdPoint, KdTree};
    use quickcheck::quickcheck;

    /// Maps arbitrary pairs onto a small coordinate grid so coincident
    /// points occur often, with the enumeration index as identity.
    fn points_from_pairs(pairs: &[(i8, i8)]) -> Vec<KdPoint> {
        pairs
            .iter()
            .enumerate()
            .map(|(index, &(x, y))| KdPoint {
                x: (x & 7) as f64,
                y: (y & 7) as f64,
                index,
            })
            .collect()
    }

    /// O(n²) reference nearest-neighbor search.
    fn brute_force_nearest(points: &[KdPoint], target: KdPoint) -> f64 {
        let mut best = f64::INFINITY;
        for point in points {
            if *point == target {
                continue;
            }
            let x_diff = target.x - point.x;
            let y_diff = target.y - point.y;
            let distance = x_diff * x_diff + y_diff * y_diff;
            if distance < best {
                best = distance;
            }
        }
        best
    }

    fn expected_height(count: usize) -> usize {
        (usize::BITS - count.leading_zeros()) as usize
    }

    #[test]
    fn test_empty_tree() {
        let tree = KdTree::build(&[]);
        assert_eq!(tree.height(), 0);

        let probe = KdPoint {
            x: 1.0,
            y: 2.0,
            index: 0,
        };
        let nearest = tree.nearest_neighbor(probe);
        assert!(nearest.neighbor.is_none());
        assert_eq!(nearest.distance, f64::INFINITY);
    }

    #[test]
    fn test_single_point_has_no_neighbor() {
        let point = KdPoint {
            x: 3.0,
            y: 4.0,
            index: 0,
        };
        let tree = KdTree::build(&[point]);

        let nearest = tree.nearest_neighbor(point);
        assert!(nearest.neighbor.is_none());
        assert_eq!(nearest.distance, f64::INFINITY);
    }

    #[test]
    fn test_balanced_construction_height() {
        // Balanced construction makes the height a function of the point
        // count alone.
        for count in 1..=64 {
            let points: Vec<KdPoint> = (0..count)
                .map(|i| KdPoint {
                    x: i as f64,
                    y: ((i * 7) % 13) as f64,
                    index: i,
                })
                .collect();
            let tree = KdTree::build(&points);
            assert_eq!(
                tree.height(),
                expected_height(count),
                "unexpected height for {} points",
                count
            );
        }
    }

    #[test]
    fn test_coincident_points_are_distinct() {
        let points: Vec<KdPoint> = (0..4)
            .map(|index| KdPoint {
                x: 5.0,
                y: 5.0,
                index,
            })
            .collect();
        let tree = KdTree::build(&points);

        for &point in &points {
            let nearest = tree.nearest_neighbor(point);
            assert_eq!(nearest.distance, 0.0);
            let neighbor = nearest.neighbor.unwrap();
            assert_ne!(neighbor.index, point.index, "query returned itself");
        }
    }

    #[test]
    #[should_panic(expected = "duplicate k-d tree entry")]
    fn test_duplicate_insert_panics() {
        let point = KdPoint {
            x: 1.0,
            y: 1.0,
            index: 7,
        };
        let mut tree = KdTree::build(&[point]);
        tree.add_item(point);
    }

    #[test]
    fn test_remove_then_reinsert_with_new_index() {
        let mut points = points_from_pairs(&[
            (0, 0),
            (1, 3),
            (4, 4),
            (2, 6),
            (6, 1),
            (3, 3),
            (5, 7),
            (7, 2),
        ]);
        let mut tree = KdTree::build(&points);

        // remove one point and re-add an equivalent one under a fresh index
        let removed = points[3];
        tree.remove_item(removed);
        points.remove(3);

        let replacement = KdPoint {
            x: removed.x,
            y: removed.y,
            index: 100,
        };
        tree.add_item(replacement);
        points.push(replacement);

        for &probe in &points {
            assert_eq!(
                tree.nearest_neighbor(probe).distance,
                brute_force_nearest(&points, probe)
            );
        }
    }

    quickcheck! {
        fn prop_nearest_matches_brute_force(pairs: Vec<(i8, i8)>) -> bool {
            let points = points_from_pairs(&pairs);
            let tree = KdTree::build(&points);

            points.iter().all(|&target| {
                let nearest = tree.nearest_neighbor(target);
                if nearest.neighbor == Some(target) {
                    return false;
                }
                nearest.distance == brute_force_nearest(&points, target)
            })
        }

        fn prop_nearest_after_deleting_half(pairs: Vec<(i8, i8)>) -> bool {
            let points = points_from_pairs(&pairs);
            let mut tree = KdTree::build(&points);

            let (removed, kept): (Vec<KdPoint>, Vec<KdPoint>) =
                points.iter().partition(|point| point.index % 2 == 1);
            for &point in &removed {
                tree.remove_item(point);
            }

            kept.iter().all(|&target| {
                tree.nearest_neighbor(target).distance == brute_force_nearest(&kept, target)
            })
        }
    }
}
