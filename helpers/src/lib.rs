pub mod buffer;
pub mod general;
pub mod geometry;

#[cfg(test)]
mod buffer_tests {
    use crate::buffer::{HistoryBuffer, RingBuffer};
    use approx::assert_ulps_eq;

    #[test]
    fn test_ringbuffer_1() {
        let x: RingBuffer<i32> = RingBuffer::new(5);
        assert!(x.get_avg().is_none());
    }
    #[test]
    fn test_ringbuffer_2() {
        let mut x: RingBuffer<i32> = RingBuffer::new(5);
        x.push(3);
        x.push(4);
        assert_ulps_eq!(x.get_avg().unwrap(), 3.5);
    }
    #[test]
    fn test_ringbuffer_3() {
        let mut x: RingBuffer<i32> = RingBuffer::new(5);
        x.push(3);
        x.push(4);
        x.push(2);
        x.push(1);
        x.push(5);
        x.push(10);
        assert_ulps_eq!(x.get_avg().unwrap(), 4.4);
    }

    #[test]
    fn test_historybuffer_keeps_order() {
        let mut x: HistoryBuffer<i32> = HistoryBuffer::new(3);
        x.push(1);
        x.push(2);
        x.push(3);
        let vals: Vec<i32> = x.iter().copied().collect();
        assert_eq!(vals, vec![1, 2, 3]);
    }
    #[test]
    fn test_historybuffer_evicts_oldest() {
        let mut x: HistoryBuffer<i32> = HistoryBuffer::new(3);
        for val in 1..=5 {
            x.push(val);
        }
        let vals: Vec<i32> = x.iter().copied().collect();
        assert_eq!(vals, vec![3, 4, 5]);
        assert_eq!(x.len(), 3);
    }
    #[test]
    fn test_historybuffer_clear() {
        let mut x: HistoryBuffer<i32> = HistoryBuffer::new(3);
        x.push(1);
        x.clear();
        assert!(x.is_empty());
    }
}


#[cfg(test)]
mod geometry_tests {
    use crate::geometry::{wrap_to_pi, Point2d, Point3d, Vector2d};
    use approx::assert_ulps_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_vector2d_sub() {
        let v1: Vector2d = Vector2d { dx: 5.0, dy: 5.0 };
        let v2: Vector2d = Vector2d { dx: 2.0, dy: -1.0 };
        assert_eq!(v1.sub(&v2), Vector2d { dx: 3.0, dy: 6.0 });
    }
    #[test]
    fn test_vector2d_add() {
        let v1: Vector2d = Vector2d { dx: 5.0, dy: 5.0 };
        let v2: Vector2d = Vector2d { dx: 2.0, dy: -1.0 };
        assert_eq!(v1.add(&v2), Vector2d { dx: 7.0, dy: 4.0 });
    }
    #[test]
    fn test_vector2d_mult() {
        let v1: Vector2d = Vector2d { dx: 5.0, dy: 5.0 };
        assert_eq!(v1.mult(3.0), Vector2d { dx: 15.0, dy: 15.0 });
    }
    #[test]
    fn test_vector2d_abs() {
        let v1: Vector2d = Vector2d { dx: 5.0, dy: 5.0 };
        assert_ulps_eq!(v1.abs(), 50.0_f64.sqrt());
    }
    #[test]
    fn test_vector2d_bearing() {
        let v1: Vector2d = Vector2d { dx: 0.0, dy: 2.0 };
        assert_ulps_eq!(v1.bearing(), FRAC_PI_2);
    }

    #[test]
    fn test_point2d_rotate_quarter_turn() {
        let p = Point2d { x: 1.0, y: 0.0 };
        let rotated = p.rotate(FRAC_PI_2);
        assert!(rotated.x.abs() < 1e-12);
        assert_ulps_eq!(rotated.y, 1.0);
    }
    #[test]
    fn test_point2d_rotate_zero_is_identity() {
        let p = Point2d { x: 3.5, y: -2.0 };
        assert_eq!(p.rotate(0.0), p);
    }

    #[test]
    fn test_wrap_to_pi_positive_overflow() {
        assert_ulps_eq!(wrap_to_pi(PI + 0.5), -PI + 0.5);
    }
    #[test]
    fn test_wrap_to_pi_negative_overflow() {
        assert_ulps_eq!(wrap_to_pi(-PI - 0.5), PI - 0.5);
    }
    #[test]
    fn test_wrap_to_pi_in_range() {
        assert_ulps_eq!(wrap_to_pi(1.0), 1.0);
    }

    #[test]
    fn test_point3d_lerp_towards() {
        let p = Point3d {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        };
        let target = Point3d {
            x: 10.0,
            y: 4.0,
            z: -2.0,
        };
        assert_eq!(
            p.lerp_towards(&target, 0.5),
            Point3d {
                x: 5.0,
                y: 2.0,
                z: -1.0
            }
        );
    }
    #[test]
    fn test_point3d_lerp_towards_full_gain() {
        let p = Point3d {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        let target = Point3d {
            x: -4.0,
            y: 0.0,
            z: 8.0,
        };
        assert_eq!(p.lerp_towards(&target, 1.0), target);
    }
}
