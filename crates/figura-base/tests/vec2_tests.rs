use figura_base::Vec2;

#[test]
fn test_zero() {
    assert_eq!(Vec2::<f32>::zero(), Vec2::new(0.0, 0.0));
}

#[test]
fn test_add_sub() {
    let a = Vec2::new(3.0_f32, 4.0);
    let b = Vec2::new(1.0_f32, 1.5);
    assert_eq!(a + b, Vec2::new(4.0, 5.5));
    assert_eq!(a - b, Vec2::new(2.0, 2.5));
}

#[test]
fn test_scalar_and_componentwise_mul() {
    let a = Vec2::new(0.5_f32, 0.25);
    assert_eq!(a * 2.0, Vec2::new(1.0, 0.5));
    assert_eq!(a * Vec2::new(1280.0, 720.0), Vec2::new(640.0, 180.0));
}

#[test]
fn test_length_and_distance() {
    let a = Vec2::new(0.0_f32, 0.0);
    let b = Vec2::new(3.0_f32, 4.0);
    assert_eq!(b.length(), 5.0);
    assert_eq!(a.distance_to(b), 5.0);
    assert_eq!(b.distance_to(a), 5.0);
}

#[test]
fn test_midpoint() {
    let m = Vec2::new(100.0_f32, 200.0).midpoint(Vec2::new(140.0, 210.0));
    assert_eq!(m, Vec2::new(120.0, 205.0));
}

#[test]
fn test_extend_from_per_axis() {
    // shoulder (100, 300) -> ear (110, 200), extended 25% in x and 90% in y
    let ear = Vec2::new(110.0_f32, 200.0);
    let shoulder = Vec2::new(100.0_f32, 300.0);
    let top = ear.extend_from(shoulder, Vec2::new(0.25, 0.9));
    assert!((top.x - 112.5).abs() < 1e-4);
    assert!((top.y - 110.0).abs() < 1e-4);
}

#[test]
fn test_extend_from_coincident_points() {
    let p = Vec2::new(5.0_f32, 5.0);
    assert_eq!(p.extend_from(p, Vec2::new(0.25, 0.9)), p);
}

#[test]
fn test_is_finite() {
    assert!(Vec2::new(1.0_f32, 2.0).is_finite());
    assert!(!Vec2::new(f32::NAN, 2.0).is_finite());
    assert!(!Vec2::new(1.0, f32::INFINITY).is_finite());
}
