use approx::assert_relative_eq;
use vis_core::nalgebra::{Point2, Point3, Rotation3, Vector3};
use vis_core::{CameraToReference, Pixel, Pose, Tolerance};
use vis_geom::{Side, Triangle};
use vis_pinhole::{Camera, CameraIntrinsics};

const EPSILON_APPROX: f64 = 1e-9;

fn posed_camera() -> Camera {
    let pose = CameraToReference::from_parts(
        Vector3::new(0.4, -1.2, 0.9),
        Rotation3::from_euler_angles(0.2, -0.7, 1.9),
    );
    Camera::new(CameraIntrinsics::default(), pose).unwrap()
}

#[test]
fn back_projection_round_trip() {
    let camera = posed_camera();
    for row in (0..=480).step_by(40) {
        for col in (0..=640).step_by(40) {
            let pixel = Pixel::new(row as f64, col as f64);
            let ray = camera.segment_through_pixel(pixel);
            assert_relative_eq!(ray.p0, camera.origin(), epsilon = EPSILON_APPROX);
            let back = camera.pixel_from_point(&ray.p1).unwrap();
            assert_relative_eq!(back.0, pixel.0, epsilon = 1e-7);
            // Any point along the ray projects to the same pixel.
            let near = camera.pixel_from_point(&ray.at(0.25)).unwrap();
            assert_relative_eq!(near.0, pixel.0, epsilon = 1e-7);
        }
    }
}

#[test]
fn ray_depth_is_max_range() {
    let camera = Camera::new(
        CameraIntrinsics::default().max_range(4.0),
        CameraToReference::identity(),
    )
    .unwrap();
    for corner in camera.intrinsics().corners() {
        let ray = camera.segment_through_pixel(corner);
        assert_relative_eq!(ray.p1.z, 4.0, epsilon = EPSILON_APPROX);
        assert!(ray.length() > 4.0);
    }
}

#[test]
fn frustum_contains_what_the_camera_sees() {
    let tolerance = Tolerance::default();
    let camera = posed_camera();
    let frustum = camera.frustum();
    for (row, col) in [(240.0, 320.0), (10.0, 10.0), (470.0, 630.0), (5.0, 600.0)] {
        let ray = camera.segment_through_pixel(Pixel::new(row, col));
        assert!(frustum.is_inside(&ray.at(0.5), tolerance));
        assert!(!frustum.is_inside(&ray.at(1.1), tolerance));
    }
    for (row, col) in [(-20.0, 320.0), (240.0, 700.0), (500.0, -5.0)] {
        let ray = camera.segment_through_pixel(Pixel::new(row, col));
        assert!(!frustum.is_inside(&ray.at(0.5), tolerance));
    }
    assert!(!frustum.is_inside(&camera.origin(), tolerance));
    assert!(frustum.is_inside_or_on(&camera.origin(), tolerance));
}

#[test]
fn frustum_sides_follow_the_image_borders() {
    let camera = Camera::new(CameraIntrinsics::default(), CameraToReference::identity()).unwrap();
    let frustum = camera.frustum();
    // With the identity pose the top of the image looks towards negative y.
    let top = frustum.side(Side::Top).triangles()[0];
    let bottom = frustum.side(Side::Bottom).triangles()[0];
    let right = frustum.side(Side::Right).triangles()[0];
    let left = frustum.side(Side::Left).triangles()[0];
    assert!(top.b.y < 0.0 && top.c.y < 0.0);
    assert!(bottom.b.y > 0.0 && bottom.c.y > 0.0);
    assert!(right.b.x > 0.0 && right.c.x > 0.0);
    assert!(left.b.x < 0.0 && left.c.x < 0.0);
    for triangle in frustum.side(Side::Front).triangles() {
        for vertex in triangle.vertices() {
            assert_relative_eq!(vertex.z, 1.5, epsilon = EPSILON_APPROX);
        }
    }
}

#[test]
fn projection_skips_zero_depth() {
    let camera = Camera::new(CameraIntrinsics::default(), CameraToReference::identity()).unwrap();
    let visible = Triangle::new(
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.1, 0.0, 1.0),
        Point3::new(0.0, 0.1, 1.0),
    );
    let flat = Triangle::new(
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.1, 0.0, 0.0),
        Point3::new(0.0, 0.1, 1.0),
    );
    let behind = Triangle::new(
        Point3::new(0.0, 0.0, -1.0),
        Point3::new(0.1, 0.0, -1.0),
        Point3::new(0.0, 0.1, -1.0),
    );
    let projected = camera.project_triangles(&[visible, flat, behind]);
    assert_eq!(projected.len(), 2);
    assert_relative_eq!(projected[0].a, Point2::new(239.5, 319.5), epsilon = EPSILON_APPROX);
    assert_relative_eq!(projected[0].b, Point2::new(239.5, 319.5 + 52.5), epsilon = EPSILON_APPROX);
    // Behind the camera the image is mirrored through the principal point.
    assert_relative_eq!(projected[1].b, Point2::new(239.5, 319.5 - 52.5), epsilon = EPSILON_APPROX);
}
