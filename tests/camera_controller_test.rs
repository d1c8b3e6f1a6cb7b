use cgmath::{InnerSpace, Point3, Vector3};
use tiled_isle::{
    SceneConfig, WindowEvent,
    camera::{Camera, CameraController, CameraUniform, OrbitControls, Projection},
    config::ControlsConfig,
    input::MovementFlags,
};
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceId, ElementState, MouseButton},
    keyboard::KeyCode,
};

use crate::common::test_utils::{EPS, assert_point_eq, assert_vec_eq, scene};
mod common;

fn default_camera() -> Camera {
    Camera::new([0.0, 5.0, 7.0], [0.0, 0.0, 0.0])
}

fn flags(keys: &[KeyCode]) -> MovementFlags {
    let mut flags = MovementFlags::new();
    for key in keys {
        flags.on_key_down(*key);
    }
    flags
}

#[test]
fn idle_frame_keeps_position_and_aims_one_unit_ahead() {
    let mut camera = default_camera();
    let forward = CameraController::new(0.1).update(&mut camera, &MovementFlags::new());
    assert_vec_eq(forward, Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(camera.position, Point3::new(0.0, 5.0, 7.0));
    assert_point_eq(camera.target, Point3::new(0.0, 5.0, 6.0));
}

#[test]
fn forward_moves_horizontally_by_speed() {
    let mut camera = default_camera();
    CameraController::new(0.1).update(&mut camera, &flags(&[KeyCode::KeyW]));
    assert_point_eq(camera.position, Point3::new(0.0, 5.0, 6.9));
    assert_eq!(camera.position.y, 5.0);
    assert_point_eq(camera.target, Point3::new(0.0, 5.0, 5.9));
}

#[test]
fn backward_and_strafe_directions() {
    let controller = CameraController::new(0.1);

    let mut camera = default_camera();
    controller.update(&mut camera, &flags(&[KeyCode::ArrowDown]));
    assert_point_eq(camera.position, Point3::new(0.0, 5.0, 7.1));

    let mut camera = default_camera();
    controller.update(&mut camera, &flags(&[KeyCode::KeyA]));
    assert_point_eq(camera.position, Point3::new(-0.1, 5.0, 7.0));

    let mut camera = default_camera();
    controller.update(&mut camera, &flags(&[KeyCode::ArrowRight]));
    assert_point_eq(camera.position, Point3::new(0.1, 5.0, 7.0));
}

#[test]
fn vertical_movement_uses_world_up() {
    let controller = CameraController::new(0.1);

    let mut camera = default_camera();
    controller.update(&mut camera, &flags(&[KeyCode::KeyE]));
    assert_point_eq(camera.position, Point3::new(0.0, 5.1, 7.0));

    let mut camera = default_camera();
    controller.update(&mut camera, &flags(&[KeyCode::KeyG]));
    assert_point_eq(camera.position, Point3::new(0.0, 4.9, 7.0));
}

#[test]
fn opposite_flags_cancel() {
    let mut camera = default_camera();
    CameraController::new(0.1).update(
        &mut camera,
        &flags(&[KeyCode::KeyE, KeyCode::KeyQ, KeyCode::KeyW, KeyCode::KeyS]),
    );
    assert_point_eq(camera.position, Point3::new(0.0, 5.0, 7.0));
}

#[test]
fn diagonal_movement_is_additive() {
    let mut camera = default_camera();
    CameraController::new(0.1).update(&mut camera, &flags(&[KeyCode::KeyW, KeyCode::KeyA]));
    assert_point_eq(camera.position, Point3::new(-0.1, 5.0, 6.9));
    let travelled = (camera.position - Point3::new(0.0, 5.0, 7.0)).magnitude();
    assert!((travelled - 0.1 * 2f32.sqrt()).abs() < EPS);
}

#[test]
fn looking_straight_down_keeps_target() {
    let mut camera = Camera::new([0.0, 10.0, 0.0], [0.0, 0.0, 0.0]);
    let forward = CameraController::new(0.1).update(&mut camera, &flags(&[KeyCode::KeyW]));
    assert_eq!(forward, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(camera.position, Point3::new(0.0, 10.0, 0.0));
    assert_eq!(camera.target, Point3::new(0.0, 0.0, 0.0));
}

fn undamped() -> OrbitControls {
    OrbitControls::new(&ControlsConfig {
        enable_damping: false,
        ..Default::default()
    })
}

#[test]
fn orbit_without_input_leaves_camera_alone() {
    let mut camera = default_camera();
    let mut controls = OrbitControls::new(&ControlsConfig::default());
    assert!(!controls.update(&mut camera));
    assert_eq!(camera, default_camera());
}

#[test]
fn orbit_keeps_distance_to_target() {
    let mut camera = default_camera();
    let mut controls = undamped();
    controls.rotate_left(0.5);
    assert!(controls.update(&mut camera));
    let radius = (camera.position - camera.target).magnitude();
    assert!((radius - 74f32.sqrt()).abs() < EPS);
    assert!((camera.position.y - 5.0).abs() < EPS);
    assert!(!controls.has_pending_rotation());
}

#[test]
fn orbit_stops_at_the_horizon() {
    let mut camera = default_camera();
    let mut controls = undamped();
    controls.rotate_up(-3.0);
    controls.update(&mut camera);
    assert!(camera.position.y.abs() < EPS);
}

#[test]
fn damping_spreads_rotation_over_frames() {
    let mut camera = default_camera();
    let mut controls = OrbitControls::new(&ControlsConfig::default());
    controls.rotate_left(0.2);

    controls.update(&mut camera);
    assert!(controls.has_pending_rotation());
    let first_step = camera.position.x.atan2(camera.position.z).abs();
    assert!((first_step - 0.2 * 0.05).abs() < EPS);

    for _ in 0..1000 {
        controls.update(&mut camera);
    }
    assert!(!controls.has_pending_rotation());
    let total = camera.position.x.atan2(camera.position.z).abs();
    assert!((total - 0.2).abs() < 1e-3);
}

#[test]
fn full_height_drag_is_one_turn() {
    let mut camera = default_camera();
    let mut controls = undamped();
    controls.resize(600);
    controls.drag(600.0, 0.0);
    controls.update(&mut camera);
    assert_point_eq(camera.position, Point3::new(0.0, 5.0, 7.0));
}

#[test]
fn scene_tick_flies_then_orbits() {
    let mut scene = scene(SceneConfig::default());
    scene.input.on_key_down(KeyCode::KeyW);

    let frame = scene.tick();
    assert!(frame.moved);
    assert!(!frame.orbited);
    assert_point_eq(scene.camera.position, Point3::new(0.0, 5.0, 6.9));
    assert_point_eq(scene.camera.target, Point3::new(0.0, 5.0, 5.9));

    scene.handle_window_events(&WindowEvent::Focused(false));
    let frame = scene.tick();
    assert!(!frame.moved);
    assert_eq!(scene.frames(), 2);
}

#[test]
fn scene_resize_updates_aspect() {
    let mut scene = scene(SceneConfig::default());
    assert!((scene.projection.aspect() - 800.0 / 600.0).abs() < EPS);
    scene.resize(1000, 500);
    assert!((scene.projection.aspect() - 2.0).abs() < EPS);
    scene.resize(1000, 0);
    assert!((scene.projection.aspect() - 2.0).abs() < EPS);
}

#[test]
fn zero_width_viewport_keeps_a_valid_projection() {
    let mut scene = scene_with_size(0, 600);
    assert!(scene.projection.aspect() > 0.0);
    let mut uniform = CameraUniform::new();
    uniform.update_view_proj(&scene.camera, &scene.projection);

    scene.resize(800, 600);
    scene.resize(0, 600);
    assert!((scene.projection.aspect() - 800.0 / 600.0).abs() < EPS);
    uniform.update_view_proj(&scene.camera, &scene.projection);

    let mut projection = Projection::new(0, 0, cgmath::Deg(70.0), 0.1, 100.0);
    projection.resize(0, 0);
    assert!(projection.aspect() > 0.0);
    let _ = projection.calc_matrix();
}

fn scene_with_size(width: u32, height: u32) -> tiled_isle::Scene<String> {
    tiled_isle::Scene::new(SceneConfig::default(), width, height)
}

fn device_id() -> DeviceId {
    // SAFETY: only compared, never handed to the platform
    unsafe { DeviceId::dummy() }
}

fn left_button(state: ElementState) -> WindowEvent {
    WindowEvent::MouseInput {
        device_id: device_id(),
        state,
        button: MouseButton::Left,
    }
}

fn cursor_at(x: f64, y: f64) -> WindowEvent {
    WindowEvent::CursorMoved {
        device_id: device_id(),
        position: PhysicalPosition::new(x, y),
    }
}

#[test]
fn left_drag_through_window_events_orbits() {
    let mut scene = scene(SceneConfig::default());
    assert!(!scene.controls.is_dragging());

    // moving without a pressed button only tracks the cursor
    assert!(!scene.handle_window_events(&cursor_at(100.0, 100.0)));
    assert!(!scene.controls.has_pending_rotation());

    assert!(scene.handle_window_events(&left_button(ElementState::Pressed)));
    assert!(scene.controls.is_dragging());
    assert!(scene.handle_window_events(&cursor_at(160.0, 100.0)));
    assert!(scene.controls.has_pending_rotation());

    let frame = scene.tick();
    assert!(frame.orbited);

    scene.handle_window_events(&WindowEvent::CursorLeft {
        device_id: device_id(),
    });
    assert!(!scene.controls.is_dragging());
    assert!(!scene.handle_window_events(&cursor_at(200.0, 100.0)));
}

#[test]
fn releasing_the_button_ends_the_drag() {
    let mut controls = OrbitControls::new(&ControlsConfig::default());
    controls.resize(600);
    controls.handle_window_events(&cursor_at(10.0, 10.0));
    controls.handle_window_events(&left_button(ElementState::Pressed));
    controls.handle_window_events(&left_button(ElementState::Released));
    assert!(!controls.is_dragging());
    assert!(!controls.handle_window_events(&cursor_at(50.0, 10.0)));
    assert!(!controls.has_pending_rotation());
}
