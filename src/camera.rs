//! Camera, projection and the two camera controls.
//!
//! The camera orientation is implied by its orbit target: it always looks from
//! `position` towards `target`. Two controls act on it every frame:
//!
//! - [`CameraController`] translates the camera along the horizontal look
//!   direction, the strafe axis and world up according to [`MovementFlags`],
//!   then moves the orbit target one unit in front of the camera.
//! - [`OrbitControls`] rotates the camera around the orbit target while the left
//!   mouse button is dragged, with optional damping.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};
use wgpu::util::DeviceExt;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, WindowEvent},
};

use crate::{
    config::{CameraConfig, ControlsConfig},
    input::MovementFlags,
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Below this a vector is treated as zero and not normalized.
const EPSILON: f32 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    /// The orbit target the camera looks at.
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(position: P, target: T) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.position, config.target)
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    /// Unit vector the camera looks along, or zero if target and position coincide.
    pub fn look_direction(&self) -> Vector3<f32> {
        normalize_or_zero(self.target - self.position)
    }

    /// The look direction projected onto the horizontal plane and renormalized.
    ///
    /// Zero when the camera looks straight up or down.
    pub fn horizontal_forward(&self) -> Vector3<f32> {
        let mut direction = self.look_direction();
        direction.y = 0.0;
        normalize_or_zero(direction)
    }
}

pub fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    let magnitude = v.magnitude();
    if magnitude > EPSILON {
        v / magnitude
    } else {
        Vector3::new(0.0, 0.0, 0.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            // a surface can report a zero size before its first layout
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Ignores sizes with a zero dimension and keeps the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU side of the camera: uniform, its buffer and bind group.
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(uniform: CameraUniform, device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                // the fragment stage reads the eye position
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Recompute the uniform from `camera` and `projection` and queue its upload.
    pub fn write(&mut self, queue: &wgpu::Queue, camera: &Camera, projection: &Projection) {
        self.uniform.update_view_proj(camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

/// Keyboard-driven free-fly movement.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraController {
    /// World units per frame.
    pub speed: f32,
}

impl CameraController {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Move the camera for one frame and re-aim the orbit target.
    ///
    /// Returns the horizontal forward vector the frame was computed with.
    pub fn update(&self, camera: &mut Camera, flags: &MovementFlags) -> Vector3<f32> {
        let forward = camera.horizontal_forward();
        let strafe = normalize_or_zero(camera.up.cross(forward));

        let mut translation = Vector3::new(0.0, 0.0, 0.0);
        if flags.forward {
            translation += forward * self.speed;
        }
        if flags.backward {
            translation -= forward * self.speed;
        }
        if flags.left {
            translation += strafe * self.speed;
        }
        if flags.right {
            translation -= strafe * self.speed;
        }
        camera.position += translation;
        if flags.up {
            camera.position.y += self.speed;
        }
        if flags.down {
            camera.position.y -= self.speed;
        }

        if forward != Vector3::new(0.0, 0.0, 0.0) {
            camera.target = camera.position + forward;
        } else {
            log::trace!("Camera looks straight up or down, keeping the orbit target");
        }
        forward
    }
}

/// Spherical coordinates around the world up axis: `phi` is measured from +Y,
/// `theta` around it starting at +Z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_vector(v: Vector3<f32>) -> Self {
        let radius = v.magnitude();
        if radius <= EPSILON {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_vector(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keep `phi` away from the poles where `theta` is undefined.
    pub fn make_safe(mut self) -> Self {
        self.phi = self.phi.clamp(EPSILON, std::f32::consts::PI - EPSILON);
        self
    }
}

/// Rotate the camera around its orbit target by dragging the left mouse button.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    viewport_height: f32,
    // (d_theta, d_phi) still to be applied
    pending: (f32, f32),
    dragging: bool,
    cursor: Option<PhysicalPosition<f64>>,
}

impl OrbitControls {
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            min_polar_angle: config.min_polar_angle,
            max_polar_angle: config.max_polar_angle,
            rotate_speed: config.rotate_speed,
            viewport_height: 1.0,
            pending: (0.0, 0.0),
            dragging: false,
            cursor: None,
        }
    }

    pub fn resize(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn has_pending_rotation(&self) -> bool {
        self.pending.0.abs() > EPSILON || self.pending.1.abs() > EPSILON
    }

    /// Orbit around world up. Positive angles turn the camera to the left.
    pub fn rotate_left(&mut self, angle: f32) {
        self.pending.0 -= angle;
    }

    /// Orbit over the target. Positive angles lift the camera.
    pub fn rotate_up(&mut self, angle: f32) {
        self.pending.1 -= angle;
    }

    /// Turn a cursor drag of `dx`/`dy` pixels into pending rotation. A drag over
    /// the full viewport height is one full turn.
    pub fn drag(&mut self, dx: f64, dy: f64) {
        let full_turn = 2.0 * std::f32::consts::PI * self.rotate_speed / self.viewport_height;
        self.rotate_left(dx as f32 * full_turn);
        self.rotate_up(dy as f32 * full_turn);
    }

    /// Route a window event. Returns true if it was used.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let used = match (self.dragging, self.cursor) {
                    (true, Some(last)) => {
                        self.drag(position.x - last.x, position.y - last.y);
                        true
                    }
                    _ => false,
                };
                self.cursor = Some(*position);
                used
            }
            WindowEvent::CursorLeft { .. } => {
                self.dragging = false;
                self.cursor = None;
                false
            }
            _ => false,
        }
    }

    /// Apply pending rotation to the camera. Returns true if the camera moved.
    ///
    /// With damping only `damping_factor` of the pending rotation is applied and
    /// the rest carries over to the next frames.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if !self.has_pending_rotation() {
            self.pending = (0.0, 0.0);
            return false;
        }
        let offset = camera.position - camera.target;
        let mut spherical = Spherical::from_vector(offset);
        if spherical.radius <= EPSILON {
            self.pending = (0.0, 0.0);
            return false;
        }

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.pending.0 * factor;
        spherical.phi += self.pending.1 * factor;
        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle);
        let spherical = spherical.make_safe();

        camera.position = camera.target + spherical.to_vector();

        if self.enable_damping {
            self.pending.0 *= 1.0 - self.damping_factor;
            self.pending.1 *= 1.0 - self.damping_factor;
        } else {
            self.pending = (0.0, 0.0);
        }
        true
    }
}
