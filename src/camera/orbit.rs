use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};

use crate::camera::core::Camera;
use crate::navigation::ManualControl;
use crate::options::OrbitOptions;

/// Radians of rotation per pixel of drag at `rotate_speed` 1.
const RADIANS_PER_PIXEL: f32 = 0.01;
/// World units of pan per pixel of drag, per unit of orbit radius.
const PAN_PER_PIXEL: f32 = 0.002;
/// Keeps the polar angle off the poles so `up` stays well defined.
const POLE_MARGIN: f32 = 1e-4;
/// Residual motion below which damping is considered settled.
const SETTLED: f32 = 1e-5;

/// Orbit-style manual camera control around a focus point.
///
/// Input accumulates into pending deltas that [`update`](Self::update)
/// applies to the camera, decaying them by the damping factor each frame.
/// While disabled, input is dropped and the camera is never written. When
/// re-enabled the orbit re-derives its focus and radius from the camera so
/// it picks up wherever navigation left it.
#[derive(Debug, Clone)]
pub struct OrbitController {
    focus: Vec3,
    radius: f32,
    /// Azimuth around +Y, measured from +Z.
    theta: f32,
    /// Polar angle from +Y.
    phi: f32,

    rotate_delta: Vec2,
    pan_delta: Vec3,
    zoom_scale: f32,

    enabled: bool,
    needs_sync: bool,

    /// Primary mouse button is held.
    pub mouse_pressed: bool,
    /// Shift is held; drags pan instead of rotate.
    pub shift_pressed: bool,

    options: OrbitOptions,
}

impl OrbitController {
    /// Orbit matching `camera`'s current pose, enabled.
    #[must_use]
    pub fn new(options: &OrbitOptions, camera: &Camera) -> Self {
        let mut orbit = Self {
            focus: Vec3::ZERO,
            radius: options.min_distance,
            theta: 0.0,
            phi: FRAC_PI_2,
            rotate_delta: Vec2::ZERO,
            pan_delta: Vec3::ZERO,
            zoom_scale: 1.0,
            enabled: true,
            needs_sync: false,
            mouse_pressed: false,
            shift_pressed: false,
            options: options.clone(),
        };
        orbit.sync_from(camera);
        orbit
    }

    /// Re-derive focus, radius and angles from `camera` and drop pending
    /// input.
    pub fn sync_from(&mut self, camera: &Camera) {
        self.focus = camera.target;
        let offset = camera.eye - camera.target;
        let radius = offset.length();
        self.radius = radius.clamp(self.options.min_distance, self.options.max_distance);
        if radius > f32::EPSILON {
            self.theta = offset.x.atan2(offset.z);
            self.phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        }
        self.phi = self.phi.clamp(POLE_MARGIN, PI - POLE_MARGIN);
        self.clear_input();
    }

    /// Queue a rotation from a mouse drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        if !self.enabled {
            return;
        }
        self.rotate_delta -= delta * self.options.rotate_speed * RADIANS_PER_PIXEL;
    }

    /// Queue a pan of the focus point from a drag of `delta` pixels.
    pub fn pan(&mut self, delta: Vec2) {
        if !self.enabled {
            return;
        }
        let offset = self.offset();
        let forward = (-offset).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let scale = self.options.pan_speed * PAN_PER_PIXEL * self.radius;
        self.pan_delta += (right * -delta.x + up * delta.y) * scale;
    }

    /// Queue a dolly; positive `delta` moves toward the focus.
    pub fn zoom(&mut self, delta: f32) {
        if !self.enabled {
            return;
        }
        self.zoom_scale *= (1.0 - delta * self.options.zoom_speed).max(0.01);
    }

    /// Apply pending input to `camera`. Returns true if the camera was
    /// written.
    ///
    /// Does nothing while disabled.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if !self.enabled {
            return false;
        }
        if self.needs_sync {
            self.sync_from(camera);
            self.needs_sync = false;
        }
        if self.is_settled() {
            return false;
        }

        let step = if self.options.damping > 0.0 {
            self.options.damping.min(1.0)
        } else {
            1.0
        };

        self.theta += self.rotate_delta.x * step;
        self.phi = (self.phi + self.rotate_delta.y * step).clamp(POLE_MARGIN, PI - POLE_MARGIN);
        self.focus += self.pan_delta * step;
        self.radius = (self.radius * self.zoom_scale)
            .clamp(self.options.min_distance, self.options.max_distance);

        self.rotate_delta *= 1.0 - step;
        self.pan_delta *= 1.0 - step;
        self.zoom_scale = 1.0;
        if self.rotate_delta.length() < SETTLED && self.pan_delta.length() < SETTLED {
            self.rotate_delta = Vec2::ZERO;
            self.pan_delta = Vec3::ZERO;
        }

        camera.eye = self.focus + self.offset();
        camera.target = self.focus;
        camera.up = Vec3::Y;
        true
    }

    /// Whether input is being accepted.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Point the camera orbits.
    #[must_use]
    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    /// Distance from focus to eye.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    fn offset(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * self.radius
    }

    fn is_settled(&self) -> bool {
        self.rotate_delta == Vec2::ZERO && self.pan_delta == Vec3::ZERO && self.zoom_scale == 1.0
    }

    fn clear_input(&mut self) {
        self.rotate_delta = Vec2::ZERO;
        self.pan_delta = Vec3::ZERO;
        self.zoom_scale = 1.0;
    }
}

impl ManualControl for OrbitController {
    fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.needs_sync = true;
        } else {
            self.clear_input();
            self.mouse_pressed = false;
        }
    }
}
