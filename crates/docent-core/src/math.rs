//! Pose math - vectors, quaternions, camera poses
//!
//! Minimal fixed-function 3D math for anchor poses and tweening. Angles at
//! the public surface are in degrees, matching the authored content.

use std::ops::{Add, Mul, Neg, Sub};

/// 3D position or direction
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance to another position
    pub fn distance(&self, other: &Vec3) -> f32 {
        (*self - *other).length()
    }

    pub fn dot(&self, other: &Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Linear interpolation (t is not clamped)
    pub fn lerp(&self, other: &Vec3, t: f32) -> Vec3 {
        Vec3 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Clamp the vector to a maximum length
    pub fn clamp_length(&self, max_len: f32) -> Vec3 {
        let len = self.length();
        if len > max_len && len > 0.0 {
            *self * (max_len / len)
        } else {
            *self
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Orientation (unit quaternion)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Rotation of `degrees` around a (non-zero) axis
    pub fn from_axis_angle(axis: Vec3, degrees: f32) -> Self {
        let len = axis.length();
        if len < 1e-6 {
            return Quat::IDENTITY;
        }
        let half = degrees.to_radians() * 0.5;
        let s = half.sin() / len;
        Quat {
            w: half.cos(),
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
        }
    }

    /// Yaw (around +Y), pitch (around +X), roll (around +Z), degrees
    pub fn from_euler(yaw: f32, pitch: f32, roll: f32) -> Self {
        let (yaw, pitch, roll) = (yaw.to_radians(), pitch.to_radians(), roll.to_radians());
        let cy = (yaw * 0.5).cos();
        let sy = (yaw * 0.5).sin();
        let cp = (pitch * 0.5).cos();
        let sp = (pitch * 0.5).sin();
        let cr = (roll * 0.5).cos();
        let sr = (roll * 0.5).sin();

        Quat {
            w: cr * cp * cy + sr * sp * sy,
            x: sr * cp * cy - cr * sp * sy,
            y: cr * sp * cy + sr * cp * sy,
            z: cr * cp * sy - sr * sp * cy,
        }
    }

    pub fn dot(&self, other: &Quat) -> f32 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn normalize(&self) -> Quat {
        let len = self.dot(self).sqrt();
        if len < 1e-6 {
            return Quat::IDENTITY;
        }
        Quat {
            w: self.w / len,
            x: self.x / len,
            y: self.y / len,
            z: self.z / len,
        }
    }

    /// Angular distance to another orientation, in degrees
    pub fn angle_to(&self, other: &Quat) -> f32 {
        let d = self.dot(other).abs().min(1.0);
        (2.0 * d.acos()).to_degrees()
    }

    /// Spherical linear interpolation
    pub fn slerp(&self, other: &Quat, t: f32) -> Quat {
        let mut dot = self.dot(other);

        let other = if dot < 0.0 {
            dot = -dot;
            Quat {
                w: -other.w,
                x: -other.x,
                y: -other.y,
                z: -other.z,
            }
        } else {
            *other
        };

        if dot > 0.9995 {
            // Linear interpolation for very close orientations
            let result = Quat {
                w: self.w + (other.w - self.w) * t,
                x: self.x + (other.x - self.x) * t,
                y: self.y + (other.y - self.y) * t,
                z: self.z + (other.z - self.z) * t,
            };
            return result.normalize();
        }

        let theta_0 = dot.acos();
        let theta = theta_0 * t;
        let sin_theta = theta.sin();
        let sin_theta_0 = theta_0.sin();

        let s0 = (theta_0 - theta).cos() - dot * sin_theta / sin_theta_0;
        let s1 = sin_theta / sin_theta_0;

        Quat {
            w: self.w * s0 + other.w * s1,
            x: self.x * s0 + other.x * s1,
            y: self.y * s0 + other.y * s1,
            z: self.z * s0 + other.z * s1,
        }
    }

    /// Rotate toward `target` by at most `max_degrees`.
    ///
    /// Returns `target` exactly once the remaining angle is within the step,
    /// so a decaying step size converges without overshoot.
    pub fn rotate_towards(&self, target: &Quat, max_degrees: f32) -> Quat {
        let angle = self.angle_to(target);
        if angle < 1e-4 || max_degrees >= angle {
            return *target;
        }
        self.slerp(target, max_degrees / angle).normalize()
    }

    /// The local -Z forward axis rotated into world space
    pub fn forward(&self) -> Vec3 {
        Vec3 {
            x: -(2.0 * (self.x * self.z + self.w * self.y)),
            y: -(2.0 * (self.y * self.z - self.w * self.x)),
            z: -(1.0 - 2.0 * (self.x * self.x + self.y * self.y)),
        }
    }
}

/// An authored or in-flight camera pose
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}
