use bytemuck::{Pod, Zeroable};

use crate::types::{BASE_SPEED, COLOR_DEEP, COLOR_SKY};

/// A value accepted by the named uniform interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Color([f32; 3]),
    Matrix([[f32; 4]; 4]),
}

/// CPU mirror of the `WaveParams` uniform block.
///
/// std140 layout: the mat4 and vec4s are 16-byte aligned, the trailing
/// scalars pack at 4 bytes, and the struct size is a 16-byte multiple.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct WaveUniforms {
    clip_from_model: [[f32; 4]; 4],
    color_a: [f32; 4],
    color_b: [f32; 4],
    time: f32,
    time_scale: f32,
    brightness: f32,
    range: f32,
}

unsafe impl Zeroable for WaveUniforms {}
unsafe impl Pod for WaveUniforms {}

impl WaveUniforms {
    pub fn new(brightness: f32, range: f32) -> Self {
        Self {
            clip_from_model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            color_a: pad_color(COLOR_DEEP),
            color_b: pad_color(COLOR_SKY),
            time: 0.0,
            time_scale: BASE_SPEED,
            brightness,
            range,
        }
    }

    /// Writes one parameter by its block field name.
    ///
    /// An unknown name or a mismatched value type means the shader contract
    /// and the caller have diverged; both fail fast.
    pub fn set(&mut self, name: &str, value: UniformValue) {
        match (name, value) {
            ("clip_from_model", UniformValue::Matrix(matrix)) => self.clip_from_model = matrix,
            ("color_a", UniformValue::Color(color)) => self.color_a = pad_color(color),
            ("color_b", UniformValue::Color(color)) => self.color_b = pad_color(color),
            ("time", UniformValue::Float(time)) => self.time = time,
            ("time_scale", UniformValue::Float(scale)) => self.time_scale = scale,
            ("brightness", UniformValue::Float(brightness)) => self.brightness = brightness,
            ("range", UniformValue::Float(range)) => self.range = range,
            ("clip_from_model" | "color_a" | "color_b" | "time" | "time_scale" | "brightness"
            | "range", value) => {
                panic!("shader parameter `{name}` rejects {value:?}")
            }
            _ => panic!("unknown shader parameter `{name}`"),
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn range(&self) -> f32 {
        self.range
    }
}

fn pad_color(color: [f32; 3]) -> [f32; 4] {
    [color[0], color[1], color[2], 1.0]
}
