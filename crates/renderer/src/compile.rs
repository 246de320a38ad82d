use std::borrow::Cow;

use wgpu::naga::front::glsl::{Frontend, Options};
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};
use wgpu::naga::ShaderStage;

use crate::SetupError;

/// Validates one GLSL stage through naga's frontend and IR validator.
///
/// Runs entirely on the CPU, so malformed shader source is caught before any
/// GPU resources exist or a frame is scheduled.
pub(crate) fn validate_stage(source: &str, stage: ShaderStage) -> Result<(), SetupError> {
    let mut frontend = Frontend::default();
    let module = frontend
        .parse(&Options::from(stage), source)
        .map_err(|errors| SetupError::ShaderCompile {
            stage: stage_name(stage),
            message: errors.to_string(),
        })?;
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|error| SetupError::ShaderCompile {
            stage: stage_name(stage),
            message: error.into_inner().to_string(),
        })?;
    Ok(())
}

fn stage_name(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => "vertex",
        ShaderStage::Fragment => "fragment",
        _ => "shader",
    }
}

/// Compiles the wave vertex stage.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule, SetupError> {
    validate_stage(VERTEX_SHADER_GLSL, ShaderStage::Vertex)?;
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("wave vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Compiles the wave fragment stage.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
) -> Result<wgpu::ShaderModule, SetupError> {
    validate_stage(FRAGMENT_SHADER_GLSL, ShaderStage::Fragment)?;
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("wave fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FRAGMENT_SHADER_GLSL),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

/// Vertex stage: displaces the plane grid with layered travelling sines.
///
/// The uniform block layout must match `WaveUniforms` in `gpu/uniforms.rs`
/// field for field; both stages declare the identical block at binding 0.
pub(crate) const VERTEX_SHADER_GLSL: &str = r"#version 450

layout(location = 0) in vec3 position;
layout(location = 1) in vec2 uv;

layout(location = 0) out vec2 v_uv;
layout(location = 1) out float v_height;

layout(std140, set = 0, binding = 0) uniform WaveParams {
    mat4 clip_from_model;
    vec4 color_a;
    vec4 color_b;
    float time;
    float time_scale;
    float brightness;
    float range;
} ubo;

void main() {
    float t = ubo.time * ubo.time_scale;
    float height = sin(position.x * 1.4 + t) * 0.35
        + sin(position.y * 0.6 + t * 0.8) * 0.3
        + sin((position.x + position.y) * 0.9 + t * 1.3) * 0.12;
    v_uv = uv;
    v_height = height;
    gl_Position = ubo.clip_from_model * vec4(position.xy, position.z + height, 1.0);
}
";

/// Fragment stage: blue gradient plus two drifting simulated lights whose
/// intensity and falloff scale with the smoothed brightness/range factors.
pub(crate) const FRAGMENT_SHADER_GLSL: &str = r"#version 450

layout(location = 0) in vec2 v_uv;
layout(location = 1) in float v_height;

layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform WaveParams {
    mat4 clip_from_model;
    vec4 color_a;
    vec4 color_b;
    float time;
    float time_scale;
    float brightness;
    float range;
} ubo;

void main() {
    float t = ubo.time * ubo.time_scale;
    vec3 base = mix(ubo.color_a.rgb, ubo.color_b.rgb, clamp(v_uv.y + v_height * 0.5, 0.0, 1.0));

    vec2 glow_a = vec2(0.35 + 0.18 * sin(t * 0.50), 0.45 + 0.22 * cos(t * 0.37));
    vec2 glow_b = vec2(0.68 + 0.14 * cos(t * 0.61), 0.58 + 0.20 * sin(t * 0.29));

    float lit = (1.0 - smoothstep(0.0, 0.45 * ubo.range, distance(v_uv, glow_a)))
        + 0.8 * (1.0 - smoothstep(0.0, 0.38 * ubo.range, distance(v_uv, glow_b)));

    vec3 color = base + lit * ubo.brightness * vec3(0.30, 0.50, 0.85);
    float alpha = clamp(0.85 + v_height * 0.25, 0.0, 1.0);
    out_color = vec4(color * alpha, alpha);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_stages_validate() {
        validate_stage(VERTEX_SHADER_GLSL, ShaderStage::Vertex).expect("vertex stage");
        validate_stage(FRAGMENT_SHADER_GLSL, ShaderStage::Fragment).expect("fragment stage");
    }

    #[test]
    fn malformed_source_reports_stage_and_diagnostic() {
        let error = validate_stage("void main( {", ShaderStage::Fragment)
            .expect_err("parse must fail");
        match error {
            SetupError::ShaderCompile { stage, message } => {
                assert_eq!(stage, "fragment");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn both_stages_declare_the_same_uniform_block() {
        let block = |source: &str| {
            let start = source.find("uniform WaveParams").expect("block present");
            let end = source[start..].find("} ubo;").expect("block closed") + start;
            source[start..end].to_string()
        };
        assert_eq!(block(VERTEX_SHADER_GLSL), block(FRAGMENT_SHADER_GLSL));
    }
}
