use super::ShaderFilter;

/// One colour adjustment in a [`SimpleFilterBuilder`] chain.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SimpleStep {
    /// -1..1; negative darkens, positive lightens.
    Brightness(f32),
    /// -1..1.
    Contrast(f32),
    /// -1 is fully desaturated, 0 unchanged.
    Saturation(f32),
    Vignette { radius: f32, softness: f32, intensity: f32 },
}

impl SimpleStep {
    fn shader_line(self) -> String {
        match self {
            SimpleStep::Brightness(v) => format!("color = brightness(color, {v:.5});"),
            SimpleStep::Contrast(v) => format!("color = contrast(color, {v:.5});"),
            SimpleStep::Saturation(v) => format!("color = saturation(color, {v:.5});"),
            SimpleStep::Vignette { radius, softness, intensity } => format!(
                "color = vignette(color, {radius:.5}, {softness:.5}, {intensity:.5});"
            ),
        }
    }
}

const PRELUDE: &str = "#extension GL_OES_EGL_image_external : require
precision highp float;
varying vec2 textureCoord;
uniform samplerExternalOES externalTexture;

const vec3 W = vec3(0.2125, 0.7154, 0.0721);

vec3 brightness(vec3 color, float amount) {
    float scaled = amount / 2.0;
    if (scaled < 0.0) {
        return color * (1.0 + scaled);
    }
    return color + ((1.0 - color) * scaled);
}

vec3 contrast(vec3 color, float amount) {
    const float PI = 3.14159265;
    return min(vec3(1.0), ((color - 0.5) * tan((amount + 1.0) * PI / 4.0) + 0.5));
}

vec3 saturation(vec3 color, float amount) {
    float luminance = dot(color, W);
    return mix(vec3(luminance), color, amount + 1.0);
}

vec3 vignette(vec3 color, float radius, float softness, float intensity) {
    float len = length(textureCoord - vec2(0.5));
    float v = smoothstep(radius, radius - softness, len);
    return mix(color, color * v, intensity);
}
";

/// Composes colour adjustments, applied in insertion order, into one shader.
#[derive(Debug, Clone, Default)]
pub struct SimpleFilterBuilder {
    steps: Vec<SimpleStep>,
}

impl SimpleFilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brightness(mut self, amount: f32) -> Self {
        self.steps.push(SimpleStep::Brightness(amount));
        self
    }

    pub fn contrast(mut self, amount: f32) -> Self {
        self.steps.push(SimpleStep::Contrast(amount));
        self
    }

    pub fn saturation(mut self, amount: f32) -> Self {
        self.steps.push(SimpleStep::Saturation(amount));
        self
    }

    /// Defaults used by the stock presets: radius 0.75, softness 0.45, intensity 0.5.
    pub fn vignette(mut self, radius: f32, softness: f32, intensity: f32) -> Self {
        self.steps.push(SimpleStep::Vignette { radius, softness, intensity });
        self
    }

    pub fn steps(&self) -> &[SimpleStep] {
        &self.steps
    }

    pub fn shader_source(&self) -> String {
        let mut src = String::from(PRELUDE);
        src.push_str("\nvoid main() {\n    vec3 color = texture2D(externalTexture, textureCoord).rgb;\n");
        for step in &self.steps {
            src.push_str("    ");
            src.push_str(&step.shader_line());
            src.push('\n');
        }
        src.push_str("    gl_FragColor = vec4(color, 1.0);\n}\n");
        src
    }

    pub fn build(self) -> ShaderFilter {
        ShaderFilter::new("simple", self.shader_source())
    }
}
