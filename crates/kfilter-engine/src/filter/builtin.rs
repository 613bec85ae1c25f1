//! Stock effects.

use super::ShaderFilter;

const HEADER: &str = "#extension GL_OES_EGL_image_external : require
precision mediump float;
varying vec2 textureCoord;
uniform samplerExternalOES externalTexture;
";

fn with_header(body: &str) -> String {
    format!("{HEADER}{body}")
}

/// Samples the input unchanged.
pub fn passthrough() -> ShaderFilter {
    ShaderFilter::new(
        "passthrough",
        with_header(
            "void main() {
    gl_FragColor = texture2D(externalTexture, textureCoord);
}
",
        ),
    )
}

/// Channel average.
pub fn grayscale() -> ShaderFilter {
    ShaderFilter::new(
        "grayscale",
        with_header(
            "void main() {
    vec4 color = texture2D(externalTexture, textureCoord);
    float avg = (color.r + color.g + color.b) / 3.0;
    gl_FragColor = vec4(avg, avg, avg, 1.0);
}
",
        ),
    )
}

pub fn sepia() -> ShaderFilter {
    ShaderFilter::new(
        "sepia",
        with_header(
            "void main() {
    vec4 color = texture2D(externalTexture, textureCoord);
    float r = min((color.r * .393) + (color.g * .769) + (color.b * .189), 1.0);
    float g = min((color.r * .349) + (color.g * .686) + (color.b * .168), 1.0);
    float b = min((color.r * .272) + (color.g * .534) + (color.b * .131), 1.0);
    gl_FragColor = vec4(r, g, b, 1.0);
}
",
        ),
    )
}

/// Screen-blends a pink-to-purple gradient, then lifts contrast slightly.
pub fn warm() -> ShaderFilter {
    ShaderFilter::new(
        "warm",
        with_header(
            "vec3 gradient() {
    vec3 purple = vec3(180./255., 151./255., 202./255.);
    vec3 pink = vec3(213./255., 66./255., 108./255.);
    return vec3(
        textureCoord.y * (purple.r - pink.r) + pink.r,
        textureCoord.y * (purple.g - pink.g) + pink.g,
        textureCoord.x * (purple.b - pink.b) + pink.b);
}

vec3 screen(vec3 mask, float alpha, vec3 image) {
    return 1.0 - (1.0 - (mask * alpha)) * (1.0 - image);
}

vec3 contrast(vec3 color, float amount) {
    const float PI = 3.14159265;
    return min(vec3(1.0), ((color - 0.5) * tan((amount + 1.0) * PI / 4.0) + 0.5));
}

void main() {
    vec3 color = texture2D(externalTexture, textureCoord).rgb;
    color = screen(gradient(), 0.4, color);
    color = contrast(color, 0.2);
    gl_FragColor = vec4(color, 1.0);
}
",
        ),
    )
}

/// Quantizes each channel to `levels` steps. One level thresholds each
/// channel; zero is treated as one.
pub fn posterize(levels: u32) -> ShaderFilter {
    let n = levels.max(1);
    ShaderFilter::new(
        format!("posterize-{n}"),
        with_header(&format!(
            "void main() {{
    vec4 color = texture2D(externalTexture, textureCoord);
    vec3 q = floor(color.rgb * {n}.0) / {n}.0;
    gl_FragColor = vec4(q, 1.0);
}}
"
        )),
    )
}

/// Time-varying sine displacement driven by `kfilterTime`.
pub fn wobble() -> ShaderFilter {
    ShaderFilter::new(
        "wobble",
        with_header(
            "uniform int kfilterTime;

void main() {
    float time = float(kfilterTime) / 1000.0;
    float x = 0.03 * sin(16.0 * textureCoord.x) * sin(3.0 * time * 0.2);
    float y = 0.02 * sin(45.0 * textureCoord.y) * sin(9.0 * time * 0.1);
    vec3 color = texture2D(externalTexture, textureCoord + vec2(x, y)).rgb;
    gl_FragColor = vec4(color, 1.0);
}
",
        ),
    )
}
