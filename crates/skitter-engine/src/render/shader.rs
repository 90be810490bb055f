//! Shader loading and validation.
//!
//! Vertex and fragment stages live in separate WGSL files. Both are parsed
//! and validated with naga before any GPU object exists, so a bad shader is
//! reported at startup instead of surfacing as a wgpu validation panic.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point every source for this stage must export.
    pub const fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    fn naga_stage(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Startup failure while preparing the shader program.
#[derive(Debug)]
pub enum ShaderError {
    /// The source file is missing or could not be read.
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The source failed to parse or validate.
    Compile {
        stage: ShaderStage,
        path: PathBuf,
        message: String,
    },
    /// The stages compiled but do not fit together.
    Link { message: String },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Unreadable { path, source } => {
                write!(f, "failed to open shader file {}: {source}", path.display())
            }
            ShaderError::Compile { stage, path, message } => {
                write!(f, "{stage} shader compilation failed ({}): {message}", path.display())
            }
            ShaderError::Link { message } => write!(f, "shader program link failed: {message}"),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Unreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// WGSL source text plus where it came from.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub path: PathBuf,
    pub code: String,
}

impl ShaderSource {
    /// Reads a shader source file into memory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref().to_path_buf();
        match std::fs::read_to_string(&path) {
            Ok(code) => {
                log::debug!("loaded shader {} ({} bytes)", path.display(), code.len());
                Ok(Self { path, code })
            }
            Err(source) => Err(ShaderError::Unreadable { path, source }),
        }
    }
}

/// A validated vertex + fragment pair, ready for pipeline creation.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    vertex: ShaderSource,
    fragment: ShaderSource,
}

impl ShaderProgram {
    /// Loads both files and compiles them. Any failure is fatal to the caller.
    pub fn load(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex = ShaderSource::load(vertex_path)?;
        let fragment = ShaderSource::load(fragment_path)?;
        Self::compile(vertex, fragment)
    }

    /// Validates each stage, then checks that the fragment inputs are produced
    /// by the vertex stage.
    pub fn compile(vertex: ShaderSource, fragment: ShaderSource) -> Result<Self, ShaderError> {
        let vs = compile_stage(ShaderStage::Vertex, &vertex)?;
        let fs = compile_stage(ShaderStage::Fragment, &fragment)?;

        let outputs = vertex_output_locations(&vs);
        let inputs = fragment_input_locations(&fs);
        if let Some(missing) = inputs.difference(&outputs).next() {
            return Err(ShaderError::Link {
                message: format!(
                    "fragment input @location({missing}) is not written by {}",
                    ShaderStage::Vertex.entry_point()
                ),
            });
        }

        log::info!(
            "shader program ready ({}, {})",
            vertex.path.display(),
            fragment.path.display()
        );

        Ok(Self { vertex, fragment })
    }

    pub fn vertex(&self) -> &ShaderSource {
        &self.vertex
    }

    pub fn fragment(&self) -> &ShaderSource {
        &self.fragment
    }
}

fn compile_stage(stage: ShaderStage, src: &ShaderSource) -> Result<naga::Module, ShaderError> {
    let compile_err = |message: String| ShaderError::Compile {
        stage,
        path: src.path.clone(),
        message,
    };

    let module =
        naga::front::wgsl::parse_str(&src.code).map_err(|e| compile_err(e.emit_to_string(&src.code)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| compile_err(e.into_inner().to_string()))?;

    let entry = stage.entry_point();
    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.name == entry && ep.stage == stage.naga_stage());

    if !found {
        return Err(ShaderError::Link {
            message: format!(
                "{} does not export {stage} entry point `{entry}`",
                src.path.display()
            ),
        });
    }

    Ok(module)
}

fn find_entry(module: &naga::Module, stage: ShaderStage) -> Option<&naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == stage.entry_point() && ep.stage == stage.naga_stage())
}

fn vertex_output_locations(module: &naga::Module) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    if let Some(result) = find_entry(module, ShaderStage::Vertex).and_then(|ep| ep.function.result.as_ref()) {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

fn fragment_input_locations(module: &naga::Module) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    if let Some(ep) = find_entry(module, ShaderStage::Fragment) {
        for arg in &ep.function.arguments {
            collect_locations(module, arg.ty, arg.binding.as_ref(), &mut out);
        }
    }
    out
}

/// Gathers `@location(n)` bindings on a value, descending into struct members.
fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_main(@location(0) pos: vec3<f32>, @location(1) color: vec3<f32>) -> VsOut {
    var out: VsOut;
    out.clip = vec4<f32>(pos, 1.0);
    out.color = color;
    return out;
}
"#;

    const FS: &str = r#"
@fragment
fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(color, 1.0);
}
"#;

    fn src(name: &str, code: &str) -> ShaderSource {
        ShaderSource {
            path: PathBuf::from(name),
            code: code.to_string(),
        }
    }

    // ── loading ───────────────────────────────────────────────────────────

    #[test]
    fn missing_file_is_unreadable() {
        let err = ShaderSource::load("does/not/exist.vert.wgsl").unwrap_err();
        assert!(matches!(err, ShaderError::Unreadable { .. }));
        assert!(err.to_string().contains("does/not/exist.vert.wgsl"));
    }

    #[test]
    fn program_load_stops_at_first_missing_file() {
        let err = ShaderProgram::load("nope.vert.wgsl", "nope.frag.wgsl").unwrap_err();
        match err {
            ShaderError::Unreadable { path, .. } => assert_eq!(path, PathBuf::from("nope.vert.wgsl")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bundled_sprite_shaders_compile() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../shader");
        let program = ShaderProgram::load(
            format!("{dir}/sprite.vert.wgsl"),
            format!("{dir}/sprite.frag.wgsl"),
        )
        .unwrap();
        assert!(program.vertex().code.contains("vs_main"));
        assert!(program.fragment().code.contains("fs_main"));
    }

    // ── compile ───────────────────────────────────────────────────────────

    #[test]
    fn valid_pair_compiles() {
        assert!(ShaderProgram::compile(src("a.vert", VS), src("a.frag", FS)).is_ok());
    }

    #[test]
    fn syntax_error_is_compile_error_for_that_stage() {
        let bad = "@fragment fn fs_main( -> @location(0) vec4<f32> {}";
        let err = ShaderProgram::compile(src("a.vert", VS), src("bad.frag", bad)).unwrap_err();
        match err {
            ShaderError::Compile { stage, path, .. } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert_eq!(path, PathBuf::from("bad.frag"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn type_error_is_compile_error() {
        let bad = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    let x: f32 = vec2<f32>(1.0, 2.0);
    return vec4<f32>(x);
}
"#;
        let err = ShaderProgram::compile(src("a.vert", VS), src("bad.frag", bad)).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Fragment, .. }));
    }

    // ── link ──────────────────────────────────────────────────────────────

    #[test]
    fn missing_entry_point_is_link_error() {
        let renamed = VS.replace("vs_main", "main");
        let err = ShaderProgram::compile(src("a.vert", &renamed), src("a.frag", FS)).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert!(err.to_string().contains("vs_main"));
    }

    #[test]
    fn unmatched_fragment_input_is_link_error() {
        let fs = r#"
@fragment
fn fs_main(@location(3) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(uv, 0.0, 1.0);
}
"#;
        let err = ShaderProgram::compile(src("a.vert", VS), src("a.frag", fs)).unwrap_err();
        match err {
            ShaderError::Link { message } => assert!(message.contains("@location(3)")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fragment_may_ignore_vertex_outputs() {
        let fs = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 0.0, 1.0);
}
"#;
        assert!(ShaderProgram::compile(src("a.vert", VS), src("a.frag", fs)).is_ok());
    }
}
