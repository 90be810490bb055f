use std::process::ExitCode;

use anyhow::Context;

use skitter_engine::logging::{init_logging, LoggingConfig};
use skitter_engine::render::ShaderProgram;

use skitter::GameConfig;

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());
    ExitCode::from(skitter::exit_status(start()))
}

fn start() -> anyhow::Result<()> {
    let config = GameConfig::default();

    // Shader problems are fatal before the window ever opens.
    let program = ShaderProgram::load(&config.vertex_shader, &config.fragment_shader)
        .context("unable to prepare sprite shaders")?;

    skitter::run(config, program)
}
