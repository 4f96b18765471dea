pub mod attribute;
pub mod config;
pub mod constant;
pub mod environment;
pub mod error;
pub mod executor;

use std::io::Read;

use sly::{Lexer, Parser, Show, SlyError};
use tracing::debug;

pub use config::{CompilerConfig, ConfigError};
pub use constant::Constant;
pub use error::CompileError;
pub use executor::compile;

/// Translate source text into a show using the default configuration.
pub fn read_show(source: &str) -> Result<Show, SlyError> {
    read_show_with(source, &CompilerConfig::default())
}

/// Run the lexer, parser and compiler in order.
///
/// The first stage that collects any diagnostic stops the pipeline and its
/// bundle is returned; partial results are discarded.
pub fn read_show_with(source: &str, config: &CompilerConfig) -> Result<Show, SlyError> {
    let tokens = Lexer::new(source).lex()?;
    let statements = Parser::new(tokens).parse()?;
    let show = compile(&statements, config)?;
    debug!(slides = show.slides.len(), "show ready");
    Ok(show)
}

/// Read the whole stream, then compile it.
pub fn read_show_from<R: Read>(mut reader: R, config: &CompilerConfig) -> Result<Show, SlyError> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    read_show_with(&source, config)
}
