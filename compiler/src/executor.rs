use sly::statement::Statement;
use sly::statement::value::Value;
use sly::{Block, ErrorBundle, Recovered, Show, Slide};
use tracing::{debug, trace};

use crate::attribute::Attribute;
use crate::config::CompilerConfig;
use crate::constant::Constant;
use crate::environment::{Binding, Environment, Scope, ScopeKind, Target};
use crate::error::CompileError;

/// Compile parsed statements into a show.
///
/// Every statement that fails is reported and skipped; its siblings still
/// run. On failure the show built from the statements that succeeded is
/// returned with the bundle.
pub fn compile(statements: &[Statement], config: &CompilerConfig) -> Result<Show, Recovered<Show>> {
    let mut compiler = Compiler::new(config);
    compiler.process_all(statements, 0);

    debug!(
        slides = compiler.show.slides.len(),
        errors = compiler.errors.len(),
        "compilation finished"
    );
    compiler.errors.into_result(compiler.show)
}

struct Compiler<'a> {
    env: Environment<'a>,
    show: Show,
    errors: ErrorBundle,
    max_macro_depth: Option<usize>,
}

impl<'a> Compiler<'a> {
    fn new(config: &CompilerConfig) -> Self {
        Compiler {
            env: Environment::new(),
            show: Show::new(),
            errors: ErrorBundle::new(),
            max_macro_depth: config.max_macro_depth,
        }
    }

    /// `depth` is the number of macro invocations being replayed.
    fn process_all(&mut self, statements: &'a [Statement], depth: usize) {
        for statement in statements {
            if let Err(error) = self.process(statement, depth) {
                self.errors.add(error.at(statement.token()));
            }
        }
    }

    fn process(&mut self, statement: &'a Statement, depth: usize) -> Result<(), CompileError> {
        match statement {
            Statement::Slide {
                name, parent, body, ..
            } => {
                if self.env.current().kind() != ScopeKind::File {
                    return Err(CompileError::SlideOutsideFile);
                }

                let mut slide = Slide::default();
                if let Some(parent) = parent {
                    let inherited = self
                        .env
                        .get_slide(parent)
                        .ok_or_else(|| CompileError::UndefinedParentSlide(parent.clone()))?;
                    slide.background = inherited.background;
                }

                if let Target::Slide(slide) = self.scoped(Target::Slide(slide), body, depth) {
                    self.env.current_mut().register_slide(name, slide.clone());
                    self.show.slides.push(slide);
                }
            }

            Statement::Block {
                name, parent, body, ..
            } => {
                if self.env.current().kind() != ScopeKind::Slide {
                    return Err(CompileError::BlockOutsideSlide);
                }

                let mut block = Block::default();
                if let Some(parent) = parent {
                    let inherited = self
                        .env
                        .get_block(parent)
                        .ok_or_else(|| CompileError::UndefinedParentBlock(parent.clone()))?;
                    block.style = inherited.style.clone();
                }

                if let Target::Block(block) = self.scoped(Target::Block(block), body, depth) {
                    let scope = self.env.current_mut();
                    scope.register_block(name, block.clone());
                    if let Target::Slide(slide) = scope.target_mut() {
                        slide.blocks.push(block);
                    }
                }
            }

            Statement::Text { text, .. } => match self.env.current_mut().target_mut() {
                Target::Block(block) => block.text = text.clone(),
                _ => return Err(CompileError::TextOutsideBlock),
            },

            Statement::VariableDeclaration {
                token,
                name,
                mutable,
                value,
            } => {
                let value = self.resolve(value)?;
                trace!(name = %name, value = %value, mutable, "variable declared");
                self.env.current_mut().declare_variable(
                    name,
                    Binding {
                        value,
                        mutable: *mutable,
                        line: token.line,
                    },
                )?;
            }

            Statement::VariableAssignment { name, value, .. } => {
                let value = self.resolve(value)?;
                self.env.assign_variable(name, value)?;
            }

            Statement::AttributeAssignment { name, value, .. } => {
                let attribute = Attribute::from_name(name)
                    .ok_or_else(|| CompileError::UnknownAttribute(name.clone()))?;
                let value = self.resolve(value)?;
                attribute.apply(self.env.current_mut().target_mut(), value)?;
            }

            Statement::Macro { name, body, .. } => {
                self.env.current_mut().declare_macro(name, body)?;
            }

            Statement::MacroCall { name, .. } => {
                let body = self
                    .env
                    .get_macro(name)
                    .ok_or_else(|| CompileError::UndefinedMacro(name.clone()))?;
                if let Some(max) = self.max_macro_depth {
                    if depth >= max {
                        return Err(CompileError::MacroDepthExceeded(max));
                    }
                }

                trace!(name = %name, depth, "replaying macro");
                // Replayed in the caller's scope, so `self.*` targets the caller
                self.process_all(body, depth + 1);
            }
        }

        Ok(())
    }

    /// Run `body` in a fresh scope building `target`, then hand the target back.
    fn scoped(&mut self, target: Target, body: &'a [Statement], depth: usize) -> Target {
        let kind = target.kind();
        self.env.push_scope(Scope::new(target));
        trace!(%kind, depth = self.env.depth(), "scope opened");

        self.process_all(body, depth);

        let target = self
            .env
            .pop_scope()
            .map(Scope::into_target)
            .unwrap_or(Target::File);
        trace!(%kind, depth = self.env.depth(), "scope closed");
        target
    }

    /// Turn a source value into a constant, dereferencing variables.
    fn resolve(&self, value: &Value) -> Result<Constant, CompileError> {
        match value {
            Value::String(s) => Ok(Constant::String(s.clone())),
            Value::Integer(n) => Ok(Constant::Integer(*n)),
            Value::Color(literal) => Ok(Constant::Color((*literal).into())),
            Value::Reference(name) => self
                .env
                .get_variable(name)
                .map(|binding| binding.value.clone())
                .ok_or_else(|| CompileError::UninitializedReference(name.clone())),
        }
    }
}
