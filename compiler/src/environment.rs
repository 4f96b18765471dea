use std::collections::HashMap;
use std::fmt;
use std::iter;

use sly::statement::Statement;
use sly::{Block, Slide};

use crate::constant::Constant;
use crate::error::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    File,
    Slide,
    Block,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::File => write!(f, "file"),
            ScopeKind::Slide => write!(f, "slide"),
            ScopeKind::Block => write!(f, "block"),
        }
    }
}

/// What a scope is building. Attribute and text statements write into it.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    File,
    Slide(Slide),
    Block(Block),
}

impl Target {
    pub fn kind(&self) -> ScopeKind {
        match self {
            Target::File => ScopeKind::File,
            Target::Slide(_) => ScopeKind::Slide,
            Target::Block(_) => ScopeKind::Block,
        }
    }
}

/// A variable binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Constant,
    pub mutable: bool,
    /// Line of the declaration, for diagnostics.
    pub line: usize,
}

/// A single lexical environment, opened for the file and for each slide and
/// block body.
#[derive(Debug)]
pub struct Scope<'a> {
    target: Target,
    variables: HashMap<String, Binding>,
    /// Macro bodies, borrowed from the statements being compiled.
    macros: HashMap<String, &'a [Statement]>,
    /// Completed slides and blocks, by name, for inheritance.
    slides: HashMap<String, Slide>,
    blocks: HashMap<String, Block>,
}

impl<'a> Scope<'a> {
    pub fn new(target: Target) -> Self {
        Scope {
            target,
            variables: HashMap::new(),
            macros: HashMap::new(),
            slides: HashMap::new(),
            blocks: HashMap::new(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.target.kind()
    }

    pub fn target_mut(&mut self) -> &mut Target {
        &mut self.target
    }

    pub fn into_target(self) -> Target {
        self.target
    }

    /// Bind a new name. A name may only be declared once per scope.
    pub fn declare_variable(&mut self, name: &str, binding: Binding) -> Result<(), CompileError> {
        if self.variables.contains_key(name) {
            return Err(CompileError::VariableRedeclared(name.to_string()));
        }
        self.variables.insert(name.to_string(), binding);
        Ok(())
    }

    pub fn declare_macro(&mut self, name: &str, body: &'a [Statement]) -> Result<(), CompileError> {
        if self.macros.contains_key(name) {
            return Err(CompileError::MacroRedeclared(name.to_string()));
        }
        self.macros.insert(name.to_string(), body);
        Ok(())
    }

    /// Later registrations under the same name replace earlier ones.
    pub fn register_slide(&mut self, name: &str, slide: Slide) {
        self.slides.insert(name.to_string(), slide);
    }

    pub fn register_block(&mut self, name: &str, block: Block) {
        self.blocks.insert(name.to_string(), block);
    }
}

/// The scope chain: the file scope at the root plus a stack of nested scopes.
/// Lookups walk from the innermost scope outward.
#[derive(Debug)]
pub struct Environment<'a> {
    file: Scope<'a>,
    nested: Vec<Scope<'a>>,
}

impl<'a> Default for Environment<'a> {
    fn default() -> Self {
        Environment::new()
    }
}

impl<'a> Environment<'a> {
    pub fn new() -> Self {
        Environment {
            file: Scope::new(Target::File),
            nested: Vec::new(),
        }
    }

    pub fn push_scope(&mut self, scope: Scope<'a>) {
        self.nested.push(scope);
    }

    /// Close the innermost scope. The file scope is never popped.
    pub fn pop_scope(&mut self) -> Option<Scope<'a>> {
        self.nested.pop()
    }

    pub fn depth(&self) -> usize {
        self.nested.len()
    }

    pub fn current(&self) -> &Scope<'a> {
        self.nested.last().unwrap_or(&self.file)
    }

    pub fn current_mut(&mut self) -> &mut Scope<'a> {
        self.nested.last_mut().unwrap_or(&mut self.file)
    }

    fn chain(&self) -> impl Iterator<Item = &Scope<'a>> {
        self.nested.iter().rev().chain(iter::once(&self.file))
    }

    /// Look up a variable, searching from innermost scope outward.
    pub fn get_variable(&self, name: &str) -> Option<&Binding> {
        self.chain().find_map(|scope| scope.variables.get(name))
    }

    /// Replace the value of the nearest binding named `name`.
    pub fn assign_variable(&mut self, name: &str, value: Constant) -> Result<(), CompileError> {
        let binding = self
            .nested
            .iter_mut()
            .rev()
            .chain(iter::once(&mut self.file))
            .find_map(|scope| scope.variables.get_mut(name))
            .ok_or_else(|| CompileError::UndeclaredAssignment(name.to_string()))?;

        if !binding.mutable {
            return Err(CompileError::ImmutableAssignment {
                name: name.to_string(),
                line: binding.line,
            });
        }
        binding.value = value;
        Ok(())
    }

    pub fn get_macro(&self, name: &str) -> Option<&'a [Statement]> {
        self.chain().find_map(|scope| scope.macros.get(name).copied())
    }

    pub fn get_slide(&self, name: &str) -> Option<&Slide> {
        self.chain().find_map(|scope| scope.slides.get(name))
    }

    pub fn get_block(&self, name: &str) -> Option<&Block> {
        self.chain().find_map(|scope| scope.blocks.get(name))
    }
}
