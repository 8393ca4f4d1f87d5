//! Static scope resolution: walks the AST once to compute, for every
//! variable reference, how many enclosing block scopes separate it from its
//! declaration. The evaluator uses this map instead of walking its
//! environment chain by name at call time.
//!
//! Resolver errors are static (no code runs here) but are tagged
//! `Phase::Runtime` by the pipeline that turns them into diagnostics, not
//! `Phase::Syntax` — a deliberate, preserved quirk rather than an oversight.

use crate::ast::*;
use crate::tokens::Token;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct ResolveError {
    pub message: String,
    pub token: Token,
}

impl ResolveError {
    fn new(message: impl Into<String>, token: Token) -> Self {
        Self {
            message: message.into(),
            token,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// The resolver's output: lexical depth for every node that refers to a
/// local variable, keyed by the referring expression's `NodeId`. A node
/// absent from the map refers to a global.
#[derive(Debug, Default, Clone)]
pub struct LocalResolution {
    depths: HashMap<NodeId, usize>,
}

impl LocalResolution {
    pub fn get(&self, id: NodeId) -> Option<usize> {
        self.depths.get(&id).copied()
    }
}

pub fn resolve(program: &Program) -> Result<LocalResolution, Vec<ResolveError>> {
    let mut resolver = Resolver::new();
    resolver.resolve_statements(&program.statements);
    if resolver.errors.is_empty() {
        Ok(resolver.locals)
    } else {
        Err(resolver.errors)
    }
}

struct Resolver {
    scopes: Vec<HashMap<String, bool>>,
    locals: LocalResolution,
    errors: Vec<ResolveError>,
    current_function: FunctionType,
    current_class: ClassType,
    loop_depth: usize,
}

impl Resolver {
    fn new() -> Self {
        Self {
            scopes: Vec::new(),
            locals: LocalResolution::default(),
            errors: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            loop_depth: 0,
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(&name.lexeme) {
                self.errors.push(ResolveError::new(
                    format!(
                        "Variable with name '{}' already declared in this scope.",
                        name.lexeme
                    ),
                    name.clone(),
                ));
            }
            scope.insert(name.lexeme.clone(), false);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    /// Records the lexical depth for a name reference, Option-based: any
    /// depth at which the name is found is recorded, including depth 0.
    fn resolve_local(&mut self, node_id: NodeId, name: &str) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name) {
                self.locals.depths.insert(node_id, depth);
                return;
            }
        }
    }

    /// Same lookup as `resolve_local`, but tests the depth for truthiness
    /// before recording it rather than testing whether it was found at all.
    /// A hit at depth 0 is therefore silently treated as "not local" and
    /// falls through to a global lookup at runtime. `Assign` and `Super`
    /// resolve this way; every other expression uses `resolve_local`.
    fn resolve_local_truthy(&mut self, node_id: NodeId, name: &str) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name) {
                if depth != 0 {
                    self.locals.depths.insert(node_id, depth);
                }
                return;
            }
        }
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr { expr, .. } => self.resolve_expr(expr),
            Stmt::Print { expr, .. } => self.resolve_expr(expr),
            Stmt::Var { name, init, .. } => {
                self.declare(name);
                if let Some(init) = init {
                    self.resolve_expr(init);
                }
                self.define(name);
            }
            Stmt::Block { statements, .. } => {
                self.begin_scope();
                self.resolve_statements(statements);
                self.end_scope();
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While {
                condition, body, ..
            } => {
                self.resolve_expr(condition);
                self.loop_depth += 1;
                self.resolve_stmt(body);
                self.loop_depth -= 1;
            }
            Stmt::Break { keyword, .. } => {
                if self.loop_depth == 0 {
                    self.errors.push(ResolveError::new(
                        "Cannot use 'break' outside of a loop.",
                        keyword.clone(),
                    ));
                }
            }
            Stmt::Continue { keyword, .. } => {
                if self.loop_depth == 0 {
                    self.errors.push(ResolveError::new(
                        "Cannot use 'continue' outside of a loop.",
                        keyword.clone(),
                    ));
                }
            }
            Stmt::Function { decl, .. } => {
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionType::Function);
            }
            Stmt::Return { keyword, value, .. } => {
                if self.current_function == FunctionType::None {
                    self.errors.push(ResolveError::new(
                        "Cannot return from top-level code.",
                        keyword.clone(),
                    ));
                }
                if let Some(value) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.errors.push(ResolveError::new(
                            "Cannot return a value from an initializer.",
                            keyword.clone(),
                        ));
                    }
                    self.resolve_expr(value);
                }
            }
            Stmt::Class { decl, .. } => self.resolve_class(decl),
        }
    }

    fn resolve_class(&mut self, decl: &ClassDecl) {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(&decl.name);
        self.define(&decl.name);

        if let Some(Expr::Variable { name: super_name, .. }) = &decl.superclass {
            if super_name.lexeme == decl.name.lexeme {
                self.errors.push(ResolveError::new(
                    "A class cannot inherit from itself.",
                    super_name.clone(),
                ));
            }
            self.current_class = ClassType::Subclass;
            self.resolve_expr(decl.superclass.as_ref().unwrap());
            self.begin_scope();
            self.scopes.last_mut().unwrap().insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes
            .last_mut()
            .unwrap()
            .insert("this".to_string(), true);

        for method in &decl.methods {
            let fn_type = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, fn_type);
        }

        self.end_scope();

        if decl.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_function(&mut self, decl: &FunctionDecl, fn_type: FunctionType) {
        let enclosing_function = self.current_function;
        let enclosing_loop_depth = self.loop_depth;
        self.current_function = fn_type;
        self.loop_depth = 0;

        self.begin_scope();
        for param in &decl.params {
            self.declare(&param.name);
            self.define(&param.name);
        }
        self.resolve_statements(&decl.body);
        self.end_scope();

        self.current_function = enclosing_function;
        self.loop_depth = enclosing_loop_depth;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal { .. } => {}
            Expr::ArrayLit { elements, .. } => {
                for element in elements {
                    self.resolve_expr(element);
                }
            }
            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&false) {
                        self.errors.push(ResolveError::new(
                            format!(
                                "Cannot read local variable '{}' in its own initializer.",
                                name.lexeme
                            ),
                            name.clone(),
                        ));
                    }
                }
                self.resolve_local(*id, &name.lexeme);
            }
            Expr::Grouping { expr, .. } => self.resolve_expr(expr),
            Expr::Unary { right, .. } => self.resolve_expr(right),
            Expr::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Assign { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local_truthy(*id, &name.lexeme);
            }
            Expr::Call { callee, args, .. } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Get { object, .. } => self.resolve_expr(object),
            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }
            Expr::GetIndexed { object, index, .. } => {
                self.resolve_expr(object);
                self.resolve_expr(index);
            }
            Expr::SetIndexed {
                object,
                index,
                value,
                ..
            } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
                self.resolve_expr(index);
            }
            Expr::This { id, keyword } => {
                if self.current_class == ClassType::None {
                    self.errors.push(ResolveError::new(
                        "Cannot use 'this' outside of a class.",
                        keyword.clone(),
                    ));
                    return;
                }
                self.resolve_local(*id, "this");
            }
            Expr::Super { id, keyword, .. } => {
                if self.current_class == ClassType::None {
                    self.errors.push(ResolveError::new(
                        "Cannot use 'super' outside of a class.",
                        keyword.clone(),
                    ));
                } else if self.current_class != ClassType::Subclass {
                    self.errors.push(ResolveError::new(
                        "Cannot use 'super' in a class with no superclass.",
                        keyword.clone(),
                    ));
                } else {
                    self.resolve_local_truthy(*id, "super");
                }
            }
        }
    }
}
