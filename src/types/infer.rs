//! # Inference driver
//!
//! One rule per expression kind, all sharing a single running
//! [`Substitution`] that is reset at the start of every top-level
//! declaration. Rules that can fail return `Result<Type, TypeError>`;
//! [`Checker::infer`] catches the error, records it as a diagnostic and
//! continues with [`Type::None`], so one mistake does not hide the next.
//!
//! Once a declaration is done every annotation slot it contains is
//! rewritten with its fully resolved type.

use std::collections::{HashMap, HashSet};

use lachs::Span;
use tracing::{debug, trace};

use super::builtins::root_env;
use super::env::TypeEnv;
use super::error::TypeError;
use super::subst::Substitution;
use super::ty::{Type, TypeScheme, TypeVar};
use super::unify::unify;
use crate::ast::*;
use crate::config::CheckConfig;
use crate::diagnostics::{Category, Diagnostic, Diagnostics};

pub struct Checker {
    next_var: u32,
    subst: Substitution,
    /// Operators resolve against this table only.
    builtins: TypeEnv,
    diagnostics: Diagnostics,
    config: CheckConfig,
}

impl Checker {
    pub fn new() -> Self {
        Self::with_config(CheckConfig::default())
    }

    pub fn with_config(config: CheckConfig) -> Self {
        Self::with_builtins(config, root_env())
    }

    /// A checker whose operators resolve against `builtins` instead of the
    /// standard root context. Fresh variables start above every variable
    /// the table mentions.
    pub fn with_builtins(config: CheckConfig, builtins: TypeEnv) -> Self {
        Checker {
            next_var: builtins.next_unused_var(),
            subst: Substitution::empty(),
            builtins,
            diagnostics: Diagnostics::new(),
            config,
        }
    }

    /// Start the variable counter at `first_var`. Checkers that run side by
    /// side over the same base environment use disjoint ranges.
    pub fn starting_at(mut self, first_var: u32) -> Self {
        self.next_var = first_var;
        self
    }

    /// A fresh copy of the builtin context, for starting a new environment.
    pub fn root_env(&self) -> TypeEnv {
        self.builtins.clone()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn fresh_var(&mut self) -> Type {
        let var = TypeVar(self.next_var);
        self.next_var += 1;
        Type::Var(var)
    }

    pub fn instantiate(&mut self, scheme: &TypeScheme) -> Type {
        if scheme.is_monomorphic() {
            return scheme.ty.clone();
        }

        let fresh: Substitution = scheme
            .vars
            .iter()
            .map(|var| (*var, self.fresh_var()))
            .collect();
        let ty = fresh.rename(&scheme.ty);
        trace!(scheme = %scheme, ty = %ty, "instantiate");
        ty
    }

    /// Quantify the variables of `ty` that are not free in `env`.
    pub fn generalize(&self, env: &TypeEnv, ty: &Type) -> TypeScheme {
        let ty = self.subst.apply(ty);
        let live = env.free_type_vars(&self.subst);
        let mut vars: Vec<TypeVar> = ty
            .free_type_vars()
            .into_iter()
            .filter(|var| !live.contains(var))
            .collect();
        vars.sort();
        TypeScheme::polymorphic(vars, ty)
    }

    /// Check every declaration in order, extending `env` with each
    /// successful binding. Returns whether no error was reported.
    pub fn check_program(&mut self, program: &mut Program, env: &mut TypeEnv) -> bool {
        let mut passed = true;
        for declaration in &mut program.declarations {
            passed &= self.check_declaration(declaration, env);
        }
        passed
    }

    /// Check one top-level declaration.
    ///
    /// A failed declaration still binds its name, to [`Type::None`], so that
    /// later uses do not turn into unbound identifier errors.
    pub fn check_declaration(&mut self, declaration: &mut Expression, env: &mut TypeEnv) -> bool {
        self.subst = Substitution::empty();
        let errors_before = self.diagnostics.error_count();

        let ty = self.infer(env, declaration);
        let ty = self.subst.apply(&ty);
        self.resolve(declaration);

        let passed = self.diagnostics.error_count() == errors_before;
        debug!(passed, ty = %ty.normalized(), "checked declaration");

        match declaration.declared_name() {
            Some(name) if passed => {
                let scheme = self.generalize(env, &ty);
                if self.config.report_types {
                    self.diagnostics.push(Diagnostic::info(
                        Category::InferredType,
                        format!("{} : {scheme}", name.value),
                        name.position.clone(),
                    ));
                }
                env.insert(name.value.clone(), scheme);
            }
            Some(name) => env.insert(name.value.clone(), TypeScheme::monomorphic(Type::None)),
            None if passed && self.config.report_types => {
                self.diagnostics.push(Diagnostic::info(
                    Category::InferredType,
                    format!("- : {}", ty.normalized()),
                    declaration.position().clone(),
                ));
            }
            None => {}
        }

        passed
    }

    /// Infer the type of `expr`, writing it into the node's slot.
    pub fn infer(&mut self, env: &TypeEnv, expr: &mut Expression) -> Type {
        let result = match expr {
            Expression::Const(node) => Ok(Type::Primitive(node.value.primitive())),
            Expression::Ident(node) => self.infer_ident(env, node),
            Expression::Tuple(node) => Ok(self.infer_tuple(env, node)),
            Expression::Unary(node) => self.infer_unary(env, node),
            Expression::Binary(node) => self.infer_binary(env, node),
            Expression::App(node) => self.infer_app(env, node),
            Expression::If(node) => self.infer_if(env, node),
            Expression::Match(node) => Ok(self.infer_match(env, node)),
            Expression::Let(node) => Ok(self.infer_let(env, node)),
            Expression::Fun(node) => Ok(self.infer_fun(env, node)),
        };

        let ty = match result {
            Ok(ty) => ty,
            Err(err) => {
                self.report(err);
                Type::None
            }
        };
        *expr.ty_mut() = ty.clone();
        ty
    }

    fn report(&mut self, err: TypeError) {
        debug!(code = err.category().code(), error = %err, "type error");
        self.diagnostics.push(err.to_diagnostic());
    }

    /// Unify and report on failure, without aborting the caller.
    fn expect(&mut self, expected: &Type, found: &Type, span: &Span, context: &str) -> bool {
        match unify(expected, found, &mut self.subst) {
            Ok(()) => true,
            Err(err) => {
                self.report(TypeError::from_unify_error(err, span.clone()).with_context(context));
                false
            }
        }
    }

    fn expect_annotation(&mut self, declared: &Type, inferred: &Type, span: &Span) {
        if unify(declared, inferred, &mut self.subst).is_err() {
            let declared = self.subst.apply(declared);
            let inferred = self.subst.apply(inferred);
            self.report(TypeError::from_annotation(declared, inferred, span.clone()));
        }
    }

    fn infer_ident(&mut self, env: &TypeEnv, node: &Ident) -> Result<Type, TypeError> {
        match env.lookup(&node.value) {
            Some(scheme) => Ok(self.instantiate(scheme)),
            None => Err(TypeError::unbound_identifier(
                &node.value,
                node.position.clone(),
            )),
        }
    }

    fn infer_tuple(&mut self, env: &TypeEnv, node: &mut Tuple) -> Type {
        let items = node
            .items
            .iter_mut()
            .map(|item| self.infer(env, item))
            .collect();
        Type::Tuple(items)
    }

    /// Instantiate the builtin scheme for an operator of the given arity.
    fn operator(&mut self, name: &str, arity: usize, span: &Span) -> Result<Type, TypeError> {
        let scheme = self
            .builtins
            .lookup(name)
            .cloned()
            .ok_or_else(|| TypeError::invalid_operator(name, arity, span.clone()))?;

        let ty = self.instantiate(&scheme);
        if ty.arity() < arity {
            return Err(TypeError::invalid_operator(name, arity, span.clone()));
        }
        Ok(ty)
    }

    /// Unify `callee` against `a1 -> ... -> an -> 'r` and return `'r`.
    fn apply_to(
        &mut self,
        callee: &Type,
        args: Vec<Type>,
        span: &Span,
        context: &str,
    ) -> Result<Type, TypeError> {
        let ret = self.fresh_var();
        let expected = Type::curried(args, ret.clone());
        unify(callee, &expected, &mut self.subst)
            .map_err(|err| TypeError::from_unify_error(err, span.clone()).with_context(context))?;
        Ok(self.subst.apply(&ret))
    }

    fn infer_unary(&mut self, env: &TypeEnv, node: &mut Unary) -> Result<Type, TypeError> {
        let operand = self.infer(env, &mut node.operand);
        let op = self.operator(node.op.builtin_name(), 1, &node.position)?;
        let context = format!("operator `{}`", node.op.symbol());
        self.apply_to(&op, vec![operand], &node.position, &context)
    }

    fn infer_binary(&mut self, env: &TypeEnv, node: &mut Binary) -> Result<Type, TypeError> {
        let left = self.infer(env, &mut node.left);
        let right = self.infer(env, &mut node.right);
        let op = self.operator(node.op.builtin_name(), 2, &node.position)?;
        let context = format!("operator `{}`", node.op.symbol());
        self.apply_to(&op, vec![left, right], &node.position, &context)
    }

    /// Arguments are inferred left to right and unified against the callee
    /// as one arrow chain.
    fn infer_app(&mut self, env: &TypeEnv, node: &mut App) -> Result<Type, TypeError> {
        let callee = self.infer(env, &mut node.func);
        let args: Vec<Type> = node.args.iter_mut().map(|arg| self.infer(env, arg)).collect();

        match node.func.as_ref() {
            Expression::Tuple(_)
            | Expression::Const(_)
            | Expression::Unary(_)
            | Expression::Binary(_) => {
                return Err(TypeError::not_applicable(
                    node.func.describe(),
                    node.func.position().clone(),
                ));
            }
            _ => {}
        }

        let context = match node.func.as_ref() {
            Expression::Ident(ident) => format!("applying `{}`", ident.value),
            _ => "application".to_string(),
        };
        self.apply_to(&callee, args, &node.position, &context)
    }

    fn infer_if(&mut self, env: &TypeEnv, node: &mut If) -> Result<Type, TypeError> {
        let condition = self.infer(env, &mut node.condition);
        self.expect(
            &Type::bool(),
            &condition,
            node.condition.position(),
            "if condition",
        );

        let then_ty = self.infer(env, &mut node.then_branch);
        let (else_ty, span, context) = match &mut node.else_branch {
            Some(else_branch) => {
                let ty = self.infer(env, else_branch);
                (ty, else_branch.position().clone(), "if branches")
            }
            None => (
                Type::unit(),
                node.then_branch.position().clone(),
                "if without else",
            ),
        };

        unify(&then_ty, &else_ty, &mut self.subst)
            .map_err(|err| TypeError::from_unify_error(err, span).with_context(context))?;
        Ok(self.subst.apply(&then_ty))
    }

    fn infer_match(&mut self, env: &TypeEnv, node: &mut Match) -> Type {
        let scrutinee = self.infer(env, &mut node.scrutinee);
        let result = self.fresh_var();
        let mut reachable = true;

        for arm in &mut node.arms {
            if !reachable {
                debug!("unreachable match arm");
                self.diagnostics.push(
                    Diagnostic::warning(
                        Category::UnreachablePattern,
                        "unreachable match arm",
                        arm.position.clone(),
                    )
                    .with_help("an earlier arm already matches every value"),
                );
            }
            if arm.pattern.is_irrefutable() {
                reachable = false;
            }

            self.check_distinct_bindings(std::iter::once(&arm.pattern));
            let (pattern_ty, bindings) = self.infer_pattern(&mut arm.pattern);
            self.expect(&scrutinee, &pattern_ty, arm.pattern.position(), "match pattern");

            let arm_env = env.extend_many(bindings);
            let body = self.infer(&arm_env, &mut arm.body);
            self.expect(&result, &body, arm.body.position(), "match arms");
        }

        self.subst.apply(&result)
    }

    /// Report the first name that `patterns` bind more than once.
    fn check_distinct_bindings<'a>(&mut self, patterns: impl IntoIterator<Item = &'a Pattern>) {
        let mut seen = HashSet::new();
        for pattern in patterns {
            for name in pattern.bound_names() {
                if !seen.insert(name) {
                    self.report(TypeError::duplicate_binding(name, pattern.position().clone()));
                    return;
                }
            }
        }
    }

    /// Type a pattern and collect the monomorphic bindings it introduces.
    pub fn infer_pattern(&mut self, pattern: &mut Pattern) -> (Type, Vec<(String, TypeScheme)>) {
        let mut bindings = Vec::new();
        let ty = self.bind_pattern(pattern, &mut bindings);
        (ty, bindings)
    }

    fn bind_pattern(
        &mut self,
        pattern: &mut Pattern,
        bindings: &mut Vec<(String, TypeScheme)>,
    ) -> Type {
        let ty = match pattern {
            Pattern::Ident(ident) => {
                let ty = self.fresh_var();
                bindings.push((ident.value.clone(), TypeScheme::monomorphic(ty.clone())));
                ty
            }
            Pattern::Wildcard(_) => self.fresh_var(),
            Pattern::Literal(lit) => Type::Primitive(lit.value.primitive()),
            Pattern::Tuple(tuple) => Type::Tuple(
                tuple
                    .items
                    .iter_mut()
                    .map(|item| self.bind_pattern(item, bindings))
                    .collect(),
            ),
        };
        *pattern.ty_mut() = ty.clone();
        ty
    }

    fn infer_let(&mut self, env: &TypeEnv, node: &mut Let) -> Type {
        let value = self.infer(env, &mut node.value);
        if let Some(hint) = &node.hint {
            let declared = self.hint_to_type(hint);
            self.expect_annotation(&declared, &value, &node.position);
        }

        let value = self.subst.apply(&value);
        node.name.ty = value.clone();

        match &mut node.body {
            Some(body) => {
                let scheme = self.generalize(env, &value);
                trace!(name = %node.name.value, scheme = %scheme, "let");
                let body_env = env.extend(node.name.value.clone(), scheme);
                self.infer(&body_env, body)
            }
            None => value,
        }
    }

    fn infer_fun(&mut self, env: &TypeEnv, node: &mut Fun) -> Type {
        // bound before the body so that recursive calls see it
        let placeholder = self.fresh_var();
        let fun_env = match &node.name {
            Some(name) => env.extend(
                name.value.clone(),
                TypeScheme::monomorphic(placeholder.clone()),
            ),
            None => env.clone(),
        };

        self.check_distinct_bindings(&node.params);
        let mut bindings = Vec::new();
        let params: Vec<Type> = node
            .params
            .iter_mut()
            .map(|param| self.bind_pattern(param, &mut bindings))
            .collect();
        let body_env = fun_env.extend_many(bindings);
        let body = self.infer(&body_env, &mut node.body);

        let fun_ty = Type::curried(params, body);
        if let Err(err) = unify(&placeholder, &fun_ty, &mut self.subst) {
            self.report(
                TypeError::from_unify_error(err, node.position.clone())
                    .with_context("recursive use of the function"),
            );
        }
        if let Some(hint) = &node.hint {
            let declared = self.hint_to_type(hint);
            self.expect_annotation(&declared, &fun_ty, &node.position);
        }

        let fun_ty = self.subst.apply(&fun_ty);
        if let Some(name) = &mut node.name {
            name.ty = fun_ty.clone();
        }

        match &mut node.rest {
            Some(rest) => {
                let rest_env = match &node.name {
                    Some(name) => {
                        let scheme = self.generalize(env, &fun_ty);
                        trace!(name = %name.value, scheme = %scheme, "fun");
                        env.extend(name.value.clone(), scheme)
                    }
                    None => env.clone(),
                };
                self.infer(&rest_env, rest)
            }
            None => fun_ty,
        }
    }

    /// Named variables in one hint share a type variable; `_` is always
    /// fresh.
    fn hint_to_type(&mut self, hint: &TypeHint) -> Type {
        let mut named = HashMap::new();
        self.convert_hint(hint, &mut named)
    }

    fn convert_hint(&mut self, hint: &TypeHint, named: &mut HashMap<String, Type>) -> Type {
        match hint {
            TypeHint::Primitive(primitive) => Type::Primitive(*primitive),
            TypeHint::Var(name) => named
                .entry(name.clone())
                .or_insert_with(|| self.fresh_var())
                .clone(),
            TypeHint::Wildcard => self.fresh_var(),
            TypeHint::Fun(param, ret) => {
                let param = self.convert_hint(param, named);
                let ret = self.convert_hint(ret, named);
                Type::func(param, ret)
            }
            TypeHint::Tuple(items) => Type::Tuple(
                items
                    .iter()
                    .map(|item| self.convert_hint(item, named))
                    .collect(),
            ),
        }
    }

    /// Rewrite every annotation slot under `expr` with its resolved type.
    fn resolve(&self, expr: &mut Expression) {
        let ty = self.subst.apply(expr.ty());
        *expr.ty_mut() = ty;

        match expr {
            Expression::Const(_) | Expression::Ident(_) => {}
            Expression::Tuple(node) => node.items.iter_mut().for_each(|item| self.resolve(item)),
            Expression::Unary(node) => self.resolve(&mut node.operand),
            Expression::Binary(node) => {
                self.resolve(&mut node.left);
                self.resolve(&mut node.right);
            }
            Expression::App(node) => {
                self.resolve(&mut node.func);
                node.args.iter_mut().for_each(|arg| self.resolve(arg));
            }
            Expression::If(node) => {
                self.resolve(&mut node.condition);
                self.resolve(&mut node.then_branch);
                if let Some(else_branch) = &mut node.else_branch {
                    self.resolve(else_branch);
                }
            }
            Expression::Match(node) => {
                self.resolve(&mut node.scrutinee);
                for arm in &mut node.arms {
                    self.resolve_pattern(&mut arm.pattern);
                    self.resolve(&mut arm.body);
                }
            }
            Expression::Let(node) => {
                node.name.ty = self.subst.apply(&node.name.ty);
                self.resolve(&mut node.value);
                if let Some(body) = &mut node.body {
                    self.resolve(body);
                }
            }
            Expression::Fun(node) => {
                if let Some(name) = &mut node.name {
                    name.ty = self.subst.apply(&name.ty);
                }
                node.params
                    .iter_mut()
                    .for_each(|param| self.resolve_pattern(param));
                self.resolve(&mut node.body);
                if let Some(rest) = &mut node.rest {
                    self.resolve(rest);
                }
            }
        }
    }

    fn resolve_pattern(&self, pattern: &mut Pattern) {
        let ty = self.subst.apply(pattern.ty());
        *pattern.ty_mut() = ty;
        if let Pattern::Tuple(tuple) = pattern {
            tuple
                .items
                .iter_mut()
                .for_each(|item| self.resolve_pattern(item));
        }
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::lexer::{Token, strip_comments};
    use crate::parser::parse_tokens;

    fn parse(src: &str) -> Program {
        let tokens = Token::lex(&strip_comments(src)).unwrap();
        let (program, errors) = parse_tokens(tokens);
        assert!(errors.is_empty(), "parse errors: {errors:?}");
        program
    }

    fn check(src: &str) -> (Program, TypeEnv, Checker, bool) {
        let mut program = parse(src);
        let mut checker = Checker::new();
        let mut env = checker.root_env();
        let passed = checker.check_program(&mut program, &mut env);
        (program, env, checker, passed)
    }

    fn type_of(env: &TypeEnv, name: &str) -> String {
        env.lookup(name).unwrap().to_string()
    }

    fn categories(checker: &Checker) -> Vec<Category> {
        checker.diagnostics().iter().map(|d| d.category).collect()
    }

    #[test]
    fn test_fresh_vars_are_distinct() {
        let mut checker = Checker::new();
        let a = checker.fresh_var();
        let b = checker.fresh_var();
        assert_ne!(a, b);
    }

    #[test]
    fn test_starting_at_offsets_counter() {
        let mut checker = Checker::new().starting_at(100);
        assert_eq!(checker.fresh_var(), Type::Var(TypeVar(100)));
    }

    #[test]
    fn test_instantiate_monomorphic_is_identity() {
        let mut checker = Checker::new().starting_at(5);
        let scheme = TypeScheme::monomorphic(Type::Var(TypeVar(42)));
        assert_eq!(checker.instantiate(&scheme), Type::Var(TypeVar(42)));
        // no variable was consumed
        assert_eq!(checker.fresh_var(), Type::Var(TypeVar(5)));
    }

    #[test]
    fn test_instantiate_renames_quantified_vars() {
        let mut checker = Checker::new().starting_at(10);
        let a = TypeVar(0);
        let scheme = TypeScheme::polymorphic(vec![a], Type::func(Type::Var(a), Type::Var(a)));

        let first = checker.instantiate(&scheme);
        let second = checker.instantiate(&scheme);

        assert_eq!(first, Type::func(Type::Var(TypeVar(10)), Type::Var(TypeVar(10))));
        assert_eq!(second, Type::func(Type::Var(TypeVar(11)), Type::Var(TypeVar(11))));
    }

    #[test]
    fn test_generalize_skips_env_vars() {
        let checker = Checker::new();
        let env = TypeEnv::empty().extend(
            "x".to_string(),
            TypeScheme::monomorphic(Type::Var(TypeVar(0))),
        );
        let ty = Type::func(Type::Var(TypeVar(1)), Type::Var(TypeVar(0)));

        let scheme = checker.generalize(&env, &ty);
        assert_eq!(scheme.vars, vec![TypeVar(1)]);
    }

    #[test]
    fn test_infer_constants() {
        let (_, env, _, passed) = check("let a = 1;; let b = 2.5;; let c = \"s\";; let d = ();; let e = 'c'");
        assert!(passed);
        assert_eq!(type_of(&env, "a"), "int");
        assert_eq!(type_of(&env, "b"), "float");
        assert_eq!(type_of(&env, "c"), "string");
        assert_eq!(type_of(&env, "d"), "unit");
        assert_eq!(type_of(&env, "e"), "char");
    }

    #[test]
    fn test_infer_identity() {
        let (_, env, _, passed) = check("let id = fun x -> x");
        assert!(passed);
        assert_eq!(type_of(&env, "id"), "'a -> 'a");
        assert_eq!(env.lookup("id").unwrap().vars.len(), 1);
    }

    #[test]
    fn test_let_polymorphism() {
        let (program, _, checker, passed) = check("let id = fun x -> x in (id 1, id true)");
        assert!(passed, "{:?}", checker.diagnostics());
        assert_eq!(program.declarations[0].ty().normalized(), "int * bool");
    }

    #[test]
    fn test_generalization_respects_enclosing_scope() {
        let (_, env, _, passed) = check("fun f x -> let g = fun y -> x in g");
        assert!(passed);
        // had `x` been generalized in `g`, the result would be `'c`
        assert_eq!(type_of(&env, "f"), "'a -> 'b -> 'a");
    }

    #[test]
    fn test_recursive_function() {
        let (_, env, checker, passed) =
            check("fun fact n -> if n = 0 then 1 else n * fact (n - 1)");
        assert!(passed, "{:?}", checker.diagnostics());
        assert_eq!(type_of(&env, "fact"), "int -> int");
    }

    #[test]
    fn test_occurs_check_reported() {
        let (_, env, checker, passed) = check("fun f x -> f");
        assert!(!passed);
        assert_eq!(categories(&checker), vec![Category::OccursCheckFailed]);
        assert_eq!(env.lookup("f").unwrap().ty, Type::None);
    }

    #[test]
    fn test_unbound_identifier_once() {
        let (_, env, checker, passed) = check("let y = x + 1;; let z = 2");
        assert!(!passed);
        assert_eq!(categories(&checker), vec![Category::UnboundIdentifier]);
        assert_eq!(type_of(&env, "z"), "int");
    }

    #[test]
    fn test_failed_binding_does_not_cascade() {
        let (_, _, checker, passed) = check("let y = x;; let z = y + 1");
        assert!(!passed);
        assert_eq!(checker.diagnostics().error_count(), 1);
    }

    #[test]
    fn test_shadowing_is_scoped() {
        let (program, _, _, passed) = check("let x = 1 in (let x = true in x, x + 1)");
        assert!(passed);
        assert_eq!(program.declarations[0].ty().normalized(), "bool * int");
    }

    #[test]
    fn test_if_condition_must_be_bool() {
        let (_, _, checker, passed) = check("if 1 then 2 else 3");
        assert!(!passed);
        assert_eq!(categories(&checker), vec![Category::UnificationMismatch]);
    }

    #[test]
    fn test_if_without_else_is_unit() {
        let (program, _, _, passed) = check("if true then print \"hi\"");
        assert!(passed);
        assert_eq!(*program.declarations[0].ty(), Type::unit());

        let (_, _, checker, passed) = check("if true then 1");
        assert!(!passed);
        assert_eq!(categories(&checker), vec![Category::UnificationMismatch]);
    }

    #[test]
    fn test_match_unifies_arms() {
        let (_, env, _, passed) = check("fun swap p -> match p with (a, b) -> (b, a)");
        assert!(passed);
        assert_eq!(type_of(&env, "swap"), "'a * 'b -> 'b * 'a");
    }

    #[test]
    fn test_match_tuple_arity_mismatch() {
        let (_, _, checker, passed) = check("match (1, 2) with (a, b, c) -> a");
        assert!(!passed);
        assert_eq!(categories(&checker), vec![Category::UnificationMismatch]);
    }

    #[test]
    fn test_unreachable_arm_is_warning() {
        let (_, _, checker, passed) = check("match 1 with x -> 0 | 2 -> 1");
        assert!(passed);
        let diagnostics = checker.diagnostics();
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.as_slice()[0].severity, Severity::Warning);
        assert_eq!(diagnostics.as_slice()[0].category, Category::UnreachablePattern);
    }

    #[test]
    fn test_not_applicable() {
        let (_, _, checker, passed) = check("(1, 2) 3");
        assert!(!passed);
        assert_eq!(categories(&checker), vec![Category::NotApplicable]);
    }

    #[test]
    fn test_operator_mismatch() {
        let (_, _, checker, passed) = check("1 +. 2.0");
        assert!(!passed);
        assert_eq!(categories(&checker), vec![Category::UnificationMismatch]);
    }

    #[test]
    fn test_operator_context_uses_source_spelling() {
        let (_, _, checker, _) = check("let a = - 1.5;; let b = 1 +. 2.0");
        let messages: Vec<&str> = checker
            .diagnostics()
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].ends_with("(operator `-`)"), "{}", messages[0]);
        assert!(messages[1].ends_with("(operator `+.`)"), "{}", messages[1]);
    }

    #[test]
    fn test_builtin_identifiers_can_be_shadowed() {
        let (_, env, _, passed) = check("let print = 5;; let b = print + 1");
        assert!(passed);
        assert_eq!(type_of(&env, "b"), "int");
    }

    #[test]
    fn test_operators_resolve_against_root_only() {
        let mut program = parse("1 + 2");
        let mut checker = Checker::new();
        let mut env = TypeEnv::empty();
        assert!(checker.check_program(&mut program, &mut env));
        assert_eq!(*program.declarations[0].ty(), Type::int());
    }

    #[test]
    fn test_annotation_mismatch() {
        let (_, _, checker, passed) = check("let x : string = 1");
        assert!(!passed);
        assert_eq!(categories(&checker), vec![Category::AnnotationMismatch]);
    }

    #[test]
    fn test_annotation_narrows() {
        let (_, env, _, passed) = check("fun id (x : int) -> x");
        assert!(passed);
        assert_eq!(type_of(&env, "id"), "int -> int");

        let (_, env, _, passed) = check("let pair : 'a -> 'a * 'a = fun x -> (x, x)");
        assert!(passed);
        assert_eq!(type_of(&env, "pair"), "'a -> 'a * 'a");
    }

    #[test]
    fn test_panic_is_polymorphic() {
        let (_, env, _, passed) =
            check("fun safe_div a b -> if b = 0 then panic \"division by zero\" else a / b");
        assert!(passed);
        assert_eq!(type_of(&env, "safe_div"), "int -> int -> int");
    }

    #[test]
    fn test_slots_are_resolved() {
        let (program, _, _, _) = check("let f = fun x -> x + 1");
        let Expression::Let(node) = &program.declarations[0] else {
            panic!("expected let");
        };
        let Expression::Fun(fun) = node.value.as_ref() else {
            panic!("expected fun");
        };
        assert_eq!(*fun.params[0].ty(), Type::int());
        assert_eq!(*fun.body.ty(), Type::int());
        assert_eq!(node.name.ty, Type::func(Type::int(), Type::int()));
    }

    #[test]
    fn test_polymorphic_builtin_in_first_declaration() {
        let (_, env, checker, passed) = check("let b = 1 = 1");
        assert!(passed, "{:?}", checker.diagnostics());
        assert_eq!(type_of(&env, "b"), "bool");

        let (_, env, _, passed) = check("let f = panic");
        assert!(passed);
        assert_eq!(type_of(&env, "f"), "string -> 'a");
    }

    #[test]
    fn test_fresh_vars_start_above_builtins() {
        let mut checker = Checker::new();
        let floor = root_env().next_unused_var();
        assert!(floor > 0);
        assert_eq!(checker.fresh_var(), Type::Var(TypeVar(floor)));
    }

    #[test]
    fn test_missing_operator_is_invalid() {
        let builtins = TypeEnv::with_bindings(vec![(
            "+".to_string(),
            TypeScheme::monomorphic(Type::curried(vec![Type::int(), Type::int()], Type::int())),
        )]);
        let mut program = parse("let a = 1 + 2;; let b = 1 * 2");
        let mut checker = Checker::with_builtins(CheckConfig::default(), builtins);
        let mut env = TypeEnv::empty();

        assert!(!checker.check_program(&mut program, &mut env));
        assert_eq!(categories(&checker), vec![Category::InvalidOperator]);
        assert_eq!(type_of(&env, "a"), "int");
        assert!(checker.diagnostics().as_slice()[0].message.contains("`*`"));
    }

    #[test]
    fn test_operator_with_wrong_arity_is_invalid() {
        let builtins = TypeEnv::with_bindings(vec![
            ("+".to_string(), TypeScheme::monomorphic(Type::func(Type::int(), Type::int()))),
            ("not".to_string(), TypeScheme::monomorphic(Type::bool())),
        ]);
        let mut program = parse("1 + 2;; not true");
        let mut checker = Checker::with_builtins(CheckConfig::default(), builtins);
        let mut env = TypeEnv::empty();

        assert!(!checker.check_program(&mut program, &mut env));
        assert_eq!(
            categories(&checker),
            vec![Category::InvalidOperator, Category::InvalidOperator]
        );
    }

    #[test]
    fn test_duplicate_bindings() {
        let (_, _, checker, passed) = check("fun f x x -> x");
        assert!(!passed);
        assert_eq!(categories(&checker), vec![Category::DuplicateBinding]);

        let (_, _, checker, passed) = check("match (1, 2) with (a, a) -> a");
        assert!(!passed);
        assert_eq!(categories(&checker), vec![Category::DuplicateBinding]);

        // separate arms may reuse names
        let (_, _, _, passed) = check("match (1, 2) with (a, 0) -> a | (0, a) -> a | _ -> 0");
        assert!(passed);
    }

    #[test]
    fn test_report_types() {
        let mut program = parse("let id = fun x -> x;; 1 + 1");
        let mut checker = Checker::with_config(CheckConfig::default().with_report_types(true));
        let mut env = checker.root_env();
        assert!(checker.check_program(&mut program, &mut env));

        let messages: Vec<&str> = checker
            .diagnostics()
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(messages, vec!["id : 'a -> 'a", "- : int"]);
    }
}
