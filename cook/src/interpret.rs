//! The interpreter: a second walk over the same AST the constructor
//! already evaluated, this time pruned to dirty build commands, so that
//! side-effecting hooks like `echo` fire in the right scope and only
//! when something will actually be rebuilt (spec.md §4.6).

use {
    crate::{
        build_command::BuildCommand,
        construct::{Output, body_key, call_key},
        semantics::{Method, Value},
    },
    cook_lang::syntax::ast::{Expression, Statement},
    std::{collections::HashMap, io::Write},
};

/// Re-walk `program`, writing the argument of every `echo(...)` call
/// reached while the enclosing build command is dirty (or root) to
/// `out`.
///
/// Other method calls are evaluated for their argument side effects
/// (string coercion) but are otherwise no-ops here: the BC tree is
/// already built. `build(...)` calls resolve back to the build command
/// the constructor already created for them (via [`Output::bc_for_call`])
/// so that chain syntax (`build(foo).echo(hi)`) and the equivalent
/// description syntax (`build(foo) { echo(hi) }`) prune identically.
pub fn interpret<'a, W: Write>(output: &Output<'a>, program: &'a Statement<'a>, out: &mut W)
{
    log::debug!("re-walking recipe for dirty-scoped side effects");
    let mut interpreter = Interpreter{
        bc_for_body: &output.bc_for_body,
        bc_for_call: &output.bc_for_call,
        echoes: 0,
        out,
    };
    interpreter.walk_statement(output.root, program);
    log::debug!("printed {} echo line(s)", interpreter.echoes);
}

struct Interpreter<'m, 'a, 'w, W: Write>
{
    bc_for_body: &'m HashMap<usize, &'a BuildCommand<'a>>,
    bc_for_call: &'m HashMap<usize, &'a BuildCommand<'a>>,
    echoes: usize,
    out: &'w mut W,
}

impl<'m, 'a, 'w, W: Write> Interpreter<'m, 'a, 'w, W>
{
    fn walk_statement(&mut self, bc: &'a BuildCommand<'a>, statement: &'a Statement<'a>)
    {
        match statement {
            Statement::Expression{expression, ..} => {
                self.walk_expression(bc, expression);
            },

            Statement::Block{statements, ..} => {
                for statement in *statements {
                    self.walk_statement(bc, statement);
                }
            },

            Statement::Description{head, body} => {
                if let Statement::Expression{expression, ..} = &**head {
                    self.walk_expression(bc, expression);
                }

                match self.bc_for_body.get(&body_key(body)).copied() {
                    Some(scope) if scope.parent.is_some() && !scope.dirty.get() => {},
                    Some(scope) => self.walk_statement(scope, body),
                    None => self.walk_statement(bc, body),
                }
            },
        }
    }

    fn walk_expression(&mut self, bc: &'a BuildCommand<'a>, expression: &'a Expression<'a>) -> Value<'a>
    {
        match expression {
            Expression::Assignment{value, ..} => { self.walk_expression(bc, value); Value::Nil },

            Expression::Logical{left, right, ..} | Expression::Binary{left, right, ..} => {
                self.walk_expression(bc, left);
                self.walk_expression(bc, right);
                Value::Nil
            },

            Expression::Unary{right, ..} => { self.walk_expression(bc, right); Value::Nil },

            Expression::Chain{left, right, ..} => {
                let left_value = self.walk_expression(bc, left);
                let scope = match &left_value {
                    Value::BuildCommand(child) => *child,
                    _ => bc,
                };
                self.walk_expression(scope, right);
                left_value
            },

            Expression::LiteralInt{value, ..} => Value::Int(*value),
            Expression::LiteralFloat{value, ..} => Value::Float(*value),
            Expression::LiteralString{value, ..} => Value::String(value),
            Expression::LiteralBool{value, ..} => Value::Int(*value as i32),

            Expression::Variable{name, ..} => match Method::from_name(name) {
                Some(method) => Value::Method(method),
                None => Value::String(name),
            },

            Expression::Grouping{inner, ..} => self.walk_expression(bc, inner),

            Expression::Call{callee, arguments, ..} => {
                let callee_value = self.walk_expression(bc, callee);
                let args: Vec<Value> = arguments.iter()
                    .map(|argument| self.walk_expression(bc, argument))
                    .collect();

                // A `build(...)` call must resolve to the same build
                // command the constructor created for it, so that a
                // `Chain`'s `scope` above can follow it: without this,
                // `build(foo).echo(hi)` could never prune against
                // `foo`'s dirtiness, unlike the `build(foo) { ... }`
                // form (spec.md §8 scenario 4).
                if let Value::Method(Method::Build) = callee_value {
                    if let Some(child) = self.bc_for_call.get(&call_key(expression)).copied() {
                        return Value::BuildCommand(child);
                    }
                }

                if let Value::Method(Method::Echo) = callee_value {
                    if bc.parent.is_none() || bc.dirty.get() {
                        if let Some(message) = args.first().and_then(Value::as_str) {
                            let _ = writeln!(self.out, "{message}");
                            self.echoes += 1;
                        }
                    }
                }

                Value::Nil
            },
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::construct::construct;
    use cook_lang::syntax::parse::{Arenas, parse_unit};
    use typed_arena::Arena;

    /// Parse, construct, and interpret `source`, forcing the dirtiness of
    /// each named depth-1 build command to the paired value before
    /// interpreting (overriding whatever freshness analysis computed, so
    /// these tests don't depend on filesystem state). Returns everything
    /// written to stdout.
    fn run(source: &str, set_dirty: &[(&str, bool)]) -> String
    {
        let expressions = Arena::new();
        let statements = Arena::new();
        let arenas = &Arenas{expressions: &expressions, statements: &statements};
        let bc_arena = Arena::new();
        let (program, diagnostics) = parse_unit(arenas, source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let output = construct(&bc_arena, program).unwrap();

        for child in output.root.children.borrow().iter() {
            let name = child.targets.borrow()[0].name.clone();
            if let Some(&(_, dirty)) = set_dirty.iter().find(|(n, _)| *n == name) {
                child.dirty.set(dirty);
            }
        }

        let mut buffer = Vec::new();
        interpret(&output, program, &mut buffer);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn echo_in_a_clean_description_subtree_is_silent()
    {
        assert_eq!(run("build(foo) { mark_clean() echo(hi) }", &[("foo", false)]), "");
    }

    #[test]
    fn echo_in_a_clean_chain_subtree_is_silent()
    {
        assert_eq!(run("build(foo).echo(hi)", &[("foo", false)]), "");
    }

    #[test]
    fn echo_in_a_dirty_chain_subtree_fires()
    {
        assert_eq!(run("build(foo).echo(hi)", &[("foo", true)]), "hi\n");
    }

    #[test]
    fn chain_and_description_echo_prune_identically()
    {
        assert_eq!(
            run("build(foo).echo(hi)", &[("foo", false)]),
            run("build(foo) { echo(hi) }", &[("foo", false)]),
        );
        assert_eq!(
            run("build(foo).echo(hi)", &[("foo", true)]),
            run("build(foo) { echo(hi) }", &[("foo", true)]),
        );
    }

    #[test]
    fn top_level_echo_always_fires()
    {
        assert_eq!(run("echo(hi)", &[]), "hi\n");
    }
}
