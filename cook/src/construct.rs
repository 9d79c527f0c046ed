//! The constructor: the first pass over a parsed recipe, turning it into
//! a tree of [`BuildCommand`]s with expanded target paths and computed
//! dirtiness.

use {
    crate::{
        build_command::{BuildCommand, BuildType, Target, extension_for_compiler},
        semantics::{Method, Value},
    },
    cook_lang::syntax::{
        ast::{Expression, Statement},
        location::Location,
    },
    std::{cell::RefCell, collections::HashMap, time::SystemTime},
    thiserror::Error,
    typed_arena::Arena,
};

/// A fatal error raised while evaluating a recipe against the build
/// command tree (spec.md §4.4, §7 "Construction error").
///
/// Unlike lex/parse diagnostics, these abort construction: continuing
/// risks building a BC tree for the wrong command lines.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error
{
    #[error("{0}: cannot call nil")]
    CallOnNil(Location),

    #[error("{0}: value is not callable")]
    CallOnNonMethod(Location),

    #[error("{location}: {method} takes {expected} argument(s), got {got}")]
    Arity{location: Location, method: &'static str, expected: usize, got: usize},

    #[error("{0}: argument must be a string")]
    UnsupportedArgument(Location),
}

/// The result of constructing a recipe: the root build command, and two
/// lookup tables from AST node (by pointer identity) to the build
/// command it was evaluated under or produced.
///
/// Both are consumed by [`crate::interpret`], which re-walks the same
/// AST and needs to know, for each `Statement::Description` body and
/// each `build(...)` call, which BC scope it belongs to or resolves to
/// (spec.md §4.6, §9 "re-walk synchronization").
pub struct Output<'a>
{
    pub root: &'a BuildCommand<'a>,
    pub bc_for_body: HashMap<usize, &'a BuildCommand<'a>>,
    pub bc_for_call: HashMap<usize, &'a BuildCommand<'a>>,
}

/// Evaluate `program` (the parser's single root block) into a BC tree
/// allocated out of `arena`, then expand target paths and compute
/// initial dirtiness.
pub fn construct<'a>(
    arena: &'a Arena<BuildCommand<'a>>,
    program: &'a Statement<'a>,
) -> Result<Output<'a>, Error>
{
    let root = arena.alloc(BuildCommand::new_root());

    let constructor = Constructor{
        arena,
        bc_for_body: RefCell::new(HashMap::new()),
        bc_for_call: RefCell::new(HashMap::new()),
        build_count: RefCell::new(0),
    };
    constructor.eval_statement(root, program)?;
    log::debug!("constructed {} build command(s)", *constructor.build_count.borrow());

    expand_targets(root);
    analyze_freshness(root);
    log::trace!("root dirty: {}", root.dirty.get());

    Ok(Output{
        root,
        bc_for_body: constructor.bc_for_body.into_inner(),
        bc_for_call: constructor.bc_for_call.into_inner(),
    })
}

struct Constructor<'a>
{
    arena: &'a Arena<BuildCommand<'a>>,
    bc_for_body: RefCell<HashMap<usize, &'a BuildCommand<'a>>>,
    bc_for_call: RefCell<HashMap<usize, &'a BuildCommand<'a>>>,
    build_count: RefCell<usize>,
}

impl<'a> Constructor<'a>
{
    fn eval_statement(&self, bc: &'a BuildCommand<'a>, statement: &'a Statement<'a>)
        -> Result<(), Error>
    {
        match statement {
            Statement::Expression{expression, ..} => {
                self.eval_expression(bc, expression)?;
                Ok(())
            },

            Statement::Block{statements, ..} => {
                for statement in *statements {
                    self.eval_statement(bc, statement)?;
                }
                Ok(())
            },

            Statement::Description{head, body} => {
                let value = match &**head {
                    Statement::Expression{expression, ..} =>
                        Some(self.eval_expression(bc, expression)?),
                    other => { self.eval_statement(bc, other)?; None },
                };

                let scope = match value {
                    Some(Value::BuildCommand(child)) => child,
                    _ => bc,
                };

                self.bc_for_body.borrow_mut().insert(body_key(body), scope);
                self.eval_statement(scope, body)
            },
        }
    }

    fn eval_expression(&self, bc: &'a BuildCommand<'a>, expression: &'a Expression<'a>)
        -> Result<Value<'a>, Error>
    {
        match expression {
            Expression::Assignment{value, ..} => {
                self.eval_expression(bc, value)?;
                Ok(Value::Nil)
            },

            Expression::Logical{left, right, ..} | Expression::Binary{left, right, ..} => {
                self.eval_expression(bc, left)?;
                self.eval_expression(bc, right)?;
                Ok(Value::Nil)
            },

            Expression::Unary{right, ..} => {
                self.eval_expression(bc, right)?;
                Ok(Value::Nil)
            },

            Expression::Chain{left, right, ..} => {
                let left_value = self.eval_expression(bc, left)?;
                let scope = match &left_value {
                    Value::BuildCommand(child) => *child,
                    _ => bc,
                };
                self.eval_expression(scope, right)?;
                Ok(left_value)
            },

            Expression::LiteralInt{value, ..} => Ok(Value::Int(*value)),
            Expression::LiteralFloat{value, ..} => Ok(Value::Float(*value)),
            Expression::LiteralString{value, ..} => Ok(Value::String(value)),
            Expression::LiteralBool{value, ..} => Ok(Value::Int(*value as i32)),

            Expression::Variable{name, ..} => Ok(match Method::from_name(name) {
                Some(method) => Value::Method(method),
                None => Value::String(name),
            }),

            Expression::Grouping{inner, ..} => self.eval_expression(bc, inner),

            Expression::Call{callee, paren, arguments} => {
                let callee_value = self.eval_expression(bc, callee)?;
                let method = match callee_value {
                    Value::Nil => return Err(Error::CallOnNil(*paren)),
                    Value::Method(method) => method,
                    _ => return Err(Error::CallOnNonMethod(*paren)),
                };

                let mut args = Vec::with_capacity(arguments.len());
                for argument in *arguments {
                    args.push(self.eval_expression(bc, argument)?);
                }

                let result = self.dispatch(bc, method, &args, *paren)?;
                if let (Method::Build, Value::BuildCommand(child)) = (method, &result) {
                    self.bc_for_call.borrow_mut().insert(call_key(expression), *child);
                }
                Ok(result)
            },
        }
    }

    fn dispatch(
        &self,
        bc: &'a BuildCommand<'a>,
        method: Method,
        args: &[Value<'a>],
        location: Location,
    ) -> Result<Value<'a>, Error>
    {
        if let Some(expected) = method.fixed_arity() {
            if args.len() != expected {
                return Err(Error::Arity{location, method: method.name(), expected, got: args.len()});
            }
        }

        log::trace!("{location}: {}({args:?})", method.name());

        let strings = || -> Result<Vec<&'a str>, Error> {
            args.iter()
                .map(|value| value.as_str().ok_or(Error::UnsupportedArgument(location)))
                .collect()
        };

        match method {
            Method::Build => {
                let child: &'a BuildCommand<'a> = self.arena.alloc(BuildCommand::inherit(bc));
                for name in strings()? {
                    child.targets.borrow_mut().push(Target::new(name));
                }
                bc.children.borrow_mut().push(child);
                *self.build_count.borrow_mut() += 1;
                log::info!("{location}: constructed build command with {} target(s)", child.targets.borrow().len());
                Ok(Value::BuildCommand(child))
            },

            Method::Compiler => {
                *bc.compiler.borrow_mut() = strings()?[0].to_string();
                Ok(Value::Nil)
            },
            Method::SourceDir => {
                *bc.source_dir.borrow_mut() = strings()?[0].to_string();
                Ok(Value::Nil)
            },
            Method::OutputDir => {
                *bc.output_dir.borrow_mut() = strings()?[0].to_string();
                Ok(Value::Nil)
            },

            Method::Input => {
                bc.input_files.borrow_mut().extend(strings()?.into_iter().map(str::to_string));
                Ok(Value::Nil)
            },
            Method::Cflags => {
                bc.cflags.borrow_mut().extend(strings()?.into_iter().map(str::to_string));
                Ok(Value::Nil)
            },
            Method::Ldflags => {
                bc.ldflags.borrow_mut().extend(strings()?.into_iter().map(str::to_string));
                Ok(Value::Nil)
            },
            Method::IncludeDir => {
                bc.include_dirs.borrow_mut().extend(strings()?.into_iter().map(str::to_string));
                Ok(Value::Nil)
            },
            Method::LibraryDir => {
                bc.library_dirs.borrow_mut().extend(strings()?.into_iter().map(str::to_string));
                Ok(Value::Nil)
            },
            Method::Link => {
                bc.library_links.borrow_mut().extend(strings()?.into_iter().map(str::to_string));
                Ok(Value::Nil)
            },

            Method::Dirty => {
                bc.mark_dirty_with_ancestors();
                Ok(Value::Nil)
            },
            Method::MarkClean => {
                bc.marked_clean_explicitly.set(true);
                Ok(Value::Nil)
            },

            // echo only has an observable effect during the interpreter
            // pass (spec.md §4.4); construction only validates its
            // argument type.
            Method::Echo => {
                strings()?;
                Ok(Value::Nil)
            },
        }
    }
}

/// A stable identity for a statement, used as a hash map key.
///
/// Statements are arena-allocated and never moved, so a reference's
/// address is a valid identity for the lifetime of the arena.
pub fn body_key(statement: &Statement) -> usize
{
    statement as *const Statement as usize
}

/// A stable identity for a `build(...)` call expression, used to look
/// up the build command that call produced during a later re-walk.
pub fn call_key(expression: &Expression) -> usize
{
    expression as *const Expression as usize
}

/// Build `input_name`/`output_name` for every target in the tree rooted
/// at `bc`, in pre-order, linking each child's target outputs into its
/// parent's `input_files` (spec.md §4.5, §8 invariant).
fn expand_targets(bc: &BuildCommand)
{
    let compiler = bc.compiler.borrow().clone();
    let ext = extension_for_compiler(&compiler);
    let object_suffix = if bc.build_type.get() == BuildType::Object { ".o" } else { "" };

    let source_dir = bc.source_dir.borrow().clone();
    let output_dir = bc.output_dir.borrow().clone();

    for target in bc.targets.borrow_mut().iter_mut() {
        target.input_name = join(&source_dir, &target.name, ext);
        target.output_name = join(&output_dir, &target.name, object_suffix);

        if let Some(parent) = bc.parent {
            parent.input_files.borrow_mut().push(target.output_name.clone());
        }
    }

    for child in bc.children.borrow().iter() {
        expand_targets(child);
    }
}

fn join(dir: &str, name: &str, suffix: &str) -> String
{
    if dir.is_empty() { format!("{name}{suffix}") }
    else { format!("{dir}/{name}{suffix}") }
}

/// Compute dirtiness bottom-up for the tree rooted at `bc` (spec.md
/// §4.5): a BC is dirty if any child is dirty, or if its oldest target
/// output is older than its newest input. The root is always dirty.
fn analyze_freshness(bc: &BuildCommand)
{
    for child in bc.children.borrow().iter() {
        analyze_freshness(child);
    }

    let any_child_dirty = bc.children.borrow().iter().any(|child| child.dirty.get());

    let dirty = if bc.parent.is_none() {
        true
    } else if any_child_dirty {
        true
    } else {
        let targets = bc.targets.borrow();
        let oldest_output = targets.iter()
            .map(|target| mtime(&target.output_name))
            .min()
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let newest_input = bc.input_files.borrow().iter().map(|path| mtime(path))
            .chain(targets.iter().map(|target| mtime(&target.input_name)))
            .max()
            .unwrap_or(SystemTime::UNIX_EPOCH);
        oldest_output < newest_input
    };

    bc.dirty.set(dirty);
    for target in bc.targets.borrow_mut().iter_mut() {
        target.dirty = dirty;
    }

    let label = bc.targets.borrow().first().map_or_else(|| "<root>".to_string(), |target| target.name.clone());
    log::info!("{label}: {}", if dirty { "dirty" } else { "clean" });
}

fn mtime(path: &str) -> SystemTime
{
    std::fs::metadata(path).and_then(|metadata| metadata.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Force every BC and target in the tree rooted at `bc` dirty, except
/// any BC (and its whole subtree) that was marked clean explicitly via
/// `mark_clean()` (spec.md §3, `--build-all` in §6).
pub fn mark_all_dirty(bc: &BuildCommand)
{
    if bc.marked_clean_explicitly.get() {
        return;
    }

    bc.dirty.set(true);
    for target in bc.targets.borrow_mut().iter_mut() {
        target.dirty = true;
    }

    for child in bc.children.borrow().iter() {
        mark_all_dirty(child);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use cook_lang::syntax::parse::{Arenas, parse_unit};

    fn build<'a>(arenas: &Arenas<'a>, bc_arena: &'a Arena<BuildCommand<'a>>, source: &'a str)
        -> Output<'a>
    {
        let (program, diagnostics) = parse_unit(arenas, source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        construct(bc_arena, program).expect("construction should succeed")
    }

    #[test]
    fn minimal_build_expands_default_compiler()
    {
        let expressions = Arena::new();
        let statements = Arena::new();
        let arenas = &Arenas{expressions: &expressions, statements: &statements};
        let bc_arena = Arena::new();
        let output = build(arenas, &bc_arena, "build(main)");

        let child = output.root.children.borrow()[0];
        assert_eq!(child.build_type.get(), BuildType::Executable);
        assert_eq!(child.targets.borrow()[0].input_name, "main.c");
        assert_eq!(child.targets.borrow()[0].output_name, "main");
    }

    #[test]
    fn nested_build_is_object_and_links_into_parent()
    {
        let expressions = Arena::new();
        let statements = Arena::new();
        let arenas = &Arenas{expressions: &expressions, statements: &statements};
        let bc_arena = Arena::new();
        let output = build(
            arenas,
            &bc_arena,
            "source_dir(src) output_dir(build) build(app) { build(util) }",
        );

        let app = output.root.children.borrow()[0];
        assert_eq!(app.build_type.get(), BuildType::Executable);
        let util = app.children.borrow()[0];
        assert_eq!(util.build_type.get(), BuildType::Object);
        assert_eq!(util.targets.borrow()[0].output_name, "build/util.o");
        assert_eq!(*app.input_files.borrow(), vec!["build/util.o".to_string()]);
    }

    #[test]
    fn chain_and_description_produce_the_same_tree()
    {
        let expressions = Arena::new();
        let statements = Arena::new();
        let arenas = &Arenas{expressions: &expressions, statements: &statements};
        let bc_arena = Arena::new();
        let chained = build(arenas, &bc_arena, "build(foo).build(bar)");
        let nested = build(arenas, &bc_arena, "build(foo) { build(bar) }");
        assert_eq!(chained.root, nested.root);
    }

    #[test]
    fn inheritance_is_a_snapshot_not_a_live_link()
    {
        let expressions = Arena::new();
        let statements = Arena::new();
        let arenas = &Arenas{expressions: &expressions, statements: &statements};
        let bc_arena = Arena::new();
        let output = build(
            arenas,
            &bc_arena,
            "cflags(-Wall, -Wextra) build(foo).cflags(-g) build(bar)",
        );

        let foo = output.root.children.borrow()[0];
        let bar = output.root.children.borrow()[1];
        assert_eq!(
            *foo.cflags.borrow(),
            vec!["-Wall".to_string(), "-Wextra".to_string(), "-g".to_string()],
        );
        assert_eq!(*bar.cflags.borrow(), vec!["-Wall".to_string(), "-Wextra".to_string()]);
    }

    #[test]
    fn multiple_targets_share_one_build_command()
    {
        let expressions = Arena::new();
        let statements = Arena::new();
        let arenas = &Arenas{expressions: &expressions, statements: &statements};
        let bc_arena = Arena::new();
        let output = build(
            arenas,
            &bc_arena,
            "source_dir(src) output_dir(build) build(cook) { build(file, token, lexer) }",
        );

        let cook = output.root.children.borrow()[0];
        assert_eq!(
            *cook.input_files.borrow(),
            vec![
                "build/file.o".to_string(),
                "build/token.o".to_string(),
                "build/lexer.o".to_string(),
            ],
        );
    }

    #[test]
    fn arity_mismatch_is_a_fatal_error()
    {
        Arenas::with(|arenas| {
            let bc_arena = Arena::new();
            let (program, _) = parse_unit(arenas, "compiler(gcc, clang)");
            assert!(matches!(construct(&bc_arena, program), Err(Error::Arity{..})));
        });
    }

    #[test]
    fn build_all_skips_explicitly_clean_subtrees()
    {
        let expressions = Arena::new();
        let statements = Arena::new();
        let arenas = &Arenas{expressions: &expressions, statements: &statements};
        let bc_arena = Arena::new();
        let output = build(arenas, &bc_arena, "build(foo).mark_clean() build(bar)");

        for child in output.root.children.borrow().iter() {
            child.dirty.set(false);
        }

        mark_all_dirty(output.root);

        let foo = output.root.children.borrow()[0];
        let bar = output.root.children.borrow()[1];
        assert!(!foo.dirty.get());
        assert!(bar.dirty.get());
    }
}
