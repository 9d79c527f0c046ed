//! The executor: walks the build command tree and either prints the
//! would-be compiler invocations (dry run) or runs them through the
//! host shell (spec.md §4.7, §6).

use {
    crate::build_command::{BuildCommand, BuildType, Target},
    std::{
        fs,
        io,
        process::Command,
    },
    thiserror::Error,
};

/// A failure while executing (not dry-running) the build plan.
#[derive(Debug, Error)]
pub enum Error
{
    #[error("failed to create output directory {path}: {source}")]
    CreateOutputDir{path: String, source: io::Error},

    #[error("failed to run command: {0}")]
    Spawn(#[from] io::Error),

    /// A compiler invocation exited with a nonzero status; the executor
    /// stops immediately (spec.md §4.7 step 5).
    #[error("command exited with status {status}: {line}")]
    NonZeroExit{line: String, status: i32},
}

/// Build the single command-line string for `target` of `bc`, in the
/// exact token order spec.md §4.7 requires.
pub fn command_line(bc: &BuildCommand, target: &Target) -> String
{
    let mut line = String::new();
    let mut push = |token: &str| { line.push_str(token); line.push(' '); };

    push(&bc.compiler.borrow());
    for flag in bc.cflags.borrow().iter() { push(flag); }
    if bc.build_type.get() == BuildType::Object { push("-c"); }
    push("-o");
    push(&target.output_name);
    push(&target.input_name);
    for dir in bc.include_dirs.borrow().iter() { push(&format!("-I{dir}")); }
    for file in bc.input_files.borrow().iter() { push(file); }
    for file in bc.input_objects.borrow().iter() { push(file); }
    for dir in bc.library_dirs.borrow().iter() { push(&format!("-L{dir}")); }
    for name in bc.library_links.borrow().iter() { push(&format!("-l{name}")); }
    for flag in bc.ldflags.borrow().iter() { push(flag); }

    line
}

/// Walk `root`'s children, dry-run style: collect one command line per
/// dirty target, children before parents, deduplicated as
/// [`execute`] would.
pub fn collect_dry_run_lines<'a>(root: &'a BuildCommand<'a>) -> Vec<String>
{
    let mut lines = Vec::new();
    let mut executed_bcs: Vec<&BuildCommand> = Vec::new();
    let mut built_targets: Vec<Target> = Vec::new();

    for child in root.children.borrow().iter() {
        walk(child, &mut executed_bcs, &mut built_targets, &mut lines);
    }

    lines
}

/// Walk `root`'s children, running each command line through the host
/// shell. Stops at (and reports) the first nonzero exit.
pub fn execute<'a>(root: &'a BuildCommand<'a>) -> Result<(), Error>
{
    let mut executed_bcs: Vec<&BuildCommand> = Vec::new();
    let mut built_targets: Vec<Target> = Vec::new();

    for child in root.children.borrow().iter() {
        run(child, &mut executed_bcs, &mut built_targets)?;
    }

    log::debug!("executed {} build command(s)", executed_bcs.len());
    Ok(())
}

fn walk<'a>(
    bc: &'a BuildCommand<'a>,
    executed_bcs: &mut Vec<&'a BuildCommand<'a>>,
    built_targets: &mut Vec<Target>,
    lines: &mut Vec<String>,
)
{
    if !bc.dirty.get() {
        return;
    }

    for child in bc.children.borrow().iter() {
        walk(child, executed_bcs, built_targets, lines);
    }

    if executed_bcs.iter().any(|done| *done == bc) {
        return;
    }
    executed_bcs.push(bc);

    for target in bc.targets.borrow().iter() {
        if !target.dirty || built_targets.iter().any(|done| done == target) {
            continue;
        }
        built_targets.push(target.clone());
        lines.push(command_line(bc, target));
    }
}

fn run<'a>(
    bc: &'a BuildCommand<'a>,
    executed_bcs: &mut Vec<&'a BuildCommand<'a>>,
    built_targets: &mut Vec<Target>,
) -> Result<(), Error>
{
    if !bc.dirty.get() {
        return Ok(());
    }

    let output_dir = bc.output_dir.borrow();
    if !output_dir.is_empty() {
        fs::create_dir_all(&*output_dir)
            .map_err(|source| Error::CreateOutputDir{path: output_dir.clone(), source})?;
    }
    drop(output_dir);

    for child in bc.children.borrow().iter() {
        run(child, executed_bcs, built_targets)?;
    }

    if executed_bcs.iter().any(|done| *done == bc) {
        return Ok(());
    }
    executed_bcs.push(bc);

    for target in bc.targets.borrow().iter() {
        if !target.dirty || built_targets.iter().any(|done| done == target) {
            continue;
        }
        built_targets.push(target.clone());

        let line = command_line(bc, target);
        eprintln!("$ {line}");
        let status = invoke(&line)?;
        if !status.success() {
            return Err(Error::NonZeroExit{line, status: status.code().unwrap_or(-1)});
        }
    }

    Ok(())
}

#[cfg(unix)]
fn invoke(line: &str) -> io::Result<std::process::ExitStatus>
{
    Command::new("sh").arg("-c").arg(line).status()
}

#[cfg(windows)]
fn invoke(line: &str) -> io::Result<std::process::ExitStatus>
{
    Command::new("cmd").arg("/C").arg(line).status()
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::build_command::DEFAULT_COMPILER;

    #[test]
    fn command_line_matches_minimal_scenario()
    {
        let root = BuildCommand::new_root();
        let mut target = Target::new("main");
        target.input_name = "main.c".to_string();
        target.output_name = "main".to_string();

        assert_eq!(*root.compiler.borrow(), DEFAULT_COMPILER);
        assert_eq!(command_line(&root, &target), "gcc -o main main.c ");
    }

    #[test]
    fn command_line_adds_dash_c_for_object_targets()
    {
        let root = BuildCommand::new_root();
        root.build_type.set(BuildType::Object);
        *root.compiler.borrow_mut() = "gcc".to_string();
        let mut target = Target::new("util");
        target.input_name = "src/util.c".to_string();
        target.output_name = "build/util.o".to_string();

        assert_eq!(command_line(&root, &target), "gcc -c -o build/util.o src/util.c ");
    }

    #[test]
    fn command_line_orders_every_section()
    {
        let bc = BuildCommand::new_root();
        *bc.compiler.borrow_mut() = "gcc".to_string();
        bc.cflags.borrow_mut().push("-Wall".to_string());
        bc.include_dirs.borrow_mut().push("include".to_string());
        bc.input_files.borrow_mut().push("extra.c".to_string());
        bc.input_objects.borrow_mut().push("dep.o".to_string());
        bc.library_dirs.borrow_mut().push("lib".to_string());
        bc.library_links.borrow_mut().push("m".to_string());
        bc.ldflags.borrow_mut().push("-static".to_string());

        let mut target = Target::new("main");
        target.input_name = "src/main.c".to_string();
        target.output_name = "build/main".to_string();

        assert_eq!(
            command_line(&bc, &target),
            "gcc -Wall -o build/main src/main.c -Iinclude extra.c dep.o -Llib -lm -static ",
        );
    }
}
