//! `cook` binary entry point: wire the CLI, read and parse a recipe,
//! construct and interpret it, then dry-run or execute the result
//! (spec.md §6, §7).

use {
    anyhow::{Context, Result},
    clap::Parser,
    cook::{cli::Options, construct, diagnostics, exec, interpret},
    cook_lang::syntax::parse::{parse_unit, Arenas},
    std::{io, process::ExitCode},
    typed_arena::Arena,
};

fn main() -> ExitCode
{
    let options = Options::parse();

    // `RUST_LOG` is a fallback for when `--verbose` isn't given; an
    // explicit `--verbose`/`--verbose=N` always wins.
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if options.verbose > 0 {
        builder.filter_level(options.log_level());
    }
    builder.init();

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error:#}");
            ExitCode::FAILURE
        },
    }
}

fn run(options: &Options) -> Result<()>
{
    let source = std::fs::read_to_string(&options.file)
        .with_context(|| format!("failed to read recipe file {:?}", options.file))?;

    let expressions = Arena::new();
    let statements = Arena::new();
    let ast_arenas = Arenas{expressions: &expressions, statements: &statements};
    let bc_arena = Arena::new();

    let (program, parse_diagnostics) = parse_unit(&ast_arenas, &source);
    if diagnostics::report(&options.file, &parse_diagnostics) {
        log::warn!("recipe parsed with {} diagnostic(s)", parse_diagnostics.len());
    }

    let output = construct::construct(&bc_arena, program)
        .with_context(|| format!("{}: construction failed", options.file))?;

    if options.build_all {
        for child in output.root.children.borrow().iter() {
            construct::mark_all_dirty(child);
        }
    }

    interpret::interpret(&output, program, &mut io::stdout());

    if options.dry_run {
        for line in exec::collect_dry_run_lines(output.root) {
            println!("{line}");
        }
    } else {
        exec::execute(output.root).context("build failed")?;
    }

    Ok(())
}
