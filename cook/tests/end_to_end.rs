//! End-to-end scenarios covering the full lex → parse → construct →
//! interpret → dry-run pipeline, matching the worked examples and
//! testable properties for the recipe language.

use {
    cook::{construct, exec},
    cook_lang::syntax::parse::{Arenas, parse_unit},
    std::{fs, thread, time::Duration},
    tempfile::tempdir,
    typed_arena::Arena,
};

fn dry_run(source: &str) -> Vec<String>
{
    let expressions = Arena::new();
    let statements = Arena::new();
    let arenas = &Arenas{expressions: &expressions, statements: &statements};
    let bc_arena = Arena::new();
    let (program, diagnostics) = parse_unit(arenas, source);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let output = construct::construct(&bc_arena, program).expect("construction should succeed");
    exec::collect_dry_run_lines(output.root)
}

#[test]
fn minimal()
{
    assert_eq!(dry_run("build(main)"), vec!["gcc -o main main.c ".to_string()]);
}

#[test]
fn hello_world_with_directories()
{
    let lines = dry_run("compiler(gcc)\ncflags(-Wall)\nsource_dir(src)\noutput_dir(build)\nbuild(hello)\n");
    assert_eq!(lines, vec!["gcc -Wall -o build/hello src/hello.c ".to_string()]);
}

#[test]
fn nested_object_compilation()
{
    let lines = dry_run("source_dir(src)\noutput_dir(build)\nbuild(app) {\n    build(util)\n}\n");
    assert_eq!(
        lines,
        vec![
            "gcc -c -o build/util.o src/util.c ".to_string(),
            "gcc -o build/app src/app.c build/util.o ".to_string(),
        ],
    );
}

#[test]
fn chain_equals_nested_description()
{
    let chained = dry_run("build(foo).build(bar)");
    let nested = dry_run("build(foo) { build(bar) }");
    assert_eq!(chained, nested);
}

#[test]
fn inheritance_does_not_leak_across_siblings()
{
    let both = dry_run("cflags(-Wall, -Wextra)\nbuild(foo)\nbuild(bar)\n");
    assert!(both[0].contains("-Wall -Wextra -o"));
    assert!(both[1].contains("-Wall -Wextra -o"));

    let foo_only = dry_run("cflags(-Wall, -Wextra)\nbuild(foo).cflags(-g)\nbuild(bar)\n");
    assert!(foo_only[0].contains("-Wall -Wextra -g -o"));
    assert!(!foo_only[1].contains("-g"));
}

#[test]
fn multiple_targets_under_one_build_command()
{
    let lines = dry_run(
        "source_dir(src)\noutput_dir(build)\nbuild(cook) {\n    build(file, token, lexer)\n}\n",
    );
    assert_eq!(
        lines,
        vec![
            "gcc -c -o build/file.o src/file.c ".to_string(),
            "gcc -c -o build/token.o src/token.c ".to_string(),
            "gcc -c -o build/lexer.o src/lexer.c ".to_string(),
            "gcc -o build/cook src/cook.c build/file.o build/token.o build/lexer.o ".to_string(),
        ],
    );
}

#[test]
fn repeated_dry_run_is_byte_identical_without_touching_inputs()
{
    let source = "source_dir(src)\noutput_dir(build)\nbuild(app) { build(util) }\n";
    assert_eq!(dry_run(source), dry_run(source));
}

#[test]
fn up_to_date_output_emits_nothing_until_the_input_changes()
{
    let dir = tempdir().unwrap();
    let src_dir = dir.path().join("src");
    let build_dir = dir.path().join("build");
    fs::create_dir_all(&src_dir).unwrap();
    fs::create_dir_all(&build_dir).unwrap();

    let source_path = src_dir.join("main.c");
    fs::write(&source_path, "int main(void) { return 0; }").unwrap();
    thread::sleep(Duration::from_millis(20));
    let output_path = build_dir.join("main");
    fs::write(&output_path, "stale binary").unwrap();

    let recipe = format!(
        "source_dir({})\noutput_dir({})\nbuild(main)\n",
        src_dir.display(),
        build_dir.display(),
    );

    assert!(dry_run(&recipe).is_empty(), "output is newer than input, nothing should rebuild");

    thread::sleep(Duration::from_millis(20));
    fs::write(&source_path, "int main(void) { return 1; }").unwrap();

    assert_eq!(
        dry_run(&recipe),
        vec![format!("gcc -o {} {} ", output_path.display(), source_path.display())],
    );
}

#[test]
fn build_all_forces_a_rebuild_regardless_of_mtimes()
{
    let dir = tempdir().unwrap();
    let src_dir = dir.path().join("src");
    let build_dir = dir.path().join("build");
    fs::create_dir_all(&src_dir).unwrap();
    fs::create_dir_all(&build_dir).unwrap();

    fs::write(src_dir.join("main.c"), "int main(void) { return 0; }").unwrap();
    thread::sleep(Duration::from_millis(20));
    fs::write(build_dir.join("main"), "up to date").unwrap();

    let recipe = format!(
        "source_dir({})\noutput_dir({})\nbuild(main)\n",
        src_dir.display(),
        build_dir.display(),
    );

    assert!(dry_run(&recipe).is_empty());

    let expressions = Arena::new();
    let statements = Arena::new();
    let arenas = &Arenas{expressions: &expressions, statements: &statements};
    let bc_arena = Arena::new();
    let (program, _) = parse_unit(arenas, &recipe);
    let output = construct::construct(&bc_arena, program).unwrap();
    for child in output.root.children.borrow().iter() {
        construct::mark_all_dirty(child);
    }
    let lines = exec::collect_dry_run_lines(output.root);

    assert_eq!(lines.len(), 1);
}
