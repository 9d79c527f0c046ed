//! Build commands and targets — the tree the constructor builds and the
//! executor walks.
//!
//! Build commands are allocated out of a [`typed_arena::Arena`] so that
//! parent/child links can be plain `&'a` references (spec.md §9: "model
//! each phase's arena as a single owning container whose lifetime
//! brackets the phase"), the same shape `cook_lang::syntax::parse::Arenas`
//! uses for the AST. Unlike the AST, build commands are mutated after
//! creation (inherited settings accumulate, dirtiness propagates), so
//! their fields live behind [`Cell`]/[`RefCell`] rather than being plain.

use std::{cell::{Cell, RefCell}, fmt};

/// What a build command's primary target compiles to.
///
/// Only depth-1 children of the root are [`Self::Executable`]; deeper
/// nested builds compile [`Self::Object`] files that their ancestor
/// links together (spec.md §3).
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildType
{
    Executable,
    Object,

    /// No built-in method ever produces this variant; kept for parity
    /// with spec.md §3's `BuildType` enum.
    Lib,
}

/// The default compiler used by the root build command.
///
/// spec.md §9 leaves the choice between `cc` and `gcc` open; this
/// implementation documents and uses `gcc`, matching
/// `build_command_default()` in the original source.
pub const DEFAULT_COMPILER: &str = "gcc";

/// One `(input_file, output_file)` pair belonging to a build command.
#[derive(Clone, Debug)]
pub struct Target
{
    /// The bare name passed to `build(...)`.
    pub name: String,

    /// `source_dir/name.ext`, computed during target expansion.
    pub input_name: String,

    /// `output_dir/name[.o]`, computed during target expansion.
    pub output_name: String,

    pub dirty: bool,
    pub built: bool,
}

impl Target
{
    /// A target with just a name; `input_name`/`output_name` are filled
    /// in later by target expansion (spec.md §4.5).
    pub fn new(name: impl Into<String>) -> Self
    {
        Self{
            name: name.into(),
            input_name: String::new(),
            output_name: String::new(),
            dirty: false,
            built: false,
        }
    }
}

impl PartialEq for Target
{
    /// Structural equality used by the executor's target-level dedup
    /// (spec.md §4.7, §9): name, input name, and output name only —
    /// `dirty`/`built` are execution bookkeeping, not identity.
    fn eq(&self, other: &Self) -> bool
    {
        self.name == other.name
            && self.input_name == other.input_name
            && self.output_name == other.output_name
    }
}

/// A compile-and-link unit: inherited settings, zero or more targets,
/// and child build commands for dependencies.
pub struct BuildCommand<'a>
{
    /// `None` only for the root build command.
    pub parent: Option<&'a BuildCommand<'a>>,

    /// Child build commands, in the order their `build(...)` calls were
    /// evaluated.
    pub children: RefCell<Vec<&'a BuildCommand<'a>>>,

    pub build_type: Cell<BuildType>,

    pub compiler: RefCell<String>,
    pub source_dir: RefCell<String>,
    pub output_dir: RefCell<String>,

    /// Index 0 is the primary target; later targets share this build
    /// command's settings.
    pub targets: RefCell<Vec<Target>>,

    /// Explicit `input(...)` arguments plus each child's target outputs.
    pub input_files: RefCell<Vec<String>>,

    /// Pre-built object files to link, outside of the target/child model.
    pub input_objects: RefCell<Vec<String>>,
    pub include_dirs: RefCell<Vec<String>>,

    /// Reserved for future header dependency tracking; no built-in
    /// method populates this today.
    pub include_files: RefCell<Vec<String>>,
    pub library_dirs: RefCell<Vec<String>>,
    pub library_links: RefCell<Vec<String>>,
    pub cflags: RefCell<Vec<String>>,
    pub ldflags: RefCell<Vec<String>>,

    pub dirty: Cell<bool>,

    /// Set by `mark_clean()`; excludes this build command and its whole
    /// subtree from `--build-all`, but not from freshness analysis.
    pub marked_clean_explicitly: Cell<bool>,
}

impl<'a> BuildCommand<'a>
{
    /// The root build command: no parent, the documented default
    /// compiler, always dirty (spec.md §3: "Root BC is always
    /// considered dirty at execution entry").
    pub fn new_root() -> Self
    {
        Self{
            parent: None,
            children: RefCell::new(Vec::new()),
            build_type: Cell::new(BuildType::Executable),
            compiler: RefCell::new(DEFAULT_COMPILER.to_string()),
            source_dir: RefCell::new(String::new()),
            output_dir: RefCell::new(String::new()),
            targets: RefCell::new(Vec::new()),
            input_files: RefCell::new(Vec::new()),
            input_objects: RefCell::new(Vec::new()),
            include_dirs: RefCell::new(Vec::new()),
            include_files: RefCell::new(Vec::new()),
            library_dirs: RefCell::new(Vec::new()),
            library_links: RefCell::new(Vec::new()),
            cflags: RefCell::new(Vec::new()),
            ldflags: RefCell::new(Vec::new()),
            dirty: Cell::new(true),
            marked_clean_explicitly: Cell::new(false),
        }
    }

    /// A new build command inheriting `parent`'s settings as a
    /// snapshot: later edits to either do not propagate (spec.md §3).
    ///
    /// `target_names`/`input_files` are *not* inherited — the original
    /// source's own comment on this is "we should not inherit root
    /// input" — nor are targets, children, or dirtiness.
    pub fn inherit(parent: &'a BuildCommand<'a>) -> Self
    {
        let build_type =
            if parent.parent.is_some() { BuildType::Object }
            else { BuildType::Executable };

        Self{
            parent: Some(parent),
            children: RefCell::new(Vec::new()),
            build_type: Cell::new(build_type),
            compiler: RefCell::new(parent.compiler.borrow().clone()),
            source_dir: RefCell::new(parent.source_dir.borrow().clone()),
            output_dir: RefCell::new(parent.output_dir.borrow().clone()),
            targets: RefCell::new(Vec::new()),
            input_files: RefCell::new(Vec::new()),
            input_objects: RefCell::new(Vec::new()),
            include_dirs: RefCell::new(parent.include_dirs.borrow().clone()),
            include_files: RefCell::new(parent.include_files.borrow().clone()),
            library_dirs: RefCell::new(parent.library_dirs.borrow().clone()),
            library_links: RefCell::new(parent.library_links.borrow().clone()),
            cflags: RefCell::new(parent.cflags.borrow().clone()),
            ldflags: RefCell::new(parent.ldflags.borrow().clone()),
            dirty: Cell::new(false),
            marked_clean_explicitly: Cell::new(false),
        }
    }

    /// Mark this build command and every ancestor dirty.
    ///
    /// Implements the `dirty()` method (spec.md §4.4); unlike
    /// `--build-all`, this always applies regardless of
    /// `marked_clean_explicitly`, matching the original source's
    /// unconditional ancestor walk.
    pub fn mark_dirty_with_ancestors(&self)
    {
        self.dirty.set(true);
        let mut bc = self;
        while let Some(parent) = bc.parent {
            parent.dirty.set(true);
            bc = parent;
        }
    }
}

impl<'a> PartialEq for BuildCommand<'a>
{
    /// Deep structural equality used by the executor's BC-level dedup
    /// (spec.md §4.7, §9): every content field and the full recursive
    /// child list, same as the original source's intent, realized here
    /// via field-by-field comparison instead of a content hash.
    fn eq(&self, other: &Self) -> bool
    {
        self.build_type.get() == other.build_type.get()
            && *self.compiler.borrow() == *other.compiler.borrow()
            && *self.source_dir.borrow() == *other.source_dir.borrow()
            && *self.output_dir.borrow() == *other.output_dir.borrow()
            && *self.targets.borrow() == *other.targets.borrow()
            && *self.input_files.borrow() == *other.input_files.borrow()
            && *self.input_objects.borrow() == *other.input_objects.borrow()
            && *self.include_dirs.borrow() == *other.include_dirs.borrow()
            && *self.include_files.borrow() == *other.include_files.borrow()
            && *self.library_dirs.borrow() == *other.library_dirs.borrow()
            && *self.library_links.borrow() == *other.library_links.borrow()
            && *self.cflags.borrow() == *other.cflags.borrow()
            && *self.ldflags.borrow() == *other.ldflags.borrow()
            && *self.children.borrow() == *other.children.borrow()
    }
}

impl<'a> fmt::Debug for BuildCommand<'a>
{
    /// Targets and dirtiness only: `parent` points back up the tree and
    /// `children` down it, so printing either in full would walk the
    /// whole tree (and, via `parent`, loop forever).
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        f.debug_struct("BuildCommand")
            .field("targets", &*self.targets.borrow())
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

/// The source file extension implied by a compiler name (spec.md §4.5).
///
/// `gcc`/`clang` imply `.c`; `g++` implies `.cpp`; anything else implies
/// no extension at all.
pub fn extension_for_compiler(compiler: &str) -> &'static str
{
    match compiler {
        "gcc" | "clang" => ".c",
        "g++" => ".cpp",
        _ => "",
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use typed_arena::Arena;

    #[test]
    fn inherit_snapshots_parent_settings()
    {
        let root = BuildCommand::new_root();
        root.cflags.borrow_mut().push("-Wall".to_string());

        let child = BuildCommand::inherit(&root);
        assert_eq!(*child.cflags.borrow(), vec!["-Wall".to_string()]);

        root.cflags.borrow_mut().push("-g".to_string());
        assert_eq!(*child.cflags.borrow(), vec!["-Wall".to_string()]);
    }

    #[test]
    fn inherit_does_not_carry_input_files_or_targets()
    {
        let root = BuildCommand::new_root();
        root.input_files.borrow_mut().push("extra.c".to_string());
        root.targets.borrow_mut().push(Target::new("main"));

        let child = BuildCommand::inherit(&root);
        assert!(child.input_files.borrow().is_empty());
        assert!(child.targets.borrow().is_empty());
    }

    #[test]
    fn depth1_children_are_executables_deeper_children_are_objects()
    {
        let arena = Arena::new();
        let root = BuildCommand::new_root();
        let app: &BuildCommand = arena.alloc(BuildCommand::inherit(&root));
        assert_eq!(app.build_type.get(), BuildType::Executable);

        let util: &BuildCommand = arena.alloc(BuildCommand::inherit(app));
        assert_eq!(util.build_type.get(), BuildType::Object);
    }

    #[test]
    fn mark_dirty_propagates_to_every_ancestor()
    {
        let arena = Arena::new();
        let root = BuildCommand::new_root();
        root.dirty.set(false);
        let app: &BuildCommand = arena.alloc(BuildCommand::inherit(&root));
        let util: &BuildCommand = arena.alloc(BuildCommand::inherit(app));

        util.mark_dirty_with_ancestors();

        assert!(util.dirty.get());
        assert!(app.dirty.get());
        assert!(root.dirty.get());
    }

    #[test]
    fn extension_depends_on_compiler()
    {
        assert_eq!(extension_for_compiler("gcc"), ".c");
        assert_eq!(extension_for_compiler("clang"), ".c");
        assert_eq!(extension_for_compiler("g++"), ".cpp");
        assert_eq!(extension_for_compiler("tcc"), "");
    }

    #[test]
    fn structural_equality_ignores_parent_and_dirtiness()
    {
        let a = BuildCommand::new_root();
        let b = BuildCommand::new_root();
        a.dirty.set(true);
        b.dirty.set(false);
        assert_eq!(a, b);

        a.cflags.borrow_mut().push("-Wall".to_string());
        assert_ne!(a, b);
    }
}
