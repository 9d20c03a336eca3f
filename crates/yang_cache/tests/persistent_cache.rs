//! End-to-end cache behaviour on on-disk projects.
//!
//! A fake compiler echoes each `.yang` file's content back as YIN, so the
//! fixtures write YIN directly into the `.yang` files. Content starting with
//! `FAIL:` makes the compiler fail, and a `<!-- delay-ms: N -->` line makes
//! it sleep first.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, UNIX_EPOCH};

use tempfile::TempDir;
use yang_cache::{
    check_status, generate_schema, modules_get, schema_get, CacheError, CacheOutcome,
    CacheStatus, CacheStore, CompileError, CompilerOutput, PersistentSchema, SchemaCompiler,
};
use yang_config::{ProjectConfig, ProjectLayout};
use yang_modules::{ModuleError, SidNamespace};

// ---------------------------------------------------------------------------
// Helper: fake compiler
// ---------------------------------------------------------------------------

#[derive(Default)]
struct EchoCompiler {
    calls: AtomicUsize,
}

impl EchoCompiler {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SchemaCompiler for EchoCompiler {
    fn compile(&self, _search_dir: &Path, schema: &Path) -> std::io::Result<CompilerOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = fs::read_to_string(schema)?;
        if let Some(ms) = text
            .lines()
            .find_map(|l| l.trim().strip_prefix("<!-- delay-ms: "))
            .and_then(|rest| rest.trim_end_matches(" -->").parse::<u64>().ok())
        {
            std::thread::sleep(Duration::from_millis(ms));
        }
        if let Some(diag) = text.strip_prefix("FAIL:") {
            return Ok(CompilerOutput {
                success: false,
                stdout: String::new(),
                stderr: diag.to_string(),
            });
        }
        Ok(CompilerOutput {
            success: true,
            stdout: text,
            stderr: String::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// Helper: project fixture
// ---------------------------------------------------------------------------

const T0: u64 = 1_600_000_000;

struct Project {
    _dir: TempDir,
    layout: ProjectLayout,
}

impl Project {
    /// Creates a project whose manifest lists `<name>@2021.sid` for each name.
    fn new(names: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::from_config(dir.path(), &ProjectConfig::default());
        fs::create_dir_all(&layout.yang_dir).unwrap();
        fs::create_dir_all(layout.manifest.parent().unwrap()).unwrap();
        let project = Self { _dir: dir, layout };
        for (i, name) in names.iter().enumerate() {
            project.write_module(name, i as u64, "");
        }
        project.write_manifest(names);
        project
    }

    fn yang(&self, file: &str) -> PathBuf {
        self.layout.yang_dir.join(file)
    }

    fn write_module(&self, name: &str, index: u64, extra: &str) {
        let yin = format!(
            "{extra}<module name=\"{name}\" xmlns=\"urn:ietf:params:xml:ns:yang:yin:1\">\n  \
             <namespace uri=\"urn:example:{name}\"/>\n  <prefix value=\"{name}\"/>\n</module>\n"
        );
        fs::write(self.yang(&format!("{name}.yang")), yin).unwrap();
        let sid = format!(
            r#"{{"ietf-sid-file:sid-file": {{"module-name": "{name}", "module-revision": "2021-01-01",
  "item": [{{"namespace": "module", "identifier": "{name}", "sid": "{}"}},
           {{"namespace": "data", "identifier": "/{name}:top", "sid": "{}"}}]}}}}"#,
            60000 + index * 10,
            60001 + index * 10
        );
        fs::write(self.yang(&format!("{name}@2021.sid")), sid).unwrap();
        self.set_mtime(&format!("{name}.yang"), T0);
        self.set_mtime(&format!("{name}@2021.sid"), T0);
    }

    fn write_manifest(&self, names: &[&str]) {
        let mut yaml = String::from("sid-files:\n");
        for name in names {
            yaml.push_str(&format!("  - {name}@2021.sid\n"));
        }
        fs::write(&self.layout.manifest, yaml).unwrap();
    }

    fn set_mtime(&self, file: &str, secs: u64) {
        fs::File::options()
            .write(true)
            .open(self.yang(file))
            .unwrap()
            .set_modified(UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn open(&self, compiler: &EchoCompiler) -> Result<PersistentSchema, CacheError> {
        PersistentSchema::open(&self.layout, compiler)
    }

    fn cache_bytes(&self) -> Option<Vec<u8>> {
        fs::read(&self.layout.cache_file).ok()
    }
}

fn module_order(schema: &PersistentSchema) -> Vec<String> {
    schema
        .schema_data()
        .unwrap()
        .modules
        .iter()
        .map(|m| m.name.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Cache hit / miss
// ---------------------------------------------------------------------------

#[test]
fn first_run_compiles_second_run_reuses() {
    let project = Project::new(&["a", "b"]);
    let compiler = EchoCompiler::default();

    let first = project.open(&compiler).unwrap();
    assert_eq!(first.outcome(), CacheOutcome::Absent);
    assert_eq!(compiler.calls(), 2);
    assert!(project.layout.cache_file.exists());

    let second = project.open(&compiler).unwrap();
    assert_eq!(second.outcome(), CacheOutcome::Hit);
    assert_eq!(compiler.calls(), 2, "cache hit must not invoke the compiler");
    assert_eq!(first.modules(), second.modules());
    assert_eq!(first.schema_data().unwrap(), second.schema_data().unwrap());
}

#[test]
fn cached_schema_is_queryable() {
    let project = Project::new(&["a", "b"]);
    let compiler = EchoCompiler::default();
    project.open(&compiler).unwrap();

    let schema = project.open(&compiler).unwrap();
    let data = schema.schema_data().unwrap();
    assert_eq!(data.sids.len(), 4);
    assert_eq!(data.sids.sid(SidNamespace::Data, "/b:top"), Some(60011));
    assert_eq!(data.module("a").unwrap().namespace, "urn:example:a");
    assert!(!schema.modules().has_intermediate_state());
}

#[test]
fn touching_schema_file_recompiles_all() {
    let project = Project::new(&["a", "b"]);
    let compiler = EchoCompiler::default();
    project.open(&compiler).unwrap();
    let before = project.cache_bytes().unwrap();

    project.set_mtime("b.yang", T0 + 60);
    let schema = project.open(&compiler).unwrap();
    assert_eq!(schema.outcome(), CacheOutcome::Stale);
    assert_eq!(compiler.calls(), 4);
    assert_ne!(project.cache_bytes().unwrap(), before);

    assert_eq!(project.open(&compiler).unwrap().outcome(), CacheOutcome::Hit);
    assert_eq!(compiler.calls(), 4);
}

#[test]
fn touching_sid_file_invalidates() {
    let project = Project::new(&["a", "b"]);
    let compiler = EchoCompiler::default();
    project.open(&compiler).unwrap();

    project.set_mtime("a@2021.sid", T0 - 1);
    assert_eq!(project.open(&compiler).unwrap().outcome(), CacheOutcome::Stale);
    assert_eq!(compiler.calls(), 4);
}

#[test]
fn adding_manifest_entry_invalidates() {
    let project = Project::new(&["a", "b"]);
    let compiler = EchoCompiler::default();
    project.open(&compiler).unwrap();

    project.write_module("c", 2, "");
    project.write_manifest(&["a", "b", "c"]);
    let schema = project.open(&compiler).unwrap();
    assert_eq!(schema.outcome(), CacheOutcome::Stale);
    assert_eq!(module_order(&schema), vec!["a", "b", "c"]);
    assert_eq!(compiler.calls(), 5);
}

#[test]
fn removing_manifest_entry_invalidates() {
    let project = Project::new(&["a", "b"]);
    let compiler = EchoCompiler::default();
    project.open(&compiler).unwrap();

    project.write_manifest(&["a"]);
    let schema = project.open(&compiler).unwrap();
    assert_eq!(schema.outcome(), CacheOutcome::Stale);
    assert_eq!(module_order(&schema), vec!["a"]);
}

#[test]
fn reordering_manifest_invalidates_and_follows_new_order() {
    let project = Project::new(&["a", "b"]);
    let compiler = EchoCompiler::default();
    project.open(&compiler).unwrap();

    project.write_manifest(&["b", "a"]);
    let schema = project.open(&compiler).unwrap();
    assert_eq!(schema.outcome(), CacheOutcome::Stale);
    assert_eq!(module_order(&schema), vec!["b", "a"]);
}

#[test]
fn corrupt_cache_is_recompiled_and_overwritten() {
    let project = Project::new(&["a"]);
    let compiler = EchoCompiler::default();
    fs::write(&project.layout.cache_file, b"\x07\x00\x00\x00not a cache").unwrap();

    assert_eq!(project.open(&compiler).unwrap().outcome(), CacheOutcome::Absent);
    assert_eq!(compiler.calls(), 1);
    assert_eq!(project.open(&compiler).unwrap().outcome(), CacheOutcome::Hit);
}

#[test]
fn two_sid_revisions_of_one_module_reload_identically() {
    let project = Project::new(&["a"]);
    fs::write(
        project.yang("a@2020.sid"),
        r#"{"ietf-sid-file:sid-file": {"module-name": "a", "module-revision": "2020-01-01",
  "item": [{"namespace": "data", "identifier": "/a:top", "sid": "60001"},
           {"namespace": "data", "identifier": "/a:old", "sid": "60002"}]}}"#,
    )
    .unwrap();
    fs::write(
        &project.layout.manifest,
        "sid-files:\n  - a@2020.sid\n  - a@2021.sid\n",
    )
    .unwrap();
    let compiler = EchoCompiler::default();

    let fresh = project.open(&compiler).unwrap();
    assert_eq!(fresh.outcome(), CacheOutcome::Absent);
    assert_eq!(compiler.calls(), 1);
    let cached = project.open(&compiler).unwrap();
    assert_eq!(cached.outcome(), CacheOutcome::Hit);
    assert_eq!(fresh.schema_data().unwrap(), cached.schema_data().unwrap());
    assert_eq!(
        cached.schema_data().unwrap().sids.sid(SidNamespace::Data, "/a:top"),
        Some(60001)
    );
}

#[test]
fn sid_revision_moving_an_identifier_fails_without_cache() {
    let project = Project::new(&["a"]);
    fs::write(
        project.yang("a@2020.sid"),
        r#"{"ietf-sid-file:sid-file": {"module-name": "a",
  "item": [{"namespace": "data", "identifier": "/a:top", "sid": "60010"}]}}"#,
    )
    .unwrap();
    fs::write(
        &project.layout.manifest,
        "sid-files:\n  - a@2020.sid\n  - a@2021.sid\n",
    )
    .unwrap();

    let err = project.open(&EchoCompiler::default()).unwrap_err();
    assert!(matches!(
        err,
        CacheError::Compile(CompileError::Module(ModuleError::IdentifierConflict { .. }))
    ));
    assert!(project.cache_bytes().is_none());
}

// ---------------------------------------------------------------------------
// Ordering and failure
// ---------------------------------------------------------------------------

#[test]
fn aggregation_follows_manifest_not_completion_order() {
    let project = Project::new(&["slow", "fast1", "fast2", "fast3"]);
    project.write_module("slow", 0, "<!-- delay-ms: 200 -->\n");
    let compiler = EchoCompiler::default();

    let schema = project.open(&compiler).unwrap();
    assert_eq!(module_order(&schema), vec!["slow", "fast1", "fast2", "fast3"]);

    let names: Vec<&str> = schema.modules().module_names().collect();
    assert_eq!(names, vec!["slow", "fast1", "fast2", "fast3"]);
}

#[test]
fn failed_compile_leaves_previous_cache_untouched() {
    let project = Project::new(&["a", "b", "c"]);
    let compiler = EchoCompiler::default();
    project.open(&compiler).unwrap();
    let before = project.cache_bytes().unwrap();

    fs::write(project.yang("b.yang"), "FAIL:b.yang:4: error: unexpected keyword \"leaf\"").unwrap();
    project.set_mtime("b.yang", T0 + 5);

    let err = project.open(&compiler).unwrap_err();
    match err {
        CacheError::Compile(CompileError::Compiler { path, diagnostic }) => {
            assert!(path.ends_with("b.yang"));
            assert!(diagnostic.contains("unexpected keyword"));
        }
        other => panic!("expected compiler error, got {other:?}"),
    }
    assert_eq!(compiler.calls(), 6, "every unit runs to completion");
    assert_eq!(project.cache_bytes().unwrap(), before);
}

#[test]
fn failed_first_compile_writes_no_cache() {
    let project = Project::new(&["a"]);
    fs::write(project.yang("a.yang"), "FAIL:broken").unwrap();
    let compiler = EchoCompiler::default();

    assert!(project.open(&compiler).is_err());
    assert!(project.cache_bytes().is_none());
}

#[test]
fn missing_sid_file_fails_before_compiling() {
    let project = Project::new(&["a"]);
    project.write_manifest(&["a", "ghost"]);
    let compiler = EchoCompiler::default();

    let err = project.open(&compiler).unwrap_err();
    match err {
        CacheError::MissingSidFile { path } => assert!(path.ends_with("ghost@2021.sid")),
        other => panic!("expected MissingSidFile, got {other:?}"),
    }
    assert_eq!(compiler.calls(), 0);
    assert!(project.cache_bytes().is_none());
}

#[test]
fn missing_yang_file_fails_before_compiling() {
    let project = Project::new(&["a"]);
    fs::remove_file(project.yang("a.yang")).unwrap();
    let compiler = EchoCompiler::default();

    let err = project.open(&compiler).unwrap_err();
    assert!(matches!(err, CacheError::MissingSchemaFile { .. }));
    assert!(err.to_string().contains("a.yang"));
    assert_eq!(compiler.calls(), 0);
}

#[test]
fn missing_manifest_is_config_error() {
    let project = Project::new(&["a"]);
    fs::remove_file(&project.layout.manifest).unwrap();
    let err = project.open(&EchoCompiler::default()).unwrap_err();
    assert!(matches!(err, CacheError::Config(_)));
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

#[test]
fn schema_get_and_modules_get_agree() {
    let project = Project::new(&["a", "b"]);
    let compiler = EchoCompiler::default();

    let data = schema_get(&project.layout, &compiler).unwrap();
    let modules = modules_get(&project.layout, &compiler).unwrap();
    assert_eq!(Some(&data), modules.schema_data());
    assert_eq!(compiler.calls(), 2);
}

#[test]
fn generate_schema_bypasses_cache() {
    let project = Project::new(&["a", "b"]);
    let compiler = EchoCompiler::default();
    let data = generate_schema(
        &compiler,
        &project.layout.yang_dir,
        &[project.yang("a.yang"), project.yang("b.yang")],
        &[project.yang("a@2021.sid")],
        0,
    )
    .unwrap();
    assert_eq!(data.modules.len(), 2);
    assert_eq!(data.sids.len(), 2);
    assert!(project.cache_bytes().is_none());
}

#[test]
fn status_reports_absent_fresh_stale() {
    let project = Project::new(&["a", "b"]);
    let compiler = EchoCompiler::default();

    assert_eq!(check_status(&project.layout).unwrap(), CacheStatus::Absent);
    project.open(&compiler).unwrap();
    assert_eq!(check_status(&project.layout).unwrap(), CacheStatus::Fresh);

    project.set_mtime("a.yang", T0 + 1);
    match check_status(&project.layout).unwrap() {
        CacheStatus::Stale(diff) => assert_eq!(diff.modified, vec![project.yang("a.yang")]),
        other => panic!("expected stale, got {other:?}"),
    }
    assert_eq!(compiler.calls(), 2);
}

#[test]
fn explicit_store_location_is_honoured() {
    let project = Project::new(&["a"]);
    let other = tempfile::tempdir().unwrap();
    let store = CacheStore::new(other.path().join("elsewhere.cache"));
    let inputs = yang_cache::resolve_project(&project.layout).unwrap();
    let compiler = EchoCompiler::default();

    PersistentSchema::open_with(&inputs, &project.layout.yang_dir, &store, &compiler, 0).unwrap();
    assert!(store.path().exists());
    assert!(project.cache_bytes().is_none());
}
