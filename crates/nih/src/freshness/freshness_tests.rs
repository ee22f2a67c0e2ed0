#![allow(non_snake_case)]

use super::*;
use nih_bundle::{BundleError, BundleManifest, MemorySource};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const MANIFEST: &str = "\
linux/x86-64/libfoo.so
linux/x86-64/helper
darwin/libfoo.dylib
";

fn bundle() -> MemorySource {
    MemorySource::new()
        .with("linux/x86-64/libfoo.so", b"linux libfoo v2".to_vec())
        .with("linux/x86-64/helper", b"linux helper v2".to_vec())
        .with("darwin/libfoo.dylib", b"darwin libfoo v2".to_vec())
}

fn linux() -> (ResourceNaming, Vec<String>) {
    let naming = ResourceNaming::new("linux/x86-64", "");
    let expected = naming.expected_resources(&BundleManifest::parse(MANIFEST));
    (naming, expected)
}

fn file_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn populate_current(dir: &Path) {
    fs::write(dir.join("libfoo.so"), b"linux libfoo v2").unwrap();
    fs::write(dir.join("helper"), b"linux helper v2").unwrap();
}

#[test]
fn reconcile___empty_directory___copies_platform_resources() {
    let temp_dir = TempDir::new().unwrap();
    let (naming, expected) = linux();

    let outcome = reconcile(temp_dir.path(), &naming, &expected, &bundle()).unwrap();

    assert_eq!(
        outcome,
        Reconciliation::Refreshed {
            removed: 0,
            copied: 2
        }
    );
    assert_eq!(
        file_names(temp_dir.path()),
        BTreeSet::from(["helper".to_string(), "libfoo.so".to_string()])
    );
    assert_eq!(
        fs::read(temp_dir.path().join("libfoo.so")).unwrap(),
        b"linux libfoo v2"
    );
}

#[test]
fn reconcile___identical_contents___leaves_directory_untouched() {
    let temp_dir = TempDir::new().unwrap();
    populate_current(temp_dir.path());
    let modified_before = fs::metadata(temp_dir.path().join("helper"))
        .unwrap()
        .modified()
        .unwrap();
    let (naming, expected) = linux();

    let outcome = reconcile(temp_dir.path(), &naming, &expected, &bundle()).unwrap();

    assert_eq!(outcome, Reconciliation::UpToDate);
    let modified_after = fs::metadata(temp_dir.path().join("helper"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(modified_before, modified_after);
}

#[test]
fn reconcile___extra_file___clears_and_repopulates() {
    let temp_dir = TempDir::new().unwrap();
    populate_current(temp_dir.path());
    fs::write(temp_dir.path().join("libstale.so"), b"left over").unwrap();
    let (naming, expected) = linux();

    let outcome = reconcile(temp_dir.path(), &naming, &expected, &bundle()).unwrap();

    assert_eq!(
        outcome,
        Reconciliation::Refreshed {
            removed: 3,
            copied: 2
        }
    );
    assert!(!temp_dir.path().join("libstale.so").exists());
    assert_eq!(file_names(temp_dir.path()).len(), 2);
}

#[test]
fn reconcile___missing_file___repopulates() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("libfoo.so"), b"linux libfoo v2").unwrap();
    let (naming, expected) = linux();

    let outcome = reconcile(temp_dir.path(), &naming, &expected, &bundle()).unwrap();

    assert!(matches!(outcome, Reconciliation::Refreshed { copied: 2, .. }));
    assert_eq!(
        fs::read(temp_dir.path().join("helper")).unwrap(),
        b"linux helper v2"
    );
}

#[test]
fn reconcile___content_drift___replaces_every_file() {
    let temp_dir = TempDir::new().unwrap();
    populate_current(temp_dir.path());
    fs::write(temp_dir.path().join("libfoo.so"), b"linux libfoo v1").unwrap();
    let (naming, expected) = linux();

    let outcome = reconcile(temp_dir.path(), &naming, &expected, &bundle()).unwrap();

    assert_eq!(
        outcome,
        Reconciliation::Refreshed {
            removed: 2,
            copied: 2
        }
    );
    assert_eq!(
        fs::read(temp_dir.path().join("libfoo.so")).unwrap(),
        b"linux libfoo v2"
    );
}

#[test]
fn reconcile___empty_expected_set___removes_extraneous_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("junk"), b"x").unwrap();
    let naming = ResourceNaming::new("win/aarch64", "");

    let first = reconcile(temp_dir.path(), &naming, &[], &bundle()).unwrap();
    let second = reconcile(temp_dir.path(), &naming, &[], &bundle()).unwrap();

    assert_eq!(
        first,
        Reconciliation::Refreshed {
            removed: 1,
            copied: 0
        }
    );
    assert_eq!(second, Reconciliation::UpToDate);
    assert!(file_names(temp_dir.path()).is_empty());
}

#[test]
fn reconcile___other_platform_resources___are_never_copied() {
    let temp_dir = TempDir::new().unwrap();
    let (naming, expected) = linux();

    reconcile(temp_dir.path(), &naming, &expected, &bundle()).unwrap();

    assert!(!temp_dir.path().join("libfoo.dylib").exists());
}

#[test]
fn reconcile___missing_bundled_resource___fails() {
    let temp_dir = TempDir::new().unwrap();
    let (naming, expected) = linux();
    let incomplete = MemorySource::new().with("linux/x86-64/libfoo.so", b"so".to_vec());

    let err = reconcile(temp_dir.path(), &naming, &expected, &incomplete).unwrap_err();

    assert!(matches!(
        err,
        InitError::Bundle(BundleError::ResourceNotFound(_))
    ));
}

#[test]
fn reconcile___missing_directory___fails_with_list_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("gone");
    let (naming, expected) = linux();

    let err = reconcile(&missing, &naming, &expected, &bundle()).unwrap_err();

    assert!(matches!(err, InitError::Filesystem { action: "list", .. }));
}

#[test]
fn reconcile___copied_files___map_back_to_expected_resources() {
    let temp_dir = TempDir::new().unwrap();
    let naming = ResourceNaming::new("linux/x86-64", "resources/native/");
    let source = MemorySource::new()
        .with("resources/native/linux/x86-64/libfoo.so", b"so".to_vec())
        .with("resources/native/linux/x86-64/helper", b"bin".to_vec());
    let expected = naming.expected_resources(&BundleManifest::parse(MANIFEST));

    reconcile(temp_dir.path(), &naming, &expected, &source).unwrap();

    for file_name in file_names(temp_dir.path()) {
        assert!(expected.contains(&naming.resource_name(&file_name)));
    }
}

#[cfg(unix)]
#[test]
fn reconcile___copied_files___are_executable() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let (naming, expected) = linux();

    reconcile(temp_dir.path(), &naming, &expected, &bundle()).unwrap();

    let mode = fs::metadata(temp_dir.path().join("helper"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn FreshnessSnapshot___is_up_to_date___unreadable_file___counts_as_stale() {
    let temp_dir = TempDir::new().unwrap();
    let (naming, expected) = linux();
    let children = vec![
        temp_dir.path().join("libfoo.so"),
        temp_dir.path().join("helper"),
    ];

    // Names match but neither file exists on disk
    let snapshot = FreshnessSnapshot::new(&children, &naming);

    assert!(!snapshot.is_up_to_date(&expected, &bundle()));
}

#[test]
fn FreshnessSnapshot___new___keys_by_resource_name() {
    let naming = ResourceNaming::new("darwin", "native/");
    let children = vec![PathBuf::from("/tmp/nih-darwin/libfoo.dylib")];

    let snapshot = FreshnessSnapshot::new(&children, &naming);

    assert_eq!(
        snapshot.resource_names().collect::<Vec<_>>(),
        ["native/darwin/libfoo.dylib"]
    );
}

#[test]
fn reconcile___nested_resource___is_copied_flat_and_always_refreshed() {
    let temp_dir = TempDir::new().unwrap();
    let naming = ResourceNaming::new("linux/x86-64", "");
    let source = MemorySource::new()
        .with("linux/x86-64/libfoo.so", b"foo".to_vec())
        .with("linux/x86-64/sub/libbar.so", b"bar".to_vec());
    let expected = naming.expected_resources(&BundleManifest::parse(
        "linux/x86-64/libfoo.so\nlinux/x86-64/sub/libbar.so\n",
    ));

    let first = reconcile(temp_dir.path(), &naming, &expected, &source).unwrap();
    let second = reconcile(temp_dir.path(), &naming, &expected, &source).unwrap();

    assert_eq!(first, Reconciliation::Refreshed { removed: 0, copied: 2 });
    assert_eq!(second, Reconciliation::Refreshed { removed: 2, copied: 2 });
    assert_eq!(fs::read(temp_dir.path().join("libbar.so")).unwrap(), b"bar");
}

/// Log output collected from a test subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn reconcile___stale_directory___logs_each_phase_with_timing() {
    let temp_dir = TempDir::new().unwrap();
    let (naming, expected) = linux();
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        reconcile(temp_dir.path(), &naming, &expected, &bundle()).unwrap();
    });

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    for phase in [
        "Listed native files",
        "Checked natives are up to date",
        "Cleared native directory",
        "Copied natives",
    ] {
        assert!(output.contains(phase), "missing {phase:?} in {output}");
    }
    assert_eq!(output.matches("elapsed_ms=").count(), 4);
}
