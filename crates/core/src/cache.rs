//! Modification-time based cache of compiled report artifacts.

use log::{debug, info};
use quire_traits::{CompileError, CompilerSettings, ReportCompiler};
use quire_types::CompiledReport;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

/// Extension of compiled artifacts, which sit next to their source.
pub const ARTIFACT_EXTENSION: &str = "compiled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileOutcome {
    /// The artifact was up to date and was not touched.
    Fresh,
    /// The artifact was missing or stale and has been rewritten.
    Compiled,
}

type PathLocks = Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>;

/// Decides when a template needs (re)compiling and performs it.
///
/// An artifact is valid iff it exists and is not older than its source.
/// Artifacts are staged in a temporary sibling file and renamed into place,
/// so a concurrent reader sees either the old or the new artifact.
#[derive(Debug)]
pub struct CompileCache {
    compiler: Arc<dyn ReportCompiler>,
    settings: CompilerSettings,
    locks: Option<PathLocks>,
}

impl CompileCache {
    pub fn new(compiler: Arc<dyn ReportCompiler>, settings: CompilerSettings) -> Self {
        Self {
            compiler,
            settings,
            locks: Some(Mutex::new(HashMap::new())),
        }
    }

    /// Enables or disables the per-template lock that serializes recompilation
    /// of the same path.
    pub fn with_locking(mut self, enabled: bool) -> Self {
        self.locks = enabled.then(|| Mutex::new(HashMap::new()));
        self
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    pub fn compiler(&self) -> &Arc<dyn ReportCompiler> {
        &self.compiler
    }

    pub fn artifact_path(source: &Path) -> PathBuf {
        source.with_extension(ARTIFACT_EXTENSION)
    }

    /// Localization bundles are looked up under the source path minus its extension.
    pub fn bundle_path(source: &Path) -> PathBuf {
        source.with_extension("")
    }

    pub fn is_fresh(&self, source: &Path) -> Result<bool, CompileError> {
        let source_mtime = modified(source)?;
        let artifact = Self::artifact_path(source);
        match fs::metadata(&artifact) {
            Ok(meta) => {
                let artifact_mtime = meta.modified().map_err(|e| CompileError::io(&artifact, e))?;
                Ok(artifact_mtime >= source_mtime)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CompileError::io(&artifact, e)),
        }
    }

    /// Makes sure the artifact for `source` exists and is current.
    pub fn ensure_compiled(&self, source: &Path) -> Result<CompileOutcome, CompileError> {
        if self.is_fresh(source)? {
            debug!("Artifact for '{}' is up to date.", source.display());
            return Ok(CompileOutcome::Fresh);
        }

        let path_lock = self.locks.as_ref().map(|locks| lock_for(locks, source));
        let outcome = self.compile_serialized(source, path_lock.as_deref());
        if let (Some(locks), Some(lock)) = (&self.locks, path_lock) {
            release_lock(locks, source, lock);
        }
        outcome
    }

    fn compile_serialized(
        &self,
        source: &Path,
        lock: Option<&Mutex<()>>,
    ) -> Result<CompileOutcome, CompileError> {
        let _guard = lock.map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner));
        // Another request may have finished compiling while we waited.
        if lock.is_some() && self.is_fresh(source)? {
            debug!("Artifact for '{}' was compiled concurrently.", source.display());
            return Ok(CompileOutcome::Fresh);
        }

        self.compile(source)?;
        Ok(CompileOutcome::Compiled)
    }

    /// Loads the compiled artifact for `source`.
    pub fn load(&self, source: &Path) -> Result<CompiledReport, CompileError> {
        self.compiler.load(&Self::artifact_path(source))
    }

    fn compile(&self, source: &Path) -> Result<(), CompileError> {
        let artifact = Self::artifact_path(source);
        let dir = artifact
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let staging = tempfile::Builder::new()
            .prefix(".quire-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| CompileError::io(&artifact, e))?;

        self.compiler.compile(source, staging.path(), &self.settings)?;
        staging
            .persist(&artifact)
            .map_err(|e| CompileError::io(&artifact, e.error))?;
        align_mtime(source, &artifact)?;

        info!(
            "Compiled '{}' with {} into '{}'.",
            source.display(),
            self.compiler.name(),
            artifact.display()
        );
        Ok(())
    }
}

fn lock_for(locks: &PathLocks, source: &Path) -> Arc<Mutex<()>> {
    let mut map = locks.lock().unwrap_or_else(PoisonError::into_inner);
    map.entry(source.to_path_buf()).or_default().clone()
}

/// Drops the map's entry for `source` once no other request holds it, so the
/// map only tracks templates that are being compiled right now.
fn release_lock(locks: &PathLocks, source: &Path, lock: Arc<Mutex<()>>) {
    let mut map = locks.lock().unwrap_or_else(PoisonError::into_inner);
    let ours = map.get(source).is_some_and(|entry| Arc::ptr_eq(entry, &lock));
    // One reference is the map's, the other is `lock`.
    if ours && Arc::strong_count(&lock) == 2 {
        map.remove(source);
    }
}

fn modified(path: &Path) -> Result<SystemTime, CompileError> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| CompileError::io(path, e))
}

/// Bumps the artifact's mtime up to the source's when the clock disagrees,
/// e.g. for a source stamped in the future.
fn align_mtime(source: &Path, artifact: &Path) -> Result<(), CompileError> {
    let source_mtime = modified(source)?;
    let file = File::options()
        .write(true)
        .open(artifact)
        .map_err(|e| CompileError::io(artifact, e))?;
    let artifact_mtime = file
        .metadata()
        .and_then(|m| m.modified())
        .map_err(|e| CompileError::io(artifact, e))?;
    if artifact_mtime < source_mtime {
        file.set_modified(source_mtime)
            .map_err(|e| CompileError::io(artifact, e))?;
        debug!("Raised mtime of '{}' to match its source.", artifact.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::JsonReportCompiler;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct CountingCompiler {
        inner: JsonReportCompiler,
        compiles: AtomicUsize,
    }

    impl ReportCompiler for CountingCompiler {
        fn compile(
            &self,
            source: &Path,
            artifact: &Path,
            settings: &CompilerSettings,
        ) -> Result<(), CompileError> {
            self.compiles.fetch_add(1, Ordering::SeqCst);
            self.inner.compile(source, artifact, settings)
        }

        fn load(&self, artifact: &Path) -> Result<CompiledReport, CompileError> {
            self.inner.load(artifact)
        }

        fn name(&self) -> &'static str {
            "CountingCompiler"
        }
    }

    fn setup(body: &str) -> (tempfile::TempDir, PathBuf, Arc<CountingCompiler>, CompileCache) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("report.json");
        fs::write(&source, body).unwrap();
        let compiler = Arc::new(CountingCompiler::default());
        let cache = CompileCache::new(compiler.clone(), CompilerSettings::default());
        (dir, source, compiler, cache)
    }

    fn tracked_locks(cache: &CompileCache) -> usize {
        cache.locks.as_ref().map_or(0, |locks| locks.lock().unwrap().len())
    }

    fn mtime(path: &Path) -> SystemTime {
        fs::metadata(path).unwrap().modified().unwrap()
    }

    #[test]
    fn test_paths_derive_from_source() {
        let source = Path::new("/reports/invoice.json");
        assert_eq!(CompileCache::artifact_path(source), Path::new("/reports/invoice.compiled"));
        assert_eq!(CompileCache::bundle_path(source), Path::new("/reports/invoice"));
    }

    #[test]
    fn test_missing_artifact_compiles_once() {
        let (_dir, source, compiler, cache) = setup(r#"{ "name": "r" }"#);

        assert_eq!(cache.ensure_compiled(&source).unwrap(), CompileOutcome::Compiled);
        assert_eq!(cache.ensure_compiled(&source).unwrap(), CompileOutcome::Fresh);
        assert_eq!(compiler.compiles.load(Ordering::SeqCst), 1);

        let artifact = CompileCache::artifact_path(&source);
        assert!(mtime(&artifact) >= mtime(&source));
        assert_eq!(cache.load(&source).unwrap().name, "r");
    }

    #[test]
    fn test_fresh_artifact_is_not_rewritten() {
        let (_dir, source, compiler, cache) = setup(r#"{ "name": "r" }"#);
        cache.ensure_compiled(&source).unwrap();
        let artifact = CompileCache::artifact_path(&source);
        let before = (mtime(&artifact), fs::read(&artifact).unwrap());

        cache.ensure_compiled(&source).unwrap();
        assert_eq!(before, (mtime(&artifact), fs::read(&artifact).unwrap()));
        assert_eq!(compiler.compiles.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_future_source_gets_artifact_mtime_bumped() {
        let (_dir, source, compiler, cache) = setup(r#"{ "name": "r" }"#);
        cache.ensure_compiled(&source).unwrap();

        let future = SystemTime::now() + Duration::from_secs(3600);
        File::options().write(true).open(&source).unwrap().set_modified(future).unwrap();
        assert!(!cache.is_fresh(&source).unwrap());

        assert_eq!(cache.ensure_compiled(&source).unwrap(), CompileOutcome::Compiled);
        assert_eq!(compiler.compiles.load(Ordering::SeqCst), 2);
        assert!(mtime(&CompileCache::artifact_path(&source)) >= future);
        assert_eq!(cache.ensure_compiled(&source).unwrap(), CompileOutcome::Fresh);
    }

    #[test]
    fn test_failed_compile_leaves_no_files() {
        let (dir, source, _compiler, cache) = setup(r#"{ "name": "" }"#);

        let err = cache.ensure_compiled(&source).unwrap_err();
        assert!(matches!(err, CompileError::Invalid { .. }));
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CompileCache::new(Arc::new(JsonReportCompiler), CompilerSettings::default());
        let err = cache.ensure_compiled(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CompileError::Io { .. }));
    }

    #[test]
    fn test_concurrent_requests_compile_once_with_locking() {
        let (_dir, source, compiler, cache) = setup(r#"{ "name": "r" }"#);
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let source = source.clone();
                std::thread::spawn(move || cache.ensure_compiled(&source).unwrap())
            })
            .collect();
        let compiled = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|o| *o == CompileOutcome::Compiled)
            .count();

        assert_eq!(compiled, 1);
        assert_eq!(compiler.compiles.load(Ordering::SeqCst), 1);
        assert_eq!(tracked_locks(&cache), 0);
    }

    #[test]
    fn test_path_locks_are_released_after_compiling() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CompileCache::new(Arc::new(JsonReportCompiler), CompilerSettings::default());
        for i in 0..5 {
            let source = dir.path().join(format!("report{i}.json"));
            fs::write(&source, r#"{ "name": "r" }"#).unwrap();
            cache.ensure_compiled(&source).unwrap();
        }
        let broken = dir.path().join("broken.json");
        fs::write(&broken, r#"{ "name": "" }"#).unwrap();
        assert!(cache.ensure_compiled(&broken).is_err());

        assert_eq!(tracked_locks(&cache), 0);
    }
}
