//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use strata_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::{Layer, LayerType},
    engine::{FeatureProcessor, FeatureProvider, ProcessorType, TemplateContext, TemplateGenerator},
    error::{StrataError, StrataResult},
};

pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Filesystem kept in a map, enough for processors that write text.
#[derive(Default)]
pub struct MapFilesystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MapFilesystem {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

impl Filesystem for MapFilesystem {
    fn create_dir_all(&self, _path: &Path) -> StrataResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> StrataResult<String> {
        self.contents(path).ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "not found".into(),
            }
            .into()
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> StrataResult<()> {
        let mut files = self.files.lock().unwrap();
        if let Some(content) = files.remove(from) {
            files.insert(to.to_path_buf(), content);
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> StrataResult<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.keys().any(|p| p.starts_with(path))
    }
}

/// Processor that logs `apply:<layer>:<id>` and `remove:<layer>:<id>`.
pub struct Recorder {
    id: String,
    log: EventLog,
    delay: Option<Duration>,
    fail: bool,
    panic: bool,
}

impl Recorder {
    pub fn new(id: &str, log: &EventLog) -> Self {
        Self {
            id: id.to_string(),
            log: Arc::clone(log),
            delay: None,
            fail: false,
            panic: false,
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic = true;
        self
    }
}

impl FeatureProcessor for Recorder {
    fn id(&self) -> &str {
        &self.id
    }

    fn do_apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.panic {
            panic!("{} panicked on {}", self.id, context.layer().id);
        }
        if self.fail {
            return Err(StrataError::feature_failed(
                &self.id,
                &context.layer().id,
                "boom",
            ));
        }
        self.log
            .lock()
            .unwrap()
            .push(format!("apply:{}:{}", context.layer().id, self.id));
        Ok(())
    }

    fn remove(&self, context: &mut TemplateContext) -> StrataResult<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("remove:{}:{}", context.layer().id, self.id));
        Ok(())
    }
}

/// Writes `stamp.txt` into the layer directory.
pub struct Stamp;

impl FeatureProcessor for Stamp {
    fn id(&self) -> &str {
        "stamp"
    }

    fn do_apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        let path = context.resolve("stamp.txt");
        context
            .filesystem()
            .write_file(&path, &context.layer().id)
    }
}

pub struct Group {
    id: String,
    required: bool,
    processors: Vec<Arc<dyn FeatureProcessor>>,
}

impl Group {
    pub fn required(id: &str, processors: Vec<Arc<dyn FeatureProcessor>>) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            required: true,
            processors,
        })
    }

    pub fn optional(id: &str, processors: Vec<Arc<dyn FeatureProcessor>>) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            required: false,
            processors,
        })
    }
}

impl FeatureProvider for Group {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn processors(&self) -> &[Arc<dyn FeatureProcessor>] {
        &self.processors
    }
}

/// Generator assembled from ready-made providers.
pub struct TestGenerator {
    id: String,
    providers: Vec<Arc<dyn FeatureProvider>>,
    presets: Vec<Layer>,
    dependencies: Option<Vec<ProcessorType>>,
}

impl TestGenerator {
    pub fn new(id: &str, providers: Vec<Arc<dyn FeatureProvider>>) -> Self {
        Self {
            id: id.to_string(),
            providers,
            presets: Vec::new(),
            dependencies: None,
        }
    }

    pub fn with_presets(mut self, presets: Vec<Layer>) -> Self {
        self.presets = presets;
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<ProcessorType>) -> Self {
        self.dependencies = Some(dependencies);
        self
    }
}

impl TemplateGenerator for TestGenerator {
    fn id(&self) -> &str {
        &self.id
    }

    fn layer_type(&self) -> LayerType {
        LayerType::Library
    }

    fn create_providers(&self) -> Vec<Arc<dyn FeatureProvider>> {
        self.providers.clone()
    }

    fn create_presets(&self) -> Vec<Layer> {
        self.presets.clone()
    }

    fn dependencies(&self) -> Vec<ProcessorType> {
        match &self.dependencies {
            Some(dependencies) => dependencies.clone(),
            None => vec![
                ProcessorType::of::<strata_core::engine::ReadmeProcessor>(),
                ProcessorType::of::<strata_core::engine::GitProcessor>(),
            ],
        }
    }
}

/// P1 (required: A, B), P2 (required, empty), P3 (optional: C, D).
pub fn scenario_generator(id: &str, log: &EventLog) -> TestGenerator {
    let a: Arc<dyn FeatureProcessor> = Arc::new(Recorder::new("A", log));
    let b: Arc<dyn FeatureProcessor> = Arc::new(Recorder::new("B", log));
    let c: Arc<dyn FeatureProcessor> = Arc::new(Recorder::new("C", log));
    let d: Arc<dyn FeatureProcessor> = Arc::new(Recorder::new("D", log));

    TestGenerator::new(
        id,
        vec![
            Group::required("P1", vec![a, b]),
            Group::required("P2", vec![]),
            Group::optional("P3", vec![c, d]),
        ],
    )
}

pub fn applied_ids(context: &TemplateContext) -> Vec<String> {
    context
        .applied_features()
        .iter()
        .map(|f| f.id.clone())
        .collect()
}
