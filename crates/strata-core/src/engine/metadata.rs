//! Built-in metadata provider, appended to every catalog.
//!
//! Its processors are the default dependencies of every template, so each
//! generated layer gets a README and a `.gitignore` whether or not it asked
//! for them.

use std::sync::Arc;

use crate::{
    domain::FeatureType,
    engine::{
        context::TemplateContext,
        processor::{FeatureProcessor, FeatureProvider},
        rules::WriteText,
    },
    error::StrataResult,
};

pub struct MetadataProvider {
    processors: Vec<Arc<dyn FeatureProcessor>>,
}

impl MetadataProvider {
    pub const ID: &'static str = "metadata";

    pub fn new() -> Self {
        Self {
            processors: vec![Arc::new(ReadmeProcessor), Arc::new(GitProcessor)],
        }
    }
}

impl Default for MetadataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureProvider for MetadataProvider {
    fn id(&self) -> &str {
        Self::ID
    }

    fn feature_type(&self) -> FeatureType {
        FeatureType::Foundation
    }

    fn processors(&self) -> &[Arc<dyn FeatureProcessor>] {
        &self.processors
    }
}

/// Writes `README.md` describing the layer and the child modules that were
/// generated beneath it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadmeProcessor;

impl ReadmeProcessor {
    pub const ID: &'static str = "metadata.readme";

    fn render(context: &TemplateContext) -> String {
        let layer = context.layer();
        let mut lines = vec![format!("# {}", layer.display_name())];

        if let Some(description) = &layer.description {
            lines.extend([String::new(), description.trim().to_string()]);
        }
        if !layer.namespace.is_empty() {
            lines.extend([String::new(), format!("Namespace: `{}`", layer.namespace)]);
        }

        let modules: Vec<_> = context.children().iter().map(|c| c.layer()).collect();
        if !modules.is_empty() {
            lines.extend([String::new(), "## Modules".to_string(), String::new()]);
            lines.extend(modules.into_iter().map(|module| {
                let link = format!("- [{}]({}/README.md)", module.display_name(), module.name);
                match &module.description {
                    Some(description) => format!("{link}: {}", description.trim()),
                    None => link,
                }
            }));
        }

        let generator = context.processor().generator();
        lines.extend([
            String::new(),
            "---".to_string(),
            format!("Generated by `{}` {}", generator.id(), generator.version()),
        ]);

        let mut readme = lines.join("\n");
        readme.push('\n');
        readme
    }
}

impl FeatureProcessor for ReadmeProcessor {
    fn id(&self) -> &str {
        Self::ID
    }

    fn do_apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        let readme = Self::render(context);
        context.apply_rules("README.md", &[&WriteText::new(readme)])
    }
}

/// Writes the layer's `.gitignore`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitProcessor;

impl GitProcessor {
    pub const ID: &'static str = "metadata.git";

    const IGNORED: &'static str = "\
target/
out/
build/
dist/

.idea
.vscode
.project
.settings
.DS_Store
";
}

impl FeatureProcessor for GitProcessor {
    fn id(&self) -> &str {
        Self::ID
    }

    fn do_apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        context.apply_rules(".gitignore", &[&WriteText::new(Self::IGNORED)])
    }
}
