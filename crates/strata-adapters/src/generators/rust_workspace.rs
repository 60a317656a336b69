//! Generator for Rust workspaces and the crates inside them.
//!
//! A layer whose children are themselves `rust-workspace` layers becomes a
//! cargo workspace listing them as members; any other layer becomes a library
//! crate.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::debug;

use strata_core::{
    domain::{Feature, FeatureType, Layer, LayerType},
    engine::{
        FeatureProcessor, FeatureProvider, RemoveFile, TemplateContext, TemplateGenerator,
        WriteText,
    },
    error::StrataResult,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct RustWorkspaceGenerator;

impl RustWorkspaceGenerator {
    pub const ID: &'static str = "rust-workspace";

    const NAMESPACE: &'static str = "com.example.library";
}

impl TemplateGenerator for RustWorkspaceGenerator {
    fn id(&self) -> &str {
        Self::ID
    }

    fn layer_type(&self) -> LayerType {
        LayerType::Library
    }

    fn create_providers(&self) -> Vec<Arc<dyn FeatureProvider>> {
        vec![
            Arc::new(Provider {
                id: "cargo",
                required: true,
                feature_type: FeatureType::Foundation,
                processors: vec![Arc::new(CargoManifest), Arc::new(CargoSources)],
            }),
            Arc::new(Provider {
                id: "quality",
                required: false,
                feature_type: FeatureType::DevTools,
                processors: vec![
                    Arc::new(ConfigFile {
                        id: "quality.rustfmt",
                        path: "rustfmt.toml",
                        text: RUSTFMT,
                    }),
                    Arc::new(ConfigFile {
                        id: "quality.clippy",
                        path: "clippy.toml",
                        text: CLIPPY,
                    }),
                ],
            }),
            Arc::new(Provider {
                id: "ci",
                required: false,
                feature_type: FeatureType::DevTools,
                processors: vec![Arc::new(GithubActions)],
            }),
            Arc::new(Provider {
                id: "license",
                required: false,
                feature_type: FeatureType::Guides,
                processors: vec![Arc::new(MitLicense)],
            }),
        ]
    }

    fn create_presets(&self) -> Vec<Layer> {
        let preset = |name: &str| Layer::new("", name, Self::NAMESPACE, Self::ID);
        vec![
            preset("minimal"),
            preset("standard").with_features(["quality.rustfmt", "quality.clippy"]),
            preset("full").with_features([
                "quality.rustfmt",
                "quality.clippy",
                GithubActions::ID,
                MitLicense::ID,
            ]),
        ]
    }
}

struct Provider {
    id: &'static str,
    required: bool,
    feature_type: FeatureType,
    processors: Vec<Arc<dyn FeatureProcessor>>,
}

impl FeatureProvider for Provider {
    fn id(&self) -> &str {
        self.id
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn feature_type(&self) -> FeatureType {
        self.feature_type
    }

    fn processors(&self) -> &[Arc<dyn FeatureProcessor>] {
        &self.processors
    }
}

/// Removes `path` when `feature` was not applied to the layer this pass.
fn remove_unless_applied(context: &TemplateContext, feature: &str, path: &str) -> StrataResult<()> {
    if context.has_applied(feature) {
        return Ok(());
    }
    context.apply_rules(path, &[&RemoveFile])
}

/// Names of child layers generated by this template; they become members.
fn members(context: &TemplateContext) -> Vec<&str> {
    context
        .children()
        .iter()
        .filter(|child| child.processor().id() == RustWorkspaceGenerator::ID)
        .map(|child| child.layer().name.as_str())
        .collect()
}

fn crate_name(layer: &Layer) -> String {
    layer.display_name().replace(['.', ' '], "-").to_lowercase()
}

struct CargoManifest;

impl CargoManifest {
    const ID: &'static str = "cargo.manifest";

    fn render(context: &TemplateContext) -> String {
        let layer = context.layer();
        let members = members(context);

        if !members.is_empty() {
            let list = members
                .iter()
                .map(|m| format!("\"{m}\""))
                .collect::<Vec<_>>()
                .join(", ");
            return format!(
                "[workspace]\nresolver = \"3\"\nmembers = [{list}]\n\n\
                 [workspace.package]\nversion = \"0.1.0\"\nedition = \"2024\"\n"
            );
        }

        let mut manifest = format!(
            "[package]\nname = \"{}\"\nversion = \"0.1.0\"\nedition = \"2024\"\n",
            crate_name(layer)
        );
        if let Some(description) = &layer.description {
            let _ = writeln!(manifest, "description = {:?}", description.trim());
        }
        if layer.has_feature(MitLicense::ID) {
            manifest.push_str("license = \"MIT\"\n");
        }
        manifest.push_str("\n[dependencies]\n");
        manifest
    }
}

impl FeatureProcessor for CargoManifest {
    fn id(&self) -> &str {
        Self::ID
    }

    fn do_apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        let manifest = Self::render(context);
        context.apply_rules("Cargo.toml", &[&WriteText::new(manifest)])
    }

    fn remove(&self, context: &mut TemplateContext) -> StrataResult<()> {
        remove_unless_applied(context, Self::ID, "Cargo.toml")
    }
}

/// `src/lib.rs` for crate layers.
///
/// A workspace root is not a crate: the feature is neither written nor
/// recorded there, so cleanup removes sources left from an earlier run.
struct CargoSources;

impl CargoSources {
    const ID: &'static str = "cargo.sources";
}

impl FeatureProcessor for CargoSources {
    fn id(&self) -> &str {
        Self::ID
    }

    fn apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        if !members(context).is_empty() {
            debug!(layer = %context.layer().id, "workspace root, no sources");
            return Ok(());
        }
        self.do_apply(context)?;
        context.record_applied(Feature::new(Self::ID));
        Ok(())
    }

    fn do_apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        let layer = context.layer();
        let summary = layer
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or(layer.display_name());
        let source = format!(
            "//! {summary}\n\n\
             pub fn namespace() -> &'static str {{\n    {:?}\n}}\n\n\
             #[cfg(test)]\nmod tests {{\n    use super::*;\n\n    \
             #[test]\n    fn namespace_is_set() {{\n        \
             assert_eq!(namespace(), {:?});\n    }}\n}}\n",
            layer.namespace, layer.namespace
        );
        context.apply_rules("src/lib.rs", &[&WriteText::new(source)])
    }

    fn remove(&self, context: &mut TemplateContext) -> StrataResult<()> {
        remove_unless_applied(context, Self::ID, "src/lib.rs")
    }
}

/// A feature that is a single fixed configuration file.
struct ConfigFile {
    id: &'static str,
    path: &'static str,
    text: &'static str,
}

impl FeatureProcessor for ConfigFile {
    fn id(&self) -> &str {
        self.id
    }

    fn do_apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        context.apply_rules(self.path, &[&WriteText::new(self.text)])
    }

    fn remove(&self, context: &mut TemplateContext) -> StrataResult<()> {
        remove_unless_applied(context, self.id, self.path)
    }
}

const RUSTFMT: &str = "edition = \"2024\"\nmax_width = 100\n";

const CLIPPY: &str = "msrv = \"1.85\"\ntoo-many-arguments-threshold = 8\n";

/// CI workflow; written and recorded at the root layer only.
struct GithubActions;

impl GithubActions {
    const ID: &'static str = "ci.github-actions";
    const PATH: &'static str = ".github/workflows/ci.yml";

    const WORKFLOW: &'static str = "\
name: CI

on:
  push:
    branches: [main]
  pull_request:

jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: dtolnay/rust-toolchain@stable
        with:
          components: rustfmt, clippy
      - run: cargo fmt --all -- --check
      - run: cargo clippy --all-targets -- -D warnings
      - run: cargo test --all
";
}

impl FeatureProcessor for GithubActions {
    fn id(&self) -> &str {
        Self::ID
    }

    fn apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        if !context.is_root() {
            debug!(layer = %context.layer().id, "not the root layer, no workflow");
            return Ok(());
        }
        self.do_apply(context)?;
        context.record_applied(Feature::new(Self::ID));
        Ok(())
    }

    fn do_apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        context.apply_rules(Self::PATH, &[&WriteText::new(Self::WORKFLOW)])
    }

    fn remove(&self, context: &mut TemplateContext) -> StrataResult<()> {
        if !context.is_root() {
            return Ok(());
        }
        remove_unless_applied(context, Self::ID, Self::PATH)
    }
}

struct MitLicense;

impl MitLicense {
    const ID: &'static str = "license.mit";

    fn render(holder: &str) -> String {
        format!(
            "MIT License\n\nCopyright (c) {} {}\n\n\
             Permission is hereby granted, free of charge, to any person obtaining a copy\n\
             of this software and associated documentation files (the \"Software\"), to deal\n\
             in the Software without restriction, including without limitation the rights\n\
             to use, copy, modify, merge, publish, distribute, sublicense, and/or sell\n\
             copies of the Software, and to permit persons to whom the Software is\n\
             furnished to do so, subject to the following conditions:\n\n\
             The above copyright notice and this permission notice shall be included in all\n\
             copies or substantial portions of the Software.\n\n\
             THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR\n\
             IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,\n\
             FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE\n\
             AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER\n\
             LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,\n\
             OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE\n\
             SOFTWARE.\n",
            Utc::now().year(),
            holder
        )
    }
}

impl FeatureProcessor for MitLicense {
    fn id(&self) -> &str {
        Self::ID
    }

    fn do_apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        let root = context.root_layer();
        let holder = if root.namespace.is_empty() {
            root.display_name()
        } else {
            root.namespace.as_str()
        };
        let license = Self::render(holder);
        context.apply_rules("LICENSE", &[&WriteText::new(license)])
    }

    fn remove(&self, context: &mut TemplateContext) -> StrataResult<()> {
        remove_unless_applied(context, Self::ID, "LICENSE")
    }
}
