//! Implementation of the `strata presets` command.

use std::collections::BTreeMap;

use strata_adapters::{LayerManifestLoader, ManifestFormat, builtin_registry};
use strata_core::{
    application::ApplicationError,
    domain::{Feature, Layer},
    engine::TemplateRegistry,
};

use crate::{
    cli::{PresetFormat, PresetsArgs},
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: PresetsArgs, output: OutputManager) -> CliResult<()> {
    let registry = builtin_registry();
    let presets = collect(&registry, args.template.as_deref(), args.name.as_deref())?;

    match args.format {
        PresetFormat::Table => {
            for (template, layers) in &presets {
                output.header(template)?;
                for layer in layers {
                    let features: Vec<&str> = layer.features.iter().map(Feature::id).collect();
                    let features = if features.is_empty() {
                        "(no features)".to_string()
                    } else {
                        features.join(", ")
                    };
                    output.print(&format!("  {:<12} {}", layer.display_name(), features))?;
                }
            }
        }
        PresetFormat::Json => output.json(&presets)?,
        PresetFormat::Toml => {
            let loader = LayerManifestLoader::new();
            let mut first = true;
            for (template, layers) in &presets {
                for layer in layers {
                    if !first {
                        output.data("")?;
                    }
                    first = false;
                    output.data(&format!("# {template} / {}", layer.display_name()))?;
                    output.data(loader.render(layer, ManifestFormat::Toml)?.trim_end())?;
                }
            }
        }
    }

    Ok(())
}

/// Presets per template id, optionally narrowed to one template and name.
///
/// A synthetic preset without a name is named after its template so it can be
/// saved as a manifest directly.
fn collect(
    registry: &TemplateRegistry,
    template: Option<&str>,
    name: Option<&str>,
) -> CliResult<BTreeMap<String, Vec<Layer>>> {
    let templates: Vec<_> = match template {
        Some(id) => vec![registry.get(id).ok_or_else(|| {
            CliError::Core(ApplicationError::TemplateNotFound { id: id.into() }.into())
        })?],
        None => registry.templates().collect(),
    };

    let mut presets = BTreeMap::new();
    for processor in templates {
        let layers: Vec<Layer> = processor
            .presets()
            .into_iter()
            .map(|mut layer| {
                if layer.name.is_empty() {
                    layer.name = processor.id().to_string();
                }
                layer
            })
            .filter(|layer| name.is_none_or(|n| layer.name == n))
            .collect();

        if !layers.is_empty() {
            presets.insert(processor.id().to_string(), layers);
        }
    }

    if let (Some(template), Some(name)) = (template, name)
        && presets.is_empty()
    {
        return Err(CliError::PresetNotFound {
            template: template.into(),
            name: name.into(),
        });
    }
    Ok(presets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_templates_listed_without_filter() {
        let presets = collect(&builtin_registry(), None, None).unwrap();

        assert_eq!(presets["app"].len(), 1);
        assert_eq!(presets["app"][0].name, "app");
        assert_eq!(presets["rust-workspace"].len(), 3);
    }

    #[test]
    fn name_filter_narrows_presets() {
        let presets = collect(&builtin_registry(), Some("rust-workspace"), Some("full")).unwrap();

        let full = &presets["rust-workspace"];
        assert_eq!(full.len(), 1);
        assert!(full[0].has_feature("license.mit"));
        assert!(full[0].has_feature("cargo.manifest"));
    }

    #[test]
    fn unknown_template_is_not_found() {
        let err = collect(&builtin_registry(), Some("nope"), None).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn unknown_preset_name_is_reported() {
        let err = collect(&builtin_registry(), Some("app"), Some("huge")).unwrap_err();
        assert!(matches!(err, CliError::PresetNotFound { .. }));
    }
}
