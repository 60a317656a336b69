//! Implementation of the `strata list` command.

use serde::Serialize;
use strata_adapters::builtin_registry;
use strata_core::engine::{FeatureProvider, TemplateProcessor};

use crate::{
    cli::{ListArgs, ListFormat},
    error::CliResult,
    output::OutputManager,
};

/// Serializable view of one registered template.
#[derive(Debug, Serialize)]
struct TemplateSummary {
    id: String,
    layer_type: &'static str,
    version: String,
    providers: Vec<ProviderSummary>,
}

#[derive(Debug, Serialize)]
struct ProviderSummary {
    id: String,
    required: bool,
    feature_type: &'static str,
    features: Vec<String>,
}

impl From<&TemplateProcessor> for TemplateSummary {
    fn from(template: &TemplateProcessor) -> Self {
        let mut providers: Vec<&std::sync::Arc<dyn FeatureProvider>> =
            template.catalog().providers().iter().collect();
        providers.sort_by_key(|provider| provider.feature_type().order());

        Self {
            id: template.id().to_string(),
            layer_type: template.layer_type().id(),
            version: template.generator().version().to_string(),
            providers: providers
                .into_iter()
                .map(|provider| ProviderSummary {
                    id: provider.id().to_string(),
                    required: provider.is_required(),
                    feature_type: provider.feature_type().id(),
                    features: provider
                        .processors()
                        .iter()
                        .map(|processor| processor.id().to_string())
                        .collect(),
                })
                .collect(),
        }
    }
}

pub fn execute(args: ListArgs, output: OutputManager) -> CliResult<()> {
    let registry = builtin_registry();
    let summaries: Vec<TemplateSummary> = registry
        .templates()
        .map(|template| TemplateSummary::from(template.as_ref()))
        .collect();

    match args.format {
        ListFormat::Table => {
            output.header("Available Templates:")?;
            for summary in &summaries {
                output.print(&format!(
                    "  {} ({}) @ {}",
                    summary.id, summary.layer_type, summary.version
                ))?;
                for provider in &summary.providers {
                    let marker = if provider.required { "*" } else { " " };
                    output.detail(&format!(
                        "{marker} {:<10} [{}] {}",
                        provider.id,
                        provider.feature_type,
                        provider.features.join(", ")
                    ))?;
                }
            }
            output.print("")?;
            output.print("  * required, always generated")?;
        }
        ListFormat::List => {
            for summary in &summaries {
                output.data(&summary.id)?;
            }
        }
        ListFormat::Json => output.json(&summaries)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> TemplateSummary {
        let registry = builtin_registry();
        let template = registry.get(id).unwrap();
        TemplateSummary::from(template.as_ref())
    }

    #[test]
    fn providers_sorted_by_feature_type() {
        let workspace = summary("rust-workspace");
        let ids: Vec<&str> = workspace.providers.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids.first(), Some(&"cargo"));
        assert!(workspace.providers[0].required);
        assert!(ids.contains(&"metadata"));
        assert_eq!(workspace.layer_type, "library");
    }

    #[test]
    fn metadata_features_always_listed() {
        let app = summary("app");
        let metadata = app.providers.iter().find(|p| p.id == "metadata").unwrap();

        assert!(metadata.features.contains(&"metadata.readme".to_string()));
        assert!(metadata.features.contains(&"metadata.git".to_string()));
    }
}
