//! Implementation of the `strata generate` command.
//!
//! Responsibility: load the manifest, wire the built-in templates to the
//! local filesystem, run the generation service and display its report. No
//! generation logic lives here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use strata_adapters::{LayerManifestLoader, LocalFilesystem, builtin_registry};
use strata_core::application::{GenerationReport, GenerationService, LayerPlan};

use crate::{
    cli::{GenerateArgs, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Manifest looked for when none is given or configured.
pub const DEFAULT_MANIFEST: &str = "strata.toml";

/// Execute the `strata generate` command.
///
/// Dispatch sequence:
/// 1. Resolve and load the manifest
/// 2. Print the plan and stop on `--dry-run`
/// 3. Refuse a non-empty output directory unless forced or confirmed
/// 4. Run the generation service on a multi-threaded runtime
/// 5. Print the per-layer report
#[instrument(skip_all)]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Manifest
    let manifest = resolve_manifest(args.manifest.as_deref(), &config)?;
    let template = args
        .template
        .clone()
        .unwrap_or_else(|| config.defaults.template.clone());
    let layer = LayerManifestLoader::new()
        .with_default_processor(template)
        .load(&manifest)?;
    let output_dir = args
        .output
        .clone()
        .or_else(|| config.defaults.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    debug!(
        manifest = %manifest.display(),
        output_dir = %output_dir.display(),
        root = %layer.id,
        "Manifest resolved"
    );

    let service = GenerationService::new(
        Arc::new(builtin_registry()),
        Arc::new(LocalFilesystem::new()),
    );

    // 2. Dry run
    if args.dry_run {
        let plans = service.plan(&layer, &output_dir)?;
        return show_plan(&plans, &output_dir, &output);
    }

    // 3. Output directory
    if is_non_empty_dir(&output_dir)
        && !args.force
        && (args.yes || !confirm_non_empty(&output_dir, &global)?)
    {
        return Err(CliError::OutputExists { path: output_dir });
    }

    // 4. Generate
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_cli_context(|| "Failed to start the async runtime")?;

    info!(layers = layer.tree_size(), "Generation started");
    let spinner = output.spinner(&format!("Generating {} layer(s)...", layer.tree_size()));
    let result = runtime.block_on(service.generate(layer, &output_dir));
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = result?;
    info!(layers = report.layers.len(), "Generation completed");

    // 5. Report
    show_report(&report, &output_dir, &output)
}

/// Explicit path, then `templates.manifest_path`, then `strata.toml`.
pub fn resolve_manifest(explicit: Option<&Path>, config: &AppConfig) -> CliResult<PathBuf> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| config.templates.manifest_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));

    if path.is_file() {
        Ok(path)
    } else {
        Err(CliError::ManifestMissing { searched: path })
    }
}

fn is_non_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

#[cfg(feature = "interactive")]
fn confirm_non_empty(path: &Path, global: &GlobalArgs) -> CliResult<bool> {
    use std::io::IsTerminal as _;

    if global.quiet || !std::io::stdin().is_terminal() {
        return Ok(false);
    }
    dialoguer::Confirm::new()
        .with_prompt(format!(
            "{} is not empty. Generate into it anyway?",
            path.display()
        ))
        .default(false)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: "failed to read confirmation".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_non_empty(_path: &Path, _global: &GlobalArgs) -> CliResult<bool> {
    Ok(false)
}

fn show_plan(plans: &[LayerPlan], output_dir: &Path, out: &OutputManager) -> CliResult<()> {
    if out.format() == OutputFormat::Json {
        out.json(plans)?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would generate {} layer(s) into {}",
        plans.len(),
        output_dir.display()
    ))?;
    for plan in plans {
        let template = plan.template.as_deref().unwrap_or("(no template, skipped)");
        out.print(&format!(
            "  {} [{}] {}",
            plan.name,
            template,
            plan.path.display()
        ))?;
        if !plan.features.is_empty() {
            out.detail(&format!("      features: {}", plan.features.join(", ")))?;
        }
        if !plan.dependencies.is_empty() {
            out.detail(&format!("      always:   {}", plan.dependencies.join(", ")))?;
        }
    }
    Ok(())
}

fn show_report(report: &GenerationReport, output_dir: &Path, out: &OutputManager) -> CliResult<()> {
    if out.format() == OutputFormat::Json {
        out.json(report)?;
        return Ok(());
    }

    out.header(&format!("Generated into {}", output_dir.display()))?;
    for layer in &report.layers {
        let indent = "  ".repeat(layer.depth + 1);
        out.print(&format!("{indent}{} [{}]", layer.name, layer.template))?;
        out.detail(&format!("{indent}  {}", layer.applied.join(", ")))?;
    }
    out.success(&format!(
        "{} layer(s), {} feature(s) applied at {}",
        report.layers.len(),
        report.feature_count(),
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ))?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_manifest_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");

        let err = resolve_manifest(Some(&missing), &AppConfig::default()).unwrap_err();

        assert!(matches!(err, CliError::ManifestMissing { searched } if searched == missing));
    }

    #[test]
    fn configured_manifest_is_used_when_none_given() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("layers.toml");
        std::fs::write(&path, "name = \"x\"").unwrap();
        let mut config = AppConfig::default();
        config.templates.manifest_path = Some(path.clone());

        assert_eq!(resolve_manifest(None, &config).unwrap(), path);
    }

    #[test]
    fn empty_and_missing_dirs_are_not_non_empty() {
        let temp = TempDir::new().unwrap();
        assert!(!is_non_empty_dir(temp.path()));
        assert!(!is_non_empty_dir(&temp.path().join("missing")));

        std::fs::write(temp.path().join("file"), "").unwrap();
        assert!(is_non_empty_dir(temp.path()));
    }
}
