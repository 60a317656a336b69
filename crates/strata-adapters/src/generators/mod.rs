//! Built-in template generators.

mod app;
mod rust_workspace;

pub use app::AppGenerator;
pub use rust_workspace::RustWorkspaceGenerator;

use strata_core::engine::TemplateRegistry;

/// Registry holding every built-in generator.
pub fn builtin_registry() -> TemplateRegistry {
    TemplateRegistry::new()
        .with_template(AppGenerator)
        .with_template(RustWorkspaceGenerator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_lists_generators_by_id() {
        let registry = builtin_registry();
        let ids: Vec<&str> = registry.templates().map(|t| t.id()).collect();

        assert_eq!(ids, [AppGenerator::ID, RustWorkspaceGenerator::ID]);
    }
}
