//! Built-in tool implementations for Drafter.
//!
//! Tools give the model the ability to act: update the working document,
//! save and load files under the sandboxed resource root, list what is
//! there, do arithmetic, and fetch the product catalog.

pub mod arithmetic;
pub mod catalog;
pub mod document;

pub use arithmetic::ArithmeticTool;
pub use catalog::CatalogTool;
pub use document::{DocumentState, ListFilesTool, LoadTool, SaveTool, UpdateTool};

use drafter_core::error::ToolError;
use drafter_core::tool::ToolRegistry;
use std::path::Path;

/// Create the default tool registry: the sandboxed document tool set plus
/// the arithmetic and product-catalog tools.
///
/// All document tools share `state` and are confined to `root` (which the
/// caller is expected to have created, see `drafter_security::ensure_root`).
pub fn default_registry(
    state: DocumentState,
    root: &Path,
    catalog_url: &str,
) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(UpdateTool::new(state.clone())));
    registry.register(Box::new(SaveTool::new(state.clone(), root.to_path_buf())));
    registry.register(Box::new(LoadTool::new(state, root.to_path_buf())));
    registry.register(Box::new(ListFilesTool::new(root.to_path_buf())));
    registry.register(Box::new(ArithmeticTool));
    registry.register(Box::new(CatalogTool::new(catalog_url)?));
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_all_tools() {
        let dir = tempfile::tempdir().unwrap();
        let registry = default_registry(
            DocumentState::new(),
            dir.path(),
            "http://localhost:3000/api/products",
        )
        .unwrap();

        let mut names = registry.names();
        names.sort();
        assert_eq!(
            names,
            vec![
                "arithmetic",
                "list_files",
                "list_products",
                "load",
                "save",
                "update"
            ]
        );
    }
}
