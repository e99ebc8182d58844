pub mod books;

use shelf_kernel::{ModuleRegistry, Settings};

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) {
    registry.register_custom(books::create_module(&settings.database));
}
