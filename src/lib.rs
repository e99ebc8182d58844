//! SHELF application library
//!
//! Wires the project modules into the kernel registry and runs the HTTP
//! server. The `books` module carries the only route, `GET /books`.

pub mod modules;

use std::sync::Arc;

use shelf_kernel::{InitCtx, ModuleRegistry, Settings};

/// Build a registry holding the core `db` module and every project module.
pub fn build_registry(settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register_core(Arc::new(shelf_db::DbModule));
    modules::register_all(&mut registry, settings);
    registry
}

/// Boot every module, serve HTTP until Ctrl-C, then stop the modules.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.path.display(),
        "shelf bootstrap starting"
    );

    let registry = build_registry(&settings);
    let ctx = InitCtx {
        settings: &settings,
    };
    registry.boot(&ctx).await?;

    tracing::info!(
        core = registry.core_module_count(),
        custom = registry.custom_module_count(),
        "shelf bootstrap complete"
    );

    let served =
        shelf_http::start_server(&registry, &settings, shelf_http::shutdown_signal()).await;
    let stopped = registry.shutdown().await;

    served.and(stopped)
}
