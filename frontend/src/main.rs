use gatewise_frontend::{App, AppConfig};
use leptos::prelude::*;

// Use lol_alloc as the global allocator for smaller WASM size
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();

    let (config, warnings) = AppConfig::from_env();
    wasm_logger::init(wasm_logger::Config::new(config.log_level));
    for warning in warnings {
        log::warn!("config: {warning}, using default");
    }
    log::info!("GateWise starting, api at {}", config.api_base_url);

    mount_to_body(move || view! { <App config=config /> });
}
