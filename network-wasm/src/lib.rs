mod api;
mod app;
mod components;
mod pages;
mod router;
mod storage;

pub use api::FetchApi;
pub use storage::LocalIdentityStore;

use app::App;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Устанавливаем обработчик паники
    console_error_panic_hook::set_once();

    // Логи клиентской библиотеки идут через `log` в консоль браузера
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    if let Err(e) = console_log::init_with_level(level) {
        web_sys::console::log_1(&format!("Failed to init logger: {}", e).into());
    }

    log::info!("Starting network client against {}", FetchApi::default().base_url());
    // Запускаем Yew приложение
    yew::Renderer::<App>::new().render();

    Ok(())
}
