use crate::frontend::dom::{DomRef, DomResult};
use log::debug;

pub mod api;
pub mod components;
pub mod dom;
pub mod utils;

/// Work done once the page has loaded.
pub fn init_page(dom: &DomRef) -> DomResult<()> {
    let tooltips = components::page::init_tooltips(dom, dom.body())?;
    debug!("Activated {tooltips} tooltips");
    Ok(())
}

#[cfg(all(feature = "hydrate", target_family = "wasm"))]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::frontend::dom::web::WebDom;
    use log::warn;
    use std::rc::Rc;

    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
    match WebDom::new() {
        Ok(dom) => {
            let dom: DomRef = Rc::new(dom);
            if let Err(e) = init_page(&dom) {
                warn!("{e}");
            }
        }
        Err(e) => warn!("{e}"),
    }
}
