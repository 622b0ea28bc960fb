//! WebAssembly bindings for Rerouter
//!
//! The extension background script calls `init` once, registers one
//! `onBeforeRequest` listener per entry of `listener_filters()`, and
//! forwards each intercepted request to `evaluate`.

use std::sync::OnceLock;
use wasm_bindgen::prelude::*;
use rr_compiler::{builtin_registry, compile_rule_list};
use rr_core::{Dispatcher, Registry, Request, RequestType};

static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();

fn install(registry: Registry) -> Result<(), JsValue> {
    if DISPATCHER.get().is_some() {
        return Err(JsValue::from_str("Already initialized. Reload the extension to reinitialize."));
    }

    let rule_count = registry.len();
    DISPATCHER
        .set(Dispatcher::new(registry))
        .map_err(|_| JsValue::from_str("Failed to set dispatcher state"))?;

    web_sys::console::info_1(&JsValue::from_str(&format!("rerouter: {} rules loaded", rule_count)));
    Ok(())
}

/// Initialize with the built-in rule set.
#[wasm_bindgen]
pub fn init() -> Result<(), JsValue> {
    let registry = builtin_registry()
        .map_err(|e| JsValue::from_str(&format!("Failed to build rules: {}", e)))?;
    install(registry)
}

/// Initialize with a JSON rule list.
#[wasm_bindgen]
pub fn init_with_rules(rules_json: &str) -> Result<(), JsValue> {
    let registry = compile_rule_list(rules_json)
        .map_err(|e| JsValue::from_str(&format!("Failed to build rules: {}", e)))?;
    install(registry)
}

#[wasm_bindgen]
pub fn is_initialized() -> bool {
    DISPATCHER.get().is_some()
}

#[wasm_bindgen]
pub fn rule_count() -> u32 {
    DISPATCHER.get().map_or(0, |d| d.registry().len() as u32)
}

/// Listener filters for host registration: `[{name, urls, types}]`.
#[wasm_bindgen]
pub fn listener_filters() -> JsValue {
    let filters = js_sys::Array::new();
    let dispatcher = match DISPATCHER.get() {
        Some(dispatcher) => dispatcher,
        None => return filters.into(),
    };

    for rule in dispatcher.registry().rules() {
        let urls = js_sys::Array::new();
        for pattern in rule.patterns() {
            urls.push(&JsValue::from_str(pattern.as_str()));
        }

        let types = js_sys::Array::new();
        for name in rule.types().names() {
            types.push(&JsValue::from_str(name));
        }

        let filter = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&filter, &"name".into(), &JsValue::from_str(rule.name()));
        let _ = js_sys::Reflect::set(&filter, &"urls".into(), &urls);
        let _ = js_sys::Reflect::set(&filter, &"types".into(), &types);
        filters.push(&filter);
    }

    filters.into()
}

/// Evaluate a request. Returns the redirect URL, or `undefined` to let the
/// request proceed.
#[wasm_bindgen]
pub fn evaluate(url: &str, request_type: &str) -> Option<String> {
    let dispatcher = DISPATCHER.get()?;
    dispatcher
        .evaluate(&Request::new(url, RequestType::from_host(request_type)))
        .into_redirect_url()
}

/// Evaluate a request and report the deciding rule: `{ruleId, ruleName?, redirectUrl?}`.
#[wasm_bindgen]
pub fn evaluate_detailed(url: &str, request_type: &str) -> JsValue {
    let js_result = js_sys::Object::new();

    let dispatcher = match DISPATCHER.get() {
        Some(dispatcher) => dispatcher,
        None => {
            let _ = js_sys::Reflect::set(&js_result, &"ruleId".into(), &JsValue::from(-1));
            return js_result.into();
        }
    };

    let result = dispatcher.evaluate_detailed(&Request::new(url, RequestType::from_host(request_type)));
    let _ = js_sys::Reflect::set(&js_result, &"ruleId".into(), &JsValue::from(result.rule_id));

    if let Some(rule) = dispatcher.registry().get(result.rule_id) {
        let _ = js_sys::Reflect::set(&js_result, &"ruleName".into(), &JsValue::from_str(rule.name()));
    }

    if let Some(redirect_url) = result.decision.into_redirect_url() {
        let _ = js_sys::Reflect::set(&js_result, &"redirectUrl".into(), &JsValue::from_str(&redirect_url));
    }

    js_result.into()
}
