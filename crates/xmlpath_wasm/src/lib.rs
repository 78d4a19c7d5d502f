use wasm_bindgen::prelude::*;
use xmlpath_core::compile;

/// Compile a path expression and return its steps as JSON
#[wasm_bindgen]
pub fn compile_path(path: &str) -> Result<String, String> {
    let compiled = compile(path).map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&compiled).map_err(|e| format!("Serialization error: {}", e))
}

/// Render a path expression in its fully expanded form
#[wasm_bindgen]
pub fn canonicalize(path: &str) -> Result<String, String> {
    compile(path)
        .map(|compiled| compiled.to_string())
        .map_err(|e| e.pointer())
}
