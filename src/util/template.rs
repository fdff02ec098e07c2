use std::fs;
use std::path::Path;

use crate::error::{Result, SvcGraphError};

pub fn render_template(template: &str, context: &serde_json::Value) -> Result<String> {
    let context = tera::Context::from_serialize(context)?;
    Ok(tera::Tera::one_off(template, &context, true)?)
}

pub fn render_template_file(path: &Path, context: &serde_json::Value) -> Result<String> {
    let template = fs::read_to_string(path).map_err(|source| SvcGraphError::Access {
        path: path.to_path_buf(),
        source,
    })?;
    render_template(&template, context)
}
