// Copyright 2025 Symbiosis Team.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `{{ Secret "name" }}` expansion for project descriptors

use crate::infrastructure::platform::SecretCollection;
use crate::shared::error::{Result, SymError};
use regex::Regex;

const ACTION_PATTERN: &str = r"(?s)\{\{(.*?)\}\}";
const ACTION_OPEN: &str = "{{";
const SECRET_CALL_PATTERN: &str = r#"^\s*Secret\s+"([^"]*)"\s*$"#;

/// Expands every template action in `raw`.
///
/// The only supported action is `Secret "<name>"`, optionally padded with
/// whitespace (newlines included); its value is inserted verbatim. Trim
/// markers (`{{-`, `-}}`) and every other action are rejected, as are a
/// secret missing from `secrets` and a `{{` that is never closed.
pub fn render_secrets(raw: &str, secrets: &SecretCollection, project: &str) -> Result<String> {
    let action = Regex::new(ACTION_PATTERN).map_err(|e| SymError::TemplateError(e.to_string()))?;
    let secret_call =
        Regex::new(SECRET_CALL_PATTERN).map_err(|e| SymError::TemplateError(e.to_string()))?;

    let mut rendered = String::with_capacity(raw.len());
    let mut last = 0;

    for caps in action.captures_iter(raw) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let name = secret_call
            .captures(inner.as_str())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| {
                SymError::TemplateError(format!(
                    "unsupported template action {{{{{}}}}}",
                    inner.as_str()
                ))
            })?;

        let secret = secrets.get(name).ok_or_else(|| {
            SymError::TemplateError(format!(
                "Secret {} could not be found in project {}",
                name, project
            ))
        })?;

        rendered.push_str(literal(&raw[last..whole.start()])?);
        rendered.push_str(&secret.value);
        last = whole.end();
    }

    rendered.push_str(literal(&raw[last..])?);
    Ok(rendered)
}

/// Text between actions. A leftover `{{` has no matching `}}`.
fn literal(text: &str) -> Result<&str> {
    match text.find(ACTION_OPEN) {
        Some(pos) => Err(SymError::TemplateError(format!(
            "unclosed action near {:?}",
            text[pos..].lines().next().unwrap_or_default()
        ))),
        None => Ok(text),
    }
}
