//! Template rendering engine with Tera.
//!
//! This module provides the [`TemplateRenderer`] that wraps Tera with the
//! bootkube helper functions and turns Tera's error chain into structured
//! [`TemplateError`]s.

use regex::Regex;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use super::error::{ErrorLocation, TemplateError};
use super::functions;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
/// This represents a 50% similarity threshold for variable name suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Lines shown on each side of a failing line.
const CONTEXT_LINES: usize = 3;

/// Template renderer with Tera engine and custom functions.
///
/// Every call builds a fresh `Tera` instance, so no state is shared between
/// renders. Autoescaping is disabled: output is YAML, not HTML.
///
/// # Functions
///
/// - `indent(width=, text=)`: see [`functions::indent`]
/// - `add(a=, b=)`: integer addition
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self
    }

    /// Render raw template bytes named `name` against `context`.
    pub fn render_bytes(
        &self,
        name: &str,
        template: &[u8],
        context: &TeraContext,
    ) -> Result<Vec<u8>, TemplateError> {
        let content = std::str::from_utf8(template).map_err(|_| TemplateError::InvalidEncoding {
            template: name.to_string(),
        })?;
        self.render_template(name, content, context).map(String::into_bytes)
    }

    /// Render a template string named `name` against `context`.
    pub fn render_template(
        &self,
        name: &str,
        template_content: &str,
        context: &TeraContext,
    ) -> Result<String, TemplateError> {
        tracing::trace!("Rendering template {} with context", name);
        Self::log_context_as_kv(context);

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.register_function("indent", functions::indent_function);
        tera.register_function("add", functions::add_function);

        let rendered = tera
            .render_str(template_content, context)
            .map_err(|e| Self::parse_tera_error(name, &e, template_content, context))?;

        tracing::debug!("Rendered template {} ({} bytes)", name, rendered.len());
        Ok(rendered)
    }

    /// Parse a Tera error into a structured TemplateError
    fn parse_tera_error(
        name: &str,
        error: &tera::Error,
        template_content: &str,
        context: &TeraContext,
    ) -> TemplateError {
        let line_number = Self::extract_line_from_tera_error(error);

        let context_lines = line_number
            .map(|line| Self::extract_context_lines(template_content, line, CONTEXT_LINES))
            .filter(|lines| !lines.is_empty());

        let location = Box::new(ErrorLocation {
            template: name.to_string(),
            line_number,
            context_lines,
        });

        // Undefined variables surface as a plain message somewhere in the chain.
        let chain = Self::error_chain(error);
        if let Some(variable) = chain.iter().find_map(|msg| Self::extract_variable_name(msg)) {
            let available_variables = Self::extract_available_variables(context);
            let suggestions = Self::find_similar_variables(&variable, &available_variables);
            return TemplateError::VariableNotFound {
                variable,
                available_variables: Box::new(available_variables),
                suggestions: Box::new(suggestions),
                location,
            };
        }

        TemplateError::SyntaxError {
            message: Self::format_tera_error(error),
            location,
        }
    }

    fn error_chain(error: &tera::Error) -> Vec<String> {
        use std::error::Error;

        let mut messages = vec![error.to_string()];
        let mut current: Option<&dyn Error> = error.source();
        while let Some(err) = current {
            messages.push(err.to_string());
            current = err.source();
        }
        messages
    }

    /// Extract variable name from "Variable `foo` not found" message
    fn extract_variable_name(error_msg: &str) -> Option<String> {
        let re = Regex::new(r"Variable `([^`]+)` not found").ok()?;
        re.captures(error_msg).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
    }

    /// Top-level keys of the render context, sorted.
    fn extract_available_variables(context: &TeraContext) -> Vec<String> {
        match context.clone().into_json() {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Find similar variable names using Levenshtein distance
    fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> =
            available.iter().map(|var| (var.clone(), levenshtein(target, var))).collect();

        scored.sort_by_key(|(_, dist)| *dist);

        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(var, _)| var)
            .collect()
    }

    /// Extract up to `context_size` lines before and after the error line,
    /// with their 1-indexed line numbers.
    fn extract_context_lines(
        content: &str,
        error_line: usize,
        context_size: usize,
    ) -> Vec<(usize, String)> {
        let lines: Vec<&str> = content.lines().collect();
        let total_lines = lines.len();

        if error_line == 0 || error_line > total_lines {
            return Vec::new();
        }

        let start = error_line.saturating_sub(context_size + 1);
        let end = (error_line + context_size).min(total_lines);

        lines[start..end]
            .iter()
            .enumerate()
            .map(|(idx, line)| (start + idx + 1, (*line).to_string()))
            .collect()
    }

    /// Tera parse errors carry a `line:column` position, e.g. `--> 3:7`.
    fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
        let error_msg = Self::error_chain(error).join("\n");
        let re = Regex::new(r"--> (\d+):(\d+)").ok()?;
        re.captures(&error_msg)
            .and_then(|caps| caps.get(1))
            .and_then(|line| line.as_str().parse::<usize>().ok())
    }

    /// Format a Tera error chain, filtering out the internal one-off
    /// template name Tera uses for `render_str`.
    pub fn format_tera_error(error: &tera::Error) -> String {
        let mut messages = Vec::new();

        for msg in Self::error_chain(error) {
            let cleaned = msg
                .replace("while rendering '__tera_one_off'", "")
                .replace("Failed to render '__tera_one_off'", "Template rendering failed")
                .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                .replace("'__tera_one_off'", "template")
                .trim()
                .to_string();

            if !cleaned.is_empty()
                && cleaned != "Template rendering failed"
                && cleaned != "Template syntax error"
            {
                messages.push(cleaned);
            }
        }

        if messages.is_empty() {
            "Template syntax error (see details above)".to_string()
        } else {
            messages.join("\n  → ")
        }
    }

    /// Log the context keys at trace level. Values are certificate and
    /// secret material, so only their sizes are printed.
    fn log_context_as_kv(context: &TeraContext) {
        if !tracing::enabled!(tracing::Level::TRACE) {
            return;
        }
        if let serde_json::Value::Object(map) = context.clone().into_json() {
            for (key, value) in map {
                match value {
                    serde_json::Value::String(s) => tracing::trace!("  {}: <{} chars>", key, s.len()),
                    other => tracing::trace!("  {}: {}", key, other),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> TeraContext {
        let mut ctx = TeraContext::new();
        ctx.insert("cvo_cluster_id", "0b6f2bb3-4c9a-4d0e-9d9e-0c1b1b9f0c11");
        ctx.insert("root_ca_cert", "-----BEGIN-----\nAAA\n-----END-----");
        ctx.insert("aro_ingress_internal", &true);
        ctx
    }

    #[test]
    fn test_render_substitutes_fields() {
        let out = TemplateRenderer::new()
            .render_template("t", "clusterID: {{ cvo_cluster_id }}\n", &context())
            .unwrap();
        assert_eq!(out, "clusterID: 0b6f2bb3-4c9a-4d0e-9d9e-0c1b1b9f0c11\n");
    }

    #[test]
    fn test_render_uses_helpers() {
        let template = "ca: |\n  {{ indent(width=2, text=root_ca_cert) }}\nport: {{ add(a=2379, b=7600) }}";
        let out = TemplateRenderer::new().render_template("t", template, &context()).unwrap();
        assert_eq!(out, "ca: |\n  -----BEGIN-----\n  AAA\n  -----END-----\nport: 9979");
    }

    #[test]
    fn test_render_does_not_escape() {
        let mut ctx = TeraContext::new();
        ctx.insert("v", "a&b<c>\"d\"");
        let out = TemplateRenderer::new().render_template("t", "{{ v }}", &ctx).unwrap();
        assert_eq!(out, "a&b<c>\"d\"");
    }

    #[test]
    fn test_conditionals_on_flags() {
        let template = "{% if aro_ingress_internal %}internal{% else %}external{% endif %}";
        let out = TemplateRenderer::new().render_template("t", template, &context()).unwrap();
        assert_eq!(out, "internal");
    }

    #[test]
    fn test_undefined_variable_suggests_close_names() {
        let err = TemplateRenderer::new()
            .render_template("cvo-overrides.yaml.template", "{{ cvo_clusterid }}", &context())
            .unwrap_err();
        match err {
            TemplateError::VariableNotFound {
                variable,
                suggestions,
                location,
                ..
            } => {
                assert_eq!(variable, "cvo_clusterid");
                assert_eq!(suggestions.first().map(String::as_str), Some("cvo_cluster_id"));
                assert_eq!(location.template, "cvo-overrides.yaml.template");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = TemplateRenderer::new()
            .render_template("broken.yaml.template", "a\n{{ unclosed\n", &context())
            .unwrap_err();
        assert!(matches!(err, TemplateError::SyntaxError { .. }));
        assert_eq!(err.template(), "broken.yaml.template");
    }

    #[test]
    fn test_invalid_utf8() {
        let err = TemplateRenderer::new()
            .render_bytes("bin.template", &[0xff, 0xfe], &context())
            .unwrap_err();
        assert!(matches!(err, TemplateError::InvalidEncoding { .. }));
    }

    #[test]
    fn test_extract_context_lines_window() {
        let content = "1\n2\n3\n4\n5\n6\n7\n8";
        let lines = TemplateRenderer::extract_context_lines(content, 5, 2);
        let numbers: Vec<usize> = lines.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![3, 4, 5, 6, 7]);
        assert!(TemplateRenderer::extract_context_lines(content, 0, 2).is_empty());
        assert!(TemplateRenderer::extract_context_lines(content, 99, 2).is_empty());
    }
}
