//! Structured template errors
//!
//! Rendering failures are parsed out of Tera's error chain into a
//! [`TemplateError`] that knows which template failed, on which line, and (for
//! undefined variables) which context keys were probably meant.

use std::fmt;

/// Template rendering errors with location details
#[derive(Debug)]
pub enum TemplateError {
    VariableNotFound {
        variable: String,
        available_variables: Box<Vec<String>>,
        suggestions: Box<Vec<String>>,
        location: Box<ErrorLocation>,
    },

    SyntaxError {
        message: String,
        location: Box<ErrorLocation>,
    },

    /// Template bytes are not valid UTF-8.
    InvalidEncoding {
        template: String,
    },
}

/// Location information for template errors
#[derive(Debug, Clone)]
pub struct ErrorLocation {
    /// Template file name
    pub template: String,
    /// Line number if available from Tera
    pub line_number: Option<usize>,
    /// Surrounding lines, 1-indexed
    pub context_lines: Option<Vec<(usize, String)>>,
}

impl TemplateError {
    /// Name of the template that failed.
    pub fn template(&self) -> &str {
        match self {
            TemplateError::VariableNotFound {
                location,
                ..
            }
            | TemplateError::SyntaxError {
                location,
                ..
            } => &location.template,
            TemplateError::InvalidEncoding {
                template,
            } => template,
        }
    }

    /// Generate a multi-line message with location and suggestions
    pub fn format_with_context(&self) -> String {
        match self {
            TemplateError::VariableNotFound {
                variable,
                available_variables,
                suggestions,
                location,
            } => format_variable_not_found_error(
                variable,
                available_variables,
                suggestions,
                location,
            ),
            TemplateError::SyntaxError {
                message,
                location,
            } => format_syntax_error(message, location),
            TemplateError::InvalidEncoding {
                template,
            } => format!("ERROR: Template Is Not UTF-8\n\nTemplate: {template}\n"),
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::VariableNotFound {
                variable,
                ..
            } => write!(f, "Template variable not found: '{variable}'"),
            TemplateError::SyntaxError {
                message,
                ..
            } => write!(f, "Template syntax error: {message}"),
            TemplateError::InvalidEncoding {
                template,
            } => write!(f, "Template {template} is not valid UTF-8"),
        }
    }
}

impl std::error::Error for TemplateError {}

fn format_variable_not_found_error(
    variable: &str,
    available_variables: &[String],
    suggestions: &[String],
    location: &ErrorLocation,
) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Variable Not Found\n\n");
    msg.push_str(&format!("Variable: {variable}\n"));
    msg.push_str(&format!("Template: {}\n", location.template));
    if let Some(line) = location.line_number {
        msg.push_str(&format!("Line: {line}\n"));
    }
    msg.push('\n');

    push_context_lines(&mut msg, location);

    if !suggestions.is_empty() {
        msg.push_str("Did you mean one of these?\n");
        for suggestion in suggestions {
            msg.push_str(&format!("  - {suggestion}\n"));
        }
        msg.push('\n');
    }

    if !available_variables.is_empty() {
        msg.push_str("Available variables in this context:\n");
        for var in available_variables.iter().take(10) {
            msg.push_str(&format!("  {var}\n"));
        }
        if available_variables.len() > 10 {
            msg.push_str(&format!("  ... and {} more\n", available_variables.len() - 10));
        }
        msg.push('\n');
    }

    msg
}

fn format_syntax_error(message: &str, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Syntax Error\n\n");
    msg.push_str(&format!("Error: {message}\n"));
    msg.push_str(&format!("Template: {}\n", location.template));
    if let Some(line) = location.line_number {
        msg.push_str(&format!("Line: {line}\n"));
    }
    msg.push('\n');

    push_context_lines(&mut msg, location);

    msg.push_str("Common issues:\n");
    msg.push_str("  - Unclosed {{ }} or {% %} delimiters\n");
    msg.push_str("  - Unknown function names or missing named arguments\n");
    msg.push_str("  - Missing quotes around string values\n\n");

    msg
}

fn push_context_lines(msg: &mut String, location: &ErrorLocation) {
    if let Some(lines) = &location.context_lines {
        for (number, line) in lines {
            let marker = if Some(*number) == location.line_number {
                ">"
            } else {
                " "
            };
            msg.push_str(&format!("{marker} {number:>4} | {line}\n"));
        }
        msg.push('\n');
    }
}
