//! Language profile table: per-language invocation and assembly rules

mod javascript;
mod python;

pub use javascript::JavaScriptProfile;
pub use python::PythonProfile;

use crate::types::Language;

/// Static description of how a target language is invoked and how its
/// interpreter reports errors.
///
/// Adding a language is a new module implementing this trait plus one
/// `Language` variant, provided the interpreter accepts a source file path
/// as its sole argument and writes program output to stdout.
pub trait LanguageProfile: Send + Sync {
    fn language(&self) -> Language;

    /// Extension for source files, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Interpreter binary name, resolved via PATH at spawn time.
    fn interpreter(&self) -> &'static str;

    /// Whether top-level await must be wrapped in an async function body.
    fn supports_async_wrap(&self) -> bool {
        false
    }

    /// Produce directly-executable source from the candidate (or reference)
    /// code and the challenge's driver code.
    ///
    /// Pure string transformation: no sandboxing, syntax validation, or
    /// sanitization happens here. Safety comes from the process runner.
    fn assemble(&self, code: &str, driver: &str) -> String {
        format!("{}\n{}", code, driver)
    }

    /// Strip interpreter-specific noise (file paths, frame locations) from
    /// stderr. Must never fail; input that matches no known pattern passes
    /// through unmodified.
    fn clean_stderr(&self, stderr: &str) -> String {
        stderr.to_string()
    }
}

static JAVASCRIPT: JavaScriptProfile = JavaScriptProfile;
static PYTHON: PythonProfile = PythonProfile;

/// Look up the profile for a language. Total over the closed enum, so
/// resolution happens once at the boundary and cannot fall through.
pub fn profile_for(language: Language) -> &'static dyn LanguageProfile {
    match language {
        Language::JavaScript => &JAVASCRIPT,
        Language::Python => &PYTHON,
    }
}

#[cfg(test)]
pub(crate) fn skip_if_not_available(tools: &[&str]) -> bool {
    let missing: Vec<_> = tools
        .iter()
        .filter(|tool| which::which(**tool).is_err())
        .map(|s| (*s).to_string())
        .collect();

    if !missing.is_empty() {
        eprintln!("Skipping test: {} not available", missing.join(", "));
        return true;
    }
    false
}
