use regex::Regex;
use std::sync::LazyLock;

use crate::languages::LanguageProfile;
use crate::types::Language;

/// Stack-frame locations like `at fn (/abs/path/file.js:3:15)`. Paths leak
/// temp file locations, so they are collapsed to a placeholder.
static STACK_FRAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"at .*\(.*:\d+:\d+\)").unwrap());

/// The bare `path:line` header node prints above the offending source line.
static LOCATION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^/\S+:\d+\s*$").unwrap());

pub struct JavaScriptProfile;

impl LanguageProfile for JavaScriptProfile {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn file_extension(&self) -> &'static str {
        "js"
    }

    fn interpreter(&self) -> &'static str {
        "node"
    }

    fn supports_async_wrap(&self) -> bool {
        true
    }

    /// `await` outside a function body is invalid in CommonJS sources, so if
    /// either fragment awaits, the whole concatenation runs inside an
    /// immediately-invoked async function whose rejection is printed at top
    /// level. Otherwise candidate and driver concatenate directly.
    fn assemble(&self, code: &str, driver: &str) -> String {
        if code.contains("await") || driver.contains("await") {
            format!(
                "(async () => {{\n{}\n{}\n}})().catch(console.error);",
                code, driver
            )
        } else {
            format!("{}\n{}", code, driver)
        }
    }

    fn clean_stderr(&self, stderr: &str) -> String {
        let cleaned = STACK_FRAME.replace_all(stderr, "at [file]");
        LOCATION_HEADER.replace_all(&cleaned, "[file]").into_owned()
    }
}
