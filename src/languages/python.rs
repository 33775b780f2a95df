use regex::Regex;
use std::sync::LazyLock;

use crate::languages::LanguageProfile;
use crate::types::Language;

/// Traceback locations like `File "/abs/path/source.py", line 3`.
static TRACEBACK_FRAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"File .*line \d+"#).unwrap());

pub struct PythonProfile;

impl LanguageProfile for PythonProfile {
    fn language(&self) -> Language {
        Language::Python
    }

    fn file_extension(&self) -> &'static str {
        "py"
    }

    fn interpreter(&self) -> &'static str {
        "python3"
    }

    fn clean_stderr(&self, stderr: &str) -> String {
        TRACEBACK_FRAME.replace_all(stderr, "Error").into_owned()
    }
}
