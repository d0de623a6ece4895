//! Static syntax-table lookup by filename extension. The view only ever
//! consumes the resulting [`LanguageDefinition`]; it never sees how the
//! lookup itself is done.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageDefinition {
    pub name: &'static str,
    pub line_comment: Option<&'static str>,
    pub block_comment: Option<(&'static str, &'static str)>,
    pub indent_width: u8,
    pub indent_with_tabs: bool,
}

const RUST: LanguageDefinition = LanguageDefinition {
    name: "rust",
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    indent_width: 4,
    indent_with_tabs: false,
};

const PYTHON: LanguageDefinition = LanguageDefinition {
    name: "python",
    line_comment: Some("#"),
    block_comment: None,
    indent_width: 4,
    indent_with_tabs: false,
};

const C: LanguageDefinition = LanguageDefinition {
    name: "c",
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    indent_width: 4,
    indent_with_tabs: false,
};

const SHELL: LanguageDefinition = LanguageDefinition {
    name: "shell",
    line_comment: Some("#"),
    block_comment: None,
    indent_width: 2,
    indent_with_tabs: false,
};

const PLAIN_TEXT: LanguageDefinition = LanguageDefinition {
    name: "text",
    line_comment: None,
    block_comment: None,
    indent_width: 4,
    indent_with_tabs: false,
};

/// Look up a [`LanguageDefinition`] by the file extension (without the
/// leading dot, case-insensitive). Returns `None` for unrecognized or absent
/// extensions; callers that want a fallback should use [`PLAIN_TEXT`]
/// explicitly via [`plain_text`].
pub fn by_extension(ext: &str) -> Option<&'static LanguageDefinition> {
    let ext = ext.to_ascii_lowercase();
    match ext.as_str() {
        "rs" => Some(&RUST),
        "py" | "pyw" => Some(&PYTHON),
        "c" | "h" => Some(&C),
        "sh" | "bash" | "zsh" => Some(&SHELL),
        "txt" => Some(&PLAIN_TEXT),
        _ => None,
    }
}

/// The fallback used when no extension matches, or a buffer has no name.
pub fn plain_text() -> &'static LanguageDefinition {
    &PLAIN_TEXT
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rust_extension_resolves() {
        let lang = by_extension("rs").unwrap();
        assert_eq!(lang.name, "rust");
        assert_eq!(lang.line_comment, Some("//"));
    }

    #[test]
    fn unknown_extension_is_none() {
        assert!(by_extension("xyz123").is_none());
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert_eq!(by_extension("RS").unwrap().name, "rust");
    }
}
