use grammar::Region;

/// File extensions and lexical conventions of a source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageSpec {
    pub name: &'static str,
    /// Accepted extensions without the dot. Empty accepts every file.
    pub extensions: &'static [&'static str],
    pub line_comments: &'static [&'static str],
    pub block_comment: Option<(&'static str, &'static str)>,
    /// Single-line string and char delimiters.
    pub quotes: &'static [char],
    /// Delimiters of literals that may span lines.
    pub multiline_quotes: &'static [&'static str],
}

pub const JAVA: LanguageSpec = LanguageSpec {
    name: "java",
    extensions: &["java"],
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    multiline_quotes: &[],
};

pub const CSHARP: LanguageSpec = LanguageSpec {
    name: "csharp",
    extensions: &["cs"],
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    multiline_quotes: &[],
};

pub const JAVASCRIPT: LanguageSpec = LanguageSpec {
    name: "javascript",
    extensions: &["js", "jsx", "ts", "tsx"],
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    multiline_quotes: &["`"],
};

pub const PYTHON: LanguageSpec = LanguageSpec {
    name: "python",
    extensions: &["py"],
    line_comments: &["#"],
    block_comment: None,
    quotes: &['"', '\''],
    multiline_quotes: &["\"\"\"", "'''"],
};

pub const PHP: LanguageSpec = LanguageSpec {
    name: "php",
    extensions: &["php"],
    line_comments: &["//", "#"],
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    multiline_quotes: &[],
};

/// No extension filter and no lexical conventions; for plain text checks.
pub const ANY: LanguageSpec = LanguageSpec {
    name: "any",
    extensions: &[],
    line_comments: &[],
    block_comment: None,
    quotes: &[],
    multiline_quotes: &[],
};

impl LanguageSpec {
    pub const ALL: [LanguageSpec; 5] = [JAVA, CSHARP, JAVASCRIPT, PYTHON, PHP];

    /// Looks a language up by name or common alias.
    pub fn by_name(name: &str) -> Option<LanguageSpec> {
        match name.to_lowercase().as_str() {
            "java" => Some(JAVA),
            "csharp" | "c#" | "cs" => Some(CSHARP),
            "javascript" | "js" | "typescript" | "ts" => Some(JAVASCRIPT),
            "python" | "py" => Some(PYTHON),
            "php" => Some(PHP),
            "any" | "text" => Some(ANY),
            _ => None,
        }
    }

    pub fn extension_list(&self) -> Vec<String> {
        self.extensions.iter().map(|e| e.to_string()).collect()
    }

    /// Comment regions, for [`grammar::Grammar::ignore_all`].
    pub fn comments(&self) -> Vec<Region> {
        let mut regions: Vec<Region> = self
            .line_comments
            .iter()
            .map(|m| Region::line_comment(m))
            .collect();
        if let Some((open, close)) = self.block_comment {
            regions.push(Region::block_comment(open, close));
        }
        regions
    }

    /// String and char literal regions. Multi-line delimiters come first so
    /// that `"""` is never read as an empty `""` literal.
    pub fn literals(&self) -> Vec<Region> {
        self.multiline_quotes
            .iter()
            .map(|d| Region::multiline_quoted(d))
            .chain(self.quotes.iter().map(|&q| Region::quoted(q)))
            .collect()
    }
}
