// Textual fallback extraction - fenced code blocks and filename mentions

use crate::models::RawDescriptor;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

static FENCE_PATTERN: OnceLock<Regex> = OnceLock::new();
static FILENAME_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Info-string keys that carry an explicit filename
const FILENAME_KEYS: [&str; 3] = ["file", "filename", "path"];

/// Fence language tags and the file extension they imply
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("javascript", "js"),
    ("js", "js"),
    ("typescript", "ts"),
    ("ts", "ts"),
    ("jsx", "jsx"),
    ("tsx", "tsx"),
    ("html", "html"),
    ("css", "css"),
    ("python", "py"),
    ("ruby", "rb"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("csharp", "cs"),
    ("go", "go"),
    ("rust", "rs"),
    ("php", "php"),
    ("swift", "swift"),
    ("kotlin", "kt"),
    ("markdown", "md"),
    ("json", "json"),
];

fn fence_pattern() -> &'static Regex {
    FENCE_PATTERN.get_or_init(|| Regex::new(r"```([^\n`]*)\n([\s\S]*?)```").unwrap())
}

fn filename_pattern() -> &'static Regex {
    FILENAME_PATTERN.get_or_init(|| {
        Regex::new(r"\b[\w-]+/[\w-]+\.\w{1,5}\b|\b[\w-]+\.\w{1,5}\b").unwrap()
    })
}

/// Maps a fence language tag to a file extension, `txt` when unknown
pub fn extension_for_language(language: Option<&str>) -> &'static str {
    let Some(language) = language else {
        return "txt";
    };
    let language = language.to_lowercase();
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(tag, _)| *tag == language)
        .map(|(_, ext)| *ext)
        .unwrap_or("txt")
}

/// Recovers file descriptors from free text.
///
/// Fenced code blocks win; filename mentions are only considered when the
/// text has no fences at all. An empty result means nothing was found.
pub fn extract_from_text(raw: &str) -> Vec<RawDescriptor> {
    let blocks = extract_code_blocks(raw);
    if !blocks.is_empty() {
        log::debug!("[textual] Recovered {} fenced code blocks", blocks.len());
        return blocks;
    }

    let mentioned = extract_filename_mentions(raw);
    log::debug!("[textual] Recovered {} filename mentions", mentioned.len());
    mentioned
}

/// One file per fenced code block, named by its annotation or by position
pub fn extract_code_blocks(raw: &str) -> Vec<RawDescriptor> {
    let mut files: Vec<RawDescriptor> = Vec::new();

    for caps in fence_pattern().captures_iter(raw) {
        let info = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let body = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let (language, filename) = parse_info_string(info);

        let path = filename.unwrap_or_else(|| {
            format!(
                "file-{}.{}",
                files.len() + 1,
                extension_for_language(language.as_deref())
            )
        });

        files.push(RawDescriptor::new(path, "file", body.trim()));
    }

    files
}

/// Splits a fence info string into a language tag and an optional filename.
///
/// Understands `js file=app.js`, `filename="app.js"` and `js:app.js`.
fn parse_info_string(info: &str) -> (Option<String>, Option<String>) {
    let mut language = None;
    let mut filename = None;

    for token in info.split_whitespace() {
        if let Some((key, value)) = token.split_once('=') {
            if FILENAME_KEYS.contains(&key.to_lowercase().as_str()) {
                let value = value.trim_matches(|c| c == '"' || c == '\'');
                if !value.is_empty() {
                    filename = Some(value.to_string());
                }
            }
        } else if let Some((lang, path)) = token.split_once(':') {
            if language.is_none() && !lang.is_empty() {
                language = Some(lang.to_string());
            }
            if filename.is_none() && !path.is_empty() {
                filename = Some(path.to_string());
            }
        } else if language.is_none() {
            language = Some(token.to_string());
        }
    }

    (language, filename)
}

/// One file per distinct filename-shaped token, in first-seen order.
///
/// Tokens whose extension is all digits are skipped even though the token
/// pattern accepts them, so `lodash 4.17` yields no file. Content is the body of the first brace block after the token's first
/// mention, or a placeholder comment.
pub fn extract_filename_mentions(raw: &str) -> Vec<RawDescriptor> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for token in filename_pattern().find_iter(raw).map(|m| m.as_str()) {
        if has_numeric_extension(token) || !seen.insert(token) {
            continue;
        }

        let content = content_after_mention(raw, token)
            .unwrap_or_else(|| format!("// Content for {}", token));
        files.push(RawDescriptor::new(token, "file", content));
    }

    files
}

/// True when everything after the last `.` is ASCII digits
fn has_numeric_extension(token: &str) -> bool {
    token
        .rsplit_once('.')
        .map(|(_, ext)| ext.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

fn content_after_mention(raw: &str, token: &str) -> Option<String> {
    let pattern = format!(r"(?i){}[\s\S]*?\{{([\s\S]*?)\}}", regex::escape(token));
    let re = Regex::new(&pattern).ok()?;
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_with_language_gets_positional_name() {
        let files = extract_from_text("```js\nconsole.log(1);\n```");
        assert_eq!(files, vec![RawDescriptor::new("file-1.js", "file", "console.log(1);")]);
    }

    #[test]
    fn test_fenced_blocks_numbered_by_position() {
        let raw = "```html\n<p>a</p>\n```\nthen\n```python\nprint(1)\n```\n```\nplain\n```";
        let files = extract_code_blocks(raw);
        let paths: Vec<_> = files.iter().map(|f| f.path.clone().unwrap()).collect();
        assert_eq!(paths, vec!["file-1.html", "file-2.py", "file-3.txt"]);
    }

    #[test]
    fn test_fenced_block_filename_annotations() {
        let raw = "```css file=\"styles/site.css\"\nbody {}\n```\n```filename=app.ts\nlet a = 1;\n```\n```js:src/main.js\nrun();\n```";
        let files = extract_code_blocks(raw);
        let paths: Vec<_> = files.iter().map(|f| f.path.clone().unwrap()).collect();
        assert_eq!(paths, vec!["styles/site.css", "app.ts", "src/main.js"]);
        assert_eq!(files[0].content.as_deref(), Some("body {}"));
    }

    #[test]
    fn test_unknown_language_maps_to_txt() {
        assert_eq!(extension_for_language(Some("brainfuck")), "txt");
        assert_eq!(extension_for_language(Some("TypeScript")), "ts");
        assert_eq!(extension_for_language(None), "txt");
    }

    #[test]
    fn test_filename_mentions_with_brace_content() {
        let raw = "Create index.html with { <h1>Hello</h1> } and a helper utils/format.js.";
        let files = extract_filename_mentions(raw);

        assert_eq!(files.len(), 2);
        assert_eq!(files[0], RawDescriptor::new("index.html", "file", "<h1>Hello</h1>"));
        assert_eq!(files[1].path.as_deref(), Some("utils/format.js"));
        assert_eq!(
            files[1].content.as_deref(),
            Some("// Content for utils/format.js")
        );
    }

    #[test]
    fn test_filename_mentions_deduplicate_in_order() {
        let raw = "Edit main.js, then style.css, then main.js again.";
        let files = extract_filename_mentions(raw);
        let paths: Vec<_> = files.iter().map(|f| f.path.clone().unwrap()).collect();
        assert_eq!(paths, vec!["main.js", "style.css"]);
    }

    #[test]
    fn test_all_digit_extensions_are_skipped() {
        assert!(extract_filename_mentions("Upgrade to version 1.5 or 2.10 soon").is_empty());
        assert!(extract_filename_mentions("Use lodash 4.17").is_empty());

        let files = extract_filename_mentions("Use lodash 4.17 in util.js");
        let paths: Vec<_> = files.iter().map(|f| f.path.clone().unwrap()).collect();
        assert_eq!(paths, vec!["util.js"]);
    }

    #[test]
    fn test_nothing_found() {
        assert!(extract_from_text("I cannot help with that request").is_empty());
    }
}
