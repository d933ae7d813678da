//! Shallow, pattern-based symbol extraction for the JavaScript family.
//!
//! The extractor runs a fixed set of flat regex scans over comment-stripped
//! source. It never builds a syntax tree and never descends into nested
//! scopes, so a declaration inside a function body is only found when the
//! pattern happens to match it in the flat text. Output is identical for
//! identical input.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::trace;

use super::Language;

// ESM `import ... from "x"` / bare `import "x"`
static IMPORT_ESM_RE: LazyLock<Regex> = LazyLock::new(|| {
    ascii_regex(r#"import\s+(?:[\w\s{},*]*\s+from\s+)?['"]([^'"]+)['"]"#)
});

// CommonJS `require("x")`
static IMPORT_CJS_RE: LazyLock<Regex> =
    LazyLock::new(|| ascii_regex(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#));

static FUNC_DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| ascii_regex(r"(?:^|\s)(?:async\s+)?function\s+(\w+)\s*\("));

static FUNC_EXPR_RE: LazyLock<Regex> = LazyLock::new(|| {
    ascii_regex(r"(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s+)?function\s*\(")
});

static ARROW_FUNC_RE: LazyLock<Regex> = LazyLock::new(|| {
    ascii_regex(r"(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s+)?(?:\([^)]*\)|\w+)\s*=>")
});

static CLASS_DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| ascii_regex(r"(?:^|\s)(?:export\s+(?:default\s+)?)?class\s+(\w+)"));

static EXPORT_NAMED_RE: LazyLock<Regex> =
    LazyLock::new(|| ascii_regex(r"export\s+\{([^}]+)\}"));

static EXPORT_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    ascii_regex(r"export\s+(?:const|let|var|function|class|async\s+function)\s+(\w+)")
});

static EXPORT_DEFAULT_RE: LazyLock<Regex> =
    LazyLock::new(|| ascii_regex(r"export\s+default\s+(\w+)"));

static BLOCK_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// Compile `pattern` with `\w` as `[0-9A-Za-z_]` and `\s` as `[\t\n\f\r ]`.
///
/// Identifiers and separators outside ASCII never match.
fn ascii_regex(pattern: &str) -> Regex {
    let pattern = pattern
        .replace(r"\w", "[0-9A-Za-z_]")
        .replace(r"\s", r"[\t\n\f\r ]");
    Regex::new(&pattern).unwrap()
}

/// Shallow structure of one source file.
///
/// Every list is sorted ascending and free of duplicates. A category with
/// no matches is an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStructure {
    /// Import targets (module specifiers)
    pub imports: Vec<String>,
    /// Declared or assigned function names
    pub functions: Vec<String>,
    /// Class names
    pub classes: Vec<String>,
    /// Exported names
    pub exports: Vec<String>,
}

/// Turns source text into a [`FileStructure`].
///
/// Implementations must be total: malformed input yields fewer symbols,
/// never an error or a panic.
pub trait SymbolExtractor: Send + Sync {
    /// Extract the shallow structure of `source`.
    fn extract(&self, source: &str) -> FileStructure;

    /// Whether files with this extension (leading dot included) are handled.
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Pattern-based extractor for `.js`, `.ts` and `.gs` sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Extract the shallow structure of `source`.
    pub fn parse(&self, source: &str) -> FileStructure {
        let cleaned = strip_comments(source);

        let structure = FileStructure {
            imports: sorted_unique(extract_imports(&cleaned)),
            functions: sorted_unique(extract_functions(&cleaned)),
            classes: sorted_unique(extract_classes(&cleaned)),
            exports: sorted_unique(extract_exports(&cleaned)),
        };

        trace!(
            imports = structure.imports.len(),
            functions = structure.functions.len(),
            classes = structure.classes.len(),
            exports = structure.exports.len(),
            "Extracted structure"
        );

        structure
    }
}

impl SymbolExtractor for Parser {
    fn extract(&self, source: &str) -> FileStructure {
        self.parse(source)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        Language::from_extension(ext).is_some()
    }
}

/// Remove `/* */` blocks, then everything after the first `//` on each line.
///
/// String literals are not recognised, so `"http://x"` loses its tail.
fn strip_comments(source: &str) -> String {
    let without_blocks = BLOCK_COMMENT_RE.replace_all(source, "");

    without_blocks
        .split('\n')
        .map(|line| match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collect capture group 1 of every non-overlapping match.
fn captures(re: &Regex, source: &str, out: &mut Vec<String>) {
    out.extend(
        re.captures_iter(source)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
    );
}

fn extract_imports(source: &str) -> Vec<String> {
    let mut imports = Vec::new();
    captures(&IMPORT_ESM_RE, source, &mut imports);
    captures(&IMPORT_CJS_RE, source, &mut imports);
    imports
}

fn extract_functions(source: &str) -> Vec<String> {
    let mut functions = Vec::new();
    captures(&FUNC_DECL_RE, source, &mut functions);
    captures(&FUNC_EXPR_RE, source, &mut functions);
    captures(&ARROW_FUNC_RE, source, &mut functions);
    functions
}

fn extract_classes(source: &str) -> Vec<String> {
    let mut classes = Vec::new();
    captures(&CLASS_DECL_RE, source, &mut classes);
    classes
}

fn extract_exports(source: &str) -> Vec<String> {
    let mut exports = Vec::new();

    // `export { a, b as c }` keeps the local names `a` and `b`
    for caps in EXPORT_NAMED_RE.captures_iter(source) {
        let Some(list) = caps.get(1) else { continue };
        for item in list.as_str().split(',') {
            let mut name = item.trim();
            if let Some(idx) = name.find(" as ") {
                name = name[..idx].trim();
            }
            if !name.is_empty() {
                exports.push(name.to_string());
            }
        }
    }

    captures(&EXPORT_DECL_RE, source, &mut exports);
    captures(&EXPORT_DEFAULT_RE, source, &mut exports);
    exports
}

fn sorted_unique(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items.dedup();
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
import React from 'react';
import { useState } from 'react';
const axios = require('axios');

function greet(name) {
	return "Hello " + name;
}

async function fetchData() {
	return await fetch('/api/data');
}

const add = (a, b) => a + b;

class User {
	constructor(name) {
		this.name = name;
	}
}

export { greet };
export const API_URL = "http://example.com";
export default User;
"#;

    #[test]
    fn test_parse_sample_module() {
        let result = Parser::new().parse(SAMPLE);

        assert_eq!(result.imports, vec!["axios", "react"]);
        assert_eq!(result.functions, vec!["add", "fetchData", "greet"]);
        assert_eq!(result.classes, vec!["User"]);
        assert_eq!(result.exports, vec!["API_URL", "User", "greet"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = Parser::new();
        let first = parser.parse(SAMPLE);
        for _ in 0..100 {
            assert_eq!(parser.parse(SAMPLE), first);
        }
    }

    #[test]
    fn test_parse_sorts_every_category() {
        let code = r#"
function zebra() {}
function alpha() {}
function beta() {}

class Zulu {}
class Alpha {}

export { zebra, alpha };
"#;
        let result = Parser::new().parse(code);

        assert_eq!(result.functions, vec!["alpha", "beta", "zebra"]);
        assert_eq!(result.classes, vec!["Alpha", "Zulu"]);
        assert_eq!(result.exports, vec!["alpha", "zebra"]);
    }

    #[test]
    fn test_parse_deduplicates() {
        let result =
            Parser::new().parse("function foo(){} function foo(){} class Bar{} class Bar{}");

        assert_eq!(result.functions, vec!["foo"]);
        assert_eq!(result.classes, vec!["Bar"]);
    }

    #[test]
    fn test_duplicate_exports_collapse() {
        let code = "export { foo };\nexport { foo };  // again\n";
        let result = Parser::new().parse(code);
        assert_eq!(result.exports, vec!["foo"]);
    }

    #[test]
    fn test_import_forms() {
        let code = r#"
import './polyfill';
import * as path from "path";
import def, { a, b } from '../lib/util';
const fs = require ( "fs" );
"#;
        let result = Parser::new().parse(code);
        assert_eq!(result.imports, vec!["../lib/util", "./polyfill", "fs", "path"]);
    }

    #[test]
    fn test_function_forms() {
        let code = r#"
async function load() {}
const build = function (x) {};
let run = async function() {};
var double = x => x * 2;
const wait = async (ms) => {};
"#;
        let result = Parser::new().parse(code);
        assert_eq!(result.functions, vec!["build", "double", "load", "run", "wait"]);
    }

    #[test]
    fn test_parameter_names_are_not_captured() {
        let result = Parser::new().parse("function outer(inner, other) {}");
        assert_eq!(result.functions, vec!["outer"]);
    }

    #[test]
    fn test_class_forms() {
        let code = "export class Service {}\nexport default class Main {}\nclass Local<T> {}\n";
        let result = Parser::new().parse(code);
        assert_eq!(result.classes, vec!["Local", "Main", "Service"]);
    }

    #[test]
    fn test_named_export_keeps_local_name() {
        let result = Parser::new().parse("export { a, b as c };");
        assert_eq!(result.exports, vec!["a", "b"]);
    }

    #[test]
    fn test_export_declarations() {
        let code = r#"
export const ONE = 1;
export let two = 2;
export var three = 3;
export function four() {}
export async function five() {}
export class Six {}
"#;
        let result = Parser::new().parse(code);
        assert_eq!(
            result.exports,
            vec!["ONE", "Six", "five", "four", "three", "two"]
        );
    }

    #[test]
    fn test_default_export_of_expression_has_no_name() {
        let result = Parser::new().parse("export default { debug: true };");
        assert!(result.exports.is_empty());
    }

    #[test]
    fn test_default_class_export_captures_keyword() {
        // The default-export pattern takes the next word, whatever it is.
        let result = Parser::new().parse("export default class Widget {}");
        assert_eq!(result.exports, vec!["class"]);
        assert_eq!(result.classes, vec!["Widget"]);
    }

    #[test]
    fn test_comments_are_ignored() {
        let code = r#"
/*
function hidden() {}
class Hidden {}
*/
// function alsoHidden() {}
function visible() {} // class Trailing {}
"#;
        let result = Parser::new().parse(code);
        assert_eq!(result.functions, vec!["visible"]);
        assert!(result.classes.is_empty());
    }

    #[test]
    fn test_line_comment_inside_string_truncates_line() {
        let code = "const url = \"http://example.com\"; function lost() {}\nfunction kept() {}";
        let result = Parser::new().parse(code);
        assert_eq!(result.functions, vec!["kept"]);
    }

    #[test]
    fn test_typescript_source() {
        let code = r#"
interface User {
	name: string;
	age: number;
}

function processUser(user: User): void {
	console.log(user.name);
}

class Service<T> {
	data: T;
}

export { processUser };
"#;
        let result = Parser::new().parse(code);
        assert_eq!(result.functions, vec!["processUser"]);
        assert_eq!(result.classes, vec!["Service"]);
        assert_eq!(result.exports, vec!["processUser"]);
    }

    #[test]
    fn test_empty_and_garbage_input() {
        let parser = Parser::new();
        assert_eq!(parser.parse(""), FileStructure::default());

        let garbage = parser.parse("}{)(=>\u{0}\u{fffd} /* unterminated");
        assert!(garbage.functions.is_empty());
        assert!(garbage.classes.is_empty());
    }

    #[test]
    fn test_supports_extension() {
        let parser = Parser::new();
        let cases = [
            (".js", true),
            (".ts", true),
            (".gs", true),
            (".py", false),
            (".go", false),
            (".txt", false),
            ("", false),
        ];
        for (ext, expected) in cases {
            assert_eq!(parser.supports_extension(ext), expected, "extension {ext:?}");
        }
    }

    #[test]
    fn test_word_and_space_classes_are_ascii() {
        let parser = Parser::new();

        let structure = parser.parse("function caf\u{e9}() {}\nconst x\u{a0}= () => 1;\n");
        assert!(structure.functions.is_empty());

        let structure = parser.parse("class \u{c9}l\u{e8}ve {}\nexport\u{a0}const y = 1;\n");
        assert!(structure.classes.is_empty());
        assert!(structure.exports.is_empty());

        // Non-ASCII inside a quoted specifier is still captured
        let structure = parser.parse("import {\u{a0}a } from './x';\nimport b from './caf\u{e9}';\n");
        assert_eq!(structure.imports, vec!["./caf\u{e9}"]);
    }

    #[test]
    fn test_ascii_whitespace_separators() {
        let structure = Parser::new().parse("async\tfunction\tload_2() {}\r\nconst\x0cf = x => x;\n");
        assert_eq!(structure.functions, vec!["f", "load_2"]);
    }
}
