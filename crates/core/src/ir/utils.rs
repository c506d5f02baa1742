//! Common utilities for TypeScript code generation.
//!
//! Identifier sanitizing, quoting and case conversion shared by the
//! translators and the emitter.

use std::collections::HashSet;
use std::sync::LazyLock;

use super::types::{TsPrimitive, TsType};
use crate::options::CaseConvention;

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
    ]
    .into_iter()
    .collect()
});

/// Names a generated stub declares or calls; parameters must not shadow them.
const STUB_NAMES: [&str; 9] = [
    "headersHandler",
    "res",
    "url",
    "searchParams",
    "queryString",
    "fetch",
    "encodeURIComponent",
    "ensureSuccess",
    "notifyStatus",
];

/// Check if a name needs quoting to be used as a property or enum key.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_quoting(name: &str) -> bool {
    !name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name.chars().all(is_identifier_char)
}

/// Escape a string for use in JavaScript/TypeScript string literals.
/// Escapes backslashes and double quotes.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a string if needed for use as a property key or enum key.
pub fn quote_if_needed(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

/// Sanitize an identifier to be a valid TypeScript identifier.
/// - Splits on `-`, `.`, ` ` and joins the parts in camelCase
/// - Drops any other character that cannot appear in an identifier
/// - Prepends `_` if starts with digit
/// - Escapes reserved words with `_` prefix
pub fn sanitize_ts_identifier(name: &str) -> String {
    let mut result = String::new();
    for (i, part) in name.split(['-', '.', ' ']).enumerate() {
        let part: String = part
            .chars()
            .filter(|c| is_identifier_char(*c))
            .collect();
        if i == 0 || result.is_empty() {
            result.push_str(&part);
        } else {
            result.push_str(&capitalize_first(&part));
        }
    }

    if result.is_empty() {
        return "_empty".to_string();
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result = format!("_{result}");
    }

    if TS_RESERVED_WORDS.contains(result.as_str()) {
        result = format!("_{result}");
    }

    result
}

/// Identifier for a stub parameter, kept clear of the stub's own locals.
pub fn param_identifier(name: &str) -> String {
    let ident = sanitize_ts_identifier(&lowercase_first(name));
    if STUB_NAMES.contains(&ident.as_str()) {
        format!("{ident}Param")
    } else {
        ident
    }
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercase the first letter of a string.
pub fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Convert a member name with the configured case convention.
pub fn apply_case(name: &str, convention: CaseConvention) -> String {
    match convention {
        CaseConvention::Original => name.to_string(),
        CaseConvention::Camel => lowercase_first(name),
        CaseConvention::Pascal => capitalize_first(name),
    }
}

/// Client namespace for a backend namespace: dots become underscores and
/// the suffix is appended. The global namespace uses the bare suffix.
///
/// Characters of the suffix that cannot appear in an identifier are dropped.
pub fn client_namespace(namespace: &str, suffix: &str) -> String {
    let suffix: String = suffix.chars().filter(|c| is_identifier_char(*c)).collect();
    if namespace.is_empty() {
        let bare = suffix.trim_start_matches('_');
        let bare = if bare.is_empty() { "Client" } else { bare };
        return sanitize_ts_identifier(bare);
    }
    let joined = namespace
        .split('.')
        .map(sanitize_ts_identifier)
        .collect::<Vec<_>>()
        .join("_");
    format!("{joined}{suffix}")
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Create a `Record<string, T>` type.
pub fn make_string_record(value_type: TsType) -> TsType {
    TsType::Record {
        key: Box::new(TsType::Primitive(TsPrimitive::String)),
        value: Box::new(value_type),
    }
}
