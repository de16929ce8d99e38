use crate::error::ConversionError;
use crate::flow::ValueMap;
use crate::legacy::{LegacyMappingDef, LegacyMappings, MappingType};
use crate::resolve::DataResolver;
use serde_json::{Value, json};

/// Resolves an activity's legacy input and output mappings into value maps keyed by target.
pub fn convert_legacy_mappings(
    mappings: &LegacyMappings,
    resolver: &dyn DataResolver,
) -> Result<(ValueMap, ValueMap), ConversionError> {
    let input = handle_mappings(&mappings.input, resolver)?;
    let output = handle_mappings(&mappings.output, resolver)?;
    Ok((input, output))
}

/// Resolves a single list of legacy mappings into a value map keyed by target.
/// Later mappings to the same target replace earlier ones.
pub fn handle_mappings(
    defs: &[LegacyMappingDef],
    resolver: &dyn DataResolver,
) -> Result<ValueMap, ConversionError> {
    let mut values = ValueMap::with_capacity(defs.len());
    for def in defs {
        let target = normalize_target(&def.map_to);
        if target.is_empty() {
            return Err(ConversionError::MappingResolutionFailed {
                target: def.map_to.clone(),
                message: "mapping has no target".to_string(),
            });
        }
        let value = resolve_mapping(def, resolver).map_err(|message| {
            ConversionError::MappingResolutionFailed {
                target: target.clone(),
                message,
            }
        })?;
        values.insert(target, value);
    }
    Ok(values)
}

fn resolve_mapping(def: &LegacyMappingDef, resolver: &dyn DataResolver) -> Result<Value, String> {
    match def.mapping_type {
        MappingType::Literal => Ok(def.value.clone()),
        MappingType::Assign => {
            let reference = expect_str(def)?;
            let rewritten = rewrite_reference(reference);
            resolver.validate_reference(&rewritten)?;
            Ok(Value::String(format!("={}", rewritten)))
        }
        MappingType::Expression => {
            let (expr, references) = rewrite_expression(expect_str(def)?);
            for reference in &references {
                resolver.validate_reference(reference)?;
            }
            Ok(Value::String(format!("={}", expr.trim())))
        }
        MappingType::Object | MappingType::Array => {
            Ok(json!({ "mapping": rewrite_template(&def.value, resolver)? }))
        }
    }
}

fn expect_str(def: &LegacyMappingDef) -> Result<&str, String> {
    def.value.as_str().ok_or_else(|| {
        format!(
            "{} mapping expects a string value, found '{}'",
            def.mapping_type, def.value
        )
    })
}

/// Rewrites `{{ ... }}` placeholders inside object and array mapping templates.
fn rewrite_template(value: &Value, resolver: &dyn DataResolver) -> Result<Value, String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            let Some(inner) = trimmed
                .strip_prefix("{{")
                .and_then(|rest| rest.strip_suffix("}}"))
            else {
                return Ok(value.clone());
            };
            let (expr, references) = rewrite_expression(inner.trim());
            for reference in &references {
                resolver.validate_reference(reference)?;
            }
            Ok(Value::String(format!("={}", expr)))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| rewrite_template(item, resolver))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => map
            .iter()
            .map(|(key, item)| -> Result<(String, Value), String> {
                Ok((key.clone(), rewrite_template(item, resolver)?))
            })
            .collect::<Result<serde_json::Map<_, _>, String>>()
            .map(Value::Object),
        other => Ok(other.clone()),
    }
}

/// Older flows address activity inputs as `$INPUT['name']`; the current schema uses `name`.
fn normalize_target(map_to: &str) -> String {
    let trimmed = map_to.trim();
    match trimmed.strip_prefix("$INPUT") {
        Some(rest) => strip_index(rest),
        None => trimmed.to_string(),
    }
}

/// Turns `['name'].rest` or `.name` into `name.rest`.
fn strip_index(rest: &str) -> String {
    if let Some(path) = rest.strip_prefix('.') {
        return path.to_string();
    }
    match rest.strip_prefix('[').and_then(|r| r.split_once(']')) {
        Some((name, tail)) => format!("{}{}", name.trim_matches(['\'', '"']), tail),
        None => rest.to_string(),
    }
}

/// Rewrites a single legacy reference into the current addressing syntax.
///
/// Strings that are not `$` references are returned unchanged.
pub fn rewrite_reference(reference: &str) -> String {
    let trimmed = reference.trim();
    let body = match trimmed
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(inner) => inner.trim(),
        None => match trimmed.strip_prefix('$') {
            Some(rest) => rest,
            None => return trimmed.to_string(),
        },
    };

    if let Some(rest) = body.strip_prefix("INPUT") {
        return format!("$.{}", strip_index(rest));
    }

    let end = body.find(['.', '[']).unwrap_or(body.len());
    let (scope, rest) = body.split_at(end);
    let path = match rest.strip_prefix('.') {
        Some(path) if !path.is_empty() => path,
        _ => return format!("${}", body),
    };

    match scope {
        "activity" => match path.split_once('.') {
            Some((name, tail)) => format!("$activity[{}].{}", name, tail),
            None => format!("$activity[{}]", path),
        },
        "env" | "property" | "iteration" => format!("${}[{}]", scope, path),
        "current" => match path.strip_prefix("iteration.") {
            Some(key) => format!("$iteration[{}]", key),
            None => format!("${}", body),
        },
        _ => format!("${}", body),
    }
}

/// Rewrites every reference embedded in an expression, returning the new expression and
/// the rewritten references it contains. References inside quoted literals are left alone.
pub fn rewrite_expression(expr: &str) -> (String, Vec<String>) {
    let mut rewritten = String::with_capacity(expr.len());
    let mut references = Vec::new();
    let mut last = 0;

    for (start, end) in find_references(expr) {
        rewritten.push_str(&expr[last..start]);
        let reference = rewrite_reference(&expr[start..end]);
        rewritten.push_str(&reference);
        references.push(reference);
        last = end;
    }
    rewritten.push_str(&expr[last..]);

    (rewritten, references)
}

/// Returns the rewritten reference when `text` is exactly one legacy reference.
pub(crate) fn whole_reference(text: &str) -> Option<String> {
    match find_references(text).as_slice() {
        [(0, end)] if *end == text.len() => Some(rewrite_reference(text)),
        _ => None,
    }
}

fn find_references(expr: &str) -> Vec<(usize, usize)> {
    let bytes = expr.as_bytes();
    let mut spans = Vec::new();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' => {
                quote = Some(b);
                i += 1;
            }
            b'$' if starts_reference(bytes.get(i + 1).copied()) => {
                let end = reference_end(bytes, i);
                spans.push((i, end));
                i = end;
            }
            _ => i += 1,
        }
    }
    spans
}

fn starts_reference(next: Option<u8>) -> bool {
    matches!(next, Some(b'{' | b'.')) || next.is_some_and(|b| b.is_ascii_alphabetic())
}

fn reference_end(bytes: &[u8], start: usize) -> usize {
    let closing = |from: usize, delimiter: u8| {
        bytes[from..]
            .iter()
            .position(|&b| b == delimiter)
            .map_or(bytes.len(), |p| from + p + 1)
    };

    let mut i = start + 1;
    if bytes[i] == b'{' {
        return closing(i, b'}');
    }
    while i < bytes.len() {
        match bytes[i] {
            b'[' => i = closing(i, b']'),
            b if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' => i += 1,
            _ => break,
        }
    }
    // a trailing dot ends the sentence, not the path
    while i > start + 2 && bytes[i - 1] == b'.' {
        i -= 1;
    }
    i
}
