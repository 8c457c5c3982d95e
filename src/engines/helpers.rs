// ABOUTME: Handlebars helper functions available to view templates
// ABOUTME: Implements case conversion, defaults, joins, timestamps and JSON dumps

use chrono::{DateTime, TimeZone, Utc};
use handlebars::{Context, Handlebars, Helper, Output, RenderContext, RenderError};
use std::fmt::Write;

use crate::view::variables::{display_value, is_empty_value};

/// Uppercase helper
pub fn upper_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let input = h
        .param(0)
        .map(|v| display_value(v.value()))
        .ok_or_else(|| RenderError::new("upper helper requires input parameter"))?;

    out.write(&input.to_uppercase())?;
    Ok(())
}

/// Lowercase helper
pub fn lower_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let input = h
        .param(0)
        .map(|v| display_value(v.value()))
        .ok_or_else(|| RenderError::new("lower helper requires input parameter"))?;

    out.write(&input.to_lowercase())?;
    Ok(())
}

/// Default helper - falls back when the value is empty or unbound
pub fn default_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let default_value = h
        .param(1)
        .map(|v| display_value(v.value()))
        .ok_or_else(|| RenderError::new("default helper requires default value parameter"))?;

    let result = match h.param(0).map(|v| v.value()) {
        Some(value) if !is_empty_value(value) => display_value(value),
        _ => default_value,
    };

    out.write(&result)?;
    Ok(())
}

/// Join helper - joins array elements with separator
pub fn join_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let array = h
        .param(0)
        .and_then(|v| v.value().as_array())
        .ok_or_else(|| RenderError::new("join helper requires array parameter"))?;

    let separator = h.param(1).and_then(|v| v.value().as_str()).unwrap_or(", ");

    let joined = array
        .iter()
        .map(display_value)
        .collect::<Vec<_>>()
        .join(separator);
    out.write(&joined)?;
    Ok(())
}

/// Timestamp helper - formats current time with optional format string
pub fn timestamp_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let format = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .unwrap_or("%Y-%m-%d %H:%M:%S");

    out.write(&format_datetime(&Utc::now(), format)?)?;
    Ok(())
}

/// Format time helper - formats an RFC 3339 string or Unix timestamp
pub fn format_time_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let value = h
        .param(0)
        .map(|v| v.value())
        .ok_or_else(|| RenderError::new("format_time helper requires timestamp parameter"))?;

    let format = h
        .param(1)
        .and_then(|v| v.value().as_str())
        .unwrap_or("%Y-%m-%d %H:%M:%S");

    let datetime: DateTime<Utc> = if let Some(seconds) = value.as_i64() {
        Utc.timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| RenderError::new(format!("Timestamp out of range: {}", seconds)))?
    } else {
        let text = display_value(value);
        DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                text.parse::<i64>()
                    .ok()
                    .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
                    .ok_or(())
            })
            .map_err(|_| RenderError::new(format!("Failed to parse timestamp: {}", text)))?
    };

    out.write(&format_datetime(&datetime, format)?)?;
    Ok(())
}

/// Format `datetime` with a template-supplied strftime string.
///
/// chrono reports an unknown specifier as `fmt::Error` from `Display`, which
/// `to_string` would turn into a panic.
fn format_datetime(
    datetime: &DateTime<Utc>,
    format: &str,
) -> std::result::Result<String, RenderError> {
    let mut formatted = String::new();
    write!(formatted, "{}", datetime.format(format))
        .map_err(|_| RenderError::new(format!("Invalid time format: {}", format)))?;
    Ok(formatted)
}

/// JSON helper - dumps a value as JSON text
pub fn json_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let value = h
        .param(0)
        .map(|v| v.value())
        .ok_or_else(|| RenderError::new("json helper requires input parameter"))?;

    let pretty = h.hash_get("pretty").and_then(|v| v.value().as_bool()) == Some(true);
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| RenderError::new(format!("JSON encode error: {}", e)))?;

    out.write(&encoded)?;
    Ok(())
}

/// Register all built-in helpers with a Handlebars instance
pub fn register_helpers(handlebars: &mut Handlebars) {
    handlebars.register_helper("upper", Box::new(upper_helper));
    handlebars.register_helper("lower", Box::new(lower_helper));
    handlebars.register_helper("default", Box::new(default_helper));
    handlebars.register_helper("join", Box::new(join_helper));
    handlebars.register_helper("timestamp", Box::new(timestamp_helper));
    handlebars.register_helper("format_time", Box::new(format_time_helper));
    handlebars.register_helper("json", Box::new(json_helper));
}
