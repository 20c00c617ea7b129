use std::collections::HashMap;
use std::str::FromStr;

use shared::GenerationParams;

use crate::error::AnalysisError;

/// Builds generation settings from the text fields of an analysis request.
/// Empty values count as absent.
pub fn parse_generation_params(
    fields: &HashMap<String, String>,
) -> Result<GenerationParams, AnalysisError> {
    let defaults = GenerationParams::default();

    Ok(GenerationParams {
        prompt_text: fields
            .get("prompt_text")
            .filter(|text| !text.is_empty())
            .cloned(),
        max_new_tokens: parse_field(fields, "max_new_tokens")?.unwrap_or(defaults.max_new_tokens),
        num_beams: parse_field(fields, "num_beams")?.unwrap_or(defaults.num_beams),
        do_sample: match non_empty(fields, "do_sample") {
            Some(raw) => parse_bool(raw).ok_or_else(|| invalid("do_sample", raw))?,
            None => defaults.do_sample,
        },
        top_k: parse_field(fields, "top_k")?,
        top_p: match parse_field::<f64>(fields, "top_p")? {
            Some(value) if !value.is_finite() => {
                return Err(invalid("top_p", &fields["top_p"]));
            }
            other => other,
        },
    })
}

fn non_empty<'a>(fields: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn parse_field<T: FromStr>(
    fields: &HashMap<String, String>,
    name: &str,
) -> Result<Option<T>, AnalysisError> {
    non_empty(fields, name)
        .map(|raw| raw.parse().map_err(|_| invalid(name, raw)))
        .transpose()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(name: &str, raw: &str) -> AnalysisError {
    AnalysisError::Validation(format!("Invalid value for {}: {:?}", name, raw))
}
