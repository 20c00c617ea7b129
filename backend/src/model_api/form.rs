use shared::GenerationParams;

/// Text fields sent alongside the image to `/generate_report`.
///
/// Every field is always present; missing optional values are sent as empty
/// strings so the model API applies its own defaults.
pub fn report_form_fields(params: &GenerationParams) -> Vec<(&'static str, String)> {
    vec![
        ("prompt_text", params.prompt_text.clone().unwrap_or_default()),
        ("max_new_tokens", params.max_new_tokens.to_string()),
        ("num_beams", params.num_beams.to_string()),
        ("do_sample", params.do_sample.to_string()),
        (
            "top_k",
            params.top_k.map(|k| k.to_string()).unwrap_or_default(),
        ),
        (
            "top_p",
            params.top_p.map(|p| p.to_string()).unwrap_or_default(),
        ),
    ]
}
