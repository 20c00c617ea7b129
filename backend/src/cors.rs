use actix_cors::Cors;

/// An allowed origin containing `*` wildcards, e.g. `https://*.vercel.app`.
#[derive(Debug, Clone)]
pub struct OriginPattern(String);

impl OriginPattern {
    pub fn new(pattern: &str) -> Self {
        Self(pattern.to_string())
    }

    /// Each `*` must stand for at least one character.
    pub fn matches(&self, origin: &str) -> bool {
        let mut segments = self.0.split('*');
        let first = segments.next().unwrap_or_default();
        let Some(mut rest) = origin.strip_prefix(first) else {
            return false;
        };

        let remaining: Vec<&str> = segments.collect();
        let Some((last, middle)) = remaining.split_last() else {
            return rest.is_empty();
        };

        for segment in middle {
            // skip at least one char for the preceding wildcard
            let Some(skip) = rest.chars().next().map(char::len_utf8) else {
                return false;
            };
            match rest[skip..].find(segment) {
                Some(idx) => rest = &rest[skip + idx + segment.len()..],
                None => return false,
            }
        }

        rest.len() > last.len() && rest.ends_with(last)
    }
}

/// Builds the CORS middleware for a fixed allow-list. All methods and headers
/// are permitted for listed origins.
pub fn build_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    let mut patterns = Vec::new();
    for origin in allowed_origins {
        if origin.contains('*') {
            patterns.push(OriginPattern::new(origin));
        } else {
            cors = cors.allowed_origin(origin);
        }
    }

    if !patterns.is_empty() {
        cors = cors.allowed_origin_fn(move |origin, _req_head| {
            origin
                .to_str()
                .map(|origin| patterns.iter().any(|pattern| pattern.matches(origin)))
                .unwrap_or(false)
        });
    }

    cors
}
