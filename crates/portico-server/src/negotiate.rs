//! Content negotiation across RDF serializations.
//!
//! A fixed bidirectional registry maps media types to format identifiers
//! (many media types per format, one canonical media type per format).
//! Negotiation considers an explicit `format` parameter first, then an HTML
//! escape hatch, then quality-weighted matching of the Accept header, and
//! always lands on Turtle when nothing else fits.

/// The closed set of supported RDF serializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    Turtle,
    RdfXml,
    TriX,
    NQuads,
    NTriples,
    N3,
}

impl RdfFormat {
    /// The format identifier used in `?format=` parameters.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Turtle => "turtle",
            Self::RdfXml => "xml",
            Self::TriX => "trix",
            Self::NQuads => "nquads",
            Self::NTriples => "nt",
            Self::N3 => "n3",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "turtle" => Some(Self::Turtle),
            "xml" => Some(Self::RdfXml),
            "trix" => Some(Self::TriX),
            "nquads" => Some(Self::NQuads),
            "nt" => Some(Self::NTriples),
            "n3" => Some(Self::N3),
            _ => None,
        }
    }
}

/// Media type registry, in table order. Reverse lookup (format to canonical
/// media type) takes the first matching row, so the order is part of the
/// contract.
pub const REGISTRY: &[(&str, RdfFormat)] = &[
    ("application/x-turtle", RdfFormat::Turtle),
    ("text/turtle", RdfFormat::Turtle),
    ("application/rdf+xml", RdfFormat::RdfXml),
    ("application/trix", RdfFormat::TriX),
    ("application/n-quads", RdfFormat::NQuads),
    ("application/n-triples", RdfFormat::NTriples),
    ("text/n-triples", RdfFormat::NTriples),
    ("text/rdf+nt", RdfFormat::NTriples),
    ("application/n3", RdfFormat::N3),
    ("text/n3", RdfFormat::N3),
    ("text/rdf+n3", RdfFormat::N3),
];

/// A chosen output representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiationResult {
    pub format: RdfFormat,
    pub media_type: &'static str,
}

/// Outcome of negotiation: either an HTML page or a machine-readable RDF
/// serialization. Never a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Negotiated {
    Page,
    Rdf(NegotiationResult),
}

/// Forward lookup: media type to format identifier.
pub fn format_for_media_type(media_type: &str) -> Option<RdfFormat> {
    REGISTRY
        .iter()
        .find(|(mt, _)| *mt == media_type)
        .map(|(_, format)| *format)
}

/// Reverse lookup: first registry row carrying the format.
pub fn canonical_media_type(format: RdfFormat) -> &'static str {
    REGISTRY
        .iter()
        .find(|(_, f)| *f == format)
        .map(|(mt, _)| *mt)
        // The registry covers every RdfFormat variant.
        .unwrap_or("text/turtle")
}

/// Parse an Accept header into (media range, quality) pairs, sorted by
/// quality descending. Malformed segments are skipped.
fn parse_accept(accept: &str) -> Vec<(String, f32)> {
    let mut ranges: Vec<(String, f32)> = accept
        .split(',')
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            let mut segments = part.split(';');
            let media_range = segments.next()?.trim().to_ascii_lowercase();

            let quality = segments
                .find_map(|seg| {
                    let seg = seg.trim();
                    seg.strip_prefix("q=").and_then(|q| q.parse::<f32>().ok())
                })
                .unwrap_or(1.0);

            Some((media_range, quality))
        })
        .collect();

    ranges.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranges
}

/// Best match of an Accept header against the registry.
///
/// Exact matches win per quality order; `*/*` and `type/*` wildcards resolve
/// to the first registry row they cover, except that `*/*` is treated as "no
/// preference" and yields the Turtle default. A quality of 0 marks a range
/// as not acceptable, never as a match.
fn best_match(accept: &str) -> Option<NegotiationResult> {
    for (media_range, quality) in parse_accept(accept) {
        if quality <= 0.0 {
            continue;
        }
        if let Some(&(media_type, format)) = REGISTRY.iter().find(|(mt, _)| *mt == media_range) {
            return Some(NegotiationResult { format, media_type });
        }
        if media_range == "*/*" {
            return Some(TURTLE_DEFAULT);
        }
        if let Some(wanted_type) = media_range.strip_suffix("/*") {
            if let Some(&(media_type, format)) = REGISTRY
                .iter()
                .find(|(mt, _)| mt.split('/').next() == Some(wanted_type))
            {
                return Some(NegotiationResult { format, media_type });
            }
        }
    }
    None
}

const TURTLE_DEFAULT: NegotiationResult = NegotiationResult {
    format: RdfFormat::Turtle,
    media_type: "text/turtle",
};

/// Negotiate an output representation.
///
/// Priority: explicit registry format, then the HTML path (explicit
/// `format=html` or `html` anywhere in the Accept header, which knowingly
/// also fires on `application/xhtml+xml`), then quality-weighted Accept
/// matching, then the Turtle fallback. Deterministic, never fails.
pub fn negotiate(accept: Option<&str>, format: Option<&str>) -> Negotiated {
    if let Some(name) = format {
        if let Some(chosen) = RdfFormat::from_name(name) {
            return Negotiated::Rdf(NegotiationResult {
                format: chosen,
                media_type: canonical_media_type(chosen),
            });
        }
    }

    let accept = accept.unwrap_or("");
    if format == Some("html") || accept.contains("html") {
        return Negotiated::Page;
    }

    Negotiated::Rdf(best_match(accept).unwrap_or(TURTLE_DEFAULT))
}
