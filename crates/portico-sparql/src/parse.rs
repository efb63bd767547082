//! Parsing upstream RDF responses into a graph.
//!
//! The parser is chosen from the upstream's Content-Type header. Unknown or
//! missing content types fall back to Turtle, which also covers N-Triples
//! payloads served with a sloppy type.

use oxrdf::Graph;

use crate::proxy::ProxyError;

/// Parse an RDF response body into a graph, guided by its media type.
///
/// An empty body is a valid empty graph, not an error.
pub fn parse_graph(content_type: Option<&str>, body: &[u8]) -> Result<Graph, ProxyError> {
    // Strip parameters like `; charset=utf-8`.
    let media_type = content_type
        .unwrap_or("text/turtle")
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    let mut graph = Graph::new();

    match media_type.as_str() {
        "application/rdf+xml" => {
            for triple in oxrdfxml::RdfXmlParser::new().for_reader(body) {
                let triple = triple.map_err(|e| ProxyError::Parse(e.to_string()))?;
                graph.insert(&triple);
            }
        }
        "application/n-triples" | "text/n-triples" | "text/rdf+nt" => {
            for triple in oxttl::NTriplesParser::new().for_reader(body) {
                let triple = triple.map_err(|e| ProxyError::Parse(e.to_string()))?;
                graph.insert(&triple);
            }
        }
        "application/n-quads" => {
            for quad in oxttl::NQuadsParser::new().for_reader(body) {
                let quad = quad.map_err(|e| ProxyError::Parse(e.to_string()))?;
                // Graph names are dropped: the gateway works on plain triples.
                let triple = oxrdf::Triple::new(quad.subject, quad.predicate, quad.object);
                graph.insert(&triple);
            }
        }
        _ => {
            for triple in oxttl::TurtleParser::new().for_reader(body) {
                let triple = triple.map_err(|e| ProxyError::Parse(e.to_string()))?;
                graph.insert(&triple);
            }
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TURTLE: &str = r#"@prefix ex: <http://example.org/> .
ex:a ex:knows ex:b .
"#;

    #[test]
    fn test_parse_turtle() {
        let graph = parse_graph(Some("text/turtle"), TURTLE.as_bytes()).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_parse_with_charset_parameter() {
        let graph = parse_graph(Some("text/turtle; charset=utf-8"), TURTLE.as_bytes()).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_parse_ntriples() {
        let nt = "<http://example.org/a> <http://example.org/knows> <http://example.org/b> .\n";
        let graph = parse_graph(Some("application/n-triples"), nt.as_bytes()).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_missing_content_type_defaults_to_turtle() {
        let graph = parse_graph(None, TURTLE.as_bytes()).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_empty_body_is_empty_graph() {
        let graph = parse_graph(Some("text/turtle"), b"").unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_malformed_body_is_error() {
        let err = parse_graph(Some("text/turtle"), b"this is not turtle").unwrap_err();
        assert!(matches!(err, ProxyError::Parse(_)));
    }
}
