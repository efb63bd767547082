//! Graph serialization for content-negotiated responses.
//!
//! Turtle, N3, and RDF/XML go through the oxigraph writer family. N-Triples
//! and N-Quads use oxrdf's canonical term formatting directly. TriX has no
//! writer in that family, so it is emitted with quick-xml.

use std::io::Write;

use oxrdf::{Graph, TermRef};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::negotiate::RdfFormat;

const TRIX_NS: &str = "http://www.w3.org/2004/03/trix/trix-1/";

#[derive(Debug, thiserror::Error)]
#[error("RDF serialization failed: {0}")]
pub struct RenderError(pub String);

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        Self(e.to_string())
    }
}

/// Serialize a graph in the negotiated format.
pub fn serialize_graph(graph: &Graph, format: RdfFormat) -> Result<Vec<u8>, RenderError> {
    match format {
        // Turtle is a subset of N3, so the Turtle writer serves both.
        RdfFormat::Turtle | RdfFormat::N3 => {
            let mut serializer = oxttl::TurtleSerializer::new().for_writer(Vec::new());
            for triple in graph.iter() {
                serializer.serialize_triple(triple)?;
            }
            Ok(serializer.finish()?)
        }
        RdfFormat::RdfXml => {
            let mut serializer = oxrdfxml::RdfXmlSerializer::new().for_writer(Vec::new());
            for triple in graph.iter() {
                serializer.serialize_triple(triple)?;
            }
            Ok(serializer.finish()?)
        }
        // A graph has no named graphs, so N-Quads degenerates to N-Triples.
        RdfFormat::NTriples | RdfFormat::NQuads => {
            let mut out = Vec::new();
            for triple in graph.iter() {
                writeln!(out, "{triple} .")?;
            }
            Ok(out)
        }
        RdfFormat::TriX => serialize_trix(graph),
    }
}

fn serialize_trix(graph: &Graph) -> Result<Vec<u8>, RenderError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new("TriX");
    root.push_attribute(("xmlns", TRIX_NS));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("graph")))?;

    for triple in graph.iter() {
        writer.write_event(Event::Start(BytesStart::new("triple")))?;
        write_term(&mut writer, triple.subject.into())?;
        write_text_element(&mut writer, BytesStart::new("uri"), triple.predicate.as_str())?;
        write_term(&mut writer, triple.object)?;
        writer.write_event(Event::End(BytesEnd::new("triple")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("TriX")))?;
    Ok(writer.into_inner())
}

fn write_term(writer: &mut Writer<Vec<u8>>, term: TermRef<'_>) -> Result<(), RenderError> {
    match term {
        TermRef::NamedNode(node) => write_text_element(writer, BytesStart::new("uri"), node.as_str()),
        TermRef::BlankNode(node) => write_text_element(writer, BytesStart::new("id"), node.as_str()),
        TermRef::Literal(literal) => {
            if let Some(language) = literal.language() {
                let mut start = BytesStart::new("plainLiteral");
                start.push_attribute(("xml:lang", language));
                write_text_element(writer, start, literal.value())
            } else {
                let mut start = BytesStart::new("typedLiteral");
                start.push_attribute(("datatype", literal.datatype().as_str()));
                write_text_element(writer, start, literal.value())
            }
        }
    }
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), RenderError> {
    let name = start.name().as_ref().to_vec();
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(String::from_utf8_lossy(&name))))?;
    Ok(())
}

impl From<quick_xml::Error> for RenderError {
    fn from(e: quick_xml::Error) -> Self {
        Self(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{Literal, NamedNode, Triple};

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        let subject = NamedNode::new("http://example.org/a").unwrap();
        let label = NamedNode::new("http://www.w3.org/2000/01/rdf-schema#label").unwrap();
        let knows = NamedNode::new("http://example.org/knows").unwrap();
        let other = NamedNode::new("http://example.org/b").unwrap();
        graph.insert(&Triple::new(subject.clone(), knows, other));
        graph.insert(&Triple::new(
            subject,
            label,
            Literal::new_language_tagged_literal("alpha", "en").unwrap(),
        ));
        graph
    }

    #[test]
    fn test_turtle_output_contains_terms() {
        let out = serialize_graph(&sample_graph(), RdfFormat::Turtle).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("http://example.org/a"));
        assert!(text.contains("\"alpha\"@en"));
    }

    #[test]
    fn test_ntriples_one_statement_per_line() {
        let out = serialize_graph(&sample_graph(), RdfFormat::NTriples).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.ends_with(" .")));
        assert!(lines.iter().any(|line| line.contains("<http://example.org/knows>")));
    }

    #[test]
    fn test_nquads_matches_ntriples_for_plain_graphs() {
        let graph = sample_graph();
        let nt = serialize_graph(&graph, RdfFormat::NTriples).unwrap();
        let nq = serialize_graph(&graph, RdfFormat::NQuads).unwrap();
        assert_eq!(nt, nq);
    }

    #[test]
    fn test_trix_structure() {
        let out = serialize_graph(&sample_graph(), RdfFormat::TriX).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("<TriX xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\">"));
        assert!(text.contains("<triple>"));
        assert!(text.contains("<uri>http://example.org/knows</uri>"));
        assert!(text.contains("xml:lang=\"en\""));
    }

    #[test]
    fn test_empty_graph_serializes() {
        let out = serialize_graph(&Graph::new(), RdfFormat::Turtle).unwrap();
        assert!(String::from_utf8(out).unwrap().trim().is_empty());
    }
}
