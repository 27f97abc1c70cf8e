//! RDF serialization contract and the bundled Turtle codec.
//!
//! Access-control documents are small, so the codec works on whole bodies.
//! Parsing and serialization are delegated to `oxttl`; this module only maps
//! between its terms and [`Dataset`] terms.

use oxrdf::{BlankNode, NamedNode, Subject};

use crate::dataset::{Dataset, Literal, Term, Triple};
use crate::error::{Error, Result};
use crate::iri::ResourceIri;

/// Converts between response bodies and [`Dataset`]s.
pub trait RdfCodec: Send + Sync {
    /// Media type announced in `Accept` and `Content-Type`.
    fn media_type(&self) -> &str;

    /// Parse `body`, resolving relative IRIs against `base`.
    fn parse(&self, body: &str, base: &ResourceIri) -> Result<Dataset>;

    /// Serialize `dataset`.
    fn serialize(&self, dataset: &Dataset) -> Result<String>;
}

/// `text/turtle`, the format Solid servers store ACLs and ACRs in.
///
/// N-Triples bodies parse too, since they are valid Turtle.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurtleCodec;

impl RdfCodec for TurtleCodec {
    fn media_type(&self) -> &str {
        "text/turtle"
    }

    fn parse(&self, body: &str, base: &ResourceIri) -> Result<Dataset> {
        let parser = oxttl::TurtleParser::new()
            .with_base_iri(base.as_str())
            .map_err(|e| Error::parse(format!("invalid base <{base}>: {e}")))?;
        let mut dataset = Dataset::new();
        for triple in parser.for_reader(body.as_bytes()) {
            let triple = triple.map_err(|e| Error::parse(e.to_string()))?;
            dataset.insert(from_oxrdf(triple)?);
        }
        Ok(dataset)
    }

    fn serialize(&self, dataset: &Dataset) -> Result<String> {
        let mut writer = oxttl::TurtleSerializer::new().for_writer(Vec::new());
        for triple in dataset.triples() {
            writer
                .serialize_triple(&to_oxrdf(triple)?)
                .map_err(|e| Error::parse(e.to_string()))?;
        }
        let bytes = writer.finish().map_err(|e| Error::parse(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| Error::parse(e.to_string()))
    }
}

fn from_oxrdf(triple: oxrdf::Triple) -> Result<Triple> {
    let subject = match triple.subject {
        Subject::NamedNode(node) => Term::Iri(node.into_string()),
        Subject::BlankNode(node) => Term::Blank(node.as_str().to_string()),
        #[allow(unreachable_patterns)]
        other => return Err(Error::parse(format!("unsupported subject {other}"))),
    };
    let object = match triple.object {
        oxrdf::Term::NamedNode(node) => Term::Iri(node.into_string()),
        oxrdf::Term::BlankNode(node) => Term::Blank(node.as_str().to_string()),
        oxrdf::Term::Literal(literal) => {
            let (value, datatype, language) = literal.destruct();
            Term::Literal(Literal {
                value,
                datatype: datatype.map(NamedNode::into_string),
                language,
            })
        }
        #[allow(unreachable_patterns)]
        other => return Err(Error::parse(format!("unsupported object {other}"))),
    };
    Ok(Triple::new(subject, triple.predicate.into_string(), object))
}

fn to_oxrdf(triple: &Triple) -> Result<oxrdf::Triple> {
    let subject: Subject = match &triple.subject {
        Term::Iri(iri) => named(iri)?.into(),
        Term::Blank(label) => blank(label)?.into(),
        Term::Literal(_) => {
            return Err(Error::parse(format!(
                "literal in subject position: {}",
                triple.subject
            )));
        }
    };
    let object: oxrdf::Term = match &triple.object {
        Term::Iri(iri) => named(iri)?.into(),
        Term::Blank(label) => blank(label)?.into(),
        Term::Literal(lit) => match (&lit.language, &lit.datatype) {
            (Some(language), _) => {
                oxrdf::Literal::new_language_tagged_literal(lit.value.clone(), language.clone())
                    .map_err(|e| Error::parse(format!("language tag '{language}': {e}")))?
                    .into()
            }
            (None, Some(datatype)) => {
                oxrdf::Literal::new_typed_literal(lit.value.clone(), named(datatype)?).into()
            }
            (None, None) => oxrdf::Literal::new_simple_literal(lit.value.clone()).into(),
        },
    };
    Ok(oxrdf::Triple::new(subject, named(&triple.predicate)?, object))
}

fn named(iri: &str) -> Result<NamedNode> {
    NamedNode::new(iri).map_err(|e| Error::parse(format!("invalid IRI <{iri}>: {e}")))
}

fn blank(label: &str) -> Result<BlankNode> {
    BlankNode::new(label).map_err(|e| Error::parse(format!("invalid blank node _:{label}: {e}")))
}
