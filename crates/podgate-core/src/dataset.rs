//! In-memory RDF triple store.
//!
//! A [`Dataset`] is an arena of triples with an index from subject to arena
//! slots. Lookups hand out borrowed [`SubjectView`]s instead of copying
//! triples; mutation works on an owned value, so authorization documents
//! can be cloned, changed, and handed to the save path as a next state.

use std::collections::BTreeMap;
use std::fmt;

use crate::iri::ResourceIri;
use crate::vocab::rdf;

// ============================================================================
// Terms
// ============================================================================

/// A literal value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    /// Lexical form.
    pub value: String,
    /// Datatype IRI, if any.
    pub datatype: Option<String>,
    /// Language tag, if any.
    pub language: Option<String>,
}

/// An RDF term.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// A named node.
    Iri(String),
    /// A blank node label (without the `_:` prefix).
    Blank(String),
    /// A literal.
    Literal(Literal),
}

impl Term {
    /// A named node.
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri(value.into())
    }

    /// A blank node.
    pub fn blank(label: impl Into<String>) -> Self {
        Self::Blank(label.into())
    }

    /// A plain string literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(Literal {
            value: value.into(),
            datatype: None,
            language: None,
        })
    }

    /// The IRI if this term is a named node.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri.as_str()),
            _ => None,
        }
    }

    /// Whether this term may appear in subject position.
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Iri(_) | Self::Blank(_))
    }
}

impl From<&ResourceIri> for Term {
    fn from(value: &ResourceIri) -> Self {
        Self::Iri(value.as_str().to_string())
    }
}

impl From<ResourceIri> for Term {
    fn from(value: ResourceIri) -> Self {
        Self::Iri(value.into())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(label) => write!(f, "_:{label}"),
            Self::Literal(lit) => {
                write!(f, "\"{}\"", lit.value)?;
                if let Some(lang) = &lit.language {
                    write!(f, "@{lang}")
                } else if let Some(dt) = &lit.datatype {
                    write!(f, "^^<{dt}>")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A subject–predicate–object statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject (named or blank node).
    pub subject: Term,
    /// Predicate IRI.
    pub predicate: String,
    /// Object.
    pub object: Term,
}

impl Triple {
    /// Build a triple.
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// A set of triples indexed by subject.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    slots: Vec<Option<Triple>>,
    by_subject: BTreeMap<Term, Vec<usize>>,
    len: usize,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the dataset holds no triples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a triple. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.contains(&triple) {
            return false;
        }
        let slot = self.slots.len();
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .push(slot);
        self.slots.push(Some(triple));
        self.len += 1;
        true
    }

    /// Insert `subject predicate object`.
    pub fn add(&mut self, subject: impl Into<Term>, predicate: &str, object: impl Into<Term>) -> bool {
        self.insert(Triple::new(subject.into(), predicate, object.into()))
    }

    /// Whether the exact triple is present.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.subject(&triple.subject)
            .has(&triple.predicate, &triple.object)
    }

    /// Remove every triple matching `subject predicate [object]`.
    ///
    /// Returns the number of triples removed.
    pub fn remove(&mut self, subject: &Term, predicate: &str, object: Option<&Term>) -> usize {
        let Some(indexes) = self.by_subject.get_mut(subject) else {
            return 0;
        };
        let slots = &mut self.slots;
        let before = indexes.len();
        indexes.retain(|&i| {
            let matches = slots[i].as_ref().is_some_and(|t| {
                t.predicate == predicate && object.is_none_or(|o| &t.object == o)
            });
            if matches {
                slots[i] = None;
            }
            !matches
        });
        let removed = before - indexes.len();
        if indexes.is_empty() {
            self.by_subject.remove(subject);
        }
        self.len -= removed;
        removed
    }

    /// Remove every triple with the given subject.
    pub fn remove_subject(&mut self, subject: &Term) -> usize {
        let Some(indexes) = self.by_subject.remove(subject) else {
            return 0;
        };
        for &i in &indexes {
            self.slots[i] = None;
        }
        self.len -= indexes.len();
        indexes.len()
    }

    /// Borrowed view of all statements about `subject`.
    pub fn subject<'a>(&'a self, subject: &Term) -> SubjectView<'a> {
        SubjectView {
            dataset: self,
            slots: self
                .by_subject
                .get(subject)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    /// All subjects, in term order.
    pub fn subjects(&self) -> impl Iterator<Item = &Term> {
        self.by_subject.keys()
    }

    /// Subjects with an `rdf:type` of `type_iri`.
    pub fn subjects_of_type<'a>(&'a self, type_iri: &'a str) -> impl Iterator<Item = &'a Term> + 'a {
        self.by_subject
            .keys()
            .filter(move |s| self.subject(s).has_type(type_iri))
    }

    /// Every triple, grouped by subject.
    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.by_subject
            .values()
            .flat_map(|indexes| indexes.iter())
            .filter_map(|&i| self.slots[i].as_ref())
    }
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.triples().all(|t| other.contains(t))
    }
}

impl Eq for Dataset {}

impl FromIterator<Triple> for Dataset {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut dataset = Self::new();
        for triple in iter {
            dataset.insert(triple);
        }
        dataset
    }
}

// ============================================================================
// SubjectView
// ============================================================================

/// Statements about one subject, borrowed from a [`Dataset`].
#[derive(Clone, Copy)]
pub struct SubjectView<'a> {
    dataset: &'a Dataset,
    slots: &'a [usize],
}

impl<'a> SubjectView<'a> {
    /// Whether the subject has no statements.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All statements about the subject.
    pub fn triples(self) -> impl Iterator<Item = &'a Triple> + 'a {
        let dataset = self.dataset;
        self.slots.iter().filter_map(move |&i| dataset.slots[i].as_ref())
    }

    /// Objects of `predicate`.
    pub fn objects<'p>(self, predicate: &'p str) -> impl Iterator<Item = &'a Term> + 'p
    where
        'a: 'p,
    {
        self.triples()
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Named-node objects of `predicate`.
    pub fn iris<'p>(self, predicate: &'p str) -> impl Iterator<Item = &'a str> + 'p
    where
        'a: 'p,
    {
        self.objects(predicate).filter_map(Term::as_iri)
    }

    /// Whether `predicate object` is stated.
    pub fn has(&self, predicate: &str, object: &Term) -> bool {
        self.triples()
            .any(|t| t.predicate == predicate && &t.object == object)
    }

    /// Whether `predicate` links to the named node `iri`.
    pub fn has_iri(&self, predicate: &str, iri: &str) -> bool {
        self.triples()
            .any(|t| t.predicate == predicate && t.object.as_iri() == Some(iri))
    }

    /// Whether the subject is typed `type_iri`.
    pub fn has_type(&self, type_iri: &str) -> bool {
        self.has_iri(rdf::TYPE, type_iri)
    }
}

impl fmt::Debug for SubjectView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.triples()).finish()
    }
}
