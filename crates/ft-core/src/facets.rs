//! Facet resolution: configured subgroups → member indices.

use ft_common::{Error, ExampleId, IndexedExample, Result};
use ft_config::FacetSpec;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A named subgroup of the evaluated examples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub name: String,
    /// Indices into the evaluated examples, ascending, without duplicates.
    pub members: Vec<usize>,
}

impl Facet {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Resolve every configured facet against the examples of this run.
///
/// Unrestricted facets cover every example. Ids that are not among `examples`
/// are rejected.
pub fn partition(
    specs: &BTreeMap<String, FacetSpec>,
    examples: &[IndexedExample],
) -> Result<Vec<Facet>> {
    let mut index: HashMap<&ExampleId, usize> = HashMap::with_capacity(examples.len());
    for (i, ex) in examples.iter().enumerate() {
        index.entry(&ex.id).or_insert(i);
    }

    let facets = specs
        .iter()
        .map(|(name, spec)| {
            let members = match spec.member_ids() {
                None => (0..examples.len()).collect(),
                Some(ids) => {
                    let mut members = BTreeSet::new();
                    for id in ids {
                        let &i = index.get(id).ok_or_else(|| Error::UnknownFacetMember {
                            facet: name.clone(),
                            id: id.to_string(),
                        })?;
                        members.insert(i);
                    }
                    members.into_iter().collect()
                }
            };
            Ok(Facet {
                name: name.clone(),
                members,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    for facet in &facets {
        tracing::debug!(
            target: "facets.resolve",
            facet = %facet.name,
            members = facet.len(),
            "Resolved facet"
        );
    }
    Ok(facets)
}
