//! Forward pass linking short-form, supra, id, and reference citations
//! back to the prior full citation they refer to.

use std::collections::HashMap;

use crate::find::models::{Citation, Resource};

/// `resolve_citations` walks `citations` in document order (the order
/// they were found in, which is span order) tracking the most recent full
/// citation seen for each resource, and groups every citation under the
/// `Resource` it resolves to.
///
/// `Id` citations resolve to whatever resource the immediately preceding
/// citation resolved to. `Supra`/short-form/`Reference` citations resolve
/// by matching their `antecedent_guess` against a prior full citation's
/// plaintiff/defendant. Anything left over buckets under its own
/// `Resource::Unresolved` id so every citation still appears in the map.
pub fn resolve_citations(citations: &[Citation]) -> HashMap<Resource, Vec<usize>> {
    let mut map: HashMap<Resource, Vec<usize>> = HashMap::new();
    let mut last_resource: Option<Resource> = None;
    let mut by_name: HashMap<String, Resource> = HashMap::new();
    let mut next_unresolved = 0usize;

    for (i, citation) in citations.iter().enumerate() {
        let resource = match citation {
            // A lead `Id.`/`Id., § 4` with no antecedent has nothing to
            // resolve to and is dropped rather than bucketed under a
            // fresh null resource (unlike a genuinely unresolved non-id
            // citation, see the `_` arm below).
            Citation::Id { .. } | Citation::IdLaw { .. } => match last_resource.clone() {
                Some(resource) => resource,
                None => continue,
            },
            Citation::Supra { .. } | Citation::Reference { .. } => citation
                .metadata()
                .antecedent_guess
                .as_ref()
                .and_then(|name| by_name.get(name).cloned())
                .unwrap_or_else(|| {
                    let id = next_unresolved;
                    next_unresolved += 1;
                    Resource::Unresolved(id)
                }),
            Citation::ShortCase { .. } => citation
                .metadata()
                .antecedent_guess
                .as_ref()
                .and_then(|name| by_name.get(name).cloned())
                .unwrap_or_else(|| Resource::for_citation(citation, || { let id = next_unresolved; next_unresolved += 1; id })),
            _ => Resource::for_citation(citation, || {
                let id = next_unresolved;
                next_unresolved += 1;
                id
            }),
        };

        if let (Citation::FullCase { .. }, Some(name)) =
            (citation, citation.metadata().defendant.as_ref().or(citation.metadata().plaintiff.as_ref()))
        {
            by_name.insert(name.clone(), resource.clone());
        }

        if citation.is_case() || citation.is_law() || matches!(citation, Citation::FullJournal { .. }) {
            last_resource = Some(resource.clone());
        }

        map.entry(resource).or_default().push(i);
    }

    map
}
