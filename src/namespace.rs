//! Translation between global entity identifiers and per-namespace local ones.
//!
//! The [`NamespaceHandler`] trait is the seam to whatever owns the identifier
//! space. [`DelimitedNamespaceHandler`] is a small implementation for ids of
//! the form `<kind>:<namespace>:<local>`, e.g. `acct:ns1:42`.
//!
//! The free functions on top are what the data access layer calls: they never
//! fail hard, an id that cannot be turned into a number is simply `None`.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{EntityKind, GlobalEntityId, LocalEntityId, Namespace};

const DELIMITER: char = ':';

pub trait NamespaceHandler {
    fn namespace_of(&self, id: &GlobalEntityId) -> Option<Namespace>;
    fn local_of(&self, id: &GlobalEntityId) -> Option<String>;
    fn global_of(&self, namespace: &Namespace, local: &str, kind: EntityKind) -> GlobalEntityId;
    /// Groups ids by their namespace, keeping input order within a group.
    /// Ids without a known namespace are left out.
    fn entities_by_namespace(&self, ids: &[GlobalEntityId]) -> BTreeMap<Namespace, Vec<GlobalEntityId>>;
}

// ------------- Delimited ids -------------
#[derive(Debug, Clone)]
pub struct DelimitedNamespaceHandler {
    registered: BTreeSet<Namespace>,
}

impl DelimitedNamespaceHandler {
    pub fn new<'a>(namespaces: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            registered: namespaces.into_iter().map(Namespace::from).collect(),
        }
    }
    pub fn register(&mut self, namespace: Namespace) -> bool {
        self.registered.insert(namespace)
    }
    pub fn is_registered(&self, namespace: &Namespace) -> bool {
        self.registered.contains(namespace)
    }
    fn split<'a>(&self, id: &'a GlobalEntityId) -> Option<(EntityKind, &'a str, &'a str)> {
        let mut parts = id.as_str().splitn(3, DELIMITER);
        let kind = EntityKind::from_prefix(parts.next()?)?;
        let namespace = parts.next()?;
        let local = parts.next()?;
        Some((kind, namespace, local))
    }
}

impl NamespaceHandler for DelimitedNamespaceHandler {
    fn namespace_of(&self, id: &GlobalEntityId) -> Option<Namespace> {
        let (_, namespace, _) = self.split(id)?;
        let namespace = Namespace::from(namespace);
        self.is_registered(&namespace).then_some(namespace)
    }
    fn local_of(&self, id: &GlobalEntityId) -> Option<String> {
        self.split(id).map(|(_, _, local)| local.to_string())
    }
    fn global_of(&self, namespace: &Namespace, local: &str, kind: EntityKind) -> GlobalEntityId {
        GlobalEntityId::new(format!(
            "{}{}{}{}{}",
            kind.prefix(),
            DELIMITER,
            namespace,
            DELIMITER,
            local
        ))
    }
    fn entities_by_namespace(&self, ids: &[GlobalEntityId]) -> BTreeMap<Namespace, Vec<GlobalEntityId>> {
        let mut partitioned: BTreeMap<Namespace, Vec<GlobalEntityId>> = BTreeMap::new();
        for id in ids {
            if let Some(namespace) = self.namespace_of(id) {
                partitioned.entry(namespace).or_default().push(id.clone());
            }
        }
        partitioned
    }
}

// ------------- Translation -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedId {
    pub namespace: Namespace,
    pub local: LocalEntityId,
}

/// Global to (namespace, numeric local id). `None` when the namespace is
/// unknown or the local part is not an integer.
pub fn localize<N: NamespaceHandler + ?Sized>(handler: &N, id: &GlobalEntityId) -> Option<LocalizedId> {
    let namespace = handler.namespace_of(id)?;
    let local = handler.local_of(id)?.parse::<LocalEntityId>().ok()?;
    Some(LocalizedId { namespace, local })
}

/// Numeric local part only, for ids already known to sit in one namespace.
pub fn local_number<N: NamespaceHandler + ?Sized>(handler: &N, id: &GlobalEntityId) -> Option<LocalEntityId> {
    handler.local_of(id)?.parse::<LocalEntityId>().ok()
}

pub fn globalize<N: NamespaceHandler + ?Sized>(
    handler: &N,
    namespace: &Namespace,
    local: &str,
    kind: EntityKind,
) -> GlobalEntityId {
    handler.global_of(namespace, local, kind)
}

pub fn partition_by_namespace<N: NamespaceHandler + ?Sized>(
    handler: &N,
    ids: &[GlobalEntityId],
) -> BTreeMap<Namespace, Vec<GlobalEntityId>> {
    handler.entities_by_namespace(ids)
}
