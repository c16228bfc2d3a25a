//! Transactions touching one or many entities, as links.
//!
//! [`TransactionDataAccess`] composes its collaborators: a connection pool,
//! a namespace handler and the settings that fix the table, dialect and
//! annotation format. A multi-entity request is answered one entity at a
//! time, each on its own connection, and the per-entity results are
//! concatenated in request order.
//!
//! A transaction between two entities that are both in the request is
//! fetched once for each of them and therefore appears twice in the
//! combined result. Nothing is de-duplicated or re-sorted across entities.

use tracing::{debug, debug_span, info, info_span, warn, Span};

use crate::error::Result;
use crate::executor::execute;
use crate::mapper::{map_row, AnnotationFormat};
use crate::model::{GlobalEntityId, LocalEntityId, Namespace, TransactionRequest, TransactionResultSet};
use crate::namespace::{local_number, localize, partition_by_namespace, NamespaceHandler};
use crate::pool::ConnectionPool;
use crate::query::{QueryBuilder, QueryShape};
use crate::settings::Settings;

/// Why an entity contributed nothing without anything having gone wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// The entity id has no numeric local part in a known namespace.
    UnresolvableIdentifier(GlobalEntityId),
    /// The counterpart filter has no entries in the entity's namespace.
    EmptyFilterPartition(Namespace),
    /// The counterpart filter has entries in the namespace but none of them
    /// is numeric.
    UnresolvableFilter(Namespace),
}

/// Outcome of the single-entity path.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityLookup {
    Found(TransactionResultSet),
    Empty(Degradation),
}

impl EntityLookup {
    pub fn into_results(self) -> TransactionResultSet {
        match self {
            EntityLookup::Found(results) => results,
            EntityLookup::Empty(_) => TransactionResultSet::empty(),
        }
    }
    pub fn degradation(&self) -> Option<&Degradation> {
        match self {
            EntityLookup::Found(_) => None,
            EntityLookup::Empty(reason) => Some(reason),
        }
    }
}

pub struct TransactionDataAccess<P, N> {
    pool: P,
    namespaces: N,
    builder: QueryBuilder,
    format: AnnotationFormat,
    span: Span,
}

impl<P: ConnectionPool, N: NamespaceHandler> TransactionDataAccess<P, N> {
    pub fn new(pool: P, namespaces: N, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            pool,
            namespaces,
            builder: QueryBuilder::new(&settings.table, settings.dialect),
            format: AnnotationFormat::from_settings(settings),
            span: info_span!("transactions", table = %settings.table),
        })
    }
    pub fn pool(&self) -> &P {
        &self.pool
    }
    pub fn namespaces(&self) -> &N {
        &self.namespaces
    }

    /// All transactions touching any of the requested entities.
    ///
    /// A single entity is answered directly by
    /// [`transactions_for_entity`](Self::transactions_for_entity). Ids that
    /// cannot be translated contribute nothing; a data access failure for any
    /// entity fails the whole call.
    pub fn get_transactions(&self, request: &TransactionRequest) -> Result<TransactionResultSet> {
        let _entered = self.span.enter();
        if request.start != 0 {
            debug!(start = request.start, "start offset is not applied");
        }
        if let [id] = request.entities.as_slice() {
            return Ok(self.transactions_for_entity(id, request)?.into_results());
        }
        let mut combined = TransactionResultSet::empty();
        for id in &request.entities {
            combined.absorb(self.transactions_for_entity(id, request)?.into_results());
        }
        info!(
            entities = request.entities.len(),
            total = combined.total,
            "transactions collected"
        );
        Ok(combined)
    }

    /// The single-entity path: translate, build, execute, map.
    pub fn transactions_for_entity(
        &self,
        id: &GlobalEntityId,
        request: &TransactionRequest,
    ) -> Result<EntityLookup> {
        let _entered = self.span.enter();
        let _entity = debug_span!("entity", %id).entered();

        let Some(focal) = localize(&self.namespaces, id) else {
            warn!(%id, "failed to convert id to number");
            return Ok(EntityLookup::Empty(Degradation::UnresolvableIdentifier(id.clone())));
        };

        let counterparts = match &request.counterpart_filter {
            Some(filter) => match self.counterparts_in(&focal.namespace, filter) {
                Ok(counterparts) => counterparts,
                Err(reason) => return Ok(EntityLookup::Empty(reason)),
            },
            None => Vec::new(),
        };

        let shape = QueryShape {
            counterparts: counterparts.len(),
            cap: request.cap(),
            date_range: request.date.is_some_and(|d| d.is_bounded()),
            sort: request.sort,
        };
        let query = self.builder.build(&shape);
        let binds = query.bind(focal.local, &counterparts, request.date.as_ref())?;
        debug!(sql = %query.text, binds = binds.len(), "executing");

        let edges = execute(&self.pool, &query, &binds, |row| {
            map_row(row, focal.local, &focal.namespace, &self.namespaces, &self.format)
        })?;
        debug!(rows = edges.len(), "transactions fetched");
        Ok(EntityLookup::Found(TransactionResultSet::new(edges)))
    }

    // Transactions never cross namespaces, so only the filter entries that
    // share the focal namespace can match.
    fn counterparts_in(
        &self,
        namespace: &Namespace,
        filter: &[GlobalEntityId],
    ) -> std::result::Result<Vec<LocalEntityId>, Degradation> {
        let mut partitioned = partition_by_namespace(&self.namespaces, filter);
        let Some(entries) = partitioned.remove(namespace) else {
            debug!(%namespace, "no counterparts in namespace");
            return Err(Degradation::EmptyFilterPartition(namespace.clone()));
        };
        let mut counterparts = Vec::with_capacity(entries.len());
        for entry in &entries {
            match local_number(&self.namespaces, entry) {
                Some(local) => counterparts.push(local),
                None => warn!(id = %entry, "failed to convert linked id to number"),
            }
        }
        if counterparts.is_empty() {
            return Err(Degradation::UnresolvableFilter(namespace.clone()));
        }
        Ok(counterparts)
    }
}
