use crate::executor::RawRow;
use crate::model::{
    Direction, EntityKind, Link, LinkTag, LocalEntityId, Namespace, Property, PropertyTag,
    PropertyValue, TransactionEdge,
};
use crate::namespace::{globalize, NamespaceHandler};
use crate::settings::Settings;

/// How the native amount is written into the annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationFormat {
    pub currency: String,
    pub precision: usize,
}

impl AnnotationFormat {
    pub fn new(currency: &str, precision: usize) -> Self {
        Self { currency: currency.to_string(), precision }
    }
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.currency, settings.annotation_precision)
    }
    /// `"<amount> <CUR> to <counterpart>"` or `"... from <counterpart>"`.
    pub fn annotate(&self, amount: f64, direction: Direction, counterpart: &str) -> String {
        let preposition = match direction {
            Direction::Outflowing => "to",
            Direction::Inflowing => "from",
        };
        format!(
            "{:.*} {} {} {}",
            self.precision, amount, self.currency, preposition, counterpart
        )
    }
}

/// Turns one row into an edge as seen from the focal entity.
///
/// The row is outflowing when its sender is the focal entity. The annotation
/// names the other endpoint by its local id; both endpoints are globalized
/// into `namespace` afterwards.
pub fn map_row<N: NamespaceHandler + ?Sized>(
    row: RawRow,
    focal: LocalEntityId,
    namespace: &Namespace,
    handler: &N,
    format: &AnnotationFormat,
) -> TransactionEdge {
    let direction = if row.sender == focal.to_string() {
        Direction::Outflowing
    } else {
        Direction::Inflowing
    };
    let counterpart = match direction {
        Direction::Outflowing => &row.receiver,
        Direction::Inflowing => &row.sender,
    };
    let comment = format.annotate(row.native_amount, direction, counterpart);

    let properties = vec![
        Property::new("id", PropertyValue::Text(row.transaction_id), PropertyTag::Id),
        Property::new("dt", PropertyValue::Date(row.time), PropertyTag::Date),
        Property::new("native_amount", PropertyValue::Real(row.native_amount), PropertyTag::Amount),
        Property::new("amount", PropertyValue::Real(row.normalized_amount), direction.tag()),
        Property::new("comment", PropertyValue::Text(comment), PropertyTag::Annotation),
    ];

    Link {
        tag: LinkTag::Financial,
        source: globalize(handler, namespace, &row.sender, EntityKind::Account),
        target: globalize(handler, namespace, &row.receiver, EntityKind::Account),
        properties,
    }
}
