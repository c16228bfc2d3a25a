use chrono::NaiveDate;

use ledgerlink::error::LedgerlinkError;
use ledgerlink::model::{DateRange, LocalEntityId, SortMode};
use ledgerlink::query::{BindSlot, BindValue, QueryBuilder, QueryShape};
use ledgerlink::settings::Dialect;

fn sqlite() -> QueryBuilder {
    QueryBuilder::new("UserTransactions", Dialect::Sqlite)
}

#[test]
fn plain_query_matches_either_endpoint() {
    let query = sqlite().build(&QueryShape::default());
    assert_eq!(
        query.text,
        "SELECT TxId, SenderId, ReceiverId, TxTime, NativeAmt, NormAmt FROM UserTransactions \
         WHERE ((SenderId = ?) OR (ReceiverId = ?))"
    );
    assert_eq!(query.slots, vec![BindSlot::Focal, BindSlot::Focal]);
}

#[test]
fn full_shape_for_sql_server() {
    let builder = QueryBuilder::new("Bitcoin.dbo.UserTransactions", Dialect::SqlServer);
    let query = builder.build(&QueryShape {
        counterparts: 2,
        cap: Some(10),
        date_range: true,
        sort: Some(SortMode::Amount),
    });
    assert_eq!(
        query.text,
        "SELECT TOP 10 TxId, SenderId, ReceiverId, TxTime, NativeAmt, NormAmt FROM Bitcoin.dbo.UserTransactions \
         WHERE ((SenderId = ? AND ReceiverId IN (?, ?)) OR (ReceiverId = ? AND SenderId IN (?, ?))) \
         AND TxTime BETWEEN ? AND ? ORDER BY NormAmt DESC"
    );
}

#[test]
fn sqlite_compares_timestamps_as_instants() {
    let query = sqlite().build(&QueryShape { date_range: true, ..QueryShape::default() });
    assert!(
        query.text.ends_with(" AND datetime(TxTime) BETWEEN datetime(?) AND datetime(?)"),
        "{}",
        query.text
    );
    assert_eq!(query.placeholder_count(), 4);
}

#[test]
fn sqlite_cap_goes_last() {
    let query = sqlite().build(&QueryShape {
        cap: Some(10),
        sort: Some(SortMode::Date),
        ..QueryShape::default()
    });
    assert!(query.text.ends_with("ORDER BY datetime(TxTime) ASC LIMIT 10"), "{}", query.text);
    assert!(!query.text.contains("TOP"));
}

#[test]
fn no_cap_no_modifier() {
    for dialect in [Dialect::Sqlite, Dialect::SqlServer] {
        let query = QueryBuilder::new("UserTransactions", dialect).build(&QueryShape::default());
        assert!(!query.text.contains("TOP"));
        assert!(!query.text.contains("LIMIT"));
    }
}

#[test]
fn sort_clause_selection() {
    let sql_server = QueryBuilder::new("UserTransactions", Dialect::SqlServer);
    let by_date = sql_server.build(&QueryShape { sort: Some(SortMode::Date), ..QueryShape::default() });
    assert!(by_date.text.ends_with("ORDER BY TxTime ASC"));
    let by_date = sqlite().build(&QueryShape { sort: Some(SortMode::Date), ..QueryShape::default() });
    assert!(by_date.text.ends_with("ORDER BY datetime(TxTime) ASC"));
    let by_amount = sqlite().build(&QueryShape { sort: Some(SortMode::Amount), ..QueryShape::default() });
    assert!(by_amount.text.ends_with("ORDER BY NormAmt DESC"));
    let unsorted = sqlite().build(&QueryShape::default());
    assert!(!unsorted.text.contains("ORDER BY"));
}

#[test]
fn placeholder_count_follows_shape() {
    for counterparts in 0..6 {
        for date_range in [false, true] {
            let query = sqlite().build(&QueryShape {
                counterparts,
                date_range,
                ..QueryShape::default()
            });
            let expected = 2 * counterparts + if date_range { 2 } else { 0 } + 2;
            assert_eq!(query.placeholder_count(), expected);
            assert_eq!(query.slots.len(), expected);
        }
    }
}

#[test]
fn slots_repeat_focal_and_counterparts() {
    let query = sqlite().build(&QueryShape {
        counterparts: 2,
        date_range: true,
        ..QueryShape::default()
    });
    assert_eq!(
        query.slots,
        vec![
            BindSlot::Focal,
            BindSlot::Counterpart(0),
            BindSlot::Counterpart(1),
            BindSlot::Focal,
            BindSlot::Counterpart(0),
            BindSlot::Counterpart(1),
            BindSlot::RangeStart,
            BindSlot::RangeEnd,
        ]
    );
}

#[test]
fn bind_fills_slots_in_order() {
    let query = sqlite().build(&QueryShape {
        counterparts: 2,
        date_range: true,
        ..QueryShape::default()
    });
    let start = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let end = NaiveDate::from_ymd_opt(2014, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let focal = LocalEntityId::new(42);
    let counterparts = [LocalEntityId::new(7), LocalEntityId::new(9)];
    let values = query
        .bind(focal, &counterparts, Some(&DateRange::between(start, end)))
        .expect("bind");
    assert_eq!(
        values,
        vec![
            BindValue::Id(focal),
            BindValue::Id(counterparts[0]),
            BindValue::Id(counterparts[1]),
            BindValue::Id(focal),
            BindValue::Id(counterparts[0]),
            BindValue::Id(counterparts[1]),
            BindValue::Time(start),
            BindValue::Time(end),
        ]
    );
}

#[test]
fn missing_bounds_become_sentinels() {
    let query = sqlite().build(&QueryShape { date_range: true, ..QueryShape::default() });
    let start = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let values = query
        .bind(LocalEntityId::new(1), &[], Some(&DateRange::new(Some(start), None)))
        .expect("bind");
    let max = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap().and_hms_opt(23, 59, 59).unwrap();
    assert_eq!(values[2], BindValue::Time(start));
    assert_eq!(values[3], BindValue::Time(max));

    let values = query
        .bind(LocalEntityId::new(1), &[], Some(&DateRange::new(None, Some(start))))
        .expect("bind");
    let min = NaiveDate::from_ymd_opt(1, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    assert_eq!(values[2], BindValue::Time(min));
    assert_eq!(values[3], BindValue::Time(start));
}

#[test]
fn focal_only_example() {
    // acct:ns1:42, no range, no filter, sorted by date, capped at 10
    let query = sqlite().build(&QueryShape {
        cap: Some(10),
        sort: Some(SortMode::Date),
        ..QueryShape::default()
    });
    let values = query.bind(LocalEntityId::new(42), &[], None).expect("bind");
    assert_eq!(values, vec![BindValue::Id(LocalEntityId::new(42)), BindValue::Id(LocalEntityId::new(42))]);
    assert_eq!(query.placeholder_count(), 2);
}

#[test]
fn counterpart_count_must_match_shape() {
    let query = sqlite().build(&QueryShape { counterparts: 2, ..QueryShape::default() });
    let err = query
        .bind(LocalEntityId::new(1), &[LocalEntityId::new(2)], None)
        .expect_err("one counterpart for two slots");
    assert!(matches!(err, LedgerlinkError::Invariant(_)));
}
