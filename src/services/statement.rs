//! Statement view: filter, summarize, paginate and export a user's
//! transactions. Everything here except [`load_transactions`] is a pure
//! function of its inputs and never reorders records.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::documents;
use crate::errors::AppError;
use crate::models::{fields, iso_timestamp, Transaction, TypeFilter};

pub const NOTHING_TO_EXPORT: &str = "No transactions to export.";

#[derive(Debug, Clone, Default)]
pub struct StatementQuery {
    pub search: String,
    pub type_filter: TypeFilter,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl StatementQuery {
    fn lower_bound(&self) -> Option<DateTime<Utc>> {
        self.from
            .and_then(|d| d.and_hms_milli_opt(0, 0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// `to` is inclusive through the last millisecond of the day.
    fn upper_bound(&self) -> Option<DateTime<Utc>> {
        self.to
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
            .map(|dt| dt.and_utc())
    }
}

pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    query: &StatementQuery,
) -> Vec<&'a Transaction> {
    let from = query.lower_bound();
    let to = query.upper_bound();
    let needle = if query.search.trim().is_empty() {
        None
    } else {
        Some(query.search.to_lowercase())
    };

    transactions
        .iter()
        .filter(|t| query.type_filter.matches(t))
        .filter(|t| match from {
            Some(from) => t.parsed_date().is_some_and(|d| d >= from),
            None => true,
        })
        .filter(|t| match to {
            Some(to) => t.parsed_date().is_some_and(|d| d <= to),
            None => true,
        })
        .filter(|t| match &needle {
            Some(needle) => matches_search(t, needle),
            None => true,
        })
        .collect()
}

fn matches_search(tx: &Transaction, needle: &str) -> bool {
    let haystacks = [
        tx.id.as_str(),
        tx.party().unwrap_or_default(),
        tx.note.as_deref().unwrap_or_default(),
    ];
    haystacks.iter().any(|h| h.to_lowercase().contains(needle))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_credit: f64,
    pub total_debit: f64,
    pub net: f64,
}

/// Credits versus everything else; missing amounts count as zero.
pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (total_credit, total_debit) =
        transactions
            .into_iter()
            .fold((0.0, 0.0), |(credit, debit), t| {
                if t.is_credit() {
                    (credit + t.amount_or_zero(), debit)
                } else {
                    (credit, debit + t.amount_or_zero())
                }
            });

    Summary {
        total_credit,
        total_debit,
        net: total_credit - total_debit,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    /// 1-based index of the first visible row, 0 when nothing matches.
    pub showing_from: usize,
    pub showing_to: usize,
}

pub fn total_pages(rows: usize, page_size: usize) -> usize {
    rows.div_ceil(page_size.max(1)).max(1)
}

/// A page past the end (or page 0) snaps back to the first page.
pub fn resolve_page(requested: usize, total_pages: usize) -> usize {
    if requested == 0 || requested > total_pages {
        1
    } else {
        requested
    }
}

pub fn paginate<T: Clone>(items: &[T], requested: usize, page_size: usize) -> (Vec<T>, PageInfo) {
    let page_size = page_size.max(1);
    let pages = total_pages(items.len(), page_size);
    let page = resolve_page(requested, pages);

    let start = ((page - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    let info = PageInfo {
        page,
        page_size,
        total_pages: pages,
        total_rows: items.len(),
        showing_from: if items.is_empty() { 0 } else { start + 1 },
        showing_to: end,
    };
    (items[start..end].to_vec(), info)
}

/// One flattened CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub party: String,
    pub note: String,
}

impl ExportRow {
    pub const HEADER: [&'static str; 6] = ["id", "date", "type", "amount", "party", "note"];

    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            date: tx.parsed_date().map(|d| iso_timestamp(&d)).unwrap_or_default(),
            kind: tx.kind.clone(),
            amount: tx.amount.map(|a| a.to_string()).unwrap_or_default(),
            party: tx.party().unwrap_or_default().to_string(),
            note: tx.note.clone().unwrap_or_default(),
        }
    }

    fn values(&self) -> [&str; 6] {
        [
            self.id.as_str(),
            self.date.as_str(),
            self.kind.as_str(),
            self.amount.as_str(),
            self.party.as_str(),
            self.note.as_str(),
        ]
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Header row plus one quoted row per record, or `None` for no records.
pub fn to_csv(rows: &[ExportRow]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(ExportRow::HEADER.join(","));
    for row in rows {
        let quoted: Vec<String> = row.values().iter().map(|v| quote(v)).collect();
        lines.push(quoted.join(","));
    }
    Some(lines.join("\n"))
}

pub fn export_csv(filtered: &[&Transaction]) -> Result<String, AppError> {
    let rows: Vec<ExportRow> = filtered
        .iter()
        .map(|t| ExportRow::from_transaction(t))
        .collect();
    to_csv(&rows).ok_or_else(|| AppError::NothingToExport(NOTHING_TO_EXPORT.to_string()))
}

pub fn export_filename(uid: Option<&str>, now: &DateTime<Utc>) -> String {
    format!(
        "statement_{}_{}.csv",
        uid.unwrap_or("anon"),
        now.timestamp_millis()
    )
}

/// Newest first. Records without a usable date keep their relative order
/// after every dated record.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| match (a.parsed_date(), b.parsed_date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Preview data shown when a user has no transactions of their own.
pub fn sample_transactions(now: &DateTime<Utc>) -> Vec<Transaction> {
    let sample = |id: &str, days_ago: i64, amount: f64, kind: &str, to: &str, from: &str, note: &str| {
        Transaction {
            id: id.to_string(),
            date: Some(iso_timestamp(&(*now - Duration::days(days_ago)))),
            amount: Some(amount),
            kind: kind.to_string(),
            to: Some(to.to_string()),
            from: Some(from.to_string()),
            note: Some(note.to_string()),
        }
    };

    vec![
        sample("TXN1001", 1, 1200.0, "Debit", "ravi@hdfc", "varsha@ybl", "Dinner"),
        sample("TXN1002", 2, 5000.0, "Credit", "varsha@ybl", "salary@bank", "Salary"),
        sample("TXN1003", 3, 350.0, "Debit", "paytm@upi", "varsha@ybl", "Groceries"),
        sample("TXN1004", 8, 2999.0, "Debit", "flipkart@upi", "varsha@ybl", "Shoes"),
        sample("TXN1005", 15, 150.0, "Debit", "coffee@upi", "varsha@ybl", "Coffee"),
        sample("TXN1006", 30, 20000.0, "Credit", "varsha@ybl", "bonus@bank", "Bonus"),
    ]
}

#[derive(Debug, Clone)]
pub struct LoadedTransactions {
    pub transactions: Vec<Transaction>,
    /// True when the preview set stands in for real data.
    pub sample: bool,
}

/// Stored transactions newest first. Anonymous sessions, missing documents,
/// empty histories and store failures yield the sample set when
/// `sample_fallback` is on, an empty list otherwise.
pub fn load_transactions(
    conn: &Connection,
    uid: Option<&str>,
    sample_fallback: bool,
    now: &DateTime<Utc>,
) -> LoadedTransactions {
    let stored = match uid {
        Some(uid) => documents::get_document(conn, uid)
            .and_then(|doc| match doc {
                Some(doc) => doc.list::<Transaction>(fields::TRANSACTIONS),
                None => Ok(Vec::new()),
            })
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, uid, "failed to load transactions");
                Vec::new()
            }),
        None => Vec::new(),
    };

    if stored.is_empty() && sample_fallback {
        return LoadedTransactions {
            transactions: sample_transactions(now),
            sample: true,
        };
    }

    let mut transactions = stored;
    sort_newest_first(&mut transactions);
    LoadedTransactions {
        transactions,
        sample: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use serde_json::json;

    fn tx(id: &str, date: &str, amount: f64, kind: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: Some(date.to_string()),
            amount: Some(amount),
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    fn fixture() -> Vec<Transaction> {
        vec![
            Transaction {
                to: Some("ravi@hdfc".to_string()),
                note: Some("Dinner".to_string()),
                ..tx("TXN1", "2025-03-10T20:15:00.000Z", 1200.0, "Debit")
            },
            Transaction {
                to: Some("varsha@ybl".to_string()),
                from: Some("salary@bank".to_string()),
                note: Some("Salary".to_string()),
                ..tx("TXN2", "2025-03-09T09:00:00.000Z", 5000.0, "credit")
            },
            Transaction {
                from: Some("Paytm@UPI".to_string()),
                ..tx("TXN3", "2025-03-01T00:00:00.000Z", 350.0, "Debit")
            },
            tx("TXN4", "not a date", 99.0, "Debit"),
            Transaction {
                date: None,
                ..tx("TXN5", "", 1.0, "Credit")
            },
        ]
    }

    fn ids(txs: &[&Transaction]) -> Vec<String> {
        txs.iter().map(|t| t.id.clone()).collect()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_no_filters_is_identity() {
        let txs = fixture();
        let out = filter_transactions(&txs, &StatementQuery::default());
        assert_eq!(ids(&out), vec!["TXN1", "TXN2", "TXN3", "TXN4", "TXN5"]);
    }

    #[test]
    fn test_type_filter_is_case_insensitive() {
        let txs = fixture();
        let query = StatementQuery {
            type_filter: TypeFilter::Credit,
            ..Default::default()
        };
        let out = filter_transactions(&txs, &query);
        assert_eq!(ids(&out), vec!["TXN2", "TXN5"]);
        assert!(out.iter().all(|t| t.kind.eq_ignore_ascii_case("credit")));

        let query = StatementQuery {
            type_filter: TypeFilter::Debit,
            ..Default::default()
        };
        let out = filter_transactions(&txs, &query);
        assert!(out.iter().all(|t| t.kind.eq_ignore_ascii_case("debit")));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_date_range_is_inclusive_and_drops_bad_dates() {
        let txs = fixture();
        let query = StatementQuery {
            from: Some(date("2025-03-01")),
            to: Some(date("2025-03-09")),
            ..Default::default()
        };
        assert_eq!(ids(&filter_transactions(&txs, &query)), vec!["TXN2", "TXN3"]);

        let query = StatementQuery {
            to: Some(date("2025-03-10")),
            ..Default::default()
        };
        // 20:15 on the 10th still falls inside an end date of the 10th.
        assert_eq!(ids(&filter_transactions(&txs, &query)), vec!["TXN1", "TXN2", "TXN3"]);

        let query = StatementQuery {
            from: Some(date("2025-03-02")),
            ..Default::default()
        };
        assert_eq!(ids(&filter_transactions(&txs, &query)), vec!["TXN1", "TXN2"]);
    }

    #[test]
    fn test_search_matches_id_party_and_note() {
        let txs = fixture();
        let search = |s: &str| {
            let query = StatementQuery {
                search: s.to_string(),
                ..Default::default()
            };
            ids(&filter_transactions(&txs, &query))
        };

        assert_eq!(search("txn4"), vec!["TXN4"]);
        assert_eq!(search("DINNER"), vec!["TXN1"]);
        assert_eq!(search("paytm"), vec!["TXN3"]);
        // `to` wins over `from`, so the sender of TXN2 is not searched.
        assert!(search("salary@bank").is_empty());
        assert_eq!(search("salary"), vec!["TXN2"]);
        assert_eq!(search("   ").len(), 5);
    }

    #[test]
    fn test_summary_over_filtered_set() {
        let txs = fixture();
        let summary = summarize(filter_transactions(&txs, &StatementQuery::default()));
        assert_eq!(summary.total_credit, 5001.0);
        assert_eq!(summary.total_debit, 1649.0);
        assert_eq!(summary.net, 3352.0);

        let mut reversed = txs.clone();
        reversed.reverse();
        assert_eq!(summarize(&reversed), summarize(&txs));
    }

    #[test]
    fn test_summary_treats_missing_amount_as_zero() {
        let txs = vec![Transaction {
            amount: None,
            ..tx("X", "2025-01-01", 0.0, "Credit")
        }];
        assert_eq!(summarize(&txs), Summary::default());
    }

    #[test]
    fn test_pagination() {
        assert_eq!(total_pages(0, 8), 1);
        assert_eq!(total_pages(8, 8), 1);
        assert_eq!(total_pages(9, 8), 2);
        assert_eq!(resolve_page(3, 2), 1);
        assert_eq!(resolve_page(0, 2), 1);
        assert_eq!(resolve_page(2, 2), 2);

        let items: Vec<u32> = (1..=10).collect();
        let (page, info) = paginate(&items, 2, 8);
        assert_eq!(page, vec![9, 10]);
        assert_eq!(info.showing_from, 9);
        assert_eq!(info.showing_to, 10);
        assert_eq!(info.total_pages, 2);

        let (page, info) = paginate(&items, 5, 8);
        assert_eq!(info.page, 1);
        assert_eq!(page.len(), 8);

        let (page, info) = paginate::<u32>(&[], 1, 8);
        assert!(page.is_empty());
        assert_eq!((info.showing_from, info.showing_to, info.total_pages), (0, 0, 1));
    }

    #[test]
    fn test_export_csv() {
        let txs = vec![
            Transaction {
                to: Some("ravi@hdfc".to_string()),
                note: Some("Dinner \"team\"".to_string()),
                ..tx("TXN1", "2025-03-10T20:15:00Z", 1200.0, "Debit")
            },
            Transaction {
                from: Some("salary@bank".to_string()),
                amount: None,
                ..tx("TXN2", "garbage", 0.0, "Credit")
            },
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();
        let csv = export_csv(&refs).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,date,type,amount,party,note");
        assert_eq!(
            lines[1],
            r#""TXN1","2025-03-10T20:15:00.000Z","Debit","1200","ravi@hdfc","Dinner ""team""""#
        );
        assert_eq!(lines[2], r#""TXN2","","Credit","","salary@bank","""#);
    }

    #[test]
    fn test_export_empty_is_refused() {
        let err = export_csv(&[]).unwrap_err();
        assert!(matches!(err, AppError::NothingToExport(ref m) if m == NOTHING_TO_EXPORT));
    }

    #[test]
    fn test_export_filename() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(export_filename(Some("u1"), &now), "statement_u1_1700000000123.csv");
        assert_eq!(export_filename(None, &now), "statement_anon_1700000000123.csv");
    }

    #[test]
    fn test_sort_newest_first_puts_undated_last() {
        let mut txs = fixture();
        txs.reverse();
        sort_newest_first(&mut txs);
        let order: Vec<&str> = txs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["TXN1", "TXN2", "TXN3", "TXN5", "TXN4"]);
    }

    #[test]
    fn test_load_transactions_fallbacks() {
        let conn = db::init_db(":memory:").unwrap();
        let now = Utc::now();

        let loaded = load_transactions(&conn, None, true, &now);
        assert!(loaded.sample);
        assert_eq!(loaded.transactions.len(), 6);

        let loaded = load_transactions(&conn, None, false, &now);
        assert!(!loaded.sample);
        assert!(loaded.transactions.is_empty());

        let seed = json!({"transactions": [
            {"id": "A", "date": "2025-01-01T00:00:00Z", "amount": 1, "type": "Debit"},
            {"id": "B", "date": "2025-02-01T00:00:00Z", "amount": 2, "type": "Credit"}
        ]});
        documents::set_merge(&conn, "u1", None, seed.as_object().cloned().unwrap()).unwrap();

        let loaded = load_transactions(&conn, Some("u1"), true, &now);
        assert!(!loaded.sample);
        let order: Vec<&str> = loaded.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["B", "A"]);
    }

    #[test]
    fn test_malformed_records_keep_the_real_history() {
        let conn = db::init_db(":memory:").unwrap();
        let seed = json!({"transactions": [
            {"id": "REAL1", "date": "2025-03-01T10:00:00Z", "amount": 10, "type": "Debit"},
            {"id": "REAL2", "date": 1700000000000i64, "amount": 20, "type": "Credit"},
            {"id": "REAL3", "date": "2025-02-01", "amount": 30, "type": null},
            {"id": "REAL4", "date": "someday", "amount": 40, "type": "Debit"},
            "garbage"
        ]});
        documents::set_merge(&conn, "u1", None, seed.as_object().cloned().unwrap()).unwrap();

        let loaded = load_transactions(&conn, Some("u1"), true, &Utc::now());
        assert!(!loaded.sample);
        let all: Vec<&Transaction> = loaded.transactions.iter().collect();
        assert_eq!(ids(&all), vec!["REAL1", "REAL3", "REAL2", "REAL4"]);

        // The undated record only drops out once a date bound is set.
        let query = StatementQuery {
            from: Some(date("2023-01-01")),
            ..Default::default()
        };
        assert_eq!(
            ids(&filter_transactions(&loaded.transactions, &query)),
            vec!["REAL1", "REAL3", "REAL2"]
        );
    }

    #[test]
    fn test_sample_is_newest_first() {
        let now = Utc::now();
        let mut sample = sample_transactions(&now);
        let before: Vec<String> = sample.iter().map(|t| t.id.clone()).collect();
        sort_newest_first(&mut sample);
        let after: Vec<String> = sample.iter().map(|t| t.id.clone()).collect();
        assert_eq!(before, after);
    }
}
