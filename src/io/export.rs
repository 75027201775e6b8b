use std::io::Write;

use anyhow::Result;

use crate::domain::{TransactionEntry, format_cents};

/// Export transaction entries to CSV format.
/// Returns the number of data rows written.
pub fn export_transactions_csv<W: Write>(entries: &[TransactionEntry], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["id", "date", "kind", "category", "amount", "note"])?;

    let mut count = 0;
    for entry in entries {
        let tx = &entry.transaction;
        csv_writer.write_record([
            tx.id.to_string(),
            tx.occurred_at.to_rfc3339(),
            tx.kind.to_string(),
            entry.category.name.clone(),
            format_cents(tx.amount_cents),
            tx.note.clone().unwrap_or_default(),
        ])?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{Category, Kind, Transaction};

    fn sample_entry(kind: Kind, amount: i64, category: &str) -> TransactionEntry {
        let cat = Category::new(category, kind);
        TransactionEntry {
            transaction: Transaction::new(Uuid::new_v4(), cat.id, kind, amount, Utc::now()),
            category: cat,
        }
    }

    #[test]
    fn test_export_empty_writes_header_only() {
        let mut out = Vec::new();
        let count = export_transactions_csv(&[], &mut out).unwrap();

        assert_eq!(count, 0);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("id,date,kind,category,amount,note"));
    }

    #[test]
    fn test_export_rows() {
        let entries = vec![
            sample_entry(Kind::Income, 100000, "Salary"),
            sample_entry(Kind::Expense, 30000, "Food"),
        ];

        let mut out = Vec::new();
        let count = export_transactions_csv(&entries, &mut out).unwrap();

        assert_eq!(count, 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("income,Salary,1000.00"));
        assert!(text.contains("expense,Food,300.00"));
    }
}
