//! # Ledger Module
//!
//! Sổ giao dịch append-only của một account. Entry là immutable, thứ tự là
//! thứ tự ghi. Ledger không validate: caller chịu trách nhiệm.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loại giao dịch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Một dòng trong ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    kind: TransactionKind,
    amount: Decimal,
}

impl LedgerEntry {
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TransactionKind::Deposit => write!(f, "Deposited: {}", self.amount),
            TransactionKind::Withdraw => write!(f, "Withdrawn: {}", self.amount),
        }
    }
}

/// Sổ giao dịch
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ghi thêm một entry
    pub fn record(&mut self, kind: TransactionKind, amount: Decimal) {
        tracing::debug!(kind = %kind, %amount, seq = self.entries.len(), "Ledger entry recorded");
        self.entries.push(LedgerEntry { kind, amount });
    }

    /// Duyệt các entry theo thứ tự ghi. Iterator clone được để duyệt lại.
    pub fn entries(&self) -> std::slice::Iter<'_, LedgerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a LedgerEntry;
    type IntoIter = std::slice::Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_preserves_order() {
        let mut ledger = Ledger::new();
        assert!(ledger.is_empty());

        ledger.record(TransactionKind::Deposit, dec!(100));
        ledger.record(TransactionKind::Withdraw, dec!(30));
        ledger.record(TransactionKind::Deposit, dec!(5.50));

        let kinds: Vec<_> = ledger.entries().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TransactionKind::Deposit,
                TransactionKind::Withdraw,
                TransactionKind::Deposit
            ]
        );
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_entries_is_restartable() {
        let mut ledger = Ledger::new();
        ledger.record(TransactionKind::Deposit, dec!(10));
        ledger.record(TransactionKind::Deposit, dec!(20));

        let view = ledger.entries();
        let first: Decimal = view.clone().map(|e| e.amount()).sum();
        let second: Decimal = view.map(|e| e.amount()).sum();
        assert_eq!(first, dec!(30));
        assert_eq!(first, second);
    }

    #[test]
    fn test_entry_display() {
        let mut ledger = Ledger::new();
        ledger.record(TransactionKind::Deposit, dec!(100));
        ledger.record(TransactionKind::Withdraw, dec!(30.25));

        let lines: Vec<String> = ledger.into_iter().map(|e| e.to_string()).collect();
        assert_eq!(lines, vec!["Deposited: 100", "Withdrawn: 30.25"]);
    }
}
