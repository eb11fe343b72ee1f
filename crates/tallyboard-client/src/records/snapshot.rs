use std::collections::BTreeSet;

use crate::records::types::{
    AccountBalance, MAX_AMOUNT, Receipt, Transaction, within_amount_limit,
};
use crate::{ClientError, ClientResult};

/// Raw record arrays handed to the store when a new snapshot is built.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub transactions: Vec<Transaction>,
    pub receipts: Vec<Receipt>,
    pub balances: Vec<AccountBalance>,
}

/// Immutable, versioned view of the record store.
///
/// A snapshot is never mutated after construction; regenerating the store
/// builds a new snapshot with a higher generation and swaps it in whole.
#[derive(Debug)]
pub struct Snapshot {
    generation: u64,
    records: RecordSet,
}

impl Snapshot {
    pub fn build(generation: u64, records: RecordSet) -> ClientResult<Self> {
        validate(&records)?;
        Ok(Self {
            generation,
            records,
        })
    }

    pub fn empty(generation: u64) -> Self {
        Self {
            generation,
            records: RecordSet::default(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.records.transactions
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.records.receipts
    }

    pub fn balances(&self) -> &[AccountBalance] {
        &self.records.balances
    }
}

fn validate(records: &RecordSet) -> ClientResult<()> {
    let mut seen = BTreeSet::new();
    for transaction in &records.transactions {
        if transaction.id.trim().is_empty() {
            return Err(ClientError::store_corrupt("transaction with an empty id"));
        }
        if !seen.insert(transaction.id.as_str()) {
            return Err(ClientError::store_corrupt(&format!(
                "duplicate transaction id `{}`",
                transaction.id
            )));
        }
        if !within_amount_limit(transaction.amount) {
            return Err(out_of_range("transaction", &transaction.id));
        }
    }

    let mut seen_receipts = BTreeSet::new();
    for receipt in &records.receipts {
        if !seen_receipts.insert(receipt.id.as_str()) {
            return Err(ClientError::store_corrupt(&format!(
                "duplicate receipt id `{}`",
                receipt.id
            )));
        }
        let prices_in_range = receipt
            .items
            .iter()
            .all(|item| within_amount_limit(item.price));
        if !prices_in_range || !within_amount_limit(receipt.total) {
            return Err(out_of_range("receipt", &receipt.id));
        }
        if receipt.items_total() != receipt.total {
            return Err(ClientError::store_corrupt(&format!(
                "receipt `{}` total {} does not match item sum {}",
                receipt.id,
                receipt.total,
                receipt.items_total()
            )));
        }
    }

    for balance in &records.balances {
        if !within_amount_limit(balance.balance) {
            return Err(out_of_range("account", &balance.account_id));
        }
    }

    Ok(())
}

fn out_of_range(kind: &str, id: &str) -> ClientError {
    ClientError::store_corrupt(&format!(
        "{kind} `{id}` has an amount beyond the {MAX_AMOUNT} limit"
    ))
}
