use rust_decimal::Decimal;
use serde::Serialize;

/// Every bundle's data: the request echo plus the bundle-specific body.
#[derive(Debug, Clone, Serialize)]
pub struct BundleData<T> {
    #[serde(flatten)]
    pub request: RequestData,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestData {
    pub filter: String,
    /// False when the caller's filter was unknown and `all` was used instead.
    pub filter_recognized: bool,
    pub range: RangeData,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeData {
    /// `None` for an unbounded start.
    pub start: Option<String>,
    pub end: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyPointRow {
    pub date: String,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySection {
    pub days: Vec<DailyPointRow>,
    pub net_total: Decimal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub current_period_total: Decimal,
    pub prior_period_total: Decimal,
    pub percent_change: Decimal,
    pub direction: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTrendRow {
    pub category: String,
    #[serde(flatten)]
    pub comparison: ComparisonRow,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendsSection {
    pub prior_range: RangeData,
    #[serde(flatten)]
    pub overall: ComparisonRow,
    pub categories: Vec<CategoryTrendRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavingsSection {
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub net_savings: Decimal,
    pub prior_net_savings: Decimal,
    pub delta: Decimal,
    pub percent_change: Decimal,
    pub direction: String,
    pub savings_balance: Decimal,
    pub running_total: Vec<DailyPointRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketRow {
    pub total: Decimal,
    pub count: usize,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroceryVsRestaurantSection {
    pub grocery: BucketRow,
    pub restaurant: BucketRow,
    pub grocery_share: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopCategoryRow {
    pub category: String,
    pub spent: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSection {
    pub total_spent: Decimal,
    pub total_income: Decimal,
    pub net: Decimal,
    pub transaction_count: usize,
    pub receipt_count: usize,
    pub average_spend: Decimal,
    pub top_category: Option<TopCategoryRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountSection {
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSection {
    pub daily: DailySection,
    pub trends: TrendsSection,
    pub savings: SavingsSection,
    pub grocery_vs_restaurant: GroceryVsRestaurantSection,
    pub stats: StatsSection,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub timestamp: String,
    pub amount: Decimal,
    pub category: String,
    pub merchant: String,
    pub account_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptItemRow {
    pub name: String,
    pub category: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptRow {
    pub id: String,
    pub timestamp: String,
    pub total: Decimal,
    pub items: Vec<ReceiptItemRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTagRow {
    pub category: String,
    pub bucket: Option<String>,
    pub count: usize,
    pub net_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceRow {
    pub account_id: String,
    pub name: String,
    pub kind: String,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibrarySection {
    pub transactions: Vec<TransactionRow>,
    pub receipts: Vec<ReceiptRow>,
    pub categories: Vec<CategoryTagRow>,
    pub balances: Vec<BalanceRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvalidateData {
    pub scope: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReloadData {
    pub source: String,
    pub previous_generation: u64,
    pub generation: u64,
    pub transaction_count: usize,
}
