use soroban_sdk::{contracttype, vec, Address, BytesN, Env, Vec};

/// Number of balance-sheet fields carried by every report.
pub const FIELD_COUNT: u32 = 5;

/// The five encrypted balance-sheet fields of one submission.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncryptedFields {
    pub liquid_assets: BytesN<32>,
    pub total_assets: BytesN<32>,
    pub current_liabilities: BytesN<32>,
    pub total_liabilities: BytesN<32>,
    pub net_capital: BytesN<32>,
}

impl EncryptedFields {
    /// Handles in the fixed decryption order. Plaintexts returned by the
    /// gateway are decoded in this same order.
    pub fn to_vec(&self, env: &Env) -> Vec<BytesN<32>> {
        vec![
            env,
            self.liquid_assets.clone(),
            self.total_assets.clone(),
            self.current_liabilities.clone(),
            self.total_liabilities.clone(),
            self.net_capital.clone(),
        ]
    }
}

/// An institution's encrypted submission. Immutable once stored.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncryptedBalanceSheet {
    pub id: u64,
    pub institution: Address,
    pub fields: EncryptedFields,
    pub timestamp: u64,
}

/// Plaintext reveal record paired with each report.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecryptedMetrics {
    pub report_id: u64,
    pub liquid_assets: u64,
    pub total_assets: u64,
    pub current_liabilities: u64,
    pub total_liabilities: u64,
    pub net_capital: u64,
    pub is_revealed: bool,
    pub revealed_at: u64,
}

/// Lifecycle of a report as seen by the decryption protocol.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReportState {
    Submitted,
    DecryptionRequested,
    Revealed,
}

/// Market-wide encrypted snapshot produced by the last aggregation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AggregatedRiskMetrics {
    pub total_liquid_assets: Option<BytesN<32>>,
    pub total_current_liabilities: Option<BytesN<32>>,
    pub liquidity_ratio: Option<BytesN<32>>,
    pub is_initialized: bool,
    /// Number of completed aggregations; 0 until the first one.
    pub epoch: u64,
    pub report_count: u64,
    pub computed_at: u64,
}

/// What a pending oracle request resolves.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecryptionTarget {
    Report(u64),
    /// The market liquidity ratio of the given aggregation epoch.
    Market(u64),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingDecryption {
    pub request_id: u64,
    pub target: DecryptionTarget,
    pub requester: Address,
    pub requested_at: u64,
    pub resolved: bool,
}

/// Persisted reveal of the market liquidity ratio for one epoch.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketRatioResult {
    pub epoch: u64,
    pub liquidity_ratio: u64,
    pub is_revealed: bool,
    pub revealed_at: u64,
}

/// Encrypted per-institution ratios. Nothing here is plaintext.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstitutionRisk {
    pub report_id: u64,
    pub liquidity_ratio: BytesN<32>,
    pub solvency_ratio: BytesN<32>,
}
