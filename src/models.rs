//! Data models for the bounty board API
//!
//! The board speaks camelCase JSON. Timestamps arrive as epoch milliseconds,
//! except `deadline` (milliseconds or ISO-8601) and `payment.processedAt`
//! (ISO-8601). Each model has an explicit `from_json` that validates the
//! required fields and fails with [`BoardError::Decode`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BoardError, Result};

pub(crate) use self::de::timestamp_from_value;

/// Smallest-unit factor for USDC rewards (micro-USDC)
pub const USDC_UNIT: u64 = 1_000_000;

/// Format a micro-USDC amount for display, e.g. `25000000` -> `"25.00 USDC"`
pub fn format_usdc(amount: u64) -> String {
    let whole = amount / USDC_UNIT;
    let cents = (amount % USDC_UNIT) / (USDC_UNIT / 100);
    format!("{}.{:02} USDC", whole, cents)
}

/// Parse a display string produced by [`format_usdc`] back into micro-USDC
pub fn parse_usdc(s: &str) -> Option<u64> {
    let s = s.trim();
    let number = s.strip_suffix("USDC").unwrap_or(s).trim();
    let (whole, frac) = number.split_once('.').unwrap_or((number, ""));

    if frac.len() > 6 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: u64 = whole.parse().ok()?;
    let frac: u64 = if frac.is_empty() {
        0
    } else {
        format!("{:0<6}", frac).parse().ok()?
    };

    whole.checked_mul(USDC_UNIT)?.checked_add(frac)
}

/// Lifecycle state of a bounty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BountyStatus {
    Open,
    Claimed,
    Submitted,
    Completed,
    /// Status string this SDK does not know about
    Unknown(String),
}

impl BountyStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BountyStatus::Open => "open",
            BountyStatus::Claimed => "claimed",
            BountyStatus::Submitted => "submitted",
            BountyStatus::Completed => "completed",
            BountyStatus::Unknown(s) => s,
        }
    }

    /// Status only moves forward: open -> claimed -> submitted -> completed
    pub fn can_transition_to(&self, next: &BountyStatus) -> bool {
        matches!(
            (self, next),
            (BountyStatus::Open, BountyStatus::Claimed)
                | (BountyStatus::Claimed, BountyStatus::Submitted)
                | (BountyStatus::Submitted, BountyStatus::Completed)
        )
    }
}

impl Default for BountyStatus {
    fn default() -> Self {
        BountyStatus::Unknown("unknown".to_string())
    }
}

impl From<String> for BountyStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "open" => BountyStatus::Open,
            "claimed" => BountyStatus::Claimed,
            "submitted" => BountyStatus::Submitted,
            "completed" => BountyStatus::Completed,
            _ => BountyStatus::Unknown(s),
        }
    }
}

impl From<BountyStatus> for String {
    fn from(status: BountyStatus) -> Self {
        status.as_str().to_string()
    }
}

impl FromStr for BountyStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(BountyStatus::from(s.to_string()))
    }
}

impl fmt::Display for BountyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work submitted against a claimed bounty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub content: String,
    #[serde(default)]
    pub proof: Option<String>,
    #[serde(default, alias = "address")]
    pub submitted_by: Option<String>,
    #[serde(default, deserialize_with = "de::timestamp_opt")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| BoardError::decode(format!("submission: {}", e)))
    }
}

/// Payout record of a completed bounty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default = "default_chain")]
    pub chain: String,
    #[serde(default = "default_token")]
    pub token: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub tx_hash: String,
    #[serde(default, deserialize_with = "de::amount")]
    pub gross_reward: u64,
    #[serde(default, deserialize_with = "de::amount")]
    pub net_reward: u64,
    #[serde(default, deserialize_with = "de::amount")]
    pub fee: u64,
    #[serde(default = "default_fee_percent")]
    pub fee_percent: String,
    #[serde(default, deserialize_with = "de::timestamp_opt")]
    pub processed_at: Option<DateTime<Utc>>,
}

fn default_chain() -> String {
    "base".to_string()
}

fn default_token() -> String {
    "USDC".to_string()
}

fn default_fee_percent() -> String {
    "0%".to_string()
}

/// A bounty on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounty {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub uuid: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub description: String,
    /// Reward in micro-USDC
    #[serde(default, deserialize_with = "de::amount")]
    pub reward: u64,
    #[serde(default, rename = "rewardFormatted")]
    pub reward_label: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub status: BountyStatus,
    #[serde(default, deserialize_with = "de::nullable")]
    pub creator: String,
    #[serde(default, deserialize_with = "de::timestamp_opt")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub requirements: Vec<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub submissions: Vec<Submission>,
    #[serde(default)]
    pub claimed_by: Option<String>,
    #[serde(default, deserialize_with = "de::timestamp_opt")]
    pub claimed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::timestamp_opt")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::payment")]
    pub payment: Option<Payment>,
}

impl Bounty {
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| BoardError::decode(format!("bounty: {}", e)))
    }

    /// Decode a list response, failing on the first malformed entry
    pub fn list_from_json(value: Value) -> Result<Vec<Self>> {
        let entries = match value {
            Value::Array(entries) => entries,
            // Some deployments wrap the list: {"bounties": [...]}
            Value::Object(mut map) => match map.remove("bounties") {
                Some(Value::Array(entries)) => entries,
                _ => return Err(BoardError::decode("expected a list of bounties")),
            },
            _ => return Err(BoardError::decode("expected a list of bounties")),
        };
        entries.into_iter().map(Self::from_json).collect()
    }

    /// Display string for the reward, as sent by the server or derived locally
    pub fn reward_formatted(&self) -> String {
        match &self.reward_label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => format_usdc(self.reward),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == BountyStatus::Open
    }

    /// True if the bounty carries at least one of `tags`
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }

    pub fn is_claimed_by(&self, wallet: &str) -> bool {
        self.claimed_by
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(wallet))
    }

    /// Claim fields are present exactly when the bounty has left `open`
    pub fn is_consistent(&self) -> bool {
        let claimed = self.claimed_by.is_some() && self.claimed_at.is_some();
        let unclaimed = self.claimed_by.is_none() && self.claimed_at.is_none();
        match self.status {
            BountyStatus::Open => unclaimed,
            BountyStatus::Unknown(_) => true,
            _ => claimed,
        }
    }
}

/// Board-wide statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    #[serde(deserialize_with = "de::amount")]
    pub total_bounties: u64,
    #[serde(deserialize_with = "de::amount")]
    pub open_bounties: u64,
    #[serde(deserialize_with = "de::amount")]
    pub claimed_bounties: u64,
    #[serde(deserialize_with = "de::amount")]
    pub completed_bounties: u64,
    #[serde(deserialize_with = "de::amount")]
    pub total_payouts: u64,
    #[serde(rename = "totalPayoutsFormatted")]
    pub total_payouts_label: Option<String>,
}

impl Stats {
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| BoardError::decode(format!("stats: {}", e)))
    }

    pub fn total_payouts_formatted(&self) -> String {
        match &self.total_payouts_label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => format_usdc(self.total_payouts),
        }
    }

    /// Submitted-but-unpaid bounties are not counted separately, so the
    /// per-state counts may sum to less than the total.
    pub fn is_consistent(&self) -> bool {
        self.open_bounties
            .checked_add(self.claimed_bounties)
            .and_then(|n| n.checked_add(self.completed_bounties))
            .is_some_and(|n| n <= self.total_bounties)
    }
}

/// Response of a successful claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResult {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub status: BountyStatus,
    pub claimed_by: String,
    #[serde(deserialize_with = "de::timestamp")]
    pub claimed_at: DateTime<Utc>,
}

impl ClaimResult {
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| BoardError::decode(format!("claim: {}", e)))
    }
}

/// Response of a successful submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub id: String,
    pub status: BountyStatus,
    pub submission_id: String,
}

impl SubmitResult {
    /// The submit endpoint returns the updated bounty; the new submission is
    /// the last one in its list.
    pub fn from_json(value: Value) -> Result<Self> {
        let bounty = Bounty::from_json(value)?;
        let submission = bounty
            .submissions
            .last()
            .ok_or_else(|| BoardError::decode("submit: response has no submissions"))?;

        Ok(SubmitResult {
            submission_id: submission.id.clone(),
            id: bounty.id,
            status: bounty.status,
        })
    }
}

/// Well-known metadata document describing the board API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDiscovery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ApiDiscovery {
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| BoardError::decode(format!("discovery: {}", e)))
    }
}

/// Lenient field decoders for the board's loosely typed JSON
mod de {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::Payment;

    /// `null` decodes to the default value
    pub fn nullable<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }

    /// Identifiers are strings, but numbers are accepted
    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match Value::deserialize(d)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(D::Error::custom(format!("invalid id: {}", other))),
        }
    }

    /// Amounts may be integers, floats or numeric strings; fractions truncate
    pub fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(d)?;
        amount_from_value(&value).map_err(D::Error::custom)
    }

    pub(super) fn amount_from_value(value: &Value) -> Result<u64, String> {
        let float = match value {
            Value::Null => return Ok(0),
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    return Ok(v);
                }
                n.as_f64().unwrap_or(f64::NAN)
            }
            Value::String(s) if s.trim().is_empty() => return Ok(0),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid amount: {:?}", s))?,
            other => return Err(format!("invalid amount: {}", other)),
        };

        if !float.is_finite() || float < 0.0 {
            return Err(format!("invalid amount: {}", value));
        }
        Ok(float.trunc() as u64)
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        timestamp_opt(d)?.ok_or_else(|| D::Error::custom("missing timestamp"))
    }

    pub fn timestamp_opt<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Value::deserialize(d)?;
        timestamp_from_value(&value).map_err(D::Error::custom)
    }

    /// Epoch milliseconds (number or numeric string) or an ISO-8601 string
    pub(crate) fn timestamp_from_value(value: &Value) -> Result<Option<DateTime<Utc>>, String> {
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => {
                let millis = n
                    .as_i64()
                    .or_else(|| n.as_f64().map(|f| f as i64))
                    .ok_or_else(|| format!("invalid timestamp: {}", n))?;
                from_millis(millis).map(Some)
            }
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => parse_timestamp_str(s).map(Some),
            other => Err(format!("invalid timestamp: {}", other)),
        }
    }

    fn from_millis(millis: i64) -> Result<DateTime<Utc>, String> {
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| format!("timestamp out of range: {}", millis))
    }

    fn parse_timestamp_str(s: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(millis) = s.parse::<i64>() {
            return from_millis(millis);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(naive.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(naive.and_utc());
            }
        }
        Err(format!("invalid timestamp: {:?}", s))
    }

    /// Payments without a chain are placeholders and decode to `None`
    pub fn payment<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Payment>, D::Error> {
        let value = Value::deserialize(d)?;
        let has_chain = value
            .get("chain")
            .and_then(Value::as_str)
            .is_some_and(|c| !c.is_empty());
        if !has_chain {
            return Ok(None);
        }
        serde_json::from_value(value).map(Some).map_err(D::Error::custom)
    }
}
