use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Money in euro cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn checked_mul(self, quantity: u32) -> Option<Amount> {
        self.0.checked_mul(i64::from(quantity)).map(Amount)
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// `None` as soon as the running total overflows.
    pub fn checked_sum<I: IntoIterator<Item = Amount>>(amounts: I) -> Option<Amount> {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceCategory {
    #[serde(rename = "bika_kids")]
    Kids,
    #[serde(rename = "bika_maison")]
    Maison,
    #[serde(rename = "bika_vie")]
    Vie,
    #[serde(rename = "bika_travel")]
    Travel,
    #[serde(rename = "bika_seniors")]
    Seniors,
    #[serde(rename = "bika_animals")]
    Animals,
    #[serde(rename = "bika_pro")]
    Pro,
    #[serde(rename = "bika_plus")]
    Plus,
}

/// Categories in the same group can be served by one booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityGroup {
    Childcare,
    SeniorCare,
    Household,
    Travel,
    Business,
    Premium,
}

impl ServiceCategory {
    pub fn compatibility_group(self) -> CompatibilityGroup {
        match self {
            ServiceCategory::Kids => CompatibilityGroup::Childcare,
            ServiceCategory::Seniors => CompatibilityGroup::SeniorCare,
            ServiceCategory::Maison | ServiceCategory::Vie | ServiceCategory::Animals => {
                CompatibilityGroup::Household
            }
            ServiceCategory::Travel => CompatibilityGroup::Travel,
            ServiceCategory::Pro => CompatibilityGroup::Business,
            ServiceCategory::Plus => CompatibilityGroup::Premium,
        }
    }

    pub fn is_compatible_with(self, other: ServiceCategory) -> bool {
        self.compatibility_group() == other.compatibility_group()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceCategory::Kids => "bika_kids",
            ServiceCategory::Maison => "bika_maison",
            ServiceCategory::Vie => "bika_vie",
            ServiceCategory::Travel => "bika_travel",
            ServiceCategory::Seniors => "bika_seniors",
            ServiceCategory::Animals => "bika_animals",
            ServiceCategory::Pro => "bika_pro",
            ServiceCategory::Plus => "bika_plus",
        }
    }
}

impl CompatibilityGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            CompatibilityGroup::Childcare => "childcare",
            CompatibilityGroup::SeniorCare => "senior_care",
            CompatibilityGroup::Household => "household",
            CompatibilityGroup::Travel => "travel",
            CompatibilityGroup::Business => "business",
            CompatibilityGroup::Premium => "premium",
        }
    }
}

/// Accepts "HH:MM" as sent by the booking form as well as "HH:MM:SS" from the database.
mod clock_time {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|e| de::Error::custom(format!("invalid time '{}': {}", raw, e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
}

impl TimeSlot {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub service_name: String,
    pub category: ServiceCategory,
    /// Price of one unit in cents.
    pub unit_price: Amount,
    pub quantity: i64,
    pub time_slot: TimeSlot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl ContactInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceGroup {
    pub group: CompatibilityGroup,
    pub items: Vec<CartItem>,
    pub subtotal: Amount,
}

impl ServiceGroup {
    /// Earliest slot of the group; the booking row is scheduled on it.
    pub fn first_slot(&self) -> Option<&TimeSlot> {
        self.items
            .iter()
            .map(|item| &item.time_slot)
            .min_by_key(|slot| slot.starts_at())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutPlan {
    pub groups: Vec<ServiceGroup>,
    pub total: Amount,
    pub booking_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBooking {
    pub client_id: Option<String>,
    pub client_email: String,
    pub client_name: String,
    pub client_phone: String,
    pub service_category: ServiceCategory,
    pub compatibility_group: CompatibilityGroup,
    pub items: Vec<CartItem>,
    pub booking_date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    pub address: Option<String>,
    pub total_price: Amount,
    pub status: BookingStatus,
    pub payment_session_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    PendingPayment,
    Confirmed,
    Assigned,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Pending,
    Active,
    Rejected,
    Suspended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub user_id: Option<String>,
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub status: ProviderStatus,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl Provider {
    pub fn display_name(&self) -> &str {
        self.business_name.as_deref().unwrap_or("Partner")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub booking_id: Option<String>,
    pub client_id: Option<String>,
    pub amount: Amount,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialTransaction {
    pub id: String,
    pub booking_id: Option<String>,
    pub client_price: Amount,
    pub provider_payment: Amount,
    pub company_commission: Amount,
    pub client_payment_status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub booking_id: String,
    pub client_id: String,
    pub provider_id: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplication {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub category: ServiceCategory,
    #[serde(default)]
    pub experience_years: u8,
    #[serde(default)]
    pub availability: Vec<String>,
    pub motivation: String,
    #[serde(default)]
    pub has_vehicle: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDocument {
    pub application_id: String,
    pub document_type: String,
    pub storage_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditLogEntry {
    pub admin_user_id: String,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub old_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionLineItem {
    pub name: String,
    pub description: Option<String>,
    pub unit_amount: Amount,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutSessionRequest {
    pub customer_email: String,
    pub currency: String,
    pub line_items: Vec<SessionLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}
