//! Financial domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use schola_shared::types::{
    BillingId, BursaryId, Currency, PaymentId, ProgrammeId, StudentId,
};

/// Which subsystem created a student record.
///
/// Only bursar-origin records hold independent financial truth. A
/// registrar-origin record mirrors the bursar record sharing its pay code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentOrigin {
    /// Record created by the registrar (enrollment side).
    Registrar,
    /// Record created by the bursar (finance side).
    Bursar,
}

impl StudentOrigin {
    /// Returns the string representation of the origin.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registrar => "registrar",
            Self::Bursar => "bursar",
        }
    }

    /// Parses an origin from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "registrar" => Some(Self::Registrar),
            "bursar" => Some(Self::Bursar),
            _ => None,
        }
    }
}

impl fmt::Display for StudentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A physical requirement brought by a student (e.g., reams of paper).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalRequirement {
    /// Requirement name.
    pub name: String,
    /// Quantity brought.
    pub quantity: u32,
}

/// An enrolled student record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Student ID.
    pub id: StudentId,
    /// Full name.
    pub name: String,
    /// Pay code linking registrar and bursar records for the same human.
    pub pay_code: Option<String>,
    /// Which subsystem created this record.
    pub origin: StudentOrigin,
    /// Total fees quoted at enrollment.
    pub total_fees: Decimal,
    /// Academic programme.
    pub programme_id: Option<ProgrammeId>,
    /// Level or year of study (e.g., "Year 2").
    pub level: String,
    /// Subscribed service ids from the services catalog.
    pub services: Vec<String>,
    /// Physical requirements brought.
    pub physical_requirements: Vec<PhysicalRequirement>,
}

impl Student {
    /// Returns the pay code if present and non-blank.
    #[must_use]
    pub fn effective_pay_code(&self) -> Option<&str> {
        self.pay_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// A charge against a student. Immutable once created except by explicit
/// correction, which is logged to the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Billing {
    /// Billing ID.
    pub id: BillingId,
    /// Student charged.
    pub student_id: StudentId,
    /// Amount charged.
    pub amount: Decimal,
    /// What the charge is for.
    pub description: String,
    /// Date of the charge.
    pub date: NaiveDate,
}

/// How a payment was made, resolved once at ingestion from the free-text
/// channel name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash at the bursar's office.
    Cash,
    /// Electronic channel (bank, card, mobile money, aggregator).
    Digital,
    /// Manual override entered by staff.
    Manual,
    /// Unrecognized channel.
    Other,
}

impl PaymentMethod {
    /// Classifies a raw channel string into a payment method.
    ///
    /// Matching is case-insensitive substring search: bank, card, mobile,
    /// digital, schoolpay, and pegpay all resolve to `Digital`.
    #[must_use]
    pub fn resolve(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        const DIGITAL_CHANNELS: [&str; 6] =
            ["bank", "card", "mobile", "digital", "schoolpay", "pegpay"];

        if DIGITAL_CHANNELS.iter().any(|c| lowered.contains(c)) {
            Self::Digital
        } else if lowered.contains("cash") {
            Self::Cash
        } else if lowered.contains("manual") {
            Self::Manual
        } else {
            Self::Other
        }
    }

    /// Returns the string representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Digital => "digital",
            Self::Manual => "manual",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A credit against a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Payment ID.
    pub id: PaymentId,
    /// Student credited.
    pub student_id: StudentId,
    /// Amount paid.
    pub amount: Decimal,
    /// Payment channel, resolved at ingestion.
    pub method: PaymentMethod,
    /// Date of the payment.
    pub date: NaiveDate,
    /// External reference (receipt or transaction number).
    pub reference: String,
}

/// A discount or scholarship reducing a student's effective amount owed.
///
/// The amount applies per associated student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bursary {
    /// Bursary ID.
    pub id: BursaryId,
    /// Bursary name (e.g., "Staff Child Discount").
    pub name: String,
    /// Amount deducted per associated student.
    pub amount: Decimal,
    /// Students this bursary applies to.
    pub student_ids: Vec<StudentId>,
    /// When the bursary was awarded.
    pub awarded_at: DateTime<Utc>,
}

/// Configuration for clearance classification and display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSettings {
    /// Clearance percentage separating probation from defaulter.
    pub probation_pct: Decimal,
    /// Currency amounts are displayed in.
    pub currency: Currency,
}

impl Default for FinancialSettings {
    fn default() -> Self {
        Self {
            probation_pct: Decimal::from(80),
            currency: Currency::Ugx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_digital_channels() {
        assert_eq!(PaymentMethod::resolve("Stanbic Bank"), PaymentMethod::Digital);
        assert_eq!(PaymentMethod::resolve("VISA card"), PaymentMethod::Digital);
        assert_eq!(
            PaymentMethod::resolve("MTN Mobile Money"),
            PaymentMethod::Digital
        );
        assert_eq!(PaymentMethod::resolve("SchoolPay"), PaymentMethod::Digital);
        assert_eq!(PaymentMethod::resolve("PegPay kiosk"), PaymentMethod::Digital);
    }

    #[test]
    fn test_payment_method_cash_and_manual() {
        assert_eq!(PaymentMethod::resolve("Cash"), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::resolve("petty cash"), PaymentMethod::Cash);
        assert_eq!(
            PaymentMethod::resolve("manual adjustment"),
            PaymentMethod::Manual
        );
    }

    #[test]
    fn test_payment_method_unknown_is_other() {
        assert_eq!(PaymentMethod::resolve("barter"), PaymentMethod::Other);
        assert_eq!(PaymentMethod::resolve(""), PaymentMethod::Other);
    }

    #[test]
    fn test_effective_pay_code_blank_is_none() {
        let mut student = Student {
            id: StudentId::new(),
            name: "A".into(),
            pay_code: Some("  ".into()),
            origin: StudentOrigin::Registrar,
            total_fees: Decimal::ZERO,
            programme_id: None,
            level: "Year 1".into(),
            services: vec![],
            physical_requirements: vec![],
        };
        assert_eq!(student.effective_pay_code(), None);

        student.pay_code = Some(" P-001 ".into());
        assert_eq!(student.effective_pay_code(), Some("P-001"));

        student.pay_code = None;
        assert_eq!(student.effective_pay_code(), None);
    }
}
