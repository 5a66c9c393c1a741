//! Shared fixtures for finance tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{Billing, Payment, PaymentMethod, Student, StudentOrigin};
use schola_shared::types::{BillingId, PaymentId, StudentId};

pub fn bursar_student(name: &str, pay_code: Option<&str>) -> Student {
    student(name, pay_code, StudentOrigin::Bursar)
}

pub fn registrar_student(name: &str, pay_code: Option<&str>) -> Student {
    student(name, pay_code, StudentOrigin::Registrar)
}

fn student(name: &str, pay_code: Option<&str>, origin: StudentOrigin) -> Student {
    Student {
        id: StudentId::new(),
        name: name.to_string(),
        pay_code: pay_code.map(ToString::to_string),
        origin,
        total_fees: Decimal::ZERO,
        programme_id: None,
        level: "Year 1".to_string(),
        services: vec![],
        physical_requirements: vec![],
    }
}

pub fn billing(student: &Student, amount: Decimal) -> Billing {
    Billing {
        id: BillingId::new(),
        student_id: student.id,
        amount,
        description: "Tuition".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
    }
}

pub fn payment(student: &Student, amount: Decimal) -> Payment {
    Payment {
        id: PaymentId::new(),
        student_id: student.id,
        amount,
        method: PaymentMethod::Cash,
        date: NaiveDate::from_ymd_opt(2025, 9, 15).unwrap(),
        reference: "RCPT-1".to_string(),
    }
}
