use crate::model::{FeePayments, Grade, Student, TERMS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tuition months in academic order.
pub const ACADEMIC_MONTHS: [&str; 12] = [
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
    "January",
    "February",
    "March",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeDetails {
    pub admission_fee: u64,
    pub monthly_fee: u64,
    pub exam_fee: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeeStructure {
    pub currency: String,
    pub pre_primary: FeeDetails,
    pub primary: FeeDetails,
    pub secondary: FeeDetails,
}

impl Default for FeeStructure {
    fn default() -> Self {
        Self {
            currency: "Rs.".to_string(),
            pre_primary: FeeDetails {
                admission_fee: 5000,
                monthly_fee: 1500,
                exam_fee: 500,
            },
            primary: FeeDetails {
                admission_fee: 7000,
                monthly_fee: 2000,
                exam_fee: 700,
            },
            secondary: FeeDetails {
                admission_fee: 10000,
                monthly_fee: 2500,
                exam_fee: 1000,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FeeTier {
    PrePrimary,
    Primary,
    Secondary,
}

pub fn fee_tier(grade: Grade) -> FeeTier {
    match grade {
        Grade::Nursery | Grade::Lkg | Grade::Ukg => FeeTier::PrePrimary,
        Grade::One | Grade::Two | Grade::Three | Grade::Four | Grade::Five => FeeTier::Primary,
        Grade::Six | Grade::Seven | Grade::Eight | Grade::Nine | Grade::Ten => FeeTier::Secondary,
    }
}

pub fn fee_details(grade: Grade, structure: &FeeStructure) -> FeeDetails {
    match fee_tier(grade) {
        FeeTier::PrePrimary => structure.pre_primary,
        FeeTier::Primary => structure.primary,
        FeeTier::Secondary => structure.secondary,
    }
}

fn is_paid(flags: &HashMap<String, bool>, key: &str) -> bool {
    flags
        .iter()
        .any(|(k, paid)| *paid && k.trim().eq_ignore_ascii_case(key))
}

/// Human-readable outstanding dues. A student without a payment record owes
/// everything. Totals saturate at `u64::MAX`.
pub fn calculate_dues(student: &Student, structure: &FeeStructure) -> Vec<String> {
    let unpaid_default = FeePayments::default();
    let payments = student.fee_payments.as_ref().unwrap_or(&unpaid_default);
    let fees = fee_details(student.grade, structure);
    let currency = &structure.currency;
    let mut dues = Vec::new();

    if !payments.admission_fee_paid {
        dues.push(format!("Admission fee due: {} {}", currency, fees.admission_fee));
    }

    let unpaid_months: Vec<&str> = ACADEMIC_MONTHS
        .iter()
        .copied()
        .filter(|m| !is_paid(&payments.tuition_fees_paid, m))
        .collect();
    if !unpaid_months.is_empty() {
        let count = unpaid_months.len() as u64;
        dues.push(format!(
            "Tuition fee due for {} month(s) ({}): {} {}",
            count,
            unpaid_months.join(", "),
            currency,
            fees.monthly_fee.saturating_mul(count)
        ));
    }

    let unpaid_terms: Vec<&str> = TERMS
        .iter()
        .filter(|t| !is_paid(&payments.exam_fees_paid, t.exam_id))
        .map(|t| t.name)
        .collect();
    if !unpaid_terms.is_empty() {
        dues.push(format!(
            "Exam fee due for {}: {} {}",
            unpaid_terms.join(", "),
            currency,
            fees.exam_fee.saturating_mul(unpaid_terms.len() as u64)
        ));
    }

    dues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(grade: Grade, payments: Option<FeePayments>) -> Student {
        Student {
            id: "2024-G05-001".to_string(),
            name: "Asha".to_string(),
            grade,
            fee_payments: payments,
        }
    }

    #[test]
    fn tiers_cover_every_grade() {
        let s = FeeStructure::default();
        assert_eq!(fee_details(Grade::Nursery, &s), s.pre_primary);
        assert_eq!(fee_details(Grade::Ukg, &s), s.pre_primary);
        assert_eq!(fee_details(Grade::One, &s), s.primary);
        assert_eq!(fee_details(Grade::Five, &s), s.primary);
        assert_eq!(fee_details(Grade::Six, &s), s.secondary);
        assert_eq!(fee_details(Grade::Ten, &s), s.secondary);
    }

    #[test]
    fn missing_payment_record_owes_everything() {
        let s = FeeStructure::default();
        let dues = calculate_dues(&student(Grade::Three, None), &s);
        assert_eq!(dues.len(), 3);
        assert_eq!(dues[0], "Admission fee due: Rs. 7000");
        assert!(dues[1].starts_with("Tuition fee due for 12 month(s) (April, May,"));
        assert!(dues[1].ends_with("March): Rs. 24000"));
        assert_eq!(
            dues[2],
            "Exam fee due for First Terminal, Second Terminal, Third Terminal: Rs. 2100"
        );
    }

    #[test]
    fn partial_payments_list_only_outstanding_items() {
        let s = FeeStructure::default();
        let mut payments = FeePayments {
            admission_fee_paid: true,
            ..FeePayments::default()
        };
        for m in ACADEMIC_MONTHS.iter().take(10) {
            payments.tuition_fees_paid.insert(m.to_string(), true);
        }
        payments.tuition_fees_paid.insert("March".to_string(), false);
        payments.exam_fees_paid.insert("terminal2".to_string(), true);

        let dues = calculate_dues(&student(Grade::Nine, Some(payments)), &s);
        assert_eq!(
            dues,
            vec![
                "Tuition fee due for 2 month(s) (February, March): Rs. 5000".to_string(),
                "Exam fee due for First Terminal, Third Terminal: Rs. 2000".to_string(),
            ]
        );
    }

    #[test]
    fn oversized_fee_amounts_saturate() {
        let mut s = FeeStructure::default();
        s.primary.monthly_fee = u64::MAX / 2;
        s.primary.exam_fee = u64::MAX;
        let dues = calculate_dues(&student(Grade::One, None), &s);
        assert!(dues[1].ends_with(&format!("Rs. {}", u64::MAX)));
        assert!(dues[2].ends_with(&format!("Rs. {}", u64::MAX)));
    }

    #[test]
    fn student_grade_accepts_numbers() {
        let s: Student = serde_json::from_value(serde_json::json!({ "id": "x", "grade": 7 }))
            .expect("numeric grade");
        assert_eq!(s.grade, Grade::Seven);
    }

    #[test]
    fn fully_paid_student_has_no_dues() {
        let mut payments = FeePayments {
            admission_fee_paid: true,
            ..FeePayments::default()
        };
        for m in ACADEMIC_MONTHS {
            payments.tuition_fees_paid.insert(m.to_ascii_lowercase(), true);
        }
        for t in TERMS {
            payments.exam_fees_paid.insert(t.exam_id.to_string(), true);
        }
        let dues = calculate_dues(&student(Grade::Lkg, Some(payments)), &FeeStructure::default());
        assert!(dues.is_empty());
    }
}
