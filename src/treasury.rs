//! Partner treasury: the leads a partner brought in and what they earned.

use crate::statics;
use crate::table::{Row, TableSet};

/// Leads attributed to `partner_code` (exact match).
pub fn partner_leads<'a>(tables: &'a TableSet, partner_code: &str) -> Vec<&'a Row> {
    tables
        .rows(statics::TBL_LEADS)
        .iter()
        .filter(|lead| lead.text(statics::FIELD_PARTNER_CODE) == partner_code)
        .collect()
}

pub fn is_paid(lead: &Row) -> bool {
    lead.text(statics::FIELD_STATUS)
        .to_lowercase()
        .contains(statics::RU_STATUS_PAID)
}

/// Lead amount; missing or unparsable sums count as zero.
pub fn lead_sum(lead: &Row) -> f64 {
    lead.get(statics::FIELD_SUM)
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

/// Status shown in the list; leads without one are "in progress".
pub fn status_label(lead: &Row) -> String {
    let status = lead.text(statics::FIELD_STATUS);
    if status.trim().is_empty() {
        statics::RU_STATUS_IN_PROGRESS.to_string()
    } else {
        status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TreasurySummary {
    pub referrals: usize,
    pub paid: usize,
    pub pending: usize,
    pub paid_total: f64,
    pub pending_total: f64,
}

pub fn summarize(leads: &[&Row]) -> TreasurySummary {
    leads.iter().fold(TreasurySummary::default(), |mut acc, lead| {
        acc.referrals += 1;
        let sum = lead_sum(lead);
        if is_paid(lead) {
            acc.paid += 1;
            acc.paid_total += sum;
        } else {
            acc.pending += 1;
            acc.pending_total += sum;
        }
        acc
    })
}

/// `15000` -> `15 000`.
pub fn format_amount(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    if whole < 0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{format_amount, partner_leads, status_label, summarize};
    use crate::table::TableSet;

    #[test]
    fn summary_splits_paid_and_pending() {
        let tables = TableSet::from_json5(
            "{ LEADS: [
                { partner_code: 'IVAN24', sum: 15000, status: 'Оплачено' },
                { partner_code: 'IVAN24', sum: '5 000', status: 'Ждет оплаты' },
                { partner_code: 'IVAN24' },
                { partner_code: 'NORD01', sum: 99, status: 'оплачено' },
            ] }",
        )
        .unwrap();
        let leads = partner_leads(&tables, "IVAN24");
        let s = summarize(&leads);
        assert_eq!(s.referrals, 3);
        assert_eq!(s.paid, 1);
        assert_eq!(s.pending, 2);
        assert_eq!(s.paid_total, 15000.0);
        assert_eq!(s.pending_total, 5000.0);
        assert_eq!(status_label(leads[2]), "В работе");
    }

    #[test]
    fn amounts_are_grouped_by_thousands() {
        assert_eq!(format_amount(15000.0), "15 000");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(1234567.4), "1 234 567");
    }
}
