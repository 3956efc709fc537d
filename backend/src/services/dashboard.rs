//! Dashboard aggregates over the record snapshots

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    count_by, monthly_totals, sum_amount, Bayaran, BayaranField, FailField, FailRecord,
    GroupCount, Surat, SuratField,
};

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub surat: SuratSummary,
    pub bayaran: BayaranSummary,
    pub fail: FailSummary,
}

#[derive(Debug, Serialize)]
pub struct SuratSummary {
    pub total: usize,
    pub by_status: Vec<GroupCount>,
    pub by_kategori: Vec<GroupCount>,
}

#[derive(Debug, Serialize)]
pub struct BayaranSummary {
    pub year: i32,
    pub total: usize,
    pub total_amaun: Decimal,
    pub by_status: Vec<GroupCount>,
    /// January first
    pub monthly_amaun: [Decimal; 12],
}

#[derive(Debug, Serialize)]
pub struct FailSummary {
    pub total: usize,
    pub by_status: Vec<GroupCount>,
}

pub struct DashboardService;

impl DashboardService {
    pub fn summarize(
        surat: &[Surat],
        bayaran: &[Bayaran],
        fail: &[FailRecord],
        year: i32,
    ) -> DashboardSummary {
        DashboardSummary {
            surat: SuratSummary {
                total: surat.len(),
                by_status: count_by(surat, SuratField::Status),
                by_kategori: count_by(surat, SuratField::Kategori),
            },
            bayaran: BayaranSummary {
                year,
                total: bayaran.len(),
                total_amaun: sum_amount(bayaran),
                by_status: count_by(bayaran, BayaranField::Status),
                monthly_amaun: monthly_totals(bayaran, year),
            },
            fail: FailSummary {
                total: fail.len(),
                by_status: count_by(fail, FailField::Status),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bayaran(id: i64, tarikh: &str, sen: i64) -> Bayaran {
        Bayaran {
            id,
            no_baucar: None,
            penerima: None,
            perkara: "Upah".to_string(),
            kategori: None,
            unit: None,
            no_kontrak: None,
            amaun: Decimal::new(sen, 2),
            status: Some("Diterima".to_string()),
            tarikh_terima: Some(tarikh.to_string()),
            tarikh_lulus: None,
            tarikh_bayar: None,
            catatan: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_totals() {
        let payments = vec![
            bayaran(1, "10/02/2025", 10000),
            bayaran(2, "11/02/2025", 2550),
            bayaran(3, "11/02/2024", 100),
        ];
        let summary = DashboardService::summarize(&[], &payments, &[], 2025);

        assert_eq!(summary.surat.total, 0);
        assert!(summary.surat.by_status.is_empty());
        assert_eq!(summary.bayaran.total, 3);
        assert_eq!(summary.bayaran.total_amaun, Decimal::new(12650, 2));
        assert_eq!(summary.bayaran.monthly_amaun[1], Decimal::new(12550, 2));
        assert_eq!(summary.bayaran.by_status[0].count, 3);
    }
}
