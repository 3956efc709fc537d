//! Correspondence (surat) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::query::{FieldValue, ListRecord};

/// A tracked incoming or outgoing letter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Surat {
    pub id: i64,
    pub no_rujukan: Option<String>,
    /// Date on the letter, `DD/MM/YYYY`
    pub tarikh_surat: Option<String>,
    /// Date received, `DD/MM/YYYY`
    pub tarikh_terima: Option<String>,
    pub daripada: Option<String>,
    pub perkara: String,
    pub kategori: Option<String>,
    pub unit: Option<String>,
    pub status: Option<String>,
    pub ditugaskan_kepada: Option<String>,
    /// File index number the letter is kept under
    pub no_fail: Option<String>,
    pub catatan: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listable columns of a surat
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SuratField {
    Id,
    NoRujukan,
    TarikhSurat,
    TarikhTerima,
    Daripada,
    Perkara,
    Kategori,
    Unit,
    Status,
    DitugaskanKepada,
    NoFail,
}

impl ListRecord for Surat {
    type Field = SuratField;

    const ID_FIELD: SuratField = SuratField::Id;
    const DATE_FIELD: SuratField = SuratField::TarikhTerima;

    fn field(&self, field: SuratField) -> FieldValue<'_> {
        match field {
            SuratField::Id => FieldValue::from(self.id),
            SuratField::NoRujukan => FieldValue::text(self.no_rujukan.as_deref()),
            SuratField::TarikhSurat => FieldValue::text(self.tarikh_surat.as_deref()),
            SuratField::TarikhTerima => FieldValue::text(self.tarikh_terima.as_deref()),
            SuratField::Daripada => FieldValue::text(self.daripada.as_deref()),
            SuratField::Perkara => FieldValue::text(Some(self.perkara.as_str())),
            SuratField::Kategori => FieldValue::text(self.kategori.as_deref()),
            SuratField::Unit => FieldValue::text(self.unit.as_deref()),
            SuratField::Status => FieldValue::text(self.status.as_deref()),
            SuratField::DitugaskanKepada => FieldValue::text(self.ditugaskan_kepada.as_deref()),
            SuratField::NoFail => FieldValue::text(self.no_fail.as_deref()),
        }
    }

    fn date_fields() -> &'static [SuratField] {
        &[SuratField::TarikhSurat, SuratField::TarikhTerima]
    }

    fn search_fields() -> &'static [SuratField] {
        &[
            SuratField::Daripada,
            SuratField::Perkara,
            SuratField::Kategori,
            SuratField::Unit,
            SuratField::DitugaskanKepada,
            SuratField::NoRujukan,
            SuratField::Id,
        ]
    }
}

/// Workflow states offered by the surat forms
pub mod surat_status {
    pub const BARU: &str = "Baru";
    pub const DALAM_TINDAKAN: &str = "Dalam Tindakan";
    pub const SELESAI: &str = "Selesai";

    pub const ALL: &[&str] = &[BARU, DALAM_TINDAKAN, SELESAI];
}
