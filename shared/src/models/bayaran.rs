//! Payment (bayaran) models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::query::{FieldValue, ListRecord, QueryOptions, ITEMS_PER_PAGE};

/// Year shown by the payment list when no date filter is set.
///
/// Kept as a literal until the office confirms whether the list should
/// follow the current year instead.
pub const BAYARAN_DEFAULT_YEAR: i32 = 2025;

/// A tracked payment with its approval and disbursement timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Bayaran {
    pub id: i64,
    /// Voucher number
    pub no_baucar: Option<String>,
    pub penerima: Option<String>,
    pub perkara: String,
    pub kategori: Option<String>,
    pub unit: Option<String>,
    pub no_kontrak: Option<String>,
    pub amaun: Decimal,
    pub status: Option<String>,
    /// Date the claim was received, `DD/MM/YYYY`
    pub tarikh_terima: Option<String>,
    /// Date approved, `DD/MM/YYYY`
    pub tarikh_lulus: Option<String>,
    /// Date paid, `DD/MM/YYYY`
    pub tarikh_bayar: Option<String>,
    pub catatan: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listable columns of a bayaran
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BayaranField {
    Id,
    NoBaucar,
    Penerima,
    Perkara,
    Kategori,
    Unit,
    NoKontrak,
    Amaun,
    Status,
    TarikhTerima,
    TarikhLulus,
    TarikhBayar,
}

impl ListRecord for Bayaran {
    type Field = BayaranField;

    const ID_FIELD: BayaranField = BayaranField::Id;
    const DATE_FIELD: BayaranField = BayaranField::TarikhTerima;

    fn field(&self, field: BayaranField) -> FieldValue<'_> {
        match field {
            BayaranField::Id => FieldValue::from(self.id),
            BayaranField::NoBaucar => FieldValue::text(self.no_baucar.as_deref()),
            BayaranField::Penerima => FieldValue::text(self.penerima.as_deref()),
            BayaranField::Perkara => FieldValue::text(Some(self.perkara.as_str())),
            BayaranField::Kategori => FieldValue::text(self.kategori.as_deref()),
            BayaranField::Unit => FieldValue::text(self.unit.as_deref()),
            BayaranField::NoKontrak => FieldValue::text(self.no_kontrak.as_deref()),
            BayaranField::Amaun => FieldValue::Number(self.amaun),
            BayaranField::Status => FieldValue::text(self.status.as_deref()),
            BayaranField::TarikhTerima => FieldValue::text(self.tarikh_terima.as_deref()),
            BayaranField::TarikhLulus => FieldValue::text(self.tarikh_lulus.as_deref()),
            BayaranField::TarikhBayar => FieldValue::text(self.tarikh_bayar.as_deref()),
        }
    }

    fn date_fields() -> &'static [BayaranField] {
        &[
            BayaranField::TarikhTerima,
            BayaranField::TarikhLulus,
            BayaranField::TarikhBayar,
        ]
    }

    fn search_fields() -> &'static [BayaranField] {
        &[
            BayaranField::Penerima,
            BayaranField::Perkara,
            BayaranField::Kategori,
            BayaranField::Unit,
            BayaranField::NoBaucar,
            BayaranField::NoKontrak,
            BayaranField::Id,
        ]
    }

    fn default_options() -> QueryOptions {
        QueryOptions {
            items_per_page: ITEMS_PER_PAGE,
            default_year: Some(BAYARAN_DEFAULT_YEAR),
        }
    }
}

/// Payment workflow states
pub mod bayaran_status {
    pub const DITERIMA: &str = "Diterima";
    pub const DILULUSKAN: &str = "Diluluskan";
    pub const DIBAYAR: &str = "Dibayar";
    pub const DITOLAK: &str = "Ditolak";

    pub const ALL: &[&str] = &[DITERIMA, DILULUSKAN, DIBAYAR, DITOLAK];
}
