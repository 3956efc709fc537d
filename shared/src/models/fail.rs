//! File and locker index models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::query::{FieldValue, ListRecord};

/// A physical file and the locker it is kept in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FailRecord {
    pub id: i64,
    pub no_fail: String,
    pub tajuk: String,
    pub lokasi: Option<String>,
    pub no_loker: Option<String>,
    pub status: Option<String>,
    /// Date the file was opened, `DD/MM/YYYY`
    pub tarikh_buka: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FailField {
    Id,
    NoFail,
    Tajuk,
    Lokasi,
    NoLoker,
    Status,
    TarikhBuka,
}

impl ListRecord for FailRecord {
    type Field = FailField;

    const ID_FIELD: FailField = FailField::Id;
    const DATE_FIELD: FailField = FailField::TarikhBuka;

    fn field(&self, field: FailField) -> FieldValue<'_> {
        match field {
            FailField::Id => FieldValue::from(self.id),
            FailField::NoFail => FieldValue::text(Some(self.no_fail.as_str())),
            FailField::Tajuk => FieldValue::text(Some(self.tajuk.as_str())),
            FailField::Lokasi => FieldValue::text(self.lokasi.as_deref()),
            FailField::NoLoker => FieldValue::text(self.no_loker.as_deref()),
            FailField::Status => FieldValue::text(self.status.as_deref()),
            FailField::TarikhBuka => FieldValue::text(self.tarikh_buka.as_deref()),
        }
    }

    fn date_fields() -> &'static [FailField] {
        &[FailField::TarikhBuka]
    }

    fn search_fields() -> &'static [FailField] {
        &[
            FailField::NoFail,
            FailField::Tajuk,
            FailField::Lokasi,
            FailField::NoLoker,
            FailField::Id,
        ]
    }
}
