//! WebAssembly module for Rekod Pejabat
//!
//! Runs the same code the server uses so the browser can:
//! - Check permissions and access rules before showing an action
//! - Re-run the list query pipeline on a cached snapshot
//! - Validate display dates in forms

use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::query::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("rekod-pejabat wasm ready"));
}

/// Whether a `[{resource, action}]` permission list grants `resource:action`
#[wasm_bindgen]
pub fn has_permission_json(
    permissions_json: &str,
    resource: &str,
    action: &str,
) -> Result<bool, JsValue> {
    permission_granted(permissions_json, resource, action).map_err(to_js)
}

/// Whether an `AuthContext` (as returned by `/auth/me`) passes the access
/// rule for `resource:action`. Unknown rules are denied.
#[wasm_bindgen]
pub fn access_allows(context_json: &str, resource: &str, action: &str) -> Result<bool, JsValue> {
    context_allows(context_json, resource, action).map_err(to_js)
}

/// Filter, sort and paginate a surat snapshot
#[wasm_bindgen]
pub fn run_surat_query(records_json: &str, controls_json: &str) -> Result<String, JsValue> {
    query_page::<Surat>(records_json, controls_json, &Surat::default_options())
        .and_then(|page| to_json(&page))
        .map_err(to_js)
}

/// Filter, sort and paginate a bayaran snapshot. `default_year` of 0 turns
/// off the default year constraint.
#[wasm_bindgen]
pub fn run_bayaran_query(
    records_json: &str,
    controls_json: &str,
    default_year: i32,
) -> Result<String, JsValue> {
    bayaran_page(records_json, controls_json, default_year)
        .and_then(|page| to_json(&page))
        .map_err(to_js)
}

/// Filter, sort and paginate a file index snapshot
#[wasm_bindgen]
pub fn run_fail_query(records_json: &str, controls_json: &str) -> Result<String, JsValue> {
    query_page::<FailRecord>(records_json, controls_json, &FailRecord::default_options())
        .and_then(|page| to_json(&page))
        .map_err(to_js)
}

/// Check a `DD/MM/YYYY` form value. Returns the error message, or
/// `undefined` when the date is valid.
#[wasm_bindgen]
pub fn check_display_date(value: &str) -> Option<String> {
    validate_display_date(value).err().map(str::to_string)
}

fn to_js(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

fn permission_granted(
    permissions_json: &str,
    resource: &str,
    action: &str,
) -> Result<bool, String> {
    let permissions: Vec<PermissionCheck> = serde_json::from_str(permissions_json)
        .map_err(|e| format!("Invalid permissions JSON: {}", e))?;
    Ok(has_permission(
        &permissions,
        &PermissionCheck::new(resource, action),
    ))
}

fn context_allows(context_json: &str, resource: &str, action: &str) -> Result<bool, String> {
    let context: AuthContext = serde_json::from_str(context_json)
        .map_err(|e| format!("Invalid access context JSON: {}", e))?;
    Ok(rules::find(resource, action).is_some_and(|rule| context.allows(&rule)))
}

fn query_page<R>(
    records_json: &str,
    controls_json: &str,
    options: &QueryOptions,
) -> Result<PaginatedResponse<R>, String>
where
    R: ListRecord + DeserializeOwned + Clone,
    R::Field: DeserializeOwned,
{
    let records: Vec<R> = serde_json::from_str(records_json)
        .map_err(|e| format!("Invalid records JSON: {}", e))?;
    let controls: ListControls<R::Field> = serde_json::from_str(controls_json)
        .map_err(|e| format!("Invalid list controls JSON: {}", e))?;
    Ok(run_list_query_with(&records, &controls, options).page_response())
}

#[derive(Serialize)]
struct BayaranPage {
    #[serde(flatten)]
    page: PaginatedResponse<Bayaran>,
    total_amaun: Decimal,
}

fn bayaran_page(
    records_json: &str,
    controls_json: &str,
    default_year: i32,
) -> Result<BayaranPage, String> {
    let records: Vec<Bayaran> = serde_json::from_str(records_json)
        .map_err(|e| format!("Invalid records JSON: {}", e))?;
    let controls: ListControls<BayaranField> = serde_json::from_str(controls_json)
        .map_err(|e| format!("Invalid list controls JSON: {}", e))?;
    let options = QueryOptions {
        default_year: (default_year > 0).then_some(default_year),
        ..Bayaran::default_options()
    };

    let result = run_list_query_with(&records, &controls, &options);
    Ok(BayaranPage {
        total_amaun: shared::sum_amount(result.filtered.iter().copied()),
        page: result.page_response(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn surat_json(ids: &[i64]) -> String {
        let records: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({
                    "id": id,
                    "no_rujukan": null,
                    "tarikh_surat": null,
                    "tarikh_terima": "01/02/2025",
                    "daripada": "Jabatan Tanah",
                    "perkara": format!("Surat {}", id),
                    "kategori": null,
                    "unit": null,
                    "status": "Baru",
                    "ditugaskan_kepada": null,
                    "no_fail": null,
                    "catatan": null,
                    "created_at": "2025-02-01T00:00:00Z",
                    "updated_at": "2025-02-01T00:00:00Z"
                })
            })
            .collect();
        serde_json::Value::Array(records).to_string()
    }

    fn bayaran_json(rows: &[(i64, &str, &str)]) -> String {
        let records: Vec<_> = rows
            .iter()
            .map(|(id, tarikh, amaun)| {
                json!({
                    "id": id,
                    "no_baucar": null,
                    "penerima": null,
                    "perkara": "Bekalan",
                    "kategori": null,
                    "unit": null,
                    "no_kontrak": null,
                    "amaun": amaun,
                    "status": null,
                    "tarikh_terima": tarikh,
                    "tarikh_lulus": null,
                    "tarikh_bayar": null,
                    "catatan": null,
                    "created_at": "2025-02-01T00:00:00Z",
                    "updated_at": "2025-02-01T00:00:00Z"
                })
            })
            .collect();
        serde_json::Value::Array(records).to_string()
    }

    #[test]
    fn test_permission_granted() {
        let permissions = r#"[{"resource":"bayaran","action":"view"}]"#;
        assert_eq!(permission_granted(permissions, "bayaran", "view"), Ok(true));
        assert_eq!(permission_granted(permissions, "bayaran", "edit"), Ok(false));
        assert!(permission_granted("not json", "bayaran", "view").is_err());
    }

    #[test]
    fn test_context_allows() {
        let legacy = r#"{"kind":"legacy_role","value":"KEWANGAN"}"#;
        assert_eq!(context_allows(legacy, "bayaran", "edit"), Ok(true));
        assert_eq!(context_allows(legacy, "pengguna", "manage_roles"), Ok(false));
        assert_eq!(context_allows(legacy, "bayaran", "approve"), Ok(false));

        let resolved =
            r#"{"kind":"resolved_permissions","value":[{"resource":"surat","action":"view"}]}"#;
        assert_eq!(context_allows(resolved, "surat", "view"), Ok(true));
        assert_eq!(context_allows(resolved, "surat", "edit"), Ok(false));
    }

    #[test]
    fn test_surat_query_id_search() {
        let controls = r##"{"search":"#1","sort":{"field":"id","direction":"asc"}}"##;
        let page = query_page::<Surat>(&surat_json(&[1, 2, 10]), controls, &QueryOptions::default())
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, 1);
        assert_eq!(page.pagination.page, 1);
    }

    #[test]
    fn test_invalid_controls_rejected() {
        let result = query_page::<Surat>(&surat_json(&[1]), "{}", &QueryOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_bayaran_default_year_and_total() {
        let records = bayaran_json(&[
            (1, "03/03/2025", "100.50"),
            (2, "03/03/2024", "40.00"),
            (3, "10/12/2025", "9.50"),
        ]);
        let controls = r#"{"sort":{"field":"amaun","direction":"desc"}}"#;

        let page = bayaran_page(&records, controls, 2025).unwrap();
        assert_eq!(page.page.pagination.total_items, 2);
        assert_eq!(page.total_amaun, Decimal::new(11000, 2));
        assert_eq!(page.page.data[0].id, 1);

        let page = bayaran_page(&records, controls, 0).unwrap();
        assert_eq!(page.page.pagination.total_items, 3);
    }

    #[test]
    fn test_check_display_date() {
        assert_eq!(check_display_date("14/03/2025"), None);
        assert!(check_display_date("2025-03-14").is_some());
    }
}
