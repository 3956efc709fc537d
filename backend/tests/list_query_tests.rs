//! List query pipeline tests
//!
//! Property-based and example tests for:
//! - Property 3: ID-search exactness
//! - Property 4: Pagination reset on control change
//! - Property 5: Sort stability
//! - Property 6: Date range inclusivity
//! - Payment list default year

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    run_list_query, run_list_query_with, Bayaran, BayaranField, DateFilter, ListControls,
    QueryOptions, SortDirection, Surat, SuratField, BAYARAN_DEFAULT_YEAR,
};

// ============================================================================
// Fixtures
// ============================================================================

fn surat(id: i64, perkara: &str, status: &str, tarikh_terima: Option<&str>) -> Surat {
    Surat {
        id,
        no_rujukan: Some(format!("PTJ/{}/2025", id)),
        tarikh_surat: None,
        tarikh_terima: tarikh_terima.map(str::to_string),
        daripada: Some("Jabatan Pertanian".to_string()),
        perkara: perkara.to_string(),
        kategori: Some("Am".to_string()),
        unit: Some("Pentadbiran".to_string()),
        status: Some(status.to_string()),
        ditugaskan_kepada: None,
        no_fail: None,
        catatan: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn bayaran(id: i64, tarikh_terima: &str) -> Bayaran {
    Bayaran {
        id,
        no_baucar: Some(format!("B{:04}", id)),
        penerima: Some("Syarikat Jaya".to_string()),
        perkara: "Bekalan pejabat".to_string(),
        kategori: None,
        unit: None,
        no_kontrak: None,
        amaun: Decimal::new(10000, 2),
        status: Some("Diterima".to_string()),
        tarikh_terima: Some(tarikh_terima.to_string()),
        tarikh_lulus: None,
        tarikh_bayar: None,
        catatan: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn by_id() -> ListControls<SuratField> {
    ListControls::new(SuratField::Id, SortDirection::Asc)
}

fn ids(records: &[&Surat]) -> Vec<i64> {
    records.iter().map(|s| s.id).collect()
}

fn display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate record ids in the range a busy office produces
fn id_strategy() -> impl Strategy<Value = i64> {
    1i64..5000
}

/// Generate dates across a few years
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..1500).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + Duration::days(offset)
    })
}

/// Generate times of day as `HH:MM:SS`
fn time_strategy() -> impl Strategy<Value = String> {
    (0u32..24, 0u32..60, 0u32..60).prop_map(|(h, m, s)| format!("{:02}:{:02}:{:02}", h, m, s))
}

// ============================================================================
// Property 3: ID-search exactness
// ============================================================================

#[test]
fn test_hash_search_is_exact_not_substring() {
    let records = vec![
        surat(1, "Satu", "Baru", None),
        surat(2, "Dua", "Baru", None),
        surat(10, "Sepuluh", "Baru", None),
    ];
    let result = run_list_query(&records, &by_id().with_search("#1"));
    assert_eq!(ids(&result.filtered), vec![1]);
}

#[test]
fn test_hash_with_text_matches_nothing() {
    let records = vec![surat(1, "Satu", "Baru", None)];
    let result = run_list_query(&records, &by_id().with_search("#abc"));
    assert!(result.filtered.is_empty());
    assert_eq!(result.total_pages, 1);
}

#[test]
fn test_plain_search_is_case_insensitive_substring() {
    let records = vec![
        surat(1, "Mesyuarat Agung", "Baru", None),
        surat(2, "Tuntutan elaun", "Baru", None),
        surat(3, "Minit MESYUARAT", "Baru", None),
    ];
    let result = run_list_query(&records, &by_id().with_search("mesyuarat"));
    assert_eq!(ids(&result.filtered), vec![1, 3]);
}

#[test]
fn test_search_keeps_surrounding_spaces() {
    let records: Vec<Surat> = [
        surat(1, "Mesyuarat Agung", "Baru", None),
        surat(2, "Tuntutan", "Baru", None),
    ]
    .into_iter()
    .map(|s| Surat { daripada: None, ..s })
    .collect();
    let result = run_list_query(&records, &by_id().with_search(" "));
    assert_eq!(ids(&result.filtered), vec![1]);

    let result = run_list_query(&records, &by_id().with_search(" agung"));
    assert_eq!(ids(&result.filtered), vec![1]);

    let result = run_list_query(&records, &by_id().with_search(" #2 "));
    assert_eq!(ids(&result.filtered), vec![2]);
}

proptest! {
    /// Property 3: `#<id>` finds exactly the records with that id
    #[test]
    fn test_id_search_exactness(
        ids_in in prop::collection::vec(id_strategy(), 1..40),
        pick in any::<prop::sample::Index>(),
    ) {
        let records: Vec<Surat> = ids_in
            .iter()
            .map(|id| surat(*id, "Perkara", "Baru", None))
            .collect();
        let target = ids_in[pick.index(ids_in.len())];

        let result = run_list_query(&records, &by_id().with_search(format!("#{}", target)));

        let expected = ids_in.iter().filter(|id| **id == target).count();
        prop_assert_eq!(result.total_items, expected);
        prop_assert!(result.filtered.iter().all(|s| s.id == target));
    }
}

// ============================================================================
// Property 4: Pagination reset
// ============================================================================

#[test]
fn test_filter_change_resets_to_first_page() {
    let records: Vec<Surat> = (1..=45)
        .map(|id| {
            let status = if id <= 10 { "Selesai" } else { "Baru" };
            surat(id, "Perkara", status, None)
        })
        .collect();

    let controls = by_id().with_page(3);
    let before = run_list_query(&records, &controls);
    assert_eq!(before.total_items, 45);
    assert_eq!(before.total_pages, 3);
    assert_eq!(before.current_page, 3);
    assert_eq!(before.displayed.len(), 15);

    let narrowed = controls.with_filter(SuratField::Status, "Selesai");
    let after = run_list_query(&records, &narrowed);
    assert_eq!(after.current_page, 1);
    assert_eq!(after.total_items, 10);
    assert_eq!(after.total_pages, 1);
    assert_eq!(after.displayed.len(), 10);
}

#[test]
fn test_out_of_range_page_is_empty_not_error() {
    let records: Vec<Surat> = (1..=5).map(|id| surat(id, "P", "Baru", None)).collect();
    let result = run_list_query(&records, &by_id().with_page(9));
    assert!(result.displayed.is_empty());
    assert_eq!(result.total_pages, 1);
    assert_eq!(result.total_items, 5);
}

proptest! {
    /// Property 4: every control change except paging lands on page 1
    #[test]
    fn test_control_changes_reset_page(
        page in 2u32..50,
        search in "[a-z]{0,6}",
    ) {
        let controls = by_id().with_page(page);
        prop_assert_eq!(controls.clone().with_search(search).page, 1);
        prop_assert_eq!(controls.clone().with_filter(SuratField::Unit, "Kewangan").page, 1);
        prop_assert_eq!(controls.clone().with_date(DateFilter::None).page, 1);
        prop_assert_eq!(controls.clone().toggle_sort(SuratField::Perkara).page, 1);
        prop_assert_eq!(controls.with_page(page + 1).page, page + 1);
    }

    /// Pages partition the filtered set
    #[test]
    fn test_pages_cover_filtered_records(count in 0usize..80, per_page in 1usize..20) {
        let records: Vec<Surat> = (1..=count as i64)
            .map(|id| surat(id, "P", "Baru", None))
            .collect();
        let options = QueryOptions { items_per_page: per_page, default_year: None };

        let first = run_list_query_with(&records, &by_id(), &options);
        let mut seen = Vec::new();
        for page in 1..=first.total_pages as u32 {
            let result = run_list_query_with(&records, &by_id().with_page(page), &options);
            prop_assert!(result.displayed.len() <= per_page);
            seen.extend(ids(&result.displayed));
        }
        prop_assert_eq!(seen, ids(&first.filtered));
        prop_assert!(first.total_pages >= 1);
    }
}

// ============================================================================
// Property 5: Sort stability
// ============================================================================

#[test]
fn test_equal_keys_keep_input_order() {
    let records = vec![
        surat(1, "a", "Baru", None),
        surat(2, "a", "Baru", None),
        surat(3, "b", "Baru", None),
    ];
    let controls = by_id().with_sort(SuratField::Perkara, SortDirection::Asc);
    assert_eq!(ids(&run_list_query(&records, &controls).filtered), vec![1, 2, 3]);

    let controls = controls.with_sort(SuratField::Perkara, SortDirection::Desc);
    assert_eq!(ids(&run_list_query(&records, &controls).filtered), vec![3, 1, 2]);
}

#[test]
fn test_id_sorts_numerically() {
    let records = vec![
        surat(10, "x", "Baru", None),
        surat(9, "x", "Baru", None),
        surat(100, "x", "Baru", None),
    ];
    assert_eq!(ids(&run_list_query(&records, &by_id()).filtered), vec![9, 10, 100]);
}

#[test]
fn test_date_field_sorts_chronologically() {
    let records = vec![
        surat(1, "x", "Baru", Some("01/02/2025")),
        surat(2, "x", "Baru", Some("02/01/2025")),
        surat(3, "x", "Baru", Some("15/12/2024")),
    ];
    let controls = ListControls::new(SuratField::TarikhTerima, SortDirection::Asc);
    assert_eq!(ids(&run_list_query(&records, &controls).filtered), vec![3, 2, 1]);

    let controls = controls.with_sort(SuratField::TarikhTerima, SortDirection::Desc);
    assert_eq!(ids(&run_list_query(&records, &controls).filtered), vec![1, 2, 3]);
}

#[test]
fn test_undated_records_sort_before_dated_ones() {
    let records = vec![
        surat(1, "x", "Baru", Some("01/02/2025")),
        surat(2, "x", "Baru", None),
        surat(3, "x", "Baru", Some("2025-01-01")),
        surat(4, "x", "Baru", Some("15/12/2024 08:30")),
    ];
    let controls = ListControls::new(SuratField::TarikhTerima, SortDirection::Asc);
    assert_eq!(ids(&run_list_query(&records, &controls).filtered), vec![2, 3, 4, 1]);
}

proptest! {
    /// Property 5: ties on the sort key preserve their relative input order
    #[test]
    fn test_sort_is_stable(keys in prop::collection::vec(prop_oneof![Just("a"), Just("B"), Just("c")], 0..40)) {
        let records: Vec<Surat> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| surat(i as i64 + 1, k, "Baru", None))
            .collect();
        let controls = by_id().with_sort(SuratField::Perkara, SortDirection::Asc);
        let result = run_list_query(&records, &controls);

        for pair in result.filtered.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (ka, kb) = (a.perkara.to_lowercase(), b.perkara.to_lowercase());
            prop_assert!(ka <= kb);
            if ka == kb {
                prop_assert!(a.id < b.id);
            }
        }
    }
}

// ============================================================================
// Property 6: Date range inclusivity
// ============================================================================

proptest! {
    /// Property 6: the `to` day is included at any time of day, the next day is not
    #[test]
    fn test_date_range_is_inclusive(
        from in date_strategy(),
        span in 0i64..60,
        time in time_strategy(),
    ) {
        let to = from + Duration::days(span);
        let records = vec![
            surat(1, "Hujung", "Baru", Some(&format!("{} {}", display(to), time))),
            surat(2, "Selepas", "Baru", Some(&display(to + Duration::days(1)))),
            surat(3, "Awal", "Baru", Some(&display(from))),
            surat(4, "Sebelum", "Baru", Some(&display(from - Duration::days(1)))),
        ];
        let controls = by_id().with_date(DateFilter::Between { from: Some(from), to: Some(to) });
        let result = run_list_query(&records, &controls);
        prop_assert_eq!(ids(&result.filtered), vec![1, 3]);
    }
}

#[test]
fn test_missing_to_means_single_day() {
    let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let records = vec![
        surat(1, "P", "Baru", Some("14/03/2025 08:00")),
        surat(2, "P", "Baru", Some("15/03/2025")),
    ];
    let controls = by_id().with_date(DateFilter::Between { from: Some(day), to: None });
    assert_eq!(ids(&run_list_query(&records, &controls).filtered), vec![1]);
}

#[test]
fn test_malformed_dates_never_match() {
    let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let records = vec![
        surat(1, "P", "Baru", Some("2025-03-14")),
        surat(2, "P", "Baru", Some("14-03-2025")),
        surat(3, "P", "Baru", None),
        surat(4, "P", "Baru", Some("14/03/2025")),
    ];
    let controls = by_id().with_date(DateFilter::On { date: day });
    assert_eq!(ids(&run_list_query(&records, &controls).filtered), vec![4]);
}

// ============================================================================
// Payment list default year
// ============================================================================

#[test]
fn test_bayaran_defaults_to_configured_year() {
    let records = vec![
        bayaran(1, &format!("15/06/{}", BAYARAN_DEFAULT_YEAR)),
        bayaran(2, &format!("15/06/{}", BAYARAN_DEFAULT_YEAR - 1)),
        bayaran(3, "bukan tarikh"),
    ];
    let controls = ListControls::new(BayaranField::Id, SortDirection::Asc);

    let result = run_list_query(&records, &controls);
    assert_eq!(result.filtered.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1]);

    // An explicit range replaces the default year
    let day = NaiveDate::from_ymd_opt(BAYARAN_DEFAULT_YEAR - 1, 6, 15).unwrap();
    let result = run_list_query(
        &records,
        &controls.with_date(DateFilter::On { date: day }),
    );
    assert_eq!(result.filtered.iter().map(|b| b.id).collect::<Vec<_>>(), vec![2]);

    // Disabled default shows every row
    let options = QueryOptions { default_year: None, ..QueryOptions::default() };
    let result = run_list_query_with(
        &records,
        &ListControls::new(BayaranField::Id, SortDirection::Asc),
        &options,
    );
    assert_eq!(result.total_items, 3);
}

#[test]
fn test_bayaran_amount_sorts_numerically() {
    let mut records = vec![
        bayaran(1, "01/01/2025"),
        bayaran(2, "01/01/2025"),
        bayaran(3, "01/01/2025"),
    ];
    records[0].amaun = Decimal::new(900, 0);
    records[1].amaun = Decimal::new(10000, 0);
    records[2].amaun = Decimal::new(85, 0);

    let controls = ListControls::new(BayaranField::Amaun, SortDirection::Desc);
    let result = run_list_query(&records, &controls);
    assert_eq!(result.filtered.iter().map(|b| b.id).collect::<Vec<_>>(), vec![2, 1, 3]);
}
