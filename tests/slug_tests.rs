use kopi_keliling_admin::slug::generate_slug;

#[test]
fn test_slug_from_plain_title() {
    assert_eq!(generate_slug("Kopi Susu Premium!"), "kopi-susu-premium");
}

#[test]
fn test_slug_collapses_runs_of_separators() {
    assert_eq!(generate_slug("Es  Kopi --- Gula   Aren"), "es-kopi-gula-aren");
    assert_eq!(generate_slug("Harga: Rp 15.000 / gelas"), "harga-rp-15-000-gelas");
}

#[test]
fn test_slug_strips_leading_and_trailing_hyphens() {
    assert_eq!(generate_slug("  ...Promo Akhir Pekan!!!  "), "promo-akhir-pekan");
    assert_eq!(generate_slug("-kopi-"), "kopi");
}

#[test]
fn test_slug_keeps_digits() {
    assert_eq!(generate_slug("Top 10 Menu 2026"), "top-10-menu-2026");
}

#[test]
fn test_slug_treats_non_ascii_letters_as_separators() {
    // Only [a-z0-9] survive lowercasing.
    assert_eq!(generate_slug("Café Latte"), "caf-latte");
    assert_eq!(generate_slug("コーヒー Time"), "time");
}

#[test]
fn test_slug_of_symbol_only_title_is_empty() {
    assert_eq!(generate_slug("!!! ??? ..."), "");
    assert_eq!(generate_slug(""), "");
}

#[test]
fn test_slug_is_stable_when_reapplied() {
    let once = generate_slug("Kopi Keliling: Cerita Pagi di Jakarta");
    assert_eq!(generate_slug(&once), once);
}
