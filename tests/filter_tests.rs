use lander_gate::filter::{admin_filter_applies, general_filter_applies};

#[test]
fn test_general_filter_skips_framework_assets_and_favicon() {
    assert!(!general_filter_applies("/_next/static/chunks/main.js"));
    assert!(!general_filter_applies("/_next/static"));
    assert!(!general_filter_applies("/_next/image"));
    assert!(!general_filter_applies("/favicon.ico"));
    assert!(!general_filter_applies("/_next/data/build/page.json"));
    assert!(!general_filter_applies("/_next/webpack-hmr"));
    assert!(!general_filter_applies("/_next"));
    assert!(!general_filter_applies("/_nextgen"));
}

#[test]
fn test_general_filter_covers_everything_else() {
    assert!(general_filter_applies("/"));
    assert!(general_filter_applies("/api/conversions"));
    assert!(general_filter_applies("/admin"));
    assert!(general_filter_applies("/offers/summer"));
    assert!(general_filter_applies("/next/page"));
}

#[test]
fn test_admin_filter_scope() {
    assert!(admin_filter_applies("/admin"));
    assert!(admin_filter_applies("/admin/campaigns/42"));
    assert!(admin_filter_applies("/api/admin"));
    assert!(admin_filter_applies("/api/admin/session"));

    assert!(!admin_filter_applies("/administrator"));
    assert!(!admin_filter_applies("/api/conversions"));
    assert!(!admin_filter_applies("/api/administer"));
    assert!(!admin_filter_applies("/"));
}
