mod google_calendar_http;
mod site_builder;

// Single integration test target (see `[[test]]` in Cargo.toml).
// - smoke_tests: configuration and public API sanity checks
// - google_calendar_mock: the sync pipeline against a mocked calendar
// - google_calendar_http: the real client against an unreachable local port
// - site_builder: the local include build on a temporary site
