use std::path::Path;

use super::*;

fn file_of(sources: Vec<SourceConfig>) -> SourcesFile {
    SourcesFile { sources }
}

#[test]
fn default_sources_pass_validation() {
    let sources = file_of(default_sources());
    assert_eq!(sources.sources.len(), 8);
    validate_sources(&sources).expect("built-in sources should be valid");
}

#[test]
fn validate_rejects_empty_feed_url() {
    let err = validate_sources(&file_of(vec![SourceConfig::new("  ")])).unwrap_err();
    assert!(err.to_string().contains("non-empty"));
}

#[test]
fn validate_rejects_relative_feed_url() {
    let err = validate_sources(&file_of(vec![SourceConfig::new("/feed.xml")])).unwrap_err();
    assert!(err.to_string().contains("not a valid URL"));
}

#[test]
fn validate_rejects_non_http_scheme() {
    let err =
        validate_sources(&file_of(vec![SourceConfig::new("ftp://example.com/feed")])).unwrap_err();
    assert!(err.to_string().contains("http or https"));
}

#[test]
fn validate_rejects_zero_max_posts() {
    let mut source = SourceConfig::new("https://toss.tech/atom.xml");
    source.max_posts = Some(0);
    let err = validate_sources(&file_of(vec![source])).unwrap_err();
    assert!(err.to_string().contains("max_posts 0"));
}

#[test]
fn validate_rejects_duplicate_feed_urls_after_canonicalization() {
    let err = validate_sources(&file_of(vec![
        SourceConfig::new("https://toss.tech/atom.xml"),
        SourceConfig::new("https://TOSS.tech/atom.xml/"),
    ]))
    .unwrap_err();
    assert!(err.to_string().contains("duplicate feed_url"));
}

#[test]
fn sources_file_parses_optional_fields() {
    let yaml = r"
sources:
  - feed_url: https://medium.com/feed/daangn
    organization: DAANGN
    max_posts: 3
  - feed_url: https://oliveyoung.tech/rss.xml
";
    let file: SourcesFile = serde_yaml::from_str(yaml).expect("parse");
    assert_eq!(file.sources.len(), 2);
    assert_eq!(file.sources[0].organization, Some(Organization::Daangn));
    assert_eq!(file.sources[0].max_posts, Some(3));
    assert!(file.sources[0].display_name.is_none());
    assert!(file.sources[1].organization.is_none());
    assert!(file.sources[1].max_posts.is_none());
}

#[test]
fn load_sources_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("sources.yaml");
    assert!(
        path.exists(),
        "sources.yaml missing at {path:?}; required for this test"
    );
    let sources_file = load_sources(&path).expect("failed to load sources.yaml");
    assert_eq!(sources_file.sources.len(), default_sources().len());
    assert!(sources_file
        .sources
        .iter()
        .all(|s| s.organization.is_some()));
}

#[test]
fn load_sources_reports_missing_file() {
    let err = load_sources(Path::new("/definitely/not/here/sources.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::SourcesFileIo { .. }));
}
