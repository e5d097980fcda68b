//! Source adapter registry: feed URL to known source type.

use std::fmt;

use techfeed_core::Organization;
use url::Url;

/// A recognized blog source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    NaverD2,
    KakaoTech,
    Devocean,
    TossTech,
    MyRealTripMedium,
    LineTech,
    DaangnMedium,
    OliveYoungTech,
}

impl SourceType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::NaverD2 => "naver_d2",
            SourceType::KakaoTech => "kakao_tech",
            SourceType::Devocean => "devocean",
            SourceType::TossTech => "toss_tech",
            SourceType::MyRealTripMedium => "myrealtrip_medium",
            SourceType::LineTech => "line_tech",
            SourceType::DaangnMedium => "daangn_medium",
            SourceType::OliveYoungTech => "oliveyoung_tech",
        }
    }

    /// Display name used when the source config does not set one.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            SourceType::NaverD2 => "Naver D2",
            SourceType::KakaoTech => "Kakao Tech",
            SourceType::Devocean => "DEVOCEAN Tech Blog",
            SourceType::TossTech => "Toss Tech",
            SourceType::MyRealTripMedium => "MyRealTrip Product & Tech",
            SourceType::LineTech => "LINE Tech Blog",
            SourceType::DaangnMedium => "Daangn Tech",
            SourceType::OliveYoungTech => "Olive Young Tech",
        }
    }

    /// Organization used when the source config does not set one.
    #[must_use]
    pub fn organization(self) -> Organization {
        match self {
            SourceType::NaverD2 => Organization::Naver,
            SourceType::KakaoTech => Organization::Kakao,
            SourceType::Devocean => Organization::Devocean,
            SourceType::TossTech => Organization::Toss,
            SourceType::MyRealTripMedium => Organization::MyRealTrip,
            SourceType::LineTech => Organization::Line,
            SourceType::DaangnMedium => Organization::Daangn,
            SourceType::OliveYoungTech => Organization::OliveYoung,
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rule recognizes a feed URL. Hosts compare case-insensitively with
/// any leading `www.` removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMatcher {
    /// Any URL on this host.
    Host(String),
    /// This host, with a path starting with the prefix. For shared blogging
    /// platforms that serve many organizations.
    HostPath { host: String, path_prefix: String },
    /// This host, only when the source declares this organization. For
    /// generic feed proxies reused across organizations.
    HostOrg {
        host: String,
        organization: Organization,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRule {
    pub matcher: HostMatcher,
    pub source_type: SourceType,
}

impl SourceRule {
    #[must_use]
    pub fn host(host: &str, source_type: SourceType) -> Self {
        Self {
            matcher: HostMatcher::Host(normalize_host(host)),
            source_type,
        }
    }

    #[must_use]
    pub fn host_path(host: &str, path_prefix: &str, source_type: SourceType) -> Self {
        Self {
            matcher: HostMatcher::HostPath {
                host: normalize_host(host),
                path_prefix: path_prefix.to_ascii_lowercase(),
            },
            source_type,
        }
    }

    #[must_use]
    pub fn host_org(host: &str, organization: Organization, source_type: SourceType) -> Self {
        Self {
            matcher: HostMatcher::HostOrg {
                host: normalize_host(host),
                organization,
            },
            source_type,
        }
    }

    fn matches(&self, host: &str, path: &str, organization: Option<Organization>) -> bool {
        match &self.matcher {
            HostMatcher::Host(h) => h == host,
            HostMatcher::HostPath { host: h, path_prefix } => {
                h == host && path_matches_prefix(path, path_prefix)
            }
            HostMatcher::HostOrg {
                host: h,
                organization: org,
            } => h == host && organization == Some(*org),
        }
    }
}

/// Ordered rule table. The first matching rule decides; no match means the
/// source is unknown.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    rules: Vec<SourceRule>,
}

impl SourceRegistry {
    /// Rules for the built-in blog sources.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            rules: vec![
                SourceRule::host("d2.naver.com", SourceType::NaverD2),
                SourceRule::host("tech.kakao.com", SourceType::KakaoTech),
                SourceRule::host("devocean.sk.com", SourceType::Devocean),
                SourceRule::host_org("politepol.com", Organization::Devocean, SourceType::Devocean),
                SourceRule::host("toss.tech", SourceType::TossTech),
                SourceRule::host_path(
                    "medium.com",
                    "/feed/myrealtrip-product",
                    SourceType::MyRealTripMedium,
                ),
                SourceRule::host_path("medium.com", "/feed/daangn", SourceType::DaangnMedium),
                SourceRule::host("techblog.lycorp.co.jp", SourceType::LineTech),
                SourceRule::host("engineering.linecorp.com", SourceType::LineTech),
                SourceRule::host("oliveyoung.tech", SourceType::OliveYoungTech),
            ],
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule, evaluated after the existing ones.
    #[must_use]
    pub fn with_rule(mut self, rule: SourceRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Identify the source behind `feed_url`. Returns `None` for unknown
    /// hosts and for URLs that do not parse. Pure lookup.
    #[must_use]
    pub fn detect(
        &self,
        feed_url: &str,
        organization: Option<Organization>,
    ) -> Option<SourceType> {
        let parsed = Url::parse(feed_url.trim()).ok()?;
        let host = normalize_host(parsed.host_str()?);
        let path = parsed.path().to_ascii_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&host, &path, organization))
            .map(|rule| rule.source_type)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_host(host: &str) -> String {
    let lower = host.trim().to_ascii_lowercase();
    match lower.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// `/feed/daangn` matches `/feed/daangn` and `/feed/daangn/...` but not
/// `/feed/daangn-other`.
fn path_matches_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_every_builtin_feed() {
        let registry = SourceRegistry::builtin();
        for source in techfeed_core::default_sources() {
            let detected = registry.detect(&source.feed_url, source.organization);
            assert!(detected.is_some(), "{} not detected", source.feed_url);
            assert_eq!(
                detected.map(SourceType::organization),
                source.organization,
                "{}",
                source.feed_url
            );
        }
    }

    #[test]
    fn host_match_ignores_case_and_www() {
        let registry = SourceRegistry::builtin();
        assert_eq!(
            registry.detect("https://WWW.Toss.Tech/atom.xml", None),
            Some(SourceType::TossTech)
        );
    }

    #[test]
    fn shared_platform_is_split_by_path() {
        let registry = SourceRegistry::builtin();
        assert_eq!(
            registry.detect("https://medium.com/feed/daangn", None),
            Some(SourceType::DaangnMedium)
        );
        assert_eq!(
            registry.detect("https://medium.com/feed/myrealtrip-product/", None),
            Some(SourceType::MyRealTripMedium)
        );
        assert_eq!(registry.detect("https://medium.com/feed/daangn-fans", None), None);
        assert_eq!(registry.detect("https://medium.com/feed/someone-else", None), None);
    }

    #[test]
    fn feed_proxy_requires_declared_organization() {
        let registry = SourceRegistry::builtin();
        let url = "https://politepol.com/fd/XiV8r39FL4YI";
        assert_eq!(
            registry.detect(url, Some(Organization::Devocean)),
            Some(SourceType::Devocean)
        );
        assert_eq!(registry.detect(url, None), None);
        assert_eq!(registry.detect(url, Some(Organization::Toss)), None);
    }

    #[test]
    fn unknown_host_and_garbage_are_not_detected() {
        let registry = SourceRegistry::builtin();
        assert_eq!(registry.detect("https://unknown.example.com/feed", None), None);
        assert_eq!(registry.detect("not a url", None), None);
        assert_eq!(registry.detect("", None), None);
    }

    #[test]
    fn first_matching_rule_wins() {
        let registry = SourceRegistry::empty()
            .with_rule(SourceRule::host("127.0.0.1", SourceType::KakaoTech))
            .with_rule(SourceRule::host("127.0.0.1", SourceType::TossTech));
        assert_eq!(
            registry.detect("http://127.0.0.1:8080/feed", None),
            Some(SourceType::KakaoTech)
        );
    }

    #[test]
    fn source_type_defaults() {
        assert_eq!(SourceType::LineTech.display_name(), "LINE Tech Blog");
        assert_eq!(SourceType::OliveYoungTech.organization(), Organization::OliveYoung);
        assert_eq!(SourceType::DaangnMedium.to_string(), "daangn_medium");
    }
}
