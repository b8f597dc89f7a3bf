/// Hosts the download proxy is permitted to fetch from.
///
/// An empty list permits every host. Otherwise a URL is permitted when its host
/// equals a listed entry or is a subdomain of one.
#[derive(Debug, Clone, Default)]
pub struct HostAllowList {
    hosts: Vec<String>,
}

impl HostAllowList {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = hosts
            .into_iter()
            .map(|h| h.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        Self { hosts }
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Whether `url` may be fetched. Unparsable URLs pass through so the fetch
    /// itself reports them.
    pub fn permits(&self, url: &str) -> bool {
        if self.hosts.is_empty() {
            return true;
        }

        let Ok(parsed) = reqwest::Url::parse(url) else {
            return true;
        };

        let Some(host) = parsed.host_str().map(|h| h.to_lowercase()) else {
            return false;
        };

        self.hosts.iter().any(|allowed| {
            host == *allowed
                || host
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}
