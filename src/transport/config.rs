//! Credentials and endpoint selection.

use super::ApiRequest;
use crate::{Error, Result};
use reqwest::Url;

const DEFAULT_HOST: &str = "api.openai.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
    Custom(String),
}

impl Scheme {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
            Self::Custom(scheme) => scheme,
        }
    }
}

/// Where the API lives. Defaults to `https://api.openai.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Api {
    pub scheme: Scheme,
    /// Host, optionally with `:port`.
    pub host: String,
    /// Prefix placed before every request path.
    pub path: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            scheme: Scheme::Https,
            host: DEFAULT_HOST.to_string(),
            path: None,
        }
    }
}

impl Api {
    pub fn new(scheme: Scheme, host: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Parses a base URL such as `http://localhost:8080/proxy`.
    pub fn parse(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidUrl(format!("{base_url}: missing host")))?;
        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => Scheme::Custom(other.to_string()),
        };
        let path = url.path().trim_end_matches('/');

        Ok(Self {
            scheme,
            host,
            path: (!path.is_empty()).then(|| path.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub api_key: String,
    pub organization: Option<String>,
    pub api: Option<Api>,
}

impl Configuration {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            organization: None,
            api: None,
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_api(mut self, api: Api) -> Self {
        self.api = Some(api);
        self
    }

    /// Reads `OPENAI_API_KEY`, `OPENAI_ORGANIZATION` and `OPENAI_BASE_URL`,
    /// loading a `.env` file first when one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| Error::Config("OPENAI_API_KEY not set".to_string()))?;
        let organization = std::env::var("OPENAI_ORGANIZATION").ok();
        let api = match std::env::var("OPENAI_BASE_URL") {
            Ok(base_url) => Some(Api::parse(&base_url)?),
            Err(_) => None,
        };

        Ok(Self {
            api_key,
            organization,
            api,
        })
    }

    /// Full URL for a request: scheme, host, base path, request path, query.
    pub fn generate_url(&self, request: &ApiRequest) -> Result<Url> {
        let default_api = Api::default();
        let api = self.api.as_ref().unwrap_or(&default_api);

        if api.host.is_empty() {
            return Err(Error::InvalidUrl("empty host".to_string()));
        }

        let base_path = api.path.as_deref().unwrap_or_default().trim_end_matches('/');
        let raw = format!(
            "{}://{}{}{}",
            api.scheme.as_str(),
            api.host,
            base_path,
            request.path
        );
        let mut url = Url::parse(&raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_url() {
        let config = Configuration::new("sk-test");
        let url = config.generate_url(&ApiRequest::get("/v1/responses")).unwrap();
        assert_eq!(url.as_str(), "https://api.openai.com/v1/responses");
    }

    #[test]
    fn test_custom_scheme() {
        let config = Configuration::new("sk-test")
            .with_api(Api::new(Scheme::Custom("openai".to_string()), "chatgpt.is.cool"));
        let url = config.generate_url(&ApiRequest::get("/v1/i-know")).unwrap();
        assert_eq!(url.as_str(), "openai://chatgpt.is.cool/v1/i-know");
    }

    #[test]
    fn test_http_host_override() {
        let config =
            Configuration::new("sk-test").with_api(Api::new(Scheme::Http, "chat.openai.com"));
        let url = config.generate_url(&ApiRequest::get("/v1/test")).unwrap();
        assert_eq!(url.as_str(), "http://chat.openai.com/v1/test");
    }

    #[test]
    fn test_base_path_and_query() {
        let config = Configuration::new("sk-test")
            .with_api(Api::new(Scheme::Https, "proxy.local:8443").with_path("/openai/"));
        let request = ApiRequest::get("/v1/responses")
            .with_query("limit", 5)
            .with_query("after", "resp_1");
        let url = config.generate_url(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://proxy.local:8443/openai/v1/responses?limit=5&after=resp_1"
        );
    }

    #[test]
    fn test_parse_base_url() {
        assert_eq!(
            Api::parse("http://localhost:8080/proxy/").unwrap(),
            Api::new(Scheme::Http, "localhost:8080").with_path("/proxy")
        );
        assert_eq!(
            Api::parse("https://api.example.com").unwrap(),
            Api::new(Scheme::Https, "api.example.com")
        );
        assert!(matches!(Api::parse("not a url"), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_empty_host_is_rejected() {
        let config = Configuration::new("sk-test").with_api(Api::new(Scheme::Https, ""));
        assert!(matches!(
            config.generate_url(&ApiRequest::get("/v1/x")),
            Err(Error::InvalidUrl(_))
        ));
    }
}
