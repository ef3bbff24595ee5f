use anyhow::{Context, Result, ensure};
use std::{env, path::PathBuf, sync::OnceLock};

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// UI server configuration
    pub ui: UiConfig,

    /// Key-value store holding generated results
    pub kv_store: KvStoreConfig,

    /// Upstream QR code generation service
    pub generation: GenerationConfig,

    /// Public site settings used in page metadata
    pub site: SiteConfig,

    /// Optional TLS certificate configuration
    pub certificate: Option<CertificateConfig>,
}

#[derive(Clone, Debug)]
pub struct UiConfig {
    pub port: u16,
    /// Directory with the Shell assets served under `/static`
    pub static_dir: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct KvStoreConfig {
    pub rest_api_url: String,
    pub rest_api_token: String,
}

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub service_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    pub url: String,
    pub name: String,
    pub twitter_creator: String,
}

#[derive(Clone, Debug)]
pub struct CertificateConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl AppConfig {
    /// Get or load the application configuration
    ///
    /// Returns a reference to the cached configuration. On first call, it loads
    /// and validates all configuration from environment variables. Subsequent
    /// calls return the cached instance.
    ///
    /// # Panics
    /// Panics if configuration loading fails. This is intentional as the
    /// application cannot function without valid configuration.
    pub fn get() -> &'static Self {
        static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();
        APP_CONFIG.get_or_init(|| {
            Self::load_internal().expect("failed to load application configuration")
        })
    }

    fn load_internal() -> Result<Self> {
        let ui = UiConfig::load()?;
        let kv_store = KvStoreConfig::load()?;
        let generation = GenerationConfig::load();
        let site = SiteConfig::load();
        let certificate = CertificateConfig::load()?;

        Ok(Self {
            ui,
            kv_store,
            generation,
            site,
            certificate,
        })
    }
}

impl UiConfig {
    fn load() -> Result<Self> {
        let port = env::var("UI_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("failed to parse UI_PORT: invalid format")?;

        let static_dir = env::var("STATIC_DIR").ok().map(PathBuf::from);

        if let Some(dir) = &static_dir {
            ensure!(
                dir.is_dir(),
                "failed to find STATIC_DIR: {dir:?} is not a directory"
            );
        }

        Ok(Self { port, static_dir })
    }
}

impl KvStoreConfig {
    fn load() -> Result<Self> {
        // In test/mock mode the store is mocked, so credentials are optional
        #[cfg(any(test, feature = "mock"))]
        {
            let rest_api_url =
                env::var("KV_REST_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8079".to_string());
            let rest_api_token =
                env::var("KV_REST_API_TOKEN").unwrap_or_else(|_| "test-token".to_string());

            Ok(Self {
                rest_api_url,
                rest_api_token,
            })
        }

        #[cfg(not(any(test, feature = "mock")))]
        {
            let rest_api_url =
                env::var("KV_REST_API_URL").context("failed to get KV_REST_API_URL")?;
            let rest_api_token =
                env::var("KV_REST_API_TOKEN").context("failed to get KV_REST_API_TOKEN")?;

            Ok(Self {
                rest_api_url,
                rest_api_token,
            })
        }
    }
}

impl GenerationConfig {
    fn load() -> Self {
        let service_url = env::var("GENERATION_SERVICE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/generate".to_string());

        Self { service_url }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "https://nopasswords.xyz".to_string(),
            name: "nopasswords.xyz".to_string(),
            twitter_creator: "@emergingbits".to_string(),
        }
    }
}

impl SiteConfig {
    fn load() -> Self {
        let defaults = Self::default();

        Self {
            url: env::var("SITE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.url),
            name: env::var("SITE_NAME").unwrap_or(defaults.name),
            twitter_creator: env::var("TWITTER_CREATOR").unwrap_or(defaults.twitter_creator),
        }
    }

    /// Social preview image used when a result has no display image
    pub fn fallback_image(&self) -> String {
        format!("{}/og-image.png", self.url)
    }
}

impl CertificateConfig {
    fn load() -> Result<Option<Self>> {
        match (env::var("CERT_PATH"), env::var("KEY_PATH")) {
            (Ok(cert_path), Ok(key_path)) => Ok(Some(Self {
                cert_path: cert_path.into(),
                key_path: key_path.into(),
            })),
            (Err(_), Err(_)) => Ok(None),
            _ => anyhow::bail!("failed to load certificate config: CERT_PATH and KEY_PATH must be set together"),
        }
    }
}
