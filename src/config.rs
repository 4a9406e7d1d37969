use anyhow::{Context, Result};
use clap::Parser;

/// Zoom Relay - OAuth2 relay for the Zoom meetings API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Server host address
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Initial Zoom access token (JWT)
    #[arg(long, env = "TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Zoom refresh token used when the access token expires
    #[arg(long, env = "REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// Zoom OAuth client ID
    #[arg(long, env = "ZOOM_API_KEY")]
    pub client_id: Option<String>,

    /// Zoom OAuth client secret
    #[arg(long, env = "ZOOM_API_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Redirect URI registered with the Zoom OAuth app
    #[arg(long, env = "REDIRECT_URI")]
    pub redirect_uri: Option<String>,

    /// Base URL of the Zoom OAuth server
    #[arg(long, env = "ZOOM_OAUTH_URL", default_value = "https://zoom.us")]
    pub oauth_url: String,

    /// Base URL of the Zoom REST API
    #[arg(long, env = "ZOOM_API_URL", default_value = "https://api.zoom.us")]
    pub api_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "30")]
    pub http_timeout: u64,

    /// HTTP connect timeout in seconds
    #[arg(long, env = "HTTP_CONNECT_TIMEOUT", default_value = "10")]
    pub http_connect_timeout: u64,

    /// Store the token obtained from an authorization code as the shared credential
    #[arg(long, env = "ADOPT_EXCHANGED_TOKEN", default_value = "false")]
    pub adopt_exchanged_token: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Zoom credentials
    pub initial_token: String,
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,

    // Upstream endpoints
    pub oauth_base_url: String,
    pub api_base_url: String,

    // HTTP client
    pub http_connect_timeout: u64,
    pub http_request_timeout: u64,

    // Behaviour
    pub adopt_exchanged_token: bool,
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_args(CliArgs::parse())
    }

    /// Build configuration from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Config {
            server_host: args.host,
            server_port: args.port,

            initial_token: args
                .token
                .context("TOKEN is required (use --token or set TOKEN env var)")?,
            refresh_token: args
                .refresh_token
                .context("REFRESH_TOKEN is required (use --refresh-token or set REFRESH_TOKEN env var)")?,
            client_id: args
                .client_id
                .context("ZOOM_API_KEY is required (use --client-id or set ZOOM_API_KEY env var)")?,
            client_secret: args.client_secret.context(
                "ZOOM_API_SECRET is required (use --client-secret or set ZOOM_API_SECRET env var)",
            )?,
            redirect_uri: args
                .redirect_uri
                .context("REDIRECT_URI is required (use --redirect-uri or set REDIRECT_URI env var)")?,

            oauth_base_url: normalize_base_url(&args.oauth_url),
            api_base_url: normalize_base_url(&args.api_url),

            http_connect_timeout: args.http_connect_timeout,
            http_request_timeout: args.http_timeout,

            adopt_exchanged_token: args.adopt_exchanged_token,
            log_level: args.log_level,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("TOKEN", &self.initial_token),
            ("REFRESH_TOKEN", &self.refresh_token),
            ("ZOOM_API_KEY", &self.client_id),
            ("ZOOM_API_SECRET", &self.client_secret),
            ("REDIRECT_URI", &self.redirect_uri),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("{} cannot be empty", name);
            }
        }

        for (name, url) in [
            ("ZOOM_OAUTH_URL", &self.oauth_base_url),
            ("ZOOM_API_URL", &self.api_base_url),
        ] {
            if !is_http_url(url) {
                anyhow::bail!("{} must start with http:// or https://: {}", name, url);
            }
        }

        Ok(())
    }
}

/// Strip trailing slashes so paths can be appended with `format!`
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
