use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use larder_core::domain::common::{
    DEFAULT_LOCATION, DEFAULT_MAX_FALLBACK_TOKENS, DEFAULT_MODEL, LarderConfig, OcrConfig,
    VertexConfig,
};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "larder",
    version,
    about = "Extract ingredients, recipes and shopping lists with Vertex AI"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub vertex: VertexArgs,

    #[command(flatten)]
    pub ocr: OcrArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Extract ingredient names from a photo
    Scan {
        image: PathBuf,
        /// Detected from the file contents when omitted
        #[arg(long)]
        mime_type: Option<String>,
    },
    /// Generate one recipe from ingredient names
    Recipe { ingredients: Vec<String> },
    /// Reconcile a pantry against a recipe's ingredients
    ShoppingList {
        /// JSON array of names or ingredient objects
        #[arg(long)]
        pantry: PathBuf,
        #[arg(long)]
        recipe: PathBuf,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct VertexArgs {
    #[arg(long = "gcp-project-id", env = "GCP_PROJECT_ID", global = true)]
    pub project_id: Option<String>,

    #[arg(long = "gcp-location", env = "GCP_LOCATION", default_value = DEFAULT_LOCATION, global = true)]
    pub location: String,

    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS", global = true)]
    pub credentials: Option<PathBuf>,

    #[arg(long = "vertex-model", env = "VERTEX_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    #[arg(long = "vertex-endpoint", env = "VERTEX_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    #[arg(long = "vertex-timeout-secs", env = "VERTEX_TIMEOUT_SECS", default_value_t = 60, global = true)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, clap::Args)]
pub struct OcrArgs {
    #[arg(
        long = "ocr-fallback",
        env = "OCR_FALLBACK_ENABLED",
        default_value_t = true,
        action = ArgAction::Set,
        global = true
    )]
    pub enabled: bool,

    #[arg(long = "tesseract-bin", env = "TESSERACT_BIN", default_value = "tesseract", global = true)]
    pub tesseract_bin: String,

    #[arg(long = "tesseract-lang", env = "TESSERACT_LANG", default_value = "eng", global = true)]
    pub language: String,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    /// Emit logs as JSON lines
    #[arg(long = "log-json", env = "LOG_JSON", global = true)]
    pub json: bool,

    /// Used when RUST_LOG is not set
    #[arg(long = "log-level", env = "LOG_LEVEL", default_value = "info", global = true)]
    pub level: String,
}

impl From<Args> for LarderConfig {
    fn from(args: Args) -> Self {
        LarderConfig {
            vertex: VertexConfig {
                project_id: args.vertex.project_id.filter(|id| !id.trim().is_empty()),
                location: args.vertex.location,
                credentials_path: args.vertex.credentials,
                model: args.vertex.model,
                endpoint: args.vertex.endpoint.filter(|url| !url.trim().is_empty()),
                timeout: Duration::from_secs(args.vertex.timeout_secs),
            },
            ocr: OcrConfig {
                enabled: args.ocr.enabled,
                tesseract_bin: args.ocr.tesseract_bin,
                language: args.ocr.language,
                max_tokens: DEFAULT_MAX_FALLBACK_TOKENS,
            },
        }
    }
}
