use clap::{Parser, Subcommand};
use roseridge::config::{self, Secrets};
use roseridge::content::{Version, management};
use roseridge::http::ReqwestTransport;
use roseridge::output;
use roseridge::registry::{RegistryKind, RenderContext};
use roseridge::render::{self, Document};
use roseridge::server::{self, App};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "roseridge")]
#[command(about = "Server-rendered site for the Rose Ridge wedding venue")]
#[command(long_about = "\
Server-rendered site for the Rose Ridge wedding venue

Pages are stories fetched from the Storyblok content API on every request
and rendered section by section. The same binary answers the publish
webhook and serves the visual-editor preview.

Environment (a .env file is loaded if present):

  STORYBLOK_ACCESS_TOKEN      content API token (required to render pages)
  STORYBLOK_REGION            eu, us, ap, ca or cn (overrides config.toml)
  STORYBLOK_WEBHOOK_SECRET    HMAC secret for POST /api/revalidate
  BUILD_HOOK_URL              deploy hook triggered by the webhook
  STORYBLOK_SPACE_ID          numeric space id, for `publish`
  STORYBLOK_MANAGEMENT_TOKEN  management API token, for `publish`

Log verbosity follows RUST_LOG (default: info).

Run 'roseridge gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site configuration file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Fetch one story and print the rendered page to stdout
    Render {
        /// Story slug, e.g. `home` or `venues/the-barn`
        slug: String,
        /// Fetch the draft version
        #[arg(long)]
        draft: bool,
        /// Render through the editor registry
        #[arg(long)]
        editor: bool,
    },
    /// Fetch one story and report how each block resolves
    Check {
        slug: String,
        /// Fetch the draft version
        #[arg(long)]
        draft: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Publish the current draft of a story through the Management API
    Publish {
        story_id: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Serve => {
            let site_config = config::load_config(&cli.config)?;
            let app = App::from_env(site_config)?;
            server::serve(Arc::new(app))?;
        }
        Command::Render {
            slug,
            draft,
            editor,
        } => {
            let app = App::from_env(config::load_config(&cli.config)?)?;
            let story = app.content.fetch_story_with_retry(&slug, version(draft))?;
            let kind = if editor {
                RegistryKind::Editor
            } else {
                RegistryKind::Clean
            };
            let ctx = RenderContext {
                kind,
                site_name: &app.config.site.name,
            };
            let href = app.stylesheet.href();
            let doc = Document {
                site_name: &app.config.site.name,
                stylesheet_href: &href,
                preview: false,
            };
            println!("{}", render::render_story(&story, &ctx, &doc)?.into_string());
        }
        Command::Check { slug, draft } => {
            let app = App::from_env(config::load_config(&cli.config)?)?;
            let story = app.content.fetch_story_with_retry(&slug, version(draft))?;
            output::print_check(&story);
            let gaps = output::editor_gaps(&story);
            if gaps > 0 {
                return Err(format!("{gaps} block(s) cannot be rendered in the editor").into());
            }
        }
        Command::Publish { story_id } => {
            let site_config = config::load_config(&cli.config)?;
            let transport = ReqwestTransport::new(site_config.content.timeout())?;
            management::publish_story(
                &transport,
                &Secrets::from_env(),
                &site_config.content.region,
                story_id,
            )?;
            output::print_publish(story_id);
        }
    }

    Ok(())
}

fn version(draft: bool) -> Version {
    if draft { Version::Draft } else { Version::Published }
}
