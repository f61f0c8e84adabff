use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::{load_settings_from, DEFAULT_CONFIG_FILE},
    BodyEncoding, CreateFailurePolicy, DashboardClient, DomDraftForm, DomFieldIds,
    EditorRegistry, HttpTransport, Page, Settlement, StaticElements, Transport,
};
use shared::domain::{AdvertisementDraft, RecordId};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "adctl", about = "Submit advertisement changes to the dashboard")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Overrides `base_url` from the config file and environment.
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct FieldArgs {
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long = "number")]
    advertisement_number: String,
    #[arg(long = "url")]
    website_url: String,
    #[arg(long, default_value = "")]
    description: String,
}

impl From<FieldArgs> for AdvertisementDraft {
    fn from(args: FieldArgs) -> Self {
        Self {
            title: args.title,
            advertisement_number: args.advertisement_number,
            website_url: args.website_url,
            description: args.description,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    Create {
        #[command(flatten)]
        fields: FieldArgs,
        /// Send the body as JSON instead of form-encoded.
        #[arg(long)]
        json: bool,
        /// Stay on the form instead of returning to the dashboard when the
        /// request fails.
        #[arg(long)]
        stay_on_failure: bool,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    Delete {
        id: String,
    },
}

/// Renders page effects on the terminal.
struct TerminalPage;

impl Page for TerminalPage {
    fn navigate(&self, url: &Url) {
        println!("-> navigate to {url}");
    }

    fn reload(&self) {
        println!("-> reload dashboard");
    }

    fn alert(&self, message: &str) {
        println!("[alert] {message}");
    }

    fn hide_modal(&self, modal_id: &str) {
        println!("-> close {modal_id}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings_from(&cli.config);
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    let endpoints = settings.endpoints()?;
    tracing::debug!(
        create = %endpoints.create,
        update = %endpoints.update,
        delete = %endpoints.delete,
        dashboard = %endpoints.dashboard,
        "resolved dashboard endpoints"
    );

    let transport: Arc<dyn Transport> = match settings.request_timeout() {
        Some(timeout) => Arc::new(
            HttpTransport::with_timeout(timeout).context("failed to build http transport")?,
        ),
        None => Arc::new(HttpTransport::new()),
    };
    let client = DashboardClient::new_with_dependencies(endpoints, transport, Arc::new(TerminalPage));

    let settlement = match cli.command {
        Command::Create {
            fields,
            json,
            stay_on_failure,
        } => {
            let draft = AdvertisementDraft::from(fields);
            let elements = StaticElements::new().with_fields(&DomFieldIds::create_form(), &draft);
            let form = DomDraftForm::new(Arc::new(elements));

            let encoding = if json {
                BodyEncoding::Json
            } else {
                settings.create_encoding
            };
            let failure_policy = if stay_on_failure {
                CreateFailurePolicy::StayOnForm
            } else {
                settings.create_failure_policy
            };

            client
                .create()
                .with_encoding(encoding)
                .with_failure_policy(failure_policy)
                .submit_form(&form)
                .await?
        }
        Command::Update { id, fields } => {
            let id = RecordId::new(id);
            let draft = AdvertisementDraft::from(fields);
            let elements = StaticElements::new().with_fields(&DomFieldIds::update_row(&id), &draft);
            let editors = EditorRegistry::from_dom(Arc::new(elements), [id.clone()]).await;

            let report = client
                .update(editors)
                .with_reload_delay(settings.reload_delay())
                .submit(&id)
                .await?;
            if let Some(reload) = report.reload {
                reload.await.context("reload task failed")?;
            }
            report.settlement
        }
        Command::Delete { id } => client.delete().submit(&RecordId::new(id)).await?,
    };

    match settlement {
        Settlement::Responded(outcome) if outcome.is_success() => Ok(()),
        Settlement::Responded(_) => bail!("the dashboard rejected the submission"),
        Settlement::TransportFailed(err) => Err(err).context("submission did not reach the dashboard"),
    }
}
