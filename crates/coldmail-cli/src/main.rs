use clap::{Parser, Subcommand};
use coldmail_core::{classify, Reference, ReferenceKind};
use coldmail_pipeline::{Generated, Pipeline, ResultCache};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "coldmail-cli")]
#[command(about = "Generate short personalized outreach emails from profile references")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show how a profile reference is classified
    Classify {
        /// Profile or company reference, e.g. /in/jane-doe
        reference: String,
    },
    /// Fetch the profile and generate an email for it
    Generate {
        /// Profile or company reference, e.g. https://www.linkedin.com/company/acme/
        #[arg(long)]
        reference: String,
        /// What is being pitched (200 characters max)
        #[arg(long)]
        product: String,
        /// Print the result as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { reference } => {
            init_tracing("warn")?;
            println!("{}", describe_reference(&classify(&reference)));
        }
        Commands::Generate {
            reference,
            product,
            json,
        } => {
            let config = coldmail_core::load_app_config()?;
            init_tracing(&config.log_level)?;

            let pipeline = Pipeline::from_config(&config, ResultCache::new())?;
            match pipeline.run(&reference, &product).await {
                Ok(generated) if json => {
                    println!("{}", serde_json::to_string_pretty(&generated_json(&generated))?);
                }
                Ok(generated) => println!("{}", render_generated(&generated)),
                Err(e) => {
                    tracing::debug!(error = ?e, "pipeline run failed");
                    anyhow::bail!("{} (step: {})", e.user_message(), e.step());
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(fallback: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn describe_reference(reference: &Reference) -> String {
    match (reference.kind(), reference.identifier()) {
        (ReferenceKind::Invalid, _) | (_, None) => Reference::validation_message().to_string(),
        (kind, Some(identifier)) => format!(
            "kind:       {kind}\nidentifier: {identifier}\nurl:        {}",
            reference.canonical_url().unwrap_or_default()
        ),
    }
}

fn render_generated(generated: &Generated) -> String {
    let profile = &generated.profile;
    let mut header = format!("To: {} ({})", profile.name, profile.kind);
    if !profile.headline.is_empty() {
        header.push_str(&format!("\n    {}", profile.headline));
    }
    format!("{header}\n\n{}", generated.result.email)
}

fn generated_json(generated: &Generated) -> serde_json::Value {
    serde_json::json!({
        "email": generated.result.email,
        "profile": generated.profile,
    })
}

#[cfg(test)]
mod tests;
