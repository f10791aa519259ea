//! Command-line host for the Postmark template API.
//!
//! The server token is read from `POSTMARK_SERVER_TOKEN` (a `.env` file in
//! the working directory is honored), never from the command line.
//!
//! # Usage
//!
//! ```bash
//! # List the first ten templates
//! postmark-templates list --offset 0 --count 10
//!
//! # Create a template
//! postmark-templates create --name "Password Reset" --subject "Reset your password" \
//!     --text "Click the following link to reset your password: {{reset_link}}"
//!
//! # Change only the subject of an existing template
//! postmark-templates update 36087615 --subject "Updated Subject"
//!
//! # Delete a template
//! postmark-templates delete 36087615
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use postmark_templates_core::{ClientConfig, Template, TemplateApi};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(name = "postmark-templates")]
#[command(about = "Manage Postmark email templates", long_about = None)]
struct Cli {
    /// Override the API host (defaults to POSTMARK_BASE_URL or the public API)
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a template and print its id
    Create(TemplateArgs),
    /// Print a template
    Get {
        /// Template id
        id: i64,
    },
    /// Change fields of an existing template
    Update {
        /// Template id
        id: i64,
        #[command(flatten)]
        changes: TemplateChanges,
    },
    /// Delete a template
    Delete {
        /// Template id
        id: i64,
    },
    /// List templates
    List {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        count: i64,
    },
    /// Ask the server to validate a template without saving it
    Validate(TemplateArgs),
}

#[derive(Args, Debug)]
struct TemplateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    subject: String,
    /// HTML body
    #[arg(long, default_value = "")]
    html: String,
    /// Plain-text body
    #[arg(long, default_value = "")]
    text: String,
    #[arg(long, default_value = "")]
    alias: String,
    #[arg(long)]
    active: bool,
}

impl TemplateArgs {
    fn into_template(self) -> Template {
        Template {
            alias: self.alias,
            active: self.active,
            ..Template::new(&self.name, &self.subject, &self.html, &self.text)
        }
    }
}

#[derive(Args, Debug, Default)]
struct TemplateChanges {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    html: Option<String>,
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    alias: Option<String>,
    #[arg(long)]
    active: Option<bool>,
}

impl TemplateChanges {
    fn apply(self, template: &mut Template) {
        if let Some(name) = self.name {
            template.name = name;
        }
        if let Some(subject) = self.subject {
            template.subject = subject;
        }
        if let Some(html) = self.html {
            template.html_body = html;
        }
        if let Some(text) = self.text {
            template.text_body = text;
        }
        if let Some(alias) = self.alias {
            template.alias = alias;
        }
        if let Some(active) = self.active {
            template.active = active;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let mut config = ClientConfig::from_env().context("POSTMARK_SERVER_TOKEN must be set")?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    let api = TemplateApi::from_config(&config)?;

    run(&api, cli.command)
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn run(api: &TemplateApi, command: Commands) -> Result<()> {
    match command {
        Commands::Create(args) => {
            let id = api
                .create_template(&args.into_template())
                .context("Error creating template")?;
            println!("Template created with ID: {id}");
        }
        Commands::Get { id } => {
            let template = api.get_template(id).context("Error getting template")?;
            print_template(&template);
        }
        Commands::Update { id, changes } => {
            let mut template = api.get_template(id).context("Error getting template")?;
            // The id from the command line wins over whatever the body carried.
            template.id = Some(id);
            changes.apply(&mut template);
            api.update_template(&template).context("Error updating template")?;
            println!("Template updated successfully");
        }
        Commands::Delete { id } => {
            api.delete_template(id).context("Error deleting template")?;
            println!("Template deleted successfully");
        }
        Commands::List { offset, count } => {
            let list = api
                .list_templates(offset, count)
                .context("Error listing templates")?;
            println!("Total Templates: {}", list.total_count);
            for t in &list.templates {
                println!(
                    "ID: {}, Name: {}, Active: {}, Subject: {}",
                    t.id.unwrap_or_default(),
                    t.name,
                    t.active,
                    t.subject
                );
            }
        }
        Commands::Validate(args) => {
            api.validate_template(&args.into_template()).context("Error validating template")?;
            println!("Template validated successfully");
        }
    }
    Ok(())
}

fn print_template(template: &Template) {
    println!("ID: {}", template.id.unwrap_or_default());
    println!("Name: {}", template.name);
    println!("Subject: {}", template.subject);
    if !template.alias.is_empty() {
        println!("Alias: {}", template.alias);
    }
    println!("Active: {}", template.active);
    println!("HTML body:\n{}", template.html_body);
    println!("Text body:\n{}", template.text_body);
}
