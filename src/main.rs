//! MUX CLI
//!
//! Command-line front-end for the MUX dashboard:
//! - Sign in, sign up, reset a password
//! - Manage short links
//! - Browse monthly expense statistics
//! - Upload, download and delete stored files (admins only)

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use mux_client::guard::{self, GuardDecision, Route};
use mux_client::views::{auth, dashboard};
use mux_client::{
    ApiClient, AuthOutcome, Config, ExpensesView, FileBrowser, FileStore, LinksView, LoginForm,
    ResetPasswordForm, Session, SignupForm,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mux")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for the MUX link, expense and file dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: <config dir>/mux/config.toml, then ./mux.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overrides the configured one
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Password confirmation (default: same as --password)
        #[arg(long)]
        confirm_password: Option<String>,
    },

    /// Request a password reset link
    ResetPassword {
        #[arg(short, long)]
        email: String,
    },

    /// Drop the stored session
    Logout,

    /// Show the current session
    Whoami,

    /// Manage short links
    Links {
        #[command(subcommand)]
        action: Option<LinkAction>,
    },

    /// Show expense statistics for a month
    Expenses {
        /// Month as "MMM yyyy", e.g. "Mar 2024" (default: current month)
        #[arg(short, long)]
        month: Option<String>,
        /// Table page, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Rows per table page
        #[arg(short, long, default_value = "10")]
        rows: usize,
    },

    /// Manage stored files
    Files {
        #[command(subcommand)]
        action: Option<FileAction>,
    },

    /// Show or toggle the dark mode preference
    Theme {
        /// Flip the preference
        #[arg(long)]
        toggle: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum LinkAction {
    /// List links
    List,
    /// Shorten a URL
    Create { name: String, url: String },
    /// Delete a link
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum FileAction {
    /// List files
    List,
    /// Upload a local file
    Upload { path: PathBuf },
    /// Download a file by entry id
    Download {
        id: String,
        /// Target directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Delete a file by entry id
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = mux_client::generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = Config::load_default(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Err(e) = mux_client::logging::init_logging(&config.logging) {
        eprintln!("Logging disabled: {}", e);
    }

    let state_dir = config.state_dir();
    let store = FileStore::open(&state_dir)
        .with_context(|| format!("Cannot open session state in {:?}", state_dir))?;
    let session = Arc::new(Session::new(Arc::new(store)));
    let client = ApiClient::new(config.client_config(), session.clone())?;
    let json = cli.format == "json";

    match cli.command {
        Commands::Login { email, password } => {
            let form = LoginForm::new(email, password);
            report(auth::login(&session, &client, &form).await)?;
        }

        Commands::Signup {
            name,
            surname,
            email,
            password,
            confirm_password,
        } => {
            let form = SignupForm {
                name,
                surname,
                email,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
            };
            report(auth::signup(&session, &client, &form).await)?;
        }

        Commands::ResetPassword { email } => {
            let form = ResetPasswordForm::new(email);
            report(auth::reset_password(&client, &form).await)?;
        }

        Commands::Logout => {
            session.logout();
            println!("Logged out.");
        }

        Commands::Whoami => {
            if !session.is_authenticated() {
                println!("Not logged in.");
                return Ok(());
            }
            let claims = session.claims().context("Session token cannot be decoded")?;
            if json {
                print_json(&claims)?;
            } else {
                println!("Email: {}", claims.email.as_deref().unwrap_or("-"));
                println!(
                    "Role:  {}",
                    claims.role.map(|r| r.to_string()).unwrap_or_else(|| "-".into())
                );
                if let Some(secs) = claims.expires_in(chrono::Utc::now().timestamp()) {
                    println!("Expires in: {}", format_duration(secs.max(0) as u64));
                }
            }
        }

        Commands::Links { action } => {
            require(&session, Route::Links)?;
            let mut view = LinksView::new(client);

            match action.unwrap_or(LinkAction::List) {
                LinkAction::List => {
                    view.refresh().await?;
                }
                LinkAction::Create { name, url } => {
                    let link = view.create(&name, &url).await?;
                    println!("Created {}", link.copy_url());
                }
                LinkAction::Delete { id } => {
                    view.delete(&id).await?;
                    println!("Deleted link {}", id);
                }
            }

            if json {
                print_json(view.links())?;
            } else {
                print_links(&view);
            }
        }

        Commands::Expenses { month, page, rows } => {
            require(&session, Route::Expenses)?;
            let mut view = ExpensesView::new(client);
            view.refresh().await?;

            if let Some(month) = month {
                view.select_month(month);
            }
            view.set_rows_per_page(rows);
            view.set_page(page.saturating_sub(1));

            if json {
                print_json(&serde_json::json!({
                    "month": view.selected_month(),
                    "summary": view.summary(),
                    "expenses": view.page_rows(),
                }))?;
            } else {
                print_expenses(&view);
            }
        }

        Commands::Files { action } => {
            require(&session, Route::Files)?;
            let mut browser = FileBrowser::new(client);
            browser.refresh().await?;

            match action.unwrap_or(FileAction::List) {
                FileAction::List => {
                    if json {
                        print_json(browser.files())?;
                    } else {
                        print_files(&browser);
                    }
                }
                FileAction::Upload { path } => {
                    let entry = upload(&mut browser, path).await?;
                    println!("Uploaded {}", entry.file_name);
                }
                FileAction::Download { id, dir } => {
                    let target = browser.download_to(&id, &dir).await?;
                    println!("Saved to {:?}", target);
                }
                FileAction::Delete { id } => {
                    browser.delete(&id).await?;
                    println!("Deleted file {}", id);
                }
            }
        }

        Commands::Theme { toggle } => {
            let store = session.store().clone();
            let dark_mode = if toggle {
                let flipped = !dashboard::load_dark_mode(store.as_ref());
                dashboard::save_dark_mode(store.as_ref(), flipped)?;
                flipped
            } else {
                dashboard::load_dark_mode(store.as_ref())
            };
            println!("Dark mode: {}", if dark_mode { "on" } else { "off" });
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Stop unless the guard lets `route` render
fn require(session: &Session, route: Route) -> anyhow::Result<()> {
    match guard::evaluate(session, route.required_role()) {
        GuardDecision::Render => Ok(()),
        GuardDecision::RedirectToLogin => {
            bail!("Not logged in. Sign in with: mux login --email <email> --password <password>")
        }
        GuardDecision::RedirectToHome => bail!("{} requires the ADMIN role", route.path()),
    }
}

fn report(outcome: AuthOutcome) -> anyhow::Result<()> {
    match outcome {
        AuthOutcome::Succeeded { message, .. } => {
            println!("{}", message);
            Ok(())
        }
        AuthOutcome::Failed(message) => bail!(message),
        AuthOutcome::Invalid(errors) => {
            for error in &errors {
                eprintln!("  {}", error);
            }
            bail!("Invalid input")
        }
    }
}

async fn upload(
    browser: &mut FileBrowser,
    path: PathBuf,
) -> anyhow::Result<mux_client::FileEntry> {
    let mut task = browser.upload_path(&path).await?;

    loop {
        tokio::select! {
            progress = task.next_progress() => match progress {
                Some(p) => {
                    browser.record_progress(p);
                    eprint!("\rUploading {}: {:>5.1}%", task.file_name(), p);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                browser.cancel_upload(&task);
                break;
            }
        }
    }
    eprintln!();

    Ok(browser.finish_upload(task).await?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_links(view: &LinksView) {
    if view.links().is_empty() {
        println!("No links yet.");
        println!();
        println!("Create your first link with:");
        println!("  mux links create docs https://example.com/docs");
        return;
    }

    println!(
        "{:<26} {:<16} {:<32} {:>7} {}",
        "ID", "Name", "Short URL", "Clicks", "Created"
    );
    println!("{}", "-".repeat(96));
    for link in view.links() {
        println!(
            "{:<26} {:<16} {:<32} {:>7} {}",
            link.id,
            link.name,
            link.copy_url(),
            link.clicks,
            link.created_at.format("%Y-%m-%d")
        );
    }
}

fn print_expenses(view: &ExpensesView) {
    println!("Month: {}", view.selected_month());
    match view.summary() {
        Some(summary) => {
            println!("Total: {:.2}", summary.total);
            for t in &summary.types {
                println!("  {:<20} {:>10.2}", t.name, t.amount);
            }
        }
        None => println!("No expenses this month."),
    }

    let rows = view.page_rows();
    if rows.is_empty() {
        return;
    }

    println!();
    println!(
        "{:<12} {:<24} {:<14} {:>10}",
        "Date", "Name", "Type", "Price"
    );
    println!("{}", "-".repeat(63));
    for expense in rows {
        let date = expense
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} {:<24} {:<14} {:>10.2}",
            date, expense.expense_name, expense.expense_type, expense.price
        );
    }
    println!(
        "Page {} of {}",
        view.page() + 1,
        view.page_count().max(1)
    );
}

fn print_files(browser: &FileBrowser) {
    if browser.files().is_empty() {
        println!("No files stored.");
        return;
    }

    println!("{:<26} {:<10} {}", "ID", "Kind", "Name");
    println!("{}", "-".repeat(60));
    for file in browser.files() {
        println!(
            "{:<26} {:<10} {}",
            file.id,
            file.kind().label(),
            file.file_name
        );
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
