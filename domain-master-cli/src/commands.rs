//! Subcommand handlers.

use std::io::Read as _;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use domain_master_app::AppState;
use domain_master_core::CoreResult;
use domain_master_core::services::RefreshHooks;
use domain_master_core::types::{
    Domain, DomainQuery, DomainUpdate, ImportResult, LookupOutcome, RefreshProgress,
    SortDirection,
};

use crate::args::Commands;
use crate::output;

pub async fn run(app: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::List {
            search,
            status,
            sort,
            desc,
        } => {
            let query = DomainQuery {
                search,
                status: status.map(Into::into),
                sort: sort.map(|field| {
                    let direction = if desc {
                        SortDirection::Desc
                    } else {
                        SortDirection::Asc
                    };
                    (field.into(), direction)
                }),
            };
            let domains = app.domain_service.query(&query).await?;
            print!("{}", output::format_table(&domains, Utc::now()));
        }
        Commands::Add { names } => {
            let result = app.domain_service.import_names(&names).await?;
            report_import(&result);
        }
        Commands::Import { file } => {
            let text = read_input(&file)?;
            let result = app.domain_service.import_text(&text).await?;
            report_import(&result);
        }
        Commands::Show { name, raw } => {
            let domain = find(app, &name).await?;
            print!("{}", output::format_domain(&domain, Utc::now(), raw));
        }
        Commands::Edit {
            name,
            status,
            registrar,
            registered,
            expires,
            notes,
            clear_dates,
        } => {
            let update = DomainUpdate {
                status: status.map(Into::into),
                registrar,
                registration_date: if clear_dates {
                    Some(None)
                } else {
                    registered.map(Some)
                },
                expiration_date: if clear_dates {
                    Some(None)
                } else {
                    expires.map(Some)
                },
                raw_whois: None,
                notes,
            };
            if update.is_empty() {
                bail!("Nothing to change; pass at least one field option");
            }
            let domain = find(app, &name).await?;
            let updated = app.domain_service.update(&domain.id, update).await?;
            print!("{}", output::format_domain(&updated, Utc::now(), false));
        }
        Commands::Remove { name } => {
            let domain = find(app, &name).await?;
            let removed = app.domain_service.delete(&domain.id).await?;
            println!("Removed {}", removed.name);
        }
        Commands::Refresh { names } => refresh(app, &names).await?,
        Commands::Stats => {
            let stats = app.domain_service.stats().await?;
            print!("{}", output::format_stats(&stats));
        }
    }
    Ok(())
}

async fn find(app: &AppState, name: &str) -> Result<Domain> {
    app.domain_service
        .find_by_name(name)
        .await?
        .with_context(|| format!("Domain not tracked: {}", Domain::normalize_name(name)))
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read domains from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn report_import(result: &ImportResult) {
    for domain in &result.added {
        println!("Added {}", domain.name);
    }
    if !result.skipped.is_empty() {
        println!(
            "Skipped {} already tracked: {}",
            result.skipped.len(),
            result.skipped.join(", ")
        );
    }
}

/// Prints progress and stops before the next item after Ctrl-C.
struct ConsoleHooks {
    cancelled: Arc<AtomicBool>,
}

#[async_trait]
impl RefreshHooks for ConsoleHooks {
    async fn on_progress(&self, progress: &RefreshProgress) {
        eprintln!("{}", output::progress_line(progress));
    }

    async fn on_item_updated(&self, domain: &Domain, outcome: &LookupOutcome) -> CoreResult<()> {
        eprintln!("  {}: {}", domain.name, outcome.update_status());
        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

async fn refresh(app: &AppState, names: &[String]) -> Result<()> {
    let cancelled = Arc::new(AtomicBool::new(false));
    let watcher = {
        let cancelled = Arc::clone(&cancelled);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Cancelling after the current domain...");
                cancelled.store(true, Ordering::SeqCst);
            }
        })
    };
    let hooks = ConsoleHooks { cancelled };

    let result = if names.is_empty() {
        app.refresh_all(&hooks).await
    } else {
        app.refresh_names(names, &hooks).await
    };
    watcher.abort();

    let summary = result.context("Refresh stopped")?;
    println!("{}", output::summary_line(&summary));
    Ok(())
}
