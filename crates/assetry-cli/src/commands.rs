//! Command handlers.
//!
//! Every handler writes its report to `out` so it can be exercised against a
//! buffer. Kind-generic commands dispatch once through [`with_entity!`] and
//! then run fully typed.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use assetry_client::{Gateway, create_remote_store};
use assetry_console::{
    Confirm, Console, Deletion, ImportSummary, Section, Tracked, metrics::WINDOW_DAYS,
};
use assetry_core::json::set_path;
use assetry_core::model::{Alert, ComplianceCheck, Integration, PolicyViolation, UserProfile};
use assetry_core::{Entity, EntityId, EntityKind, Patch, Record, Transition, Triage, with_entity};
use assetry_storage::{CacheBackend, FileCache};
use chrono::Utc;
use serde_json::Value;

use crate::cli::{Cli, Command, FilterArgs, ImportAction, ProfileAction, ReportAction, TriageAction};
use crate::config::{ConsoleConfig, RefreshConfig};
use crate::config_handlers::handle_config_command;
use crate::{Error, Result};

// ============================================================================
// Entry points
// ============================================================================

/// Runs a parsed command line.
///
/// Configuration commands and `sections` run without touching the remote
/// store. Everything else loads the configuration (fatal when invalid),
/// opens the console and refreshes every collection first.
pub async fn execute(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Command::Config { action } => handle_config_command(cli.config.as_deref(), action, out),
        Command::Sections => print_sections(out),
        command => {
            let config = ConsoleConfig::load(cli.config.as_deref())?;
            let console = open_console(&config)?;
            startup_refresh(&console).await;
            run(&console, &config.refresh, command, out).await
        }
    }
}

/// Builds the console from configuration.
pub fn open_console(config: &ConsoleConfig) -> Result<Console> {
    let remote = create_remote_store(&config.remote)?;
    let cache: Arc<dyn CacheBackend> = Arc::new(FileCache::new(&config.cache.dir));
    tracing::debug!(remote = remote.name(), cache = %config.cache.dir.display(), "Opening console");
    Ok(Console::new(Gateway::new(remote), cache))
}

/// Refreshes every collection concurrently. Failures fall back to cache.
pub async fn startup_refresh(console: &Console) {
    let outcomes = console.refresh_all().await;
    let stale: Vec<EntityKind> = outcomes
        .iter()
        .filter(|(_, outcome)| !outcome.is_fetched())
        .map(|(kind, _)| *kind)
        .collect();
    if !stale.is_empty() {
        tracing::warn!(?stale, "Showing cached data for some collections");
    }
}

/// Runs one console command.
pub async fn run(
    console: &Console,
    refresh: &RefreshConfig,
    command: Command,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Sections => print_sections(out),
        Command::List { kind, filter, json } => {
            with_entity!(kind, E => list::<E>(console, &filter, json, out).await)
        }
        Command::Show { kind, id } => with_entity!(kind, E => show::<E>(console, &id, out).await),
        Command::Create { kind, json } => {
            with_entity!(kind, E => create::<E>(console, &json, out).await)
        }
        Command::Update { kind, id, set } => {
            with_entity!(kind, E => update::<E>(console, &id, &set, out).await)
        }
        Command::Delete { kind, id, yes } => {
            let answer: &dyn Confirm = if yes { &true } else { &Prompt };
            with_entity!(kind, E => delete::<E>(console, &id, answer, out).await)
        }
        Command::Alert { action, ids } => triage::<Alert>(console, action, ids, out).await,
        Command::Violation { action, ids } => {
            triage::<PolicyViolation>(console, action, ids, out).await
        }
        Command::Dashboard => dashboard(console, out).await,
        Command::Financial => print_json(out, &console.financial().await),
        Command::Analytics => print_json(out, &console.analytics().await),
        Command::Compliance => print_json(out, &console.compliance().await),
        Command::Kit { id } => kit(console, &id, out).await,
        Command::Sync { id } => {
            let at = console.sync_integration(&EntityId::new(id.as_str())).await?;
            writeln!(out, "Synced integration {id} at {}", at.to_rfc3339())?;
            Ok(())
        }
        Command::Report { action } => match action {
            ReportAction::Run { id } => {
                let at = console.run_report(&EntityId::new(id.as_str())).await?;
                writeln!(out, "Ran report {id} at {}", at.to_rfc3339())?;
                Ok(())
            }
        },
        Command::Import { action } => import(console, action, out).await,
        Command::Profile { action } => profile(console, action, out).await,
        Command::Watch { every, count } => {
            watch(console, refresh, Duration::from_secs(every), count, out).await
        }
        Command::Config { .. } => Err(Error::argument(
            "configuration commands run without a console",
        )),
    }
}

// ============================================================================
// Confirmation
// ============================================================================

/// Asks on the terminal before a delete.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prompt;

impl Confirm for Prompt {
    fn confirm(&self, question: &str) -> bool {
        eprint!("{question} [y/N] ");
        let _ = std::io::stderr().flush();
        read_answer(&mut std::io::stdin().lock())
    }
}

/// Reads one line and returns `true` for `y` or `yes`. Anything else,
/// including end of input, means no.
pub fn read_answer(input: &mut dyn BufRead) -> bool {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

// ============================================================================
// Generic record commands
// ============================================================================

fn print_sections(out: &mut dyn Write) -> Result<()> {
    for section in Section::ALL {
        let kinds: Vec<&str> = section.kinds().iter().map(|k| k.as_str()).collect();
        if kinds.is_empty() {
            writeln!(out, "{:<18} {}", section.as_str(), section.label())?;
        } else {
            writeln!(
                out,
                "{:<18} {} ({})",
                section.as_str(),
                section.label(),
                kinds.join(", ")
            )?;
        }
    }
    Ok(())
}

async fn list<E: Tracked>(
    console: &Console,
    args: &FilterArgs,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let records = console.list::<E>().await;
    let filter = args.to_filter();
    let rows: Vec<&Record<E>> = filter.apply(&records).collect();
    if json {
        return print_json(out, &rows);
    }
    for record in &rows {
        writeln!(out, "{}\t{}", record.id, record.fields.title())?;
    }
    writeln!(
        out,
        "{} of {} {}",
        rows.len(),
        records.len(),
        E::KIND.label().to_lowercase()
    )?;
    Ok(())
}

async fn show<E: Tracked>(console: &Console, id: &str, out: &mut dyn Write) -> Result<()> {
    let record = console.require::<E>(&EntityId::new(id)).await?;
    print_json(out, &record)
}

async fn create<E: Tracked>(console: &Console, json: &str, out: &mut dyn Write) -> Result<()> {
    let fields: E = serde_json::from_str(json)?;
    let record = console.create(fields).await?;
    writeln!(out, "Created {} {}", E::KIND, record.id)?;
    Ok(())
}

async fn update<E: Tracked>(
    console: &Console,
    id: &str,
    assignments: &[String],
    out: &mut dyn Write,
) -> Result<()> {
    let mut patch = Patch::<E>::new();
    for assignment in assignments {
        let (field, value) = parse_assignment(assignment)?;
        patch.insert(field, value);
    }
    console.update(&EntityId::new(id), &patch).await?;
    writeln!(out, "Updated {} {id} ({} field(s))", E::KIND, patch.len())?;
    Ok(())
}

async fn delete<E: Tracked>(
    console: &Console,
    id: &str,
    answer: &dyn Confirm,
    out: &mut dyn Write,
) -> Result<()> {
    match console.delete::<E>(&EntityId::new(id), answer).await? {
        Deletion::Deleted => writeln!(out, "Deleted {} {id}", E::KIND)?,
        Deletion::Declined => writeln!(out, "Kept {} {id}", E::KIND)?,
    }
    Ok(())
}

async fn triage<E: Tracked + Triage>(
    console: &Console,
    action: TriageAction,
    ids: Vec<String>,
    out: &mut dyn Write,
) -> Result<()> {
    let transition = Transition::from(action);
    let ids: Vec<EntityId> = ids.into_iter().map(EntityId::from).collect();
    if let [id] = ids.as_slice() {
        let phase = console.transition::<E>(id, transition).await?;
        writeln!(out, "{} {id} is now {}", E::KIND, format!("{phase:?}").to_lowercase())?;
    } else {
        let outcome = console.bulk_transition::<E>(&ids, transition).await;
        writeln!(out, "{transition}: ran on {} record(s)", outcome.attempted)?;
    }
    Ok(())
}

// ============================================================================
// Aggregates and features
// ============================================================================

async fn dashboard(console: &Console, out: &mut dyn Write) -> Result<()> {
    let dashboard = console.dashboard().await;
    for (kind, count) in &dashboard.counts {
        writeln!(out, "{:<24}{count:>10}", kind.label())?;
    }
    writeln!(out)?;
    writeln!(out, "{:<24}{:>10}", "Active alerts", dashboard.active_alerts)?;
    let expiring = [
        ("Expiring warranties", dashboard.expiring_warranties),
        ("Expiring licenses", dashboard.expiring_licenses),
        ("Maintenance due", dashboard.maintenance_due),
    ];
    for (label, count) in expiring {
        writeln!(out, "{:<24}{count:>10}", format!("{label} ({WINDOW_DAYS}d)"))?;
    }
    writeln!(out, "{:<24}{:>10}", "Compliance issues", dashboard.compliance_issues)?;
    writeln!(out, "{:<24}{:>10.2}", "Total value", dashboard.total_value)?;
    Ok(())
}

async fn kit(console: &Console, id: &str, out: &mut dyn Write) -> Result<()> {
    let kit_id = EntityId::new(id);
    let kit = console.require::<assetry_core::model::Kit>(&kit_id).await?;
    let contents = console.kit_contents(&kit_id).await?;
    writeln!(out, "{} ({} of {} members found)", kit.name, contents.resolved(), kit.member_count())?;
    print_members(out, "Assets", &contents.assets)?;
    print_members(out, "Accessories", &contents.accessories)?;
    print_members(out, "Licenses", &contents.licenses)?;
    print_members(out, "Consumables", &contents.consumables)?;
    if !contents.dangling.is_empty() {
        writeln!(out, "Missing:")?;
        for (kind, id) in &contents.dangling {
            writeln!(out, "  {kind}\t{id}")?;
        }
    }
    Ok(())
}

fn print_members<E: Entity>(out: &mut dyn Write, heading: &str, records: &[Record<E>]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    writeln!(out, "{heading}:")?;
    for record in records {
        writeln!(out, "  {}\t{}", record.id, record.fields.title())?;
    }
    Ok(())
}

async fn import(console: &Console, action: ImportAction, out: &mut dyn Write) -> Result<()> {
    match action {
        ImportAction::Begin { file, import_type } => {
            let record = console.begin_import(file, import_type).await?;
            writeln!(out, "Import {} started for {}", record.id, record.file_name)?;
        }
        ImportAction::Finish {
            id,
            processed,
            total,
            errors,
        } => {
            let summary = ImportSummary {
                processed,
                total,
                errors,
            };
            let status = console.finish_import(&EntityId::new(id.as_str()), &summary).await?;
            writeln!(out, "Import {id} {status}: {processed}/{total} processed")?;
        }
    }
    Ok(())
}

async fn profile(console: &Console, action: ProfileAction, out: &mut dyn Write) -> Result<()> {
    match action {
        ProfileAction::Show => print_json(out, &console.profile().await),
        ProfileAction::Set { assignments } => {
            let mut value = serde_json::to_value(console.profile().await)?;
            for assignment in &assignments {
                let (field, next) = parse_assignment(assignment)?;
                if !is_profile_path(&value, field) {
                    return Err(Error::argument(format!("Unknown profile field '{field}'")));
                }
                set_path(&mut value, field, next)?;
            }
            let edited: UserProfile = serde_json::from_value(value)?;
            let saved = console.update_profile(|profile| *profile = edited).await?;
            writeln!(out, "Profile saved for {} {}", saved.first_name, saved.last_name)?;
            Ok(())
        }
    }
}

fn is_profile_path(profile: &Value, path: &str) -> bool {
    assetry_core::json::get_path(profile, path).is_some()
}

// ============================================================================
// Watch
// ============================================================================

async fn watch(
    console: &Console,
    refresh: &RefreshConfig,
    every: Duration,
    count: Option<u64>,
    out: &mut dyn Write,
) -> Result<()> {
    let _tasks = [
        console.schedule_refresh::<ComplianceCheck>(refresh.compliance()),
        console.schedule_refresh::<PolicyViolation>(refresh.compliance()),
        console.schedule_refresh::<Integration>(refresh.integrations()),
    ];
    let mut ticker = tokio::time::interval(every.max(Duration::from_secs(1)));
    let mut printed = 0u64;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                writeln!(out, "{}", status_line(console).await)?;
                out.flush()?;
                printed += 1;
                if count.is_some_and(|limit| printed >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }
    Ok(())
}

async fn status_line(console: &Console) -> String {
    let compliance = console.compliance().await;
    let dashboard = console.dashboard().await;
    let open_violations: usize = compliance.open_violations.values().sum();
    let (synced, integrations) = console
        .read(|stores| {
            let synced = stores.integrations.iter().filter(|i| i.last_sync.is_some()).count();
            (synced, stores.integrations.len())
        })
        .await;
    format!(
        "{} compliance {:.1}% ({} non-compliant, {} open violations), {} active alerts, {synced}/{integrations} integrations synced",
        Utc::now().format("%H:%M:%S"),
        compliance.score,
        compliance.non_compliant,
        open_violations,
        dashboard.active_alerts,
    )
}

// ============================================================================
// Helpers
// ============================================================================

fn print_json<T: serde::Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Splits `field=value`. The value is read as JSON when it parses as JSON,
/// otherwise taken as a plain string.
pub fn parse_assignment(assignment: &str) -> Result<(&str, Value)> {
    let (field, raw) = assignment
        .split_once('=')
        .ok_or_else(|| Error::argument(format!("Expected FIELD=VALUE, got '{assignment}'")))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(Error::argument(format!("Missing field name in '{assignment}'")));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((field, value))
}
