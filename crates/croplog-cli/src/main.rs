use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use croplog_core::{CascadeChoice, ClockIn, Employee, FieldKey, FieldValue};
use croplog_refdata::{
    find_zone, group_work_types, work_type_map, EmployeeFilter, FileSource, ReferenceSource,
    ZoneNode,
};
use croplog_session::{Config, Notifier, OutboxSubmitter, RecordSession, SessionState};
use croplog_storage::KvStore;
use croplog_storage_sqlite::SqliteBackend;

#[derive(Parser)]
#[command(name = "croplog", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClockInArg {
    Yes,
    No,
}

impl From<ClockInArg> for ClockIn {
    fn from(arg: ClockInArg) -> Self {
        match arg {
            ClockInArg::Yes => ClockIn::Yes,
            ClockInArg::No => ClockIn::No,
        }
    }
}

#[derive(Args)]
struct FilterArgs {
    /// Restrict to one position id
    #[arg(long)]
    position: Option<i64>,

    /// Restrict by clock-in status
    #[arg(long, value_enum)]
    clock_in: Option<ClockInArg>,

    /// Substring match over employee number and name
    #[arg(long)]
    keywords: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> EmployeeFilter {
        EmployeeFilter {
            position_id: self.position,
            clock_in: self.clock_in.map(ClockIn::from),
            keywords: self.keywords.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Initialize croplog in the current directory (creates .croplog/, config, db)
    Init {
        /// Base (farm site) id this directory records for
        #[arg(long, default_value = "base-1")]
        base: String,
    },

    /// Show the current task state, selection and draft
    Status,

    /// List the employee roster, with selection markers
    Employees {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Select employees by id
    Select { ids: Vec<String> },

    /// Unselect employees by id
    Unselect { ids: Vec<String> },

    /// Toggle one employee's selection
    Toggle { id: String },

    /// Select every employee matching the filter
    SelectAll {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Unselect every employee matching the filter
    UnselectAll {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Empty the selection
    ClearSelection,

    /// List the zone cascade
    Zones,

    /// List work types grouped as on the cascader
    WorkTypes,

    /// List crop categories
    Categories,

    /// List planting areas for the currently chosen zone
    Areas,

    /// Set one draft field
    Set {
        #[command(subcommand)]
        field: SetField,
    },

    /// Unset one draft field by name (e.g. remark, planting_area)
    Unset { field: FieldKey },

    /// Replace the draft with the empty baseline (selection is kept)
    ResetForm,

    /// Assemble the record and hand it to the outbox; clears the task on success
    Submit,
}

#[derive(Subcommand)]
enum SetField {
    /// Choose the leaf work type; records its piece unit as well
    WorkType { id: i64 },
    /// Choose the zone by id (any node of the zone cascade)
    Zone { id: i64 },
    /// Choose a planting area within the current zone
    Area { id: i64 },
    /// Choose the crop category
    Category { id: i64 },
    /// Piece-work amount, in the chosen work type's unit
    PieceCount { count: u32 },
    /// Timed work amount in hours
    Hours { hours: f64 },
    /// Free-form remark
    Remark { text: String },
    /// Work interval as unix seconds
    Time { start: i64, end: i64 },
}

struct PrintNotifier;

impl Notifier for PrintNotifier {
    fn success(&self, message: &str) {
        println!("{message}");
    }
    fn failure(&self, message: &str) {
        println!("{message}");
    }
}

fn open_config(root: &Path) -> Result<Config> {
    let path = Config::config_path(root);
    if !path.exists() {
        return Err(anyhow!(
            "no config at {}; run `croplog init` first",
            path.display()
        ));
    }
    Config::load_from(&path)
}

fn open_session(root: &Path, cfg: &Config) -> Result<RecordSession> {
    let backend = SqliteBackend::open(&Config::db_path(root))?;
    Ok(RecordSession::open(
        KvStore::new(Arc::new(backend)),
        cfg.task_key(),
    ))
}

fn refdata(root: &Path, cfg: &Config) -> FileSource {
    FileSource::new(&cfg.refdata_root(root), &cfg.base.id)
}

fn find_employee(source: &FileSource, id: &str) -> Result<Employee> {
    let roster = source.employees(&EmployeeFilter::default())?;
    roster
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| anyhow!("no employee with id {id}"))
}

fn print_zone_level(zones: &[ZoneNode], depth: usize) {
    for zone in zones {
        println!("{}{} [{}] {}", "  ".repeat(depth), zone.id, zone.code, zone.name);
        print_zone_level(&zone.children, depth + 1);
    }
}

fn current_zone_id(session: &RecordSession) -> Result<i64> {
    session
        .draft()
        .get(FieldKey::Zone)
        .and_then(FieldValue::as_id)
        .ok_or_else(|| anyhow!("no zone chosen yet; run `croplog set zone <id>`"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let root = std::env::current_dir()?;

    match cli.cmd {
        Command::Init { base } => {
            let cfg_path = Config::config_path(&root);
            let cfg = if cfg_path.exists() {
                Config::load_from(&cfg_path)?
            } else {
                let cfg = Config::default_for(&base);
                cfg.save_to(&cfg_path)?;
                cfg
            };
            let _ = SqliteBackend::open(&Config::db_path(&root))?;
            std::fs::create_dir_all(cfg.refdata_root(&root).join(&cfg.base.id))?;
            println!("Initialized croplog for {} in {}", cfg.base.id, root.display());
        }
        Command::Status => {
            let cfg = open_config(&root)?;
            let session = open_session(&root, &cfg)?;
            println!("base: {}", cfg.base.id);
            println!("task: {}", cfg.task_key());
            let state = match session.state() {
                SessionState::Empty => "EMPTY",
                SessionState::Active => "ACTIVE",
            };
            println!("state: {state}");
            println!("selected employees ({}):", session.selection().len());
            for emp in session.selection().items() {
                println!("  {} {} ({})", emp.employee_no, emp.name, emp.id);
            }
            println!("draft:");
            for (key, value) in session.draft().fields() {
                println!("  {} = {}", key, serde_json::to_string(value)?);
            }
        }
        Command::Employees { filter } => {
            let cfg = open_config(&root)?;
            let session = open_session(&root, &cfg)?;
            let source = refdata(&root, &cfg);
            for emp in source.employees(&filter.to_filter())? {
                let marker = if session.selection().contains(&emp.id) {
                    "[x]"
                } else {
                    "[ ]"
                };
                let clock = match emp.clock_in {
                    Some(ClockIn::Yes) => " clocked-in",
                    Some(ClockIn::No) => " not-clocked-in",
                    None => "",
                };
                println!("{marker} {} {} ({}){clock}", emp.employee_no, emp.name, emp.id);
            }
        }
        Command::Select { ids } => {
            let cfg = open_config(&root)?;
            let mut session = open_session(&root, &cfg)?;
            let source = refdata(&root, &cfg);
            for id in ids {
                let emp = find_employee(&source, &id)?;
                if session.select(emp) {
                    println!("selected {id}");
                } else {
                    println!("{id} already selected");
                }
            }
        }
        Command::Unselect { ids } => {
            let cfg = open_config(&root)?;
            let mut session = open_session(&root, &cfg)?;
            for id in ids {
                if session.unselect(&id) {
                    println!("unselected {id}");
                } else {
                    println!("{id} was not selected");
                }
            }
        }
        Command::Toggle { id } => {
            let cfg = open_config(&root)?;
            let mut session = open_session(&root, &cfg)?;
            let source = refdata(&root, &cfg);
            let emp = find_employee(&source, &id)?;
            if session.toggle(emp) {
                println!("selected {id}");
            } else {
                println!("unselected {id}");
            }
        }
        Command::SelectAll { filter } => {
            let cfg = open_config(&root)?;
            let mut session = open_session(&root, &cfg)?;
            let source = refdata(&root, &cfg);
            let matching = source.employees(&filter.to_filter())?;
            let count = matching.len();
            session.select_all(matching);
            println!("selection now holds {} of {count} matching", session.selection().len());
        }
        Command::UnselectAll { filter } => {
            let cfg = open_config(&root)?;
            let mut session = open_session(&root, &cfg)?;
            let source = refdata(&root, &cfg);
            let matching = source.employees(&filter.to_filter())?;
            session.unselect_all(&matching);
            println!("selection now holds {}", session.selection().len());
        }
        Command::ClearSelection => {
            let cfg = open_config(&root)?;
            let mut session = open_session(&root, &cfg)?;
            session.clear_selection();
            println!("selection cleared");
        }
        Command::Zones => {
            let cfg = open_config(&root)?;
            let source = refdata(&root, &cfg);
            print_zone_level(&source.zones()?, 0);
        }
        Command::WorkTypes => {
            let cfg = open_config(&root)?;
            let source = refdata(&root, &cfg);
            for group in group_work_types(&source.work_types()?) {
                println!("{} {}", group.id, group.name);
                for wt in &group.work_types {
                    println!("  {} {} (per {})", wt.id, wt.name, wt.piece_unit_name);
                }
            }
        }
        Command::Categories => {
            let cfg = open_config(&root)?;
            let source = refdata(&root, &cfg);
            for category in source.categories()? {
                println!("{} {}", category.id, category.name);
            }
        }
        Command::Areas => {
            let cfg = open_config(&root)?;
            let session = open_session(&root, &cfg)?;
            let source = refdata(&root, &cfg);
            let zone_id = current_zone_id(&session)?;
            let area_map = source.area_map()?;
            match area_map.get(&zone_id) {
                Some(areas) if !areas.is_empty() => {
                    for area in areas {
                        println!("{} {}", area.id, area.name);
                    }
                }
                _ => println!("zone {zone_id} has no planting areas"),
            }
        }
        Command::Set { field } => {
            let cfg = open_config(&root)?;
            let mut session = open_session(&root, &cfg)?;
            let source = refdata(&root, &cfg);
            match field {
                SetField::WorkType { id } => {
                    let map = work_type_map(&source.work_types()?);
                    let wt = map
                        .get(&id)
                        .ok_or_else(|| anyhow!("no work type with id {id}"))?;
                    session.set_field(
                        FieldKey::WorkType,
                        FieldValue::Choice(CascadeChoice::WorkType(id)),
                    );
                    session.set_field(FieldKey::PieceUnit, FieldValue::Id(wt.piece_unit_id));
                    println!("work type {} ({}, per {})", id, wt.name, wt.piece_unit_name);
                }
                SetField::Zone { id } => {
                    let zones = source.zones()?;
                    let zone =
                        find_zone(&zones, id).ok_or_else(|| anyhow!("no zone with id {id}"))?;
                    session.set_field(FieldKey::Zone, FieldValue::Id(id));
                    println!("zone {} ({})", id, zone.name);
                }
                SetField::Area { id } => {
                    let zone_id = current_zone_id(&session)?;
                    let area_map = source.area_map()?;
                    let areas = area_map.get(&zone_id).map(Vec::as_slice).unwrap_or(&[]);
                    let area = areas
                        .iter()
                        .find(|a| a.id == id)
                        .ok_or_else(|| anyhow!("area {id} is not inside zone {zone_id}"))?;
                    session.set_field(FieldKey::PlantingArea, FieldValue::Id(id));
                    println!("planting area {} ({})", id, area.name);
                }
                SetField::Category { id } => {
                    let category = source
                        .categories()?
                        .into_iter()
                        .find(|c| c.id == id)
                        .ok_or_else(|| anyhow!("no category with id {id}"))?;
                    session.set_field(FieldKey::Category, FieldValue::Id(id));
                    println!("category {} ({})", id, category.name);
                }
                SetField::PieceCount { count } => {
                    let chosen = session
                        .draft()
                        .get(FieldKey::WorkType)
                        .and_then(FieldValue::as_choice)
                        .and_then(|c| c.work_type_id());
                    let work_type_id =
                        chosen.ok_or_else(|| anyhow!("choose a work type before a piece count"))?;
                    let map = work_type_map(&source.work_types()?);
                    let unit = map
                        .get(&work_type_id)
                        .map(|wt| wt.piece_unit_name.clone())
                        .unwrap_or_else(|| "unit".to_string());
                    session.set_field(FieldKey::PieceCount, FieldValue::Count(count));
                    println!("piece count {count} {unit}");
                }
                SetField::Hours { hours } => {
                    session.set_field(FieldKey::WorkTimeHour, FieldValue::Hours(hours));
                    println!("work time {hours} h");
                }
                SetField::Remark { text } => {
                    session.set_field(FieldKey::Remark, FieldValue::Text(text));
                    println!("remark recorded");
                }
                SetField::Time { start, end } => {
                    session.patch(vec![
                        (FieldKey::StartTime, FieldValue::Instant(start)),
                        (FieldKey::EndTime, FieldValue::Instant(end)),
                    ]);
                    println!("work time {start}..{end}");
                }
            }
        }
        Command::Unset { field } => {
            let cfg = open_config(&root)?;
            let mut session = open_session(&root, &cfg)?;
            session.unset_field(field);
            println!("unset {field}");
        }
        Command::ResetForm => {
            let cfg = open_config(&root)?;
            let mut session = open_session(&root, &cfg)?;
            session.reset_form();
            println!("draft reset to baseline");
        }
        Command::Submit => {
            let cfg = open_config(&root)?;
            let mut session = open_session(&root, &cfg)?;
            let submitter = OutboxSubmitter::new(cfg.outbox_root());
            let receipt = session.submit(&cfg.base.id, &submitter, &PrintNotifier)?;
            println!("receipt {}", receipt.id);
        }
    }

    Ok(())
}
