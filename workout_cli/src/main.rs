use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use workout_core::clock::{self, format_duration, format_duration_human};
use workout_core::history::{self, load_recent_sessions, recent_volume_by_muscle};
use workout_core::recommend::rank;
use workout_core::records::{self, PersonalRecord};
use workout_core::validation::validate_set;
use workout_core::*;

#[derive(Parser)]
#[command(name = "fittrack")]
#[command(about = "Workout session tracker and exercise recommender", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a workout session (replaces any session in progress)
    Start {
        /// Exercise names, in planned order
        #[arg(short, long = "exercise")]
        exercises: Vec<String>,

        /// Session identifier (random if omitted)
        #[arg(long)]
        session_id: Option<String>,
    },

    /// Pause the session timer
    Pause,

    /// Resume a paused session
    Resume,

    /// Log a completed set
    LogSet {
        /// Exercise id or name (defaults to the current exercise)
        #[arg(short, long)]
        exercise: Option<String>,

        #[arg(short, long)]
        reps: u32,

        #[arg(short, long)]
        weight: Option<f64>,

        /// Reps in reserve (0-10)
        #[arg(long)]
        rir: Option<u8>,
    },

    /// Move the current-exercise pointer ("none" clears it)
    Current { exercise: String },

    /// Replace the planned exercise list, keeping sets already logged
    Exercises {
        #[arg(short, long = "exercise")]
        exercises: Vec<String>,
    },

    /// Show the session timer
    Status,

    /// Report that the app returned to the foreground
    Focus,

    /// End the session and record it in the history
    End {
        /// Drop the session without recording it
        #[arg(long)]
        discard: bool,
    },

    /// Suggest exercises for a training day
    Suggest {
        /// Muscle groups for the day (comma separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        tags: Vec<String>,

        /// Available equipment (defaults to config)
        #[arg(long, value_delimiter = ',')]
        equipment: Option<Vec<String>>,

        /// Exercises already chosen, in addition to the active session's
        #[arg(long, value_delimiter = ',')]
        existing: Vec<String>,

        /// Show scores and reasons
        #[arg(long)]
        explain: bool,
    },

    /// Summarize recent training
    Stats {
        #[arg(long, default_value_t = 30)]
        days: i64,
    },

    /// List personal records from the session history
    Records,

    /// Browse the exercise catalog
    Catalog {
        #[arg(long)]
        muscle: Option<String>,

        #[arg(long)]
        search: Option<String>,

        /// Only exercises doable with this equipment (comma separated)
        #[arg(long, value_delimiter = ',')]
        equipment: Option<Vec<String>>,
    },
}

struct Paths {
    store_dir: PathBuf,
    history_log: PathBuf,
}

impl Paths {
    fn new(data_dir: &Path) -> Self {
        Self {
            store_dir: data_dir.join("store"),
            history_log: data_dir.join("history").join("sessions.jsonl"),
        }
    }
}

type Engine = PersistentSession<FileStore>;

fn main() -> Result<()> {
    workout_core::logging::init_cli();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let paths = Paths::new(&data_dir);

    let mut engine: Engine = PersistentSession::open(
        FileStore::new(&paths.store_dir),
        config.session.pause_accounting,
    );

    match cli.command {
        Commands::Start {
            exercises,
            session_id,
        } => cmd_start(&mut engine, &config, exercises, session_id),
        Commands::Pause => {
            if engine.pause() {
                println!("⏸ Paused at {}", reading_text(&engine));
            } else {
                println!("No active session.");
            }
            Ok(())
        }
        Commands::Resume => {
            if engine.resume() {
                println!("▶ Resumed at {}", reading_text(&engine));
            } else if engine.state() == SessionState::Running {
                println!("Session is already running.");
            } else {
                println!("No active session.");
            }
            Ok(())
        }
        Commands::LogSet {
            exercise,
            reps,
            weight,
            rir,
        } => cmd_log_set(&mut engine, exercise, reps, weight, rir),
        Commands::Current { exercise } => cmd_current(&mut engine, exercise),
        Commands::Exercises { exercises } => cmd_exercises(&mut engine, &config, exercises),
        Commands::Status => {
            print_status(&engine);
            Ok(())
        }
        Commands::Focus => {
            engine.on_lifecycle_change(AppLifecycle::Background);
            match engine.on_lifecycle_change(AppLifecycle::Active) {
                Some(reading) => println!("Timer resynced: {}", reading.formatted),
                None => println!("Nothing running."),
            }
            Ok(())
        }
        Commands::End { discard } => cmd_end(&mut engine, &paths, discard),
        Commands::Suggest {
            tags,
            equipment,
            existing,
            explain,
        } => cmd_suggest(&engine, &config, &paths, tags, equipment, existing, explain),
        Commands::Stats { days } => cmd_stats(&paths, days),
        Commands::Records => cmd_records(&paths),
        Commands::Catalog {
            muscle,
            search,
            equipment,
        } => cmd_catalog(&config, muscle, search, equipment),
    }
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    match &config.data.catalog_path {
        Some(path) => Catalog::load(path),
        None => Ok(get_default_catalog().clone()),
    }
}

fn slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Turn exercise names into session exercises, reusing catalog ids when known
fn plan_exercises(catalog: &Catalog, names: &[String]) -> Vec<WorkoutExercise> {
    let mut planned: Vec<WorkoutExercise> = Vec::with_capacity(names.len());

    for (idx, raw) in names.iter().enumerate() {
        let (base_id, name) = match catalog
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(raw.trim()))
        {
            Some(template) => (template.id.clone(), template.name.clone()),
            None => {
                tracing::info!("'{}' is not in the catalog; adding as custom", raw);
                (slug(raw), raw.trim().to_string())
            }
        };

        let mut id = base_id.clone();
        let mut n = 2;
        while planned.iter().any(|e| e.id == id) {
            id = format!("{}_{}", base_id, n);
            n += 1;
        }

        planned.push(WorkoutExercise::new(id, name, idx as u32));
    }

    planned
}

fn resolve_exercise<'a>(session: &'a ActiveSession, query: &str) -> Option<&'a WorkoutExercise> {
    session.exercise(query).or_else(|| {
        session
            .exercises
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(query))
    })
}

fn reading_text(engine: &Engine) -> String {
    engine
        .tick()
        .map(|r| r.formatted)
        .unwrap_or_else(|| format_duration(std::time::Duration::ZERO))
}

fn cmd_start(
    engine: &mut Engine,
    config: &Config,
    names: Vec<String>,
    session_id: Option<String>,
) -> Result<()> {
    let catalog = load_catalog(config)?;
    let exercises = plan_exercises(&catalog, &names);
    let session_id = session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    if let Some(previous) = engine.active() {
        println!("Replacing unfinished session {}", previous.session_id);
    }

    engine.start(session_id.clone(), exercises);

    println!("✓ Session {} started", session_id);
    if let Some(active) = engine.active() {
        for exercise in &active.exercises {
            println!("  {}. {} [{}]", exercise.sort_order + 1, exercise.name, exercise.id);
        }
    }
    Ok(())
}

fn cmd_log_set(
    engine: &mut Engine,
    exercise: Option<String>,
    reps: u32,
    weight: Option<f64>,
    rir: Option<u8>,
) -> Result<()> {
    validate_set(reps, weight, rir)?;

    let Some(active) = engine.active() else {
        println!("No active session.");
        return Ok(());
    };

    let target = match exercise.as_deref().or(active.current_exercise_id.as_deref()) {
        Some(query) => resolve_exercise(active, query),
        None => None,
    };

    let Some(target) = target else {
        println!("Exercise not found in this session; nothing logged.");
        return Ok(());
    };

    let exercise_id = target.id.clone();
    let name = target.name.clone();
    let set = WorkoutSet {
        set_number: target.next_set_number(),
        reps,
        weight,
        rir,
        completed_at: Utc::now(),
    };
    let set_number = set.set_number;

    engine.add_set(&exercise_id, set);

    match weight {
        Some(w) => println!("✓ {} set {}: {} × {}", name, set_number, reps, w),
        None => println!("✓ {} set {}: {} reps", name, set_number, reps),
    }
    println!(
        "  Rest {}",
        format_duration_human(std::time::Duration::from_secs(
            clock::recommended_rest_seconds(reps, rir).into()
        ))
    );
    Ok(())
}

fn cmd_current(engine: &mut Engine, exercise: String) -> Result<()> {
    let target = if exercise.eq_ignore_ascii_case("none") {
        None
    } else {
        // Resolve names to ids when possible; unknown values are stored as given
        let id = engine
            .active()
            .and_then(|a| resolve_exercise(a, &exercise))
            .map(|e| e.id.clone())
            .unwrap_or(exercise);
        Some(id)
    };

    if engine.set_current_exercise(target.clone()) {
        println!(
            "✓ Current exercise: {}",
            target.as_deref().unwrap_or("none")
        );
    } else {
        println!("No active session.");
    }
    Ok(())
}

fn cmd_exercises(engine: &mut Engine, config: &Config, names: Vec<String>) -> Result<()> {
    let Some(active) = engine.active() else {
        println!("No active session.");
        return Ok(());
    };

    let catalog = load_catalog(config)?;
    let mut planned = plan_exercises(&catalog, &names);

    // Keep sets for exercises that stay in the plan
    for exercise in planned.iter_mut() {
        if let Some(existing) = active.exercise(&exercise.id) {
            exercise.sets = existing.sets.clone();
        }
    }

    let count = planned.len();
    engine.update_exercises(planned);
    println!("✓ Exercise list updated ({} exercises)", count);
    Ok(())
}

fn print_status(engine: &Engine) {
    let (Some(active), Some(reading)) = (engine.active(), engine.tick()) else {
        println!("No active session.");
        return;
    };

    let state = if reading.is_running { "Running" } else { "Paused" };
    println!("Session {} ({})", active.session_id, state);
    println!("  Elapsed: {}", reading.formatted);

    if let Some(current) = active
        .current_exercise_id
        .as_deref()
        .and_then(|id| active.exercise(id))
    {
        println!("  Current: {}", current.name);
    }

    for exercise in &active.exercises {
        match analytics::best_one_rep_max(&exercise.sets) {
            Some(orm) => println!(
                "  - {}: {} sets (est. 1RM {:.1})",
                exercise.name,
                exercise.sets.len(),
                orm
            ),
            None => println!("  - {}: {} sets", exercise.name, exercise.sets.len()),
        }
    }

    if let Some(last) = active.last_set() {
        let target = clock::recommended_rest_seconds(last.reps, last.rir);
        let rested = clock::rest_elapsed(last.completed_at);
        let marker = if clock::has_reached_rest_target(last.completed_at, target) {
            "ready"
        } else {
            "resting"
        };
        println!(
            "  Rest: {} of {} ({})",
            format_duration(rested),
            format_duration(std::time::Duration::from_secs(target.into())),
            marker
        );
    }
}

fn cmd_end(engine: &mut Engine, paths: &Paths, discard: bool) -> Result<()> {
    let elapsed = engine.session().elapsed();
    let Some(ended) = engine.end() else {
        println!("No active session.");
        return Ok(());
    };

    if discard {
        println!("Session {} discarded.", ended.session_id);
        return Ok(());
    }

    let summary = analytics::summarize(&ended, elapsed, Utc::now());
    let previous = history::read_completed_sessions(&paths.history_log)?;
    let fresh = records::new_records(&previous, &summary);

    let mut sink = JsonlSink::new(&paths.history_log);
    sink.append(&summary)?;

    println!("\n✓ Session logged!");
    println!("  Duration: {}", format_duration_human(elapsed));
    println!("  Sets: {}  Reps: {}", summary.total_sets, summary.total_reps);
    println!("  Volume: {:.1}", summary.total_volume);
    println!("  Strength score: {:.1}", summary.strength_score);
    if summary.average_reserve > 0.0 {
        println!("  Average RIR: {:.1}", summary.average_reserve);
    }
    if !fresh.is_empty() {
        println!("\n🏆 New personal records:");
        for record in &fresh {
            print_record(record);
        }
    }
    Ok(())
}

fn cmd_suggest(
    engine: &Engine,
    config: &Config,
    paths: &Paths,
    tags: Vec<String>,
    equipment: Option<Vec<String>>,
    mut existing: Vec<String>,
    explain: bool,
) -> Result<()> {
    let catalog = load_catalog(config)?;

    if let Some(active) = engine.active() {
        existing.extend(active.exercises.iter().map(|e| e.name.clone()));
    }

    let recent = load_recent_sessions(&paths.history_log, config.recommendations.history_days)?;
    let ctx = RecommendationContext {
        day_tags: tags,
        equipment: equipment.unwrap_or_else(|| config.equipment.available.clone()),
        existing_exercises: existing,
        recent_volume: recent_volume_by_muscle(&recent, &catalog),
    };

    let ranked = rank(&ctx, &catalog, &config.recommendations);
    if ranked.is_empty() {
        println!("No suggestions for {}.", ctx.day_tags.join(", "));
        return Ok(());
    }

    println!("Suggested for {}:", ctx.day_tags.join(", "));
    for (idx, scored) in ranked.iter().enumerate() {
        if explain {
            println!(
                "  {}. {} ({:+.1}: {})",
                idx + 1,
                scored.exercise.name,
                scored.score,
                scored.reason
            );
        } else {
            println!("  {}. {}", idx + 1, scored.exercise.name);
        }
    }
    Ok(())
}

fn cmd_stats(paths: &Paths, days: i64) -> Result<()> {
    let sessions = load_recent_sessions(&paths.history_log, days)?;
    if sessions.is_empty() {
        println!("No sessions in the last {} days.", days);
        return Ok(());
    }

    let total_volume: f64 = sessions.iter().map(|s| s.total_volume).sum();
    let total_reps: u32 = sessions.iter().map(|s| s.total_reps).sum();
    let total_secs: u64 = sessions.iter().map(|s| s.total_duration_sec).sum();
    let trend = history::strength_trend(&sessions, analytics::DEFAULT_EMA_PERIOD);

    let best = records::personal_records(&sessions)
        .into_iter()
        .max_by(|a, b| a.estimated_one_rep_max.total_cmp(&b.estimated_one_rep_max));

    println!("Last {} days:", days);
    println!("  Sessions: {}", sessions.len());
    println!(
        "  Time trained: {}",
        format_duration_human(std::time::Duration::from_secs(total_secs))
    );
    println!("  Total reps: {}", total_reps);
    println!("  Total volume: {:.1}", total_volume);
    if let Some(latest) = trend.last() {
        println!("  Strength trend: {:.1}", latest);
    }
    if let Some(record) = best {
        println!(
            "  Best estimated 1RM: {} {:.1}",
            record.exercise, record.estimated_one_rep_max
        );
    }
    Ok(())
}

fn print_record(record: &PersonalRecord) {
    println!(
        "  {:<26} {} × {}  (est. 1RM {:.1}, {})",
        record.exercise,
        record.weight,
        record.reps,
        record.estimated_one_rep_max,
        record.achieved_at.format("%Y-%m-%d")
    );
}

fn cmd_records(paths: &Paths) -> Result<()> {
    let sessions = history::read_completed_sessions(&paths.history_log)?;
    let records = records::personal_records(&sessions);

    if records.is_empty() {
        println!("No personal records yet.");
        return Ok(());
    }

    println!("Personal records:");
    for record in &records {
        print_record(record);
    }
    Ok(())
}

fn cmd_catalog(
    config: &Config,
    muscle: Option<String>,
    search: Option<String>,
    equipment: Option<Vec<String>>,
) -> Result<()> {
    let catalog = load_catalog(config)?;

    let mut entries: Vec<&ExerciseTemplate> = match &search {
        Some(q) => catalog.search(q),
        None => catalog.iter().collect(),
    };
    if let Some(m) = &muscle {
        let matching = catalog.by_muscle(m);
        entries.retain(|e| matching.iter().any(|t| t.id == e.id));
    }
    if let Some(eq) = &equipment {
        let usable = catalog.by_equipment(eq);
        entries.retain(|e| usable.iter().any(|t| t.id == e.id));
    }

    for e in entries {
        println!(
            "{:<28} {:<24} {}",
            e.name,
            e.primary_muscles.join("/"),
            e.equipment.join(", ")
        );
    }
    Ok(())
}
