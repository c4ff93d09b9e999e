use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Parser;
use meeting_times::core::{ConfigProvider, ParticipantSource};
use meeting_times::utils::error::{ErrorSeverity, MeetingError};
use meeting_times::utils::{logger, validation::Validate};
use meeting_times::{
    compute_participants, render_report, CliConfig, CsvTableStore, FileParticipantSource,
    MeetingPipeline, MeetingRequest, SchedulerEngine, SessionStore, TimeConverter, TomlConfig,
    Zone,
};

fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting meeting-times");

    let result = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            let mut config = TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path))?;
            config.apply_overrides(&args);
            run(&config, &args)
        }
        None => run(&args, &args),
    };

    if let Err(e) = result {
        tracing::error!(
            "Meeting computation failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("Error: {}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn run<C: ConfigProvider + Validate>(config: &C, args: &CliConfig) -> Result<(), MeetingError> {
    config.validate()?;

    let request = MeetingRequest::new(config.source_path().unwrap_or_default(), &args.date);
    request.validate()?;

    let reference: Zone = config.reference_zone().parse()?;
    let converter = TimeConverter::new(reference);
    tracing::debug!("Reference zone: {}", reference);

    if args.dry_run {
        tracing::info!("Dry run: tables and session state are left untouched");
        let records = FileParticipantSource::new().read(&request.source_path)?;
        for participant in compute_participants(&records, &request.meeting_date, &converter)? {
            println!("{}: {}", participant.name, participant.local_time);
        }
        return Ok(());
    }

    let sessions = SessionStore::new(config.state_file());
    let mut session = sessions.load()?;

    let pipeline = MeetingPipeline::new(
        FileParticipantSource::new(),
        CsvTableStore::new(config.output_path()),
        request,
        converter,
    );
    // validated to be at most a year, so the cast cannot wrap
    let remember_for = Duration::hours(config.remember_count_hours() as i64);
    let engine = SchedulerEngine::with_count_memory(pipeline, remember_for);

    let report = engine.run(&mut session, Utc::now())?;
    sessions.save(&session)?;

    print!("{}", render_report(&report));
    tracing::info!("Meeting computed for {} participants", report.outcome.participants.len());
    Ok(())
}
