use clap::Parser;
use every_election::config::Command;
use every_election::core::serializers::OrganisationSerializer;
use every_election::core::{ConfigProvider, RecordSource};
use every_election::utils::{logger, validation::Validate};
use every_election::{
    CliConfig, ConfiguredNotifier, DouglasPeucker, ElectionError, ElectionSerializer,
    FixtureRecords, HttpFetcher, JsonFileSnoopStore, LibDemNewbiesSnooper, LocalStorage,
    LogNotifier, OrganisationGeoSerializer, PollDateWindow, Serializer, SlackNotifier, SnoopEngine,
    TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, logger::LogFormat::from_flag(cli.json_logs));

    tracing::info!("Starting every-election CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match cli.resolve() {
        Ok(config) => run(&cli, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        std::process::exit(e.severity().exit_code());
    }

    Ok(())
}

async fn run(cli: &CliConfig, config: TomlConfig) -> every_election::Result<()> {
    // 驗證配置
    config.validate()?;

    match &cli.command {
        Command::Snoop { .. } => snoop(&config).await,
        Command::Serialize {
            fixtures,
            election,
            organisation,
            geo,
        } => serialize(
            &config,
            fixtures,
            election.as_deref(),
            organisation.as_deref(),
            *geo,
        ),
    }
}

async fn snoop(config: &TomlConfig) -> every_election::Result<()> {
    let fetcher = HttpFetcher::from_config(config)?;
    let store = JsonFileSnoopStore::new(
        LocalStorage::new(config.store_path().to_string()),
        config.store_file_name(),
    );

    let notifier = match &config.slack {
        Some(slack) => {
            let mut notifier = SlackNotifier::new(slack.webhook_url.clone());
            if let Some(channel) = &slack.channel {
                notifier = notifier.with_channel(channel.clone());
            }
            if let Some(username) = &slack.username {
                notifier = notifier.with_username(username.clone());
            }
            if let Some(icon_emoji) = &slack.icon_emoji {
                notifier = notifier.with_icon_emoji(icon_emoji.clone());
            }
            ConfiguredNotifier::Slack(notifier)
        }
        None => {
            tracing::info!("No Slack webhook configured, notifications go to the log");
            ConfiguredNotifier::Log(LogNotifier)
        }
    };

    let engine = SnoopEngine::new(fetcher, store, notifier);
    let snooper = LibDemNewbiesSnooper::new(config.base_url());
    let report = engine.run(&snooper).await?;

    println!(
        "✅ {}: {} new, {} updated",
        report.snooper_name, report.created, report.updated
    );
    Ok(())
}

fn serialize(
    config: &TomlConfig,
    fixtures: &str,
    election: Option<&str>,
    organisation: Option<&str>,
    geo: bool,
) -> every_election::Result<()> {
    let records = FixtureRecords::from_file(fixtures)?;

    let output = match (election, organisation) {
        (Some(election_id), _) => {
            let policy = PollDateWindow::today().with_past_days(config.current_past_days());
            let document = ElectionSerializer::new(&records, &policy)
                .serialize(records.election_by_identifier(election_id))?;
            serde_json::to_string_pretty(&document)?
        }
        (None, Some(identifier)) if geo => {
            let simplifier = DouglasPeucker::new(config.simplify_tolerance());
            let feature = OrganisationGeoSerializer::new(&records, &simplifier)
                .serialize(records.organisation_by_identifier(identifier))?;
            serde_json::to_string_pretty(&feature)?
        }
        (None, Some(identifier)) => {
            let document = OrganisationSerializer
                .serialize(records.organisation_by_identifier(identifier))?;
            serde_json::to_string_pretty(&document)?
        }
        (None, None) => {
            return Err(ElectionError::MissingConfigError {
                field: "--election or --organisation".to_string(),
            })
        }
    };

    println!("{}", output);
    Ok(())
}
