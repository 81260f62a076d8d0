use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, ErrorKind, Parser, Subcommand};

use intro_detect::collaborators::LibraryManager;
use intro_detect::config::{AnalysisParams, Configuration, EdlAction};
use intro_detect::driver::Driver;

mod reference;

#[derive(Debug, Subcommand)]
enum Commands {
    #[clap(after_help = "Displays info about intro-detect.")]
    Info,

    #[clap(
        arg_required_else_help = true,
        after_help = "Scans a media library directory for seasons of episodes and detects the shared intro for each episode. Each series is expected as <root>/<series>/<season-N>/<episode files>, with optional '<episode>.fingerprint.json' and '<episode>.silence.json' sidecar files standing in for a real fingerprinting/silence-detection backend."
    )]
    Analyze {
        #[clap(value_parser = clap::value_parser!(PathBuf), help = "Root of the media library to scan.")]
        root: PathBuf,

        #[clap(long, value_parser = clap::value_parser!(PathBuf), help = "Where to write detected intro timestamps as JSON. Defaults to '<root>/timestamps.json'.")]
        output: Option<PathBuf>,

        #[clap(
            long,
            default_value_t = 6,
            help = "Maximum number of differing bits allowed between two fingerprint points for them to be considered a match."
        )]
        maximum_fingerprint_point_differences: u32,

        #[clap(
            long,
            default_value_t = 3.5,
            help = "Maximum gap, in seconds, allowed between two consecutive matching timestamps."
        )]
        maximum_time_skip: f64,

        #[clap(
            long,
            default_value_t = 15.0,
            help = "Minimum duration, in seconds, an intro candidate must have to be accepted."
        )]
        minimum_intro_duration: f64,

        #[clap(
            long,
            default_value = "false",
            action(ArgAction::SetTrue),
            help = "Also analyze season zero (specials)."
        )]
        analyze_season_zero: bool,

        #[clap(
            long,
            default_value = "false",
            action(ArgAction::SetTrue),
            help = "Write an EDL sidecar file for every episode whose intro was detected."
        )]
        write_edl: bool,
    },
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

impl Cli {
    fn validate(&self) {
        let mut cmd = Cli::command();
        if let Commands::Analyze {
            maximum_time_skip,
            minimum_intro_duration,
            ..
        } = &self.command
        {
            if *maximum_time_skip <= 0.0 {
                cmd.error(ErrorKind::InvalidValue, "maximum_time_skip must be greater than 0")
                    .exit();
            }
            if *minimum_intro_duration <= 0.0 {
                cmd.error(
                    ErrorKind::InvalidValue,
                    "minimum_intro_duration must be greater than 0",
                )
                .exit();
            }
        }
    }
}

fn main() -> intro_detect::Result<()> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let args = Cli::parse();
    args.validate();

    match args.command {
        Commands::Info => {
            println!("intro-detect {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Analyze {
            root,
            output,
            maximum_fingerprint_point_differences,
            maximum_time_skip,
            minimum_intro_duration,
            analyze_season_zero,
            write_edl,
        } => {
            let params = AnalysisParams::default()
                .with_maximum_fingerprint_point_differences(maximum_fingerprint_point_differences)
                .with_maximum_time_skip(maximum_time_skip)
                .with_minimum_intro_duration(minimum_intro_duration)
                .with_analyze_season_zero(analyze_season_zero)
                .with_edl_action(if write_edl { EdlAction::Edl } else { EdlAction::None });

            let output = output.unwrap_or_else(|| root.join("timestamps.json"));

            let audio_tool = reference::SidecarAudioTool;
            let library_manager = reference::DirectoryLibraryManager::new(&root);
            let persistent_store = reference::JsonPersistentStore::new(output);
            let edl_manager = reference::FileEdlManager;

            let driver = Driver::new(
                params,
                Configuration::default(),
                &audio_tool,
                Some(&library_manager as &dyn LibraryManager),
                &persistent_store,
                &edl_manager,
            );

            driver.execute(&reference::StderrProgress, &reference::NeverCancel)?;
        }
    }

    Ok(())
}
