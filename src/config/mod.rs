pub mod cli;
pub mod http;
pub mod toml_config;

#[cfg(feature = "cli")]
mod args {
    use super::toml_config::{SourceKind, TomlConfig};
    use crate::core::SwimQuery;
    use crate::utils::error::{Result, SwimBenchError};
    use clap::{Args, Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "swimbench")]
    #[command(about = "Benchmark a swim time against motivational and college recruiting standards")]
    pub struct CliConfig {
        /// Path to TOML configuration file
        #[arg(short, long, env = "SWIMBENCH_CONFIG")]
        pub config: Option<PathBuf>,

        /// Directory holding the reference CSVs; forces a local source
        #[arg(long, env = "SWIMBENCH_DATA_DIR")]
        pub data_dir: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log as JSON lines")]
        pub json_logs: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Analyze one swim
        Analyze(AnalyzeArgs),
        /// Load and validate the reference tables
        Check {
            /// Keep running and report each refresh; needs `refresh_interval_seconds`
            #[arg(long)]
            watch: bool,
        },
        /// List the events swum in each course
        Events {
            #[arg(long)]
            course: Option<String>,
        },
    }

    #[derive(Debug, Clone, Args)]
    pub struct AnalyzeArgs {
        /// Event, e.g. "100 Free" or "200 IM LCM"
        #[arg(long)]
        pub event: String,

        #[arg(long)]
        pub age: u8,

        /// Time as SS.ss or M:SS.ss
        #[arg(long)]
        pub time: String,

        #[arg(long)]
        pub gender: Option<String>,

        #[arg(long)]
        pub course: Option<String>,

        #[arg(long, help = "Print the analysis as JSON instead of markdown")]
        pub json: bool,

        /// Also write the report to this file
        #[arg(short, long)]
        pub output: Option<PathBuf>,
    }

    impl AnalyzeArgs {
        pub fn to_query(&self) -> SwimQuery {
            SwimQuery {
                event: self.event.clone(),
                course: self.course.clone(),
                age: self.age,
                gender: self.gender.clone(),
                time: self.time.clone(),
            }
        }

        /// The report path as UTF-8; other paths are rejected rather than rewritten.
        pub fn output_path(&self) -> Result<Option<&str>> {
            self.output
                .as_deref()
                .map(|path| {
                    path.to_str().ok_or_else(|| SwimBenchError::ValidationError {
                        field: "output".to_string(),
                        message: format!("{} is not a UTF-8 path", path.display()),
                    })
                })
                .transpose()
        }
    }

    impl CliConfig {
        /// The TOML settings with command-line overrides applied.
        pub fn load_settings(&self) -> Result<TomlConfig> {
            let mut settings = match &self.config {
                Some(path) => TomlConfig::from_file(path)?,
                None => TomlConfig::default(),
            };

            if let Some(dir) = &self.data_dir {
                settings.reference.source = SourceKind::Local;
                settings.reference.base_path = dir.clone();
            }

            Ok(settings)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Write;
        use tempfile::NamedTempFile;

        #[test]
        fn test_parse_analyze() {
            let cli = CliConfig::try_parse_from([
                "swimbench", "analyze", "--event", "100 Free", "--age", "15", "--time", "54.21", "--gender", "F",
            ])
            .unwrap();

            let Command::Analyze(args) = cli.command else {
                panic!("expected analyze");
            };
            let query = args.to_query();
            assert_eq!(query.event, "100 Free");
            assert_eq!(query.age, 15);
            assert_eq!(query.gender.as_deref(), Some("F"));
            assert!(query.course.is_none());
            assert_eq!(args.output_path().unwrap(), None);
        }

        #[test]
        fn test_parse_check_watch() {
            let cli = CliConfig::try_parse_from(["swimbench", "check", "--watch"]).unwrap();
            assert!(matches!(cli.command, Command::Check { watch: true }));
        }

        #[cfg(unix)]
        #[test]
        fn test_non_utf8_output_is_rejected() {
            use std::ffi::OsString;
            use std::os::unix::ffi::OsStringExt;

            let args = AnalyzeArgs {
                event: "100 Free".to_string(),
                age: 15,
                time: "54.21".to_string(),
                gender: None,
                course: None,
                json: false,
                output: Some(PathBuf::from(OsString::from_vec(b"report-\xff.md".to_vec()))),
            };
            assert!(matches!(
                args.output_path(),
                Err(SwimBenchError::ValidationError { .. })
            ));

            let args = AnalyzeArgs {
                output: Some(PathBuf::from("reports/swim.md")),
                ..args
            };
            assert_eq!(args.output_path().unwrap(), Some("reports/swim.md"));
        }

        #[test]
        fn test_data_dir_forces_local_source() {
            let mut file = NamedTempFile::new().unwrap();
            file.write_all(b"[reference]\nsource = \"http\"\nbase_url = \"https://example.com\"\n")
                .unwrap();

            let cli = CliConfig {
                config: Some(file.path().to_path_buf()),
                data_dir: Some("/tmp/standards".to_string()),
                verbose: false,
                json_logs: false,
                command: Command::Check { watch: false },
            };
            let settings = cli.load_settings().unwrap();
            assert_eq!(settings.reference.source, SourceKind::Local);
            assert_eq!(settings.reference.base_path, "/tmp/standards");
        }
    }
}

#[cfg(feature = "cli")]
pub use args::{AnalyzeArgs, CliConfig, Command};
