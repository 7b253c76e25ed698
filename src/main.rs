use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use cropfilter::config::load_config_file;
use cropfilter::logging::{init_logging, LogConfig, LogFormat};
use cropfilter::prelude::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Reactive checkbox filtering of crop records by name and district
#[derive(Parser, Debug)]
#[command(name = "cropfilter")]
#[command(about = "Filter crop records by name and district")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Log format on stderr
    #[arg(long = "log-format", default_value = "pretty", global = true, value_parser = ["pretty", "compact", "json"])]
    log_format: String,

    /// Disable colored log output
    #[arg(long = "no-color", global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Args, Debug, Clone)]
struct SourceArgs {
    /// Crop data file (.json, .yaml or .yml); the built-in sample when omitted
    #[arg(long)]
    data: Option<PathBuf>,

    /// YAML configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated name options to uncheck; replaces the config file's list
    #[arg(long = "off-name")]
    off_names: Option<String>,

    /// Comma-separated district options to uncheck; replaces the config file's list
    #[arg(long = "off-district")]
    off_districts: Option<String>,

    /// Output format: json or text
    #[arg(long, value_parser = ["json", "text"])]
    format: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the crops that pass both filters
    Items(SourceArgs),

    /// Print the name options and the district options still available
    Options(SourceArgs),

    /// Toggle filters from stdin and print every re-derived view
    /// Commands: name <NAME>, district <DISTRICT>, show, help, quit
    Interactive(SourceArgs),
}

fn print_available_commands() {
    println!("Available commands:");
    println!("  items        Print the crops that pass both filters");
    println!("  options      Print the name options and the district options still available");
    println!("  interactive  Toggle filters from stdin and print every re-derived view");
}

fn build_config(args: &SourceArgs) -> anyhow::Result<Config> {
    let mut builder = match &args.config {
        Some(path) => ConfigBuilder::from_file(load_config_file(path)?),
        None => ConfigBuilder::new(),
    };

    if let Some(data) = &args.data {
        builder = builder.data_file(data);
    }
    if let Some(names) = &args.off_names {
        builder = builder.disabled_names_str(names)?;
    }
    if let Some(districts) = &args.off_districts {
        builder = builder.disabled_districts_str(districts)?;
    }
    if let Some(format) = &args.format {
        builder = builder.output(OutputFormat::from(format.as_str()));
    }

    Ok(builder.build()?)
}

/// Load the data once, then uncheck the configured options
async fn open_session(config: &Config) -> anyhow::Result<FilterSession> {
    let provider = config.source.provider();
    let session = FilterSession::load(&provider).await;

    if let LoadState::Failed(message) = session.load_state() {
        anyhow::bail!("{}", message);
    }

    for dimension in [FilterDimension::Name, FilterDimension::District] {
        for option in config.disabled(dimension) {
            session
                .disable(dimension, option)
                .with_context(|| format!("Cannot uncheck {} filter '{}'", dimension, option))?;
        }
    }
    Ok(session)
}

fn render_crop(crop: &Crop) -> String {
    let varieties: Vec<&str> = crop.sub_category.iter().map(|s| s.name.as_str()).collect();
    if varieties.is_empty() {
        format!("{}\t{}", crop.name, crop.district)
    } else {
        format!("{}\t{}\t{}", crop.name, crop.district, varieties.join(", "))
    }
}

fn render_options(options: &[FilterOption]) -> String {
    options
        .iter()
        .map(|o| format!("[{}] {}", if o.checked { "x" } else { " " }, o.name))
        .collect::<Vec<_>>()
        .join("  ")
}

async fn run_items_command(args: SourceArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let session = open_session(&config).await?;

    // Write one crop per line
    for crop in session.filtered_items().get() {
        match config.output {
            OutputFormat::Json => println!("{}", serde_json::to_string(&crop)?),
            OutputFormat::Text => println!("{}", render_crop(&crop)),
        }
    }
    Ok(())
}

async fn run_options_command(args: SourceArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let session = open_session(&config).await?;

    let names = session.name_filter_options().get();
    let available = session.available_district_options().get();
    let hidden = session.hidden_district_options();

    match config.output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "nameFilterOptions": names,
                "availableDistrictOptions": available,
                "hiddenDistrictOptions": hidden,
                "summary": session.summary(),
            });
            println!("{}", serde_json::to_string(&json)?);
        }
        OutputFormat::Text => {
            println!("names:     {}", render_options(&names));
            println!("districts: {}", render_options(&available));
            if !hidden.is_empty() {
                println!("hidden:    {}", render_options(&hidden));
            }
        }
    }
    Ok(())
}

async fn run_interactive_command(args: SourceArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let session = open_session(&config).await?;

    let print_items = |items: &Vec<Crop>| {
        println!("items ({}):", items.len());
        for crop in items {
            println!("  {}", render_crop(crop));
        }
    };
    let print_districts = |options: &Vec<FilterOption>| {
        println!("districts: {}", render_options(options));
    };

    session.filtered_items().with(print_items);
    println!("names:     {}", render_options(&session.name_filter_options().get()));
    session.available_district_options().with(print_districts);

    // Every publication re-renders the part that changed
    let _items_sub = session.filtered_items().subscribe(print_items);
    let _names_sub = session
        .name_filter_options()
        .subscribe(|options| println!("names:     {}", render_options(options)));
    let _districts_sub = session.available_district_options().subscribe(print_districts);

    // Blocking stdin on the runtime thread: the session is !Send and never leaves it
    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "name" | "district" => {
                let dimension = FilterDimension::from(command);
                // A typo at the prompt is not fatal
                if let Err(e) = session.toggle(dimension, argument) {
                    eprintln!("Error: {}", e);
                }
            }
            "show" => {
                let summary = session.summary();
                println!(
                    "{} of {} crops visible, {} of {} districts available",
                    summary.visible,
                    summary.total,
                    summary.districts_available,
                    session.district_filter_options().with(Vec::len)
                );
            }
            "help" => {
                println!("name <NAME>          toggle a name filter");
                println!("district <DISTRICT>  toggle a district filter");
                println!("show                 print a summary");
                println!("quit                 leave");
            }
            "quit" | "exit" => break,
            other => eprintln!("Unknown command '{}', try 'help'", other),
        }
        prompt()?;
    }
    Ok(())
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(
        &LogConfig::from_verbosity(cli.verbose)
            .with_format(LogFormat::from(cli.log_format.as_str()))
            .with_ansi(!cli.no_color),
    );

    match cli.command {
        Some(Command::Items(args)) => run_items_command(args).await,
        Some(Command::Options(args)) => run_options_command(args).await,
        Some(Command::Interactive(args)) => run_interactive_command(args).await,
        None => {
            print_available_commands();
            Ok(())
        }
    }
}
