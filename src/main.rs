use chrono::Local;
use clap::Parser;
use colored::Colorize;

use todolist::app::App;
use todolist::cli::{self, Cli, Commands};
use todolist::config::Config;
use todolist::TaskStore;

fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli, config) {
        eprintln!("{} {}", "✗".red(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let mut store = TaskStore::open(&config.data_file);

    match cli.command.unwrap_or(Commands::Board) {
        Commands::Board => todolist::ui::run(App::new(store, config.window_days)),
        Commands::Task(command) => {
            let today = Local::now().date_naive();
            let output = cli::execute(command, &mut store, &config, today)?;
            println!("{output}");
            Ok(())
        }
    }
}
