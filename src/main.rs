use gator::commands::{Commands, Context};
use gator::db;
use gator::http_client;
use gator::Config;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let commands = Commands::new();
    let mut args = env::args().skip(1);

    let name = match args.next() {
        Some(name) => name,
        None => {
            eprintln!("usage: gator <command> [args]\n");
            for usage in commands.usages() {
                eprintln!("  gator {}", usage);
            }

            return ExitCode::FAILURE;
        }
    };
    let args: Vec<String> = args.collect();

    if !commands.contains(&name) {
        eprintln!("unknown command {:?}", name);

        return ExitCode::FAILURE;
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            log::error!("Invalid configuration: {}", error);
            eprintln!("{}", error);

            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = http_client::configure(config.request_timeout) {
        log::error!("Failed to build the http client: {:?}", error);

        return ExitCode::FAILURE;
    }

    let pool = match db::create_connection_pool(&config.database_url, config.database_pool_size) {
        Ok(pool) => pool,
        Err(error) => {
            log::error!("Failed to create the connection pool: {}", error);
            eprintln!("{}", error);

            return ExitCode::FAILURE;
        }
    };

    let context = Context { config, pool };

    match commands.run(&context, &name, &args) {
        Ok(output) => {
            println!("{}", output);

            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}", error);

            ExitCode::FAILURE
        }
    }
}
