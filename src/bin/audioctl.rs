use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use audio_catalog::{
    cli_utils::{self, parse_id_or_exit, parse_kind_or_exit, validate_args_count_or_exit},
    http_utils::{self, CatalogClient},
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the audio catalog server")]
    base_url: String,
}

const USAGE: &str = r#"Usage: audioctl [options] <command> [args...]

Options:
  --base-url <url>     Base URL of the audio catalog server (default: http://localhost:8000)

Commands:
  create <type> key=value...          Create a record
  update <type> <id> key=value...     Update fields of a record
  read <type> [id]                    Show one record, or all records of a type
  delete <type> <id>                  Delete a record

Types: song, podcast, audiobook

Example:
  audioctl create podcast name=Weekly duration=1800 host=Ann "participants=Bo, Cy""#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, free) = Options::from_command_line_relaxed("USAGE: audioctl <command> [args...]");

    if free.is_empty() {
        cli_utils::exit_with_usage_error("No command specified", USAGE);
    }

    let base_url = if options.base_url.is_empty() {
        "http://localhost:8000".to_string()
    } else {
        options.base_url
    };
    let client = CatalogClient::new(base_url);

    match free[0].as_str() {
        "create" => handle_create(&free, &client).await,
        "update" => handle_update(&free, &client).await,
        "read" => handle_read(&free, &client).await,
        "delete" => handle_delete(&free, &client).await,
        "help" => println!("{}", USAGE),
        _ => {
            cli_utils::exit_with_error(&format!(
                "Unknown command '{}'. Available commands: create, update, read, delete",
                free[0]
            ));
        }
    }

    Ok(())
}

fn assignments_or_exit(args: &[String]) -> Vec<(String, String)> {
    cli_utils::parse_assignments(args).unwrap_or_else(|e| cli_utils::exit_with_usage_error(&e, USAGE))
}

async fn handle_create(args: &[String], client: &CatalogClient) {
    validate_args_count_or_exit(args, 3, None, "Usage: audioctl create <type> key=value...");
    let kind = parse_kind_or_exit(&args[1]);
    let fields = assignments_or_exit(&args[2..]);

    let message = http_utils::execute_or_exit(
        || client.create(kind, &fields),
        &format!("Failed to create {}", kind),
    )
    .await;
    cli_utils::print_success(&message);
}

async fn handle_update(args: &[String], client: &CatalogClient) {
    validate_args_count_or_exit(
        args,
        4,
        None,
        "Usage: audioctl update <type> <id> key=value...",
    );
    let kind = parse_kind_or_exit(&args[1]);
    let id = parse_id_or_exit(&args[2]);
    let fields = assignments_or_exit(&args[3..]);

    let message = http_utils::execute_or_exit(
        || client.update(kind, id, &fields),
        &format!("Failed to update {} {}", kind, id),
    )
    .await;
    cli_utils::print_success(&message);
}

async fn handle_read(args: &[String], client: &CatalogClient) {
    validate_args_count_or_exit(args, 2, Some(3), "Usage: audioctl read <type> [id]");
    let kind = parse_kind_or_exit(&args[1]);

    match args.get(2) {
        Some(id) => {
            let id = parse_id_or_exit(id);
            let record: serde_json::Value = http_utils::execute_or_exit(
                || client.read(kind, id),
                &format!("Failed to read {} {}", kind, id),
            )
            .await;
            cli_utils::print_json_or_exit(&record, kind.token());
        }
        None => {
            let records: Vec<serde_json::Value> = http_utils::execute_or_exit(
                || client.list(kind),
                &format!("Failed to list {}s", kind),
            )
            .await;
            cli_utils::print_json_or_exit(&records, kind.token());
        }
    }
}

async fn handle_delete(args: &[String], client: &CatalogClient) {
    validate_args_count_or_exit(args, 3, Some(3), "Usage: audioctl delete <type> <id>");
    let kind = parse_kind_or_exit(&args[1]);
    let id = parse_id_or_exit(&args[2]);

    let message = http_utils::execute_or_exit(
        || client.delete(kind, id),
        &format!("Failed to delete {} {}", kind, id),
    )
    .await;
    cli_utils::print_success(&message);
}
