use std::process;

use crate::AudioKind;

/// Exits the program with an error message
pub fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exits the program with an error message and usage information
pub fn exit_with_usage_error(message: &str, usage: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!("{}", usage);
    process::exit(1);
}

/// Prints a formatted success message
pub fn print_success(message: &str) {
    println!("{}", message);
}

/// Prints formatted JSON with proper indentation
pub fn print_json<T>(value: &T) -> Result<(), serde_json::Error>
where
    T: serde::Serialize,
{
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints a formatted JSON value or exits with error
pub fn print_json_or_exit<T>(value: &T, context: &str)
where
    T: serde::Serialize,
{
    if let Err(e) = print_json(value) {
        exit_with_error(&format!("Failed to format {} JSON: {}", context, e));
    }
}

/// Validates both minimum and maximum argument counts.
///
/// # Arguments
/// * `args` - The command arguments, starting with the command name
/// * `min_count` - Minimum number of arguments (including the command)
/// * `max_count` - Maximum number of arguments, or `None` for unbounded
/// * `usage` - Usage text shown on failure
pub fn validate_args_count_or_exit(
    args: &[String],
    min_count: usize,
    max_count: Option<usize>,
    usage: &str,
) {
    let command = args.first().map(String::as_str).unwrap_or("command");
    if args.len() < min_count {
        exit_with_usage_error(&format!("{} command requires more arguments", command), usage);
    }
    if max_count.is_some_and(|max| args.len() > max) {
        exit_with_usage_error(&format!("{} command has too many arguments", command), usage);
    }
}

/// Parses an audio kind argument or exits.
pub fn parse_kind_or_exit(value: &str) -> AudioKind {
    value
        .parse()
        .unwrap_or_else(|e| exit_with_error(&format!("{}", e)))
}

/// Parses a record id argument or exits.
pub fn parse_id_or_exit(value: &str) -> i64 {
    crate::parse_id(value).unwrap_or_else(|_| exit_with_error(&format!("Invalid id: {}", value)))
}

/// Splits `key=value` arguments into form pairs.
///
/// The value may itself contain `=`; only the first one separates.
pub fn parse_assignments(args: &[String]) -> Result<Vec<(String, String)>, String> {
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(format!("expected key=value, got {:?}", arg)),
        })
        .collect()
}
