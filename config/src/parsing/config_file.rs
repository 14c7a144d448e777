//! Parsing logic for a separate tool config file

use std::fs;

use toml::{Value, map::Map};

/// The CLI argument name for the config file
const CONFIG_FILE_ARG: &str = "--config-file";

/// Splice the entries of a config file into the command line
///
/// The file's entries are placed directly after the executable name so that
/// clap gives precedence to the flags that follow them on the command line
pub fn with_config_file_args(mut command_line_args: Vec<String>) -> Result<Vec<String>, String> {
    let file_args = config_file_args(&command_line_args)?;
    if command_line_args.is_empty() || file_args.is_empty() {
        return Ok(command_line_args);
    }

    let mut full_args = vec![command_line_args.remove(0)];
    full_args.extend(file_args);
    full_args.extend(command_line_args);
    Ok(full_args)
}

/// Parse args from a config file
fn config_file_args(cli_args: &[String]) -> Result<Vec<String>, String> {
    let Some(idx) = cli_args.iter().position(|arg| arg == CONFIG_FILE_ARG) else {
        return Ok(vec![]);
    };

    let path = cli_args.get(idx + 1).ok_or_else(|| format!("{CONFIG_FILE_ARG} expects a path"))?;
    read_config_file(path)
}

/// Parse a config file
fn read_config_file(path: &str) -> Result<Vec<String>, String> {
    let file_contents = fs::read_to_string(path).map_err(|err| err.to_string())?;
    let config_kv_pairs: Map<_, _> =
        toml::from_str(&file_contents).map_err(|err| err.to_string())?;

    let mut config_file_args: Vec<String> = Vec::with_capacity(config_kv_pairs.len());
    for (toml_key, value) in config_kv_pairs.iter() {
        // Format the TOML key into --key
        let cli_arg = format!("--{}", toml_key);
        let cli_values = parse_toml_value(cli_arg, value)?;
        config_file_args.extend(cli_values);
    }

    Ok(config_file_args)
}

// ----------------
// | TOML Parsing |
// ----------------

/// Parse a toml value into a list of strings to append to the CLI args
fn parse_toml_value(cli_arg: String, val: &Value) -> Result<Vec<String>, String> {
    let values: Vec<String> = match val {
        Value::Boolean(b) => toml_boolean_to_args(cli_arg, *b),
        Value::Array(_) | Value::Table(_) => {
            return Err(format!("unsupported value for {cli_arg}: {val}"));
        },
        x => vec![cli_arg, toml_value_to_string(x)?],
    };

    Ok(values)
}

/// Parse a toml boolean into a string that is CLI compatible
///
/// This will be "--key" if the boolean is true, otherwise it will be empty
fn toml_boolean_to_args(cli_arg: String, b: bool) -> Vec<String> {
    if b { vec![cli_arg] } else { vec![] }
}

/// Helper method to convert a toml value to a string
fn toml_value_to_string(val: &Value) -> Result<String, String> {
    Ok(match val {
        Value::String(val) => val.clone(),
        Value::Integer(val) => format!("{:?}", val),
        Value::Float(val) => format!("{:?}", val),
        _ => {
            return Err("unsupported value".to_string());
        },
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    /// Write a config file and return its handle
    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    /// Build an argv around a config file
    fn argv(file: &NamedTempFile, rest: &[&str]) -> Vec<String> {
        let path = file.path().to_str().unwrap().to_string();
        let mut args = vec!["zk-order".to_string(), CONFIG_FILE_ARG.to_string(), path];
        args.extend(rest.iter().map(|s| s.to_string()));
        args
    }

    #[test]
    fn test_file_args_precede_cli_args() {
        let file = config_file(
            "chain-id = 137\nlog-level = \"debug\"\nacknowledge-truncation = true\n\
             domain-version = \"5\"\n",
        );
        let args = with_config_file_args(argv(&file, &["--chain-id", "10"])).unwrap();

        assert_eq!(args[0], "zk-order");
        let file_pos = args.iter().position(|a| a == "137").unwrap();
        let cli_pos = args.iter().position(|a| a == "10").unwrap();
        assert!(file_pos < cli_pos);
        assert!(args.contains(&"--acknowledge-truncation".to_string()));
    }

    #[test]
    fn test_false_booleans_dropped() {
        let file = config_file("acknowledge-truncation = false\n");
        let args = with_config_file_args(argv(&file, &[])).unwrap();
        assert!(!args.contains(&"--acknowledge-truncation".to_string()));
    }

    #[test]
    fn test_no_config_file() {
        let args = vec!["zk-order".to_string(), "--chain-id".to_string(), "5".to_string()];
        assert_eq!(with_config_file_args(args.clone()).unwrap(), args);
    }

    #[test]
    fn test_rejects_nested_values() {
        let file = config_file("chain-id = [1, 2]\n");
        assert!(with_config_file_args(argv(&file, &[])).is_err());

        let missing = vec!["zk-order".to_string(), CONFIG_FILE_ARG.to_string()];
        assert!(with_config_file_args(missing).is_err());
    }
}
