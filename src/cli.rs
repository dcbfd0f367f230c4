//! Command line of the launcher

use std::path::PathBuf;

use crate::error::LaunchError;

pub const USAGE: &str = "\
usage: squares-battle [options] (raw <name> | <save file>)

options:
  --version            print the version and exit
  -d, --debug          verbose logging and detailed error reports
  --ticks N            stop after N simulation ticks
  --settings PATH      JSON settings file
  --save PATH          write the final world to PATH on exit

Input is read from stdin, one command per line:
  press <code> | release <code> | down x y | drag x y | up x y";

/// Where the starting world comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSource {
    Raw(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub debug: bool,
    pub ticks: Option<u64>,
    pub settings: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub map: MapSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Version,
    Help,
    Run(LaunchOptions),
}

/// Parse arguments (without the program name)
pub fn parse_args(args: &[String]) -> Result<Command, LaunchError> {
    let mut debug = false;
    let mut ticks = None;
    let mut settings = None;
    let mut save = None;
    let mut positional: Vec<&str> = Vec::new();

    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "--version" => return Ok(Command::Version),
            "-h" | "--help" => return Ok(Command::Help),
            "-d" | "--debug" => debug = true,
            "--ticks" => {
                let value = value_of(args, index, "--ticks")?;
                ticks = Some(value.parse::<u64>().map_err(|_| {
                    LaunchError::Usage(format!("invalid --ticks value '{value}' (expected u64)"))
                })?);
                index += 1;
            }
            "--settings" => {
                settings = Some(PathBuf::from(value_of(args, index, "--settings")?));
                index += 1;
            }
            "--save" => {
                save = Some(PathBuf::from(value_of(args, index, "--save")?));
                index += 1;
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(LaunchError::Usage(format!("unknown option '{flag}'")));
            }
            other => positional.push(other),
        }
        index += 1;
    }

    let map = match positional.as_slice() {
        ["raw", name] => MapSource::Raw(name.to_string()),
        ["raw"] => return Err(LaunchError::Usage("missing raw map name".to_string())),
        [path] => MapSource::File(PathBuf::from(path)),
        [] => return Err(LaunchError::Usage("missing map".to_string())),
        _ => {
            return Err(LaunchError::Usage(format!(
                "unexpected arguments: {}",
                positional.join(" ")
            )));
        }
    };

    Ok(Command::Run(LaunchOptions {
        debug,
        ticks,
        settings,
        save,
        map,
    }))
}

fn value_of<'a>(args: &'a [String], index: usize, flag: &str) -> Result<&'a str, LaunchError> {
    args.get(index + 1)
        .map(String::as_str)
        .ok_or_else(|| LaunchError::Usage(format!("missing value for {flag}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, LaunchError> {
        let args: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        parse_args(&args)
    }

    #[test]
    fn test_raw_map_with_options() {
        let command = parse("-d --ticks 120 raw 2 --settings s.json").unwrap();
        assert_eq!(
            command,
            Command::Run(LaunchOptions {
                debug: true,
                ticks: Some(120),
                settings: Some(PathBuf::from("s.json")),
                save: None,
                map: MapSource::Raw("2".to_string()),
            })
        );
    }

    #[test]
    fn test_save_file_map() {
        let Command::Run(options) = parse("--save out.json level.json").unwrap() else {
            panic!("expected a run command");
        };
        assert_eq!(options.map, MapSource::File(PathBuf::from("level.json")));
        assert_eq!(options.save, Some(PathBuf::from("out.json")));
        assert!(!options.debug);
    }

    #[test]
    fn test_version_wins() {
        assert_eq!(parse("raw 1 --version").unwrap(), Command::Version);
        assert_eq!(parse("--help").unwrap(), Command::Help);
    }

    #[test]
    fn test_usage_errors() {
        for line in ["", "raw", "--ticks", "--ticks ten raw 1", "--bogus raw 1", "a b c"] {
            assert!(
                matches!(parse(line), Err(LaunchError::Usage(_))),
                "expected usage error for {line:?}"
            );
        }
    }
}
