use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// Overrides the default target year (next calendar year).
    pub year: Option<i32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    #[error("missing value for argument: {0}")]
    MissingValue(String),
    #[error("invalid --year value: {0}")]
    InvalidYear(String),
    #[error("help requested")]
    HelpRequested,
}

impl CliOptions {
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut year = None;

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" => return Err(CliError::HelpRequested),
                "--year" => {
                    let value = iter.next().ok_or(CliError::MissingValue(arg.clone()))?;
                    year = Some(parse_year(&value).ok_or(CliError::InvalidYear(value))?);
                }
                unknown => return Err(CliError::UnknownArgument(unknown.to_string())),
            }
        }

        Ok(Self { year })
    }
}

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RequestDate,
    Finalize,
    ForgetHistory,
    ToggleCategory(String),
    ListCategories,
    SelectYear(i32),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("not a year: {0}")]
    InvalidYear(String),
}

impl Command {
    /// Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, argument) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "tarih" | "al" | "get" => Self::RequestDate,
            "onayla" | "finalize" => Self::Finalize,
            "unut" | "forget" => Self::ForgetHistory,
            "kategori" | "toggle" => {
                if argument.is_empty() {
                    return Err(CommandError::MissingArgument("kategori"));
                }
                Self::ToggleCategory(argument.to_string())
            }
            "kategoriler" | "categories" => Self::ListCategories,
            "yıl" | "yil" | "year" => {
                if argument.is_empty() {
                    return Err(CommandError::MissingArgument("yıl"));
                }
                let year = parse_year(argument)
                    .ok_or_else(|| CommandError::InvalidYear(argument.to_string()))?;
                Self::SelectYear(year)
            }
            "durum" | "status" => Self::Status,
            "yardım" | "yardim" | "help" | "?" => Self::Help,
            "çıkış" | "cikis" | "quit" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown(name.to_string())),
        };

        Ok(Some(command))
    }
}

fn parse_year(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::{CliError, CliOptions, Command, CommandError};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn options_default_to_no_year_override() {
        assert_eq!(CliOptions::parse(args(&[])), Ok(CliOptions::default()));
    }

    #[test]
    fn options_accept_year_override() {
        let options = CliOptions::parse(args(&["--year", "2030"])).expect("valid args");
        assert_eq!(options.year, Some(2030));
    }

    #[test]
    fn options_reject_bad_input() {
        assert_eq!(
            CliOptions::parse(args(&["--year"])),
            Err(CliError::MissingValue("--year".to_string()))
        );
        assert_eq!(
            CliOptions::parse(args(&["--year", "yakında"])),
            Err(CliError::InvalidYear("yakında".to_string()))
        );
        assert_eq!(
            CliOptions::parse(args(&["--verbose"])),
            Err(CliError::UnknownArgument("--verbose".to_string()))
        );
        assert_eq!(CliOptions::parse(args(&["-h"])), Err(CliError::HelpRequested));
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("   \t"), Ok(None));
    }

    #[test]
    fn commands_accept_turkish_and_english_names() {
        assert_eq!(Command::parse("tarih"), Ok(Some(Command::RequestDate)));
        assert_eq!(Command::parse("GET"), Ok(Some(Command::RequestDate)));
        assert_eq!(Command::parse("onayla"), Ok(Some(Command::Finalize)));
        assert_eq!(Command::parse("unut"), Ok(Some(Command::ForgetHistory)));
        assert_eq!(Command::parse("kategoriler"), Ok(Some(Command::ListCategories)));
        assert_eq!(Command::parse("durum"), Ok(Some(Command::Status)));
        assert_eq!(Command::parse("?"), Ok(Some(Command::Help)));
        assert_eq!(Command::parse("çıkış"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn toggle_keeps_multi_word_labels() {
        assert_eq!(
            Command::parse("kategori  Bilim ve Teknoloji "),
            Ok(Some(Command::ToggleCategory("Bilim ve Teknoloji".to_string())))
        );
        assert_eq!(
            Command::parse("kategori"),
            Err(CommandError::MissingArgument("kategori"))
        );
    }

    #[test]
    fn year_command_requires_a_number() {
        assert_eq!(Command::parse("yıl 2031"), Ok(Some(Command::SelectYear(2031))));
        assert_eq!(
            Command::parse("year next"),
            Err(CommandError::InvalidYear("next".to_string()))
        );
        assert_eq!(Command::parse("yil"), Err(CommandError::MissingArgument("yıl")));
    }

    #[test]
    fn unknown_commands_are_reported() {
        assert_eq!(
            Command::parse("dans et"),
            Err(CommandError::Unknown("dans".to_string()))
        );
    }
}
